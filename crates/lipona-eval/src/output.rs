//! Output sinks for `toki`.

use std::io::Write;

/// Where printed lines go.
pub trait Output {
    /// Write one complete line (without its trailing newline).
    fn write_line(&mut self, line: &str);
}

/// Captures lines in memory.
impl Output for Vec<String> {
    fn write_line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Writes lines to standard output, flushing after each one.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutOutput;

impl Output for StdoutOutput {
    fn write_line(&mut self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{line}").and_then(|()| stdout.flush()) {
            tracing::warn!(error = %err, "failed to write program output");
        }
    }
}
