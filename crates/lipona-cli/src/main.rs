use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use lipona::{EvalConfig, LiponaError, SourceFile, StdoutOutput, DEFAULT_MAX_CALL_DEPTH};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `LIPONA_LOG=debug`.
const LOG_ENV: &str = "LIPONA_LOG";

/// lipona runs programs written in Lipona, a small toki pona flavoured
/// scripting language.
#[derive(Parser, Debug)]
#[command(name = "lipona", version, about, long_about = None)]
struct Args {
    /// Program file to run (usually `.lipo`).
    #[arg(required_unless_present = "eval", conflicts_with = "eval")]
    file: Option<PathBuf>,

    /// Run CODE given on the command line instead of a file.
    #[arg(short, long, value_name = "CODE")]
    eval: Option<String>,

    /// Only check the program for lex and parse errors; do not run it.
    #[arg(long)]
    check: bool,

    /// Print errors to stderr as JSON.
    #[arg(long)]
    json: bool,

    /// Nested calls deeper than this halt the program.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    /// A single `wile` loop running more iterations than this halts the program.
    #[arg(long, value_name = "N")]
    max_loop_iterations: Option<u64>,
}

/// JSON shape for a runtime fault.
#[derive(Serialize)]
struct RuntimeReport {
    kind: &'static str,
    message: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let (name, source) = match load_source(&args) {
        Ok(loaded) => loaded,
        Err(message) => {
            eprintln!("pakala: {message}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = EvalConfig::default().with_max_call_depth(args.max_call_depth);
    config.max_loop_iterations = args.max_loop_iterations;

    let result = if args.check {
        lipona::check(&name, &source)
    } else {
        lipona::execute_with_config(&name, &source, &mut StdoutOutput, config)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err, args.json);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // Logs go to stderr so program output on stdout stays clean.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// The diagnostic file name and program text.
fn load_source(args: &Args) -> Result<(String, String), String> {
    if let Some(code) = &args.eval {
        return Ok((SourceFile::INLINE_NAME.to_string(), code.clone()));
    }
    let Some(path) = &args.file else {
        return Err("no program given; pass a file or -e CODE".to_string());
    };
    tracing::debug!(path = %path.display(), "reading program");
    let source = fs::read_to_string(path)
        .map_err(|e| format!("cannot read file '{}': {e}", path.display()))?;
    Ok((path.display().to_string(), source))
}

fn report(err: &LiponaError, json: bool) {
    if !json {
        eprintln!("{err}");
        return;
    }
    let rendered = match err.diagnostics() {
        Some(diagnostics) => serde_json::to_string_pretty(diagnostics),
        None => serde_json::to_string_pretty(&RuntimeReport {
            kind: "runtime",
            message: err.to_string(),
        }),
    };
    match rendered {
        Ok(text) => eprintln!("{text}"),
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize errors as JSON");
            eprintln!("{err}");
        }
    }
}
