//! A session that keeps its root scope across runs.

use lipona_eval::{EnvRef, EvalConfig, Evaluator, Output, Value};
use lipona_types::SourceFile;

use crate::{parse_source, LiponaError};

/// Runs successive snippets against one root scope, as a REPL does.
///
/// Variables and functions defined by one `run` are visible to the next.
/// A snippet with structural faults changes nothing; a snippet that faults
/// at runtime keeps whatever it bound before the fault.
pub struct Interpreter {
    config: EvalConfig,
    globals: EnvRef,
    runs: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self {
            config,
            globals: Evaluator::root_env(),
            runs: 0,
        }
    }

    /// Run a snippet in this session.
    pub fn run(&mut self, source: &str, out: &mut dyn Output) -> Result<(), LiponaError> {
        self.runs += 1;
        let name = format!("<input {}>", self.runs);
        self.run_named(&name, source, out)
    }

    /// Run a snippet whose diagnostics should carry `name`.
    pub fn run_named(
        &mut self,
        name: &str,
        source: &str,
        out: &mut dyn Output,
    ) -> Result<(), LiponaError> {
        let program = parse_source(&SourceFile::new(name, source))?;
        Evaluator::with_env(out, self.config, self.globals.clone()).eval_program(&program)?;
        Ok(())
    }

    /// Current value of a root-scope binding.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.globals.borrow().get(name)
    }

    /// Drop every binding and start over with a fresh root scope.
    pub fn reset(&mut self) {
        self.globals = Evaluator::root_env();
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_persist_between_runs() {
        let mut session = Interpreter::new();
        let mut out: Vec<String> = Vec::new();
        session.run("x jo 2", &mut out).unwrap();
        session
            .run("ilo double (n) open\n  pana n * 2\npini", &mut out)
            .unwrap();
        session.run("toki(double(x))", &mut out).unwrap();
        assert_eq!(out, vec!["4"]);
        assert_eq!(session.get("x"), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_structural_fault_changes_nothing() {
        let mut session = Interpreter::new();
        let mut out: Vec<String> = Vec::new();
        session.run("x jo 1", &mut out).unwrap();
        assert!(session.run("x jo 5\ny jo (", &mut out).is_err());
        assert_eq!(session.get("x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_runtime_fault_keeps_earlier_bindings() {
        let mut session = Interpreter::new();
        let mut out: Vec<String> = Vec::new();
        let err = session.run("a jo 1\nb jo 1 / 0", &mut out).unwrap_err();
        assert!(err.is_runtime());
        assert_eq!(session.get("a"), Some(Value::Number(1.0)));
        assert_eq!(session.get("b"), None);
    }

    #[test]
    fn test_reset() {
        let mut session = Interpreter::new();
        let mut out: Vec<String> = Vec::new();
        session.run("x jo 1", &mut out).unwrap();
        session.reset();
        assert_eq!(session.get("x"), None);
        assert!(session.get("toki").is_some());
    }

    #[test]
    fn test_diagnostic_names_count_runs() {
        let mut session = Interpreter::new();
        let mut out: Vec<String> = Vec::new();
        session.run("x jo 1", &mut out).unwrap();
        let err = session.run("toki(", &mut out).unwrap_err();
        let file = err.diagnostics().and_then(|d| d.first()).map(|e| e.file.clone());
        assert_eq!(file.as_deref(), Some("<input 2>"));
    }
}
