//! Evaluator limits.

/// Default maximum depth of nested function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Resource limits for one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    /// Calls nested deeper than this fault with a stack overflow.
    pub max_call_depth: usize,
    /// When set, a single `wile` loop running more iterations than this faults.
    pub max_loop_iterations: Option<u64>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_loop_iterations: None,
        }
    }
}

impl EvalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_max_loop_iterations(mut self, limit: u64) -> Self {
        self.max_loop_iterations = Some(limit);
        self
    }
}
