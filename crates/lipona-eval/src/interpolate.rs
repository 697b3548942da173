//! Evaluation of string literals with embedded `{expr}` segments.

use lipona_parser::parse_embedded_expr;
use lipona_types::ast::StringPart;

use crate::env::EnvRef;
use crate::error::{EvalResult, Pakala};
use crate::evaluator::Evaluator;
use crate::value::Value;

impl Evaluator<'_> {
    /// Build the string for a literal, left to right.
    ///
    /// Each embedded segment is lexed, parsed and evaluated in `env` every
    /// time the literal is evaluated.
    pub(crate) fn eval_string_parts(
        &mut self,
        parts: &[StringPart],
        env: &EnvRef,
    ) -> EvalResult<Value> {
        let mut result = String::new();
        for part in parts {
            match part {
                StringPart::Literal(text) => result.push_str(text),
                StringPart::Code { source, .. } => {
                    let expr = parse_embedded_expr(source).map_err(|errors| {
                        Pakala::Interpolation {
                            code: source.clone(),
                            message: errors
                                .first()
                                .map(|e| e.message.clone())
                                .unwrap_or_else(|| "invalid expression".to_string()),
                        }
                    })?;
                    let value = self.eval_expr(&expr, env)?;
                    result.push_str(&value.to_string());
                }
            }
        }
        Ok(Value::String(result))
    }
}
