//! Core expression and statement evaluator.

use std::rc::Rc;

use lipona_types::ast::*;

use crate::config::EvalConfig;
use crate::env::{EnvRef, Environment};
use crate::error::{EvalResult, ExecResult, Pakala};
use crate::output::Output;
use crate::stdlib;
use crate::value::{Arity, Builtin, Closure, Value};

/// Remaining stack below which a call grows the stack.
pub(crate) const STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each new stack segment.
pub(crate) const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// The core evaluator: walks AST nodes and produces Values.
pub struct Evaluator<'o> {
    /// Sink for `toki`.
    output: &'o mut dyn Output,
    config: EvalConfig,
    /// Number of user function calls currently active.
    call_depth: usize,
    /// The root scope, pre-populated with the standard library.
    globals: EnvRef,
}

impl<'o> Evaluator<'o> {
    /// Create an evaluator with default limits and a fresh root scope.
    pub fn new(output: &'o mut dyn Output) -> Self {
        Self::with_config(output, EvalConfig::default())
    }

    /// Create an evaluator with the given limits and a fresh root scope.
    pub fn with_config(output: &'o mut dyn Output, config: EvalConfig) -> Self {
        Self::with_env(output, config, Self::root_env())
    }

    /// Create an evaluator that runs in an existing root scope.
    pub fn with_env(output: &'o mut dyn Output, config: EvalConfig, globals: EnvRef) -> Self {
        Self {
            output,
            config,
            call_depth: 0,
            globals,
        }
    }

    /// A new root scope with every builtin bound.
    pub fn root_env() -> EnvRef {
        let env = Environment::new_root();
        stdlib::install(&mut env.borrow_mut());
        env
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    /// Run a whole program in the root scope.
    ///
    /// A top-level `pana` ends the program successfully.
    pub fn eval_program(&mut self, program: &Program) -> EvalResult<()> {
        tracing::debug!(statements = program.body.stmts.len(), "executing program");
        let globals = Rc::clone(&self.globals);
        match self.eval_block(&program.body, &globals) {
            Ok(ExecResult::Completed) => {
                tracing::debug!("program completed");
                Ok(())
            }
            Ok(ExecResult::Returned(_)) => {
                tracing::debug!("program returned at top level");
                Ok(())
            }
            Err(fault) => {
                tracing::debug!(error = %fault, "program halted");
                Err(fault)
            }
        }
    }

    /// Execute each statement of `block` in `env`, stopping at the first `pana`.
    pub fn eval_block(&mut self, block: &Block, env: &EnvRef) -> EvalResult<ExecResult> {
        for stmt in &block.stmts {
            if let ExecResult::Returned(value) = self.exec_stmt(stmt, env)? {
                return Ok(ExecResult::Returned(value));
            }
        }
        Ok(ExecResult::Completed)
    }

    fn exec_stmt(&mut self, stmt: &Stmt, env: &EnvRef) -> EvalResult<ExecResult> {
        match stmt {
            Stmt::Assign(assign) => {
                let value = self.eval_expr(&assign.value, env)?;
                env.borrow_mut().assign(&assign.target.name, value);
                Ok(ExecResult::Completed)
            }
            Stmt::If(if_stmt) => self.exec_if(if_stmt, env),
            Stmt::While(while_stmt) => self.exec_while(while_stmt, env),
            Stmt::FuncDef(def) => {
                let closure = Value::Closure(Rc::new(Closure {
                    def: Rc::clone(def),
                    env: Rc::clone(env),
                }));
                env.borrow_mut().define(&def.name.name, closure);
                Ok(ExecResult::Completed)
            }
            Stmt::Return(ret) => {
                let value = match &ret.value {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Value::Null,
                };
                Ok(ExecResult::Returned(value))
            }
            Stmt::Expr(expr) => {
                self.eval_expr(expr, env)?;
                Ok(ExecResult::Completed)
            }
        }
    }

    fn exec_if(&mut self, stmt: &IfStmt, env: &EnvRef) -> EvalResult<ExecResult> {
        let block = if self.eval_expr(&stmt.condition, env)?.is_truthy() {
            &stmt.then_block
        } else if let Some(else_block) = &stmt.else_block {
            else_block
        } else {
            return Ok(ExecResult::Completed);
        };
        let scope = Environment::new_child(env);
        self.eval_block(block, &scope)
    }

    fn exec_while(&mut self, stmt: &WhileStmt, env: &EnvRef) -> EvalResult<ExecResult> {
        let mut iterations: u64 = 0;
        while self.eval_expr(&stmt.condition, env)?.is_truthy() {
            iterations += 1;
            if let Some(limit) = self.config.max_loop_iterations {
                if iterations > limit {
                    return Err(Pakala::LoopLimit(limit));
                }
            }
            let scope = Environment::new_child(env);
            if let ExecResult::Returned(value) = self.eval_block(&stmt.body, &scope)? {
                return Ok(ExecResult::Returned(value));
            }
        }
        Ok(ExecResult::Completed)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    pub fn eval_expr(&mut self, expr: &Expr, env: &EnvRef) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::String(parts) => self.eval_string_parts(parts, env),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Var(name) => lookup(env, name),
            ExprKind::Neg(operand) => match self.eval_expr(operand, env)? {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(Pakala::expected("nanpa", &other)),
            },
            ExprKind::Binary { left, op, right } => {
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                eval_binary(*op, left, right)
            }
            ExprKind::Call { name, args } => self.eval_call(name, args, env),
        }
    }

    // ── Calls ─────────────────────────────────────────────────────────────

    fn eval_call(&mut self, name: &Ident, args: &[Expr], env: &EnvRef) -> EvalResult<Value> {
        let callee = lookup(env, &name.name)?;
        if !matches!(callee, Value::Closure(_) | Value::Builtin(_)) {
            return Err(Pakala::NotCallable {
                name: name.name.clone(),
                got: callee.type_name(),
            });
        }
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg, env)?);
        }
        self.call_value(&name.name, &callee, values)
    }

    /// Call a function value with already-evaluated arguments.
    pub fn call_value(&mut self, name: &str, callee: &Value, args: Vec<Value>) -> EvalResult<Value> {
        match callee {
            Value::Closure(closure) => self.call_closure(closure, args),
            Value::Builtin(builtin) => self.call_builtin(builtin, args),
            other => Err(Pakala::NotCallable {
                name: name.to_string(),
                got: other.type_name(),
            }),
        }
    }

    fn call_builtin(&mut self, builtin: &Builtin, args: Vec<Value>) -> EvalResult<Value> {
        if let Arity::Exact(expected) = builtin.arity {
            if args.len() != expected {
                return Err(Pakala::WrongArity {
                    name: builtin.name.to_string(),
                    expected,
                    got: args.len(),
                });
            }
        }
        tracing::trace!(builtin = builtin.name, args = args.len(), "call");
        (builtin.func)(&mut *self.output, args)
    }

    fn call_closure(&mut self, closure: &Rc<Closure>, args: Vec<Value>) -> EvalResult<Value> {
        let def = &closure.def;
        if args.len() != def.params.len() {
            return Err(Pakala::WrongArity {
                name: def.name.name.clone(),
                expected: def.params.len(),
                got: args.len(),
            });
        }
        if self.call_depth >= self.config.max_call_depth {
            return Err(Pakala::StackOverflow(self.config.max_call_depth));
        }

        let scope = Environment::new_child(&closure.env);
        {
            let mut frame = scope.borrow_mut();
            for (param, arg) in def.params.iter().zip(args) {
                frame.define(&param.name, arg);
            }
        }

        self.call_depth += 1;
        tracing::trace!(function = %def.name.name, depth = self.call_depth, "call");
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.eval_block(&def.body, &scope)
        });
        self.call_depth -= 1;

        match result? {
            ExecResult::Returned(value) => Ok(value),
            ExecResult::Completed => Ok(Value::Null),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════

fn lookup(env: &EnvRef, name: &str) -> EvalResult<Value> {
    env.borrow()
        .get(name)
        .ok_or_else(|| Pakala::UnboundVariable(name.to_string()))
}

fn eval_binary(op: BinOp, left: Value, right: Value) -> EvalResult<Value> {
    let numbers = || match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(Pakala::TypeMismatch(format!(
            "cannot apply '{op}' to {} and {}",
            left.type_name(),
            right.type_name()
        ))),
    };
    match op {
        BinOp::Same => Ok(Value::Bool(left.sama(&right))),
        BinOp::Add => {
            if let (Value::String(a), Value::String(b)) = (&left, &right) {
                return Ok(Value::String(format!("{a}{b}")));
            }
            let (a, b) = numbers()?;
            Ok(Value::Number(a + b))
        }
        BinOp::Sub => numbers().map(|(a, b)| Value::Number(a - b)),
        BinOp::Mul => numbers().map(|(a, b)| Value::Number(a * b)),
        BinOp::Div => match numbers()? {
            (_, b) if b == 0.0 => Err(Pakala::DivisionByZero),
            (a, b) => Ok(Value::Number(a / b)),
        },
        BinOp::Greater => numbers().map(|(a, b)| Value::Bool(a > b)),
        BinOp::Less => numbers().map(|(a, b)| Value::Bool(a < b)),
        BinOp::GreaterEq => numbers().map(|(a, b)| Value::Bool(a >= b)),
        BinOp::LessEq => numbers().map(|(a, b)| Value::Bool(a <= b)),
    }
}
