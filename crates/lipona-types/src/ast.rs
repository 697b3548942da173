//! AST node types for the Lipona language.
//!
//! Every node carries a [`Span`] for error reporting. Function bodies sit
//! behind an [`Rc`] so that closure values can share them with the tree.

use crate::Span;
use std::fmt;
use std::rc::Rc;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete program: the top-level block.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Block,
}

/// An ordered sequence of statements, executed top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `x jo expr`
    Assign(AssignStmt),
    /// `cond la open ... pini [taso open ... pini]`
    If(IfStmt),
    /// `wile cond la open ... pini`
    While(WhileStmt),
    /// `ilo name (params) open ... pini`
    FuncDef(Rc<FuncDef>),
    /// `pana [expr]`
    Return(ReturnStmt),
    /// A bare expression, evaluated for its side effects.
    Expr(Expr),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Assign(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::FuncDef(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Expr(e) => e.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: Ident,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_block: Block,
    pub else_block: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Block,
    pub span: Span,
}

/// A named function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDef {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node. Uses `Box` for recursive variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `42`, `3.14`
    Number(f64),
    /// `"toki, {name}!"` — literal text and embedded expressions in order
    String(Vec<StringPart>),
    /// `lon` (true) / `ala` (false, the bottom value)
    Bool(bool),
    /// `count`
    Var(String),
    /// `-x`
    Neg(Box<Expr>),
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `name(args...)`
    Call { name: Ident, args: Vec<Expr> },
}

/// A segment of a string literal.
///
/// Embedded expressions are kept as raw source; they are lexed, parsed and
/// evaluated each time the literal is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum StringPart {
    /// Literal text with escapes already resolved.
    Literal(String),
    /// The text between an unescaped `{` and its matching `}`.
    Code { source: String, span: Span },
}

// ── Binary Operators ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    /// `suli`
    Greater,
    /// `lili`
    Less,
    /// `suli_sama`
    GreaterEq,
    /// `lili_sama`
    LessEq,
    /// `sama`
    Same,
}

impl BinOp {
    /// Returns `true` for the keyword comparison operators.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Greater | BinOp::Less | BinOp::GreaterEq | BinOp::LessEq | BinOp::Same
        )
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Greater => "suli",
            BinOp::Less => "lili",
            BinOp::GreaterEq => "suli_sama",
            BinOp::LessEq => "lili_sama",
            BinOp::Same => "sama",
        })
    }
}
