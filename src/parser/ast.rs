//! Abstract Syntax Tree (AST) definitions for Tenglish
//!
//! These types represent the structure of a Tenglish program after parsing.
//! Surface word order is already normalized here: a `for` node holds its
//! variable and iterable regardless of the order they were written in.

use crate::errors::SourceSpan;

/// A complete Tenglish program
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Top-level statements in source order
    pub body: Vec<Stmt>,
}

/// An identifier with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: SourceSpan,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// A non-empty block of statements
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: SourceSpan,
}

/// A statement
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: SourceSpan,
}

impl Stmt {
    /// Statements that own a block
    pub fn is_compound(&self) -> bool {
        matches!(
            self.kind,
            StmtKind::FunctionDef(_)
                | StmtKind::If(_)
                | StmtKind::While { .. }
                | StmtKind::For { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `vidhanam name(params):`
    FunctionDef(FunctionDef),
    /// `okavela ... aite:` with its `lekapothe okavela` / `lekapothe` branches
    If(IfStmt),
    /// `cond unnanta varaku:`
    While { condition: Expr, body: Block },
    /// `iterable lo var ki:`
    For {
        var: Ident,
        iterable: Expr,
        body: Block,
    },
    /// `expr ivvu`
    Return(Expr),
    /// `(args)cheppu`
    Print(Vec<Expr>),
    /// `target = value`
    Assign { target: Expr, value: Expr },
    /// `target += value`
    CompoundAssign {
        target: Expr,
        op: BinaryOp,
        value: Expr,
    },
    /// Expression statement
    Expr(Expr),
    Break,
    Continue,
}

/// A function definition
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Block,
}

/// A flattened conditional chain
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    /// The `if` branch followed by every `elif`, never empty
    pub branches: Vec<Branch>,
    pub else_body: Option<Block>,
}

/// One guarded branch of a conditional chain
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub condition: Expr,
    pub body: Block,
}

/// An expression
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: SourceSpan,
}

impl Expr {
    pub fn new(kind: ExprKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }

    /// Whether the expression may appear on the left of `=`
    pub fn is_assignable(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Ident(_) | ExprKind::Attribute { .. } | ExprKind::Index { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Ident(Ident),
    /// Binary operation: `a + b`
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// Unary operation: `-a`, `+a`, `avvakapote a`
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Call: `callee(args)`
    Call { callee: Box<Expr>, args: Vec<Expr> },
    /// Indexing: `object[index]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    /// Attribute access: `object.name`
    Attribute { object: Box<Expr>, name: Ident },
    /// List literal: `[1, 2, 3]`
    List(Vec<Expr>),
    /// Parenthesized tuple: `(a, b)` or `()`
    Tuple(Vec<Expr>),
    /// Parenthesized expression, kept as written
    Paren(Box<Expr>),
}

/// Literal payloads, stored as their exact source text
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(String),
    Float(String),
    /// Includes quotes and any prefix
    Str(String),
    Bool(bool),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Logical
    Or,
    And,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    /// Get the precedence of this operator (higher = binds tighter).
    /// Level 3 belongs to prefix `not`.
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge
            | BinaryOp::In => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 6,
        }
    }

    /// Operator text for symbolic operators; `None` for keyword operators
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            BinaryOp::Or | BinaryOp::And => None,
            BinaryOp::Eq => Some("=="),
            BinaryOp::Ne => Some("!="),
            BinaryOp::Lt => Some("<"),
            BinaryOp::Le => Some("<="),
            BinaryOp::Gt => Some(">"),
            BinaryOp::Ge => Some(">="),
            BinaryOp::In => Some("in"),
            BinaryOp::Add => Some("+"),
            BinaryOp::Sub => Some("-"),
            BinaryOp::Mul => Some("*"),
            BinaryOp::Div => Some("/"),
            BinaryOp::Rem => Some("%"),
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg, // -
    Pos, // +
    Not, // avvakapote
}

/// Precedence of prefix `not`
pub const NOT_PRECEDENCE: u8 = 3;
