//! Abstract syntax tree node shapes
//!
//! Pure data: nodes are immutable once built, own their children, and carry
//! spans for error reporting. No evaluation logic lives here.
//!
//! Tool-call arguments and object-literal entries are ordered vectors rather
//! than maps, so the evaluator can honor source-order evaluation of
//! side-effecting expressions.

use crate::span::Span;

/// The AST root: an ordered sequence of statements
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub statements: Vec<Stmt>,
}

/// A named reference with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `LET name = expr`
    Let(LetStmt),
    /// `CALL tool { ... }` in statement position (result discarded)
    Call(ToolCallExpr),
    /// `IF cond THEN ... [ELSE ...] END`
    If(IfStmt),
    /// `FOR name IN expr DO ... END`
    For(ForStmt),
    /// `PRINT(expr)`
    Print(PrintStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetStmt {
    pub name: Identifier,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Vec<Stmt>,
    pub else_branch: Option<Vec<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    /// Iterator variable bound for each element
    pub binding: Identifier,
    pub iterable: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintStmt {
    pub value: Expr,
    pub span: Span,
}

/// Literal payload carried by the AST
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
}

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal(Literal, Span),
    /// Variable reference
    Variable(Identifier),
    /// Binary operation
    Binary(BinaryExpr),
    /// Unary operation
    Unary(UnaryExpr),
    /// `NOW()` built-in (whole seconds since the Unix epoch)
    Now(Span),
    /// `CALL tool { ... }` in expression position
    ToolCall(ToolCallExpr),
    /// `base.property`
    Member(MemberExpr),
    /// `base[index]`
    Index(IndexExpr),
    /// `[a, b, c]`
    List(ListExpr),
    /// `{ key: expr, ... }`
    Object(ObjectExpr),
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "NOT",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

/// Shared shape for tool calls in statement and expression position
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallExpr {
    pub name: Identifier,
    /// Call-site arguments in source order
    pub arguments: Vec<Argument>,
    pub span: Span,
}

/// A single `name: expr` entry in a tool-call argument block
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Identifier,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub property: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub target: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListExpr {
    pub elements: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpr {
    /// Entries in declaration order; duplicate keys resolve last-write-wins
    pub entries: Vec<ObjectEntry>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    pub key: String,
    pub key_span: Span,
    pub value: Expr,
}

impl Stmt {
    /// Get the source span of this statement
    pub fn span(&self) -> Span {
        match self {
            Stmt::Let(s) => s.span,
            Stmt::Call(c) => c.span,
            Stmt::If(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::Print(s) => s.span,
        }
    }
}

impl Expr {
    /// Get the source span of this expression
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(_, span) => *span,
            Expr::Variable(id) => id.span,
            Expr::Binary(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Now(span) => *span,
            Expr::ToolCall(e) => e.span,
            Expr::Member(e) => e.span,
            Expr::Index(e) => e.span,
            Expr::List(e) => e.span,
            Expr::Object(e) => e.span,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_span() {
        let expr = Expr::Binary(BinaryExpr {
            op: BinaryOp::Add,
            left: Box::new(Expr::Literal(Literal::Number(1.0), Span::new(0, 1))),
            right: Box::new(Expr::Literal(Literal::Number(2.0), Span::new(4, 5))),
            span: Span::new(0, 5),
        });
        assert_eq!(expr.span(), Span::new(0, 5));
    }

    #[test]
    fn test_stmt_span() {
        let stmt = Stmt::Call(ToolCallExpr {
            name: Identifier {
                name: "swap".to_string(),
                span: Span::new(5, 9),
            },
            arguments: Vec::new(),
            span: Span::new(0, 12),
        });
        assert_eq!(stmt.span(), Span::new(0, 12));
    }

    #[test]
    fn test_operator_display_names() {
        assert_eq!(BinaryOp::And.as_str(), "AND");
        assert_eq!(BinaryOp::Le.as_str(), "<=");
        assert_eq!(UnaryOp::Not.as_str(), "NOT");
    }
}
