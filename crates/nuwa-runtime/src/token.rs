//! Token types for lexical analysis
//!
//! Defines all token types recognized by the NuwaScript lexer. Keywords are
//! recognized only in their fixed uppercase spelling; identifiers are
//! case-sensitive, so `let` and `True` are ordinary identifiers.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// Source text, or the decoded payload for string literals
    pub lexeme: String,
    /// Source location
    pub span: Span,
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed)
    pub column: u32,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span, line: u32, column: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
            line,
            column,
        }
    }
}

/// Classification of token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Number literal (42, 3.14)
    Number,
    /// String literal ("hello")
    String,
    /// `TRUE` keyword
    True,
    /// `FALSE` keyword
    False,
    /// `NULL` keyword
    Null,
    /// Identifier
    Identifier,

    // Keywords
    /// `LET` keyword
    Let,
    /// `CALL` keyword
    Call,
    /// `IF` keyword
    If,
    /// `THEN` keyword
    Then,
    /// `ELSE` keyword
    Else,
    /// `END` keyword
    End,
    /// `FOR` keyword
    For,
    /// `IN` keyword
    In,
    /// `DO` keyword
    Do,
    /// `PRINT` keyword
    Print,
    /// `AND` keyword (logical and)
    And,
    /// `OR` keyword (logical or)
    Or,
    /// `NOT` keyword (logical not)
    Not,
    /// `NOW` keyword (built-in time function)
    Now,

    // Operators
    /// `+` (addition or unary plus)
    Plus,
    /// `-` (subtraction or negation)
    Minus,
    /// `*` (multiplication)
    Star,
    /// `/` (division)
    Slash,
    /// `==` (equality)
    EqualEqual,
    /// `!=` (inequality)
    BangEqual,
    /// `<` (less than)
    Less,
    /// `<=` (less than or equal)
    LessEqual,
    /// `>` (greater than)
    Greater,
    /// `>=` (greater than or equal)
    GreaterEqual,

    // Punctuation
    /// `=` (binding in LET)
    Equal,
    /// `(` (left parenthesis)
    LeftParen,
    /// `)` (right parenthesis)
    RightParen,
    /// `{` (left brace)
    LeftBrace,
    /// `}` (right brace)
    RightBrace,
    /// `[` (left bracket)
    LeftBracket,
    /// `]` (right bracket)
    RightBracket,
    /// `,` (comma)
    Comma,
    /// `:` (colon)
    Colon,
    /// `.` (member access)
    Dot,

    // Special
    /// End of input
    Eof,
}

impl TokenKind {
    /// Check if a string is a keyword and return its token kind
    pub fn is_keyword(s: &str) -> Option<TokenKind> {
        match s {
            "LET" => Some(TokenKind::Let),
            "CALL" => Some(TokenKind::Call),
            "IF" => Some(TokenKind::If),
            "THEN" => Some(TokenKind::Then),
            "ELSE" => Some(TokenKind::Else),
            "END" => Some(TokenKind::End),
            "FOR" => Some(TokenKind::For),
            "IN" => Some(TokenKind::In),
            "DO" => Some(TokenKind::Do),
            "PRINT" => Some(TokenKind::Print),
            "AND" => Some(TokenKind::And),
            "OR" => Some(TokenKind::Or),
            "NOT" => Some(TokenKind::Not),
            "NOW" => Some(TokenKind::Now),
            "TRUE" => Some(TokenKind::True),
            "FALSE" => Some(TokenKind::False),
            "NULL" => Some(TokenKind::Null),
            _ => None,
        }
    }

    /// Get the display representation of this token kind
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Null => "NULL",
            TokenKind::Identifier => "identifier",
            TokenKind::Let => "LET",
            TokenKind::Call => "CALL",
            TokenKind::If => "IF",
            TokenKind::Then => "THEN",
            TokenKind::Else => "ELSE",
            TokenKind::End => "END",
            TokenKind::For => "FOR",
            TokenKind::In => "IN",
            TokenKind::Do => "DO",
            TokenKind::Print => "PRINT",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Now => "NOW",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::EqualEqual => "==",
            TokenKind::BangEqual => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Equal => "=",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Eof => "end of input",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new(TokenKind::Number, "42", Span::new(0, 2), 1, 1);
        assert_eq!(token.kind, TokenKind::Number);
        assert_eq!(token.lexeme, "42");
        assert_eq!(token.span, Span::new(0, 2));
        assert_eq!(token.line, 1);
        assert_eq!(token.column, 1);
    }

    #[test]
    fn test_keyword_detection() {
        assert_eq!(TokenKind::is_keyword("LET"), Some(TokenKind::Let));
        assert_eq!(TokenKind::is_keyword("CALL"), Some(TokenKind::Call));
        assert_eq!(TokenKind::is_keyword("IF"), Some(TokenKind::If));
        assert_eq!(TokenKind::is_keyword("THEN"), Some(TokenKind::Then));
        assert_eq!(TokenKind::is_keyword("ELSE"), Some(TokenKind::Else));
        assert_eq!(TokenKind::is_keyword("END"), Some(TokenKind::End));
        assert_eq!(TokenKind::is_keyword("FOR"), Some(TokenKind::For));
        assert_eq!(TokenKind::is_keyword("IN"), Some(TokenKind::In));
        assert_eq!(TokenKind::is_keyword("DO"), Some(TokenKind::Do));
        assert_eq!(TokenKind::is_keyword("PRINT"), Some(TokenKind::Print));
        assert_eq!(TokenKind::is_keyword("NOW"), Some(TokenKind::Now));
        assert_eq!(TokenKind::is_keyword("TRUE"), Some(TokenKind::True));
        assert_eq!(TokenKind::is_keyword("FALSE"), Some(TokenKind::False));
        assert_eq!(TokenKind::is_keyword("NULL"), Some(TokenKind::Null));
    }

    #[test]
    fn test_keywords_are_case_fixed() {
        // Lowercase spellings are ordinary identifiers
        assert_eq!(TokenKind::is_keyword("let"), None);
        assert_eq!(TokenKind::is_keyword("true"), None);
        assert_eq!(TokenKind::is_keyword("null"), None);
        assert_eq!(TokenKind::is_keyword("Print"), None);
    }

    #[test]
    fn test_token_kind_as_str() {
        assert_eq!(TokenKind::Let.as_str(), "LET");
        assert_eq!(TokenKind::EqualEqual.as_str(), "==");
        assert_eq!(TokenKind::Dot.as_str(), ".");
        assert_eq!(TokenKind::Eof.as_str(), "end of input");
    }
}
