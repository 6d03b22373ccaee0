//! Lexical analysis (tokenization)
//!
//! The lexer converts NuwaScript source text into a stream of tokens with
//! line/column information. Lexing is fail-fast: the first malformed token
//! aborts with a diagnostic, no recovery is attempted.

use crate::diagnostic::Diagnostic;
use crate::span::Span;
use crate::token::{Token, TokenKind};

mod literals;

/// Lexer state for tokenizing source code
pub struct Lexer {
    /// Original source code
    pub(super) source: String,
    /// Characters of source code
    pub(super) chars: Vec<char>,
    /// Current position in chars
    pub(super) current: usize,
    /// Current line number (1-indexed)
    pub(super) line: u32,
    /// Current column number (1-indexed)
    pub(super) column: u32,
    /// Start position of current token
    pub(super) start_pos: usize,
    /// Start line of current token
    pub(super) start_line: u32,
    /// Start column of current token
    pub(super) start_column: u32,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let chars: Vec<char> = source.chars().collect();
        Self {
            source,
            chars,
            current: 0,
            line: 1,
            column: 1,
            start_pos: 0,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Tokenize the source code, stopping at the first lexical fault
    pub fn tokenize(&mut self) -> Result<Vec<Token>, Diagnostic> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    /// Scan the next token
    fn next_token(&mut self) -> Result<Token, Diagnostic> {
        self.skip_whitespace_and_comments();

        // Mark start of token
        self.start_pos = self.current;
        self.start_line = self.line;
        self.start_column = self.column;

        if self.is_at_end() {
            return Ok(self.make_token(TokenKind::Eof, ""));
        }

        let c = self.advance();

        match c {
            // Single-character tokens
            '(' => Ok(self.make_token(TokenKind::LeftParen, "(")),
            ')' => Ok(self.make_token(TokenKind::RightParen, ")")),
            '{' => Ok(self.make_token(TokenKind::LeftBrace, "{")),
            '}' => Ok(self.make_token(TokenKind::RightBrace, "}")),
            '[' => Ok(self.make_token(TokenKind::LeftBracket, "[")),
            ']' => Ok(self.make_token(TokenKind::RightBracket, "]")),
            ',' => Ok(self.make_token(TokenKind::Comma, ",")),
            ':' => Ok(self.make_token(TokenKind::Colon, ":")),
            '.' => Ok(self.make_token(TokenKind::Dot, ".")),
            '+' => Ok(self.make_token(TokenKind::Plus, "+")),
            '-' => Ok(self.make_token(TokenKind::Minus, "-")),
            '*' => Ok(self.make_token(TokenKind::Star, "*")),
            '/' => Ok(self.make_token(TokenKind::Slash, "/")),

            // Operators with potential compound forms (maximal munch)
            '=' => {
                if self.match_char('=') {
                    Ok(self.make_token(TokenKind::EqualEqual, "=="))
                } else {
                    Ok(self.make_token(TokenKind::Equal, "="))
                }
            }
            '!' => {
                if self.match_char('=') {
                    Ok(self.make_token(TokenKind::BangEqual, "!="))
                } else {
                    Err(self.error("NW1001", "Unexpected character '!'"))
                }
            }
            '<' => {
                if self.match_char('=') {
                    Ok(self.make_token(TokenKind::LessEqual, "<="))
                } else {
                    Ok(self.make_token(TokenKind::Less, "<"))
                }
            }
            '>' => {
                if self.match_char('=') {
                    Ok(self.make_token(TokenKind::GreaterEqual, ">="))
                } else {
                    Ok(self.make_token(TokenKind::Greater, ">"))
                }
            }

            // String literals
            '"' => self.string(),

            // Numbers
            c if c.is_ascii_digit() => self.number(),

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' => Ok(self.identifier()),

            // Unexpected character
            _ => Err(self.error("NW1001", &format!("Unexpected character '{}'", c))),
        }
    }

    /// Skip whitespace and `//` line comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            if self.is_at_end() {
                return;
            }

            match self.peek() {
                ' ' | '\r' | '\t' => {
                    self.advance();
                }
                '\n' => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                }
                '/' => {
                    if self.peek_next() == Some('/') {
                        while !self.is_at_end() && self.peek() != '\n' {
                            self.advance();
                        }
                    } else {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    // === Character navigation ===

    /// Advance to next character and return it
    pub(super) fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        self.column += 1;
        c
    }

    /// Peek at current character without advancing
    pub(super) fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.current]
        }
    }

    /// Peek at next character (current + 1)
    pub(super) fn peek_next(&self) -> Option<char> {
        if self.current + 1 >= self.chars.len() {
            None
        } else {
            Some(self.chars[self.current + 1])
        }
    }

    /// Check if current character matches expected, and advance if so
    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.current] != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    /// Check if we've reached the end of source
    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    // === Token and error creation ===

    /// Create a token with the given kind and lexeme
    pub(super) fn make_token(&self, kind: TokenKind, lexeme: &str) -> Token {
        let span = Span {
            start: self.start_pos,
            end: self.current,
        };

        Token {
            kind,
            lexeme: lexeme.to_string(),
            span,
            line: self.start_line,
            column: self.start_column,
        }
    }

    /// Build a diagnostic for the current token range
    pub(super) fn error(&self, code: &str, message: &str) -> Diagnostic {
        let span = Span {
            start: self.start_pos,
            end: self.current.max(self.start_pos + 1),
        };
        let snippet = self.line_snippet(self.start_line);

        Diagnostic::new(code, message, span)
            .with_location(self.start_line as usize, self.start_column as usize)
            .with_snippet(snippet)
            .with_label("lexical error")
    }

    /// Get the source line for a given line number
    fn line_snippet(&self, line: u32) -> String {
        self.source
            .lines()
            .nth((line - 1) as usize)
            .unwrap_or("")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        lexer
            .tokenize()
            .expect("lexing failed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let mut lexer = Lexer::new("");
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("(){}[],:."),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Comma,
                TokenKind::Colon,
                TokenKind::Dot,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("+ - * / == != < <= > >= ="),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::EqualEqual,
                TokenKind::BangEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Equal,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_maximal_munch() {
        // == must not lex as = =
        let mut lexer = Lexer::new("x==1");
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].kind, TokenKind::EqualEqual);
        assert_eq!(tokens[2].kind, TokenKind::Number);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("LET CALL IF THEN ELSE END FOR IN DO PRINT AND OR NOT NOW TRUE FALSE NULL"),
            vec![
                TokenKind::Let,
                TokenKind::Call,
                TokenKind::If,
                TokenKind::Then,
                TokenKind::Else,
                TokenKind::End,
                TokenKind::For,
                TokenKind::In,
                TokenKind::Do,
                TokenKind::Print,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Now,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Null,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lowercase_keywords_are_identifiers() {
        let mut lexer = Lexer::new("let print true");
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "let");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_identifiers() {
        let mut lexer = Lexer::new("foo bar_baz _tmp x123");
        let tokens = lexer.tokenize().unwrap();
        for (i, name) in ["foo", "bar_baz", "_tmp", "x123"].iter().enumerate() {
            assert_eq!(tokens[i].kind, TokenKind::Identifier);
            assert_eq!(tokens[i].lexeme, *name);
        }
    }

    #[test]
    fn test_numbers() {
        let mut lexer = Lexer::new("42 3.14 0 123.456");
        let tokens = lexer.tokenize().unwrap();
        for (i, text) in ["42", "3.14", "0", "123.456"].iter().enumerate() {
            assert_eq!(tokens[i].kind, TokenKind::Number);
            assert_eq!(tokens[i].lexeme, *text);
        }
    }

    #[test]
    fn test_trailing_dot_is_member_access() {
        // "1." lexes as number then dot, not a malformed float
        assert_eq!(
            kinds("item.value"),
            vec![
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_literal() {
        let mut lexer = Lexer::new(r#""hello world""#);
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, "hello world");
    }

    #[test]
    fn test_string_escapes() {
        let mut lexer = Lexer::new(r#""a\nb\tc\rd\\e\"f\'g""#);
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, "a\nb\tc\rd\\e\"f'g");
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new(r#"LET s = "oops"#);
        let err = lexer.tokenize().unwrap_err();
        assert_eq!(err.code, "NW1002");
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 9);
    }

    #[test]
    fn test_invalid_escape() {
        let mut lexer = Lexer::new(r#""bad\x""#);
        let err = lexer.tokenize().unwrap_err();
        assert_eq!(err.code, "NW1003");
        assert!(err.message.contains("\\x"));
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("LET x = @");
        let err = lexer.tokenize().unwrap_err();
        assert_eq!(err.code, "NW1001");
        assert!(err.message.contains('@'));
        assert_eq!(err.column, 9);
    }

    #[test]
    fn test_bare_bang_is_an_error() {
        // NOT is spelled out; '!' only exists as part of '!='
        let mut lexer = Lexer::new("!x");
        let err = lexer.tokenize().unwrap_err();
        assert_eq!(err.code, "NW1001");
    }

    #[test]
    fn test_line_comment_skipped() {
        assert_eq!(
            kinds("LET x = 5 // trailing note\nLET y = 6"),
            vec![
                TokenKind::Let,
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::Number,
                TokenKind::Let,
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_and_column_tracking() {
        let mut lexer = Lexer::new("LET a = 1\nLET b = 2");
        let tokens = lexer.tokenize().unwrap();
        // Second LET starts line 2, column 1
        assert_eq!(tokens[4].kind, TokenKind::Let);
        assert_eq!(tokens[4].line, 2);
        assert_eq!(tokens[4].column, 1);
        // Second number: line 2, column 9
        assert_eq!(tokens[7].line, 2);
        assert_eq!(tokens[7].column, 9);
    }
}
