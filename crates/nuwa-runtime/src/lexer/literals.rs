//! Literal scanning: strings, numbers, identifiers/keywords

use crate::diagnostic::Diagnostic;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl Lexer {
    /// Scan a string literal. The opening quote has been consumed.
    ///
    /// The token's lexeme is the decoded payload, quotes stripped and escape
    /// sequences resolved. Unterminated strings and unknown escapes fail.
    pub(super) fn string(&mut self) -> Result<Token, Diagnostic> {
        let mut value = String::new();

        while !self.is_at_end() && self.peek() != '"' {
            let c = self.advance();
            if c == '\n' {
                // Strings do not span lines; report as unterminated
                self.line += 1;
                self.column = 1;
                return Err(self.error("NW1002", "Unterminated string literal"));
            }
            if c == '\\' {
                if self.is_at_end() {
                    break;
                }
                let escape = self.advance();
                match escape {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    '\\' => value.push('\\'),
                    '"' => value.push('"'),
                    '\'' => value.push('\''),
                    _ => {
                        return Err(self.error(
                            "NW1003",
                            &format!("Invalid escape sequence '\\{}'", escape),
                        ));
                    }
                }
            } else {
                value.push(c);
            }
        }

        if self.is_at_end() {
            return Err(self.error("NW1002", "Unterminated string literal"));
        }

        self.advance(); // closing quote
        Ok(self.make_token(TokenKind::String, &value))
    }

    /// Scan a numeric literal: decimal digits with optional fractional part.
    /// The first digit has been consumed.
    pub(super) fn number(&mut self) -> Result<Token, Diagnostic> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // Fractional part only when a digit follows the dot, so `list[1].x`
        // style chains still lex the dot as member access
        if self.peek() == '.' && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(); // .
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text: String = self.chars[self.start_pos..self.current].iter().collect();
        Ok(self.make_token(TokenKind::Number, &text))
    }

    /// Scan an identifier or keyword. The first character has been consumed.
    pub(super) fn identifier(&mut self) -> Token {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text: String = self.chars[self.start_pos..self.current].iter().collect();
        let kind = TokenKind::is_keyword(&text).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, &text)
    }
}
