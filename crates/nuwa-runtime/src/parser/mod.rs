//! Parsing (tokens to AST)
//!
//! The parser converts a stream of tokens into an Abstract Syntax Tree (AST).
//! Uses Pratt parsing for expressions and recursive descent for statements.
//!
//! Parsing is fail-fast: the first syntax fault aborts with a `Diagnostic`
//! and no partial AST is produced.

mod expr;
mod stmt;

use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::token::{Token, TokenKind};

/// Parser state for building AST from tokens
pub struct Parser {
    pub(super) tokens: Vec<Token>,
    pub(super) current: usize,
}

/// Operator precedence levels for Pratt parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum Precedence {
    Lowest,
    Or,         // OR
    And,        // AND
    Equality,   // == !=
    Comparison, // < <= > >=
    Term,       // + -
    Factor,     // * /
    Unary,      // NOT -
    Postfix,    // .prop [index]
}

impl Parser {
    /// Create a new parser for the given tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parse tokens into an AST
    pub fn parse(&mut self) -> Result<Script, Diagnostic> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        Ok(Script { statements })
    }

    // === Token stream helpers ===

    /// Advance and return the consumed token
    pub(super) fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.tokens[self.current - 1].clone()
    }

    /// Peek at current token
    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Check if current token matches kind
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// Match and consume token if it matches
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume token of given kind or error
    pub(super) fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error("NW2001", message))
        }
    }

    /// Consume an identifier token, rejecting keywords with a pointed message
    pub(super) fn consume_identifier(&mut self, context: &str) -> Result<Token, Diagnostic> {
        let current = self.peek();

        if TokenKind::is_keyword(&current.lexeme).is_some() {
            let keyword = current.lexeme.clone();
            return Err(self.error(
                "NW2003",
                &format!("Cannot use keyword '{}' as {}", keyword, context),
            ));
        }

        if !self.check(TokenKind::Identifier) {
            return Err(self.error("NW2003", &format!("Expected {}", context)));
        }

        Ok(self.advance())
    }

    /// Consume an identifier and wrap it as an AST node
    pub(super) fn identifier(&mut self, context: &str) -> Result<Identifier, Diagnostic> {
        let token = self.consume_identifier(context)?;
        Ok(Identifier {
            name: token.lexeme,
            span: token.span,
        })
    }

    /// Check if at end of token stream
    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len() || self.tokens[self.current].kind == TokenKind::Eof
    }

    /// Build a diagnostic at the current token
    pub(super) fn error(&self, code: &str, message: &str) -> Diagnostic {
        let token = self.peek();
        let message = if token.kind == TokenKind::Eof {
            format!("{}, found {}", message, token.kind.as_str())
        } else {
            format!("{}, found '{}'", message, token.lexeme)
        };
        Diagnostic::new(code, message, token.span)
            .with_location(token.line as usize, token.column as usize)
            .with_label("syntax error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Result<Script, Diagnostic> {
        let tokens = Lexer::new(source).tokenize()?;
        Parser::new(tokens).parse()
    }

    fn parse_ok(source: &str) -> Script {
        parse(source).unwrap_or_else(|d| panic!("parse failed: {}", d))
    }

    fn parse_err(source: &str) -> Diagnostic {
        parse(source).expect_err("expected a parse fault")
    }

    #[test]
    fn test_empty_script() {
        assert_eq!(parse_ok("").statements.len(), 0);
        assert_eq!(parse_ok("  // just a comment\n").statements.len(), 0);
    }

    #[test]
    fn test_let_statement() {
        let script = parse_ok("LET price = 42.5");
        assert_eq!(script.statements.len(), 1);
        match &script.statements[0] {
            Stmt::Let(stmt) => {
                assert_eq!(stmt.name.name, "price");
                assert_eq!(
                    stmt.value,
                    Expr::Literal(Literal::Number(42.5), stmt.value.span())
                );
            }
            other => panic!("expected LET, got {other:?}"),
        }
    }

    #[test]
    fn test_let_requires_equals() {
        let diag = parse_err("LET x 10");
        assert_eq!(diag.code, "NW2001");
        assert!(diag.message.contains("'='"));
    }

    #[test]
    fn test_let_rejects_keyword_name() {
        let diag = parse_err("LET FOR = 1");
        assert_eq!(diag.code, "NW2003");
        assert!(diag.message.contains("keyword 'FOR'"));
    }

    #[test]
    fn test_if_then_else_end() {
        let script = parse_ok("IF x > 1 THEN PRINT(1) ELSE PRINT(2) END");
        match &script.statements[0] {
            Stmt::If(stmt) => {
                assert_eq!(stmt.then_branch.len(), 1);
                assert_eq!(stmt.else_branch.as_ref().map(Vec::len), Some(1));
            }
            other => panic!("expected IF, got {other:?}"),
        }
    }

    #[test]
    fn test_if_without_else() {
        let script = parse_ok("IF ok THEN PRINT(\"yes\") END");
        match &script.statements[0] {
            Stmt::If(stmt) => assert!(stmt.else_branch.is_none()),
            other => panic!("expected IF, got {other:?}"),
        }
    }

    #[test]
    fn test_if_missing_end() {
        let diag = parse_err("IF ok THEN PRINT(1)");
        assert!(diag.message.contains("'END'"));
        assert!(diag.message.contains("end of input"));
    }

    #[test]
    fn test_for_statement() {
        let script = parse_ok("FOR item IN orders DO PRINT(item) END");
        match &script.statements[0] {
            Stmt::For(stmt) => {
                assert_eq!(stmt.binding.name, "item");
                assert_eq!(stmt.body.len(), 1);
            }
            other => panic!("expected FOR, got {other:?}"),
        }
    }

    #[test]
    fn test_print_requires_parens() {
        let diag = parse_err("PRINT 1");
        assert!(diag.message.contains("'('"));
    }

    #[test]
    fn test_call_statement_with_arguments() {
        let script = parse_ok("CALL swap { from: \"ETH\", to: \"USDC\", amount: 1.5 }");
        match &script.statements[0] {
            Stmt::Call(call) => {
                assert_eq!(call.name.name, "swap");
                let names: Vec<&str> =
                    call.arguments.iter().map(|a| a.name.name.as_str()).collect();
                assert_eq!(names, vec!["from", "to", "amount"]);
            }
            other => panic!("expected CALL, got {other:?}"),
        }
    }

    #[test]
    fn test_call_requires_braces() {
        let diag = parse_err("CALL ping");
        assert!(diag.message.contains("'{'"));
    }

    #[test]
    fn test_call_empty_argument_block() {
        let script = parse_ok("CALL ping {}");
        match &script.statements[0] {
            Stmt::Call(call) => assert!(call.arguments.is_empty()),
            other => panic!("expected CALL, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_blocks() {
        let script = parse_ok(
            "FOR i IN items DO\n  IF i > 0 THEN\n    PRINT(i)\n  END\nEND",
        );
        match &script.statements[0] {
            Stmt::For(stmt) => {
                assert!(matches!(stmt.body[0], Stmt::If(_)));
            }
            other => panic!("expected FOR, got {other:?}"),
        }
    }

    #[test]
    fn test_expression_is_not_a_statement() {
        let diag = parse_err("1 + 2");
        assert_eq!(diag.code, "NW2002");
    }

    #[test]
    fn test_trailing_garbage_after_statement() {
        let diag = parse_err("LET x = 1 )");
        assert_eq!(diag.code, "NW2002");
    }
}
