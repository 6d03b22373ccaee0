//! Expression parsing (Pratt parsing)

use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::parser::{Parser, Precedence};
use crate::token::{Token, TokenKind};

impl Parser {
    /// Parse an expression
    pub(super) fn parse_expression(&mut self) -> Result<Expr, Diagnostic> {
        self.parse_precedence(Precedence::Lowest)
    }

    /// Parse expression with given precedence
    pub(super) fn parse_precedence(&mut self, precedence: Precedence) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_prefix()?;

        while precedence < self.current_precedence() {
            left = self.parse_infix(left)?;
        }

        Ok(left)
    }

    /// Parse prefix expression
    fn parse_prefix(&mut self) -> Result<Expr, Diagnostic> {
        match self.peek().kind {
            TokenKind::Number => self.parse_number(),
            TokenKind::String => self.parse_string(),
            TokenKind::True | TokenKind::False => self.parse_bool(),
            TokenKind::Null => self.parse_null(),
            TokenKind::Identifier => self.parse_variable(),
            TokenKind::Now => self.parse_now(),
            TokenKind::Call => Ok(Expr::ToolCall(self.parse_tool_call()?)),
            TokenKind::LeftParen => self.parse_group(),
            TokenKind::LeftBracket => self.parse_list_literal(),
            TokenKind::LeftBrace => self.parse_object_literal(),
            TokenKind::Not | TokenKind::Minus | TokenKind::Plus => self.parse_unary(),
            _ => Err(self.error("NW2004", "Expected an expression")),
        }
    }

    /// Parse infix expression
    fn parse_infix(&mut self, left: Expr) -> Result<Expr, Diagnostic> {
        match self.peek().kind {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::EqualEqual
            | TokenKind::BangEqual
            | TokenKind::Less
            | TokenKind::LessEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual
            | TokenKind::And
            | TokenKind::Or => self.parse_binary(left),
            TokenKind::Dot => self.parse_member(left),
            TokenKind::LeftBracket => self.parse_index(left),
            _ => Ok(left),
        }
    }

    /// Get current token precedence
    pub(super) fn current_precedence(&self) -> Precedence {
        Self::token_precedence(self.peek())
    }

    /// Get precedence for a token
    pub(super) fn token_precedence(token: &Token) -> Precedence {
        match token.kind {
            TokenKind::Or => Precedence::Or,
            TokenKind::And => Precedence::And,
            TokenKind::EqualEqual | TokenKind::BangEqual => Precedence::Equality,
            TokenKind::Less
            | TokenKind::LessEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual => Precedence::Comparison,
            TokenKind::Plus | TokenKind::Minus => Precedence::Term,
            TokenKind::Star | TokenKind::Slash => Precedence::Factor,
            TokenKind::Dot | TokenKind::LeftBracket => Precedence::Postfix,
            _ => Precedence::Lowest,
        }
    }

    /// Parse number literal
    fn parse_number(&mut self) -> Result<Expr, Diagnostic> {
        let token = self.advance();
        let value: f64 = token.lexeme.parse().unwrap_or(0.0);
        Ok(Expr::Literal(Literal::Number(value), token.span))
    }

    /// Parse string literal
    fn parse_string(&mut self) -> Result<Expr, Diagnostic> {
        let token = self.advance();
        Ok(Expr::Literal(Literal::String(token.lexeme), token.span))
    }

    /// Parse TRUE/FALSE literal
    fn parse_bool(&mut self) -> Result<Expr, Diagnostic> {
        let token = self.advance();
        let value = token.kind == TokenKind::True;
        Ok(Expr::Literal(Literal::Bool(value), token.span))
    }

    /// Parse NULL literal
    fn parse_null(&mut self) -> Result<Expr, Diagnostic> {
        let token = self.advance();
        Ok(Expr::Literal(Literal::Null, token.span))
    }

    /// Parse variable reference
    fn parse_variable(&mut self) -> Result<Expr, Diagnostic> {
        let token = self.advance();
        Ok(Expr::Variable(Identifier {
            name: token.lexeme,
            span: token.span,
        }))
    }

    /// Parse the `NOW()` built-in
    fn parse_now(&mut self) -> Result<Expr, Diagnostic> {
        let now_span = self.advance().span;
        self.consume(TokenKind::LeftParen, "Expected '(' after NOW")?;
        let close_span = self
            .consume(TokenKind::RightParen, "Expected ')' after NOW(")?
            .span;
        Ok(Expr::Now(now_span.merge(close_span)))
    }

    /// Parse parenthesized group
    fn parse_group(&mut self) -> Result<Expr, Diagnostic> {
        self.advance(); // (
        let expr = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after expression")?;
        Ok(expr)
    }

    /// Parse binary operation
    fn parse_binary(&mut self, left: Expr) -> Result<Expr, Diagnostic> {
        let op_token = self.advance();
        let op = match op_token.kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::EqualEqual => BinaryOp::Eq,
            TokenKind::BangEqual => BinaryOp::Ne,
            TokenKind::Less => BinaryOp::Lt,
            TokenKind::LessEqual => BinaryOp::Le,
            TokenKind::Greater => BinaryOp::Gt,
            TokenKind::GreaterEqual => BinaryOp::Ge,
            TokenKind::And => BinaryOp::And,
            TokenKind::Or => BinaryOp::Or,
            _ => unreachable!("parse_binary called on non-operator token"),
        };

        let right = self.parse_precedence(Self::token_precedence(&op_token))?;
        let span = left.span().merge(right.span());

        Ok(Expr::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }))
    }

    /// Parse unary operation (NOT, -, +)
    fn parse_unary(&mut self) -> Result<Expr, Diagnostic> {
        let op_token = self.advance();
        let op = match op_token.kind {
            TokenKind::Not => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Pos,
            _ => unreachable!("parse_unary called on non-operator token"),
        };

        let operand = self.parse_precedence(Precedence::Unary)?;
        let span = op_token.span.merge(operand.span());

        Ok(Expr::Unary(UnaryExpr {
            op,
            operand: Box::new(operand),
            span,
        }))
    }

    /// Parse member access: `base.property`
    fn parse_member(&mut self, left: Expr) -> Result<Expr, Diagnostic> {
        self.advance(); // .
        let property = self.identifier("a property name")?;
        let span = left.span().merge(property.span);

        Ok(Expr::Member(MemberExpr {
            object: Box::new(left),
            property,
            span,
        }))
    }

    /// Parse index access: `base[index]`
    fn parse_index(&mut self, left: Expr) -> Result<Expr, Diagnostic> {
        self.advance(); // [
        let index = self.parse_expression()?;
        let close_span = self
            .consume(TokenKind::RightBracket, "Expected ']' after index")?
            .span;
        let span = left.span().merge(close_span);

        Ok(Expr::Index(IndexExpr {
            target: Box::new(left),
            index: Box::new(index),
            span,
        }))
    }

    /// Parse list literal: `[a, b, c]`
    fn parse_list_literal(&mut self) -> Result<Expr, Diagnostic> {
        let open_span = self.advance().span; // [

        let mut elements = Vec::new();
        if !self.check(TokenKind::RightBracket) {
            loop {
                elements.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        let close_span = self
            .consume(TokenKind::RightBracket, "Expected ']' after list elements")?
            .span;

        Ok(Expr::List(ListExpr {
            elements,
            span: open_span.merge(close_span),
        }))
    }

    /// Parse object literal: `{ key: expr, ... }` with identifier or string keys
    fn parse_object_literal(&mut self) -> Result<Expr, Diagnostic> {
        let open_span = self.advance().span; // {

        let mut entries = Vec::new();
        if !self.check(TokenKind::RightBrace) {
            loop {
                let (key, key_span) = if self.check(TokenKind::String) {
                    let token = self.advance();
                    (token.lexeme, token.span)
                } else {
                    let id = self.identifier("an object key")?;
                    (id.name, id.span)
                };

                self.consume(TokenKind::Colon, "Expected ':' after object key")?;
                let value = self.parse_expression()?;

                entries.push(ObjectEntry {
                    key,
                    key_span,
                    value,
                });

                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        let close_span = self
            .consume(TokenKind::RightBrace, "Expected '}' after object entries")?
            .span;

        Ok(Expr::Object(ObjectExpr {
            entries,
            span: open_span.merge(close_span),
        }))
    }
}
