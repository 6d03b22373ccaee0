//! Statement parsing (recursive descent)

use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::parser::Parser;
use crate::token::TokenKind;

impl Parser {
    /// Parse a single statement, dispatched on its leading keyword
    pub(super) fn parse_statement(&mut self) -> Result<Stmt, Diagnostic> {
        match self.peek().kind {
            TokenKind::Let => self.parse_let(),
            TokenKind::Call => {
                let call = self.parse_tool_call()?;
                Ok(Stmt::Call(call))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::Print => self.parse_print(),
            _ => Err(self.error(
                "NW2002",
                "Expected a statement (LET, CALL, IF, FOR, or PRINT)",
            )),
        }
    }

    /// Parse statements until one of the given terminator keywords.
    /// The terminator itself is left unconsumed.
    fn parse_block(&mut self, terminators: &[TokenKind]) -> Result<Vec<Stmt>, Diagnostic> {
        let mut statements = Vec::new();
        while !self.is_at_end() && !terminators.contains(&self.peek().kind) {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    /// `LET name = expr`
    fn parse_let(&mut self) -> Result<Stmt, Diagnostic> {
        let let_span = self.consume(TokenKind::Let, "Expected 'LET'")?.span;
        let name = self.identifier("a variable name")?;
        self.consume(TokenKind::Equal, "Expected '=' after variable name")?;
        let value = self.parse_expression()?;

        let span = let_span.merge(value.span());
        Ok(Stmt::Let(LetStmt { name, value, span }))
    }

    /// `IF cond THEN block [ELSE block] END`
    fn parse_if(&mut self) -> Result<Stmt, Diagnostic> {
        let if_span = self.consume(TokenKind::If, "Expected 'IF'")?.span;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::Then, "Expected 'THEN' after IF condition")?;

        let then_branch = self.parse_block(&[TokenKind::Else, TokenKind::End])?;

        let else_branch = if self.match_token(TokenKind::Else) {
            Some(self.parse_block(&[TokenKind::End])?)
        } else {
            None
        };

        let end_span = self.consume(TokenKind::End, "Expected 'END' to close IF")?.span;
        Ok(Stmt::If(IfStmt {
            condition,
            then_branch,
            else_branch,
            span: if_span.merge(end_span),
        }))
    }

    /// `FOR name IN expr DO block END`
    fn parse_for(&mut self) -> Result<Stmt, Diagnostic> {
        let for_span = self.consume(TokenKind::For, "Expected 'FOR'")?.span;
        let binding = self.identifier("an iterator variable name")?;
        self.consume(TokenKind::In, "Expected 'IN' after iterator variable")?;
        let iterable = self.parse_expression()?;
        self.consume(TokenKind::Do, "Expected 'DO' after FOR iterable")?;

        let body = self.parse_block(&[TokenKind::End])?;

        let end_span = self.consume(TokenKind::End, "Expected 'END' to close FOR")?.span;
        Ok(Stmt::For(ForStmt {
            binding,
            iterable,
            body,
            span: for_span.merge(end_span),
        }))
    }

    /// `PRINT(expr)`
    fn parse_print(&mut self) -> Result<Stmt, Diagnostic> {
        let print_span = self.consume(TokenKind::Print, "Expected 'PRINT'")?.span;
        self.consume(TokenKind::LeftParen, "Expected '(' after PRINT")?;
        let value = self.parse_expression()?;
        let close_span = self
            .consume(TokenKind::RightParen, "Expected ')' after PRINT argument")?
            .span;

        Ok(Stmt::Print(PrintStmt {
            value,
            span: print_span.merge(close_span),
        }))
    }

    /// `CALL name { arg: expr, ... }`
    ///
    /// Shared by statement and expression position. The argument block is
    /// mandatory even when empty.
    pub(super) fn parse_tool_call(&mut self) -> Result<ToolCallExpr, Diagnostic> {
        let call_span = self.consume(TokenKind::Call, "Expected 'CALL'")?.span;
        let name = self.identifier("a tool name")?;
        self.consume(TokenKind::LeftBrace, "Expected '{' after tool name")?;

        let mut arguments = Vec::new();
        if !self.check(TokenKind::RightBrace) {
            loop {
                let arg_name = self.identifier("an argument name")?;
                self.consume(TokenKind::Colon, "Expected ':' after argument name")?;
                let value = self.parse_expression()?;
                let span = arg_name.span.merge(value.span());

                arguments.push(Argument {
                    name: arg_name,
                    value,
                    span,
                });

                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        let close_span = self
            .consume(TokenKind::RightBrace, "Expected '}' after tool arguments")?
            .span;

        Ok(ToolCallExpr {
            name,
            arguments,
            span: call_span.merge(close_span),
        })
    }
}
