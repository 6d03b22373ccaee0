//! Statement execution

use crate::ast::{ForStmt, IfStmt, Stmt};
use crate::interpreter::{Interpreter, OutputSink, Scope};
use crate::value::{RuntimeError, Value};

impl<S: OutputSink> Interpreter<S> {
    /// Execute a single statement
    pub(super) fn execute_statement(
        &mut self,
        stmt: &Stmt,
        scope: &mut Scope,
    ) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Let(stmt) => {
                let value = self.eval_expr(&stmt.value, scope)?;
                scope.bind(stmt.name.name.clone(), value);
                Ok(())
            }
            Stmt::Call(call) => {
                // Statement position discards the result
                self.invoke_tool(call, scope)?;
                Ok(())
            }
            Stmt::If(stmt) => self.execute_if(stmt, scope),
            Stmt::For(stmt) => self.execute_for(stmt, scope),
            Stmt::Print(stmt) => {
                let value = self.eval_expr(&stmt.value, scope)?;
                self.sink.write_line(&value.to_string());
                Ok(())
            }
        }
    }

    fn execute_block(&mut self, block: &[Stmt], scope: &mut Scope) -> Result<(), RuntimeError> {
        for stmt in block {
            self.execute_statement(stmt, scope)?;
        }
        Ok(())
    }

    /// Conditions are strict: only a boolean selects a branch
    fn execute_if(&mut self, stmt: &IfStmt, scope: &mut Scope) -> Result<(), RuntimeError> {
        let condition = self.eval_expr(&stmt.condition, scope)?;
        match condition {
            Value::Bool(true) => self.execute_block(&stmt.then_branch, scope),
            Value::Bool(false) => match &stmt.else_branch {
                Some(block) => self.execute_block(block, scope),
                None => Ok(()),
            },
            other => Err(RuntimeError::InvalidCondition {
                actual: other.type_name(),
                span: stmt.condition.span(),
            }),
        }
    }

    /// Iterate a list, binding the iterator variable per element.
    ///
    /// The iterator variable shares the flat scope, so any previous binding
    /// under the same name is saved on entry and restored on exit. Restore
    /// happens even when the body faults, and a saved null is a real binding
    /// that comes back, not an absent one.
    fn execute_for(&mut self, stmt: &ForStmt, scope: &mut Scope) -> Result<(), RuntimeError> {
        let iterable = self.eval_expr(&stmt.iterable, scope)?;
        let list = match iterable {
            Value::List(list) => list,
            other => {
                return Err(RuntimeError::InvalidIterable {
                    actual: other.type_name(),
                    span: stmt.iterable.span(),
                })
            }
        };

        let name = &stmt.binding.name;
        let saved = scope.remove(name);

        let mut run = || -> Result<(), RuntimeError> {
            for element in list.iter() {
                scope.bind(name.clone(), element.clone());
                self.execute_block(&stmt.body, scope)?;
            }
            Ok(())
        };
        let result = run();

        match saved {
            Some(value) => scope.bind(name.clone(), value),
            None => {
                scope.remove(name);
            }
        }

        result
    }
}
