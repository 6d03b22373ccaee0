//! Expression evaluation

use crate::ast::{
    BinaryExpr, BinaryOp, Expr, IndexExpr, Literal, MemberExpr, ToolCallExpr, UnaryExpr, UnaryOp,
};
use crate::interpreter::{Interpreter, OutputSink, Scope};
use crate::span::Span;
use crate::tools::{RegisteredTool, ToolArguments, ToolError};
use crate::value::{RuntimeError, Value, ValueMap};

impl<S: OutputSink> Interpreter<S> {
    /// Evaluate an expression to a value
    pub(super) fn eval_expr(&mut self, expr: &Expr, scope: &mut Scope) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(literal, _) => Ok(Self::eval_literal(literal)),
            Expr::Variable(id) => match scope.lookup(&id.name) {
                Some(value) => Ok(value.clone()),
                None => Err(RuntimeError::UndefinedVariable {
                    name: id.name.clone(),
                    span: id.span,
                }),
            },
            Expr::Binary(binary) => self.eval_binary(binary, scope),
            Expr::Unary(unary) => self.eval_unary(unary, scope),
            Expr::Now(_) => Ok(Value::Number(chrono::Utc::now().timestamp() as f64)),
            Expr::ToolCall(call) => self.invoke_tool(call, scope),
            Expr::Member(member) => self.eval_member(member, scope),
            Expr::Index(index) => self.eval_index(index, scope),
            Expr::List(list) => {
                // Eager, left to right
                let mut elements = Vec::with_capacity(list.elements.len());
                for element in &list.elements {
                    elements.push(self.eval_expr(element, scope)?);
                }
                Ok(Value::list(elements))
            }
            Expr::Object(object) => {
                // Entries evaluate in declaration order; duplicate keys
                // resolve last-write-wins
                let mut map = ValueMap::new();
                for entry in &object.entries {
                    let value = self.eval_expr(&entry.value, scope)?;
                    map.insert(entry.key.clone(), value);
                }
                Ok(Value::Object(map))
            }
        }
    }

    fn eval_literal(literal: &Literal) -> Value {
        match literal {
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::string(s.clone()),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Null => Value::Null,
        }
    }

    /// Binary operators are strict. Arithmetic and relational comparison
    /// apply to numbers only, AND/OR to booleans only (both operands always
    /// evaluate, there is no short-circuit), and equality compares any pair
    /// of values structurally.
    fn eval_binary(&mut self, binary: &BinaryExpr, scope: &mut Scope) -> Result<Value, RuntimeError> {
        let left = self.eval_expr(&binary.left, scope)?;
        let right = self.eval_expr(&binary.right, scope)?;
        let span = binary.span;

        match binary.op {
            BinaryOp::Add => Self::arithmetic(binary.op, &left, &right, span, |a, b| a + b),
            BinaryOp::Sub => Self::arithmetic(binary.op, &left, &right, span, |a, b| a - b),
            BinaryOp::Mul => Self::arithmetic(binary.op, &left, &right, span, |a, b| a * b),
            BinaryOp::Div => match (&left, &right) {
                (Value::Number(_), Value::Number(d)) if *d == 0.0 => {
                    Err(RuntimeError::DivisionByZero { span })
                }
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
                _ => Err(Self::operand_type_error(binary.op, &left, &right, span)),
            },
            BinaryOp::Eq => Ok(Value::Bool(left == right)),
            BinaryOp::Ne => Ok(Value::Bool(left != right)),
            BinaryOp::Lt => Self::comparison(binary.op, &left, &right, span, |a, b| a < b),
            BinaryOp::Le => Self::comparison(binary.op, &left, &right, span, |a, b| a <= b),
            BinaryOp::Gt => Self::comparison(binary.op, &left, &right, span, |a, b| a > b),
            BinaryOp::Ge => Self::comparison(binary.op, &left, &right, span, |a, b| a >= b),
            BinaryOp::And => Self::logical(binary.op, &left, &right, span, |a, b| a && b),
            BinaryOp::Or => Self::logical(binary.op, &left, &right, span, |a, b| a || b),
        }
    }

    fn arithmetic(
        op: BinaryOp,
        left: &Value,
        right: &Value,
        span: Span,
        apply: fn(f64, f64) -> f64,
    ) -> Result<Value, RuntimeError> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(apply(*a, *b))),
            _ => Err(Self::operand_type_error(op, left, right, span)),
        }
    }

    fn comparison(
        op: BinaryOp,
        left: &Value,
        right: &Value,
        span: Span,
        apply: fn(f64, f64) -> bool,
    ) -> Result<Value, RuntimeError> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(apply(*a, *b))),
            _ => Err(Self::operand_type_error(op, left, right, span)),
        }
    }

    fn logical(
        op: BinaryOp,
        left: &Value,
        right: &Value,
        span: Span,
        apply: fn(bool, bool) -> bool,
    ) -> Result<Value, RuntimeError> {
        match (left, right) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(apply(*a, *b))),
            _ => Err(Self::operand_type_error(op, left, right, span)),
        }
    }

    fn operand_type_error(op: BinaryOp, left: &Value, right: &Value, span: Span) -> RuntimeError {
        RuntimeError::TypeError {
            msg: format!(
                "operator '{}' cannot be applied to {} and {}",
                op.as_str(),
                left.type_name(),
                right.type_name()
            ),
            span,
        }
    }

    fn eval_unary(&mut self, unary: &UnaryExpr, scope: &mut Scope) -> Result<Value, RuntimeError> {
        let operand = self.eval_expr(&unary.operand, scope)?;
        match (unary.op, operand) {
            (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
            (UnaryOp::Pos, Value::Number(n)) => Ok(Value::Number(n)),
            (op, operand) => Err(RuntimeError::TypeError {
                msg: format!(
                    "operator '{}' cannot be applied to {}",
                    op.as_str(),
                    operand.type_name()
                ),
                span: unary.span,
            }),
        }
    }

    /// Member access is strict: the base must be an object and the property
    /// must be present
    fn eval_member(&mut self, member: &MemberExpr, scope: &mut Scope) -> Result<Value, RuntimeError> {
        let base = self.eval_expr(&member.object, scope)?;
        let map = match base {
            Value::Object(map) => map,
            other => {
                return Err(RuntimeError::MemberOnNonObject {
                    property: member.property.name.clone(),
                    actual: other.type_name(),
                    span: member.span,
                })
            }
        };

        match map.get(&member.property.name) {
            Some(value) => Ok(value.clone()),
            None => Err(RuntimeError::MissingProperty {
                property: member.property.name.clone(),
                span: member.property.span,
            }),
        }
    }

    /// Index access is strict: a list base and a non-negative whole-number
    /// index within bounds
    fn eval_index(&mut self, index: &IndexExpr, scope: &mut Scope) -> Result<Value, RuntimeError> {
        let base = self.eval_expr(&index.target, scope)?;
        let list = match base {
            Value::List(list) => list,
            other => {
                return Err(RuntimeError::IndexOnNonList {
                    actual: other.type_name(),
                    span: index.span,
                })
            }
        };

        let idx_value = self.eval_expr(&index.index, scope)?;
        let idx = match idx_value {
            Value::Number(n) if n >= 0.0 && n.fract() == 0.0 => n as usize,
            Value::Number(n) => {
                return Err(RuntimeError::InvalidIndex {
                    index: n,
                    span: index.index.span(),
                })
            }
            other => {
                return Err(RuntimeError::TypeError {
                    msg: format!("list index must be a number, got {}", other.type_name()),
                    span: index.index.span(),
                })
            }
        };

        match list.get(idx) {
            Some(value) => Ok(value.clone()),
            None => Err(RuntimeError::IndexOutOfBounds {
                index: idx,
                len: list.len(),
                span: index.span,
            }),
        }
    }

    /// Run the tool-invocation protocol for one call site.
    ///
    /// The registry lock is held only for the schema lookup and for the
    /// handler invocation itself, never across argument evaluation (an
    /// argument may itself be a tool call).
    ///
    /// Order matters: arguments evaluate in source order, the argument map is
    /// validated against the schema before the implementation runs, and the
    /// returned value is validated before it reaches the script. A validation
    /// failure means the implementation never observed the call.
    pub(super) fn invoke_tool(
        &mut self,
        call: &ToolCallExpr,
        scope: &mut Scope,
    ) -> Result<Value, RuntimeError> {
        let name = &call.name.name;

        let tool: RegisteredTool = {
            let registry = self.registry.lock().expect("tool registry lock poisoned");
            registry
                .lookup(name)
                .cloned()
                .ok_or_else(|| ToolError::NotFound { name: name.clone() })?
        };

        let mut args = ToolArguments::new();
        for argument in &call.arguments {
            let value = self.eval_expr(&argument.value, scope)?;
            args.insert(argument.name.name.clone(), value);
        }

        tool.schema.check_arguments(&args)?;

        tracing::debug!(tool = %name, args = args.len(), "invoking tool");
        let result = {
            let mut registry = self.registry.lock().expect("tool registry lock poisoned");
            tool.handler.call(&args, registry.state_mut())?
        };

        tool.schema.check_return(&result)?;
        Ok(result)
    }
}
