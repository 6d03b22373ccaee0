//! Tree-walking interpreter
//!
//! Executes a parsed script against a tool registry. Execution is
//! synchronous and fail-fast: the first runtime fault aborts the script,
//! leaving already-applied bindings, emitted output, and tool side effects
//! in place.

mod expr;
mod stmt;

use crate::ast::Script;
use crate::tools::ToolRegistry;
use crate::value::{RuntimeError, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Destination for `PRINT` output
pub trait OutputSink {
    /// Receive one rendered line (without trailing newline)
    fn write_line(&mut self, line: &str);
}

/// Writes each line to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Collects lines in memory, for hosts that relay output elsewhere
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    lines: Vec<String>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl OutputSink for BufferSink {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

impl<F: FnMut(&str)> OutputSink for F {
    fn write_line(&mut self, line: &str) {
        self(line)
    }
}

/// Variable bindings for one execution.
///
/// Scoping is flat: blocks do not open nested scopes, and a `FOR` iterator
/// variable is saved on entry and restored on exit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    bindings: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable, replacing any previous value
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Look up a variable
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Remove a binding, returning its value if present
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.bindings.iter()
    }

    pub fn into_bindings(self) -> HashMap<String, Value> {
        self.bindings
    }
}

impl From<HashMap<String, Value>> for Scope {
    fn from(bindings: HashMap<String, Value>) -> Self {
        Self { bindings }
    }
}

/// Script executor, generic over the `PRINT` destination
pub struct Interpreter<S: OutputSink = StdoutSink> {
    registry: Arc<Mutex<ToolRegistry>>,
    sink: S,
}

impl Interpreter<StdoutSink> {
    /// Create an interpreter that prints to stdout
    pub fn new(registry: Arc<Mutex<ToolRegistry>>) -> Self {
        Self {
            registry,
            sink: StdoutSink,
        }
    }
}

impl<S: OutputSink> Interpreter<S> {
    /// Create an interpreter with a custom output sink
    pub fn with_sink(registry: Arc<Mutex<ToolRegistry>>, sink: S) -> Self {
        Self { registry, sink }
    }

    /// Execute a script in a fresh scope, returning the final bindings
    pub fn execute(&mut self, script: &Script) -> Result<Scope, RuntimeError> {
        let mut scope = Scope::new();
        self.execute_with_scope(script, &mut scope)?;
        Ok(scope)
    }

    /// Execute a script against an existing scope
    pub fn execute_with_scope(
        &mut self,
        script: &Script,
        scope: &mut Scope,
    ) -> Result<(), RuntimeError> {
        tracing::debug!(statements = script.statements.len(), "executing script");
        for stmt in &script.statements {
            self.execute_statement(stmt, scope)?;
        }
        Ok(())
    }

    /// Recover the sink (e.g., to read buffered output)
    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scope_bind_and_shadow() {
        let mut scope = Scope::new();
        scope.bind("x", Value::Number(1.0));
        scope.bind("x", Value::Number(2.0));
        assert_eq!(scope.lookup("x"), Some(&Value::Number(2.0)));
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn test_scope_remove() {
        let mut scope = Scope::new();
        scope.bind("x", Value::Null);
        assert_eq!(scope.remove("x"), Some(Value::Null));
        assert_eq!(scope.remove("x"), None);
        assert!(scope.is_empty());
    }

    #[test]
    fn test_buffer_sink_collects_lines() {
        let mut sink = BufferSink::new();
        sink.write_line("first");
        sink.write_line("second");
        assert_eq!(sink.into_lines(), vec!["first", "second"]);
    }

    #[test]
    fn test_closure_sink() {
        let mut captured = Vec::new();
        {
            let mut sink = |line: &str| captured.push(line.to_string());
            sink.write_line("hello");
        }
        assert_eq!(captured, vec!["hello"]);
    }
}
