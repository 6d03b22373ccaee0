//! High-level embedding API
//!
//! `NuwaScript` ties the pipeline together for hosts: source in, lex, parse,
//! execute against a shared tool registry, bindings and captured output out.

use crate::ast::Script;
use crate::diagnostic::Diagnostic;
use crate::interpreter::{BufferSink, Interpreter, Scope};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::token::Token;
use crate::tools::ToolRegistry;
use crate::value::RuntimeError;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Failure from any phase of `run`
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("lex error: {0}")]
    Lex(Diagnostic),
    #[error("parse error: {0}")]
    Parse(Diagnostic),
    /// Execution fault, with the output emitted before the fault
    #[error("runtime error: {error}")]
    Runtime {
        error: RuntimeError,
        output: Vec<String>,
    },
}

/// Result of a completed execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    /// Final variable bindings
    pub scope: Scope,
    /// Lines emitted by `PRINT`, in order
    pub output: Vec<String>,
}

/// The embedding entry point: a tool registry plus the run pipeline
#[derive(Clone)]
pub struct NuwaScript {
    registry: Arc<Mutex<ToolRegistry>>,
}

impl NuwaScript {
    /// Create a runtime with an empty tool registry
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(ToolRegistry::new())),
        }
    }

    /// Create a runtime around an existing shared registry
    pub fn with_registry(registry: Arc<Mutex<ToolRegistry>>) -> Self {
        Self { registry }
    }

    /// The shared registry, for tool registration and state access.
    ///
    /// Returned by reference so a lock guard taken from it can outlive the
    /// call (`let reg = rt.registry().lock()...`); clone the `Arc` to share
    /// the registry beyond the runtime's lifetime.
    pub fn registry(&self) -> &Arc<Mutex<ToolRegistry>> {
        &self.registry
    }

    /// Lex source into tokens
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, ScriptError> {
        Lexer::new(source).tokenize().map_err(ScriptError::Lex)
    }

    /// Lex and parse source into an AST
    pub fn parse(&self, source: &str) -> Result<Script, ScriptError> {
        let tokens = self.tokenize(source)?;
        Parser::new(tokens).parse().map_err(ScriptError::Parse)
    }

    /// Run a script in a fresh scope
    pub fn run(&self, source: &str) -> Result<ExecutionOutcome, ScriptError> {
        self.run_with_scope(source, Scope::new())
    }

    /// Run a script against pre-seeded bindings.
    ///
    /// On a runtime fault the fault carries whatever output the script
    /// emitted before aborting.
    pub fn run_with_scope(
        &self,
        source: &str,
        mut scope: Scope,
    ) -> Result<ExecutionOutcome, ScriptError> {
        let script = self.parse(source)?;

        let mut interpreter =
            Interpreter::with_sink(Arc::clone(&self.registry), BufferSink::new());
        let result = interpreter.execute_with_scope(&script, &mut scope);
        let output = interpreter.into_sink().into_lines();

        match result {
            Ok(()) => Ok(ExecutionOutcome { scope, output }),
            Err(error) => Err(ScriptError::Runtime { error, output }),
        }
    }
}

impl Default for NuwaScript {
    fn default() -> Self {
        Self::new()
    }
}
