//! NuwaScript Runtime - Core language implementation
//!
//! This library provides the complete NuwaScript runtime including:
//! - Lexical analysis and parsing
//! - Tree-walking interpretation
//! - Typed tool registration and invocation
//! - Session state shared across executions
//!
//! NuwaScript is a small, sandboxed scripting language meant to be generated
//! by an LLM and executed by a host application. Scripts can only affect the
//! world through tools the host registers; there is no file, network, or
//! process access in the language itself.

/// NuwaScript runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod ast;
pub mod diagnostic;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod span;
pub mod token;
pub mod tools;
pub mod value;

// Re-export commonly used types
pub use diagnostic::Diagnostic;
pub use interpreter::{BufferSink, Interpreter, OutputSink, Scope, StdoutSink};
pub use lexer::Lexer;
pub use parser::Parser;
pub use runtime::{ExecutionOutcome, NuwaScript, ScriptError};
pub use span::Span;
pub use token::{Token, TokenKind};
pub use tools::{
    StateMetadata, StateRenderer, StateStore, ToolArguments, ToolError, ToolHandler, ToolRegistry,
    ToolSchema, ToolType,
};
pub use value::{RuntimeError, Value, ValueList, ValueMap};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke() {
        // Smoke test to verify the crate builds and tests run
        assert_eq!(VERSION, "0.1.0");
        let outcome = NuwaScript::new().run("PRINT(\"ok\")").unwrap();
        assert_eq!(outcome.output, vec!["ok"]);
    }
}
