//! Diagnostics for lexical and parse faults
//!
//! Lexing and parsing are fail-fast: the first fault aborts the phase and is
//! reported as a single `Diagnostic` carrying enough context (code, location,
//! source snippet) to build an actionable message.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single error diagnostic with source context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error code (e.g., "NW1001")
    pub code: String,
    /// Main diagnostic message
    pub message: String,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Offending source range
    pub span: Span,
    /// Source line text
    pub snippet: String,
    /// Short label for the caret range
    pub label: String,
    /// Suggested fix (optional)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            line: 1,
            column: span.start + 1,
            span,
            snippet: String::new(),
            label: String::new(),
            help: None,
        }
    }

    /// Set the line and column
    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// Set the snippet (source line)
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Set the label (caret description)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Add a help message
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Format as a multi-line human-readable report with a caret line
    pub fn to_human_string(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("error[{}]: {}\n", self.code, self.message));
        output.push_str(&format!("  --> {}:{}\n", self.line, self.column));

        if !self.snippet.is_empty() {
            output.push_str("   |\n");
            output.push_str(&format!("{:>2} | {}\n", self.line, self.snippet));

            let padding = " ".repeat(self.column.saturating_sub(1));
            let carets = "^".repeat(self.span.len().max(1));
            output.push_str(&format!("   | {}{}", padding, carets));
            if !self.label.is_empty() {
                output.push_str(&format!(" {}", self.label));
            }
            output.push('\n');
        }

        if let Some(help) = &self.help {
            output.push_str(&format!("   = help: {}\n", help));
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} (line {}, column {})",
            self.code, self.message, self.line, self.column
        )
    }
}

impl std::error::Error for Diagnostic {}
