//! Tool registration, schemas, and the invocation contract
//!
//! Tools are host-provided capabilities addressable by name from script
//! `CALL` syntax. Every tool declares a schema (parameter names, types,
//! required flags, return type); the interpreter validates arguments before a
//! tool runs and validates the returned value after, so a tool can neither be
//! invoked with a malformed argument map nor smuggle a value that breaks its
//! own contract back into the script.
//!
//! Registries are explicitly constructed and passed; there is no process-wide
//! registry. A registry (and the state store inside it) normally outlives many
//! script executions within one session; wrap it in `Arc<Mutex<..>>` to share
//! it between the host and an interpreter. Two scripts must not run against
//! one registry concurrently.

pub mod state;

pub use state::{StateMetadata, StateRenderer, StateStore};

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Declared type for a tool parameter or return value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    String,
    Number,
    Boolean,
    Null,
    List,
    Object,
    /// Accepts any runtime value unconditionally
    Any,
}

impl ToolType {
    /// Check whether a runtime value matches this declared type
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ToolType::Any => true,
            ToolType::String => matches!(value, Value::String(_)),
            ToolType::Number => matches!(value, Value::Number(_)),
            ToolType::Boolean => matches!(value, Value::Bool(_)),
            ToolType::Null => matches!(value, Value::Null),
            ToolType::List => matches!(value, Value::List(_)),
            ToolType::Object => matches!(value, Value::Object(_)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::String => "string",
            ToolType::Number => "number",
            ToolType::Boolean => "boolean",
            ToolType::Null => "null",
            ToolType::List => "list",
            ToolType::Object => "object",
            ToolType::Any => "any",
        }
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One declared parameter of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ToolType,
    pub required: bool,
    pub description: String,
}

/// Declared shape of a tool: the wire form consumed by the external
/// prompt-construction collaborator is exactly this struct serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    /// Ordered parameter list
    pub parameters: Vec<ToolParameter>,
    pub returns: ToolType,
}

impl ToolSchema {
    /// Create a schema with no parameters
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        returns: ToolType,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            returns,
        }
    }

    /// Append a parameter (builder style)
    pub fn param(
        mut self,
        name: impl Into<String>,
        param_type: ToolType,
        required: bool,
        description: impl Into<String>,
    ) -> Self {
        self.parameters.push(ToolParameter {
            name: name.into(),
            param_type,
            required,
            description: description.into(),
        });
        self
    }

    /// Look up a declared parameter by name
    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Validate an evaluated argument map against this schema.
    ///
    /// Runs before the implementation: every required parameter must be
    /// present, every present argument must match its declared type, and
    /// arguments not declared in the schema are rejected. A failure here
    /// guarantees the implementation never observed the call.
    pub fn check_arguments(&self, args: &ToolArguments) -> Result<(), ToolError> {
        for param in &self.parameters {
            match args.get(&param.name) {
                Some(value) => {
                    if !param.param_type.matches(value) {
                        return Err(ToolError::ArgumentType {
                            tool: self.name.clone(),
                            argument: param.name.clone(),
                            expected: param.param_type,
                            actual: value.type_name(),
                        });
                    }
                }
                None => {
                    if param.required {
                        return Err(ToolError::MissingArgument {
                            tool: self.name.clone(),
                            argument: param.name.clone(),
                        });
                    }
                }
            }
        }

        for name in args.keys() {
            if self.parameter(name).is_none() {
                return Err(ToolError::UndeclaredArgument {
                    tool: self.name.clone(),
                    argument: name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Validate a returned value against the declared return type.
    /// A mismatch means the tool broke its own contract.
    pub fn check_return(&self, value: &Value) -> Result<(), ToolError> {
        if self.returns.matches(value) {
            Ok(())
        } else {
            Err(ToolError::ReturnType {
                tool: self.name.clone(),
                expected: self.returns,
                actual: value.type_name(),
            })
        }
    }
}

/// Evaluated call-site arguments, keyed by parameter name
pub type ToolArguments = HashMap<String, Value>;

/// A tool implementation.
///
/// Synchronous from the script's point of view: the interpreter blocks inside
/// `call` until the result is available, and this is the only suspension point
/// in an execution. Hosts with asynchronous backends adapt by blocking on
/// their future at this boundary. The state store argument is the registry's
/// cross-execution side channel.
pub trait ToolHandler: Send + Sync {
    fn call(&self, args: &ToolArguments, state: &mut StateStore) -> Result<Value, ToolError>;
}

impl<F> ToolHandler for F
where
    F: Fn(&ToolArguments, &mut StateStore) -> Result<Value, ToolError> + Send + Sync,
{
    fn call(&self, args: &ToolArguments, state: &mut StateStore) -> Result<Value, ToolError> {
        self(args, state)
    }
}

/// A schema paired with its implementation
#[derive(Clone)]
pub struct RegisteredTool {
    pub schema: ToolSchema,
    pub handler: Arc<dyn ToolHandler>,
}

impl fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("schema", &self.schema)
            .field("handler", &"<dyn ToolHandler>")
            .finish()
    }
}

/// Fault in the tool-invocation protocol or registry bookkeeping
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool '{name}' not found")]
    NotFound { name: String },
    #[error("missing required argument '{argument}' for tool '{tool}'")]
    MissingArgument { tool: String, argument: String },
    #[error("argument '{argument}' of tool '{tool}' expects {expected}, got {actual}")]
    ArgumentType {
        tool: String,
        argument: String,
        expected: ToolType,
        actual: &'static str,
    },
    #[error("argument '{argument}' is not declared by tool '{tool}'")]
    UndeclaredArgument { tool: String, argument: String },
    #[error("tool '{tool}' returned {actual}, but its schema declares {expected}")]
    ReturnType {
        tool: String,
        expected: ToolType,
        actual: &'static str,
    },
    #[error("tool '{tool}' failed: {source}")]
    Execution {
        tool: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("tool '{name}' is already registered")]
    AlreadyRegistered { name: String },
    #[error("registration name '{name}' does not match schema name '{schema_name}'")]
    NameMismatch { name: String, schema_name: String },
}

impl ToolError {
    /// Wrap a host-side failure, preserving the original cause.
    ///
    /// Faults that are already part of this taxonomy propagate unchanged
    /// rather than being double-wrapped.
    pub fn execution(
        tool: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let source = source.into();
        match source.downcast::<ToolError>() {
            Ok(inner) => *inner,
            Err(source) => ToolError::Execution {
                tool: tool.into(),
                source,
            },
        }
    }
}

/// Name → (schema, implementation) table plus the session state store
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
    state: StateStore,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            state: StateStore::new(),
        }
    }

    /// Register a tool under its schema's name
    pub fn register(
        &mut self,
        schema: ToolSchema,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), ToolError> {
        if self.tools.contains_key(&schema.name) {
            return Err(ToolError::AlreadyRegistered {
                name: schema.name.clone(),
            });
        }
        tracing::debug!(tool = %schema.name, "registering tool");
        self.tools
            .insert(schema.name.clone(), RegisteredTool { schema, handler });
        Ok(())
    }

    /// Register under an explicit name, which must agree with the schema
    pub fn register_as(
        &mut self,
        name: &str,
        schema: ToolSchema,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), ToolError> {
        if name != schema.name {
            return Err(ToolError::NameMismatch {
                name: name.to_string(),
                schema_name: schema.name.clone(),
            });
        }
        self.register(schema, handler)
    }

    /// Register a plain closure as a tool implementation
    pub fn register_fn<F>(&mut self, schema: ToolSchema, handler: F) -> Result<(), ToolError>
    where
        F: Fn(&ToolArguments, &mut StateStore) -> Result<Value, ToolError>
            + Send
            + Sync
            + 'static,
    {
        self.register(schema, Arc::new(handler))
    }

    /// Look up a registered tool by name
    pub fn lookup(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// All registered schemas, sorted by tool name.
    /// Consumed by the external prompt-construction collaborator.
    pub fn schemas(&self) -> Vec<&ToolSchema> {
        let mut schemas: Vec<&ToolSchema> = self.tools.values().map(|t| &t.schema).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Schema list serialized to the JSON wire shape
    pub fn schemas_json(&self) -> serde_json::Value {
        serde_json::json!(self.schemas())
    }

    /// The session state store
    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut StateStore {
        &mut self.state
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn price_schema() -> ToolSchema {
        ToolSchema::new("get_price", "Fetch the spot price for a token", ToolType::Number)
            .param("token", ToolType::String, true, "Token symbol")
            .param("quote", ToolType::String, false, "Quote currency")
    }

    fn noop_handler() -> Arc<dyn ToolHandler> {
        Arc::new(|_: &ToolArguments, _: &mut StateStore| Ok(Value::Number(0.0)))
    }

    #[test]
    fn test_tool_type_matches() {
        assert!(ToolType::String.matches(&Value::string("x")));
        assert!(ToolType::Number.matches(&Value::Number(1.0)));
        assert!(ToolType::Boolean.matches(&Value::Bool(true)));
        assert!(ToolType::Null.matches(&Value::Null));
        assert!(ToolType::List.matches(&Value::list(vec![])));
        assert!(!ToolType::Number.matches(&Value::string("1")));
        // any accepts every variant
        for value in [
            Value::string("s"),
            Value::Number(1.0),
            Value::Bool(false),
            Value::Null,
            Value::list(vec![]),
        ] {
            assert!(ToolType::Any.matches(&value));
        }
    }

    #[test]
    fn test_schema_wire_shape() {
        let json = serde_json::to_value(price_schema()).unwrap();
        assert_eq!(json["name"], "get_price");
        assert_eq!(json["returns"], "number");
        assert_eq!(json["parameters"][0]["name"], "token");
        assert_eq!(json["parameters"][0]["type"], "string");
        assert_eq!(json["parameters"][0]["required"], true);
    }

    #[test]
    fn test_check_arguments_accepts_valid() {
        let mut args = ToolArguments::new();
        args.insert("token".to_string(), Value::string("BTC"));
        assert!(price_schema().check_arguments(&args).is_ok());

        args.insert("quote".to_string(), Value::string("USD"));
        assert!(price_schema().check_arguments(&args).is_ok());
    }

    #[test]
    fn test_check_arguments_missing_required() {
        let err = price_schema()
            .check_arguments(&ToolArguments::new())
            .unwrap_err();
        assert!(
            matches!(err, ToolError::MissingArgument { ref argument, .. } if argument == "token")
        );
    }

    #[test]
    fn test_check_arguments_type_mismatch() {
        let mut args = ToolArguments::new();
        args.insert("token".to_string(), Value::Number(42.0));
        let err = price_schema().check_arguments(&args).unwrap_err();
        assert!(matches!(
            err,
            ToolError::ArgumentType {
                expected: ToolType::String,
                actual: "number",
                ..
            }
        ));
    }

    #[test]
    fn test_check_arguments_rejects_undeclared() {
        let mut args = ToolArguments::new();
        args.insert("token".to_string(), Value::string("BTC"));
        args.insert("slippage".to_string(), Value::Number(0.01));
        let err = price_schema().check_arguments(&args).unwrap_err();
        assert!(
            matches!(err, ToolError::UndeclaredArgument { ref argument, .. } if argument == "slippage")
        );
    }

    #[test]
    fn test_check_return() {
        let schema = price_schema();
        assert!(schema.check_return(&Value::Number(65000.0)).is_ok());
        let err = schema.check_return(&Value::string("65000")).unwrap_err();
        assert!(matches!(
            err,
            ToolError::ReturnType {
                expected: ToolType::Number,
                actual: "string",
                ..
            }
        ));
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(price_schema(), noop_handler()).unwrap();
        assert!(registry.contains("get_price"));
        assert!(registry.lookup("get_price").is_some());
        assert!(registry.lookup("ghost").is_none());
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut registry = ToolRegistry::new();
        registry.register(price_schema(), noop_handler()).unwrap();
        let err = registry.register(price_schema(), noop_handler()).unwrap_err();
        assert!(matches!(err, ToolError::AlreadyRegistered { ref name } if name == "get_price"));
    }

    #[test]
    fn test_register_as_name_mismatch() {
        let mut registry = ToolRegistry::new();
        let err = registry
            .register_as("fetch_price", price_schema(), noop_handler())
            .unwrap_err();
        assert!(matches!(err, ToolError::NameMismatch { .. }));
    }

    #[test]
    fn test_schemas_sorted_by_name() {
        let mut registry = ToolRegistry::new();
        registry
            .register_fn(
                ToolSchema::new("zeta", "", ToolType::Null),
                |_, _| Ok(Value::Null),
            )
            .unwrap();
        registry
            .register_fn(
                ToolSchema::new("alpha", "", ToolType::Null),
                |_, _| Ok(Value::Null),
            )
            .unwrap();

        let names: Vec<&str> = registry.schemas().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_execution_wrap_preserves_taxonomy_faults() {
        let inner = ToolError::NotFound {
            name: "ghost".to_string(),
        };
        let wrapped = ToolError::execution("outer", inner);
        assert!(matches!(wrapped, ToolError::NotFound { ref name } if name == "ghost"));
    }

    #[test]
    fn test_execution_wrap_keeps_cause() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "feed timeout");
        let wrapped = ToolError::execution("get_price", io_err);
        match &wrapped {
            ToolError::Execution { tool, source } => {
                assert_eq!(tool, "get_price");
                assert!(source.to_string().contains("feed timeout"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
        // std::error::Error::source reaches the original fault
        assert!(std::error::Error::source(&wrapped).is_some());
    }
}
