//! Demo tool registry backing the CLI
//!
//! A small mock trading desk: price lookup, swaps, and a memory pair built
//! on the session state store. Real hosts register their own tools through
//! the same API.

use anyhow::Result;
use nuwa_runtime::{
    NuwaScript, StateMetadata, ToolError, ToolSchema, ToolType, Value,
};

/// Build a runtime with the demo tools registered
pub fn build_runtime() -> Result<NuwaScript> {
    let runtime = NuwaScript::new();
    {
        let mut registry = runtime.registry().lock().expect("registry lock poisoned");

        registry.register_fn(
            ToolSchema::new("get_price", "Get the mock spot price for a token", ToolType::Number)
                .param("token", ToolType::String, true, "Token symbol, e.g. BTC"),
            |args, _| {
                let token = string_arg(args, "token", "get_price")?;
                let price = match token.as_str() {
                    "BTC" => 65000.0,
                    "ETH" => 3200.0,
                    "SOL" => 150.0,
                    _ => 1.0,
                };
                Ok(Value::Number(price))
            },
        )?;

        registry.register_fn(
            ToolSchema::new("swap", "Record a mock token swap in session state", ToolType::Object)
                .param("from", ToolType::String, true, "Token to sell")
                .param("to", ToolType::String, true, "Token to buy")
                .param("amount", ToolType::Number, true, "Amount of 'from' to sell"),
            |args, state| {
                let from = string_arg(args, "from", "swap")?;
                let to = string_arg(args, "to", "swap")?;
                let amount = match args.get("amount") {
                    Some(Value::Number(n)) => *n,
                    _ => 0.0,
                };

                let summary = format!("{amount} {from} -> {to}");
                state.set_with_metadata(
                    "last_swap",
                    Value::string(summary),
                    StateMetadata {
                        description: Some("Last swap".to_string()),
                        renderer: None,
                    },
                );

                let mut receipt = std::collections::HashMap::new();
                receipt.insert("from".to_string(), Value::string(from));
                receipt.insert("to".to_string(), Value::string(to));
                receipt.insert("amount".to_string(), Value::Number(amount));
                receipt.insert("status".to_string(), Value::string("filled"));
                Ok(Value::object(receipt))
            },
        )?;

        registry.register_fn(
            ToolSchema::new("remember", "Store a value in session state", ToolType::Null)
                .param("key", ToolType::String, true, "State key")
                .param("value", ToolType::Any, true, "Value to store"),
            |args, state| {
                let key = string_arg(args, "key", "remember")?;
                let value = args.get("value").cloned().unwrap_or(Value::Null);
                state.set(key, value);
                Ok(Value::Null)
            },
        )?;

        registry.register_fn(
            ToolSchema::new("recall", "Read a value from session state", ToolType::Any)
                .param("key", ToolType::String, true, "State key"),
            |args, state| {
                let key = string_arg(args, "key", "recall")?;
                Ok(state.get(&key).cloned().unwrap_or(Value::Null))
            },
        )?;
    }
    Ok(runtime)
}

/// Extract a string argument the schema already validated
fn string_arg(
    args: &nuwa_runtime::ToolArguments,
    name: &str,
    tool: &str,
) -> Result<String, ToolError> {
    match args.get(name) {
        Some(Value::String(s)) => Ok(s.as_ref().clone()),
        _ => Err(ToolError::MissingArgument {
            tool: tool.to_string(),
            argument: name.to_string(),
        }),
    }
}
