use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nuwa_runtime::{NuwaScript, ScriptError};
use std::path::PathBuf;
use std::process::ExitCode;

mod demo;

/// NuwaScript runtime and inspection tools.
///
/// NuwaScript is a small, sandboxed scripting language for LLM-driven tool
/// invocation. This CLI runs scripts against a built-in demo tool registry
/// and exposes the lexer, parser, and schema surfaces for inspection.
///
/// EXAMPLES:
///     nuwa run plan.nuwa           Run a script
///     nuwa tokens plan.nuwa        Dump the token stream
///     nuwa ast plan.nuwa           Dump the parsed AST
///     nuwa schemas                 Print demo tool schemas as JSON
#[derive(Parser)]
#[command(name = "nuwa")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a NuwaScript file against the demo tool registry
    ///
    /// Executes the script and prints its PRINT output. Each invocation
    /// starts with a fresh demo registry and empty session state.
    #[command(visible_alias = "r")]
    Run {
        /// Path to the script file
        file: PathBuf,
        /// Print the final variable bindings after the run
        #[arg(long)]
        bindings: bool,
        /// Print the session state after the run
        #[arg(long)]
        state: bool,
    },

    /// Dump the token stream for a script file
    Tokens {
        /// Path to the script file
        file: PathBuf,
        /// Output tokens as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dump the parsed AST for a script file
    Ast {
        /// Path to the script file
        file: PathBuf,
    },

    /// Print the demo tool schemas as JSON
    ///
    /// This is the wire shape a host passes to its prompt builder so the
    /// model knows which tools exist and how to call them.
    Schemas,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Run {
            file,
            bindings,
            state,
        } => cmd_run(&file, bindings, state),
        Commands::Tokens { file, json } => cmd_tokens(&file, json),
        Commands::Ast { file } => cmd_ast(&file),
        Commands::Schemas => cmd_schemas(),
    }
}

fn read_source(file: &PathBuf) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))
}

fn cmd_run(file: &PathBuf, bindings: bool, state: bool) -> Result<ExitCode> {
    let source = read_source(file)?;
    let runtime = demo::build_runtime()?;

    match runtime.run(&source) {
        Ok(outcome) => {
            for line in &outcome.output {
                println!("{line}");
            }
            if bindings {
                let mut entries: Vec<_> = outcome.scope.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                println!("--- bindings ---");
                for (name, value) in entries {
                    println!("{name} = {value:?}");
                }
            }
            if state {
                println!("--- state ---");
                println!("{}", runtime.registry().lock().unwrap().state().render());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(ScriptError::Runtime { error, output }) => {
            for line in &output {
                println!("{line}");
            }
            eprintln!("runtime error: {error}");
            Ok(ExitCode::FAILURE)
        }
        Err(ScriptError::Lex(diag)) | Err(ScriptError::Parse(diag)) => {
            eprint!("{}", diag.to_human_string());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_tokens(file: &PathBuf, json: bool) -> Result<ExitCode> {
    let source = read_source(file)?;
    let runtime = NuwaScript::new();

    match runtime.tokenize(&source) {
        Ok(tokens) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                for token in &tokens {
                    println!(
                        "{:>3}:{:<3} {:?} {:?}",
                        token.line, token.column, token.kind, token.lexeme
                    );
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(ScriptError::Lex(diag)) => {
            eprint!("{}", diag.to_human_string());
            Ok(ExitCode::FAILURE)
        }
        Err(other) => Err(other.into()),
    }
}

fn cmd_ast(file: &PathBuf) -> Result<ExitCode> {
    let source = read_source(file)?;
    let runtime = NuwaScript::new();

    match runtime.parse(&source) {
        Ok(script) => {
            println!("{script:#?}");
            Ok(ExitCode::SUCCESS)
        }
        Err(ScriptError::Lex(diag)) | Err(ScriptError::Parse(diag)) => {
            eprint!("{}", diag.to_human_string());
            Ok(ExitCode::FAILURE)
        }
        Err(other) => Err(other.into()),
    }
}

fn cmd_schemas() -> Result<ExitCode> {
    let runtime = demo::build_runtime()?;
    let registry = runtime.registry();
    let registry = registry.lock().unwrap();
    println!("{}", serde_json::to_string_pretty(&registry.schemas_json())?);
    Ok(ExitCode::SUCCESS)
}
