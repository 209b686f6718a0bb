//! The Solis compiler and tooling CLI.
//!
//! Provides the `solisc` command with subcommands:
//!
//! - `solisc repl` -- interactive read-eval-print loop
//! - `solisc run FILE` -- parse, type-check and evaluate a program
//! - `solisc compile FILE` -- parse and type-check, then hand off to the
//!   native codegen stub (which reports that it isn't implemented)
//! - `solisc lsp` -- run the language server on stdin/stdout

mod loader;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use solis_errors::{render, SolisError};
use solis_module::ResolverConfig;

#[derive(Parser)]
#[command(name = "solisc", version, about = "The Solis compiler and tooling CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive REPL.
    Repl,

    /// Parse, type-check and evaluate a Solis program.
    Run {
        file: PathBuf,
        #[command(flatten)]
        search: SearchPaths,
        /// Emit diagnostics as JSON instead of a rendered report.
        #[arg(long)]
        json: bool,
    },

    /// Parse and type-check a Solis program, then attempt native codegen.
    Compile {
        file: PathBuf,
        #[command(flatten)]
        search: SearchPaths,
        #[arg(long)]
        json: bool,
    },

    /// Run the Solis language server on stdin/stdout.
    Lsp,
}

#[derive(clap::Args)]
struct SearchPaths {
    /// Path to the standard library, searched before the current directory.
    #[arg(long = "stdlib-path")]
    stdlib_path: Option<PathBuf>,
    /// Additional module search paths, lowest priority after the prelude.
    #[arg(long = "search-path")]
    search_path: Vec<PathBuf>,
}

impl SearchPaths {
    fn into_resolver_config(self) -> ResolverConfig {
        let defaults = ResolverConfig::default();
        ResolverConfig {
            stdlib_path: self.stdlib_path.or(defaults.stdlib_path),
            prelude_path: defaults.prelude_path,
            additional_paths: self.search_path,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!(command = ?std::env::args().nth(1), "solisc session start");

    let result = match cli.command {
        Commands::Repl => run_repl(),
        Commands::Run { file, search, json } => run_file(&file, search.into_resolver_config(), json),
        Commands::Compile { file, search, json } => compile_file(&file, search.into_resolver_config(), json),
        Commands::Lsp => run_lsp(),
    };

    if let Err(message) = result {
        eprintln!("error: {message}");
        process::exit(1);
    }
}

fn run_repl() -> Result<(), String> {
    solis_repl::run_repl(&solis_repl::ReplConfig::default()).map_err(|e| e.to_string())
}

fn run_lsp() -> Result<(), String> {
    let runtime = tokio::runtime::Runtime::new().map_err(|e| e.to_string())?;
    runtime.block_on(solis_lsp::run_server());
    Ok(())
}

fn run_file(file: &Path, resolver_config: ResolverConfig, json: bool) -> Result<(), String> {
    tracing::info!(file = %file.display(), "loading program");
    let source = loader::load_with_imports(file, resolver_config)?;
    let (module, parse_errors) = solis_parser::parse(&source);
    if report_errors(&source, file, &parse_errors, json) {
        return Err("parsing failed".to_string());
    }

    let (_env, type_errors) = solis_typeck::check_module(&source, &module);
    if report_errors(&source, file, &type_errors, json) {
        return Err("type checking failed".to_string());
    }

    let run = || -> Result<(), SolisError> {
        let runtime_env = solis_eval::eval_module(&source, &module)?;
        let entry_location = solis_common::SourceLocation::single(1, 1);
        let main = runtime_env
            .lookup("main")
            .ok_or_else(|| solis_errors::taxonomy::undefined_name("main", &[], entry_location))?;
        solis_eval::force(main, entry_location)?;
        Ok(())
    };

    match run() {
        Ok(()) => Ok(()),
        Err(error) => {
            report_errors(&source, file, std::slice::from_ref(&error), json);
            Err("evaluation failed".to_string())
        }
    }
}

fn compile_file(file: &Path, resolver_config: ResolverConfig, json: bool) -> Result<(), String> {
    tracing::info!(file = %file.display(), "loading program for compilation");
    let source = loader::load_with_imports(file, resolver_config)?;
    let (module, parse_errors) = solis_parser::parse(&source);
    if report_errors(&source, file, &parse_errors, json) {
        return Err("parsing failed".to_string());
    }

    let (env, type_errors) = solis_typeck::check_module(&source, &module);
    if report_errors(&source, file, &type_errors, json) {
        return Err("type checking failed".to_string());
    }

    match solis_codegen::compile(&module, &env, &file.display().to_string()) {
        Ok(()) => Ok(()),
        Err(error) => {
            report_errors(&source, file, std::slice::from_ref(&error), json);
            Err("compilation failed".to_string())
        }
    }
}

/// Prints every error in `errors`, either as ariadne reports or as a JSON
/// array. Returns `true` if there was anything to report.
fn report_errors(source: &str, file: &Path, errors: &[SolisError], json: bool) -> bool {
    if errors.is_empty() {
        return false;
    }

    if json {
        let values: Vec<_> = errors.iter().map(SolisError::to_json).collect();
        eprintln!("{}", serde_json::to_string_pretty(&values).unwrap_or_default());
    } else {
        let filename = file.display().to_string();
        for error in errors {
            eprint!("{}", render::render(error, source, &filename));
        }
    }
    true
}
