//! Interactive read-eval-print loop for Solis.
//!
//! Unlike the teacher's JIT-backed REPL, this one interleaves `solis-typeck`
//! and `solis-eval` directly: each accumulated definition is re-parsed,
//! re-type-checked and re-evaluated from source, the same strategy the
//! teacher used to wrap every expression in a freshly JIT-compiled function.
//! Line editing, history, and multi-line continuation detection are grounded
//! on the original embedded-`linenoise` REPL, reimplemented with `rustyline`.

pub mod engine;
pub mod input;
pub mod session;

use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use engine::EvalOutcome;
use session::ReplSession;

/// Configuration for the REPL's prompts.
pub struct ReplConfig {
    /// The primary prompt (default: `"solis> "`).
    pub prompt: String,
    /// The continuation prompt shown while input is unbalanced.
    pub continuation: String,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig { prompt: "solis> ".to_string(), continuation: "   ... ".to_string() }
    }
}

fn history_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".solis_history"))
}

/// Runs the interactive REPL until EOF (Ctrl-D) or `:quit`.
pub fn run_repl(config: &ReplConfig) -> rustyline::Result<()> {
    let mut editor = DefaultEditor::new()?;
    let history_file = history_path();
    if let Some(path) = &history_file {
        let _ = editor.load_history(path);
    }

    println!("Solis REPL -- type :help for commands, :quit to exit.");
    let mut session = ReplSession::new();

    loop {
        let mut accumulated = String::new();
        let outcome = loop {
            let prompt = if accumulated.is_empty() { config.prompt.as_str() } else { config.continuation.as_str() };
            match editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    if !accumulated.is_empty() {
                        accumulated.push('\n');
                    }
                    accumulated.push_str(&line);
                    if input::is_balanced(&accumulated) {
                        break LineOutcome::Ready;
                    }
                }
                Err(ReadlineError::Interrupted) => break LineOutcome::Cancelled,
                Err(ReadlineError::Eof) => break LineOutcome::Eof,
                Err(err) => return Err(err),
            }
        };

        match outcome {
            LineOutcome::Cancelled => continue,
            LineOutcome::Eof => {
                if let Some(path) = &history_file {
                    let _ = editor.save_history(path);
                }
                return Ok(());
            }
            LineOutcome::Ready => {}
        }

        let trimmed = accumulated.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(command) = trimmed.strip_prefix(':') {
            if handle_command(command, &mut session) {
                if let Some(path) = &history_file {
                    let _ = editor.save_history(path);
                }
                return Ok(());
            }
            continue;
        }

        report_outcome(engine::eval_line(&mut session, trimmed));
    }
}

enum LineOutcome {
    Ready,
    Cancelled,
    Eof,
}

fn report_outcome(outcome: Result<EvalOutcome, Vec<solis_errors::SolisError>>) {
    match outcome {
        Ok(EvalOutcome::Defined(names)) => println!("defined: {}", names.join(", ")),
        Ok(EvalOutcome::Value { rendered, ty }) => println!("{rendered} : {ty}"),
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error.display());
            }
        }
    }
}

/// Dispatches a `:command`. Returns `true` if the REPL should exit.
fn handle_command(command: &str, session: &mut ReplSession) -> bool {
    let (name, args) = match command.split_once(' ') {
        Some((name, args)) => (name, args.trim()),
        None => (command, ""),
    };

    match name {
        "quit" | "q" => {
            println!("Goodbye!");
            true
        }
        "reset" => {
            session.reset();
            println!("session reset");
            false
        }
        "type" => {
            if args.is_empty() {
                eprintln!("Usage: :type EXPRESSION");
                return false;
            }
            match engine::infer_type(session, args) {
                Ok(ty) => println!("{args} : {ty}"),
                Err(errors) => {
                    for error in errors {
                        eprintln!("{}", error.display());
                    }
                }
            }
            false
        }
        "help" => {
            println!("Commands:");
            println!("  :type EXPRESSION   show the inferred type of an expression");
            println!("  :reset             drop every accumulated definition");
            println!("  :quit (:q)         exit the REPL");
            false
        }
        _ => {
            eprintln!("unknown command: :{name}  (try :help)");
            false
        }
    }
}
