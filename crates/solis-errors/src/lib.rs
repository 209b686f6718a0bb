//! The diagnostic carrier shared by every stage of the pipeline.
//!
//! Lexing, parsing, type inference, and evaluation all report problems as
//! [`SolisError`] values rather than throwing stage-specific exception types,
//! so the CLI, REPL, and LSP each only need to know how to render one shape
//! of diagnostic.

pub mod category;
pub mod chain;
pub mod collector;
pub mod error;
pub mod render;
pub mod suggestion;
pub mod taxonomy;

pub use category::ErrorCategory;
pub use chain::{InferenceChain, InferenceStep};
pub use collector::ErrorCollector;
pub use error::SolisError;
pub use suggestion::{ErrorSuggestion, TypeMismatchDetails};
