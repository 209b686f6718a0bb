//! Shared primitives used throughout the Solis workspace: source spans,
//! line/column resolution, token kinds, and name-suggestion utilities.

pub mod span;
pub mod suggest;
pub mod token;

pub use span::{LineIndex, SourceLocation, Span};
pub use token::{keyword_from_str, Token, TokenKind};
