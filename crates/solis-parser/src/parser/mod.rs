//! Recursive-descent parser for Solis source text.
//!
//! Unlike the lossless, rowan-backed parser this workspace also contains
//! elsewhere, this one builds the plain closed-variant AST in `crate::ast`
//! directly -- there is no concrete syntax tree, so there is no tree-building
//! pass: each `parse_*` function returns an owned AST node.

pub(crate) mod expressions;
pub(crate) mod items;
pub(crate) mod patterns;
pub(crate) mod types;

use solis_common::{LineIndex, Span, Token, TokenKind};
use solis_errors::{taxonomy, SolisError};

pub(crate) struct Parser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    source: &'src str,
    line_index: LineIndex,
    errors: Vec<SolisError>,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(tokens: Vec<Token>, source: &'src str) -> Self {
        Self {
            tokens,
            pos: 0,
            source,
            line_index: LineIndex::new(source),
            errors: Vec::new(),
        }
    }

    pub(crate) fn current(&self) -> TokenKind {
        self.tokens.get(self.pos).map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    pub(crate) fn nth(&self, n: usize) -> TokenKind {
        self.tokens.get(self.pos + n).map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    pub(crate) fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|t| t.span)
            .unwrap_or_else(|| Span::new(self.source.len() as u32, self.source.len() as u32))
    }

    pub(crate) fn current_text(&self) -> &'src str {
        let span = self.current_span();
        &self.source[span.as_range()]
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    /// Checks whether the current token is an identifier whose text equals
    /// `word`, for contextual keywords (`as`, `hiding`, `for`) that are not
    /// full reserved words.
    pub(crate) fn at_word(&self, word: &str) -> bool {
        self.at(TokenKind::Ident) && self.current_text() == word
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos).copied().unwrap_or(Token::new(
            TokenKind::Eof,
            self.source.len() as u32,
            self.source.len() as u32,
        ));
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_word(&mut self, word: &str) -> bool {
        if self.at_word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Span {
        let span = self.current_span();
        if self.at(kind) {
            self.advance().span
        } else {
            let loc = self.line_index.location(span);
            self.errors.push(taxonomy::parse_error(
                format!("expected {:?}, found {:?} (`{}`)", kind, self.current(), self.current_text()),
                loc,
            ));
            span
        }
    }

    pub(crate) fn expect_ident(&mut self) -> String {
        let span = self.current_span();
        if self.at(TokenKind::Ident) {
            self.advance();
            self.source[span.as_range()].to_string()
        } else {
            let loc = self.line_index.location(span);
            self.errors.push(taxonomy::parse_error(
                format!("expected identifier, found `{}`", self.current_text()),
                loc,
            ));
            String::new()
        }
    }

    pub(crate) fn token_text(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let loc = self.line_index.location(self.current_span());
        self.errors.push(taxonomy::parse_error(message.into(), loc));
    }

    /// Error recovery: advance past tokens until one of `stop_at` (or Eof) is
    /// the current token, without consuming it.
    pub(crate) fn recover_to(&mut self, stop_at: &[TokenKind]) {
        while !self.at(TokenKind::Eof) && !stop_at.contains(&self.current()) {
            self.advance();
        }
    }

    pub(crate) fn location(&self, span: Span) -> solis_common::SourceLocation {
        self.line_index.location(span)
    }

    pub(crate) fn into_errors(self) -> Vec<SolisError> {
        self.errors
    }
}

/// Whether `kind` can begin an expression atom or a type atom -- used to
/// decide whether juxtaposition continues an application / constructor arg
/// list.
pub(crate) fn starts_atom(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident
            | TokenKind::IntLiteral
            | TokenKind::FloatLiteral
            | TokenKind::StringLiteral
            | TokenKind::True
            | TokenKind::False
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::Underscore
    )
}
