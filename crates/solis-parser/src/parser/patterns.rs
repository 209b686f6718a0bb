use solis_common::TokenKind;

use super::Parser;
use crate::ast::{Literal, Pattern};

impl<'src> Parser<'src> {
    /// Entry point: `cons_pattern ('::' cons_pattern)*`, right-associative.
    pub(crate) fn parse_pattern(&mut self) -> Pattern {
        let head = self.parse_app_pattern();
        if self.at(TokenKind::ColonColon) {
            self.advance();
            let tail = self.parse_pattern();
            let span = head.span().merge(tail.span());
            return Pattern::Cons {
                ctor: "::".to_string(),
                args: vec![head, tail],
                span,
            };
        }
        head
    }

    /// `Ctor pat1 pat2 ...` -- a constructor applied to zero or more atomic
    /// argument patterns. A bare uppercase identifier is a nullary
    /// constructor pattern.
    fn parse_app_pattern(&mut self) -> Pattern {
        let start = self.current_span();
        if self.at(TokenKind::Ident) && self.current_text().starts_with(char::is_uppercase) {
            let ctor = self.current_text().to_string();
            self.advance();
            let mut args = Vec::new();
            while super::starts_atom(self.current()) {
                args.push(self.parse_atom_pattern());
            }
            let span = args
                .last()
                .map(|a| start.merge(a.span()))
                .unwrap_or(start);
            return Pattern::Cons { ctor, args, span };
        }
        self.parse_atom_pattern()
    }

    fn parse_atom_pattern(&mut self) -> Pattern {
        let span = self.current_span();
        match self.current() {
            TokenKind::Underscore => {
                self.advance();
                Pattern::Wildcard(span)
            }
            TokenKind::Ident => {
                let text = self.current_text().to_string();
                self.advance();
                if text.starts_with(char::is_uppercase) {
                    Pattern::Cons {
                        ctor: text,
                        args: Vec::new(),
                        span,
                    }
                } else {
                    Pattern::Var(text, span)
                }
            }
            TokenKind::IntLiteral => {
                let text = self.current_text().to_string();
                self.advance();
                let lit = match text.parse::<i64>() {
                    Ok(n) => Literal::Int(n),
                    Err(_) => Literal::BigInt(text),
                };
                Pattern::Lit(lit, span)
            }
            TokenKind::FloatLiteral => {
                let text = self.current_text().to_string();
                self.advance();
                Pattern::Lit(Literal::Float(text.parse().unwrap_or(0.0)), span)
            }
            TokenKind::StringLiteral => {
                let text = unescape(self.current_text());
                self.advance();
                Pattern::Lit(Literal::Str(text), span)
            }
            TokenKind::True => {
                self.advance();
                Pattern::Lit(Literal::Bool(true), span)
            }
            TokenKind::False => {
                self.advance();
                Pattern::Lit(Literal::Bool(false), span)
            }
            TokenKind::LBracket => self.parse_list_pattern(),
            TokenKind::LBrace => self.parse_record_pattern(),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_pattern();
                self.expect(TokenKind::RParen);
                inner
            }
            _ => {
                self.error(format!("expected a pattern, found `{}`", self.current_text()));
                self.advance();
                Pattern::Wildcard(span)
            }
        }
    }

    fn parse_list_pattern(&mut self) -> Pattern {
        let start = self.expect(TokenKind::LBracket);
        let mut elements = Vec::new();
        if !self.at(TokenKind::RBracket) {
            elements.push(self.parse_pattern());
            while self.eat(TokenKind::Comma) {
                elements.push(self.parse_pattern());
            }
        }
        let end = self.expect(TokenKind::RBracket);
        Pattern::List(elements, start.merge(end))
    }

    fn parse_record_pattern(&mut self) -> Pattern {
        let start = self.expect(TokenKind::LBrace);
        let mut fields = Vec::new();
        if !self.at(TokenKind::RBrace) {
            fields.push(self.parse_field_pattern());
            while self.eat(TokenKind::Comma) {
                fields.push(self.parse_field_pattern());
            }
        }
        let end = self.expect(TokenKind::RBrace);
        Pattern::Record(fields, start.merge(end))
    }

    fn parse_field_pattern(&mut self) -> (String, Pattern) {
        let name = self.expect_ident();
        if self.eat(TokenKind::Eq) {
            let pat = self.parse_pattern();
            (name, pat)
        } else {
            let span = self.current_span();
            (name.clone(), Pattern::Var(name, span))
        }
    }
}

/// Resolves `\n`, `\t`, `\"`, `\\` escape sequences recognized by the lexer.
pub(crate) fn unescape(raw: &str) -> String {
    let inner = raw.trim_start_matches('"').trim_end_matches('"');
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use solis_lexer::Lexer;

    fn parse(src: &str) -> Pattern {
        let tokens = Lexer::tokenize(src);
        let mut p = Parser::new(tokens, src);
        let pat = p.parse_pattern();
        assert!(p.into_errors().is_empty());
        pat
    }

    #[test]
    fn parses_wildcard() {
        assert!(matches!(parse("_"), Pattern::Wildcard(_)));
    }

    #[test]
    fn parses_var() {
        assert!(matches!(parse("x"), Pattern::Var(n, _) if n == "x"));
    }

    #[test]
    fn parses_cons_pattern() {
        match parse("x :: xs") {
            Pattern::Cons { ctor, args, .. } => {
                assert_eq!(ctor, "::");
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected cons pattern, got {other:?}"),
        }
    }

    #[test]
    fn parses_constructor_with_args() {
        match parse("Just x") {
            Pattern::Cons { ctor, args, .. } => {
                assert_eq!(ctor, "Just");
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected Just x, got {other:?}"),
        }
    }

    #[test]
    fn parses_nullary_constructor() {
        match parse("Nothing") {
            Pattern::Cons { ctor, args, .. } => {
                assert_eq!(ctor, "Nothing");
                assert!(args.is_empty());
            }
            other => panic!("expected Nothing, got {other:?}"),
        }
    }

    #[test]
    fn parses_list_pattern() {
        match parse("[a, b]") {
            Pattern::List(elems, _) => assert_eq!(elems.len(), 2),
            other => panic!("expected list pattern, got {other:?}"),
        }
    }

    #[test]
    fn parses_record_pattern_with_shorthand() {
        match parse("{ x, y = yy }") {
            Pattern::Record(fields, _) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].0, "x");
                assert_eq!(fields[1].0, "y");
            }
            other => panic!("expected record pattern, got {other:?}"),
        }
    }
}
