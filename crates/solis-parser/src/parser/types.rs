use solis_common::TokenKind;

use super::Parser;
use crate::ast::Type;

impl<'src> Parser<'src> {
    /// `type_app ('->' type)*`, right-associative.
    pub(crate) fn parse_type(&mut self) -> Type {
        let head = self.parse_type_app();
        if self.eat(TokenKind::Arrow) {
            let rest = self.parse_type();
            return Type::Fun(Box::new(head), Box::new(rest));
        }
        head
    }

    /// `Con atom1 atom2 ...` -- a type constructor applied to arguments, e.g.
    /// `Maybe (List a)`.
    fn parse_type_app(&mut self) -> Type {
        if self.at(TokenKind::Ident) && self.current_text().starts_with(char::is_uppercase) {
            let name = self.current_text().to_string();
            self.advance();
            let mut args = Vec::new();
            while self.starts_type_atom() {
                args.push(self.parse_type_atom());
            }
            return Type::Con(name, args);
        }
        self.parse_type_atom()
    }

    fn starts_type_atom(&self) -> bool {
        matches!(self.current(), TokenKind::Ident | TokenKind::LParen | TokenKind::LBrace)
    }

    fn parse_type_atom(&mut self) -> Type {
        match self.current() {
            TokenKind::Ident => {
                let text = self.current_text().to_string();
                self.advance();
                if text.starts_with(char::is_uppercase) {
                    Type::Con(text, Vec::new())
                } else {
                    Type::Var(text)
                }
            }
            TokenKind::LParen => {
                self.advance();
                if self.at(TokenKind::RParen) {
                    self.advance();
                    return Type::Con("Unit".to_string(), Vec::new());
                }
                let inner = self.parse_type();
                self.expect(TokenKind::RParen);
                inner
            }
            TokenKind::LBrace => self.parse_record_type(),
            _ => {
                self.error(format!("expected a type, found `{}`", self.current_text()));
                self.advance();
                Type::Con("Error".to_string(), Vec::new())
            }
        }
    }

    fn parse_record_type(&mut self) -> Type {
        self.expect(TokenKind::LBrace);
        let mut fields = Vec::new();
        if !self.at(TokenKind::RBrace) && !self.at(TokenKind::Pipe) {
            fields.push(self.parse_record_type_field());
            while self.eat(TokenKind::Comma) {
                fields.push(self.parse_record_type_field());
            }
        }
        let row = if self.eat(TokenKind::Pipe) {
            Some(self.expect_ident())
        } else {
            None
        };
        self.expect(TokenKind::RBrace);
        Type::Record(fields, row)
    }

    fn parse_record_type_field(&mut self) -> (String, Type) {
        let name = self.expect_ident();
        self.expect(TokenKind::Colon);
        let ty = self.parse_type();
        (name, ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solis_lexer::Lexer;

    fn parse(src: &str) -> Type {
        let tokens = Lexer::tokenize(src);
        let mut p = Parser::new(tokens, src);
        let ty = p.parse_type();
        assert!(p.into_errors().is_empty());
        ty
    }

    #[test]
    fn parses_nullary_con() {
        assert_eq!(parse("Int"), Type::Con("Int".to_string(), Vec::new()));
    }

    #[test]
    fn parses_type_var() {
        assert_eq!(parse("a"), Type::Var("a".to_string()));
    }

    #[test]
    fn parses_applied_con() {
        match parse("Maybe a") {
            Type::Con(name, args) => {
                assert_eq!(name, "Maybe");
                assert_eq!(args, vec![Type::Var("a".to_string())]);
            }
            other => panic!("expected Maybe a, got {other:?}"),
        }
    }

    #[test]
    fn parses_arrow_right_associative() {
        match parse("Int -> Int -> Bool") {
            Type::Fun(from, to) => {
                assert_eq!(*from, Type::Con("Int".to_string(), Vec::new()));
                assert!(matches!(*to, Type::Fun(_, _)));
            }
            other => panic!("expected arrow type, got {other:?}"),
        }
    }

    #[test]
    fn parses_record_type() {
        match parse("{ x : Int, y : Int }") {
            Type::Record(fields, row) => {
                assert_eq!(fields.len(), 2);
                assert!(row.is_none());
            }
            other => panic!("expected record type, got {other:?}"),
        }
    }
}
