//! Tokenizer for Solis source text.
//!
//! Produces a flat stream of [`Token`]s with byte-offset [`Span`]s. Whitespace
//! and comments are consumed silently; Solis has no indentation- or
//! newline-sensitive syntax, so unlike some lexers in this workspace there is
//! no significant-newline token and no lexer-state stack for string
//! interpolation -- Solis string literals are plain, non-interpolating.

mod cursor;

use cursor::Cursor;
use solis_common::token::{keyword_from_str, Token, TokenKind};

pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    emitted_eof: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
        }
    }

    /// Tokenize a full source string, including the trailing `Eof` token.
    pub fn tokenize(source: &'src str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(c) if c.is_whitespace() => {
                    self.cursor.advance();
                }
                Some('#') => {
                    self.cursor.eat_while(|c| c != '\n');
                }
                _ => break,
            }
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        self.cursor.eat_while(|c| c.is_ascii_digit());
        let mut kind = TokenKind::IntLiteral;
        if self.cursor.peek() == Some('.') && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
            kind = TokenKind::FloatLiteral;
        }
        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            kind = TokenKind::FloatLiteral;
            self.cursor.advance();
            if matches!(self.cursor.peek(), Some('+' | '-')) {
                self.cursor.advance();
            }
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }
        kind
    }

    fn lex_string(&mut self) -> TokenKind {
        // Opening quote already consumed by caller.
        loop {
            match self.cursor.peek() {
                None => return TokenKind::Error,
                Some('"') => {
                    self.cursor.advance();
                    return TokenKind::StringLiteral;
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn lex_ident(&mut self) -> TokenKind {
        self.cursor
            .eat_while(|c| c.is_alphanumeric() || c == '_' || c == '\'');
        TokenKind::Ident
    }

    /// Consume one two-or-one-character operator, given the already-consumed
    /// first character `c`.
    fn lex_operator(&mut self, c: char) -> TokenKind {
        match c {
            '=' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    TokenKind::EqEq
                } else if self.cursor.peek() == Some('>') {
                    self.cursor.advance();
                    TokenKind::FatArrow
                } else {
                    TokenKind::Eq
                }
            }
            '!' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    TokenKind::LtEq
                } else if self.cursor.peek() == Some('-') {
                    self.cursor.advance();
                    TokenKind::LArrow
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '&' => {
                if self.cursor.peek() == Some('&') {
                    self.cursor.advance();
                    TokenKind::AmpAmp
                } else {
                    TokenKind::Error
                }
            }
            '|' => {
                if self.cursor.peek() == Some('|') {
                    self.cursor.advance();
                    TokenKind::PipePipe
                } else {
                    TokenKind::Pipe
                }
            }
            '-' => {
                if self.cursor.peek() == Some('>') {
                    self.cursor.advance();
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '+' => {
                if self.cursor.peek() == Some('+') {
                    self.cursor.advance();
                    TokenKind::PlusPlus
                } else {
                    TokenKind::Plus
                }
            }
            ':' => {
                if self.cursor.peek() == Some(':') {
                    self.cursor.advance();
                    TokenKind::ColonColon
                } else {
                    TokenKind::Colon
                }
            }
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            _ => TokenKind::Error,
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.skip_trivia();
        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            if self.emitted_eof {
                return None;
            }
            self.emitted_eof = true;
            return Some(Token::new(TokenKind::Eof, start, start));
        };

        let kind = if c == '_'
            && self
                .cursor
                .peek_next()
                .is_none_or(|n| !(n.is_alphanumeric() || n == '_' || n == '\''))
        {
            self.cursor.advance();
            TokenKind::Underscore
        } else if is_ident_start(c) {
            let kind = self.lex_ident();
            let text = self.cursor.slice(start, self.cursor.pos());
            keyword_from_str(text).unwrap_or(kind)
        } else if c.is_ascii_digit() {
            self.lex_number()
        } else if c == '"' {
            self.cursor.advance();
            self.lex_string()
        } else {
            self.cursor.advance();
            self.lex_operator(c)
        };

        Some(Token::new(kind, start, self.cursor.pos()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_simple_let() {
        assert_eq!(
            kinds("let x = 1"),
            vec![
                TokenKind::Let,
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::IntLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_keywords_vs_idents() {
        assert_eq!(kinds("let rec fact"), vec![TokenKind::Let, TokenKind::Rec, TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn lexes_float_literal() {
        assert_eq!(kinds("3.14"), vec![TokenKind::FloatLiteral, TokenKind::Eof]);
    }

    #[test]
    fn lexes_int_not_followed_by_dot_is_int() {
        assert_eq!(kinds("42"), vec![TokenKind::IntLiteral, TokenKind::Eof]);
    }

    #[test]
    fn lexes_string_literal() {
        assert_eq!(kinds("\"hello\""), vec![TokenKind::StringLiteral, TokenKind::Eof]);
    }

    #[test]
    fn lexes_string_with_escape() {
        let toks = Lexer::tokenize("\"a\\\"b\"");
        assert_eq!(toks[0].kind, TokenKind::StringLiteral);
    }

    #[test]
    fn lexes_unterminated_string_as_error() {
        assert_eq!(kinds("\"abc"), vec![TokenKind::Error, TokenKind::Eof]);
    }

    #[test]
    fn lexes_cons_operator() {
        assert_eq!(kinds("x :: xs"), vec![TokenKind::Ident, TokenKind::ColonColon, TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn lexes_arrow_and_fat_arrow() {
        assert_eq!(kinds("-> =>"), vec![TokenKind::Arrow, TokenKind::FatArrow, TokenKind::Eof]);
    }

    #[test]
    fn lexes_concat_operator() {
        assert_eq!(kinds("\"a\" ++ \"b\""), vec![
            TokenKind::StringLiteral,
            TokenKind::PlusPlus,
            TokenKind::StringLiteral,
            TokenKind::Eof
        ]);
    }

    #[test]
    fn lexes_wildcard_pattern() {
        assert_eq!(kinds("_"), vec![TokenKind::Underscore, TokenKind::Eof]);
    }

    #[test]
    fn lexes_match_arm_pipe() {
        assert_eq!(
            kinds("match m with { Just x -> x ; Nothing -> d }"),
            vec![
                TokenKind::Match,
                TokenKind::Ident,
                TokenKind::With,
                TokenKind::LBrace,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Arrow,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Ident,
                TokenKind::Arrow,
                TokenKind::Ident,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_bind_arrow_and_force_keyword() {
        assert_eq!(
            kinds("x <- force y"),
            vec![
                TokenKind::Ident,
                TokenKind::LArrow,
                TokenKind::Force,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_line_comments() {
        assert_eq!(kinds("1 # comment\n2"), vec![TokenKind::IntLiteral, TokenKind::IntLiteral, TokenKind::Eof]);
    }

    #[test]
    fn double_eof_returns_none() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next().unwrap().kind, TokenKind::Eof);
        assert!(lexer.next().is_none());
    }

    #[test]
    fn token_spans_are_byte_accurate() {
        let toks = Lexer::tokenize("let x");
        assert_eq!(toks[0].span.as_range(), 0..3);
        assert_eq!(toks[1].span.as_range(), 4..5);
    }
}
