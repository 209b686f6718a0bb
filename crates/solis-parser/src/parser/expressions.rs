use solis_common::TokenKind;

use super::patterns::unescape;
use super::Parser;
use crate::ast::{BlockStmt, Expr, Literal};

impl<'src> Parser<'src> {
    pub(crate) fn parse_expr(&mut self) -> Expr {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Expr {
        let mut left = self.parse_and();
        while self.at(TokenKind::PipePipe) {
            self.advance();
            let right = self.parse_and();
            let span = left.span().merge(right.span());
            left = Expr::BinOp {
                op: "||".to_string(),
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        left
    }

    fn parse_and(&mut self) -> Expr {
        let mut left = self.parse_equality();
        while self.at(TokenKind::AmpAmp) {
            self.advance();
            let right = self.parse_equality();
            let span = left.span().merge(right.span());
            left = Expr::BinOp {
                op: "&&".to_string(),
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        left
    }

    fn parse_equality(&mut self) -> Expr {
        let mut left = self.parse_comparison();
        loop {
            let op = match self.current() {
                TokenKind::EqEq => "==",
                TokenKind::NotEq => "!=",
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison();
            let span = left.span().merge(right.span());
            left = Expr::BinOp {
                op: op.to_string(),
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        left
    }

    fn parse_comparison(&mut self) -> Expr {
        let mut left = self.parse_cons();
        loop {
            let op = match self.current() {
                TokenKind::Lt => "<",
                TokenKind::Gt => ">",
                TokenKind::LtEq => "<=",
                TokenKind::GtEq => ">=",
                _ => break,
            };
            self.advance();
            let right = self.parse_cons();
            let span = left.span().merge(right.span());
            left = Expr::BinOp {
                op: op.to_string(),
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        left
    }

    /// `::` is right-associative: `x :: y :: zs` parses as `x :: (y :: zs)`.
    fn parse_cons(&mut self) -> Expr {
        let left = self.parse_concat();
        if self.at(TokenKind::ColonColon) {
            self.advance();
            let right = self.parse_cons();
            let span = left.span().merge(right.span());
            return Expr::BinOp {
                op: "::".to_string(),
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        left
    }

    fn parse_concat(&mut self) -> Expr {
        let mut left = self.parse_additive();
        while self.at(TokenKind::PlusPlus) {
            self.advance();
            let right = self.parse_additive();
            let span = left.span().merge(right.span());
            left = Expr::BinOp {
                op: "++".to_string(),
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        left
    }

    fn parse_additive(&mut self) -> Expr {
        let mut left = self.parse_multiplicative();
        loop {
            let op = match self.current() {
                TokenKind::Plus => "+",
                TokenKind::Minus => "-",
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative();
            let span = left.span().merge(right.span());
            left = Expr::BinOp {
                op: op.to_string(),
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        left
    }

    fn parse_multiplicative(&mut self) -> Expr {
        let mut left = self.parse_unary();
        loop {
            let op = match self.current() {
                TokenKind::Star => "*",
                TokenKind::Slash => "/",
                TokenKind::Percent => "%",
                _ => break,
            };
            self.advance();
            let right = self.parse_unary();
            let span = left.span().merge(right.span());
            left = Expr::BinOp {
                op: op.to_string(),
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        left
    }

    /// Prefix `-`, `!` desugar to applications of the `neg`/`not` builtins;
    /// `force` wraps its operand in [`Expr::Strict`].
    fn parse_unary(&mut self) -> Expr {
        let start = self.current_span();
        match self.current() {
            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_unary();
                let span = start.merge(operand.span());
                Expr::App {
                    func: Box::new(Expr::Var("neg".to_string(), start)),
                    arg: Box::new(operand),
                    span,
                }
            }
            TokenKind::Bang => {
                self.advance();
                let operand = self.parse_unary();
                let span = start.merge(operand.span());
                Expr::App {
                    func: Box::new(Expr::Var("not".to_string(), start)),
                    arg: Box::new(operand),
                    span,
                }
            }
            TokenKind::Force => {
                self.advance();
                let operand = self.parse_unary();
                let span = start.merge(operand.span());
                Expr::Strict {
                    expr: Box::new(operand),
                    span,
                }
            }
            _ => self.parse_application(),
        }
    }

    /// Juxtaposition: `f a b` parses as `App(App(f, a), b)`, left-associative,
    /// tighter than every binary operator above.
    fn parse_application(&mut self) -> Expr {
        let mut func = self.parse_postfix();
        while super::starts_atom(self.current()) {
            let arg = self.parse_postfix();
            let span = func.span().merge(arg.span());
            func = Expr::App {
                func: Box::new(func),
                arg: Box::new(arg),
                span,
            };
        }
        func
    }

    /// `.field` access, left-associative, chains after an atom.
    fn parse_postfix(&mut self) -> Expr {
        let mut expr = self.parse_atom();
        while self.at(TokenKind::Dot) {
            self.advance();
            let field_span = self.current_span();
            let field = self.expect_ident();
            let span = expr.span().merge(field_span);
            expr = Expr::RecordAccess {
                record: Box::new(expr),
                field,
                span,
            };
        }
        expr
    }

    fn parse_atom(&mut self) -> Expr {
        let span = self.current_span();
        match self.current() {
            TokenKind::IntLiteral => {
                let text = self.current_text().to_string();
                self.advance();
                match text.parse::<i64>() {
                    Ok(n) => Expr::Lit(Literal::Int(n), span),
                    Err(_) => Expr::Lit(Literal::BigInt(text), span),
                }
            }
            TokenKind::FloatLiteral => {
                let text = self.current_text().to_string();
                self.advance();
                Expr::Lit(Literal::Float(text.parse().unwrap_or(0.0)), span)
            }
            TokenKind::StringLiteral => {
                let text = unescape(self.current_text());
                self.advance();
                Expr::Lit(Literal::Str(text), span)
            }
            TokenKind::True => {
                self.advance();
                Expr::Lit(Literal::Bool(true), span)
            }
            TokenKind::False => {
                self.advance();
                Expr::Lit(Literal::Bool(false), span)
            }
            TokenKind::Ident => {
                let text = self.current_text().to_string();
                self.advance();
                Expr::Var(text, span)
            }
            TokenKind::Underscore => {
                self.advance();
                Expr::Var("_".to_string(), span)
            }
            TokenKind::LParen => self.parse_paren_expr(),
            TokenKind::LBracket => self.parse_list_expr(),
            TokenKind::LBrace => self.parse_brace_expr(),
            TokenKind::Fn => self.parse_lambda(),
            TokenKind::Let => self.parse_let_expr(),
            TokenKind::If => self.parse_if_expr(),
            TokenKind::Match => self.parse_match_expr(),
            TokenKind::Do => self.parse_do_block(),
            _ => {
                self.error(format!("expected an expression, found `{}`", self.current_text()));
                self.advance();
                Expr::Var("?".to_string(), span)
            }
        }
    }

    fn parse_paren_expr(&mut self) -> Expr {
        let start = self.expect(TokenKind::LParen);
        if self.at(TokenKind::RParen) {
            let end = self.advance().span;
            return Expr::Var("unit".to_string(), start.merge(end));
        }
        let inner = self.parse_expr();
        self.expect(TokenKind::RParen);
        inner
    }

    fn parse_list_expr(&mut self) -> Expr {
        let start = self.expect(TokenKind::LBracket);
        let mut elements = Vec::new();
        if !self.at(TokenKind::RBracket) {
            elements.push(self.parse_expr());
            while self.eat(TokenKind::Comma) {
                elements.push(self.parse_expr());
            }
        }
        let end = self.expect(TokenKind::RBracket);
        Expr::List {
            elements,
            span: start.merge(end),
        }
    }

    /// Disambiguates `{ field = value, ... }` (record literal) from
    /// `{ base | field = value, ... }` (record update) by looking ahead for
    /// an identifier immediately followed by `=` right after `{`.
    fn parse_brace_expr(&mut self) -> Expr {
        let start = self.expect(TokenKind::LBrace);
        if self.at(TokenKind::Ident) && self.nth(1) == TokenKind::Eq {
            let mut fields = vec![self.parse_record_field()];
            while self.eat(TokenKind::Comma) {
                fields.push(self.parse_record_field());
            }
            let end = self.expect(TokenKind::RBrace);
            return Expr::Record {
                fields,
                span: start.merge(end),
            };
        }
        let base = self.parse_expr();
        self.expect(TokenKind::Pipe);
        let mut updates = vec![self.parse_record_field()];
        while self.eat(TokenKind::Comma) {
            updates.push(self.parse_record_field());
        }
        let end = self.expect(TokenKind::RBrace);
        Expr::RecordUpdate {
            record: Box::new(base),
            updates,
            span: start.merge(end),
        }
    }

    fn parse_record_field(&mut self) -> (String, Expr) {
        let name = self.expect_ident();
        self.expect(TokenKind::Eq);
        let value = self.parse_expr();
        (name, value)
    }

    /// `fn p1 p2 ... -> body`.
    fn parse_lambda(&mut self) -> Expr {
        let start = self.expect(TokenKind::Fn);
        let mut params = Vec::new();
        while !self.at(TokenKind::Arrow) && !self.at(TokenKind::Eof) {
            params.push(self.parse_pattern());
        }
        self.expect(TokenKind::Arrow);
        let body = self.parse_expr();
        let span = start.merge(body.span());
        Expr::Lambda {
            params,
            body: Box::new(body),
            span,
        }
    }

    /// `let [rec] pattern = value in body`.
    fn parse_let_expr(&mut self) -> Expr {
        let start = self.expect(TokenKind::Let);
        let is_recursive = self.eat(TokenKind::Rec);
        let pattern = self.parse_pattern();
        self.expect(TokenKind::Eq);
        let value = self.parse_expr();
        self.expect(TokenKind::In);
        let body = self.parse_expr();
        let span = start.merge(body.span());
        Expr::Let {
            is_recursive,
            pattern,
            value: Box::new(value),
            body: Box::new(body),
            span,
        }
    }

    fn parse_if_expr(&mut self) -> Expr {
        let start = self.expect(TokenKind::If);
        let cond = self.parse_expr();
        self.expect(TokenKind::Then);
        let then_branch = self.parse_expr();
        self.expect(TokenKind::Else);
        let else_branch = self.parse_expr();
        let span = start.merge(else_branch.span());
        Expr::If {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
            span,
        }
    }

    /// `match scrutinee with { pat -> expr ; pat -> expr ... }`.
    fn parse_match_expr(&mut self) -> Expr {
        let start = self.expect(TokenKind::Match);
        let scrutinee = self.parse_expr();
        self.expect(TokenKind::With);
        self.expect(TokenKind::LBrace);
        let mut arms = Vec::new();
        loop {
            self.eat(TokenKind::Pipe);
            if self.at(TokenKind::RBrace) || self.at(TokenKind::Eof) {
                break;
            }
            let pattern = self.parse_pattern();
            self.expect(TokenKind::Arrow);
            let body = self.parse_expr();
            arms.push((pattern, body));
            if !self.eat(TokenKind::Semicolon) {
                break;
            }
        }
        let end = self.expect(TokenKind::RBrace);
        Expr::Match {
            scrutinee: Box::new(scrutinee),
            arms,
            span: start.merge(end),
        }
    }

    /// `do stmt ; stmt ; ... end`, where each `stmt` is a `let` binding, a
    /// `pattern <- expr` bind, or a plain expression.
    fn parse_do_block(&mut self) -> Expr {
        let start = self.expect(TokenKind::Do);
        let mut stmts = Vec::new();
        while !self.at(TokenKind::End) && !self.at(TokenKind::Eof) {
            stmts.push(self.parse_block_stmt());
            if !self.eat(TokenKind::Semicolon) {
                break;
            }
        }
        let end = self.expect(TokenKind::End);
        Expr::Block {
            stmts,
            span: start.merge(end),
        }
    }

    fn parse_block_stmt(&mut self) -> BlockStmt {
        if self.at(TokenKind::Let) {
            self.advance();
            let is_recursive = self.eat(TokenKind::Rec);
            let pattern = self.parse_pattern();
            self.expect(TokenKind::Eq);
            let value = self.parse_expr();
            return BlockStmt::Let {
                is_recursive,
                pattern,
                value,
            };
        }
        if self.looks_like_bind() {
            let pattern = self.parse_pattern();
            self.expect(TokenKind::LArrow);
            let value = self.parse_expr();
            return BlockStmt::Bind { pattern, value };
        }
        BlockStmt::Expr(self.parse_expr())
    }

    /// Scans ahead, tracking bracket depth, for a depth-0 `<-` before the
    /// next statement terminator (`;` or `end`). Needed because a bind's
    /// pattern and a plain expression can start with identical tokens.
    fn looks_like_bind(&self) -> bool {
        let mut depth = 0i32;
        let mut i = 0usize;
        loop {
            let kind = self.nth(i);
            match kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => depth -= 1,
                TokenKind::LArrow if depth == 0 => return true,
                TokenKind::Semicolon | TokenKind::End | TokenKind::Eof if depth <= 0 => return false,
                _ => {}
            }
            i += 1;
            if i > 4096 {
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solis_lexer::Lexer;

    fn parse(src: &str) -> Expr {
        let tokens = Lexer::tokenize(src);
        let mut p = Parser::new(tokens, src);
        let expr = p.parse_expr();
        let errors = p.into_errors();
        assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
        expr
    }

    #[test]
    fn parses_literal() {
        assert!(matches!(parse("42"), Expr::Lit(Literal::Int(42), _)));
    }

    #[test]
    fn parses_application_left_associative() {
        match parse("f a b") {
            Expr::App { func, arg, .. } => {
                assert!(matches!(*arg, Expr::Var(ref n, _) if n == "b"));
                assert!(matches!(*func, Expr::App { .. }));
            }
            other => panic!("expected nested App, got {other:?}"),
        }
    }

    #[test]
    fn application_binds_tighter_than_operators() {
        match parse("f x + 1") {
            Expr::BinOp { op, left, .. } => {
                assert_eq!(op, "+");
                assert!(matches!(*left, Expr::App { .. }));
            }
            other => panic!("expected +, got {other:?}"),
        }
    }

    #[test]
    fn parses_unary_minus_as_neg_application() {
        match parse("-x") {
            Expr::App { func, .. } => {
                assert!(matches!(*func, Expr::Var(ref n, _) if n == "neg"));
            }
            other => panic!("expected App(neg, x), got {other:?}"),
        }
    }

    #[test]
    fn parses_force_as_strict() {
        assert!(matches!(parse("force x"), Expr::Strict { .. }));
    }

    #[test]
    fn parses_cons_right_associative() {
        match parse("1 :: 2 :: nil") {
            Expr::BinOp { op, right, .. } => {
                assert_eq!(op, "::");
                assert!(matches!(*right, Expr::BinOp { .. }));
            }
            other => panic!("expected :: chain, got {other:?}"),
        }
    }

    #[test]
    fn parses_let_in() {
        match parse("let id x = x in id 42") {
            Expr::Let { pattern, body, .. } => {
                assert!(matches!(pattern, crate::ast::Pattern::Var(ref n, _) if n == "id"));
                assert!(matches!(*body, Expr::App { .. }));
            }
            other => panic!("expected Let, got {other:?}"),
        }
    }

    #[test]
    fn desugars_let_with_params_to_lambda_is_not_assumed() {
        // `let id x = x in ...` binds the *pattern* `id` to a function
        // value; turning params into a lambda is an items-level concern for
        // top-level decls, not this expression-level `let`. Here `x` simply
        // is not consumed as a lambda param at the expression level.
        let expr = parse("let f = fn x -> x in f 1");
        assert!(matches!(expr, Expr::Let { .. }));
    }

    #[test]
    fn parses_if_then_else() {
        assert!(matches!(parse("if true then 1 else 2"), Expr::If { .. }));
    }

    #[test]
    fn parses_match_with_multiple_arms() {
        match parse("match m with { Just x -> x ; Nothing -> 0 }") {
            Expr::Match { arms, .. } => assert_eq!(arms.len(), 2),
            other => panic!("expected Match, got {other:?}"),
        }
    }

    #[test]
    fn parses_list_cons_pattern_arm() {
        match parse("match l with { x :: _ -> x ; [] -> 0 }") {
            Expr::Match { arms, .. } => {
                assert_eq!(arms.len(), 2);
                assert!(matches!(arms[0].0, crate::ast::Pattern::Cons { .. }));
            }
            other => panic!("expected Match, got {other:?}"),
        }
    }

    #[test]
    fn parses_record_literal() {
        match parse("{ x = 1, y = 2 }") {
            Expr::Record { fields, .. } => assert_eq!(fields.len(), 2),
            other => panic!("expected Record, got {other:?}"),
        }
    }

    #[test]
    fn parses_record_update() {
        match parse("{ p | x = 1 }") {
            Expr::RecordUpdate { updates, .. } => assert_eq!(updates.len(), 1),
            other => panic!("expected RecordUpdate, got {other:?}"),
        }
    }

    #[test]
    fn parses_record_access_chain() {
        match parse("p.pos.x") {
            Expr::RecordAccess { record, field, .. } => {
                assert_eq!(field, "x");
                assert!(matches!(*record, Expr::RecordAccess { .. }));
            }
            other => panic!("expected chained RecordAccess, got {other:?}"),
        }
    }

    #[test]
    fn parses_do_block_with_bind_and_let() {
        match parse("do x <- readFile \"a\" ; let y = 1 ; print y end") {
            Expr::Block { stmts, .. } => {
                assert_eq!(stmts.len(), 3);
                assert!(matches!(stmts[0], BlockStmt::Bind { .. }));
                assert!(matches!(stmts[1], BlockStmt::Let { .. }));
                assert!(matches!(stmts[2], BlockStmt::Expr(_)));
            }
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn bind_lookahead_does_not_confuse_nested_parens() {
        match parse("do print (f x) ; x <- readFile \"a\" end") {
            Expr::Block { stmts, .. } => {
                assert!(matches!(stmts[0], BlockStmt::Expr(_)));
                assert!(matches!(stmts[1], BlockStmt::Bind { .. }));
            }
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn parses_empty_list() {
        match parse("[]") {
            Expr::List { elements, .. } => assert!(elements.is_empty()),
            other => panic!("expected empty List, got {other:?}"),
        }
    }

    #[test]
    fn parses_lambda() {
        match parse("fn x y -> x") {
            Expr::Lambda { params, .. } => assert_eq!(params.len(), 2),
            other => panic!("expected Lambda, got {other:?}"),
        }
    }
}
