use solis_common::TokenKind;

use super::Parser;
use crate::ast::{
    Decl, FunctionDecl, ImplDecl, ImportDecl, Module, ModuleDecl, TraitDecl, TypeDecl, TypeDeclRhs,
};

impl<'src> Parser<'src> {
    pub(crate) fn parse_module(&mut self) -> Module {
        let mut module = Module::default();
        if self.at(TokenKind::Module) {
            module.module_decl = Some(self.parse_module_decl());
        }
        while self.at(TokenKind::Import) {
            module.imports.push(self.parse_import_decl());
        }
        while !self.at(TokenKind::Eof) {
            match self.parse_decl() {
                Some(decl) => module.decls.push(decl),
                None => {
                    self.recover_to(&[
                        TokenKind::Let,
                        TokenKind::Data,
                        TokenKind::Trait,
                        TokenKind::Impl,
                        TokenKind::Import,
                        TokenKind::Eof,
                    ]);
                    if self.at(TokenKind::Eof) {
                        break;
                    }
                }
            }
        }
        module
    }

    fn parse_decl(&mut self) -> Option<Decl> {
        match self.current() {
            TokenKind::Let => Some(Decl::Function(self.parse_function_decl())),
            TokenKind::Data => Some(Decl::Type(self.parse_type_decl())),
            TokenKind::Trait => Some(Decl::Trait(self.parse_trait_decl())),
            TokenKind::Impl => Some(Decl::Impl(self.parse_impl_decl())),
            TokenKind::Import => Some(Decl::Import(self.parse_import_decl())),
            TokenKind::Module => Some(Decl::Module(self.parse_module_decl())),
            _ => {
                self.error(format!(
                    "expected a top-level declaration, found `{}`",
                    self.current_text()
                ));
                None
            }
        }
    }

    /// `module Name (a, b, c) where` or `module Name where` (exports every
    /// top-level function, per the export-list-absent default).
    fn parse_module_decl(&mut self) -> ModuleDecl {
        let start = self.expect(TokenKind::Module);
        let name = self.expect_ident();
        let mut exports = Vec::new();
        if self.at(TokenKind::LParen) {
            self.advance();
            if !self.at(TokenKind::RParen) {
                exports.push(self.expect_ident());
                while self.eat(TokenKind::Comma) {
                    exports.push(self.expect_ident());
                }
            }
            self.expect(TokenKind::RParen);
        }
        let end = self.expect(TokenKind::Where);
        ModuleDecl {
            name,
            exports,
            span: start.merge(end),
        }
    }

    /// `import Name [as Alias] [(a, b)] [hiding (c, d)]`.
    fn parse_import_decl(&mut self) -> ImportDecl {
        let start = self.expect(TokenKind::Import);
        let module_name = self.expect_ident();
        let mut alias = None;
        if self.eat_word("as") {
            alias = Some(self.expect_ident());
        }
        let mut imports = Vec::new();
        let mut hiding = Vec::new();
        if self.at_word("hiding") {
            self.advance();
            self.expect(TokenKind::LParen);
            if !self.at(TokenKind::RParen) {
                hiding.push(self.expect_ident());
                while self.eat(TokenKind::Comma) {
                    hiding.push(self.expect_ident());
                }
            }
            self.expect(TokenKind::RParen);
        } else if self.at(TokenKind::LParen) {
            self.advance();
            if !self.at(TokenKind::RParen) {
                imports.push(self.expect_ident());
                while self.eat(TokenKind::Comma) {
                    imports.push(self.expect_ident());
                }
            }
            self.expect(TokenKind::RParen);
        }
        let end = self.current_span();
        ImportDecl {
            module_name,
            qualified: alias.is_some(),
            alias,
            imports,
            hiding,
            span: start.merge(end),
        }
    }

    /// `let [rec] name param1 param2 [: Type] = body`.
    fn parse_function_decl(&mut self) -> FunctionDecl {
        let start = self.expect(TokenKind::Let);
        let is_recursive = self.eat(TokenKind::Rec);
        let name = self.expect_ident();
        let mut params = Vec::new();
        while !self.at(TokenKind::Eq) && !self.at(TokenKind::Colon) && !self.at(TokenKind::Eof) {
            params.push(self.parse_pattern());
        }
        let type_annotation = if self.eat(TokenKind::Colon) {
            Some(self.parse_type())
        } else {
            None
        };
        self.expect(TokenKind::Eq);
        let body = self.parse_expr();
        let span = start.merge(body.span());
        FunctionDecl {
            name,
            is_recursive,
            type_annotation,
            params,
            body,
            span,
        }
    }

    /// `data Name a b = Ctor1 t1 t2 | Ctor2` or `data Name = { field : Type, ... }`
    /// or `data Name a = OtherType a` (alias).
    fn parse_type_decl(&mut self) -> TypeDecl {
        let start = self.expect(TokenKind::Data);
        let name = self.expect_ident();
        let mut params = Vec::new();
        while self.at(TokenKind::Ident) && self.current_text().starts_with(|c: char| c.is_lowercase()) {
            params.push(self.expect_ident());
        }
        self.expect(TokenKind::Eq);
        let rhs = if self.at(TokenKind::LBrace) {
            self.parse_record_type_decl()
        } else {
            self.parse_adt_rhs()
        };
        let end = self.current_span();
        TypeDecl {
            name,
            params,
            rhs,
            span: start.merge(end),
        }
    }

    fn parse_record_type_decl(&mut self) -> TypeDeclRhs {
        self.expect(TokenKind::LBrace);
        let mut fields = Vec::new();
        if !self.at(TokenKind::RBrace) {
            fields.push(self.parse_type_decl_field());
            while self.eat(TokenKind::Comma) {
                fields.push(self.parse_type_decl_field());
            }
        }
        self.expect(TokenKind::RBrace);
        TypeDeclRhs::Record(fields)
    }

    fn parse_type_decl_field(&mut self) -> (String, crate::ast::Type) {
        let name = self.expect_ident();
        self.expect(TokenKind::Colon);
        let ty = self.parse_type();
        (name, ty)
    }

    fn parse_adt_rhs(&mut self) -> TypeDeclRhs {
        let mut ctors = vec![self.parse_ctor_decl()];
        while self.eat(TokenKind::Pipe) {
            ctors.push(self.parse_ctor_decl());
        }
        TypeDeclRhs::Adt(ctors)
    }

    fn parse_ctor_decl(&mut self) -> (String, Vec<crate::ast::Type>) {
        let name = self.expect_ident();
        let mut args = Vec::new();
        while self.starts_ctor_arg() {
            args.push(self.parse_ctor_arg_type());
        }
        (name, args)
    }

    fn starts_ctor_arg(&self) -> bool {
        matches!(self.current(), TokenKind::Ident | TokenKind::LParen | TokenKind::LBrace)
            && !self.at(TokenKind::Pipe)
    }

    /// A constructor argument type is an atomic type -- `Maybe a` as a
    /// constructor field needs parens (`Ctor (Maybe a)`) so the parser does
    /// not read `a` as a second field.
    fn parse_ctor_arg_type(&mut self) -> crate::ast::Type {
        match self.current() {
            TokenKind::Ident => {
                let text = self.current_text().to_string();
                self.advance();
                if text.starts_with(char::is_uppercase) {
                    crate::ast::Type::Con(text, Vec::new())
                } else {
                    crate::ast::Type::Var(text)
                }
            }
            TokenKind::LParen => {
                self.advance();
                let ty = self.parse_type();
                self.expect(TokenKind::RParen);
                ty
            }
            _ => self.parse_type(),
        }
    }

    /// `trait Name a where { method : Type ; ... }`.
    fn parse_trait_decl(&mut self) -> TraitDecl {
        let start = self.expect(TokenKind::Trait);
        let name = self.expect_ident();
        let mut type_params = Vec::new();
        while self.at(TokenKind::Ident) && self.current_text().starts_with(|c: char| c.is_lowercase()) {
            type_params.push(self.expect_ident());
        }
        self.expect(TokenKind::Where);
        self.expect(TokenKind::LBrace);
        let mut methods = Vec::new();
        if !self.at(TokenKind::RBrace) {
            methods.push(self.parse_trait_method());
            while self.eat(TokenKind::Semicolon) {
                if self.at(TokenKind::RBrace) {
                    break;
                }
                methods.push(self.parse_trait_method());
            }
        }
        let end = self.expect(TokenKind::RBrace);
        TraitDecl {
            name,
            type_params,
            methods,
            span: start.merge(end),
        }
    }

    fn parse_trait_method(&mut self) -> (String, crate::ast::Type) {
        let name = self.expect_ident();
        self.expect(TokenKind::Colon);
        let ty = self.parse_type();
        (name, ty)
    }

    /// `impl [Trait for] Type where { let method ... = ... ; ... }`.
    fn parse_impl_decl(&mut self) -> ImplDecl {
        let start = self.expect(TokenKind::Impl);
        let first = self.parse_type();
        let (trait_name, ty) = if self.eat_word("for") {
            let trait_name = match &first {
                crate::ast::Type::Con(name, _) => Some(name.clone()),
                _ => None,
            };
            (trait_name, self.parse_type())
        } else {
            (None, first)
        };
        self.expect(TokenKind::Where);
        self.expect(TokenKind::LBrace);
        let mut methods = Vec::new();
        while self.at(TokenKind::Let) {
            methods.push(self.parse_function_decl());
            self.eat(TokenKind::Semicolon);
        }
        let end = self.expect(TokenKind::RBrace);
        ImplDecl {
            trait_name,
            ty,
            methods,
            span: start.merge(end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solis_lexer::Lexer;

    fn parse(src: &str) -> Module {
        let tokens = Lexer::tokenize(src);
        let mut p = Parser::new(tokens, src);
        let module = p.parse_module();
        let errors = p.into_errors();
        assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
        module
    }

    #[test]
    fn parses_function_decl() {
        let module = parse("let id x = x");
        assert_eq!(module.decls.len(), 1);
        match &module.decls[0] {
            Decl::Function(f) => {
                assert_eq!(f.name, "id");
                assert_eq!(f.params.len(), 1);
            }
            other => panic!("expected Function, got {other:?}"),
        }
    }

    #[test]
    fn parses_recursive_function_decl() {
        let module = parse("let rec fact n = if n == 0 then 1 else n * fact (n - 1)");
        match &module.decls[0] {
            Decl::Function(f) => assert!(f.is_recursive),
            other => panic!("expected Function, got {other:?}"),
        }
    }

    #[test]
    fn parses_forward_reference_decls() {
        let module = parse("let main = greet \"world\"\nlet greet name = print (\"hello \" ++ name)");
        assert_eq!(module.decls.len(), 2);
    }

    #[test]
    fn parses_adt_decl() {
        let module = parse("data Maybe a = Just a | Nothing");
        match &module.decls[0] {
            Decl::Type(t) => match &t.rhs {
                TypeDeclRhs::Adt(ctors) => {
                    assert_eq!(ctors.len(), 2);
                    assert_eq!(ctors[0].0, "Just");
                    assert_eq!(ctors[0].1.len(), 1);
                    assert_eq!(ctors[1].0, "Nothing");
                    assert!(ctors[1].1.is_empty());
                }
                other => panic!("expected Adt, got {other:?}"),
            },
            other => panic!("expected Type, got {other:?}"),
        }
    }

    #[test]
    fn parses_record_type_decl() {
        let module = parse("data Point = { x : Int, y : Int }");
        match &module.decls[0] {
            Decl::Type(t) => assert!(matches!(t.rhs, TypeDeclRhs::Record(_))),
            other => panic!("expected Type, got {other:?}"),
        }
    }

    #[test]
    fn parses_import_with_list() {
        let module = parse("import List (map, filter)\nlet x = 1");
        assert_eq!(module.imports.len(), 1);
        assert_eq!(module.imports[0].imports, vec!["map".to_string(), "filter".to_string()]);
    }

    #[test]
    fn parses_module_decl_with_exports() {
        let module = parse("module Main (main) where\nlet main = 1");
        assert!(module.module_decl.is_some());
        assert_eq!(module.module_decl.unwrap().exports, vec!["main".to_string()]);
    }

    #[test]
    fn parses_module_decl_without_export_list() {
        let module = parse("module Main where\nlet main = 1");
        assert!(module.module_decl.unwrap().exports.is_empty());
    }

    #[test]
    fn parses_trait_and_impl() {
        let module = parse(
            "trait Show a where { show : a -> String }\nimpl Show for Int where { let show x = x }",
        );
        assert_eq!(module.decls.len(), 2);
        assert!(matches!(module.decls[0], Decl::Trait(_)));
        assert!(matches!(module.decls[1], Decl::Impl(_)));
    }
}
