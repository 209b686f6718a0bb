//! Symbol visibility and qualified-name resolution across imports.
//!
//! Grounded on `NamespaceManager` (`namespace_manager.hpp`): a qualified
//! table keyed by qualifier then name, an unqualified table where more than
//! one entry means an ambiguous name, and a module catalog used purely for
//! "did you mean to import X" suggestions. Generic over the payload `T`
//! (a `Ty`/`TypeScheme` for the typechecker, a runtime `Value` for the
//! evaluator) since the namespace layer itself is agnostic to what a symbol
//! carries.

use std::collections::BTreeMap;

use solis_parser::ast::ImportDecl;

/// One exported binding as seen from the declaring module.
#[derive(Debug, Clone)]
pub struct Symbol<T> {
    pub name: String,
    pub module_name: String,
    pub value: T,
    pub is_exported: bool,
}

#[derive(Default)]
pub struct NamespaceManager<T> {
    /// qualifier -> (name -> Symbol)
    qualified: BTreeMap<String, BTreeMap<String, Symbol<T>>>,
    /// name -> every Symbol imported unqualified under that name (len > 1 is ambiguous)
    unqualified: BTreeMap<String, Vec<Symbol<T>>>,
    /// moduleName -> (symbolName -> Symbol), populated regardless of import filters
    catalog: BTreeMap<String, BTreeMap<String, Symbol<T>>>,
}

impl<T: Clone> NamespaceManager<T> {
    pub fn new() -> Self {
        NamespaceManager { qualified: BTreeMap::new(), unqualified: BTreeMap::new(), catalog: BTreeMap::new() }
    }

    /// Registers one import's visible symbols. `symbols` is everything the
    /// target module exports; `shouldImportSymbol`'s include/hide filtering
    /// is applied before binding into the qualified/unqualified tables.
    pub fn add_import(&mut self, import: &ImportDecl, symbols: &[Symbol<T>]) {
        self.register_module_catalog(&import.module_name, symbols);

        let qualifier = import.alias.clone().unwrap_or_else(|| import.module_name.clone());
        for symbol in symbols {
            if !should_import_symbol(&symbol.name, &import.imports, &import.hiding) {
                continue;
            }
            self.qualified.entry(qualifier.clone()).or_default().insert(symbol.name.clone(), symbol.clone());
            self.qualified
                .entry(import.module_name.clone())
                .or_default()
                .insert(symbol.name.clone(), symbol.clone());

            if !import.qualified {
                self.unqualified.entry(symbol.name.clone()).or_default().push(symbol.clone());
            }
        }
    }

    /// The unique unqualified binding for `name`, or `None` if it's either
    /// unbound or ambiguous (bound by more than one import).
    pub fn lookup(&self, name: &str) -> Option<&Symbol<T>> {
        match self.unqualified.get(name) {
            Some(matches) if matches.len() == 1 => matches.first(),
            _ => None,
        }
    }

    pub fn lookup_qualified(&self, qualifier: &str, name: &str) -> Option<&Symbol<T>> {
        self.qualified.get(qualifier)?.get(name)
    }

    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.unqualified.get(name).map(|m| m.len() > 1).unwrap_or(false)
    }

    pub fn modules_exporting(&self, name: &str) -> Vec<String> {
        self.unqualified
            .get(name)
            .map(|matches| matches.iter().map(|s| s.module_name.clone()).collect())
            .unwrap_or_default()
    }

    pub fn register_module_catalog(&mut self, module_name: &str, symbols: &[Symbol<T>]) {
        let entry = self.catalog.entry(module_name.to_string()).or_default();
        for symbol in symbols {
            entry.insert(symbol.name.clone(), symbol.clone());
        }
    }

    /// Every module in the catalog that exports a symbol named `symbol_name`,
    /// for a "did you mean to `import Foo`?" diagnostic.
    pub fn suggest_imports_for(&self, symbol_name: &str) -> Vec<String> {
        self.catalog
            .iter()
            .filter(|(_, symbols)| symbols.contains_key(symbol_name))
            .map(|(module, _)| module.clone())
            .collect()
    }
}

fn should_import_symbol(name: &str, import_list: &[String], hide_list: &[String]) -> bool {
    if hide_list.iter().any(|h| h == name) {
        return false;
    }
    if import_list.is_empty() {
        return true;
    }
    import_list.iter().any(|i| i == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solis_common::Span;

    fn span() -> Span {
        Span::new(0, 0)
    }

    fn import(module_name: &str, qualified: bool, alias: Option<&str>, imports: &[&str], hiding: &[&str]) -> ImportDecl {
        ImportDecl {
            module_name: module_name.to_string(),
            qualified,
            alias: alias.map(|s| s.to_string()),
            imports: imports.iter().map(|s| s.to_string()).collect(),
            hiding: hiding.iter().map(|s| s.to_string()).collect(),
            span: span(),
        }
    }

    fn sym(name: &str, module: &str, value: i32) -> Symbol<i32> {
        Symbol { name: name.to_string(), module_name: module.to_string(), value, is_exported: true }
    }

    #[test]
    fn unqualified_import_binds_into_both_tables() {
        let mut ns = NamespaceManager::new();
        ns.add_import(&import("Data.List", false, None, &[], &[]), &[sym("map", "Data.List", 1)]);
        assert!(ns.lookup("map").is_some());
        assert!(ns.lookup_qualified("Data.List", "map").is_some());
    }

    #[test]
    fn qualified_import_does_not_populate_unqualified_table() {
        let mut ns = NamespaceManager::new();
        ns.add_import(&import("Data.List", true, None, &[], &[]), &[sym("map", "Data.List", 1)]);
        assert!(ns.lookup("map").is_none());
        assert!(ns.lookup_qualified("Data.List", "map").is_some());
    }

    #[test]
    fn alias_is_usable_as_a_qualifier() {
        let mut ns = NamespaceManager::new();
        ns.add_import(&import("Data.List", true, Some("L"), &[], &[]), &[sym("map", "Data.List", 1)]);
        assert!(ns.lookup_qualified("L", "map").is_some());
    }

    #[test]
    fn hide_list_excludes_a_symbol() {
        let mut ns = NamespaceManager::new();
        ns.add_import(&import("Data.List", false, None, &[], &["map"]), &[sym("map", "Data.List", 1), sym("filter", "Data.List", 2)]);
        assert!(ns.lookup("map").is_none());
        assert!(ns.lookup("filter").is_some());
    }

    #[test]
    fn import_list_restricts_to_named_symbols() {
        let mut ns = NamespaceManager::new();
        ns.add_import(&import("Data.List", false, None, &["map"], &[]), &[sym("map", "Data.List", 1), sym("filter", "Data.List", 2)]);
        assert!(ns.lookup("map").is_some());
        assert!(ns.lookup("filter").is_none());
    }

    #[test]
    fn name_imported_from_two_modules_is_ambiguous() {
        let mut ns = NamespaceManager::new();
        ns.add_import(&import("Data.List", false, None, &[], &[]), &[sym("empty", "Data.List", 1)]);
        ns.add_import(&import("Data.Map", false, None, &[], &[]), &[sym("empty", "Data.Map", 2)]);
        assert!(ns.is_ambiguous("empty"));
        assert!(ns.lookup("empty").is_none());
        assert_eq!(ns.modules_exporting("empty"), vec!["Data.List".to_string(), "Data.Map".to_string()]);
    }

    #[test]
    fn suggest_imports_for_finds_catalog_matches_even_without_importing() {
        let mut ns = NamespaceManager::new();
        ns.register_module_catalog("Data.List", &[sym("map", "Data.List", 1)]);
        assert_eq!(ns.suggest_imports_for("map"), vec!["Data.List".to_string()]);
        assert!(ns.suggest_imports_for("nope").is_empty());
    }
}
