//! Loads an entry-point source file together with every module it
//! transitively `import`s, via [`solis_module::ModuleResolver`].
//!
//! Neither `solis-typeck` nor `solis-eval` understands qualified or aliased
//! names, so a resolved import is inlined as plain source text ahead of its
//! importer rather than kept as a separate namespace -- the CLI is the one
//! place in the workspace that turns a module *name* into module *source*.

use std::path::Path;

use solis_module::{ModuleResolver, ResolverConfig};

/// Reads `entry_path` and every module it imports (transitively), inlining
/// them in dependency-first order into one combined source string.
pub fn load_with_imports(entry_path: &Path, resolver_config: ResolverConfig) -> Result<String, String> {
    let mut resolver = ModuleResolver::new(resolver_config);
    let mut combined = String::new();
    load_recursive(entry_path, &mut resolver, &mut combined)?;
    Ok(combined)
}

fn load_recursive(path: &Path, resolver: &mut ModuleResolver, combined: &mut String) -> Result<(), String> {
    let source = std::fs::read_to_string(path).map_err(|e| format!("failed to read '{}': {e}", path.display()))?;
    let (module, _) = solis_parser::parse(&source);
    let current_dir = path.parent().unwrap_or_else(|| Path::new("."));

    for import in &module.imports {
        if resolver.is_loaded(&import.module_name) {
            continue;
        }
        resolver.mark_loaded(&import.module_name);
        let import_path = resolver
            .resolve_module(&import.module_name, current_dir)
            .ok_or_else(|| format!("could not resolve module '{}'", import.module_name))?;
        load_recursive(&import_path, resolver, combined)?;
    }

    combined.push_str(&source);
    combined.push('\n');
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn a_file_with_no_imports_loads_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let main_path = dir.path().join("main.solis");
        std::fs::write(&main_path, "let main = 1").unwrap();

        let combined = load_with_imports(&main_path, ResolverConfig {
            stdlib_path: None,
            prelude_path: None,
            additional_paths: Vec::new(),
        })
        .unwrap();
        assert!(combined.contains("let main = 1"));
    }

    #[test]
    fn an_imported_module_is_inlined_before_its_importer() {
        let dir = tempfile::tempdir().unwrap();
        let helper_path = dir.path().join("Helper.solis");
        let mut helper_file = std::fs::File::create(&helper_path).unwrap();
        write!(helper_file, "let helper x = x").unwrap();

        let main_path = dir.path().join("main.solis");
        std::fs::write(&main_path, "import Helper\nlet main = helper 1").unwrap();

        let combined = load_with_imports(&main_path, ResolverConfig {
            stdlib_path: None,
            prelude_path: None,
            additional_paths: vec![dir.path().to_path_buf()],
        })
        .unwrap();

        let helper_pos = combined.find("let helper").unwrap();
        let main_pos = combined.find("let main").unwrap();
        assert!(helper_pos < main_pos);
    }

    #[test]
    fn an_unresolvable_import_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let main_path = dir.path().join("main.solis");
        std::fs::write(&main_path, "import DoesNotExist\nlet main = 1").unwrap();

        let result = load_with_imports(&main_path, ResolverConfig {
            stdlib_path: None,
            prelude_path: None,
            additional_paths: Vec::new(),
        });
        assert!(result.is_err());
    }
}
