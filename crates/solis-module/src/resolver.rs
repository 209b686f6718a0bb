//! Resolves hierarchical module names (`Data.List`) to file paths
//! (`Data/List.solis`), with circular-import tracking.
//!
//! Grounded on `ModuleResolver` (`module_resolver.hpp`/`.cpp`): same search
//! order (stdlib, current dir, working dir, extra paths, prelude), same
//! `.` → path-separator rewrite plus `.solis` suffix. The original returns a
//! canonicalized path via `std::filesystem::canonical`; `std::fs::canonicalize`
//! plays the same role here.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

/// Search-path configuration, mirroring `ModuleResolver::Config`.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub stdlib_path: Option<PathBuf>,
    pub prelude_path: Option<PathBuf>,
    pub additional_paths: Vec<PathBuf>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            stdlib_path: Some(PathBuf::from("src/solis/std")),
            prelude_path: Some(PathBuf::from("src/solis/prelude")),
            additional_paths: Vec::new(),
        }
    }
}

/// Resolves module names to file paths and tracks which modules have
/// already been loaded, so an import cycle can be detected rather than
/// recursing forever.
pub struct ModuleResolver {
    config: ResolverConfig,
    loaded: FxHashSet<String>,
}

impl ModuleResolver {
    pub fn new(config: ResolverConfig) -> Self {
        ModuleResolver { config, loaded: FxHashSet::default() }
    }

    /// `"Data.List"` -> `"Data/List.solis"`.
    pub fn module_name_to_path(module_name: &str) -> PathBuf {
        let mut path = module_name.replace('.', std::path::MAIN_SEPARATOR_STR);
        path.push_str(".solis");
        PathBuf::from(path)
    }

    /// Every base directory to search, in priority order: stdlib, the
    /// importing file's directory, the process working directory, any
    /// configured extra paths, then the prelude.
    pub fn search_paths(&self, current_dir: &Path) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(stdlib) = &self.config.stdlib_path {
            paths.push(stdlib.clone());
        }
        if !current_dir.as_os_str().is_empty() {
            paths.push(current_dir.to_path_buf());
        }
        paths.push(PathBuf::from("."));
        paths.extend(self.config.additional_paths.iter().cloned());
        if let Some(prelude) = &self.config.prelude_path {
            paths.push(prelude.clone());
        }
        paths
    }

    /// Resolves `module_name` to a canonical file path, searching
    /// [`Self::search_paths`] in order and returning the first hit.
    pub fn resolve_module(&self, module_name: &str, current_dir: &Path) -> Option<PathBuf> {
        let rel_path = Self::module_name_to_path(module_name);
        for base in self.search_paths(current_dir) {
            if let Some(found) = try_find(&base, &rel_path) {
                return Some(found);
            }
        }
        None
    }

    pub fn is_loaded(&self, module_name: &str) -> bool {
        self.loaded.contains(module_name)
    }

    pub fn mark_loaded(&mut self, module_name: &str) {
        self.loaded.insert(module_name.to_string());
    }

    /// Resets loaded-module tracking; used by the REPL's `:reload`.
    pub fn clear_loaded_modules(&mut self) {
        self.loaded.clear();
    }
}

fn try_find(base: &Path, rel_path: &Path) -> Option<PathBuf> {
    let full_path = if base.as_os_str().is_empty() || base == Path::new(".") {
        rel_path.to_path_buf()
    } else {
        base.join(rel_path)
    };
    if full_path.exists() {
        std::fs::canonicalize(&full_path).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_name_to_path_rewrites_dots_and_adds_suffix() {
        let path = ModuleResolver::module_name_to_path("Data.List");
        assert_eq!(path.to_string_lossy().replace('\\', "/"), "Data/List.solis");
    }

    #[test]
    fn search_paths_follow_stdlib_then_current_then_cwd_then_extra_then_prelude() {
        let config = ResolverConfig {
            stdlib_path: Some(PathBuf::from("std")),
            prelude_path: Some(PathBuf::from("prelude")),
            additional_paths: vec![PathBuf::from("extra")],
        };
        let resolver = ModuleResolver::new(config);
        let paths = resolver.search_paths(Path::new("proj"));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("std"),
                PathBuf::from("proj"),
                PathBuf::from("."),
                PathBuf::from("extra"),
                PathBuf::from("prelude"),
            ]
        );
    }

    #[test]
    fn unresolvable_module_returns_none() {
        let resolver = ModuleResolver::new(ResolverConfig {
            stdlib_path: None,
            prelude_path: None,
            additional_paths: Vec::new(),
        });
        assert!(resolver.resolve_module("DoesNotExist.AtAll", Path::new(".")).is_none());
    }

    #[test]
    fn loaded_tracking_round_trips() {
        let mut resolver = ModuleResolver::new(ResolverConfig::default());
        assert!(!resolver.is_loaded("Data.List"));
        resolver.mark_loaded("Data.List");
        assert!(resolver.is_loaded("Data.List"));
        resolver.clear_loaded_modules();
        assert!(!resolver.is_loaded("Data.List"));
    }
}
