//! Compile-time class name resolution
//!
//! Union members are compared after name resolution, so `A|B` is a
//! duplicate when `B` is imported as an alias of `A`. Aliases created at
//! runtime are not visible here.

use crate::ty::ClassName;
use rustc_hash::FxHashMap;

/// Resolves a class name as written to its canonical identity
pub trait NameResolver {
    /// Resolve a class name
    fn resolve_class(&self, name: &ClassName) -> ClassName;
}

/// Resolver that leaves every name unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImports;

impl NameResolver for NoImports {
    fn resolve_class(&self, name: &ClassName) -> ClassName {
        name.clone()
    }
}

/// Namespace and `use` imports in effect for a declaration
#[derive(Debug, Clone, Default)]
pub struct Imports {
    namespace: Option<String>,
    aliases: FxHashMap<String, String>,
}

impl Imports {
    /// Create an empty import table in the global namespace
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current namespace
    pub fn with_namespace(mut self, namespace: impl AsRef<str>) -> Self {
        let namespace = namespace.as_ref().trim_matches('\\');
        self.namespace = (!namespace.is_empty()).then(|| namespace.to_string());
        self
    }

    /// Register `use target as alias`
    pub fn add_use(&mut self, target: impl AsRef<str>, alias: impl AsRef<str>) -> &mut Self {
        let target = target.as_ref().trim_start_matches('\\').to_string();
        self.aliases
            .insert(alias.as_ref().to_ascii_lowercase(), target);
        self
    }

    /// Register `use target`, aliased to its last segment
    pub fn add_import(&mut self, target: impl AsRef<str>) -> &mut Self {
        let target = target.as_ref();
        let alias = target.rsplit('\\').next().unwrap_or(target).to_string();
        self.add_use(target, alias)
    }

    /// Current namespace, if any
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

impl NameResolver for Imports {
    fn resolve_class(&self, name: &ClassName) -> ClassName {
        if name.is_qualified() {
            return name.clone();
        }

        let written = name.as_str();
        let (first, rest) = match written.split_once('\\') {
            Some((first, rest)) => (first, Some(rest)),
            None => (written, None),
        };

        if let Some(target) = self.aliases.get(&first.to_ascii_lowercase()) {
            return match rest {
                Some(rest) => ClassName::qualified(format!("{}\\{}", target, rest)),
                None => ClassName::qualified(target),
            };
        }

        match &self.namespace {
            Some(ns) => ClassName::qualified(format!("{}\\{}", ns, written)),
            None => ClassName::qualified(written),
        }
    }
}
