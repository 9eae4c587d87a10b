//! Namespace Store: a tree of nested scopes holding symbol declarations,
//! with qualified/unqualified resolution and same-name merging. Grounded
//! on `GlobalMap.cpp`'s parallel keyed maps and `resolveFullNamespace`.

use std::collections::HashMap;

use crate::error::NamespaceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    CustomElement,
    CustomStyle,
    CustomVar,
    TemplateElement,
    TemplateStyle,
    TemplateVar,
    Origin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub kind: SymbolKind,
    pub name: String,
    pub fully_qualified_name: String,
    pub source_file: String,
    pub line: usize,
    pub col: usize,
    pub ast_ref: Option<String>,
}

#[derive(Debug, Default)]
pub struct Namespace {
    pub name: String,
    pub children: HashMap<String, Namespace>,
    pub symbols: HashMap<(String, SymbolKind), SymbolEntry>,
    pub source_file: Option<String>,
}

impl Namespace {
    fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// Union `other` into `self`: children recursively merged, symbols
    /// unioned, identical `(name, kind)` pairs reported as conflicts.
    pub fn merge(&mut self, other: Namespace) -> Vec<SymbolEntry> {
        let mut conflicts = Vec::new();

        for (key, entry) in other.symbols {
            if let Some(existing) = self.symbols.get(&key) {
                conflicts.push(existing.clone());
            } else {
                self.symbols.insert(key, entry);
            }
        }

        for (name, child) in other.children {
            match self.children.remove(&name) {
                Some(mut existing) => {
                    conflicts.extend(existing.merge(child));
                    self.children.insert(name, existing);
                }
                None => {
                    self.children.insert(name, child);
                }
            }
        }

        conflicts
    }
}

/// RAII scope guard: entering a namespace on construction, exiting on
/// drop, so the scope stack stays well-formed even on early return.
pub struct ScopeGuard<'a> {
    store: &'a mut NamespaceStore,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.store.exit();
    }
}

#[derive(Debug)]
pub struct NamespaceStore {
    root: Namespace,
    stack: Vec<String>,
}

impl Default for NamespaceStore {
    fn default() -> Self {
        Self { root: Namespace::new(""), stack: Vec::new() }
    }
}

impl NamespaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `name` onto the scope stack, creating it under the current
    /// namespace if it doesn't already exist.
    pub fn enter(&mut self, name: &str) {
        {
            let current = self.current_mut();
            current.children.entry(name.to_string()).or_insert_with(|| Namespace::new(name));
        }
        self.stack.push(name.to_string());
    }

    /// Same as [`enter`](Self::enter) but returns a guard that calls
    /// [`exit`](Self::exit) on drop.
    pub fn enter_scoped(&mut self, name: &str) -> ScopeGuard<'_> {
        self.enter(name);
        ScopeGuard { store: self }
    }

    pub fn exit(&mut self) {
        self.stack.pop();
    }

    pub fn current(&self) -> String {
        self.stack.join("::")
    }

    fn current_mut(&mut self) -> &mut Namespace {
        let mut node = &mut self.root;
        for name in &self.stack {
            node = node.children.get_mut(name).expect("namespace stack invariant");
        }
        node
    }

    fn current_ref(&self) -> &Namespace {
        let mut node = &self.root;
        for name in &self.stack {
            node = node.children.get(name).expect("namespace stack invariant");
        }
        node
    }

    /// Insert `entry` into the current namespace. Returns the existing
    /// entry on an identical `(name, kind)` conflict.
    pub fn add_symbol(&mut self, entry: SymbolEntry) -> Result<(), NamespaceError> {
        let key = (entry.name.clone(), entry.kind);
        let current = self.current_mut();
        if let Some(existing) = current.symbols.get(&key) {
            return Err(NamespaceError::Conflict(entry.name.clone(), existing.clone()));
        }
        current.symbols.insert(key, entry);
        Ok(())
    }

    /// Unqualified lookup: current namespace, then root. No walk between.
    pub fn find(&self, name: &str, kind: Option<SymbolKind>) -> Option<&SymbolEntry> {
        find_in(self.current_ref(), name, kind).or_else(|| find_in(&self.root, name, kind))
    }

    /// Qualified lookup: `A::B::sym` (or `A.B.sym`, normalized to `::`)
    /// walks children greedily from the current namespace, retrying from
    /// the root if not found.
    pub fn resolve(&self, qualified: &str) -> Option<&SymbolEntry> {
        let normalized = qualified.replace('.', "::");
        let mut parts: Vec<&str> = normalized.split("::").collect();
        let symbol_name = parts.pop()?;

        resolve_from(self.current_ref(), &parts, symbol_name)
            .or_else(|| resolve_from(&self.root, &parts, symbol_name))
    }

    pub fn merge_at_root(&mut self, name: &str, other: Namespace) -> Vec<SymbolEntry> {
        match self.root.children.remove(name) {
            Some(mut existing) => {
                let conflicts = existing.merge(other);
                self.root.children.insert(name.to_string(), existing);
                conflicts
            }
            None => {
                self.root.children.insert(name.to_string(), other);
                Vec::new()
            }
        }
    }
}

fn find_in(ns: &Namespace, name: &str, kind: Option<SymbolKind>) -> Option<&SymbolEntry> {
    ns.symbols.iter().find(|((n, k), _)| n == name && kind.is_none_or(|wanted| *k == wanted)).map(|(_, v)| v)
}

fn resolve_from<'a>(ns: &'a Namespace, path: &[&str], symbol_name: &str) -> Option<&'a SymbolEntry> {
    let mut node = ns;
    for segment in path {
        node = node.children.get(*segment)?;
    }
    find_in(node, symbol_name, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: SymbolKind) -> SymbolEntry {
        SymbolEntry {
            kind,
            name: name.to_string(),
            fully_qualified_name: name.to_string(),
            source_file: "a.chtl".to_string(),
            line: 1,
            col: 1,
            ast_ref: None,
        }
    }

    #[test]
    fn duplicate_name_and_kind_conflicts() {
        let mut store = NamespaceStore::new();
        store.add_symbol(entry("Box", SymbolKind::CustomElement)).unwrap();
        let conflict = store.add_symbol(entry("Box", SymbolKind::CustomElement));
        assert!(conflict.is_err());
    }

    #[test]
    fn scoped_guard_restores_previous_namespace_on_drop() {
        let mut store = NamespaceStore::new();
        {
            let _guard = store.enter_scoped("Outer");
            assert_eq!(store.current(), "Outer");
        }
        assert_eq!(store.current(), "");
    }

    #[test]
    fn qualified_resolution_walks_children_then_retries_from_root() {
        let mut store = NamespaceStore::new();
        store.enter("Foo");
        store.add_symbol(entry("Thing", SymbolKind::TemplateElement)).unwrap();
        store.exit();

        assert!(store.resolve("Foo::Thing").is_some());
        assert!(store.resolve("Foo.Thing").is_some());
    }

    #[test]
    fn merge_unions_symbols_and_reports_conflicts() {
        let mut a = Namespace::new("Foo");
        a.symbols.insert(("X".to_string(), SymbolKind::CustomStyle), entry("X", SymbolKind::CustomStyle));

        let mut b = Namespace::new("Foo");
        b.symbols.insert(("X".to_string(), SymbolKind::CustomStyle), entry("X", SymbolKind::CustomStyle));
        b.symbols.insert(("Y".to_string(), SymbolKind::CustomStyle), entry("Y", SymbolKind::CustomStyle));

        let conflicts = a.merge(b);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(a.symbols.len(), 2);
    }
}
