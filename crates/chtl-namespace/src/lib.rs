//! Nested namespace scope store: enter/exit scopes, declare symbols,
//! resolve qualified and unqualified names, and merge same-named
//! sibling namespaces discovered across imported files.

pub mod error;
pub mod store;

pub use error::NamespaceError;
pub use store::{Namespace, NamespaceStore, ScopeGuard, SymbolEntry, SymbolKind};
