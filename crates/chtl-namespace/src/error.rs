use thiserror::Error;

use crate::store::SymbolEntry;

#[derive(Debug, Error)]
pub enum NamespaceError {
    #[error("symbol {0:?} already declared with kind {1:?}")]
    Conflict(String, SymbolEntry),
}
