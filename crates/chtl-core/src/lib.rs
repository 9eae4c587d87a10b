//! # chtl-core
//!
//! Path canonicalization and the unified scanner: the two leaf components
//! every other CHTL compiler crate builds on.

pub mod error;
pub mod fragment;
pub mod path;
pub mod scanner;

pub use error::CoreError;
pub use fragment::{Diagnostic, Fragment, FragmentKind};
pub use path::canonicalize;
pub use scanner::scan;
