use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("{path} is a directory, not a file")]
    IsADirectory { path: PathBuf },

    #[error("could not resolve {path} from {current_file} (searched: {searched:?})")]
    NotFound { path: String, current_file: PathBuf, searched: Vec<PathBuf> },
}

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("self-import: {0:?}")]
    SelfEdge(PathBuf),

    #[error("import cycle detected: {0:?}")]
    Cycle(Vec<PathBuf>),
}
