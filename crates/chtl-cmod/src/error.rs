use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructuralError {
    #[error("{0:?} is missing a src/ directory")]
    MissingSrc(String),

    #[error("{0:?} is missing an info/ directory")]
    MissingInfo(String),

    #[error("module name {actual:?} does not match expected {expected:?} in {context}")]
    NameMismatch { expected: String, actual: String, context: String },

    #[error("{0:?} has no sub-modules and no src/{0}.chtl")]
    MissingMainSource(String),

    #[error("malformed [Info] block: {0}")]
    MalformedInfo(String),

    #[error("required info field missing: {0}")]
    MissingRequiredField(String),
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("bad magic bytes: expected `CHTLCMOD`, found {0:?}")]
    BadMagic(Vec<u8>),

    #[error("unsupported archive version: {0}")]
    UnsupportedVersion(u32),

    #[error("CRC mismatch for entry {name:?}: expected {expected:#010x}, found {actual:#010x}")]
    CrcMismatch { name: String, expected: u32, actual: u32 },

    #[error("decompressed size mismatch for entry {name:?}: expected {expected}, found {actual}")]
    SizeMismatch { name: String, expected: u32, actual: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("compiler version {compiler} is outside module range [{min}, {max}]")]
    OutOfRange { compiler: String, min: String, max: String },

    #[error("malformed version string: {0:?}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum CmodError {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("import cycle among module dependencies: {0:?}")]
    DependencyCycle(Vec<String>),

    #[error("module {0:?} not found in any search path")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
