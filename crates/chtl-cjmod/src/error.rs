use thiserror::Error;

#[derive(Debug, Error)]
pub enum CjmodError {
    #[error("malformed CJMOD pattern: {0}")]
    MalformedPattern(String),

    #[error("no slot named {0:?}")]
    UnknownSlot(String),

    #[error("unbalanced argument list for {0:?}")]
    UnbalancedArguments(String),
}
