use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("substitution rule has an empty pattern (replacement '{replacement}')")]
    EmptyPattern { replacement: String },
    #[error("exact-map entry has an empty source (destination '{destination}')")]
    EmptySource { destination: String },
    #[error("'{0}' is reserved for the fallback category and cannot be whitelisted")]
    ReservedCategory(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
