use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SortError {
    #[error("index {index} out of range for slice of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("keys and indexes differ in length: {keys} != {indexes}")]
    LengthMismatch { keys: usize, indexes: usize },
    #[error("key registers hold {key_lanes} lanes but index registers hold {index_lanes}")]
    LaneMismatch { key_lanes: usize, index_lanes: usize },
}

pub type Result<T> = std::result::Result<T, SortError>;
