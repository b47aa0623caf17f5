use thiserror::Error;

use crate::bencode::BencodeError;

/// Errors that can occur when reading or rewriting torrent files.
#[derive(Debug, Error)]
pub enum MetainfoError {
    /// The torrent file contains invalid bencode.
    #[error("bencode error: {0}")]
    Bencode(#[from] BencodeError),

    /// A required field is missing from the torrent file.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A field is present but has the wrong type or an unusable value.
    #[error("invalid field: {0}")]
    InvalidField(&'static str),

    /// The info hash has an invalid length (must be 20 bytes).
    #[error("invalid info hash length")]
    InvalidInfoHashLength,

    /// An I/O error occurred while reading or writing the torrent file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
