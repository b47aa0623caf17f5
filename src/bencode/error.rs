use thiserror::Error;

use super::value::Kind;

/// Errors produced while decoding, encoding, or navigating bencode values.
///
/// Every decode error carries the byte offset at which it was detected.
#[derive(Debug, Error)]
pub enum BencodeError {
    /// The source ran out in the middle of a value.
    #[error("unexpected end of input at byte {position}")]
    UnexpectedEof { position: usize },

    /// A byte that cannot start a value (or a non-string dictionary key).
    #[error("invalid encoding: unexpected byte 0x{byte:02x} at byte {position}")]
    InvalidEncoding { byte: u8, position: usize },

    /// The text between `i` and `e` is not an acceptable integer.
    #[error("malformed integer {text:?} at byte {position}")]
    MalformedInteger { text: String, position: usize },

    /// A byte string length prefix is empty, padded, or too large.
    #[error("malformed string length at byte {position}")]
    MalformedLength { position: usize },

    #[error("expected {expected:?} at byte {position}, found 0x{found:02x}")]
    MissingDelimiter {
        expected: char,
        found: u8,
        position: usize,
    },

    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("expected {expected}, found {found}")]
    UnexpectedKind { expected: Kind, found: Kind },

    /// A dictionary repeated a key while duplicates are rejected.
    #[error("duplicate dictionary key {key:?} at byte {position}")]
    DuplicateKey { key: String, position: usize },

    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("trailing data after value at byte {position}")]
    TrailingData { position: usize },

    /// Reading from a streamed source failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing encoded bytes to the sink failed or came up short.
    #[error("sink write error: {0}")]
    SinkWrite(#[source] std::io::Error),
}
