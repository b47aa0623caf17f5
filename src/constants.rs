//! Codec limits and well-known torrent keys.
//!
//! The buffer size mirrors the chunk size used by desktop indexers when
//! streaming `.torrent` files; the depth limit matches what common clients
//! accept for metainfo and DHT payloads.

// ============================================================================
// Decoder limits
// ============================================================================

/// Maximum nesting of lists and dictionaries accepted by the decoder.
pub const MAX_DEPTH: usize = 64;

/// Longest integer body (between `i` and `e`) accepted in strict mode.
/// `-9223372036854775808` is the longest canonical `i64`.
pub const MAX_INTEGER_LEN: usize = 20;

/// Longest integer body accepted in lenient mode, where leading zeros and a
/// `+` sign are allowed.
pub const MAX_LENIENT_INTEGER_LEN: usize = 64;

/// Chunk size used by [`ReaderCursor`](crate::bencode::ReaderCursor) refills.
pub const READ_BUFFER_SIZE: usize = 4096;

// ============================================================================
// Metainfo keys (BEP-3)
// ============================================================================

pub const KEY_ANNOUNCE: &str = "announce";
pub const KEY_CREATION_DATE: &str = "creation date";
pub const KEY_COMMENT: &str = "comment";
pub const KEY_INFO: &str = "info";
pub const KEY_NAME: &str = "name";
pub const KEY_LENGTH: &str = "length";
pub const KEY_FILES: &str = "files";
pub const KEY_PATH: &str = "path";
pub const KEY_PIECE_LENGTH: &str = "piece length";
