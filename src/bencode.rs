//! Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format used for `.torrent` metainfo files.
//!
//! # Data Types
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Decoding
//!
//! Decoding is a single recursive pass over a [`ByteCursor`]. The cursor may
//! sit on an in-memory buffer ([`SliceCursor`]) or on any [`std::io::Read`]
//! ([`ReaderCursor`]); the decoder cannot tell the difference.
//!
//! ```
//! use torrent_bencode::bencode::{decode, Value};
//!
//! let value = decode(b"d8:announce20:http://a.example/ann4:infod6:lengthi100e4:name5:abcdeee").unwrap();
//! assert_eq!(value.get_str(b"announce"), Some("http://a.example/ann"));
//! assert_eq!(value.get_path(&[b"info", b"length"]).and_then(Value::as_integer), Some(100));
//! ```
//!
//! # Encoding
//!
//! The encoder always produces the canonical form: dictionary keys are
//! written in ascending byte order regardless of how the dictionary stores
//! them.
//!
//! ```
//! use torrent_bencode::bencode::{decode, encode};
//!
//! let value = decode(b"d4:spami1e3:cowi2ee").unwrap();
//! assert_eq!(encode(&value).unwrap(), b"d3:cowi2e4:spami1ee");
//! ```
//!
//! # Error Handling
//!
//! Every operation reports failure through [`BencodeError`]:
//!
//! - [`BencodeError::UnexpectedEof`] - Input ended in the middle of a value
//! - [`BencodeError::InvalidEncoding`] - A byte that cannot start a value
//! - [`BencodeError::MalformedInteger`] / [`BencodeError::MalformedLength`] - Bad number text
//! - [`BencodeError::MissingDelimiter`] - A length prefix not followed by `:`
//! - [`BencodeError::IndexOutOfRange`] - List index past the end
//! - [`BencodeError::SinkWrite`] - The encoder's sink failed
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod cursor;
mod decode;
mod encode;
mod error;
mod value;

pub use cursor::{ByteCursor, ReaderCursor, SliceCursor};
pub use decode::{decode, decode_prefix, decode_reader, DecodeOptions, Decoder, DuplicateKeys, Strictness};
pub use encode::{encode, encode_to, encoded_len};
pub use error::BencodeError;
pub use value::{Dict, Kind, Value};

#[cfg(test)]
mod tests;
