//! torrent-bencode - Bencode codec and torrent metainfo access
//!
//! This library decodes and encodes the bencoding format ([BEP-3]) used by
//! `.torrent` files, and offers a small metainfo layer for reading and
//! rewriting the descriptive fields of a torrent.
//!
//! # Modules
//!
//! - [`bencode`] - Streaming decoder, canonical encoder, and value model
//! - [`metainfo`] - Torrent summaries, info hashes, and field rewriting
//! - [`constants`] - Decoder limits and well-known metainfo keys
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

pub mod bencode;
pub mod constants;
pub mod metainfo;

pub use bencode::{
    decode, decode_reader, encode, encode_to, BencodeError, ByteCursor, DecodeOptions, Decoder,
    Kind, Value,
};
pub use metainfo::{FileEntry, InfoHash, MetainfoError, TorrentFile, TorrentSummary};
