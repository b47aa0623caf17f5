//! Torrent metainfo access ([BEP-3]).
//!
//! A thin layer over [`crate::bencode`] for the two things desktop tools do
//! with `.torrent` files: pull out a handful of descriptive fields, and
//! rewrite a field before saving the file back.
//!
//! # Examples
//!
//! ## Reading the descriptive fields
//!
//! ```no_run
//! use torrent_bencode::metainfo::TorrentSummary;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = std::fs::File::open("example.torrent")?;
//! let summary = TorrentSummary::from_reader(file)?;
//!
//! println!("Name: {:?}", summary.display_name());
//! println!("Tracker: {:?}", summary.announce);
//! println!("Total size: {:?} bytes", summary.length);
//! for file in &summary.files {
//!     println!("  {} ({} bytes)", file.path, file.length);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Rewriting a field
//!
//! ```no_run
//! use torrent_bencode::metainfo::TorrentFile;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut torrent = TorrentFile::open("example.torrent")?;
//! torrent.set_comment("mirrored from the project site")?;
//! torrent.save("example.torrent")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Torrent Structure
//!
//! - **announce** - Primary tracker URL
//! - **creation date** - Unix timestamp when created
//! - **comment** - Optional comment
//! - **info** - Core torrent metadata (hashed to create the info hash)
//!   - `name` - Suggested file/directory name
//!   - `piece length` - Size of each piece in bytes
//!   - `length` - Total size (single-file) OR `files` list (multi-file),
//!     each entry holding `length` and a `path` list
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod error;
mod info_hash;
mod summary;
mod torrent;

pub use error::MetainfoError;
pub use info_hash::InfoHash;
pub use summary::{FileEntry, TorrentSummary};
pub use torrent::TorrentFile;
