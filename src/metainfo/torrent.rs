use super::error::MetainfoError;
use super::info_hash::InfoHash;
use super::summary::TorrentSummary;
use crate::bencode::{decode, decode_reader, Kind, Value};
use crate::constants::{KEY_COMMENT, KEY_INFO, KEY_NAME};
use bytes::Bytes;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, warn};

/// An editable torrent file.
///
/// Holds the whole decoded tree so that rewriting one field and saving
/// keeps every other key, including ones this crate knows nothing about.
/// Saving always produces the canonical encoding.
///
/// # Examples
///
/// ```
/// use torrent_bencode::metainfo::TorrentFile;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut torrent = TorrentFile::from_bytes(b"d4:infod6:lengthi1e4:name3:oldee")?;
/// torrent.set_name("new/")?;
/// torrent.set_comment("hello")?;
///
/// assert_eq!(
///     torrent.to_bytes()?,
///     b"d7:comment5:hello4:infod6:lengthi1e4:name3:newee"
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentFile {
    root: Value,
}

impl TorrentFile {
    /// Wraps an already decoded tree. The root must be a dictionary.
    pub fn from_value(root: Value) -> Result<Self, MetainfoError> {
        if root.kind() != Kind::Dict {
            return Err(MetainfoError::InvalidField("root"));
        }
        Ok(Self { root })
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, MetainfoError> {
        Self::from_value(decode(data)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MetainfoError> {
        Self::from_value(decode_reader(reader)?)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, MetainfoError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_reader(file).map_err(|e| {
            debug!(path = %path.display(), error = %e, "invalid torrent file");
            e
        })
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    pub fn summary(&self) -> Result<TorrentSummary, MetainfoError> {
        TorrentSummary::from_value(&self.root)
    }

    pub fn info_hash(&self) -> Result<InfoHash, MetainfoError> {
        let info = self
            .root
            .get(KEY_INFO.as_bytes())
            .ok_or(MetainfoError::MissingField(KEY_INFO))?;
        InfoHash::from_info(info)
    }

    /// Replaces the top-level comment, adding one if the torrent has none.
    pub fn set_comment(&mut self, comment: &str) -> Result<(), MetainfoError> {
        let payload = Bytes::copy_from_slice(comment.as_bytes());
        match self.root.get_mut(KEY_COMMENT.as_bytes()) {
            Some(existing) => existing
                .set_bytes(payload)
                .map_err(|_| MetainfoError::InvalidField(KEY_COMMENT)),
            None => {
                self.root.insert(KEY_COMMENT, payload)?;
                Ok(())
            }
        }
    }

    /// Replaces `info.name`. Trailing slashes added for display are dropped.
    pub fn set_name(&mut self, name: &str) -> Result<(), MetainfoError> {
        let name = name.trim_end_matches('/');

        let Some(info) = self.root.get_mut(KEY_INFO.as_bytes()) else {
            warn!("cannot rename torrent without an info dictionary");
            return Err(MetainfoError::MissingField(KEY_INFO));
        };
        if info.kind() != Kind::Dict {
            return Err(MetainfoError::InvalidField(KEY_INFO));
        }

        let Some(field) = info.get_mut(KEY_NAME.as_bytes()) else {
            warn!("cannot rename torrent without info.name");
            return Err(MetainfoError::MissingField(KEY_NAME));
        };
        field
            .set_bytes(Bytes::copy_from_slice(name.as_bytes()))
            .map_err(|_| MetainfoError::InvalidField(KEY_NAME))
    }

    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<(), MetainfoError> {
        self.root.encode_to(sink)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, MetainfoError> {
        Ok(self.root.to_bytes()?)
    }

    /// Encodes the torrent and replaces the file at `path`.
    ///
    /// The file is only touched once encoding has succeeded.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MetainfoError> {
        let encoded = self.to_bytes()?;
        std::fs::write(path, encoded)?;
        Ok(())
    }
}
