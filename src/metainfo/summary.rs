use super::error::MetainfoError;
use crate::bencode::{decode, decode_reader, Kind, Value};
use crate::constants::{
    KEY_ANNOUNCE, KEY_COMMENT, KEY_CREATION_DATE, KEY_FILES, KEY_INFO, KEY_LENGTH, KEY_NAME,
    KEY_PATH, KEY_PIECE_LENGTH,
};
use std::io::Read;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

/// A file listed in a torrent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path components joined with `/`. For single-file torrents this is the
    /// torrent name.
    pub path: String,
    /// Size of the file in bytes.
    pub length: u64,
}

/// The descriptive fields of a torrent, as shown by file managers and
/// search indexers.
///
/// Absent keys come back as `None`. A key that is present but holds the
/// wrong kind of value makes the whole torrent invalid.
///
/// # Examples
///
/// ```
/// use torrent_bencode::metainfo::TorrentSummary;
///
/// let data = b"d8:announce20:http://a.example/ann4:infod6:lengthi100e4:name5:abcdeee";
/// let summary = TorrentSummary::from_bytes(data).unwrap();
///
/// assert_eq!(summary.announce.as_deref(), Some("http://a.example/ann"));
/// assert_eq!(summary.name.as_deref(), Some("abcde"));
/// assert_eq!(summary.length, Some(100));
/// assert_eq!(summary.file_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TorrentSummary {
    /// Primary tracker URL.
    pub announce: Option<String>,
    /// Unix timestamp when the torrent was created.
    pub creation_date: Option<i64>,
    /// Optional comment about the torrent.
    pub comment: Option<String>,
    /// Suggested name for the file or directory.
    pub name: Option<String>,
    /// Number of bytes per piece.
    pub piece_length: Option<i64>,
    /// Total size of all files, when an `info` dictionary is present.
    pub length: Option<u64>,
    /// Files in the torrent; empty when there is no `info` dictionary.
    pub files: Vec<FileEntry>,
    /// True when `info` carries a `files` list instead of a `length`.
    pub multi_file: bool,
}

impl TorrentSummary {
    pub fn from_value(root: &Value) -> Result<Self, MetainfoError> {
        summarize(root).map_err(|e| {
            debug!(error = %e, "rejecting torrent metadata");
            e
        })
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, MetainfoError> {
        let value = decode(data).map_err(|e| {
            debug!(error = %e, "torrent is not valid bencode");
            e
        })?;
        Self::from_value(&value)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MetainfoError> {
        let value = decode_reader(reader).map_err(|e| {
            debug!(error = %e, "torrent is not valid bencode");
            e
        })?;
        Self::from_value(&value)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// The name as a file manager shows it: torrents holding more than one
    /// file get a trailing `/`.
    pub fn display_name(&self) -> Option<String> {
        let name = self.name.as_ref()?;
        if self.files.len() > 1 && !name.ends_with('/') {
            Some(format!("{}/", name))
        } else {
            Some(name.clone())
        }
    }

    /// The creation date as a point in time.
    pub fn creation_date_utc(&self) -> Option<SystemTime> {
        let secs = self.creation_date?;
        let offset = Duration::from_secs(secs.unsigned_abs());
        if secs >= 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        }
    }
}

fn summarize(root: &Value) -> Result<TorrentSummary, MetainfoError> {
    if root.kind() != Kind::Dict {
        return Err(MetainfoError::InvalidField("root"));
    }

    let mut summary = TorrentSummary {
        announce: string_field(root, KEY_ANNOUNCE)?,
        creation_date: integer_field(root, KEY_CREATION_DATE)?,
        comment: string_field(root, KEY_COMMENT)?,
        ..Default::default()
    };

    let Some(info) = typed_field(root, KEY_INFO, Kind::Dict)? else {
        return Ok(summary);
    };

    summary.name = string_field(info, KEY_NAME)?;
    summary.piece_length = integer_field(info, KEY_PIECE_LENGTH)?;

    match integer_field(info, KEY_LENGTH)? {
        Some(length) => {
            let length =
                u64::try_from(length).map_err(|_| MetainfoError::InvalidField(KEY_LENGTH))?;
            summary.files = vec![FileEntry {
                path: summary.name.clone().unwrap_or_default(),
                length,
            }];
        }
        None => {
            let files = typed_field(info, KEY_FILES, Kind::List)?
                .ok_or(MetainfoError::MissingField(KEY_FILES))?;
            summary.files = parse_files(files)?;
            summary.multi_file = true;
        }
    }

    let total = summary
        .files
        .iter()
        .try_fold(0u64, |acc, file| acc.checked_add(file.length))
        .ok_or(MetainfoError::InvalidField(KEY_LENGTH))?;
    summary.length = Some(total);

    Ok(summary)
}

fn parse_files(files: &Value) -> Result<Vec<FileEntry>, MetainfoError> {
    let invalid = || MetainfoError::InvalidField(KEY_FILES);
    let entries = files.as_list().ok_or_else(invalid)?;

    entries
        .iter()
        .map(|entry| {
            if entry.kind() != Kind::Dict {
                return Err(invalid());
            }

            let length = entry
                .get_integer(KEY_LENGTH.as_bytes())
                .and_then(|l| u64::try_from(l).ok())
                .ok_or_else(invalid)?;

            let components = entry.get_list(KEY_PATH.as_bytes()).ok_or_else(invalid)?;
            let path = components
                .iter()
                .map(|c| c.as_bytes().map(|b| String::from_utf8_lossy(b).into_owned()))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(invalid)?
                .join("/");

            Ok(FileEntry { path, length })
        })
        .collect()
}

/// Looks up `key`, failing if it is present with a kind other than `kind`.
fn typed_field<'a>(
    dict: &'a Value,
    key: &'static str,
    kind: Kind,
) -> Result<Option<&'a Value>, MetainfoError> {
    match dict.get(key.as_bytes()) {
        None => Ok(None),
        Some(value) if value.kind() == kind => Ok(Some(value)),
        Some(_) => Err(MetainfoError::InvalidField(key)),
    }
}

fn string_field(dict: &Value, key: &'static str) -> Result<Option<String>, MetainfoError> {
    Ok(typed_field(dict, key, Kind::Bytes)?
        .and_then(Value::as_bytes)
        .map(|b| String::from_utf8_lossy(b).into_owned()))
}

fn integer_field(dict: &Value, key: &'static str) -> Result<Option<i64>, MetainfoError> {
    Ok(typed_field(dict, key, Kind::Integer)?.and_then(Value::as_integer))
}
