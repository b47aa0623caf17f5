use super::encode;
use super::error::BencodeError;
use bytes::Bytes;
use indexmap::IndexMap;
use std::fmt;
use std::io::Write;

/// Dictionary storage.
///
/// Keys keep the order in which they were inserted (or decoded). That order
/// is visible through iteration but never reaches the wire: the encoder
/// always writes keys in ascending byte order.
pub type Dict = IndexMap<Bytes, Value>;

/// The four bencode value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Integer,
    Bytes,
    List,
    Dict,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Integer => "integer",
            Kind::Bytes => "byte string",
            Kind::List => "list",
            Kind::Dict => "dictionary",
        };
        f.write_str(name)
    }
}

/// A bencode value.
///
/// Each list or dictionary owns its children outright, so a decoded value is
/// always a tree. Equality is structural; two dictionaries are equal when
/// they hold the same entries, whatever their storage order.
///
/// # Examples
///
/// ```
/// use torrent_bencode::bencode::{Kind, Value};
///
/// let int: Value = 42i64.into();
/// let string: Value = "hello".into();
/// let list = Value::List(vec![int.clone(), string.clone()]);
///
/// assert_eq!(int.kind(), Kind::Integer);
/// assert_eq!(string.as_str(), Some("hello"));
/// assert_eq!(list.index(1).unwrap(), &string);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A byte string (may or may not be valid UTF-8).
    Bytes(Bytes),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A dictionary keyed by byte strings.
    Dict(Dict),
}

impl Value {
    /// Creates a byte string value from a UTF-8 string.
    pub fn string(s: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Creates a byte string value from raw bytes.
    pub fn bytes(b: impl Into<Bytes>) -> Self {
        Value::Bytes(b.into())
    }

    /// Creates an empty dictionary.
    pub fn dict() -> Self {
        Value::Dict(Dict::new())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Integer(_) => Kind::Integer,
            Value::Bytes(_) => Kind::Bytes,
            Value::List(_) => Kind::List,
            Value::Dict(_) => Kind::Dict,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as a UTF-8 string.
    ///
    /// Returns `None` if the value is not a byte string or if the bytes are
    /// not valid UTF-8. Integers are never rendered as text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Consumes the value and returns the dictionary, if it is one.
    pub fn into_dict(self) -> Option<Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Consumes the value and returns the list, if it is one.
    pub fn into_list(self) -> Option<Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Looks up a key in this value if it is a dictionary.
    ///
    /// Returns `None` if the value is not a dictionary or if the key is not
    /// present. A missing key is absence, not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use torrent_bencode::bencode::decode;
    ///
    /// let value = decode(b"d3:foo3:bare").unwrap();
    /// assert_eq!(value.get(b"foo").and_then(|v| v.as_str()), Some("bar"));
    /// assert_eq!(value.get(b"missing"), None);
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.as_dict()?.get(key)
    }

    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut Value> {
        self.as_dict_mut()?.get_mut(key)
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    pub fn get_integer(&self, key: &[u8]) -> Option<i64> {
        self.get(key)?.as_integer()
    }

    pub fn get_bytes(&self, key: &[u8]) -> Option<&Bytes> {
        self.get(key)?.as_bytes()
    }

    pub fn get_str(&self, key: &[u8]) -> Option<&str> {
        self.get(key)?.as_str()
    }

    pub fn get_list(&self, key: &[u8]) -> Option<&Vec<Value>> {
        self.get(key)?.as_list()
    }

    pub fn get_dict(&self, key: &[u8]) -> Option<&Dict> {
        self.get(key)?.as_dict()
    }

    /// Follows a chain of dictionary keys.
    ///
    /// ```
    /// use torrent_bencode::bencode::decode;
    ///
    /// let value = decode(b"d4:infod4:name3:fooee").unwrap();
    /// let name = value.get_path(&[b"info", b"name"]).unwrap();
    /// assert_eq!(name.as_str(), Some("foo"));
    /// ```
    pub fn get_path(&self, path: &[&[u8]]) -> Option<&Value> {
        path.iter().try_fold(self, |value, key| value.get(key))
    }

    pub fn get_path_mut(&mut self, path: &[&[u8]]) -> Option<&mut Value> {
        path.iter().try_fold(self, |value, key| value.get_mut(key))
    }

    /// Returns the list element at `index`.
    ///
    /// # Errors
    ///
    /// [`BencodeError::IndexOutOfRange`] if `index >= len`, or
    /// [`BencodeError::UnexpectedKind`] if the value is not a list.
    pub fn index(&self, index: usize) -> Result<&Value, BencodeError> {
        let list = self.as_list().ok_or(BencodeError::UnexpectedKind {
            expected: Kind::List,
            found: self.kind(),
        })?;
        list.get(index).ok_or(BencodeError::IndexOutOfRange {
            index,
            len: list.len(),
        })
    }

    pub fn index_mut(&mut self, index: usize) -> Result<&mut Value, BencodeError> {
        let found = self.kind();
        let list = self.as_list_mut().ok_or(BencodeError::UnexpectedKind {
            expected: Kind::List,
            found,
        })?;
        let len = list.len();
        list.get_mut(index)
            .ok_or(BencodeError::IndexOutOfRange { index, len })
    }

    pub fn index_integer(&self, index: usize) -> Result<Option<i64>, BencodeError> {
        Ok(self.index(index)?.as_integer())
    }

    pub fn index_bytes(&self, index: usize) -> Result<Option<&Bytes>, BencodeError> {
        Ok(self.index(index)?.as_bytes())
    }

    pub fn index_list(&self, index: usize) -> Result<Option<&Vec<Value>>, BencodeError> {
        Ok(self.index(index)?.as_list())
    }

    pub fn index_dict(&self, index: usize) -> Result<Option<&Dict>, BencodeError> {
        Ok(self.index(index)?.as_dict())
    }

    /// Replaces the payload of a byte string in place.
    ///
    /// # Examples
    ///
    /// ```
    /// use torrent_bencode::bencode::{decode, encode};
    ///
    /// let mut value = decode(b"d7:comment3:olde").unwrap();
    /// value.get_mut(b"comment").unwrap().set_bytes("brand new").unwrap();
    /// assert_eq!(encode(&value).unwrap(), b"d7:comment9:brand newe");
    /// ```
    ///
    /// # Errors
    ///
    /// [`BencodeError::UnexpectedKind`] if the value is not a byte string.
    pub fn set_bytes(&mut self, bytes: impl Into<Bytes>) -> Result<(), BencodeError> {
        match self {
            Value::Bytes(b) => {
                *b = bytes.into();
                Ok(())
            }
            other => Err(BencodeError::UnexpectedKind {
                expected: Kind::Bytes,
                found: other.kind(),
            }),
        }
    }

    /// Inserts `value` under `key`, returning the previous value if any.
    ///
    /// # Errors
    ///
    /// [`BencodeError::UnexpectedKind`] if the value is not a dictionary.
    pub fn insert(
        &mut self,
        key: impl Into<Bytes>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, BencodeError> {
        let found = self.kind();
        let dict = self.as_dict_mut().ok_or(BencodeError::UnexpectedKind {
            expected: Kind::Dict,
            found,
        })?;
        Ok(dict.insert(key.into(), value.into()))
    }

    /// Writes the canonical encoding of this value to `sink`.
    pub fn encode_to<W: Write>(&self, sink: &mut W) -> Result<(), BencodeError> {
        encode::encode_to(self, sink)
    }

    /// Returns the canonical encoding of this value.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BencodeError> {
        encode::encode(self)
    }

    /// Number of bytes the canonical encoding of this value occupies.
    pub fn encoded_len(&self) -> usize {
        encode::encoded_len(self)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Bytes(Bytes::from(s))
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<Dict> for Value {
    fn from(d: Dict) -> Self {
        Value::Dict(d)
    }
}
