use super::cursor::{ByteCursor, ReaderCursor, SliceCursor};
use super::error::BencodeError;
use super::value::{Dict, Value};
use crate::constants::{MAX_DEPTH, MAX_INTEGER_LEN, MAX_LENIENT_INTEGER_LEN};
use bytes::Bytes;
use std::io::Read;
use tracing::{debug, trace};

/// How forgiving the decoder is about number formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Reject leading zeros, `-0`, and a leading `+`.
    #[default]
    Strict,
    /// Accept leading zeros in integers and lengths, `-0`, and a leading `+`
    /// on integers. Encoding still produces the canonical form.
    Lenient,
}

/// What to do when a dictionary repeats a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// The later value wins; the key keeps its first position.
    #[default]
    KeepLast,
    /// The earlier value wins; later ones are decoded and dropped.
    KeepFirst,
    /// Fail with [`BencodeError::DuplicateKey`].
    Reject,
}

/// Decoder policy.
///
/// ```
/// use torrent_bencode::bencode::{DecodeOptions, Decoder, DuplicateKeys, Strictness};
///
/// let decoder = Decoder::new(
///     DecodeOptions::new()
///         .strictness(Strictness::Lenient)
///         .duplicate_keys(DuplicateKeys::Reject),
/// );
/// assert_eq!(decoder.decode_all(b"i007e").unwrap().as_integer(), Some(7));
/// assert!(decoder.decode_all(b"d1:ai1e1:ai2ee").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub max_depth: usize,
    pub strictness: Strictness,
    pub duplicate_keys: DuplicateKeys,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            strictness: Strictness::default(),
            duplicate_keys: DuplicateKeys::default(),
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn duplicate_keys(mut self, duplicate_keys: DuplicateKeys) -> Self {
        self.duplicate_keys = duplicate_keys;
        self
    }
}

/// Single-pass recursive-descent bencode decoder.
///
/// Each routine consumes exactly the bytes of its own construct and leaves
/// the cursor on the byte that follows. A failure at any depth aborts the
/// whole decode; no partial tree is ever returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decodes one value from `cursor`, leaving it just past the value.
    ///
    /// Pass `&mut cursor` to keep using the cursor afterwards.
    pub fn decode<C: ByteCursor>(&self, mut cursor: C) -> Result<Value, BencodeError> {
        let start = cursor.position();
        match self.decode_value(&mut cursor, 0) {
            Ok(value) => {
                trace!(
                    kind = %value.kind(),
                    bytes = cursor.position() - start,
                    "decoded bencode value"
                );
                Ok(value)
            }
            Err(e) => {
                debug!(error = %e, position = cursor.position(), "bencode decode failed");
                Err(e)
            }
        }
    }

    /// Decodes a buffer holding exactly one value.
    ///
    /// # Errors
    ///
    /// Any decode error, or [`BencodeError::TrailingData`] if bytes remain
    /// after the value.
    pub fn decode_all(&self, data: &[u8]) -> Result<Value, BencodeError> {
        let mut cursor = SliceCursor::new(data);
        let value = self.decode(&mut cursor)?;
        if !cursor.at_end() {
            return Err(BencodeError::TrailingData {
                position: cursor.position(),
            });
        }
        Ok(value)
    }

    /// Decodes the value at the start of `data` and returns it together with
    /// the number of bytes it occupied.
    pub fn decode_prefix(&self, data: &[u8]) -> Result<(Value, usize), BencodeError> {
        let mut cursor = SliceCursor::new(data);
        let value = self.decode(&mut cursor)?;
        Ok((value, cursor.position()))
    }

    /// Decodes a stream holding exactly one value.
    pub fn decode_reader<R: Read>(&self, reader: R) -> Result<Value, BencodeError> {
        let mut cursor = ReaderCursor::new(reader);
        let value = self.decode(&mut cursor)?;
        if !cursor.at_end() {
            cursor.peek()?;
            return Err(BencodeError::TrailingData {
                position: cursor.position(),
            });
        }
        Ok(value)
    }

    fn decode_value<C: ByteCursor>(
        &self,
        cursor: &mut C,
        depth: usize,
    ) -> Result<Value, BencodeError> {
        match cursor.peek()? {
            b'i' => self.decode_integer(cursor).map(Value::Integer),
            b'l' => self.decode_list(cursor, depth),
            b'd' => self.decode_dict(cursor, depth),
            b'0'..=b'9' => self.decode_bytes(cursor).map(Value::Bytes),
            byte => Err(BencodeError::InvalidEncoding {
                byte,
                position: cursor.position(),
            }),
        }
    }

    fn decode_integer<C: ByteCursor>(&self, cursor: &mut C) -> Result<i64, BencodeError> {
        let start = cursor.position();
        cursor.advance();

        let limit = match self.options.strictness {
            Strictness::Strict => MAX_INTEGER_LEN,
            Strictness::Lenient => MAX_LENIENT_INTEGER_LEN,
        };

        let mut text = Vec::new();
        loop {
            match cursor.peek()? {
                b'e' => break,
                _ if text.len() == limit => {
                    return Err(BencodeError::MalformedInteger {
                        text: format!("{}...", String::from_utf8_lossy(&text)),
                        position: start,
                    });
                }
                byte => {
                    text.push(byte);
                    cursor.advance();
                }
            }
        }

        let value = parse_integer(&text, self.options.strictness).ok_or_else(|| {
            BencodeError::MalformedInteger {
                text: String::from_utf8_lossy(&text).into_owned(),
                position: start,
            }
        })?;

        cursor.advance();
        Ok(value)
    }

    fn decode_bytes<C: ByteCursor>(&self, cursor: &mut C) -> Result<Bytes, BencodeError> {
        let start = cursor.position();
        let mut len: Option<usize> = Some(0);
        let mut digits = 0usize;
        let mut leading_zero = false;

        loop {
            let byte = cursor.peek()?;
            if !byte.is_ascii_digit() {
                break;
            }
            if digits == 0 {
                leading_zero = byte == b'0';
            }
            digits += 1;
            len = len
                .and_then(|l| l.checked_mul(10))
                .and_then(|l| l.checked_add(usize::from(byte - b'0')));
            cursor.advance();
        }

        let padded = leading_zero && digits > 1 && self.options.strictness == Strictness::Strict;
        let len = match len {
            Some(len) if digits > 0 && !padded => len,
            _ => return Err(BencodeError::MalformedLength { position: start }),
        };

        let position = cursor.position();
        match cursor.peek()? {
            b':' => cursor.advance(),
            found => {
                return Err(BencodeError::MissingDelimiter {
                    expected: ':',
                    found,
                    position,
                })
            }
        }

        cursor.read_bytes(len)
    }

    fn decode_list<C: ByteCursor>(
        &self,
        cursor: &mut C,
        depth: usize,
    ) -> Result<Value, BencodeError> {
        self.check_depth(depth)?;
        cursor.advance();

        let mut list = Vec::new();
        while cursor.peek()? != b'e' {
            list.push(self.decode_value(cursor, depth + 1)?);
        }

        cursor.advance();
        Ok(Value::List(list))
    }

    fn decode_dict<C: ByteCursor>(
        &self,
        cursor: &mut C,
        depth: usize,
    ) -> Result<Value, BencodeError> {
        self.check_depth(depth)?;
        cursor.advance();

        let mut dict = Dict::new();
        loop {
            let position = cursor.position();
            let byte = cursor.peek()?;
            if byte == b'e' {
                break;
            }
            if !byte.is_ascii_digit() {
                return Err(BencodeError::InvalidEncoding { byte, position });
            }

            let key = self.decode_bytes(cursor)?;
            if self.options.duplicate_keys == DuplicateKeys::Reject && dict.contains_key(&key) {
                return Err(BencodeError::DuplicateKey {
                    key: String::from_utf8_lossy(&key).into_owned(),
                    position,
                });
            }

            let value = self.decode_value(cursor, depth + 1)?;
            match self.options.duplicate_keys {
                DuplicateKeys::KeepFirst => {
                    dict.entry(key).or_insert(value);
                }
                DuplicateKeys::KeepLast | DuplicateKeys::Reject => {
                    dict.insert(key, value);
                }
            }
        }

        cursor.advance();
        Ok(Value::Dict(dict))
    }

    fn check_depth(&self, depth: usize) -> Result<(), BencodeError> {
        if depth >= self.options.max_depth {
            return Err(BencodeError::NestingTooDeep {
                limit: self.options.max_depth,
            });
        }
        Ok(())
    }
}

/// Parses the text between `i` and `e`.
///
/// Digits are accumulated negatively so that `i64::MIN` parses without
/// overflow.
fn parse_integer(text: &[u8], strictness: Strictness) -> Option<i64> {
    let (negative, digits) = match text {
        [b'-', rest @ ..] => (true, rest),
        [b'+', rest @ ..] if strictness == Strictness::Lenient => (false, rest),
        _ => (false, text),
    };

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }

    if strictness == Strictness::Strict {
        if digits.len() > 1 && digits[0] == b'0' {
            return None;
        }
        if negative && digits == b"0" {
            return None;
        }
    }

    let mut value: i64 = 0;
    for &d in digits {
        value = value.checked_mul(10)?.checked_sub(i64::from(d - b'0'))?;
    }

    if negative {
        Some(value)
    } else {
        value.checked_neg()
    }
}

/// Decodes a buffer holding exactly one value with the default options.
///
/// # Examples
///
/// ```
/// use torrent_bencode::bencode::decode;
///
/// let value = decode(b"l4:spami42ee").unwrap();
/// assert_eq!(value.index(0).unwrap().as_str(), Some("spam"));
/// assert_eq!(value.index_integer(1).unwrap(), Some(42));
/// ```
pub fn decode(data: &[u8]) -> Result<Value, BencodeError> {
    Decoder::default().decode_all(data)
}

/// Decodes the leading value of `data`, returning it and its encoded length.
pub fn decode_prefix(data: &[u8]) -> Result<(Value, usize), BencodeError> {
    Decoder::default().decode_prefix(data)
}

/// Decodes a stream holding exactly one value with the default options.
pub fn decode_reader<R: Read>(reader: R) -> Result<Value, BencodeError> {
    Decoder::default().decode_reader(reader)
}
