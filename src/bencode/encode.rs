use super::error::BencodeError;
use super::value::Value;
use bytes::Bytes;
use std::io::Write;

/// Encodes a bencode value to a byte vector.
///
/// The output follows the canonical bencode format:
/// - Integers: `i<number>e`
/// - Byte strings: `<length>:<data>`
/// - Lists: `l<items>e`
/// - Dictionaries: `d<key><value>...e` (keys sorted by raw bytes, whatever
///   order they are stored in)
///
/// # Examples
///
/// ```
/// use torrent_bencode::bencode::{encode, Value};
///
/// let mut dict = Value::dict();
/// dict.insert("b", 2i64).unwrap();
/// dict.insert("a", 1i64).unwrap();
/// assert_eq!(encode(&dict).unwrap(), b"d1:ai1e1:bi2ee");
///
/// let list = Value::List(vec![Value::Integer(1), Value::string("two")]);
/// assert_eq!(encode(&list).unwrap(), b"li1e3:twoe");
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>, BencodeError> {
    let mut buf = Vec::with_capacity(encoded_len(value));
    encode_to(value, &mut buf)?;
    Ok(buf)
}

/// Writes the canonical encoding of `value` to `sink`.
///
/// # Errors
///
/// [`BencodeError::SinkWrite`] on the first failed or short write. Bytes
/// already written are not rolled back.
pub fn encode_to<W: Write + ?Sized>(value: &Value, sink: &mut W) -> Result<(), BencodeError> {
    match value {
        Value::Integer(i) => {
            write!(sink, "i{}e", i).map_err(BencodeError::SinkWrite)?;
        }
        Value::Bytes(b) => encode_bytes(b, sink)?,
        Value::List(l) => {
            sink.write_all(b"l").map_err(BencodeError::SinkWrite)?;
            for item in l {
                encode_to(item, sink)?;
            }
            sink.write_all(b"e").map_err(BencodeError::SinkWrite)?;
        }
        Value::Dict(d) => {
            let mut entries: Vec<(&Bytes, &Value)> = d.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

            sink.write_all(b"d").map_err(BencodeError::SinkWrite)?;
            for (key, val) in entries {
                encode_bytes(key, sink)?;
                encode_to(val, sink)?;
            }
            sink.write_all(b"e").map_err(BencodeError::SinkWrite)?;
        }
    }
    Ok(())
}

fn encode_bytes<W: Write + ?Sized>(bytes: &[u8], sink: &mut W) -> Result<(), BencodeError> {
    write!(sink, "{}:", bytes.len()).map_err(BencodeError::SinkWrite)?;
    sink.write_all(bytes).map_err(BencodeError::SinkWrite)
}

/// Size in bytes of the canonical encoding of `value`.
pub fn encoded_len(value: &Value) -> usize {
    match value {
        Value::Integer(i) => 2 + usize::from(*i < 0) + decimal_digits(i.unsigned_abs()),
        Value::Bytes(b) => string_len(b.len()),
        Value::List(l) => 2 + l.iter().map(encoded_len).sum::<usize>(),
        Value::Dict(d) => {
            2 + d
                .iter()
                .map(|(key, val)| string_len(key.len()) + encoded_len(val))
                .sum::<usize>()
        }
    }
}

fn string_len(len: usize) -> usize {
    decimal_digits(len as u64) + 1 + len
}

fn decimal_digits(mut n: u64) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}
