use std::io::{self, Read, Write};

use bytes::Bytes;

use super::*;

#[test]
fn test_decode_integer() {
    assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
    assert_eq!(decode(b"i-42e").unwrap(), Value::Integer(-42));
    assert_eq!(decode(b"i0e").unwrap(), Value::Integer(0));
    assert_eq!(decode(b"i-1e").unwrap(), Value::Integer(-1));
}

#[test]
fn test_decode_integer_limits() {
    assert_eq!(
        decode(b"i9223372036854775807e").unwrap(),
        Value::Integer(i64::MAX)
    );
    assert_eq!(
        decode(b"i-9223372036854775808e").unwrap(),
        Value::Integer(i64::MIN)
    );
    assert!(matches!(
        decode(b"i9223372036854775808e"),
        Err(BencodeError::MalformedInteger { .. })
    ));
}

#[test]
fn test_decode_integer_malformed() {
    for input in [&b"i e"[..], b"ie", b"i-e", b"i1x2e", b"i--1e"] {
        match decode(input) {
            Err(BencodeError::MalformedInteger { position, .. }) => assert_eq!(position, 0),
            other => panic!("expected malformed integer for {:?}, got {:?}", input, other),
        }
    }
}

#[test]
fn test_decode_integer_strict_rejects_padding() {
    for input in [&b"i-0e"[..], b"i03e", b"i+3e", b"i-007e"] {
        assert!(
            matches!(decode(input), Err(BencodeError::MalformedInteger { .. })),
            "{:?} should be rejected",
            input
        );
    }
}

#[test]
fn test_decode_integer_lenient_accepts_padding() {
    let decoder = Decoder::new(DecodeOptions::new().strictness(Strictness::Lenient));
    assert_eq!(decoder.decode_all(b"i03e").unwrap(), Value::Integer(3));
    assert_eq!(decoder.decode_all(b"i-0e").unwrap(), Value::Integer(0));
    assert_eq!(decoder.decode_all(b"i+3e").unwrap(), Value::Integer(3));
    assert_eq!(decoder.decode_all(b"i-007e").unwrap(), Value::Integer(-7));
    assert!(decoder.decode_all(b"i+e").is_err());

    // Lenient input still encodes canonically.
    let value = decoder.decode_all(b"i007e").unwrap();
    assert_eq!(encode(&value).unwrap(), b"i7e");
}

#[test]
fn test_decode_bytes() {
    assert_eq!(
        decode(b"4:spam").unwrap(),
        Value::Bytes(Bytes::from_static(b"spam"))
    );
    assert_eq!(
        decode(b"0:").unwrap(),
        Value::Bytes(Bytes::from_static(b""))
    );
}

#[test]
fn test_decode_integer_oversized_fails_fast() {
    // Endless digits: the decoder must give up without reading to the end.
    let endless = (&b"i"[..]).chain(io::repeat(b'1'));
    match decode_reader(endless) {
        Err(BencodeError::MalformedInteger { text, position }) => {
            assert_eq!(position, 0);
            assert_eq!(text, format!("{}...", "1".repeat(20)));
        }
        other => panic!("expected MalformedInteger, got {:?}", other),
    }

    let long = format!("i{}e", "1".repeat(21));
    assert!(matches!(
        decode(long.as_bytes()),
        Err(BencodeError::MalformedInteger { .. })
    ));
}

#[test]
fn test_decode_integer_lenient_length_cap() {
    let decoder = Decoder::new(DecodeOptions::new().strictness(Strictness::Lenient));

    let padded = format!("i{}7e", "0".repeat(63));
    assert_eq!(
        decoder.decode_all(padded.as_bytes()).unwrap(),
        Value::Integer(7)
    );

    let too_long = format!("i{}7e", "0".repeat(64));
    assert!(matches!(
        decoder.decode_all(too_long.as_bytes()),
        Err(BencodeError::MalformedInteger { .. })
    ));
}

#[test]
fn test_decode_bytes_with_embedded_zeros() {
    let value = decode(b"5:a\0b\0c").unwrap();
    assert_eq!(value.as_bytes().unwrap().as_ref(), b"a\0b\0c");
    assert_eq!(value.as_str(), Some("a\0b\0c"));
}

#[test]
fn test_decode_bytes_non_utf8() {
    let value = decode(b"2:\xff\xfe").unwrap();
    assert_eq!(value.as_bytes().unwrap().as_ref(), b"\xff\xfe");
    assert_eq!(value.as_str(), None);
}

#[test]
fn test_decode_bytes_length_errors() {
    assert!(matches!(
        decode(b"4spam"),
        Err(BencodeError::MissingDelimiter {
            expected: ':',
            found: b's',
            position: 1
        })
    ));
    assert!(matches!(
        decode(b"04:spam"),
        Err(BencodeError::MalformedLength { position: 0 })
    ));
    assert!(matches!(
        decode(b"99999999999999999999999:x"),
        Err(BencodeError::MalformedLength { .. })
    ));
    assert!(matches!(
        decode(b"10:short"),
        Err(BencodeError::UnexpectedEof { .. })
    ));

    let lenient = Decoder::new(DecodeOptions::new().strictness(Strictness::Lenient));
    assert_eq!(lenient.decode_all(b"04:spam").unwrap(), Value::string("spam"));
}

#[test]
fn test_decode_list() {
    let result = decode(b"l4:spami42ee").unwrap();
    match result {
        Value::List(l) => {
            assert_eq!(l.len(), 2);
            assert_eq!(l[0], Value::Bytes(Bytes::from_static(b"spam")));
            assert_eq!(l[1], Value::Integer(42));
        }
        _ => panic!("expected list"),
    }

    assert_eq!(decode(b"le").unwrap(), Value::List(vec![]));
}

#[test]
fn test_decode_dict() {
    let result = decode(b"d3:cow3:moo4:spam4:eggse").unwrap();
    match result {
        Value::Dict(d) => {
            assert_eq!(d.len(), 2);
            assert_eq!(
                d.get(b"cow".as_slice()),
                Some(&Value::Bytes(Bytes::from_static(b"moo")))
            );
        }
        _ => panic!("expected dict"),
    }

    assert_eq!(decode(b"de").unwrap(), Value::dict());
}

#[test]
fn test_decode_dict_unsorted_keys_keep_stream_order() {
    let value = decode(b"d4:spami1e3:cowi2ee").unwrap();
    let keys: Vec<&[u8]> = value.as_dict().unwrap().keys().map(|k| k.as_ref()).collect();
    assert_eq!(keys, vec![b"spam".as_slice(), b"cow".as_slice()]);
}

#[test]
fn test_decode_dict_non_string_key() {
    assert!(matches!(
        decode(b"di1ei2ee"),
        Err(BencodeError::InvalidEncoding {
            byte: b'i',
            position: 1
        })
    ));
}

#[test]
fn test_duplicate_keys_keep_last() {
    let value = decode(b"d1:ai1e1:bi2e1:ai3ee").unwrap();
    let dict = value.as_dict().unwrap();
    assert_eq!(dict.len(), 2);
    assert_eq!(value.get_integer(b"a"), Some(3));
    // The overwritten key keeps its original slot.
    assert_eq!(dict.get_index(0).map(|(k, _)| k.as_ref()), Some(b"a".as_slice()));
}

#[test]
fn test_duplicate_keys_keep_first() {
    let decoder = Decoder::new(DecodeOptions::new().duplicate_keys(DuplicateKeys::KeepFirst));
    let value = decoder.decode_all(b"d1:ai1e1:ai3ee").unwrap();
    assert_eq!(value.get_integer(b"a"), Some(1));
}

#[test]
fn test_duplicate_keys_reject() {
    let decoder = Decoder::new(DecodeOptions::new().duplicate_keys(DuplicateKeys::Reject));
    match decoder.decode_all(b"d1:ai1e1:ai3ee") {
        Err(BencodeError::DuplicateKey { key, position }) => {
            assert_eq!(key, "a");
            assert_eq!(position, 7);
        }
        other => panic!("expected duplicate key error, got {:?}", other),
    }
}

#[test]
fn test_decode_invalid_tag() {
    assert!(matches!(
        decode(b"x"),
        Err(BencodeError::InvalidEncoding {
            byte: b'x',
            position: 0
        })
    ));
    assert!(matches!(
        decode(b"l4:spamxe"),
        Err(BencodeError::InvalidEncoding {
            byte: b'x',
            position: 7
        })
    ));
}

#[test]
fn test_decode_empty_input() {
    assert!(matches!(
        decode(b""),
        Err(BencodeError::UnexpectedEof { position: 0 })
    ));
}

#[test]
fn test_truncation_is_end_of_input() {
    let samples: [&[u8]; 8] = [
        b"i42e",
        b"i-1e",
        b"4:spam",
        b"0:",
        b"le",
        b"l4:spami42ee",
        b"d3:cow3:mooe",
        b"d8:announce20:http://a.example/ann4:infod6:lengthi100e4:name5:abcdeee",
    ];

    for sample in samples {
        let truncated = &sample[..sample.len() - 1];
        assert!(
            matches!(decode(truncated), Err(BencodeError::UnexpectedEof { .. })),
            "truncated {:?} should hit end of input",
            String::from_utf8_lossy(sample)
        );
    }
}

#[test]
fn test_nesting_limit() {
    let decoder = Decoder::new(DecodeOptions::new().max_depth(2));
    assert!(decoder.decode_all(b"llee").is_ok());
    assert!(matches!(
        decoder.decode_all(b"llleee"),
        Err(BencodeError::NestingTooDeep { limit: 2 })
    ));

    let deep: Vec<u8> = std::iter::repeat(b'l')
        .take(100)
        .chain(std::iter::repeat(b'e').take(100))
        .collect();
    assert!(matches!(
        decode(&deep),
        Err(BencodeError::NestingTooDeep { .. })
    ));
}

#[test]
fn test_trailing_data_error() {
    assert!(matches!(
        decode(b"i42eextra"),
        Err(BencodeError::TrailingData { position: 4 })
    ));
}

#[test]
fn test_decode_prefix_reports_consumed() {
    let (value, consumed) = decode_prefix(b"4:spami42e").unwrap();
    assert_eq!(value, Value::string("spam"));
    assert_eq!(consumed, 6);
}

#[test]
fn test_shared_cursor_sequential_values() {
    let mut cursor = SliceCursor::new(b"i1e4:spamli2eed1:ai3ee");
    let decoder = Decoder::default();

    assert_eq!(decoder.decode(&mut cursor).unwrap(), Value::Integer(1));
    assert_eq!(cursor.position(), 3);
    assert_eq!(decoder.decode(&mut cursor).unwrap(), Value::string("spam"));
    assert_eq!(cursor.position(), 9);
    assert_eq!(
        decoder.decode(&mut cursor).unwrap(),
        Value::List(vec![Value::Integer(2)])
    );
    assert_eq!(cursor.remaining(), b"d1:ai3ee");
    assert_eq!(decoder.decode(&mut cursor).unwrap().get_integer(b"a"), Some(3));
    assert!(cursor.at_end());
}

#[test]
fn test_slice_cursor_primitives() {
    let mut cursor = SliceCursor::new(b"ab");
    assert_eq!(cursor.peek().unwrap(), b'a');
    cursor.advance();
    assert_eq!(cursor.peek().unwrap(), b'b');
    cursor.advance();
    assert!(cursor.at_end());
    assert!(matches!(
        cursor.peek(),
        Err(BencodeError::UnexpectedEof { position: 2 })
    ));
    cursor.advance();
    assert_eq!(cursor.position(), 2);
}

/// Reader that hands out at most `chunk` bytes per call.
struct Trickle<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

#[test]
fn test_reader_cursor_matches_slice_decode() {
    let data = b"d8:announce20:http://a.example/ann4:infod6:lengthi100e4:name5:abcdeee";
    let from_slice = decode(data).unwrap();
    let from_reader = decode_reader(Trickle { data, chunk: 3 }).unwrap();
    assert_eq!(from_slice, from_reader);
}

#[test]
fn test_reader_cursor_large_string_spans_refills() {
    let payload = vec![0x5au8; 10_000];
    let mut data = format!("{}:", payload.len()).into_bytes();
    data.extend_from_slice(&payload);

    let mut cursor = ReaderCursor::new(Trickle {
        data: &data,
        chunk: 1000,
    });
    let value = Decoder::default().decode(&mut cursor).unwrap();
    assert_eq!(value.as_bytes().unwrap().as_ref(), payload.as_slice());
    assert_eq!(cursor.position(), data.len());
    assert!(cursor.at_end());
}

#[test]
fn test_reader_cursor_truncated() {
    let result = decode_reader(Trickle {
        data: b"l4:spam",
        chunk: 2,
    });
    assert!(matches!(
        result,
        Err(BencodeError::UnexpectedEof { position: 7 })
    ));
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
    }
}

#[test]
fn test_reader_cursor_io_error() {
    assert!(matches!(
        decode_reader(FailingReader),
        Err(BencodeError::Io(_))
    ));
}

#[test]
fn test_reader_cursor_from_file() {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(b"d3:cow3:moo4:spam4:eggse").unwrap();
    io::Seek::rewind(&mut file).unwrap();

    let value = decode_reader(file).unwrap();
    assert_eq!(value.get_str(b"spam"), Some("eggs"));
}

#[test]
fn test_reader_trailing_data() {
    assert!(matches!(
        decode_reader(&b"i1ei2e"[..]),
        Err(BencodeError::TrailingData { position: 3 })
    ));
}

#[test]
fn test_encode_integer() {
    assert_eq!(encode(&Value::Integer(42)).unwrap(), b"i42e");
    assert_eq!(encode(&Value::Integer(-42)).unwrap(), b"i-42e");
    assert_eq!(encode(&Value::Integer(0)).unwrap(), b"i0e");
    assert_eq!(
        encode(&Value::Integer(i64::MIN)).unwrap(),
        b"i-9223372036854775808e"
    );
}

#[test]
fn test_encode_bytes() {
    assert_eq!(
        encode(&Value::Bytes(Bytes::from_static(b"spam"))).unwrap(),
        b"4:spam"
    );
    assert_eq!(encode(&Value::bytes(&b""[..])).unwrap(), b"0:");
    assert_eq!(encode(&Value::bytes(&b"\0\0"[..])).unwrap(), b"2:\0\0");
}

#[test]
fn test_encode_list() {
    let list = Value::List(vec![
        Value::Bytes(Bytes::from_static(b"spam")),
        Value::Integer(42),
    ]);
    assert_eq!(encode(&list).unwrap(), b"l4:spami42ee");
    assert_eq!(encode(&Value::List(vec![])).unwrap(), b"le");
}

#[test]
fn test_encode_dict_sorts_keys() {
    let mut value = Value::dict();
    value.insert("zeta", 1i64).unwrap();
    value.insert("ab", 2i64).unwrap();
    value.insert("a", 3i64).unwrap();
    value.insert("B", 4i64).unwrap();
    assert_eq!(
        encode(&value).unwrap(),
        b"d1:Bi4e1:ai3e2:abi2e4:zetai1ee"
    );
}

#[test]
fn test_encode_dict_sorts_by_raw_bytes() {
    let mut value = Value::dict();
    value.insert(&b"\xff"[..], 1i64).unwrap();
    value.insert(&b"\x00"[..], 2i64).unwrap();
    value.insert(&b"a\x00"[..], 3i64).unwrap();
    value.insert(&b"a"[..], 4i64).unwrap();
    assert_eq!(
        encode(&value).unwrap(),
        b"d1:\x00i2e1:ai4e2:a\x00i3e1:\xffi1ee"
    );
}

#[test]
fn test_encode_nested_dict_sorted() {
    let value = decode(b"d1:bd1:yi1e1:xi2ee1:ai0ee").unwrap();
    assert_eq!(encode(&value).unwrap(), b"d1:ai0e1:bd1:xi2e1:yi1eee");
}

struct LimitedSink {
    written: Vec<u8>,
    capacity: usize,
}

impl Write for LimitedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(self.capacity - self.written.len());
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_encode_short_write_is_sink_error() {
    let value = Value::List(vec![Value::string("spam"), Value::Integer(42)]);
    let mut sink = LimitedSink {
        written: Vec::new(),
        capacity: 5,
    };
    assert!(matches!(
        encode_to(&value, &mut sink),
        Err(BencodeError::SinkWrite(_))
    ));
    assert_eq!(sink.written, b"l4:sp");
}

#[test]
fn test_encoded_len_matches_output() {
    let values = [
        Value::Integer(0),
        Value::Integer(-1),
        Value::Integer(i64::MAX),
        Value::Integer(i64::MIN),
        Value::string(""),
        Value::bytes(vec![7u8; 1234]),
        decode(b"d8:announce20:http://a.example/ann4:infod6:lengthi100e4:name5:abcdeee")
            .unwrap(),
        decode(b"ll1:ai-10eed0:leee").unwrap(),
    ];

    for value in &values {
        assert_eq!(value.encoded_len(), encode(value).unwrap().len());
    }
}

#[test]
fn test_roundtrip() {
    // Keys must be sorted lexicographically for a byte-exact roundtrip
    let original = b"d8:announce15:http://test.com4:infod4:name4:test12:piece lengthi16384eee";
    let decoded = decode(original).unwrap();
    let encoded = encode(&decoded).unwrap();
    assert_eq!(encoded, original);
}

#[test]
fn test_roundtrip_unsorted_is_idempotent_after_first_pass() {
    let original = b"d4:spaml1:a1:be3:cowd1:zi1e1:yi2eee";
    let first = decode(original).unwrap();
    let canonical = encode(&first).unwrap();
    let second = decode(&canonical).unwrap();

    assert_eq!(first, second);
    assert_eq!(encode(&second).unwrap(), canonical);
    assert_eq!(canonical, b"d3:cowd1:yi2e1:zi1ee4:spaml1:a1:bee");
}

#[test]
fn test_end_to_end_torrent_sample() {
    let data = b"d8:announce20:http://a.example/ann4:infod6:lengthi100e4:name5:abcdeee";
    let value = decode(data).unwrap();

    assert_eq!(value.get_str(b"announce"), Some("http://a.example/ann"));
    let info = value.get(b"info").unwrap();
    assert_eq!(info.kind(), Kind::Dict);
    assert_eq!(info.get_integer(b"length"), Some(100));
    assert_eq!(info.get_str(b"name"), Some("abcde"));

    assert_eq!(encode(&value).unwrap(), data);
}

#[test]
fn test_value_accessors() {
    let value = Value::Integer(42);
    assert_eq!(value.as_integer(), Some(42));
    assert!(value.as_bytes().is_none());
    assert_eq!(value.kind(), Kind::Integer);

    let value = Value::Bytes(Bytes::from_static(b"test"));
    assert_eq!(value.as_str(), Some("test"));
    assert!(value.as_integer().is_none());

    // No silent coercion from text to integer.
    assert_eq!(Value::string("42").as_integer(), None);

    let value = Value::List(vec![]);
    assert!(value.as_list().is_some());
    assert!(value.as_dict().is_none());
}

#[test]
fn test_typed_lookup() {
    let value = decode(b"d3:inti7e4:listli1ee3:str3:abce").unwrap();

    assert_eq!(value.get_integer(b"int"), Some(7));
    assert_eq!(value.get_integer(b"str"), None);
    assert_eq!(value.get_str(b"str"), Some("abc"));
    assert!(value.get_list(b"list").is_some());
    assert!(value.get_dict(b"list").is_none());
    assert!(value.contains_key(b"int"));
    assert!(!value.contains_key(b"missing"));
    assert_eq!(value.get(b"missing"), None);
    assert_eq!(Value::Integer(1).get(b"int"), None);
}

#[test]
fn test_list_index() {
    let value = decode(b"li1e3:twod1:ai1eee").unwrap();

    assert_eq!(value.index_integer(0).unwrap(), Some(1));
    assert_eq!(value.index_integer(1).unwrap(), None);
    assert_eq!(value.index_bytes(1).unwrap().map(|b| b.as_ref()), Some(b"two".as_slice()));
    assert!(value.index_dict(2).unwrap().is_some());
    assert!(value.index_list(2).unwrap().is_none());

    assert!(matches!(
        value.index(3),
        Err(BencodeError::IndexOutOfRange { index: 3, len: 3 })
    ));
    assert!(matches!(
        Value::Integer(1).index(0),
        Err(BencodeError::UnexpectedKind {
            expected: Kind::List,
            found: Kind::Integer
        })
    ));
}

#[test]
fn test_index_mut() {
    let mut value = decode(b"l1:ae").unwrap();
    value.index_mut(0).unwrap().set_bytes("changed").unwrap();
    assert_eq!(encode(&value).unwrap(), b"l7:changede");
    assert!(matches!(
        value.index_mut(1),
        Err(BencodeError::IndexOutOfRange { index: 1, len: 1 })
    ));
}

#[test]
fn test_set_bytes() {
    let mut value = decode(b"d7:comment3:old4:infod4:name3:fooee").unwrap();

    value
        .get_path_mut(&[b"info", b"name"])
        .unwrap()
        .set_bytes(Bytes::from_static(b"b\0r"))
        .unwrap();
    value.get_mut(b"comment").unwrap().set_bytes("").unwrap();

    assert_eq!(
        encode(&value).unwrap(),
        b"d7:comment0:4:infod4:name3:b\0ree"
    );

    let mut int = Value::Integer(1);
    assert!(matches!(
        int.set_bytes("x"),
        Err(BencodeError::UnexpectedKind {
            expected: Kind::Bytes,
            found: Kind::Integer
        })
    ));
    assert_eq!(int, Value::Integer(1));
}

#[test]
fn test_insert() {
    let mut value = Value::dict();
    assert!(value.insert("b", "x").unwrap().is_none());
    assert_eq!(value.insert("b", 5i64).unwrap(), Some(Value::string("x")));
    value.insert("a", Value::List(vec![])).unwrap();
    assert_eq!(encode(&value).unwrap(), b"d1:ale1:bi5ee");

    assert!(matches!(
        Value::List(vec![]).insert("a", 1i64),
        Err(BencodeError::UnexpectedKind { .. })
    ));
}

#[test]
fn test_dict_equality_ignores_storage_order() {
    let a = decode(b"d1:ai1e1:bi2ee").unwrap();
    let b = decode(b"d1:bi2e1:ai1ee").unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_error_messages() {
    let err = decode(b"i1").unwrap_err();
    assert_eq!(err.to_string(), "unexpected end of input at byte 2");

    let err = decode(b"q").unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid encoding: unexpected byte 0x71 at byte 0"
    );
}
