use super::error::BencodeError;
use crate::constants::READ_BUFFER_SIZE;
use bytes::{BufMut, Bytes, BytesMut};
use std::io::{ErrorKind, Read};
use tracing::trace;

/// A forward-only, one-byte-lookahead view over a byte source.
///
/// Decoders share a single cursor across nested calls, so every byte
/// consumed by an inner value is already consumed when control returns to
/// the enclosing list or dictionary. Passing `&mut cursor` into a decoder
/// works because `&mut C` is itself a cursor.
pub trait ByteCursor {
    /// Returns the byte under the cursor without consuming it.
    ///
    /// # Errors
    ///
    /// [`BencodeError::UnexpectedEof`] when the source is exhausted, or
    /// [`BencodeError::Io`] when a streamed source fails to refill.
    fn peek(&mut self) -> Result<u8, BencodeError>;

    /// Moves past the current byte. Does nothing at end of input.
    fn advance(&mut self);

    fn at_end(&mut self) -> bool;

    /// Number of bytes consumed since the cursor was created.
    fn position(&self) -> usize;

    /// Consumes exactly `len` bytes.
    ///
    /// The default implementation walks the source one byte at a time;
    /// buffered cursors override it to copy whole chunks.
    fn read_bytes(&mut self, len: usize) -> Result<Bytes, BencodeError> {
        let mut out = BytesMut::with_capacity(len.min(READ_BUFFER_SIZE));
        for _ in 0..len {
            out.put_u8(self.peek()?);
            self.advance();
        }
        Ok(out.freeze())
    }
}

impl<C: ByteCursor + ?Sized> ByteCursor for &mut C {
    fn peek(&mut self) -> Result<u8, BencodeError> {
        (**self).peek()
    }

    fn advance(&mut self) {
        (**self).advance()
    }

    fn at_end(&mut self) -> bool {
        (**self).at_end()
    }

    fn position(&self) -> usize {
        (**self).position()
    }

    fn read_bytes(&mut self, len: usize) -> Result<Bytes, BencodeError> {
        (**self).read_bytes(len)
    }
}

/// Cursor over an in-memory buffer.
///
/// # Examples
///
/// ```
/// use torrent_bencode::bencode::{ByteCursor, Decoder, SliceCursor};
///
/// let mut cursor = SliceCursor::new(b"i1ei2e");
/// let decoder = Decoder::default();
/// assert_eq!(decoder.decode(&mut cursor).unwrap().as_integer(), Some(1));
/// assert_eq!(cursor.position(), 3);
/// assert_eq!(decoder.decode(&mut cursor).unwrap().as_integer(), Some(2));
/// assert!(cursor.at_end());
/// ```
#[derive(Debug, Clone)]
pub struct SliceCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// The bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ByteCursor for SliceCursor<'_> {
    fn peek(&mut self) -> Result<u8, BencodeError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(BencodeError::UnexpectedEof { position: self.pos })
    }

    fn advance(&mut self) {
        if self.pos < self.data.len() {
            self.pos += 1;
        }
    }

    fn at_end(&mut self) -> bool {
        self.pos >= self.data.len()
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn read_bytes(&mut self, len: usize) -> Result<Bytes, BencodeError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(BencodeError::UnexpectedEof {
                position: self.data.len(),
            })?;

        let bytes = Bytes::copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(bytes)
    }
}

/// Cursor over any [`Read`] source, refilled in chunks of
/// [`READ_BUFFER_SIZE`] bytes.
///
/// Reads block inside `R`; the decoder never sees it. Because the cursor
/// buffers ahead, the underlying reader may have advanced past the end of
/// the decoded value. Keep decoding through the same cursor, or inspect
/// [`ReaderCursor::buffered`], to pick up what follows.
pub struct ReaderCursor<R> {
    reader: R,
    buf: Vec<u8>,
    idx: usize,
    base: usize,
    eof: bool,
    error: Option<std::io::Error>,
}

impl<R: Read> ReaderCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(READ_BUFFER_SIZE),
            idx: 0,
            base: 0,
            eof: false,
            error: None,
        }
    }

    /// Bytes read from the source but not yet consumed.
    pub fn buffered(&self) -> &[u8] {
        &self.buf[self.idx..]
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self) {
        if self.idx < self.buf.len() || self.eof || self.error.is_some() {
            return;
        }

        self.base += self.buf.len();
        self.idx = 0;
        self.buf.resize(READ_BUFFER_SIZE, 0);

        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => {
                    self.buf.clear();
                    self.eof = true;
                    trace!(position = self.base, "reader cursor reached end of input");
                }
                Ok(n) => {
                    self.buf.truncate(n);
                    trace!(position = self.base, bytes = n, "reader cursor refilled");
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buf.clear();
                    self.error = Some(e);
                }
            }
            break;
        }
    }

    fn take_error(&mut self) -> Result<(), BencodeError> {
        match self.error.take() {
            Some(e) => Err(BencodeError::Io(e)),
            None => Ok(()),
        }
    }
}

impl<R: Read> ByteCursor for ReaderCursor<R> {
    fn peek(&mut self) -> Result<u8, BencodeError> {
        self.fill();
        self.take_error()?;
        self.buf
            .get(self.idx)
            .copied()
            .ok_or(BencodeError::UnexpectedEof {
                position: self.position(),
            })
    }

    fn advance(&mut self) {
        self.fill();
        if self.idx < self.buf.len() {
            self.idx += 1;
        }
    }

    fn at_end(&mut self) -> bool {
        self.fill();
        self.error.is_none() && self.idx >= self.buf.len()
    }

    fn position(&self) -> usize {
        self.base + self.idx
    }

    fn read_bytes(&mut self, len: usize) -> Result<Bytes, BencodeError> {
        let mut out = BytesMut::with_capacity(len.min(READ_BUFFER_SIZE));

        while out.len() < len {
            self.fill();
            self.take_error()?;

            let available = &self.buf[self.idx..];
            if available.is_empty() {
                return Err(BencodeError::UnexpectedEof {
                    position: self.position(),
                });
            }

            let take = available.len().min(len - out.len());
            out.extend_from_slice(&available[..take]);
            self.idx += take;
        }

        Ok(out.freeze())
    }
}

impl<R> std::fmt::Debug for ReaderCursor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderCursor")
            .field("position", &(self.base + self.idx))
            .field("buffered", &(self.buf.len() - self.idx))
            .field("eof", &self.eof)
            .finish()
    }
}
