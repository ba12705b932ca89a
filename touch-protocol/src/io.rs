//! Bounds-checked readers and writers for gesture datagrams.
//!
//! Gesture datagrams arrive whole over UDP, so unlike a stream protocol there
//! is nothing to refill: the input stream is a cursor over one received
//! buffer, and every read checks the remaining length first. Integers are in
//! network byte order (big-endian). Doubles use the touch server's own
//! convention: the eight bytes of a little-endian IEEE-754 value, reversed.
//!
//! # Examples
//!
//! ```
//! use touch_protocol::io::{GestureInStream, GestureOutStream};
//!
//! let mut output = GestureOutStream::new();
//! output.write_i32(2);
//! output.write_f64_swapped(0.25);
//! let bytes = output.into_bytes();
//!
//! let mut input = GestureInStream::new(&bytes);
//! assert_eq!(input.read_i32().unwrap(), 2);
//! assert_eq!(input.read_f64_swapped().unwrap(), 0.25);
//! assert!(input.read_i32().is_err());
//! ```

use crate::errors::DecodeError;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Cursor over a received datagram.
///
/// Reads advance the cursor only when they succeed; a failed read leaves the
/// position where it was and reports how many bytes were missing.
pub struct GestureInStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> GestureInStream<'a> {
    /// Create a stream positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the datagram.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// The unread part of the datagram.
    pub fn chunk(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    fn ensure_bytes(&self, n: usize) -> Result<(), DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.ensure_bytes(1)?;
        let mut chunk = self.chunk();
        let value = chunk.get_u8();
        self.pos += 1;
        Ok(value)
    }

    /// Read a 32-bit signed integer in network byte order.
    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.ensure_bytes(4)?;
        let mut chunk = self.chunk();
        let value = chunk.get_i32();
        self.pos += 4;
        Ok(value)
    }

    /// Read a byte-swapped 64-bit float.
    ///
    /// The sender writes the native little-endian bytes of the double in
    /// reverse order. Reversing them again and reading little-endian gives
    /// the same value on any host.
    pub fn read_f64_swapped(&mut self) -> Result<f64, DecodeError> {
        self.ensure_bytes(8)?;
        let mut raw = [0u8; 8];
        let mut chunk = self.chunk();
        chunk.copy_to_slice(&mut raw);
        raw.reverse();
        self.pos += 8;
        Ok(f64::from_le_bytes(raw))
    }

    /// Read exactly `buf.len()` bytes.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), DecodeError> {
        self.ensure_bytes(buf.len())?;
        let mut chunk = self.chunk();
        chunk.copy_to_slice(buf);
        self.pos += buf.len();
        Ok(())
    }

    /// Skip `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        self.ensure_bytes(n)?;
        self.pos += n;
        Ok(())
    }

    /// Read a NUL-terminated string, returning the bytes before the NUL.
    ///
    /// The cursor ends up just past the terminator.
    pub fn read_cstr(&mut self) -> Result<&'a [u8], DecodeError> {
        let rest = self.chunk();
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(DecodeError::UnterminatedName)?;
        self.pos += len + 1;
        Ok(&rest[..len])
    }
}

/// Locate `marker` in `data`, returning its offset.
///
/// Only offsets strictly before `data.len() - marker.len()` are considered,
/// so a match always leaves at least one byte after the marker.
pub fn find_marker(data: &[u8], marker: &[u8]) -> Option<usize> {
    if marker.is_empty() {
        return None;
    }
    let last = data.len().checked_sub(marker.len())?;
    (0..last).find(|&i| &data[i..i + marker.len()] == marker)
}

/// Builder for outgoing gesture datagrams.
///
/// The mirror of [`GestureInStream`]: integers are written big-endian and
/// doubles byte-swapped.
#[derive(Debug, Default)]
pub struct GestureOutStream {
    buffer: BytesMut,
}

impl GestureOutStream {
    /// Create an empty output stream.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create an output stream with the given initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.put_u8(value);
    }

    /// Write a 32-bit signed integer in network byte order.
    pub fn write_i32(&mut self, value: i32) {
        self.buffer.put_i32(value);
    }

    /// Write a 64-bit float with its little-endian bytes reversed.
    pub fn write_f64_swapped(&mut self, value: f64) {
        let mut raw = value.to_le_bytes();
        raw.reverse();
        self.buffer.put_slice(&raw);
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.put_slice(data);
    }

    /// Write zero bytes.
    pub fn write_zeros(&mut self, n: usize) {
        self.buffer.put_bytes(0, n);
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Finish and return the datagram bytes.
    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }
}
