//! Fixed-width field cursors for text-encoded binary records.
//!
//! This module provides:
//! - [`FixedWidthReader`] for slicing a record buffer at cumulative offsets
//! - [`FixedWidthWriter`] for writing justified, padded fields into a
//!   [`BytesMut`]

use crate::error::{Error, Result};
use bytes::{BufMut, Bytes, BytesMut};

/// Justification of a value within its fixed-width slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    /// Value first, padding after.
    Left,
    /// Padding first, value after.
    Right,
}

/// Sequential reader over a fixed-width record.
#[derive(Debug)]
pub struct FixedWidthReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> FixedWidthReader<'a> {
    /// Creates a reader starting at offset 0.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Returns the current read position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// Takes the next `width` bytes and advances.
    ///
    /// # Errors
    /// Returns `Error::BufferTooShort` if fewer than `width` bytes remain.
    pub fn take(&mut self, width: usize) -> Result<&'a [u8]> {
        let end = self.position + width;
        if end > self.buffer.len() {
            return Err(Error::BufferTooShort {
                required: end,
                available: self.buffer.len(),
            });
        }
        let slice = &self.buffer[self.position..end];
        self.position = end;
        Ok(slice)
    }

    /// Takes the next `width` bytes as text with trailing padding spaces trimmed.
    ///
    /// # Errors
    /// Returns `Error::BufferTooShort` or `Error::InvalidUtf8`.
    pub fn take_str(&mut self, width: usize) -> Result<&'a str> {
        let offset = self.position;
        let bytes = self.take(width)?;
        std::str::from_utf8(bytes)
            .map(|s| s.trim_end_matches(' '))
            .map_err(|e| Error::InvalidUtf8 {
                offset: offset + e.valid_up_to(),
            })
    }
}

/// Writer of justified, padded fixed-width fields.
#[derive(Debug, Default)]
pub struct FixedWidthWriter {
    buffer: BytesMut,
}

impl FixedWidthWriter {
    /// Creates a writer with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Returns the number of bytes written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Writes `value` into exactly `width` bytes.
    ///
    /// Values longer than `width` keep their leading bytes. Returns true when
    /// the value was truncated.
    pub fn put_justified(&mut self, value: &[u8], width: usize, justify: Justify, pad: u8) -> bool {
        let truncated = value.len() > width;
        let kept = &value[..value.len().min(width)];
        let fill = width - kept.len();
        match justify {
            Justify::Left => {
                self.buffer.put_slice(kept);
                self.buffer.put_bytes(pad, fill);
            }
            Justify::Right => {
                self.buffer.put_bytes(pad, fill);
                self.buffer.put_slice(kept);
            }
        }
        truncated
    }

    /// Writes `width` padding bytes.
    pub fn put_blank(&mut self, width: usize, pad: u8) {
        self.buffer.put_bytes(pad, width);
    }

    /// Finishes writing and returns the frozen bytes.
    #[must_use]
    pub fn freeze(self) -> Bytes {
        self.buffer.freeze()
    }
}
