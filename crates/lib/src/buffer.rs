//! Fixed-capacity string buffer.
//!
//! Command lines and compile database commands are assembled through
//! [`BoundedBuffer`]. Appends are all-or-nothing: an append that would push the
//! buffer past its capacity fails and leaves the contents untouched.
//!
//! Capacity counts one reserved slot for a terminator, so a buffer created with
//! capacity `C` holds at most `C - 1` bytes.

use std::fmt;

use thiserror::Error;
use tracing::error;

/// Capacity used for synthesized compiler command lines.
pub const COMMAND_BUFFER_CAPACITY: usize = 65_535;

/// An append was rejected because it would exceed the buffer capacity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no room in buffer: {len} bytes used, {additional} requested, capacity {capacity}")]
pub struct BufferError {
  pub len: usize,
  pub additional: usize,
  pub capacity: usize,
}

/// A string buffer that refuses to grow past a fixed capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedBuffer {
  buf: String,
  capacity: usize,
}

impl BoundedBuffer {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      buf: String::new(),
      capacity,
    }
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn len(&self) -> usize {
    self.buf.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buf.is_empty()
  }

  /// Bytes that can still be appended.
  pub fn remaining(&self) -> usize {
    self.limit().saturating_sub(self.buf.len())
  }

  /// Append a string, or fail without modifying the buffer.
  pub fn push_str(&mut self, s: &str) -> Result<(), BufferError> {
    if self.buf.len() + s.len() > self.limit() {
      let err = BufferError {
        len: self.buf.len(),
        additional: s.len(),
        capacity: self.capacity,
      };
      error!(%err, "buffer append rejected");
      return Err(err);
    }
    self.buf.push_str(s);
    Ok(())
  }

  /// Append a single character, or fail without modifying the buffer.
  pub fn push(&mut self, c: char) -> Result<(), BufferError> {
    let mut encoded = [0u8; 4];
    self.push_str(c.encode_utf8(&mut encoded))
  }

  /// Remove the last `count` characters. Removing more than present empties the buffer.
  pub fn truncate_end(&mut self, count: usize) {
    if count == 0 {
      return;
    }
    let new_len = self
      .buf
      .char_indices()
      .rev()
      .nth(count - 1)
      .map(|(idx, _)| idx)
      .unwrap_or(0);
    self.buf.truncate(new_len);
  }

  pub fn as_str(&self) -> &str {
    &self.buf
  }

  pub fn into_string(self) -> String {
    self.buf
  }

  fn limit(&self) -> usize {
    self.capacity.saturating_sub(1)
  }
}

impl fmt::Display for BoundedBuffer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.buf)
  }
}
