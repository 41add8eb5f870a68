//! Scratch accumulator
//!
//! Staging buffer for the token currently being read (tag name, attribute
//! key or value, text run, comment). The buffer is reused across tokens and
//! only becomes part of the tree through [`ScratchBuffer::snapshot`].

use std::alloc::{handle_alloc_error, Layout};

/// Capacity added each time the buffer is full
pub const SCRATCH_GROW_STEP: usize = 1024;

/// Growable byte buffer with fixed-increment growth
#[derive(Debug)]
pub struct ScratchBuffer {
    bytes: Vec<u8>,
}

impl ScratchBuffer {
    /// Create a buffer with one growth step of capacity
    pub fn new() -> Self {
        let mut buffer = Self { bytes: Vec::new() };
        buffer.grow();
        buffer
    }

    /// Append a byte, growing by [`SCRATCH_GROW_STEP`] when full
    pub fn push(&mut self, byte: u8) {
        if self.bytes.len() == self.bytes.capacity() {
            self.grow();
        }
        self.bytes.push(byte);
    }

    /// Out of memory is unrecoverable here, so growth failure aborts.
    fn grow(&mut self) {
        if self.bytes.try_reserve_exact(SCRATCH_GROW_STEP).is_err() {
            let wanted = self.bytes.capacity().saturating_add(SCRATCH_GROW_STEP);
            log::error!("Unable to grow scratch buffer to {} bytes", wanted);
            handle_alloc_error(Layout::array::<u8>(wanted).unwrap_or(Layout::new::<u8>()));
        }
    }

    /// Forget the current contents, keeping the capacity
    pub fn reset(&mut self) {
        self.bytes.clear();
    }

    /// Copy the current contents into a new owned string
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn snapshot(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Last byte, if any
    pub fn last(&self) -> Option<u8> {
        self.bytes.last().copied()
    }

    /// Remove and return the last byte
    pub fn pop(&mut self) -> Option<u8> {
        self.bytes.pop()
    }

    pub fn ends_with(&self, suffix: &[u8]) -> bool {
        self.bytes.ends_with(suffix)
    }

    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.bytes.starts_with(prefix)
    }
}

impl Default for ScratchBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_capacity() {
        let scratch = ScratchBuffer::new();
        assert!(scratch.is_empty());
        assert!(scratch.capacity() >= SCRATCH_GROW_STEP);
    }

    #[test]
    fn test_push_and_snapshot() {
        let mut scratch = ScratchBuffer::new();
        for &b in b"DOC" {
            scratch.push(b);
        }
        assert_eq!(scratch.snapshot(), "DOC");
        assert_eq!(scratch.last(), Some(b'C'));

        scratch.reset();
        assert!(scratch.is_empty());
        assert_eq!(scratch.snapshot(), "");
    }

    #[test]
    fn test_grows_past_initial_capacity() {
        let mut scratch = ScratchBuffer::new();
        let initial = scratch.capacity();
        for _ in 0..initial + 1 {
            scratch.push(b'x');
        }
        assert_eq!(scratch.len(), initial + 1);
        assert!(scratch.capacity() >= initial + SCRATCH_GROW_STEP);
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut scratch = ScratchBuffer::new();
        for _ in 0..3000 {
            scratch.push(b'a');
        }
        let grown = scratch.capacity();
        scratch.reset();
        assert_eq!(scratch.capacity(), grown);
    }

    #[test]
    fn test_suffix_and_prefix() {
        let mut scratch = ScratchBuffer::new();
        for &b in b"<!-- note -->" {
            scratch.push(b);
        }
        assert!(scratch.starts_with(b"<!--"));
        assert!(scratch.ends_with(b"-->"));
        assert_eq!(scratch.pop(), Some(b'>'));
        assert!(!scratch.ends_with(b"-->"));
    }

    #[test]
    fn test_snapshot_is_lossy_on_invalid_utf8() {
        let mut scratch = ScratchBuffer::new();
        scratch.push(b'a');
        scratch.push(0xFF);
        assert_eq!(scratch.snapshot(), "a\u{FFFD}");
    }
}
