//! Fixed-capacity byte queue feeding the shell.
//!
//! The ring buffer is the shell's staging area. Each pass pulls bytes from
//! the input queue into it with [`RingBuffer::write`]. The shell inspects
//! pending bytes in place with [`RingBuffer::peek`] and only consumes them
//! with [`RingBuffer::read_skip`] once the active consumer is done with them.
//!
//! # Examples
//!
//! ```rust
//! use evshell::RingBuffer;
//!
//! let mut rb: RingBuffer<8> = RingBuffer::new();
//! assert_eq!(rb.write(b"hello"), 5);
//! assert_eq!(rb.peek(1), b"ello");
//! assert_eq!(rb.read_skip(2), 2);
//! assert_eq!(rb.get(0), Some(b'l'));
//! ```

use core::fmt;
use heapless::Deque;

/// A circular byte buffer holding up to `N` bytes.
pub struct RingBuffer<const N: usize> {
    inner: Deque<u8, N>,
}

impl<const N: usize> RingBuffer<N> {
    /// Creates an empty ring buffer.
    pub const fn new() -> Self {
        Self {
            inner: Deque::new(),
        }
    }

    /// Total number of bytes the buffer can hold.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of bytes currently buffered.
    pub fn size(&self) -> usize {
        self.inner.len()
    }

    /// Number of bytes that can still be written.
    pub fn free_size(&self) -> usize {
        N - self.inner.len()
    }

    /// Returns `true` if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the contiguous span starting at logical `offset`.
    ///
    /// Buffered data may wrap around the end of the backing storage, so a
    /// single call can return less than `size() - offset` bytes. Call again
    /// at `offset + span.len()` to reach the wrapped part. An offset at or
    /// past the end yields an empty slice.
    pub fn peek(&self, offset: usize) -> &[u8] {
        let (head, tail) = self.inner.as_slices();
        if offset < head.len() {
            &head[offset..]
        } else if offset - head.len() < tail.len() {
            &tail[offset - head.len()..]
        } else {
            &[]
        }
    }

    /// Returns the byte at logical `offset` without consuming it.
    pub fn get(&self, offset: usize) -> Option<u8> {
        self.peek(offset).first().copied()
    }

    /// Moves up to `out.len()` bytes into `out` and returns how many were read.
    pub fn read(&mut self, out: &mut [u8]) -> usize {
        let mut count = 0;
        for slot in out.iter_mut() {
            match self.inner.pop_front() {
                Some(byte) => {
                    *slot = byte;
                    count += 1;
                }
                None => break,
            }
        }
        count
    }

    /// Discards up to `n` bytes and returns how many were dropped.
    pub fn read_skip(&mut self, n: usize) -> usize {
        let mut count = 0;
        while count < n && self.inner.pop_front().is_some() {
            count += 1;
        }
        count
    }

    /// Appends as much of `data` as fits and returns the number of bytes
    /// written.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let mut count = 0;
        for &byte in data {
            if self.inner.push_back(byte).is_err() {
                break;
            }
            count += 1;
        }
        count
    }

    /// Drops every buffered byte.
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for RingBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("size", &self.size())
            .field("capacity", &N)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_stops_when_full() {
        let mut rb: RingBuffer<4> = RingBuffer::new();
        assert_eq!(rb.write(b"abcdef"), 4);
        assert_eq!(rb.free_size(), 0);
        assert_eq!(rb.write(b"x"), 0);
    }

    #[test]
    fn peek_covers_wrapped_data_in_two_spans() {
        let mut rb: RingBuffer<4> = RingBuffer::new();
        rb.write(b"abc");
        rb.read_skip(2);
        rb.write(b"def");

        let mut collected = std::vec::Vec::new();
        let first = rb.peek(0);
        collected.extend_from_slice(first);
        collected.extend_from_slice(rb.peek(first.len()));
        assert_eq!(collected, b"cdef");
        assert!(rb.peek(4).is_empty());
    }

    #[test]
    fn read_moves_bytes_out() {
        let mut rb: RingBuffer<8> = RingBuffer::new();
        rb.write(b"xyz");
        let mut out = [0u8; 2];
        assert_eq!(rb.read(&mut out), 2);
        assert_eq!(&out, b"xy");
        assert_eq!(rb.size(), 1);
        assert_eq!(rb.read_skip(10), 1);
        assert!(rb.is_empty());
    }

    #[test]
    fn get_past_end_is_none() {
        let mut rb: RingBuffer<8> = RingBuffer::new();
        rb.write(b"a");
        assert_eq!(rb.get(0), Some(b'a'));
        assert_eq!(rb.get(1), None);
        rb.clear();
        assert_eq!(rb.get(0), None);
    }
}
