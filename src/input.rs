//! Lock-free input path from producers to a shell.
//!
//! Bytes arrive from a receive interrupt, a network stack or another task
//! while the shell may be in the middle of a pass. [`InputQueue::split`]
//! hands out an [`InputProducer`] for that side and an [`InputConsumer`]
//! that goes into [`Shell::new`](crate::Shell::new). The halves share a
//! single-producer single-consumer queue and a [`Signal`], so neither side
//! ever locks the other out.
//!
//! # Examples
//!
//! ```rust
//! use evshell::InputQueue;
//!
//! let mut queue: InputQueue<16> = InputQueue::new();
//! let (mut producer, consumer) = queue.split();
//! assert_eq!(producer.feed(b"ls\r"), 3);
//! assert_eq!(consumer.len(), 3);
//! assert!(consumer.is_notified());
//! ```

use core::fmt;

use heapless::spsc::{Consumer, Producer, Queue};

use crate::ringbuf::RingBuffer;
use crate::signal::Signal;

/// Backing storage for one shell's input. Holds up to `N - 1` bytes.
///
/// `split` needs exclusive access, so the queue usually lives in a static
/// cell or on the stack frame that also owns the main loop.
pub struct InputQueue<const N: usize> {
    queue: Queue<u8, N>,
    signal: Signal,
}

impl<const N: usize> InputQueue<N> {
    /// Creates an empty queue.
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
            signal: Signal::new(),
        }
    }

    /// Splits the queue into its producer and consumer halves.
    pub fn split(&mut self) -> (InputProducer<'_, N>, InputConsumer<'_, N>) {
        let (producer, consumer) = self.queue.split();
        (
            InputProducer {
                queue: producer,
                signal: &self.signal,
            },
            InputConsumer {
                queue: consumer,
                signal: &self.signal,
            },
        )
    }
}

impl<const N: usize> Default for InputQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for InputQueue<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputQueue")
            .field("len", &self.queue.len())
            .field("capacity", &self.queue.capacity())
            .field("signal", &self.signal)
            .finish()
    }
}

/// Writing half, for interrupt handlers and network tasks.
pub struct InputProducer<'a, const N: usize> {
    queue: Producer<'a, u8, N>,
    signal: &'a Signal,
}

impl<const N: usize> InputProducer<'_, N> {
    /// Queues as much of `data` as fits and raises the notification.
    ///
    /// Returns the number of bytes queued.
    pub fn feed(&mut self, data: &[u8]) -> usize {
        let mut count = 0;
        for &byte in data {
            if self.queue.enqueue(byte).is_err() {
                break;
            }
            count += 1;
        }
        if count > 0 {
            self.signal.notify();
        }
        count
    }

    /// Raises the notification without queuing anything.
    pub fn notify(&self) {
        self.signal.notify();
    }

    /// Number of bytes that can still be queued.
    pub fn free_size(&self) -> usize {
        self.queue.capacity() - self.queue.len()
    }
}

impl<const N: usize> fmt::Debug for InputProducer<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputProducer")
            .field("free", &self.free_size())
            .finish_non_exhaustive()
    }
}

/// Reading half, owned by the shell.
pub struct InputConsumer<'a, const N: usize> {
    queue: Consumer<'a, u8, N>,
    signal: &'a Signal,
}

impl<const N: usize> InputConsumer<'_, N> {
    /// Bytes queued and not yet pulled by the shell.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        !self.queue.ready()
    }

    /// Reports whether the notification is raised.
    pub fn is_notified(&self) -> bool {
        self.signal.is_pending()
    }

    pub(crate) fn notify(&self) {
        self.signal.notify();
    }

    pub(crate) fn take_notification(&self) -> bool {
        self.signal.take()
    }

    /// Moves queued bytes into `buffer` until one of them runs out.
    pub(crate) fn drain_into<const M: usize>(&mut self, buffer: &mut RingBuffer<M>) -> usize {
        let mut moved = 0;
        while buffer.free_size() > 0 {
            let Some(byte) = self.queue.dequeue() else {
                break;
            };
            buffer.write(&[byte]);
            moved += 1;
        }
        moved
    }
}

impl<const N: usize> fmt::Debug for InputConsumer<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputConsumer")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn producer_stops_at_capacity() {
        let mut queue: InputQueue<4> = InputQueue::new();
        let (mut producer, consumer) = queue.split();
        assert_eq!(producer.feed(b"abcdef"), 3);
        assert_eq!(producer.free_size(), 0);
        assert_eq!(producer.feed(b"x"), 0);
        assert_eq!(consumer.len(), 3);
    }

    #[test]
    fn drain_respects_buffer_space() {
        let mut queue: InputQueue<8> = InputQueue::new();
        let (mut producer, mut consumer) = queue.split();
        let mut buffer: RingBuffer<4> = RingBuffer::new();

        producer.feed(b"abcdef");
        assert!(consumer.take_notification());
        assert_eq!(consumer.drain_into(&mut buffer), 4);
        assert_eq!(consumer.len(), 2);

        buffer.read_skip(3);
        assert_eq!(consumer.drain_into(&mut buffer), 2);
        assert!(consumer.is_empty());
        assert_eq!(buffer.size(), 3);
        assert!(!consumer.is_notified());
    }
}
