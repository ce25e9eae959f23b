//! Output stream abstraction.
//!
//! A [`Terminal`] is whatever carries the shell's output back to the user:
//! a UART, an RTT channel, a telnet connection. The shell writes prompts,
//! echo and command output through it and calls [`Terminal::flush`] at the
//! end of every processing pass.

use core::fmt;

/// Outcome of a request to leave the host's main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QuitResult {
    /// The host accepted the request and will stop.
    Success,
    /// The host refused or does not support quitting.
    Rejected,
}

/// Byte sink bound to a shell session.
///
/// # Examples
///
/// ```rust
/// use evshell::Terminal;
///
/// struct Uart;
///
/// impl Terminal for Uart {
///     type Error = ();
///
///     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
///         // push `buf` into the transmit FIFO
///         Ok(buf.len())
///     }
/// }
/// ```
pub trait Terminal {
    /// Error reported by the underlying transport.
    type Error: fmt::Debug;

    /// Writes some prefix of `buf` and returns its length.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;

    /// Commits everything written since the last flush.
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called after every pass that consumed input, so transports can
    /// re-arm reception or release flow control.
    fn input_processed(&mut self) {}

    /// Asks the host to leave its main loop.
    fn quit(&mut self) -> QuitResult {
        QuitResult::Rejected
    }
}

/// Writes all of `buf`, retrying short writes.
///
/// Output is best effort: a transport error or a write that makes no
/// progress drops the remainder.
pub(crate) fn write_all<T: Terminal>(terminal: &mut T, mut buf: &[u8]) {
    while !buf.is_empty() {
        match terminal.write(buf) {
            Ok(0) => {
                warn!("terminal stalled, dropped {} bytes", buf.len());
                return;
            }
            Ok(n) => buf = &buf[n.min(buf.len())..],
            Err(_) => {
                warn!("terminal write failed, dropped {} bytes", buf.len());
                return;
            }
        }
    }
}

pub(crate) fn flush<T: Terminal>(terminal: &mut T) {
    if terminal.flush().is_err() {
        warn!("terminal flush failed");
    }
}

/// `core::fmt::Write` adapter so `write!` can target a terminal.
pub(crate) struct Printer<'a, T: Terminal>(pub &'a mut T);

impl<T: Terminal> fmt::Write for Printer<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        write_all(self.0, s.as_bytes());
        Ok(())
    }
}
