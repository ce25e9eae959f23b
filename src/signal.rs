//! Edge-triggered wake-up flag.

use core::sync::atomic::{AtomicBool, Ordering};

/// Coalescing notification raised by producers and consumed by the shell.
///
/// Any number of [`notify`](Signal::notify) calls before the next
/// [`take`](Signal::take) count as one. Only atomic loads and stores are
/// used, so the flag works on targets without compare-and-swap.
#[derive(Debug, Default)]
pub struct Signal {
    pending: AtomicBool,
}

impl Signal {
    /// Creates a cleared signal.
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Raises the signal.
    pub fn notify(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Clears the signal and reports whether it was raised.
    ///
    /// A `notify` landing between the load and the store is absorbed by the
    /// processing pass that follows, which drains everything buffered.
    pub fn take(&self) -> bool {
        if !self.pending.load(Ordering::Acquire) {
            return false;
        }
        self.pending.store(false, Ordering::Release);
        true
    }

    /// Reports whether the signal is raised without clearing it.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_coalesce() {
        let signal = Signal::new();
        assert!(!signal.take());
        signal.notify();
        signal.notify();
        signal.notify();
        assert!(signal.is_pending());
        assert!(signal.take());
        assert!(!signal.take());
    }
}
