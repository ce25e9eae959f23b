//! Running command contexts.

use core::fmt;

use super::command::Command;
use crate::terminal::QuitResult;

/// Where a running command is booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    /// The single foreground slot holding input focus.
    Foreground,
    /// One of the background slots.
    Background(u8),
}

/// Handle to a running command.
///
/// Every dispatch gets a fresh generation, so an id kept after its command
/// finished never addresses a later command reusing the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ContextId {
    pub(crate) slot: Slot,
    pub(crate) generation: u32,
}

impl ContextId {
    /// Slot the command occupies.
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Returns `true` for background commands.
    pub fn is_background(&self) -> bool {
        matches!(self.slot, Slot::Background(_))
    }
}

/// Raw input forwarded to a redirect-mode command.
///
/// The bytes still sit in the shell's ring buffer and may wrap around its
/// end, hence two spans. They are consumed once the event handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectInput<'a> {
    /// Bytes up to the wrap point.
    pub head: &'a [u8],
    /// Bytes after the wrap point, often empty.
    pub tail: &'a [u8],
}

impl RedirectInput<'_> {
    /// Total number of bytes.
    pub fn len(&self) -> usize {
        self.head.len() + self.tail.len()
    }

    /// Returns `true` if there are no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over all bytes in order.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.head.iter().chain(self.tail).copied()
    }

    /// Copies as many bytes as fit into `out` and returns the count.
    pub fn copy_to(&self, out: &mut [u8]) -> usize {
        let mut count = 0;
        for (slot, byte) in out.iter_mut().zip(self.bytes()) {
            *slot = byte;
            count += 1;
        }
        count
    }
}

/// What a command handler sees of the shell while it runs.
///
/// `core::fmt::Write` is a supertrait, so `write!(ctx, ...)` prints to the
/// session's terminal.
pub trait Context: fmt::Write {
    /// Handle of this command, valid until it finishes.
    fn id(&self) -> ContextId;

    /// Descriptor of the running command.
    fn command(&self) -> &'static Command;

    /// Usage text of the running command.
    fn usage(&self) -> &'static str {
        self.command().usage
    }

    /// Host label of the session.
    fn host(&self) -> &str;

    /// Returns `true` if the command runs in the background.
    fn is_background(&self) -> bool {
        self.id().is_background()
    }

    /// Opaque value stored with the context. Starts at zero.
    fn user_data(&self) -> usize;

    /// Replaces the opaque value stored with the context.
    fn set_user_data(&mut self, data: usize);

    /// Writes raw bytes to the terminal.
    fn write(&mut self, bytes: &[u8]);

    /// Flushes the terminal.
    fn flush(&mut self);

    /// Registered commands, sorted by name.
    fn commands(&self) -> &[&'static Command];

    /// Looks up a registered command.
    fn find_command(&self, name: &str) -> Option<&'static Command>;

    /// Input waiting for this command in redirect mode.
    ///
    /// `None` unless this command owns the foreground in redirect mode.
    fn redirect_input(&self) -> Option<RedirectInput<'_>>;

    /// Asks the host to leave its main loop. On success the session closes.
    fn request_quit(&mut self) -> QuitResult;

    /// Releases the context. A finished foreground command hands input back
    /// to the line editor. Further calls are no-ops.
    fn finish(&mut self);

    /// Returns `true` once [`finish`](Context::finish) was called or the
    /// context is otherwise gone.
    fn is_finished(&self) -> bool;

    /// Returns `true` while the session is being torn down.
    fn is_detached(&self) -> bool;
}
