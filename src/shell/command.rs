//! Command descriptors.

use bitflags::bitflags;

use super::context::Context;

/// Synchronous entry point of a command.
///
/// Receives the argument vector with the command name at index 0. The
/// handler either calls [`Context::finish`] before returning or keeps its
/// [`ContextId`](super::ContextId) and finishes later from an event or a
/// host callback.
pub type CommandFn = fn(&mut dyn Context, &[&str]);

/// Event entry point of a command.
pub type EventFn = fn(&mut dyn Context, Events);

bitflags! {
    /// Static properties of a command.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CommandFlags: u8 {
        /// While running in the foreground the command receives raw input
        /// bytes instead of the line editor.
        const REDIRECT_INPUT = 1 << 0;
    }
}

bitflags! {
    /// Events delivered to a command's event handler.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Events: u8 {
        /// The shell is being torn down; release resources now.
        const SHELL_EXIT = 1 << 0;
        /// Ctrl-C was pressed while the command held the foreground.
        const INTERRUPT = 1 << 1;
        /// Redirected input is available through
        /// [`Context::redirect_input`].
        const INPUT_DATA = 1 << 2;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CommandFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "CommandFlags({=u8:#x})", self.bits())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Events {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Events({=u8:#x})", self.bits())
    }
}

/// A command that can be registered with a shell.
///
/// Descriptors are referenced, never copied, so they normally live in a
/// `static` table.
///
/// # Examples
///
/// ```rust
/// use core::fmt::Write;
/// use evshell::{Command, Context};
///
/// fn uptime(ctx: &mut dyn Context, _args: &[&str]) {
///     let _ = write!(ctx, "up 42s\r\n");
///     ctx.finish();
/// }
///
/// static COMMANDS: [Command; 1] = [
///     Command::new("uptime", "Show time since boot.", "uptime", uptime),
/// ];
/// ```
#[derive(Debug)]
pub struct Command {
    /// Unique name, used for lookup, sorting and completion.
    pub name: &'static str,
    /// One-line summary shown by `help`.
    pub description: &'static str,
    /// Usage text shown by `help <name>`.
    pub usage: &'static str,
    /// Static properties.
    pub flags: CommandFlags,
    /// Called once per dispatch.
    pub handler: CommandFn,
    /// Receives events while the command is running.
    pub event_handler: Option<EventFn>,
}

impl Command {
    /// Creates a descriptor without flags or event handler.
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandFn,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            flags: CommandFlags::empty(),
            handler,
            event_handler: None,
        }
    }

    /// Replaces the flags.
    pub const fn with_flags(mut self, flags: CommandFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Installs an event handler.
    pub const fn with_event_handler(mut self, handler: EventFn) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Returns `true` if the command takes raw input in the foreground.
    pub fn redirects_input(&self) -> bool {
        self.flags.contains(CommandFlags::REDIRECT_INPUT)
    }
}
