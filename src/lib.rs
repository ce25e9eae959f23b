//! # evshell - event-driven embedded shell
//!
//! An interactive command shell for serial consoles, RTT channels and telnet
//! sessions on resource-constrained devices. The shell is driven by "data
//! arrived" notifications instead of blocking reads, allocates nothing and
//! works in `no_std` environments.
//!
//! ## Features
//!
//! - **Line editing**: cursor movement, insert and delete anywhere in the
//!   line, clear screen, line kill and tab completion of command names
//! - **Escape decoding**: ANSI CSI, SS3 and string sequences are folded into
//!   logical keys or discarded
//! - **Foreground and background commands**: a trailing `&` runs a command
//!   next to the one holding the terminal
//! - **Asynchronous commands**: handlers may return before they are done
//!   and finish later from events or host callbacks
//! - **Lock-free input**: producers queue bytes from interrupt or network
//!   context through their own handle while the main loop runs passes
//! - **Input redirection**: a command can take raw terminal input, e.g. for
//!   password prompts or sub-protocols
//!
//! ## Usage
//!
//! ```rust
//! use core::fmt::Write;
//! use evshell::{Command, Config, Context, InputQueue, Shell, Terminal};
//!
//! struct Uart;
//!
//! impl Terminal for Uart {
//!     type Error = ();
//!
//!     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
//!         Ok(buf.len())
//!     }
//! }
//!
//! fn reboot(ctx: &mut dyn Context, _args: &[&str]) {
//!     let _ = ctx.write_str("rebooting\r\n");
//!     ctx.finish();
//! }
//!
//! static COMMANDS: [Command; 1] = [Command::new("reboot", "Restart the device.", "reboot", reboot)];
//!
//! let mut queue: InputQueue<256> = InputQueue::new();
//! let (mut rx, input) = queue.split();
//! let mut shell: Shell<Uart> = Shell::new(Config::new("node-1").unwrap(), Uart, input).unwrap();
//! shell.register(&COMMANDS).unwrap();
//!
//! // from the receive interrupt or network stack
//! rx.feed(b"reboot\r");
//!
//! // from the main loop
//! shell.run_until_idle();
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Log through `defmt`
//! - `log`: Log through the `log` facade when `defmt` is not enabled

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod fmt;

/// Session configuration.
pub mod config;

mod error;

/// Producer and consumer halves of the input queue.
pub mod input;

/// Input ring buffer.
pub mod ringbuf;

/// Shell engine: escape decoding, line editing, registry and dispatch.
pub mod shell;

/// Wake-up notification.
pub mod signal;

/// Output stream abstraction.
pub mod terminal;

pub use config::Config;
pub use error::Error;
pub use input::{InputConsumer, InputProducer, InputQueue};
pub use ringbuf::RingBuffer;
pub use shell::escape::Key;
pub use shell::{
    Command, CommandFlags, CommandFn, Context, ContextId, EventFn, Events, RedirectInput, Shell,
    Slot, State,
};
pub use signal::Signal;
pub use terminal::{QuitResult, Terminal};

/// Maximum number of arguments on a command line, command name included.
pub const MAX_ARGS: usize = 8;

/// Number of commands that can run in the background at once.
pub const MAX_BACKGROUND: usize = 4;

/// Maximum length of the host label in bytes.
pub const MAX_HOST_LEN: usize = 32;
