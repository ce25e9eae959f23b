//! Common error type for shell operations

use core::fmt;

/// A common error type for shell operations.
///
/// Configuration errors are returned from [`Shell::new`](crate::Shell::new)
/// and leave nothing behind. Every other variant is also reported to the
/// terminal as a user-visible message by the operation that produced it; the
/// session stays usable.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The line buffer has no capacity.
    LineBufferTooSmall,
    /// The input ring buffer is smaller than two machine words.
    InputBufferTooSmall,
    /// The command table cannot hold the built-in commands.
    CommandTableTooSmall,
    /// A configuration document could not be parsed.
    InvalidConfig,
    /// Registering the commands would exceed the command table.
    RegistryFull,
    /// A command with the same name is already registered.
    DuplicateCommand,
    /// A command descriptor has an empty name.
    EmptyName,
    /// The command line contains no tokens.
    EmptyCommand,
    /// The command line has more arguments than [`MAX_ARGS`](crate::MAX_ARGS).
    TooManyArguments,
    /// A quote was opened and never closed.
    UnterminatedQuote,
    /// The command line does not fit the line buffer.
    LineTooLong,
    /// An argument is not valid UTF-8.
    InvalidEncoding,
    /// No command is registered under the requested name.
    CommandNotFound,
    /// A foreground command already holds the session.
    ForegroundBusy,
    /// Every background slot is in use.
    BackgroundFull,
    /// The session was closed by the `exit` command.
    Closed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Error::LineBufferTooSmall => "line buffer too small",
            Error::InputBufferTooSmall => "input buffer too small",
            Error::CommandTableTooSmall => "command table too small",
            Error::InvalidConfig => "invalid configuration",
            Error::RegistryFull => "command table full",
            Error::DuplicateCommand => "duplicate command name",
            Error::EmptyName => "empty command name",
            Error::EmptyCommand => "empty command line",
            Error::TooManyArguments => "too many arguments",
            Error::UnterminatedQuote => "unterminated quote",
            Error::LineTooLong => "line too long",
            Error::InvalidEncoding => "invalid encoding",
            Error::CommandNotFound => "command not found",
            Error::ForegroundBusy => "foreground command running",
            Error::BackgroundFull => "background slots exhausted",
            Error::Closed => "shell closed",
        };
        f.write_str(text)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::LineBufferTooSmall => defmt::write!(f, "LineBufferTooSmall"),
            Error::InputBufferTooSmall => defmt::write!(f, "InputBufferTooSmall"),
            Error::CommandTableTooSmall => defmt::write!(f, "CommandTableTooSmall"),
            Error::InvalidConfig => defmt::write!(f, "InvalidConfig"),
            Error::RegistryFull => defmt::write!(f, "RegistryFull"),
            Error::DuplicateCommand => defmt::write!(f, "DuplicateCommand"),
            Error::EmptyName => defmt::write!(f, "EmptyName"),
            Error::EmptyCommand => defmt::write!(f, "EmptyCommand"),
            Error::TooManyArguments => defmt::write!(f, "TooManyArguments"),
            Error::UnterminatedQuote => defmt::write!(f, "UnterminatedQuote"),
            Error::LineTooLong => defmt::write!(f, "LineTooLong"),
            Error::InvalidEncoding => defmt::write!(f, "InvalidEncoding"),
            Error::CommandNotFound => defmt::write!(f, "CommandNotFound"),
            Error::ForegroundBusy => defmt::write!(f, "ForegroundBusy"),
            Error::BackgroundFull => defmt::write!(f, "BackgroundFull"),
            Error::Closed => defmt::write!(f, "Closed"),
        }
    }
}
