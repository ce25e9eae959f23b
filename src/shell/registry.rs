//! Sorted command table.

use heapless::Vec;

use super::command::Command;
use crate::Error;

/// Fixed-capacity table of command descriptors, kept sorted by name.
///
/// Lookup is a binary search. Names are unique: a batch containing a name
/// that is already registered, or the same name twice, is rejected as a
/// whole.
#[derive(Debug)]
pub struct Registry<const N: usize> {
    commands: Vec<&'static Command, N>,
}

impl<const N: usize> Registry<N> {
    /// Creates an empty table.
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Adds every command of `batch`, keeping the table sorted.
    ///
    /// Nothing is inserted unless the whole batch is accepted.
    pub fn register(&mut self, batch: &'static [Command]) -> Result<(), Error> {
        if self.commands.len() + batch.len() > N {
            warn!(
                "command table full, {} registered, {} requested, capacity {}",
                self.commands.len(),
                batch.len(),
                N
            );
            return Err(Error::RegistryFull);
        }
        for (index, command) in batch.iter().enumerate() {
            if command.name.is_empty() {
                warn!("rejected command with empty name");
                return Err(Error::EmptyName);
            }
            let repeated = batch[..index].iter().any(|c| c.name == command.name);
            if repeated || self.find(command.name).is_some() {
                warn!("rejected duplicate command {}", command.name);
                return Err(Error::DuplicateCommand);
            }
        }

        for command in batch {
            let at = self.commands.partition_point(|c| c.name < command.name);
            self.commands
                .push(command)
                .map_err(|_| Error::RegistryFull)?;
            self.commands[at..].rotate_right(1);
        }
        Ok(())
    }

    /// Finds the command registered under `name`.
    pub fn find(&self, name: &str) -> Option<&'static Command> {
        self.commands
            .binary_search_by(|c| c.name.cmp(name))
            .ok()
            .map(|index| self.commands[index])
    }

    /// All commands in name order.
    pub fn as_slice(&self) -> &[&'static Command] {
        &self.commands
    }

    /// Iterates over the commands in name order.
    pub fn iter(&self) -> impl Iterator<Item = &'static Command> + '_ {
        self.commands.iter().copied()
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Maximum number of commands.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for Registry<N> {
    fn default() -> Self {
        Self::new()
    }
}
