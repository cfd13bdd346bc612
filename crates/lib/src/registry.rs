//! Named-command registry.
//!
//! Hosts register `{name, description, handler}` entries and dispatch the
//! process argument vector against them: `argv[1]` selects the command by exact
//! name and the handler receives the full vector.

use std::io::{self, Write};

use thiserror::Error;
use tracing::{debug, error};

/// Listed for commands registered without a description.
pub const NO_DESCRIPTION: &str = "no description";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
  #[error("command name is empty")]
  EmptyName,

  #[error("command [{0}] is already registered")]
  Duplicate(String),
}

type Handler<'a, T> = Box<dyn Fn(&[String]) -> T + 'a>;

/// A named handler.
pub struct Command<'a, T> {
  name: String,
  description: Option<String>,
  handler: Handler<'a, T>,
}

impl<'a, T> Command<'a, T> {
  pub fn new(name: impl Into<String>, handler: impl Fn(&[String]) -> T + 'a) -> Self {
    Self {
      name: name.into(),
      description: None,
      handler: Box::new(handler),
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }
}

impl<T> std::fmt::Debug for Command<'_, T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Command")
      .field("name", &self.name)
      .field("description", &self.description)
      .finish_non_exhaustive()
  }
}

/// What dispatching an argument vector did.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch<T> {
  /// A handler ran and returned `output`.
  Ran { name: String, output: T },
  /// Fewer than two arguments; nothing ran.
  NoArguments,
  /// No command matched `name`; nothing ran.
  NotFound { name: String },
}

/// Ordered list of commands, matched first to last.
#[derive(Debug)]
pub struct CommandRegistry<'a, T> {
  commands: Vec<Command<'a, T>>,
}

impl<T> Default for CommandRegistry<'_, T> {
  fn default() -> Self {
    Self { commands: Vec::new() }
  }
}

impl<'a, T> CommandRegistry<'a, T> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a command. Blank and duplicate names are rejected.
  pub fn register(&mut self, command: Command<'a, T>) -> Result<&mut Self, RegistryError> {
    if command.name.trim().is_empty() {
      return Err(RegistryError::EmptyName);
    }
    if self.commands.iter().any(|c| c.name == command.name) {
      return Err(RegistryError::Duplicate(command.name));
    }
    self.commands.push(command);
    Ok(self)
  }

  pub fn len(&self) -> usize {
    self.commands.len()
  }

  pub fn is_empty(&self) -> bool {
    self.commands.is_empty()
  }

  pub fn commands(&self) -> impl Iterator<Item = &Command<'a, T>> {
    self.commands.iter()
  }

  /// Run the handler named by `argv[1]`.
  pub fn dispatch(&self, argv: &[String]) -> Dispatch<T> {
    let Some(requested) = argv.get(1) else {
      error!("no arguments passed to build script");
      return Dispatch::NoArguments;
    };

    match self.commands.iter().find(|c| c.name == *requested) {
      Some(command) => {
        debug!(command = %command.name, "dispatching");
        Dispatch::Ran {
          name: command.name.clone(),
          output: (command.handler)(argv),
        }
      }
      None => {
        error!(command = %requested, "command not found");
        Dispatch::NotFound {
          name: requested.clone(),
        }
      }
    }
  }

  /// Write one line per command: its name and description.
  pub fn write_listing<W: Write>(&self, out: &mut W) -> io::Result<()> {
    let width = self.commands.iter().map(|c| c.name.len()).max().unwrap_or(0);
    for command in &self.commands {
      writeln!(
        out,
        "  {:width$}  {}",
        command.name,
        command.description().unwrap_or(NO_DESCRIPTION),
      )?;
    }
    Ok(())
  }
}
