//! cbs-lib: Core types and logic for the cbs build description layer
//!
//! This crate turns declarative module descriptions into compiler invocations:
//! - `ModuleDescriptor`: a named group of sources plus compiler/linker configuration
//! - `BuildContext`: synthesizes and runs the compile command for a module
//! - `compile_db`: writes `compile_commands.json` for editor and analyzer tooling
//! - `CommandRegistry`: dispatches CLI arguments to host-supplied handlers

pub mod buffer;
pub mod compile;
pub mod compile_db;
pub mod discover;
pub mod flags;
pub mod module;
pub mod process;
pub mod registry;
pub mod util;

pub use compile::{BuildContext, CompileError, CompileReport, SynthesizedCommand};
pub use compile_db::{CompileCommand, CompileDbError, CompileDbReport};
pub use module::{ModuleDescriptor, ModuleError, StringArray};
pub use process::{ProcessError, ProcessRunner, RunOutcome, ShellRunner};
pub use registry::{Command, CommandRegistry, Dispatch, RegistryError};
