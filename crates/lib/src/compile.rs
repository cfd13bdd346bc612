//! Command synthesis and module compilation.
//!
//! A module compiles with one invocation:
//!
//! ```text
//! <compiler> <flags> "<discovered sources>" <additional sources> -o <output dir>/<output file>
//! ```
//!
//! [`BuildContext`] owns the working root that relative module paths resolve
//! against, plus the directory lister and process runner used to discover
//! sources and run the compiler.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::buffer::{BoundedBuffer, BufferError, COMMAND_BUFFER_CAPACITY};
use crate::discover::{DirectoryLister, DiscoveryError, NativeLister, SourceFile, walk_sources};
use crate::flags::write_flags;
use crate::module::{ModuleDescriptor, ModuleError};
use crate::process::{ProcessError, ProcessRunner, RunOutcome, ShellRunner};
use crate::util::path::join_output;

#[derive(Debug, Error)]
pub enum CompileError {
  #[error(transparent)]
  Module(#[from] ModuleError),

  #[error("command for module [{module}] does not fit the command buffer: {source}")]
  CommandTooLong { module: String, source: BufferError },

  #[error(transparent)]
  Discovery(#[from] DiscoveryError),

  #[error("failed to resolve source directory {}: {source}", path.display())]
  Resolve { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Process(#[from] ProcessError),
}

/// A synthesized compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedCommand {
  pub command_line: String,
  /// Number of discovered source files on the line.
  pub discovered: usize,
}

/// Result of compiling one module.
#[derive(Debug, Clone)]
pub struct CompileReport {
  pub module: String,
  pub command_line: String,
  pub discovered: usize,
  pub outcome: RunOutcome,
  pub elapsed: Duration,
}

impl CompileReport {
  pub fn is_success(&self) -> bool {
    self.outcome.is_success()
  }
}

/// Build `<compiler> <flags>` for a module, without sources or output.
///
/// This is the command recorded in the compile database.
pub fn flags_command(module: &ModuleDescriptor) -> Result<String, BufferError> {
  let mut buf = BoundedBuffer::with_capacity(COMMAND_BUFFER_CAPACITY);
  buf.push_str(&module.compiler)?;
  buf.push(' ')?;
  write_flags(&mut buf, module)?;
  Ok(buf.as_str().trim_end().to_string())
}

/// Working root plus the capabilities needed to discover sources and run commands.
#[derive(Debug, Clone)]
pub struct BuildContext<L = NativeLister, R = ShellRunner> {
  root: PathBuf,
  lister: L,
  runner: R,
  timeout: Option<Duration>,
}

impl BuildContext {
  /// Context rooted at `root` using the host filesystem and platform shell.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      lister: NativeLister,
      runner: ShellRunner::new(),
      timeout: None,
    }
  }

  /// Context rooted at the current working directory.
  pub fn current_dir() -> io::Result<Self> {
    Ok(Self::new(std::env::current_dir()?))
  }
}

impl<L, R> BuildContext<L, R>
where
  L: DirectoryLister,
  R: ProcessRunner,
{
  pub fn with_lister<L2: DirectoryLister>(self, lister: L2) -> BuildContext<L2, R> {
    BuildContext {
      root: self.root,
      lister,
      runner: self.runner,
      timeout: self.timeout,
    }
  }

  pub fn with_runner<R2: ProcessRunner>(self, runner: R2) -> BuildContext<L, R2> {
    BuildContext {
      root: self.root,
      lister: self.lister,
      runner,
      timeout: self.timeout,
    }
  }

  /// Bound every compiler run by `timeout`.
  pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn lister(&self) -> &L {
    &self.lister
  }

  pub fn runner(&self) -> &R {
    &self.runner
  }

  /// Absolute source directory of a module.
  pub fn resolve_source_dir(&self, module: &ModuleDescriptor) -> io::Result<PathBuf> {
    dunce::canonicalize(module.source_path(&self.root))
  }

  /// Validate a module and synthesize its compiler invocation.
  ///
  /// Nothing is spawned or written; any configuration problem is returned
  /// before the source tree is read.
  pub fn synthesize(&self, module: &ModuleDescriptor) -> Result<SynthesizedCommand, CompileError> {
    module.validate()?;
    module.check_directories(&self.root)?;
    let source_dir = self.resolve_source_dir(module).map_err(|source| CompileError::Resolve {
      path: module.source_path(&self.root),
      source,
    })?;

    let too_long = |source: BufferError| CompileError::CommandTooLong {
      module: module.name.clone(),
      source,
    };

    let mut buf = BoundedBuffer::with_capacity(COMMAND_BUFFER_CAPACITY);
    buf.push_str(&module.compiler).map_err(too_long)?;
    buf.push(' ').map_err(too_long)?;
    write_flags(&mut buf, module).map_err(too_long)?;

    let mut discovered = 0;
    walk_sources(
      &self.lister,
      &source_dir,
      &module.excluded_source_files,
      &mut |source: &SourceFile| -> Result<(), CompileError> {
        let quoted = format!("\"{}\" ", source.path().display());
        buf.push_str(&quoted).map_err(too_long)?;
        discovered += 1;
        Ok(())
      },
    )?;

    for extra in module.additional_source_files.iter() {
      buf.push_str(extra).map_err(too_long)?;
      buf.push(' ').map_err(too_long)?;
    }

    buf.push_str("-o ").map_err(too_long)?;
    buf
      .push_str(&join_output(&module.output_directory, &module.output_file_name))
      .map_err(too_long)?;

    debug!(module = %module.name, discovered, "synthesized compile command");

    Ok(SynthesizedCommand {
      command_line: buf.into_string(),
      discovered,
    })
  }

  /// Synthesize and run the compile command of one module.
  ///
  /// A compiler that exits non-zero is reported through the returned
  /// [`CompileReport::outcome`], not as an error.
  pub fn compile(&self, module: &ModuleDescriptor) -> Result<CompileReport, CompileError> {
    let started = Instant::now();
    let command = self.synthesize(module)?;

    if command.discovered == 0 && module.additional_source_files.is_empty() {
      warn!(module = %module.name, "no source files found");
    }

    info!(module = %module.name, sources = command.discovered, "compiling module");
    let outcome = self.runner.run(&command.command_line, &self.root, self.timeout)?;

    Ok(CompileReport {
      module: module.name.clone(),
      command_line: command.command_line,
      discovered: command.discovered,
      outcome,
      elapsed: started.elapsed(),
    })
  }

  /// Compile modules in order, stopping at the first module that cannot be
  /// compiled at all. Failed compiler runs do not stop the sequence.
  pub fn compile_all<'m, I>(&self, modules: I) -> Result<Vec<CompileReport>, CompileError>
  where
    I: IntoIterator<Item = &'m ModuleDescriptor>,
  {
    modules.into_iter().map(|module| self.compile(module)).collect()
  }
}
