//! Compilation database emission.
//!
//! Writes `compile_commands.json` describing, for every discovered source file
//! of every module, the directory it lives in, the compiler command and the
//! bare file name:
//!
//! ```json
//! [
//!   {
//!     "directory": "/work/project/src",
//!     "command": "clang -Wall -Iinclude",
//!     "file": "main.c"
//!   }
//! ]
//! ```
//!
//! Path separators in `directory` and `command` are always written as `/`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::buffer::BufferError;
use crate::compile::{BuildContext, flags_command};
use crate::discover::{DirectoryLister, DiscoveryError, SourceFile, walk_sources};
use crate::module::{ModuleDescriptor, ModuleError};
use crate::process::ProcessRunner;
use crate::util::path::{portable, to_forward_slashes};

pub const COMPILE_DB_FILE_NAME: &str = "compile_commands.json";

#[derive(Debug, Error)]
pub enum CompileDbError {
  #[error(transparent)]
  Module(#[from] ModuleError),

  #[error("command for module [{module}] does not fit the command buffer: {source}")]
  CommandTooLong { module: String, source: BufferError },

  #[error("failed to resolve source directory {}: {source}", path.display())]
  Resolve { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Discovery(#[from] DiscoveryError),

  #[error("couldn't create file at {}: {source}", path.display())]
  Create { path: PathBuf, source: io::Error },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },

  /// Raised inside the walk; converted to [`CompileDbError::Write`] with the path.
  #[error("write failed: {0}")]
  Io(#[from] io::Error),
}

/// One row of the compilation database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommand {
  pub directory: String,
  pub command: String,
  pub file: String,
}

/// Summary of a written database.
#[derive(Debug, Clone)]
pub struct CompileDbReport {
  pub path: PathBuf,
  pub records: usize,
}

/// Streams records into a JSON array.
///
/// Tracks whether a record has been written yet, so every record after the
/// first is preceded by exactly one comma.
pub struct RecordWriter<W: Write> {
  out: W,
  first: bool,
  written: usize,
}

impl<W: Write> RecordWriter<W> {
  /// Start the array.
  pub fn begin(mut out: W) -> io::Result<Self> {
    out.write_all(b"[")?;
    Ok(Self {
      out,
      first: true,
      written: 0,
    })
  }

  pub fn write_record(&mut self, record: &CompileCommand) -> io::Result<()> {
    if !self.first {
      self.out.write_all(b",")?;
    }
    write!(
      self.out,
      "\n  {{\n    \"directory\": {},\n    \"command\": {},\n    \"file\": {}\n  }}",
      json_string(&record.directory)?,
      json_string(&record.command)?,
      json_string(&record.file)?,
    )?;
    self.first = false;
    self.written += 1;
    Ok(())
  }

  pub fn written(&self) -> usize {
    self.written
  }

  /// Close the array and hand back the writer.
  pub fn finish(mut self) -> io::Result<(W, usize)> {
    self.out.write_all(b"\n]\n")?;
    self.out.flush()?;
    Ok((self.out, self.written))
  }
}

fn json_string(value: &str) -> io::Result<String> {
  serde_json::to_string(value).map_err(io::Error::from)
}

/// Module prepared for emission: resolved source root and database command.
struct Prepared<'m> {
  module: &'m ModuleDescriptor,
  source_dir: PathBuf,
  command: String,
}

impl<L, R> BuildContext<L, R>
where
  L: DirectoryLister,
  R: ProcessRunner,
{
  /// Write `compile_commands.json` for `modules` into the context root.
  ///
  /// Every module is validated and its source directory resolved before the
  /// file is created.
  pub fn write_compile_database<'m, I>(&self, modules: I) -> Result<CompileDbReport, CompileDbError>
  where
    I: IntoIterator<Item = &'m ModuleDescriptor>,
  {
    let prepared = modules
      .into_iter()
      .map(|module| self.prepare(module))
      .collect::<Result<Vec<_>, _>>()?;

    let path = self.root().join(COMPILE_DB_FILE_NAME);
    let file = File::create(&path).map_err(|source| CompileDbError::Create {
      path: path.clone(),
      source,
    })?;

    let with_path = |source: io::Error| CompileDbError::Write {
      path: path.clone(),
      source,
    };

    let mut writer = RecordWriter::begin(BufWriter::new(file)).map_err(with_path)?;
    for entry in &prepared {
      self.write_module(&mut writer, entry).map_err(|err| match err {
        CompileDbError::Io(source) => with_path(source),
        other => other,
      })?;
    }
    let (_, records) = writer.finish().map_err(with_path)?;

    info!(path = %path.display(), records, "wrote compile database");
    Ok(CompileDbReport { path, records })
  }

  fn prepare<'m>(&self, module: &'m ModuleDescriptor) -> Result<Prepared<'m>, CompileDbError> {
    module.validate()?;
    let source_dir = self.resolve_source_dir(module).map_err(|source| CompileDbError::Resolve {
      path: module.source_path(self.root()),
      source,
    })?;
    let command = flags_command(module).map_err(|source| CompileDbError::CommandTooLong {
      module: module.name.clone(),
      source,
    })?;

    Ok(Prepared {
      module,
      source_dir,
      command: to_forward_slashes(&command),
    })
  }

  fn write_module<W: Write>(&self, writer: &mut RecordWriter<W>, entry: &Prepared<'_>) -> Result<(), CompileDbError> {
    debug!(module = %entry.module.name, "adding module to compile database");
    walk_sources(
      self.lister(),
      &entry.source_dir,
      &entry.module.excluded_source_files,
      &mut |source: &SourceFile| -> Result<(), CompileDbError> {
        let record = CompileCommand {
          directory: portable(&source.directory),
          command: entry.command.clone(),
          file: source.name.clone(),
        };
        writer.write_record(&record)?;
        Ok(())
      },
    )
  }
}
