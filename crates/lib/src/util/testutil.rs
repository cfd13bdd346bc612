//! Test utilities for cbs-lib.
//!
//! Filesystem fixtures plus in-memory stand-ins for the two platform
//! capabilities (directory listing and process spawning), so tests can count
//! side effects without touching a real compiler.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::discover::{DirEntry, DirectoryLister, EntryKind};
use crate::process::{ProcessError, ProcessRunner, RunOutcome};

/// Create empty files (and their parent directories) under `root`.
pub fn write_tree(root: &Path, files: &[&str]) {
  for file in files {
    let path = root.join(file);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, "int x;\n").unwrap();
  }
}

/// A directory lister backed by a fixed map of listings.
#[derive(Debug, Default)]
pub struct MemoryLister {
  dirs: HashMap<PathBuf, Vec<DirEntry>>,
}

impl MemoryLister {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn dir(mut self, path: &str, entries: &[(&str, EntryKind)]) -> Self {
    let entries = entries.iter().map(|(name, kind)| DirEntry::new(*name, *kind)).collect();
    self.dirs.insert(PathBuf::from(path), entries);
    self
  }
}

impl DirectoryLister for MemoryLister {
  fn list(&self, dir: &Path) -> io::Result<Vec<DirEntry>> {
    self
      .dirs
      .get(dir)
      .cloned()
      .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no listing for {}", dir.display())))
  }
}

/// A process runner that records command lines instead of spawning them.
#[derive(Debug)]
pub struct RecordingRunner {
  outcome: RunOutcome,
  calls: RefCell<Vec<String>>,
}

impl RecordingRunner {
  pub fn succeeding() -> Self {
    Self::with_outcome(RunOutcome::Success)
  }

  pub fn with_outcome(outcome: RunOutcome) -> Self {
    Self {
      outcome,
      calls: RefCell::new(Vec::new()),
    }
  }

  pub fn calls(&self) -> Vec<String> {
    self.calls.borrow().clone()
  }
}

impl ProcessRunner for RecordingRunner {
  fn run(&self, command_line: &str, _working_dir: &Path, _timeout: Option<Duration>) -> Result<RunOutcome, ProcessError> {
    self.calls.borrow_mut().push(command_line.to_string());
    Ok(self.outcome)
  }
}

/// Count every regular file below `root`.
pub fn count_files(root: &Path) -> usize {
  let mut count = 0;
  for entry in fs::read_dir(root).unwrap() {
    let entry = entry.unwrap();
    let file_type = entry.file_type().unwrap();
    if file_type.is_dir() {
      count += count_files(&entry.path());
    } else {
      count += 1;
    }
  }
  count
}
