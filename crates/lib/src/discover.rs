//! Source discovery.
//!
//! Walks a module's source directory depth first and yields every `.c` file
//! whose name does not end with one of the module's exclusion suffixes.
//!
//! Entries of each directory are visited in file-name order, so two walks over
//! an unchanged tree always produce the same sequence regardless of how the
//! platform enumerates directories.
//!
//! Directory enumeration goes through [`DirectoryLister`], the only place that
//! touches the filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::module::StringArray;

/// Extension of files accepted as compilable sources.
pub const SOURCE_EXTENSION: &str = ".c";

#[derive(Debug, Error)]
pub enum DiscoveryError {
  #[error("failed to read directory {}: {source}", path.display())]
  ReadDir { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
  File,
  Directory,
  Other,
}

/// An immediate child of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
  pub name: String,
  pub kind: EntryKind,
}

impl DirEntry {
  pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
    Self { name: name.into(), kind }
  }
}

/// Enumerates the immediate children of a directory.
pub trait DirectoryLister {
  fn list(&self, dir: &Path) -> io::Result<Vec<DirEntry>>;
}

/// Lists directories through the host filesystem.
///
/// Symlinks to files count as files. Symlinks to directories are not followed,
/// which keeps link cycles from recursing forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeLister;

impl DirectoryLister for NativeLister {
  fn list(&self, dir: &Path) -> io::Result<Vec<DirEntry>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
      let entry = entry.map_err(io::Error::from)?;
      let Some(name) = entry.file_name().to_str() else {
        warn!(dir = %dir.display(), name = ?entry.file_name(), "skipping entry with non UTF-8 name");
        continue;
      };

      let file_type = entry.file_type();
      let kind = if file_type.is_dir() {
        EntryKind::Directory
      } else if file_type.is_file() {
        EntryKind::File
      } else if file_type.is_symlink() && fs::metadata(entry.path()).is_ok_and(|m| m.is_file()) {
        EntryKind::File
      } else {
        EntryKind::Other
      };

      entries.push(DirEntry::new(name, kind));
    }
    Ok(entries)
  }
}

/// A source file accepted by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
  /// Directory containing the file.
  pub directory: PathBuf,
  /// Bare file name.
  pub name: String,
}

impl SourceFile {
  pub fn path(&self) -> PathBuf {
    self.directory.join(&self.name)
  }
}

/// Whether a file name carries the source extension (a bare `.c` does not).
pub fn is_source_file(name: &str) -> bool {
  name.len() > SOURCE_EXTENSION.len() && name.ends_with(SOURCE_EXTENSION)
}

/// Whether a file name ends with any exclusion suffix.
pub fn is_excluded(name: &str, exclusions: &StringArray) -> bool {
  exclusions.iter().any(|suffix| name.ends_with(suffix))
}

/// Walk `root` and hand every accepted source file to `visit`.
///
/// `visit` is the accumulator of the walk: it is threaded through every
/// recursive step, and an error from it stops the walk.
pub fn walk_sources<L, F, E>(lister: &L, root: &Path, exclusions: &StringArray, visit: &mut F) -> Result<(), E>
where
  L: DirectoryLister + ?Sized,
  F: FnMut(&SourceFile) -> Result<(), E>,
  E: From<DiscoveryError>,
{
  debug!(root = %root.display(), "discovering sources");
  walk_dir(lister, root, exclusions, visit)
}

fn walk_dir<L, F, E>(lister: &L, dir: &Path, exclusions: &StringArray, visit: &mut F) -> Result<(), E>
where
  L: DirectoryLister + ?Sized,
  F: FnMut(&SourceFile) -> Result<(), E>,
  E: From<DiscoveryError>,
{
  let mut entries = lister.list(dir).map_err(|source| DiscoveryError::ReadDir {
    path: dir.to_path_buf(),
    source,
  })?;
  entries.sort_by(|a, b| a.name.cmp(&b.name));

  for entry in entries {
    if entry.name == "." || entry.name == ".." {
      continue;
    }

    match entry.kind {
      EntryKind::Directory => walk_dir(lister, &dir.join(&entry.name), exclusions, visit)?,
      EntryKind::File => {
        if !is_source_file(&entry.name) {
          continue;
        }
        if is_excluded(&entry.name, exclusions) {
          trace!(file = %entry.name, "excluded");
          continue;
        }
        visit(&SourceFile {
          directory: dir.to_path_buf(),
          name: entry.name,
        })?;
      }
      EntryKind::Other => {}
    }
  }

  Ok(())
}

/// Collect every accepted source file under `root`.
pub fn discover_sources<L>(lister: &L, root: &Path, exclusions: &StringArray) -> Result<Vec<SourceFile>, DiscoveryError>
where
  L: DirectoryLister + ?Sized,
{
  let mut found = Vec::new();
  walk_sources(lister, root, exclusions, &mut |source: &SourceFile| {
    found.push(source.clone());
    Ok::<_, DiscoveryError>(())
  })?;
  Ok(found)
}
