//! Module data model.

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An ordered, immutable list of strings.
///
/// Clones share the same storage, so one flag set can back the shared lists of
/// any number of modules without copying.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StringArray(Arc<[String]>);

impl StringArray {
  pub fn new<I, S>(items: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self(items.into_iter().map(Into::into).collect())
  }

  pub fn empty() -> Self {
    Self(Arc::from(Vec::new()))
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }

  /// Whether both arrays point at the same storage.
  pub fn shares_storage(&self, other: &StringArray) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Default for StringArray {
  fn default() -> Self {
    Self::empty()
  }
}

impl Deref for StringArray {
  type Target = [String];

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl From<Vec<String>> for StringArray {
  fn from(items: Vec<String>) -> Self {
    Self(Arc::from(items))
  }
}

impl From<&[&str]> for StringArray {
  fn from(items: &[&str]) -> Self {
    Self::new(items.iter().copied())
  }
}

impl<const N: usize> From<[&str; N]> for StringArray {
  fn from(items: [&str; N]) -> Self {
    Self::new(items)
  }
}

/// A named group of source files plus the configuration needed to produce one
/// output artifact.
///
/// Every list comes as a shared/unique pair. Both halves are concatenated
/// (shared first) when the command line is synthesized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleDescriptor {
  /// Identifier used in diagnostics.
  pub name: String,
  /// Compiler executable name or path (clang, gcc, cc, ...).
  pub compiler: String,
  /// Root of the recursive source search.
  pub source_directory: String,
  pub output_directory: String,
  /// Artifact file name including any extension.
  pub output_file_name: String,

  pub shared_compiler_flags: StringArray,
  pub unique_compiler_flags: StringArray,
  pub shared_include_paths: StringArray,
  pub unique_include_paths: StringArray,
  pub shared_library_paths: StringArray,
  pub unique_library_paths: StringArray,
  pub shared_linker_flags: StringArray,
  pub unique_linker_flags: StringArray,

  /// Source files outside the source tree, appended verbatim.
  pub additional_source_files: StringArray,
  /// File name suffixes; matching discovered files are dropped.
  pub excluded_source_files: StringArray,
}

impl ModuleDescriptor {
  /// Source directory resolved against `root` (absolute paths are kept as is).
  pub fn source_path(&self, root: &Path) -> PathBuf {
    root.join(&self.source_directory)
  }

  /// Output directory resolved against `root`.
  pub fn output_path(&self, root: &Path) -> PathBuf {
    root.join(&self.output_directory)
  }
}
