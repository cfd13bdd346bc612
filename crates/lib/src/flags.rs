//! Flag normalization.
//!
//! Turns the raw flag and path lists of a module into compiler syntax. The
//! emitted order is fixed: compiler flags, include paths, library paths, linker
//! flags, with the shared list of each category ahead of the unique one.

use std::borrow::Cow;

use crate::buffer::{BoundedBuffer, BufferError};
use crate::module::{ModuleDescriptor, StringArray};

/// Prefix a compiler flag with `-` unless it already has one.
pub fn normalize_compiler_flag(flag: &str) -> Cow<'_, str> {
  if flag.starts_with('-') {
    Cow::Borrowed(flag)
  } else {
    Cow::Owned(format!("-{flag}"))
  }
}

/// Prefix a linker flag with `-l` unless it already has one.
pub fn normalize_linker_flag(flag: &str) -> Cow<'_, str> {
  if flag.starts_with("-l") {
    Cow::Borrowed(flag)
  } else {
    Cow::Owned(format!("-l{flag}"))
  }
}

pub fn include_path_flag(path: &str) -> String {
  format!("-I{path}")
}

pub fn library_path_flag(path: &str) -> String {
  format!("-L{path}")
}

fn both<'a>(shared: &'a StringArray, unique: &'a StringArray) -> impl Iterator<Item = &'a str> {
  shared.iter().chain(unique.iter())
}

/// Every normalized flag token of a module, in command-line order.
pub fn flag_tokens(module: &ModuleDescriptor) -> impl Iterator<Item = Cow<'_, str>> {
  let compiler = both(&module.shared_compiler_flags, &module.unique_compiler_flags).map(normalize_compiler_flag);
  let includes = both(&module.shared_include_paths, &module.unique_include_paths).map(|p| Cow::Owned(include_path_flag(p)));
  let libraries = both(&module.shared_library_paths, &module.unique_library_paths).map(|p| Cow::Owned(library_path_flag(p)));
  let linker = both(&module.shared_linker_flags, &module.unique_linker_flags).map(normalize_linker_flag);

  compiler.chain(includes).chain(libraries).chain(linker)
}

/// Append every flag token followed by a single space.
pub fn write_flags(buf: &mut BoundedBuffer, module: &ModuleDescriptor) -> Result<(), BufferError> {
  for token in flag_tokens(module) {
    buf.push_str(&token)?;
    buf.push(' ')?;
  }
  Ok(())
}
