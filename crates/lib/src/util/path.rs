//! Path string helpers.

use std::path::{MAIN_SEPARATOR, Path};

/// Whether a directory string already ends with the platform separator.
pub fn ends_with_separator(dir: &str) -> bool {
  dir.ends_with(MAIN_SEPARATOR)
}

/// Join a directory string and a file name, inserting the platform separator
/// only when the directory lacks a trailing one.
pub fn join_output(dir: &str, file_name: &str) -> String {
  if ends_with_separator(dir) {
    format!("{dir}{file_name}")
  } else {
    format!("{dir}{MAIN_SEPARATOR}{file_name}")
  }
}

/// Replace every backslash with a forward slash.
pub fn to_forward_slashes(s: &str) -> String {
  s.replace('\\', "/")
}

/// Render a path as a forward-slash string.
pub fn portable(path: &Path) -> String {
  to_forward_slashes(&path.display().to_string())
}
