//! Module descriptors and their validation rules.
//!
//! A module must name itself, its compiler, its source directory and its output
//! location. Anything blank is rejected before the filesystem or a process is
//! touched.

mod types;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use types::{ModuleDescriptor, StringArray};

/// Configuration errors for a single module.
#[derive(Debug, Error)]
pub enum ModuleError {
  #[error("[name] in the module is empty or whitespace; every module must provide a name")]
  MissingName,

  #[error("[{field}] in module [{module}] is empty or whitespace")]
  MissingField { module: String, field: &'static str },

  #[error("output directory [{}] in module [{module}] doesn't exist", path.display())]
  OutputDirectoryMissing { module: String, path: PathBuf },

  #[error("source directory [{}] in module [{module}] doesn't exist", path.display())]
  SourceDirectoryMissing { module: String, path: PathBuf },
}

fn is_blank(value: &str) -> bool {
  value.trim().is_empty()
}

impl ModuleDescriptor {
  /// Check that every required field carries a value.
  pub fn validate(&self) -> Result<(), ModuleError> {
    if is_blank(&self.name) {
      return Err(ModuleError::MissingName);
    }

    let required = [
      ("compiler", &self.compiler),
      ("output_directory", &self.output_directory),
      ("output_file_name", &self.output_file_name),
      ("source_directory", &self.source_directory),
    ];
    for (field, value) in required {
      if is_blank(value) {
        return Err(ModuleError::MissingField {
          module: self.name.clone(),
          field,
        });
      }
    }

    Ok(())
  }

  /// Check that the output and source directories exist under `root`.
  pub fn check_directories(&self, root: &Path) -> Result<(), ModuleError> {
    let output = self.output_path(root);
    if !output.is_dir() {
      return Err(ModuleError::OutputDirectoryMissing {
        module: self.name.clone(),
        path: output,
      });
    }

    let source = self.source_path(root);
    if !source.is_dir() {
      return Err(ModuleError::SourceDirectoryMissing {
        module: self.name.clone(),
        path: source,
      });
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn valid_module() -> ModuleDescriptor {
    ModuleDescriptor {
      name: "main".into(),
      compiler: "cc".into(),
      source_directory: "src".into(),
      output_directory: "build".into(),
      output_file_name: "app".into(),
      ..Default::default()
    }
  }

  #[test]
  fn valid_module_passes() {
    assert!(valid_module().validate().is_ok());
  }

  #[test]
  fn blank_name_is_rejected() {
    let module = ModuleDescriptor {
      name: "  \t".into(),
      ..valid_module()
    };

    assert!(matches!(module.validate(), Err(ModuleError::MissingName)));
  }

  #[test]
  fn each_required_field_is_checked() {
    let cases: [(&str, fn(&mut ModuleDescriptor)); 4] = [
      ("compiler", |m: &mut ModuleDescriptor| m.compiler.clear()),
      ("output_directory", |m: &mut ModuleDescriptor| m.output_directory = " ".into()),
      ("output_file_name", |m: &mut ModuleDescriptor| m.output_file_name.clear()),
      ("source_directory", |m: &mut ModuleDescriptor| m.source_directory = "\n".into()),
    ];

    for (expected, blank) in cases {
      let mut module = valid_module();
      blank(&mut module);

      match module.validate() {
        Err(ModuleError::MissingField { module, field }) => {
          assert_eq!(module, "main");
          assert_eq!(field, expected);
        }
        other => panic!("expected missing {expected}, got {other:?}"),
      }
    }
  }

  #[test]
  fn missing_directories_are_reported() {
    let temp = TempDir::new().unwrap();
    let module = valid_module();

    assert!(matches!(
      module.check_directories(temp.path()),
      Err(ModuleError::OutputDirectoryMissing { .. })
    ));

    std::fs::create_dir(temp.path().join("build")).unwrap();
    assert!(matches!(
      module.check_directories(temp.path()),
      Err(ModuleError::SourceDirectoryMissing { .. })
    ));

    std::fs::create_dir(temp.path().join("src")).unwrap();
    assert!(module.check_directories(temp.path()).is_ok());
  }

  #[test]
  fn shared_arrays_reuse_storage() {
    let shared = StringArray::from(["Wall", "Wextra"]);
    let a = ModuleDescriptor {
      shared_compiler_flags: shared.clone(),
      ..valid_module()
    };
    let b = ModuleDescriptor {
      name: "tests".into(),
      shared_compiler_flags: shared.clone(),
      ..valid_module()
    };

    assert!(a.shared_compiler_flags.shares_storage(&b.shared_compiler_flags));
    assert_eq!(a.shared_compiler_flags.len(), 2);
  }
}
