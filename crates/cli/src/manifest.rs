//! Build manifest loading.
//!
//! A manifest (`cbs.json` by default) declares the modules of a project, the
//! flag sets every module shares, and optional named commands:
//!
//! ```json
//! {
//!   "shared": { "compiler_flags": ["Wall", "Wextra"] },
//!   "modules": [
//!     { "name": "app", "compiler": "clang", "source_directory": "src",
//!       "output_directory": "build", "output_file_name": "app" }
//!   ],
//!   "commands": [
//!     { "name": "release", "description": "Build app and refresh tooling",
//!       "modules": ["app"], "compile_db": true }
//!   ]
//! }
//! ```
//!
//! Relative paths inside a manifest resolve against the manifest's directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use cbs_lib::{ModuleDescriptor, StringArray};

pub const DEFAULT_MANIFEST: &str = "cbs.json";

/// Flag and path lists applied to every module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SharedConfig {
  pub compiler_flags: Vec<String>,
  pub include_paths: Vec<String>,
  pub library_paths: Vec<String>,
  pub linker_flags: Vec<String>,
}

/// One module as written in the manifest.
///
/// Required fields default to empty so that a missing value is reported by
/// module validation with the module and field name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleConfig {
  pub name: String,
  pub compiler: String,
  pub source_directory: String,
  pub output_directory: String,
  pub output_file_name: String,
  pub compiler_flags: Vec<String>,
  pub include_paths: Vec<String>,
  pub library_paths: Vec<String>,
  pub linker_flags: Vec<String>,
  pub additional_source_files: Vec<String>,
  pub excluded_source_files: Vec<String>,
}

/// A named sequence of modules to compile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub modules: Vec<String>,
  /// Also write `compile_commands.json` after compiling.
  #[serde(default)]
  pub compile_db: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
  #[serde(default)]
  pub shared: SharedConfig,
  pub modules: Vec<ModuleConfig>,
  #[serde(default)]
  pub commands: Vec<CommandConfig>,
}

/// A loaded manifest plus the directory its relative paths resolve against.
#[derive(Debug, Clone)]
pub struct Project {
  pub root: PathBuf,
  pub manifest_path: PathBuf,
  pub modules: Vec<ModuleDescriptor>,
  pub commands: Vec<CommandConfig>,
}

impl Manifest {
  pub fn from_json(content: &str) -> Result<Self> {
    serde_json::from_str(content).context("Failed to parse manifest")
  }

  /// Build module descriptors. All modules share one copy of each shared list.
  pub fn descriptors(&self) -> Vec<ModuleDescriptor> {
    let compiler_flags = StringArray::from(self.shared.compiler_flags.clone());
    let include_paths = StringArray::from(self.shared.include_paths.clone());
    let library_paths = StringArray::from(self.shared.library_paths.clone());
    let linker_flags = StringArray::from(self.shared.linker_flags.clone());

    self
      .modules
      .iter()
      .map(|m| ModuleDescriptor {
        name: m.name.clone(),
        compiler: m.compiler.clone(),
        source_directory: m.source_directory.clone(),
        output_directory: m.output_directory.clone(),
        output_file_name: m.output_file_name.clone(),
        shared_compiler_flags: compiler_flags.clone(),
        unique_compiler_flags: StringArray::from(m.compiler_flags.clone()),
        shared_include_paths: include_paths.clone(),
        unique_include_paths: StringArray::from(m.include_paths.clone()),
        shared_library_paths: library_paths.clone(),
        unique_library_paths: StringArray::from(m.library_paths.clone()),
        shared_linker_flags: linker_flags.clone(),
        unique_linker_flags: StringArray::from(m.linker_flags.clone()),
        additional_source_files: StringArray::from(m.additional_source_files.clone()),
        excluded_source_files: StringArray::from(m.excluded_source_files.clone()),
      })
      .collect()
  }
}

impl Project {
  /// Load and parse the manifest at `path`.
  pub fn load(path: &Path) -> Result<Self> {
    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    let manifest =
      Manifest::from_json(&content).with_context(|| format!("Invalid manifest: {}", path.display()))?;

    let manifest_path =
      dunce::canonicalize(path).with_context(|| format!("Failed to resolve manifest path: {}", path.display()))?;
    let root = match manifest_path.parent() {
      Some(parent) => parent.to_path_buf(),
      None => bail!("Manifest has no parent directory: {}", manifest_path.display()),
    };

    Ok(Self {
      root,
      manifest_path,
      modules: manifest.descriptors(),
      commands: manifest.commands,
    })
  }

  /// Look up modules by name, preserving the requested order.
  pub fn select(&self, names: &[String]) -> Result<Vec<&ModuleDescriptor>> {
    if names.is_empty() {
      return Ok(self.modules.iter().collect());
    }
    names
      .iter()
      .map(|name| match self.modules.iter().find(|m| m.name == *name) {
        Some(module) => Ok(module),
        None => bail!(
          "Unknown module [{}]. Defined modules: {}",
          name,
          self.module_names().join(", ")
        ),
      })
      .collect()
  }

  pub fn module_names(&self) -> Vec<&str> {
    self.modules.iter().map(|m| m.name.as_str()).collect()
  }
}
