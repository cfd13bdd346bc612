//! Implementation of the `cbs compile-db` command.

use anyhow::{Context, Result};

use cbs_lib::{BuildContext, ModuleDescriptor};

use crate::manifest::Project;
use crate::output::print_success;

/// Write `compile_commands.json` for every module of the manifest.
pub fn cmd_compile_db(project: &Project, ctx: &BuildContext) -> Result<()> {
  let modules: Vec<&ModuleDescriptor> = project.modules.iter().collect();
  write_database(ctx, &modules)
}

pub fn write_database(ctx: &BuildContext, modules: &[&ModuleDescriptor]) -> Result<()> {
  let report = ctx
    .write_compile_database(modules.iter().copied())
    .context("Failed to write compile database")?;

  print_success(&format!(
    "Wrote {} record(s) to {}",
    report.records,
    report.path.display()
  ));
  Ok(())
}
