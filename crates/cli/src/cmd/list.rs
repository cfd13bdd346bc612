//! Implementation of the `cbs list` command.

use anyhow::{Context, Result};

use cbs_lib::compile::flags_command;
use cbs_lib::util::path::join_output;

use crate::manifest::Project;
use crate::output::{print_heading, print_info, print_stat};

/// Print every module with its directories and compiler command.
pub fn cmd_list(project: &Project) -> Result<()> {
  if project.modules.is_empty() {
    print_info(&format!("No modules defined in {}", project.manifest_path.display()));
    return Ok(());
  }

  for module in &project.modules {
    let command =
      flags_command(module).with_context(|| format!("Failed to build command for module [{}]", module.name))?;

    print_heading(&module.name);
    print_stat("Sources", &module.source_directory);
    print_stat(
      "Output",
      &join_output(&module.output_directory, &module.output_file_name),
    );
    print_stat("Command", &command);
  }
  Ok(())
}
