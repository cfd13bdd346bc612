mod build;
mod compile_db;
mod list;

pub use build::{cmd_build, compile_modules};
pub use compile_db::{cmd_compile_db, write_database};
pub use list::cmd_list;

use anyhow::{Context, Result};

use cbs_lib::{BuildContext, Command, CommandRegistry};

use crate::manifest::{CommandConfig, Project};

/// Handler result for every registered command.
pub type Outcome = Result<()>;

/// Register the built-in commands followed by the manifest's own commands.
///
/// Handlers receive the full argument vector: `argv[0]` is the program, `argv[1]`
/// the command name, and the rest are command arguments.
pub fn registry<'a>(project: &'a Project, ctx: &'a BuildContext) -> Result<CommandRegistry<'a, Outcome>> {
  let mut registry = CommandRegistry::new();
  registry
    .register(
      Command::new("build", move |argv: &[String]| cmd_build(project, ctx, args_of(argv)))
        .with_description("Compile all modules, or only the named ones"),
    )?
    .register(
      Command::new("compile-db", move |_: &[String]| cmd_compile_db(project, ctx))
        .with_description("Write compile_commands.json for all modules"),
    )?
    .register(
      Command::new("list", move |_: &[String]| cmd_list(project)).with_description("List modules and their commands"),
    )?;

  for config in &project.commands {
    registry
      .register(manifest_command(project, ctx, config))
      .with_context(|| format!("Invalid command in {}", project.manifest_path.display()))?;
  }

  Ok(registry)
}

fn manifest_command<'a>(project: &'a Project, ctx: &'a BuildContext, config: &'a CommandConfig) -> Command<'a, Outcome> {
  let command = Command::new(config.name.clone(), move |_: &[String]| -> Outcome {
    let modules = project.select(&config.modules)?;
    compile_modules(ctx, &modules)?;
    if config.compile_db {
      write_database(ctx, &modules)?;
    }
    Ok(())
  });

  match &config.description {
    Some(description) => command.with_description(description.clone()),
    None => command,
  }
}

fn args_of(argv: &[String]) -> &[String] {
  argv.get(2..).unwrap_or(&[])
}
