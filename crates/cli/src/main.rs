mod cmd;
mod manifest;
mod output;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cbs_lib::{BuildContext, Dispatch};

use crate::manifest::{DEFAULT_MANIFEST, Project};
use crate::output::print_error;

/// cbs - declarative C module builds
#[derive(Parser)]
#[command(name = "cbs")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Path to the build manifest
  #[arg(short, long, default_value = DEFAULT_MANIFEST)]
  manifest: PathBuf,

  /// Kill a compiler run that takes longer than this (e.g. "30s", "2m")
  #[arg(long, value_parser = humantime::parse_duration)]
  timeout: Option<Duration>,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,

  /// Command to run, followed by its arguments
  #[arg(trailing_var_arg = true)]
  args: Vec<String>,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
  };
  tracing_subscriber::fmt().with_env_filter(filter).without_time().init();

  let project = Project::load(&cli.manifest)?;
  let ctx = BuildContext::new(project.root.clone()).with_timeout(cli.timeout);
  let registry = cmd::registry(&project, &ctx)?;

  let argv: Vec<String> = std::iter::once("cbs".to_string()).chain(cli.args).collect();

  match registry.dispatch(&argv) {
    Dispatch::Ran { output, .. } => output,
    Dispatch::NoArguments => {
      print_error("No command given. Available commands:");
      registry.write_listing(&mut io::stderr())?;
      bail!("no command given");
    }
    Dispatch::NotFound { name } => {
      print_error(&format!("Command [{}] not found. Available commands:", name));
      registry.write_listing(&mut io::stderr())?;
      bail!("command [{}] not found", name);
    }
  }
}
