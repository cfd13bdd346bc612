//! Implementation of the `cbs build` command.
//!
//! Compiles every module of the manifest, or only the named ones, in order.

use std::time::Instant;

use anyhow::{Context, Result, bail};

use cbs_lib::{BuildContext, CompileReport, ModuleDescriptor, RunOutcome};

use crate::manifest::Project;
use crate::output::{format_duration, print_error, print_info, print_success, print_warning};

/// Execute the build command.
///
/// `names` selects modules by name; when empty every module is compiled. A module
/// that cannot be synthesized stops the build. A compiler that exits non-zero is
/// reported and the remaining modules still compile; the command fails afterwards.
pub fn cmd_build(project: &Project, ctx: &BuildContext, names: &[String]) -> Result<()> {
  let modules = project.select(names)?;
  compile_modules(ctx, &modules)
}

/// Compile `modules` in order and print one status line per module.
pub fn compile_modules(ctx: &BuildContext, modules: &[&ModuleDescriptor]) -> Result<()> {
  let started = Instant::now();
  let mut failed = 0;

  for module in modules {
    let report = ctx
      .compile(module)
      .with_context(|| format!("Failed to compile module [{}]", module.name))?;
    if !print_report(&report) {
      failed += 1;
    }
  }

  if failed > 0 {
    bail!("{} of {} module(s) failed to compile", failed, modules.len());
  }

  print_info(&format!(
    "Compiled {} module(s) in {}",
    modules.len(),
    format_duration(started.elapsed())
  ));
  Ok(())
}

fn print_report(report: &CompileReport) -> bool {
  if report.discovered == 0 {
    print_warning(&format!("{}: no source files found", report.module));
  }

  match report.outcome {
    RunOutcome::Success => {
      print_success(&format!(
        "{} ({} source(s), {})",
        report.module,
        report.discovered,
        format_duration(report.elapsed)
      ));
      true
    }
    RunOutcome::Failed { code: Some(code) } => {
      print_error(&format!("{}: compiler exited with code {}", report.module, code));
      false
    }
    RunOutcome::Failed { code: None } => {
      print_error(&format!("{}: compiler terminated by signal", report.module));
      false
    }
    RunOutcome::TimedOut => {
      print_error(&format!(
        "{}: compiler timed out after {}",
        report.module,
        format_duration(report.elapsed)
      ));
      false
    }
  }
}
