//! Build command check

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::build::CommandBuilder;
use crate::core::config::ReleaseConfig;
use anyhow::Result;

/// The configured build program can be found
pub struct BuildCommandCheck;

impl Check for BuildCommandCheck {
  fn name(&self) -> &str {
    "build-command"
  }

  fn description(&self) -> &str {
    "Configured build program exists"
  }

  fn run(&self, ctx: &CheckContext) -> Result<CheckResult> {
    let Ok(config) = ReleaseConfig::load(&ctx.project_root) else {
      return Ok(CheckResult::pass(
        self.name(),
        "No valid folio.toml, skipping build command check",
      ));
    };

    let builder = CommandBuilder::new(&config.build.command, &ctx.project_root).map_err(|e| anyhow::anyhow!("{}", e))?;
    match builder.resolve_program() {
      Some(path) => Ok(CheckResult::pass(
        self.name(),
        format!("Build program found: {}", path.display()),
      )),
      None => Ok(CheckResult::error(
        self.name(),
        format!("Build program not found: {}", builder.program()),
        "Fix [build] command in folio.toml or install the program",
      )),
    }
  }
}
