//! Configuration validity check

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::config::ReleaseConfig;
use crate::release::DocType;
use anyhow::Result;

/// folio.toml exists, parses and validates
pub struct ConfigCheck;

impl Check for ConfigCheck {
  fn name(&self) -> &str {
    "config"
  }

  fn description(&self) -> &str {
    "Validates folio.toml"
  }

  fn run(&self, ctx: &CheckContext) -> Result<CheckResult> {
    let Some(path) = ReleaseConfig::find_config_path(&ctx.project_root) else {
      return Ok(CheckResult::error(
        self.name(),
        "No folio.toml found",
        "Create folio.toml with [output], [build] and [documents.<type>] tables",
      ));
    };

    match ReleaseConfig::load(&ctx.project_root) {
      Ok(config) => {
        let configured: Vec<&str> = DocType::ALL
          .into_iter()
          .filter(|t| config.document(*t).is_some())
          .map(DocType::as_str)
          .collect();

        if configured.is_empty() {
          return Ok(CheckResult::warning(
            self.name(),
            format!("{} has no [documents.<type>] tables", path.display()),
            "Add [documents.resume] or [documents.cover_letter]",
          ));
        }

        Ok(CheckResult::pass(
          self.name(),
          format!("{} valid (documents: {})", path.display(), configured.join(", ")),
        ))
      }
      Err(err) => Ok(CheckResult::error(
        self.name(),
        format!("Failed to load {}: {}", path.display(), err),
        "Check the syntax of your folio.toml file",
      )),
    }
  }
}
