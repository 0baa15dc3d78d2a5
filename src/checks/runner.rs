//! Check runner for executing health checks

use super::trait_def::{Check, CheckContext, CheckResult};
use std::sync::Arc;

/// Check runner that executes multiple checks
pub struct CheckRunner {
  checks: Vec<Arc<dyn Check>>,
}

impl CheckRunner {
  pub fn new() -> Self {
    Self { checks: Vec::new() }
  }

  pub fn add_check(&mut self, check: Arc<dyn Check>) {
    self.checks.push(check);
  }

  /// Run all checks and collect results
  pub fn run_all(&self, ctx: &CheckContext) -> Vec<CheckResult> {
    let mut results = Vec::new();

    for check in &self.checks {
      if check.is_expensive() && !ctx.thorough {
        tracing::debug!(check = check.name(), "skipping expensive check");
        continue;
      }

      match check.run(ctx) {
        Ok(result) => results.push(result),
        Err(err) => {
          // A check that cannot run is reported, not propagated
          results.push(CheckResult::error(
            check.name(),
            format!("Check failed to run: {:#}", err),
            "Re-run with -v for more details",
          ));
        }
      }
    }

    results
  }

  /// Get all registered checks
  pub fn checks(&self) -> &[Arc<dyn Check>] {
    &self.checks
  }
}

impl Default for CheckRunner {
  fn default() -> Self {
    Self::new()
  }
}

/// Create a runner with all built-in checks
pub fn create_default_runner() -> CheckRunner {
  let mut runner = CheckRunner::new();

  runner.add_check(Arc::new(super::config::ConfigCheck));
  runner.add_check(Arc::new(super::git::GitRepoCheck));
  runner.add_check(Arc::new(super::build::BuildCommandCheck));
  runner.add_check(Arc::new(super::ledger_schema::LedgerSchemaCheck));

  runner
}
