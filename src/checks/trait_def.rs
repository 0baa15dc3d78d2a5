//! `Check` trait and the result every doctor check reports
//!
//! The runner decides which checks run and turns a check that fails to run into an
//! error result.

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

/// How much a failed check matters; `Info` only appears on passing results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Info,
  /// Releases still work
  Warning,
  /// Releases will fail until fixed
  Error,
}

/// Outcome of one check, serialized as-is by `folio doctor --json`
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
  pub check_name: String,
  pub passed: bool,
  pub severity: Severity,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fix: Option<String>,
  /// Per-target breakdown (ledger databases)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}

impl CheckResult {
  pub fn pass(check_name: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      check_name: check_name.into(),
      passed: true,
      severity: Severity::Info,
      message: message.into(),
      fix: None,
      details: None,
    }
  }

  pub fn error(check_name: impl Into<String>, message: impl Into<String>, fix: impl Into<String>) -> Self {
    Self::failed(check_name.into(), Severity::Error, message.into(), fix.into())
  }

  pub fn warning(check_name: impl Into<String>, message: impl Into<String>, fix: impl Into<String>) -> Self {
    Self::failed(check_name.into(), Severity::Warning, message.into(), fix.into())
  }

  fn failed(check_name: String, severity: Severity, message: String, fix: String) -> Self {
    Self {
      check_name,
      passed: false,
      severity,
      message,
      fix: Some(fix),
      details: None,
    }
  }

  pub fn with_details(self, details: serde_json::Value) -> Self {
    Self {
      details: Some(details),
      ..self
    }
  }

  /// Blocks releasing: doctor exits non-zero
  pub fn is_error(&self) -> bool {
    !self.passed && self.severity == Severity::Error
  }
}

/// What every check gets to look at
#[derive(Debug, Clone)]
pub struct CheckContext {
  /// Directory folio was invoked from
  pub project_root: PathBuf,
  /// Run checks that need the network
  pub thorough: bool,
}

/// A doctor health check
///
/// ```rust,ignore
/// struct OutputDirCheck;
///
/// impl Check for OutputDirCheck {
///   fn name(&self) -> &str {
///     "output-dir"
///   }
///
///   fn description(&self) -> &str {
///     "Output directory exists"
///   }
///
///   fn run(&self, ctx: &CheckContext) -> Result<CheckResult> {
///     let config = ReleaseConfig::load(&ctx.project_root)?;
///     let dir = ctx.project_root.join(&config.output.dir);
///     if dir.is_dir() {
///       return Ok(CheckResult::pass(self.name(), format!("{} exists", dir.display())));
///     }
///     Ok(CheckResult::warning(
///       self.name(),
///       format!("{} does not exist yet", dir.display()),
///       "It is created by the first release",
///     ))
///   }
/// }
/// ```
pub trait Check: Send + Sync {
  /// kebab-case, shown in doctor output and `--json`
  fn name(&self) -> &str;

  fn description(&self) -> &str;

  fn run(&self, ctx: &CheckContext) -> Result<CheckResult>;

  /// Needs the network; skipped unless `--thorough`
  fn is_expensive(&self) -> bool {
    false
  }
}
