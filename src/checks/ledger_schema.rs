//! Ledger database schema check (network)

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::config::ReleaseConfig;
use crate::core::error::LedgerError;
use crate::ledger::NotionLedger;
use crate::ledger::notion::{OPTIONAL_PROPERTIES, REQUIRED_PROPERTIES};
use crate::release::DocType;
use crate::ui::progress::StepProgress;
use anyhow::{Context, Result};
use serde_json::{Value, json};

/// Every configured ledger database is reachable and has the record properties
pub struct LedgerSchemaCheck;

/// Problems found in one database description
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SchemaIssues {
  pub errors: Vec<String>,
  pub warnings: Vec<String>,
}

/// Compare a database's `properties` against what ledger records write
pub fn schema_issues(database: &Value) -> SchemaIssues {
  let mut issues = SchemaIssues::default();
  let properties = database.get("properties").and_then(Value::as_object);

  let mut inspect = |name: &str, expected: &str, required: bool| {
    let actual = properties
      .and_then(|p| p.get(name))
      .map(|p| p.get("type").and_then(Value::as_str).unwrap_or("unknown"));

    let problem = match actual {
      None => format!("missing property '{}' ({})", name, expected),
      Some(actual) if actual != expected => {
        format!("property '{}' is {}, expected {}", name, actual, expected)
      }
      Some(_) => return,
    };

    if required {
      issues.errors.push(problem);
    } else {
      issues.warnings.push(problem);
    }
  };

  for (name, expected) in REQUIRED_PROPERTIES {
    inspect(name, expected, true);
  }
  for (name, expected) in OPTIONAL_PROPERTIES {
    inspect(name, expected, false);
  }

  issues
}

fn describe_fetch_error(err: &LedgerError) -> String {
  match err {
    LedgerError::Status { code: 404, .. } => "database not found or integration not connected".to_string(),
    LedgerError::Unauthorized => "unauthorized (check the ledger token)".to_string(),
    other => other.to_string(),
  }
}

impl Check for LedgerSchemaCheck {
  fn name(&self) -> &str {
    "ledger-schema"
  }

  fn description(&self) -> &str {
    "Ledger databases are reachable and have the expected properties"
  }

  fn run(&self, ctx: &CheckContext) -> Result<CheckResult> {
    let Ok(config) = ReleaseConfig::load(&ctx.project_root) else {
      return Ok(CheckResult::pass(
        self.name(),
        "No valid folio.toml, skipping ledger check",
      ));
    };

    if config.ledger.is_none() {
      return Ok(CheckResult::pass(self.name(), "Ledger not configured, skipping"));
    }

    let targets: Vec<(DocType, String)> = DocType::ALL
      .into_iter()
      .filter_map(|t| config.ledger_database(t).map(|id| (t, id.to_string())))
      .collect();

    if targets.is_empty() {
      return Ok(CheckResult::warning(
        self.name(),
        "Ledger credentials set but no document type has a ledger_database",
        "Add ledger_database to a [documents.<type>] table",
      ));
    }

    let ledger = NotionLedger::from_config(&config).map_err(|e| anyhow::anyhow!("{}", e))?;
    let mut progress = StepProgress::new(targets.len(), "Querying ledger databases");

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut details = Vec::new();

    for (doc_type, database_id) in &targets {
      let fetched = ledger.fetch_database(database_id);
      progress.inc();

      match fetched {
        Ok(database) => {
          let issues = schema_issues(&database);
          errors.extend(issues.errors.iter().map(|e| format!("{}: {}", doc_type, e)));
          warnings.extend(issues.warnings.iter().map(|w| format!("{}: {}", doc_type, w)));
          details.push(json!({
            "doc_type": doc_type.as_str(),
            "database": database_id,
            "errors": issues.errors,
            "warnings": issues.warnings,
          }));
        }
        Err(err) => {
          tracing::debug!(%doc_type, database = %database_id, error = %err, "ledger database fetch failed");
          let reason = describe_fetch_error(&err);
          errors.push(format!("{}: {}", doc_type, reason));
          details.push(json!({
            "doc_type": doc_type.as_str(),
            "database": database_id,
            "errors": [reason],
          }));
        }
      }
    }

    let details = serde_json::to_value(details).context("Failed to serialize ledger check details")?;

    let result = if !errors.is_empty() {
      let mut lines = errors;
      lines.extend(warnings);
      CheckResult::error(
        self.name(),
        format!("Ledger schema issues:\n{}", lines.join("\n")),
        "Add the missing properties to the ledger database and share it with the integration",
      )
    } else if !warnings.is_empty() {
      CheckResult::warning(
        self.name(),
        format!("Ledger schema warnings:\n{}", warnings.join("\n")),
        "Optional properties are skipped by the ledger service when absent",
      )
    } else {
      CheckResult::pass(
        self.name(),
        format!("{} ledger database(s) reachable with expected properties", targets.len()),
      )
    };

    Ok(result.with_details(details))
  }

  fn is_expensive(&self) -> bool {
    true
  }
}
