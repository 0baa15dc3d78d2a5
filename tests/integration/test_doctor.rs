//! Integration tests for `folio doctor`

use crate::helpers::{MockLedger, TestProject, run_folio, run_folio_raw};
use anyhow::Result;
use serde_json::Value;

fn results_by_name(stdout: &[u8]) -> Result<Vec<(String, bool)>> {
  let results: Vec<Value> = serde_json::from_slice(stdout)?;
  Ok(
    results
      .iter()
      .map(|r| {
        (
          r["check_name"].as_str().unwrap_or_default().to_string(),
          r["passed"].as_bool().unwrap_or(false),
        )
      })
      .collect(),
  )
}

#[test]
fn test_doctor_healthy_project() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(None)?;

  let output = run_folio(&project.path, &["doctor", "--json"])?;
  let results = results_by_name(&output.stdout)?;

  let names: Vec<&str> = results.iter().map(|(n, _)| n.as_str()).collect();
  assert_eq!(names, vec!["config", "git-repo", "build-command"]);
  assert!(results.iter().all(|(_, passed)| *passed), "{:?}", results);
  Ok(())
}

#[test]
fn test_doctor_without_config_fails_validation() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_folio_raw(&project.path, &["doctor"])?;
  assert_eq!(output.status.code(), Some(3));
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("No folio.toml found"), "stdout: {}", stdout);
  Ok(())
}

#[test]
fn test_doctor_thorough_checks_ledger_schema() -> Result<()> {
  let ledger = MockLedger::start(vec![(
    200,
    r#"{"object":"database","properties":{
      "Name":{"type":"title"},
      "Created Time":{"type":"date"},
      "Device":{"type":"select"},
      "Commit message":{"type":"rich_text"},
      "Git Branch":{"type":"rich_text"},
      "Commit ID":{"type":"rich_text"}}}"#,
  )])?;
  let project = TestProject::new()?;
  project.write_config(Some(&ledger.url))?;

  let output = run_folio(&project.path, &["doctor", "--thorough", "--json"])?;
  let results = results_by_name(&output.stdout)?;
  assert!(results.contains(&("ledger-schema".to_string(), true)), "{:?}", results);

  let requests = ledger.requests();
  assert_eq!(requests[0].method, "GET");
  assert_eq!(requests[0].path, "/databases/db-resume");
  Ok(())
}

#[test]
fn test_doctor_thorough_reports_missing_properties() -> Result<()> {
  let ledger = MockLedger::start(vec![(200, r#"{"object":"database","properties":{"Name":{"type":"title"}}}"#)])?;
  let project = TestProject::new()?;
  project.write_config(Some(&ledger.url))?;

  let output = run_folio_raw(&project.path, &["doctor", "--thorough", "--json"])?;
  assert_eq!(output.status.code(), Some(3));
  let results = results_by_name(&output.stdout)?;
  assert!(results.contains(&("ledger-schema".to_string(), false)), "{:?}", results);
  Ok(())
}
