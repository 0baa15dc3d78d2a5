//! Integration tests for `folio release`

use crate::helpers::{MockLedger, TestProject, run_folio, run_folio_raw};
use anyhow::Result;

#[test]
fn test_clean_source_without_force_is_noop() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(None)?;
  let head = project.head()?;

  let output = run_folio(&project.path, &["release", "--type", "resume"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("No changes detected"), "stdout: {}", stdout);
  assert!(!project.file_exists("dist"));
  assert!(project.list_dir("archive/resume").is_empty());
  assert!(!project.file_exists("resume/Resume.pdf"));
  assert_eq!(project.head()?, head);

  Ok(())
}

#[test]
fn test_forced_release_with_message() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(None)?;

  let output = run_folio(
    &project.path,
    &["release", "--type", "resume", "--force", "-m", "Fix typo!"],
  )?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Released resume"), "stdout: {}", stdout);

  let archives = project.list_dir("archive/resume");
  assert_eq!(archives.len(), 1);
  assert!(archives[0].starts_with("resume_Fix_typo_"), "archive: {}", archives[0]);
  assert!(archives[0].ends_with(".pdf"));

  // output is the built artifact plus version metadata
  assert!(project.file_exists("dist/resume.pdf"));
  assert!(!project.file_exists("dist/resume.pdf.bak"));
  assert_eq!(
    project.read_bytes(&format!("archive/resume/{}", archives[0]))?,
    project.read_bytes("fixtures/source.pdf")?
  );

  assert_eq!(project.git_log(1)?, vec!["Fix typo!".to_string()]);
  Ok(())
}

#[test]
fn test_inferred_message_keeps_version_name_short() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(None)?;
  project.touch_source("resume/main.tex", "\\section{Skills}\n")?;

  run_folio(&project.path, &["release", "--type", "resume"])?;

  let archives = project.list_dir("archive/resume");
  assert_eq!(archives.len(), 1);
  // resume_YYYYmmdd_HHMMSS.pdf
  assert_eq!(archives[0].len(), "resume_20240102_030405.pdf".len(), "archive: {}", archives[0]);

  let subject = &project.git_log(1)?[0];
  assert!(subject.starts_with("Update resume - "), "commit: {}", subject);
  Ok(())
}

#[test]
fn test_release_records_in_ledger() -> Result<()> {
  let ledger = MockLedger::start(vec![(200, r#"{"object":"page","id":"page-42"}"#)])?;
  let project = TestProject::new()?;
  project.write_config(Some(&ledger.url))?;
  project.touch_source("resume/main.tex", "\\section{Projects}\n")?;
  let head_before = project.head()?;

  let output = run_folio(&project.path, &["release", "--type", "resume", "-m", "Add projects"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("page-42"), "stdout: {}", stdout);

  let requests = ledger.requests();
  assert_eq!(requests.len(), 1);
  assert_eq!(requests[0].method, "POST");
  assert_eq!(requests[0].path, "/pages");

  let body: serde_json::Value = serde_json::from_str(&requests[0].body)?;
  let props = &body["properties"];
  assert_eq!(body["parent"]["database_id"], "db-resume");
  assert_eq!(props["Commit message"]["rich_text"][0]["text"]["content"], "Add projects");
  assert_eq!(props["Device"]["select"]["name"], "CI Runner");
  assert_eq!(props["Git Branch"]["rich_text"][0]["text"]["content"], "main");
  assert_eq!(props["Commit ID"]["rich_text"][0]["text"]["content"], head_before.as_str());

  let archives = project.list_dir("archive/resume");
  assert_eq!(props["Name"]["title"][0]["text"]["content"], archives[0].as_str());

  assert_eq!(project.git_log(1)?, vec!["Add projects".to_string()]);
  Ok(())
}

#[test]
fn test_ledger_failure_rolls_back() -> Result<()> {
  let ledger = MockLedger::start(vec![(500, r#"{"code":"internal_server_error"}"#)])?;
  let project = TestProject::new()?;
  project.write_config(Some(&ledger.url))?;
  project.touch_source("resume/main.tex", "\\section{Broken}\n")?;

  std::fs::create_dir_all(project.path.join("dist"))?;
  std::fs::write(project.path.join("dist/resume.pdf"), b"previous release")?;
  let head = project.head()?;

  let output = run_folio_raw(&project.path, &["release", "--type", "resume", "-m", "Doomed"])?;
  assert_eq!(output.status.code(), Some(2));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("rolled back"), "stderr: {}", stderr);

  assert_eq!(project.read_bytes("dist/resume.pdf")?, b"previous release");
  assert!(!project.file_exists("dist/resume.pdf.bak"));
  assert!(project.list_dir("archive/resume").is_empty());
  assert_eq!(project.head()?, head);
  Ok(())
}

#[test]
fn test_build_failure_leaves_no_trace() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(None)?;
  project.set_build_command(r#"["sh", "-c", "exit 1", "build"]"#)?;
  project.touch_source("resume/main.tex", "\\section{Nope}\n")?;

  let output = run_folio_raw(&project.path, &["release", "--type", "resume"])?;
  assert_eq!(output.status.code(), Some(2));
  assert!(!project.file_exists("dist"));
  assert!(project.list_dir("archive/resume").is_empty());
  Ok(())
}

#[test]
fn test_missing_config_is_user_error() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_folio_raw(&project.path, &["release", "--type", "resume"])?;
  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("folio.toml"), "stderr: {}", stderr);
  Ok(())
}
