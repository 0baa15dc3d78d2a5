//! Integration tests for `folio version`

use crate::helpers::{TestProject, run_folio, run_folio_raw, write_pdf};
use anyhow::Result;

#[test]
fn test_version_after_release_matches_archive() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(None)?;
  run_folio(
    &project.path,
    &["release", "--type", "resume", "--force", "-m", "First cut"],
  )?;

  let archives = project.list_dir("archive/resume");
  let output = run_folio(&project.path, &["version", "--type", "resume"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert_eq!(stdout.trim(), archives[0]);
  Ok(())
}

#[test]
fn test_version_falls_back_to_title() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(None)?;
  std::fs::create_dir_all(project.path.join("dist"))?;
  write_pdf(&project.path.join("dist/cover_letter.pdf"), Some("Letter to Acme"))?;

  let output = run_folio(&project.path, &["version", "--type", "cover_letter"])?;
  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Letter to Acme");
  Ok(())
}

#[test]
fn test_version_without_metadata() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(None)?;
  std::fs::create_dir_all(project.path.join("dist"))?;
  write_pdf(&project.path.join("dist/resume.pdf"), None)?;

  let output = run_folio(&project.path, &["version", "--type", "resume"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("No version metadata found"), "stdout: {}", stdout);
  Ok(())
}

#[test]
fn test_version_without_published_output_fails() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(None)?;

  let output = run_folio_raw(&project.path, &["version", "--type", "resume"])?;
  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("folio release --type resume"), "stderr: {}", stderr);
  Ok(())
}
