//! Test helpers for integration tests

use anyhow::{Context, Result};
use lopdf::{Document, Object, dictionary};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub use crate::mock_ledger::MockLedger;

/// Build script: copies the fixture PDF to the doc type's artifact path
const BUILD_SCRIPT: &str = r#"#!/bin/sh
set -e
case "$1" in
  resume) out="resume/Resume.pdf" ;;
  cover_letter) out="cover_letter/Cover_Letter.pdf" ;;
  *) echo "unknown document type: $1" >&2; exit 2 ;;
esac
cp fixtures/source.pdf "$out"
"#;

/// A git repository laid out like a document project
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Repo with `resume/` and `cover_letter/` sources, a build script and a fixture PDF,
  /// all committed. folio.toml is written separately (and left untracked).
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    for dir in ["resume", "cover_letter", "scripts", "fixtures"] {
      std::fs::create_dir_all(path.join(dir))?;
    }
    std::fs::write(path.join("resume/main.tex"), "\\section{Experience}\n")?;
    std::fs::write(path.join("cover_letter/letter.tex"), "Dear hiring manager,\n")?;
    std::fs::write(path.join("scripts/build.sh"), BUILD_SCRIPT)?;
    write_pdf(&path.join("fixtures/source.pdf"), Some("Test Resume"))?;
    std::fs::write(path.join(".gitignore"), "folio.toml\ndist/\narchive/\n")?;

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial project"])?;

    Ok(Self { _root: root, path })
  }

  /// Write folio.toml; `ledger_url` enables the ledger for resumes
  pub fn write_config(&self, ledger_url: Option<&str>) -> Result<()> {
    let mut config = String::from(
      r#"device = "CI Runner"

[output]
dir = "dist"

[build]
command = ["sh", "scripts/build.sh"]

[documents.resume]
artifact = "Resume.pdf"
archive_dir = "archive/resume"
"#,
    );

    if ledger_url.is_some() {
      config.push_str("ledger_database = \"db-resume\"\n");
    }

    config.push_str(
      r#"
[documents.cover_letter]
artifact = "Cover_Letter.pdf"
"#,
    );

    if let Some(url) = ledger_url {
      config.push_str(&format!("\n[ledger]\ntoken = \"secret_test\"\nbase_url = \"{}\"\n", url));
    }

    std::fs::write(self.path.join("folio.toml"), config)?;
    Ok(())
  }

  /// Replace the build command
  pub fn set_build_command(&self, command: &str) -> Result<()> {
    let config = self.read_file("folio.toml")?;
    let updated = config.replace(r#"command = ["sh", "scripts/build.sh"]"#, &format!("command = {}", command));
    std::fs::write(self.path.join("folio.toml"), updated)?;
    Ok(())
  }

  /// Modify a source file so the document type has uncommitted changes
  pub fn touch_source(&self, file: &str, content: &str) -> Result<()> {
    std::fs::write(self.path.join(file), content)?;
    Ok(())
  }

  /// Get git log subjects, newest first
  pub fn git_log(&self, n: usize) -> Result<Vec<String>> {
    let output = git(&self.path, &["log", &format!("-{}", n), "--format=%s"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }

  /// Current HEAD commit
  pub fn head(&self) -> Result<String> {
    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// File names inside a project directory (empty if missing)
  pub fn list_dir(&self, dir: &str) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(self.path.join(dir))
      .map(|entries| {
        entries
          .filter_map(|e| e.ok())
          .map(|e| e.file_name().to_string_lossy().into_owned())
          .collect()
      })
      .unwrap_or_default();
    names.sort();
    names
  }

  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  pub fn read_bytes(&self, path: &str) -> Result<Vec<u8>> {
    Ok(std::fs::read(self.path.join(path))?)
  }
}

/// Write a minimal PDF, optionally with a title in its Info dictionary
pub fn write_pdf(path: &Path, title: Option<&str>) -> Result<()> {
  let mut doc = Document::with_version("1.5");
  let pages_id = doc.add_object(dictionary! {
    "Type" => "Pages",
    "Kids" => Vec::<Object>::new(),
    "Count" => 0,
  });
  let catalog_id = doc.add_object(dictionary! {
    "Type" => "Catalog",
    "Pages" => pages_id,
  });
  doc.trailer.set("Root", catalog_id);

  if let Some(title) = title {
    let info_id = doc.add_object(dictionary! {
      "Title" => Object::string_literal(title),
    });
    doc.trailer.set("Info", info_id);
  }

  doc.save(path).context("Failed to write fixture PDF")?;
  Ok(())
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run folio and return its output whatever the exit status
pub fn run_folio_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  Command::new(env!("CARGO_BIN_EXE_folio"))
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .output()
    .context("Failed to run folio")
}

/// Run folio and fail unless it exits successfully
pub fn run_folio(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_folio_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "folio command failed: folio {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}
