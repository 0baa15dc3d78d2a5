//! System git backend
//!
//! Every operation is a single `git` subprocess with an isolated environment.

use super::{HeadInfo, VersionControl};
use crate::core::error::{FolioError, FolioResult, GitError, ResultExt};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// This performs ONE subprocess call to get the repository metadata.
  pub fn open(path: &Path) -> FolioResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(FolioError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(FolioError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();
    tracing::debug!(work_tree, "opened git repository");

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Root of the working tree containing `repo_path`
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> FolioResult<String> {
    let output = self.run(&["rev-parse", "HEAD"], "git rev-parse HEAD")?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Get current branch name
  pub fn current_branch(&self) -> FolioResult<String> {
    let output = self.run(&["rev-parse", "--abbrev-ref", "HEAD"], "git rev-parse --abbrev-ref HEAD")?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Porcelain status lines restricted to `dir`
  pub fn status_porcelain(&self, dir: &Path) -> FolioResult<String> {
    let output = self
      .git_cmd()
      .args(["status", "--porcelain", "--"])
      .arg(self.pathspec(dir))
      .output()
      .context("Failed to run git status")?;

    if !output.status.success() {
      return Err(FolioError::Git(GitError::CommandFailed {
        command: format!("git status --porcelain -- {}", dir.display()),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }

  /// Paths under the repository are passed relative to it
  fn pathspec(&self, dir: &Path) -> PathBuf {
    match dir.strip_prefix(&self.repo_path) {
      Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
      Ok(rel) => rel.to_path_buf(),
      Err(_) => dir.to_path_buf(),
    }
  }

  fn run(&self, args: &[&str], label: &str) -> FolioResult<Output> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to run {}", label))?;

    if !output.status.success() {
      return Err(FolioError::Git(GitError::CommandFailed {
        command: label.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(output)
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}

/// Porcelain output with no entries means the tree is clean
pub fn status_is_clean(porcelain: &str) -> bool {
  porcelain.trim().is_empty()
}

impl VersionControl for SystemGit {
  fn is_clean(&self, dir: &Path) -> FolioResult<bool> {
    let status = self.status_porcelain(dir)?;
    Ok(status_is_clean(&status))
  }

  fn commit_path(&self, dir: &Path, message: &str) -> FolioResult<()> {
    let output = self
      .git_cmd()
      .args(["add", "--"])
      .arg(self.pathspec(dir))
      .output()
      .context("Failed to run git add")?;
    if !output.status.success() {
      return Err(FolioError::Git(GitError::CommandFailed {
        command: format!("git add -- {}", dir.display()),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    let output = self
      .git_cmd()
      .args(["commit", "-m", message, "--"])
      .arg(self.pathspec(dir))
      .output()
      .context("Failed to run git commit")?;
    if !output.status.success() {
      return Err(FolioError::Git(GitError::CommandFailed {
        command: "git commit".to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    tracing::info!(dir = %dir.display(), "committed release sources");
    Ok(())
  }

  fn head_info(&self) -> FolioResult<HeadInfo> {
    Ok(HeadInfo {
      branch: self.current_branch()?,
      commit: self.head_commit()?,
    })
  }
}
