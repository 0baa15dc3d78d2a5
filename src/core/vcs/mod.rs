pub mod system_git;

pub use system_git::SystemGit;

use crate::core::error::FolioResult;
use std::path::Path;

/// Branch and commit of the working copy at release time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadInfo {
  pub branch: String,
  pub commit: String,
}

/// Version-control capability used by the release orchestrator
pub trait VersionControl {
  /// True iff the status restricted to `dir` reports nothing
  fn is_clean(&self, dir: &Path) -> FolioResult<bool>;

  /// Stage `dir` and commit it with `message`
  fn commit_path(&self, dir: &Path, message: &str) -> FolioResult<()>;

  /// Current branch name and commit hash
  fn head_info(&self) -> FolioResult<HeadInfo>;
}
