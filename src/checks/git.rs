//! Git repository check

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::{FolioError, GitError};
use crate::core::vcs::SystemGit;
use anyhow::Result;

/// The project root sits inside a git work tree with a resolvable HEAD
pub struct GitRepoCheck;

impl Check for GitRepoCheck {
  fn name(&self) -> &str {
    "git-repo"
  }

  fn description(&self) -> &str {
    "Project is inside a git work tree"
  }

  fn run(&self, ctx: &CheckContext) -> Result<CheckResult> {
    let git = match SystemGit::open(&ctx.project_root) {
      Ok(git) => git,
      Err(FolioError::Git(GitError::RepoNotFound { path })) => {
        return Ok(CheckResult::error(
          self.name(),
          format!("Not a git repository: {}", path.display()),
          "Run `git init` or invoke folio from inside your repository",
        ));
      }
      Err(err) => return Err(anyhow::anyhow!("{}", err)),
    };

    match git.current_branch() {
      Ok(branch) => Ok(CheckResult::pass(
        self.name(),
        format!("Git work tree at {} (branch {})", git.work_tree().display(), branch),
      )),
      Err(_) => Ok(CheckResult::warning(
        self.name(),
        format!("Git work tree at {} has no commits yet", git.work_tree().display()),
        "Create an initial commit so releases can record branch and commit",
      )),
    }
  }
}
