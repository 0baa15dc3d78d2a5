//! Artifact builder capability
//!
//! The build itself is opaque: a configured program is run with the document type as
//! its last argument and must leave the artifact at a predictable path.

use crate::core::error::{BuildError, FolioError, FolioResult};
use crate::release::DocType;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Produces a fresh artifact for a document type
pub trait ArtifactBuilder {
  /// Run the build; any failure aborts before the atomic phase
  fn build(&self, doc_type: DocType) -> FolioResult<()>;
}

/// Runs the configured build command in the project root
pub struct CommandBuilder {
  program: String,
  args: Vec<String>,
  working_dir: PathBuf,
}

impl CommandBuilder {
  /// `command` is program followed by its leading arguments
  pub fn new(command: &[String], working_dir: &Path) -> FolioResult<Self> {
    let (program, args) = command
      .split_first()
      .ok_or_else(|| FolioError::message("Build command is empty"))?;

    Ok(Self {
      program: program.clone(),
      args: args.to_vec(),
      working_dir: working_dir.to_path_buf(),
    })
  }

  /// Program as written in the config
  pub fn program(&self) -> &str {
    &self.program
  }

  /// Resolve the program relative to the working dir or through PATH
  pub fn resolve_program(&self) -> Option<PathBuf> {
    let candidate = Path::new(&self.program);
    if candidate.components().count() > 1 {
      let path = self.working_dir.join(candidate);
      return path.is_file().then_some(path);
    }

    std::env::var_os("PATH").and_then(|paths| {
      std::env::split_paths(&paths)
        .map(|dir| dir.join(&self.program))
        .find(|path| path.is_file())
    })
  }

  fn command(&self, doc_type: DocType) -> Command {
    let program = Path::new(&self.program);
    let program = if program.components().count() > 1 && program.is_relative() {
      self.working_dir.join(program)
    } else {
      program.to_path_buf()
    };

    let mut cmd = Command::new(program);
    cmd
      .args(&self.args)
      .arg(doc_type.as_str())
      .current_dir(&self.working_dir);
    cmd
  }
}

impl ArtifactBuilder for CommandBuilder {
  fn build(&self, doc_type: DocType) -> FolioResult<()> {
    tracing::debug!(program = %self.program, args = ?self.args, %doc_type, "running build");

    let status = self.command(doc_type).status().map_err(|e| {
      FolioError::Build(BuildError::Spawn {
        program: self.program.clone(),
        reason: e.to_string(),
      })
    })?;

    if !status.success() {
      return Err(FolioError::Build(BuildError::Failed {
        program: self.program.clone(),
        status: status.to_string(),
      }));
    }

    Ok(())
  }
}
