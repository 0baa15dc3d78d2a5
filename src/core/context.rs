//! Project context - build once, pass to every command
//!
//! `ProjectContext` loads folio.toml once in main.rs and hands commands a shared,
//! immutable view of the project root and its configuration.

use crate::core::config::{DocumentTarget, ReleaseConfig};
use crate::core::error::FolioResult;
use crate::release::DocType;
use std::path::{Path, PathBuf};

/// Project root plus its parsed configuration
#[derive(Debug, Clone)]
pub struct ProjectContext {
  /// Project root directory (where folio.toml lives)
  pub root: PathBuf,

  /// Parsed and validated configuration
  pub config: ReleaseConfig,
}

impl ProjectContext {
  /// Build the context from a project root directory.
  pub fn build(project_root: &Path) -> FolioResult<Self> {
    let config = ReleaseConfig::load(project_root)?;
    Ok(Self {
      root: project_root.to_path_buf(),
      config,
    })
  }

  /// Resolve a document type's paths against the project root
  pub fn target(&self, doc_type: DocType) -> FolioResult<DocumentTarget> {
    self.config.target(&self.root, doc_type)
  }
}
