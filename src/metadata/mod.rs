//! Embedded artifact metadata
//!
//! The published artifact carries its version name in two fields: a custom `Version`
//! field and the standard `Subject` field as `Version: <name>`. Readers fall back to the
//! title when neither is present.

pub mod pdf;

pub use pdf::PdfMetadata;

use crate::core::error::FolioResult;
use crate::release::VersionName;
use std::path::Path;

/// Prefix of the human-readable version field
pub const SUBJECT_PREFIX: &str = "Version: ";

/// Metadata fields relevant to version lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
  pub version: Option<String>,
  pub subject: Option<String>,
  pub title: Option<String>,
}

/// Version label of an artifact
///
/// The first field present decides: `Version`, then `Subject` (with any `Version: `
/// prefix removed), then `Title`. A present but blank field means no version.
pub fn resolve_version(info: &DocumentInfo) -> Option<String> {
  let label = if let Some(version) = &info.version {
    version.trim()
  } else if let Some(subject) = &info.subject {
    let subject = subject.trim();
    subject.strip_prefix(SUBJECT_PREFIX).unwrap_or(subject).trim()
  } else {
    info.title.as_deref()?.trim()
  };

  (!label.is_empty()).then(|| label.to_string())
}

/// Metadata capability used by the orchestrator and `folio version`
pub trait MetadataStore {
  fn read(&self, path: &Path) -> FolioResult<DocumentInfo>;

  /// Overwrite the version fields in place
  fn write_version(&self, path: &Path, version: &VersionName) -> FolioResult<()>;
}
