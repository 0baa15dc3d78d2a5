//! File helpers shared by the archive and publish steps

use crate::core::error::{FolioResult, ResultExt};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::{self, File, FileTimes};
use std::path::Path;

/// SHA-256 of an artifact's bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDigest(String);

impl ArtifactDigest {
  /// Digest of in-memory contents
  pub fn from_contents(contents: &[u8]) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let result = hasher.finalize();
    Self(format!("{:x}", result))
  }

  /// Digest of a file on disk
  pub fn of_file(path: &Path) -> FolioResult<Self> {
    let contents = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Self::from_contents(&contents))
  }

  /// Get the short digest (first 12 characters)
  pub fn short(&self) -> &str {
    &self.0[..12.min(self.0.len())]
  }
}

impl fmt::Display for ArtifactDigest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.short())
  }
}

/// Copy a file and carry over its access and modification times
///
/// Permissions come along with `fs::copy`; timestamps need an explicit pass.
pub fn copy_preserving_times(from: &Path, to: &Path) -> FolioResult<()> {
  fs::copy(from, to).with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;

  let meta = fs::metadata(from).with_context(|| format!("Failed to stat {}", from.display()))?;
  let mut times = FileTimes::new();
  if let Ok(accessed) = meta.accessed() {
    times = times.set_accessed(accessed);
  }
  if let Ok(modified) = meta.modified() {
    times = times.set_modified(modified);
  }

  let dest = File::options()
    .write(true)
    .open(to)
    .with_context(|| format!("Failed to open {}", to.display()))?;
  dest
    .set_times(times)
    .with_context(|| format!("Failed to set timestamps on {}", to.display()))?;

  Ok(())
}

/// Remove a file if present; absent is not an error
pub fn remove_if_exists(path: &Path) -> FolioResult<bool> {
  match fs::remove_file(path) {
    Ok(()) => Ok(true),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
    Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
  }
}
