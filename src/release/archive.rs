use crate::core::error::{FolioError, FolioResult, ResultExt};
use crate::release::VersionName;
use crate::utils;
use std::fs;
use std::path::{Path, PathBuf};

/// Snapshot the built artifact into `archive_dir/<version_name>`
///
/// Returns `None` when archiving is not configured. An existing file at the target
/// (a same-second collision) is never overwritten.
pub fn archive(source: &Path, archive_dir: Option<&Path>, version: &VersionName) -> FolioResult<Option<PathBuf>> {
  let Some(archive_dir) = archive_dir else {
    return Ok(None);
  };

  fs::create_dir_all(archive_dir)
    .with_context(|| format!("Failed to create archive directory {}", archive_dir.display()))?;

  let target = archive_dir.join(version.as_str());
  if target.exists() {
    return Err(FolioError::with_help(
      format!("Archive file already exists: {}", target.display()),
      "Version names have one-second resolution; wait a second and release again.",
    ));
  }

  utils::copy_preserving_times(source, &target)?;
  tracing::info!(archive = %target.display(), "archived artifact");
  Ok(Some(target))
}

/// Undo [`archive`]
pub fn remove_archive(path: &Path) -> FolioResult<()> {
  utils::remove_if_exists(path)?;
  Ok(())
}
