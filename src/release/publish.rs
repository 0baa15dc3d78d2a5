use crate::core::error::{FolioError, FolioResult, ResultExt};
use crate::utils::{self, ArtifactDigest};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the promoted artifact landed and what it replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedOutput {
  pub output_path: PathBuf,
  /// Copy of the previous output, present only if one existed
  pub backup_path: Option<PathBuf>,
  pub digest: ArtifactDigest,
}

/// `<output>.bak`
pub fn backup_path_for(output_path: &Path) -> PathBuf {
  let mut name = output_path.as_os_str().to_os_string();
  name.push(".bak");
  PathBuf::from(name)
}

/// Promote the built artifact to the canonical output path
///
/// The previous output, if any, is copied aside first. The promoted bytes are checked
/// against the source digest before returning.
pub fn publish(source: &Path, output_path: &Path) -> FolioResult<PublishedOutput> {
  let expected = ArtifactDigest::of_file(source)?;

  if let Some(output_dir) = output_path.parent() {
    fs::create_dir_all(output_dir)
      .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;
  }

  let backup_path = if output_path.exists() {
    let backup = backup_path_for(output_path);
    utils::copy_preserving_times(output_path, &backup)?;
    tracing::debug!(backup = %backup.display(), "backed up previous output");
    Some(backup)
  } else {
    None
  };

  let published = PublishedOutput {
    output_path: output_path.to_path_buf(),
    backup_path,
    digest: expected.clone(),
  };

  // The caller only sees the backup on success, so a failed promotion undoes itself.
  if let Err(err) = promote(source, output_path, &expected) {
    if let Err(undo) = restore_output(&published) {
      tracing::error!(error = %undo, "failed to undo partial publish");
    }
    return Err(err);
  }

  tracing::info!(output = %output_path.display(), digest = %expected, "published artifact");
  Ok(published)
}

fn promote(source: &Path, output_path: &Path, expected: &ArtifactDigest) -> FolioResult<()> {
  utils::copy_preserving_times(source, output_path)?;

  let actual = ArtifactDigest::of_file(output_path)?;
  if &actual != expected {
    return Err(FolioError::message(format!(
      "Published output {} does not match the built artifact ({} != {})",
      output_path.display(),
      actual,
      expected
    )));
  }

  Ok(())
}

/// Undo [`publish`]: move the backup back, or delete an output this run created
pub fn restore_output(published: &PublishedOutput) -> FolioResult<()> {
  match &published.backup_path {
    Some(backup) if backup.exists() => {
      fs::rename(backup, &published.output_path).with_context(|| {
        format!(
          "Failed to restore {} from {}",
          published.output_path.display(),
          backup.display()
        )
      })?;
    }
    Some(backup) => {
      return Err(FolioError::message(format!(
        "Backup {} is missing; cannot restore {}",
        backup.display(),
        published.output_path.display()
      )));
    }
    None => {
      utils::remove_if_exists(&published.output_path)?;
    }
  }

  Ok(())
}

/// Drop the scratch backup once the run is over
pub fn discard_backup(published: &PublishedOutput) -> FolioResult<()> {
  if let Some(backup) = &published.backup_path {
    utils::remove_if_exists(backup)?;
  }
  Ok(())
}
