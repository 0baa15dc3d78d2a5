//! Release run state machine
//!
//! `Idle → Gated → Built → {Naming → Archiving → Publishing → Annotating → Recording} →
//! Committed`. Any error inside the braces moves to `RollingBack`, undoes every completed
//! step through the [`Saga`], and ends in `Failed`.

use crate::core::build::ArtifactBuilder;
use crate::core::config::DocumentTarget;
use crate::core::error::{BuildError, FolioError, FolioResult};
use crate::core::vcs::VersionControl;
use crate::ledger::{Ledger, LedgerEntry, RecordId};
use crate::metadata::MetadataStore;
use crate::release::archive;
use crate::release::publish::{self, PublishedOutput};
use crate::release::saga::{Compensation, Saga};
use crate::release::{ReleaseRequest, VersionName, name_version};
use crate::utils::ArtifactDigest;
use chrono::NaiveDateTime;
use std::fmt;
use std::path::PathBuf;

/// Where a release run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseState {
  Idle,
  Gated,
  Built,
  Naming,
  Archiving,
  Publishing,
  Annotating,
  Recording,
  Committed,
  RollingBack,
  Failed,
}

impl ReleaseState {
  pub fn as_str(self) -> &'static str {
    match self {
      ReleaseState::Idle => "idle",
      ReleaseState::Gated => "gated",
      ReleaseState::Built => "built",
      ReleaseState::Naming => "naming",
      ReleaseState::Archiving => "archiving",
      ReleaseState::Publishing => "publishing",
      ReleaseState::Annotating => "annotating",
      ReleaseState::Recording => "recording",
      ReleaseState::Committed => "committed",
      ReleaseState::RollingBack => "rolling back",
      ReleaseState::Failed => "failed",
    }
  }
}

impl fmt::Display for ReleaseState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// External collaborators of a release run
#[derive(Clone, Copy)]
pub struct Capabilities<'a> {
  pub vcs: &'a dyn VersionControl,
  pub builder: &'a dyn ArtifactBuilder,
  pub ledger: &'a dyn Ledger,
  pub metadata: &'a dyn MetadataStore,
}

/// What a successful release produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
  pub version: VersionName,
  pub archive_path: Option<PathBuf>,
  pub output_path: PathBuf,
  pub digest: ArtifactDigest,
  pub record_id: Option<RecordId>,
  /// False when the source directory was already committed
  pub committed: bool,
  /// Best-effort failures that did not stop the release
  pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
  /// Source directory clean and not forced
  NoChanges,
  Released(ReleaseReport),
}

struct AtomicResult {
  version: VersionName,
  archive_path: Option<PathBuf>,
  published: PublishedOutput,
  record_id: Option<RecordId>,
}

/// Drives one release through its states
pub struct Orchestrator<'a> {
  caps: Capabilities<'a>,
  state: ReleaseState,
}

impl<'a> Orchestrator<'a> {
  pub fn new(caps: Capabilities<'a>) -> Self {
    Self {
      caps,
      state: ReleaseState::Idle,
    }
  }

  pub fn state(&self) -> ReleaseState {
    self.state
  }

  fn transition(&mut self, next: ReleaseState) {
    tracing::debug!(from = %self.state, to = %next, "release state");
    self.state = next;
  }

  /// Run a release for `target`, timestamped at `now`
  pub fn run(
    &mut self,
    request: &ReleaseRequest,
    target: &DocumentTarget,
    now: NaiveDateTime,
  ) -> FolioResult<ReleaseOutcome> {
    self.state = ReleaseState::Idle;
    let doc_type = request.doc_type;

    let clean = self.caps.vcs.is_clean(&target.source_dir)?;
    self.transition(ReleaseState::Gated);
    if clean && !request.force {
      println!("✅ No changes detected in {}. Nothing to release.", target.source_dir.display());
      self.transition(ReleaseState::Idle);
      return Ok(ReleaseOutcome::NoChanges);
    }
    if clean {
      println!("⚠️  No changes detected, forcing release.");
    }

    println!("🔨 Building {}...", doc_type);
    self.caps.builder.build(doc_type)?;
    if !target.artifact.is_file() {
      return Err(FolioError::Build(BuildError::ArtifactMissing {
        path: target.artifact.clone(),
      }));
    }
    self.transition(ReleaseState::Built);

    let mut saga = Saga::new();
    let mut warnings = Vec::new();
    let atomic = match self.atomic(request, target, now, &mut saga, &mut warnings) {
      Ok(result) => result,
      Err(cause) => {
        let step = self.state;
        println!("❌ Release failed during {}: {}", step, cause);
        println!("↩️  Rolling back...");
        self.transition(ReleaseState::RollingBack);
        let compensation_failures = saga.rollback(self.caps.ledger);
        self.transition(ReleaseState::Failed);
        return Err(FolioError::ReleaseAborted {
          step: step.to_string(),
          cause: Box::new(cause),
          compensation_failures,
        });
      }
    };

    if let Err(err) = publish::discard_backup(&atomic.published) {
      tracing::warn!(error = %err, "failed to remove output backup");
      warnings.push(format!("Could not remove output backup: {}", err));
    }

    let committed = if self.caps.vcs.is_clean(&target.source_dir)? {
      println!("ℹ️  {} already committed, skipping commit.", target.source_dir.display());
      false
    } else {
      println!("📝 Committing {}...", target.source_dir.display());
      self
        .caps
        .vcs
        .commit_path(&target.source_dir, request.message.text())?;
      true
    };
    self.transition(ReleaseState::Committed);

    Ok(ReleaseOutcome::Released(ReleaseReport {
      version: atomic.version,
      archive_path: atomic.archive_path,
      output_path: atomic.published.output_path.clone(),
      digest: atomic.published.digest,
      record_id: atomic.record_id,
      committed,
      warnings,
    }))
  }

  fn atomic(
    &mut self,
    request: &ReleaseRequest,
    target: &DocumentTarget,
    now: NaiveDateTime,
    saga: &mut Saga,
    warnings: &mut Vec<String>,
  ) -> FolioResult<AtomicResult> {
    let doc_type = request.doc_type;

    self.transition(ReleaseState::Naming);
    let version = name_version(&target.output_name, &request.message, now, target.extension());
    println!("🏷️  Version: {}", version);

    self.transition(ReleaseState::Archiving);
    let archive_path = archive::archive(&target.artifact, target.archive_dir.as_deref(), &version)?;
    match &archive_path {
      Some(path) => {
        println!("📦 Archived to {}", path.display());
        saga.record(Compensation::RemoveArchive(path.clone()));
      }
      None => println!("ℹ️  No archive directory configured for {}. Skipping archive.", doc_type),
    }

    self.transition(ReleaseState::Publishing);
    let published = publish::publish(&target.artifact, &target.output_path())?;
    println!("📄 Published to {}", published.output_path.display());
    saga.record(Compensation::RestoreOutput(published.clone()));

    self.transition(ReleaseState::Annotating);
    if let Err(err) = self.caps.metadata.write_version(&published.output_path, &version) {
      println!("⚠️  Could not write version metadata: {}", err);
      tracing::warn!(error = %err, output = %published.output_path.display(), "metadata annotation failed");
      warnings.push(format!("Metadata annotation failed: {}", err));
    }

    self.transition(ReleaseState::Recording);
    let record_id = if self.caps.ledger.is_configured(doc_type) {
      let head = self.caps.vcs.head_info()?;
      let entry = LedgerEntry {
        version: version.to_string(),
        created_at: now,
        message: request.message.text().to_string(),
        branch: head.branch,
        commit: head.commit,
      };
      let record_id = self.caps.ledger.create_record(doc_type, &entry)?;
      if let Some(id) = &record_id {
        println!("🗂️  Ledger record created: {}", id);
        saga.record(Compensation::DeleteLedgerRecord(id.clone()));
      }
      record_id
    } else {
      println!("ℹ️  Ledger not configured for {}. Skipping ledger record.", doc_type);
      None
    };

    Ok(AtomicResult {
      version,
      archive_path,
      published,
      record_id,
    })
  }
}
