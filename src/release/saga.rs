//! Compensating actions for the atomic phase
//!
//! Each forward step pushes its undo record only after it has fully succeeded, so a
//! rollback never touches anything this run did not create. Rollback drains the list,
//! which makes a second rollback a no-op.

use crate::core::error::FolioResult;
use crate::ledger::{Ledger, RecordId};
use crate::release::archive;
use crate::release::publish::{self, PublishedOutput};
use std::fmt;
use std::path::PathBuf;

/// Undo record for one completed forward step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
  /// Delete the archive copy made by this run
  RemoveArchive(PathBuf),
  /// Put the previous output back (or delete a fresh one)
  RestoreOutput(PublishedOutput),
  /// Archive the ledger record created by this run
  DeleteLedgerRecord(RecordId),
}

impl Compensation {
  fn run(&self, ledger: &dyn Ledger) -> FolioResult<()> {
    match self {
      Compensation::RemoveArchive(path) => archive::remove_archive(path),
      Compensation::RestoreOutput(published) => publish::restore_output(published),
      Compensation::DeleteLedgerRecord(id) => ledger.delete_record(id),
    }
  }
}

impl fmt::Display for Compensation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Compensation::RemoveArchive(path) => write!(f, "remove archive {}", path.display()),
      Compensation::RestoreOutput(published) => match &published.backup_path {
        Some(backup) => write!(
          f,
          "restore {} from {}",
          published.output_path.display(),
          backup.display()
        ),
        None => write!(f, "remove {}", published.output_path.display()),
      },
      Compensation::DeleteLedgerRecord(id) => write!(f, "delete ledger record {}", id),
    }
  }
}

/// Ordered list of valid compensations
#[derive(Debug, Default)]
pub struct Saga {
  completed: Vec<Compensation>,
}

impl Saga {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register the undo for a step that just succeeded
  pub fn record(&mut self, compensation: Compensation) {
    tracing::debug!(compensation = %compensation, "compensation registered");
    self.completed.push(compensation);
  }

  pub fn pending(&self) -> &[Compensation] {
    &self.completed
  }

  /// Run every compensation, newest first
  ///
  /// A failing compensation is logged and collected; the remaining ones still run.
  pub fn rollback(&mut self, ledger: &dyn Ledger) -> Vec<String> {
    let mut failures = Vec::new();

    while let Some(compensation) = self.completed.pop() {
      match compensation.run(ledger) {
        Ok(()) => {
          println!("   ↩️  {}", compensation);
          tracing::info!(compensation = %compensation, "compensation applied");
        }
        Err(err) => {
          println!("   ❌ {} failed: {}", compensation, err);
          tracing::error!(compensation = %compensation, error = %err, "compensation failed");
          failures.push(format!("{}: {}", compensation, err));
        }
      }
    }

    failures
  }
}
