//! Release ledger
//!
//! One record per release in an external tracking service. The orchestrator only sees
//! the [`Ledger`] trait; [`NotionLedger`] is the HTTP implementation.

pub mod notion;

pub use notion::NotionLedger;

use crate::core::error::FolioResult;
use crate::release::DocType;
use chrono::NaiveDateTime;
use std::fmt;

/// Opaque id handed back by the ledger on creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordId(String);

impl RecordId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Everything a ledger record carries about one release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
  pub version: String,
  pub created_at: NaiveDateTime,
  pub message: String,
  pub branch: String,
  pub commit: String,
}

/// Ledger capability used by the release orchestrator
pub trait Ledger {
  /// Whether records can be created for this document type at all
  fn is_configured(&self, doc_type: DocType) -> bool;

  /// Create a record; `None` when the ledger is unconfigured for `doc_type`
  fn create_record(&self, doc_type: DocType, entry: &LedgerEntry) -> FolioResult<Option<RecordId>>;

  /// Archive a record; an already-gone record counts as deleted
  fn delete_record(&self, id: &RecordId) -> FolioResult<()>;
}
