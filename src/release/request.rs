use chrono::NaiveDateTime;
use clap::ValueEnum;
use std::fmt;

/// Category of generated document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum DocType {
  #[value(name = "resume")]
  Resume,
  #[value(name = "cover_letter")]
  CoverLetter,
}

impl DocType {
  pub const ALL: [DocType; 2] = [DocType::Resume, DocType::CoverLetter];

  pub fn as_str(self) -> &'static str {
    match self {
      DocType::Resume => "resume",
      DocType::CoverLetter => "cover_letter",
    }
  }
}

impl fmt::Display for DocType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Release message plus whether the user actually typed it
///
/// Inferred messages are still used for the commit and the ledger, but never leak
/// into version names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseMessage {
  text: String,
  explicit: bool,
}

impl ReleaseMessage {
  pub fn explicit(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      explicit: true,
    }
  }

  /// `Update <doc_type> - <YYYY-MM-DD HH:MM>`
  pub fn inferred(doc_type: DocType, at: NaiveDateTime) -> Self {
    Self {
      text: format!("Update {} - {}", doc_type, at.format("%Y-%m-%d %H:%M")),
      explicit: false,
    }
  }

  /// Use the supplied message, or infer one when absent or blank
  pub fn from_arg(arg: Option<String>, doc_type: DocType, at: NaiveDateTime) -> Self {
    match arg {
      Some(text) if !text.trim().is_empty() => Self::explicit(text),
      _ => Self::inferred(doc_type, at),
    }
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn is_explicit(&self) -> bool {
    self.explicit
  }
}

/// One release invocation, read-only once created
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
  pub doc_type: DocType,
  pub message: ReleaseMessage,
  pub force: bool,
}
