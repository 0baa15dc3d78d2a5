//! Version identifiers
//!
//! `<prefix>[_<message>]_<YYYYmmdd_HHMMSS>.<ext>`, where the message segment is the
//! sanitized release message and only appears when the message was explicit.
//! Resolution is one second; two releases of the same prefix within a second collide.

use crate::release::ReleaseMessage;
use chrono::NaiveDateTime;
use std::fmt;

/// Timestamp layout of the trailing version segment
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Filesystem-safe name of one release
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionName(String);

impl VersionName {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for VersionName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for VersionName {
  fn from(name: &str) -> Self {
    Self(name.to_string())
  }
}

/// Spaces become underscores, then anything not alphanumeric or `_` is dropped
pub fn sanitize_message(message: &str) -> String {
  message
    .replace(' ', "_")
    .chars()
    .filter(|c| c.is_alphanumeric() || *c == '_')
    .collect()
}

/// Compose the version identifier for a release
pub fn name_version(
  prefix: &str,
  message: &ReleaseMessage,
  timestamp: NaiveDateTime,
  extension: &str,
) -> VersionName {
  let stamp = timestamp.format(TIMESTAMP_FORMAT);
  let sanitized = if message.is_explicit() {
    sanitize_message(message.text())
  } else {
    String::new()
  };

  let stem = if sanitized.is_empty() {
    format!("{}_{}", prefix, stamp)
  } else {
    format!("{}_{}_{}", prefix, sanitized, stamp)
  };

  if extension.is_empty() {
    VersionName(stem)
  } else {
    VersionName(format!("{}.{}", stem, extension))
  }
}
