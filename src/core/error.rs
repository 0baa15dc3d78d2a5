//! Error types for folio with contextual messages and exit codes
//!
//! Every fatal failure of a run is a [`FolioError`]. Best-effort failures (metadata
//! annotation, rollback compensations) never travel through this type as the result of
//! a release; they are collected as warnings or attached to
//! [`FolioError::ReleaseAborted`].

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for folio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (git, build, network, I/O)
  System = 2,
  /// Validation failure (doctor checks failed)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for folio
#[derive(Debug)]
pub enum FolioError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// External build failed
  Build(BuildError),

  /// Ledger service errors
  Ledger(LedgerError),

  /// I/O errors
  Io(io::Error),

  /// The atomic phase failed and was rolled back
  ReleaseAborted {
    step: String,
    cause: Box<FolioError>,
    compensation_failures: Vec<String>,
  },

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl FolioError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    FolioError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    FolioError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// I/O errors are folded into a message so the path that failed is not lost.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      FolioError::Message { message, context, help } => FolioError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      FolioError::Io(err) => FolioError::Message {
        message: ctx_str,
        context: Some(format!("I/O error: {}", err)),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      FolioError::Config(_) => ExitCode::User,
      FolioError::Git(_) => ExitCode::System,
      FolioError::Build(_) => ExitCode::System,
      FolioError::Ledger(_) => ExitCode::System,
      FolioError::Io(_) => ExitCode::System,
      FolioError::ReleaseAborted { .. } => ExitCode::System,
      FolioError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      FolioError::Config(e) => e.help_message(),
      FolioError::Git(e) => e.help_message(),
      FolioError::Ledger(e) => e.help_message(),
      FolioError::ReleaseAborted { cause, .. } => cause.help_message(),
      FolioError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for FolioError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FolioError::Config(e) => write!(f, "{}", e),
      FolioError::Git(e) => write!(f, "{}", e),
      FolioError::Build(e) => write!(f, "{}", e),
      FolioError::Ledger(e) => write!(f, "{}", e),
      FolioError::Io(e) => write!(f, "I/O error: {}", e),
      FolioError::ReleaseAborted {
        step,
        cause,
        compensation_failures,
      } => {
        write!(f, "Release failed during {} and was rolled back: {}", step, cause)?;
        if !compensation_failures.is_empty() {
          write!(f, "\nRollback was incomplete:")?;
          for failure in compensation_failures {
            write!(f, "\n  - {}", failure)?;
          }
        }
        Ok(())
      }
      FolioError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for FolioError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      FolioError::Io(e) => Some(e),
      FolioError::ReleaseAborted { cause, .. } => Some(cause.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for FolioError {
  fn from(err: io::Error) -> Self {
    FolioError::Io(err)
  }
}

impl From<String> for FolioError {
  fn from(msg: String) -> Self {
    FolioError::message(msg)
  }
}

impl From<&str> for FolioError {
  fn from(msg: &str) -> Self {
    FolioError::message(msg)
  }
}

impl From<toml_edit::de::Error> for FolioError {
  fn from(err: toml_edit::de::Error) -> Self {
    FolioError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for FolioError {
  fn from(err: serde_json::Error) -> Self {
    FolioError::message(format!("JSON error: {}", err))
  }
}

impl From<lopdf::Error> for FolioError {
  fn from(err: lopdf::Error) -> Self {
    FolioError::message(format!("PDF error: {}", err))
  }
}

impl From<LedgerError> for FolioError {
  fn from(err: LedgerError) -> Self {
    FolioError::Ledger(err)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// folio.toml not found
  NotFound { project_root: PathBuf },

  /// Missing required field
  MissingField { field: String },

  /// Field present but unusable
  InvalidField { field: String, reason: String },

  /// Document type has no `[documents.<type>]` table
  DocumentNotConfigured { doc_type: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Create folio.toml with [output], [build] and [documents.<type>] tables.".to_string())
      }
      ConfigError::DocumentNotConfigured { doc_type } => {
        Some(format!("Add a [documents.{}] table to folio.toml.", doc_type))
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { project_root } => {
        write!(
          f,
          "No folio configuration found.\nExpected file: {}/folio.toml",
          project_root.display()
        )
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid config field '{}': {}", field, reason)
      }
      ConfigError::DocumentNotConfigured { doc_type } => {
        write!(f, "Document type '{}' is not configured", doc_type)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "Run folio from inside a git work tree (checked: {})",
        path.display()
      )),
      GitError::CommandFailed { stderr, .. } if stderr.contains("user.email") => {
        Some("Configure a git identity: git config user.email you@example.com".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr.trim_end())
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// External build errors
#[derive(Debug)]
pub enum BuildError {
  /// Build program could not be started
  Spawn { program: String, reason: String },

  /// Build program exited unsuccessfully
  Failed { program: String, status: String },

  /// Build succeeded but the expected artifact is missing
  ArtifactMissing { path: PathBuf },
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::Spawn { program, reason } => {
        write!(f, "Failed to start build command '{}': {}", program, reason)
      }
      BuildError::Failed { program, status } => {
        write!(f, "Build command '{}' failed ({})", program, status)
      }
      BuildError::ArtifactMissing { path } => {
        write!(f, "Generated artifact not found at {}", path.display())
      }
    }
  }
}

/// Ledger service errors
#[derive(Debug)]
pub enum LedgerError {
  /// Credentials rejected (HTTP 401)
  Unauthorized,

  /// Non-success HTTP status
  Status { code: u16, body: String },

  /// Connection, TLS or protocol failure
  Transport(String),

  /// Response body did not carry what we need
  MalformedResponse(String),
}

impl LedgerError {
  fn help_message(&self) -> Option<String> {
    match self {
      LedgerError::Unauthorized => Some("Check the [ledger] token in folio.toml.".to_string()),
      LedgerError::Status { code: 404, .. } => Some(
        "The ledger database was not found. Make sure the integration is connected to it and the id is correct."
          .to_string(),
      ),
      LedgerError::Transport(_) => Some("Run `folio doctor --thorough` to test ledger connectivity.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for LedgerError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LedgerError::Unauthorized => write!(f, "Ledger rejected the credentials (401 Unauthorized)"),
      LedgerError::Status { code, body } => write!(f, "Ledger request failed: {} - {}", code, body),
      LedgerError::Transport(msg) => write!(f, "Ledger transport error: {}", msg),
      LedgerError::MalformedResponse(msg) => write!(f, "Unexpected ledger response: {}", msg),
    }
  }
}

/// Result type alias for folio
pub type FolioResult<T> = Result<T, FolioError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> FolioResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> FolioResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<FolioError>,
{
  fn context(self, ctx: impl Into<String>) -> FolioResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> FolioResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &FolioError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
