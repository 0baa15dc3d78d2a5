//! Core building blocks shared by every folio command
//!
//! - **build**: artifact builder capability (external build command)
//! - **config**: folio.toml parsing and validation
//! - **context**: project root plus loaded config, built once per invocation
//! - **error**: error types with contextual help and exit codes
//! - **vcs**: version-control capability (SystemGit)

pub mod build;
pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
