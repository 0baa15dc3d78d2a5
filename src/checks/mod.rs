//! Health checks for `folio doctor`
//!
//! # Built-in Checks
//!
//! - **config**: folio.toml exists and validates
//! - **git-repo**: the project is inside a git work tree
//! - **build-command**: the configured build program exists
//! - **ledger-schema** (thorough): ledger databases are reachable and carry the record
//!   properties

mod build;
mod config;
mod git;
mod ledger_schema;
mod runner;
mod trait_def;

pub use runner::create_default_runner;
pub use trait_def::{CheckContext, Severity};
