//! CLI commands for folio
//!
//! - **release**: build, archive, publish, record and commit one document type
//! - **version**: print the published artifact's version label
//! - **doctor**: run health checks and validation
//!
//! `release` and `version` take the `&ProjectContext` built once in main.rs; `doctor`
//! loads what it needs itself so it can report a broken folio.toml.

pub mod doctor;
pub mod release;
pub mod version;

pub use doctor::run_doctor;
pub use release::run_release;
pub use version::run_version;
