//! Atomic document release
//!
//! A release gates on uncommitted changes, builds the artifact, then runs the atomic
//! phase (name, archive, publish, annotate, record) under a compensation list. Every
//! completed side effect is undone in reverse order if a later step fails.
//!
//! # Layout
//!
//! - **request**: document types, release messages, the invocation itself
//! - **naming**: version identifiers
//! - **archive**: timestamped snapshots of the artifact
//! - **publish**: promotion to the canonical output path with a `.bak` rollback point
//! - **saga**: compensating actions
//! - **orchestrator**: the state machine tying it together

pub mod archive;
pub mod naming;
pub mod orchestrator;
pub mod publish;
pub mod request;
pub mod saga;

pub use naming::{VersionName, name_version};
pub use orchestrator::{Capabilities, Orchestrator, ReleaseOutcome, ReleaseReport, ReleaseState};
pub use request::{DocType, ReleaseMessage, ReleaseRequest};
