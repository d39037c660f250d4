//! # docvault-analysis
//!
//! Pure change analysis for DocVault. Given two content snapshots, the
//! [`ChangeAnalyzer`] computes a line-level diff, classifies each segment
//! into a change type, assigns an impact level from an ordered rule table,
//! and tags affected compliance frameworks by keyword scanning.
//!
//! Everything in this crate is stateless and synchronous — no I/O, no
//! storage access. The orchestrator in `docvault-service` owns persistence
//! of the resulting [`ChangeDraft`](docvault_entity::ChangeDraft)s.

pub mod analyzer;
pub mod frameworks;
pub mod impact;
pub mod summary;

pub use analyzer::ChangeAnalyzer;
