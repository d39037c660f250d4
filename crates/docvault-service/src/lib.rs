//! # docvault-service
//!
//! Business logic layer for DocVault. [`VersionService`] is the public
//! orchestrator: it enforces version-numbering and duplicate-detection
//! invariants, drives change analysis between consecutive versions, and
//! exposes rollback and comparison.
//!
//! Services follow constructor injection — the persistence seam is an
//! `Arc<dyn VersionStore>` provided at construction time.

pub mod version;

pub use version::{ChangeStatistics, CreateVersionRequest, VersionComparison, VersionService};
