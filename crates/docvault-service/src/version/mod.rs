//! Version orchestration: creation, rollback, comparison, annotations.

pub mod compare;
pub mod content;
pub mod service;

pub use compare::{ChangeStatistics, VersionComparison};
pub use service::{CreateVersionRequest, VersionService};
