//! # docvault-entity
//!
//! Domain entity models for DocVault: document versions, change records,
//! and their enumerations. Entities derive `sqlx::FromRow` so repository
//! code can map rows directly, and `serde` traits for the API/CLI boundary.

pub mod change;
pub mod version;

pub use change::{
    ChangeDraft, ChangeType, ComplianceFramework, ComplianceImpact, DocumentChange, ImpactLevel,
};
pub use version::{
    CreateComment, CreateTag, CreateVersion, DocumentVersion, UploadType, VersionComment,
    VersionTag,
};
