//! Concrete repository implementations.

pub mod version;

pub use version::VersionRepository;
