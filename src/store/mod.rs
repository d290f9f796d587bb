//! File-backed persistence.
//!
//! Two stores share one data directory layout:
//! - `interviews`: one JSON file per interview in the data directory
//! - `versions`: append-only analysis history under
//!   `analysis_versions/`
//!
//! Both stores are plain-directory stores; a missing directory is
//! created on first write, and readers tolerate foreign files.

pub mod interviews;
pub mod versions;

pub use interviews::InterviewStore;
pub use versions::VersionStore;
