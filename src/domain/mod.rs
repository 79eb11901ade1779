//! Domain logic - pure version rules independent of git operations

pub mod branch;
pub mod ranking;
pub mod tag;
pub mod version;

pub use branch::BranchRef;
pub use ranking::{compare_tags, is_greater};
pub use tag::{extract_prefix, TagFormat};
pub use version::ParsedVersion;
