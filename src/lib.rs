pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod planner;
pub mod resolver;
pub mod ui;

pub use error::{Result, TagPublishError};
pub use planner::plan_next;
pub use resolver::{ResolveStrategy, TagResolver};
