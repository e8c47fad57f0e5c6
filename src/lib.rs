//! crosspick - cherry-pick a commit from another repository's branch onto a branch of this one.
//!
//! The pipeline lives in [`workflow`]; every git interaction goes through the builders in
//! [`git`], run as `git` subprocesses.

pub mod branch;
pub mod config;
pub mod error;
pub mod git;
pub mod history;
pub mod lock;
pub mod pick;
pub mod push;
pub mod remote;
pub mod shell;
pub mod workflow;

pub use config::{ConfigFile, WorkflowConfig};
pub use error::{Error, Result};
pub use workflow::{discover_commits, ConflictReport, RunStatus, Workflow};
