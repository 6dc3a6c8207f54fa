//! Command execution for the cimerge CI helpers.
//!
//! Provides:
//! - [`CommandLine`], a program plus argument vector (no shell involved)
//! - [`CommandRunner`] and the blocking [`SystemRunner`]
//! - [`MergePlan`], the git steps that merge one branch into another

pub mod command;
pub mod error;
pub mod merge;
pub mod runner;

pub use command::CommandLine;
pub use error::{CommandError, CommandResult};
pub use merge::{MergeError, MergeOptions, MergePlan, MergeResult};
pub use runner::{CommandRunner, SystemRunner, run};
