//! Transforge-Common: Shared types and utilities.
//!
//! This crate provides the pieces every other transforge crate agrees on:
//!
//! - **Jobs**: [`JobDescriptor`] (one source-to-destination conversion) and
//!   [`JobOutcome`] (what happened when it ran)
//! - **Path Utilities**: destination path derivation and extension checks
//! - **Error Handling**: the common error type and its exit-code mapping
//!
//! # Examples
//!
//! ```
//! use std::path::Path;
//! use transforge_common::JobDescriptor;
//!
//! let job = JobDescriptor::new("/media/in/a.mov", "/tmp/out", "mp4");
//! assert_eq!(job.output_path(), Path::new("/tmp/out/a.mp4"));
//! ```

pub mod error;
pub mod job;
pub mod paths;

pub use error::{Error, Result};
pub use job::*;
