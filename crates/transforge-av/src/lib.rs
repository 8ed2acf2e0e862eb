//! # transforge-av
//!
//! External conversion tool discovery and invocation.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`tools`]) -- locate the conversion tool on `PATH` or
//!   at a configured location and report its version.
//! - **Command execution** ([`ToolCommand`]) -- a blocking builder that runs a
//!   program with an argument list, never through a shell.
//! - **Transcoding** ([`Transcoder`], [`FfmpegTranscoder`]) -- turn one
//!   [`JobDescriptor`](transforge_common::JobDescriptor) into one
//!   [`JobOutcome`](transforge_common::JobOutcome).
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use transforge_av::{FfmpegTranscoder, TranscodeSettings, Transcoder};
//! use transforge_common::JobDescriptor;
//!
//! let transcoder = FfmpegTranscoder::new(TranscodeSettings::default());
//! let job = JobDescriptor::new("/media/a.mov", "/tmp/out", "mp4");
//! let outcome = transcoder.run(1, &job);
//! println!("{} -> {}", outcome.success, outcome.output_path.display());
//! ```

pub mod command;
mod error;
pub mod tools;
pub mod transcode;

// Re-exports
pub use command::ToolCommand;
pub use error::{Error, Result};
pub use tools::{check_tool, resolve_tool, ToolInfo, DEFAULT_TOOL};
pub use transcode::{FfmpegTranscoder, TranscodeSettings, Transcoder};
