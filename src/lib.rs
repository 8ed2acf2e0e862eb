//! Transforge - batch media transcoding across a fixed pool of worker threads
//!
//! This library crate exposes the dispatch engine for the binary and for
//! integration testing.

pub mod config;
pub mod dispatch;
pub mod joblog;
