//! Shared test harness for integration tests.
//!
//! Provides an in-memory job log sink ([`Capture`]), an instrumented
//! [`RecordingTranscoder`] that never launches a process, and (on unix) a
//! fake conversion tool script for driving the real binary.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use transforge::joblog::{LogRecord, Logger};
use transforge_av::Transcoder;
use transforge_common::{JobDescriptor, JobOutcome, WorkerId};

/// Writer that keeps everything written to it, shareable across threads.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Capture {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().clone()).expect("job log is valid UTF-8")
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }

    /// Parse every line, panicking on the first malformed one.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lines()
            .iter()
            .map(|line| {
                LogRecord::parse(line).unwrap_or_else(|| panic!("malformed job log line: {line:?}"))
            })
            .collect()
    }
}

/// Logger writing into a fresh [`Capture`].
pub fn capturing_logger(actor: &str) -> (Arc<Logger>, Capture) {
    let capture = Capture::default();
    (Arc::new(Logger::new(actor, capture.clone())), capture)
}

/// `count` jobs named `clip<i>.mov` targeting `/tmp/out/*.mp4`.
pub fn jobs(count: usize) -> Vec<JobDescriptor> {
    (0..count)
        .map(|i| JobDescriptor::new(format!("/media/clip{i}.mov"), "/tmp/out", "mp4"))
        .collect()
}

/// Transcoder that records every call instead of launching anything.
///
/// Sources whose file name contains `fail` exit with [`FAIL_CODE`]. An
/// optional delay makes workers overlap.
#[derive(Default)]
pub struct RecordingTranscoder {
    calls: Mutex<HashMap<PathBuf, usize>>,
    workers: Mutex<HashMap<PathBuf, WorkerId>>,
    delay: Duration,
}

pub const FAIL_CODE: i32 = 3;

impl RecordingTranscoder {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// How many times each source was run.
    pub fn calls(&self) -> HashMap<PathBuf, usize> {
        self.calls.lock().clone()
    }

    /// Worker that ran each source.
    pub fn workers(&self) -> HashMap<PathBuf, WorkerId> {
        self.workers.lock().clone()
    }
}

impl Transcoder for RecordingTranscoder {
    fn run(&self, worker_id: WorkerId, job: &JobDescriptor) -> JobOutcome {
        *self
            .calls
            .lock()
            .entry(job.source_path().to_path_buf())
            .or_insert(0) += 1;
        self.workers
            .lock()
            .insert(job.source_path().to_path_buf(), worker_id);

        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let fails = job
            .source_path()
            .file_name()
            .map(|n| n.to_string_lossy().contains("fail"))
            .unwrap_or(false);
        let exit_code = if fails { FAIL_CODE } else { 0 };

        JobOutcome {
            job: job.clone(),
            worker_id,
            success: !fails,
            exit_code: Some(exit_code),
            output_path: job.output_path(),
            elapsed: self.delay,
        }
    }
}

/// Write an executable fake conversion tool into `dir`.
///
/// It follows the `-y -i <input> [options] <output>` convention: it fails
/// with exit code 3 when the input name contains `fail`, and otherwise writes
/// the input path and options into the output file.
#[cfg(unix)]
pub fn fake_tool(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-ffmpeg");
    let script = r#"#!/bin/sh
[ "$1" = "-y" ] || exit 64
[ "$2" = "-i" ] || exit 64
input="$3"
shift 3
for last in "$@"; do :; done
case "$input" in
  *fail*) exit 3 ;;
esac
printf '%s\n' "$input" "$@" > "$last"
"#;
    std::fs::write(&path, script).expect("write fake tool");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("make fake tool executable");
    path
}
