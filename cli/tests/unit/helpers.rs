//! Shared test helpers: fake ports and output constructors.

#![allow(dead_code, clippy::expect_used)]

use std::collections::{BTreeMap, VecDeque};
use std::path::Path;
use std::process::{ExitStatus, Output};
use std::sync::Mutex;

use anyhow::Result;
use composer_provision::application::ports::{
    Clock, CommandRunner, ProgressReporter, RemoteSource, SourceResponse,
};
use composer_provision::domain::{CommandLine, Node};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub const HOUR_MS: i64 = 60 * 60 * 1000;

/// Node rooted at `root` with no tool locations.
pub fn local_node(root: &Path) -> Node {
    Node::local(root.to_path_buf(), BTreeMap::new())
}

/// `200 OK` with a `Last-Modified` header.
pub fn content(last_modified: i64, body: &[u8]) -> SourceResponse {
    SourceResponse::Content {
        last_modified: Some(last_modified),
        body: body.to_vec(),
    }
}

// ── Fake: command runner ─────────────────────────────────────────────────────

/// Records every command; succeeds unless a rule matches.
///
/// Rules match on a substring of the rendered command line.
#[derive(Default)]
pub struct FakeRunner {
    calls: Mutex<Vec<String>>,
    failures: Mutex<Vec<(String, i32)>>,
    spawn_errors: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands containing `needle` exit with `code`.
    pub fn fail_when(self, needle: &str, code: i32) -> Self {
        self.failures
            .lock()
            .expect("lock")
            .push((needle.to_string(), code));
        self
    }

    /// Commands containing `needle` cannot be spawned.
    pub fn spawn_error_when(self, needle: &str) -> Self {
        self.spawn_errors
            .lock()
            .expect("lock")
            .push(needle.to_string());
        self
    }

    /// Rendered command lines in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    /// Number of recorded commands containing `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.calls().iter().filter(|c| c.contains(needle)).count()
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, _node: &Node, command: &CommandLine) -> Result<Output> {
        let rendered = command.to_string();
        self.calls.lock().expect("lock").push(rendered.clone());
        if self
            .spawn_errors
            .lock()
            .expect("lock")
            .iter()
            .any(|n| rendered.contains(n.as_str()))
        {
            anyhow::bail!("failed to spawn {}", command.program);
        }
        let failure = self
            .failures
            .lock()
            .expect("lock")
            .iter()
            .find(|(n, _)| rendered.contains(n.as_str()))
            .map(|(_, code)| *code);
        Ok(match failure {
            Some(code) => err_output(code, b"Composer could not complete the request"),
            None => ok_output(b""),
        })
    }
}

// ── Fake: remote source ──────────────────────────────────────────────────────

/// Serves queued responses in order and records each request.
#[derive(Default)]
pub struct FakeSource {
    responses: Mutex<VecDeque<Result<SourceResponse, String>>>,
    requests: Mutex<Vec<(String, Option<i64>)>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: SourceResponse) -> Self {
        self.responses.lock().expect("lock").push_back(Ok(response));
        self
    }

    /// Next request fails at the transport level.
    pub fn unreachable(self, error: &str) -> Self {
        self.responses
            .lock()
            .expect("lock")
            .push_back(Err(error.to_string()));
        self
    }

    /// `(url, if_modified_since)` of every request so far.
    pub fn requests(&self) -> Vec<(String, Option<i64>)> {
        self.requests.lock().expect("lock").clone()
    }
}

impl RemoteSource for FakeSource {
    async fn get(&self, url: &str, if_modified_since: Option<i64>) -> Result<SourceResponse> {
        self.requests
            .lock()
            .expect("lock")
            .push((url.to_string(), if_modified_since));
        match self.responses.lock().expect("lock").pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(error)) => Err(anyhow::anyhow!(error)),
            None => anyhow::bail!("unexpected request to {url}"),
        }
    }
}

// ── Fake: clock ──────────────────────────────────────────────────────────────

pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

// ── Fake: progress reporters ─────────────────────────────────────────────────

pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

/// Keeps every warning it is given.
#[derive(Default)]
pub struct RecordingReporter {
    warnings: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().expect("lock").clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, message: &str) {
        self.warnings.lock().expect("lock").push(message.to_string());
    }
}
