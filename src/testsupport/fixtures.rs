//! Test fixtures shared by the library's unit tests, the binary's tests and
//! the integration suites.
//!
//! Included by `#[path]` from each of those crates; the including module
//! brings `ForwardSpec`, `TunnelLauncher`, `ProgressHandle` and `RenderSink`
//! into scope.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::process::Command;
use tokio::task::JoinHandle;

use super::{ForwardSpec, ProgressHandle, RenderSink, TunnelLauncher};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!(
            "tunnelchat-{prefix}-{}-{millis}-{suffix}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Runs a fixed `sh -c` script in place of ssh.
#[derive(Debug, Clone, Copy)]
pub struct ScriptLauncher(pub &'static str);

impl ScriptLauncher {
    /// A process that stays up for the whole test.
    pub fn long_lived() -> Self {
        Self("exec sleep 30")
    }
}

impl TunnelLauncher for ScriptLauncher {
    fn command(&self, _spec: &ForwardSpec) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(self.0);
        cmd
    }
}

/// Render sink that records `kind: text` lines instead of printing.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: std::sync::Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("sink lock").clone()
    }

    pub fn contains(&self, line: &str) -> bool {
        self.lines().iter().any(|l| l == line)
    }

    fn push(&self, kind: &str, text: &str) {
        self.lines
            .lock()
            .expect("sink lock")
            .push(format!("{kind}: {text}"));
    }
}

impl RenderSink for RecordingSink {
    fn assistant_message(&self, content: &str) {
        self.push("assistant", content);
    }

    fn progress(&self, label: &str) -> ProgressHandle {
        self.push("progress", label);
        ProgressHandle::disabled()
    }

    fn header(&self, model: &str) {
        self.push("header", model);
    }

    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }

    fn section(&self, title: &str) {
        self.push("section", title);
    }

    fn activity(&self, text: &str) {
        self.push("activity", text);
    }

    fn field(&self, key: &str, value: &str) {
        self.push("field", &format!("{key}={value}"));
    }

    fn detail(&self, text: &str) {
        self.push("detail", text);
    }

    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
}

/// One canned HTTP response served by [`spawn_http_stub`].
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A request captured by the stub: request line plus body.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub request_line: String,
    pub body: String,
}

impl RecordedRequest {
    /// `"POST /api/generate"` style method + path prefix.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.request_line.starts_with(prefix)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body should be json")
    }
}

/// Serve `responses` in order, one connection each, and return the bound
/// port plus a handle yielding the captured requests.
pub async fn spawn_http_stub(
    responses: Vec<StubResponse>,
) -> (u16, JoinHandle<Vec<RecordedRequest>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let port = listener.local_addr().expect("stub addr").port();
    let handle = tokio::spawn(async move {
        let mut recorded = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().await.expect("accept");
            recorded.push(read_request(&mut stream).await);
            let reply = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                response.status,
                reason_phrase(response.status),
                response.body.len(),
                response.body
            );
            let _ = stream.write_all(reply.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
        recorded
    });
    (port, handle)
}

/// Bind a port that accepts connections and never answers.
pub async fn spawn_silent_listener() -> (u16, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind silent");
    let port = listener.local_addr().expect("silent addr").port();
    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    (port, handle)
}

/// Return a local port with nothing listening on it.
pub async fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind unused");
    let port = listener.local_addr().expect("unused addr").port();
    drop(listener);
    port
}

/// Send `signal` (a `kill` name such as `TERM`) to this test process after
/// `delay`. Install the handlers first or the default action applies.
pub fn signal_self_after(signal: &'static str, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let status = Command::new("kill")
            .arg(format!("-{signal}"))
            .arg(std::process::id().to_string())
            .status()
            .await
            .expect("run kill");
        assert!(status.success(), "kill -{signal} failed");
    })
}

/// Wait up to `within` for `pid` to be gone or a zombie.
pub async fn wait_for_exit(pid: u32, within: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + within;
    loop {
        if !process_running(pid) {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

fn process_running(pid: u32) -> bool {
    let Ok(stat) = fs::read_to_string(format!("/proc/{pid}/stat")) else {
        return false;
    };
    // State follows the parenthesised command name.
    let state = stat
        .rsplit_once(')')
        .and_then(|(_, rest)| rest.trim_start().chars().next());
    !matches!(state, Some('Z' | 'X') | None)
}

async fn read_request(stream: &mut TcpStream) -> RecordedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break buf.len();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end.min(buf.len())]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body_end = (header_end + content_length).min(buf.len());
    RecordedRequest {
        request_line: head.lines().next().unwrap_or_default().to_string(),
        body: String::from_utf8_lossy(&buf[header_end.min(body_end)..body_end]).to_string(),
    }
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
