//! Owns the single forwarding subprocess and samples its liveness.

use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::task::JoinHandle;

use super::{ForwardSpec, TunnelLauncher};
use crate::error::TunnelError;

/// Upper bound on retained stderr bytes per tunnel process.
const STDERR_TAIL_BYTES: usize = 4096;
/// How long to wait for the stderr reader after the process has exited.
const STDERR_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// One live forwarding subprocess.
struct TunnelHandle {
    spec: ForwardSpec,
    child: Child,
    stderr_tail: Option<JoinHandle<String>>,
}

impl Drop for TunnelHandle {
    fn drop(&mut self) {
        if let Some(task) = self.stderr_tail.take() {
            task.abort();
        }
        // `id()` is `None` once the child has been reaped.
        if let Some(pid) = self.child.id() {
            tracing::debug!(pid, "killing tunnel process on drop");
            let _ = self.child.start_kill();
        }
    }
}

/// Snapshot of tunnel state for status output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelStatus {
    pub active: bool,
    pub pid: Option<u32>,
    pub spec: Option<ForwardSpec>,
}

/// Manages at most one forwarding subprocess.
///
/// The handle is stored only while the process is believed alive, so
/// `is_active` is the last sampled liveness. Dropping the manager kills any
/// remaining process.
pub struct TunnelManager {
    launcher: Box<dyn TunnelLauncher>,
    settle: Duration,
    handle: Option<TunnelHandle>,
}

impl TunnelManager {
    pub fn new(launcher: Box<dyn TunnelLauncher>, settle: Duration) -> Self {
        Self {
            launcher,
            settle,
            handle: None,
        }
    }

    /// Replace any current tunnel with a fresh one for `spec`.
    ///
    /// Succeeds when the process is still running after the settle
    /// interval. That only proves the local process is alive, not that the
    /// remote side accepted the forward.
    pub async fn connect(&mut self, spec: &ForwardSpec) -> Result<(), TunnelError> {
        self.disconnect().await;

        let mut cmd = self.launcher.command(spec);
        cmd.kill_on_drop(true)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        let mut child = cmd.spawn()?;
        let pid = child.id();
        let stderr_tail = child
            .stderr
            .take()
            .map(|stderr| tokio::spawn(collect_tail(stderr)));
        tracing::info!(?pid, local_port = spec.local_port, target = %spec.target(), "spawned tunnel");

        tokio::time::sleep(self.settle).await;

        match child.try_wait().map_err(TunnelError::Wait)? {
            None => {
                self.handle = Some(TunnelHandle {
                    spec: spec.clone(),
                    child,
                    stderr_tail,
                });
                Ok(())
            }
            Some(status) => {
                let stderr = match stderr_tail {
                    Some(task) => tokio::time::timeout(STDERR_DRAIN_TIMEOUT, task)
                        .await
                        .ok()
                        .and_then(Result::ok)
                        .unwrap_or_default(),
                    None => String::new(),
                };
                tracing::warn!(code = ?status.code(), "tunnel exited during settle interval");
                Err(TunnelError::SpawnFailed {
                    code: status.code(),
                    stderr,
                })
            }
        }
    }

    /// Terminate the subprocess if present. No-op when nothing is running.
    pub async fn disconnect(&mut self) {
        let Some(mut handle) = self.handle.take() else {
            return;
        };
        if let Some(task) = handle.stderr_tail.take() {
            task.abort();
        }
        let pid = handle.child.id();
        // `kill` also waits, so the process is reaped before returning.
        if let Err(e) = handle.child.kill().await {
            tracing::debug!(?pid, error = %e, "tunnel kill failed");
        }
        tracing::info!(?pid, "tunnel closed");
    }

    /// Last known liveness. Never probes the process.
    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Sample the process now and drop the handle if it has exited.
    pub fn refresh_liveness(&mut self) -> bool {
        let Some(handle) = self.handle.as_mut() else {
            return false;
        };
        match handle.child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                tracing::warn!(code = ?status.code(), "tunnel process exited");
                self.handle = None;
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "tunnel liveness check failed");
                self.handle = None;
                false
            }
        }
    }

    pub fn status(&self) -> TunnelStatus {
        match &self.handle {
            Some(handle) => TunnelStatus {
                active: true,
                pid: handle.child.id(),
                spec: Some(handle.spec.clone()),
            },
            None => TunnelStatus {
                active: false,
                pid: None,
                spec: None,
            },
        }
    }
}

/// Read a stream to EOF keeping only the last `STDERR_TAIL_BYTES`.
async fn collect_tail<R: AsyncRead + Unpin>(mut reader: R) -> String {
    let mut tail = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                tail.extend_from_slice(&chunk[..n]);
                if tail.len() > STDERR_TAIL_BYTES {
                    let excess = tail.len() - STDERR_TAIL_BYTES;
                    tail.drain(..excess);
                }
            }
        }
    }
    String::from_utf8_lossy(&tail).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::ScriptLauncher;
    use tokio::process::Command;

    fn spec() -> ForwardSpec {
        ForwardSpec {
            local_port: 11434,
            remote_host: "gpu".into(),
            remote_port: 11434,
            user: "ml".into(),
            ssh_port: 22,
            key_path: None,
        }
    }

    fn manager(script: &'static str) -> TunnelManager {
        TunnelManager::new(Box::new(ScriptLauncher(script)), Duration::from_millis(200))
    }

    #[cfg(target_os = "linux")]
    fn process_running(pid: u32) -> bool {
        let Ok(stat) = std::fs::read_to_string(format!("/proc/{pid}/stat")) else {
            return false;
        };
        let state = stat
            .rsplit_once(')')
            .and_then(|(_, rest)| rest.split_whitespace().next())
            .unwrap_or("X");
        state != "Z" && state != "X"
    }

    #[tokio::test]
    async fn connect_keeps_live_process() {
        let mut tunnel = manager("exec sleep 30");
        tunnel.connect(&spec()).await.unwrap();
        assert!(tunnel.is_active());
        assert!(tunnel.refresh_liveness());
        let status = tunnel.status();
        assert!(status.active);
        assert!(status.pid.is_some());
        assert_eq!(status.spec, Some(spec()));
        tunnel.disconnect().await;
        assert!(!tunnel.is_active());
    }

    #[tokio::test]
    async fn early_exit_is_spawn_failure_with_stderr() {
        let mut tunnel = manager("echo 'bind: Address already in use' >&2; exit 3");
        let err = tunnel.connect(&spec()).await.unwrap_err();
        match err {
            TunnelError::SpawnFailed { code, stderr } => {
                assert_eq!(code, Some(3));
                assert!(stderr.contains("Address already in use"), "got: {stderr}");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!tunnel.is_active());
    }

    #[tokio::test]
    async fn missing_program_is_launch_error() {
        struct Missing;
        impl TunnelLauncher for Missing {
            fn command(&self, _spec: &ForwardSpec) -> Command {
                Command::new("/nonexistent/tunnelchat-ssh")
            }
        }
        let mut tunnel = TunnelManager::new(Box::new(Missing), Duration::from_millis(10));
        let err = tunnel.connect(&spec()).await.unwrap_err();
        assert!(matches!(err, TunnelError::Launch(_)), "got: {err}");
    }

    #[tokio::test]
    async fn disconnect_without_tunnel_is_noop() {
        let mut tunnel = manager("exec sleep 30");
        tunnel.disconnect().await;
        tunnel.disconnect().await;
        assert!(!tunnel.is_active());
        assert_eq!(tunnel.status().pid, None);
    }

    #[tokio::test]
    async fn liveness_is_sampled_only_on_refresh() {
        let mut tunnel = manager("sleep 0.4");
        tunnel.connect(&spec()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(tunnel.is_active());
        assert!(!tunnel.refresh_liveness());
        assert!(!tunnel.is_active());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn reconnect_never_leaves_two_live_processes() {
        let mut tunnel = manager("exec sleep 30");
        let mut seen = Vec::new();
        for round in 0..4 {
            tunnel.connect(&spec()).await.unwrap();
            let pid = tunnel.status().pid.unwrap();
            seen.push(pid);
            let live = seen.iter().filter(|pid| process_running(**pid)).count();
            assert_eq!(live, 1, "round {round}: pids {seen:?}");
            if round % 2 == 1 {
                tunnel.disconnect().await;
                assert!(seen.iter().all(|pid| !process_running(*pid)));
            }
        }
        tunnel.disconnect().await;
        assert!(seen.iter().all(|pid| !process_running(*pid)));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn dropping_manager_kills_process() {
        let mut tunnel = manager("exec sleep 30");
        tunnel.connect(&spec()).await.unwrap();
        let pid = tunnel.status().pid.unwrap();
        drop(tunnel);
        let mut running = true;
        for _ in 0..50 {
            if !process_running(pid) {
                running = false;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(!running, "pid {pid} survived drop");
    }
}
