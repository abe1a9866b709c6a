//! Real setup checks built on the system ssh client.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::{ConnectivityChecks, ProbeReport};
use crate::client::{InferenceApi, InferenceClient};
use crate::config::defaults::{
    PROBE_LOCAL_PORT, SETUP_LIST_TIMEOUT_SECS, SETUP_SETTLE_SECS, SSH_CHECK_CONNECT_TIMEOUT_SECS,
    SSH_CHECK_TIMEOUT_SECS,
};
use crate::config::{EndpointConfig, SessionSettings};
use crate::error::ClientError;
use crate::tunnel::{ForwardSpec, SshLauncher, TunnelGuard};

const SSH_CHECK_REMOTE_COMMAND: &str = "echo 'SSH connection successful'";

/// Runs both checks through `ssh`, using a scratch local port for the
/// temporary tunnel.
#[derive(Debug, Clone)]
pub struct SshProber {
    program: String,
    probe_local_port: u16,
    settle: Duration,
    ssh_timeout: Duration,
    list_timeout: Duration,
}

impl Default for SshProber {
    fn default() -> Self {
        Self {
            program: "ssh".to_string(),
            probe_local_port: PROBE_LOCAL_PORT,
            settle: Duration::from_secs(SETUP_SETTLE_SECS),
            ssh_timeout: Duration::from_secs(SSH_CHECK_TIMEOUT_SECS),
            list_timeout: Duration::from_secs(SETUP_LIST_TIMEOUT_SECS),
        }
    }
}

impl SshProber {
    /// Use a different ssh binary.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }
}

/// `ssh -o ConnectTimeout=10 -o BatchMode=yes -p <port> [-i key] user@host "<echo>"`.
///
/// ssh stops reading options at the destination, so every flag has to come
/// before `user@host`.
pub fn ssh_check_args(endpoint: &EndpointConfig) -> Vec<String> {
    let mut args = vec![
        "-o".to_string(),
        format!("ConnectTimeout={SSH_CHECK_CONNECT_TIMEOUT_SECS}"),
        "-o".to_string(),
        "BatchMode=yes".to_string(),
        "-p".to_string(),
        endpoint.ssh_port.to_string(),
    ];
    if let Some(key) = &endpoint.ssh_key_path {
        args.push("-i".to_string());
        args.push(key.display().to_string());
    }
    args.push(endpoint.ssh_target());
    args.push(SSH_CHECK_REMOTE_COMMAND.to_string());
    args
}

#[async_trait]
impl ConnectivityChecks for SshProber {
    async fn check_ssh(&self, endpoint: &EndpointConfig) -> ProbeReport {
        let mut cmd = Command::new(&self.program);
        cmd.kill_on_drop(true)
            .args(ssh_check_args(endpoint))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        match tokio::time::timeout(self.ssh_timeout, cmd.output()).await {
            Err(_) => ProbeReport::failure("SSH connection timed out"),
            Ok(Err(e)) => ProbeReport::failure(format!("SSH connection error: {e}")),
            Ok(Ok(output)) if output.status.success() => {
                ProbeReport::success("SSH connection successful")
            }
            Ok(Ok(output)) => ProbeReport::failure(format!(
                "SSH connection failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )),
        }
    }

    async fn check_endpoint(&self, endpoint: &EndpointConfig) -> ProbeReport {
        let spec = ForwardSpec::from_endpoint(endpoint).with_local_port(self.probe_local_port);
        let guard = match TunnelGuard::open(
            Box::new(SshLauncher::new(self.program.clone())),
            self.settle,
            &spec,
        )
        .await
        {
            Ok(guard) => guard,
            Err(e) => return ProbeReport::failure(format!("Ollama connection error: {e}")),
        };

        let client = InferenceClient::new(
            format!("http://localhost:{}", self.probe_local_port),
            &SessionSettings::default(),
        )
        .with_list_timeout(self.list_timeout);
        let listed = client.list_models().await;
        guard.close().await;

        match listed {
            Ok(models) => ProbeReport::success(format!(
                "Ollama is running. Available models: [{}]",
                models.join(", ")
            ))
            .with_models(models),
            Err(ClientError::Status { code, .. }) => {
                ProbeReport::failure(format!("Ollama API returned status {code}"))
            }
            Err(e) => ProbeReport::failure(format!("Ollama connection error: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn endpoint() -> EndpointConfig {
        EndpointConfig {
            ssh_host: "gpu.example.com".into(),
            ssh_user: "ml".into(),
            ssh_port: 2222,
            ssh_key_path: Some(PathBuf::from("/keys/gpu")),
            ..EndpointConfig::default()
        }
    }

    #[test]
    fn ssh_check_args_put_every_option_first() {
        assert_eq!(
            ssh_check_args(&endpoint()),
            vec![
                "-o",
                "ConnectTimeout=10",
                "-o",
                "BatchMode=yes",
                "-p",
                "2222",
                "-i",
                "/keys/gpu",
                "ml@gpu.example.com",
                "echo 'SSH connection successful'",
            ]
        );
    }

    #[test]
    fn identity_file_comes_before_destination() {
        let args = ssh_check_args(&endpoint());
        let key = args.iter().position(|a| a == "-i").unwrap();
        let target = args.iter().position(|a| a == "ml@gpu.example.com").unwrap();
        assert!(key < target, "{args:?}");
        assert_eq!(args.last().map(String::as_str), Some(SSH_CHECK_REMOTE_COMMAND));

        let no_key = EndpointConfig {
            ssh_key_path: None,
            ..endpoint()
        };
        let args = ssh_check_args(&no_key);
        assert!(!args.iter().any(|a| a == "-i"));
        assert_eq!(args[args.len() - 2], "ml@gpu.example.com");
    }

    // Real ssh parsing: `-G` prints the resolved config without connecting.
    #[tokio::test]
    async fn installed_ssh_picks_up_identity_file() {
        let mut args = ssh_check_args(&endpoint());
        args.insert(0, "-G".to_string());
        let Ok(output) = Command::new("ssh").args(&args).output().await else {
            return;
        };
        if !output.status.success() {
            return;
        }
        let resolved = String::from_utf8_lossy(&output.stdout);
        assert!(
            resolved.lines().any(|line| line == "identityfile /keys/gpu"),
            "{resolved}"
        );
    }

    #[tokio::test]
    async fn failing_ssh_reports_failure() {
        let prober = SshProber::default().with_program("false");
        let report = prober.check_ssh(&endpoint()).await;
        assert!(!report.ok);
        assert!(report.message.starts_with("SSH connection failed"));
    }

    #[tokio::test]
    async fn missing_ssh_binary_reports_error() {
        let prober = SshProber::default().with_program("/nonexistent/tunnelchat-ssh");
        let report = prober.check_ssh(&endpoint()).await;
        assert!(!report.ok);
        assert!(report.message.starts_with("SSH connection error"), "{}", report.message);
    }

    #[tokio::test]
    async fn succeeding_ssh_reports_success() {
        let prober = SshProber::default().with_program("true");
        let report = prober.check_ssh(&endpoint()).await;
        assert_eq!(report, ProbeReport::success("SSH connection successful"));
    }

    #[tokio::test]
    async fn tunnel_that_exits_fails_endpoint_check() {
        let prober = SshProber::default()
            .with_program("false")
            .with_settle(Duration::from_millis(200));
        let report = prober.check_endpoint(&endpoint()).await;
        assert!(!report.ok);
        assert!(
            report.message.starts_with("Ollama connection error: tunnel process exited"),
            "{}",
            report.message
        );
    }
}
