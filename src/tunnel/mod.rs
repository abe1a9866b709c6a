//! SSH local port-forward lifecycle.
//!
//! A [`TunnelManager`] owns at most one forwarding subprocess at a time.
//! [`TunnelLauncher`] builds the command for a [`ForwardSpec`]; production
//! code uses [`SshLauncher`], tests substitute a shell script.

mod guard;
mod manager;

pub use guard::TunnelGuard;
pub use manager::{TunnelManager, TunnelStatus};

use std::path::PathBuf;
use tokio::process::Command;

use crate::config::EndpointConfig;

/// Everything needed to bring up one `-L` forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardSpec {
    pub local_port: u16,
    pub remote_host: String,
    pub remote_port: u16,
    pub user: String,
    pub ssh_port: u16,
    pub key_path: Option<PathBuf>,
}

impl ForwardSpec {
    pub fn from_endpoint(endpoint: &EndpointConfig) -> Self {
        Self {
            local_port: endpoint.local_port,
            remote_host: endpoint.ssh_host.clone(),
            remote_port: endpoint.ollama_port,
            user: endpoint.ssh_user.clone(),
            ssh_port: endpoint.ssh_port,
            key_path: endpoint.ssh_key_path.clone(),
        }
    }

    /// Same forward bound to a different local port.
    pub fn with_local_port(mut self, local_port: u16) -> Self {
        self.local_port = local_port;
        self
    }

    pub fn target(&self) -> String {
        format!("{}@{}", self.user, self.remote_host)
    }
}

/// Builds the forwarding subprocess for a spec.
///
/// The manager owns stdio wiring and `kill_on_drop`; implementations only
/// choose the program and its arguments.
pub trait TunnelLauncher: Send + Sync {
    fn command(&self, spec: &ForwardSpec) -> Command;
}

/// Launches the system `ssh` client.
#[derive(Debug, Clone)]
pub struct SshLauncher {
    program: String,
}

impl Default for SshLauncher {
    fn default() -> Self {
        Self {
            program: "ssh".to_string(),
        }
    }
}

impl SshLauncher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl TunnelLauncher for SshLauncher {
    fn command(&self, spec: &ForwardSpec) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(ssh_args(spec));
        cmd
    }
}

/// Argument vector for `ssh -L local:localhost:remote -N -T user@host -p port [-i key]`.
pub fn ssh_args(spec: &ForwardSpec) -> Vec<String> {
    let mut args = vec![
        "-L".to_string(),
        format!("{}:localhost:{}", spec.local_port, spec.remote_port),
        "-N".to_string(),
        "-T".to_string(),
        spec.target(),
        "-p".to_string(),
        spec.ssh_port.to_string(),
    ];
    if let Some(key) = &spec.key_path {
        args.push("-i".to_string());
        args.push(key.display().to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ForwardSpec {
        ForwardSpec {
            local_port: 11434,
            remote_host: "gpu.example.com".into(),
            remote_port: 11500,
            user: "ml".into(),
            ssh_port: 2222,
            key_path: None,
        }
    }

    #[test]
    fn ssh_args_without_key() {
        assert_eq!(
            ssh_args(&spec()),
            vec![
                "-L",
                "11434:localhost:11500",
                "-N",
                "-T",
                "ml@gpu.example.com",
                "-p",
                "2222"
            ]
        );
    }

    #[test]
    fn ssh_args_append_identity_file() {
        let spec = ForwardSpec {
            key_path: Some(PathBuf::from("/home/ml/.ssh/id_ed25519")),
            ..spec()
        };
        let args = ssh_args(&spec);
        assert_eq!(&args[args.len() - 2..], ["-i", "/home/ml/.ssh/id_ed25519"]);
    }

    #[test]
    fn spec_from_endpoint_maps_ports() {
        let endpoint = EndpointConfig {
            ssh_host: "gpu".into(),
            ssh_user: "ml".into(),
            ssh_port: 22,
            ssh_key_path: None,
            ollama_port: 11434,
            local_port: 12000,
            model: "llama3:8b".into(),
        };
        let spec = ForwardSpec::from_endpoint(&endpoint);
        assert_eq!(spec.local_port, 12000);
        assert_eq!(spec.remote_port, 11434);
        assert_eq!(spec.target(), "ml@gpu");
        assert_eq!(spec.with_local_port(11435).local_port, 11435);
    }
}
