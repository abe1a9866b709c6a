//! One-time connectivity checks run by `tunnelchat setup`.
//!
//! The flow is strictly ordered: ssh login first, then a temporary tunnel
//! and model listing, then the config write. The first failed check stops
//! the flow and nothing is persisted.

mod answers;
mod checks;

pub use answers::SetupAnswers;
pub use checks::{ssh_check_args, SshProber};

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::client::model_matches;
use crate::config::{persist_endpoint_config, EndpointConfig};
use crate::error::SetupError;
use crate::ui::render::RenderSink;

/// Result of one connectivity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub ok: bool,
    pub message: String,
    /// Models reported by the endpoint check; empty otherwise.
    pub models: Vec<String>,
}

impl ProbeReport {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            models: Vec::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            models: Vec::new(),
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }
}

/// The two setup checks. [`SshProber`] is the real implementation.
#[async_trait]
pub trait ConnectivityChecks: Send + Sync {
    /// Run a trivial remote command with non-interactive auth.
    async fn check_ssh(&self, endpoint: &EndpointConfig) -> ProbeReport;
    /// Bring up a temporary tunnel, list models, tear the tunnel down.
    async fn check_endpoint(&self, endpoint: &EndpointConfig) -> ProbeReport;
}

pub const SSH_FAILURE_GUIDANCE: [&str; 4] = [
    "Server hostname/IP is correct",
    "SSH credentials are correct",
    "SSH key is set up (or use password authentication)",
    "Firewall allows SSH connections",
];

pub const ENDPOINT_FAILURE_GUIDANCE: [&str; 3] = [
    "Ollama is installed and running on the gpu host",
    "Ollama port is correct",
    "Firewall allows connections to Ollama port",
];

/// What a successful setup produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOutcome {
    pub path: PathBuf,
    pub endpoint: EndpointConfig,
    pub models: Vec<String>,
}

impl SetupOutcome {
    /// Whether the configured model showed up in the endpoint's model list.
    pub fn model_installed(&self) -> bool {
        self.models
            .iter()
            .any(|name| model_matches(name, &self.endpoint.model))
    }

    /// Follow-up instructions printed after the config is written.
    pub fn next_steps(&self) -> Vec<String> {
        let mut steps = Vec::new();
        if !self.model_installed() {
            steps.push("Make sure your model is available on the gpu host".to_string());
            steps.push(format!("Run: ollama pull {}", self.endpoint.model));
        }
        steps.push("Start `tunnelchat` and type /connect".to_string());
        steps
    }
}

/// Validate connectivity for `answers` and persist the endpoint config.
///
/// `path_override` selects where the config is written; `None` uses the
/// global default path.
pub async fn run_setup(
    checks: &dyn ConnectivityChecks,
    answers: &SetupAnswers,
    model: &str,
    path_override: Option<&Path>,
    sink: &dyn RenderSink,
) -> Result<SetupOutcome, SetupError> {
    let endpoint = answers.to_endpoint(model);

    sink.section(&format!(
        "testing connection to {}:{}",
        endpoint.ssh_target(),
        endpoint.ssh_port
    ));
    let ssh = {
        let _progress = sink.progress("checking ssh login");
        checks.check_ssh(&endpoint).await
    };
    tracing::info!(ok = ssh.ok, "ssh check finished");
    if !ssh.ok {
        sink.error(&ssh.message);
        render_guidance(sink, &SSH_FAILURE_GUIDANCE);
        return Err(SetupError::SshFailed(ssh.message));
    }
    sink.field("ssh", &ssh.message);

    sink.section("testing Ollama connection");
    let service = {
        let _progress = sink.progress("checking Ollama through a temporary tunnel");
        checks.check_endpoint(&endpoint).await
    };
    tracing::info!(ok = service.ok, models = service.models.len(), "endpoint check finished");
    if !service.ok {
        sink.error(&service.message);
        render_guidance(sink, &ENDPOINT_FAILURE_GUIDANCE);
        return Err(SetupError::EndpointFailed(service.message));
    }
    sink.field("ollama", &service.message);

    let path = persist_endpoint_config(path_override, &endpoint)?;
    Ok(SetupOutcome {
        path,
        endpoint,
        models: service.models,
    })
}

fn render_guidance(sink: &dyn RenderSink, items: &[&str]) {
    sink.detail("Please check:");
    for (idx, item) in items.iter().enumerate() {
        sink.detail(&format!("{}. {item}", idx + 1));
    }
}
