//! Chat session state machine driving the tunnel and inference client.
//!
//! A [`SessionController`] owns everything one chat session needs: the
//! endpoint settings, the tunnel, the API handle, and the transcript.
//! Handlers borrow it; there is no global session state.

use crate::client::{chat, InferenceApi, InferenceClient};
use crate::config::{Config, EndpointConfig};
use crate::error::{ClientError, SubmitError, TunnelError};
use crate::transcript::Transcript;
use crate::tunnel::{ForwardSpec, SshLauncher, TunnelManager, TunnelStatus};

/// Logical session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    ConnectedIdle,
    /// A chat call is in flight.
    AwaitingResponse,
}

/// Result of one accepted user turn.
#[derive(Debug)]
pub struct TurnOutcome {
    /// Text appended to the transcript as the assistant message.
    pub reply: String,
    /// The primary call failed and the generate fallback was used.
    pub used_fallback: bool,
    /// Set when the fallback failed too and `reply` is an error line.
    pub error: Option<ClientError>,
}

/// Whether the configured model is installed on the remote service.
#[derive(Debug)]
pub enum ModelStatus {
    Disconnected,
    Ready { models: Vec<String> },
    Missing { model: String, available: Vec<String> },
    Unreachable(ClientError),
}

/// Snapshot for status output.
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub state: SessionState,
    pub tunnel: TunnelStatus,
    pub target: String,
    pub local_port: u16,
    pub remote_port: u16,
    pub model: String,
    pub turns: usize,
}

pub struct SessionController {
    endpoint: EndpointConfig,
    tunnel: TunnelManager,
    api: Box<dyn InferenceApi>,
    transcript: Transcript,
    state: SessionState,
}

impl SessionController {
    /// Production wiring: ssh tunnel plus an HTTP client on the local port.
    pub fn new(config: &Config) -> Self {
        let tunnel = TunnelManager::new(Box::new(SshLauncher::default()), config.session.settle);
        let api = Box::new(InferenceClient::for_endpoint(
            &config.endpoint,
            &config.session,
        ));
        Self::with_parts(
            config.endpoint.clone(),
            tunnel,
            api,
            Transcript::new(config.session.system_prompt.clone()),
        )
    }

    /// Assemble a controller from explicit parts.
    ///
    /// Used for deterministic testing and alternative launchers.
    pub fn with_parts(
        endpoint: EndpointConfig,
        tunnel: TunnelManager,
        api: Box<dyn InferenceApi>,
        transcript: Transcript,
    ) -> Self {
        Self {
            endpoint,
            tunnel,
            api,
            transcript,
            state: SessionState::Disconnected,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Open (or reopen) the tunnel. On failure the session is disconnected.
    pub async fn connect(&mut self) -> Result<(), TunnelError> {
        let spec = ForwardSpec::from_endpoint(&self.endpoint);
        match self.tunnel.connect(&spec).await {
            Ok(()) => {
                self.state = SessionState::ConnectedIdle;
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Disconnected;
                Err(e)
            }
        }
    }

    pub async fn disconnect(&mut self) {
        self.tunnel.disconnect().await;
        self.state = SessionState::Disconnected;
    }

    /// Send one user turn.
    ///
    /// Rejected input leaves the transcript untouched and never reaches the
    /// API. Accepted input always produces an assistant message, even when
    /// both request paths fail.
    pub async fn submit(&mut self, input: &str) -> Result<TurnOutcome, SubmitError> {
        if input.trim().is_empty() {
            return Err(SubmitError::EmptyInput);
        }
        if !self.tunnel.refresh_liveness() {
            self.state = SessionState::Disconnected;
            return Err(SubmitError::NotConnected);
        }

        self.transcript.push_user(input);
        self.state = SessionState::AwaitingResponse;
        let reply = chat(
            self.api.as_ref(),
            self.transcript.messages(),
            &self.endpoint.model,
        )
        .await;
        let used_fallback = reply.used_fallback();
        self.transcript.push_assistant(reply.text.clone());
        self.state = SessionState::ConnectedIdle;

        Ok(TurnOutcome {
            reply: reply.text,
            used_fallback,
            error: reply.error,
        })
    }

    /// Collapse the transcript to its seed. Tunnel state is unaffected.
    pub fn reset(&mut self) {
        self.transcript.reset();
    }

    /// Check the configured model against the remote model list.
    pub async fn model_status(&self) -> ModelStatus {
        if !self.tunnel.is_active() {
            return ModelStatus::Disconnected;
        }
        match self.api.ensure_model(&self.endpoint.model).await {
            Ok(models) => ModelStatus::Ready { models },
            Err(ClientError::ModelNotFound { model, available }) => {
                ModelStatus::Missing { model, available }
            }
            Err(e) => ModelStatus::Unreachable(e),
        }
    }

    /// Probe the endpoint through the tunnel.
    pub async fn probe(&self) -> bool {
        self.tunnel.is_active() && self.api.probe_endpoint().await
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: self.state,
            tunnel: self.tunnel.status(),
            target: format!("{}:{}", self.endpoint.ssh_target(), self.endpoint.ssh_port),
            local_port: self.endpoint.local_port,
            remote_port: self.endpoint.ollama_port,
            model: self.endpoint.model.clone(),
            turns: self.transcript.visible().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::ScriptLauncher;
    use crate::types::Message;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex as StdMutex};
    use std::time::Duration;

    /// Scripted API that records every call.
    #[derive(Default)]
    struct ScriptedApi {
        chat_results: StdMutex<VecDeque<Result<String, ClientError>>>,
        generate_results: StdMutex<VecDeque<Result<String, ClientError>>>,
        models: Vec<String>,
        calls: StdMutex<Vec<String>>,
        prompts: StdMutex<Vec<String>>,
    }

    impl ScriptedApi {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }

        fn record(&self, call: &str) {
            self.calls.lock().expect("calls lock").push(call.to_string());
        }
    }

    #[async_trait]
    impl InferenceApi for Arc<ScriptedApi> {
        async fn probe_endpoint(&self) -> bool {
            self.record("probe");
            true
        }

        async fn list_models(&self) -> Result<Vec<String>, ClientError> {
            self.record("list");
            Ok(self.models.clone())
        }

        async fn chat_completion(
            &self,
            _messages: &[Message],
            _model: &str,
        ) -> Result<String, ClientError> {
            self.record("chat");
            self.chat_results
                .lock()
                .expect("chat lock")
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::InvalidResponse("no chat queued".into())))
        }

        async fn generate(&self, prompt: &str, _model: &str) -> Result<String, ClientError> {
            self.record("generate");
            self.prompts
                .lock()
                .expect("prompts lock")
                .push(prompt.to_string());
            self.generate_results
                .lock()
                .expect("generate lock")
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::InvalidResponse("no generate queued".into())))
        }
    }

    fn endpoint() -> EndpointConfig {
        EndpointConfig {
            ssh_host: "gpu".into(),
            ssh_user: "ml".into(),
            model: "llama3:8b".into(),
            ..EndpointConfig::default()
        }
    }

    fn controller(script: &'static str, api: &Arc<ScriptedApi>) -> SessionController {
        SessionController::with_parts(
            endpoint(),
            TunnelManager::new(Box::new(ScriptLauncher(script)), Duration::from_millis(100)),
            Box::new(api.clone()),
            Transcript::new("S"),
        )
    }

    #[tokio::test]
    async fn connect_moves_to_connected_idle() {
        let api = Arc::new(ScriptedApi::default());
        let mut session = controller("exec sleep 30", &api);
        assert_eq!(session.state(), SessionState::Disconnected);
        session.connect().await.unwrap();
        assert_eq!(session.state(), SessionState::ConnectedIdle);
        assert!(session.status().tunnel.active);
        session.disconnect().await;
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn failed_connect_stays_disconnected() {
        let api = Arc::new(ScriptedApi::default());
        let mut session = controller("exit 255", &api);
        let err = session.connect().await.unwrap_err();
        assert!(matches!(err, TunnelError::SpawnFailed { code: Some(255), .. }));
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn submit_while_disconnected_is_rejected_without_side_effects() {
        let api = Arc::new(ScriptedApi::default());
        let mut session = controller("exec sleep 30", &api);
        let before = session.transcript().clone();
        let err = session.submit("hi").await.unwrap_err();
        assert_eq!(err, SubmitError::NotConnected);
        assert_eq!(session.transcript(), &before);
        assert!(api.calls().is_empty());
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn submit_after_tunnel_death_is_rejected() {
        let api = Arc::new(ScriptedApi::default());
        let mut session = controller("sleep 0.3", &api);
        session.connect().await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        let err = session.submit("hi").await.unwrap_err();
        assert_eq!(err, SubmitError::NotConnected);
        assert_eq!(session.transcript().len(), 1);
        assert!(api.calls().is_empty());
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let api = Arc::new(ScriptedApi::default());
        let mut session = controller("exec sleep 30", &api);
        session.connect().await.unwrap();
        assert_eq!(session.submit("   ").await.unwrap_err(), SubmitError::EmptyInput);
        assert_eq!(session.transcript().len(), 1);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn primary_reply_is_appended() {
        let api = Arc::new(ScriptedApi::default());
        api.chat_results
            .lock()
            .unwrap()
            .push_back(Ok("hello there".into()));
        let mut session = controller("exec sleep 30", &api);
        session.connect().await.unwrap();

        let outcome = session.submit("hi").await.unwrap();
        assert_eq!(outcome.reply, "hello there");
        assert!(!outcome.used_fallback);
        assert!(outcome.error.is_none());
        assert_eq!(api.calls(), vec!["chat"]);
        assert_eq!(
            session.transcript().messages(),
            &[
                Message::system("S"),
                Message::user("hi"),
                Message::assistant("hello there")
            ]
        );
        assert_eq!(session.state(), SessionState::ConnectedIdle);
    }

    #[tokio::test]
    async fn primary_failure_uses_flattened_fallback() {
        let api = Arc::new(ScriptedApi::default());
        api.chat_results
            .lock()
            .unwrap()
            .push_back(Err(ClientError::Status {
                code: 404,
                body: "not found".into(),
            }));
        api.generate_results
            .lock()
            .unwrap()
            .push_back(Ok("fallback says hi".into()));
        let mut session = controller("exec sleep 30", &api);
        session.connect().await.unwrap();

        let outcome = session.submit("hi").await.unwrap();
        assert!(outcome.used_fallback);
        assert_eq!(api.calls(), vec!["chat", "generate"]);
        assert_eq!(
            api.prompts.lock().unwrap().as_slice(),
            ["System: S\n\nUser: hi\n\nAssistant: "]
        );
        assert_eq!(session.transcript().len(), 3);
        assert_eq!(
            session.transcript().last(),
            Some(&Message::assistant("fallback says hi"))
        );
    }

    #[tokio::test]
    async fn double_failure_appends_error_line_and_reports_it() {
        let api = Arc::new(ScriptedApi::default());
        api.generate_results
            .lock()
            .unwrap()
            .push_back(Err(ClientError::Status {
                code: 500,
                body: "oom".into(),
            }));
        let mut session = controller("exec sleep 30", &api);
        session.connect().await.unwrap();

        let outcome = session.submit("hi").await.unwrap();
        assert_eq!(outcome.reply, "Error: 500 - oom");
        assert_eq!(outcome.error.and_then(|e| e.status_code()), Some(500));
        assert_eq!(
            session.transcript().last(),
            Some(&Message::assistant("Error: 500 - oom"))
        );
        assert_eq!(session.state(), SessionState::ConnectedIdle);
    }

    #[tokio::test]
    async fn reset_returns_to_seed_and_keeps_tunnel() {
        let api = Arc::new(ScriptedApi::default());
        for _ in 0..3 {
            api.chat_results.lock().unwrap().push_back(Ok("ok".into()));
        }
        let mut session = controller("exec sleep 30", &api);
        session.reset();
        assert_eq!(session.transcript().len(), 1);

        session.connect().await.unwrap();
        for turn in ["a", "b", "c"] {
            session.submit(turn).await.unwrap();
        }
        assert_eq!(session.transcript().len(), 7);
        session.reset();
        assert_eq!(session.transcript().messages(), &[Message::system("S")]);
        assert_eq!(session.state(), SessionState::ConnectedIdle);
        assert!(session.status().tunnel.active);
    }

    #[tokio::test]
    async fn model_status_reports_missing_model() {
        let api = Arc::new(ScriptedApi {
            models: vec!["qwen2:7b".into()],
            ..ScriptedApi::default()
        });
        let mut session = controller("exec sleep 30", &api);
        assert!(matches!(
            session.model_status().await,
            ModelStatus::Disconnected
        ));
        session.connect().await.unwrap();
        match session.model_status().await {
            ModelStatus::Missing { model, available } => {
                assert_eq!(model, "llama3:8b");
                assert_eq!(available, vec!["qwen2:7b".to_string()]);
            }
            other => panic!("unexpected status: {other:?}"),
        }
    }
}
