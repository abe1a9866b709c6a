//! Slash-command handlers for the chat loop.

use tunnelchat::session::{ModelStatus, SessionController, SessionState};
use tunnelchat::tui::{SlashCommandAction, SLASH_COMMANDS};
use tunnelchat::types::Role;
use tunnelchat::ui::render::RenderSink;

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Quit,
}

pub(crate) async fn dispatch_slash_action(
    renderer: &dyn RenderSink,
    session: &mut SessionController,
    action: &SlashCommandAction,
) -> LoopControl {
    match action {
        SlashCommandAction::Connect => connect(renderer, session).await,
        SlashCommandAction::Disconnect => {
            if session.state() == SessionState::Disconnected {
                renderer.warn("Not connected.");
            } else {
                session.disconnect().await;
                renderer.section("tunnel closed");
            }
        }
        SlashCommandAction::Status => render_status(renderer, session).await,
        SlashCommandAction::Models => render_models(renderer, session).await,
        SlashCommandAction::Clear => {
            session.reset();
            renderer.section("conversation cleared");
        }
        SlashCommandAction::History => render_history(renderer, session),
        SlashCommandAction::Help => {
            renderer.section("commands");
            for command in SLASH_COMMANDS {
                renderer.field(command.name, command.description);
            }
        }
        SlashCommandAction::Quit => return LoopControl::Quit,
        SlashCommandAction::Unknown(name) => {
            renderer.warn(&format!("Unknown command: {name}. Type /help for commands."));
        }
    }
    LoopControl::Continue
}

/// Open the tunnel and report whether the configured model is installed.
pub(crate) async fn connect(renderer: &dyn RenderSink, session: &mut SessionController) {
    let target = format!(
        "{}:{}",
        session.endpoint().ssh_target(),
        session.endpoint().ssh_port
    );
    let result = {
        let _progress = renderer.progress(&format!("opening ssh tunnel to {target}"));
        session.connect().await
    };
    if let Err(e) = result {
        renderer.error(&format!("Failed to connect: {e}"));
        return;
    }

    let endpoint = session.endpoint();
    renderer.section(&format!("connected to {target}"));
    renderer.field(
        "forward",
        &format!(
            "localhost:{} -> localhost:{}",
            endpoint.local_port, endpoint.ollama_port
        ),
    );
    match session.model_status().await {
        ModelStatus::Ready { .. } => renderer.field("model", &session.endpoint().model),
        ModelStatus::Missing { model, available } => {
            renderer.warn(&format!("Model {model} is not installed on the gpu host."));
            renderer.detail(&format!("available: {}", available_list(&available)));
            renderer.detail(&format!("Run: ollama pull {model}"));
        }
        ModelStatus::Unreachable(e) => {
            renderer.warn(&format!("Tunnel is up but Ollama did not answer: {e}"));
        }
        ModelStatus::Disconnected => {}
    }
}

async fn render_status(renderer: &dyn RenderSink, session: &SessionController) {
    let status = session.status();
    renderer.section("status");
    renderer.field("state", state_label(status.state));
    let tunnel = match (status.tunnel.active, status.tunnel.pid) {
        (true, Some(pid)) => format!("active (pid {pid})"),
        (true, None) => "active".to_string(),
        (false, _) => "inactive".to_string(),
    };
    renderer.field("tunnel", &tunnel);
    renderer.field("target", &status.target);
    renderer.field(
        "forward",
        &format!(
            "localhost:{} -> localhost:{}",
            status.local_port, status.remote_port
        ),
    );
    renderer.field("model", &status.model);
    renderer.field("turns", &status.turns.to_string());
    if status.tunnel.active {
        let reachable = session.probe().await;
        renderer.field(
            "endpoint",
            if reachable { "reachable" } else { "unreachable" },
        );
    }
}

async fn render_models(renderer: &dyn RenderSink, session: &SessionController) {
    match session.model_status().await {
        ModelStatus::Disconnected => {
            renderer.warn("Not connected. Type /connect to open the tunnel.");
        }
        ModelStatus::Ready { models } => {
            renderer.section("models");
            render_model_list(renderer, &models, &session.endpoint().model);
        }
        ModelStatus::Missing { model, available } => {
            renderer.section("models");
            render_model_list(renderer, &available, &model);
            renderer.warn(&format!("Model {model} is not installed. Run: ollama pull {model}"));
        }
        ModelStatus::Unreachable(e) => {
            renderer.error(&format!("Failed to list models: {e}"));
        }
    }
}

fn render_model_list(renderer: &dyn RenderSink, models: &[String], active: &str) {
    if models.is_empty() {
        renderer.detail("(none)");
    }
    for name in models {
        if name == active {
            renderer.detail(&format!("{name} (active)"));
        } else {
            renderer.detail(name);
        }
    }
}

fn render_history(renderer: &dyn RenderSink, session: &SessionController) {
    let mut any = false;
    for message in session.transcript().visible() {
        any = true;
        match message.role {
            Role::Assistant => renderer.assistant_message(&message.content),
            _ => renderer.activity(&format!("{}: {}", message.role.label(), message.content)),
        }
    }
    if !any {
        renderer.detail("No messages yet.");
    }
}

fn available_list(models: &[String]) -> String {
    if models.is_empty() {
        "(none)".to_string()
    } else {
        models.join(", ")
    }
}

fn state_label(state: SessionState) -> &'static str {
    match state {
        SessionState::Disconnected => "disconnected",
        SessionState::ConnectedIdle => "connected",
        SessionState::AwaitingResponse => "awaiting response",
    }
}
