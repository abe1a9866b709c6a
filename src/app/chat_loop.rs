//! Interactive chat loop: line input, slash commands, and turn rendering.

use crate::app::commands::{connect, dispatch_slash_action, LoopControl};
use crate::app::shutdown::{note_stop, ShutdownSignals, StopSignal};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tunnelchat::build_info;
use tunnelchat::config::Config;
use tunnelchat::error::SubmitError;
use tunnelchat::session::{SessionController, SessionState, TurnOutcome};
use tunnelchat::tui::{parse_slash_command, Renderer};
use tunnelchat::ui::render::RenderSink;

const FALLBACK_NOTICE: &str = "primary chat call failed, using direct API call";

/// Why the chat loop stopped reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopExit {
    Quit,
    EndOfInput,
    InputError,
    Signal(StopSignal),
}

/// Run the chat session until `/quit`, end of input, or a stop signal
/// (Ctrl-C, SIGTERM, SIGHUP).
///
/// The tunnel is closed on every one of those exits.
pub(crate) async fn run_chat_loop(renderer: &Renderer, config: &Config, connect_now: bool) {
    let mut signals = match ShutdownSignals::install() {
        Ok(signals) => signals,
        Err(e) => {
            renderer.error(&format!("failed to install signal handlers: {e}"));
            return;
        }
    };

    let mut session = SessionController::new(config);
    renderer.header(&config.endpoint.model);
    renderer.detail(&build_info::startup_metadata_line());
    renderer.detail("Type /connect to open the tunnel, /help for commands.");
    eprintln!();

    let stopped_early = if connect_now {
        tokio::select! {
            () = connect(renderer, &mut session) => None,
            signal = signals.recv() => Some(note_stop(signal, "connect")),
        }
    } else {
        None
    };
    let exit = match stopped_early {
        Some(signal) => LoopExit::Signal(signal),
        None => {
            let prompt = |connected: bool| renderer.prompt(connected);
            let input = BufReader::new(tokio::io::stdin());
            drive_session(renderer, &prompt, &mut session, input, &mut signals).await
        }
    };
    tracing::debug!(?exit, "chat loop finished");

    session.disconnect().await;
}

/// Read lines from `input` and act on them until the loop should stop.
///
/// Never closes the tunnel itself; the caller does that for every exit.
pub(crate) async fn drive_session<R>(
    renderer: &dyn RenderSink,
    prompt: &dyn Fn(bool),
    session: &mut SessionController,
    input: R,
    signals: &mut ShutdownSignals,
) -> LoopExit
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        prompt(session.state() != SessionState::Disconnected);
        let line = tokio::select! {
            line = lines.next_line() => line,
            signal = signals.recv() => {
                return LoopExit::Signal(note_stop(signal, "waiting for input"));
            }
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => return LoopExit::EndOfInput,
            Err(e) => {
                renderer.error(&format!("failed to read input: {e}"));
                return LoopExit::InputError;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if let Some(action) = parse_slash_command(input) {
            let control = tokio::select! {
                control = dispatch_slash_action(renderer, session, &action) => control,
                signal = signals.recv() => {
                    return LoopExit::Signal(note_stop(signal, "running a command"));
                }
            };
            if control == LoopControl::Quit {
                return LoopExit::Quit;
            }
            continue;
        }
        tokio::select! {
            () = send_turn(renderer, session, input) => {}
            signal = signals.recv() => {
                return LoopExit::Signal(note_stop(signal, "waiting for a reply"));
            }
        }
    }
}

async fn send_turn(renderer: &dyn RenderSink, session: &mut SessionController, input: &str) {
    let result = {
        let _progress = renderer.progress("waiting for the model");
        session.submit(input).await
    };
    match result {
        Ok(outcome) => render_turn(renderer, &outcome),
        Err(SubmitError::NotConnected) => {
            renderer.warn("Not connected. Type /connect to open the tunnel.");
        }
        Err(SubmitError::EmptyInput) => {}
    }
}

fn render_turn(renderer: &dyn RenderSink, outcome: &TurnOutcome) {
    if outcome.used_fallback {
        renderer.warn(FALLBACK_NOTICE);
    }
    match &outcome.error {
        Some(e) => {
            tracing::warn!(error = %e, "both chat paths failed");
            renderer.error(&outcome.reply);
        }
        None => renderer.assistant_message(&outcome.reply),
    }
}
