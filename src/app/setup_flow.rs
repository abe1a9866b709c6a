//! `tunnelchat setup`: prompt for the gpu host, validate, and write config.

use crate::app::shutdown::{note_stop, ShutdownSignals, StopSignal};
use std::path::Path;
use tunnelchat::error::SetupError;
use tunnelchat::probe::{run_setup, ConnectivityChecks, SetupAnswers, SetupOutcome, SshProber};
use tunnelchat::ui::render::RenderSink;

/// Run the setup flow. Returns whether the config was written.
pub(crate) async fn run_setup_flow(
    renderer: &dyn RenderSink,
    config_path: Option<&str>,
    model: &str,
) -> bool {
    renderer.section("tunnelchat setup");
    renderer.detail("Answer a few questions about the gpu host. Empty answers take the default.");
    eprintln!();

    let answers = match tokio::task::spawn_blocking(|| {
        let stdin = std::io::stdin();
        let mut reader = stdin.lock();
        let mut writer = std::io::stderr();
        SetupAnswers::prompt(&mut reader, &mut writer)
    })
    .await
    {
        Ok(Ok(answers)) => answers,
        Ok(Err(e)) => {
            renderer.error(&format!("setup cancelled: {e}"));
            return false;
        }
        Err(e) => {
            renderer.error(&format!("setup prompt failed: {e}"));
            return false;
        }
    };
    eprintln!();

    // Installed after the prompt so Ctrl-C still ends a blocked read.
    let mut signals = match ShutdownSignals::install() {
        Ok(signals) => signals,
        Err(e) => {
            renderer.error(&format!("failed to install signal handlers: {e}"));
            return false;
        }
    };

    let prober = SshProber::default();
    let result = setup_until_stopped(
        &prober,
        &answers,
        model,
        config_path.map(Path::new),
        renderer,
        &mut signals,
    )
    .await;
    match result {
        Ok(Ok(outcome)) => {
            renderer.section("configuration saved");
            renderer.field("path", &outcome.path.display().to_string());
            renderer.detail("Next steps:");
            for (idx, step) in outcome.next_steps().iter().enumerate() {
                renderer.detail(&format!("{}. {step}", idx + 1));
            }
            true
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "setup failed");
            false
        }
        Err(signal) => {
            renderer.warn(&format!("setup interrupted by {}", signal.name()));
            false
        }
    }
}

/// Run the setup checks unless a stop signal arrives first.
///
/// Abandoning the checks drops any temporary tunnel they hold, which kills
/// its ssh process.
pub(crate) async fn setup_until_stopped(
    checks: &dyn ConnectivityChecks,
    answers: &SetupAnswers,
    model: &str,
    path_override: Option<&Path>,
    renderer: &dyn RenderSink,
    signals: &mut ShutdownSignals,
) -> Result<Result<SetupOutcome, SetupError>, StopSignal> {
    tokio::select! {
        result = run_setup(checks, answers, model, path_override, renderer) => Ok(result),
        signal = signals.recv() => Err(note_stop(signal, "setup checks")),
    }
}
