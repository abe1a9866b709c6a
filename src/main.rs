//! CLI entry point for tunnelchat.

mod app;
mod cli;

use clap::Parser;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;
use tunnelchat::config::defaults::DEFAULT_MODEL_ID;
use tunnelchat::config::load_config;
use tunnelchat::tui::Renderer;

const LOG_ENV: &str = "TUNNELCHAT_LOG";

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    init_tracing();

    let renderer = Renderer::new(!args.no_color && std::io::stderr().is_terminal());
    Renderer::set_progress_enabled(std::io::stderr().is_terminal());

    if let Some(cli::Command::Setup) = args.command {
        // The target file may not exist yet; only the model id is read from it.
        let model = args
            .model
            .clone()
            .or_else(|| {
                load_config(args.config.as_deref())
                    .ok()
                    .map(|config| config.endpoint.model)
            })
            .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());
        let written =
            app::setup_flow::run_setup_flow(&renderer, args.config.as_deref(), &model).await;
        if !written {
            std::process::exit(1);
        }
        return;
    }

    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(model) = &args.model {
        config.endpoint.model = model.clone();
    }
    if let Err(e) = config.endpoint.validate() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    app::chat_loop::run_chat_loop(&renderer, &config, args.connect).await;
}

/// `TUNNELCHAT_LOG` wins over `RUST_LOG`; logs go to stderr.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
