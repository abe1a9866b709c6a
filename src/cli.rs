//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};

/// Chat with an Ollama model on a remote gpu host through an ssh tunnel.
#[derive(Debug, Parser)]
#[command(name = "tunnelchat", version = tunnelchat::build_info::CLI_VERSION_TEXT)]
pub struct Args {
    /// Path to config file (default: ./tunnelchat.toml or ~/.config/tunnelchat/tunnelchat.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Override the model id.
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,

    /// Open the tunnel immediately instead of waiting for /connect.
    #[arg(long = "connect")]
    pub connect: bool,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check ssh and Ollama connectivity interactively, then write the config.
    Setup,
}
