//! Terminal user-interface building blocks.
//!
//! Slash-command parsing, the spinner, settings, and the renderer live
//! here. Input is plain line-buffered stdin read by the binary.

pub mod commands;
mod markdown;
pub mod progress;
pub mod renderer;
pub mod settings;
pub mod text;

pub use commands::{parse_slash_command, SlashCommand, SlashCommandAction, SLASH_COMMANDS};
pub use renderer::Renderer;
