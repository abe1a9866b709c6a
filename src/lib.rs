//! tunnelchat: chat with an Ollama model on a remote gpu host over an ssh
//! port-forward.
//!
//! The library owns the tunnel lifecycle, the inference client with its
//! generate fallback, the chat session state machine, and the one-time
//! setup checks. The `tunnelchat` binary is a thin terminal front-end.
//!
//! # Quick start
//!
//! ```no_run
//! use tunnelchat::config::load_config;
//! use tunnelchat::session::SessionController;
//!
//! # async fn example() {
//! let config = load_config(None).unwrap();
//! let mut session = SessionController::new(&config);
//! session.connect().await.unwrap();
//! let turn = session.submit("Hello!").await.unwrap();
//! println!("{}", turn.reply);
//! session.disconnect().await;
//! # }
//! ```

pub mod build_info;
pub mod client;
pub mod config;
pub mod error;
pub mod probe;
pub mod session;
#[cfg(test)]
pub mod testsupport;
pub mod transcript;
pub mod tui;
pub mod tunnel;
pub mod types;
pub mod ui;
