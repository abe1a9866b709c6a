//! Binary-local application orchestration.
//!
//! `main.rs` parses flags and loads config; the chat loop and the setup flow
//! live here so the entrypoint stays small.

pub(crate) mod chat_loop;
pub(crate) mod commands;
pub(crate) mod setup_flow;
pub(crate) mod shutdown;

#[cfg(test)]
#[allow(dead_code, unused_imports)]
mod test_fixtures;
