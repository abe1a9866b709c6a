//! Terminal-facing UI facade.
//!
//! Orchestration code (setup flow, chat loop) depends on the [`render`]
//! contract instead of the concrete renderer.

pub mod render;
