//! Helpers shared by the integration suites.
//!
//! The fixtures themselves live with the library's unit-test support so the
//! two copies cannot drift.

#![allow(dead_code)]

use tunnelchat::tunnel::{ForwardSpec, TunnelLauncher};
use tunnelchat::ui::render::{ProgressHandle, RenderSink};

#[path = "../../src/testsupport/fixtures.rs"]
mod fixtures;

pub use fixtures::*;
