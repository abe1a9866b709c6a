//! The library's shared test fixtures, compiled into the binary's tests.

use tunnelchat::tunnel::{ForwardSpec, TunnelLauncher};
use tunnelchat::ui::render::{ProgressHandle, RenderSink};

#[path = "../testsupport/fixtures.rs"]
mod shared;

pub(crate) use shared::*;
