//! Scoped temporary tunnel used by the setup probe.

use std::time::Duration;

use super::{ForwardSpec, TunnelLauncher, TunnelManager};
use crate::error::TunnelError;

/// A tunnel that lives exactly as long as the guard.
///
/// `close` tears it down and waits for the process; dropping the guard
/// without calling `close` still kills it.
pub struct TunnelGuard {
    manager: TunnelManager,
}

impl TunnelGuard {
    pub async fn open(
        launcher: Box<dyn TunnelLauncher>,
        settle: Duration,
        spec: &ForwardSpec,
    ) -> Result<Self, TunnelError> {
        let mut manager = TunnelManager::new(launcher, settle);
        manager.connect(spec).await?;
        Ok(Self { manager })
    }

    pub fn is_active(&self) -> bool {
        self.manager.is_active()
    }

    pub fn pid(&self) -> Option<u32> {
        self.manager.status().pid
    }

    pub async fn close(mut self) {
        self.manager.disconnect().await;
    }
}
