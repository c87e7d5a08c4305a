use std::time::Duration;

use shared::{
    domain::{TargetId, TargetStatus},
    protocol::TargetSnapshot,
};
use tokio::sync::RwLock;
use tracing::info;

use crate::config::TargetConfig;

/// A tracked machine. Identity, hardware address and settle duration are
/// fixed at construction; status lives behind the target's own lock.
#[derive(Debug)]
pub struct Target {
    id: TargetId,
    mac: String,
    settle: Duration,
    status: RwLock<TargetStatus>,
}

impl Target {
    pub fn new(config: TargetConfig) -> Self {
        Self {
            id: config.id,
            mac: config.mac,
            settle: config.settle,
            status: RwLock::new(TargetStatus::Asleep),
        }
    }

    pub fn id(&self) -> &TargetId {
        &self.id
    }

    pub fn mac(&self) -> &str {
        &self.mac
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }

    pub async fn status(&self) -> TargetStatus {
        *self.status.read().await
    }

    /// Unconditional overwrite, used for externally asserted transitions and
    /// to reset a target out of `error`.
    pub async fn set_status(&self, status: impl Into<TargetStatus>) {
        let status = status.into();
        let mut guard = self.status.write().await;
        let previous = std::mem::replace(&mut *guard, status);
        info!(target_id = %self.id, %previous, %status, "status set");
    }

    pub async fn snapshot(&self) -> TargetSnapshot {
        let status = self.status.read().await;
        TargetSnapshot {
            id: self.id.clone(),
            mac: self.mac.clone(),
            status: *status,
            settle_secs: self.settle.as_secs(),
        }
    }

    pub(crate) fn state(&self) -> &RwLock<TargetStatus> {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::AssertedStatus;

    fn target(settle: u64) -> Target {
        Target::new(TargetConfig {
            id: TargetId::new("m1"),
            mac: "AA:BB:CC:DD:EE:FF".into(),
            settle: Duration::from_secs(settle),
        })
    }

    #[tokio::test]
    async fn new_target_starts_asleep() {
        let target = target(2);
        assert_eq!(target.status().await, TargetStatus::Asleep);
        let snapshot = target.snapshot().await;
        assert_eq!(snapshot.id, TargetId::new("m1"));
        assert_eq!(snapshot.mac, "AA:BB:CC:DD:EE:FF");
        assert_eq!(snapshot.settle_secs, 2);
    }

    #[tokio::test]
    async fn set_status_overwrites_including_error() {
        let target = target(0);
        target.set_status(TargetStatus::Error).await;
        assert_eq!(target.status().await, TargetStatus::Error);

        target.set_status(AssertedStatus::Asleep).await;
        assert_eq!(target.snapshot().await.status, TargetStatus::Asleep);

        target.set_status(AssertedStatus::Awake).await;
        assert_eq!(target.snapshot().await.status, TargetStatus::Awake);
    }
}
