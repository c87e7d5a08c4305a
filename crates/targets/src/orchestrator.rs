use std::sync::Arc;

use shared::domain::TargetStatus;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, info, warn};
use wol::{WakeError, WakeSender};

use crate::target::Target;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeOutcome {
    /// The wake signal was sent and the settle period elapsed.
    Woken,
    /// The target was not asleep; nothing was sent.
    Skipped(TargetStatus),
}

#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error(transparent)]
    Wake(#[from] WakeError),
    #[error("wake sequence did not run to completion: {0}")]
    Interrupted(#[from] JoinError),
}

/// Drives one target from `asleep` to `awake`.
///
/// The write guard is held from the wake signal until the status is committed,
/// including the settle delay, so readers and other wakes of the same target
/// queue behind it. The status is re-checked once the write guard is held:
/// a wake that queued behind a completed one finds the target awake and does
/// not signal again. On return the target is `awake` or `error`, unless the
/// sequence was skipped.
pub async fn wake(target: &Target, sender: &dyn WakeSender) -> Result<WakeOutcome, WakeError> {
    let status = *target.state().read().await;
    if status != TargetStatus::Asleep {
        debug!(target_id = %target.id(), %status, "target not asleep, skipping wake");
        return Ok(WakeOutcome::Skipped(status));
    }

    let mut guard = target.state().write().await;
    if *guard != TargetStatus::Asleep {
        debug!(target_id = %target.id(), status = %*guard, "target woken concurrently, skipping wake");
        return Ok(WakeOutcome::Skipped(*guard));
    }

    info!(target_id = %target.id(), mac = %target.mac(), "sending wake signal");
    if let Err(error) = sender.wake(target.mac()).await {
        *guard = TargetStatus::Error;
        warn!(target_id = %target.id(), %error, "wake signal failed, target marked as error");
        return Err(error);
    }

    let settle = target.settle();
    if !settle.is_zero() {
        debug!(target_id = %target.id(), settle_secs = settle.as_secs(), "waiting for target to settle");
        tokio::time::sleep(settle).await;
    }
    *guard = TargetStatus::Awake;
    info!(target_id = %target.id(), "target awake");
    Ok(WakeOutcome::Woken)
}

/// Runs [`wake`] on its own task and waits for it. Dropping the returned
/// future does not cancel the sequence; the target still lands in `awake` or
/// `error`.
pub async fn wake_to_completion(
    target: Arc<Target>,
    sender: Arc<dyn WakeSender>,
) -> Result<WakeOutcome, OrchestrationError> {
    let task = tokio::spawn(async move { wake(&target, sender.as_ref()).await });
    Ok(task.await??)
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
