use std::sync::Arc;

use shared::{
    domain::AssertedStatus,
    error::ApiError,
    protocol::{AliveResponse, TargetSnapshot},
};
use targets::{wake_to_completion, OrchestrationError, Registry, Target, UnknownTarget};
use tracing::{error, warn};
use wol::WakeSender;

#[derive(Clone)]
pub struct ApiContext {
    pub registry: Arc<Registry>,
    pub waker: Arc<dyn WakeSender>,
}

impl ApiContext {
    pub fn new(registry: Registry, waker: Arc<dyn WakeSender>) -> Self {
        Self {
            registry: Arc::new(registry),
            waker,
        }
    }

    fn resolve(&self, id: &str) -> Result<&Arc<Target>, ApiError> {
        self.registry.lookup(id).map_err(not_found)
    }
}

/// Wakes the target if it is asleep and reports its state once the sequence
/// has finished. Blocks for the target's settle duration.
pub async fn wake_target(ctx: &ApiContext, id: &str) -> Result<TargetSnapshot, ApiError> {
    let target = ctx.resolve(id)?;
    wake_to_completion(target.clone(), ctx.waker.clone())
        .await
        .map_err(|err| match err {
            OrchestrationError::Wake(error) => {
                warn!(target_id = %id, %error, "wake failed");
                ApiError::internal("failed to wake up")
            }
            OrchestrationError::Interrupted(error) => {
                error!(target_id = %id, %error, "wake sequence interrupted");
                ApiError::internal(error.to_string())
            }
        })?;
    Ok(target.snapshot().await)
}

/// Directly asserts `asleep` or `awake`, e.g. after an external shutdown.
/// Also the only way out of `error`.
pub async fn set_target_status(
    ctx: &ApiContext,
    id: &str,
    status: &str,
) -> Result<TargetSnapshot, ApiError> {
    let target = ctx.resolve(id)?;
    let status = status
        .parse::<AssertedStatus>()
        .map_err(|err| ApiError::validation(err.to_string()))?;
    target.set_status(status).await;
    Ok(target.snapshot().await)
}

pub async fn target_status(ctx: &ApiContext, id: &str) -> Result<TargetSnapshot, ApiError> {
    let target = ctx.resolve(id)?;
    Ok(target.snapshot().await)
}

pub fn liveness() -> AliveResponse {
    AliveResponse::ok()
}

fn not_found(err: UnknownTarget) -> ApiError {
    ApiError::not_found(err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
