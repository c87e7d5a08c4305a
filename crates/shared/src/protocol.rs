use serde::{Deserialize, Serialize};

use crate::domain::{TargetId, TargetStatus};

/// Point-in-time copy of a target, as returned by every target route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSnapshot {
    pub id: TargetId,
    pub mac: String,
    pub status: TargetStatus,
    /// Settle duration in whole seconds.
    #[serde(rename = "timeout")]
    pub settle_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliveResponse {
    pub status: String,
}

impl AliveResponse {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
        }
    }
}

pub fn wake_route() -> &'static str {
    "/go/:id"
}

pub fn status_route() -> &'static str {
    "/status/:mode/:id"
}

pub fn alive_route() -> &'static str {
    "/alive"
}
