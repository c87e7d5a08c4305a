//! Target registry, per-target state machine and the wake sequence.

mod config;
mod orchestrator;
mod registry;
mod target;

pub use config::{load_targets, parse_targets, ConfigError, TargetConfig};
pub use orchestrator::{wake, wake_to_completion, OrchestrationError, WakeOutcome};
pub use registry::{Registry, UnknownTarget};
pub use target::Target;
