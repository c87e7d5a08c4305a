use std::{borrow::Borrow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TargetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Power state tracked for a target. Every target starts `Asleep`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    #[default]
    Asleep,
    Awake,
    Error,
}

impl TargetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asleep => "asleep",
            Self::Awake => "awake",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status a caller may assert directly. `Error` is only ever reached through a
/// failed wake, so it is not representable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertedStatus {
    Asleep,
    Awake,
}

impl From<AssertedStatus> for TargetStatus {
    fn from(value: AssertedStatus) -> Self {
        match value {
            AssertedStatus::Asleep => TargetStatus::Asleep,
            AssertedStatus::Awake => TargetStatus::Awake,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported status '{}', expected asleep or awake", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for AssertedStatus {
    type Err = UnknownStatus;

    // `sleep` and `wake` are the path segments older clients send.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "asleep" | "sleep" => Ok(Self::Asleep),
            "awake" | "wake" => Ok(Self::Awake),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}
