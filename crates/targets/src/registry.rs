use std::{collections::HashMap, path::Path, sync::Arc};

use shared::domain::TargetId;
use thiserror::Error;

use crate::{
    config::{load_targets, ConfigError, TargetConfig},
    target::Target,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("target '{0}' not found")]
pub struct UnknownTarget(pub String);

/// Ordered, fixed set of targets. Built once at startup; membership never
/// changes afterwards.
#[derive(Debug, Default)]
pub struct Registry {
    targets: Vec<Arc<Target>>,
    index: HashMap<TargetId, usize>,
}

impl Registry {
    /// Rows are numbered from 1 in `DuplicateTarget` errors.
    pub fn new(configs: Vec<TargetConfig>) -> Result<Self, ConfigError> {
        let mut targets = Vec::with_capacity(configs.len());
        let mut index = HashMap::with_capacity(configs.len());
        for (position, config) in configs.into_iter().enumerate() {
            if index.contains_key(&config.id) {
                return Err(ConfigError::DuplicateTarget {
                    row: position + 1,
                    id: config.id,
                });
            }
            index.insert(config.id.clone(), position);
            targets.push(Arc::new(Target::new(config)));
        }
        Ok(Self { targets, index })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::new(load_targets(path)?)
    }

    pub fn lookup(&self, id: &str) -> Result<&Arc<Target>, UnknownTarget> {
        self.index
            .get(id)
            .map(|&position| &self.targets[position])
            .ok_or_else(|| UnknownTarget(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Target>> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
