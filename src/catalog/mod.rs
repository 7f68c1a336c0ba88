//! Catalog store: read-only access to the recommendable options.
//!
//! The catalog is loaded once (in memory or from a JSON file) and never
//! written by this crate. Option ids must be unique within a loaded catalog;
//! the store enforces that at load time so the normalizer can rely on exact
//! id resolution downstream.

use std::collections::HashSet;
use std::path::Path;

use crate::error::EngineError;
use crate::types::CareerOption;

#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    options: Vec<CareerOption>,
}

impl CatalogStore {
    /// Build a store from in-memory options, validating id uniqueness.
    pub fn new(options: Vec<CareerOption>) -> Result<Self, EngineError> {
        let mut seen = HashSet::new();
        for option in &options {
            if !seen.insert(option.id) {
                return Err(EngineError::Configuration(format!(
                    "Duplicate option id {} in catalog",
                    option.id
                )));
            }
        }
        Ok(Self { options })
    }

    /// Load a catalog from a JSON file containing an array of options.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Configuration(format!(
                "Failed to read catalog file {}: {}",
                path.display(),
                e
            ))
        })?;
        let options: Vec<CareerOption> = serde_json::from_str(&raw).map_err(|e| {
            EngineError::Configuration(format!(
                "Failed to parse catalog file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::new(options)
    }

    pub fn options(&self) -> &[CareerOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn find_by_id(&self, id: u32) -> Option<&CareerOption> {
        self.options.iter().find(|o| o.id == id)
    }
}
