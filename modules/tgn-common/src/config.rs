use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TgnError};
use crate::types::RootTerm;

/// Raw TGN type term (e.g. `inhabited places`) to PIT type label.
pub type TypeMap = BTreeMap<String, String>;

/// Relation labels written on emitted edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relations {
    #[serde(rename = "liesIn")]
    pub lies_in: String,
    pub equivalence: String,
}

/// TOML-backed dataset configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TgnConfig {
    pub parents: Vec<RootTerm>,
    pub types: TypeMap,
    pub relations: Relations,
}

impl TgnConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| TgnError::Config(e.to_string()))
    }

    /// Load and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TgnError::io(path, e))?;
        let config = Self::from_toml(&content)?;
        tracing::info!(
            path = %path.display(),
            parents = config.parents.len(),
            types = config.types.len(),
            "Loaded TGN config"
        );
        Ok(config)
    }

    pub fn type_for(&self, type_term: &str) -> Option<&str> {
        self.types.get(type_term).map(String::as_str)
    }
}
