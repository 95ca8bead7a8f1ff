//! Engine settings loaded from TOML
//!
//! ```toml
//! max_disambiguation_rounds = 8
//! env_prefix = "APP"
//! qualifier_prefix = "qualifier."
//!
//! [properties]
//! "db.port" = "5432"
//! "qualifier.env" = "prod"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Settings shared by the engine and the standard providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Cap on values an ambiguity handler may synthesize while resolving
    /// one path. Unbounded when absent.
    #[serde(default)]
    pub max_disambiguation_rounds: Option<usize>,

    /// Seed entries for the property table
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    /// Prefix applied to environment variable names
    #[serde(default)]
    pub env_prefix: Option<String>,

    /// Properties starting with this prefix become root qualifiers
    #[serde(default = "default_qualifier_prefix")]
    pub qualifier_prefix: String,
}

/// Prefix used when settings do not name one
pub const DEFAULT_QUALIFIER_PREFIX: &str = "qualifier.";

fn default_qualifier_prefix() -> String {
    DEFAULT_QUALIFIER_PREFIX.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_disambiguation_rounds: None,
            properties: BTreeMap::new(),
            env_prefix: None,
            qualifier_prefix: default_qualifier_prefix(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let settings = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn with_max_disambiguation_rounds(mut self, rounds: usize) -> Self {
        self.max_disambiguation_rounds = Some(rounds);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}
