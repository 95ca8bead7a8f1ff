//! [`EnvironmentVariableProvider`]: values from the process environment.

use std::sync::Arc;

use envr_core::{Loader, Provider, Supplied, Value};
use envr_types::{Path, Qualifiers, TypeDescriptor};

use crate::{convert, top_level_name};

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Serves `/name:type` paths from environment variables.
///
/// `db.pool-size` is looked up as `DB_POOL_SIZE`, or `APP_DB_POOL_SIZE`
/// with prefix `APP`.
#[derive(Clone)]
pub struct EnvironmentVariableProvider {
    prefix: Option<String>,
    lookup: Arc<Lookup>,
}

impl Default for EnvironmentVariableProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentVariableProvider {
    /// Read the real process environment.
    pub fn new() -> Self {
        Self {
            prefix: None,
            lookup: Arc::new(|name: &str| std::env::var(name).ok()),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Replace the environment with `lookup`.
    pub fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.lookup = Arc::new(lookup);
        self
    }

    /// The variable a property name maps to.
    pub fn variable_name(&self, name: &str) -> String {
        let mangled: String = name
            .chars()
            .map(|c| match c {
                '.' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        match &self.prefix {
            Some(prefix) => format!("{}_{mangled}", prefix.to_ascii_uppercase()),
            None => mangled,
        }
    }
}

impl Provider for EnvironmentVariableProvider {
    fn upper_bound(&self) -> TypeDescriptor {
        TypeDescriptor::Any
    }

    fn get(&self, _requestor: &Loader, absolute_path: &Path) -> Option<Value> {
        let (name, value_path) = top_level_name(absolute_path)?;
        let variable = self.variable_name(&name);
        let lookup = self.lookup.clone();
        let ty = absolute_path.ty().clone();
        let supplier = move || -> Supplied {
            match lookup(&variable) {
                Some(raw) => convert(&raw, &ty),
                None => {
                    tracing::trace!(variable = %variable, "environment variable not set");
                    Ok(None)
                }
            }
        };
        Some(
            Value::builder(Qualifiers::empty(), value_path, supplier)
                .nulls_permitted(false)
                .build(),
        )
    }

    fn name(&self) -> &str {
        "environment"
    }
}

impl std::fmt::Debug for EnvironmentVariableProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentVariableProvider")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "port", "PORT")]
    #[case(None, "db.pool-size", "DB_POOL_SIZE")]
    #[case(Some("app"), "db.port", "APP_DB_PORT")]
    #[case(Some("APP"), "Mixed.Case", "APP_MIXED_CASE")]
    fn test_variable_name(#[case] prefix: Option<&str>, #[case] name: &str, #[case] expected: &str) {
        let mut provider = EnvironmentVariableProvider::new();
        if let Some(prefix) = prefix {
            provider = provider.with_prefix(prefix);
        }
        assert_eq!(provider.variable_name(name), expected);
    }
}
