//! [`QualifiersProvider`]: root qualifiers from prefixed properties.

use envr_core::{DEFAULT_QUALIFIER_PREFIX, Loader, Provider, Supplied, Value, object};
use envr_types::{Path, Qualifiers, TypeDescriptor};

use crate::Properties;

/// Name of the path consulted for the prefix: `/qualifierPrefix:string`.
pub const QUALIFIER_PREFIX_NAME: &str = "qualifierPrefix";

/// Supplies [`Qualifiers`] built from every property whose name starts
/// with the qualifier prefix.
///
/// With `qualifier.env=prod` and the default prefix, the root is
/// qualified with `env=prod`. The prefix itself is resolved through the
/// requestor at `/qualifierPrefix:string`.
#[derive(Debug, Clone)]
pub struct QualifiersProvider {
    properties: Properties,
    default_prefix: String,
}

impl QualifiersProvider {
    pub fn new(properties: Properties) -> Self {
        Self {
            properties,
            default_prefix: DEFAULT_QUALIFIER_PREFIX.to_string(),
        }
    }

    /// Prefix used when `/qualifierPrefix:string` has no value.
    pub fn with_default_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.default_prefix = prefix.into();
        self
    }
}

impl Provider for QualifiersProvider {
    fn upper_bound(&self) -> TypeDescriptor {
        TypeDescriptor::qualifiers()
    }

    fn get(&self, requestor: &Loader, absolute_path: &Path) -> Option<Value> {
        let requestor = requestor.downgrade();
        let properties = self.properties.clone();
        let default_prefix = self.default_prefix.clone();
        let supplier = move || -> Supplied {
            let requestor = requestor.try_upgrade()?;
            let prefix = resolve_prefix(&requestor).unwrap_or_else(|| default_prefix.clone());
            let qualifiers = Qualifiers::of(properties.stripped(&prefix));
            tracing::debug!(prefix = %prefix, qualifiers = %qualifiers, "qualifiers from properties");
            Ok(Some(object(qualifiers)))
        };
        Some(
            Value::builder(Qualifiers::empty(), Path::of_type(absolute_path.ty().clone()), supplier)
                .nulls_permitted(false)
                .build(),
        )
    }

    fn name(&self) -> &str {
        "qualifiers"
    }
}

fn resolve_prefix(requestor: &Loader) -> Option<String> {
    let loader = requestor
        .load_named(QUALIFIER_PREFIX_NAME, TypeDescriptor::string())
        .ok()?;
    match loader.optional::<String>() {
        Ok(prefix) => prefix.map(|p| p.as_ref().clone()),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring qualifier prefix");
            None
        }
    }
}
