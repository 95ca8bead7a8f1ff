//! [`PropertyProvider`]: values from a [`Properties`] table.

use envr_core::{Loader, Provider, Supplied, Value};
use envr_types::{Path, Qualifiers, TypeDescriptor};

use crate::{Properties, convert, top_level_name};

/// Serves `/name:type` paths from a property table.
///
/// The value is read and converted on every `get()`. A missing property is
/// a null, which is not a legal value, so a losing candidate takes over.
#[derive(Debug, Clone)]
pub struct PropertyProvider {
    properties: Properties,
}

impl PropertyProvider {
    pub fn new(properties: Properties) -> Self {
        Self { properties }
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

impl Provider for PropertyProvider {
    fn upper_bound(&self) -> TypeDescriptor {
        TypeDescriptor::Any
    }

    fn get(&self, _requestor: &Loader, absolute_path: &Path) -> Option<Value> {
        let (name, value_path) = top_level_name(absolute_path)?;
        let properties = self.properties.clone();
        let ty = absolute_path.ty().clone();
        let supplier = move || -> Supplied {
            match properties.get(&name) {
                Some(raw) => convert(&raw, &ty),
                None => Ok(None),
            }
        };
        Some(
            Value::builder(Qualifiers::empty(), value_path, supplier)
                .nulls_permitted(false)
                .build(),
        )
    }

    fn name(&self) -> &str {
        "properties"
    }
}
