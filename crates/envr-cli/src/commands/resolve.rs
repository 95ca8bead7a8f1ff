//! The resolve command

use std::path::PathBuf;

use envr_core::{Loader, Object, Settings, ValueError};
use envr_providers::{Properties, standard_builder};
use envr_types::{Path, Qualifiers};
use serde_json::json;

use crate::error::{CliError, Result};

/// Everything `envr resolve` needs besides the output format.
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    pub path: String,
    pub qualifiers: Vec<(String, String)>,
    pub properties: Vec<(String, String)>,
    pub config: Option<PathBuf>,
    pub env_prefix: Option<String>,
}

/// Run the resolve command
pub fn run_resolve(request: &ResolveRequest, json: bool) -> Result<()> {
    let root = build_root(request)?;
    let loader = root.load_str(&request.path)?;
    let object = supplied(&loader)?;

    if json {
        let output = json!({
            "path": loader.absolute_path().to_string(),
            "qualifiers": root.qualifiers(),
            "value": to_json(&object).ok_or_else(|| unprintable(loader.absolute_path()))?,
            "deterministic": loader.is_deterministic(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let text = to_text(&object).ok_or_else(|| unprintable(loader.absolute_path()))?;
        println!("{text}");
        tracing::debug!(path = %loader.absolute_path(), qualifiers = %root.qualifiers(), "resolved");
    }
    Ok(())
}

/// Build the standard engine for `request` and return its root.
pub fn build_root(request: &ResolveRequest) -> Result<Loader> {
    let mut settings = match &request.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(prefix) = &request.env_prefix {
        settings.env_prefix = Some(prefix.clone());
    }

    let properties = Properties::new();
    for (name, value) in &request.qualifiers {
        properties.set(format!("{}{name}", settings.qualifier_prefix), value.clone());
    }
    properties.extend(request.properties.iter().cloned());

    Ok(standard_builder(settings, properties).build())
}

/// The supplied object; a null counts as no value.
fn supplied(loader: &Loader) -> Result<Object> {
    loader
        .get()?
        .ok_or_else(|| CliError::from(ValueError::no_such_element(loader.absolute_path())))
}

fn unprintable(path: &Path) -> CliError {
    CliError::user(format!("Value at {path} cannot be displayed"))
}

/// JSON for the object types the standard providers produce.
pub fn to_json(object: &Object) -> Option<serde_json::Value> {
    if let Some(v) = object.downcast_ref::<String>() {
        return Some(json!(v));
    }
    if let Some(v) = object.downcast_ref::<bool>() {
        return Some(json!(v));
    }
    if let Some(v) = object.downcast_ref::<char>() {
        return Some(json!(v.to_string()));
    }
    if let Some(v) = object.downcast_ref::<i8>() {
        return Some(json!(v));
    }
    if let Some(v) = object.downcast_ref::<i16>() {
        return Some(json!(v));
    }
    if let Some(v) = object.downcast_ref::<i32>() {
        return Some(json!(v));
    }
    if let Some(v) = object.downcast_ref::<i64>() {
        return Some(json!(v));
    }
    if let Some(v) = object.downcast_ref::<f32>() {
        return Some(json!(v));
    }
    if let Some(v) = object.downcast_ref::<f64>() {
        return Some(json!(v));
    }
    if let Some(v) = object.downcast_ref::<Qualifiers>() {
        return serde_json::to_value(v).ok();
    }
    None
}

/// Plain text for the same object types.
pub fn to_text(object: &Object) -> Option<String> {
    if let Some(qualifiers) = object.downcast_ref::<Qualifiers>() {
        return Some(qualifiers.to_string());
    }
    match to_json(object)? {
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
