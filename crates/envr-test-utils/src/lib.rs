//! Shared test utilities for the envr workspace.
//!
//! This crate provides standardised providers, handlers and helpers so the
//! engine can be exercised without real configuration sources. It is a
//! dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`provider`]: providers at three levels of behaviour (fixed,
//!   closure-driven, reentrant)
//! - [`handler`]: [`RecordingHandler`](handler::RecordingHandler) that logs
//!   every callback and disambiguates on request

pub mod handler;
pub mod provider;

use envr_core::{Loader, Value, object};
use envr_types::{Path, Qualifiers};

/// Parse a path, panicking on malformed test input.
///
/// # Panics
///
/// Panics if `text` is not a valid path.
pub fn path(text: &str) -> Path {
    Path::parse(text).unwrap_or_else(|e| panic!("invalid test path {text:?}: {e}"))
}

/// Parse qualifiers in `k=v;k2=v2` form.
///
/// # Panics
///
/// Panics if `text` is malformed.
pub fn qualifiers(text: &str) -> Qualifiers {
    text.parse()
        .unwrap_or_else(|e| panic!("invalid test qualifiers {text:?}: {e}"))
}

/// A deterministic value holding an `i32`.
pub fn int_value(qualifiers: &str, value_path: &str, value: i32) -> Value {
    Value::of(self::qualifiers(qualifiers), path(value_path), object(value))
}

/// A deterministic value holding a `String`.
pub fn string_value(qualifiers: &str, value_path: &str, value: &str) -> Value {
    Value::of(self::qualifiers(qualifiers), path(value_path), object(value.to_string()))
}

/// Read an `i32` from a loader.
///
/// # Panics
///
/// Panics if the loader fails or holds something else.
pub fn read_i32(loader: &Loader) -> i32 {
    *loader
        .get_as::<i32>()
        .unwrap_or_else(|e| panic!("{}: {e}", loader.absolute_path()))
}

/// Read a `String` from a loader.
///
/// # Panics
///
/// Panics if the loader fails or holds something else.
pub fn read_string(loader: &Loader) -> String {
    loader
        .get_as::<String>()
        .unwrap_or_else(|e| panic!("{}: {e}", loader.absolute_path()))
        .as_ref()
        .clone()
}
