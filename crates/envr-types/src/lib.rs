//! Addressing model for the environment resolver
//!
//! Provides the immutable value types every other crate builds on:
//! [`Qualifiers`] (environment coordinates), [`TypeDescriptor`] (explicit
//! runtime types), [`Element`] and [`Path`] (typed hierarchical addresses)
//! together with their text form and structural matching.

pub mod element;
pub mod error;
mod parser;
pub mod path;
pub mod qualifiers;
pub mod types;

pub use element::Element;
pub use error::{Error, Result};
pub use path::{Path, elements_match};
pub use qualifiers::Qualifiers;
pub use types::{Primitive, TypeDescriptor};
