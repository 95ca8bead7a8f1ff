//! Standard providers for the environment resolver.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: envr-providers (this crate)
//!     Properties, environment variables, qualifiers, fixed instances
//!          |
//! Layer 1: envr-core
//!     Engine, Loader, Provider, AmbiguityHandler
//!          |
//! Layer 0: envr-types
//!     Path, Element, TypeDescriptor, Qualifiers
//! ```
//!
//! [`standard_builder`] wires the usual set together:
//!
//! ```
//! use envr_core::Settings;
//! use envr_providers::{Properties, standard_builder};
//!
//! let properties = Properties::new();
//! properties.set("port", "8080");
//!
//! let root = standard_builder(Settings::default(), properties).build();
//! let port = root.load_str("/port:int").unwrap();
//! assert_eq!(*port.get_as::<i32>().unwrap(), 8080);
//! ```

pub mod convert;
pub mod env;
pub mod instance;
pub mod precedence;
pub mod properties;
pub mod property;
pub mod qualifiers;

pub use convert::convert;
pub use env::EnvironmentVariableProvider;
pub use instance::InstanceProvider;
pub use precedence::PrecedenceHandler;
pub use properties::Properties;
pub use property::PropertyProvider;
pub use qualifiers::QualifiersProvider;

use envr_core::{EngineBuilder, Settings};
use envr_types::Path;

/// An engine builder with the standard providers, in precedence order:
/// qualifiers, properties, environment variables.
///
/// `settings.properties` are added to `properties`, and ties between
/// providers go to the one registered first.
pub fn standard_builder(settings: Settings, properties: Properties) -> EngineBuilder {
    properties.extend(settings.properties.clone());

    let mut env = EnvironmentVariableProvider::new();
    if let Some(prefix) = &settings.env_prefix {
        env = env.with_prefix(prefix);
    }

    EngineBuilder::default()
        .with_provider(
            QualifiersProvider::new(properties.clone()).with_default_prefix(settings.qualifier_prefix.clone()),
        )
        .with_provider(PropertyProvider::new(properties))
        .with_provider(env)
        .with_ambiguity_handler(PrecedenceHandler)
        .with_settings(settings)
}

/// The terminal name and element of a top-level named path such as
/// `/port:int`, the only shape the flat sources serve.
pub(crate) fn top_level_name(absolute_path: &Path) -> Option<(String, Path)> {
    if absolute_path.len() != 2 {
        return None;
    }
    let last = absolute_path.last();
    if last.name().is_empty() {
        return None;
    }
    let value_path = Path::of(last.clone()).ok()?;
    Some((last.name().to_string(), value_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_name() {
        let (name, value_path) = top_level_name(&Path::parse("/port:int").unwrap()).unwrap();
        assert_eq!(name, "port");
        assert_eq!(value_path, Path::parse("port:int").unwrap());

        assert!(top_level_name(&Path::parse("/db/port:int").unwrap()).is_none());
        assert!(top_level_name(&Path::parse("/:int").unwrap()).is_none());
    }
}
