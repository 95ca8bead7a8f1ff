//! Error types for envr-core

use std::path::PathBuf;

use envr_types::Path;

/// Result type for envr-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised synchronously by the call that caused them
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The path did not become absolute after normalization
    #[error("Path is not absolute after normalization: {path}")]
    NotAbsolute { path: Path },

    /// The root path is reserved for the root loader
    #[error("The root path cannot be loaded")]
    RootPath,

    /// Malformed path, element, type or qualifier input
    #[error(transparent)]
    Types(#[from] envr_types::Error),

    /// Settings file could not be parsed
    #[error("Failed to parse settings: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Settings file could not be read
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures raised when a value is consumed.
///
/// Resolving a path never fails; only [`Value::get`](crate::Value::get) and
/// [`Loader::get`](crate::Loader::get) do.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    /// No provider produced a selectable value
    #[error("No value for {path}")]
    NoSuchElement { path: Path },

    /// The supplier does not support the request
    #[error("Unsupported: {message}")]
    Unsupported { message: String },

    /// A raw value could not be converted to the requested type
    #[error("Cannot convert {raw:?} to {ty}")]
    TypeMismatch { raw: String, ty: String },

    /// The supplied object is not of the requested Rust type
    #[error("Value at {path} is not a {expected}")]
    Downcast { path: Path, expected: &'static str },

    /// The ambiguity handler kept synthesizing values past the configured bound
    #[error("Disambiguation for {path} did not settle after {rounds} rounds")]
    DisambiguationExhausted { path: Path, rounds: usize },

    /// A provider's supplier failed
    #[error("Provider {provider} failed: {message}")]
    Provider { provider: String, message: String },

    /// A supplier outlived the engine it would load from
    #[error("Engine behind {path} was dropped")]
    EngineDropped { path: Path },
}

impl ValueError {
    pub fn no_such_element(path: &Path) -> Self {
        Self::NoSuchElement { path: path.clone() }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// `true` for the kinds a [`Value`](crate::Value) may replace with its defaults.
    pub fn is_absence(&self) -> bool {
        matches!(self, Self::NoSuchElement { .. } | Self::Unsupported { .. })
    }
}
