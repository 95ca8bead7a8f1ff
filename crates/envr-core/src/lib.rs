//! Resolution engine for the environment resolver
//!
//! Given a [`Path`](envr_types::Path) and the requestor's
//! [`Qualifiers`](envr_types::Qualifiers), the engine asks every
//! [`Provider`] for a candidate [`Value`], filters the candidates for
//! selectability, ranks the survivors with an [`AmbiguityHandler`] and
//! caches the winner as an immutable node behind a [`Loader`].
//!
//! # Architecture
//!
//! ```text
//!                 envr-cli
//!                    |
//!             envr-providers
//!                    |
//!               envr-core
//!                    |
//!               envr-types
//! ```
//!
//! - **Value defaulting**: [`Value`] falls back to its defaults when the
//!   primary supplier reports absence.
//! - **Selectability**: [`select`] holds the type, qualifier and path filters.
//! - **Scoring**: [`handler`] holds the default qualifier and path scores.
//! - **Caching and reentrancy**: [`Engine`] owns the node cache; a
//!   provider that asks for the path it is serving is skipped on the
//!   nested request.

pub mod engine;
pub mod error;
pub mod handler;
pub mod provider;
pub mod select;
pub mod settings;
pub mod value;

pub use engine::{Engine, EngineBuilder, Loader, WeakLoader};
pub use error::{Error, Result, ValueError};
pub use handler::{AmbiguityHandler, NoOpAmbiguityHandler, path_score, qualifiers_score};
pub use provider::Provider;
pub use settings::{DEFAULT_QUALIFIER_PREFIX, Settings};
pub use value::{Object, Supplied, Supplier, Value, ValueBuilder, object};
