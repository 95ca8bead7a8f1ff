//! Command implementations for envr-cli

pub mod parse;
pub mod resolve;
pub mod types;

pub use parse::run_parse;
pub use resolve::{ResolveRequest, run_resolve};
pub use types::run_types;
