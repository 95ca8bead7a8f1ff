//! The provider capability consumed by the engine

use std::sync::Arc;

use envr_types::{Path, TypeDescriptor};

use crate::{Loader, Value};

/// A pluggable source of [`Value`]s for absolute paths.
///
/// The engine only asks a provider for paths whose type its
/// [`upper_bound`](Provider::upper_bound) accepts. Providers may be called
/// from several threads at once and may call back into the engine through
/// `requestor`; a nested request for the very path a provider is serving
/// skips that provider instead of recursing.
pub trait Provider: Send + Sync {
    /// The widest type this provider can serve.
    fn upper_bound(&self) -> TypeDescriptor {
        TypeDescriptor::Any
    }

    /// Produce a value for `absolute_path`, or `None` to decline.
    fn get(&self, requestor: &Loader, absolute_path: &Path) -> Option<Value>;

    /// Name used in log output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Identity of a shared provider: its data pointer.
pub(crate) fn provider_id(provider: &Arc<dyn Provider>) -> usize {
    Arc::as_ptr(provider) as *const () as usize
}
