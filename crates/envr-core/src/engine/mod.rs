//! The resolution engine
//!
//! An [`Engine`] owns the provider list and the node cache. Building one
//! yields the root [`Loader`], which bootstraps itself by resolving
//! `/:Qualifiers` and `/:AmbiguityHandler` through its own providers.

mod loader;
mod node;
mod resolve;

use std::sync::Arc;

use envr_types::{Path, Qualifiers, TypeDescriptor};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{AmbiguityHandler, NoOpAmbiguityHandler, Provider, Settings};

pub use loader::{Loader, WeakLoader};
use node::{Node, NodeKey};

pub(crate) struct Shared {
    pub(crate) providers: Vec<Arc<dyn Provider>>,
    pub(crate) cache: RwLock<FxHashMap<NodeKey, Arc<Node>>>,
    pub(crate) root: Arc<Node>,
    pub(crate) settings: Settings,
}

/// Handle on the shared engine state.
///
/// Cheap to clone; every [`Loader`] of one engine shares the same state.
#[derive(Clone)]
pub struct Engine {
    shared: Arc<Shared>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The root loader.
    pub fn root(&self) -> Loader {
        Loader::new(self.shared.clone(), self.shared.root.clone())
    }

    pub fn settings(&self) -> &Settings {
        &self.shared.settings
    }

    pub fn providers(&self) -> &[Arc<dyn Provider>] {
        &self.shared.providers
    }

    /// Forget every cached node.
    pub fn clear_cache(&self) {
        let mut cache = self.shared.cache.write();
        tracing::debug!(nodes = cache.len(), "clearing cache");
        cache.clear();
    }

    /// Number of cached nodes.
    pub fn cached_len(&self) -> usize {
        self.shared.cache.read().len()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("providers", &self.shared.providers.len())
            .field("cached", &self.cached_len())
            .finish()
    }
}

/// Builder for an [`Engine`]
///
/// # Example
///
/// ```
/// use envr_core::{Engine, Provider, Loader, Value, object};
/// use envr_types::{Path, Qualifiers, TypeDescriptor};
///
/// struct Port;
///
/// impl Provider for Port {
///     fn upper_bound(&self) -> TypeDescriptor {
///         TypeDescriptor::int()
///     }
///
///     fn get(&self, _: &Loader, _: &Path) -> Option<Value> {
///         let path = Path::parse("port:int").ok()?;
///         Some(Value::of(Qualifiers::empty(), path, object(5432i32)))
///     }
/// }
///
/// let root = Engine::builder().with_provider(Port).build();
/// let port = root.load_str("/port:int").unwrap();
/// assert_eq!(*port.get_as::<i32>().unwrap(), 5432);
/// ```
#[derive(Default)]
pub struct EngineBuilder {
    providers: Vec<Arc<dyn Provider>>,
    handler: Option<Arc<dyn AmbiguityHandler>>,
    settings: Settings,
}

impl EngineBuilder {
    pub fn with_provider(self, provider: impl Provider + 'static) -> Self {
        self.with_shared_provider(Arc::new(provider))
    }

    pub fn with_shared_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_providers(mut self, providers: impl IntoIterator<Item = Arc<dyn Provider>>) -> Self {
        self.providers.extend(providers);
        self
    }

    /// Handler used when no provider serves `/:AmbiguityHandler`.
    pub fn with_ambiguity_handler(self, handler: impl AmbiguityHandler + 'static) -> Self {
        self.with_shared_ambiguity_handler(Arc::new(handler))
    }

    pub fn with_shared_ambiguity_handler(mut self, handler: Arc<dyn AmbiguityHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Create the engine and return its bootstrapped root loader.
    pub fn build(self) -> Loader {
        let root = Arc::new(Node::root());
        let shared = Arc::new(Shared {
            providers: self.providers,
            cache: RwLock::new(FxHashMap::default()),
            root: root.clone(),
            settings: self.settings,
        });
        tracing::debug!(providers = shared.providers.len(), "building engine");

        let loader = Loader::new(shared.clone(), root.clone());
        shared.cache.write().insert(root.key.clone(), root.clone());

        let qualifiers = bootstrap::<Qualifiers>(&loader, TypeDescriptor::qualifiers())
            .map(|q| (*q).clone())
            .unwrap_or_default();
        root.set_qualifiers(qualifiers);

        let handler = bootstrap::<Arc<dyn AmbiguityHandler>>(&loader, TypeDescriptor::ambiguity_handler())
            .map(|h| (*h).clone())
            .or(self.handler)
            .unwrap_or_else(NoOpAmbiguityHandler::shared);
        root.set_handler(handler);

        // Nodes resolved above (`/:Qualifiers`, `/qualifierPrefix:string`, ...)
        // stay cached with the no-op handler they were resolved under.
        shared.cache.write().remove(&root.key);
        tracing::debug!(qualifiers = %loader.qualifiers(), "engine ready");
        loader
    }
}

/// Resolve one bootstrap object through the root itself.
fn bootstrap<T: std::any::Any + Send + Sync>(root: &Loader, ty: TypeDescriptor) -> Option<Arc<T>> {
    let loaded = match root.load(&Path::of_type(ty)) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::warn!(error = %e, "bootstrap path rejected");
            return None;
        }
    };
    match loaded.optional::<T>() {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(path = %loaded.absolute_path(), error = %e, "ignoring bootstrap value");
            None
        }
    }
}
