use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use envr_types::{Element, Path, Qualifiers, TypeDescriptor};

use super::node::{InFlight, Node, NodeKey, Supply};
use super::{Engine, Shared};
use crate::provider::provider_id;
use crate::value::{Object, Supplied};
use crate::{AmbiguityHandler, Error, Provider, Result, ValueError};

/// A handle on one resolution node.
///
/// Loaders are immutable and cheap to clone. [`Loader::load`] resolves a
/// path relative to this node and returns the (cached) node for it;
/// [`Loader::get`] consumes the resolved value.
#[derive(Clone)]
pub struct Loader {
    shared: Arc<Shared>,
    node: Arc<Node>,
    in_flight: Option<Arc<InFlight>>,
}

/// A [`Loader`] that does not own its engine.
#[derive(Clone)]
pub struct WeakLoader {
    shared: Weak<Shared>,
    node: Arc<Node>,
    in_flight: Option<Arc<InFlight>>,
}

impl WeakLoader {
    /// The loader again, or `None` once every handle on the engine is gone.
    pub fn upgrade(&self) -> Option<Loader> {
        Some(Loader {
            shared: self.shared.upgrade()?,
            node: self.node.clone(),
            in_flight: self.in_flight.clone(),
        })
    }

    /// Like [`upgrade`](WeakLoader::upgrade), failing with
    /// [`ValueError::EngineDropped`].
    pub fn try_upgrade(&self) -> std::result::Result<Loader, ValueError> {
        self.upgrade().ok_or_else(|| ValueError::EngineDropped {
            path: self.node.path().clone(),
        })
    }

    pub fn absolute_path(&self) -> &Path {
        self.node.path()
    }
}

impl fmt::Debug for WeakLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakLoader")
            .field("path", self.node.path())
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}

impl Loader {
    pub(crate) fn new(shared: Arc<Shared>, node: Arc<Node>) -> Self {
        Self {
            shared,
            node,
            in_flight: None,
        }
    }

    /// A handle on `node` that keeps this handle's in-flight context.
    fn handle(&self, node: Arc<Node>) -> Self {
        Self {
            shared: self.shared.clone(),
            node,
            in_flight: self.in_flight.clone(),
        }
    }

    /// The handle given to `provider` while it serves `absolute_path`.
    pub(super) fn entering(&self, absolute_path: &Path, provider: &Arc<dyn Provider>) -> Self {
        Self {
            shared: self.shared.clone(),
            node: self.node.clone(),
            in_flight: Some(Arc::new(InFlight {
                path: absolute_path.clone(),
                provider: provider_id(provider),
                next: self.in_flight.clone(),
            })),
        }
    }

    /// The provider already producing `absolute_path` on this call chain.
    pub(super) fn in_flight_for(&self, absolute_path: &Path) -> Option<usize> {
        self.in_flight
            .as_deref()
            .and_then(|entry| InFlight::top_for(entry, absolute_path))
    }

    pub(super) fn shared(&self) -> &Shared {
        &self.shared
    }

    pub(super) fn node(&self) -> &Arc<Node> {
        &self.node
    }

    /// A handle that does not keep the engine alive.
    ///
    /// Suppliers end up in the engine's cache, so one that captures a
    /// [`Loader`] keeps its own engine from ever being dropped. Capture
    /// this instead and [`upgrade`](WeakLoader::upgrade) when supplying.
    pub fn downgrade(&self) -> WeakLoader {
        WeakLoader {
            shared: Arc::downgrade(&self.shared),
            node: self.node.clone(),
            in_flight: self.in_flight.clone(),
        }
    }

    pub fn engine(&self) -> Engine {
        Engine {
            shared: self.shared.clone(),
        }
    }

    /// Resolve `path` and return the loader for it.
    ///
    /// Relative paths are appended to this loader's absolute path.
    ///
    /// # Errors
    ///
    /// Fails only for arguments: a path that is not absolute after
    /// normalization, or the root path. A path nobody provides still
    /// resolves; its loader fails on [`Loader::get`].
    pub fn load(&self, path: &Path) -> Result<Loader> {
        let absolute_path = self.normalize(path)?;
        if !absolute_path.is_absolute() {
            return Err(Error::NotAbsolute { path: absolute_path });
        }
        if absolute_path.is_root() {
            return Err(Error::RootPath);
        }

        let requestor = self.loader_for(&absolute_path);
        let key = NodeKey {
            qualifiers: requestor.qualifiers(),
            path: absolute_path,
        };

        let cached = self.shared.cache.read().get(&key).cloned();
        if let Some(node) = cached {
            tracing::trace!(path = %key.path, "cache hit");
            return Ok(self.handle(node));
        }

        tracing::debug!(path = %key.path, qualifiers = %key.qualifiers, "cache miss");
        let resolution = requestor.resolve(key.clone());
        let node = Arc::new(resolution.node);
        if resolution.reentrant {
            tracing::debug!(path = %key.path, "not caching node resolved during reentrancy");
            return Ok(self.handle(node));
        }
        let node = self.shared.cache.write().entry(key).or_insert(node).clone();
        Ok(self.handle(node))
    }

    /// Parse `path` and [`load`](Loader::load) it.
    pub fn load_str(&self, path: &str) -> Result<Loader> {
        self.load(&Path::parse(path)?)
    }

    /// Load the child `name` of type `ty` below this loader.
    pub fn load_named(&self, name: &str, ty: TypeDescriptor) -> Result<Loader> {
        self.load(&Path::of(Element::of(name, ty)?)?)
    }

    /// Append relative paths to this loader's absolute path.
    pub fn normalize(&self, path: &Path) -> Result<Path> {
        if path.is_absolute() {
            Ok(path.clone())
        } else {
            Ok(self.absolute_path().plus_path(path)?)
        }
    }

    /// The nearest loader on the parent chain whose path is a prefix of
    /// `absolute_path`. Falls back to the root.
    pub fn loader_for(&self, absolute_path: &Path) -> Loader {
        let mut node = self.node.clone();
        loop {
            if absolute_path.starts_with(node.path()) || self.is_root_node(&node) {
                return self.handle(node);
            }
            node = self.parent_node(&node);
        }
    }

    /// The loader that requested this one. The root is its own parent.
    pub fn parent(&self) -> Loader {
        self.handle(self.parent_node(&self.node))
    }

    fn is_root_node(&self, node: &Arc<Node>) -> bool {
        Arc::ptr_eq(node, &self.shared.root)
    }

    fn parent_node(&self, node: &Arc<Node>) -> Arc<Node> {
        if self.is_root_node(node) || node.parent == self.shared.root.key {
            return self.shared.root.clone();
        }
        let cached = self.shared.cache.read().get(&node.parent).cloned();
        if let Some(parent) = cached {
            return parent;
        }
        // The cache was cleared since this node was resolved.
        let root = Loader::new(self.shared.clone(), self.shared.root.clone());
        match root.load(&node.parent.path) {
            Ok(parent) => parent.node,
            Err(_) => self.shared.root.clone(),
        }
    }

    pub fn absolute_path(&self) -> &Path {
        self.node.path()
    }

    /// Qualifiers of this node; empty on the root during bootstrap.
    pub fn qualifiers(&self) -> Qualifiers {
        self.node.qualifiers()
    }

    /// Ambiguity handler of this node; the no-op handler on the root
    /// during bootstrap.
    pub fn ambiguity_handler(&self) -> Arc<dyn AmbiguityHandler> {
        self.node.ambiguity_handler()
    }

    pub fn providers(&self) -> &[Arc<dyn Provider>] {
        &self.shared.providers
    }

    /// `true` when every [`get`](Loader::get) returns the same result.
    pub fn is_deterministic(&self) -> bool {
        self.node.deterministic
    }

    pub fn is_root(&self) -> bool {
        self.is_root_node(&self.node)
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Loader) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Supply the resolved object. The root supplies itself.
    pub fn get(&self) -> Supplied {
        match &self.node.supply {
            Supply::Root => Ok(Some(Arc::new(self.clone()) as Object)),
            Supply::Value(value) => value.get(),
            Supply::Failure(e) => Err(e.clone()),
        }
    }

    /// Supply the resolved object as a `T`. A null is a
    /// [`ValueError::NoSuchElement`].
    pub fn get_as<T: Any + Send + Sync>(&self) -> std::result::Result<Arc<T>, ValueError> {
        match self.get()? {
            Some(object) => self.downcast(object),
            None => Err(ValueError::no_such_element(self.absolute_path())),
        }
    }

    /// Like [`get_as`](Loader::get_as), but absence and null are `None`.
    pub fn optional<T: Any + Send + Sync>(&self) -> std::result::Result<Option<Arc<T>>, ValueError> {
        match self.get() {
            Ok(Some(object)) => self.downcast(object).map(Some),
            Ok(None) => Ok(None),
            Err(e) if e.is_absence() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn downcast<T: Any + Send + Sync>(&self, object: Object) -> std::result::Result<Arc<T>, ValueError> {
        object.downcast::<T>().map_err(|_| ValueError::Downcast {
            path: self.absolute_path().clone(),
            expected: std::any::type_name::<T>(),
        })
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("path", self.absolute_path())
            .field("qualifiers", &self.qualifiers())
            .field("deterministic", &self.node.deterministic)
            .field("in_flight", &self.in_flight.is_some())
            .finish()
    }
}
