//! Resolution nodes and the in-flight provider context

use std::sync::{Arc, OnceLock};

use envr_types::{Path, Qualifiers};

use crate::{AmbiguityHandler, NoOpAmbiguityHandler, Value, ValueError};

/// Cache key: the requesting node's qualifiers and the absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct NodeKey {
    pub(crate) qualifiers: Qualifiers,
    pub(crate) path: Path,
}

/// What a node hands out from `get()`.
pub(crate) enum Supply {
    /// The root supplies its own loader.
    Root,
    Value(Value),
    /// Fails identically on every call.
    Failure(ValueError),
}

/// One immutable unit of resolution state.
///
/// Nodes live in the engine cache; a node names its parent by key rather
/// than holding it, so the arena never forms ownership cycles.
pub(crate) struct Node {
    pub(crate) key: NodeKey,
    pub(crate) parent: NodeKey,
    /// Unset on the root until bootstrap completes.
    qualifiers: OnceLock<Qualifiers>,
    handler: OnceLock<Arc<dyn AmbiguityHandler>>,
    pub(crate) supply: Supply,
    pub(crate) deterministic: bool,
}

impl Node {
    pub(crate) fn root() -> Self {
        let key = NodeKey {
            qualifiers: Qualifiers::empty(),
            path: Path::root(),
        };
        Self {
            parent: key.clone(),
            key,
            qualifiers: OnceLock::new(),
            handler: OnceLock::new(),
            supply: Supply::Root,
            deterministic: true,
        }
    }

    pub(crate) fn resolved(
        key: NodeKey,
        parent: NodeKey,
        handler: Arc<dyn AmbiguityHandler>,
        supply: Supply,
        deterministic: bool,
    ) -> Self {
        let qualifiers = key.qualifiers.clone();
        Self {
            key,
            parent,
            qualifiers: OnceLock::from(qualifiers),
            handler: OnceLock::from(handler),
            supply,
            deterministic,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.key.path
    }

    pub(crate) fn qualifiers(&self) -> Qualifiers {
        self.qualifiers.get().cloned().unwrap_or_default()
    }

    pub(crate) fn ambiguity_handler(&self) -> Arc<dyn AmbiguityHandler> {
        self.handler
            .get()
            .cloned()
            .unwrap_or_else(NoOpAmbiguityHandler::shared)
    }

    // Bootstrap only; later calls are ignored.
    pub(crate) fn set_qualifiers(&self, qualifiers: Qualifiers) {
        let _ = self.qualifiers.set(qualifiers);
    }

    pub(crate) fn set_handler(&self, handler: Arc<dyn AmbiguityHandler>) {
        let _ = self.handler.set(handler);
    }
}

/// Providers currently producing a value, innermost first.
///
/// Carried by the [`Loader`](crate::Loader) handed to a provider, so a
/// nested request can tell which provider is already working on a path.
pub(crate) struct InFlight {
    pub(crate) path: Path,
    pub(crate) provider: usize,
    pub(crate) next: Option<Arc<InFlight>>,
}

impl InFlight {
    /// The provider on top of `path`'s stack, if any.
    pub(crate) fn top_for(mut entry: &InFlight, path: &Path) -> Option<usize> {
        loop {
            if entry.path == *path {
                return Some(entry.provider);
            }
            entry = entry.next.as_deref()?;
        }
    }
}
