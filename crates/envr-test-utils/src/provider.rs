//! Test providers.
//!
//! Realism levels:
//! - [`FixedProvider`]: STATIC, one prepared value for every request
//! - [`FnProvider`]: SCRIPTED, a closure decides per request
//! - [`ReentrantProvider`]: RECURSIVE, asks the engine for the path it is
//!   serving before answering

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use envr_core::{Loader, Provider, Supplied, Value, object};
use envr_types::{Path, TypeDescriptor};

/// Serves the same value for every path its upper bound accepts.
pub struct FixedProvider {
    name: String,
    upper_bound: TypeDescriptor,
    value: Value,
    calls: AtomicUsize,
}

impl FixedProvider {
    pub fn new(name: &str, upper_bound: TypeDescriptor, value: Value) -> Self {
        Self {
            name: name.to_string(),
            upper_bound,
            value,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times the engine asked this provider for a value.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The exact value this provider hands out.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Provider for FixedProvider {
    fn upper_bound(&self) -> TypeDescriptor {
        self.upper_bound.clone()
    }

    fn get(&self, _requestor: &Loader, _absolute_path: &Path) -> Option<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Some(self.value.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

type ProviderFn = dyn Fn(&Loader, &Path) -> Option<Value> + Send + Sync;

/// Delegates every request to a closure.
pub struct FnProvider {
    name: String,
    upper_bound: TypeDescriptor,
    f: Box<ProviderFn>,
}

impl FnProvider {
    pub fn new<F>(name: &str, upper_bound: TypeDescriptor, f: F) -> Self
    where
        F: Fn(&Loader, &Path) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            upper_bound,
            f: Box::new(f),
        }
    }
}

impl Provider for FnProvider {
    fn upper_bound(&self) -> TypeDescriptor {
        self.upper_bound.clone()
    }

    fn get(&self, requestor: &Loader, absolute_path: &Path) -> Option<Value> {
        (self.f)(requestor, absolute_path)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Serves `int` paths by loading the same path again and adding one.
///
/// The nested request must skip this provider, so whatever the remaining
/// providers offer (plus one) is the answer. Without another provider the
/// supplier fails with the nested request's error.
pub struct ReentrantProvider {
    calls: Arc<AtomicUsize>,
}

impl Default for ReentrantProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ReentrantProvider {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Provider for ReentrantProvider {
    fn upper_bound(&self) -> TypeDescriptor {
        TypeDescriptor::int()
    }

    fn get(&self, requestor: &Loader, absolute_path: &Path) -> Option<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let inner = requestor.load(absolute_path).ok()?.downgrade();
        let value_path = Path::of(absolute_path.last().clone()).ok()?;
        Some(Value::new(
            requestor.qualifiers(),
            value_path,
            move || -> Supplied {
                let n = inner.try_upgrade()?.get_as::<i32>()?;
                Ok(Some(object(*n + 1)))
            },
        ))
    }

    fn name(&self) -> &str {
        "reentrant"
    }
}
