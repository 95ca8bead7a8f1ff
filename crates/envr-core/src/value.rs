//! Deferred, qualified, optionally defaulted results

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use envr_types::{Path, Qualifiers};

use crate::ValueError;

/// A type-erased environmental object.
pub type Object = Arc<dyn Any + Send + Sync>;

/// What a [`Supplier`] hands back: an object, `None` for null, or a failure.
pub type Supplied = std::result::Result<Option<Object>, ValueError>;

/// Produces objects on demand.
///
/// Implemented for every `Fn() -> Supplied` closure, so most suppliers are
/// written inline.
pub trait Supplier: Send + Sync {
    fn get(&self) -> Supplied;
}

impl<F> Supplier for F
where
    F: Fn() -> Supplied + Send + Sync,
{
    fn get(&self) -> Supplied {
        self()
    }
}

/// Wrap any value as an [`Object`].
pub fn object<T: Any + Send + Sync>(value: T) -> Object {
    Arc::new(value)
}

/// The result of a provider: a deferred supplier tagged with the qualifiers
/// and (usually relative) path it is suitable for.
///
/// A value may carry a `defaults` supplier. When the primary fails with
/// [`ValueError::NoSuchElement`] or [`ValueError::Unsupported`] (or returns
/// null while nulls are not permitted) the defaults take over. A
/// deterministic value switches over permanently; a non-deterministic one
/// retries the primary on every call. A failure from the defaults
/// themselves always propagates.
///
/// Cloning shares the same supplier allocation; see [`Value::ptr_eq`].
#[derive(Clone)]
pub struct Value {
    inner: Arc<Inner>,
}

struct Inner {
    qualifiers: Qualifiers,
    path: Path,
    nulls_permitted: bool,
    deterministic: bool,
    primary: Arc<dyn Supplier>,
    defaults: Option<Arc<dyn Supplier>>,
    /// Set once a deterministic value has fallen back to its defaults.
    switched: AtomicBool,
}

/// Builder for [`Value`]
pub struct ValueBuilder {
    qualifiers: Qualifiers,
    path: Path,
    primary: Arc<dyn Supplier>,
    defaults: Option<Arc<dyn Supplier>>,
    nulls_permitted: bool,
    deterministic: bool,
}

impl ValueBuilder {
    pub fn nulls_permitted(mut self, nulls_permitted: bool) -> Self {
        self.nulls_permitted = nulls_permitted;
        self
    }

    pub fn deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    pub fn defaults(mut self, defaults: impl Supplier + 'static) -> Self {
        self.defaults = Some(Arc::new(defaults));
        self
    }

    pub fn build(self) -> Value {
        Value {
            inner: Arc::new(Inner {
                qualifiers: self.qualifiers,
                path: self.path,
                nulls_permitted: self.nulls_permitted,
                deterministic: self.deterministic,
                primary: self.primary,
                defaults: self.defaults,
                switched: AtomicBool::new(false),
            }),
        }
    }
}

impl Value {
    /// Start building a value. Nulls are permitted and the value is
    /// non-deterministic unless configured otherwise.
    pub fn builder(qualifiers: Qualifiers, path: Path, supplier: impl Supplier + 'static) -> ValueBuilder {
        ValueBuilder {
            qualifiers,
            path,
            primary: Arc::new(supplier),
            defaults: None,
            nulls_permitted: true,
            deterministic: false,
        }
    }

    /// A non-deterministic value that permits nulls.
    pub fn new(qualifiers: Qualifiers, path: Path, supplier: impl Supplier + 'static) -> Self {
        Self::builder(qualifiers, path, supplier).build()
    }

    /// A deterministic value that always supplies `object`.
    pub fn of(qualifiers: Qualifiers, path: Path, object: Object) -> Self {
        Self::builder(qualifiers, path, move || -> Supplied { Ok(Some(object.clone())) })
            .deterministic(true)
            .build()
    }

    /// `winner`'s metadata and supplier, with `loser` as its defaults.
    pub fn with_fallback(winner: &Value, loser: &Value) -> Self {
        Self {
            inner: Arc::new(Inner {
                qualifiers: winner.inner.qualifiers.clone(),
                path: winner.inner.path.clone(),
                nulls_permitted: winner.inner.nulls_permitted,
                deterministic: winner.inner.deterministic,
                primary: Arc::new(winner.clone()),
                defaults: Some(Arc::new(loser.clone())),
                switched: AtomicBool::new(false),
            }),
        }
    }

    pub fn qualifiers(&self) -> &Qualifiers {
        &self.inner.qualifiers
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    pub fn nulls_permitted(&self) -> bool {
        self.inner.nulls_permitted
    }

    pub fn is_deterministic(&self) -> bool {
        self.inner.deterministic
    }

    pub fn has_defaults(&self) -> bool {
        self.inner.defaults.is_some()
    }

    /// Whether both values share the same supplier allocation.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Supply the object, falling back to the defaults where allowed.
    pub fn get(&self) -> Supplied {
        let inner = &*self.inner;
        let Some(defaults) = &inner.defaults else {
            return inner.primary.get();
        };

        if inner.deterministic && inner.switched.load(Ordering::Acquire) {
            return defaults.get();
        }

        match inner.primary.get() {
            Ok(Some(object)) => Ok(Some(object)),
            Ok(None) if inner.nulls_permitted => Ok(None),
            Ok(None) => self.fall_back(defaults),
            Err(e) if e.is_absence() => {
                tracing::trace!(path = %inner.path, error = %e, "falling back to defaults");
                self.fall_back(defaults)
            }
            Err(e) => Err(e),
        }
    }

    fn fall_back(&self, defaults: &Arc<dyn Supplier>) -> Supplied {
        if self.inner.deterministic {
            self.inner.switched.store(true, Ordering::Release);
        }
        defaults.get()
    }
}

impl Supplier for Value {
    fn get(&self) -> Supplied {
        Value::get(self)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("qualifiers", &self.inner.qualifiers)
            .field("path", &self.inner.path)
            .field("nulls_permitted", &self.inner.nulls_permitted)
            .field("deterministic", &self.inner.deterministic)
            .field("defaults", &self.inner.defaults.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn path() -> Path {
        Path::parse("port:int").unwrap()
    }

    fn counting(calls: Arc<AtomicUsize>, result: fn(usize) -> Supplied) -> impl Supplier {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            result(n)
        }
    }

    fn int(v: i32) -> Supplied {
        Ok(Some(object(v)))
    }

    fn read(value: &Value) -> Option<i32> {
        value
            .get()
            .unwrap()
            .map(|o| *o.downcast::<i32>().unwrap())
    }

    #[test]
    fn test_of_is_deterministic() {
        let value = Value::of(Qualifiers::empty(), path(), object(7i32));
        assert!(value.is_deterministic());
        assert_eq!(read(&value), Some(7));
    }

    #[test]
    fn test_no_defaults_passes_failure_through() {
        let value = Value::new(Qualifiers::empty(), path(), || -> Supplied {
            Err(ValueError::unsupported("nope"))
        });
        assert!(matches!(value.get(), Err(ValueError::Unsupported { .. })));
    }

    #[test]
    fn test_deterministic_switch_is_sticky() {
        let calls = Arc::new(AtomicUsize::new(0));
        let value = Value::builder(
            Qualifiers::empty(),
            path(),
            counting(calls.clone(), |_| Err(ValueError::unsupported("primary"))),
        )
        .deterministic(true)
        .defaults(|| int(1))
        .build();

        assert_eq!(read(&value), Some(1));
        assert_eq!(read(&value), Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_non_deterministic_retries_primary() {
        let calls = Arc::new(AtomicUsize::new(0));
        let value = Value::builder(
            Qualifiers::empty(),
            path(),
            counting(calls.clone(), |n| if n == 0 { Err(ValueError::unsupported("cold")) } else { int(2) }),
        )
        .defaults(|| int(1))
        .build();

        assert_eq!(read(&value), Some(1));
        assert_eq!(read(&value), Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_null_falls_back_only_when_nulls_forbidden() {
        let permissive = Value::builder(Qualifiers::empty(), path(), || -> Supplied { Ok(None) })
            .defaults(|| int(1))
            .build();
        assert_eq!(read(&permissive), None);

        let strict = Value::builder(Qualifiers::empty(), path(), || -> Supplied { Ok(None) })
            .nulls_permitted(false)
            .defaults(|| int(1))
            .build();
        assert_eq!(read(&strict), Some(1));
    }

    #[test]
    fn test_other_failures_do_not_fall_back() {
        let value = Value::builder(Qualifiers::empty(), path(), || -> Supplied {
            Err(ValueError::provider("test", "boom"))
        })
        .defaults(|| int(1))
        .build();
        assert!(matches!(value.get(), Err(ValueError::Provider { .. })));
    }

    #[test]
    fn test_defaults_failure_propagates() {
        let value = Value::builder(Qualifiers::empty(), path(), || -> Supplied {
            Err(ValueError::unsupported("primary"))
        })
        .defaults(|| -> Supplied { Err(ValueError::unsupported("defaults")) })
        .build();
        assert_eq!(value.get().unwrap_err(), ValueError::unsupported("defaults"));
    }

    #[test]
    fn test_with_fallback_keeps_winner_metadata() {
        let winner = Value::new(Qualifiers::single("env", "prod"), path(), || -> Supplied {
            Err(ValueError::unsupported("gone"))
        });
        let loser = Value::of(Qualifiers::empty(), Path::parse(":int").unwrap(), object(3i32));
        let merged = Value::with_fallback(&winner, &loser);

        assert_eq!(merged.qualifiers(), winner.qualifiers());
        assert_eq!(merged.path(), winner.path());
        assert!(!merged.ptr_eq(&winner));
        assert_eq!(read(&merged), Some(3));
    }
}
