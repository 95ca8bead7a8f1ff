//! [`InstanceProvider`]: a fixed object for one type.

use std::sync::Arc;

use envr_core::{AmbiguityHandler, Loader, Object, Provider, Value, object};
use envr_types::{Path, Qualifiers, TypeDescriptor};

/// Serves `object` for every path typed exactly `ty`.
pub struct InstanceProvider {
    ty: TypeDescriptor,
    qualifiers: Qualifiers,
    object: Object,
    name: String,
}

impl InstanceProvider {
    pub fn new(ty: TypeDescriptor, object: Object) -> Self {
        Self {
            name: format!("instance:{ty}"),
            ty,
            qualifiers: Qualifiers::empty(),
            object,
        }
    }

    /// Serve fixed root qualifiers at bootstrap.
    pub fn qualifiers(qualifiers: Qualifiers) -> Self {
        Self::new(TypeDescriptor::qualifiers(), object(qualifiers))
    }

    /// Serve an ambiguity handler at bootstrap.
    pub fn ambiguity_handler(handler: Arc<dyn AmbiguityHandler>) -> Self {
        Self::new(TypeDescriptor::ambiguity_handler(), object(handler))
    }

    /// Qualify the served value.
    pub fn with_qualifiers(mut self, qualifiers: Qualifiers) -> Self {
        self.qualifiers = qualifiers;
        self
    }
}

impl Provider for InstanceProvider {
    fn upper_bound(&self) -> TypeDescriptor {
        self.ty.clone()
    }

    fn get(&self, _requestor: &Loader, absolute_path: &Path) -> Option<Value> {
        if absolute_path.ty() != &self.ty {
            return None;
        }
        Some(Value::of(
            self.qualifiers.clone(),
            Path::of_type(self.ty.clone()),
            self.object.clone(),
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
