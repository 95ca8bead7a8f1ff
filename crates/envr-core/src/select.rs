//! Selectability: the filters a candidate passes before it is scored

use envr_types::{Path, Qualifiers, elements_match};

use crate::{Provider, Value};

/// A provider is selectable when its upper bound accepts the path's type.
pub fn is_provider_selectable(provider: &dyn Provider, absolute_path: &Path) -> bool {
    provider.upper_bound().is_assignable_from(absolute_path.ty())
}

/// Either side empty, or at least one entry in common.
pub fn are_qualifiers_selectable(reference: &Qualifiers, candidate: &Qualifiers) -> bool {
    reference.is_empty() || candidate.is_empty() || reference.intersection_size(candidate) > 0
}

/// A value is selectable when its qualifiers overlap the requestor's and
/// the absolute path ends with the value's path under [`elements_match`].
pub fn is_value_selectable(qualifiers: &Qualifiers, absolute_path: &Path, value: &Value) -> bool {
    are_qualifiers_selectable(qualifiers, value.qualifiers())
        && absolute_path.ends_with_by(value.path(), elements_match)
}
