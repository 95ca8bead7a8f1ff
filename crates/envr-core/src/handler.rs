//! Scoring and tie-breaking between competing candidates

use std::sync::{Arc, LazyLock};

use envr_types::{Path, Qualifiers, elements_match};

use crate::{Loader, Provider, Value};

static NO_OP: LazyLock<Arc<dyn AmbiguityHandler>> = LazyLock::new(|| Arc::new(NoOpAmbiguityHandler));

/// Decides between candidate values that survive selectability.
///
/// Higher scores are better. Every method has a default, so an
/// implementation only overrides what it cares about. A handler is
/// resolved at bootstrap from `/:AmbiguityHandler`; a provider serving it
/// supplies an `Arc<dyn AmbiguityHandler>` object.
pub trait AmbiguityHandler: Send + Sync {
    /// A provider was skipped: wrong type, or it returned no value.
    fn provider_rejected(&self, _rejector: &Loader, _absolute_path: &Path, _provider: &dyn Provider) {}

    /// A provider returned a value that is not selectable.
    fn value_rejected(
        &self,
        _rejector: &Loader,
        _absolute_path: &Path,
        _provider: &dyn Provider,
        _value: &Value,
    ) {
    }

    fn score_qualifiers(&self, reference: &Qualifiers, candidate: &Qualifiers) -> i64 {
        qualifiers_score(reference, candidate)
    }

    fn score_path(&self, reference: &Path, candidate: &Path) -> i64 {
        path_score(reference, candidate)
    }

    /// Break a full tie between the current winner and a challenger.
    ///
    /// Return the winner to keep it, the challenger to promote it, `None`
    /// to drop both, or any other value to have it compete against the
    /// winner in the challenger's place.
    fn disambiguate(
        &self,
        _requestor: &Loader,
        _absolute_path: &Path,
        _winning_provider: &dyn Provider,
        _winning_value: &Value,
        _challenging_provider: &dyn Provider,
        _challenging_value: &Value,
    ) -> Option<Value> {
        None
    }
}

/// Handler that relies on every default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpAmbiguityHandler;

impl AmbiguityHandler for NoOpAmbiguityHandler {}

impl NoOpAmbiguityHandler {
    /// The shared no-op handler.
    pub fn shared() -> Arc<dyn AmbiguityHandler> {
        NO_OP.clone()
    }
}

/// Overlap between the requestor's qualifiers and a candidate's.
///
/// With `i` entries in common: `i` when the candidate is entirely
/// contained in the reference, otherwise `i` minus the symmetric
/// difference. Without overlap: minus the size of both sets.
pub fn qualifiers_score(reference: &Qualifiers, candidate: &Qualifiers) -> i64 {
    let intersection = reference.intersection_size(candidate) as i64;
    if intersection > 0 {
        if intersection == candidate.len() as i64 {
            intersection
        } else {
            intersection - reference.symmetric_difference_size(candidate) as i64
        }
    } else {
        -((reference.len() + candidate.len()) as i64)
    }
}

/// How specifically a candidate path matches the reference.
///
/// A matching suffix scores its length, plus one for each exact non-empty
/// name and one for each equal argument list. Anything else scores minus
/// the reference length.
pub fn path_score(reference: &Path, candidate: &Path) -> i64 {
    if !reference.ends_with_by(candidate, elements_match) {
        return -(reference.len() as i64);
    }
    let offset = reference.len() - candidate.len();
    let mut score = candidate.len() as i64;
    for (r, c) in reference.elements()[offset..].iter().zip(candidate.iter()) {
        if !r.name().is_empty() && r.name() == c.name() {
            score += 1;
        }
        if r.arguments().is_some() && r.arguments() == c.arguments() {
            score += 1;
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(s: &str) -> Qualifiers {
        s.parse().unwrap()
    }

    fn p(s: &str) -> Path {
        Path::parse(s).unwrap()
    }

    #[test]
    fn test_qualifiers_score() {
        let reference = q("env=prod;region=eu");
        assert_eq!(qualifiers_score(&reference, &q("env=prod")), 1);
        assert_eq!(qualifiers_score(&reference, &q("env=prod;region=eu")), 2);
        assert_eq!(qualifiers_score(&reference, &q("env=prod;tier=web")), 1 - 2);
        assert_eq!(qualifiers_score(&reference, &q("env=test")), -3);
        assert_eq!(qualifiers_score(&Qualifiers::empty(), &Qualifiers::empty()), 0);
    }

    #[test]
    fn test_more_specific_qualifiers_score_higher() {
        let reference = q("env=prod;region=eu");
        assert!(qualifiers_score(&reference, &q("env=prod;region=eu")) > qualifiers_score(&reference, &q("env=prod")));
        assert!(qualifiers_score(&reference, &q("env=prod")) > qualifiers_score(&reference, &Qualifiers::empty()));
    }

    #[test]
    fn test_path_score() {
        let reference = p("/db(int=1)/port:int");
        assert_eq!(path_score(&reference, &p(":int")), 1);
        assert_eq!(path_score(&reference, &p("port:int")), 2);
        assert_eq!(path_score(&reference, &p("db/port:int")), 4);
        assert_eq!(path_score(&reference, &p("db(int=1)/port:int")), 5);
        assert_eq!(path_score(&reference, &p("host:int")), -3);
    }
}
