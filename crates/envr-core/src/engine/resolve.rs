//! Candidate computation: filtering, scoring and disambiguation

use std::sync::Arc;

use envr_types::{Path, Qualifiers};

use super::loader::Loader;
use super::node::{Node, NodeKey, Supply};
use crate::provider::provider_id;
use crate::select::{is_provider_selectable, is_value_selectable};
use crate::{AmbiguityHandler, Provider, Value, ValueError};

/// A freshly computed node, and whether a provider was skipped because it
/// was already producing the same path further up the call chain.
pub(super) struct Resolution {
    pub(super) node: Node,
    pub(super) reentrant: bool,
}

/// The running winner.
struct Candidate {
    provider: Arc<dyn Provider>,
    value: Value,
    qualifiers_score: i64,
    path_score: i64,
}

/// Everything one computation needs; `requestor` is the node the new
/// node will be parented to.
struct Contest<'a> {
    requestor: &'a Loader,
    qualifiers: &'a Qualifiers,
    absolute_path: &'a Path,
    handler: &'a dyn AmbiguityHandler,
    max_rounds: Option<usize>,
    rounds: usize,
}

impl Loader {
    /// Compute the node for `key` on behalf of this (requesting) loader.
    pub(super) fn resolve(&self, key: NodeKey) -> Resolution {
        let absolute_path = &key.path;
        let handler = self.ambiguity_handler();
        let qualifiers = self.qualifiers();
        let in_flight = self.in_flight_for(absolute_path);

        let mut contest = Contest {
            requestor: self,
            qualifiers: &qualifiers,
            absolute_path,
            handler: handler.as_ref(),
            max_rounds: self.shared().settings.max_disambiguation_rounds,
            rounds: 0,
        };

        let mut reentrant = false;
        let mut winner: Option<Candidate> = None;
        let mut failure: Option<ValueError> = None;

        for provider in &self.shared().providers {
            if in_flight == Some(provider_id(provider)) {
                tracing::debug!(path = %absolute_path, provider = provider.name(), "skipping reentrant provider");
                reentrant = true;
                continue;
            }
            if !is_provider_selectable(provider.as_ref(), absolute_path) {
                tracing::debug!(path = %absolute_path, provider = provider.name(), "provider type not selectable");
                handler.provider_rejected(self, absolute_path, provider.as_ref());
                continue;
            }

            let Some(value) = provider.get(&self.entering(absolute_path, provider), absolute_path) else {
                tracing::debug!(path = %absolute_path, provider = provider.name(), "provider returned no value");
                handler.provider_rejected(self, absolute_path, provider.as_ref());
                continue;
            };
            if !is_value_selectable(&qualifiers, absolute_path, &value) {
                tracing::debug!(
                    path = %absolute_path,
                    provider = provider.name(),
                    value_path = %value.path(),
                    value_qualifiers = %value.qualifiers(),
                    "value not selectable"
                );
                handler.value_rejected(self, absolute_path, provider.as_ref(), &value);
                continue;
            }

            winner = match winner.take() {
                None => Some(contest.score(provider.clone(), value)),
                Some(current) => match contest.challenge(current, provider.clone(), value) {
                    Ok(next) => next,
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                },
            };
        }

        let (supply, deterministic) = match (failure, winner) {
            (Some(e), _) => (Supply::Failure(e), true),
            (None, Some(candidate)) => {
                tracing::debug!(
                    path = %absolute_path,
                    provider = candidate.provider.name(),
                    "resolved"
                );
                let deterministic = candidate.value.is_deterministic();
                (Supply::Value(candidate.value), deterministic)
            }
            (None, None) => {
                tracing::debug!(path = %absolute_path, "no selectable value");
                (Supply::Failure(ValueError::no_such_element(absolute_path)), true)
            }
        };

        let parent = self.node().key.clone();
        Resolution {
            node: Node::resolved(key, parent, handler, supply, deterministic),
            reentrant,
        }
    }
}

impl Contest<'_> {
    fn score(&self, provider: Arc<dyn Provider>, value: Value) -> Candidate {
        Candidate {
            qualifiers_score: self.handler.score_qualifiers(self.qualifiers, value.qualifiers()),
            path_score: self.handler.score_path(self.absolute_path, value.path()),
            provider,
            value,
        }
    }

    /// Pit `value` against the running winner.
    ///
    /// `Ok(None)` means the handler dropped both.
    fn challenge(
        &mut self,
        mut current: Candidate,
        provider: Arc<dyn Provider>,
        mut value: Value,
    ) -> Result<Option<Candidate>, ValueError> {
        loop {
            let challenger = self.score(provider.clone(), value);

            let order = current
                .qualifiers_score
                .cmp(&challenger.qualifiers_score)
                .then(current.path_score.cmp(&challenger.path_score));
            match order {
                std::cmp::Ordering::Greater => {
                    current.value = Value::with_fallback(&current.value, &challenger.value);
                    return Ok(Some(current));
                }
                std::cmp::Ordering::Less => {
                    tracing::debug!(
                        path = %self.absolute_path,
                        from = current.provider.name(),
                        to = challenger.provider.name(),
                        "winner replaced"
                    );
                    return Ok(Some(Candidate {
                        value: Value::with_fallback(&challenger.value, &current.value),
                        ..challenger
                    }));
                }
                std::cmp::Ordering::Equal => {}
            }

            let decided = self.handler.disambiguate(
                self.requestor,
                self.absolute_path,
                current.provider.as_ref(),
                &current.value,
                challenger.provider.as_ref(),
                &challenger.value,
            );
            let Some(decided) = decided else {
                tracing::debug!(path = %self.absolute_path, "disambiguation dropped both candidates");
                return Ok(None);
            };
            if decided.ptr_eq(&current.value) {
                current.value = Value::with_fallback(&current.value, &challenger.value);
                return Ok(Some(current));
            }
            if decided.ptr_eq(&challenger.value) {
                return Ok(Some(Candidate {
                    value: Value::with_fallback(&challenger.value, &current.value),
                    ..challenger
                }));
            }

            self.rounds += 1;
            if self.max_rounds.is_some_and(|max| self.rounds > max) {
                tracing::warn!(path = %self.absolute_path, rounds = self.rounds - 1, "disambiguation did not settle");
                return Err(ValueError::DisambiguationExhausted {
                    path: self.absolute_path.clone(),
                    rounds: self.rounds - 1,
                });
            }
            if !is_value_selectable(self.qualifiers, self.absolute_path, &decided) {
                tracing::debug!(
                    path = %self.absolute_path,
                    value_path = %decided.path(),
                    value_qualifiers = %decided.qualifiers(),
                    "synthesized value not selectable"
                );
                self.handler
                    .value_rejected(self.requestor, self.absolute_path, provider.as_ref(), &decided);
                return Ok(Some(current));
            }
            value = decided;
        }
    }
}
