//! [`RecordingHandler`]: an ambiguity handler that remembers every callback.

use envr_core::{AmbiguityHandler, Loader, Provider, Value, object};
use envr_types::Path;
use parking_lot::Mutex;

/// What [`RecordingHandler`] answers when asked to disambiguate.
#[derive(Debug, Clone)]
pub enum Decision {
    DropBoth,
    KeepWinner,
    PromoteChallenger,
    /// Return this value (a new candidate) every time.
    Synthesize(Value),
    /// Return a brand new candidate that ties with the winner, forever.
    Endless,
}

/// One observed callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ProviderRejected { path: String, provider: String },
    ValueRejected { path: String, provider: String },
    Disambiguated { path: String, winner: String, challenger: String },
}

/// Records callbacks and disambiguates according to a fixed [`Decision`].
///
/// Scoring uses the defaults.
pub struct RecordingHandler {
    decision: Decision,
    events: Mutex<Vec<Event>>,
}

impl RecordingHandler {
    pub fn new(decision: Decision) -> Self {
        Self {
            decision,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn disambiguations(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, Event::Disambiguated { .. }))
            .count()
    }
}

impl AmbiguityHandler for RecordingHandler {
    fn provider_rejected(&self, _rejector: &Loader, absolute_path: &Path, provider: &dyn Provider) {
        self.events.lock().push(Event::ProviderRejected {
            path: absolute_path.to_string(),
            provider: provider.name().to_string(),
        });
    }

    fn value_rejected(&self, _rejector: &Loader, absolute_path: &Path, provider: &dyn Provider, _value: &Value) {
        self.events.lock().push(Event::ValueRejected {
            path: absolute_path.to_string(),
            provider: provider.name().to_string(),
        });
    }

    fn disambiguate(
        &self,
        _requestor: &Loader,
        absolute_path: &Path,
        winning_provider: &dyn Provider,
        winning_value: &Value,
        challenging_provider: &dyn Provider,
        challenging_value: &Value,
    ) -> Option<Value> {
        self.events.lock().push(Event::Disambiguated {
            path: absolute_path.to_string(),
            winner: winning_provider.name().to_string(),
            challenger: challenging_provider.name().to_string(),
        });
        match &self.decision {
            Decision::DropBoth => None,
            Decision::KeepWinner => Some(winning_value.clone()),
            Decision::PromoteChallenger => Some(challenging_value.clone()),
            Decision::Synthesize(value) => Some(value.clone()),
            Decision::Endless => Some(Value::of(
                winning_value.qualifiers().clone(),
                winning_value.path().clone(),
                object(0i32),
            )),
        }
    }
}
