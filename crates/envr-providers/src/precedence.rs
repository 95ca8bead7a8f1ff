//! [`PrecedenceHandler`]: registration order breaks ties.

use envr_core::{AmbiguityHandler, Loader, Provider, Value};
use envr_types::Path;

/// Keeps the current winner on a tie, so the provider registered first
/// wins and later ones become its defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecedenceHandler;

impl AmbiguityHandler for PrecedenceHandler {
    fn disambiguate(
        &self,
        _requestor: &Loader,
        absolute_path: &Path,
        winning_provider: &dyn Provider,
        winning_value: &Value,
        challenging_provider: &dyn Provider,
        _challenging_value: &Value,
    ) -> Option<Value> {
        tracing::debug!(
            path = %absolute_path,
            winner = winning_provider.name(),
            challenger = challenging_provider.name(),
            "tie resolved by precedence"
        );
        Some(winning_value.clone())
    }
}
