use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate entity counts for the dashboard (`GET /stats`).
///
/// The server keys counts by entity name; kept as a sorted map so the
/// dashboard and CLI render them in a stable order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stats(pub BTreeMap<String, u64>);

impl Stats {
    pub fn count(&self, entity: &str) -> u64 {
        self.0.get(entity).copied().unwrap_or(0)
    }
}
