//! Shared scenario store
//!
//! Holds scenarios behind a concurrent map for callers that expose the engine to
//! more than one writer. A mutation holds the entry's write lock for the whole
//! read-modify-redistribute-write sequence, so at most one mutation per scenario
//! is in flight and readers only ever see committed snapshots.

use crate::error::{PlanError, PlanResult};
use chrono::Utc;
use dashmap::DashMap;
use masterplan_types::Scenario;
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct ScenarioStore {
    scenarios: DashMap<String, Scenario>,
}

impl ScenarioStore {
    pub fn new() -> Self {
        Self { scenarios: DashMap::new() }
    }

    /// Stores `scenario` under its id, returning the one it replaced
    pub fn insert(&self, scenario: Scenario) -> Option<Scenario> {
        info!(scenario_id = %scenario.id, "Storing scenario");
        self.scenarios.insert(scenario.id.clone(), scenario)
    }

    /// Snapshot of the committed scenario
    pub fn get(&self, scenario_id: &str) -> Option<Scenario> {
        self.scenarios.get(scenario_id).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, scenario_id: &str) -> Option<Scenario> {
        self.scenarios.remove(scenario_id).map(|(_, scenario)| scenario)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Replaces a scenario with `apply(current)` as one unit and stamps it.
    ///
    /// `apply` runs while the entry is locked; it must not touch the store.
    pub fn mutate<F>(&self, scenario_id: &str, apply: F) -> PlanResult<Scenario>
    where
        F: FnOnce(&Scenario) -> Scenario,
    {
        let mut entry = self
            .scenarios
            .get_mut(scenario_id)
            .ok_or_else(|| PlanError::ScenarioNotFound { scenario_id: scenario_id.to_string() })?;

        let mut next = apply(entry.value());
        // identity is the map key and cannot change under it
        next.id = scenario_id.to_string();
        next.timestamp = Utc::now();
        *entry.value_mut() = next.clone();

        info!(scenario_id, allocations = next.allocations.len(), "Committed scenario mutation");
        Ok(next)
    }

    /// Like [`mutate`](Self::mutate) for edits that can be rejected. A rejected
    /// edit leaves the stored scenario untouched.
    pub fn try_mutate<F, E>(&self, scenario_id: &str, apply: F) -> PlanResult<Result<Scenario, E>>
    where
        F: FnOnce(&Scenario) -> Result<Scenario, E>,
    {
        let mut entry = self
            .scenarios
            .get_mut(scenario_id)
            .ok_or_else(|| PlanError::ScenarioNotFound { scenario_id: scenario_id.to_string() })?;

        match apply(entry.value()) {
            Ok(mut next) => {
                next.id = scenario_id.to_string();
                next.timestamp = Utc::now();
                *entry.value_mut() = next.clone();
                info!(scenario_id, "Committed scenario mutation");
                Ok(Ok(next))
            }
            Err(err) => {
                debug!(scenario_id, "Scenario mutation rejected");
                Ok(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LandUseLibrary;
    use crate::rebalancer::AllocationRebalancer;
    use crate::scenario::default_scenario;
    use std::sync::Arc;
    use std::thread;

    fn store_with_default() -> ScenarioStore {
        let store = ScenarioStore::new();
        store.insert(default_scenario(LandUseLibrary::built_in()));
        store
    }

    #[test]
    fn mutate_replaces_and_stamps() {
        let store = store_with_default();
        let before = store.get("default").unwrap();
        let rebalancer = AllocationRebalancer::default();

        let after = store.mutate("default", |s| rebalancer.toggle_lock(s, "res_landed")).unwrap();

        assert!(after.allocation("res_landed").unwrap().locked);
        assert!(after.timestamp >= before.timestamp);
        assert_eq!(store.get("default").unwrap(), after);
    }

    #[test]
    fn missing_scenario_is_reported() {
        let store = ScenarioStore::new();
        let err = store.mutate("nope", Scenario::clone).unwrap_err();
        assert!(matches!(err, PlanError::ScenarioNotFound { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn rejected_mutation_keeps_the_stored_scenario() {
        let store = store_with_default();
        let before = store.get("default").unwrap();
        let outcome = store.try_mutate("default", |_| Err::<Scenario, &str>("rejected")).unwrap();
        assert_eq!(outcome, Err("rejected"));
        assert_eq!(store.get("default").unwrap(), before);
    }

    #[test]
    fn concurrent_toggles_are_serialised() {
        let store = Arc::new(store_with_default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let rebalancer = AllocationRebalancer::default();
                    for _ in 0..25 {
                        store.mutate("default", |s| rebalancer.toggle_lock(s, "res_landed")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // 200 flips, no lost updates
        assert!(!store.get("default").unwrap().allocation("res_landed").unwrap().locked);
    }
}
