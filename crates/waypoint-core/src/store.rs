//! In-memory keyed collection of plans.
//!
//! The store owns the canonical copy of every plan. Updates replace a whole
//! [`Plan`] value at once, so readers never see a half-applied change.

use std::collections::BTreeMap;

use crate::models::{Plan, PlanFilter};

/// Plans keyed by id, iterated in id order.
#[derive(Debug, Default)]
pub struct PlanStore {
    plans: BTreeMap<u64, Plan>,
    last_id: u64,
}

impl PlanStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next plan id. Ids start at 1 and are never reused.
    pub fn allocate_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    /// Insert a plan under its own id, returning any plan it replaced.
    pub fn insert(&mut self, plan: Plan) -> Option<Plan> {
        self.last_id = self.last_id.max(plan.id);
        self.plans.insert(plan.id, plan)
    }

    /// Retrieves a plan by its ID.
    pub fn get(&self, id: u64) -> Option<&Plan> {
        self.plans.get(&id)
    }

    /// Swap in a new value for an existing plan. Returns `false`, and stores
    /// nothing, when no plan with that id exists.
    pub fn replace(&mut self, plan: Plan) -> bool {
        match self.plans.get_mut(&plan.id) {
            Some(slot) => {
                *slot = plan;
                true
            }
            None => false,
        }
    }

    /// Removes a plan, returning it.
    pub fn remove(&mut self, id: u64) -> Option<Plan> {
        self.plans.remove(&id)
    }

    /// Plans matching the filter, in id order.
    pub fn list(&self, filter: &PlanFilter) -> Vec<&Plan> {
        self.plans.values().filter(|plan| filter.matches(plan)).collect()
    }

    /// All plans in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Plan> {
        self.plans.values()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
