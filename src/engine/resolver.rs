//! Works out which suppliers, routes and countries a scenario touches.

use std::collections::HashSet;

use crate::core::{SimulationScenario, Supplier, TransportRoute};
use crate::engine::SimulationError;

/// Insertion-ordered set of ids. Iteration order is the order entries were
/// first added, which fixes the order of cascade events downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedIds {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedIds {
    pub fn insert(&mut self, id: &str) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        self.seen.insert(id.to_string());
        self.order.push(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.order.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AffectedComponents {
    pub supplier_ids: OrderedIds,
    pub route_ids: OrderedIds,
    pub countries: OrderedIds,
}

impl AffectedComponents {
    pub fn is_empty(&self) -> bool {
        self.supplier_ids.is_empty() && self.route_ids.is_empty()
    }
}

pub fn resolve(
    scenario: &SimulationScenario,
    suppliers: &[Supplier],
    routes: &[TransportRoute],
) -> Result<AffectedComponents, SimulationError> {
    let mut affected = AffectedComponents::default();

    for id in scenario.supplier_ids() {
        let supplier = suppliers
            .iter()
            .find(|supplier| &supplier.id == id)
            .ok_or_else(|| SimulationError::UnknownSupplier(id.clone()))?;
        affected.supplier_ids.insert(&supplier.id);
        affected.countries.insert(&supplier.country);
    }

    for region in scenario.regions() {
        for supplier in suppliers {
            if region.contains(&supplier.location) {
                affected.supplier_ids.insert(&supplier.id);
                affected.countries.insert(&supplier.country);
            }
        }

        for route in routes {
            if !scenario.mode_allowed(route.mode) {
                continue;
            }
            // Either end inside the region is enough.
            if route.endpoints().iter().any(|point| region.contains(point)) {
                affected.route_ids.insert(&route.id);
            }
        }
    }

    tracing::debug!(
        "resolved {} suppliers, {} routes across {} countries",
        affected.supplier_ids.len(),
        affected.route_ids.len(),
        affected.countries.len()
    );

    Ok(affected)
}
