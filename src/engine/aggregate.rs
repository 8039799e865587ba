//! Collapses a cascade timeline into before/after health, availability,
//! delay and cost figures.

use std::collections::HashSet;

use crate::catalog::ReferenceData;
use crate::core::{BeforeAfter, CascadeEvent, CostImpact, SimulationScenario};
use crate::engine::resolver::AffectedComponents;

pub const DEFAULT_BASELINE_AVAILABILITY: f64 = 85.0;
pub const DEFAULT_COST_BASE: f64 = 24_500_000.0;

const HEALTH_HORIZON_DAYS: f64 = 180.0;
const AVAILABILITY_HORIZON_DAYS: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineMetrics {
    pub health: f64,
    pub availability: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImpactMetrics {
    pub max_impact: f64,
    pub supply_chain_health: BeforeAfter,
    pub material_availability: BeforeAfter,
    pub average_delay_days: u32,
    pub cost: CostImpact,
}

/// Health before any disruption, from the static risk scores.
pub fn baseline(catalog: &ReferenceData, availability: f64) -> BaselineMetrics {
    let supplier_health = mean(catalog.suppliers.iter().map(|s| 100.0 - s.risk_score));
    let route_health = mean(catalog.routes.iter().map(|r| 100.0 - r.risk_score));

    let health = mean(supplier_health.into_iter().chain(route_health)).unwrap_or(100.0);
    BaselineMetrics {
        health,
        availability,
    }
}

pub fn aggregate(
    scenario: &SimulationScenario,
    events: &[CascadeEvent],
    baseline: BaselineMetrics,
    cost_base: f64,
) -> ImpactMetrics {
    let untouched = ImpactMetrics {
        max_impact: 0.0,
        supply_chain_health: BeforeAfter {
            before: baseline.health,
            after: baseline.health,
        },
        material_availability: BeforeAfter {
            before: baseline.availability,
            after: baseline.availability,
        },
        average_delay_days: 0,
        cost: CostImpact {
            percentage: 0,
            value: 0.0,
        },
    };

    if !events.iter().any(|event| event.phase.is_component_disruption()) {
        return untouched;
    }

    let max_impact = events
        .iter()
        .map(|event| event.impact)
        .fold(0.0_f64, f64::max)
        .clamp(0.0, 100.0);
    let duration = f64::from(scenario.duration_days());
    let weight = max_impact / 100.0;

    let health_reduction = weight * (duration / HEALTH_HORIZON_DAYS);
    let availability_reduction = weight * (duration / AVAILABILITY_HORIZON_DAYS);

    let months = f64::from(scenario.timeframe_days()) / 30.0;
    let average_delay_days = (scenario.severity() * duration / months).floor() as u32;

    let percentage = (weight * 25.0 + (duration / HEALTH_HORIZON_DAYS) * 10.0).floor() as u32;

    ImpactMetrics {
        max_impact,
        supply_chain_health: BeforeAfter {
            before: baseline.health,
            after: (baseline.health * (1.0 - health_reduction)).max(0.0),
        },
        material_availability: BeforeAfter {
            before: baseline.availability,
            after: (baseline.availability * (1.0 - availability_reduction)).max(0.0),
        },
        average_delay_days,
        cost: CostImpact {
            percentage,
            value: cost_base * f64::from(percentage) / 100.0,
        },
    }
}

/// Projects needing any material that an affected supplier makes or an
/// affected route carries, in catalog order.
pub fn affected_projects(catalog: &ReferenceData, affected: &AffectedComponents) -> Vec<String> {
    let supplier_materials = affected
        .supplier_ids
        .iter()
        .filter_map(|id| catalog.supplier(id))
        .flat_map(|supplier| supplier.materials.iter());
    let route_materials = affected
        .route_ids
        .iter()
        .filter_map(|id| catalog.route(id))
        .flat_map(|route| route.materials.iter());
    let disrupted: HashSet<&str> = supplier_materials
        .chain(route_materials)
        .map(String::as_str)
        .collect();

    if disrupted.is_empty() {
        return Vec::new();
    }

    catalog
        .projects
        .iter()
        .filter(|project| {
            project
                .required_materials
                .iter()
                .any(|material| disrupted.contains(material.as_str()))
        })
        .map(|project| project.id.clone())
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
