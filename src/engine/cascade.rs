//! Tiered propagation of a disruption into a day-indexed event timeline.
//!
//! The network is modelled as exactly three supplier tiers. Propagation walks
//! them once, interleaves route disruptions between tier 1 and tier 2, then
//! closes with the project, cost and recovery phases. It never recurses.

use crate::catalog::ReferenceData;
use crate::core::{
    AffectedRoute, AffectedSupplier, CascadeEvent, CascadePhase, SimulationScenario, Supplier,
};
use crate::engine::impact::{self, OverlapPolicy};
use crate::engine::resolver::AffectedComponents;
use crate::engine::SimulationError;

pub const TIERS: [u8; 3] = [1, 2, 3];

/// Percent of the disruption duration at which each phase lands.
const TIER_OFFSETS: [u32; 3] = [10, 20, 30];
const TRANSPORT_OFFSET: u32 = 15;
const PROJECT_OFFSET: u32 = 50;
const COST_OFFSET: u32 = 70;
const RECOVERY_OFFSET: u32 = 90;

#[derive(Debug, Clone, PartialEq)]
pub struct CascadeOutcome {
    pub events: Vec<CascadeEvent>,
    /// Number of tiers with at least one affected supplier (0-3).
    pub depth: u8,
    pub affected_suppliers: Vec<AffectedSupplier>,
    pub affected_routes: Vec<AffectedRoute>,
}

impl CascadeOutcome {
    pub fn total_impact(&self) -> f64 {
        self.affected_suppliers.iter().map(|s| s.impact).sum()
    }
}

pub fn propagate(
    scenario: &SimulationScenario,
    affected: &AffectedComponents,
    catalog: &ReferenceData,
    overlap: OverlapPolicy,
) -> Result<CascadeOutcome, SimulationError> {
    let severity = scenario.severity_pct();
    let duration = scenario.duration_days();

    let suppliers = lookup_suppliers(affected, catalog)?;
    let mut events = Vec::with_capacity(4 + suppliers.len() + affected.route_ids.len());
    let mut depth = 0u8;

    events.push(CascadeEvent::new(
        0,
        CascadePhase::InitialDisruption,
        severity,
        format!(
            "Initial {} disruption at {:.0}% severity",
            scenario.disruption_type(),
            severity
        ),
    ));

    for (index, tier) in TIERS.iter().copied().enumerate() {
        let day = day_at(duration, TIER_OFFSETS[index]);
        let in_tier: Vec<&Supplier> = suppliers
            .iter()
            .copied()
            .filter(|supplier| supplier.tier == tier)
            .collect();
        if !in_tier.is_empty() {
            depth += 1;
        }

        for supplier in in_tier {
            events.push(
                CascadeEvent::new(
                    day,
                    CascadePhase::SupplierDisrupted { tier },
                    (supplier.risk_score + severity * 0.5).min(100.0),
                    format!("Tier {tier} supplier {} disrupted", supplier.name),
                )
                .for_entity(&supplier.id),
            );
        }

        // Route disruptions surface after tier 1 and before tier 2.
        if tier == 1 {
            push_transport_events(&mut events, scenario, affected, catalog)?;
        }
    }

    events.push(CascadeEvent::new(
        day_at(duration, PROJECT_OFFSET),
        CascadePhase::ProjectImpact,
        severity * 0.7,
        "Downstream projects report material shortfalls",
    ));
    events.push(CascadeEvent::new(
        day_at(duration, COST_OFFSET),
        CascadePhase::CostEscalation,
        severity * 0.8,
        "Expedited freight and spot purchases escalate costs",
    ));
    events.push(CascadeEvent::new(
        day_at(duration, RECOVERY_OFFSET),
        CascadePhase::RecoveryBegins,
        severity * 0.5,
        "Recovery begins as affected capacity returns",
    ));

    let affected_suppliers = suppliers
        .iter()
        .map(|supplier| affected_supplier(supplier, scenario, overlap))
        .collect();
    let affected_routes = affected
        .route_ids
        .iter()
        .filter_map(|id| catalog.route(id))
        .map(|route| AffectedRoute {
            route_id: route.id.clone(),
            mode: route.mode,
            impact: (impact::route_exposure(route, scenario.regions(), overlap) * severity)
                .min(100.0),
        })
        .collect();

    tracing::debug!("cascade produced {} events, depth {}", events.len(), depth);

    Ok(CascadeOutcome {
        events,
        depth,
        affected_suppliers,
        affected_routes,
    })
}

fn push_transport_events(
    events: &mut Vec<CascadeEvent>,
    scenario: &SimulationScenario,
    affected: &AffectedComponents,
    catalog: &ReferenceData,
) -> Result<(), SimulationError> {
    let day = day_at(scenario.duration_days(), TRANSPORT_OFFSET);
    for id in affected.route_ids.iter() {
        let route = catalog
            .route(id)
            .ok_or_else(|| SimulationError::InvalidReferenceData(format!("route {id} vanished")))?;
        events.push(
            CascadeEvent::new(
                day,
                CascadePhase::TransportDisrupted,
                (route.risk_score + scenario.severity_pct() * 0.3).min(100.0),
                format!(
                    "{} route {} -> {} disrupted",
                    route.mode, route.origin.name, route.destination.name
                ),
            )
            .for_entity(&route.id),
        );
    }
    Ok(())
}

fn lookup_suppliers<'a>(
    affected: &AffectedComponents,
    catalog: &'a ReferenceData,
) -> Result<Vec<&'a Supplier>, SimulationError> {
    affected
        .supplier_ids
        .iter()
        .map(|id| {
            catalog.supplier(id).ok_or_else(|| {
                SimulationError::InvalidReferenceData(format!("supplier {id} vanished"))
            })
        })
        .collect()
}

fn affected_supplier(
    supplier: &Supplier,
    scenario: &SimulationScenario,
    overlap: OverlapPolicy,
) -> AffectedSupplier {
    let in_any_region = scenario
        .regions()
        .iter()
        .any(|region| region.contains(&supplier.location));
    // Named explicitly but outside every region: full exposure. A supplier on
    // a region's edge stays at its decayed (zero) exposure.
    let exposure = if in_any_region {
        impact::supplier_exposure(supplier, scenario.regions(), overlap)
    } else {
        impact::tier_multiplier(supplier.tier)
    };
    let duration = f64::from(scenario.duration_days());
    AffectedSupplier {
        supplier_id: supplier.id.clone(),
        name: supplier.name.clone(),
        tier: supplier.tier,
        impact: (exposure * scenario.severity_pct()).min(100.0),
        recovery_days: (duration * (1.0 + exposure) / (1.0 + scenario.recovery_rate())).ceil()
            as u32,
    }
}

/// `floor(duration * percent / 100)` in integer arithmetic.
fn day_at(duration: u32, percent: u32) -> u32 {
    (u64::from(duration) * u64::from(percent) / 100) as u32
}
