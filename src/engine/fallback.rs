//! Rule-based mitigation strategies used whenever the strategy service is
//! unavailable. A pure function of the aggregated metrics.

use crate::core::{Level, MitigationStrategy};
use crate::engine::aggregate::ImpactMetrics;

const HEALTH_FLOOR: f64 = 50.0;
const AVAILABILITY_FLOOR: f64 = 60.0;
const DELAY_CEILING_DAYS: u32 = 30;
const COST_CEILING_PCT: u32 = 15;
const DEPTH_CEILING: u8 = 2;

pub fn fallback_strategies(metrics: &ImpactMetrics, cascade_depth: u8) -> Vec<MitigationStrategy> {
    let mut strategies = Vec::new();

    if metrics.supply_chain_health.after < HEALTH_FLOOR {
        strategies.push(MitigationStrategy::new(
            "Diversify critical suppliers",
            Level::High,
            Level::High,
            "3-6 months",
            "Qualify alternate suppliers outside the affected regions for the highest-risk materials.",
        ));
    }
    if metrics.material_availability.after < AVAILABILITY_FLOOR {
        strategies.push(MitigationStrategy::new(
            "Increase safety stock",
            Level::High,
            Level::Medium,
            "1-2 months",
            "Raise buffer inventory for materials sourced from disrupted suppliers.",
        ));
    }
    if metrics.average_delay_days > DELAY_CEILING_DAYS {
        strategies.push(MitigationStrategy::new(
            "Activate alternate transport routes",
            Level::Medium,
            Level::Medium,
            "2-4 weeks",
            "Reroute shipments through unaffected ports and modes to cut project delays.",
        ));
    }
    if metrics.cost.percentage >= COST_CEILING_PCT {
        strategies.push(MitigationStrategy::new(
            "Lock in logistics capacity and contracts",
            Level::Medium,
            Level::Low,
            "2-6 weeks",
            "Negotiate fixed-rate freight and supply contracts before spot prices escalate.",
        ));
    }
    if cascade_depth >= DEPTH_CEILING {
        strategies.push(MitigationStrategy::new(
            "Map sub-tier suppliers",
            Level::Medium,
            Level::Medium,
            "1-3 months",
            "Build visibility into tier 2 and tier 3 dependencies behind direct suppliers.",
        ));
    }

    if strategies.is_empty() {
        strategies.push(MitigationStrategy::new(
            "Monitor affected regions",
            Level::Low,
            Level::Low,
            "Ongoing",
            "Track conditions in the affected regions and review supplier status weekly.",
        ));
    }

    strategies
}
