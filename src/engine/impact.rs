//! Distance-decayed impact of a disruption region on a single entity.

use serde::{Deserialize, Serialize};

use crate::core::{DisruptionRegion, Supplier, TransportRoute};

/// How impact from overlapping regions combines for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Sum contributions from every region the entity sits in.
    #[default]
    Additive,
    /// Sum, then clamp to `ceiling`.
    Capped { ceiling: f64 },
}

impl OverlapPolicy {
    pub fn combine(&self, contributions: impl IntoIterator<Item = f64>) -> f64 {
        let total: f64 = contributions.into_iter().sum();
        match self {
            Self::Additive => total,
            Self::Capped { ceiling } => total.min(*ceiling),
        }
    }
}

pub fn tier_multiplier(tier: u8) -> f64 {
    1.0 + 0.2 * (4.0 - f64::from(tier))
}

pub fn route_multiplier(route: &TransportRoute) -> f64 {
    1.0 + route.risk_score.clamp(0.0, 100.0) / 200.0
}

fn decay(distance_km: f64, radius_km: f64) -> Option<f64> {
    if radius_km <= 0.0 || distance_km > radius_km {
        return None;
    }
    Some(1.0 - distance_km / radius_km)
}

pub fn supplier_impact(supplier: &Supplier, region: &DisruptionRegion) -> f64 {
    let distance = region.center.distance_km(&supplier.location);
    decay(distance, region.radius_km)
        .map(|factor| factor * tier_multiplier(supplier.tier))
        .unwrap_or(0.0)
}

/// Measured against whichever endpoint sits closer to the region center.
pub fn route_impact(route: &TransportRoute, region: &DisruptionRegion) -> f64 {
    let distance = route
        .endpoints()
        .iter()
        .map(|point| region.center.distance_km(point))
        .fold(f64::INFINITY, f64::min);
    decay(distance, region.radius_km)
        .map(|factor| factor * route_multiplier(route))
        .unwrap_or(0.0)
}

pub fn supplier_exposure(
    supplier: &Supplier,
    regions: &[DisruptionRegion],
    policy: OverlapPolicy,
) -> f64 {
    policy.combine(regions.iter().map(|region| supplier_impact(supplier, region)))
}

pub fn route_exposure(
    route: &TransportRoute,
    regions: &[DisruptionRegion],
    policy: OverlapPolicy,
) -> f64 {
    policy.combine(regions.iter().map(|region| route_impact(route, region)))
}
