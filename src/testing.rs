//! Shared fixtures for unit tests: tiny supplier networks, scenarios and
//! scripted strategy services.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::{
    BeforeAfter, CascadeEvent, CascadePhase, CostImpact, Level, MitigationStrategy,
    ProjectDelays, RouteEndpoint, RouteStatus, ScenarioInput, SimulationResults,
    SimulationScenario, StrategySource, Supplier, SupplierStatus, TransportMode, TransportRoute,
    Trend,
};
use crate::geo::GeoPoint;
use crate::mitigation::{MitigationError, MitigationRequest, MitigationService};

pub fn sample_supplier(id: &str, tier: u8, lat: f64, lng: f64, risk_score: f64) -> Supplier {
    Supplier {
        id: id.to_string(),
        name: format!("Supplier {id}"),
        tier,
        location: GeoPoint::new(lat, lng),
        country: format!("C-{id}"),
        materials: vec!["electronics".to_string()],
        risk_score,
        status: SupplierStatus::OnTrack,
        impact: Level::Medium,
        trend: Trend::Stable,
    }
}

pub fn sample_route(
    id: &str,
    (olat, olng): (f64, f64),
    (dlat, dlng): (f64, f64),
    risk_score: f64,
) -> TransportRoute {
    TransportRoute {
        id: id.to_string(),
        origin: RouteEndpoint {
            name: format!("{id}-origin"),
            location: GeoPoint::new(olat, olng),
        },
        destination: RouteEndpoint {
            name: format!("{id}-destination"),
            location: GeoPoint::new(dlat, dlng),
        },
        mode: TransportMode::Sea,
        risk_score,
        status: RouteStatus::Operational,
        materials: vec!["electronics".to_string()],
    }
}

pub fn scenario_with(input: ScenarioInput) -> SimulationScenario {
    SimulationScenario::new(input).expect("test scenario should be valid")
}

pub fn sample_results(id: &str, timestamp: &str) -> SimulationResults {
    SimulationResults {
        id: id.to_string(),
        timestamp: timestamp.to_string(),
        affected_suppliers: Vec::new(),
        affected_routes: Vec::new(),
        affected_countries: Vec::new(),
        cascade_depth: 0,
        total_impact: 0.0,
        mitigation_strategies: vec![MitigationStrategy::new(
            "Monitor affected regions",
            Level::Low,
            Level::Low,
            "Ongoing",
            "",
        )],
        strategy_source: StrategySource::Fallback,
        supply_chain_health: BeforeAfter {
            before: 60.0,
            after: 60.0,
        },
        material_availability: BeforeAfter {
            before: 85.0,
            after: 85.0,
        },
        project_delays: ProjectDelays {
            average_days: 0,
            affected_projects: 0,
            affected_project_ids: Vec::new(),
        },
        cost_impact: CostImpact {
            percentage: 0,
            value: 0.0,
        },
        cascade_timeline: vec![CascadeEvent::new(
            0,
            CascadePhase::InitialDisruption,
            50.0,
            "start",
        )],
        regions: Vec::new(),
    }
}

pub fn strategy(action: &str) -> MitigationStrategy {
    MitigationStrategy::new(action, Level::High, Level::Medium, "1 month", "scripted")
}

/// Always answers with the same strategies.
pub struct FixedService(pub Vec<MitigationStrategy>);

#[async_trait]
impl MitigationService for FixedService {
    fn id(&self) -> &str {
        "fixed"
    }

    async fn suggest(
        &self,
        _request: &MitigationRequest,
    ) -> Result<Vec<MitigationStrategy>, MitigationError> {
        Ok(self.0.clone())
    }
}

/// Fails the first `failures` calls, then behaves like [`FixedService`].
pub struct FlakyService {
    pub failures: usize,
    pub calls: AtomicUsize,
    pub strategies: Vec<MitigationStrategy>,
}

impl FlakyService {
    pub fn new(failures: usize, strategies: Vec<MitigationStrategy>) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
            strategies,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MitigationService for FlakyService {
    fn id(&self) -> &str {
        "flaky"
    }

    async fn suggest(
        &self,
        _request: &MitigationRequest,
    ) -> Result<Vec<MitigationStrategy>, MitigationError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(MitigationError::Request(format!("scripted failure {call}")));
        }
        Ok(self.strategies.clone())
    }
}

/// Sleeps before answering, for exercising the engine's timeout.
pub struct SlowService(pub Duration);

#[async_trait]
impl MitigationService for SlowService {
    fn id(&self) -> &str {
        "slow"
    }

    async fn suggest(
        &self,
        _request: &MitigationRequest,
    ) -> Result<Vec<MitigationStrategy>, MitigationError> {
        tokio::time::sleep(self.0).await;
        Ok(vec![strategy("too late")])
    }
}
