// tests/common/mod.rs
//! Shared fixtures for the end-to-end simulation tests.

use std::sync::Arc;

use chainrisk_lib::core::DisruptionRegion;
use chainrisk_lib::mitigation::{HttpMitigationConfig, HttpMitigationService};
use chainrisk_lib::{
    builtin_catalog, EngineSettings, ScenarioInput, SimulationEngine, SimulationScenario,
};

/// Earthquake centred on the Taipei fab, touching nothing else.
pub fn taiwan_scenario() -> SimulationScenario {
    SimulationScenario::new(ScenarioInput {
        disruption_type: "earthquake".to_string(),
        severity: 75.0,
        duration_days: 30,
        timeframe_days: 90,
        recovery_rate: 0.5,
        regions: vec![DisruptionRegion::new(25.03, 121.57, 5.0)],
        ..ScenarioInput::default()
    })
    .expect("valid scenario")
}

pub fn engine_with_endpoint(endpoint: String, timeout_ms: u64) -> SimulationEngine {
    let service = HttpMitigationService::new(HttpMitigationConfig {
        endpoint: Some(endpoint),
        timeout_ms,
    })
    .expect("http service");
    SimulationEngine::new(Arc::new(builtin_catalog()), EngineSettings::default())
        .expect("engine")
        .with_mitigation(Arc::new(service))
}
