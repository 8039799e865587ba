use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{DisruptionRegion, MitigationStrategy, SimulationScenario};
use crate::mitigation::error::MitigationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    pub duration: u32,
    /// Severity as a fraction in [0, 1].
    pub intensity: f64,
    pub recovery_rate: f64,
}

/// Body sent to a strategy service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MitigationRequest {
    pub regions: Vec<DisruptionRegion>,
    /// Supplier ids, in resolution order.
    pub affected_suppliers: Vec<String>,
    pub simulation_config: SimulationConfig,
}

impl MitigationRequest {
    pub fn new(scenario: &SimulationScenario, affected_suppliers: Vec<String>) -> Self {
        Self {
            regions: scenario.regions().to_vec(),
            affected_suppliers,
            simulation_config: SimulationConfig {
                duration: scenario.duration_days(),
                intensity: scenario.severity(),
                recovery_rate: scenario.recovery_rate(),
            },
        }
    }
}

#[async_trait]
pub trait MitigationService: Send + Sync {
    fn id(&self) -> &str;
    async fn suggest(
        &self,
        request: &MitigationRequest,
    ) -> Result<Vec<MitigationStrategy>, MitigationError>;
}
