//! Simulation orchestration: resolve, propagate, aggregate, then ask the
//! strategy service for mitigations with a rule-based fallback.

pub mod aggregate;
pub mod cascade;
pub mod fallback;
pub mod impact;
pub mod resolver;

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::ReferenceData;
use crate::core::{
    MitigationStrategy, ProjectDelays, SimulationResults, SimulationScenario, StrategySource,
};
use crate::mitigation::{MitigationError, MitigationRequest, MitigationService};

use self::aggregate::{BaselineMetrics, DEFAULT_BASELINE_AVAILABILITY, DEFAULT_COST_BASE};

pub const MAX_STRATEGY_RETRIES: u32 = 10;
pub const MAX_RETRY_BACKOFF_MS: u64 = 60_000;
pub use self::aggregate::ImpactMetrics;
pub use self::cascade::CascadeOutcome;
pub use self::impact::OverlapPolicy;
pub use self::resolver::AffectedComponents;

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("unknown supplier id: {0}")]
    UnknownSupplier(String),
    #[error("invalid reference data: {0}")]
    InvalidReferenceData(String),
    #[error("invalid engine settings: {0}")]
    InvalidSettings(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettings {
    #[serde(default = "default_strategy_timeout_ms")]
    pub strategy_timeout_ms: u64,
    #[serde(default)]
    pub strategy_retries: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    #[serde(default = "default_cost_base")]
    pub cost_base: f64,
    #[serde(default = "default_baseline_availability")]
    pub baseline_availability: f64,
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            strategy_timeout_ms: default_strategy_timeout_ms(),
            strategy_retries: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
            cost_base: default_cost_base(),
            baseline_availability: default_baseline_availability(),
            overlap: OverlapPolicy::default(),
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.strategy_timeout_ms == 0 {
            return Err("strategyTimeoutMs must be greater than 0".to_string());
        }
        if self.strategy_retries > MAX_STRATEGY_RETRIES {
            return Err(format!(
                "strategyRetries must be at most {MAX_STRATEGY_RETRIES}, got {}",
                self.strategy_retries
            ));
        }
        if self.retry_backoff_ms > MAX_RETRY_BACKOFF_MS {
            return Err(format!(
                "retryBackoffMs must be at most {MAX_RETRY_BACKOFF_MS}, got {}",
                self.retry_backoff_ms
            ));
        }
        if !self.cost_base.is_finite() || self.cost_base < 0.0 {
            return Err(format!("costBase must be a non-negative number, got {}", self.cost_base));
        }
        if !(0.0..=100.0).contains(&self.baseline_availability) {
            return Err(format!(
                "baselineAvailability must be within [0, 100], got {}",
                self.baseline_availability
            ));
        }
        if let OverlapPolicy::Capped { ceiling } = self.overlap {
            if !ceiling.is_finite() || ceiling <= 0.0 {
                return Err(format!("overlap ceiling must be positive, got {ceiling}"));
            }
        }
        Ok(())
    }
}

fn default_strategy_timeout_ms() -> u64 {
    15_000
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_cost_base() -> f64 {
    DEFAULT_COST_BASE
}

fn default_baseline_availability() -> f64 {
    DEFAULT_BASELINE_AVAILABILITY
}

/// Stateless between runs; safe to share behind an `Arc` and call
/// concurrently.
pub struct SimulationEngine {
    reference: Arc<ReferenceData>,
    mitigation: Option<Arc<dyn MitigationService>>,
    settings: EngineSettings,
    baseline: BaselineMetrics,
}

impl SimulationEngine {
    pub fn new(
        reference: Arc<ReferenceData>,
        settings: EngineSettings,
    ) -> Result<Self, SimulationError> {
        reference
            .validate()
            .map_err(|error| SimulationError::InvalidReferenceData(error.to_string()))?;
        settings.validate().map_err(SimulationError::InvalidSettings)?;
        let baseline = aggregate::baseline(&reference, settings.baseline_availability);

        Ok(Self {
            reference,
            mitigation: None,
            settings,
            baseline,
        })
    }

    pub fn with_mitigation(mut self, service: Arc<dyn MitigationService>) -> Self {
        self.mitigation = Some(service);
        self
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn baseline(&self) -> BaselineMetrics {
        self.baseline
    }

    pub async fn run(
        &self,
        scenario: &SimulationScenario,
    ) -> Result<SimulationResults, SimulationError> {
        tracing::info!(
            "simulation start: type={} severity={:.2} duration={}d regions={} explicit_suppliers={}",
            scenario.disruption_type(),
            scenario.severity(),
            scenario.duration_days(),
            scenario.regions().len(),
            scenario.supplier_ids().len()
        );

        let affected =
            resolver::resolve(scenario, &self.reference.suppliers, &self.reference.routes)?;
        let outcome =
            cascade::propagate(scenario, &affected, &self.reference, self.settings.overlap)?;
        let metrics = aggregate::aggregate(
            scenario,
            &outcome.events,
            self.baseline,
            self.settings.cost_base,
        );
        let project_ids = aggregate::affected_projects(&self.reference, &affected);

        let request = MitigationRequest::new(scenario, affected.supplier_ids.to_vec());
        let (mitigation_strategies, strategy_source) =
            self.strategies(&request, &metrics, outcome.depth).await;

        let results = SimulationResults {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            total_impact: outcome.total_impact(),
            affected_suppliers: outcome.affected_suppliers,
            affected_routes: outcome.affected_routes,
            affected_countries: affected.countries.to_vec(),
            cascade_depth: outcome.depth,
            mitigation_strategies,
            strategy_source,
            supply_chain_health: metrics.supply_chain_health,
            material_availability: metrics.material_availability,
            project_delays: ProjectDelays {
                average_days: metrics.average_delay_days,
                affected_projects: project_ids.len(),
                affected_project_ids: project_ids,
            },
            cost_impact: metrics.cost,
            cascade_timeline: outcome.events,
            regions: scenario.regions().to_vec(),
        };

        tracing::info!(
            "simulation {} done: {} suppliers, {} routes, depth {}, health {:.1} -> {:.1}, strategies from {:?}",
            results.id,
            results.affected_suppliers.len(),
            results.affected_routes.len(),
            results.cascade_depth,
            results.supply_chain_health.before,
            results.supply_chain_health.after,
            results.strategy_source
        );

        Ok(results)
    }

    /// Runs each scenario concurrently; results keep input order.
    pub async fn run_batch(
        &self,
        scenarios: &[SimulationScenario],
    ) -> Vec<Result<SimulationResults, SimulationError>> {
        futures::future::join_all(scenarios.iter().map(|scenario| self.run(scenario))).await
    }

    async fn strategies(
        &self,
        request: &MitigationRequest,
        metrics: &ImpactMetrics,
        depth: u8,
    ) -> (Vec<MitigationStrategy>, StrategySource) {
        let Some(service) = self.mitigation.as_ref() else {
            tracing::debug!("no mitigation service configured, using rule-based strategies");
            return (
                fallback::fallback_strategies(metrics, depth),
                StrategySource::Fallback,
            );
        };

        match self.request_with_retry(service.as_ref(), request).await {
            Ok(strategies) => (strategies, StrategySource::Service),
            Err(error) => {
                tracing::warn!(
                    "mitigation service '{}' failed, using rule-based strategies: {}",
                    service.id(),
                    error
                );
                (
                    fallback::fallback_strategies(metrics, depth),
                    StrategySource::Fallback,
                )
            }
        }
    }

    async fn request_with_retry(
        &self,
        service: &dyn MitigationService,
        request: &MitigationRequest,
    ) -> Result<Vec<MitigationStrategy>, MitigationError> {
        let mut attempt = 0u32;
        loop {
            match self.request_once(service, request).await {
                Ok(strategies) => return Ok(strategies),
                Err(error) if attempt < self.settings.strategy_retries => {
                    let delay_ms = self.backoff_ms(attempt);
                    tracing::warn!(
                        "mitigation attempt {} failed ({}), retrying in {}ms",
                        attempt + 1,
                        error,
                        delay_ms
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn request_once(
        &self,
        service: &dyn MitigationService,
        request: &MitigationRequest,
    ) -> Result<Vec<MitigationStrategy>, MitigationError> {
        let timeout = Duration::from_millis(self.settings.strategy_timeout_ms);
        let strategies = tokio::time::timeout(timeout, service.suggest(request))
            .await
            .map_err(|_| {
                MitigationError::Timeout(format!(
                    "no strategies within {} ms",
                    self.settings.strategy_timeout_ms
                ))
            })??;

        if strategies.is_empty() {
            return Err(MitigationError::InvalidResponse(
                "service returned no strategies".to_string(),
            ));
        }
        Ok(strategies)
    }

    /// Exponential backoff with up to 50% random jitter.
    fn backoff_ms(&self, attempt: u32) -> u64 {
        let base = self
            .settings
            .retry_backoff_ms
            .saturating_mul(1u64 << attempt.min(10));
        let jitter = rand::thread_rng().gen_range(0..=base / 2);
        base.saturating_add(jitter)
    }
}

#[cfg(test)]
mod tests;
