use serde::{Deserialize, Serialize};

use crate::core::scenario::DisruptionRegion;
use crate::core::supplier::{Level, TransportMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CascadeCategory {
    Supplier,
    Transport,
    Project,
    Cost,
}

/// Which step of the propagation produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CascadePhase {
    InitialDisruption,
    SupplierDisrupted { tier: u8 },
    TransportDisrupted,
    ProjectImpact,
    CostEscalation,
    RecoveryBegins,
}

impl CascadePhase {
    pub const fn category(&self) -> CascadeCategory {
        match self {
            Self::InitialDisruption | Self::SupplierDisrupted { .. } => CascadeCategory::Supplier,
            Self::TransportDisrupted => CascadeCategory::Transport,
            Self::ProjectImpact => CascadeCategory::Project,
            Self::CostEscalation | Self::RecoveryBegins => CascadeCategory::Cost,
        }
    }

    /// True for events that record an actual supplier or route going down.
    pub const fn is_component_disruption(&self) -> bool {
        matches!(self, Self::SupplierDisrupted { .. } | Self::TransportDisrupted)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeEvent {
    pub day: u32,
    pub description: String,
    pub impact: f64,
    pub category: CascadeCategory,
    pub phase: CascadePhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

impl CascadeEvent {
    pub fn new(day: u32, phase: CascadePhase, impact: f64, description: impl Into<String>) -> Self {
        Self {
            day,
            description: description.into(),
            impact,
            category: phase.category(),
            phase,
            entity_id: None,
        }
    }

    pub fn for_entity(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedSupplier {
    pub supplier_id: String,
    pub name: String,
    pub tier: u8,
    /// 0-100.
    pub impact: f64,
    pub recovery_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedRoute {
    pub route_id: String,
    pub mode: TransportMode,
    pub impact: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MitigationStrategy {
    pub action: String,
    #[serde(default)]
    pub impact: Level,
    #[serde(default)]
    pub difficulty: Level,
    #[serde(default)]
    pub timeframe: String,
    #[serde(default)]
    pub description: String,
}

impl MitigationStrategy {
    pub fn new(
        action: impl Into<String>,
        impact: Level,
        difficulty: Level,
        timeframe: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            impact,
            difficulty,
            timeframe: timeframe.into(),
            description: description.into(),
        }
    }
}

/// Where the mitigation strategies in a result came from. `Fallback` marks a
/// run that completed but could not reach the strategy service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategySource {
    Service,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeforeAfter {
    pub before: f64,
    pub after: f64,
}

impl BeforeAfter {
    pub fn delta(&self) -> f64 {
        self.before - self.after
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDelays {
    pub average_days: u32,
    pub affected_projects: usize,
    #[serde(default)]
    pub affected_project_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostImpact {
    pub percentage: u32,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResults {
    pub id: String,
    pub timestamp: String,
    pub affected_suppliers: Vec<AffectedSupplier>,
    pub affected_routes: Vec<AffectedRoute>,
    pub affected_countries: Vec<String>,
    pub cascade_depth: u8,
    pub total_impact: f64,
    pub mitigation_strategies: Vec<MitigationStrategy>,
    pub strategy_source: StrategySource,
    pub supply_chain_health: BeforeAfter,
    pub material_availability: BeforeAfter,
    pub project_delays: ProjectDelays,
    pub cost_impact: CostImpact,
    pub cascade_timeline: Vec<CascadeEvent>,
    pub regions: Vec<DisruptionRegion>,
}
