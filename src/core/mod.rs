//! Domain types shared by the engine, the catalog and the persistence layer.

pub mod results;
pub mod scenario;
pub mod supplier;

pub use results::{
    AffectedRoute, AffectedSupplier, BeforeAfter, CascadeCategory, CascadeEvent, CascadePhase,
    CostImpact, MitigationStrategy, ProjectDelays, SimulationResults, StrategySource,
};
pub use scenario::{
    normalize_severity, DisruptionRegion, ImpactZone, ScenarioError, ScenarioInput,
    SimulationScenario,
};
pub use supplier::{
    InfrastructureProject, Level, RouteEndpoint, RouteStatus, Supplier, SupplierStatus,
    TransportMode, TransportRoute, Trend,
};
