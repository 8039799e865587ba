//! Supply-chain disruption simulation engine.
//!
//! Given a geographic disruption scenario, the engine works out which
//! suppliers and transport routes are hit, propagates the disruption through
//! a three-tier supplier network into a day-by-day cascade timeline, and
//! aggregates health, availability, delay and cost figures. Mitigation
//! strategies come from an external service when one is configured, with a
//! deterministic rule-based fallback.
//!
//! # Architecture
//!
//! - `geo`: haversine distance
//! - `core`: suppliers, routes, scenarios and result types
//! - `catalog`: reference data loading and the built-in sample network
//! - `engine`: resolver, cascade propagator, aggregator and orchestrator
//! - `mitigation`: strategy-service contract, providers and lenient decoding
//! - `climate`: climate-event feed client with its own TTL cache
//! - `db`: SQLite persistence for saved runs
//! - `config`: file + environment configuration

pub mod catalog;
pub mod climate;
pub mod config;
pub mod core;
pub mod db;
pub mod engine;
pub mod geo;
pub mod mitigation;

#[cfg(test)]
mod testing;

pub use crate::catalog::{builtin_catalog, CatalogError, ReferenceData};
pub use crate::config::{AppConfig, ConfigError};
pub use crate::core::{ScenarioError, ScenarioInput, SimulationResults, SimulationScenario};
pub use crate::engine::{EngineSettings, SimulationEngine, SimulationError};

/// Installs the fmt subscriber. `RUST_LOG` wins over the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "chainrisk_lib=debug,info".parse().expect("valid env filter")
            }),
        )
        .init();
}
