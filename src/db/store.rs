//! Typed save/load of simulation runs on top of the raw row queries.

use serde::{Deserialize, Serialize};

use crate::core::{SimulationResults, SimulationScenario, StrategySource};
use crate::db::queries::{self, SavedRunRow, SavedRunSummaryRow};
use crate::db::{Database, DbError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRun {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub scenario: SimulationScenario,
    pub results: SimulationResults,
}

/// Stores a run under the result's id and timestamp. Returns the id.
pub fn save_run(
    db: &Database,
    name: &str,
    scenario: &SimulationScenario,
    results: &SimulationResults,
) -> Result<String, DbError> {
    let source = match results.strategy_source {
        StrategySource::Service => "service",
        StrategySource::Fallback => "fallback",
    };
    let row = SavedRunRow {
        id: results.id.clone(),
        name: name.trim().to_string(),
        created_at: results.timestamp.clone(),
        disruption_type: scenario.disruption_type().to_string(),
        cascade_depth: i64::from(results.cascade_depth),
        total_impact: results.total_impact,
        strategy_source: source.to_string(),
        scenario_json: serde_json::to_string(scenario)?,
        regions_json: serde_json::to_string(&results.regions)?,
        results_json: serde_json::to_string(results)?,
    };
    queries::insert_saved_run(db, &row)?;
    tracing::debug!("saved run {} as '{}'", row.id, row.name);
    Ok(row.id)
}

pub fn get_saved_run(db: &Database, id: &str) -> Result<SavedRun, DbError> {
    let row = queries::get_saved_run(db, id)?
        .ok_or_else(|| DbError::NotFound(format!("saved run {id}")))?;
    Ok(SavedRun {
        id: row.id,
        name: row.name,
        created_at: row.created_at,
        scenario: serde_json::from_str(&row.scenario_json)?,
        results: serde_json::from_str(&row.results_json)?,
    })
}

pub fn list_saved_runs(db: &Database, limit: usize) -> Result<Vec<SavedRunSummaryRow>, DbError> {
    queries::list_saved_runs(db, limit)
}

pub fn delete_saved_run(db: &Database, id: &str) -> Result<(), DbError> {
    if !queries::delete_saved_run(db, id)? {
        return Err(DbError::NotFound(format!("saved run {id}")));
    }
    Ok(())
}
