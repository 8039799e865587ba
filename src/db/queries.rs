use rusqlite::{params, Row};
use serde::Serialize;

use super::{Database, DbError};

// ---------------------------------------------------------------------------
// Row types: flat structs that map directly to table columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SavedRunRow {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub disruption_type: String,
    pub cascade_depth: i64,
    pub total_impact: f64,
    pub strategy_source: String,
    pub scenario_json: String,
    pub regions_json: String,
    pub results_json: String,
}

/// Listing view without the JSON payloads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRunSummaryRow {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub disruption_type: String,
    pub cascade_depth: i64,
    pub total_impact: f64,
    pub strategy_source: String,
}

const SAVED_RUN_COLUMNS: &str =
    "id, name, created_at, disruption_type, cascade_depth, total_impact, strategy_source, scenario_json, regions_json, results_json";

fn saved_run_from_row(row: &Row<'_>) -> rusqlite::Result<SavedRunRow> {
    Ok(SavedRunRow {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
        disruption_type: row.get(3)?,
        cascade_depth: row.get(4)?,
        total_impact: row.get(5)?,
        strategy_source: row.get(6)?,
        scenario_json: row.get(7)?,
        regions_json: row.get(8)?,
        results_json: row.get(9)?,
    })
}

// ---------------------------------------------------------------------------
// Saved run queries
// ---------------------------------------------------------------------------

pub fn insert_saved_run(db: &Database, row: &SavedRunRow) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute(
        "INSERT INTO saved_runs (id, name, created_at, disruption_type, cascade_depth, total_impact, strategy_source, scenario_json, regions_json, results_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            row.id,
            row.name,
            row.created_at,
            row.disruption_type,
            row.cascade_depth,
            row.total_impact,
            row.strategy_source,
            row.scenario_json,
            row.regions_json,
            row.results_json
        ],
    )?;
    Ok(())
}

pub fn get_saved_run(db: &Database, id: &str) -> Result<Option<SavedRunRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(&format!(
        "SELECT {SAVED_RUN_COLUMNS} FROM saved_runs WHERE id = ?1"
    ))?;
    let mut rows = stmt.query_map(params![id], saved_run_from_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn list_saved_runs(db: &Database, limit: usize) -> Result<Vec<SavedRunSummaryRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(
        "SELECT id, name, created_at, disruption_type, cascade_depth, total_impact, strategy_source
         FROM saved_runs
         ORDER BY created_at DESC, rowid DESC
         LIMIT ?1",
    )?;
    let rows = stmt
        .query_map(params![limit as i64], |row| {
            Ok(SavedRunSummaryRow {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
                disruption_type: row.get(3)?,
                cascade_depth: row.get(4)?,
                total_impact: row.get(5)?,
                strategy_source: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Returns whether a row was removed.
pub fn delete_saved_run(db: &Database, id: &str) -> Result<bool, DbError> {
    let conn = db.conn();
    let removed = conn.execute("DELETE FROM saved_runs WHERE id = ?1", params![id])?;
    Ok(removed > 0)
}
