// tests/saved_runs_test.rs
//! Simulate, persist to an on-disk database, reopen and read back.

mod common;

use std::sync::Arc;

use chainrisk_lib::core::StrategySource;
use chainrisk_lib::db::{self, Database, DbError};
use chainrisk_lib::{builtin_catalog, EngineSettings, SimulationEngine};
use common::taiwan_scenario;

#[tokio::test]
async fn saved_run_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chainrisk.db");

    let engine =
        SimulationEngine::new(Arc::new(builtin_catalog()), EngineSettings::default()).unwrap();
    let scenario = taiwan_scenario();
    let results = engine.run(&scenario).await.unwrap();

    let id = {
        let db = Database::open(&path).unwrap();
        db::save_run(&db, "  taiwan quake  ", &scenario, &results).unwrap()
    };
    assert_eq!(id, results.id);

    let db = Database::open(&path).unwrap();
    let saved = db::get_saved_run(&db, &id).unwrap();
    assert_eq!(saved.name, "taiwan quake");
    assert_eq!(saved.created_at, results.timestamp);
    assert_eq!(saved.scenario, scenario);
    assert_eq!(saved.results.strategy_source, StrategySource::Fallback);
    assert_eq!(saved.results.cascade_timeline.len(), results.cascade_timeline.len());
    assert_eq!(saved.results.total_impact, results.total_impact);

    let listed = db::list_saved_runs(&db, 10).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].disruption_type, "earthquake");
    assert_eq!(listed[0].strategy_source, "fallback");

    db::delete_saved_run(&db, &id).unwrap();
    assert!(matches!(
        db::get_saved_run(&db, &id),
        Err(DbError::NotFound(_))
    ));
}
