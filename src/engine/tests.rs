use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use crate::catalog::{builtin_catalog, ReferenceData};
use crate::core::{
    CascadePhase, DisruptionRegion, ScenarioInput, SimulationScenario, StrategySource,
};
use crate::engine::{
    EngineSettings, OverlapPolicy, SimulationEngine, SimulationError, MAX_RETRY_BACKOFF_MS,
    MAX_STRATEGY_RETRIES,
};
use crate::testing::{
    sample_supplier, scenario_with, strategy, FixedService, FlakyService, SlowService,
};

fn engine() -> SimulationEngine {
    SimulationEngine::new(Arc::new(builtin_catalog()), EngineSettings::default())
        .expect("builtin catalog builds an engine")
}

fn taiwan_scenario() -> SimulationScenario {
    scenario_with(ScenarioInput {
        disruption_type: "earthquake".to_string(),
        severity: 75.0,
        duration_days: 30,
        timeframe_days: 90,
        recovery_rate: 0.5,
        regions: vec![DisruptionRegion::new(25.03, 121.57, 5.0)],
        ..ScenarioInput::default()
    })
}

#[tokio::test]
async fn taiwan_region_hits_only_the_tier_one_fab() {
    let results = engine().run(&taiwan_scenario()).await.unwrap();

    let ids: Vec<&str> = results
        .affected_suppliers
        .iter()
        .map(|s| s.supplier_id.as_str())
        .collect();
    assert_eq!(ids, vec!["sup-tw-001"]);
    assert!(results.affected_routes.is_empty());
    assert_eq!(results.affected_countries, vec!["TW".to_string()]);
    assert_eq!(results.cascade_depth, 1);

    let phases: Vec<CascadePhase> = results.cascade_timeline.iter().map(|e| e.phase).collect();
    assert_eq!(
        phases,
        vec![
            CascadePhase::InitialDisruption,
            CascadePhase::SupplierDisrupted { tier: 1 },
            CascadePhase::ProjectImpact,
            CascadePhase::CostEscalation,
            CascadePhase::RecoveryBegins,
        ]
    );
    let days: Vec<u32> = results.cascade_timeline.iter().map(|e| e.day).collect();
    assert_eq!(days, vec![0, 3, 15, 21, 27]);

    let fab = &results.affected_suppliers[0];
    assert_eq!(fab.impact, 100.0);
    assert_eq!(fab.recovery_days, 52);
    assert_eq!(results.total_impact, 100.0);

    assert!(results.supply_chain_health.after < results.supply_chain_health.before);
    assert!(results.material_availability.after < results.material_availability.before);
    assert_eq!(results.cost_impact.percentage, 26);
    assert!((results.cost_impact.value - 6_370_000.0).abs() < 1e-6);
    assert_eq!(results.project_delays.average_days, 7);
    assert_eq!(
        results.project_delays.affected_project_ids,
        vec!["prj-001".to_string(), "prj-004".to_string()]
    );
    assert_eq!(results.project_delays.affected_projects, 2);
    assert_eq!(results.strategy_source, StrategySource::Fallback);
    assert_eq!(results.regions.len(), 1);
    assert!(uuid::Uuid::parse_str(&results.id).is_ok());
    assert!(chrono::DateTime::parse_from_rfc3339(&results.timestamp).is_ok());
}

#[tokio::test]
async fn empty_scenario_is_a_no_op() {
    let engine = engine();
    let results = engine.run(&scenario_with(ScenarioInput::default())).await.unwrap();

    assert!(results.affected_suppliers.is_empty());
    assert!(results.affected_routes.is_empty());
    assert_eq!(results.cascade_timeline.len(), 4);
    assert_eq!(results.cascade_depth, 0);
    assert_eq!(
        results.supply_chain_health.after,
        results.supply_chain_health.before
    );
    assert_eq!(results.supply_chain_health.before, engine.baseline().health);
    assert_eq!(results.cost_impact.percentage, 0);
    assert_eq!(results.project_delays.affected_projects, 0);
}

#[tokio::test]
async fn zero_radius_region_affects_nothing() {
    let results = engine()
        .run(&scenario_with(ScenarioInput {
            regions: vec![DisruptionRegion::new(25.03, 121.57, 0.0)],
            ..ScenarioInput::default()
        }))
        .await
        .unwrap();
    assert!(results.affected_suppliers.is_empty());
    assert_eq!(results.cascade_timeline.len(), 4);
}

#[tokio::test]
async fn unknown_explicit_supplier_is_surfaced() {
    let err = engine()
        .run(&scenario_with(ScenarioInput {
            supplier_ids: vec!["sup-xx-999".to_string()],
            ..ScenarioInput::default()
        }))
        .await
        .unwrap_err();
    assert!(matches!(err, SimulationError::UnknownSupplier(id) if id == "sup-xx-999"));
}

#[tokio::test]
async fn service_strategies_are_used_when_available() {
    let scripted = vec![strategy("Qualify Korean fabs"), strategy("Pre-buy wafers")];
    let engine = engine().with_mitigation(Arc::new(FixedService(scripted.clone())));

    let results = engine.run(&taiwan_scenario()).await.unwrap();
    assert_eq!(results.strategy_source, StrategySource::Service);
    assert_eq!(results.mitigation_strategies, scripted);
}

#[tokio::test]
async fn failing_service_falls_back_deterministically() {
    let failing = engine().with_mitigation(Arc::new(FlakyService::new(usize::MAX, Vec::new())));
    let first = failing.run(&taiwan_scenario()).await.unwrap();
    let second = failing.run(&taiwan_scenario()).await.unwrap();
    let unconfigured = engine().run(&taiwan_scenario()).await.unwrap();

    assert_eq!(first.strategy_source, StrategySource::Fallback);
    assert_eq!(first.mitigation_strategies, second.mitigation_strategies);
    assert_eq!(first.mitigation_strategies, unconfigured.mitigation_strategies);

    let actions: Vec<&str> = first
        .mitigation_strategies
        .iter()
        .map(|s| s.action.as_str())
        .collect();
    assert_eq!(
        actions,
        vec![
            "Diversify critical suppliers",
            "Increase safety stock",
            "Lock in logistics capacity and contracts",
        ]
    );
}

#[tokio::test]
async fn empty_service_reply_falls_back() {
    let engine = engine().with_mitigation(Arc::new(FixedService(Vec::new())));
    let results = engine.run(&taiwan_scenario()).await.unwrap();
    assert_eq!(results.strategy_source, StrategySource::Fallback);
    assert!(!results.mitigation_strategies.is_empty());
}

#[tokio::test]
async fn slow_service_times_out_into_fallback() {
    let settings = EngineSettings {
        strategy_timeout_ms: 50,
        ..EngineSettings::default()
    };
    let engine = SimulationEngine::new(Arc::new(builtin_catalog()), settings)
        .unwrap()
        .with_mitigation(Arc::new(SlowService(Duration::from_secs(5))));

    let started = std::time::Instant::now();
    let results = engine.run(&taiwan_scenario()).await.unwrap();
    assert_eq!(results.strategy_source, StrategySource::Fallback);
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn retries_recover_from_transient_failures() {
    let settings = EngineSettings {
        strategy_retries: 2,
        retry_backoff_ms: 1,
        ..EngineSettings::default()
    };
    let flaky = Arc::new(FlakyService::new(2, vec![strategy("Reroute via Busan")]));
    let engine = SimulationEngine::new(Arc::new(builtin_catalog()), settings)
        .unwrap()
        .with_mitigation(flaky.clone());

    let results = engine.run(&taiwan_scenario()).await.unwrap();
    assert_eq!(results.strategy_source, StrategySource::Service);
    assert_eq!(flaky.calls(), 3);
}

#[tokio::test]
async fn exhausted_retries_fall_back() {
    let settings = EngineSettings {
        strategy_retries: 1,
        retry_backoff_ms: 1,
        ..EngineSettings::default()
    };
    let flaky = Arc::new(FlakyService::new(5, vec![strategy("never")]));
    let engine = SimulationEngine::new(Arc::new(builtin_catalog()), settings)
        .unwrap()
        .with_mitigation(flaky.clone());

    let results = engine.run(&taiwan_scenario()).await.unwrap();
    assert_eq!(results.strategy_source, StrategySource::Fallback);
    assert_eq!(flaky.calls(), 2);
}

#[tokio::test]
async fn batch_runs_keep_input_order() {
    let scenarios: Vec<SimulationScenario> = [0.2, 0.9, 0.5]
        .into_iter()
        .map(|severity| {
            scenario_with(ScenarioInput {
                severity,
                ..ScenarioInput::default()
            })
        })
        .collect();

    let results = engine().run_batch(&scenarios).await;
    let initial: Vec<f64> = results
        .iter()
        .map(|result| result.as_ref().unwrap().cascade_timeline[0].impact)
        .collect();
    assert_eq!(initial, vec![20.0, 90.0, 50.0]);

    let ids: std::collections::HashSet<&str> = results
        .iter()
        .map(|result| result.as_ref().unwrap().id.as_str())
        .collect();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn harsher_scenarios_never_look_healthier() {
    let engine = engine();
    let run = |severity: f64, duration_days: u32| {
        scenario_with(ScenarioInput {
            severity,
            duration_days,
            regions: vec![DisruptionRegion::new(23.0, 118.0, 800.0)],
            ..ScenarioInput::default()
        })
    };

    let mild = engine.run(&run(0.2, 14)).await.unwrap();
    let harsh = engine.run(&run(0.9, 14)).await.unwrap();
    let long = engine.run(&run(0.9, 120)).await.unwrap();

    assert!(harsh.supply_chain_health.after <= mild.supply_chain_health.after);
    assert!(harsh.cost_impact.percentage >= mild.cost_impact.percentage);
    assert!(long.supply_chain_health.after <= harsh.supply_chain_health.after);
    assert!(long.material_availability.after >= 0.0);
    assert!(long.project_delays.average_days >= harsh.project_delays.average_days);
}

#[tokio::test]
async fn capped_overlap_limits_stacked_regions() {
    let reference = Arc::new(ReferenceData {
        suppliers: vec![sample_supplier("s1", 1, 10.0, 10.0, 40.0)],
        ..ReferenceData::default()
    });
    let stacked = scenario_with(ScenarioInput {
        severity: 0.5,
        regions: vec![
            DisruptionRegion::new(10.0, 10.0, 100.0),
            DisruptionRegion::new(10.0, 10.0, 100.0),
        ],
        ..ScenarioInput::default()
    });

    let additive = SimulationEngine::new(reference.clone(), EngineSettings::default()).unwrap();
    let capped = SimulationEngine::new(
        reference,
        EngineSettings {
            overlap: OverlapPolicy::Capped { ceiling: 1.0 },
            ..EngineSettings::default()
        },
    )
    .unwrap();

    let additive = additive.run(&stacked).await.unwrap();
    let capped = capped.run(&stacked).await.unwrap();
    // 2 x 1.6 x 50, clamped to 100
    assert_eq!(additive.affected_suppliers[0].impact, 100.0);
    assert_eq!(capped.affected_suppliers[0].impact, 50.0);
}

#[test]
fn invalid_inputs_are_rejected_at_construction() {
    let mut bad = builtin_catalog();
    bad.suppliers[0].tier = 5;
    assert!(matches!(
        SimulationEngine::new(Arc::new(bad), EngineSettings::default()),
        Err(SimulationError::InvalidReferenceData(_))
    ));

    let settings = EngineSettings {
        strategy_timeout_ms: 0,
        ..EngineSettings::default()
    };
    assert!(matches!(
        SimulationEngine::new(Arc::new(builtin_catalog()), settings),
        Err(SimulationError::InvalidSettings(_))
    ));

    for settings in [
        EngineSettings {
            strategy_retries: MAX_STRATEGY_RETRIES + 1,
            ..EngineSettings::default()
        },
        EngineSettings {
            retry_backoff_ms: MAX_RETRY_BACKOFF_MS + 1,
            ..EngineSettings::default()
        },
    ] {
        assert!(matches!(
            SimulationEngine::new(Arc::new(builtin_catalog()), settings),
            Err(SimulationError::InvalidSettings(_))
        ));
    }
}

#[test]
fn backoff_saturates_instead_of_overflowing() {
    let mut engine = engine();
    engine.settings.retry_backoff_ms = u64::MAX / 2;
    assert_eq!(engine.backoff_ms(10), u64::MAX);

    engine.settings.retry_backoff_ms = 100;
    let first = engine.backoff_ms(0);
    assert!((100..=150).contains(&first), "got {first}");
    let third = engine.backoff_ms(2);
    assert!((400..=600).contains(&third), "got {third}");
}

#[test]
fn results_serialize_with_dashboard_field_names() {
    let results = tokio_test::block_on(engine().run(&taiwan_scenario())).unwrap();
    let value = serde_json::to_value(&results).unwrap();

    assert_eq!(value["strategySource"], "fallback");
    assert_eq!(value["cascadeDepth"], 1);
    assert_eq!(value["cascadeTimeline"][1]["category"], "supplier");
    assert_eq!(value["cascadeTimeline"][1]["entityId"], "sup-tw-001");
    assert_eq!(value["affectedSuppliers"][0]["recoveryDays"], 52);
    assert!(value["supplyChainHealth"]["before"].is_number());
    assert!(value["costImpact"]["percentage"].is_number());
}

#[test]
fn settings_deserialize_with_defaults() {
    let settings: EngineSettings = serde_json::from_str(
        r#"{ "strategyRetries": 2, "overlap": { "mode": "capped", "ceiling": 1.5 } }"#,
    )
    .unwrap();
    assert_eq!(settings.strategy_timeout_ms, 15_000);
    assert_eq!(settings.strategy_retries, 2);
    assert_eq!(settings.overlap, OverlapPolicy::Capped { ceiling: 1.5 });
    assert_eq!(settings.baseline_availability, 85.0);
}
