use std::path::{Path, PathBuf};
use std::sync::Arc;

use chainrisk_lib::climate::ClimateRiskClient;
use chainrisk_lib::db::{self, Database};
use chainrisk_lib::mitigation::create_service;
use chainrisk_lib::{
    builtin_catalog, AppConfig, ReferenceData, ScenarioInput, SimulationEngine, SimulationResults,
    SimulationScenario,
};

#[derive(Debug, Default)]
struct CliOptions {
    scenarios: Vec<PathBuf>,
    catalog: Option<PathBuf>,
    config: Option<PathBuf>,
    save_as: Option<String>,
    db_path: Option<PathBuf>,
    with_climate: bool,
    list_saved: bool,
    show_saved: Option<String>,
    pretty: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    chainrisk_lib::init_tracing();

    if let Err(error) = run().await {
        eprintln!("chainrisk failed: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let Some(options) = parse_args()? else {
        print_help();
        return Ok(());
    };

    let config = AppConfig::load(options.config.as_deref()).map_err(|e| e.to_string())?;
    let db_path = options.db_path.clone().unwrap_or_else(|| config.db_path());

    if options.list_saved {
        let db = open_db(&db_path)?;
        let runs = db::list_saved_runs(&db, 50).map_err(|e| e.to_string())?;
        return print_json(&runs, options.pretty);
    }
    if let Some(id) = options.show_saved.as_deref() {
        let db = open_db(&db_path)?;
        let run = db::get_saved_run(&db, id).map_err(|e| e.to_string())?;
        return print_json(&run, options.pretty);
    }
    if options.scenarios.is_empty() {
        return Err("at least one --scenario <file> is required".to_string());
    }

    let reference = match options.catalog.as_deref() {
        Some(path) => ReferenceData::from_file(path).map_err(|e| e.to_string())?,
        None => builtin_catalog(),
    };

    let mut inputs = Vec::new();
    for path in &options.scenarios {
        inputs.extend(read_scenario_inputs(path)?);
    }

    if options.with_climate {
        let client = ClimateRiskClient::new(&config.climate).map_err(|e| e.to_string())?;
        let events = client.events().await.map_err(|e| e.to_string())?;
        tracing::info!("adding {} climate events as disruption regions", events.len());
        for input in &mut inputs {
            let recovery_days = input.duration_days;
            input.regions.extend(
                events
                    .iter()
                    .map(|event| event.to_region(&reference.suppliers, recovery_days)),
            );
        }
    }

    let scenarios = inputs
        .into_iter()
        .map(SimulationScenario::new)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid scenario: {e}"))?;

    let mut engine = SimulationEngine::new(Arc::new(reference), config.engine.clone())
        .map_err(|e| e.to_string())?;
    if let Some(service) = create_service(&config.mitigation).map_err(|e| e.to_string())? {
        engine = engine.with_mitigation(service);
    }

    let results = engine
        .run_batch(&scenarios)
        .await
        .into_iter()
        .collect::<Result<Vec<SimulationResults>, _>>()
        .map_err(|e| e.to_string())?;

    if let Some(name) = options.save_as.as_deref() {
        let db = open_db(&db_path)?;
        for (scenario, result) in scenarios.iter().zip(&results) {
            let id = db::save_run(&db, name, scenario, result).map_err(|e| e.to_string())?;
            eprintln!("saved run {id} to {}", db_path.display());
        }
    }

    if results.len() == 1 {
        print_json(&results[0], options.pretty)
    } else {
        print_json(&results, options.pretty)
    }
}

fn parse_args() -> Result<Option<CliOptions>, String> {
    let mut options = CliOptions::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        let mut value_for = |flag: &str| {
            args.next()
                .ok_or_else(|| format!("{flag} requires a value"))
        };
        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            "--scenario" | "-s" => options.scenarios.push(PathBuf::from(value_for("--scenario")?)),
            "--catalog" => options.catalog = Some(PathBuf::from(value_for("--catalog")?)),
            "--config" => options.config = Some(PathBuf::from(value_for("--config")?)),
            "--save" => options.save_as = Some(value_for("--save")?),
            "--db" => options.db_path = Some(PathBuf::from(value_for("--db")?)),
            "--show" => options.show_saved = Some(value_for("--show")?),
            "--list" => options.list_saved = true,
            "--with-climate" => options.with_climate = true,
            "--pretty" => options.pretty = true,
            other => return Err(format!("unknown argument '{other}'. Use --help for usage")),
        }
    }

    Ok(Some(options))
}

/// A scenario file holds one scenario object or an array of them.
fn read_scenario_inputs(path: &Path) -> Result<Vec<ScenarioInput>, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read scenario {}: {e}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| format!("invalid scenario JSON in {}: {e}", path.display()))?;
    let parsed = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|input| vec![input])
    };
    parsed.map_err(|e| format!("invalid scenario in {}: {e}", path.display()))
}

fn open_db(path: &Path) -> Result<Database, String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
    }
    Database::open(path).map_err(|e| e.to_string())
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| e.to_string())?;
    println!("{rendered}");
    Ok(())
}

fn print_help() {
    println!("Supply-chain disruption simulator");
    println!();
    println!("Usage:");
    println!("  chainrisk --scenario <file> [options]");
    println!("  chainrisk --list | --show <id>");
    println!();
    println!("Options:");
    println!("  --scenario, -s <file>   Scenario JSON (object or array); repeatable");
    println!("  --catalog <file>        Reference data JSON (default: built-in sample network)");
    println!("  --config <file>         Config JSON (env overrides still apply)");
    println!("  --with-climate          Add current climate-feed events as disruption regions");
    println!("  --save <name>           Store results in the saved-runs database");
    println!("  --db <path>             Database path (default: <dataDir>/chainrisk.db)");
    println!("  --list                  List saved runs, newest first");
    println!("  --show <id>             Print one saved run");
    println!("  --pretty                Pretty-print JSON output");
    println!();
    println!("Environment:");
    println!("  CHAINRISK_MITIGATION_PROVIDER  none|http|openai-compat");
    println!("  CHAINRISK_MITIGATION_URL       Strategy service endpoint (http provider)");
    println!("  CHAINRISK_LLM_API_KEY          API key for openai-compat (or OPENAI_API_KEY)");
    println!("  CHAINRISK_LLM_MODEL            Model id for openai-compat");
    println!("  CHAINRISK_LLM_BASE_URL         Base URL for openai-compat");
    println!("  CHAINRISK_CLIMATE_URL          Climate event feed URL");
    println!("  CHAINRISK_DATA_DIR             Directory for chainrisk.db");
    println!("  RUST_LOG                       Log filter (default: chainrisk_lib=debug,info)");
}
