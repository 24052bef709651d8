//! staffing-runner: headless staffing planner for logistics hubs.
//!
//! Usage:
//!   staffing-runner --db hubs.db --import hub_volumes.csv
//!   staffing-runner --db hubs.db --hub BLR-01 --per-day-ndx 12 --per-day-dox 5
//!   staffing-runner --demo --seed 42 --hubs 5 --hub HUB-002 --detail
//!   staffing-runner --db hubs.db --hub BLR-01 --set out_ndx_vol_wt=950 --json

use anyhow::{bail, Context, Result};
use hubstaff_core::{
    config::PlanConfig,
    engine::Evaluator,
    import::read_rows,
    lock::{correlation_warnings, Overrides},
    plan::{plan_hub, Forecast, HubPlan, PlanOptions},
    source::RecordSource,
    store::HubStore,
    synthetic::{SyntheticHubs, DEFAULT_SHIFTS},
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let json_output = args.iter().any(|a| a == "--json");
    let detail = args.iter().any(|a| a == "--detail");

    let config = match flag_value(&args, "--data-dir") {
        Some(dir) => PlanConfig::load(dir)?,
        None => PlanConfig::default(),
    };
    // A registry ordering defect stops the run here.
    let evaluator = Evaluator::standard(&config).context("formula registry is invalid")?;

    let store = HubStore::open(db)?;
    store.migrate()?;

    if let Some(path) = flag_value(&args, "--import") {
        let rows = read_rows(Path::new(path))?;
        let batch = store.import_rows(path, &rows)?;
        if !json_output {
            println!("Imported {} rows (batch {})", batch.row_count, batch.batch_id);
        }
    }

    if args.iter().any(|a| a == "--demo") {
        let seed = parse_arg(&args, "--seed", 42u64);
        let hub_count = parse_arg(&args, "--hubs", 5usize);
        log::info!("Generating {hub_count} synthetic hubs (seed {seed})");
        let rows = SyntheticHubs::new(seed).generate(hub_count, &DEFAULT_SHIFTS);
        store.import_rows(&format!("synthetic:{seed}"), &rows)?;
    }

    let Some(hub) = flag_value(&args, "--hub") else {
        let hubs = store.hubs()?;
        if json_output {
            println!("{}", serde_json::to_string(&hubs)?);
        } else if hubs.is_empty() {
            println!("No hubs loaded. Use --import <file> or --demo.");
        } else {
            println!("Hubs ({}):", hubs.len());
            for hub in hubs {
                println!("  {hub}");
            }
        }
        return Ok(());
    };

    let base_edits = parse_edits(&args)?;
    for field in base_edits.keys() {
        config
            .require_base_field(field)
            .context("--set only accepts base inputs")?;
    }
    let edited: Vec<&str> = base_edits.keys().collect();
    let warnings = correlation_warnings(&config.correlated_pairs, &edited);

    let options = PlanOptions {
        forecast: parse_forecast(&args)?,
        base_edits,
    };
    let plan = plan_hub(&store, &evaluator, hub, &options)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        for w in &warnings {
            println!("warning: '{}' edited without '{}'", w.edited, w.partner);
        }
        print_plan(&plan, &evaluator, detail);
    }
    Ok(())
}

fn print_plan(plan: &HubPlan, evaluator: &Evaluator, detail: bool) {
    println!("=== HUB {} ===", plan.hub);
    println!(
        "  baseline:  per_day_ndx {}  per_day_dox {}",
        plan.baseline.per_day_ndx, plan.baseline.per_day_dox
    );
    println!(
        "  forecast:  per_day_ndx {}  per_day_dox {}",
        plan.forecast.per_day_ndx, plan.forecast.per_day_dox
    );
    println!();

    for shift in &plan.shifts {
        println!("Shift: {}", shift.shift);
        println!("  manpower with sorter:    {}", format_total(shift.with_sorter));
        println!("  manpower without sorter: {}", format_total(shift.without_sorter));
        for failure in shift.report.root_failures() {
            println!("  unavailable: {}", failure.failure);
        }
        if detail {
            for entry in evaluator.registry().entries() {
                let locked = if shift.report.locked.iter().any(|k| k == entry.key) {
                    " [locked]"
                } else {
                    ""
                };
                println!(
                    "    {:<55} {:>14}{locked}   = {}",
                    entry.key,
                    format_total(shift.record.available(entry.key)),
                    entry.expr
                );
            }
        }
        println!();
    }
}

fn format_total(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.4}"))
}

fn parse_forecast(args: &[String]) -> Result<Option<Forecast>> {
    let ndx = flag_value(args, "--per-day-ndx");
    let dox = flag_value(args, "--per-day-dox");
    match (ndx, dox) {
        (None, None) => Ok(None),
        (Some(ndx), Some(dox)) => Ok(Some(Forecast {
            per_day_ndx: ndx.parse().with_context(|| format!("bad --per-day-ndx '{ndx}'"))?,
            per_day_dox: dox.parse().with_context(|| format!("bad --per-day-dox '{dox}'"))?,
        })),
        _ => bail!("--per-day-ndx and --per-day-dox must be given together"),
    }
}

/// Every `--set field=value` pair.
fn parse_edits(args: &[String]) -> Result<Overrides> {
    let mut edits = Overrides::new();
    for pair in args.windows(2).filter(|w| w[0] == "--set").map(|w| w[1].as_str()) {
        let (field, value) = pair
            .split_once('=')
            .with_context(|| format!("--set expects field=value, got '{pair}'"))?;
        let value: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("--set {field}: '{value}' is not a number"))?;
        edits.set(field.trim(), value);
    }
    Ok(edits)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
