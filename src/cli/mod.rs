//! Wildfire planner CLI
//!
//! Command-line interface for planning runs, preprocessing and scenario inspection.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::PlannerConfig;
use crate::planner::WildfirePlanner;
use crate::preprocessing::ProcessedData;
use crate::report::PlanReport;
use crate::scenario::Scenario;
use crate::utils::{DataLoader, DatasetLocator};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(255, 150, 80) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "wildfire-planner")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scenario-based wildfire resource allocation")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full planning pipeline (default)
    Plan {
        /// Incident dataset (CSV); probed in datasets/ when omitted
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Planner configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of scenarios
        #[arg(short = 'n', long)]
        scenarios: Option<usize>,

        /// Seed for site synthesis
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write the report as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Preprocess the dataset and write the processed matrix
    Preprocess {
        /// Incident dataset (CSV); probed in datasets/ when omitted
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Planner configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show generated scenarios and sites without solving
    Scenarios {
        /// Incident dataset (CSV); probed in datasets/ when omitted
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Planner configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of scenarios
        #[arg(short = 'n', long)]
        scenarios: Option<usize>,

        /// Seed for site synthesis
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Print the default configuration as JSON
    Config {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// ─── Shared setup ──────────────────────────────────────────────────────────────

fn load_config(
    path: Option<&Path>,
    scenarios: Option<usize>,
    seed: Option<u64>,
) -> anyhow::Result<PlannerConfig> {
    let mut config = match path {
        Some(p) => PlannerConfig::from_json_file(p)?,
        None => PlannerConfig::default(),
    };
    if let Some(n) = scenarios {
        config.scenarios.n_scenarios = n;
    }
    if seed.is_some() {
        config.scenarios.site_seed = seed;
    }
    config.validate()?;
    Ok(config)
}

fn locator(data: Option<&Path>) -> DatasetLocator {
    match data {
        Some(path) => DatasetLocator::new().with_explicit(path),
        None => DatasetLocator::new(),
    }
}

fn load_processed(planner: &WildfirePlanner, data: Option<&Path>) -> anyhow::Result<ProcessedData> {
    step_run("Loading and preprocessing data");
    let start = Instant::now();
    match planner.load_processed(&locator(data)) {
        Ok((path, processed)) => {
            step_done(&format!(
                "{} rows, {} features from {} in {:?}",
                processed.n_rows(),
                processed.feature_names.len(),
                path.display(),
                start.elapsed()
            ));
            Ok(processed)
        }
        Err(e) => {
            println!("{}", "failed".red());
            println!("  {}", e.to_string().red());
            Err(e.into())
        }
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_plan(
    data: Option<&Path>,
    config: Option<&Path>,
    scenarios: Option<usize>,
    seed: Option<u64>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    section("Plan");

    let planner = WildfirePlanner::new(load_config(config, scenarios, seed)?);
    let processed = load_processed(&planner, data)?;

    step_run("Generating scenarios");
    let start = Instant::now();
    let (scenarios, site_seed) = planner.generate_scenarios(&processed)?;
    step_done(&format!("{} scenarios, seed {} in {:?}", scenarios.len(), site_seed, start.elapsed()));

    step_run("Optimizing allocations");
    let start = Instant::now();
    let outcomes = planner.allocate(&scenarios);
    step_done(&format!("{:?}", start.elapsed()));

    let report = PlanReport::from_outcomes(&scenarios, outcomes, site_seed);
    print_report(&report);

    if let Some(path) = output {
        report.to_json_file(path)?;
        step_ok(&format!("Report saved → {}", path.display()));
        println!();
    }

    Ok(())
}

pub fn cmd_preprocess(data: Option<&Path>, output: &Path, config: Option<&Path>) -> anyhow::Result<()> {
    section("Preprocess");

    let planner = WildfirePlanner::new(load_config(config, None, None)?);
    let processed = load_processed(&planner, data)?;

    step_run(&format!("Saving → {}", output.display()));
    let mut out = processed.to_dataframe()?;
    DataLoader::new().save_csv(&mut out, output)?;
    step_done(&format!("{} rows × {} cols", out.height(), out.width()));

    if processed.dropped_rows > 0 {
        println!("  {} {}", muted("dropped"), format!("{} incomplete rows", processed.dropped_rows).yellow());
    }
    println!();
    Ok(())
}

pub fn cmd_scenarios(
    data: Option<&Path>,
    config: Option<&Path>,
    scenarios: Option<usize>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    section("Scenarios");

    let planner = WildfirePlanner::new(load_config(config, scenarios, seed)?);
    let processed = load_processed(&planner, data)?;
    let (scenarios, site_seed) = planner.generate_scenarios(&processed)?;

    println!("  {:<12} {}", muted("Site seed"), site_seed);
    for scenario in &scenarios {
        print_scenario(scenario);
    }
    println!();
    Ok(())
}

pub fn cmd_config(output: Option<&Path>) -> anyhow::Result<()> {
    let config = PlannerConfig::default();
    match output {
        Some(path) => {
            config.to_json_file(path)?;
            step_ok(&format!("Configuration saved → {}", path.display()));
        }
        None => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}

// ─── Rendering ─────────────────────────────────────────────────────────────────

fn print_scenario(scenario: &Scenario) {
    let s = &scenario.stats;
    section(&format!("Scenario {}", scenario.id));
    println!("  {:<14} {:.3} ({} rows)", muted("Probability"), scenario.probability, s.size);
    println!(
        "  {:<14} wind {:.1} m/s · slope {:.1}° · humidity {:.1}% · fuel {} · damage {}",
        muted("Risk"),
        s.wind_speed,
        s.slope,
        s.humidity,
        s.fuel_type,
        s.damage_class
    );
    println!("  {:<14} {} (area {:.1})", muted("Required"), s.required_resources, s.damage_area);
    for (id, site) in &scenario.sites {
        let distances: Vec<String> = site.distances.iter().map(|(t, d)| format!("{}={:.1}", t, d)).collect();
        println!(
            "  {:<14} demand {} at ({:.4}, {:.4}) {}",
            id.white(),
            site.demand,
            site.latitude,
            site.longitude,
            dim(&distances.join(" "))
        );
    }
}

/// Key/value rows of the report summary box
fn summary_lines(report: &PlanReport) -> Vec<(&'static str, String)> {
    vec![
        ("Expected cost ", format!("{:.2}", report.total_weighted_cost)),
        ("Allocations   ", report.total_allocations.to_string()),
        ("Solved        ", format!("{} / {}", report.solved, report.scenario_count())),
        ("Failed        ", report.failed.to_string()),
        ("Site seed     ", report.site_seed.to_string()),
    ]
}

pub fn print_report(report: &PlanReport) {
    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "Wildfire Resource Plan".white().bold()));
    line_box_center(&format!("{}", dim(&report.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string())));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    for (key, value) in summary_lines(report) {
        line_box(&kv(key, &value));
    }
    line_box_empty();
    line_box_bottom();

    for result in report.results.values() {
        let s = &result.stats;
        match result.cost {
            Some(cost) => section(&format!("Scenario {}  ·  p={:.3}  ·  cost {:.2}", result.scenario, result.probability, cost)),
            None => {
                section(&format!("Scenario {}  ·  p={:.3}", result.scenario, result.probability));
                println!("  {}", "no feasible allocation".red());
                continue;
            }
        }

        println!(
            "  {:<10} wind {:.1} m/s · slope {:.1}° · humidity {:.1}% · fuel {} · damage {}",
            muted("Risk"),
            s.wind_speed,
            s.slope,
            s.humidity,
            s.fuel_type,
            s.damage_class
        );
        println!(
            "  {:<10} {} ({:.5}, {:.5})",
            muted("Base"),
            result.base_station.name,
            result.base_station.latitude,
            result.base_station.longitude
        );
        println!();
        println!(
            "  {:<8} {:<6} {:>4} {:>9} {:>10} {:>10}",
            muted("Site"),
            muted("Type"),
            muted("Qty"),
            muted("km"),
            muted("Lat"),
            muted("Lon")
        );
        println!("  {}", dim(&"─".repeat(52)));
        for a in &result.allocations {
            println!(
                "  {:<8} {:<6} {:>4} {:>9.2} {:>10.4} {:>10.4}",
                a.site,
                a.resource_type.cyan(),
                a.quantity,
                a.distance,
                a.latitude,
                a.longitude
            );
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::AllocationOutcome;
    use crate::scenario::{BaseStation, ClusterStats};
    use std::collections::BTreeMap;

    fn scenario(id: usize, probability: f64) -> Scenario {
        Scenario {
            id,
            probability,
            stats: ClusterStats {
                wind_speed: 4.0,
                slope: 8.0,
                humidity: 50.0,
                required_resources: 2,
                damage_area: 1.0,
                fuel_type: 1,
                damage_class: 1,
                probability,
                size: 1,
            },
            base_station: BaseStation::default(),
            sites: BTreeMap::new(),
        }
    }

    #[test]
    fn test_summary_shows_failed_count() {
        let scenarios = vec![scenario(0, 0.5), scenario(1, 0.3), scenario(2, 0.2)];
        let outcomes = vec![
            AllocationOutcome::failed(0, "infeasible"),
            AllocationOutcome::failed(1, "infeasible"),
            AllocationOutcome::failed(2, "infeasible"),
        ];
        let report = PlanReport::from_outcomes(&scenarios, outcomes, 3);

        let lines = summary_lines(&report);
        let failed = lines.iter().find(|(key, _)| key.trim() == "Failed").unwrap();
        assert_eq!(failed.1, "3");
        let solved = lines.iter().find(|(key, _)| key.trim() == "Solved").unwrap();
        assert_eq!(solved.1, "0 / 3");
    }
}
