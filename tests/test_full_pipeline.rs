//! End-to-end tests: CSV on disk through to the aggregated plan

use std::fmt::Write as _;
use std::path::PathBuf;
use tempfile::TempDir;
use wildfire_planner::config::PlannerConfig;
use wildfire_planner::error::PlannerError;
use wildfire_planner::planner::WildfirePlanner;
use wildfire_planner::scenario::ScenarioConfig;
use wildfire_planner::utils::{DatasetLocator, DEFAULT_DATASET};

/// Incident table with scattered blanks, in the raw column layout
fn incident_csv(rows: usize) -> String {
    let mut csv = String::from(
        "WDSP,FRTP_CD,DNST_CD,HMDT,DMCLS_CD,POTFR_RSRC_INPT_QNTT,FRFR_DMG_AREA,OBS_DT\n",
    );
    for i in 0..rows {
        let wind = if i % 9 == 4 { String::new() } else { format!("{:.1}", 0.5 + (i % 8) as f64) };
        let fuel = if i % 13 == 6 { String::new() } else { ((i % 4) + 1).to_string() };
        let slope = if i % 7 == 2 { String::new() } else { (3 + (i * 5) % 25).to_string() };
        let humidity = if i % 11 == 3 { String::new() } else { (25 + (i * 7) % 60).to_string() };
        let damage = ((i % 3) + 1).to_string();
        let required = if i % 10 == 5 { String::new() } else { (1 + (i * 3) % 10).to_string() };
        let area = if i % 6 == 1 { String::new() } else { format!("{:.2}", (i % 5) as f64 * 0.7) };
        writeln!(
            csv,
            "{wind},{fuel},{slope},{humidity},{damage},{required},{area},2023-03-{:02}",
            (i % 28) + 1
        )
        .unwrap();
    }
    csv
}

fn write_dataset(dir: &TempDir, rows: usize) -> PathBuf {
    let path = dir.path().join("incidents.csv");
    std::fs::write(&path, incident_csv(rows)).unwrap();
    path
}

fn seeded_config() -> PlannerConfig {
    PlannerConfig::default().with_scenarios(ScenarioConfig::default().with_site_seed(7))
}

#[test]
fn test_full_run_from_csv() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir, 120);

    let planner = WildfirePlanner::new(seeded_config());
    let run = planner.run_located(&DatasetLocator::new().with_explicit(&path)).unwrap();

    assert_eq!(run.processed.features.nrows(), run.processed.targets.nrows());
    assert!(run.processed.features.iter().all(|v| v.is_finite()));

    let total: f64 = run.scenarios.iter().map(|s| s.probability).sum();
    assert!((total - 1.0).abs() < 1e-9);

    let report = &run.report;
    assert_eq!(report.site_seed, 7);
    assert_eq!(report.scenario_count(), run.scenarios.len());
    assert_eq!(report.solved + report.failed, run.scenarios.len());
    assert!(report.solved > 0);
    assert!(report.total_weighted_cost.is_finite());
    assert!(report.total_weighted_cost > 0.0);

    for result in report.solved_results() {
        assert_eq!(result.map_data.len(), result.allocations.len());
        assert!(result.allocations.iter().all(|a| a.quantity >= 1));
    }
    let allocations: usize = report.solved_results().map(|r| r.allocations.len()).sum();
    assert_eq!(allocations, report.total_allocations);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir, 60);
    let locator = DatasetLocator::new().with_explicit(&path);

    let planner = WildfirePlanner::new(seeded_config());
    let a = planner.run_located(&locator).unwrap();
    let b = planner.run_located(&locator).unwrap();

    assert_eq!(a.scenarios, b.scenarios);
    assert_eq!(a.report.total_weighted_cost, b.report.total_weighted_cost);
    assert_eq!(a.report.results, b.report.results);
}

#[test]
fn test_report_json_export() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir, 40);
    let out = dir.path().join("report.json");

    let run = WildfirePlanner::new(seeded_config())
        .run_located(&DatasetLocator::new().with_explicit(&path))
        .unwrap();
    run.report.to_json_file(&out).unwrap();

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert!(value["generated_at"].is_string());
    assert_eq!(value["solved"], run.report.solved);
    assert!(value["results"].is_object());
}

#[test]
fn test_dataset_discovered_in_parent_directory() {
    let dir = TempDir::new().unwrap();
    let datasets = dir.path().join("datasets");
    std::fs::create_dir_all(&datasets).unwrap();
    std::fs::write(datasets.join(DEFAULT_DATASET), incident_csv(30)).unwrap();
    let work = dir.path().join("app").join("bin");
    std::fs::create_dir_all(&work).unwrap();

    let locator = DatasetLocator::new().with_roots(vec![work]);
    let run = WildfirePlanner::new(seeded_config()).run_located(&locator).unwrap();
    assert!(!run.scenarios.is_empty());
}

#[test]
fn test_unusable_nearer_dataset_is_skipped() {
    let dir = TempDir::new().unwrap();
    let work = dir.path().join("app");
    let near = work.join("datasets");
    std::fs::create_dir_all(&near).unwrap();
    std::fs::write(near.join(DEFAULT_DATASET), "foo,bar\n1,2\n").unwrap();
    let far = dir.path().join("datasets");
    std::fs::create_dir_all(&far).unwrap();
    std::fs::write(far.join(DEFAULT_DATASET), incident_csv(30)).unwrap();

    let locator = DatasetLocator::new().with_roots(vec![work]);
    let run = WildfirePlanner::new(seeded_config()).run_located(&locator).unwrap();
    assert!(run.processed.n_rows() > 1);
    assert!(!run.scenarios.is_empty());
}

#[test]
fn test_only_unusable_datasets_abort() {
    let dir = TempDir::new().unwrap();
    let datasets = dir.path().join("datasets");
    std::fs::create_dir_all(&datasets).unwrap();
    std::fs::write(datasets.join(DEFAULT_DATASET), "foo,bar\n1,2\n").unwrap();

    let locator = DatasetLocator::new().with_roots(vec![dir.path().to_path_buf()]);
    let err = WildfirePlanner::default().run_located(&locator).unwrap_err();
    assert!(matches!(err, PlannerError::DataNotFound { .. }));
}

#[test]
fn test_missing_dataset_aborts() {
    let dir = TempDir::new().unwrap();
    let locator = DatasetLocator::new().with_roots(vec![dir.path().to_path_buf()]);

    let err = WildfirePlanner::default().run_located(&locator).unwrap_err();
    match err {
        PlannerError::DataNotFound { probed } => {
            assert_eq!(probed.len(), 3);
            assert!(probed.iter().all(|p| p.ends_with(DEFAULT_DATASET)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_config_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir, 20);
    let mut config = PlannerConfig::default();
    config.scenarios.n_scenarios = 0;

    let err = WildfirePlanner::new(config)
        .run_located(&DatasetLocator::new().with_explicit(&path))
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidParameter { .. }));
}
