use clap::Parser;
use masterplan_cli::{MasterplanCli, MasterplanConfig};
use masterplan_engine::PlanError;
use masterplan_types::{CalculatedAreas, FeasibilityOutputs, Scenario};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn run(args: &[&str]) -> anyhow::Result<String> {
    let cli = MasterplanCli::try_parse_from(std::iter::once("masterplan").chain(args.iter().copied()))?;
    cli.run(&MasterplanConfig::default())
}

fn template_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("scenario.json");
    fs::write(&path, run(&["template"]).unwrap()).unwrap();
    path
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn template_follows_configured_defaults() {
    let mut config = MasterplanConfig::from_toml_str("[defaults]\ngsa = 40.0\npreset = \"S2\"\n").unwrap();
    config.output.pretty = true;
    let cli = MasterplanCli::try_parse_from(["masterplan", "template"]).unwrap();

    let output = cli.run(&config).unwrap();
    assert!(output.contains('\n'));
    let scenario: Scenario = serde_json::from_str(&output).unwrap();
    assert_eq!(scenario.parameters.gsa, 40.0);
    assert_eq!(scenario.percentage_of("res_landed"), 100.0);
}

#[test]
fn areas_of_the_default_template() {
    let dir = tempfile::tempdir().unwrap();
    let file = template_file(&dir);

    let areas: CalculatedAreas = serde_json::from_str(&run(&["areas", path_arg(&file)]).unwrap()).unwrap();
    assert!((areas.nca - 5.0).abs() < 1e-9);
    assert!((areas.nsr - 40.0).abs() < 1e-9);
    assert!((areas.nda - 55.0).abs() < 1e-9);
}

#[test]
fn feasibility_prices_the_template() {
    let dir = tempfile::tempdir().unwrap();
    let file = template_file(&dir);

    let outputs: FeasibilityOutputs =
        serde_json::from_str(&run(&["feasibility", path_arg(&file)]).unwrap()).unwrap();
    assert_eq!(outputs.build_cost, 0.0);
    assert!(outputs.total_revenue > 0.0);
}

#[test]
fn set_redistributes_and_reports_unknown_categories() {
    let dir = tempfile::tempdir().unwrap();
    let file = template_file(&dir);

    let output = run(&["set", path_arg(&file), "--category", "res_landed", "--percentage", "60"]).unwrap();
    let scenario: Scenario = serde_json::from_str(&output).unwrap();
    assert!((scenario.percentage_of("res_landed") - 60.0).abs() < 1e-9);
    let total: f64 = scenario.allocations.iter().map(|a| a.percentage).sum();
    assert!((total - 100.0).abs() < 0.1 + 1e-9);

    let err = run(&["set", path_arg(&file), "--category", "res_castle", "--percentage", "5"]).unwrap_err();
    assert!(err.to_string().contains("res_castle"));
}

#[test]
fn set_accepts_hectares() {
    let dir = tempfile::tempdir().unwrap();
    let file = template_file(&dir);

    // 11 ha of a 55 ha NDA
    let output = run(&["set", path_arg(&file), "--category", "res_landed", "--hectares", "11"]).unwrap();
    let scenario: Scenario = serde_json::from_str(&output).unwrap();
    assert!((scenario.percentage_of("res_landed") - 20.0).abs() < 1e-9);
}

#[test]
fn set_requires_exactly_one_amount() {
    let dir = tempfile::tempdir().unwrap();
    let file = template_file(&dir);
    let file = path_arg(&file);

    assert!(run(&["set", file, "--category", "res_landed"]).is_err());
    assert!(run(&["set", file, "--category", "res_landed", "--percentage", "5", "--hectares", "1"]).is_err());
}

#[test]
fn lock_then_rebalance_keeps_the_locked_row() {
    let dir = tempfile::tempdir().unwrap();
    let file = template_file(&dir);

    let locked = run(&["lock", path_arg(&file), "--category", "res_landed"]).unwrap();
    let locked_file = dir.path().join("locked.json");
    fs::write(&locked_file, locked).unwrap();

    let output = run(&["rebalance", path_arg(&locked_file)]).unwrap();
    let scenario: Scenario = serde_json::from_str(&output).unwrap();
    assert!(scenario.allocation("res_landed").unwrap().locked);
    assert_eq!(scenario.percentage_of("res_landed"), 100.0);
}

#[test]
fn add_and_remove_custom_land_use() {
    let dir = tempfile::tempdir().unwrap();
    let file = template_file(&dir);

    let output = run(&[
        "add-custom",
        path_arg(&file),
        "--name",
        "Fire Station",
        "--kind",
        "non-sellable",
        "--group",
        "civic",
        "--percentage",
        "2",
    ])
    .unwrap();
    let scenario: Scenario = serde_json::from_str(&output).unwrap();
    let custom = &scenario.custom_land_uses[0];
    assert!(custom.id.starts_with("custom_"));
    assert_eq!(custom.label, "Fire Station");

    let added_file = dir.path().join("added.json");
    fs::write(&added_file, &output).unwrap();
    let removed = run(&["remove-custom", path_arg(&added_file), "--category", &custom.id]).unwrap();
    let removed: Value = serde_json::from_str(&removed).unwrap();
    assert_eq!(removed["customLandUses"].as_array().map(Vec::len), Some(0));
}

#[test]
fn rejected_custom_land_use_carries_its_code() {
    let dir = tempfile::tempdir().unwrap();
    let file = template_file(&dir);
    let locked = run(&["lock", path_arg(&file), "--category", "res_landed"]).unwrap();
    fs::write(&file, locked).unwrap();

    let err = run(&["add-custom", path_arg(&file), "--name", "Marina", "--kind", "sellable", "--percentage", "5"])
        .unwrap_err();
    let Some(PlanError::CustomLandUse(rejected)) = err.downcast_ref::<PlanError>() else {
        panic!("expected a rejected custom land use, got {err:#}");
    };
    assert_eq!(rejected.code(), "capacity-exceeded");
}

#[test]
fn unreadable_scenario_names_the_file() {
    let err = run(&["summary", "/definitely/not/here.json"]).unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here.json"));
}
