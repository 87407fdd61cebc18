//! 설정 TOML 왕복과 검증, CLI 명령 스모크 테스트.
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use pyrolysis_twin::app::{self, Cli};
use pyrolysis_twin::config::{load_or_default, Config};
use pyrolysis_twin::TwinError;

fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pyrolysis_twin_{}_{name}", std::process::id()));
    let _ = fs::remove_file(&dir);
    dir
}

#[test]
fn default_config_roundtrips_through_toml() {
    let cfg = Config::default();
    let text = cfg.to_toml_string().expect("serialize");
    let back = Config::from_toml_str(&text).expect("parse");
    assert_eq!(back, cfg);
}

#[test]
fn partial_file_falls_back_to_defaults() {
    let cfg = Config::from_toml_str(
        r#"
[tariffs]
grid_electricity_price = 0.2

[process]
silo_capacity_kg = 800.0
"#,
    )
    .expect("parse");
    assert_eq!(cfg.tariffs.grid_electricity_price, 0.2);
    assert_eq!(cfg.tariffs.currency, "EUR");
    assert_eq!(cfg.process.silo_capacity_kg, 800.0);
    assert_eq!(cfg.process.tick_interval_ms, 1000);
    assert_eq!(cfg.fleet.len(), 3);
}

#[test]
fn composition_not_summing_to_100_is_rejected() {
    let err = Config::from_toml_str(
        r#"
[composition]
organic = 60.0
plastics = 20.0
"#,
    )
    .unwrap_err();
    assert!(matches!(err, TwinError::MalformedComposition(_)), "{err}");
}

#[test]
fn out_of_range_parameters_are_rejected() {
    let bad_trip = r#"
[[process.machines]]
name = "primary_shredder"
trip_probability = 1.5
failure_mode = "jammed"
"#;
    assert!(matches!(
        Config::from_toml_str(bad_trip),
        Err(TwinError::InvalidParameter(_))
    ));

    let bad_profile = r#"
[profiles.custom.low]
temperature_band_label = "low"
yield_biochar_pct = 50.0
yield_oil_pct = 50.0
yield_gas_pct = 50.0

[profiles.custom.medium]
temperature_band_label = "medium"
yield_biochar_pct = 30.0
yield_oil_pct = 40.0
yield_gas_pct = 30.0

[profiles.custom.high]
temperature_band_label = "high"
yield_biochar_pct = 20.0
yield_oil_pct = 30.0
yield_gas_pct = 50.0
"#;
    assert!(Config::from_toml_str(bad_profile).is_err());
    assert!(matches!(Config::from_toml_str("[unit_model"), Err(TwinError::TomlDe(_))));
}

#[test]
fn load_or_default_writes_missing_file_then_reads_it() {
    let path = temp_path("load.toml");
    let created = load_or_default(&path).expect("create");
    assert!(path.exists());
    let loaded = load_or_default(&path).expect("load");
    assert_eq!(created, loaded);
    let _ = fs::remove_file(&path);
}

#[test]
fn cli_fleet_and_process_emit_snapshot_json() {
    let path = temp_path("cli.toml");
    let config = path.to_string_lossy().to_string();
    let config = config.as_str();

    let fleet = Cli::parse_from(["twin_cli", "--config", config, "fleet", "--humidity", "25"]);
    let out = app::run(&fleet).expect("fleet");
    let json: serde_json::Value = serde_json::from_str(&out).expect("json");
    assert_eq!(json["fleet"]["calculatedResults"]["aggregate"]["rollup_status"], "operating");
    assert!(json["cost"]["calculatedResults"]["total_cost_per_hour"].as_f64().unwrap_or(0.0) > 0.0);

    let process = Cli::parse_from(["twin_cli", "--config", config, "process", "--ticks", "5", "--seed", "3"]);
    let out = app::run(&process).expect("process");
    let json: serde_json::Value = serde_json::from_str(&out).expect("json");
    assert_eq!(json["inputs"]["ticks"], 5);
    assert_eq!(json["calculatedResults"]["tick"], 5);

    let normalize = Cli::parse_from(["twin_cli", "--config", config, "normalize", "--key", "organic", "--value", "90"]);
    let out = app::run(&normalize).expect("normalize");
    let json: serde_json::Value = serde_json::from_str(&out).expect("json");
    assert_eq!(json["calculatedResults"]["organic"], 90.0);

    let again = Cli::parse_from(["twin_cli", "--config", config, "init-config"]);
    assert!(app::run(&again).is_err());

    let forced = Cli::parse_from(["twin_cli", "--config", config, "init-config", "--force"]);
    let out = app::run(&forced).expect("init-config --force");
    let json: serde_json::Value = serde_json::from_str(&out).expect("json");
    assert_eq!(
        json["presets"],
        serde_json::json!(["fast-oil", "intermediate", "slow-biochar", "syngas"])
    );
    assert_eq!(json["unitModels"], serde_json::json!(["pyro-500", "pyro-compact"]));
    let _ = fs::remove_file(&path);
}
