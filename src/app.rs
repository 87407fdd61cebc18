//! CLI 하위 명령 실행. 각 명령은 JSON 스냅샷 문자열을 반환하고 출력은 호출자가 맡는다.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::cost::{evaporation_duty, CostInputs, EvaporationDutyInput, PowerLevels};
use crate::error::{TwinError, TwinResult};
use crate::fleet::aggregate_fleet;
use crate::process::{ProcessController, SimRng};
use crate::snapshot::{cost_report, fleet_report, process_report, CostReport, FleetReport, ReportSnapshot};

#[derive(Debug, Parser)]
#[command(name = "twin_cli", version, about = "열분해 공정 디지털 트윈 시뮬레이터")]
pub struct Cli {
    /// 설정 파일 경로(없으면 기본값으로 생성)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 기본 설정 파일을 쓴다
    InitConfig {
        /// 기존 파일 덮어쓰기
        #[arg(long)]
        force: bool,
    },
    /// 플릿 1사이클 집계
    Fleet {
        /// 비용도 함께 계산할 때의 투입 습도 [%]
        #[arg(long)]
        humidity: Option<f64>,
        /// 압축공기 유량 [m3/h]
        #[arg(long, default_value_t = 0.0)]
        pneumatic_m3h: f64,
    },
    /// 연속 공정 N틱 실행
    Process {
        #[arg(long, default_value_t = 60)]
        ticks: u64,
        #[arg(long, default_value_t = crate::process::rng::DEFAULT_SEED)]
        seed: u64,
        /// 투입 습도 [%]
        #[arg(long, default_value_t = 25.0)]
        humidity: f64,
    },
    /// 부하 수준으로 시간당 비용 계산
    Cost {
        #[arg(long)]
        electrical_kw: f64,
        /// 투입 습도 [%] (열수요 보정)
        #[arg(long)]
        humidity: f64,
        #[arg(long, default_value_t = 0.0)]
        pneumatic_m3h: f64,
        #[arg(long, default_value_t = 0.0)]
        production_kg_h: f64,
        #[arg(long, default_value_t = 0.0)]
        syngas_kg_h: f64,
    },
    /// 조성 한 항목 변경 후 보정 결과
    Normalize {
        #[arg(long)]
        key: String,
        #[arg(long)]
        value: f64,
    },
    /// 건조기 수분 증발열
    Dryer {
        #[arg(long)]
        feed_kg_h: f64,
        #[arg(long)]
        moisture_in: f64,
        #[arg(long)]
        moisture_out: f64,
        #[arg(long, default_value_t = 100.0)]
        temp_c: f64,
    },
}

/// 명령을 실행하고 표준 출력에 쓸 JSON을 반환한다.
pub fn run(cli: &Cli) -> TwinResult<String> {
    let load = || crate::config::load_or_default(&cli.config);
    match &cli.command {
        Command::InitConfig { force } => init_config(cli, *force),
        Command::Fleet {
            humidity,
            pneumatic_m3h,
        } => run_fleet(&load()?, *humidity, *pneumatic_m3h),
        Command::Process {
            ticks,
            seed,
            humidity,
        } => run_process(&load()?, *ticks, *seed, *humidity),
        Command::Cost {
            electrical_kw,
            humidity,
            pneumatic_m3h,
            production_kg_h,
            syngas_kg_h,
        } => {
            let engine = load()?.cost_engine();
            let inputs = CostInputs {
                power: PowerLevels {
                    electrical_kw: *electrical_kw,
                    thermal_mw: engine.thermal_demand_mw(*humidity),
                    pneumatic_m3_h: *pneumatic_m3h,
                },
                production_rate_kg_h: *production_kg_h,
                syngas_kg_h: *syngas_kg_h,
            };
            let breakdown = engine.compute(&inputs);
            cost_report(engine.tariffs(), &inputs, &breakdown).to_json()
        }
        Command::Normalize { key, value } => {
            let cfg = load()?;
            let updated = cfg.composition.with_share(key, *value);
            let inputs = serde_json::json!({
                "composition": cfg.composition,
                "key": key,
                "value": value,
            });
            ReportSnapshot::new(inputs, updated).to_json()
        }
        Command::Dryer {
            feed_kg_h,
            moisture_in,
            moisture_out,
            temp_c,
        } => {
            let input = EvaporationDutyInput {
                feed_kg_h: *feed_kg_h,
                moisture_in_pct: *moisture_in,
                moisture_out_pct: *moisture_out,
                evaporation_temp_c: *temp_c,
            };
            let result = evaporation_duty(input).map_err(|e| TwinError::InvalidParameter(e.into()))?;
            ReportSnapshot::new(input, result).to_json()
        }
    }
}

fn init_config(cli: &Cli, force: bool) -> TwinResult<String> {
    if cli.config.exists() && !force {
        return Err(TwinError::InvalidParameter(format!(
            "{} 파일이 이미 있습니다(--force로 덮어쓰기)",
            cli.config.display()
        )));
    }
    let cfg = Config::default();
    cfg.save(&cli.config)?;
    let presets = cfg.preset_catalog();
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "written": cli.config.display().to_string(),
        "presets": presets.names().collect::<Vec<_>>(),
        "unitModels": cfg.profiles.model_ids().collect::<Vec<_>>(),
    }))?)
}

#[derive(Serialize)]
struct FleetWithCost<'a> {
    fleet: &'a FleetReport,
    cost: &'a CostReport,
}

/// 플릿을 한 사이클 돌리고, 습도가 주어지면 비용 스냅샷도 덧붙인다.
pub fn run_fleet(cfg: &Config, humidity: Option<f64>, pneumatic_m3h: f64) -> TwinResult<String> {
    let presets = cfg.preset_catalog();
    let run = aggregate_fleet(&cfg.fleet, &presets, &cfg.profiles, &cfg.unit_model);
    let report = fleet_report(&cfg.unit_model, &cfg.fleet, &run);
    match humidity {
        None => report.to_json(),
        Some(h) => {
            let engine = cfg.cost_engine();
            let inputs = engine.fleet_inputs(&run.aggregate, h, pneumatic_m3h);
            let breakdown = engine.compute(&inputs);
            let cost = cost_report(engine.tariffs(), &inputs, &breakdown);
            Ok(serde_json::to_string_pretty(&FleetWithCost {
                fleet: &report,
                cost: &cost,
            })?)
        }
    }
}

/// 시드 고정 난수로 연속 공정을 `ticks`틱 진행한 최종 상태를 반환한다.
pub fn run_process(cfg: &Config, ticks: u64, seed: u64, humidity: f64) -> TwinResult<String> {
    let mut controller = ProcessController::new(
        cfg.process.clone(),
        cfg.composition.clone(),
        SimRng::from_seed_u64(seed),
    );
    controller.set_input_humidity(humidity);
    controller.start(std::time::Duration::ZERO);
    for _ in 0..ticks {
        controller.step();
    }
    process_report(controller.params(), controller.input_humidity_pct(), controller.state()).to_json()
}
