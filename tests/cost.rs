//! 유틸리티 비용 엔진 회귀 테스트.
use pyrolysis_twin::cost::{
    energy_intensity, evaporation_duty, CostEngine, CostInputs, CostParameters, EvaporationDutyInput,
    PowerLevels, TariffConfiguration, MMBTU_PER_MWH,
};
use pyrolysis_twin::fleet::{aggregate_fleet, UnitModel};
use pyrolysis_twin::config::Config;

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {rel_tol})"
    );
}

fn engine() -> CostEngine {
    CostEngine::new(TariffConfiguration::default(), CostParameters::default())
}

fn inputs(electrical_kw: f64, thermal_mw: f64, production_kg_h: f64) -> CostInputs {
    CostInputs {
        power: PowerLevels {
            electrical_kw,
            thermal_mw,
            pneumatic_m3_h: 0.0,
        },
        production_rate_kg_h: production_kg_h,
        syngas_kg_h: 0.0,
    }
}

#[test]
fn hourly_costs_follow_tariffs() {
    let b = engine().compute(&inputs(100.0, 1.0, 2000.0));
    assert_close("electrical", b.electrical_cost_per_hour, 14.0, 1e-12);
    assert_close("thermal", b.thermal_cost_per_hour, MMBTU_PER_MWH * 9.5, 1e-12);
    assert_eq!(b.pneumatic_cost_per_hour, 0.0);
    assert_close("total", b.total_cost_per_hour, 14.0 + MMBTU_PER_MWH * 9.5, 1e-12);
    // (100 + 1000) kW / 2 t/h
    assert_close("intensity", b.energy_intensity, 550.0, 1e-12);
    assert_close("net", b.net_cost_per_hour, b.total_cost_per_hour, 1e-12);
}

#[test]
fn zero_production_reports_zero_intensity() {
    let b = engine().compute(&inputs(100.0, 1.0, 0.0));
    assert_eq!(b.energy_intensity, 0.0);
    assert!(b.total_cost_per_hour > 0.0);
    assert_eq!(energy_intensity(100.0, -5.0), 0.0);
    assert_eq!(energy_intensity(100.0, f64::NAN), 0.0);
    assert_eq!(energy_intensity(f64::INFINITY, 10.0), 0.0);
}

#[test]
fn reloaded_tariffs_apply_to_next_compute() {
    let mut e = engine();
    let before = e.compute(&inputs(100.0, 0.0, 1000.0));
    e.reload_tariffs(TariffConfiguration {
        grid_electricity_price: 0.28,
        ..TariffConfiguration::default()
    });
    let after = e.compute(&inputs(100.0, 0.0, 1000.0));
    assert_close("doubled", after.electrical_cost_per_hour, 2.0 * before.electrical_cost_per_hour, 1e-12);
    assert_eq!(e.tariffs().grid_electricity_price, 0.28);
}

#[test]
fn thermal_demand_scales_with_humidity_and_never_negative() {
    let e = engine();
    assert_close("reference", e.thermal_demand_mw(20.0), 1.2, 1e-12);
    assert_close("wetter", e.thermal_demand_mw(30.0), 1.2 * 1.2, 1e-12);
    assert_close("drier", e.thermal_demand_mw(10.0), 1.2 * 0.8, 1e-12);
    assert_eq!(e.thermal_demand_mw(-100.0), 0.0);
}

#[test]
fn compressed_air_adds_shaft_power_cost() {
    let mut i = inputs(0.0, 0.0, 1000.0);
    i.power.pneumatic_m3_h = 300.0;
    let b = engine().compute(&i);
    assert!(b.pneumatic_power_kw > 0.0);
    assert_close("air cost", b.pneumatic_cost_per_hour, b.pneumatic_power_kw * 0.16, 1e-12);
    assert_close("demand", b.total_power_demand_kw, b.pneumatic_power_kw, 1e-12);
    // 300 m3/h, 7 bar g 단열 압축은 대략 30~40 kW 범위
    assert!((25.0..45.0).contains(&b.pneumatic_power_kw), "{}", b.pneumatic_power_kw);
}

#[test]
fn syngas_credit_reduces_net_cost() {
    let mut i = inputs(50.0, 0.0, 1000.0);
    i.syngas_kg_h = 110.0;
    let b = engine().compute(&i);
    // 110 kg/h ÷ 1.1 kg/m3 × 0.35
    assert_close("credit", b.syngas_credit_per_hour, 35.0, 1e-12);
    assert_close("net", b.net_cost_per_hour, b.total_cost_per_hour - 35.0, 1e-12);
}

#[test]
fn fleet_inputs_take_energy_and_production_from_aggregate() {
    let cfg = Config::default();
    let run = aggregate_fleet(&cfg.fleet, &cfg.preset_catalog(), &cfg.profiles, &UnitModel::default());
    let e = cfg.cost_engine();
    let i = e.fleet_inputs(&run.aggregate, 20.0, 0.0);
    assert_eq!(i.power.electrical_kw, run.aggregate.total_energy_kw);
    assert_eq!(i.production_rate_kg_h, run.aggregate.total_production_kg_h());
    assert_eq!(i.syngas_kg_h, run.aggregate.total_gas_kg_h);
    assert_close("thermal", i.power.thermal_mw, 1.2, 1e-12);
}

#[test]
fn negative_tariff_is_rejected() {
    let t = TariffConfiguration {
        fired_heat_price_mmbtu: -1.0,
        ..TariffConfiguration::default()
    };
    assert!(t.validate().is_err());
    assert!(TariffConfiguration::default().validate().is_ok());
}

#[test]
fn dryer_duty_uses_if97_latent_heat() {
    let r = evaporation_duty(EvaporationDutyInput {
        feed_kg_h: 1000.0,
        moisture_in_pct: 50.0,
        moisture_out_pct: 10.0,
        evaporation_temp_c: 100.0,
    })
    .expect("duty");
    // 건고형분 500 → 배출 555.6 kg/h
    assert_close("water", r.water_removed_kg_h, 1000.0 - 500.0 / 0.9, 1e-9);
    // 100 °C 포화 hfg ≈ 2256.5 kJ/kg
    assert_close("hfg", r.latent_heat_kj_per_kg, 2256.5, 2e-3);
    assert_close("duty", r.duty_kw, r.water_removed_kg_h * r.latent_heat_kj_per_kg / 3600.0, 1e-12);
}

#[test]
fn dryer_duty_outside_saturation_range_fails() {
    let input = EvaporationDutyInput {
        feed_kg_h: 1000.0,
        moisture_in_pct: 50.0,
        moisture_out_pct: 10.0,
        evaporation_temp_c: 400.0,
    };
    assert!(evaporation_duty(input).is_err());
}
