//! 플릿 집계: 부분/전체 Fault 롤업과 순서 무관성.
use proptest::prelude::*;
use pyrolysis_twin::fleet::{aggregate_fleet, FleetConfiguration, RollupStatus, UnitAssignment, UnitModel};
use pyrolysis_twin::profile::ProfileCatalog;
use pyrolysis_twin::reactor::{simulate_unit, PresetCatalog, UnitStatus};

fn assert_close(label: &str, actual: f64, expected: f64, tol: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.2e}, tol {tol})"
    );
}

fn fleet(pairs: &[(&str, &str)]) -> FleetConfiguration {
    FleetConfiguration::new(pairs.iter().map(|(id, p)| UnitAssignment::new(*id, *p)).collect())
}

#[test]
fn unknown_preset_gives_partial_fault_with_good_units_summed() {
    let presets = PresetCatalog::builtin();
    let profiles = ProfileCatalog::default();
    let model = UnitModel::default();
    let table = profiles.try_table(&model.model_id).expect("table");

    let run = aggregate_fleet(
        &fleet(&[("R1", "fast-oil"), ("R2", "nope"), ("R3", "slow-biochar")]),
        &presets,
        &profiles,
        &model,
    );

    let a = simulate_unit(presets.get("fast-oil").expect("preset"), table, model.base_capacity_kg_h);
    let b = simulate_unit(presets.get("slow-biochar").expect("preset"), table, model.base_capacity_kg_h);

    let agg = run.aggregate;
    assert_eq!(agg.rollup_status, RollupStatus::PartialFault);
    assert_eq!(agg.operating_units, 2);
    assert_eq!(agg.faulted_units, 1);
    assert_close("oil", agg.total_bio_oil_kg_h, a.bio_oil_kg_h + b.bio_oil_kg_h, 1e-9);
    assert_close("char", agg.total_biochar_kg_h, a.biochar_kg_h + b.biochar_kg_h, 1e-9);
    assert_close("gas", agg.total_gas_kg_h, a.gas_kg_h + b.gas_kg_h, 1e-9);
    assert_close(
        "energy",
        agg.total_energy_kw,
        a.energy_consumption_kw + b.energy_consumption_kw,
        1e-9,
    );

    let ids: Vec<&str> = run.units.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, ["R1", "R2", "R3"]);
    assert_eq!(run.units[1].status, UnitStatus::Fault);
}

#[test]
fn all_unknown_presets_give_total_fault_and_zero_totals() {
    let run = aggregate_fleet(
        &fleet(&[("R1", "x"), ("R2", "y")]),
        &PresetCatalog::builtin(),
        &ProfileCatalog::default(),
        &UnitModel::default(),
    );
    assert_eq!(run.aggregate.rollup_status, RollupStatus::TotalFault);
    assert_eq!(run.aggregate.total_production_kg_h(), 0.0);
    assert_eq!(run.aggregate.total_energy_kw, 0.0);
}

#[test]
fn empty_fleet_is_total_fault() {
    let run = aggregate_fleet(
        &FleetConfiguration::default(),
        &PresetCatalog::builtin(),
        &ProfileCatalog::default(),
        &UnitModel::default(),
    );
    assert_eq!(run.aggregate.rollup_status, RollupStatus::TotalFault);
    assert!(run.units.is_empty());
}

#[test]
fn unknown_unit_model_faults_every_unit() {
    let model = UnitModel {
        model_id: "unregistered".into(),
        base_capacity_kg_h: 500.0,
    };
    let run = aggregate_fleet(
        &fleet(&[("R1", "fast-oil")]),
        &PresetCatalog::builtin(),
        &ProfileCatalog::default(),
        &model,
    );
    assert_eq!(run.aggregate.rollup_status, RollupStatus::TotalFault);
}

#[test]
fn all_good_units_are_operating() {
    let run = aggregate_fleet(
        &fleet(&[("R1", "fast-oil"), ("R2", "syngas")]),
        &PresetCatalog::builtin(),
        &ProfileCatalog::default(),
        &UnitModel::default(),
    );
    assert_eq!(run.aggregate.rollup_status, RollupStatus::Operating);
    assert_eq!(run.aggregate.faulted_units, 0);
}

const PRESET_NAMES: [&str; 5] = ["fast-oil", "intermediate", "slow-biochar", "syngas", "unknown"];

proptest! {
    /// 유닛 순서를 바꿔도 합계와 롤업은 같다(부동소수 허용오차 내).
    #[test]
    fn totals_do_not_depend_on_unit_order(
        picks in prop::collection::vec(0usize..PRESET_NAMES.len(), 1..12),
        seed in any::<u64>(),
    ) {
        let presets = PresetCatalog::builtin();
        let profiles = ProfileCatalog::default();
        let model = UnitModel::default();

        let assignments: Vec<UnitAssignment> = picks
            .iter()
            .enumerate()
            .map(|(i, p)| UnitAssignment::new(format!("R{i}"), PRESET_NAMES[*p]))
            .collect();
        let mut shuffled = assignments.clone();
        let n = shuffled.len();
        let mut s = seed;
        for i in (1..n).rev() {
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            shuffled.swap(i, (s >> 33) as usize % (i + 1));
        }

        let a = aggregate_fleet(&FleetConfiguration::new(assignments), &presets, &profiles, &model).aggregate;
        let b = aggregate_fleet(&FleetConfiguration::new(shuffled), &presets, &profiles, &model).aggregate;

        prop_assert_eq!(a.rollup_status, b.rollup_status);
        prop_assert_eq!(a.faulted_units, b.faulted_units);
        prop_assert!((a.total_bio_oil_kg_h - b.total_bio_oil_kg_h).abs() < 1e-6);
        prop_assert!((a.total_biochar_kg_h - b.total_biochar_kg_h).abs() < 1e-6);
        prop_assert!((a.total_gas_kg_h - b.total_gas_kg_h).abs() < 1e-6);
        prop_assert!((a.total_energy_kw - b.total_energy_kw).abs() < 1e-6);
    }
}
