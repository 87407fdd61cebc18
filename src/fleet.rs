//! 독립 구성된 반응기 N대를 실행하고 플릿 합계/상태를 집계한다.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::profile::ProfileCatalog;
use crate::reactor::{PresetCatalog, ProcessUnit, UnitResult};

/// 플릿 전체가 공유하는 설비 모델(수율 테이블 id + 기준 처리용량).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitModel {
    pub model_id: String,
    pub base_capacity_kg_h: f64,
}

impl Default for UnitModel {
    fn default() -> Self {
        Self {
            model_id: "pyro-500".into(),
            base_capacity_kg_h: 500.0,
        }
    }
}

/// 유닛 id와 적용할 프리셋 이름.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitAssignment {
    pub unit_id: String,
    pub preset_name: String,
}

impl UnitAssignment {
    pub fn new(unit_id: impl Into<String>, preset_name: impl Into<String>) -> Self {
        Self {
            unit_id: unit_id.into(),
            preset_name: preset_name.into(),
        }
    }
}

/// 순서가 있는 유닛 구성 목록.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FleetConfiguration {
    pub units: Vec<UnitAssignment>,
}

impl FleetConfiguration {
    pub fn new(units: Vec<UnitAssignment>) -> Self {
        Self { units }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// 플릿 롤업 상태. 가장 나쁜 유닛 결과를 따른다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollupStatus {
    /// 모든 유닛 정상
    Operating,
    /// 일부 성공, 일부 Fault
    PartialFault,
    /// 성공한 유닛 없음(빈 플릿 포함)
    TotalFault,
}

/// 플릿 합계. 매 집계마다 새로 계산된다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FleetAggregateResult {
    pub total_bio_oil_kg_h: f64,
    pub total_biochar_kg_h: f64,
    pub total_gas_kg_h: f64,
    pub total_energy_kw: f64,
    pub rollup_status: RollupStatus,
    pub operating_units: usize,
    pub faulted_units: usize,
}

impl FleetAggregateResult {
    /// 유닛 목록을 주어진 순서대로 합산한다.
    pub fn from_units(units: &[ProcessUnit]) -> Self {
        let mut totals = FleetTotals::default();
        let mut faulted = 0;
        for unit in units {
            match &unit.last_result {
                Some(result) => totals.add(result),
                None => faulted += 1,
            }
        }
        let operating = units.len() - faulted;
        let rollup_status = if operating == 0 {
            RollupStatus::TotalFault
        } else if faulted == 0 {
            RollupStatus::Operating
        } else {
            RollupStatus::PartialFault
        };
        Self {
            total_bio_oil_kg_h: totals.bio_oil_kg_h,
            total_biochar_kg_h: totals.biochar_kg_h,
            total_gas_kg_h: totals.gas_kg_h,
            total_energy_kw: totals.energy_kw,
            rollup_status,
            operating_units: operating,
            faulted_units: faulted,
        }
    }

    pub fn total_production_kg_h(&self) -> f64 {
        self.total_bio_oil_kg_h + self.total_biochar_kg_h + self.total_gas_kg_h
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct FleetTotals {
    bio_oil_kg_h: f64,
    biochar_kg_h: f64,
    gas_kg_h: f64,
    energy_kw: f64,
}

impl FleetTotals {
    fn add(&mut self, r: &UnitResult) {
        self.bio_oil_kg_h += r.bio_oil_kg_h;
        self.biochar_kg_h += r.biochar_kg_h;
        self.gas_kg_h += r.gas_kg_h;
        self.energy_kw += r.energy_consumption_kw;
    }
}

/// 집계 실행 결과(유닛별 상태 + 합계).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetRun {
    pub units: Vec<ProcessUnit>,
    pub aggregate: FleetAggregateResult,
}

/// 구성된 모든 유닛을 독립적으로 시뮬레이션하고 합계를 낸다.
///
/// 유닛별 계산은 공유 상태가 없어 병렬로 수행하고, 결과는 구성 순서로 모은 뒤
/// 같은 순서로 합산하므로 실행 순서와 무관하게 동일한 합계가 나온다.
/// 프리셋 이름이 없는 유닛은 Fault로 표시될 뿐 다른 유닛 계산을 막지 않는다.
pub fn aggregate_fleet(
    config: &FleetConfiguration,
    presets: &PresetCatalog,
    profiles: &ProfileCatalog,
    model: &UnitModel,
) -> FleetRun {
    if config.is_empty() {
        warn!(target: "twin.fleet", "구성된 유닛이 없는 플릿");
    }
    let table = profiles.table(&model.model_id);
    if table.is_none() {
        warn!(target: "twin.fleet", model = %model.model_id, "수율 테이블이 없는 설비 모델");
    }

    let units: Vec<ProcessUnit> = config
        .units
        .par_iter()
        .map(|assignment| {
            let mut unit = ProcessUnit::new(
                assignment.unit_id.clone(),
                assignment.preset_name.clone(),
                model.base_capacity_kg_h,
            );
            unit.run_cycle(presets, table);
            unit
        })
        .collect();

    for unit in units.iter().filter(|u| u.is_fault()) {
        warn!(
            target: "twin.fleet",
            unit = %unit.id,
            preset = %unit.preset_name,
            reason = unit.fault_reason.as_deref().unwrap_or(""),
            "유닛 구성 오류"
        );
    }

    let aggregate = FleetAggregateResult::from_units(&units);
    info!(
        target: "twin.fleet",
        units = units.len(),
        faulted = aggregate.faulted_units,
        status = ?aggregate.rollup_status,
        total_kg_h = aggregate.total_production_kg_h(),
        "플릿 집계 완료"
    );
    FleetRun { units, aggregate }
}
