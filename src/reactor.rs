//! 단일 열분해 반응기(프로세스 유닛) 1사이클 계산.
//!
//! 프리셋(목표 온도·체류시간)과 기준 처리용량으로 생성물 유량, 소비 전력, 운전 압력을 구한다.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{TwinError, TwinResult};
use crate::profile::{select_profile, ProfileTable};

/// 급속 열분해로 보는 체류시간 상한 [s]. 미만이면 오일 수율 가산.
pub const FAST_RESIDENCE_MAX_S: f64 = 5.0;
/// 저속 열분해로 보는 체류시간 하한 [s]. 초과하면 바이오차 수율 가산.
pub const SLOW_RESIDENCE_MIN_S: f64 = 1000.0;
/// 소비 전력 식(7.8 + (T-500)/100 kW)이 기준으로 하는 처리용량 [kg/h]
pub const ENERGY_REFERENCE_CAPACITY_KG_H: f64 = 100.0;

const OIL_FAST_FACTOR: f64 = 1.2;
const OIL_SLOW_FACTOR: f64 = 0.8;
const CHAR_SLOW_FACTOR: f64 = 1.1;
const CHAR_FAST_FACTOR: f64 = 0.9;

/// 제어 모드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    Manual,
    Automatic,
}

/// 이름으로 조회되는 공정 설정값 묶음.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessPreset {
    pub name: String,
    /// 목표 반응 온도 [°C]
    pub target_temp_c: f64,
    /// 체류시간 [s]
    pub residence_time_sec: f64,
    /// 불활성 가스(N2) 유량 [L/min]
    pub inert_gas_flow_l_min: f64,
    pub control_mode: ControlMode,
}

/// 이름 → 프리셋 카탈로그.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetCatalog {
    presets: BTreeMap<String, ProcessPreset>,
}

impl PresetCatalog {
    pub fn new(presets: impl IntoIterator<Item = ProcessPreset>) -> Self {
        Self {
            presets: presets.into_iter().map(|p| (p.name.clone(), p)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ProcessPreset> {
        self.presets.get(name)
    }

    pub fn try_get(&self, name: &str) -> TwinResult<&ProcessPreset> {
        self.get(name)
            .ok_or_else(|| TwinError::UnknownPreset(name.to_string()))
    }

    /// 등록된 프리셋 이름(사전순)
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn builtin() -> Self {
        Self::new(builtin_presets())
    }
}

/// 기본 프리셋: 급속(오일 중심), 중간, 저속(바이오차 중심), 가스화 지향 고온.
pub fn builtin_presets() -> Vec<ProcessPreset> {
    vec![
        ProcessPreset {
            name: "fast-oil".into(),
            target_temp_c: 500.0,
            residence_time_sec: 2.0,
            inert_gas_flow_l_min: 40.0,
            control_mode: ControlMode::Automatic,
        },
        ProcessPreset {
            name: "intermediate".into(),
            target_temp_c: 550.0,
            residence_time_sec: 300.0,
            inert_gas_flow_l_min: 25.0,
            control_mode: ControlMode::Automatic,
        },
        ProcessPreset {
            name: "slow-biochar".into(),
            target_temp_c: 420.0,
            residence_time_sec: 1800.0,
            inert_gas_flow_l_min: 10.0,
            control_mode: ControlMode::Manual,
        },
        ProcessPreset {
            name: "syngas".into(),
            target_temp_c: 750.0,
            residence_time_sec: 30.0,
            inert_gas_flow_l_min: 30.0,
            control_mode: ControlMode::Automatic,
        },
    ]
}

/// 유닛 운전 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    Idle,
    Operating,
    Fault,
}

/// 1사이클 계산 결과. 매 사이클 새로 생성되며 수정되지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitResult {
    pub bio_oil_kg_h: f64,
    pub biochar_kg_h: f64,
    pub gas_kg_h: f64,
    pub energy_consumption_kw: f64,
    pub temperature_c: f64,
    pub pressure_bar: f64,
    /// 체류시간 보정 후 오일+바이오차가 100%를 넘어 재정규화했는지 여부
    pub yield_renormalized: bool,
}

/// 체류시간 보정이 적용된 수율 [%].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedYield {
    pub oil_pct: f64,
    pub biochar_pct: f64,
    pub gas_pct: f64,
    pub renormalized: bool,
}

/// 체류시간에 따라 오일/바이오차 수율을 보정하고 가스를 잔여분으로 둔다.
///
/// 보정 후 `oil + biochar > 100`이면 가스를 0으로 두고 오일·바이오차를 비례 축소해
/// 합 100을 유지한다. 가스 잔여분은 음수가 되지 않는다.
pub fn adjust_yields(oil_pct: f64, biochar_pct: f64, residence_time_sec: f64) -> AdjustedYield {
    let oil = oil_pct
        * if residence_time_sec < FAST_RESIDENCE_MAX_S {
            OIL_FAST_FACTOR
        } else {
            OIL_SLOW_FACTOR
        };
    let biochar = biochar_pct
        * if residence_time_sec > SLOW_RESIDENCE_MIN_S {
            CHAR_SLOW_FACTOR
        } else {
            CHAR_FAST_FACTOR
        };
    let solid_liquid = oil + biochar;
    if solid_liquid > 100.0 {
        let scale = 100.0 / solid_liquid;
        AdjustedYield {
            oil_pct: oil * scale,
            biochar_pct: biochar * scale,
            gas_pct: 0.0,
            renormalized: true,
        }
    } else {
        AdjustedYield {
            oil_pct: oil,
            biochar_pct: biochar,
            gas_pct: 100.0 - solid_liquid,
            renormalized: false,
        }
    }
}

/// 프리셋과 기준 처리용량으로 한 사이클 결과를 계산한다.
pub fn simulate_unit(preset: &ProcessPreset, table: &ProfileTable, base_capacity_kg_h: f64) -> UnitResult {
    let profile = select_profile(preset.target_temp_c, table);
    let y = adjust_yields(
        profile.yield_oil_pct,
        profile.yield_biochar_pct,
        preset.residence_time_sec,
    );
    let capacity = base_capacity_kg_h.max(0.0);

    // 전력 식은 기준 용량(100 kg/h)당 kW
    let specific_kw = (7.8 + (preset.target_temp_c - 500.0) / 100.0).max(0.0);
    let energy_consumption_kw = specific_kw * capacity / ENERGY_REFERENCE_CAPACITY_KG_H;

    UnitResult {
        bio_oil_kg_h: capacity * y.oil_pct / 100.0,
        biochar_kg_h: capacity * y.biochar_pct / 100.0,
        gas_kg_h: capacity * y.gas_pct / 100.0,
        energy_consumption_kw,
        temperature_c: preset.target_temp_c,
        pressure_bar: 1.1 + preset.target_temp_c / 1000.0,
        yield_renormalized: y.renormalized,
    }
}

/// 플릿에 구성된 반응기 한 대.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessUnit {
    pub id: String,
    pub base_capacity_kg_h: f64,
    pub preset_name: String,
    pub status: UnitStatus,
    pub last_result: Option<UnitResult>,
    /// 구성 오류 사유(Fault일 때만)
    pub fault_reason: Option<String>,
}

impl ProcessUnit {
    pub fn new(id: impl Into<String>, preset_name: impl Into<String>, base_capacity_kg_h: f64) -> Self {
        Self {
            id: id.into(),
            base_capacity_kg_h,
            preset_name: preset_name.into(),
            status: UnitStatus::Idle,
            last_result: None,
            fault_reason: None,
        }
    }

    /// 한 사이클을 실행한다. 프리셋이나 수율 테이블이 없으면 Fault로 전환하고 결과를 비운다.
    pub fn run_cycle(&mut self, presets: &PresetCatalog, table: Option<&ProfileTable>) {
        let resolved = presets
            .try_get(&self.preset_name)
            .and_then(|preset| table.map(|t| (preset, t)).ok_or_else(|| {
                TwinError::InvalidParameter("수율 테이블이 없습니다".into())
            }));
        match resolved {
            Ok((preset, table)) => {
                self.last_result = Some(simulate_unit(preset, table, self.base_capacity_kg_h));
                self.status = UnitStatus::Operating;
                self.fault_reason = None;
            }
            Err(err) => {
                self.last_result = None;
                self.status = UnitStatus::Fault;
                self.fault_reason = Some(err.to_string());
            }
        }
    }

    pub fn is_fault(&self) -> bool {
        self.status == UnitStatus::Fault
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_residence_boosts_oil_and_trims_char() {
        let y = adjust_yields(50.0, 25.0, 2.0);
        assert!((y.oil_pct - 60.0).abs() < 1e-9);
        assert!((y.biochar_pct - 22.5).abs() < 1e-9);
        assert!((y.gas_pct - 17.5).abs() < 1e-9);
        assert!(!y.renormalized);
    }

    #[test]
    fn overshoot_is_renormalized_with_zero_gas() {
        // 오일 70*1.2=84, 바이오차 25*0.9=22.5 -> 106.5
        let y = adjust_yields(70.0, 25.0, 1.0);
        assert!(y.renormalized);
        assert_eq!(y.gas_pct, 0.0);
        assert!((y.oil_pct + y.biochar_pct - 100.0).abs() < 1e-9);
        assert!((y.oil_pct / y.biochar_pct - 84.0 / 22.5).abs() < 1e-9);
    }
}
