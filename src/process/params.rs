use serde::{Deserialize, Serialize};

use super::machine::MonitoredMachine;
use crate::error::{TwinError, TwinResult};

/// 선별(분류) 품질 지표 설정.
///
/// 순도/검출효율은 `명목값 - 오염분율 × 민감도 - 지터`로 떨어지며 하한에서 멈춘다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationParameters {
    /// 오염물이 없을 때 순도 [%]
    pub nominal_purity_pct: f64,
    /// 오염물이 없을 때 검출 효율 [%]
    pub nominal_efficiency_pct: f64,
    /// 오염 분율 1.0당 순도 저하 [%p]
    pub purity_sensitivity_pct: f64,
    /// 오염 분율 1.0당 검출 효율 저하 [%p]
    pub efficiency_sensitivity_pct: f64,
    /// 순도 하한 [%]
    pub purity_floor_pct: f64,
    /// 검출 효율 하한 [%]
    pub efficiency_floor_pct: f64,
    /// 지표별 지터 폭 [%p], U[0, span)
    pub metric_jitter_pct: f64,
}

impl Default for ClassificationParameters {
    fn default() -> Self {
        Self {
            nominal_purity_pct: 98.0,
            nominal_efficiency_pct: 97.0,
            purity_sensitivity_pct: 60.0,
            efficiency_sensitivity_pct: 40.0,
            purity_floor_pct: 80.0,
            efficiency_floor_pct: 85.0,
            metric_jitter_pct: 1.0,
        }
    }
}

/// 연속 공정 시뮬레이션 파라미터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessParameters {
    /// 틱마다 고장 판정하는 설비(순서대로 난수를 소비한다)
    pub machines: Vec<MonitoredMachine>,
    /// 라인 기준 투입 용량 [kg/h]
    pub base_capacity_kg_h: f64,
    /// 사일로 용량 [kg]. 초과분은 버린다.
    pub silo_capacity_kg: f64,
    /// 틱 간격 [ms]
    pub tick_interval_ms: u64,
    /// 생산량 지터 폭, U[0, span)
    pub production_jitter: f64,
    pub classification: ClassificationParameters,
    /// 제품 수분 하한 [%]
    pub moisture_floor_pct: f64,
    /// 수분 지터 폭 [%p]
    pub moisture_jitter_pct: f64,
    /// 유기물로 보는 조성 카테고리
    pub organic_categories: Vec<String>,
    /// 오염물로 보는 조성 카테고리
    pub contaminant_categories: Vec<String>,
}

impl Default for ProcessParameters {
    fn default() -> Self {
        Self {
            machines: MonitoredMachine::defaults(),
            base_capacity_kg_h: 1000.0,
            silo_capacity_kg: 5000.0,
            tick_interval_ms: 1000,
            production_jitter: 0.1,
            classification: ClassificationParameters::default(),
            moisture_floor_pct: 5.0,
            moisture_jitter_pct: 2.0,
            organic_categories: vec!["organic".into()],
            contaminant_categories: vec!["metals".into(), "inert".into()],
        }
    }
}

impl ProcessParameters {
    /// 틱 하나가 나타내는 시간 [s]
    pub fn tick_duration_sec(&self) -> f64 {
        self.tick_interval_ms as f64 / 1000.0
    }

    pub fn validate(&self) -> TwinResult<()> {
        if let Some(m) = self
            .machines
            .iter()
            .find(|m| !(0.0..=1.0).contains(&m.trip_probability))
        {
            return Err(TwinError::InvalidParameter(format!(
                "{}: 트립 확률은 0~1 사이여야 합니다",
                m.name
            )));
        }
        if self.base_capacity_kg_h < 0.0 || self.silo_capacity_kg < 0.0 {
            return Err(TwinError::InvalidParameter(
                "용량은 음수일 수 없습니다".into(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(TwinError::InvalidParameter("틱 간격은 0보다 커야 합니다".into()));
        }
        if !(0.0..=1.0).contains(&self.production_jitter) {
            return Err(TwinError::InvalidParameter(
                "생산량 지터는 0~1 사이여야 합니다".into(),
            ));
        }
        let c = &self.classification;
        if c.purity_floor_pct > c.nominal_purity_pct || c.efficiency_floor_pct > c.nominal_efficiency_pct {
            return Err(TwinError::InvalidParameter(
                "선별 지표 하한이 명목값보다 큽니다".into(),
            ));
        }
        Ok(())
    }
}
