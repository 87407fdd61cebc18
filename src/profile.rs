//! 목표 온도 → 3단 온도 대역 수율 프로파일 선택.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{TwinError, TwinResult};

/// 저온 대역 상한(포함) [°C]
pub const LOW_BAND_MAX_C: f64 = 450.0;
/// 중온 대역 상한(포함) [°C]
pub const MEDIUM_BAND_MAX_C: f64 = 650.0;

/// 열분해 온도 대역.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureBand {
    /// T ≤ 450 °C
    Low,
    /// 450 < T ≤ 650 °C
    Medium,
    /// T > 650 °C
    High,
}

impl TemperatureBand {
    /// 온도를 대역으로 분류한다. 경계값은 낮은 대역에 포함된다.
    /// NaN 입력은 가장 보수적인 `Low`로 처리한다.
    pub fn classify(target_temp_c: f64) -> Self {
        if target_temp_c.is_nan() || target_temp_c <= LOW_BAND_MAX_C {
            TemperatureBand::Low
        } else if target_temp_c <= MEDIUM_BAND_MAX_C {
            TemperatureBand::Medium
        } else {
            TemperatureBand::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TemperatureBand::Low => "low (<=450C)",
            TemperatureBand::Medium => "medium (451-650C)",
            TemperatureBand::High => "high (>650C)",
        }
    }
}

/// 온도 대역별 생성물 수율 [%]. 세 값의 합은 100이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceProfile {
    pub temperature_band_label: String,
    pub yield_biochar_pct: f64,
    pub yield_oil_pct: f64,
    pub yield_gas_pct: f64,
}

impl PerformanceProfile {
    pub fn new(band: TemperatureBand, biochar: f64, oil: f64, gas: f64) -> Self {
        Self {
            temperature_band_label: band.label().to_string(),
            yield_biochar_pct: biochar,
            yield_oil_pct: oil,
            yield_gas_pct: gas,
        }
    }

    pub fn total_pct(&self) -> f64 {
        self.yield_biochar_pct + self.yield_oil_pct + self.yield_gas_pct
    }
}

/// 설비 모델 하나의 3대역 수율 테이블. 세 대역이 모두 채워져 있어 선택이 항상 성공한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileTable {
    pub low: PerformanceProfile,
    pub medium: PerformanceProfile,
    pub high: PerformanceProfile,
}

impl ProfileTable {
    pub fn profile(&self, band: TemperatureBand) -> &PerformanceProfile {
        match band {
            TemperatureBand::Low => &self.low,
            TemperatureBand::Medium => &self.medium,
            TemperatureBand::High => &self.high,
        }
    }

    fn validate(&self, model_id: &str) -> TwinResult<()> {
        for p in [&self.low, &self.medium, &self.high] {
            let parts = [p.yield_biochar_pct, p.yield_oil_pct, p.yield_gas_pct];
            if parts.iter().any(|v| !v.is_finite() || *v < 0.0) || (p.total_pct() - 100.0).abs() > 1e-6 {
                return Err(TwinError::InvalidParameter(format!(
                    "{model_id}/{}: 수율 합이 100%가 아닙니다",
                    p.temperature_band_label
                )));
            }
        }
        Ok(())
    }
}

/// 온도로 대역을 판정해 해당 수율 프로파일을 반환한다. 어떤 실수 입력에도 실패하지 않는다.
pub fn select_profile(target_temp_c: f64, table: &ProfileTable) -> &PerformanceProfile {
    table.profile(TemperatureBand::classify(target_temp_c))
}

/// 설비 모델 id별 수율 테이블 카탈로그.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileCatalog {
    tables: BTreeMap<String, ProfileTable>,
}

impl ProfileCatalog {
    pub fn table(&self, model_id: &str) -> Option<&ProfileTable> {
        self.tables.get(model_id)
    }

    pub fn try_table(&self, model_id: &str) -> TwinResult<&ProfileTable> {
        self.table(model_id)
            .ok_or_else(|| TwinError::UnknownUnitModel(model_id.to_string()))
    }

    pub fn model_ids(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn validate(&self) -> TwinResult<()> {
        self.tables
            .iter()
            .try_for_each(|(id, table)| table.validate(id))
    }
}

impl Default for ProfileCatalog {
    /// 기본 모델 두 종. 값은 참고용 대표 수율이다.
    fn default() -> Self {
        use TemperatureBand::*;
        let mut tables = BTreeMap::new();
        tables.insert(
            "pyro-500".to_string(),
            ProfileTable {
                low: PerformanceProfile::new(Low, 40.0, 35.0, 25.0),
                medium: PerformanceProfile::new(Medium, 25.0, 50.0, 25.0),
                high: PerformanceProfile::new(High, 15.0, 35.0, 50.0),
            },
        );
        tables.insert(
            "pyro-compact".to_string(),
            ProfileTable {
                low: PerformanceProfile::new(Low, 45.0, 30.0, 25.0),
                medium: PerformanceProfile::new(Medium, 30.0, 45.0, 25.0),
                high: PerformanceProfile::new(High, 20.0, 30.0, 50.0),
            },
        );
        Self { tables }
    }
}
