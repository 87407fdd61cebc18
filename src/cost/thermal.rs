use serde::{Deserialize, Serialize};

use super::if97;

/// 습도 보정 열수요 입력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalDemandInput {
    /// 기준 습도에서의 열수요 [MW]
    pub base_thermal_demand_mw: f64,
    /// 투입물 습도 [%]
    pub humidity_pct: f64,
    /// 기준 습도 [%]
    pub reference_humidity_pct: f64,
    /// 습도 1%p당 열수요 변화율(0.02면 2%)
    pub sensitivity_per_pct: f64,
}

/// 투입물 습도에 따라 열수요를 선형 보정한다.
///
/// `demand = base × (1 + (humidity - reference) × sensitivity)`, 음수는 0으로 자른다.
pub fn dynamic_thermal_demand_mw(input: ThermalDemandInput) -> f64 {
    let factor = 1.0 + (input.humidity_pct - input.reference_humidity_pct) * input.sensitivity_per_pct;
    let demand = input.base_thermal_demand_mw * factor;
    if demand.is_finite() {
        demand.max(0.0)
    } else {
        0.0
    }
}

/// 건조기 수분 증발열 입력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaporationDutyInput {
    /// 습윤 투입량 [kg/h]
    pub feed_kg_h: f64,
    /// 투입 수분 [%, 습윤 기준]
    pub moisture_in_pct: f64,
    /// 배출 수분 [%, 습윤 기준]
    pub moisture_out_pct: f64,
    /// 증발 온도 [°C]
    pub evaporation_temp_c: f64,
}

/// 증발열 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaporationDutyResult {
    /// 제거 수분 [kg/h]
    pub water_removed_kg_h: f64,
    /// 증발 잠열 [kJ/kg]
    pub latent_heat_kj_per_kg: f64,
    /// 필요 열량 [kW]
    pub duty_kw: f64,
}

/// 건조 전후 수분 차이와 IF97 잠열로 증발에 필요한 열량을 구한다.
/// 현열(승온)은 포함하지 않는다.
pub fn evaporation_duty(input: EvaporationDutyInput) -> Result<EvaporationDutyResult, &'static str> {
    let w_in = (input.moisture_in_pct / 100.0).clamp(0.0, 1.0);
    let w_out = (input.moisture_out_pct / 100.0).clamp(0.0, 0.999);
    let feed = input.feed_kg_h.max(0.0);
    let dry_solids = feed * (1.0 - w_in);
    let product = dry_solids / (1.0 - w_out);
    let water_removed_kg_h = (feed - product).max(0.0);

    let hfg = if97::latent_heat_kj_per_kg(input.evaporation_temp_c)?;
    Ok(EvaporationDutyResult {
        water_removed_kg_h,
        latent_heat_kj_per_kg: hfg,
        duty_kw: water_removed_kg_h * hfg / 3600.0,
    })
}
