use serde::{Deserialize, Serialize};
use tracing::info;

use super::pneumatic::{compression_power, CompressionInput};
use super::thermal::{dynamic_thermal_demand_mw, ThermalDemandInput};
use crate::error::{TwinError, TwinResult};
use crate::fleet::FleetAggregateResult;

/// 1 MW = 3.412142 MMBtu/h
pub const MMBTU_PER_MWH: f64 = 3.412_142;

/// 유틸리티 단가. 외부에서 편집되며 코어에서는 읽기만 한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffConfiguration {
    /// 계통 전력 단가 [통화/kWh]
    pub grid_electricity_price: f64,
    /// 연소 열 단가 [통화/MMBtu]
    pub fired_heat_price_mmbtu: f64,
    /// 압축공기 단가 [통화/kWh(축동력)]
    pub compressed_air_price_kwh: f64,
    /// 바이오가스/합성가스 가치 [통화/m3]
    pub biogas_price_m3: f64,
    pub currency: String,
}

impl Default for TariffConfiguration {
    fn default() -> Self {
        Self {
            grid_electricity_price: 0.14,
            fired_heat_price_mmbtu: 9.5,
            compressed_air_price_kwh: 0.16,
            biogas_price_m3: 0.35,
            currency: "EUR".into(),
        }
    }
}

impl TariffConfiguration {
    pub fn validate(&self) -> TwinResult<()> {
        let prices = [
            ("grid_electricity_price", self.grid_electricity_price),
            ("fired_heat_price_mmbtu", self.fired_heat_price_mmbtu),
            ("compressed_air_price_kwh", self.compressed_air_price_kwh),
            ("biogas_price_m3", self.biogas_price_m3),
        ];
        match prices.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            Some((name, v)) => Err(TwinError::InvalidParameter(format!(
                "{name}={v}: 단가는 0 이상이어야 합니다"
            ))),
            None => Ok(()),
        }
    }
}

/// 압축기 운전 조건.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorParameters {
    pub inlet_pressure_bar_abs: f64,
    pub inlet_temp_c: f64,
    pub delivery_pressure_bar_g: f64,
    pub polytropic_index: f64,
    pub isentropic_efficiency: f64,
}

impl Default for CompressorParameters {
    fn default() -> Self {
        Self {
            inlet_pressure_bar_abs: 1.01325,
            inlet_temp_c: 20.0,
            delivery_pressure_bar_g: 7.0,
            polytropic_index: 1.4,
            isentropic_efficiency: 0.72,
        }
    }
}

/// 비용 계산 물리 파라미터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostParameters {
    /// 기준 습도에서의 건조/반응 열수요 [MW]
    pub base_thermal_demand_mw: f64,
    /// 기준 습도 [%]
    pub reference_humidity_pct: f64,
    /// 습도 1%p당 열수요 변화율
    pub humidity_sensitivity_per_pct: f64,
    pub compressor: CompressorParameters,
    /// 합성가스 밀도 [kg/m3]
    pub syngas_density_kg_m3: f64,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            base_thermal_demand_mw: 1.2,
            reference_humidity_pct: 20.0,
            humidity_sensitivity_per_pct: 0.02,
            compressor: CompressorParameters::default(),
            syngas_density_kg_m3: 1.1,
        }
    }
}

impl CostParameters {
    pub fn validate(&self) -> TwinResult<()> {
        let c = &self.compressor;
        if c.inlet_pressure_bar_abs <= 0.0 {
            return Err(TwinError::InvalidParameter("흡입 압력은 양수여야 합니다".into()));
        }
        let eff = c.isentropic_efficiency;
        if eff.is_nan() || eff <= 0.0 || eff > 1.0 {
            return Err(TwinError::InvalidParameter(
                "압축기 효율은 0 초과 1 이하여야 합니다".into(),
            ));
        }
        if self.syngas_density_kg_m3 <= 0.0 {
            return Err(TwinError::InvalidParameter("합성가스 밀도는 양수여야 합니다".into()));
        }
        Ok(())
    }
}

/// 유틸리티별 부하 수준.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PowerLevels {
    pub electrical_kw: f64,
    pub thermal_mw: f64,
    /// 압축공기 유량(흡입 기준) [m3/h]
    pub pneumatic_m3_h: f64,
}

/// 비용 계산 입력.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostInputs {
    pub power: PowerLevels,
    /// 원단위 계산 기준 생산량 [kg/h]
    pub production_rate_kg_h: f64,
    /// 가치 환산할 비응축 가스 생산량 [kg/h]
    pub syngas_kg_h: f64,
}

/// 시간당 비용과 에너지 원단위.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub electrical_cost_per_hour: f64,
    pub thermal_cost_per_hour: f64,
    pub pneumatic_cost_per_hour: f64,
    pub total_cost_per_hour: f64,
    /// 총 동력 수요 / 생산량 [kWh/t]. 생산량이 0이면 0.
    pub energy_intensity: f64,
    /// 압축기 실동력 [kW]
    pub pneumatic_power_kw: f64,
    /// 전기 + 열 + 압축 동력 합 [kW]
    pub total_power_demand_kw: f64,
    pub syngas_credit_per_hour: f64,
    pub net_cost_per_hour: f64,
}

/// 총 동력을 생산량(t/h)으로 나눈 에너지 원단위 [kWh/t].
/// 생산량이 0 이하이거나 결과가 유한하지 않으면 0을 반환한다.
pub fn energy_intensity(total_power_kw: f64, production_rate_kg_h: f64) -> f64 {
    let tons_per_hour = production_rate_kg_h / 1000.0;
    if tons_per_hour.is_nan() || tons_per_hour <= 0.0 {
        return 0.0;
    }
    let intensity = total_power_kw / tons_per_hour;
    if intensity.is_finite() {
        intensity
    } else {
        0.0
    }
}

/// 단가와 물리 파라미터를 들고 실시간 유틸리티 비용을 계산한다.
///
/// 단가는 생성 시 값으로 받으며, 바꾸려면 `reload_tariffs`로 통째로 교체한다.
#[derive(Debug, Clone, PartialEq)]
pub struct CostEngine {
    tariffs: TariffConfiguration,
    params: CostParameters,
}

impl CostEngine {
    pub fn new(tariffs: TariffConfiguration, params: CostParameters) -> Self {
        Self { tariffs, params }
    }

    pub fn tariffs(&self) -> &TariffConfiguration {
        &self.tariffs
    }

    pub fn params(&self) -> &CostParameters {
        &self.params
    }

    /// 단가를 교체한다. 이후 `compute` 호출부터 새 단가가 적용된다.
    pub fn reload_tariffs(&mut self, tariffs: TariffConfiguration) {
        info!(
            target: "twin.cost",
            electricity = tariffs.grid_electricity_price,
            heat = tariffs.fired_heat_price_mmbtu,
            air = tariffs.compressed_air_price_kwh,
            "단가 갱신"
        );
        self.tariffs = tariffs;
    }

    /// 투입 습도 기준 열수요 [MW]
    pub fn thermal_demand_mw(&self, humidity_pct: f64) -> f64 {
        dynamic_thermal_demand_mw(ThermalDemandInput {
            base_thermal_demand_mw: self.params.base_thermal_demand_mw,
            humidity_pct,
            reference_humidity_pct: self.params.reference_humidity_pct,
            sensitivity_per_pct: self.params.humidity_sensitivity_per_pct,
        })
    }

    /// 플릿 집계 결과로 비용 입력을 구성한다. 열수요는 습도로, 전력은 플릿 합계로 잡는다.
    pub fn fleet_inputs(&self, fleet: &FleetAggregateResult, humidity_pct: f64, pneumatic_m3_h: f64) -> CostInputs {
        CostInputs {
            power: PowerLevels {
                electrical_kw: fleet.total_energy_kw,
                thermal_mw: self.thermal_demand_mw(humidity_pct),
                pneumatic_m3_h,
            },
            production_rate_kg_h: fleet.total_production_kg_h(),
            syngas_kg_h: fleet.total_gas_kg_h,
        }
    }

    /// 시간당 비용, 원단위, 합성가스 가치를 계산한다.
    pub fn compute(&self, inputs: &CostInputs) -> CostBreakdown {
        let t = &self.tariffs;
        let power = inputs.power;
        let c = &self.params.compressor;

        let electrical_kw = power.electrical_kw.max(0.0);
        let thermal_mw = power.thermal_mw.max(0.0);
        let pneumatic = compression_power(CompressionInput {
            flow_m3_h: power.pneumatic_m3_h,
            inlet_pressure_bar_abs: c.inlet_pressure_bar_abs,
            delivery_pressure_bar_g: c.delivery_pressure_bar_g,
            inlet_temp_c: c.inlet_temp_c,
            polytropic_index: c.polytropic_index,
            isentropic_efficiency: c.isentropic_efficiency,
        });

        let electrical_cost_per_hour = electrical_kw * t.grid_electricity_price;
        let thermal_cost_per_hour = thermal_mw * MMBTU_PER_MWH * t.fired_heat_price_mmbtu;
        let pneumatic_cost_per_hour = pneumatic.shaft_power_kw * t.compressed_air_price_kwh;
        let total_cost_per_hour = electrical_cost_per_hour + thermal_cost_per_hour + pneumatic_cost_per_hour;

        let total_power_demand_kw = electrical_kw + thermal_mw * 1000.0 + pneumatic.shaft_power_kw;
        let syngas_m3_h = inputs.syngas_kg_h.max(0.0) / self.params.syngas_density_kg_m3;
        let syngas_credit_per_hour = if syngas_m3_h.is_finite() {
            syngas_m3_h * t.biogas_price_m3
        } else {
            0.0
        };

        CostBreakdown {
            electrical_cost_per_hour,
            thermal_cost_per_hour,
            pneumatic_cost_per_hour,
            total_cost_per_hour,
            energy_intensity: energy_intensity(total_power_demand_kw, inputs.production_rate_kg_h),
            pneumatic_power_kw: pneumatic.shaft_power_kw,
            total_power_demand_kw,
            syngas_credit_per_hour,
            net_cost_per_hour: total_cost_per_hour - syngas_credit_per_hour,
        }
    }
}
