use serde::{Deserialize, Serialize};

/// 일반 기체상수 [J/(mol·K)]
pub const GAS_CONSTANT_J_PER_MOL_K: f64 = 8.314_462_618;

/// 압축기 소요 동력 입력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressionInput {
    /// 흡입 조건 체적 유량 [m3/h]
    pub flow_m3_h: f64,
    /// 흡입 압력 p1 [bar abs]
    pub inlet_pressure_bar_abs: f64,
    /// 토출 압력 [bar g]. p2 = 게이지 + p1
    pub delivery_pressure_bar_g: f64,
    /// 흡입 온도 T1 [°C]
    pub inlet_temp_c: f64,
    /// 폴리트로픽 지수 n (공기 단열 1.4)
    pub polytropic_index: f64,
    /// 등엔트로피 효율(0~1]
    pub isentropic_efficiency: f64,
}

/// 압축 동력 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressionResult {
    /// p2 [bar abs]
    pub delivery_pressure_bar_abs: f64,
    /// 몰 유량 [mol/s]
    pub molar_flow_mol_s: f64,
    /// 몰당 압축일 [J/mol]
    pub molar_work_j_per_mol: f64,
    /// 이론 동력 [kW]
    pub ideal_power_kw: f64,
    /// 효율 반영 실동력 [kW]
    pub shaft_power_kw: f64,
}

/// 폴리트로픽 압축일로 압축공기 소요 동력을 계산한다.
///
/// `w = n·R·T1/(n-1) · ((p2/p1)^((n-1)/n) - 1)` [J/mol], 몰 유량은 흡입 조건 이상기체로
/// `ṅ = p1·V̇/(R·T1)`. 실동력은 이론 동력을 효율로 나눈 값이다.
/// n ≤ 1이면 등온 압축 `w = R·T1·ln(p2/p1)`으로 처리한다.
pub fn compression_power(input: CompressionInput) -> CompressionResult {
    let p1 = input.inlet_pressure_bar_abs.max(1e-6);
    let p2 = input.delivery_pressure_bar_g.max(0.0) + p1;
    let t1_k = (input.inlet_temp_c + 273.15).max(1.0);
    let n = input.polytropic_index;
    let ratio = p2 / p1;

    let molar_work = if n > 1.0 {
        n * GAS_CONSTANT_J_PER_MOL_K * t1_k / (n - 1.0) * (ratio.powf((n - 1.0) / n) - 1.0)
    } else {
        GAS_CONSTANT_J_PER_MOL_K * t1_k * ratio.ln()
    };

    let flow_m3_s = input.flow_m3_h.max(0.0) / 3600.0;
    let molar_flow = p1 * 100_000.0 * flow_m3_s / (GAS_CONSTANT_J_PER_MOL_K * t1_k);
    let ideal_power_kw = molar_work * molar_flow / 1000.0;

    // 효율이 0 이하이면 이론 동력으로 둔다
    let efficiency = if input.isentropic_efficiency > 0.0 {
        input.isentropic_efficiency.min(1.0)
    } else {
        1.0
    };

    CompressionResult {
        delivery_pressure_bar_abs: p2,
        molar_flow_mol_s: molar_flow,
        molar_work_j_per_mol: molar_work,
        ideal_power_kw,
        shaft_power_kw: ideal_power_kw / efficiency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_lift_needs_no_power() {
        let r = compression_power(CompressionInput {
            flow_m3_h: 100.0,
            inlet_pressure_bar_abs: 1.01325,
            delivery_pressure_bar_g: 0.0,
            inlet_temp_c: 20.0,
            polytropic_index: 1.4,
            isentropic_efficiency: 0.7,
        });
        assert!(r.shaft_power_kw.abs() < 1e-9);
    }

    #[test]
    fn isothermal_limit_below_adiabatic() {
        let base = CompressionInput {
            flow_m3_h: 100.0,
            inlet_pressure_bar_abs: 1.0,
            delivery_pressure_bar_g: 6.0,
            inlet_temp_c: 20.0,
            polytropic_index: 1.4,
            isentropic_efficiency: 1.0,
        };
        let adiabatic = compression_power(base);
        let isothermal = compression_power(CompressionInput {
            polytropic_index: 1.0,
            ..base
        });
        assert!(isothermal.molar_work_j_per_mol < adiabatic.molar_work_j_per_mol);
    }
}
