//! IAPWS-IF97 계산을 seuif97 크레이트로 위임한 래퍼.
//! 건조기 수분 증발열 계산에 필요한 포화 물성만 다룬다.
//! 입력: 압력(bar, 절대), 온도(°C)

use seuif97::{pt, OH};

// ---------------- Region 4 (포화) ----------------
const P4_STAR_MPA: f64 = 22.064;
const T4_STAR_K: f64 = 647.096;
const R4_N: [f64; 6] = [
    -7.859_517_83,
    1.844_082_59,
    -11.786_649_7,
    22.680_741_1,
    -15.961_871_9,
    1.801_225_02,
];

/// Region 1(압축수) 강제 계산 비엔탈피 [kJ/kg].
pub fn liquid_enthalpy_kj_per_kg(p_bar_abs: f64, t_c: f64) -> Result<f64, &'static str> {
    let h = pt(p_bar_abs / 10.0, t_c, (OH, 1));
    if h.is_nan() {
        return Err("IF97 Region1 계산 실패(유효 범위 밖)");
    }
    Ok(h)
}

/// Region 2(증기) 강제 계산 비엔탈피 [kJ/kg].
pub fn vapor_enthalpy_kj_per_kg(p_bar_abs: f64, t_c: f64) -> Result<f64, &'static str> {
    let h = pt(p_bar_abs / 10.0, t_c, (OH, 2));
    if h.is_nan() {
        return Err("IF97 Region2 계산 실패(유효 범위 밖)");
    }
    Ok(h)
}

/// 포화압력(bar abs) - 입력 온도는 °C.
pub fn saturation_pressure_bar_abs_from_temp_c(t_c: f64) -> Result<f64, &'static str> {
    let t_k = t_c + 273.15;
    if t_k <= 273.15 || t_k > T4_STAR_K {
        return Err("IF97 Region4 유효 범위를 벗어났습니다 (0~374°C)");
    }
    let theta = 1.0 - t_k / T4_STAR_K;
    let exp_term = (T4_STAR_K / t_k)
        * (R4_N[0] * theta
            + R4_N[1] * theta.powf(1.5)
            + R4_N[2] * theta.powi(3)
            + R4_N[3] * theta.powf(3.5)
            + R4_N[4] * theta.powi(4)
            + R4_N[5] * theta.powf(7.5));
    let p_mpa = P4_STAR_MPA * exp_term.exp();
    Ok(p_mpa * 10.0)
}

/// 포화 상태 증발 잠열 hfg [kJ/kg] = h"(Region2) - h'(Region1).
pub fn latent_heat_kj_per_kg(t_c: f64) -> Result<f64, &'static str> {
    let p_sat = saturation_pressure_bar_abs_from_temp_c(t_c)?;
    let hf = liquid_enthalpy_kj_per_kg(p_sat, t_c)?;
    let hg = vapor_enthalpy_kj_per_kg(p_sat, t_c)?;
    Ok(hg - hf)
}
