//! 투입 폐기물 조성(카테고리 → %)과 합 100 보정 로직.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{TwinError, TwinResult};

/// 조성 합 허용 오차 [%]
pub const COMPOSITION_TOLERANCE: f64 = 1e-6;

const TOTAL_PCT: f64 = 100.0;

/// 카테고리 이름 → 백분율(0~100) 매핑. 합은 항상 100이다.
///
/// 키는 사전순으로 정렬되며, 보정 잔차를 흡수하는 기준(anchor) 카테고리는
/// 변경된 키를 제외한 첫 번째 키로 고정된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WasteComposition {
    shares: BTreeMap<String, f64>,
}

impl WasteComposition {
    /// 검증 후 조성을 생성한다. 음수/비유한 값, 합 불일치는 오류.
    pub fn new(shares: BTreeMap<String, f64>) -> TwinResult<Self> {
        if shares.is_empty() {
            return Err(TwinError::MalformedComposition(
                "카테고리가 하나도 없습니다".into(),
            ));
        }
        if let Some((key, value)) = shares.iter().find(|(_, v)| !v.is_finite() || **v < 0.0) {
            return Err(TwinError::MalformedComposition(format!(
                "{key}={value}: 0 이상의 유한한 값이어야 합니다"
            )));
        }
        let sum: f64 = shares.values().sum();
        if (sum - TOTAL_PCT).abs() > COMPOSITION_TOLERANCE {
            return Err(TwinError::MalformedComposition(format!(
                "합계 {sum:.6}% (100%여야 함)"
            )));
        }
        Ok(Self { shares })
    }

    /// (이름, %) 쌍으로부터 생성한다.
    pub fn from_pairs<K: Into<String>>(pairs: impl IntoIterator<Item = (K, f64)>) -> TwinResult<Self> {
        Self::new(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn shares(&self) -> &BTreeMap<String, f64> {
        &self.shares
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.shares.get(key).copied()
    }

    pub fn total(&self) -> f64 {
        self.shares.values().sum()
    }

    /// 지정한 카테고리들의 합을 0~1 분율로 반환한다. 없는 카테고리는 무시한다.
    pub fn fraction_of<S: AsRef<str>>(&self, categories: &[S]) -> f64 {
        let pct: f64 = categories
            .iter()
            .filter_map(|c| self.shares.get(c.as_ref()))
            .sum();
        (pct / TOTAL_PCT).clamp(0.0, 1.0)
    }

    /// 한 카테고리를 새 값으로 바꾸고 나머지를 비례 보정한 조성을 반환한다.
    pub fn with_share(&self, key: &str, value: f64) -> Self {
        Self {
            shares: normalize(&self.shares, key, value),
        }
    }
}

impl Default for WasteComposition {
    fn default() -> Self {
        let shares = [
            ("inert", 5.0),
            ("metals", 5.0),
            ("organic", 70.0),
            ("plastics", 20.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        Self { shares }
    }
}

/// 단일 키 변경 후 합 100을 유지하도록 조성을 보정한다.
///
/// 1. 변경 키는 `value`(0~100으로 클램프)로 고정한다.
/// 2. 나머지 카테고리는 기존 비율을 유지한 채 합이 `100 - value`가 되도록 양방향으로 맞춘다.
///    값을 올리면(초과분 > 0) `reduction_i = overflow * M[i] / Σ others`만큼 줄이고,
///    값을 내리면(초과분 < 0) 같은 식으로 부족분을 비례 배분해 늘린다.
/// 3. 남은 반올림 잔차는 anchor 카테고리(변경 키를 제외한 첫 키)에 몰아 합을 맞춘다.
///    나머지가 모두 0이라 비례 배분이 불가능한 경우도 anchor가 흡수한다.
///
/// 순수 함수이며, 자기 자신의 현재 값으로 다시 적용하면 같은 조성이 나온다.
/// 맵에 없는 키는 새 카테고리로 추가된다.
pub fn normalize(shares: &BTreeMap<String, f64>, key: &str, value: f64) -> BTreeMap<String, f64> {
    let value = if value.is_finite() {
        value.clamp(0.0, TOTAL_PCT)
    } else {
        0.0
    };

    let mut out: BTreeMap<String, f64> = shares
        .iter()
        .map(|(k, v)| (k.clone(), if v.is_finite() { v.max(0.0) } else { 0.0 }))
        .collect();
    out.insert(key.to_string(), value);

    if out.len() == 1 {
        out.insert(key.to_string(), TOTAL_PCT);
        return out;
    }

    let others_sum: f64 = out
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(_, v)| *v)
        .sum();
    let target_others = TOTAL_PCT - value;

    if others_sum > 0.0 {
        let overflow = others_sum - target_others;
        for (k, v) in out.iter_mut() {
            if k.as_str() == key {
                continue;
            }
            let reduction = overflow * (*v / others_sum);
            *v = (*v - reduction).max(0.0);
        }
    }

    let sum: f64 = out.values().sum();
    let residual = TOTAL_PCT - sum;
    if residual != 0.0 {
        let anchor = out
            .keys()
            .find(|k| k.as_str() != key)
            .cloned()
            .unwrap_or_else(|| key.to_string());
        let absorbed = out.get(&anchor).copied().unwrap_or(0.0) + residual;
        if absorbed >= 0.0 {
            out.insert(anchor, absorbed);
        } else {
            // anchor가 음수가 될 만큼의 잔차는 변경 키에서 흡수
            out.insert(anchor, 0.0);
            let changed = out.get(key).copied().unwrap_or(0.0) + absorbed;
            out.insert(key.to_string(), changed.max(0.0));
        }
    }
    out
}
