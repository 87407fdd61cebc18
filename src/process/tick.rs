//! 연속 공정 1틱 상태 전이.
//!
//! `(이전 상태, 입력 습도, 난수) -> 새 상태`의 순수 함수다. 난수는 틱마다 같은 개수를
//! 같은 순서로 소비한다: 설비별 트립 판정, 생산량 지터, 순도 지터, 검출효율 지터, 수분 지터.

use tracing::{debug, warn};

use super::machine::{MachineState, MachineStatus};
use super::params::ProcessParameters;
use super::rng::RandomSource;
use super::state::{ClassificationMetrics, ContinuousProcessState, QualityMetrics};

/// 틱 외부 입력.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInputs {
    /// 투입물 습도 [%]
    pub input_humidity_pct: f64,
    /// 틱 길이 [s]
    pub tick_duration_sec: f64,
}

/// 한 틱 진행한 새 상태를 반환한다. 이전 상태는 변경하지 않는다.
///
/// 감시 설비 중 하나라도 고장(또는 수동 정지)이면 이번 틱 생산량과 선별 처리량은 0이다.
/// 사일로는 용량에서 클램프되고 넘친 양은 버려 `dropped_overflow_kg`에 누적한다.
pub fn advance(
    prev: &ContinuousProcessState,
    inputs: &TickInputs,
    params: &ProcessParameters,
    rng: &mut dyn RandomSource,
) -> ContinuousProcessState {
    let mut trips = 0u64;
    let machines: Vec<MachineStatus> = params
        .machines
        .iter()
        .map(|machine| {
            let tripped = rng.chance(machine.trip_probability);
            let held_off = prev.machine_state(&machine.name) == Some(MachineState::Off);
            let state = if held_off {
                MachineState::Off
            } else if tripped {
                trips += 1;
                machine.failure_mode.into()
            } else {
                MachineState::Ok
            };
            MachineStatus {
                name: machine.name.clone(),
                state,
            }
        })
        .collect();

    let production_jitter = rng.uniform(params.production_jitter);
    let purity_jitter = rng.uniform(params.classification.metric_jitter_pct);
    let efficiency_jitter = rng.uniform(params.classification.metric_jitter_pct);
    let moisture_jitter = rng.uniform(params.moisture_jitter_pct);

    let halted = machines.iter().any(|m| m.state.halts_line());
    let organic = prev.composition.fraction_of(&params.organic_categories);
    let contaminant = prev.composition.fraction_of(&params.contaminant_categories);

    let feed_kg_h = params.base_capacity_kg_h * (1.0 - production_jitter);
    let (throughput_kg_h, production_rate_kg_h) = if halted {
        (0.0, 0.0)
    } else {
        (feed_kg_h, feed_kg_h * organic)
    };

    let c = &params.classification;
    let purity_pct = (c.nominal_purity_pct - contaminant * c.purity_sensitivity_pct - purity_jitter)
        .clamp(c.purity_floor_pct, 100.0);
    let detection_efficiency_pct = (c.nominal_efficiency_pct
        - contaminant * c.efficiency_sensitivity_pct
        - efficiency_jitter)
        .clamp(c.efficiency_floor_pct, 100.0);

    let moisture_pct = (inputs.input_humidity_pct / 2.0 - moisture_jitter).max(params.moisture_floor_pct);

    let capacity = prev.silo_capacity_kg;
    let added_kg = production_rate_kg_h * inputs.tick_duration_sec.max(0.0) / 3600.0;
    let filled = prev.silo_level_kg + added_kg;
    let (silo_level_kg, spilled) = if filled > capacity {
        (capacity, filled - capacity)
    } else {
        (filled.max(0.0), 0.0)
    };
    if spilled > 0.0 {
        warn!(target: "twin.process", tick = prev.tick + 1, spilled_kg = spilled, "사일로 만재, 초과분 폐기");
    }

    for m in machines.iter().filter(|m| m.state.is_failure()) {
        warn!(target: "twin.process", tick = prev.tick + 1, machine = %m.name, state = ?m.state, "설비 트립");
    }
    debug!(
        target: "twin.process",
        tick = prev.tick + 1,
        halted,
        production_kg_h = production_rate_kg_h,
        silo_kg = silo_level_kg,
        "틱 진행"
    );

    ContinuousProcessState {
        composition: prev.composition.clone(),
        machines,
        production_rate_kg_h,
        classification: ClassificationMetrics {
            throughput_kg_h,
            purity_pct,
            detection_efficiency_pct,
        },
        quality: QualityMetrics {
            purity_pct,
            moisture_pct,
        },
        silo_level_kg,
        silo_capacity_kg: capacity,
        dropped_overflow_kg: prev.dropped_overflow_kg + spilled,
        tick: prev.tick + 1,
        trip_count: prev.trip_count + trips,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::WasteComposition;
    use crate::process::rng::ReplaySource;

    fn idle(params: &ProcessParameters) -> ContinuousProcessState {
        ContinuousProcessState::idle(WasteComposition::default(), &params.machines, params.silo_capacity_kg)
    }

    fn inputs() -> TickInputs {
        TickInputs {
            input_humidity_pct: 30.0,
            tick_duration_sec: 1.0,
        }
    }

    #[test]
    fn every_tick_consumes_fixed_draw_count() {
        let params = ProcessParameters::default();
        let mut rng = ReplaySource::constant(0.5);
        let s1 = advance(&idle(&params), &inputs(), &params, &mut rng);
        assert_eq!(rng.consumed(), params.machines.len() + 4);
        advance(&s1, &inputs(), &params, &mut rng);
        assert_eq!(rng.consumed(), 2 * (params.machines.len() + 4));
    }

    #[test]
    fn low_draw_trips_shredder_and_halts_line() {
        let params = ProcessParameters::default();
        // 파쇄기 0.01 < 0.05 트립, 건조기 0.5 정상
        let mut rng = ReplaySource::new(vec![0.01, 0.5, 0.5, 0.5, 0.5, 0.5]);
        let s = advance(&idle(&params), &inputs(), &params, &mut rng);
        assert_eq!(s.machine_state("primary_shredder"), Some(MachineState::Jammed));
        assert_eq!(s.machine_state("dryer"), Some(MachineState::Ok));
        assert_eq!(s.production_rate_kg_h, 0.0);
        assert_eq!(s.classification.throughput_kg_h, 0.0);
        assert_eq!(s.trip_count, 1);
    }

    #[test]
    fn off_machine_holds_line_without_trip() {
        let params = ProcessParameters::default();
        let mut prev = idle(&params);
        prev.machines[1].state = MachineState::Off;
        let mut rng = ReplaySource::constant(0.01);
        let s = advance(&prev, &inputs(), &params, &mut rng);
        assert_eq!(s.machine_state("dryer"), Some(MachineState::Off));
        assert_eq!(s.trip_count, 1); // 파쇄기만 트립
        assert_eq!(s.production_rate_kg_h, 0.0);
    }
}
