use serde::{Deserialize, Serialize};

use super::machine::{MachineState, MachineStatus, MonitoredMachine};
use crate::composition::WasteComposition;

/// 제품 품질 지표.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub purity_pct: f64,
    pub moisture_pct: f64,
}

/// 선별기 지표.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub throughput_kg_h: f64,
    pub purity_pct: f64,
    pub detection_efficiency_pct: f64,
}

/// 연속 공정의 직렬화 가능한 스냅샷. 운전 중에는 틱당 정확히 한 번 갱신된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousProcessState {
    pub composition: WasteComposition,
    pub machines: Vec<MachineStatus>,
    pub production_rate_kg_h: f64,
    pub classification: ClassificationMetrics,
    pub quality: QualityMetrics,
    /// 0..=silo_capacity_kg
    pub silo_level_kg: f64,
    pub silo_capacity_kg: f64,
    /// 사일로 만재로 버려진 누적량 [kg]
    pub dropped_overflow_kg: f64,
    pub tick: u64,
    /// 누적 고장 트립 횟수(수동 정지 제외)
    pub trip_count: u64,
}

impl ContinuousProcessState {
    /// 정지 상태 기준값: 생산 0, 사일로 비움, 모든 설비 정상.
    pub fn idle(composition: WasteComposition, machines: &[MonitoredMachine], silo_capacity_kg: f64) -> Self {
        Self {
            composition,
            machines: machines
                .iter()
                .map(|m| MachineStatus {
                    name: m.name.clone(),
                    state: MachineState::Ok,
                })
                .collect(),
            production_rate_kg_h: 0.0,
            classification: ClassificationMetrics::default(),
            quality: QualityMetrics::default(),
            silo_level_kg: 0.0,
            silo_capacity_kg: silo_capacity_kg.max(0.0),
            dropped_overflow_kg: 0.0,
            tick: 0,
            trip_count: 0,
        }
    }

    pub fn machine_state(&self, name: &str) -> Option<MachineState> {
        self.machines.iter().find(|m| m.name == name).map(|m| m.state)
    }

    /// 이번 틱에 라인이 멈췄는지
    pub fn line_halted(&self) -> bool {
        self.machines.iter().any(|m| m.state.halts_line())
    }

    /// 고장 상태인 설비 목록
    pub fn failed_machines(&self) -> impl Iterator<Item = &MachineStatus> {
        self.machines.iter().filter(|m| m.state.is_failure())
    }

    /// 사일로 충전율(0~1)
    pub fn silo_fill_ratio(&self) -> f64 {
        if self.silo_capacity_kg > 0.0 {
            self.silo_level_kg / self.silo_capacity_kg
        } else {
            0.0
        }
    }
}
