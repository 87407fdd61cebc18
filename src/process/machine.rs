use serde::{Deserialize, Serialize};

/// 감시 대상 설비 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineState {
    Ok,
    Jammed,
    Overheated,
    /// 운전자가 수동으로 정지시킴. 고장으로 집계하지 않는다.
    Off,
}

impl MachineState {
    /// 확률적 고장 상태 여부
    pub fn is_failure(self) -> bool {
        matches!(self, MachineState::Jammed | MachineState::Overheated)
    }

    /// 라인 전체를 멈추는 상태인지(고장 또는 수동 정지)
    pub fn halts_line(self) -> bool {
        self != MachineState::Ok
    }
}

/// 트립 시 전환될 고장 모드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    Jammed,
    Overheated,
}

impl From<FailureMode> for MachineState {
    fn from(mode: FailureMode) -> Self {
        match mode {
            FailureMode::Jammed => MachineState::Jammed,
            FailureMode::Overheated => MachineState::Overheated,
        }
    }
}

/// 틱마다 베르누이 시행으로 고장 여부를 판정하는 설비.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoredMachine {
    pub name: String,
    /// 틱당 트립 확률(0~1)
    pub trip_probability: f64,
    pub failure_mode: FailureMode,
}

impl MonitoredMachine {
    pub fn new(name: impl Into<String>, trip_probability: f64, failure_mode: FailureMode) -> Self {
        Self {
            name: name.into(),
            trip_probability,
            failure_mode,
        }
    }

    /// 1차 파쇄기(걸림 5%)와 건조기(과열 3%)
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("primary_shredder", 0.05, FailureMode::Jammed),
            Self::new("dryer", 0.03, FailureMode::Overheated),
        ]
    }
}

/// 설비 이름과 현재 상태.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineStatus {
    pub name: String,
    pub state: MachineState,
}
