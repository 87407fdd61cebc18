//! 연속 공정(파쇄 → 건조 → 선별 → 사일로) 확률적 상태 기계.

pub mod machine;
pub mod params;
pub mod rng;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use machine::{FailureMode, MachineState, MachineStatus, MonitoredMachine};
pub use params::{ClassificationParameters, ProcessParameters};
pub use rng::{RandomSource, ReplaySource, SimRng};
pub use scheduler::{PendingTick, ProcessController, ProcessPhase, TickScheduler, TickTicket};
pub use state::{ClassificationMetrics, ContinuousProcessState, QualityMetrics};
pub use tick::{advance, TickInputs};
