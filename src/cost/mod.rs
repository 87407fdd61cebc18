//! 유틸리티(전력·연소열·압축공기) 실시간 비용 계산 모듈 모음.

pub mod engine;
pub mod if97;
pub mod pneumatic;
pub mod thermal;

pub use engine::*;
pub use pneumatic::{compression_power, CompressionInput, CompressionResult};
pub use thermal::{dynamic_thermal_demand_mw, evaporation_duty, EvaporationDutyInput, ThermalDemandInput};
