//! 리포트/인사이트 생성 협력자에게 넘기는 `{inputs, calculatedResults}` 스냅샷.
//!
//! 타이머 핸들이나 내부 참조 없이 값만 담으며, 협력자 호출은 코어 밖에서 비동기로 이뤄진다.

use serde::{Deserialize, Serialize};

use crate::cost::{CostBreakdown, CostInputs, TariffConfiguration};
use crate::error::TwinResult;
use crate::fleet::{FleetConfiguration, FleetRun, UnitModel};
use crate::process::{ContinuousProcessState, ProcessParameters};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshot<I, R> {
    pub inputs: I,
    pub calculated_results: R,
}

impl<I: Serialize, R: Serialize> ReportSnapshot<I, R> {
    pub fn new(inputs: I, calculated_results: R) -> Self {
        Self {
            inputs,
            calculated_results,
        }
    }

    pub fn to_json(&self) -> TwinResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetReportInputs {
    pub unit_model: UnitModel,
    pub fleet: FleetConfiguration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReportInputs {
    pub parameters: ProcessParameters,
    pub input_humidity_pct: f64,
    pub ticks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostReportInputs {
    pub tariffs: TariffConfiguration,
    pub inputs: CostInputs,
}

pub type FleetReport = ReportSnapshot<FleetReportInputs, FleetRun>;
pub type ProcessReport = ReportSnapshot<ProcessReportInputs, ContinuousProcessState>;
pub type CostReport = ReportSnapshot<CostReportInputs, CostBreakdown>;

pub fn fleet_report(model: &UnitModel, fleet: &FleetConfiguration, run: &FleetRun) -> FleetReport {
    ReportSnapshot::new(
        FleetReportInputs {
            unit_model: model.clone(),
            fleet: fleet.clone(),
        },
        run.clone(),
    )
}

pub fn process_report(
    params: &ProcessParameters,
    input_humidity_pct: f64,
    state: &ContinuousProcessState,
) -> ProcessReport {
    ReportSnapshot::new(
        ProcessReportInputs {
            parameters: params.clone(),
            input_humidity_pct,
            ticks: state.tick,
        },
        state.clone(),
    )
}

pub fn cost_report(tariffs: &TariffConfiguration, inputs: &CostInputs, breakdown: &CostBreakdown) -> CostReport {
    ReportSnapshot::new(
        CostReportInputs {
            tariffs: tariffs.clone(),
            inputs: *inputs,
        },
        *breakdown,
    )
}
