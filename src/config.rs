use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::composition::WasteComposition;
use crate::cost::{CostEngine, CostParameters, TariffConfiguration};
use crate::error::{TwinError, TwinResult};
use crate::fleet::{FleetConfiguration, UnitAssignment, UnitModel};
use crate::profile::ProfileCatalog;
use crate::reactor::{builtin_presets, PresetCatalog, ProcessPreset};
use crate::process::ProcessParameters;

/// 기본 설정 파일 이름.
pub const DEFAULT_CONFIG_FILE: &str = "twin.toml";

/// 디지털 트윈 전체 설정(카탈로그, 플릿 구성, 단가, 공정 파라미터).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub unit_model: UnitModel,
    pub presets: Vec<ProcessPreset>,
    pub profiles: ProfileCatalog,
    pub fleet: FleetConfiguration,
    pub tariffs: TariffConfiguration,
    /// 초기 투입 조성
    pub composition: WasteComposition,
    pub process: ProcessParameters,
    pub cost: CostParameters,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unit_model: UnitModel::default(),
            presets: builtin_presets(),
            profiles: ProfileCatalog::default(),
            fleet: FleetConfiguration::new(vec![
                UnitAssignment::new("R1", "fast-oil"),
                UnitAssignment::new("R2", "intermediate"),
                UnitAssignment::new("R3", "slow-biochar"),
            ]),
            tariffs: TariffConfiguration::default(),
            composition: WasteComposition::default(),
            process: ProcessParameters::default(),
            cost: CostParameters::default(),
        }
    }
}

impl Config {
    /// TOML 문자열을 파싱하고 검증한다.
    pub fn from_toml_str(content: &str) -> TwinResult<Self> {
        let cfg: Config = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml_string(&self) -> TwinResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 설정을 파일에 저장한다.
    pub fn save(&self, path: &Path) -> TwinResult<()> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// 값 범위를 검증한다. 플릿의 미등록 프리셋은 오류가 아니라 실행 시 유닛 Fault로 처리된다.
    pub fn validate(&self) -> TwinResult<()> {
        WasteComposition::new(self.composition.shares().clone())?;
        if let Some(p) = self.presets.iter().find(|p| {
            !p.target_temp_c.is_finite() || !p.residence_time_sec.is_finite() || p.residence_time_sec < 0.0
        }) {
            return Err(TwinError::InvalidParameter(format!(
                "프리셋 {}: 온도/체류시간 값이 잘못되었습니다",
                p.name
            )));
        }
        if self.unit_model.base_capacity_kg_h < 0.0 {
            return Err(TwinError::InvalidParameter(
                "기준 처리용량은 음수일 수 없습니다".into(),
            ));
        }
        self.profiles.validate()?;
        self.process.validate()?;
        self.tariffs.validate()?;
        self.cost.validate()?;
        Ok(())
    }

    pub fn preset_catalog(&self) -> PresetCatalog {
        PresetCatalog::new(self.presets.iter().cloned())
    }

    pub fn cost_engine(&self) -> CostEngine {
        CostEngine::new(self.tariffs.clone(), self.cost.clone())
    }
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성해 저장한다.
pub fn load_or_default(path: &Path) -> TwinResult<Config> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        Config::from_toml_str(&content)
    } else {
        let cfg = Config::default();
        cfg.save(path)?;
        info!(target: "twin.config", path = %path.display(), "기본 설정 파일 생성");
        Ok(cfg)
    }
}
