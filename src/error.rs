use thiserror::Error;

/// 디지털 트윈 코어에서 발생 가능한 오류를 표현한다.
///
/// 시뮬레이션 계산 자체는 실패하지 않는다. 이 타입은 설정 구성/검증과
/// 파일 입출력 경로에서만 반환된다.
#[derive(Error, Debug)]
pub enum TwinError {
    /// 프리셋 카탈로그에 없는 이름
    #[error("알 수 없는 프리셋: {0}")]
    UnknownPreset(String),

    /// 성능 프로파일 카탈로그에 없는 설비 모델
    #[error("알 수 없는 설비 모델: {0}")]
    UnknownUnitModel(String),

    /// 조성 합이 100이 아니거나 음수/비유한 값 포함
    #[error("잘못된 조성: {0}")]
    MalformedComposition(String),

    /// 설정 파라미터 범위 오류
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),

    #[error("설정 파싱 오류: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("설정 직렬화 오류: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON 직렬화 오류: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TwinResult<T> = Result<T, TwinError>;
