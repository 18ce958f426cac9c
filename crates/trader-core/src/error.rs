//! 핵심 계층의 에러 타입.

use thiserror::Error;

/// 설정 로드 및 검증 에러.
#[derive(Debug, Error)]
pub enum TraderError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 설정 로드 에러
    #[error("설정 로드 에러: {0}")]
    ConfigLoad(#[from] config::ConfigError),
}

/// 핵심 계층 작업을 위한 Result 타입.
pub type TraderResult<T> = Result<T, TraderError>;
