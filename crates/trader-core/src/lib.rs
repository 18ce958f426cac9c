//! # Trader Core
//!
//! 거래소 어댑터의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! - 시장 데이터 (`Ticker`, `OrderBookLevel`, `Record`)
//! - 주문 및 계좌 (`Order`, `Account`, `Holding`)
//! - 캔들 주기 (`Period`) 와 관대한 숫자 변환
//! - 설정 관리
//! - 로깅 인프라와 거래 이벤트 로거

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
