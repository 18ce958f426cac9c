//! OKCoin 거래소 어댑터.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - `ExchangeAdapter`: 전략 계층용 단일 진입점
//! - `TradingEngine` trait과 실거래/모의거래 구현
//! - OKCoin v1 REST 커넥터 (MD5 서명, 자체 속도 제한)
//! - 캔들 히스토리 캐시 (`RecordCache`)

pub mod adapter;
pub mod connector;
pub mod error;
pub mod record_cache;
pub mod simulated;
pub mod traits;

pub use adapter::ExchangeAdapter;
pub use connector::okcoin::{LiveTradingEngine, MarketDataClient, OkcoinRest};
pub use error::*;
pub use record_cache::{RecordCache, RecordSeries};
pub use simulated::SimulatedTradingEngine;
pub use traits::*;
