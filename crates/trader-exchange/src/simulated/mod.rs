//! 모의거래.
//!
//! 실거래와 같은 `TradingEngine` 인터페이스로 메모리 내 계좌를 갱신합니다.
//! 체결 가격은 `PriceSource`(보통 `MarketDataClient`)에서 가져옵니다.

mod engine;

pub use engine::SimulatedTradingEngine;
