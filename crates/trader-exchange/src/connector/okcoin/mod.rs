//! OKCoin (okcoin.cn) v1 REST 커넥터.
//!
//! # 구성
//!
//! - [`signer`] - MD5 요청 서명
//! - [`rate_limiter`] - 서명 요청 자체 속도 제한
//! - [`rest`] - HTTP 전송과 응답 봉투 검사
//! - [`market_data`] - 호가창/캔들 공개 조회
//! - [`live`] - 실거래 엔진
//!
//! # 예제
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trader_core::ExchangeConfig;
//! use trader_exchange::connector::okcoin::{MarketDataClient, OkcoinRest};
//!
//! let config = Arc::new(ExchangeConfig::new("access", "secret"));
//! let rest = Arc::new(OkcoinRest::new(&config)?);
//! let market = MarketDataClient::new(rest, config);
//! let ticker = market.get_ticker("BTC", 20).await?;
//! ```

pub mod live;
pub mod market_data;
pub mod rate_limiter;
pub mod rest;
pub mod signer;
pub mod types;

pub use live::LiveTradingEngine;
pub use market_data::MarketDataClient;
pub use rate_limiter::RateLimiter;
pub use rest::OkcoinRest;
pub use signer::{SignedParams, Signer};
