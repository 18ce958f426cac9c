//! 거래소 커넥터.

pub mod okcoin;

pub use okcoin::*;
