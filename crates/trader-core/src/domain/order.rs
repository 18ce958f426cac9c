//! 주문 타입.
//!
//! 주문 유형은 부호 있는 정수 코드로 표현됩니다:
//! 양수는 매수, 음수는 매도이고 절대값 1은 지정가, 2는 시장가입니다.

use crate::types::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 지정가 매수 코드.
pub const ORDER_TYPE_BUY: i32 = 1;
/// 지정가 매도 코드.
pub const ORDER_TYPE_SELL: i32 = -1;
/// 시장가 매수 코드.
pub const ORDER_TYPE_BUY_MARKET: i32 = 2;
/// 시장가 매도 코드.
pub const ORDER_TYPE_SELL_MARKET: i32 = -2;

/// 주문 방향 (매수 또는 매도).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// 매수
    Buy,
    /// 매도
    Sell,
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            _ => Err(format!("Invalid side: {} (expected buy or sell)", s)),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// 거래소(또는 시뮬레이션)의 주문.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// 주문 ID (거래소 발급 또는 시뮬레이션 합성)
    pub id: String,
    /// 주문 가격
    pub price: Price,
    /// 주문 수량
    pub amount: Quantity,
    /// 체결 수량
    pub deal_amount: Quantity,
    /// 부호 있는 주문 유형 코드 (알 수 없으면 0)
    pub order_type: i32,
    /// 거래 종목
    pub instrument: String,
}

impl Order {
    /// ID와 종목만 채운 주문을 만듭니다.
    pub fn placeholder(id: impl Into<String>, instrument: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            instrument: instrument.into(),
            ..Default::default()
        }
    }

    /// 미체결 잔량.
    pub fn remaining(&self) -> Quantity {
        self.amount - self.deal_amount
    }
}
