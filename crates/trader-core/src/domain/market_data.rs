//! 시장 데이터 타입 및 구조체.
//!
//! 이 모듈은 시장 데이터 관련 타입을 정의합니다:
//! - `OrderBookLevel` - 호가 한 단계 (가격, 수량)
//! - `Ticker` - 최우선 호가와 호가창 스냅샷
//! - `Record` - OHLCV 캔들스틱 데이터

use crate::types::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 호가창 가격 레벨.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    /// 가격
    pub price: Price,
    /// 수량
    pub amount: Quantity,
}

impl OrderBookLevel {
    /// 새 호가 레벨을 생성합니다.
    pub fn new(price: Price, amount: Quantity) -> Self {
        Self { price, amount }
    }
}

/// 최우선 호가와 이를 계산한 호가창 스냅샷.
///
/// 매수/매도 양쪽에 최소 한 단계가 있어야만 생성됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    /// 최우선 매수 호가
    pub bid: Price,
    /// 최우선 매도 호가
    pub ask: Price,
    /// 중간 가격 ((bid + ask) / 2)
    pub mid: Price,
    /// 매수 호가 - 가격 내림차순 정렬
    pub bids: Vec<OrderBookLevel>,
    /// 매도 호가 - 가격 오름차순 정렬
    pub asks: Vec<OrderBookLevel>,
}

impl Ticker {
    /// 정렬된 호가창에서 티커를 만듭니다.
    ///
    /// `bids`는 내림차순, `asks`는 오름차순이어야 합니다.
    /// 어느 한쪽이라도 비어 있으면 `None`을 반환합니다.
    pub fn from_depth(bids: Vec<OrderBookLevel>, asks: Vec<OrderBookLevel>) -> Option<Self> {
        let bid = bids.first()?.price;
        let ask = asks.first()?.price;

        Some(Self {
            bid,
            ask,
            mid: (bid + ask) / Decimal::TWO,
            bids,
            asks,
        })
    }

    /// 매수/매도 스프레드를 반환합니다.
    pub fn spread(&self) -> Decimal {
        self.ask - self.bid
    }
}

/// OHLCV 캔들스틱 한 개.
///
/// 한 주기 안에서 `time`(초)이 식별자입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 캔들 시작 시각 (Unix 초)
    pub time: i64,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량
    pub volume: Quantity,
}
