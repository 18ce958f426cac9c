//! OKCoin v1 REST 응답 타입.
//!
//! 숫자 필드는 숫자/문자열 어느 쪽으로 와도 받아들입니다.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use trader_core::{deserialize_lenient, parse_decimal_lenient, OrderBookLevel, Record};

/// 서명 요청 응답 공통 봉투.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub result: bool,
    #[serde(default)]
    pub error_code: Option<i64>,
}

/// `depth.do` 응답.
#[derive(Debug, Default, Deserialize)]
pub struct DepthResponse {
    #[serde(default)]
    pub bids: Vec<Vec<Value>>,
    #[serde(default)]
    pub asks: Vec<Vec<Value>>,
}

impl DepthResponse {
    /// (매수 내림차순, 매도 오름차순)으로 변환합니다.
    ///
    /// 거래소는 매도 호가를 내림차순으로 내려주므로 뒤집어야 합니다.
    pub fn into_levels(self) -> (Vec<OrderBookLevel>, Vec<OrderBookLevel>) {
        let bids = self.bids.iter().map(|row| level(row)).collect();
        let asks = self.asks.iter().rev().map(|row| level(row)).collect();
        (bids, asks)
    }
}

fn level(row: &[Value]) -> OrderBookLevel {
    OrderBookLevel::new(column(row, 0), column(row, 1))
}

fn column(row: &[Value], index: usize) -> Decimal {
    row.get(index)
        .map(parse_decimal_lenient)
        .unwrap_or(Decimal::ZERO)
}

/// `kline.do` 응답의 한 행: `[ms, open, high, low, close, volume]`.
pub type KlineRow = Vec<Value>;

/// kline 행을 캔들로 변환합니다. 시간은 밀리초에서 초로 바꿉니다.
pub fn kline_to_record(row: &[Value]) -> Record {
    let millis = row
        .first()
        .and_then(|v| v.as_i64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
        .unwrap_or(0);
    Record {
        time: millis / 1000,
        open: column(row, 1),
        high: column(row, 2),
        low: column(row, 3),
        close: column(row, 4),
        volume: column(row, 5),
    }
}

/// `userinfo.do` 응답.
#[derive(Debug, Default, Deserialize)]
pub struct UserInfoResponse {
    #[serde(default)]
    pub info: UserInfo,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub funds: Funds,
}

#[derive(Debug, Default, Deserialize)]
pub struct Funds {
    #[serde(default)]
    pub asset: Asset,
    #[serde(default)]
    pub free: HashMap<String, Value>,
    #[serde(default)]
    pub freezed: HashMap<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Asset {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub total: Decimal,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub net: Decimal,
}

impl Funds {
    /// 사용 가능 수량 (없으면 0).
    pub fn free(&self, currency: &str) -> Decimal {
        self.free
            .get(currency)
            .map(parse_decimal_lenient)
            .unwrap_or(Decimal::ZERO)
    }

    /// 묶인 수량 (없으면 0).
    pub fn frozen(&self, currency: &str) -> Decimal {
        self.freezed
            .get(currency)
            .map(parse_decimal_lenient)
            .unwrap_or(Decimal::ZERO)
    }
}

/// `trade.do` 응답.
#[derive(Debug, Deserialize)]
pub struct TradeResponse {
    #[serde(default)]
    pub order_id: Value,
}

/// `order_info.do` / `order_history.do` 응답.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersResponse {
    #[serde(default)]
    pub orders: Vec<ExchangeOrder>,
}

/// 거래소 주문 레코드.
#[derive(Debug, Deserialize)]
pub struct ExchangeOrder {
    #[serde(default)]
    pub order_id: Value,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub deal_amount: Decimal,
    #[serde(rename = "type", default)]
    pub order_type: String,
}

/// 숫자 또는 문자열 주문 ID를 문자열로 변환합니다.
pub fn id_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
