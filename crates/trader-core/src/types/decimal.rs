//! 정밀한 금융 계산을 위한 Decimal 유틸리티.
//!
//! 거래소 응답의 숫자 필드는 JSON 숫자 또는 숫자 문자열로 내려옵니다.
//! 이 모듈은 두 형식을 모두 `Decimal`로 변환하는 관대한 파서와
//! 요청 파라미터용 문자열 포맷터를 제공합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 주문 수량을 위한 타입.
pub type Quantity = Decimal;

/// 임의의 JSON 값을 `Decimal`로 변환합니다.
///
/// 숫자와 숫자 문자열은 값 그대로, 지수 표기(`1e-5`)도 허용합니다.
/// 그 외(`null`, 객체, 파싱 불가 문자열)는 `0`을 반환합니다.
pub fn parse_decimal_lenient(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_decimal_str(&n.to_string()),
        Value::String(s) => parse_decimal_str(s.trim()),
        Value::Bool(true) => Decimal::ONE,
        _ => Decimal::ZERO,
    }
}

fn parse_decimal_str(s: &str) -> Decimal {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .unwrap_or(Decimal::ZERO)
}

/// `#[serde(deserialize_with = "...")]`용 관대한 Decimal 역직렬화.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_decimal_lenient(&value))
}

/// 요청 파라미터용 문자열로 변환합니다 (불필요한 0 제거).
pub fn to_param_string(value: Decimal) -> String {
    value.normalize().to_string()
}
