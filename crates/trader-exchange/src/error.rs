//! 거래소 에러 타입.

use rust_decimal::Decimal;
use thiserror::Error;
use trader_core::TraderError;

/// 거래소 어댑터 에러.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// 설정되지 않은 종목
    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    /// 설정되지 않은 캔들 주기
    #[error("Unknown period: {0}")]
    UnknownPeriod(String),

    /// 네트워크/연결 에러
    #[error("Network error: {0}")]
    Network(String),

    /// 파싱/역직렬화 에러
    #[error("Parse error: {0}")]
    Parse(String),

    /// 호가창 한쪽이 비어 있음
    #[error("Insufficient depth: can not get enough bids or asks")]
    InsufficientDepth,

    /// 거래소가 요청을 거부함 (거래소 에러 코드 그대로)
    #[error("Exchange rejected the request, error code {code}")]
    Rejected { code: i64 },

    /// 시뮬레이션 가격 조회 실패
    #[error("Pricing unavailable: {0}")]
    PricingUnavailable(String),

    /// 매수 가격이 최우선 매도 호가보다 낮음
    #[error("Order price {price} must be at least market ask {ask}")]
    PriceTooLow { price: Decimal, ask: Decimal },

    /// 매도 가격이 최우선 매수 호가보다 높음
    #[error("Order price {price} must be at most market bid {bid}")]
    PriceTooHigh { price: Decimal, bid: Decimal },

    /// 호가 통화 잔고 부족
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Decimal, available: Decimal },

    /// 종목 보유 수량 부족
    #[error("Insufficient inventory: required {required}, available {available}")]
    InsufficientInventory { required: Decimal, available: Decimal },

    /// 유효하지 않은 수량
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// 주문을 찾을 수 없음
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// 잘못된 설정
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl ExchangeError {
    /// 호출자가 다시 시도해 볼 만한 일시적 에러인지 확인.
    ///
    /// 어댑터 자신은 재시도하지 않습니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExchangeError::Network(_) | ExchangeError::PricingUnavailable(_)
        )
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        ExchangeError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::Parse(err.to_string())
    }
}

impl From<TraderError> for ExchangeError {
    fn from(err: TraderError) -> Self {
        ExchangeError::InvalidConfig(err.to_string())
    }
}
