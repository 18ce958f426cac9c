//! 거래 엔진 trait 정의.
//!
//! 어댑터는 실거래(`LiveTradingEngine`)와 모의거래(`SimulatedTradingEngine`)를
//! 같은 `TradingEngine` 인터페이스로 다룹니다.

use async_trait::async_trait;
use trader_core::{Account, Order, Price, Quantity, Ticker};

use crate::ExchangeError;

/// 거래소 작업을 위한 Result 타입.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// 현재 시세 제공자.
///
/// 모의거래 엔진은 이 trait을 통해 체결 가격과 평가 가격을 얻습니다.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// 종목의 현재 티커 조회.
    async fn ticker(&self, instrument: &str, depth: usize) -> ExchangeResult<Ticker>;
}

/// 거래 엔진.
///
/// 종목 검증은 호출 전에 어댑터에서 끝난 상태라고 가정합니다.
#[async_trait]
pub trait TradingEngine: Send + Sync {
    /// 모의거래 엔진 여부.
    fn is_simulated(&self) -> bool;

    /// 계좌 정보 조회. `main_instrument`로 `stock` 뷰를 채웁니다.
    async fn get_account(&self, main_instrument: &str) -> ExchangeResult<Account>;

    /// 매수. 가격이 0 이하이면 시장가이며 `amount`는 사용할 호가 통화 금액입니다.
    async fn buy(&self, instrument: &str, price: Price, amount: Quantity)
        -> ExchangeResult<String>;

    /// 매도. 가격이 0 이하이면 시장가이며 `amount`는 매도할 종목 수량입니다.
    async fn sell(
        &self,
        instrument: &str,
        price: Price,
        amount: Quantity,
    ) -> ExchangeResult<String>;

    /// 주문 조회.
    async fn get_order(&self, instrument: &str, id: &str) -> ExchangeResult<Order>;

    /// 미체결 주문 조회.
    async fn get_orders(&self, instrument: &str) -> ExchangeResult<Vec<Order>>;

    /// 최근 체결 주문 조회.
    async fn get_trades(&self, instrument: &str) -> ExchangeResult<Vec<Order>>;

    /// 주문 취소.
    async fn cancel_order(&self, order: &Order) -> ExchangeResult<()>;
}
