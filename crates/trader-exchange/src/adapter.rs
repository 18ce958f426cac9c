//! 거래소 어댑터.
//!
//! 전략 계층이 사용하는 단일 진입점입니다. 종목/주기 검증, 거래 이벤트 로깅,
//! 캔들 캐시를 담당하고 실제 주문은 현재 `TradingEngine`(실거래 또는 모의거래)에
//! 위임합니다.
//!
//! 모든 실패는 `ERROR` 이벤트로 한 번 기록된 뒤 `Err`로 반환됩니다.
//! 어댑터는 재시도하지 않습니다.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock as StdRwLock};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use trader_core::{
    Account, ExchangeConfig, Order, Period, Price, Quantity, Record, Side, Ticker,
    TradeEventKind, TradeLogger,
};

use crate::connector::okcoin::{LiveTradingEngine, MarketDataClient, OkcoinRest};
use crate::record_cache::RecordCache;
use crate::simulated::SimulatedTradingEngine;
use crate::{ExchangeError, ExchangeResult, PriceSource, TradingEngine};

/// OKCoin 거래소 어댑터.
pub struct ExchangeAdapter {
    config: Arc<ExchangeConfig>,
    main_instrument: StdRwLock<String>,
    rest: Arc<OkcoinRest>,
    market: Arc<MarketDataClient>,
    engine: RwLock<Arc<dyn TradingEngine>>,
    records: Mutex<RecordCache>,
    logger: TradeLogger,
}

impl std::fmt::Debug for ExchangeAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeAdapter")
            .field("config", &self.config)
            .field("main_instrument", &self.get_main_instrument())
            .finish_non_exhaustive()
    }
}

impl ExchangeAdapter {
    /// 실거래 모드 어댑터를 생성합니다.
    ///
    /// 설정된 메인 종목이 종목 목록에 없으면 BTC(또는 첫 종목)로 보정합니다.
    pub fn new(config: ExchangeConfig) -> ExchangeResult<Self> {
        let config = config.normalized();
        config.validate()?;

        let main_instrument = config.resolved_main_instrument();
        if main_instrument != config.main_instrument {
            warn!(
                configured = %config.main_instrument,
                resolved = %main_instrument,
                "main instrument not configured, falling back"
            );
        }

        let config = Arc::new(config);
        let rest = Arc::new(OkcoinRest::new(&config)?);
        let market = Arc::new(MarketDataClient::new(rest.clone(), config.clone()));
        let live: Arc<dyn TradingEngine> =
            Arc::new(LiveTradingEngine::new(rest.clone(), config.clone()));

        info!(
            exchange = %config.exchange_type,
            host = %rest.host(),
            main_instrument = %main_instrument,
            "exchange adapter created"
        );

        Ok(Self {
            logger: TradeLogger::new(config.trader_id.clone(), config.exchange_type.clone()),
            records: Mutex::new(RecordCache::new(config.default_record_size)),
            main_instrument: StdRwLock::new(main_instrument),
            engine: RwLock::new(live),
            market,
            rest,
            config,
        })
    }

    /// 거래소 종류.
    pub fn get_type(&self) -> &str {
        &self.config.exchange_type
    }

    /// 거래소 이름.
    pub fn get_name(&self) -> &str {
        &self.config.name
    }

    /// 설정 (읽기 전용).
    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// 현재 메인 종목.
    pub fn get_main_instrument(&self) -> String {
        self.main_instrument
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 메인 종목 변경. 설정에 없는 종목이면 무시하고 현재 값을 반환합니다.
    pub fn set_main_instrument(&self, instrument: &str) -> String {
        let mut current = self
            .main_instrument
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if self.config.has_instrument(instrument) {
            *current = instrument.to_string();
        }
        current.clone()
    }

    /// 초당 서명 요청 한도 변경. 적용된 값을 반환합니다.
    pub async fn set_rate_limit(&self, limit: f64) -> f64 {
        let applied = self.rest.set_rate_limit(limit).await;
        if applied != limit {
            warn!(requested = limit, applied, "invalid rate limit ignored");
        }
        applied
    }

    /// 속도 제한에 맞춰 필요한 만큼 대기합니다.
    pub async fn auto_sleep(&self) {
        self.rest.auto_sleep().await;
    }

    /// 종목 최소 주문 수량.
    pub fn get_min_order_size(&self, instrument: &str) -> Option<Decimal> {
        self.config.min_order_size(instrument)
    }

    /// 정보 이벤트 기록.
    pub fn log(&self, message: &str) {
        self.logger.info(message);
    }

    /// 모의거래 모드 여부.
    pub async fn is_simulated(&self) -> bool {
        self.engine.read().await.is_simulated()
    }

    /// 모의거래 모드로 전환하고 계좌를 초기화합니다.
    ///
    /// 실거래 모드로 되돌아가는 방법은 없습니다. 다시 호출하면 계좌만 재설정됩니다.
    pub async fn simulate(
        &self,
        balance: Price,
        holdings: &HashMap<String, Quantity>,
    ) -> ExchangeResult<()> {
        let prices: Arc<dyn PriceSource> = self.market.clone();
        let engine = SimulatedTradingEngine::new(self.config.clone(), prices, balance, holdings);
        let engine = self.report("Simulate", engine)?;

        *self.engine.write().await = Arc::new(engine);
        info!(%balance, "switched to simulated trading");
        Ok(())
    }

    /// 계좌 조회.
    pub async fn get_account(&self) -> ExchangeResult<Account> {
        let main = self.get_main_instrument();
        let result = self.engine().await.get_account(&main).await;
        self.report("GetAccount", result)
    }

    /// 매수. `price`가 0 이하이면 시장가 주문입니다.
    pub async fn buy(
        &self,
        instrument: &str,
        price: Price,
        amount: Quantity,
        context: &str,
    ) -> ExchangeResult<String> {
        let result = self.place(instrument, price, amount, Side::Buy).await;
        let id = self.report("Buy", result)?;
        self.logger.log(TradeEventKind::Buy, price, amount, context);
        Ok(id)
    }

    /// 매도. `price`가 0 이하이면 시장가 주문입니다.
    pub async fn sell(
        &self,
        instrument: &str,
        price: Price,
        amount: Quantity,
        context: &str,
    ) -> ExchangeResult<String> {
        let result = self.place(instrument, price, amount, Side::Sell).await;
        let id = self.report("Sell", result)?;
        self.logger.log(TradeEventKind::Sell, price, amount, context);
        Ok(id)
    }

    async fn place(
        &self,
        instrument: &str,
        price: Price,
        amount: Quantity,
        side: Side,
    ) -> ExchangeResult<String> {
        self.require_instrument(instrument)?;
        if amount <= Decimal::ZERO {
            return Err(ExchangeError::InvalidAmount(amount));
        }

        let engine = self.engine().await;
        match side {
            Side::Buy => engine.buy(instrument, price, amount).await,
            Side::Sell => engine.sell(instrument, price, amount).await,
        }
    }

    /// 주문 조회.
    pub async fn get_order(&self, instrument: &str, id: &str) -> ExchangeResult<Order> {
        let result = match self.require_instrument(instrument) {
            Ok(()) => self.engine().await.get_order(instrument, id).await,
            Err(e) => Err(e),
        };
        self.report("GetOrder", result)
    }

    /// 미체결 주문 목록.
    pub async fn get_orders(&self, instrument: &str) -> ExchangeResult<Vec<Order>> {
        let result = match self.require_instrument(instrument) {
            Ok(()) => self.engine().await.get_orders(instrument).await,
            Err(e) => Err(e),
        };
        self.report("GetOrders", result)
    }

    /// 최근 체결 주문 목록.
    pub async fn get_trades(&self, instrument: &str) -> ExchangeResult<Vec<Order>> {
        let result = match self.require_instrument(instrument) {
            Ok(()) => self.engine().await.get_trades(instrument).await,
            Err(e) => Err(e),
        };
        self.report("GetTrades", result)
    }

    /// 주문 취소. 성공하면 가격과 잔여 수량으로 CANCEL 이벤트를 기록합니다.
    pub async fn cancel_order(&self, order: &Order) -> ExchangeResult<()> {
        let result = match self.require_instrument(&order.instrument) {
            Ok(()) => self.engine().await.cancel_order(order).await,
            Err(e) => Err(e),
        };
        self.report("CancelOrder", result)?;

        self.logger.log(
            TradeEventKind::Cancel,
            order.price,
            order.remaining(),
            &format!("order {} ({})", order.id, order.instrument),
        );
        Ok(())
    }

    /// 티커 조회. `depth`가 없거나 0이면 기본 깊이를 사용합니다.
    pub async fn get_ticker(&self, instrument: &str, depth: Option<usize>) -> ExchangeResult<Ticker> {
        let depth = match depth {
            Some(n) if n > 0 => n,
            _ => self.config.default_depth,
        };
        let result = match self.require_instrument(instrument) {
            Ok(()) => self.market.get_ticker(instrument, depth).await,
            Err(e) => Err(e),
        };
        self.report("GetTicker", result)
    }

    /// 캔들 히스토리 조회.
    ///
    /// 새로 조회한 캔들을 캐시에 병합해 반환합니다. 실패하면 에러를 기록하고
    /// 이전에 캐시된 히스토리(없으면 빈 목록)를 반환합니다.
    pub async fn get_records(
        &self,
        instrument: &str,
        period: &str,
        size: Option<usize>,
    ) -> Vec<Record> {
        let (period_key, code) = match self.resolve_period(instrument, period) {
            Ok(resolved) => resolved,
            Err(e) => {
                let _ = self.report::<()>("GetRecords", Err(e));
                return Vec::new();
            }
        };

        let size = self.records.lock().await.resolve_size(size);
        let fetched = self.market.fetch_records(instrument, &code, size).await;

        let mut cache = self.records.lock().await;
        match self.report("GetRecords", fetched) {
            Ok(feed) => cache.merge(instrument, period_key, &feed, size),
            Err(_) => cache.snapshot(instrument, period_key),
        }
    }

    fn resolve_period(&self, instrument: &str, label: &str) -> ExchangeResult<(Period, String)> {
        self.require_instrument(instrument)?;
        let code = self
            .config
            .period_code(label)
            .ok_or_else(|| ExchangeError::UnknownPeriod(label.to_string()))?;
        let period = Period::from_label(label)
            .ok_or_else(|| ExchangeError::UnknownPeriod(label.to_string()))?;
        Ok((period, code.to_string()))
    }

    fn require_instrument(&self, instrument: &str) -> ExchangeResult<()> {
        if self.config.has_instrument(instrument) {
            Ok(())
        } else {
            Err(ExchangeError::UnknownInstrument(instrument.to_string()))
        }
    }

    async fn engine(&self) -> Arc<dyn TradingEngine> {
        self.engine.read().await.clone()
    }

    /// 실패를 ERROR 이벤트로 기록하고 그대로 돌려줍니다.
    fn report<T>(&self, operation: &str, result: ExchangeResult<T>) -> ExchangeResult<T> {
        if let Err(e) = &result {
            self.logger.error(&format!("{}() error, {}", operation, e));
            if e.is_retryable() {
                debug!(operation, "transient failure, caller may retry");
            }
        }
        result
    }
}
