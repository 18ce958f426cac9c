//! 모의거래 엔진.
//!
//! 실제 주문 없이 현재 호가로 즉시 체결된 것으로 계좌만 갱신합니다.
//! - 매수: 주문 가격이 최우선 매도 호가 이상이어야 하며, 매도 호가로 체결
//! - 매도: 주문 가격이 최우선 매수 호가 이하여야 하며, 매수 호가로 체결
//!
//! 체결이 즉시 끝나므로 미체결 주문 개념이 없습니다.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use trader_core::{Account, ExchangeConfig, Holding, Order, Price, Quantity, Ticker};

use crate::{ExchangeError, ExchangeResult, PriceSource, TradingEngine};

/// 모의거래 엔진.
pub struct SimulatedTradingEngine {
    config: Arc<ExchangeConfig>,
    prices: Arc<dyn PriceSource>,
    account: RwLock<Account>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for SimulatedTradingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedTradingEngine")
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl SimulatedTradingEngine {
    /// 초기 잔고와 종목별 보유 수량으로 엔진을 만듭니다.
    ///
    /// 목록에 없는 설정 종목은 0으로 시작하며, 설정에 없는 종목은 거부합니다.
    pub fn new(
        config: Arc<ExchangeConfig>,
        prices: Arc<dyn PriceSource>,
        balance: Price,
        holdings: &HashMap<String, Quantity>,
    ) -> ExchangeResult<Self> {
        if let Some(unknown) = holdings.keys().find(|inst| !config.has_instrument(inst)) {
            return Err(ExchangeError::UnknownInstrument(unknown.clone()));
        }

        let holdings: BTreeMap<String, Holding> = config
            .instrument_names()
            .map(|inst| {
                let available = holdings.get(inst).copied().unwrap_or(Decimal::ZERO);
                (
                    inst.to_string(),
                    Holding {
                        available,
                        frozen: Decimal::ZERO,
                    },
                )
            })
            .collect();

        let account = Account {
            balance,
            holdings,
            ..Default::default()
        };

        let seed = chrono::Utc::now().timestamp().max(0) as u64;

        Ok(Self {
            config,
            prices,
            account: RwLock::new(account),
            next_id: AtomicU64::new(seed),
        })
    }

    async fn pricing(&self, instrument: &str) -> ExchangeResult<Ticker> {
        self.prices
            .ticker(instrument, self.config.simulation_depth)
            .await
            .map_err(|e| ExchangeError::PricingUnavailable(format!("{}: {}", instrument, e)))
    }

    fn next_order_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::Relaxed).to_string()
    }

    /// 현재 계좌 상태 (평가 없이).
    pub async fn snapshot(&self) -> Account {
        self.account.read().await.clone()
    }
}

#[async_trait]
impl TradingEngine for SimulatedTradingEngine {
    fn is_simulated(&self) -> bool {
        true
    }

    async fn get_account(&self, main_instrument: &str) -> ExchangeResult<Account> {
        let mut mids = BTreeMap::new();
        for instrument in self.config.instrument_names() {
            let ticker = self.pricing(instrument).await?;
            mids.insert(instrument.to_string(), ticker.mid);
        }

        let mut account = self.account.write().await;
        account.total = account.mark_to_market(&mids).ok_or_else(|| {
            ExchangeError::PricingUnavailable("account valuation out of range".into())
        })?;
        account.net = account.total;
        account.select(main_instrument);

        Ok(account.clone())
    }

    async fn buy(&self, instrument: &str, price: Price, amount: Quantity) -> ExchangeResult<String> {
        let ticker = self.pricing(instrument).await?;
        if price < ticker.ask {
            return Err(ExchangeError::PriceTooLow {
                price,
                ask: ticker.ask,
            });
        }

        let mut guard = self.account.write().await;
        let account = &mut *guard;
        let insufficient = |required: Decimal| ExchangeError::InsufficientBalance {
            required,
            available: account.balance,
        };
        let required = price.checked_mul(amount).ok_or_else(|| insufficient(Decimal::MAX))?;
        if required > account.balance {
            return Err(insufficient(required));
        }
        let cost = ticker.ask.checked_mul(amount).ok_or_else(|| insufficient(Decimal::MAX))?;

        let holding = account.holdings.entry(instrument.to_string()).or_default();
        let available = holding
            .available
            .checked_add(amount)
            .ok_or(ExchangeError::InvalidAmount(amount))?;

        holding.available = available;
        account.balance -= cost;

        let id = self.next_order_id();
        info!(id = %id, instrument, fill = %ticker.ask, %amount, "simulated buy filled");
        Ok(id)
    }

    async fn sell(
        &self,
        instrument: &str,
        price: Price,
        amount: Quantity,
    ) -> ExchangeResult<String> {
        let ticker = self.pricing(instrument).await?;
        if price > ticker.bid {
            return Err(ExchangeError::PriceTooHigh {
                price,
                bid: ticker.bid,
            });
        }

        let mut guard = self.account.write().await;
        let account = &mut *guard;
        let holding = account.holdings.entry(instrument.to_string()).or_default();
        if amount > holding.available {
            return Err(ExchangeError::InsufficientInventory {
                required: amount,
                available: holding.available,
            });
        }

        let balance = ticker
            .bid
            .checked_mul(amount)
            .and_then(|proceeds| account.balance.checked_add(proceeds))
            .ok_or(ExchangeError::InvalidAmount(amount))?;

        holding.available -= amount;
        account.balance = balance;

        let id = self.next_order_id();
        info!(id = %id, instrument, fill = %ticker.bid, %amount, "simulated sell filled");
        Ok(id)
    }

    async fn get_order(&self, instrument: &str, id: &str) -> ExchangeResult<Order> {
        Ok(Order::placeholder(id, instrument))
    }

    async fn get_orders(&self, _instrument: &str) -> ExchangeResult<Vec<Order>> {
        Ok(Vec::new())
    }

    async fn get_trades(&self, _instrument: &str) -> ExchangeResult<Vec<Order>> {
        Ok(Vec::new())
    }

    async fn cancel_order(&self, order: &Order) -> ExchangeResult<()> {
        debug!(id = %order.id, "simulated cancel is a no-op");
        Ok(())
    }
}
