//! 실거래 엔진.
//!
//! 모든 인증 요청은 `OkcoinRest::signed_post`를 통해 서명되고 속도 제한됩니다.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;
use trader_core::{to_param_string, Account, ExchangeConfig, Holding, Order, Price, Quantity};

use super::rest::OkcoinRest;
use super::types::{id_to_string, ExchangeOrder, OrdersResponse, TradeResponse, UserInfoResponse};
use crate::{ExchangeError, ExchangeResult, TradingEngine};

/// 거래소 계정에 실제 주문을 내는 엔진.
#[derive(Debug)]
pub struct LiveTradingEngine {
    rest: Arc<OkcoinRest>,
    config: Arc<ExchangeConfig>,
}

impl LiveTradingEngine {
    pub fn new(rest: Arc<OkcoinRest>, config: Arc<ExchangeConfig>) -> Self {
        Self { rest, config }
    }

    fn symbol_param(&self, instrument: &str) -> ExchangeResult<String> {
        self.config
            .market_symbol(instrument)
            .map(|symbol| format!("symbol={}", symbol))
            .ok_or_else(|| ExchangeError::UnknownInstrument(instrument.to_string()))
    }

    fn to_order(&self, raw: &ExchangeOrder, instrument: &str) -> Order {
        Order {
            id: id_to_string(&raw.order_id),
            price: raw.price,
            amount: raw.amount,
            deal_amount: raw.deal_amount,
            order_type: self.config.order_type_code(&raw.order_type),
            instrument: instrument.to_string(),
        }
    }

    async fn place(&self, params: Vec<String>) -> ExchangeResult<String> {
        let response: TradeResponse = self.rest.signed_post("trade.do", params).await?;
        Ok(id_to_string(&response.order_id))
    }

    async fn query_orders(
        &self,
        endpoint: &str,
        instrument: &str,
        extra: &[&str],
    ) -> ExchangeResult<Vec<Order>> {
        let mut params = vec![self.symbol_param(instrument)?];
        params.extend(extra.iter().map(|p| p.to_string()));

        let response: OrdersResponse = self.rest.signed_post(endpoint, params).await?;
        Ok(response
            .orders
            .iter()
            .map(|raw| self.to_order(raw, instrument))
            .collect())
    }
}

#[async_trait]
impl TradingEngine for LiveTradingEngine {
    fn is_simulated(&self) -> bool {
        false
    }

    async fn get_account(&self, main_instrument: &str) -> ExchangeResult<Account> {
        let response: UserInfoResponse = self.rest.signed_post("userinfo.do", Vec::new()).await?;
        let funds = &response.info.funds;
        let quote = &self.config.quote_currency;

        let mut account = Account {
            total: funds.asset.total,
            net: funds.asset.net,
            balance: funds.free(quote),
            frozen_balance: funds.frozen(quote),
            ..Default::default()
        };

        for (instrument, symbol) in &self.config.instruments {
            account.holdings.insert(
                instrument.clone(),
                Holding {
                    available: funds.free(symbol),
                    frozen: funds.frozen(symbol),
                },
            );
        }
        account.select(main_instrument);

        Ok(account)
    }

    async fn buy(&self, instrument: &str, price: Price, amount: Quantity) -> ExchangeResult<String> {
        let mut params = vec![self.symbol_param(instrument)?];
        if price > Decimal::ZERO {
            params.push("type=buy".to_string());
            params.push(format!("price={}", to_param_string(price)));
            params.push(format!("amount={}", to_param_string(amount)));
        } else {
            // 시장가 매수는 사용할 호가 통화 금액을 price로 보낸다
            params.push("type=buy_market".to_string());
            params.push(format!("price={}", to_param_string(amount)));
        }

        debug!(instrument, %price, %amount, "placing buy order");
        self.place(params).await
    }

    async fn sell(
        &self,
        instrument: &str,
        price: Price,
        amount: Quantity,
    ) -> ExchangeResult<String> {
        let mut params = vec![
            self.symbol_param(instrument)?,
            format!("amount={}", to_param_string(amount)),
        ];
        if price > Decimal::ZERO {
            params.push("type=sell".to_string());
            params.push(format!("price={}", to_param_string(price)));
        } else {
            params.push("type=sell_market".to_string());
        }

        debug!(instrument, %price, %amount, "placing sell order");
        self.place(params).await
    }

    async fn get_order(&self, instrument: &str, id: &str) -> ExchangeResult<Order> {
        let order_param = format!("order_id={}", id);
        self.query_orders("order_info.do", instrument, &[order_param.as_str()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ExchangeError::OrderNotFound(id.to_string()))
    }

    async fn get_orders(&self, instrument: &str) -> ExchangeResult<Vec<Order>> {
        self.query_orders("order_info.do", instrument, &["order_id=-1"])
            .await
    }

    async fn get_trades(&self, instrument: &str) -> ExchangeResult<Vec<Order>> {
        let page_length = format!("page_length={}", self.config.trade_history_page_length);
        self.query_orders(
            "order_history.do",
            instrument,
            &["status=1", "current_page=1", page_length.as_str()],
        )
        .await
    }

    async fn cancel_order(&self, order: &Order) -> ExchangeResult<()> {
        let params = vec![
            self.symbol_param(&order.instrument)?,
            format!("order_id={}", order.id),
        ];
        let _: serde_json::Value = self.rest.signed_post("cancel_order.do", params).await?;
        Ok(())
    }
}
