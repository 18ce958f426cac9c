//! 모의거래 주문 명령.
//!
//! 실시간 호가로 모의 계좌를 만들고 주문 한 건을 체결해 본 뒤 계좌를 출력합니다.

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::info;
use trader_core::Side;
use trader_exchange::ExchangeAdapter;

use super::account::print_account;

/// 모의 주문 설정.
#[derive(Debug)]
pub struct PaperOrder {
    pub balance: Decimal,
    pub holdings: HashMap<String, Decimal>,
    pub side: Side,
    pub instrument: String,
    pub price: Decimal,
    pub amount: Decimal,
}

/// `INST=QTY` 형식의 보유 수량을 파싱합니다.
pub fn parse_holding(s: &str) -> Result<(String, Decimal)> {
    let (instrument, qty) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid holding: {}. Use INST=QTY", s))?;
    let qty = Decimal::from_str(qty.trim())
        .with_context(|| format!("Invalid quantity in {}", s))?;
    Ok((instrument.trim().to_uppercase(), qty))
}

pub async fn run_paper_order(adapter: &ExchangeAdapter, order: PaperOrder) -> Result<()> {
    adapter.simulate(order.balance, &order.holdings).await?;

    let id = match order.side {
        Side::Buy => {
            adapter
                .buy(&order.instrument, order.price, order.amount, "paper order")
                .await?
        }
        Side::Sell => {
            adapter
                .sell(&order.instrument, order.price, order.amount, "paper order")
                .await?
        }
    };
    info!(id = %id, "paper order filled");

    let account = adapter.get_account().await?;
    print_account(&account, &adapter.get_main_instrument());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_holding() {
        assert_eq!(parse_holding("btc=1.5").unwrap(), ("BTC".to_string(), dec!(1.5)));
        assert!(parse_holding("BTC").is_err());
        assert!(parse_holding("BTC=abc").is_err());
    }
}
