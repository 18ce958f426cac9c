//! 공개 시세 조회 (호가창, 캔들).

use async_trait::async_trait;
use std::sync::Arc;
use trader_core::{ExchangeConfig, Record, Ticker};

use super::rest::OkcoinRest;
use super::types::{kline_to_record, DepthResponse, KlineRow};
use crate::{ExchangeError, ExchangeResult, PriceSource};

/// 공개 시세 클라이언트.
#[derive(Debug, Clone)]
pub struct MarketDataClient {
    rest: Arc<OkcoinRest>,
    config: Arc<ExchangeConfig>,
}

impl MarketDataClient {
    pub fn new(rest: Arc<OkcoinRest>, config: Arc<ExchangeConfig>) -> Self {
        Self { rest, config }
    }

    fn market_symbol(&self, instrument: &str) -> ExchangeResult<String> {
        self.config
            .market_symbol(instrument)
            .ok_or_else(|| ExchangeError::UnknownInstrument(instrument.to_string()))
    }

    /// 호가창을 조회해 티커를 만듭니다.
    ///
    /// 어느 한쪽 호가라도 비어 있으면 `InsufficientDepth`.
    pub async fn get_ticker(&self, instrument: &str, depth: usize) -> ExchangeResult<Ticker> {
        let symbol = self.market_symbol(instrument)?;
        let response: DepthResponse = self
            .rest
            .public_get(
                "depth.do",
                &[("symbol", symbol), ("size", depth.to_string())],
            )
            .await?;

        let (bids, asks) = response.into_levels();
        Ticker::from_depth(bids, asks).ok_or(ExchangeError::InsufficientDepth)
    }

    /// 캔들을 조회합니다. 거래소 순서(오래된 것부터) 그대로 반환합니다.
    pub async fn fetch_records(
        &self,
        instrument: &str,
        period_code: &str,
        size: usize,
    ) -> ExchangeResult<Vec<Record>> {
        let symbol = self.market_symbol(instrument)?;
        let rows: Vec<KlineRow> = self
            .rest
            .public_get(
                "kline.do",
                &[
                    ("symbol", symbol),
                    ("type", period_code.to_string()),
                    ("size", size.to_string()),
                ],
            )
            .await?;

        Ok(rows.iter().map(|row| kline_to_record(row)).collect())
    }
}

#[async_trait]
impl PriceSource for MarketDataClient {
    async fn ticker(&self, instrument: &str, depth: usize) -> ExchangeResult<Ticker> {
        self.get_ticker(instrument, depth).await
    }
}
