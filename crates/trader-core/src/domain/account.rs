//! 계좌 스냅샷.

use crate::types::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 한 종목의 보유 수량.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    /// 사용 가능 수량
    pub available: Quantity,
    /// 주문에 묶인 수량
    pub frozen: Quantity,
}

impl Holding {
    /// 총 보유 수량. 범위를 넘으면 `None`.
    pub fn total(&self) -> Option<Quantity> {
        self.available.checked_add(self.frozen)
    }
}

/// 계좌 정보.
///
/// 시뮬레이션에서는 `total = balance + frozen_balance + Σ holding.total() * mid`,
/// 실거래에서는 거래소가 보고한 값을 그대로 담습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// 호가 통화 기준 총 평가액
    pub total: Price,
    /// 순자산
    pub net: Price,
    /// 사용 가능 호가 통화 잔고
    pub balance: Price,
    /// 주문에 묶인 호가 통화 잔고
    pub frozen_balance: Price,
    /// 종목별 보유 수량
    pub holdings: BTreeMap<String, Holding>,
    /// 메인 종목 사용 가능 수량
    pub stock: Quantity,
    /// 메인 종목 묶인 수량
    pub frozen_stock: Quantity,
}

impl Account {
    /// 종목 보유 수량 (없으면 0).
    pub fn holding(&self, instrument: &str) -> Holding {
        self.holdings.get(instrument).copied().unwrap_or_default()
    }

    /// 메인 종목 뷰(`stock`, `frozen_stock`)를 채웁니다.
    pub fn select(&mut self, main_instrument: &str) {
        let holding = self.holding(main_instrument);
        self.stock = holding.available;
        self.frozen_stock = holding.frozen;
    }

    /// 종목별 중간 가격으로 총 평가액을 계산합니다.
    ///
    /// `mids`에 없는 종목은 0으로 평가됩니다. `Decimal` 범위를 넘으면 `None`.
    pub fn mark_to_market(&self, mids: &BTreeMap<String, Price>) -> Option<Price> {
        self.holdings.iter().try_fold(
            self.balance.checked_add(self.frozen_balance)?,
            |acc, (inst, h)| {
                let mid = mids.get(inst).copied().unwrap_or(Decimal::ZERO);
                acc.checked_add(h.total()?.checked_mul(mid)?)
            },
        )
    }
}
