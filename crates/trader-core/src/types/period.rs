//! 캔들스틱 주기 정의.
//!
//! 전략 계층은 `"M"`, `"M5"`, `"H"` 같은 짧은 라벨로 주기를 지정합니다.
//! 거래소 주기 코드(`"1min"`, `"1hour"` 등)로의 매핑은 설정에서 덮어쓸 수 있으며,
//! 이 타입은 라벨과 기본 매핑을 제공합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 캔들스틱 주기.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    /// 1분봉
    M1,
    /// 5분봉
    M5,
    /// 15분봉
    M15,
    /// 30분봉
    M30,
    /// 1시간봉
    H1,
    /// 일봉
    D1,
    /// 주봉
    W1,
}

impl Period {
    /// 지원하는 모든 주기.
    pub const ALL: [Period; 7] = [
        Period::M1,
        Period::M5,
        Period::M15,
        Period::M30,
        Period::H1,
        Period::D1,
        Period::W1,
    ];

    /// 전략 계층에서 쓰는 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            Period::M1 => "M",
            Period::M5 => "M5",
            Period::M15 => "M15",
            Period::M30 => "M30",
            Period::H1 => "H",
            Period::D1 => "D",
            Period::W1 => "W",
        }
    }

    /// OKCoin kline `type` 파라미터 기본값.
    pub fn default_exchange_code(&self) -> &'static str {
        match self {
            Period::M1 => "1min",
            Period::M5 => "5min",
            Period::M15 => "15min",
            Period::M30 => "30min",
            Period::H1 => "1hour",
            Period::D1 => "1day",
            Period::W1 => "1week",
        }
    }

    /// 라벨에서 파싱합니다.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("Invalid period: {}", s))
    }
}
