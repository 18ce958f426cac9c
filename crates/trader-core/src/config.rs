//! 설정 관리.
//!
//! 어댑터 설정은 기본값 → TOML 파일(선택) → 환경 변수(`TRADER__...`) 순으로 병합됩니다.
//! 생성 이후에는 메인 종목 선택을 제외한 모든 값이 불변입니다.

use crate::domain::{
    ORDER_TYPE_BUY, ORDER_TYPE_BUY_MARKET, ORDER_TYPE_SELL, ORDER_TYPE_SELL_MARKET,
};
use crate::error::{TraderError, TraderResult};
use crate::logging::{LogConfig, LogFormat};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// 기본 메인 종목.
pub const DEFAULT_MAIN_INSTRUMENT: &str = "BTC";

/// 허용되는 최소 초당 서명 요청 한도 (1000초에 한 번).
pub const MIN_RATE_LIMIT: f64 = 0.001;

/// 속도 제한 값이 허용 범위인지 확인합니다.
pub fn is_valid_rate_limit(limit: f64) -> bool {
    limit.is_finite() && limit >= MIN_RATE_LIMIT
}

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// 거래소 어댑터 설정
    pub exchange: ExchangeConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

impl AdapterConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> TraderResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("TRADER")
                    .separator("__")
                    .try_parsing(true),
            );

        let loaded: Self = builder.build()?.try_deserialize()?;
        let config = Self {
            exchange: loaded.exchange.normalized(),
            logging: loaded.logging,
        };
        config.exchange.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> TraderResult<Self> {
        Self::load("config/default.toml")
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// 로깅 초기화용 설정으로 변환합니다.
    ///
    /// `LOG_FORMAT` 환경 변수가 있으면 `format`보다 우선하고, 알 수 없는 형식은 pretty로 처리합니다.
    pub fn to_log_config(&self) -> LogConfig {
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .or_else(|| self.format.parse().ok())
            .unwrap_or(LogFormat::Pretty);
        LogConfig::new(self.level.clone()).with_format(format)
    }
}

/// 거래소 어댑터 설정.
///
/// # 보안
/// - `Debug` 구현은 민감 정보(`access_key`, `secret_key`)를 마스킹합니다.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// 이벤트 로그에 기록되는 트레이더 ID
    pub trader_id: String,
    /// 거래소 유형
    pub exchange_type: String,
    /// 표시 이름
    pub name: String,
    /// REST API 기본 URL (끝에 `/` 포함)
    pub host: String,
    /// API 키
    pub access_key: String,
    /// API 시크릿
    pub secret_key: String,
    /// 호가 통화 심볼
    pub quote_currency: String,
    /// 종목 → 거래소 심볼
    pub instruments: BTreeMap<String, String>,
    /// 종목 → 최소 주문 수량
    pub min_order_sizes: BTreeMap<String, Decimal>,
    /// 거래소 주문 유형 문자열 → 부호 있는 코드
    pub order_types: BTreeMap<String, i32>,
    /// 주기 라벨 → 거래소 주기 코드
    pub periods: BTreeMap<String, String>,
    /// 초기 메인 종목
    pub main_instrument: String,
    /// 초당 서명 요청 한도
    pub rate_limit: f64,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 티커 조회 기본 호가 깊이
    pub default_depth: usize,
    /// 시뮬레이션 가격 조회 호가 깊이
    pub simulation_depth: usize,
    /// 캔들 조회 기본 개수
    pub default_record_size: usize,
    /// 체결 내역 페이지 크기
    pub trade_history_page_length: usize,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            trader_id: String::new(),
            exchange_type: "okcoin.cn".to_string(),
            name: "okcoin.cn".to_string(),
            host: "https://www.okcoin.cn/api/v1/".to_string(),
            access_key: String::new(),
            secret_key: String::new(),
            quote_currency: "cny".to_string(),
            instruments: BTreeMap::from([
                ("BTC".to_string(), "btc".to_string()),
                ("LTC".to_string(), "ltc".to_string()),
            ]),
            min_order_sizes: BTreeMap::from([
                ("BTC".to_string(), dec!(0.01)),
                ("LTC".to_string(), dec!(0.1)),
            ]),
            order_types: BTreeMap::from([
                ("buy".to_string(), ORDER_TYPE_BUY),
                ("sell".to_string(), ORDER_TYPE_SELL),
                ("buy_market".to_string(), ORDER_TYPE_BUY_MARKET),
                ("sell_market".to_string(), ORDER_TYPE_SELL_MARKET),
            ]),
            periods: crate::types::Period::ALL
                .iter()
                .map(|p| (p.label().to_string(), p.default_exchange_code().to_string()))
                .collect(),
            main_instrument: DEFAULT_MAIN_INSTRUMENT.to_string(),
            rate_limit: 10.0,
            timeout_secs: 30,
            default_depth: 20,
            simulation_depth: 10,
            default_record_size: 200,
            trade_history_page_length: 200,
        }
    }
}

impl fmt::Debug for ExchangeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked_key = if self.access_key.chars().count() > 8 {
            let head: String = self.access_key.chars().take(4).collect();
            let mut tail: Vec<char> = self.access_key.chars().rev().take(4).collect();
            tail.reverse();
            format!("{}...{}", head, tail.into_iter().collect::<String>())
        } else {
            "***REDACTED***".to_string()
        };

        f.debug_struct("ExchangeConfig")
            .field("trader_id", &self.trader_id)
            .field("exchange_type", &self.exchange_type)
            .field("name", &self.name)
            .field("host", &self.host)
            .field("access_key", &masked_key)
            .field("secret_key", &"***REDACTED***")
            .field("quote_currency", &self.quote_currency)
            .field("instruments", &self.instruments)
            .field("main_instrument", &self.main_instrument)
            .field("rate_limit", &self.rate_limit)
            .finish_non_exhaustive()
    }
}

impl ExchangeConfig {
    /// 자격증명으로 기본 설정을 생성합니다.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            ..Default::default()
        }
    }

    /// REST 호스트를 지정합니다.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        let mut host = host.into();
        if !host.ends_with('/') {
            host.push('/');
        }
        self.host = host;
        self
    }

    /// 트레이더 ID를 지정합니다.
    pub fn with_trader_id(mut self, trader_id: impl Into<String>) -> Self {
        self.trader_id = trader_id.into();
        self
    }

    /// 초기 메인 종목을 지정합니다.
    pub fn with_main_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.main_instrument = instrument.into();
        self
    }

    /// 키 대소문자를 표준화합니다.
    ///
    /// 종목과 주기 라벨은 대문자, 주문 유형과 심볼은 소문자로 맞춥니다.
    pub fn normalized(mut self) -> Self {
        self.instruments = self
            .instruments
            .into_iter()
            .map(|(k, v)| (k.to_uppercase(), v.to_lowercase()))
            .collect();
        self.min_order_sizes = self
            .min_order_sizes
            .into_iter()
            .map(|(k, v)| (k.to_uppercase(), v))
            .collect();
        self.order_types = self
            .order_types
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        self.periods = self
            .periods
            .into_iter()
            .map(|(k, v)| (k.to_uppercase(), v))
            .collect();
        self.main_instrument = self.main_instrument.to_uppercase();
        self.quote_currency = self.quote_currency.to_lowercase();
        if !self.host.is_empty() && !self.host.ends_with('/') {
            self.host.push('/');
        }
        self
    }

    /// 설정 값을 검증합니다.
    pub fn validate(&self) -> TraderResult<()> {
        if self.instruments.is_empty() {
            return Err(TraderError::Config("at least one instrument is required".into()));
        }
        if let Some(missing) = self
            .instruments
            .keys()
            .find(|inst| !self.min_order_sizes.contains_key(*inst))
        {
            return Err(TraderError::Config(format!(
                "missing min order size for {}",
                missing
            )));
        }
        if !is_valid_rate_limit(self.rate_limit) {
            return Err(TraderError::Config(format!(
                "rate_limit must be at least {}",
                MIN_RATE_LIMIT
            )));
        }
        if self.host.is_empty() {
            return Err(TraderError::Config("host is required".into()));
        }
        Ok(())
    }

    /// 설정된 종목인지 확인합니다.
    pub fn has_instrument(&self, instrument: &str) -> bool {
        self.instruments.contains_key(instrument)
    }

    /// 설정된 종목 이름 (정렬됨).
    pub fn instrument_names(&self) -> impl Iterator<Item = &str> {
        self.instruments.keys().map(String::as_str)
    }

    /// 거래소 심볼 (예: `btc`).
    pub fn exchange_symbol(&self, instrument: &str) -> Option<&str> {
        self.instruments.get(instrument).map(String::as_str)
    }

    /// 마켓 심볼 파라미터 (예: `btc_cny`).
    pub fn market_symbol(&self, instrument: &str) -> Option<String> {
        self.exchange_symbol(instrument)
            .map(|sym| format!("{}_{}", sym, self.quote_currency))
    }

    /// 최소 주문 수량.
    pub fn min_order_size(&self, instrument: &str) -> Option<Decimal> {
        self.min_order_sizes.get(instrument).copied()
    }

    /// 주기 라벨의 거래소 코드.
    pub fn period_code(&self, label: &str) -> Option<&str> {
        self.periods.get(label).map(String::as_str)
    }

    /// 거래소 주문 유형 문자열의 코드 (알 수 없으면 0).
    pub fn order_type_code(&self, exchange_type: &str) -> i32 {
        self.order_types.get(exchange_type).copied().unwrap_or(0)
    }

    /// 설정된 메인 종목. 알 수 없는 값이면 기본 종목, 그것도 없으면 첫 종목을 씁니다.
    pub fn resolved_main_instrument(&self) -> String {
        if self.has_instrument(&self.main_instrument) {
            self.main_instrument.clone()
        } else if self.has_instrument(DEFAULT_MAIN_INSTRUMENT) {
            DEFAULT_MAIN_INSTRUMENT.to_string()
        } else {
            self.instrument_names()
                .next()
                .unwrap_or(DEFAULT_MAIN_INSTRUMENT)
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_okcoin() {
        let config = ExchangeConfig::default();
        assert_eq!(config.market_symbol("BTC").as_deref(), Some("btc_cny"));
        assert_eq!(config.min_order_size("LTC"), Some(dec!(0.1)));
        assert_eq!(config.period_code("M15"), Some("15min"));
        assert_eq!(config.period_code("W"), Some("1week"));
        assert_eq!(config.order_type_code("sell_market"), -2);
        assert_eq!(config.order_type_code("unknown"), 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_masks_credentials() {
        let config = ExchangeConfig::new("abcdefghijklmnop", "super-secret-value");
        let debug = format!("{:?}", config);
        assert!(debug.contains("abcd...mnop"));
        assert!(!debug.contains("super-secret-value"));
    }

    #[test]
    fn test_debug_masks_multibyte_key() {
        let config = ExchangeConfig::new("키키키키가나다라마바", "secret");
        let debug = format!("{:?}", config);
        assert!(debug.contains("키키키키...다라마바"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ExchangeConfig::default();
        config.rate_limit = 0.0;
        assert!(config.validate().is_err());

        let mut config = ExchangeConfig::default();
        config.rate_limit = 1e-20;
        assert!(config.validate().is_err());

        let mut config = ExchangeConfig::default();
        config.min_order_sizes.remove("LTC");
        assert!(config.validate().is_err());

        let mut config = ExchangeConfig::default();
        config.instruments.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolved_main_instrument_falls_back() {
        let config = ExchangeConfig::default().with_main_instrument("DOGE");
        assert_eq!(config.resolved_main_instrument(), "BTC");

        let config = ExchangeConfig::default().with_main_instrument("LTC");
        assert_eq!(config.resolved_main_instrument(), "LTC");
    }

    #[test]
    fn test_normalized_keys() {
        let mut config = ExchangeConfig::default().with_main_instrument("ltc");
        config.instruments = BTreeMap::from([("eth".to_string(), "ETH".to_string())]);
        config.periods = BTreeMap::from([("m5".to_string(), "5min".to_string())]);

        let config = config.normalized();
        assert_eq!(config.exchange_symbol("ETH"), Some("eth"));
        assert_eq!(config.period_code("M5"), Some("5min"));
        assert_eq!(config.main_instrument, "LTC");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AdapterConfig::load("does/not/exist.toml").expect("defaults are valid");
        assert_eq!(config.exchange.exchange_type, "okcoin.cn");
        assert_eq!(config.logging.level, "info");
    }
}
