//! tracing을 사용한 로깅 인프라.
//!
//! 두 가지를 제공합니다:
//! - `init_logging`: pretty / json / compact 형식의 구독자 초기화
//! - `TradeLogger`: 매수·매도·취소·에러 이벤트를 가격/수량과 함께 남기는 이벤트 로거

use rust_decimal::Decimal;
use std::fmt;
use tracing_subscriber::{fmt as tfmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// 색상이 포함된 사람이 읽기 쉬운 형식 (개발용)
    #[default]
    Pretty,
    /// 로그 집계용 JSON 형식 (운영용)
    Json,
    /// 간결한 한 줄 형식
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 로그 레벨 필터 (예: "info", "trader_exchange=debug")
    pub level: String,
    /// 출력 형식
    pub format: LogFormat,
    /// 대상(모듈 경로) 포함 여부
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            with_target: true,
        }
    }
}

impl LogConfig {
    /// 새 로그 설정을 생성합니다.
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// 로그 형식을 설정합니다.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

/// 주어진 설정으로 로깅 시스템을 초기화합니다.
///
/// `RUST_LOG`가 설정되어 있으면 `config.level`보다 우선합니다.
///
/// ```no_run
/// use trader_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("debug").with_format(LogFormat::Json)).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Pretty => registry
            .with(tfmt::layer().pretty().with_target(config.with_target))
            .try_init()?,
        LogFormat::Json => registry
            .with(tfmt::layer().json().with_target(config.with_target))
            .try_init()?,
        LogFormat::Compact => registry
            .with(tfmt::layer().compact().with_target(config.with_target))
            .try_init()?,
    }

    tracing::info!(format = ?config.format, level = %config.level, "Logging initialized");
    Ok(())
}

/// 거래 이벤트 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeEventKind {
    /// 일반 정보
    Info,
    /// 에러
    Error,
    /// 매수 체결/제출
    Buy,
    /// 매도 체결/제출
    Sell,
    /// 주문 취소
    Cancel,
}

impl TradeEventKind {
    /// 이벤트 로그에 기록되는 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeEventKind::Info => "INFO",
            TradeEventKind::Error => "ERROR",
            TradeEventKind::Buy => "BUY",
            TradeEventKind::Sell => "SELL",
            TradeEventKind::Cancel => "CANCEL",
        }
    }
}

impl fmt::Display for TradeEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 트레이더/거래소 단위 이벤트 로거.
///
/// 모든 이벤트는 `trade_event` 대상의 구조화된 tracing 이벤트로 기록됩니다.
#[derive(Debug, Clone)]
pub struct TradeLogger {
    trader_id: String,
    exchange_type: String,
}

impl TradeLogger {
    /// 새 이벤트 로거를 생성합니다.
    pub fn new(trader_id: impl Into<String>, exchange_type: impl Into<String>) -> Self {
        Self {
            trader_id: trader_id.into(),
            exchange_type: exchange_type.into(),
        }
    }

    /// 이벤트를 기록합니다.
    pub fn log(&self, kind: TradeEventKind, price: Decimal, amount: Decimal, message: &str) {
        match kind {
            TradeEventKind::Error => tracing::error!(
                target: "trade_event",
                trader_id = %self.trader_id,
                exchange = %self.exchange_type,
                kind = %kind,
                %price,
                %amount,
                "{}",
                message
            ),
            _ => tracing::info!(
                target: "trade_event",
                trader_id = %self.trader_id,
                exchange = %self.exchange_type,
                kind = %kind,
                %price,
                %amount,
                "{}",
                message
            ),
        }
    }

    /// 가격/수량 없는 정보 이벤트.
    pub fn info(&self, message: &str) {
        self.log(TradeEventKind::Info, Decimal::ZERO, Decimal::ZERO, message);
    }

    /// 가격/수량 없는 에러 이벤트.
    pub fn error(&self, message: &str) {
        self.log(TradeEventKind::Error, Decimal::ZERO, Decimal::ZERO, message);
    }
}
