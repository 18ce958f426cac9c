//! OKCoin 어댑터 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # BTC 호가창 조회
//! trader ticker BTC --depth 20
//!
//! # LTC 15분봉 100개
//! trader records LTC M15 --size 100
//!
//! # 계좌 조회 (TRADER__EXCHANGE__ACCESS_KEY / SECRET_KEY 필요)
//! trader account
//!
//! # 실시간 호가로 모의 매수
//! trader paper --balance 10000 --hold BTC=0.5 buy BTC 3200 1
//! ```

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::info;
use trader_core::{init_logging, AdapterConfig, Side};
use trader_exchange::ExchangeAdapter;

mod commands;

use commands::paper::{parse_holding, PaperOrder};

#[derive(Parser)]
#[command(name = "trader")]
#[command(about = "OKCoin exchange adapter CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 호가창과 최우선 호가 조회
    Ticker {
        /// 종목 (예: BTC, LTC)
        instrument: String,

        /// 호가 깊이
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// 캔들 히스토리 조회
    Records {
        /// 종목
        instrument: String,

        /// 주기 (M, M5, M15, M30, H, D, W)
        period: String,

        /// 최대 캔들 수
        #[arg(short, long)]
        size: Option<usize>,
    },

    /// 계좌 조회
    Account,

    /// 모의 계좌로 주문 한 건 실행
    Paper {
        /// 초기 호가 통화 잔고
        #[arg(short, long)]
        balance: Decimal,

        /// 초기 보유 수량 (INST=QTY, 반복 가능)
        #[arg(long = "hold", value_parser = parse_holding)]
        holdings: Vec<(String, Decimal)>,

        /// buy 또는 sell
        side: Side,

        /// 종목
        instrument: String,

        /// 주문 가격
        price: Decimal,

        /// 주문 수량
        amount: Decimal,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AdapterConfig::load(&cli.config)?;
    init_logging(config.logging.to_log_config())
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    let adapter = ExchangeAdapter::new(config.exchange)?;
    info!(exchange = adapter.get_name(), "adapter ready");

    match cli.command {
        Commands::Ticker { instrument, depth } => {
            commands::market::show_ticker(&adapter, &instrument.to_uppercase(), depth).await?;
        }
        Commands::Records {
            instrument,
            period,
            size,
        } => {
            commands::market::show_records(
                &adapter,
                &instrument.to_uppercase(),
                &period.to_uppercase(),
                size,
            )
            .await?;
        }
        Commands::Account => {
            commands::account::show_account(&adapter).await?;
        }
        Commands::Paper {
            balance,
            holdings,
            side,
            instrument,
            price,
            amount,
        } => {
            let order = PaperOrder {
                balance,
                holdings: holdings.into_iter().collect::<HashMap<_, _>>(),
                side,
                instrument: instrument.to_uppercase(),
                price,
                amount,
            };
            commands::paper::run_paper_order(&adapter, order).await?;
        }
    }

    Ok(())
}
