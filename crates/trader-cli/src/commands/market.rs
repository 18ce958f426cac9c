//! 공개 시세 명령 (티커, 캔들).

use anyhow::Result;
use trader_exchange::ExchangeAdapter;

/// 호가창 상위 레벨을 출력합니다.
pub async fn show_ticker(
    adapter: &ExchangeAdapter,
    instrument: &str,
    depth: Option<usize>,
) -> Result<()> {
    let ticker = adapter.get_ticker(instrument, depth).await?;

    println!(
        "{} bid {} / ask {} (mid {}, spread {})",
        instrument,
        ticker.bid,
        ticker.ask,
        ticker.mid,
        ticker.spread()
    );
    println!("{:>14} {:>14} | {:>14} {:>14}", "bid", "amount", "ask", "amount");
    for (bid, ask) in ticker.bids.iter().zip(ticker.asks.iter()).take(10) {
        println!(
            "{:>14} {:>14} | {:>14} {:>14}",
            bid.price, bid.amount, ask.price, ask.amount
        );
    }
    Ok(())
}

/// 캔들 히스토리를 출력합니다.
///
/// 조회 실패는 어댑터에서 기록되며 빈 목록이 출력됩니다.
pub async fn show_records(
    adapter: &ExchangeAdapter,
    instrument: &str,
    period: &str,
    size: Option<usize>,
) -> Result<()> {
    let records = adapter.get_records(instrument, period, size).await;
    if records.is_empty() {
        println!("no records for {} {}", instrument, period);
        return Ok(());
    }

    println!(
        "{:>12} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "time", "open", "high", "low", "close", "volume"
    );
    for r in &records {
        println!(
            "{:>12} {:>12} {:>12} {:>12} {:>12} {:>14}",
            r.time, r.open, r.high, r.low, r.close, r.volume
        );
    }
    println!("{} records", records.len());
    Ok(())
}
