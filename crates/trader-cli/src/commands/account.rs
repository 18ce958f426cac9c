//! 계좌 조회 명령.

use anyhow::Result;
use trader_core::Account;
use trader_exchange::ExchangeAdapter;

pub async fn show_account(adapter: &ExchangeAdapter) -> Result<()> {
    let account = adapter.get_account().await?;
    print_account(&account, &adapter.get_main_instrument());
    Ok(())
}

/// 계좌 요약 출력.
pub fn print_account(account: &Account, main_instrument: &str) {
    println!("total {}  net {}", account.total, account.net);
    println!(
        "balance {} (frozen {})",
        account.balance, account.frozen_balance
    );
    for (instrument, holding) in &account.holdings {
        let marker = if instrument == main_instrument { "*" } else { " " };
        println!(
            "{} {:<6} {} (frozen {})",
            marker, instrument, holding.available, holding.frozen
        );
    }
}
