//! OKCoin 어댑터 통합 테스트.
//!
//! mockito 서버를 거래소 대신 사용해 요청 파라미터와 응답 매핑을 검증합니다.

use mockito::{Matcher, Server, ServerGuard};
use rust_decimal_macros::dec;
use std::collections::HashMap;
use trader_core::{ExchangeConfig, Order, ORDER_TYPE_BUY, ORDER_TYPE_SELL_MARKET};
use trader_exchange::{ExchangeAdapter, ExchangeError};

const DEPTH_BODY: &str = r#"{
    "asks": [[101, 1], [100.5, "2"], [100, 3]],
    "bids": [[99, 3], [98, 4]]
}"#;

async fn adapter_for(server: &ServerGuard) -> ExchangeAdapter {
    let config = ExchangeConfig::new("test-access-key", "test-secret-key")
        .with_trader_id("trader-1")
        .with_host(server.url());
    let adapter = ExchangeAdapter::new(config).unwrap();
    adapter.set_rate_limit(1000.0).await;
    adapter
}

fn body_param(param: &str) -> Matcher {
    Matcher::Regex(format!("(^|&){}(&|$)", regex_escape(param)))
}

fn regex_escape(s: &str) -> String {
    s.chars()
        .flat_map(|c| match c {
            '.' | '-' | '+' | '*' | '?' | '(' | ')' | '[' | ']' | '|' | '^' | '$' => {
                vec!['\\', c]
            }
            _ => vec![c],
        })
        .collect()
}

fn kline_row(secs: i64, close: &str) -> String {
    format!("[{}, 1, 2, 0.5, {}, 10]", secs * 1000, close)
}

// ==================== 공개 API ====================

#[tokio::test]
async fn test_ticker_from_depth() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/depth.do")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "btc_cny".into()),
            Matcher::UrlEncoded("size".into(), "20".into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(DEPTH_BODY)
        .create_async()
        .await;

    let adapter = adapter_for(&server).await;
    let ticker = adapter.get_ticker("BTC", None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(ticker.bid, dec!(99));
    assert_eq!(ticker.ask, dec!(100));
    assert_eq!(ticker.mid, dec!(99.5));
    assert_eq!(ticker.asks[2].price, dec!(101));
    assert_eq!(ticker.bids[1].amount, dec!(4));
}

#[tokio::test]
async fn test_ticker_with_empty_side_fails() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/depth.do")
        .match_query(Matcher::Any)
        .with_body(r#"{"asks": [[100, 1]], "bids": []}"#)
        .create_async()
        .await;

    let adapter = adapter_for(&server).await;
    let err = adapter.get_ticker("LTC", Some(5)).await.unwrap_err();
    assert!(matches!(err, ExchangeError::InsufficientDepth));
}

#[tokio::test]
async fn test_public_error_code_is_rejection() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/depth.do")
        .match_query(Matcher::Any)
        .with_body(r#"{"error_code": 1007}"#)
        .create_async()
        .await;

    let adapter = adapter_for(&server).await;
    let err = adapter.get_ticker("BTC", None).await.unwrap_err();
    assert!(matches!(err, ExchangeError::Rejected { code: 1007 }));
}

#[tokio::test]
async fn test_unknown_instrument_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/depth.do")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let adapter = adapter_for(&server).await;
    let err = adapter.get_ticker("DOGE", None).await.unwrap_err();

    assert!(matches!(err, ExchangeError::UnknownInstrument(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_records_merge_across_calls() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/kline.do")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "btc_cny".into()),
            Matcher::UrlEncoded("type".into(), "1min".into()),
            Matcher::UrlEncoded("size".into(), "200".into()),
        ]))
        .with_body(format!(
            "[{}, {}]",
            kline_row(60, "100"),
            kline_row(120, "101")
        ))
        .create_async()
        .await;

    let adapter = adapter_for(&server).await;
    let records = adapter.get_records("BTC", "M", None).await;
    first.assert_async().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].time, 60);

    first.remove_async().await;
    server
        .mock("GET", "/kline.do")
        .match_query(Matcher::Any)
        .with_body(format!(
            "[{}, {}, {}]",
            kline_row(60, "100"),
            kline_row(120, "102.5"),
            kline_row(180, "103")
        ))
        .create_async()
        .await;

    let records = adapter.get_records("BTC", "M", None).await;
    let times: Vec<i64> = records.iter().map(|r| r.time).collect();
    assert_eq!(times, vec![60, 120, 180]);
    assert_eq!(records[1].close, dec!(102.5));
}

#[tokio::test]
async fn test_records_failure_returns_previous_series() {
    let mut server = Server::new_async().await;
    let ok = server
        .mock("GET", "/kline.do")
        .match_query(Matcher::Any)
        .with_body(format!(
            "[{}, {}, {}]",
            kline_row(300, "1"),
            kline_row(600, "2"),
            kline_row(900, "3")
        ))
        .create_async()
        .await;

    let adapter = adapter_for(&server).await;
    let before = adapter.get_records("LTC", "M5", Some(2)).await;
    assert_eq!(before.len(), 2);
    assert_eq!(before[0].time, 600);

    ok.remove_async().await;
    server
        .mock("GET", "/kline.do")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let after = adapter.get_records("LTC", "M5", Some(2)).await;
    assert_eq!(after, before);
}

// ==================== 인증 API ====================

#[tokio::test]
async fn test_account_mapping() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/userinfo.do")
        .match_body(Matcher::AllOf(vec![
            body_param("api_key=test-access-key"),
            body_param("secret_key=test-secret-key"),
            Matcher::Regex("sign=[0-9A-F]{32}$".into()),
        ]))
        .with_body(
            r#"{"info":{"funds":{
                "asset":{"net":"1000.5","total":"1200.5"},
                "free":{"btc":"1.5","cny":"800","ltc":"10"},
                "freezed":{"btc":"0.5","cny":"100","ltc":"0"}
            }},"result":true}"#,
        )
        .create_async()
        .await;

    let adapter = adapter_for(&server).await;
    let account = adapter.get_account().await.unwrap();

    mock.assert_async().await;
    assert_eq!(account.total, dec!(1200.5));
    assert_eq!(account.net, dec!(1000.5));
    assert_eq!(account.balance, dec!(800));
    assert_eq!(account.frozen_balance, dec!(100));
    assert_eq!(account.holding("LTC").available, dec!(10));
    assert_eq!(account.stock, dec!(1.5));
    assert_eq!(account.frozen_stock, dec!(0.5));

    adapter.set_main_instrument("LTC");
    let account = adapter.get_account().await.unwrap();
    assert_eq!(account.stock, dec!(10));
}

#[tokio::test]
async fn test_limit_buy_parameters() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/trade.do")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            body_param("symbol=btc_cny"),
            body_param("type=buy"),
            body_param("price=3200"),
            body_param("amount=1.5"),
        ]))
        .with_body(r#"{"result":true,"order_id":123456}"#)
        .create_async()
        .await;

    let adapter = adapter_for(&server).await;
    let id = adapter
        .buy("BTC", dec!(3200.00), dec!(1.5), "entry")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(id, "123456");
}

#[tokio::test]
async fn test_market_buy_sends_quote_amount_as_price() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/trade.do")
        .match_body(Matcher::AllOf(vec![
            body_param("symbol=ltc_cny"),
            body_param("type=buy_market"),
            body_param("price=500"),
        ]))
        .with_body(r#"{"result":true,"order_id":"77"}"#)
        .create_async()
        .await;

    let adapter = adapter_for(&server).await;
    let id = adapter.buy("LTC", dec!(0), dec!(500), "").await.unwrap();

    mock.assert_async().await;
    assert_eq!(id, "77");
}

#[tokio::test]
async fn test_sell_parameters() {
    let mut server = Server::new_async().await;
    let market = server
        .mock("POST", "/trade.do")
        .match_body(Matcher::AllOf(vec![
            body_param("type=sell_market"),
            body_param("amount=2"),
        ]))
        .with_body(r#"{"result":true,"order_id":1}"#)
        .create_async()
        .await;
    let limit = server
        .mock("POST", "/trade.do")
        .match_body(Matcher::AllOf(vec![
            body_param("type=sell"),
            body_param("price=3300"),
            body_param("amount=0.5"),
        ]))
        .with_body(r#"{"result":true,"order_id":2}"#)
        .create_async()
        .await;

    let adapter = adapter_for(&server).await;
    assert_eq!(adapter.sell("BTC", dec!(-1), dec!(2), "").await.unwrap(), "1");
    assert_eq!(
        adapter.sell("BTC", dec!(3300), dec!(0.5), "").await.unwrap(),
        "2"
    );

    market.assert_async().await;
    limit.assert_async().await;
}

#[tokio::test]
async fn test_rejected_order_keeps_error_code() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/trade.do")
        .with_body(r#"{"result":false,"error_code":10010}"#)
        .create_async()
        .await;

    let adapter = adapter_for(&server).await;
    let err = adapter
        .buy("BTC", dec!(3200), dec!(100), "")
        .await
        .unwrap_err();

    assert!(matches!(err, ExchangeError::Rejected { code: 10010 }));
}

#[tokio::test]
async fn test_get_order_maps_fields() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/order_info.do")
        .match_body(body_param("order_id=42"))
        .with_body(
            r#"{"result":true,"orders":[{"order_id":42,"price":3100,"amount":"2",
                "deal_amount":0.5,"type":"buy","status":1}]}"#,
        )
        .create_async()
        .await;

    let adapter = adapter_for(&server).await;
    let order = adapter.get_order("BTC", "42").await.unwrap();

    assert_eq!(order.id, "42");
    assert_eq!(order.price, dec!(3100));
    assert_eq!(order.remaining(), dec!(1.5));
    assert_eq!(order.order_type, ORDER_TYPE_BUY);
    assert_eq!(order.instrument, "BTC");
}

#[tokio::test]
async fn test_get_order_empty_result_is_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/order_info.do")
        .with_body(r#"{"result":true,"orders":[]}"#)
        .create_async()
        .await;

    let adapter = adapter_for(&server).await;
    let err = adapter.get_order("BTC", "9").await.unwrap_err();
    assert!(matches!(err, ExchangeError::OrderNotFound(id) if id == "9"));
}

#[tokio::test]
async fn test_open_orders_and_type_codes() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/order_info.do")
        .match_body(body_param("order_id=-1"))
        .with_body(
            r#"{"result":true,"orders":[
                {"order_id":1,"price":10,"amount":1,"deal_amount":0,"type":"sell_market"},
                {"order_id":2,"price":11,"amount":1,"deal_amount":0,"type":"iceberg"}
            ]}"#,
        )
        .create_async()
        .await;

    let adapter = adapter_for(&server).await;
    let orders = adapter.get_orders("LTC").await.unwrap();

    mock.assert_async().await;
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].order_type, ORDER_TYPE_SELL_MARKET);
    assert_eq!(orders[1].order_type, 0);
    assert!(orders.iter().all(|o| o.instrument == "LTC"));
}

#[tokio::test]
async fn test_trade_history_paging_parameters() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/order_history.do")
        .match_body(Matcher::AllOf(vec![
            body_param("status=1"),
            body_param("current_page=1"),
            body_param("page_length=200"),
        ]))
        .with_body(r#"{"result":true,"orders":[],"total":0}"#)
        .create_async()
        .await;

    let adapter = adapter_for(&server).await;
    assert!(adapter.get_trades("BTC").await.unwrap().is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_cancel_order() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/cancel_order.do")
        .match_body(Matcher::AllOf(vec![
            body_param("symbol=btc_cny"),
            body_param("order_id=555"),
        ]))
        .with_body(r#"{"result":true,"order_id":"555"}"#)
        .create_async()
        .await;

    let adapter = adapter_for(&server).await;
    let order = Order {
        id: "555".into(),
        price: dec!(3000),
        amount: dec!(1),
        deal_amount: dec!(0.25),
        order_type: ORDER_TYPE_BUY,
        instrument: "BTC".into(),
    };
    adapter.cancel_order(&order).await.unwrap();
    mock.assert_async().await;
}

// ==================== 모의거래 ====================

async fn simulated_adapter(server: &mut ServerGuard) -> ExchangeAdapter {
    server
        .mock("GET", "/depth.do")
        .match_query(Matcher::Any)
        .with_body(r#"{"asks": [[100, 1]], "bids": [[99, 1]]}"#)
        .expect_at_least(1)
        .create_async()
        .await;

    let adapter = adapter_for(server).await;
    let holdings = HashMap::from([("BTC".to_string(), dec!(5))]);
    adapter.simulate(dec!(1000), &holdings).await.unwrap();
    adapter
}

#[tokio::test]
async fn test_simulated_buy_scenario() {
    let mut server = Server::new_async().await;
    let trade = server
        .mock("POST", "/trade.do")
        .expect(0)
        .create_async()
        .await;
    let adapter = simulated_adapter(&mut server).await;

    adapter.buy("BTC", dec!(100), dec!(5), "").await.unwrap();
    let err = adapter.buy("BTC", dec!(99), dec!(5), "").await.unwrap_err();
    assert!(matches!(err, ExchangeError::PriceTooLow { .. }));

    let account = adapter.get_account().await.unwrap();
    assert_eq!(account.balance, dec!(500));
    assert_eq!(account.stock, dec!(10));
    // 500 + 10 * 99.5 (LTC 보유 0)
    assert_eq!(account.total, dec!(1495));
    assert_eq!(account.net, account.total);

    trade.assert_async().await;
}

#[tokio::test]
async fn test_simulated_sell_scenario() {
    let mut server = Server::new_async().await;
    let adapter = simulated_adapter(&mut server).await;

    let err = adapter.sell("BTC", dec!(100), dec!(3), "").await.unwrap_err();
    assert!(matches!(err, ExchangeError::PriceTooHigh { .. }));

    let err = adapter.sell("BTC", dec!(99), dec!(10), "").await.unwrap_err();
    assert!(matches!(err, ExchangeError::InsufficientInventory { .. }));

    adapter.sell("BTC", dec!(99), dec!(2), "").await.unwrap();
    let account = adapter.get_account().await.unwrap();
    assert_eq!(account.balance, dec!(1198));
    assert_eq!(account.stock, dec!(3));
}

#[tokio::test]
async fn test_simulated_queries_do_not_hit_exchange() {
    let mut server = Server::new_async().await;
    let signed = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let adapter = simulated_adapter(&mut server).await;

    let order = adapter.get_order("BTC", "1").await.unwrap();
    assert_eq!(order, Order::placeholder("1", "BTC"));
    assert!(adapter.get_orders("BTC").await.unwrap().is_empty());
    assert!(adapter.get_trades("LTC").await.unwrap().is_empty());
    adapter.cancel_order(&order).await.unwrap();

    signed.assert_async().await;
}
