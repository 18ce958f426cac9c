//! OKCoin v1 REST 전송 계층.
//!
//! 공개 엔드포인트는 쿼리 문자열 GET, 인증 엔드포인트는 서명된 form POST를 사용합니다.
//! 서명 요청은 전송 전에 항상 속도 제한을 거칩니다.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error};
use trader_core::ExchangeConfig;

use super::rate_limiter::RateLimiter;
use super::signer::Signer;
use super::types::Envelope;
use crate::{ExchangeError, ExchangeResult};

/// OKCoin REST 클라이언트.
#[derive(Debug)]
pub struct OkcoinRest {
    client: reqwest::Client,
    host: String,
    signer: Signer,
    limiter: Mutex<RateLimiter>,
}

impl OkcoinRest {
    /// 설정으로 클라이언트를 생성합니다.
    pub fn new(config: &ExchangeConfig) -> ExchangeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let mut host = config.host.clone();
        if !host.ends_with('/') {
            host.push('/');
        }

        Ok(Self {
            client,
            host,
            signer: Signer::new(config.access_key.clone(), config.secret_key.clone()),
            limiter: Mutex::new(RateLimiter::new(config.rate_limit)),
        })
    }

    /// 기준 URL.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// 속도 제한 변경. 적용된 값을 반환합니다.
    pub async fn set_rate_limit(&self, limit: f64) -> f64 {
        self.limiter.lock().await.set_limit(limit)
    }

    /// 현재 속도 제한.
    pub async fn rate_limit(&self) -> f64 {
        self.limiter.lock().await.limit()
    }

    /// 호출자가 명시적으로 속도 제한 대기를 수행합니다.
    pub async fn auto_sleep(&self) {
        self.limiter.lock().await.throttle().await;
    }

    /// 공개 API GET 요청.
    pub async fn public_get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> ExchangeResult<T> {
        let url = format!("{}{}", self.host, endpoint);
        debug!("GET {} {:?}", url, params);

        let response = self.client.get(&url).query(params).send().await?;
        let value = Self::read_json(response).await?;

        if let Some(code) = value.get("error_code").and_then(Value::as_i64) {
            return Err(ExchangeError::Rejected { code });
        }

        serde_json::from_value(value).map_err(|e| {
            error!("Failed to parse {} response: {}", endpoint, e);
            ExchangeError::Parse(e.to_string())
        })
    }

    /// 서명된 POST 요청.
    ///
    /// `params`는 `key=value` 형식이며 `api_key`/`secret_key`/`sign`은 자동으로 추가됩니다.
    /// 응답의 `result`가 `true`가 아니면 `Rejected`를 반환합니다.
    pub async fn signed_post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Vec<String>,
    ) -> ExchangeResult<T> {
        {
            let mut limiter = self.limiter.lock().await;
            limiter.throttle().await;
            limiter.record_call();
        }

        let signed = self.signer.sign(params);
        let url = format!("{}{}", self.host, endpoint);
        debug!("POST (signed) {}", endpoint);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(signed.to_body())
            .send()
            .await?;
        let value = Self::read_json(response).await?;

        let envelope: Envelope = serde_json::from_value(value.clone())?;
        if !envelope.result {
            let code = envelope.error_code.unwrap_or_default();
            debug!("{} rejected with error code {}", endpoint, code);
            return Err(ExchangeError::Rejected { code });
        }

        serde_json::from_value(value).map_err(|e| {
            error!("Failed to parse {} response: {}", endpoint, e);
            ExchangeError::Parse(e.to_string())
        })
    }

    async fn read_json(response: reqwest::Response) -> ExchangeResult<Value> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ExchangeError::Network(format!("HTTP {}: {}", status, body)));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse response: {} - Body: {}", e, body);
            ExchangeError::Parse(e.to_string())
        })
    }
}
