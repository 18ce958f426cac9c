//! 서명 요청용 자체 속도 제한.
//!
//! 마지막 체크포인트 이후 발생한 호출 수만큼의 최소 간격이 지나지 않았다면
//! 남은 시간만큼 대기합니다. 정밀한 스케줄러가 아니라 "대기로 맞추는" 방식이라
//! 한 창(window)보다 짧은 버스트는 다음 `throttle` 호출에서야 반영됩니다.

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use trader_core::is_valid_rate_limit;

/// 초당 호출 수 기반 속도 제한기.
#[derive(Debug)]
pub struct RateLimiter {
    /// 초당 최대 호출 수
    limit: f64,
    /// 마지막 체크포인트 시각
    checkpoint: Instant,
    /// 체크포인트 이후 호출 수
    calls: u32,
}

impl RateLimiter {
    /// 새 속도 제한기 생성. `limit`은 양수여야 합니다.
    pub fn new(limit: f64) -> Self {
        Self {
            limit,
            checkpoint: Instant::now(),
            calls: 0,
        }
    }

    /// 현재 한도.
    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// 한도를 변경하고 적용된 값을 반환합니다.
    ///
    /// `MIN_RATE_LIMIT` 미만이거나 유한수가 아니면 무시하고 이전 값을 유지합니다.
    pub fn set_limit(&mut self, limit: f64) -> f64 {
        if is_valid_rate_limit(limit) {
            self.limit = limit;
        }
        self.limit
    }

    /// 서명 요청 한 건을 기록합니다.
    pub fn record_call(&mut self) {
        self.calls += 1;
    }

    /// 체크포인트 이후 기록된 호출 수.
    pub fn pending_calls(&self) -> u32 {
        self.calls
    }

    /// `now` 기준으로 필요한 대기 시간.
    ///
    /// `calls * (1s / limit) - elapsed` 가 양수일 때만 `Some`.
    pub fn required_wait(&self, now: Instant) -> Option<Duration> {
        let required = Duration::try_from_secs_f64(self.calls as f64 / self.limit)
            .unwrap_or(Duration::MAX);
        let elapsed = now.saturating_duration_since(self.checkpoint);
        required.checked_sub(elapsed).filter(|d| !d.is_zero())
    }

    /// 필요하면 대기한 뒤 카운터와 체크포인트를 리셋합니다.
    pub async fn throttle(&mut self) {
        if let Some(wait) = self.required_wait(Instant::now()) {
            debug!(wait_ms = wait.as_millis() as u64, calls = self.calls, "rate limit sleep");
            tokio::time::sleep(wait).await;
        }
        self.calls = 0;
        self.checkpoint = Instant::now();
    }
}
