//! 캔들 히스토리 캐시.
//!
//! 새로 조회한 캔들을 (종목, 주기)별 히스토리에 병합합니다.
//! 진행 중인 마지막 캔들은 덮어쓰고, 마감된 새 캔들만 뒤에 붙이며,
//! 길이는 마지막으로 요청된 `size`를 넘지 않습니다.

use std::collections::{HashMap, VecDeque};
use trader_core::{Period, Record};

/// 한 (종목, 주기)의 시간 순 캔들 히스토리.
///
/// 시간은 엄격히 증가하며 중복이 없습니다.
#[derive(Debug, Clone, Default)]
pub struct RecordSeries {
    records: VecDeque<Record>,
}

impl RecordSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// 마지막 캔들 시간 (비어 있으면 0).
    pub fn last_time(&self) -> i64 {
        self.records.back().map(|r| r.time).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 히스토리 복사본 (오래된 것부터).
    pub fn to_vec(&self) -> Vec<Record> {
        self.records.iter().copied().collect()
    }

    /// 조회한 캔들을 병합합니다.
    ///
    /// `feed`는 거래소 순서(오래된 것부터)이며 최신 캔들부터 거꾸로 훑습니다.
    /// - 마지막 시간보다 새로운 캔들은 보류 버퍼에 모음
    /// - 마지막 시간과 같은 캔들은 마지막 항목을 덮어씀 (진행 중 캔들)
    /// - 더 오래된 캔들을 만나면 즉시 중단
    ///
    /// 이후 보류 버퍼를 시간 순으로 붙이고 앞쪽을 잘라 `size`개만 남깁니다.
    pub fn merge(&mut self, feed: &[Record], size: usize) {
        let last_time = self.last_time();
        let mut pending: Vec<Record> = Vec::new();

        for bar in feed.iter().rev() {
            if bar.time > last_time {
                pending.push(*bar);
            } else if last_time > 0 && bar.time == last_time {
                if let Some(last) = self.records.back_mut() {
                    *last = *bar;
                }
            } else {
                break;
            }
        }

        self.records.extend(pending.into_iter().rev());

        while self.records.len() > size {
            self.records.pop_front();
        }
    }
}

/// (종목, 주기)별 캔들 캐시.
#[derive(Debug, Default)]
pub struct RecordCache {
    series: HashMap<(String, Period), RecordSeries>,
    default_size: usize,
}

impl RecordCache {
    /// `default_size`는 요청 크기가 0일 때 사용됩니다.
    pub fn new(default_size: usize) -> Self {
        Self {
            series: HashMap::new(),
            default_size: if default_size == 0 { 200 } else { default_size },
        }
    }

    /// 요청 크기 해석 (`None` 또는 0이면 기본값).
    pub fn resolve_size(&self, size: Option<usize>) -> usize {
        match size {
            Some(n) if n > 0 => n,
            _ => self.default_size,
        }
    }

    /// 병합 후 해당 히스토리를 반환합니다.
    pub fn merge(
        &mut self,
        instrument: &str,
        period: Period,
        feed: &[Record],
        size: usize,
    ) -> Vec<Record> {
        let series = self
            .series
            .entry((instrument.to_string(), period))
            .or_default();
        series.merge(feed, size);
        series.to_vec()
    }

    /// 현재 캐시된 히스토리 (없으면 빈 목록).
    pub fn snapshot(&self, instrument: &str, period: Period) -> Vec<Record> {
        self.series
            .get(&(instrument.to_string(), period))
            .map(RecordSeries::to_vec)
            .unwrap_or_default()
    }
}
