//! 분석 사용량 집계.
//!
//! 프로세스 수명 동안만 유지되는 카운터 (영속화하지 않음).

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};

use glance_core::models::analysis::AnalysisStats;

/// "최근 분석"으로 치는 기간 (1시간)
const RECENT_WINDOW_SECS: i64 = 3600;

/// 분석 시도/성공 집계기
#[derive(Debug, Default)]
pub struct UsageStats {
    attempts: u64,
    successes: u64,
    commands: u64,
    /// 최근 성공 시각 (오래된 순)
    recent: VecDeque<DateTime<Utc>>,
}

impl UsageStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 성공한 분석 기록
    pub fn record_success(&mut self, at: DateTime<Utc>, commands: usize) {
        self.attempts += 1;
        self.successes += 1;
        self.commands += commands as u64;
        self.recent.push_back(at);
        self.prune(at);
    }

    /// 실패한 분석 기록 (캡처/인코딩 실패)
    pub fn record_failure(&mut self) {
        self.attempts += 1;
    }

    fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff = now - Duration::seconds(RECENT_WINDOW_SECS);
        while self.recent.front().is_some_and(|t| *t < cutoff) {
            self.recent.pop_front();
        }
    }

    /// 스냅샷 (`now` 기준 최근 1시간)
    pub fn snapshot(&mut self, now: DateTime<Utc>) -> AnalysisStats {
        self.prune(now);
        AnalysisStats {
            total_analyses: self.successes,
            total_commands: self.commands,
            // 명령은 실행되지 않는다
            executed_commands: 0,
            recent_analyses: self.recent.len() as u64,
            success_rate: if self.attempts == 0 {
                0.0
            } else {
                self.successes as f64 / self.attempts as f64
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_are_zero() {
        let mut stats = UsageStats::new();
        assert_eq!(stats.snapshot(Utc::now()), AnalysisStats::default());
    }

    #[test]
    fn counts_successes_and_failures() {
        let mut stats = UsageStats::new();
        let now = Utc::now();
        stats.record_success(now, 3);
        stats.record_success(now, 2);
        stats.record_failure();
        stats.record_failure();

        let snapshot = stats.snapshot(now);
        assert_eq!(snapshot.total_analyses, 2);
        assert_eq!(snapshot.total_commands, 5);
        assert_eq!(snapshot.executed_commands, 0);
        assert_eq!(snapshot.recent_analyses, 2);
        assert!((snapshot.success_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn recent_window_expires() {
        let mut stats = UsageStats::new();
        let start = Utc::now();
        stats.record_success(start - Duration::seconds(4000), 1);
        stats.record_success(start, 1);

        let snapshot = stats.snapshot(start + Duration::seconds(10));
        assert_eq!(snapshot.total_analyses, 2);
        assert_eq!(snapshot.recent_analyses, 1);
    }
}
