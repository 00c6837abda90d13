//! 백그라운드 주기 분석.
//!
//! 분석기 하나당 루프 하나. 중지는 watch 신호 후 루프 태스크 종료까지 기다린다.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use glance_core::error::CoreError;

use crate::analyzer::ScreenAnalyzer;

/// 실행 중인 루프 핸들
struct MonitorHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    interval: Duration,
}

/// 주기 분석 모니터
pub struct ScreenMonitor {
    analyzer: Arc<ScreenAnalyzer>,
    handle: Mutex<Option<MonitorHandle>>,
}

impl ScreenMonitor {
    pub fn new(analyzer: Arc<ScreenAnalyzer>) -> Self {
        Self {
            analyzer,
            handle: Mutex::new(None),
        }
    }

    /// 대상 분석기
    pub fn analyzer(&self) -> &Arc<ScreenAnalyzer> {
        &self.analyzer
    }

    /// 루프 시작: 이미 실행 중이면 아무것도 하지 않고 `false`
    ///
    /// `interval_secs`는 유한한 양수여야 한다.
    pub async fn start(&self, interval_secs: f64) -> Result<bool, CoreError> {
        let interval = validate_interval(interval_secs)?;

        let mut guard = self.handle.lock().await;
        if guard.as_ref().is_some_and(|h| !h.task.is_finished()) {
            debug!("모니터링이 이미 실행 중");
            return Ok(false);
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let analyzer = Arc::clone(&self.analyzer);
        let task = tokio::spawn(run_loop(analyzer, interval, stop_rx));

        *guard = Some(MonitorHandle {
            stop_tx,
            task,
            interval,
        });
        info!(interval_ms = interval.as_millis() as u64, "화면 모니터링 시작");
        Ok(true)
    }

    /// 루프 중지: 진행 중인 사이클이 끝나고 루프가 종료될 때까지 대기
    ///
    /// 실행 중이 아니었으면 `false`. 루프가 끝날 때까지 잠금을 쥐고 있으므로
    /// 그 사이 들어온 `start`는 기존 루프 종료 후에야 새 루프를 띄운다.
    pub async fn stop(&self) -> bool {
        let mut guard = self.handle.lock().await;
        let Some(handle) = guard.take() else {
            return false;
        };

        let _ = handle.stop_tx.send(true);
        if let Err(e) = handle.task.await {
            warn!("모니터링 루프 종료 대기 실패: {e}");
        }
        drop(guard);

        info!("화면 모니터링 중지");
        true
    }

    /// 루프 실행 여부
    pub async fn is_running(&self) -> bool {
        self.handle
            .lock()
            .await
            .as_ref()
            .is_some_and(|h| !h.task.is_finished())
    }

    /// 실행 중인 루프의 주기
    pub async fn interval(&self) -> Option<Duration> {
        self.handle
            .lock()
            .await
            .as_ref()
            .filter(|h| !h.task.is_finished())
            .map(|h| h.interval)
    }
}

/// 주기 검증: NaN, 무한대, 0 이하는 거부
pub fn validate_interval(interval_secs: f64) -> Result<Duration, CoreError> {
    if !interval_secs.is_finite() || interval_secs <= 0.0 {
        return Err(CoreError::Validation {
            field: "interval".to_string(),
            message: format!("0보다 큰 유한한 초 단위 값이어야 함 (입력: {interval_secs})"),
        });
    }
    Duration::try_from_secs_f64(interval_secs).map_err(|e| CoreError::Validation {
        field: "interval".to_string(),
        message: e.to_string(),
    })
}

async fn run_loop(
    analyzer: Arc<ScreenAnalyzer>,
    interval: Duration,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut cycle: u64 = 0;

    loop {
        if *stop_rx.borrow() {
            break;
        }

        cycle += 1;
        match analyzer.analyze_once(None).await {
            Ok(result) => info!(
                cycle,
                elements = result.elements.len(),
                commands = result.commands.len(),
                "모니터링 사이클 완료"
            ),
            Err(e) => warn!(cycle, "모니터링 사이클 실패: {e}"),
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = stop_rx.changed() => {
                // 송신측이 사라졌거나 중지 신호
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
        }
    }

    debug!(cycles = cycle, "모니터링 루프 종료");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::tests::{FakeModel, FakeOcr, FakeScreen, ONE_CLICK};
    use glance_core::config::VisionConfig;
    use glance_core::models::frame::Frame;
    use glance_core::ports::frame_source::FrameSource;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 캡처마다 잠시 멈추고 동시에 진행 중인 캡처 수의 최댓값을 기록
    #[derive(Default)]
    struct SlowScreen {
        active: AtomicUsize,
        max_active: AtomicUsize,
        calls: AtomicUsize,
    }

    impl FrameSource for SlowScreen {
        fn capture(&self) -> Result<Frame, CoreError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(300));
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(Frame::new(image::RgbImage::from_pixel(
                32,
                32,
                image::Rgb([240, 240, 240]),
            )))
        }
    }

    fn monitor(screen: Arc<FakeScreen>) -> ScreenMonitor {
        let analyzer = ScreenAnalyzer::new(
            screen,
            Arc::new(FakeOcr::new(false)),
            Arc::new(FakeModel::new(ONE_CLICK)),
            VisionConfig::default(),
        );
        ScreenMonitor::new(Arc::new(analyzer))
    }

    #[test]
    fn interval_validation() {
        assert!(validate_interval(2.0).is_ok());
        assert!(validate_interval(0.25).is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                validate_interval(bad),
                Err(CoreError::Validation { .. })
            ));
        }
    }

    #[tokio::test]
    async fn invalid_interval_does_not_start() {
        let monitor = monitor(Arc::new(FakeScreen::new(32, 32)));
        assert!(monitor.start(0.0).await.is_err());
        assert!(!monitor.is_running().await);
    }

    #[tokio::test]
    async fn second_start_is_noop() {
        let screen = Arc::new(FakeScreen::new(32, 32));
        let monitor = monitor(screen.clone());

        assert!(monitor.start(0.05).await.unwrap());
        assert!(!monitor.start(0.05).await.unwrap());
        assert!(monitor.is_running().await);
        assert_eq!(monitor.interval().await, Some(Duration::from_millis(50)));

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(monitor.stop().await);
        assert!(!monitor.is_running().await);
        assert!(screen.calls.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn no_activity_after_stop() {
        let screen = Arc::new(FakeScreen::new(32, 32));
        let monitor = monitor(screen.clone());

        monitor.start(0.02).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        monitor.stop().await;

        let after_stop = screen.calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(screen.calls.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test]
    async fn stop_when_idle_returns_false() {
        let monitor = monitor(Arc::new(FakeScreen::new(32, 32)));
        assert!(!monitor.stop().await);
    }

    #[tokio::test]
    async fn long_interval_is_interrupted_by_stop() {
        let screen = Arc::new(FakeScreen::new(32, 32));
        let monitor = monitor(screen.clone());

        monitor.start(3600.0).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let stopped = tokio::time::timeout(Duration::from_secs(2), monitor.stop()).await;
        assert_eq!(stopped.ok(), Some(true));
        assert_eq!(screen.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn start_during_stop_waits_for_previous_loop() {
        let screen = Arc::new(SlowScreen::default());
        let analyzer = ScreenAnalyzer::new(
            screen.clone(),
            Arc::new(FakeOcr::new(false)),
            Arc::new(FakeModel::new(ONE_CLICK)),
            VisionConfig::default(),
        );
        let monitor = Arc::new(ScreenMonitor::new(Arc::new(analyzer)));

        assert!(monitor.start(0.01).await.unwrap());
        // 첫 캡처가 진행 중일 때 중지 요청
        tokio::time::sleep(Duration::from_millis(50)).await;
        let stopper = {
            let monitor = Arc::clone(&monitor);
            tokio::spawn(async move { monitor.stop().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(monitor.start(0.01).await.unwrap());
        assert!(stopper.await.unwrap());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(monitor.stop().await);

        assert_eq!(screen.max_active.load(Ordering::SeqCst), 1);
        assert!(screen.calls.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn capture_failures_keep_loop_alive() {
        let screen = Arc::new(FakeScreen::broken());
        let monitor = monitor(screen.clone());

        monitor.start(0.01).await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(monitor.is_running().await);
        monitor.stop().await;
        assert!(screen.calls.load(Ordering::SeqCst) >= 2);
    }
}
