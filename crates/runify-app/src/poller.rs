//! 대시보드 폴링 스케줄러.
//!
//! 시작 즉시 한 번, 이후 고정 간격마다 통계, running 이벤트, music 이벤트,
//! 이상 탐지 조회를 각각 독립 태스크로 실행한다. 이전 틱의 요청이 아직
//! 진행 중이어도 건너뛰거나 합치지 않으며, 밀린 틱도 모두 실행한다.

use chrono::Utc;
use runify_core::error::CoreError;
use runify_core::models::anomaly::AnomalyCategory;
use runify_core::models::container::ContainerId;
use runify_core::models::endpoint::Endpoint;
use runify_core::models::event::EventKind;
use runify_core::ports::dashboard_api::DashboardApi;
use runify_core::ports::view::DashboardView;
use runify_network::health::SharedEndpointHealth;
use runify_web::Renderer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::state::LatestStats;

/// 폴러 설정
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// 틱 간격
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(3_000),
        }
    }
}

/// 조회 태스크가 공유하는 의존성 묶음
#[derive(Clone)]
struct PollContext {
    api: Arc<dyn DashboardApi>,
    view: Arc<dyn DashboardView>,
    renderer: Arc<Renderer>,
    health: SharedEndpointHealth,
    latest: LatestStats,
}

/// 대시보드 폴러
pub struct Poller {
    config: PollerConfig,
    ctx: PollContext,
}

impl Poller {
    pub fn new(
        config: PollerConfig,
        api: Arc<dyn DashboardApi>,
        view: Arc<dyn DashboardView>,
        renderer: Renderer,
        health: SharedEndpointHealth,
        latest: LatestStats,
    ) -> Self {
        Self {
            config,
            ctx: PollContext {
                api,
                view,
                renderer: Arc::new(renderer),
                health,
                latest,
            },
        }
    }

    /// 최신 통계 셀
    pub fn latest(&self) -> &LatestStats {
        &self.ctx.latest
    }

    /// 종료 신호까지 폴링 루프 실행
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) {
        info!("폴링 시작: 간격={}ms", self.config.interval.as_millis());

        // 첫 tick은 즉시 완료된다
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        let mut ticks: u64 = 0;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    ticks += 1;
                    debug!("폴링 틱 #{ticks}");
                    // 다음 틱은 이번 틱 완료를 기다리지 않는다
                    tokio::spawn(reap(ticks, self.tick()));
                }
                _ = shutdown_rx.changed() => {
                    info!("폴링 루프 종료 ({ticks}틱)");
                    break;
                }
            }
        }
    }

    /// 한 틱: 네 가지 조회를 각각 spawn
    pub fn tick(&self) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::with_capacity(EventKind::ALL.len() + 2);

        let ctx = self.ctx.clone();
        handles.push(tokio::spawn(async move { refresh_stats(&ctx).await }));
        for kind in EventKind::ALL {
            let ctx = self.ctx.clone();
            handles.push(tokio::spawn(async move { refresh_event(&ctx, kind).await }));
        }
        let ctx = self.ctx.clone();
        handles.push(tokio::spawn(async move { refresh_anomalies(&ctx).await }));

        handles
    }
}

/// 틱 태스크 종료를 기다리며 패닉/취소를 기록한다. 비정상 종료 건수 반환.
async fn reap(tick: u64, handles: Vec<JoinHandle<()>>) -> usize {
    let mut failed = 0;
    for handle in handles {
        if let Err(e) = handle.await {
            failed += 1;
            error!("폴링 틱 #{tick} 조회 태스크 비정상 종료: {e}");
        }
    }
    failed
}

/// `[0, max)` 범위의 샘플 인덱스 (`unit`은 `[0, 1)` 난수)
///
/// 샘플링할 레코드가 없으면 None.
pub fn sample_index(max: u64, unit: f64) -> Option<u64> {
    if max == 0 {
        return None;
    }
    let scaled = (unit * max as f64).floor();
    let index = if scaled.is_finite() && scaled > 0.0 {
        scaled as u64
    } else {
        0
    };
    Some(index.min(max - 1))
}

fn report_failure(ctx: &PollContext, endpoint: Endpoint, error: &CoreError) {
    ctx.health.record_failure(endpoint, error);
    warn!("{endpoint} 조회 실패: {error}");
}

/// 통계 조회 → 스냅샷 교체 → 통계/갱신 시각 렌더링
async fn refresh_stats(ctx: &PollContext) {
    match ctx.api.fetch_stats().await {
        Ok(stats) => {
            ctx.health.record_success(Endpoint::Stats);
            let stats = ctx.latest.replace(stats);
            ctx.view.replace(ContainerId::Stats, ctx.renderer.stats(&stats));
            ctx.view.replace(
                ContainerId::LastUpdated,
                ctx.renderer.last_updated(stats.last_updated.as_deref(), Utc::now()),
            );
        }
        Err(e) => {
            report_failure(ctx, Endpoint::Stats, &e);
            ctx.view.replace(ContainerId::Stats, ctx.renderer.error(&e.to_string()));
        }
    }
}

/// 스냅샷 개수 범위에서 이벤트 하나를 샘플링해 렌더링
async fn refresh_event(ctx: &PollContext, kind: EventKind) {
    let container = kind.container();
    let Some(index) = sample_index(ctx.latest.max_index(kind), rand::random::<f64>()) else {
        debug!("{kind} 이벤트 샘플링 생략: 표본 없음");
        ctx.view.replace(container, ctx.renderer.no_events(kind));
        return;
    };

    match ctx.api.fetch_event(kind, index).await {
        Ok(event) => {
            ctx.health.record_success(kind.endpoint());
            ctx.view.replace(container, ctx.renderer.event(&event));
        }
        Err(e) => {
            report_failure(ctx, kind.endpoint(), &e);
            ctx.view.replace(container, ctx.renderer.error(&e.to_string()));
        }
    }
}

/// 이상 탐지 조회 → 카테고리별 최신 항목 렌더링
async fn refresh_anomalies(ctx: &PollContext) {
    match ctx.api.fetch_anomalies().await {
        Ok(feed) => {
            ctx.health.record_success(Endpoint::Anomalies);
            let latest = feed.latest_per_category();
            for category in AnomalyCategory::DISPLAYED {
                let Some(container) = category.container() else {
                    continue;
                };
                let html = match latest.get(category) {
                    Some(anomaly) => ctx.renderer.anomaly(anomaly),
                    None => ctx.renderer.no_anomalies(category),
                };
                ctx.view.replace(container, html);
            }
        }
        Err(e) => {
            report_failure(ctx, Endpoint::Anomalies, &e);
            let html = ctx.renderer.error(&e.to_string());
            for container in AnomalyCategory::DISPLAYED
                .into_iter()
                .filter_map(AnomalyCategory::container)
            {
                ctx.view.replace(container, html.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use runify_core::config::{DisplayConfig, DisplayZone};
    use runify_core::models::anomaly::{Anomaly, AnomalyFeed};
    use runify_core::models::event::{MusicEvent, RunningEvent, SampledEvent};
    use runify_core::models::stats::StatsSnapshot;
    use runify_network::health::{EndpointHealth, EndpointStatus};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// 호출 기록용 목 API
    #[derive(Default)]
    struct MockApi {
        stats: Mutex<Option<Result<StatsSnapshot, String>>>,
        event_status: Mutex<Option<u16>>,
        anomalies: Mutex<Option<AnomalyFeed>>,
        delay: Option<Duration>,
        anomaly_panics: bool,
        stats_started: AtomicU64,
        stats_finished: AtomicU64,
        event_calls: Mutex<Vec<(EventKind, u64)>>,
        anomaly_calls: AtomicU64,
    }

    #[async_trait]
    impl DashboardApi for MockApi {
        async fn fetch_stats(&self) -> Result<StatsSnapshot, CoreError> {
            self.stats_started.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.stats_finished.fetch_add(1, Ordering::SeqCst);
            match self.stats.lock().clone() {
                Some(Ok(stats)) => Ok(stats),
                Some(Err(message)) => Err(CoreError::Network(message)),
                None => Ok(StatsSnapshot::default()),
            }
        }

        async fn fetch_event(&self, kind: EventKind, index: u64) -> Result<SampledEvent, CoreError> {
            self.event_calls.lock().push((kind, index));
            if let Some(status) = *self.event_status.lock() {
                return Err(CoreError::HttpStatus { status });
            }
            Ok(match kind {
                EventKind::Running => SampledEvent::Running(RunningEvent {
                    user_id: Some(format!("runner-{index}")),
                    ..RunningEvent::default()
                }),
                EventKind::Music => SampledEvent::Music(MusicEvent {
                    song_name: Some(format!("song-{index}")),
                    ..MusicEvent::default()
                }),
            })
        }

        async fn fetch_anomalies(&self) -> Result<AnomalyFeed, CoreError> {
            self.anomaly_calls.fetch_add(1, Ordering::SeqCst);
            if self.anomaly_panics {
                panic!("anomaly decoder blew up");
            }
            self.anomalies
                .lock()
                .clone()
                .ok_or_else(|| CoreError::HttpStatus { status: 503 })
        }
    }

    /// 마지막 교체 내용을 기록하는 뷰
    #[derive(Default)]
    struct RecordingView {
        contents: Mutex<HashMap<ContainerId, String>>,
    }

    impl RecordingView {
        fn content(&self, id: ContainerId) -> String {
            self.contents.lock().get(&id).cloned().unwrap_or_default()
        }
    }

    impl DashboardView for RecordingView {
        fn replace(&self, container: ContainerId, content: String) {
            self.contents.lock().insert(container, content);
        }
    }

    fn renderer() -> Renderer {
        Renderer::new(&DisplayConfig {
            zone: DisplayZone::Utc,
            ..DisplayConfig::default()
        })
    }

    fn poller_with(api: Arc<MockApi>, view: Arc<RecordingView>) -> Poller {
        Poller::new(
            PollerConfig::default(),
            api,
            view,
            renderer(),
            Arc::new(EndpointHealth::new(2)),
            LatestStats::new(),
        )
    }

    fn counts(running: u64, music: u64) -> StatsSnapshot {
        StatsSnapshot {
            num_running_stats: Some(running),
            num_music_info: Some(music),
            ..StatsSnapshot::default()
        }
    }

    fn anomaly(category: AnomalyCategory, event_id: &str, timestamp: &str) -> Anomaly {
        Anomaly {
            event_type: category,
            anomaly_type: Some("TooLong".to_string()),
            event_id: Some(event_id.to_string()),
            description: None,
            timestamp: Some(timestamp.to_string()),
            trace_id: None,
        }
    }

    async fn run_tick(poller: &Poller) {
        for handle in poller.tick() {
            handle.await.unwrap();
        }
    }

    #[test]
    fn sample_index_bounds() {
        assert_eq!(sample_index(0, 0.5), None);
        assert_eq!(sample_index(5, 0.0), Some(0));
        assert_eq!(sample_index(5, 0.999), Some(4));
        assert_eq!(sample_index(1, 0.75), Some(0));
        // [0, 1) 밖의 값도 범위 안으로
        assert_eq!(sample_index(5, 1.0), Some(4));
        assert_eq!(sample_index(5, f64::NAN), Some(0));
    }

    #[test]
    fn sample_index_always_below_count() {
        for max in 1..50u64 {
            for step in 0..100 {
                let unit = step as f64 / 100.0;
                let index = sample_index(max, unit).unwrap();
                assert!(index < max, "max={max}, unit={unit}, index={index}");
            }
        }
    }

    #[test]
    fn poller_config_default() {
        assert_eq!(PollerConfig::default().interval, Duration::from_millis(3_000));
    }

    #[tokio::test]
    async fn stats_success_updates_state_and_containers() {
        let api = Arc::new(MockApi::default());
        *api.stats.lock() = Some(Ok(StatsSnapshot {
            last_updated: Some("2024-03-01T10:00:00Z".to_string()),
            ..counts(12, 3)
        }));
        let view = Arc::new(RecordingView::default());
        let poller = poller_with(api, view.clone());

        refresh_stats(&poller.ctx).await;

        assert_eq!(poller.latest().max_index(EventKind::Running), 12);
        assert!(view
            .content(ContainerId::Stats)
            .contains("<strong>Total Runs:</strong> 12"));
        assert_eq!(
            view.content(ContainerId::LastUpdated),
            "Last updated: 3/1/2024, 10:00:00 AM"
        );
    }

    #[tokio::test]
    async fn stats_failure_keeps_previous_snapshot() {
        let api = Arc::new(MockApi::default());
        let view = Arc::new(RecordingView::default());
        let poller = poller_with(api.clone(), view.clone());
        poller.latest().replace(counts(7, 7));

        *api.stats.lock() = Some(Err("connection refused".to_string()));
        refresh_stats(&poller.ctx).await;

        assert_eq!(
            view.content(ContainerId::Stats),
            "<code>connection refused</code>"
        );
        assert_eq!(poller.latest().max_index(EventKind::Music), 7);
        // 통계 실패는 갱신 시각을 건드리지 않음
        assert_eq!(view.content(ContainerId::LastUpdated), "");
    }

    #[tokio::test]
    async fn event_without_snapshot_makes_no_request() {
        let api = Arc::new(MockApi::default());
        let view = Arc::new(RecordingView::default());
        let poller = poller_with(api.clone(), view.clone());

        refresh_event(&poller.ctx, EventKind::Running).await;

        assert!(api.event_calls.lock().is_empty());
        assert_eq!(
            view.content(ContainerId::EventRunning),
            "<p class=\"empty\">No running events available</p>"
        );
    }

    #[tokio::test]
    async fn event_index_within_snapshot_count() {
        let api = Arc::new(MockApi::default());
        let view = Arc::new(RecordingView::default());
        let poller = poller_with(api.clone(), view.clone());
        poller.latest().replace(counts(5, 1));

        for _ in 0..50 {
            refresh_event(&poller.ctx, EventKind::Running).await;
            refresh_event(&poller.ctx, EventKind::Music).await;
        }

        let calls = api.event_calls.lock();
        assert_eq!(calls.len(), 100);
        for (kind, index) in calls.iter() {
            match kind {
                EventKind::Running => assert!(*index < 5),
                EventKind::Music => assert_eq!(*index, 0),
            }
        }
        assert!(view
            .content(ContainerId::EventMusic)
            .contains("<strong>Song:</strong> song-0"));
    }

    #[tokio::test]
    async fn event_http_error_renders_status_code() {
        let api = Arc::new(MockApi::default());
        *api.event_status.lock() = Some(404);
        let view = Arc::new(RecordingView::default());
        let poller = poller_with(api, view.clone());
        poller.latest().replace(counts(3, 3));

        refresh_event(&poller.ctx, EventKind::Music).await;
        refresh_event(&poller.ctx, EventKind::Music).await;

        assert_eq!(
            view.content(ContainerId::EventMusic),
            "<code>Status code 404</code>"
        );
        assert_eq!(
            poller.ctx.health.status(Endpoint::MusicEvents),
            EndpointStatus::Down
        );
        assert_eq!(view.content(ContainerId::EventRunning), "");
    }

    #[tokio::test]
    async fn anomalies_show_latest_per_category() {
        let api = Arc::new(MockApi::default());
        *api.anomalies.lock() = Some(AnomalyFeed::List(vec![
            anomaly(AnomalyCategory::RunningStats, "jan", "2024-01-01T00:00:00Z"),
            anomaly(AnomalyCategory::RunningStats, "feb", "2024-02-01T00:00:00Z"),
        ]));
        let view = Arc::new(RecordingView::default());
        let poller = poller_with(api, view.clone());

        refresh_anomalies(&poller.ctx).await;

        let running = view.content(ContainerId::RunningAnomalies);
        assert!(running.contains("<strong>Event ID:</strong> feb"));
        assert!(!running.contains("jan"));
        assert_eq!(
            view.content(ContainerId::MusicAnomalies),
            "<p class=\"empty\">No music anomalies detected</p>"
        );
    }

    #[tokio::test]
    async fn anomaly_sentinel_empties_both_containers() {
        let api = Arc::new(MockApi::default());
        *api.anomalies.lock() = Some(AnomalyFeed::Empty {
            message: "no anomalies".to_string(),
        });
        let view = Arc::new(RecordingView::default());
        let poller = poller_with(api, view.clone());

        refresh_anomalies(&poller.ctx).await;

        assert_eq!(
            view.content(ContainerId::RunningAnomalies),
            "<p class=\"empty\">No running anomalies detected</p>"
        );
        assert_eq!(
            view.content(ContainerId::MusicAnomalies),
            "<p class=\"empty\">No music anomalies detected</p>"
        );
    }

    #[tokio::test]
    async fn anomaly_failure_renders_error_in_both_containers() {
        let api = Arc::new(MockApi::default());
        let view = Arc::new(RecordingView::default());
        let poller = poller_with(api, view.clone());

        refresh_anomalies(&poller.ctx).await;

        for id in [ContainerId::RunningAnomalies, ContainerId::MusicAnomalies] {
            assert_eq!(view.content(id), "<code>Status code 503</code>");
        }
    }

    #[tokio::test]
    async fn tick_spawns_all_four_fetches() {
        let api = Arc::new(MockApi::default());
        let view = Arc::new(RecordingView::default());
        *api.stats.lock() = Some(Ok(counts(2, 2)));
        let poller = poller_with(api.clone(), view.clone());
        poller.latest().replace(counts(2, 2));

        run_tick(&poller).await;

        assert_eq!(api.stats_finished.load(Ordering::SeqCst), 1);
        assert_eq!(api.event_calls.lock().len(), 2);
        assert_eq!(api.anomaly_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_fires_immediately_and_every_interval() {
        let api = Arc::new(MockApi::default());
        *api.stats.lock() = Some(Ok(counts(4, 4)));
        let view = Arc::new(RecordingView::default());
        let poller = Arc::new(poller_with(api.clone(), view));
        poller.latest().replace(counts(4, 4));

        let (tx, rx) = watch::channel(false);
        let runner = poller.clone();
        let handle = tokio::spawn(async move { runner.run(rx).await });

        // 0ms, 3000ms, 6000ms
        tokio::time::sleep(Duration::from_millis(6_500)).await;
        assert_eq!(api.stats_finished.load(Ordering::SeqCst), 3);
        assert_eq!(api.anomaly_calls.load(Ordering::SeqCst), 3);
        assert_eq!(api.event_calls.lock().len(), 6);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetches_do_not_skip_ticks() {
        let api = Arc::new(MockApi {
            delay: Some(Duration::from_secs(10)),
            ..MockApi::default()
        });
        let view = Arc::new(RecordingView::default());
        let poller = Arc::new(poller_with(api.clone(), view));

        let (tx, rx) = watch::channel(false);
        let runner = poller.clone();
        let handle = tokio::spawn(async move { runner.run(rx).await });

        tokio::time::sleep(Duration::from_millis(6_500)).await;
        // 세 요청 모두 진행 중, 중복 제거 없음
        assert_eq!(api.stats_started.load(Ordering::SeqCst), 3);
        assert_eq!(api.stats_finished.load(Ordering::SeqCst), 0);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn reap_counts_panicked_fetches() {
        let api = Arc::new(MockApi {
            anomaly_panics: true,
            ..MockApi::default()
        });
        let view = Arc::new(RecordingView::default());
        let poller = poller_with(api.clone(), view.clone());

        assert_eq!(reap(1, poller.tick()).await, 1);
        // 나머지 조회는 정상 렌더링
        assert_eq!(api.stats_finished.load(Ordering::SeqCst), 1);
        assert!(view
            .content(ContainerId::Stats)
            .contains("<strong>Total Runs:</strong>"));
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_fetch_does_not_stop_polling() {
        let api = Arc::new(MockApi {
            anomaly_panics: true,
            ..MockApi::default()
        });
        *api.stats.lock() = Some(Ok(counts(1, 1)));
        let view = Arc::new(RecordingView::default());
        let poller = Arc::new(poller_with(api.clone(), view));

        let (tx, rx) = watch::channel(false);
        let runner = poller.clone();
        let handle = tokio::spawn(async move { runner.run(rx).await });

        tokio::time::sleep(Duration::from_millis(6_500)).await;
        assert_eq!(api.anomaly_calls.load(Ordering::SeqCst), 3);
        assert_eq!(api.stats_finished.load(Ordering::SeqCst), 3);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
