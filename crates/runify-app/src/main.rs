//! # runify-dashboard
//!
//! Runify 대시보드 바이너리 진입점.
//! 설정 로드, 어댑터 와이어링, 폴러/웹 서버 실행, 종료 처리.

use anyhow::{Context, Result};
use clap::Parser;
use runify_app::lifecycle::{wait_for_signal, Lifecycle};
use runify_app::poller::{Poller, PollerConfig};
use runify_app::state::LatestStats;
use runify_core::config::AppConfig;
use runify_core::config_manager::ConfigManager;
use runify_core::ports::dashboard_api::DashboardApi;
use runify_core::ports::view::DashboardView;
use runify_network::health::EndpointHealth;
use runify_network::http_client::HttpDashboardClient;
use runify_web::{Page, Renderer, WebServer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// 종료 신호 후 태스크 합류 대기 시간
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Runify 대시보드
///
/// 통계, 샘플 이벤트, 이상 탐지 엔드포인트를 주기적으로 폴링해 표시한다.
#[derive(Parser, Debug)]
#[command(name = "runify-dashboard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (JSON/TOML/YAML)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 통계 엔드포인트 URL
    #[arg(long)]
    stats_url: Option<String>,

    /// running 이벤트 엔드포인트 URL
    #[arg(long)]
    running_url: Option<String>,

    /// music 이벤트 엔드포인트 URL
    #[arg(long)]
    music_url: Option<String>,

    /// 이상 탐지 엔드포인트 URL
    #[arg(long)]
    anomalies_url: Option<String>,

    /// 폴링 간격 (밀리초)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// 웹 대시보드 포트
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// 웹 서버 없이 실행 (컨테이너 갱신은 로그로 출력)
    #[arg(long)]
    no_web: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

impl Args {
    /// CLI 인자로 설정 오버라이드
    fn apply(&self, config: &mut AppConfig) {
        if let Some(ref url) = self.stats_url {
            config.endpoints.stats_url = url.clone();
        }
        if let Some(ref url) = self.running_url {
            config.endpoints.running_url = url.clone();
        }
        if let Some(ref url) = self.music_url {
            config.endpoints.music_url = url.clone();
        }
        if let Some(ref url) = self.anomalies_url {
            config.endpoints.anomalies_url = url.clone();
        }
        if let Some(interval_ms) = self.interval_ms {
            config.poll.interval_ms = interval_ms;
        }
        if let Some(port) = self.port {
            config.web.port = port;
        }
        if self.no_web {
            config.web.enabled = false;
        }
    }
}

/// 헤드리스 모드: 컨테이너 갱신을 로그로 출력
fn spawn_update_logger(page: &Page) {
    let mut updates = page.subscribe();
    tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(update) => info!("[{}] {}", update.id, update.html),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    info!("컨테이너 갱신 {skipped}건 누락");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // tracing 초기화
    let log_filter = format!(
        "runify_dashboard={0},runify_app={0},runify_core={0},runify_network={0},runify_web={0},tower_http={0}",
        args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("Runify 대시보드 시작");

    // 설정 로드: 기본값 ← 파일 ← 환경변수 ← CLI
    let mut config_manager =
        ConfigManager::load(args.config.as_deref()).context("설정 로드 실패")?;
    match config_manager.config_path() {
        Some(path) => info!("설정 파일: {}", path.display()),
        None => info!("설정 파일 없음, 기본값 사용"),
    }
    let config = config_manager
        .update_with(|config| args.apply(config))
        .context("CLI 설정 적용 실패")?
        .clone();

    info!(
        "엔드포인트: stats={}, running={}, music={}, anomalies={}",
        config.endpoints.stats_url,
        config.endpoints.running_url,
        config.endpoints.music_url,
        config.endpoints.anomalies_url
    );

    // ── 어댑터 생성 (DI 와이어링) ──
    let api: Arc<dyn DashboardApi> = Arc::new(
        HttpDashboardClient::new(&config.endpoints, config.poll.request_timeout())
            .context("HTTP 클라이언트 생성 실패")?,
    );
    let page = Arc::new(Page::new());
    let view: Arc<dyn DashboardView> = page.clone();
    let renderer = Renderer::new(&config.display);
    let health = Arc::new(EndpointHealth::new(config.poll.failure_log_threshold));

    let mut lifecycle = Lifecycle::new();

    // ── 태스크 시작 ──
    let poller = Poller::new(
        PollerConfig {
            interval: config.poll.interval(),
        },
        api,
        view,
        renderer,
        health,
        LatestStats::new(),
    );
    lifecycle.spawn("poller", move |shutdown_rx| async move {
        poller.run(shutdown_rx).await;
    });

    // ── 웹 대시보드 서버 (config.web.enabled일 때만) ──
    if config.web.enabled {
        let web_server = WebServer::new(page.clone(), config.web.clone());
        info!("웹 대시보드: {}", web_server.url());
        lifecycle.spawn("web", move |shutdown_rx| async move {
            if let Err(e) = web_server.run(shutdown_rx).await {
                error!("웹 서버 오류: {e}");
            }
        });
    } else {
        info!("헤드리스 모드: 웹 서버 비활성화");
        spawn_update_logger(&page);
    }

    info!("Runify 대시보드 실행 중 (Ctrl+C로 종료)");

    let reason = wait_for_signal().await.context("시그널 핸들러 등록 실패")?;
    lifecycle.shutdown(reason);

    let report = lifecycle.join(SHUTDOWN_GRACE).await;
    info!(
        "Runify 대시보드 종료 (정상 {}, 실패 {}, 중단 {})",
        report.finished, report.failed, report.aborted
    );
    Ok(())
}
