//! # runify-web
//!
//! 대시보드 렌더러와 로컬 웹 서버.
//! 렌더러가 만든 HTML 조각을 [`page::Page`]에 보관하고,
//! Axum 서버가 셸 페이지와 SSE 스트림으로 브라우저에 전달한다.
//!
//! ## 기능
//! - 통계/이벤트/이상 탐지 렌더링 (`render`)
//! - 컨테이너 스냅샷 조회 (`/api/containers`)
//! - 실시간 컨테이너 갱신 (`/api/stream`)
//! - 정적 파일 서빙 (셸 페이지)

pub mod embedded;
pub mod error;
pub mod handlers;
pub mod page;
pub mod render;
pub mod routes;

use axum::Router;
use runify_core::config::WebConfig;
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

pub use page::{ContainerUpdate, Page};
pub use render::Renderer;

/// 포트 바인드 최대 시도 횟수
const MAX_PORT_ATTEMPTS: u16 = 10;

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 대시보드 페이지 (폴러와 공유)
    pub page: Arc<Page>,
}

/// 라우터 구성
pub fn router(state: AppState) -> Router {
    // CORS 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes::api_routes())
        .fallback(embedded::serve_static)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 로컬 웹 대시보드 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    /// 새 웹 서버 생성
    pub fn new(page: Arc<Page>, config: WebConfig) -> Self {
        Self {
            config,
            state: AppState { page },
        }
    }

    /// 서버 실행 (종료 신호까지)
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> io::Result<()> {
        let host = if self.config.allow_external {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let listener = bind_with_fallback(host, self.config.port).await?;
        info!("웹 대시보드 서버 시작: http://{}", listener.local_addr()?);

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.wait_for(|stop| *stop).await;
                info!("웹 서버 종료 신호 수신");
            })
            .await?;

        info!("웹 대시보드 서버 종료");
        Ok(())
    }

    /// 서버 URL 반환
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.config.port)
    }
}

/// `base_port`부터 차례로 바인드한다.
///
/// 사용 중인 포트만 건너뛰고, 그 밖의 에러는 즉시 반환한다.
pub async fn bind_with_fallback(host: &str, base_port: u16) -> io::Result<TcpListener> {
    let mut last_error = None;

    for port in (0..MAX_PORT_ATTEMPTS).map_while(|offset| base_port.checked_add(offset)) {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => {
                if port != base_port {
                    warn!("포트 {base_port} 사용 불가, 대체 포트 {port} 사용");
                }
                return Ok(listener);
            }
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                debug!("포트 {port} 사용 중");
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrInUse,
            format!("포트 {base_port}부터 바인드 가능한 포트 없음"),
        )
    }))
}
