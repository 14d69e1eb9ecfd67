//! API 라우트 정의.

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::AppState;

/// API 라우트 생성
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // 컨테이너 스냅샷
        .route("/containers", get(handlers::containers::list_containers))
        .route("/containers/{id}", get(handlers::containers::get_container))
        // 실시간 스트림 (SSE)
        .route("/stream", get(handlers::stream::container_stream))
}
