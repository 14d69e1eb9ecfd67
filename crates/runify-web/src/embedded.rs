//! 정적 파일 임베드 및 서빙.
//!
//! rust-embed를 사용하여 대시보드 셸 페이지를 바이너리에 임베드.

use axum::http::{header, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use rust_embed::Embed;

/// 대시보드 셸 (`assets` 디렉토리)
#[derive(Embed)]
#[folder = "assets"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
struct Assets;

/// 정적 파일 서빙을 위한 fallback 핸들러
pub async fn serve_static(uri: Uri) -> Response {
    serve_static_impl(uri.path())
}

/// 정적 파일 서빙 구현
fn serve_static_impl(path: &str) -> Response {
    let path = path.trim_start_matches('/');

    // 빈 경로는 index.html로
    let path = if path.is_empty() { "index.html" } else { path };

    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();

            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime.as_ref()),
                    (header::CACHE_CONTROL, "no-cache"),
                ],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => index_page(),
    }
}

/// 알 수 없는 경로는 셸 페이지로
fn index_page() -> Response {
    match Assets::get("index.html") {
        Some(index) => Html(String::from_utf8_lossy(&index.data).to_string()).into_response(),
        None => (StatusCode::NOT_FOUND, "index.html missing").into_response(),
    }
}
