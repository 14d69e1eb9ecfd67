//! 컨테이너 조회 API 핸들러.

use axum::extract::{Path, State};
use axum::Json;
use runify_core::models::container::ContainerId;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::AppState;

/// 단일 컨테이너 응답 DTO
#[derive(Debug, Serialize)]
pub struct ContainerResponse {
    /// DOM 요소 id
    pub id: ContainerId,
    /// 현재 내용 (HTML 조각)
    pub html: String,
}

/// 전체 컨테이너 조회
///
/// GET /api/containers
pub async fn list_containers(State(state): State<AppState>) -> Json<BTreeMap<ContainerId, String>> {
    Json(state.page.snapshot())
}

/// 단일 컨테이너 조회
///
/// GET /api/containers/{id}
pub async fn get_container(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContainerResponse>, ApiError> {
    let container = ContainerId::from_dom_id(&id)
        .ok_or_else(|| ApiError::NotFound(format!("컨테이너 {id}")))?;
    let html = state
        .page
        .get(container)
        .ok_or_else(|| ApiError::NotFound(format!("컨테이너 {id}")))?;

    Ok(Json(ContainerResponse {
        id: container,
        html,
    }))
}
