//! 대시보드 페이지 상태.
//!
//! 컨테이너 id → 현재 내용 맵. `DashboardView` 포트를 구현하며,
//! 교체할 때마다 구독자(SSE)에게 `ContainerUpdate`를 브로드캐스트한다.

use parking_lot::RwLock;
use runify_core::models::container::ContainerId;
use runify_core::ports::view::DashboardView;
use serde::Serialize;
use std::collections::BTreeMap;
use tokio::sync::broadcast;
use tracing::trace;

/// 컨테이너 갱신 브로드캐스트 채널 용량
const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// 첫 렌더링 전 표시 내용
pub const LOADING_PLACEHOLDER: &str = "<p class=\"loading\">Loading...</p>";

/// 컨테이너 한 개의 교체 내용
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerUpdate {
    pub id: ContainerId,
    pub html: String,
}

/// 대시보드 페이지
pub struct Page {
    containers: RwLock<BTreeMap<ContainerId, String>>,
    update_tx: broadcast::Sender<ContainerUpdate>,
}

impl Page {
    /// 모든 컨테이너를 로딩 표시로 초기화한 페이지
    pub fn new() -> Self {
        let (update_tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        let containers = ContainerId::ALL
            .into_iter()
            .map(|id| (id, LOADING_PLACEHOLDER.to_string()))
            .collect();

        Self {
            containers: RwLock::new(containers),
            update_tx,
        }
    }

    /// 갱신 구독
    pub fn subscribe(&self) -> broadcast::Receiver<ContainerUpdate> {
        self.update_tx.subscribe()
    }

    /// 컨테이너 현재 내용
    pub fn get(&self, id: ContainerId) -> Option<String> {
        self.containers.read().get(&id).cloned()
    }

    /// 전체 컨테이너 스냅샷
    pub fn snapshot(&self) -> BTreeMap<ContainerId, String> {
        self.containers.read().clone()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardView for Page {
    fn replace(&self, container: ContainerId, content: String) {
        self.containers.write().insert(container, content.clone());
        trace!("컨테이너 교체: {container}");

        // 구독자가 없으면 전송 실패는 무시
        let _ = self.update_tx.send(ContainerUpdate {
            id: container,
            html: content,
        });
    }
}
