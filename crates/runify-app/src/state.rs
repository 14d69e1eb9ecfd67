//! 최신 통계 스냅샷 보관소.
//!
//! 통계 조회 성공 시에만 통째로 교체된다. 이벤트 샘플링 태스크는
//! 교체 시점과 무관하게 마지막으로 저장된 스냅샷 전체를 읽는다.

use parking_lot::RwLock;
use runify_core::models::event::EventKind;
use runify_core::models::stats::StatsSnapshot;
use std::sync::Arc;

/// 폴러가 소유하고 이벤트 태스크에 넘기는 스냅샷 셀
#[derive(Debug, Clone, Default)]
pub struct LatestStats {
    inner: Arc<RwLock<Option<Arc<StatsSnapshot>>>>,
}

impl LatestStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 스냅샷 교체, 저장된 값을 반환
    pub fn replace(&self, stats: StatsSnapshot) -> Arc<StatsSnapshot> {
        let stats = Arc::new(stats);
        *self.inner.write() = Some(stats.clone());
        stats
    }

    /// 현재 스냅샷 (아직 수신 전이면 None)
    pub fn current(&self) -> Option<Arc<StatsSnapshot>> {
        self.inner.read().clone()
    }

    /// 샘플 인덱스 상한 (스냅샷이 없으면 0)
    pub fn max_index(&self, kind: EventKind) -> u64 {
        self.inner
            .read()
            .as_ref()
            .map(|stats| stats.count_for(kind))
            .unwrap_or(0)
    }
}
