//! 대시보드 데이터 조회 포트.
//!
//! 구현: `runify-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::anomaly::AnomalyFeed;
use crate::models::event::{EventKind, SampledEvent};
use crate::models::stats::StatsSnapshot;

/// 폴링 엔드포인트 클라이언트
///
/// 모든 메서드는 한 번만 요청하며 재시도하지 않는다.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// 집계 통계 조회
    ///
    /// HTTP 상태 코드는 검사하지 않고 본문 파싱 결과만으로 성공 여부를 판단한다.
    async fn fetch_stats(&self) -> Result<StatsSnapshot, CoreError>;

    /// `index` 위치의 이벤트 하나 조회 (2xx가 아니면 에러)
    async fn fetch_event(&self, kind: EventKind, index: u64) -> Result<SampledEvent, CoreError>;

    /// 이상 탐지 목록 조회 (2xx가 아니면 에러)
    async fn fetch_anomalies(&self) -> Result<AnomalyFeed, CoreError>;
}
