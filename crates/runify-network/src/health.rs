//! 엔드포인트 상태 추적.
//!
//! 엔드포인트별 연속 실패 횟수를 세고, 임계값 도달과 복구를 한 번씩만 로그로 남긴다.
//! 진단 전용이며 폴링 동작에는 영향을 주지 않는다.

use runify_core::error::CoreError;
use runify_core::models::endpoint::Endpoint;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 엔드포인트 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointStatus {
    /// 마지막 요청 성공
    Healthy,
    /// 실패 중이지만 임계값 미만
    Degraded,
    /// 임계값 이상 연속 실패
    Down,
}

impl std::fmt::Display for EndpointStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointStatus::Healthy => write!(f, "Healthy"),
            EndpointStatus::Degraded => write!(f, "Degraded"),
            EndpointStatus::Down => write!(f, "Down"),
        }
    }
}

/// 엔드포인트별 연속 실패 카운터
pub struct EndpointHealth {
    /// `Endpoint::index()` 순서의 연속 실패 횟수 (lock-free)
    failures: [AtomicU64; 4],
    /// 경고 임계값 (연속 실패 횟수)
    threshold: u64,
}

impl EndpointHealth {
    /// 새 상태 추적기 생성
    ///
    /// `threshold`: 이 횟수만큼 연속 실패하면 경고 (0은 1로 취급)
    pub fn new(threshold: u64) -> Self {
        Self {
            failures: Default::default(),
            threshold: threshold.max(1),
        }
    }

    /// 요청 성공 기록
    ///
    /// 임계값을 넘겼던 엔드포인트라면 복구 로그를 남긴다.
    pub fn record_success(&self, endpoint: Endpoint) {
        let previous = self.failures[endpoint.index()].swap(0, Ordering::Relaxed);
        if previous >= self.threshold {
            info!("{endpoint} 엔드포인트 복구됨 (연속 실패 {previous}회 후)");
        }
    }

    /// 요청 실패 기록
    ///
    /// 임계값에 정확히 도달한 순간에만 경고한다.
    pub fn record_failure(&self, endpoint: Endpoint, error: &CoreError) {
        let count = self.failures[endpoint.index()].fetch_add(1, Ordering::Relaxed) + 1;
        if count == self.threshold {
            warn!("{endpoint} 엔드포인트 연속 {count}회 실패: {error}");
        } else {
            debug!("{endpoint} 엔드포인트 실패 (연속 {count}회): {error}");
        }
    }

    /// 연속 실패 횟수
    pub fn failure_count(&self, endpoint: Endpoint) -> u64 {
        self.failures[endpoint.index()].load(Ordering::Relaxed)
    }

    /// 현재 상태
    pub fn status(&self, endpoint: Endpoint) -> EndpointStatus {
        match self.failure_count(endpoint) {
            0 => EndpointStatus::Healthy,
            n if n < self.threshold => EndpointStatus::Degraded,
            _ => EndpointStatus::Down,
        }
    }
}

impl Default for EndpointHealth {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Arc로 감싼 EndpointHealth
pub type SharedEndpointHealth = Arc<EndpointHealth>;
