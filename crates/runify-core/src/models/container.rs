//! 대시보드 컨테이너 식별자.
//!
//! 호스트 페이지에 반드시 존재해야 하는 고정 요소 id 목록이다.

use serde::{Deserialize, Serialize};

/// 렌더링 대상 컨테이너
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerId {
    /// 집계 통계
    Stats,
    /// 샘플링된 running 이벤트
    EventRunning,
    /// 샘플링된 music 이벤트
    EventMusic,
    /// 최신 running 이상 탐지
    RunningAnomalies,
    /// 최신 music 이상 탐지
    MusicAnomalies,
    /// 마지막 갱신 시각
    LastUpdated,
}

impl ContainerId {
    /// 전체 컨테이너 (페이지 초기화 순서)
    pub const ALL: [ContainerId; 6] = [
        ContainerId::Stats,
        ContainerId::EventRunning,
        ContainerId::EventMusic,
        ContainerId::RunningAnomalies,
        ContainerId::MusicAnomalies,
        ContainerId::LastUpdated,
    ];

    /// DOM 요소 id
    pub fn dom_id(self) -> &'static str {
        match self {
            ContainerId::Stats => "stats",
            ContainerId::EventRunning => "event-running",
            ContainerId::EventMusic => "event-music",
            ContainerId::RunningAnomalies => "running-anomalies",
            ContainerId::MusicAnomalies => "music-anomalies",
            ContainerId::LastUpdated => "last-updated",
        }
    }

    /// DOM 요소 id로 조회
    pub fn from_dom_id(dom_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.dom_id() == dom_id)
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dom_id())
    }
}
