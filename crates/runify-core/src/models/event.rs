//! 샘플링된 이벤트 모델.
//!
//! 이벤트 엔드포인트는 `?index=` 위치의 레코드 하나를 반환한다.
//! 레코드는 조회와 렌더링 사이에만 존재한다.

use serde::{Deserialize, Serialize};

use super::container::ContainerId;
use super::endpoint::Endpoint;
use super::lenient;

/// 이벤트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// 달리기 기록
    Running,
    /// 재생 곡 정보
    Music,
}

impl EventKind {
    /// 전체 이벤트 종류
    pub const ALL: [EventKind; 2] = [EventKind::Running, EventKind::Music];

    /// 렌더링 대상 컨테이너
    pub fn container(self) -> ContainerId {
        match self {
            EventKind::Running => ContainerId::EventRunning,
            EventKind::Music => ContainerId::EventMusic,
        }
    }

    /// 조회 엔드포인트
    pub fn endpoint(self) -> Endpoint {
        match self {
            EventKind::Running => Endpoint::RunningEvents,
            EventKind::Music => Endpoint::MusicEvents,
        }
    }

    /// 표시용 이름
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Running => "running",
            EventKind::Music => "music",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// running 이벤트 레코드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningEvent {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub user_id: Option<String>,
    /// 달리기 시간 (초)
    #[serde(default)]
    pub duration: Option<f64>,
    /// 달리기 거리 (미터)
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub trace_id: Option<String>,
}

/// music 이벤트 레코드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MusicEvent {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub song_name: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    /// 곡 길이 (초)
    #[serde(default)]
    pub song_duration: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub trace_id: Option<String>,
}

/// 종류별로 디코딩된 샘플 이벤트
#[derive(Debug, Clone, PartialEq)]
pub enum SampledEvent {
    Running(RunningEvent),
    Music(MusicEvent),
}

impl SampledEvent {
    /// 종류에 맞는 구조체로 JSON 디코딩
    pub fn from_json(kind: EventKind, body: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            EventKind::Running => SampledEvent::Running(serde_json::from_slice(body)?),
            EventKind::Music => SampledEvent::Music(serde_json::from_slice(body)?),
        })
    }

    /// 이벤트 종류
    pub fn kind(&self) -> EventKind {
        match self {
            SampledEvent::Running(_) => EventKind::Running,
            SampledEvent::Music(_) => EventKind::Music,
        }
    }
}
