//! 집계 통계 스냅샷.

use serde::{Deserialize, Serialize};

use super::event::EventKind;
use super::lenient;

/// 통계 엔드포인트가 반환하는 집계 스냅샷
///
/// 매 폴링마다 통째로 교체되며 필드 단위로 병합하지 않는다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// 누적 running 이벤트 수
    #[serde(default, deserialize_with = "lenient::opt_count")]
    pub num_running_stats: Option<u64>,
    /// 누적 music 이벤트 수
    #[serde(default, deserialize_with = "lenient::opt_count")]
    pub num_music_info: Option<u64>,
    /// 평균 달리기 시간 (초)
    #[serde(default)]
    pub avg_run_duration: Option<f64>,
    /// 평균 곡 길이 (초)
    #[serde(default)]
    pub avg_song_duration: Option<f64>,
    /// 최대 달리기 거리 (미터)
    #[serde(default)]
    pub max_distance: Option<f64>,
    /// 최대 달리기 시간 (초)
    #[serde(default, alias = "max_run_duration")]
    pub max_duration: Option<f64>,
    /// 마지막 집계 시각
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl StatsSnapshot {
    /// 이벤트 종류별 누적 개수 (샘플 인덱스 상한)
    pub fn count_for(&self, kind: EventKind) -> u64 {
        match kind {
            EventKind::Running => self.num_running_stats,
            EventKind::Music => self.num_music_info,
        }
        .unwrap_or(0)
    }
}
