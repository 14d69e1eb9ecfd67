//! 이상 탐지 모델.
//!
//! 이상 탐지 엔드포인트는 "이상 없음" 메시지 객체 또는 두 카테고리가 섞인 목록을 반환한다.
//! 카테고리별로 가장 최근 항목 하나만 표시에 사용하고 나머지는 버린다.

use serde::{Deserialize, Serialize};

use super::container::ContainerId;
use super::lenient;
use super::timestamp;

/// 이상 탐지 카테고리 (`event_type` 태그)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyCategory {
    /// running 이벤트 이상
    RunningStats,
    /// music 이벤트 이상
    MusicInfo,
    /// 알 수 없는 태그 (표시하지 않음)
    #[default]
    #[serde(other)]
    Other,
}

impl AnomalyCategory {
    /// 표시 대상 카테고리
    pub const DISPLAYED: [AnomalyCategory; 2] =
        [AnomalyCategory::RunningStats, AnomalyCategory::MusicInfo];

    /// 렌더링 대상 컨테이너 (`Other`는 없음)
    pub fn container(self) -> Option<ContainerId> {
        match self {
            AnomalyCategory::RunningStats => Some(ContainerId::RunningAnomalies),
            AnomalyCategory::MusicInfo => Some(ContainerId::MusicAnomalies),
            AnomalyCategory::Other => None,
        }
    }

    /// 표시용 이름
    pub fn label(self) -> &'static str {
        match self {
            AnomalyCategory::RunningStats => "running",
            AnomalyCategory::MusicInfo => "music",
            AnomalyCategory::Other => "other",
        }
    }
}

/// 이상 탐지 레코드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(default)]
    pub event_type: AnomalyCategory,
    /// 예: `LongRun`, `ShortSong`
    #[serde(default)]
    pub anomaly_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub event_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub trace_id: Option<String>,
}

/// 이상 탐지 엔드포인트 응답
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AnomalyFeed {
    /// 이상 탐지 목록 (카테고리 혼합)
    List(Vec<Anomaly>),
    /// "이상 없음" 메시지 객체
    Empty { message: String },
}

/// 카테고리별 최신 이상 탐지
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestAnomalies {
    pub running: Option<Anomaly>,
    pub music: Option<Anomaly>,
}

impl LatestAnomalies {
    /// 카테고리별 최신 항목
    pub fn get(&self, category: AnomalyCategory) -> Option<&Anomaly> {
        match category {
            AnomalyCategory::RunningStats => self.running.as_ref(),
            AnomalyCategory::MusicInfo => self.music.as_ref(),
            AnomalyCategory::Other => None,
        }
    }
}

impl AnomalyFeed {
    /// 카테고리로 나누고 타임스탬프 내림차순 정렬 후 첫 항목만 남긴다.
    ///
    /// 파싱할 수 없는 타임스탬프는 가장 오래된 것으로 취급한다.
    pub fn latest_per_category(self) -> LatestAnomalies {
        let list = match self {
            AnomalyFeed::List(list) => list,
            AnomalyFeed::Empty { .. } => return LatestAnomalies::default(),
        };

        let (mut running, mut music): (Vec<Anomaly>, Vec<Anomaly>) = (Vec::new(), Vec::new());
        for anomaly in list {
            match anomaly.event_type {
                AnomalyCategory::RunningStats => running.push(anomaly),
                AnomalyCategory::MusicInfo => music.push(anomaly),
                AnomalyCategory::Other => {}
            }
        }

        LatestAnomalies {
            running: most_recent(running),
            music: most_recent(music),
        }
    }

    /// 목록 길이 (메시지 객체는 0)
    pub fn len(&self) -> usize {
        match self {
            AnomalyFeed::List(list) => list.len(),
            AnomalyFeed::Empty { .. } => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn most_recent(mut partition: Vec<Anomaly>) -> Option<Anomaly> {
    partition.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));
    partition.into_iter().next()
}

fn sort_key(anomaly: &Anomaly) -> (Option<chrono::DateTime<chrono::Utc>>, &str) {
    let raw = anomaly.timestamp.as_deref().unwrap_or("");
    (timestamp::parse(raw), raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anomaly(category: AnomalyCategory, ts: &str, kind: &str) -> Anomaly {
        Anomaly {
            event_type: category,
            anomaly_type: Some(kind.to_string()),
            timestamp: Some(ts.to_string()),
            ..Anomaly::default()
        }
    }

    #[test]
    fn sentinel_decodes_as_empty() {
        let feed: AnomalyFeed = serde_json::from_str(r#"{"message": "no anomalies"}"#).unwrap();
        assert!(feed.is_empty());
        assert_eq!(feed.latest_per_category(), LatestAnomalies::default());
    }

    #[test]
    fn object_without_message_is_rejected() {
        let result =
            serde_json::from_str::<AnomalyFeed>(r#"{"error": "database unavailable", "status": 500}"#);
        assert!(result.is_err());
        assert!(serde_json::from_str::<AnomalyFeed>("{}").is_err());
    }

    #[test]
    fn list_decodes_with_unknown_tag() {
        let json = r#"[
            {"event_type": "running_stats", "anomaly_type": "LongRun", "event_id": "u1",
             "description": "too far", "timestamp": "2024-01-01T00:00:00Z", "trace_id": "t1"},
            {"event_type": "heart_rate", "anomaly_type": "High", "timestamp": "2024-01-02T00:00:00Z"}
        ]"#;
        let feed: AnomalyFeed = serde_json::from_str(json).unwrap();
        assert_eq!(feed.len(), 2);
        let latest = feed.latest_per_category();
        assert_eq!(latest.running.unwrap().event_id.as_deref(), Some("u1"));
        assert!(latest.music.is_none());
    }

    #[test]
    fn newest_per_category_wins() {
        let feed = AnomalyFeed::List(vec![
            anomaly(AnomalyCategory::RunningStats, "2024-01-01T00:00:00Z", "January"),
            anomaly(AnomalyCategory::MusicInfo, "2023-12-31T23:59:59Z", "LongSong"),
            anomaly(AnomalyCategory::RunningStats, "2024-02-01T00:00:00Z", "February"),
        ]);

        let latest = feed.latest_per_category();
        assert_eq!(
            latest.get(AnomalyCategory::RunningStats).unwrap().anomaly_type.as_deref(),
            Some("February")
        );
        assert_eq!(
            latest.get(AnomalyCategory::MusicInfo).unwrap().anomaly_type.as_deref(),
            Some("LongSong")
        );
    }

    #[test]
    fn mixed_offsets_compare_by_instant() {
        let feed = AnomalyFeed::List(vec![
            anomaly(AnomalyCategory::MusicInfo, "2024-05-01T10:00:00+09:00", "earlier"),
            anomaly(AnomalyCategory::MusicInfo, "2024-05-01T02:00:00Z", "later"),
        ]);
        let latest = feed.latest_per_category();
        assert_eq!(latest.music.unwrap().anomaly_type.as_deref(), Some("later"));
    }

    #[test]
    fn unparseable_timestamp_sorts_last() {
        let feed = AnomalyFeed::List(vec![
            anomaly(AnomalyCategory::RunningStats, "yesterday", "garbled"),
            anomaly(AnomalyCategory::RunningStats, "2020-01-01T00:00:00Z", "old"),
        ]);
        let latest = feed.latest_per_category();
        assert_eq!(latest.running.unwrap().anomaly_type.as_deref(), Some("old"));
    }

    #[test]
    fn other_category_has_no_container() {
        assert_eq!(AnomalyCategory::Other.container(), None);
        assert_eq!(
            AnomalyCategory::MusicInfo.container(),
            Some(ContainerId::MusicAnomalies)
        );
    }
}
