//! 컨테이너 렌더러.
//!
//! 응답 페이로드(또는 에러 메시지)를 컨테이너 하나의 전체 내용으로 변환하는 순수 함수 모음.
//! 결과는 항상 기존 내용을 통째로 대체한다.

pub mod format;

use chrono::{DateTime, Utc};
use runify_core::config::DisplayConfig;
use runify_core::models::anomaly::{Anomaly, AnomalyCategory};
use runify_core::models::event::{EventKind, MusicEvent, RunningEvent, SampledEvent};
use runify_core::models::stats::StatsSnapshot;

use self::format::{escape_html, kilometers, minutes, text_or_na, TimestampFormatter};

/// 라벨이 붙은 한 줄
fn row(label: &str, value: &str) -> String {
    format!("<p><strong>{label}:</strong> {value}</p>")
}

/// 라벨 행들을 감싼 상세 블록
fn details(class: &str, rows: &[String]) -> String {
    format!("<div class=\"{class}\">\n{}\n</div>", rows.join("\n"))
}

/// 대시보드 렌더러
#[derive(Debug, Clone)]
pub struct Renderer {
    timestamps: TimestampFormatter,
}

impl Renderer {
    /// 표시 설정으로 렌더러 생성
    pub fn new(display: &DisplayConfig) -> Self {
        Self {
            timestamps: TimestampFormatter::new(display.zone, display.timestamp_format.clone()),
        }
    }

    /// 집계 통계 (다섯 줄)
    pub fn stats(&self, stats: &StatsSnapshot) -> String {
        let rows = [
            row(
                "Total Runs",
                &stats.num_running_stats.unwrap_or(0).to_string(),
            ),
            row(
                "Average Run Duration",
                &format!("{} minutes", minutes(stats.avg_run_duration)),
            ),
            row(
                "Max Run Distance",
                &format!("{} km", kilometers(stats.max_distance)),
            ),
            row("Total Songs", &stats.num_music_info.unwrap_or(0).to_string()),
            row(
                "Average Song Duration",
                &format!("{} minutes", minutes(stats.avg_song_duration)),
            ),
        ];
        rows.join("\n")
    }

    /// 샘플 이벤트 (종류별 분기)
    pub fn event(&self, event: &SampledEvent) -> String {
        match event {
            SampledEvent::Running(run) => self.running_event(run),
            SampledEvent::Music(song) => self.music_event(song),
        }
    }

    pub fn running_event(&self, run: &RunningEvent) -> String {
        details(
            "event-details",
            &[
                row("User ID", &text_or_na(run.user_id.as_deref())),
                row("Duration", &format!("{} minutes", minutes(run.duration))),
                row("Distance", &format!("{} km", kilometers(run.distance))),
                row("Time", &self.timestamps.format_raw(run.timestamp.as_deref())),
                row("Trace ID", &text_or_na(run.trace_id.as_deref())),
            ],
        )
    }

    pub fn music_event(&self, song: &MusicEvent) -> String {
        details(
            "event-details",
            &[
                row("User ID", &text_or_na(song.user_id.as_deref())),
                row("Song", &text_or_na(song.song_name.as_deref())),
                row("Artist", &text_or_na(song.artist.as_deref())),
                row(
                    "Duration",
                    &format!("{} minutes", minutes(song.song_duration)),
                ),
                row("Time", &self.timestamps.format_raw(song.timestamp.as_deref())),
                row("Trace ID", &text_or_na(song.trace_id.as_deref())),
            ],
        )
    }

    /// 샘플링할 이벤트가 없을 때 (통계 미수신 또는 개수 0)
    pub fn no_events(&self, kind: EventKind) -> String {
        format!("<p class=\"empty\">No {kind} events available</p>")
    }

    /// 카테고리별 최신 이상 탐지 한 건
    pub fn anomaly(&self, anomaly: &Anomaly) -> String {
        details(
            "anomaly-details",
            &[
                row("Type", &text_or_na(anomaly.anomaly_type.as_deref())),
                row("Event ID", &text_or_na(anomaly.event_id.as_deref())),
                row("Description", &text_or_na(anomaly.description.as_deref())),
                row(
                    "Detected",
                    &self.timestamps.format_raw(anomaly.timestamp.as_deref()),
                ),
                row("Trace ID", &text_or_na(anomaly.trace_id.as_deref())),
            ],
        )
    }

    /// 카테고리에 이상 탐지가 없을 때
    pub fn no_anomalies(&self, category: AnomalyCategory) -> String {
        format!(
            "<p class=\"empty\">No {} anomalies detected</p>",
            category.label()
        )
    }

    /// 조회/파싱 실패
    pub fn error(&self, message: &str) -> String {
        format!("<code>{}</code>", escape_html(message))
    }

    /// 마지막 갱신 시각 (스냅샷에 없으면 `now`)
    pub fn last_updated(&self, last_updated: Option<&str>, now: DateTime<Utc>) -> String {
        let shown = match last_updated {
            Some(raw) if !raw.is_empty() => self.timestamps.format_raw(Some(raw)),
            _ => escape_html(&self.timestamps.format(now)),
        };
        format!("Last updated: {shown}")
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&DisplayConfig::default())
    }
}
