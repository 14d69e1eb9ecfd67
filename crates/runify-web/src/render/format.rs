//! 표시 값 포맷 헬퍼.
//!
//! 누락/0 값은 계산하지 않고 `N/A`로 표시한다.

use chrono::{DateTime, Local, Utc};
use runify_core::config::DisplayZone;
use std::fmt::Write;

/// 값이 없을 때 표시할 라벨
pub const NOT_AVAILABLE: &str = "N/A";

/// HTML 특수문자 이스케이프
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// 텍스트 필드 (비어 있으면 N/A), 이스케이프 포함
pub fn text_or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => escape_html(v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// `value / divisor`를 소수점 둘째 자리까지 (값이 없거나 0이면 N/A)
pub fn scaled(value: Option<f64>, divisor: f64) -> String {
    match value {
        Some(v) if v != 0.0 && v.is_finite() => format!("{:.2}", v / divisor),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// 초 → 분
pub fn minutes(seconds: Option<f64>) -> String {
    scaled(seconds, 60.0)
}

/// 미터 → 킬로미터
pub fn kilometers(meters: Option<f64>) -> String {
    scaled(meters, 1000.0)
}

/// 로케일 표기 타임스탬프 포맷터
#[derive(Debug, Clone)]
pub struct TimestampFormatter {
    zone: DisplayZone,
    pattern: String,
}

impl TimestampFormatter {
    pub fn new(zone: DisplayZone, pattern: impl Into<String>) -> Self {
        Self {
            zone,
            pattern: pattern.into(),
        }
    }

    /// 시각을 설정된 시간대/패턴으로 표시
    ///
    /// 패턴이 잘못되었으면 RFC3339로 대신 표시한다.
    pub fn format(&self, instant: DateTime<Utc>) -> String {
        let mut out = String::new();
        let written = match self.zone {
            DisplayZone::Local => write!(
                out,
                "{}",
                instant.with_timezone(&Local).format(&self.pattern)
            ),
            DisplayZone::Utc => write!(out, "{}", instant.format(&self.pattern)),
        };

        if written.is_err() {
            return match self.zone {
                DisplayZone::Local => instant.with_timezone(&Local).to_rfc3339(),
                DisplayZone::Utc => instant.to_rfc3339(),
            };
        }
        out
    }

    /// 문자열 타임스탬프 표시 (없으면 N/A, 파싱 실패 시 원문)
    pub fn format_raw(&self, raw: Option<&str>) -> String {
        match raw {
            Some(r) if !r.is_empty() => match runify_core::models::timestamp::parse(r) {
                Some(instant) => escape_html(&self.format(instant)),
                None => escape_html(r),
            },
            _ => NOT_AVAILABLE.to_string(),
        }
    }
}
