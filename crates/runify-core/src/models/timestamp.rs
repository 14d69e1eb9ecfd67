//! 타임스탬프 파싱.
//!
//! 업스트림 서비스는 RFC3339(`2024-01-01T00:00:00Z`)와 시간대 없는 ISO 형식을 섞어 보낸다.
//! 시간대가 없으면 UTC로 간주한다.

use chrono::{DateTime, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// 문자열 타임스탬프 파싱 (실패 시 None)
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
