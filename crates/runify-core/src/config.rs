//! 애플리케이션 설정 구조체.
//!
//! 폴링 대상 엔드포인트, 폴링 주기, 로컬 웹 서버, 표시 형식을 정의한다.
//! `config` crate를 통해 파일/환경변수에서 로드 (`config_manager` 참조).

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 폴링 대상 엔드포인트
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// 폴링 설정
    #[serde(default)]
    pub poll: PollConfig,
    /// 웹 대시보드 설정
    #[serde(default)]
    pub web: WebConfig,
    /// 표시 형식 설정
    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    /// 설정값 유효성 검증
    ///
    /// 엔드포인트 URL은 절대 http(s) URL이어야 하고, 폴링 주기는 0보다 커야 한다.
    pub fn validate(&self) -> Result<(), CoreError> {
        let urls = [
            ("endpoints.stats_url", &self.endpoints.stats_url),
            ("endpoints.running_url", &self.endpoints.running_url),
            ("endpoints.music_url", &self.endpoints.music_url),
            ("endpoints.anomalies_url", &self.endpoints.anomalies_url),
        ];

        for (field, raw) in urls {
            let parsed = url::Url::parse(raw).map_err(|e| CoreError::Validation {
                field: field.to_string(),
                message: format!("{raw}: {e}"),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(CoreError::Validation {
                    field: field.to_string(),
                    message: format!("unsupported scheme '{}'", parsed.scheme()),
                });
            }
        }

        if self.poll.interval_ms == 0 {
            return Err(CoreError::Validation {
                field: "poll.interval_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

// ============================================================
// 엔드포인트 설정
// ============================================================

/// 폴링 대상 엔드포인트 URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// 집계 통계 엔드포인트
    #[serde(default = "default_stats_url")]
    pub stats_url: String,
    /// running 이벤트 샘플 엔드포인트 (`?index=` 추가)
    #[serde(default = "default_running_url")]
    pub running_url: String,
    /// music 이벤트 샘플 엔드포인트 (`?index=` 추가)
    #[serde(default = "default_music_url")]
    pub music_url: String,
    /// 이상 탐지 목록 엔드포인트
    #[serde(default = "default_anomalies_url")]
    pub anomalies_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            stats_url: default_stats_url(),
            running_url: default_running_url(),
            music_url: default_music_url(),
            anomalies_url: default_anomalies_url(),
        }
    }
}

fn default_stats_url() -> String {
    "http://localhost:8100/stats".to_string()
}

fn default_running_url() -> String {
    "http://localhost:8110/running".to_string()
}

fn default_music_url() -> String {
    "http://localhost:8110/music".to_string()
}

fn default_anomalies_url() -> String {
    "http://localhost:8120/anomaly/anomalies".to_string()
}

// ============================================================
// 폴링 설정
// ============================================================

/// 폴링 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// 틱 간격 (밀리초)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// 요청 타임아웃 (밀리초, None이면 무제한)
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    /// 경고 로그를 남길 연속 실패 횟수
    #[serde(default = "default_failure_log_threshold")]
    pub failure_log_threshold: u64,
}

impl PollConfig {
    /// 틱 간격
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// 요청 타임아웃
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            request_timeout_ms: None,
            failure_log_threshold: default_failure_log_threshold(),
        }
    }
}

fn default_interval_ms() -> u64 {
    3_000
}

fn default_failure_log_threshold() -> u64 {
    3
}

// ============================================================
// 웹 대시보드 설정
// ============================================================

/// 웹 대시보드 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 웹 대시보드 활성화 여부
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 웹 서버 포트 (기본: 8080)
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접근 허용 여부 (false: 127.0.0.1 only)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_web_port(),
            allow_external: false,
        }
    }
}

fn default_web_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

// ============================================================
// 표시 형식 설정
// ============================================================

/// 타임스탬프 표시 시간대
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayZone {
    /// 시스템 로컬 시간대
    #[default]
    Local,
    /// UTC
    Utc,
}

/// 표시 형식 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// 타임스탬프 표시 시간대
    #[serde(default)]
    pub zone: DisplayZone,
    /// strftime 패턴 (기본값은 en-US 로케일 표기)
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            zone: DisplayZone::Local,
            timestamp_format: default_timestamp_format(),
        }
    }
}

fn default_timestamp_format() -> String {
    "%-m/%-d/%Y, %-I:%M:%S %p".to_string()
}
