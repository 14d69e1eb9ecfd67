//! Runify 핵심 에러 타입.
//!
//! 에러 메시지는 대시보드 컨테이너에 그대로 렌더링되므로
//! 사용자에게 보여줄 수 있는 짧은 문장으로 유지한다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 네트워크 에러 (연결 실패, 전송 중단)
    #[error("{0}")]
    Network(String),

    /// 2xx 가 아닌 응답 (이벤트/이상 탐지 엔드포인트)
    #[error("Status code {status}")]
    HttpStatus {
        /// HTTP 상태 코드
        status: u16,
    },

    /// 응답 본문 JSON 파싱 실패
    #[error("Invalid response: {0}")]
    Parse(String),

    /// 설정값 오류
    #[error("Configuration error: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("Invalid {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 내부 에러 (예상치 못한 상황)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_carries_only_the_code() {
        let err = CoreError::HttpStatus { status: 404 };
        assert_eq!(err.to_string(), "Status code 404");
    }

    #[test]
    fn config_error_converts() {
        let err: CoreError = config::ConfigError::Message("missing field".to_string()).into();
        assert!(matches!(err, CoreError::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn validation_message_names_field() {
        let err = CoreError::Validation {
            field: "endpoints.stats_url".to_string(),
            message: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("endpoints.stats_url"));
    }
}
