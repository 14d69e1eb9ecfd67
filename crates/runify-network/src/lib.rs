//! # runify-network
//!
//! 대시보드 폴링 엔드포인트 HTTP 어댑터.
//! `DashboardApi` 포트를 reqwest로 구현하고, 엔드포인트별 연속 실패를 진단 로그로 남긴다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use runify_network::http_client::HttpDashboardClient;
//! use runify_network::health::EndpointHealth;
//! ```

pub mod health;
pub mod http_client;
