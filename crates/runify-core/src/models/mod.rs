//! Runify 도메인 모델.
//!
//! 폴링 엔드포인트가 반환하는 JSON 응답 구조체와 대시보드 컨테이너 식별자를 정의한다.
//! 모든 응답 필드는 누락/null 가능성을 `Option`으로 표현한다.

pub mod anomaly;
pub mod container;
pub mod endpoint;
pub mod event;
pub mod stats;
pub mod timestamp;

mod lenient;
