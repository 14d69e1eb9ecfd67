//! # runify-app
//!
//! 폴링 스케줄러와 라이프사이클. 바이너리(`runify-dashboard`)가 와이어링하고,
//! 통합 테스트가 같은 구성요소를 직접 사용한다.

pub mod lifecycle;
pub mod poller;
pub mod state;
