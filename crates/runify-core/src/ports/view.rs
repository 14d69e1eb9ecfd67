//! 렌더링 출력 포트.
//!
//! 구현: `runify-web::page::Page`

use crate::models::container::ContainerId;

/// 컨테이너 내용을 통째로 교체하는 출력 대상
pub trait DashboardView: Send + Sync {
    /// 컨테이너의 기존 내용을 버리고 `content`로 교체
    fn replace(&self, container: ContainerId, content: String);
}
