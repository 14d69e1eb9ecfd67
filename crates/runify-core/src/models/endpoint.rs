//! 폴링 엔드포인트 식별자 (진단 로그용).

/// 폴링 엔드포인트
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// 집계 통계
    Stats,
    /// running 이벤트 샘플
    RunningEvents,
    /// music 이벤트 샘플
    MusicEvents,
    /// 이상 탐지 목록
    Anomalies,
}

impl Endpoint {
    /// 전체 엔드포인트
    pub const ALL: [Endpoint; 4] = [
        Endpoint::Stats,
        Endpoint::RunningEvents,
        Endpoint::MusicEvents,
        Endpoint::Anomalies,
    ];

    /// 고정 배열 인덱스
    pub fn index(self) -> usize {
        match self {
            Endpoint::Stats => 0,
            Endpoint::RunningEvents => 1,
            Endpoint::MusicEvents => 2,
            Endpoint::Anomalies => 3,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Stats => write!(f, "stats"),
            Endpoint::RunningEvents => write!(f, "running-events"),
            Endpoint::MusicEvents => write!(f, "music-events"),
            Endpoint::Anomalies => write!(f, "anomalies"),
        }
    }
}
