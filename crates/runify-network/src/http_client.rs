//! 대시보드 HTTP 클라이언트.
//!
//! `DashboardApi` 포트 구현. 요청당 한 번만 시도하며 재시도하지 않는다.

use async_trait::async_trait;
use runify_core::config::EndpointsConfig;
use runify_core::error::CoreError;
use runify_core::models::anomaly::AnomalyFeed;
use runify_core::models::event::{EventKind, SampledEvent};
use runify_core::models::stats::StatsSnapshot;
use runify_core::ports::dashboard_api::DashboardApi;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// 파싱된 엔드포인트 URL 묶음
#[derive(Debug, Clone)]
struct EndpointUrls {
    stats: Url,
    running: Url,
    music: Url,
    anomalies: Url,
}

impl EndpointUrls {
    fn parse(config: &EndpointsConfig) -> Result<Self, CoreError> {
        let parse = |field: &str, raw: &str| {
            Url::parse(raw).map_err(|e| CoreError::Validation {
                field: field.to_string(),
                message: format!("{raw}: {e}"),
            })
        };

        Ok(Self {
            stats: parse("endpoints.stats_url", &config.stats_url)?,
            running: parse("endpoints.running_url", &config.running_url)?,
            music: parse("endpoints.music_url", &config.music_url)?,
            anomalies: parse("endpoints.anomalies_url", &config.anomalies_url)?,
        })
    }
}

/// 대시보드 REST 클라이언트 (`DashboardApi` 포트 구현)
pub struct HttpDashboardClient {
    client: reqwest::Client,
    urls: EndpointUrls,
}

impl HttpDashboardClient {
    /// 새 클라이언트 생성
    ///
    /// `timeout`이 None이면 요청 타임아웃을 두지 않는다.
    pub fn new(endpoints: &EndpointsConfig, timeout: Option<Duration>) -> Result<Self, CoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CoreError::Internal(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            client,
            urls: EndpointUrls::parse(endpoints)?,
        })
    }

    /// 이벤트 종류별 샘플 URL (`?index=` 포함)
    fn event_url(&self, kind: EventKind, index: u64) -> Url {
        let mut url = match kind {
            EventKind::Running => self.urls.running.clone(),
            EventKind::Music => self.urls.music.clone(),
        };
        url.query_pairs_mut().append_pair("index", &index.to_string());
        url
    }

    /// GET 요청 전송
    async fn get(&self, url: Url) -> Result<reqwest::Response, CoreError> {
        debug!("GET {url}");
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| CoreError::Network(describe(&e)))
    }
}

/// 2xx가 아니면 상태 코드만 담은 에러로 변환 (본문은 버린다)
fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, CoreError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(CoreError::HttpStatus {
            status: status.as_u16(),
        })
    }
}

/// 응답 본문을 JSON으로 디코딩
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, CoreError> {
    let body = resp
        .bytes()
        .await
        .map_err(|e| CoreError::Network(describe(&e)))?;
    serde_json::from_slice(&body).map_err(|e| CoreError::Parse(e.to_string()))
}

/// reqwest 에러와 원인 체인을 한 줄로 요약
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl DashboardApi for HttpDashboardClient {
    async fn fetch_stats(&self) -> Result<StatsSnapshot, CoreError> {
        let resp = self.get(self.urls.stats.clone()).await?;
        let stats: StatsSnapshot = read_json(resp).await?;
        debug!(
            "통계 수신: runs={:?}, songs={:?}, max_duration={:?}",
            stats.num_running_stats, stats.num_music_info, stats.max_duration
        );
        Ok(stats)
    }

    async fn fetch_event(&self, kind: EventKind, index: u64) -> Result<SampledEvent, CoreError> {
        let resp = check_status(self.get(self.event_url(kind, index)).await?)?;
        let body = resp
            .bytes()
            .await
            .map_err(|e| CoreError::Network(describe(&e)))?;
        let event =
            SampledEvent::from_json(kind, &body).map_err(|e| CoreError::Parse(e.to_string()))?;
        debug!("{kind} 이벤트 수신: index={index}");
        Ok(event)
    }

    async fn fetch_anomalies(&self) -> Result<AnomalyFeed, CoreError> {
        let resp = check_status(self.get(self.urls.anomalies.clone()).await?)?;
        let feed: AnomalyFeed = read_json(resp).await?;
        debug!("이상 탐지 수신: {}건", feed.len());
        Ok(feed)
    }
}
