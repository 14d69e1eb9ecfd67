//! SSE 실시간 스트림 핸들러.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::page::{ContainerUpdate, Page};
use crate::AppState;

/// SSE 이벤트 이름
const CONTAINER_EVENT: &str = "container";

/// 현재 스냅샷에 이어 실시간 갱신을 내보내는 스트림
///
/// 구독을 먼저 열고 스냅샷을 읽어 그 사이의 갱신이 빠지지 않게 한다.
pub fn container_updates(page: &Page) -> impl Stream<Item = ContainerUpdate> {
    let rx = page.subscribe();
    let initial: Vec<ContainerUpdate> = page
        .snapshot()
        .into_iter()
        .map(|(id, html)| ContainerUpdate { id, html })
        .collect();

    // 채널 지연(Lagged) 시 스킵, 다음 틱에서 다시 채워진다
    let live = BroadcastStream::new(rx).filter_map(|result| result.ok());
    tokio_stream::iter(initial).chain(live)
}

/// SSE 스트림 엔드포인트
///
/// GET /api/stream
///
/// 컨테이너 교체를 `container` 이벤트로 전송.
/// 클라이언트는 EventSource API로 수신해 해당 요소의 innerHTML을 교체한다.
pub async fn container_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let sse_stream = container_updates(&state.page).filter_map(|update| {
        let json = serde_json::to_string(&update).ok()?;
        Some(Ok(Event::default().event(CONTAINER_EVENT).data(json)))
    });

    Sse::new(sse_stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
