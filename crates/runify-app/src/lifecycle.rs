//! 종료 처리.
//!
//! 장기 실행 태스크(폴러, 웹 서버)를 이름과 함께 등록하고, 종료 신호를
//! watch 채널로 전파한 뒤 유예 시간 안에 합류시킨다.

use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// 종료 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / Ctrl+C
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Interrupt => write!(f, "interrupt"),
            ShutdownReason::Terminate => write!(f, "terminate"),
        }
    }
}

/// 태스크 합류 결과
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JoinReport {
    /// 정상 종료
    pub finished: usize,
    /// 패닉 또는 취소
    pub failed: usize,
    /// 유예 시간 초과로 강제 중단
    pub aborted: usize,
}

/// 종료 신호와 등록 태스크 관리
pub struct Lifecycle {
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            shutdown_tx,
            tasks: Vec::new(),
        }
    }

    /// 종료 수신기
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// 종료 수신기를 넘겨 태스크를 spawn하고 합류 대상으로 등록
    pub fn spawn<F, Fut>(&mut self, name: &'static str, task: F)
    where
        F: FnOnce(watch::Receiver<bool>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task(self.subscribe()));
        debug!("태스크 등록: {name}");
        self.tasks.push((name, handle));
    }

    /// 모든 수신기에 종료 신호 전파
    pub fn shutdown(&self, reason: ShutdownReason) {
        info!("종료 신호 발송 ({reason})");
        self.shutdown_tx.send_replace(true);
    }

    /// 등록 태스크 합류. `grace` 안에 끝나지 않은 태스크는 중단한다.
    pub async fn join(self, grace: Duration) -> JoinReport {
        let deadline = tokio::time::Instant::now() + grace;
        let mut report = JoinReport::default();

        for (name, mut handle) in self.tasks {
            match tokio::time::timeout_at(deadline, &mut handle).await {
                Ok(Ok(())) => report.finished += 1,
                Ok(Err(e)) => {
                    error!("{name} 태스크 비정상 종료: {e}");
                    report.failed += 1;
                }
                Err(_) => {
                    warn!("{name} 태스크가 {}ms 안에 끝나지 않아 중단", grace.as_millis());
                    handle.abort();
                    report.aborted += 1;
                }
            }
        }
        report
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// OS 종료 시그널 대기
pub async fn wait_for_signal() -> std::io::Result<ShutdownReason> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        let reason = tokio::select! {
            _ = sigint.recv() => ShutdownReason::Interrupt,
            _ = sigterm.recv() => ShutdownReason::Terminate,
        };
        Ok(reason)
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(ShutdownReason::Interrupt)
    }
}
