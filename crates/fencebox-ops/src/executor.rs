//! Request dispatcher with unified event streaming.

use std::sync::Arc;

use fencebox_analyze::{AnalyzeConfig, FolderAnalyzer};
use fencebox_core::{OpError, ProgressSink, SandboxConfig};
use tokio::sync::mpsc;

use crate::progress::{ChannelSink, OperationEvent};
use crate::request::{FolderRequest, OperationReply};
use crate::{delete_file, read_file, write_file, OPERATION_CHANNEL_SIZE};

/// Dispatches requests against a shared sandbox configuration.
///
/// Each dispatched request is an independent unit of work: the executor
/// holds no per-call state, imposes no ordering between calls, and a
/// failure in one call never affects another. Concurrent requests against
/// the same path race at the filesystem level.
#[derive(Debug, Clone)]
pub struct Executor {
    config: Arc<SandboxConfig>,
    analyze: AnalyzeConfig,
}

impl Executor {
    /// Create an executor over a sandbox.
    pub fn new(config: Arc<SandboxConfig>) -> Self {
        Self {
            config,
            analyze: AnalyzeConfig::default(),
        }
    }

    /// Override the analysis settings.
    pub fn with_analyze_config(mut self, analyze: AnalyzeConfig) -> Self {
        self.analyze = analyze;
        self
    }

    /// The sandbox this executor operates in.
    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Run a request to completion on the calling thread, reporting
    /// progress through the given sink.
    pub fn execute(
        &self,
        request: FolderRequest,
        sink: &dyn ProgressSink,
    ) -> Result<OperationReply, OpError> {
        match request {
            FolderRequest::FileRead { path } => {
                read_file(&self.config, &path, sink)
                    .map(|content| OperationReply::FileRead { path, content })
            }
            FolderRequest::FileWrite { path, content } => {
                write_file(&self.config, &path, content.as_deref(), sink).map(|()| {
                    OperationReply::FileWritten {
                        path,
                        message: "File written successfully".to_string(),
                    }
                })
            }
            FolderRequest::FileDelete { path } => {
                delete_file(&self.config, &path, sink).map(|()| OperationReply::FileDeleted {
                    path,
                    message: "File deleted successfully".to_string(),
                })
            }
            FolderRequest::FolderAnalysis { path } => {
                let analyzer = FolderAnalyzer::with_config(self.analyze.clone());
                analyzer
                    .analyze(&self.config, &path, sink)
                    .map(|analysis| OperationReply::FolderAnalysis { path, analysis })
            }
        }
    }

    /// Run a request on the blocking pool and stream its events.
    ///
    /// Progress and log events arrive best-effort (dropped when the
    /// receiver lags); the final [`OperationEvent::Complete`] carries the
    /// result and is always delivered unless the receiver is gone.
    pub fn dispatch(&self, request: FolderRequest) -> mpsc::Receiver<OperationEvent> {
        let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);
        let executor = self.clone();

        tokio::task::spawn_blocking(move || {
            let sink = ChannelSink::new(tx.clone());
            let outcome = executor.execute(request, &sink);
            let _ = tx.blocking_send(OperationEvent::Complete(outcome.map_err(Into::into)));
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fencebox_core::ErrorKind;
    use tempfile::TempDir;

    fn executor() -> (TempDir, Executor) {
        let temp = TempDir::new().unwrap();
        let config = SandboxConfig::open(temp.path(), 1024).unwrap();
        (temp, Executor::new(Arc::new(config)))
    }

    async fn collect(mut rx: mpsc::Receiver<OperationEvent>) -> Vec<OperationEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_dispatch_streams_progress_then_complete() {
        let (_temp, executor) = executor();
        std::fs::write(executor.config().root().join("a.txt"), "hello").unwrap();

        let events = collect(executor.dispatch(FolderRequest::read("a.txt"))).await;

        let last = events.last().unwrap();
        match last {
            OperationEvent::Complete(Ok(OperationReply::FileRead { path, content })) => {
                assert_eq!(path, "a.txt");
                assert_eq!(content, "hello");
            }
            other => panic!("expected successful read completion, got {other:?}"),
        }

        let ticks: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                OperationEvent::Progress { current, total } => Some((*current, *total)),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![(50, 100), (100, 100)]);
    }

    #[tokio::test]
    async fn test_dispatch_reports_typed_failure() {
        let (_temp, executor) = executor();

        let events = collect(executor.dispatch(FolderRequest::read("../etc/passwd"))).await;

        match events.last().unwrap() {
            OperationEvent::Complete(Err(failure)) => {
                assert_eq!(failure.kind, ErrorKind::PathViolation);
            }
            other => panic!("expected failure completion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_concurrent_dispatches_are_independent() {
        let (_temp, executor) = executor();

        let rx_a = executor.dispatch(FolderRequest::write("a.txt", "aaa"));
        let rx_b = executor.dispatch(FolderRequest::write("b.txt", "bbb"));
        let (events_a, events_b) = tokio::join!(collect(rx_a), collect(rx_b));

        for events in [events_a, events_b] {
            assert!(matches!(
                events.last().unwrap(),
                OperationEvent::Complete(Ok(OperationReply::FileWritten { .. }))
            ));
        }

        assert_eq!(
            std::fs::read_to_string(executor.config().root().join("a.txt")).unwrap(),
            "aaa"
        );
        assert_eq!(
            std::fs::read_to_string(executor.config().root().join("b.txt")).unwrap(),
            "bbb"
        );
    }

    #[test]
    fn test_execute_is_usable_without_runtime() {
        let (_temp, executor) = executor();

        let reply = executor
            .execute(FolderRequest::write("sync.txt", "no runtime"), &crate::NullSink)
            .unwrap();
        assert_eq!(reply.path(), "sync.txt");
    }
}
