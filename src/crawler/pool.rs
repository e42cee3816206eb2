use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Receiving side of a pipeline stage, shared by every worker of that stage
///
/// Workers take turns on the underlying receiver. Once every sender is dropped
/// and the buffer is drained, `recv` returns `None` to all of them, which is
/// the stage's shutdown signal.
pub(crate) struct StageQueue<T> {
    rx: Arc<Mutex<mpsc::Receiver<T>>>,
}

impl<T> Clone for StageQueue<T> {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

impl<T> StageQueue<T> {
    /// Waits for the next item, or `None` once the queue is closed and empty
    pub(crate) async fn recv(&self) -> Option<T> {
        self.rx.lock().await.recv().await
    }
}

/// Creates a bounded queue feeding one pipeline stage
pub(crate) fn stage_queue<T>(capacity: usize) -> (mpsc::Sender<T>, StageQueue<T>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        tx,
        StageQueue {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}
