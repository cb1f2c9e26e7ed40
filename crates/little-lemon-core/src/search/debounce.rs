use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

/// Idle time before a search is issued.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Coalesces rapid input into one value per idle period.
///
/// Values pushed while a previous one is pending replace it and restart the
/// timer. Once input has been quiet for `delay`, the latest value is sent to
/// the receiver returned by `new`. Dropping the debouncer discards anything
/// still pending and stops the background task.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (in_tx, mut in_rx) = mpsc::unbounded_channel::<T>();
        let (out_tx, out_rx) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            while let Some(mut latest) = in_rx.recv().await {
                loop {
                    tokio::select! {
                        next = in_rx.recv() => match next {
                            Some(value) => latest = value,
                            None => return,
                        },
                        _ = tokio::time::sleep(delay) => break,
                    }
                }
                if out_tx.send(latest).is_err() {
                    return;
                }
            }
        });

        (Self { tx: in_tx }, out_rx)
    }

    pub fn push(&self, value: T) {
        if self.tx.send(value).is_err() {
            debug!("Debounce task gone, dropping input");
        }
    }
}
