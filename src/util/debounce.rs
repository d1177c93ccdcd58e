//! Delay-and-coalesce stage for search input.
//!
//! Every keystroke is pushed in; a value comes out only after the input has
//! been quiet for the configured delay, and only if it differs from the last
//! value that came out. Nothing is emitted while typing continues.
//!
//! ```ignore
//! let (search_box, mut settled) = Debouncer::spawn(Duration::from_millis(500));
//! search_box.push("mi".to_string());
//! search_box.push("milk".to_string());
//! assert_eq!(settled.recv().await, Some("milk".to_string()));
//! ```

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::trace;

/// Input side of a debounce stage. Dropping it ends the background task.
pub struct Debouncer<T> {
    input_tx: mpsc::UnboundedSender<T>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + std::fmt::Debug + 'static,
{
    /// Start the stage; settled values arrive on the returned receiver.
    ///
    /// Spawns a tokio task, so this must be called inside a runtime.
    pub fn spawn(delay: Duration) -> (Self, mpsc::Receiver<T>) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::channel(16);
        tokio::spawn(Self::run_loop(input_rx, output_tx, delay));
        (Self { input_tx }, output_rx)
    }

    /// Feed a raw value. Never blocks.
    pub fn push(&self, value: T) {
        let _ = self.input_tx.send(value);
    }

    async fn run_loop(
        mut input_rx: mpsc::UnboundedReceiver<T>,
        output_tx: mpsc::Sender<T>,
        delay: Duration,
    ) {
        let mut last_emitted: Option<T> = None;

        loop {
            let Some(mut latest) = input_rx.recv().await else {
                break;
            };

            // keep consuming until the input goes quiet
            let closed = loop {
                match tokio::time::timeout(delay, input_rx.recv()).await {
                    Ok(Some(value)) => latest = value,
                    Ok(None) => break true,
                    Err(_) => break false,
                }
            };

            if last_emitted.as_ref() != Some(&latest) {
                trace!(value = ?latest, "Debounced value settled");
                if output_tx.send(latest.clone()).await.is_err() {
                    return;
                }
                last_emitted = Some(latest);
            }
            if closed {
                return;
            }
        }
    }
}
