//! Cancellable debounce timer
//!
//! At most one timer is pending at a time: scheduling a new value cancels
//! the previous timer. Values are delivered on a channel tagged with a
//! sequence number so a value that raced past a cancel can be recognized
//! and dropped by [`Debouncer::accept`].

use std::time::Duration;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// A value whose quiet period elapsed
#[derive(Debug)]
pub struct Debounced<T> {
    pub seq: u64,
    pub value: T,
}

pub struct Debouncer<T> {
    delay: Duration,
    tx: UnboundedSender<Debounced<T>>,
    pending: Option<JoinHandle<()>>,
    seq: u64,
    /// Sequence number of the timer that is allowed to deliver
    live: Option<u64>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer and the receiver its values arrive on
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(delay: Duration) -> (Self, UnboundedReceiver<Debounced<T>>) {
        let (tx, rx) = unbounded_channel();
        let debouncer = Self {
            delay,
            tx,
            pending: None,
            seq: 0,
            live: None,
        };
        (debouncer, rx)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Start the timer for `value`, cancelling any pending one
    pub fn schedule(&mut self, value: T) -> u64 {
        self.cancel();
        self.seq += 1;
        let seq = self.seq;
        let delay = self.delay;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(Debounced { seq, value });
        }));
        self.live = Some(seq);
        seq
    }

    /// Cancel the pending timer; returns whether one was pending
    pub fn cancel(&mut self) -> bool {
        self.live = None;
        match self.pending.take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.live.is_some()
    }

    /// Unwrap a delivered value if it belongs to the live timer
    pub fn accept(&mut self, delivered: Debounced<T>) -> Option<T> {
        if self.live != Some(delivered.seq) {
            return None;
        }
        self.live = None;
        self.pending = None;
        Some(delivered.value)
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
