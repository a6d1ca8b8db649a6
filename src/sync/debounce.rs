//! Timer-reset-on-mutation debounce primitive.
//!
//! Each `push` replaces the pending value and restarts the window; the flush
//! callback fires once per quiescent burst, with the last value pushed.
//! Deliberately decoupled from any render or state-change machinery: it is
//! a plain tokio task driving a resettable deadline.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;

pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn a debouncer with the given quiescence window. `flush` runs on
    /// the trailing edge with the most recently pushed value.
    pub fn new<F, Fut>(window: Duration, mut flush: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        tokio::spawn(async move {
            let mut pending: Option<T> = None;
            let mut deadline: Option<tokio::time::Instant> = None;
            loop {
                tokio::select! {
                    item = rx.recv() => match item {
                        Some(value) => {
                            pending = Some(value);
                            deadline = Some(tokio::time::Instant::now() + window);
                        }
                        // Sender dropped: flush whatever is still pending,
                        // then stop.
                        None => {
                            if let Some(value) = pending.take() {
                                flush(value).await;
                            }
                            break;
                        }
                    },
                    _ = async {
                        if let Some(d) = deadline {
                            tokio::time::sleep_until(d).await;
                        }
                    }, if deadline.is_some() => {
                        deadline = None;
                        if let Some(value) = pending.take() {
                            flush(value).await;
                        }
                    }
                }
            }
        });
        Self { tx }
    }

    /// Schedule a flush of `value`, replacing any pending one and
    /// restarting the window.
    ///
    /// Dropping the debouncer closes the channel, which flushes any
    /// still-pending value before the task exits.
    pub fn push(&self, value: T) {
        let _ = self.tx.send(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn rapid_pushes_collapse_to_one_flush_with_last_value() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let debouncer = {
            let count = count.clone();
            let seen = seen.clone();
            Debouncer::new(Duration::from_millis(100), move |v: u32| {
                let count = count.clone();
                let seen = seen.clone();
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    seen.lock().unwrap().push(v);
                }
            })
        };

        // 5 pushes well inside one window.
        for i in 1..=5 {
            debouncer.push(i);
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tokio::time::sleep(Duration::from_millis(250)).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(*seen.lock().unwrap(), vec![5]);
    }

    #[tokio::test]
    async fn separate_bursts_flush_separately() {
        let count = Arc::new(AtomicUsize::new(0));
        let debouncer = {
            let count = count.clone();
            Debouncer::new(Duration::from_millis(50), move |_: u32| {
                let count = count.clone();
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                }
            })
        };

        debouncer.push(1);
        tokio::time::sleep(Duration::from_millis(120)).await;
        debouncer.push(2);
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn drop_flushes_pending_value() {
        let count = Arc::new(AtomicUsize::new(0));
        let debouncer = {
            let count = count.clone();
            Debouncer::new(Duration::from_millis(10_000), move |_: u32| {
                let count = count.clone();
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                }
            })
        };

        debouncer.push(7);
        drop(debouncer);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
