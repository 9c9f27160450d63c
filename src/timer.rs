//! Hard-deadline enforcement.
//!
//! A `DeadlineTimer` owns a thread that raises a [`StopFlag`] once the
//! deadline passes. The thread parks on a channel, so cancelling wakes it
//! immediately and it exits without touching the flag.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::sync::StopFlag;

pub struct DeadlineTimer {
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl DeadlineTimer {
    /// Arm a timer for `deadline`. A deadline already in the past raises the
    /// flag at once and returns `None`, as does a failure to spawn the
    /// timer thread (after raising the flag, so the search cannot overrun).
    #[must_use]
    pub fn start_at(deadline: Instant, stop: StopFlag) -> Option<Self> {
        let Some(wait) = deadline.checked_duration_since(Instant::now()) else {
            stop.stop();
            return None;
        };
        let (tx, rx) = mpsc::channel::<()>();
        let flag = stop.clone();
        let spawned = thread::Builder::new()
            .name("search-deadline".to_string())
            .spawn(move || {
                if let Err(RecvTimeoutError::Timeout) = rx.recv_timeout(wait) {
                    flag.stop();
                }
            });
        match spawned {
            Ok(handle) => Some(DeadlineTimer {
                cancel: Some(tx),
                handle: Some(handle),
            }),
            Err(err) => {
                log::warn!("deadline timer unavailable ({err}); stopping search now");
                stop.stop();
                None
            }
        }
    }

    /// Disarm the timer without raising the flag, and reap its thread.
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.cancel.take() {
            // The receiver is gone once the deadline fired.
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for DeadlineTimer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fires_after_deadline() {
        let flag = StopFlag::new();
        let timer = DeadlineTimer::start_at(Instant::now() + Duration::from_millis(20), flag.clone());
        assert!(timer.is_some());
        thread::sleep(Duration::from_millis(120));
        assert!(flag.is_stopped());
    }

    #[test]
    fn cancel_leaves_flag_clear() {
        let flag = StopFlag::new();
        let timer = DeadlineTimer::start_at(Instant::now() + Duration::from_secs(30), flag.clone())
            .unwrap();
        let started = Instant::now();
        timer.cancel();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!flag.is_stopped());
    }

    #[test]
    fn past_deadline_stops_immediately() {
        let flag = StopFlag::new();
        let past = Instant::now().checked_sub(Duration::from_millis(5)).unwrap();
        assert!(DeadlineTimer::start_at(past, flag.clone()).is_none());
        assert!(flag.is_stopped());
    }
}
