//! Single-timer debouncing on the Tokio timer.

use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};

/// Owns at most one live timer. Scheduling a new one aborts the previous.
///
/// Each timer is tagged with a generation. The callback receives its tag and
/// must confirm it with [`Debouncer::take_if_current`] under the owner's lock,
/// which rejects a timer that woke up just as it was being cancelled.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            timer: None,
        }
    }

    /// Restart the quiet period; `fire` runs once it elapses undisturbed.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&mut self, fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();

        let generation = self.generation;
        let deadline = Instant::now() + self.delay;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            fire(generation);
        }));

        generation
    }

    /// Abort the live timer, if any, and invalidate its generation.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.generation += 1;
    }

    /// Claim a fired timer. Returns false if it was superseded or cancelled.
    pub fn take_if_current(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.timer.is_none() {
            return false;
        }
        // Detach rather than abort: this runs inside the timer task itself.
        self.timer = None;
        self.generation += 1;
        true
    }

    /// Whether a timer is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    /// Debouncer shared with its callbacks, the way owners use it.
    fn shared(delay_ms: u64) -> (Arc<Mutex<Debouncer>>, Arc<Mutex<Vec<&'static str>>>) {
        (
            Arc::new(Mutex::new(Debouncer::new(Duration::from_millis(delay_ms)))),
            Arc::new(Mutex::new(Vec::new())),
        )
    }

    fn schedule(
        debouncer: &Arc<Mutex<Debouncer>>,
        fired: &Arc<Mutex<Vec<&'static str>>>,
        label: &'static str,
    ) {
        let owner = Arc::clone(debouncer);
        let fired = Arc::clone(fired);
        debouncer.lock().unwrap().schedule(move |generation| {
            if owner.lock().unwrap().take_if_current(generation) {
                fired.lock().unwrap().push(label);
            }
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (debouncer, fired) = shared(500);
        schedule(&debouncer, &fired, "a");

        tokio::time::advance(Duration::from_millis(499)).await;
        settle().await;
        assert!(fired.lock().unwrap().is_empty());
        assert!(debouncer.lock().unwrap().is_pending());

        tokio::time::advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(*fired.lock().unwrap(), vec!["a"]);
        assert!(!debouncer.lock().unwrap().is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_restarts_quiet_period() {
        let (debouncer, fired) = shared(500);
        schedule(&debouncer, &fired, "a");

        tokio::time::advance(Duration::from_millis(400)).await;
        settle().await;
        schedule(&debouncer, &fired, "b");

        tokio::time::advance(Duration::from_millis(400)).await;
        settle().await;
        assert!(fired.lock().unwrap().is_empty());

        tokio::time::advance(Duration::from_millis(100)).await;
        settle().await;
        assert_eq!(*fired.lock().unwrap(), vec!["b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let (debouncer, fired) = shared(500);
        schedule(&debouncer, &fired, "a");
        debouncer.lock().unwrap().cancel();

        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;
        assert!(fired.lock().unwrap().is_empty());
        assert!(!debouncer.lock().unwrap().is_pending());
    }

    #[test]
    fn test_take_if_current_rejects_stale_generation() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        assert!(!debouncer.take_if_current(0));

        debouncer.cancel();
        assert!(!debouncer.take_if_current(0));
    }
}
