use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct Flag {
    generation: AtomicU64,
    /// Generation whose expiry has not been consumed yet, 0 if none.
    fired: AtomicU64,
}

/// A cancellable timer that only raises a flag. The owner polls
/// [`Timer::take_fired`]; nothing else happens on expiry.
///
/// Every `start`/`stop` begins a new generation, so a task from a stopped
/// generation can never raise the flag again.
#[derive(Debug)]
pub struct Timer {
    interval: Duration,
    repeat: bool,
    flag: Arc<Flag>,
    task: Option<JoinHandle<()>>,
}

impl Timer {
    pub fn one_shot(interval: Duration) -> Self {
        Self::new(interval, false)
    }

    pub fn repeating(interval: Duration) -> Self {
        Self::new(interval, true)
    }

    fn new(interval: Duration, repeat: bool) -> Self {
        Self {
            interval,
            repeat,
            flag: Default::default(),
            task: None,
        }
    }

    /// Stops the running instance, if any, then arms a fresh one.
    pub fn start(&mut self) {
        self.stop();
        let generation = self.flag.generation.load(Ordering::SeqCst);
        let flag = self.flag.clone();
        let (interval, repeat) = (self.interval, self.repeat);
        let mut deadline = Instant::now() + interval;
        self.task = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep_until(deadline).await;
                deadline += interval;
                flag.fired.store(generation, Ordering::SeqCst);
                if !repeat {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        self.flag.generation.fetch_add(1, Ordering::SeqCst);
        self.flag.fired.store(0, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Running means started and not stopped. A one-shot timer stops
    /// running once its expiry is taken.
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Consumes a pending expiry of the current generation.
    pub fn take_fired(&mut self) -> bool {
        if self.task.is_none() {
            return false;
        }
        let generation = self.flag.generation.load(Ordering::SeqCst);
        let fired = self
            .flag
            .fired
            .compare_exchange(generation, 0, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if fired && !self.repeat {
            self.task = None;
        }
        fired
    }

    /// Marks the current generation as expired without waiting.
    #[cfg(test)]
    pub fn fire(&self) {
        if self.task.is_some() {
            let generation = self.flag.generation.load(Ordering::SeqCst);
            self.flag.fired.store(generation, Ordering::SeqCst);
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
