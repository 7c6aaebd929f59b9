use std::time::Duration;

use tokio::task::JoinHandle;

/// Single-slot trailing-edge debounce timer.
///
/// At most one timer is outstanding. Scheduling aborts the pending one and
/// bumps the generation, so a callback from a timer that fired just before
/// it was replaced can be recognised with [`Debouncer::take`] and ignored.
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer. `on_fire` receives the generation it was armed with.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, on_fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire(generation);
        }));
        generation
    }

    /// Drop the pending timer, if any, without firing it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Consume a fired timer. Returns `false` for a superseded or cancelled
    /// generation.
    pub fn take(&mut self, generation: u64) -> bool {
        if self.pending.is_some() && generation == self.generation {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
