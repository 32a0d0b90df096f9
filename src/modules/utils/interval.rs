use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A periodic background task with an explicit cancellation handle.
///
/// The callback runs once per period until it returns `false` or the task is
/// cancelled. Dropping the handle cancels and joins the worker, so a task can
/// never outlive the view that owns it.
pub struct IntervalTask {
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl IntervalTask {
    /// Spawn a task that invokes `tick` every `period`.
    pub fn spawn<F>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let handle = thread::spawn(move || {
            // Sleep in short slices so cancellation is picked up promptly
            // even with a long period.
            let slice = Duration::from_millis(50);
            loop {
                let mut slept = Duration::ZERO;
                while slept < period {
                    if flag.load(Ordering::SeqCst) {
                        return;
                    }
                    let nap = slice.min(period - slept);
                    thread::sleep(nap);
                    slept += nap;
                }
                if flag.load(Ordering::SeqCst) || !tick() {
                    return;
                }
            }
        });

        Self {
            cancelled,
            handle: Some(handle),
        }
    }

    /// Stop the task and wait for the worker to exit.
    pub fn cancel(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for IntervalTask {
    fn drop(&mut self) {
        self.stop();
    }
}
