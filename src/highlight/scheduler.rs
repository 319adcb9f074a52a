//! Deferred execution of refresh steps.
//!
//! A [`Scheduler`] runs a step "after a delay". [`ThreadScheduler`] owns a
//! worker thread; [`ManualScheduler`] only remembers the request so a caller
//! can drive steps from its own loop.
//!
//! # Architecture
//!
//! ```text
//! Editing Thread                      Worker Thread
//! --------------                      -------------
//! schedule(delay)  ─── Schedule ───▶  deadline = min(deadline, now + delay)
//!                                     wait until deadline
//!                                     task() -> Some(delay): re-arm
//!                                              None:        wait for Schedule
//! drop             ─── Shutdown ───▶  exit, joined by drop
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::Result;

/// Something that runs the refresh step later.
pub trait Scheduler: Send + Sync {
    /// Request a run after `delay`. Requests made before the run coalesce to
    /// the soonest deadline.
    fn schedule(&self, delay: Duration);
}

enum WorkerCommand {
    Schedule(Duration),
    Shutdown,
}

/// Scheduler backed by a dedicated worker thread.
///
/// The task returns `Some(delay)` to run again after `delay`, or `None` once
/// there is nothing left to do. A panic in the task ends the worker.
pub struct ThreadScheduler {
    tx: Mutex<Sender<WorkerCommand>>,
    handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ThreadScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadScheduler")
            .field("running", &self.is_running())
            .finish()
    }
}

impl ThreadScheduler {
    /// Spawn the worker thread. Nothing runs until the first
    /// [`Scheduler::schedule`].
    pub fn spawn<F>(name: &str, task: F) -> Result<Self>
    where
        F: FnMut() -> Option<Duration> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || worker_main(rx, task))?;
        debug!(name, "highlight worker started");
        Ok(Self {
            tx: Mutex::new(tx),
            handle: Some(handle),
        })
    }

    /// Whether the worker thread is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the worker and wait for it. A run in progress completes first.
    pub fn shutdown(mut self) {
        self.shutdown_internal();
    }

    fn shutdown_internal(&mut self) {
        if let Some(handle) = self.handle.take() {
            let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
            let _ = tx.send(WorkerCommand::Shutdown);
            drop(tx);
            let _ = handle.join();
        }
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&self, delay: Duration) {
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        if tx.send(WorkerCommand::Schedule(delay)).is_err() {
            warn!("schedule request after highlight worker exited");
        }
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        self.shutdown_internal();
    }
}

fn worker_main<F>(rx: Receiver<WorkerCommand>, mut task: F)
where
    F: FnMut() -> Option<Duration>,
{
    let result = std::panic::catch_unwind(AssertUnwindSafe(|| worker_loop(&rx, &mut task)));
    if let Err(e) = result {
        warn!(message = %panic_message(e.as_ref()), "highlight worker panicked");
    }
    debug!("highlight worker stopped");
}

fn worker_loop<F>(rx: &Receiver<WorkerCommand>, task: &mut F)
where
    F: FnMut() -> Option<Duration>,
{
    let mut deadline: Option<Instant> = None;
    loop {
        let command = match deadline {
            None => match rx.recv() {
                Ok(command) => Some(command),
                Err(_) => return,
            },
            Some(at) => match rx.recv_timeout(at.saturating_duration_since(Instant::now())) {
                Ok(command) => Some(command),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => return,
            },
        };

        match command {
            Some(WorkerCommand::Schedule(delay)) => {
                let at = Instant::now() + delay;
                deadline = Some(deadline.map_or(at, |current| current.min(at)));
            }
            Some(WorkerCommand::Shutdown) => return,
            None => {
                deadline = task().map(|delay| Instant::now() + delay);
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "highlight worker panicked".to_string())
}

/// Scheduler that only records requests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: Mutex<Option<Duration>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Soonest requested delay, if any.
    #[must_use]
    pub fn pending(&self) -> Option<Duration> {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consume the pending request.
    pub fn take(&self) -> Option<Duration> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        *pending = Some(pending.map_or(delay, |current| current.min(delay)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn wait_for(count: &AtomicUsize, target: usize) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if count.load(Ordering::SeqCst) >= target {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        false
    }

    #[test]
    fn test_manual_keeps_soonest() {
        let scheduler = ManualScheduler::new();
        assert_eq!(scheduler.pending(), None);
        scheduler.schedule(Duration::from_millis(300));
        scheduler.schedule(Duration::from_millis(100));
        scheduler.schedule(Duration::from_millis(200));
        assert_eq!(scheduler.take(), Some(Duration::from_millis(100)));
        assert_eq!(scheduler.take(), None);
    }

    #[test]
    fn test_thread_runs_until_task_is_done() {
        let runs = Arc::new(AtomicUsize::new(0));
        let runs_clone = Arc::clone(&runs);
        let scheduler = ThreadScheduler::spawn("test-worker", move || {
            let n = runs_clone.fetch_add(1, Ordering::SeqCst) + 1;
            (n < 3).then_some(Duration::ZERO)
        })
        .unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 0);
        scheduler.schedule(Duration::ZERO);
        assert!(wait_for(&runs, 3));
        thread::sleep(Duration::from_millis(20));
        assert_eq!(runs.load(Ordering::SeqCst), 3);

        scheduler.schedule(Duration::ZERO);
        assert!(wait_for(&runs, 4));
        scheduler.shutdown();
    }

    #[test]
    fn test_requests_coalesce() {
        let runs = Arc::new(AtomicUsize::new(0));
        let runs_clone = Arc::clone(&runs);
        let scheduler = ThreadScheduler::spawn("test-coalesce", move || {
            runs_clone.fetch_add(1, Ordering::SeqCst);
            None
        })
        .unwrap();

        for _ in 0..10 {
            scheduler.schedule(Duration::from_millis(50));
        }
        assert!(wait_for(&runs, 1));
        thread::sleep(Duration::from_millis(100));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_task_ends_worker() {
        let scheduler = ThreadScheduler::spawn("test-panic", || panic!("boom")).unwrap();
        scheduler.schedule(Duration::ZERO);
        let deadline = Instant::now() + Duration::from_secs(5);
        while scheduler.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(!scheduler.is_running());
        scheduler.schedule(Duration::ZERO);
    }

    #[test]
    fn test_drop_joins_idle_worker() {
        let scheduler = ThreadScheduler::spawn("test-drop", || None).unwrap();
        scheduler.schedule(Duration::from_secs(60));
        drop(scheduler);
    }
}
