//! Escape-process monitor: a background watcher that closes the well-known
//! escape process (the task manager) whenever it appears.
//!
//! The watcher runs on a dedicated named thread.  Once per polling interval
//! it asks the [`EscapeProbe`] for the escape-process window and requests a
//! graceful close if one is found.  Absence of the window is the expected
//! steady state, never an error.
//!
//! # Cancellation
//!
//! The stop flag is the sole cross-thread mutable value and is an
//! `Arc<AtomicBool>`.  Cancellation is cooperative: the loop checks the flag
//! between sleep slices, never mid-probe.  `stop()` stores `false` and then
//! *joins* the worker, so when it returns no watcher iteration can still be
//! executing — the guarantee controller destruction relies on.  The
//! inter-tick sleep is sliced so the join completes well under one polling
//! interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Granularity of the inter-tick sleep; bounds stop latency.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Error type for monitor operations.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The watcher thread could not be spawned.
    #[error("failed to spawn escape-process watcher: {0}")]
    SpawnFailed(#[from] std::io::Error),
}

/// An opaque reference to a found escape-process window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeWindow(pub isize);

/// Trait abstracting the escape-process lookup and close request.
///
/// The production implementation uses `FindWindowW` + `PostMessageW`; tests
/// use [`mock::MockEscapeProbe`].
pub trait EscapeProbe: Send + Sync {
    /// Looks for the escape-process window.  `None` is the steady state.
    fn find_escape_window(&self) -> Option<EscapeWindow>;

    /// Requests a graceful close of a previously found window.
    fn request_close(&self, window: EscapeWindow);
}

/// The background watcher with its stop flag and joinable worker.
pub struct EscapeProcessMonitor {
    probe: Arc<dyn EscapeProbe>,
    poll_interval: Duration,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl EscapeProcessMonitor {
    /// Creates a stopped monitor polling `probe` every `poll_interval`.
    pub fn new(probe: Arc<dyn EscapeProbe>, poll_interval: Duration) -> Self {
        Self {
            probe,
            poll_interval,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Starts the watcher thread and returns immediately.
    ///
    /// Starting when already running is a no-op success; the caller never
    /// waits for the first polling iteration.
    pub fn start(&mut self) -> Result<(), MonitorError> {
        if self.worker.is_some() {
            return Ok(());
        }

        self.running.store(true, Ordering::SeqCst);
        let probe = Arc::clone(&self.probe);
        let running = Arc::clone(&self.running);
        let interval = self.poll_interval;

        let spawned = thread::Builder::new()
            .name("kiosk-escape-watch".to_string())
            .spawn(move || watch_loop(probe, running, interval));

        let handle = match spawned {
            Ok(h) => h,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(MonitorError::SpawnFailed(e));
            }
        };

        self.worker = Some(handle);
        debug!("escape-process watcher started");
        Ok(())
    }

    /// Stops the watcher and blocks until the worker thread has fully exited.
    ///
    /// Stopping when already stopped is a no-op.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("escape-process watcher panicked before join");
            }
            info!("escape-process watcher stopped");
        }
    }

    /// Returns `true` while the watcher thread is running.
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for EscapeProcessMonitor {
    fn drop(&mut self) {
        // No watcher iteration may execute concurrently with destruction.
        self.stop();
    }
}

/// The watcher loop executed on the worker thread.
///
/// Sleeps first, probes second (the escape process cannot be present in the
/// instant the monitor starts), and checks the stop flag at every slice.
fn watch_loop(probe: Arc<dyn EscapeProbe>, running: Arc<AtomicBool>, interval: Duration) {
    'watch: loop {
        let mut slept = Duration::ZERO;
        while slept < interval {
            if !running.load(Ordering::SeqCst) {
                break 'watch;
            }
            let slice = SLEEP_SLICE.min(interval - slept);
            thread::sleep(slice);
            slept += slice;
        }

        if !running.load(Ordering::SeqCst) {
            break;
        }

        if let Some(window) = probe.find_escape_window() {
            debug!("escape process detected; requesting close");
            probe.request_close(window);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::mock::MockEscapeProbe;
    use super::*;

    fn make_monitor(probe: &MockEscapeProbe, interval_ms: u64) -> EscapeProcessMonitor {
        EscapeProcessMonitor::new(
            Arc::new(probe.clone()),
            Duration::from_millis(interval_ms),
        )
    }

    #[test]
    fn test_start_returns_without_waiting_for_first_iteration() {
        // Arrange: a long interval so the first probe cannot have happened yet.
        let probe = MockEscapeProbe::new();
        let mut monitor = make_monitor(&probe, 60_000);

        // Act
        let started = std::time::Instant::now();
        monitor.start().expect("start");

        // Assert
        assert!(
            started.elapsed() < Duration::from_millis(250),
            "start must not block on the polling interval"
        );
        assert_eq!(probe.probe_calls(), 0);
        monitor.stop();
    }

    #[test]
    fn test_start_when_running_is_noop() {
        let probe = MockEscapeProbe::new();
        let mut monitor = make_monitor(&probe, 60_000);
        monitor.start().expect("first start");
        monitor.start().expect("second start must be a no-op success");
        assert!(monitor.is_running());
        monitor.stop();
    }

    #[test]
    fn test_stop_joins_worker_and_halts_side_effects() {
        // Arrange: a short interval so iterations actually happen.
        let probe = MockEscapeProbe::with_window_present(true);
        let mut monitor = make_monitor(&probe, 20);
        monitor.start().expect("start");

        // Let a few iterations run.
        thread::sleep(Duration::from_millis(120));

        // Act
        monitor.stop();
        let calls_at_stop = probe.probe_calls();

        // Assert – no further watcher side effects after stop() returned.
        thread::sleep(Duration::from_millis(120));
        assert_eq!(probe.probe_calls(), calls_at_stop);
        assert!(!monitor.is_running());
    }

    #[test]
    fn test_watcher_requests_close_when_window_found() {
        // Arrange
        let probe = MockEscapeProbe::with_window_present(true);
        let mut monitor = make_monitor(&probe, 20);

        // Act
        monitor.start().expect("start");
        thread::sleep(Duration::from_millis(150));
        monitor.stop();

        // Assert
        assert!(
            probe.close_requests() >= 1,
            "watcher must request a close for the present window"
        );
    }

    #[test]
    fn test_absent_window_is_not_an_error() {
        // Arrange
        let probe = MockEscapeProbe::new();
        let mut monitor = make_monitor(&probe, 20);

        // Act
        monitor.start().expect("start");
        thread::sleep(Duration::from_millis(100));
        monitor.stop();

        // Assert – probes happened, closes did not.
        assert!(probe.probe_calls() >= 1);
        assert_eq!(probe.close_requests(), 0);
    }

    #[test]
    fn test_stop_when_stopped_is_noop() {
        let probe = MockEscapeProbe::new();
        let mut monitor = make_monitor(&probe, 20);
        monitor.stop();
        assert!(!monitor.is_running());
    }

    #[test]
    fn test_stop_latency_is_bounded_despite_long_interval() {
        // Arrange: a one-minute interval must not stall teardown.
        let probe = MockEscapeProbe::new();
        let mut monitor = make_monitor(&probe, 60_000);
        monitor.start().expect("start");

        // Act
        let begun = std::time::Instant::now();
        monitor.stop();

        // Assert – the sliced sleep keeps join latency near one slice.
        assert!(
            begun.elapsed() < Duration::from_millis(500),
            "stop must join promptly, took {:?}",
            begun.elapsed()
        );
    }

    #[test]
    fn test_drop_stops_running_watcher() {
        // Arrange
        let probe = MockEscapeProbe::with_window_present(true);
        {
            let mut monitor = make_monitor(&probe, 20);
            monitor.start().expect("start");
            thread::sleep(Duration::from_millis(60));
            // Act: monitor dropped here while running.
        }

        // Assert
        let calls_after_drop = probe.probe_calls();
        thread::sleep(Duration::from_millis(100));
        assert_eq!(
            probe.probe_calls(),
            calls_after_drop,
            "no iterations may run after drop"
        );
    }
}
