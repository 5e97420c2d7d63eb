//! Debounced change notification for the application directories.
//!
//! Raw filesystem events from every watched directory feed one shared
//! debounce thread. Each event restarts the quiet period; when it elapses
//! without further events the callback runs once.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender, select};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Quiet period after the last change before the callback runs
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Idle,
    Pending(Instant),
}

/// Coalesces bursts of events into a single delayed callback
pub struct Debouncer {
    events: Sender<()>,
    stop: Option<Sender<()>>,
    stopped: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn spawn<F>(quiet_period: Duration, on_fire: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);
        let stopped = Arc::new(AtomicBool::new(false));

        let thread_stopped = Arc::clone(&stopped);
        let handle = thread::spawn(move || {
            run_debounce_loop(quiet_period, events_rx, stop_rx, thread_stopped, on_fire);
        });

        Self {
            events: events_tx,
            stop: Some(stop_tx),
            stopped,
            handle: Some(handle),
        }
    }

    /// Record one raw change event
    pub fn trigger(&self) {
        let _ = self.events.send(());
    }

    /// A handle that other threads can use to report events
    pub fn sender(&self) -> Sender<()> {
        self.events.clone()
    }

    /// Cancel any pending callback and wait for the thread to exit.
    ///
    /// No callback runs after this returns.
    pub fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        // Dropping the sender disconnects the stop channel
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Debounce thread panicked");
            }
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_debounce_loop<F: FnMut()>(
    quiet_period: Duration,
    events: Receiver<()>,
    stop: Receiver<()>,
    stopped: Arc<AtomicBool>,
    mut on_fire: F,
) {
    let mut state = DebounceState::Idle;

    loop {
        state = match state {
            DebounceState::Idle => select! {
                recv(events) -> msg => match msg {
                    Ok(()) => DebounceState::Pending(Instant::now() + quiet_period),
                    Err(_) => break,
                },
                recv(stop) -> _ => break,
            },
            DebounceState::Pending(deadline) => {
                let timeout = deadline.saturating_duration_since(Instant::now());
                select! {
                    recv(events) -> msg => match msg {
                        Ok(()) => DebounceState::Pending(Instant::now() + quiet_period),
                        Err(_) => break,
                    },
                    recv(stop) -> _ => break,
                    default(timeout) => {
                        if stopped.load(Ordering::SeqCst) {
                            break;
                        }
                        log::debug!("Quiet period elapsed, firing change callback");
                        on_fire();
                        DebounceState::Idle
                    }
                }
            }
        };
    }

    log::debug!("Debounce thread exiting");
}

struct Running {
    watcher: RecommendedWatcher,
    debouncer: Debouncer,
    watched: Vec<PathBuf>,
}

/// Watches a fixed set of directories and reports changes after a quiet period
pub struct DirectoryWatcher {
    directories: Vec<PathBuf>,
    quiet_period: Duration,
    running: Option<Running>,
}

impl DirectoryWatcher {
    pub fn new(directories: Vec<PathBuf>) -> Self {
        Self {
            directories,
            quiet_period: DEFAULT_QUIET_PERIOD,
            running: None,
        }
    }

    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period = quiet_period;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Directories actually being watched (missing or unreadable ones are skipped)
    pub fn watched(&self) -> &[PathBuf] {
        self.running.as_ref().map(|r| r.watched.as_slice()).unwrap_or(&[])
    }

    /// Begin watching. Calling this while already running does nothing.
    pub fn start<F>(&mut self, on_change: F) -> Result<()>
    where
        F: FnMut() + Send + 'static,
    {
        if self.running.is_some() {
            log::debug!("Directory watcher already running");
            return Ok(());
        }

        let debouncer = Debouncer::spawn(self.quiet_period, on_change);
        let events = debouncer.sender();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Access(_)) {
                    let _ = events.send(());
                }
            }
            Err(e) => log::warn!("Watch error: {:?}", e),
        })
        .context("failed to create filesystem watcher")?;

        let mut watched = Vec::new();
        for dir in &self.directories {
            match watcher.watch(dir, RecursiveMode::NonRecursive) {
                Ok(()) => watched.push(dir.clone()),
                Err(e) => log::debug!("Skipping {}: {}", dir.display(), e),
            }
        }

        log::info!(
            "Watching {} of {} application directories",
            watched.len(),
            self.directories.len()
        );

        self.running = Some(Running {
            watcher,
            debouncer,
            watched,
        });
        Ok(())
    }

    /// Release every watch handle and cancel any pending callback
    pub fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        let Running {
            watcher,
            mut debouncer,
            ..
        } = running;
        drop(watcher);
        debouncer.stop();
        log::info!("Directory watcher stopped");
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_burst_fires_once() {
        let (count, callback) = counter();
        let debouncer = Debouncer::spawn(Duration::from_millis(150), callback);

        for _ in 0..5 {
            debouncer.trigger();
            thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(count.load(Ordering::SeqCst), 0);

        thread::sleep(Duration::from_millis(500));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_separate_bursts_fire_separately() {
        let (count, callback) = counter();
        let debouncer = Debouncer::spawn(Duration::from_millis(100), callback);

        debouncer.trigger();
        thread::sleep(Duration::from_millis(400));
        debouncer.trigger();
        debouncer.trigger();
        thread::sleep(Duration::from_millis(400));

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_no_events_no_callback() {
        let (count, callback) = counter();
        let _debouncer = Debouncer::spawn(Duration::from_millis(50), callback);
        thread::sleep(Duration::from_millis(200));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stop_cancels_pending() {
        let (count, callback) = counter();
        let mut debouncer = Debouncer::spawn(Duration::from_millis(200), callback);

        debouncer.trigger();
        debouncer.stop();
        debouncer.trigger();
        thread::sleep(Duration::from_millis(400));

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let (_count, callback) = counter();

        let mut watcher = DirectoryWatcher::new(vec![missing, dir.path().to_path_buf()]);
        watcher.start(callback).unwrap();

        assert!(watcher.is_running());
        assert_eq!(watcher.watched(), &[dir.path().to_path_buf()]);

        watcher.stop();
        assert!(!watcher.is_running());
        assert!(watcher.watched().is_empty());
    }

    #[test]
    fn test_directory_changes_fire_once() {
        let dir = tempfile::tempdir().unwrap();
        let (count, callback) = counter();

        let mut watcher = DirectoryWatcher::new(vec![dir.path().to_path_buf()])
            .with_quiet_period(Duration::from_millis(300));
        watcher.start(callback).unwrap();

        for i in 0..3 {
            fs::create_dir(dir.path().join(format!("App{}.app", i))).unwrap();
        }

        thread::sleep(Duration::from_millis(1500));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        watcher.stop();
    }

    #[test]
    fn test_stopped_watcher_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let (count, callback) = counter();

        let mut watcher = DirectoryWatcher::new(vec![dir.path().to_path_buf()])
            .with_quiet_period(Duration::from_millis(100));
        watcher.start(callback).unwrap();
        watcher.stop();

        fs::create_dir(dir.path().join("Late.app")).unwrap();
        thread::sleep(Duration::from_millis(400));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
