//! Save pipeline: per-path single-flight writes and debounced auto-save.
//!
//! The rule hardened here: at most one write in flight per path. A save
//! requested while one is in flight replaces that path's queued payload
//! (coalesced, last writer wins) and is written when the in-flight one
//! completes. Once started, a write runs to completion; there is no
//! mid-flight abort. [`SaveCoordinator::flush`] awaits quiescence for a
//! path, which the editor uses before switching shops and before resyncs
//! so a load can never race an in-flight save.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, watch};

use crate::error::EditorError;
use crate::persistence::ConfigFileStore;

/// What happened to a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The payload was written to disk.
    Written,
    /// A write for the same path was in flight; the payload was queued
    /// and will be written when it completes.
    Coalesced,
}

#[derive(Debug, Default)]
struct PathState {
    in_flight: bool,
    queued: Option<String>,
}

/// Per-path single-flight writer over a [`ConfigFileStore`].
#[derive(Debug)]
pub struct SaveCoordinator {
    files: Arc<ConfigFileStore>,
    paths: Mutex<HashMap<String, PathState>>,
    changed_tx: watch::Sender<u64>,
    #[cfg(test)]
    write_delay: Option<Duration>,
}

impl SaveCoordinator {
    /// Creates a coordinator writing through the given file store.
    #[must_use]
    pub fn new(files: Arc<ConfigFileStore>) -> Self {
        let (changed_tx, _) = watch::channel(0);
        Self {
            files,
            paths: Mutex::new(HashMap::new()),
            changed_tx,
            #[cfg(test)]
            write_delay: None,
        }
    }

    #[cfg(test)]
    fn with_write_delay(files: Arc<ConfigFileStore>, delay: Duration) -> Self {
        let mut coordinator = Self::new(files);
        coordinator.write_delay = Some(delay);
        coordinator
    }

    fn bump(&self) {
        self.changed_tx.send_modify(|v| *v = v.wrapping_add(1));
    }

    /// Saves `text` to `rel_path`, honoring the single-flight rule.
    ///
    /// When the path is busy the payload is queued (replacing any queued
    /// predecessor) and `Coalesced` returns immediately; the in-flight
    /// holder drains the queue before going idle.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PersistenceError`] when the final write of
    /// the drain loop fails. Queued payloads are not dropped on an
    /// earlier failure; the loop keeps draining so a retry can follow.
    pub async fn save(&self, rel_path: &str, text: String) -> Result<SaveOutcome, EditorError> {
        {
            let mut paths = self.paths.lock().await;
            let state = paths.entry(rel_path.to_string()).or_default();
            if state.in_flight {
                state.queued = Some(text);
                return Ok(SaveOutcome::Coalesced);
            }
            state.in_flight = true;
        }
        self.bump();

        let mut next = Some(text);
        let mut result = Ok(());
        while let Some(payload) = next {
            #[cfg(test)]
            if let Some(delay) = self.write_delay {
                tokio::time::sleep(delay).await;
            }
            result = self.files.save(rel_path, &payload).await;
            if let Err(ref e) = result {
                tracing::warn!(rel_path, error = %e, "save failed");
            }

            let mut paths = self.paths.lock().await;
            let state = paths.entry(rel_path.to_string()).or_default();
            next = state.queued.take();
            if next.is_none() {
                state.in_flight = false;
            }
            drop(paths);
            self.bump();
        }

        result.map(|()| SaveOutcome::Written)
    }

    async fn is_busy(&self, rel_path: &str) -> bool {
        let paths = self.paths.lock().await;
        paths
            .get(rel_path)
            .is_some_and(|s| s.in_flight || s.queued.is_some())
    }

    /// Waits until no write is in flight or queued for `rel_path`.
    pub async fn flush(&self, rel_path: &str) {
        let mut rx = self.changed_tx.subscribe();
        loop {
            if !self.is_busy(rel_path).await {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Waits until every path is quiescent.
    pub async fn flush_all(&self) {
        let mut rx = self.changed_tx.subscribe();
        loop {
            {
                let paths = self.paths.lock().await;
                let busy = paths
                    .values()
                    .any(|s| s.in_flight || s.queued.is_some());
                if !busy {
                    return;
                }
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Generation-counted debounce for auto-save.
///
/// Every audited mutation re-arms the timer by bumping the generation;
/// a sleeper holding a stale token does nothing when it wakes, so only
/// the quietest-period sleeper actually triggers a flush. Auto-save is
/// suppressed entirely until the initial load completes, so a partially
/// loaded state can never be persisted.
#[derive(Debug)]
pub struct AutosaveTimer {
    generation: AtomicU64,
    ready: AtomicBool,
    delay: Duration,
}

impl AutosaveTimer {
    /// Creates a timer with the given debounce delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            generation: AtomicU64::new(0),
            ready: AtomicBool::new(false),
            delay,
        }
    }

    /// Marks the initial load as complete, enabling auto-save.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
    }

    /// Whether auto-save is enabled yet.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Re-arms the timer, invalidating every outstanding token.
    pub fn arm(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Sleeps out the debounce period. Returns `true` when the token is
    /// still current afterwards and the initial load has completed.
    pub async fn wait(&self, token: u64) -> bool {
        tokio::time::sleep(self.delay).await;
        self.is_ready() && self.generation.load(Ordering::SeqCst) == token
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn disk() -> (TempDir, Arc<ConfigFileStore>) {
        let Ok(dir) = TempDir::new() else {
            panic!("tempdir creation failed");
        };
        let store = Arc::new(ConfigFileStore::new(dir.path()));
        (dir, store)
    }

    async fn read(dir: &TempDir, rel: &str) -> String {
        tokio::fs::read_to_string(dir.path().join(rel))
            .await
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn plain_save_writes_through() {
        let (dir, files) = disk();
        let coordinator = SaveCoordinator::new(files);

        let Ok(outcome) = coordinator.save("menu.yml", "title: '&8Shop'\n".to_string()).await
        else {
            panic!("save failed");
        };
        assert_eq!(outcome, SaveOutcome::Written);
        assert_eq!(read(&dir, "menu.yml").await, "title: '&8Shop'\n");
    }

    #[tokio::test(start_paused = true)]
    async fn save_during_in_flight_save_coalesces() {
        let (dir, files) = disk();
        let coordinator = Arc::new(SaveCoordinator::with_write_delay(
            files,
            Duration::from_millis(50),
        ));

        let first = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.save("menu.yml", "one".to_string()).await })
        };
        // Let the first save claim the in-flight slot and park on its delay.
        tokio::task::yield_now().await;

        let Ok(outcome) = coordinator.save("menu.yml", "two".to_string()).await else {
            panic!("second save failed");
        };
        assert_eq!(outcome, SaveOutcome::Coalesced);

        tokio::time::advance(Duration::from_millis(200)).await;
        let Ok(Ok(first_outcome)) = first.await else {
            panic!("first save failed");
        };
        assert_eq!(first_outcome, SaveOutcome::Written);

        // The queued payload won: last writer wins.
        assert_eq!(read(&dir, "menu.yml").await, "two");
    }

    #[tokio::test(start_paused = true)]
    async fn coalesced_payloads_replace_each_other() {
        let (dir, files) = disk();
        let coordinator = Arc::new(SaveCoordinator::with_write_delay(
            files,
            Duration::from_millis(50),
        ));

        let first = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.save("sell.yml", "one".to_string()).await })
        };
        tokio::task::yield_now().await;

        let _ = coordinator.save("sell.yml", "two".to_string()).await;
        let _ = coordinator.save("sell.yml", "three".to_string()).await;

        tokio::time::advance(Duration::from_millis(200)).await;
        let _ = first.await;

        assert_eq!(read(&dir, "sell.yml").await, "three");
    }

    #[tokio::test(start_paused = true)]
    async fn flush_waits_for_queued_payloads() {
        let (dir, files) = disk();
        let coordinator = Arc::new(SaveCoordinator::with_write_delay(
            files,
            Duration::from_millis(50),
        ));

        let first = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.save("menu.yml", "one".to_string()).await })
        };
        tokio::task::yield_now().await;
        let _ = coordinator.save("menu.yml", "two".to_string()).await;

        let flusher = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.flush("menu.yml").await })
        };
        tokio::time::advance(Duration::from_millis(500)).await;
        let Ok(()) = flusher.await else {
            panic!("flush panicked");
        };
        let _ = first.await;

        assert_eq!(read(&dir, "menu.yml").await, "two");
    }

    #[tokio::test]
    async fn saves_to_different_paths_do_not_interfere() {
        let (dir, files) = disk();
        let coordinator = SaveCoordinator::new(files);

        let Ok(a) = coordinator.save("menu.yml", "a".to_string()).await else {
            panic!("save failed");
        };
        let Ok(b) = coordinator.save("purchase.yml", "b".to_string()).await else {
            panic!("save failed");
        };
        assert_eq!(a, SaveOutcome::Written);
        assert_eq!(b, SaveOutcome::Written);
        assert_eq!(read(&dir, "menu.yml").await, "a");
        assert_eq!(read(&dir, "purchase.yml").await, "b");
    }

    #[tokio::test(start_paused = true)]
    async fn stale_debounce_token_does_not_fire() {
        let timer = AutosaveTimer::new(Duration::from_millis(100));
        timer.mark_ready();

        let stale = timer.arm();
        let current = timer.arm();

        assert!(!timer.wait(stale).await);
        assert!(timer.wait(current).await);
    }

    #[tokio::test(start_paused = true)]
    async fn autosave_is_suppressed_before_initial_load() {
        let timer = AutosaveTimer::new(Duration::from_millis(100));
        let token = timer.arm();
        assert!(!timer.wait(token).await);

        timer.mark_ready();
        let token = timer.arm();
        assert!(timer.wait(token).await);
    }
}
