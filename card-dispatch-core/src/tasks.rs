//! Task manager for a controller's async work
//!
//! Every controller owns one [`TaskManager`]. It runs two kinds of task:
//! - the action itself, spawned on trigger
//! - the reset timer, spawned after the action settles
//!
//! Each task sends a single message back over the controller's channel when
//! it finishes. Spawning with a key that is already running replaces (aborts)
//! the old task, which is how a new trigger cancels a pending reset.
//!
//! # Example
//!
//! ```ignore
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut tasks = TaskManager::new(tx);
//!
//! tasks.spawn("perform", async move { Completion::Settled { epoch, result: call().await } });
//! tasks.spawn_after("reset", Duration::from_millis(2000), async move {
//!     Completion::ResetDue { epoch }
//! });
//!
//! tasks.cancel(&TaskKey::new("reset"));
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Identifies a task for cancellation and replacement.
///
/// Tasks with the same key are mutually exclusive.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(String);

impl TaskKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for TaskKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TaskKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Keyed registry of spawned tasks that report back over a channel.
///
/// `M` is the message a finished task sends.
pub struct TaskManager<M> {
    tasks: HashMap<TaskKey, AbortHandle>,
    tx: mpsc::UnboundedSender<M>,
}

impl<M> TaskManager<M>
where
    M: Send + 'static,
{
    pub fn new(tx: mpsc::UnboundedSender<M>) -> Self {
        Self {
            tasks: HashMap::new(),
            tx,
        }
    }

    /// Spawn a task, aborting any running task with the same key.
    ///
    /// The future's output is sent to the channel. An aborted task sends
    /// nothing.
    pub fn spawn<F>(&mut self, key: impl Into<TaskKey>, future: F) -> &mut Self
    where
        F: Future<Output = M> + Send + 'static,
    {
        let key = key.into();
        self.cancel(&key);

        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let message = future.await;
            let _ = tx.send(message);
        });

        self.tasks.insert(key, handle.abort_handle());
        self
    }

    /// Spawn a task that waits `delay` before running `future`.
    ///
    /// Replacing the key during the wait restarts the timer with the new task.
    pub fn spawn_after<F>(
        &mut self,
        key: impl Into<TaskKey>,
        delay: Duration,
        future: F,
    ) -> &mut Self
    where
        F: Future<Output = M> + Send + 'static,
    {
        self.spawn(key, async move {
            tokio::time::sleep(delay).await;
            future.await
        })
    }

    /// Abort a task by key. No-op if there is none.
    pub fn cancel(&mut self, key: &TaskKey) {
        if let Some(handle) = self.tasks.remove(key) {
            handle.abort();
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }

    /// Whether a task with this key was spawned and has not finished.
    pub fn is_running(&self, key: &TaskKey) -> bool {
        self.tasks
            .get(key)
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Number of tasks that have not finished.
    pub fn len(&self) -> usize {
        self.tasks.values().filter(|h| !h.is_finished()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M> Drop for TaskManager<M> {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_task_key() {
        let k1 = TaskKey::new("reset");
        let k2 = TaskKey::from("reset");
        let k3: TaskKey = String::from("reset").into();

        assert_eq!(k1, k2);
        assert_eq!(k2, k3);
        assert_eq!(k1.name(), "reset");
    }

    #[tokio::test]
    async fn test_spawn_sends_message() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn("perform", async { 42 });

        let message = tokio::time::timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed");
        assert_eq!(message, 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_replaces_same_key() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);
        let counter = Arc::new(AtomicUsize::new(0));

        let c1 = counter.clone();
        tasks.spawn("reset", async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            c1.fetch_add(1, Ordering::SeqCst);
            1
        });

        let c2 = counter.clone();
        tasks.spawn("reset", async move {
            c2.fetch_add(10, Ordering::SeqCst);
            2
        });

        let message = rx.recv().await.expect("channel closed");
        assert_eq!(message, 2);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 10);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_after_waits() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);
        let start = tokio::time::Instant::now();

        tasks.spawn_after("reset", Duration::from_millis(2000), async { "reset" });

        let message = rx.recv().await.expect("channel closed");
        assert_eq!(message, "reset");
        assert!(start.elapsed() >= Duration::from_millis(2000));
        assert!(start.elapsed() < Duration::from_millis(2010));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_message() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn_after("reset", Duration::from_millis(100), async { 1 });
        assert!(tasks.is_running(&TaskKey::new("reset")));

        tasks.cancel(&TaskKey::new("reset"));
        assert!(!tasks.is_running(&TaskKey::new("reset")));

        let result = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_tasks_are_not_running() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn("perform", async { 1 });
        rx.recv().await.expect("channel closed");
        tokio::task::yield_now().await;

        assert!(!tasks.is_running(&TaskKey::new("perform")));
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_all() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn_after("a", Duration::from_secs(10), async { 1 });
        tasks.spawn_after("b", Duration::from_secs(10), async { 2 });
        assert_eq!(tasks.len(), 2);

        tasks.cancel_all();
        assert!(tasks.is_empty());
    }
}
