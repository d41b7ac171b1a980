//! Bounded in-memory task repository.
//!
//! The store is an injected abstraction so the web layer never touches a
//! raw map, and the workflow never touches the store at all. Capacity is
//! enforced on insert: the oldest finished task is evicted first, and only
//! if every task is still in flight does the oldest one go regardless.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use videoagent_common::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Option<Task>;

    /// Insert or replace a task by id.
    async fn put(&self, task: Task);

    /// Newest-first listing, capped at `limit`.
    async fn list_recent(&self, limit: usize) -> Vec<Task>;

    async fn stats(&self) -> TaskStats;
}

pub struct MemoryTaskStore {
    capacity: usize,
    /// Insertion-ordered; creation time is monotonic per store.
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            tasks: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn get(&self, id: Uuid) -> Option<Task> {
        self.tasks.read().await.iter().find(|t| t.id == id).cloned()
    }

    async fn put(&self, task: Task) {
        let mut tasks = self.tasks.write().await;

        if let Some(existing) = tasks.iter_mut().find(|t| t.id == task.id) {
            *existing = task;
            return;
        }

        tasks.push(task);
        if tasks.len() > self.capacity {
            let victim = tasks
                .iter()
                .position(|t| t.status.is_finished())
                .unwrap_or(0);
            let evicted = tasks.remove(victim);
            tracing::debug!(id = %evicted.id, "Evicted task at capacity");
        }
    }

    async fn list_recent(&self, limit: usize) -> Vec<Task> {
        self.tasks
            .read()
            .await
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    async fn stats(&self) -> TaskStats {
        let tasks = self.tasks.read().await;
        let mut stats = TaskStats {
            total: tasks.len(),
            ..Default::default()
        };
        for task in tasks.iter() {
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::Running => stats.running += 1,
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Failed => stats.failed += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use videoagent_common::TaskKind;

    fn task(status: TaskStatus) -> Task {
        let mut t = Task::new(TaskKind::Complete, vec!["AI".to_string()], String::new());
        t.status = status;
        t
    }

    #[tokio::test]
    async fn put_upserts_by_id() {
        let store = MemoryTaskStore::new(10);
        let mut t = task(TaskStatus::Pending);
        let id = t.id;
        store.put(t.clone()).await;

        t.status = TaskStatus::Completed;
        store.put(t).await;

        let stats = store.stats().await;
        assert_eq!(stats.total, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(store.get(id).await.unwrap().status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn eviction_prefers_oldest_finished_task() {
        let store = MemoryTaskStore::new(2);
        let done = task(TaskStatus::Completed);
        let running = task(TaskStatus::Running);
        let done_id = done.id;
        let running_id = running.id;

        store.put(done).await;
        store.put(running).await;
        store.put(task(TaskStatus::Pending)).await;

        assert!(store.get(done_id).await.is_none());
        assert!(store.get(running_id).await.is_some());
        assert_eq!(store.stats().await.total, 2);
    }

    #[tokio::test]
    async fn eviction_falls_back_to_oldest_when_all_running() {
        let store = MemoryTaskStore::new(2);
        let first = task(TaskStatus::Running);
        let first_id = first.id;

        store.put(first).await;
        store.put(task(TaskStatus::Running)).await;
        store.put(task(TaskStatus::Running)).await;

        assert!(store.get(first_id).await.is_none());
        assert_eq!(store.stats().await.total, 2);
    }

    #[tokio::test]
    async fn list_recent_is_newest_first() {
        let store = MemoryTaskStore::new(10);
        let a = task(TaskStatus::Pending);
        let b = task(TaskStatus::Pending);
        let b_id = b.id;
        store.put(a).await;
        store.put(b).await;

        let recent = store.list_recent(1).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, b_id);
    }

    #[tokio::test]
    async fn stats_count_by_status() {
        let store = MemoryTaskStore::new(10);
        store.put(task(TaskStatus::Pending)).await;
        store.put(task(TaskStatus::Running)).await;
        store.put(task(TaskStatus::Completed)).await;
        store.put(task(TaskStatus::Failed)).await;

        let stats = store.stats().await;
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.running, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.failed, 1);
    }
}
