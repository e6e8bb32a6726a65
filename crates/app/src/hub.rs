//! Per-project publish/subscribe registry backed by tokio broadcast
//! channels.
//!
//! One channel per project id, created lazily on first subscribe or
//! publish. The registry is an explicitly-owned dependency injected into
//! the services and the realtime transport; it lives for the process
//! lifetime and is never a module-level singleton.
//!
//! A slow or closed subscriber only affects itself: broadcast receivers
//! that lag drop events locally and every other receiver still gets the
//! full ordered stream for its project.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use tokio::sync::broadcast;

use taskhub_domain::error::TaskHubError;
use taskhub_domain::event::DomainEvent;
use taskhub_domain::id::ProjectId;

use crate::ports::EventPublisher;

/// Registry mapping project ids to live broadcast channels.
pub struct ProjectHub {
    capacity: usize,
    channels: Mutex<HashMap<ProjectId, broadcast::Sender<DomainEvent>>>,
}

impl ProjectHub {
    /// Create a new hub; `capacity` bounds the per-project buffer of
    /// undelivered events before a slow subscriber starts lagging.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            channels: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribe to events for one project. The subscription ends when the
    /// returned receiver is dropped.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned, which only happens after a
    /// panic elsewhere while holding it.
    #[must_use]
    pub fn subscribe(&self, project_id: ProjectId) -> broadcast::Receiver<DomainEvent> {
        let mut channels = self.channels.lock().unwrap();
        channels
            .entry(project_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Number of live subscriptions for a project.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    #[must_use]
    pub fn subscriber_count(&self, project_id: ProjectId) -> usize {
        let channels = self.channels.lock().unwrap();
        channels
            .get(&project_id)
            .map_or(0, broadcast::Sender::receiver_count)
    }

    fn broadcast(&self, event: DomainEvent) {
        let project_id = event.project_id();
        let mut channels = self.channels.lock().unwrap();
        if let Some(sender) = channels.get(&project_id) {
            if sender.receiver_count() == 0 {
                // Drop channels whose last subscriber disconnected.
                channels.remove(&project_id);
            } else if let Err(err) = sender.send(event) {
                tracing::warn!(%project_id, error = %err, "failed to broadcast event");
            }
        }
    }
}

impl EventPublisher for ProjectHub {
    fn publish(
        &self,
        event: DomainEvent,
    ) -> impl Future<Output = Result<(), TaskHubError>> + Send {
        // Publishing succeeds even with no subscribers; the event is
        // simply dropped.
        self.broadcast(event);
        async { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhub_domain::id::{TaskId, UserId};
    use taskhub_domain::task::TaskStatus;

    fn task_created(project_id: ProjectId) -> DomainEvent {
        DomainEvent::TaskCreated {
            project_id,
            task_id: TaskId::new(),
            title: "Fix bug".to_string(),
            assigned_to: Some(UserId::new()),
            status: TaskStatus::InProgress,
        }
    }

    #[tokio::test]
    async fn should_deliver_event_to_all_project_subscribers() {
        let hub = ProjectHub::new(16);
        let project = ProjectId::new();
        let mut rx1 = hub.subscribe(project);
        let mut rx2 = hub.subscribe(project);

        let event = task_created(project);
        hub.publish(event.clone()).await.unwrap();

        assert_eq!(rx1.recv().await.unwrap(), event);
        assert_eq!(rx2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn should_not_deliver_events_across_projects() {
        let hub = ProjectHub::new(16);
        let p1 = ProjectId::new();
        let p2 = ProjectId::new();
        let mut rx = hub.subscribe(p2);

        hub.publish(task_created(p1)).await.unwrap();
        let event = task_created(p2);
        hub.publish(event.clone()).await.unwrap();

        // The p1 event never reaches the p2 subscriber.
        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn should_succeed_when_no_subscribers() {
        let hub = ProjectHub::new(16);
        let result = hub.publish(task_created(ProjectId::new())).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_preserve_emission_order_per_project() {
        let hub = ProjectHub::new(16);
        let project = ProjectId::new();
        let mut rx = hub.subscribe(project);

        let first = task_created(project);
        let second = task_created(project);
        hub.publish(first.clone()).await.unwrap();
        hub.publish(second.clone()).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), first);
        assert_eq!(rx.recv().await.unwrap(), second);
    }

    #[tokio::test]
    async fn should_drop_channel_after_last_subscriber_disconnects() {
        let hub = ProjectHub::new(16);
        let project = ProjectId::new();
        let rx = hub.subscribe(project);
        assert_eq!(hub.subscriber_count(project), 1);

        drop(rx);
        hub.publish(task_created(project)).await.unwrap();
        assert_eq!(hub.subscriber_count(project), 0);
    }
}
