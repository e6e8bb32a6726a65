//! Event bus port — publish side of the per-project fanout.

use std::future::Future;

use taskhub_domain::error::TaskHubError;
use taskhub_domain::event::DomainEvent;

/// Publishes domain events to the subscribers of the affected project.
///
/// Delivery is best-effort: publishing never fails the triggering
/// operation, even when no subscriber is connected.
pub trait EventPublisher {
    /// Publish an event to all current subscribers of its project.
    fn publish(&self, event: DomainEvent)
    -> impl Future<Output = Result<(), TaskHubError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        event: DomainEvent,
    ) -> impl Future<Output = Result<(), TaskHubError>> + Send {
        (**self).publish(event)
    }
}
