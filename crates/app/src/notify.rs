//! Fire-and-forget email notification queue.
//!
//! Services push emails into an unbounded channel and return immediately;
//! a background worker drains the channel and delivers each message with
//! bounded retries. Delivery failures are logged and never reach the
//! request path.
//!
//! Known gap, kept on purpose: an email scheduled for an entity that is
//! deleted before the worker gets to it still sends. The queue is not
//! drained on deletion.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::ports::{Email, Mailer};

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Handle used by services to schedule notification emails.
#[derive(Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<Email>,
}

impl Outbox {
    /// Queue an email for asynchronous delivery. Never blocks and never
    /// fails the caller; if the worker is gone the email is dropped with
    /// a warning.
    pub fn push(&self, email: Email) {
        if self.tx.send(email).is_err() {
            tracing::warn!("notification worker stopped, dropping email");
        }
    }
}

/// Spawn the delivery worker and return the [`Outbox`] feeding it.
///
/// The worker runs until every `Outbox` clone is dropped and the queue is
/// empty; the returned handle can be awaited on shutdown.
pub fn spawn_worker<M>(mailer: M) -> (Outbox, JoinHandle<()>)
where
    M: Mailer + Send + Sync + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Email>();
    let handle = tokio::spawn(async move {
        while let Some(email) = rx.recv().await {
            deliver(&mailer, &email).await;
        }
    });
    (Outbox { tx }, handle)
}

async fn deliver<M: Mailer>(mailer: &M, email: &Email) {
    for attempt in 1..=MAX_ATTEMPTS {
        match mailer.send(email).await {
            Ok(()) => {
                tracing::debug!(recipient = %email.recipient, "notification delivered");
                return;
            }
            Err(err) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(
                    recipient = %email.recipient,
                    error = %err,
                    attempt,
                    "notification delivery failed, retrying"
                );
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(err) => {
                tracing::warn!(
                    recipient = %email.recipient,
                    error = %err,
                    "giving up on notification delivery"
                );
            }
        }
    }
}

/// Mailer that logs instead of sending. Used in development and tests;
/// real transports live in adapter crates.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<(), taskhub_domain::error::TaskHubError>> + Send {
        tracing::info!(
            recipient = %email.recipient,
            subject = %email.subject,
            "email notification (log transport)"
        );
        async { Ok(()) }
    }
}
