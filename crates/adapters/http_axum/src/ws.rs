//! Per-project WebSocket event stream.
//!
//! On upgrade the connection subscribes to the project's broadcast channel
//! and forwards each domain event as a JSON text frame. Inbound frames are
//! keep-alives with no business meaning and are discarded; a connection
//! that sends nothing for [`IDLE_TIMEOUT`] is closed, which releases its
//! subscription.

use std::str::FromStr;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use taskhub_app::ports::{
    CredentialHasher, ProjectRepository, TaskRepository, TeamRepository, TokenCodec,
    UserRepository,
};
use taskhub_domain::error::{TaskHubError, ValidationError};
use taskhub_domain::event::DomainEvent;
use taskhub_domain::id::ProjectId;

use crate::error::ApiError;
use crate::state::AppState;

const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// `GET /api/projects/{id}/ws`
pub async fn subscribe<UR, PR, TR, MR, TK, HS>(
    State(state): State<AppState<UR, PR, TR, MR, TK, HS>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    PR: ProjectRepository + Send + Sync + 'static,
    TR: TaskRepository + Send + Sync + 'static,
    MR: TeamRepository + Send + Sync + 'static,
    TK: TokenCodec + Send + Sync + 'static,
    HS: CredentialHasher + Send + Sync + 'static,
{
    let project_id = ProjectId::from_str(&id)
        .map_err(|_| TaskHubError::from(ValidationError::InvalidId))?;
    let rx = state.hub.subscribe(project_id);
    tracing::debug!(project = %project_id, "websocket subscriber connected");
    Ok(ws.on_upgrade(move |socket| handle(socket, project_id, rx)))
}

async fn handle(socket: WebSocket, project_id: ProjectId, rx: broadcast::Receiver<DomainEvent>) {
    let (mut sink, mut inbound) = socket.split();

    let mut forward = tokio::spawn(async move {
        let mut events = BroadcastStream::new(rx);
        while let Some(event) = events.next().await {
            // A lagged subscriber drops the missed events and catches up.
            let Ok(event) = event else { continue };
            let Ok(payload) = serde_json::to_string(&event) else {
                continue;
            };
            if sink.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    let mut drain = tokio::spawn(async move {
        loop {
            match tokio::time::timeout(IDLE_TIMEOUT, inbound.next()).await {
                // Keep-alive frames carry no business meaning.
                Ok(Some(Ok(_frame))) => {}
                Ok(Some(Err(_)) | None) | Err(_) => break,
            }
        }
    });

    tokio::select! {
        _ = &mut forward => drain.abort(),
        _ = &mut drain => forward.abort(),
    }
    tracing::debug!(project = %project_id, "websocket subscriber disconnected");
}
