use crate::api::ApiClient;
use crate::api::stream::StreamParser;
use crate::error::SessionError;
use crate::types::{ConversationMessage, Role, StreamEvent};
use anyhow::Result;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Updates pushed from the streaming task to the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportUpdate {
    /// Cumulative text of the in-flight assistant message (not a delta).
    AssistantText(String),
    Completed,
    Unauthorized,
    Failed(String),
}

/// Owns the ordered conversation history and the in-flight generation.
///
/// `append` enqueues a user message and starts streaming a reply; `reload`
/// regenerates the last assistant reply; `stop` cancels in-flight
/// generation. The spawned task reports through the update channel and the
/// UI loop feeds each update back via [`apply_update`](Self::apply_update),
/// keeping all history mutation in one place.
pub struct ChatTransport {
    client: Arc<ApiClient>,
    messages: Vec<ConversationMessage>,
    update_tx: mpsc::UnboundedSender<TransportUpdate>,
    cancel: Option<CancellationToken>,
    in_progress: bool,
}

impl ChatTransport {
    pub fn new(client: ApiClient) -> (Self, mpsc::UnboundedReceiver<TransportUpdate>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                client: Arc::new(client),
                messages: Vec::new(),
                update_tx,
                cancel: None,
                in_progress: false,
            },
            update_rx,
        )
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn is_streaming(&self) -> bool {
        self.in_progress
    }

    /// Enqueue a user message and begin streaming the reply.
    pub fn append(&mut self, content: String) {
        self.messages.push(ConversationMessage::user(content));
        self.spawn_stream();
    }

    /// Drop the last assistant reply (if any) and regenerate it from the
    /// remaining history.
    pub fn reload(&mut self) {
        if matches!(self.messages.last(), Some(m) if m.role == Role::Assistant) {
            self.messages.pop();
        }
        self.spawn_stream();
    }

    /// Cancel in-flight generation. The partially-streamed assistant message
    /// stays in history; retry/discard remove it explicitly.
    pub fn stop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        self.in_progress = false;
    }

    /// Remove the last message regardless of role (discard).
    pub fn pop_last(&mut self) {
        self.messages.pop();
    }

    /// Fold a task update into the history. Stale updates arriving after a
    /// `stop` are ignored.
    pub fn apply_update(&mut self, update: &TransportUpdate) {
        match update {
            TransportUpdate::AssistantText(text) => {
                if !self.in_progress {
                    return;
                }
                match self.messages.last_mut() {
                    Some(message) if message.role == Role::Assistant => {
                        message.content = text.clone();
                    }
                    _ => self.messages.push(ConversationMessage::assistant(text.clone())),
                }
            }
            TransportUpdate::Completed
            | TransportUpdate::Unauthorized
            | TransportUpdate::Failed(_) => {
                self.in_progress = false;
                self.cancel = None;
            }
        }
    }

    fn spawn_stream(&mut self) {
        let client = Arc::clone(&self.client);
        let history = self.messages.clone();
        let tx = self.update_tx.clone();
        let token = CancellationToken::new();
        self.cancel = Some(token.clone());
        self.in_progress = true;

        tokio::spawn(async move {
            match run_stream(client, history, tx.clone(), token).await {
                Ok(()) => {}
                Err(error) => {
                    let update = if error.downcast_ref::<SessionError>().is_some_and(|e| {
                        matches!(e, SessionError::Unauthorized)
                    }) {
                        TransportUpdate::Unauthorized
                    } else {
                        TransportUpdate::Failed(error.to_string())
                    };
                    let _ = tx.send(update);
                }
            }
        });
    }
}

async fn run_stream(
    client: Arc<ApiClient>,
    history: Vec<ConversationMessage>,
    tx: mpsc::UnboundedSender<TransportUpdate>,
    token: CancellationToken,
) -> Result<()> {
    let mut stream = client.create_stream(&history).await?;
    let mut parser = StreamParser::new();
    let mut text = String::new();

    loop {
        tokio::select! {
            // Cancellation stops increments without reporting completion;
            // the UI already returned the session to Idle.
            _ = token.cancelled() => return Ok(()),
            chunk = stream.next() => {
                let Some(chunk) = chunk else { break };
                for event in parser.process(&chunk?)? {
                    if let StreamEvent::ContentBlockDelta { delta, .. } = event {
                        if let Some(fragment) = delta.text {
                            text.push_str(&fragment);
                            let _ = tx.send(TransportUpdate::AssistantText(text.clone()));
                        }
                    }
                }
            }
        }
    }

    let _ = tx.send(TransportUpdate::Completed);
    Ok(())
}
