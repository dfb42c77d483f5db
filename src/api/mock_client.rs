use crate::api::client::{ByteStream, MockStreamProducer};
use crate::types::ConversationMessage;
use anyhow::{bail, Result};
use bytes::Bytes;
use futures::stream;
use std::sync::{Arc, Mutex};

/// Scripted transport for tests: each queued reply is a list of SSE frames,
/// replayed as separate byte chunks; one reply is consumed per stream
/// request, and an exhausted queue fails the request.
#[derive(Clone)]
pub struct MockApiClient {
    queued: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockApiClient {
    pub fn new(replies: Vec<Vec<String>>) -> Self {
        Self {
            queued: Arc::new(Mutex::new(replies)),
        }
    }
}

impl MockStreamProducer for MockApiClient {
    fn create_mock_stream(&self, _messages: &[ConversationMessage]) -> Result<ByteStream> {
        let frames = {
            let mut queued = self.queued.lock().unwrap();
            if queued.is_empty() {
                bail!("MockApiClient: reply queue exhausted");
            }
            queued.remove(0)
        };

        let chunks: Vec<Result<Bytes>> = frames
            .into_iter()
            .map(|frame| {
                // SSE frames end with a blank line; add it if the script
                // left it off.
                let framed = if frame.ends_with("\n\n") {
                    frame
                } else {
                    format!("{frame}\n\n")
                };
                Ok(Bytes::from(framed))
            })
            .collect();

        Ok(Box::pin(stream::iter(chunks)))
    }
}
