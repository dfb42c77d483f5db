use super::logging::emit_sse_parse_error;
use crate::types::StreamEvent;
use anyhow::Result;

const KNOWN_EVENT_TYPES: [&str; 6] = [
    "message_start",
    "content_block_start",
    "content_block_delta",
    "content_block_stop",
    "message_delta",
    "message_stop",
];

/// Incremental SSE parser. Chunks may split an event anywhere; the parser
/// buffers until the `\n\n` frame boundary and only then decodes.
#[derive(Default)]
pub struct StreamParser {
    buffer: String,
}

impl StreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, chunk: &[u8]) -> Result<Vec<StreamEvent>> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut events = Vec::new();
        let mut start = 0;
        while let Some(end) = self.buffer[start..].find("\n\n") {
            let frame_end = start + end + 2;
            if let Some(event) = decode_frame(&self.buffer[start..frame_end]) {
                events.push(event);
            }
            start = frame_end;
        }

        if start > 0 {
            self.buffer.drain(..start);
        }

        Ok(events)
    }
}

fn decode_frame(frame: &str) -> Option<StreamEvent> {
    let mut event_type = None;
    let mut data = None;

    for line in frame.lines() {
        if let Some(rest) = line.strip_prefix("event: ") {
            event_type = Some(rest.to_string());
        } else if let Some(rest) = line.strip_prefix("data: ") {
            data = Some(rest.trim().to_string());
        }
    }

    let json_data = data?;
    if json_data == "[DONE]" {
        return None;
    }
    if let Some(evt_type) = &event_type {
        if !KNOWN_EVENT_TYPES.contains(&evt_type.as_str()) {
            return None;
        }
    }

    match serde_json::from_str::<StreamEvent>(&json_data) {
        Ok(event) => Some(event),
        Err(error) => {
            emit_sse_parse_error(event_type.as_deref(), &json_data, &error);
            None
        }
    }
}
