const FENCE: &str = "```";

/// Incrementally mirrors the fenced code block of a streaming assistant
/// message into the modified buffer.
///
/// Each call to [`observe`](Self::observe) receives the cumulative text of
/// the latest assistant message, not a delta. The fence-open offset is
/// located once, on the first match, and only the suffix past
/// `fence_start + accumulated.len()` is appended afterwards, so re-delivery
/// of identical text is a no-op and incremental extraction matches what a
/// single pass over the final text would produce.
#[derive(Debug, Default)]
pub struct CodeBlockExtractor {
    capturing: bool,
    fence_start: usize,
    accumulated: String,
    started: bool,
    finished: bool,
}

impl CodeBlockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all state for a genuinely new assistant message.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// True once a capture has been finalized for the current message.
    pub fn has_captured(&self) -> bool {
        self.finished
    }

    /// Current best-effort contents of the modified buffer, or `None` if no
    /// fenced block has started in this message.
    pub fn current(&self) -> Option<&str> {
        if self.started {
            Some(&self.accumulated)
        } else {
            None
        }
    }

    /// Feed the full text of the latest assistant message as received so far.
    pub fn observe(&mut self, message: &str) {
        // A completed capture never re-triggers within the same message.
        if self.finished {
            return;
        }

        if !self.capturing {
            let Some(content_start) = find_fence_open(message) else {
                return;
            };
            self.capturing = true;
            self.started = true;
            self.fence_start = content_start;
            self.accumulated.clear();
        }

        let consumed = self.fence_start + self.accumulated.len();
        if let Some(delta) = message.get(consumed..) {
            if !delta.is_empty() {
                self.accumulated.push_str(delta);
            }
        }
    }

    /// The response is complete: strip the last closing fence run and any
    /// trailing commentary after it, then freeze the buffer.
    ///
    /// Replies containing several fenced blocks are not disambiguated: text
    /// between blocks is retained and only the very last fence run
    /// terminates the capture. A block that never closed (the model stopped
    /// mid-fence) is kept whole rather than discarded.
    pub fn finish(&mut self) {
        if !self.capturing {
            return;
        }
        if let Some(index) = self.accumulated.rfind(FENCE) {
            self.accumulated.truncate(index);
        }
        self.capturing = false;
        self.finished = true;
    }

    /// Generation stopped abruptly (user cancel): keep whatever accumulated
    /// without finalizing a code block.
    pub fn abort(&mut self) {
        self.capturing = false;
    }
}

/// Offset of the first character after a fence-open marker: three backticks,
/// an optional ASCII language tag, and a newline. Runs of backticks not
/// followed by `[a-zA-Z]*\n` (inline code spans, for example) are skipped.
fn find_fence_open(text: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(position) = text[from..].find(FENCE) {
        let marker = from + position;
        let after_ticks = marker + FENCE.len();
        let rest = &text[after_ticks..];
        let tag_len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphabetic())
            .count();
        if rest[tag_len..].starts_with('\n') {
            return Some(after_ticks + tag_len + 1);
        }
        from = after_ticks;
    }
    None
}
