pub mod action;
pub mod extractor;
pub mod prompt;

pub use action::EditAction;
pub use extractor::CodeBlockExtractor;

use uuid::Uuid;

/// Shown on the modified pane until a fenced block has been captured.
pub const PLACEHOLDER: &str = "// Choose an action below to edit your code.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Streaming,
    AwaitingValidation,
}

impl SessionPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Streaming => "streaming",
            Self::AwaitingValidation => "awaiting-validation",
        }
    }
}

/// One editing interaction: an opaque id, the immutable original buffer, the
/// extractor-owned modified buffer, and the phase machine gating actions.
///
/// The modified buffer is only ever written through the extractor; action
/// handlers read it via [`modified`](Self::modified).
pub struct Session {
    id: String,
    original: String,
    extractor: CodeBlockExtractor,
    phase: SessionPhase,
    preview: bool,
}

impl Session {
    pub fn new(original: String, preview: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            original,
            extractor: CodeBlockExtractor::new(),
            phase: SessionPhase::Idle,
            preview,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn modified(&self) -> Option<&str> {
        self.extractor.current()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    /// Which actions the phase machine accepts right now. Everything else is
    /// rejected by the router without a transition.
    pub fn permits(&self, action: &EditAction) -> bool {
        match self.phase {
            SessionPhase::Idle => action.sends_prompt(),
            SessionPhase::Streaming => matches!(action, EditAction::Cancel),
            SessionPhase::AwaitingValidation => matches!(
                action,
                EditAction::Validate | EditAction::Discard | EditAction::Retry
            ),
        }
    }

    /// A prompt was handed to the transport; a fresh assistant message will
    /// begin streaming.
    pub fn prompt_sent(&mut self) {
        self.extractor.reset();
        self.phase = SessionPhase::Streaming;
    }

    /// Feed the cumulative text of the in-flight assistant message.
    pub fn observe_stream(&mut self, latest_assistant_text: &str) {
        if self.phase == SessionPhase::Streaming {
            self.extractor.observe(latest_assistant_text);
        }
    }

    /// The transport finished streaming. Moves to AwaitingValidation only if
    /// a code block was captured; otherwise back to Idle with the
    /// placeholder still showing.
    pub fn finish_stream(&mut self) {
        if self.phase != SessionPhase::Streaming {
            return;
        }
        self.extractor.finish();
        self.phase = if self.extractor.has_captured() {
            SessionPhase::AwaitingValidation
        } else {
            SessionPhase::Idle
        };
    }

    /// Generation was cancelled (or failed) mid-stream: keep whatever the
    /// extractor accumulated, do not finalize a block, return to Idle.
    pub fn cancel(&mut self) {
        self.extractor.abort();
        self.phase = SessionPhase::Idle;
    }

    pub fn validated(&mut self) {
        self.phase = SessionPhase::Idle;
    }

    /// The edit was rejected: drop the captured block with the reply.
    pub fn discarded(&mut self) {
        self.extractor.reset();
        self.phase = SessionPhase::Idle;
    }

    /// Regeneration was requested; the next assistant message replaces the
    /// retried one.
    pub fn retried(&mut self) {
        self.extractor.reset();
        self.phase = SessionPhase::Streaming;
    }
}
