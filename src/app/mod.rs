use crate::api::logging::emit_rejected_action;
use crate::api::ApiClient;
use crate::config::{Config, Theme};
use crate::diff::{side_by_side_rows, SideBySideRow};
use crate::error::SessionError;
use crate::session::{prompt::build_prompt, EditAction, Session, SessionPhase, PLACEHOLDER};
use crate::store::TokenStore;
use crate::terminal;
use crate::transport::{ChatTransport, TransportUpdate};
use crate::ui::layout::{split_diff_panes, split_editor_layout};
use crate::ui::render::{
    render_action_bar, render_diff_panes, render_header, render_status_line, Palette,
};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use std::time::Duration;
use tokio::sync::mpsc;

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(40);
const PAGE_SCROLL_ROWS: u16 = 10;

/// Cooperative event loop tying the pieces together: key events become
/// routed actions, transport updates drive the extractor, and every tick
/// redraws the diff.
pub struct App {
    session: Session,
    transport: ChatTransport,
    update_rx: mpsc::UnboundedReceiver<TransportUpdate>,
    theme: Theme,
    model: String,
    rows: Vec<SideBySideRow>,
    status: String,
    custom_input: Option<String>,
    scroll: u16,
    quit: bool,
}

impl App {
    pub fn new(config: Config, snippet: String) -> Result<Self> {
        let preview_token = if config.preview {
            TokenStore::at_default_path().load()?
        } else {
            None
        };
        let client = ApiClient::new(&config, preview_token);
        let (transport, update_rx) = ChatTransport::new(client);

        Ok(Self::with_parts(
            Session::new(snippet, config.preview),
            transport,
            update_rx,
            config.theme,
            config.model,
        ))
    }

    fn with_parts(
        session: Session,
        transport: ChatTransport,
        update_rx: mpsc::UnboundedReceiver<TransportUpdate>,
        theme: Theme,
        model: String,
    ) -> Self {
        let mut app = Self {
            session,
            transport,
            update_rx,
            theme,
            model,
            rows: Vec::new(),
            status: "ready".to_string(),
            custom_input: None,
            scroll: 0,
            quit: false,
        };
        app.refresh_rows();
        app
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut term = terminal::setup()?;
        let result = self.event_loop(&mut term).await;
        terminal::restore();
        result
    }

    async fn event_loop(&mut self, term: &mut terminal::EditorTerminal) -> Result<()> {
        while !self.quit {
            while let Ok(update) = self.update_rx.try_recv() {
                self.on_transport_update(update);
            }

            term.draw(|frame| self.draw(frame))?;

            if event::poll(EVENT_POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.on_key(key);
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let palette = Palette::for_theme(self.theme);
        let bands = split_editor_layout(frame.area(), 1);

        render_header(frame, bands.header, &self.model, self.session.id(), &palette);

        let (left, right) = split_diff_panes(bands.body);
        let placeholder = if self.session.modified().is_none() {
            Some(PLACEHOLDER)
        } else {
            None
        };
        render_diff_panes(
            frame,
            left,
            right,
            &self.rows,
            placeholder,
            self.scroll,
            &palette,
        );

        let mut status = format!("{} | {}", self.session.phase().label(), self.status);
        if self.session.is_preview() {
            status = format!("preview | {status}");
        }
        render_status_line(frame, bands.status, &status, &palette);
        render_action_bar(
            frame,
            bands.actions,
            self.session.phase(),
            self.custom_input.as_deref(),
            &palette,
        );
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.transport.stop();
            self.quit = true;
            return;
        }

        if self.custom_input.is_some() {
            match key.code {
                KeyCode::Enter => {
                    let prompt = self.custom_input.take().unwrap_or_default();
                    self.dispatch(EditAction::Custom(prompt));
                }
                KeyCode::Esc => self.custom_input = None,
                KeyCode::Backspace => {
                    if let Some(input) = self.custom_input.as_mut() {
                        input.pop();
                    }
                }
                KeyCode::Char(ch) => {
                    if let Some(input) = self.custom_input.as_mut() {
                        input.push(ch);
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.transport.stop();
                self.quit = true;
            }
            KeyCode::Char('l') => self.dispatch(EditAction::Lint),
            KeyCode::Char('r') => self.dispatch(EditAction::Refactor),
            KeyCode::Char('d') => self.dispatch(EditAction::Debug),
            KeyCode::Char('e') => self.dispatch(EditAction::Edit),
            KeyCode::Char('c') => {
                if self.session.phase() == SessionPhase::Idle {
                    self.custom_input = Some(String::new());
                }
            }
            KeyCode::Char('v') => self.dispatch(EditAction::Validate),
            KeyCode::Char('x') => self.dispatch(EditAction::Discard),
            KeyCode::Char('t') => self.dispatch(EditAction::Retry),
            KeyCode::Esc => self.dispatch(EditAction::Cancel),
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(PAGE_SCROLL_ROWS),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(PAGE_SCROLL_ROWS),
            _ => {}
        }
    }

    /// Route one action through the phase machine.
    fn dispatch(&mut self, action: EditAction) {
        if !self.session.permits(&action) {
            emit_rejected_action(action.tag(), self.session.phase().label());
            self.status = format!(
                "'{}' is not available while {}",
                action.tag(),
                self.session.phase().label()
            );
            return;
        }

        match action {
            EditAction::Cancel => {
                self.transport.stop();
                self.session.cancel();
                self.status = "generation cancelled".to_string();
            }
            EditAction::Validate => {
                self.session.validated();
                self.status = "edit accepted".to_string();
            }
            EditAction::Discard => {
                self.transport.pop_last();
                self.session.discarded();
                self.status = "last reply discarded".to_string();
            }
            EditAction::Retry => {
                self.transport.reload();
                self.session.retried();
                self.status = "regenerating...".to_string();
            }
            action => self.send_prompt(action),
        }
    }

    fn send_prompt(&mut self, action: EditAction) {
        let prompt = match build_prompt(
            &action,
            self.session.original(),
            self.session.modified(),
            self.transport.messages(),
        ) {
            Ok(Some(prompt)) => prompt,
            Ok(None) => {
                self.status = format!("nothing to {}: buffer is empty", action.tag());
                return;
            }
            Err(error) => {
                self.status = error.to_string();
                return;
            }
        };

        self.transport.append(prompt);
        self.session.prompt_sent();
        self.status = format!("{} request sent", action.tag());
    }

    fn on_transport_update(&mut self, update: TransportUpdate) {
        self.transport.apply_update(&update);

        match update {
            TransportUpdate::AssistantText(text) => {
                self.session.observe_stream(&text);
                self.refresh_rows();
            }
            TransportUpdate::Completed => {
                let was_streaming = self.session.phase() == SessionPhase::Streaming;
                self.session.finish_stream();
                self.refresh_rows();
                if was_streaming {
                    self.status = match self.session.phase() {
                        SessionPhase::AwaitingValidation => {
                            "response complete: validate, discard, or retry".to_string()
                        }
                        _ => "response contained no code block".to_string(),
                    };
                }
            }
            TransportUpdate::Unauthorized => {
                // Buffers and history stay untouched; only a notice is shown.
                self.session.cancel();
                self.status = SessionError::Unauthorized.to_string();
            }
            TransportUpdate::Failed(message) => {
                self.session.cancel();
                self.status = format!("request failed: {message}");
            }
        }
    }

    fn refresh_rows(&mut self) {
        let modified = self.session.modified().unwrap_or_else(|| self.session.original());
        self.rows = side_by_side_rows(self.session.original(), modified);
    }
}
