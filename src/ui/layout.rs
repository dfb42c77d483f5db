use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditorLayout {
    pub header: Rect,
    pub body: Rect,
    pub status: Rect,
    pub actions: Rect,
}

pub fn split_editor_layout(area: Rect, action_rows: u16) -> EditorLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(action_rows.max(1)),
        ])
        .split(area);

    EditorLayout {
        header: chunks[0],
        body: chunks[1],
        status: chunks[2],
        actions: chunks[3],
    }
}

/// Halve the body into the original (left) and modified (right) panes.
pub fn split_diff_panes(body: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body);
    (chunks[0], chunks[1])
}
