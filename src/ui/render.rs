use crate::config::Theme;
use crate::diff::{RowKind, SideBySideRow};
use crate::session::SessionPhase;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

#[derive(Clone, Copy)]
pub struct Palette {
    text: Color,
    dim: Color,
    delete: Color,
    insert: Color,
    accent: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                text: Color::White,
                dim: Color::DarkGray,
                delete: Color::Red,
                insert: Color::Green,
                accent: Color::Cyan,
            },
            Theme::Light => Self {
                text: Color::Black,
                dim: Color::Gray,
                delete: Color::LightRed,
                insert: Color::LightGreen,
                accent: Color::Blue,
            },
        }
    }
}

pub fn render_header(
    frame: &mut Frame<'_>,
    area: Rect,
    model: &str,
    session_id: &str,
    palette: &Palette,
) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let short_id = session_id.get(..8).unwrap_or(session_id);
    let text = truncate_line(
        &format!("codemend  model:{model}  session:{short_id}"),
        area.width as usize,
    );
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(palette.accent)),
        area,
    );
}

/// The two diff panes. Rows are pre-paired so both panes scroll in lockstep;
/// a `None` cell renders as a blank line to keep alignment.
pub fn render_diff_panes(
    frame: &mut Frame<'_>,
    left: Rect,
    right: Rect,
    rows: &[SideBySideRow],
    placeholder: Option<&str>,
    scroll: u16,
    palette: &Palette,
) {
    let left_block = Block::default().borders(Borders::RIGHT).title("original");
    let left_inner = left_block.inner(left);
    frame.render_widget(left_block, left);

    let right_block = Block::default().borders(Borders::NONE).title("modified");
    let right_inner = right_block.inner(right);
    frame.render_widget(right_block, right);

    if let Some(placeholder) = placeholder {
        let left_lines: Vec<Line> = rows
            .iter()
            .map(|row| pane_line(row.left.as_ref(), row.kind, true, palette))
            .collect();
        frame.render_widget(
            Paragraph::new(left_lines).scroll((scroll, 0)),
            left_inner,
        );
        frame.render_widget(
            Paragraph::new(placeholder.to_string())
                .style(Style::default().fg(palette.dim).add_modifier(Modifier::ITALIC))
                .wrap(Wrap { trim: false }),
            right_inner,
        );
        return;
    }

    let left_lines: Vec<Line> = rows
        .iter()
        .map(|row| pane_line(row.left.as_ref(), row.kind, true, palette))
        .collect();
    let right_lines: Vec<Line> = rows
        .iter()
        .map(|row| pane_line(row.right.as_ref(), row.kind, false, palette))
        .collect();

    frame.render_widget(Paragraph::new(left_lines).scroll((scroll, 0)), left_inner);
    frame.render_widget(Paragraph::new(right_lines).scroll((scroll, 0)), right_inner);
}

fn pane_line<'a>(
    cell: Option<&(usize, String)>,
    kind: RowKind,
    is_left: bool,
    palette: &Palette,
) -> Line<'a> {
    let Some((number, text)) = cell else {
        return Line::from(String::new());
    };

    let style = match (kind, is_left) {
        (RowKind::Delete, true) => Style::default().fg(palette.delete),
        (RowKind::Insert, false) => Style::default().fg(palette.insert),
        _ => Style::default().fg(palette.text),
    };
    Line::styled(format!("{number:>4} {text}"), style)
}

pub fn render_status_line(frame: &mut Frame<'_>, area: Rect, status: &str, palette: &Palette) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let text = truncate_line(status, area.width as usize);
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(palette.dim)),
        area,
    );
}

/// Context-sensitive key hints; doubles as the custom-prompt input line.
pub fn render_action_bar(
    frame: &mut Frame<'_>,
    area: Rect,
    phase: SessionPhase,
    custom_input: Option<&str>,
    palette: &Palette,
) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let text = if let Some(input) = custom_input {
        format!("custom prompt> {input}")
    } else {
        match phase {
            SessionPhase::Idle => {
                "[l]int  [r]efactor  [d]ebug  [c]ustom  [e]dit  [q]uit".to_string()
            }
            SessionPhase::Streaming => "streaming...  [esc] cancel".to_string(),
            SessionPhase::AwaitingValidation => {
                "[v]alidate  [x] discard  [t] retry".to_string()
            }
        }
    };

    frame.render_widget(
        Paragraph::new(truncate_line(&text, area.width as usize))
            .style(Style::default().fg(palette.accent)),
        area,
    );

    if let Some(input) = custom_input {
        let prefix_width = "custom prompt> ".len() as u16;
        let cursor_x = area
            .x
            .saturating_add(prefix_width)
            .saturating_add(display_width(input) as u16)
            .min(area.x + area.width.saturating_sub(1));
        frame.set_cursor_position((cursor_x, area.y));
    }
}

fn display_width(text: &str) -> usize {
    text.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

fn truncate_line(input: &str, width: usize) -> String {
    let width = width.max(1);
    let mut out = String::new();
    let mut used = 0usize;

    for ch in input.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }

    out
}
