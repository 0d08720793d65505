//! Field rendering utilities for forms

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// What to draw for one text field
pub struct FieldView<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub placeholder: &'a str,
    pub is_active: bool,
    pub is_multiline: bool,
    /// Validation message shown on the bottom border
    pub error: Option<&'a str>,
}

/// Draw a bordered text field with its label, cursor and validation message
pub fn draw_field(frame: &mut Frame, area: Rect, field: FieldView) {
    let border_color = match (field.error.is_some(), field.is_active) {
        (true, _) => Color::Red,
        (false, true) => Color::Cyan,
        (false, false) => Color::DarkGray,
    };
    let text_style = if field.is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = Span::styled(
        if field.is_active { "▌" } else { "" },
        Style::default().fg(Color::Cyan),
    );

    let mut lines: Vec<Line> = if field.value.is_empty() {
        vec![Line::from(Span::styled(
            field.placeholder,
            Style::default().fg(Color::DarkGray),
        ))]
    } else if field.is_multiline {
        field
            .value
            .split('\n')
            .map(|l| Line::from(Span::styled(l, text_style)))
            .collect()
    } else {
        vec![Line::from(Span::styled(field.value, text_style))]
    };

    if field.value.is_empty() {
        // Cursor goes before the placeholder
        lines[0].spans.insert(0, cursor);
    } else if let Some(last) = lines.last_mut() {
        last.spans.push(cursor);
    }

    let mut block = Block::default()
        .title(format!(" {} ", field.label))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    if let Some(error) = field.error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {error} "),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    // Keep the cursor row visible, counting rows after wrapping
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let inner_height = area.height.saturating_sub(2) as usize;
    let rows = paragraph.line_count(area.width.saturating_sub(2));
    let scroll = rows.saturating_sub(inner_height.max(1)) as u16;

    let paragraph = paragraph.scroll((scroll, 0)).block(block);
    frame.render_widget(paragraph, area);
}

/// Draw a line of dimmed help text
pub fn draw_help_text(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
