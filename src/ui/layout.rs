//! Layout components (header navigation, status bar)

use crate::app::App;
use crate::contact::StatusView;
use crate::state::{Anchor, FormRow, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into header, content and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header navigation
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Draw the header with logo and navigation entries
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let bar = Style::default().bg(Color::Black);
    let mut spans = vec![
        Span::raw(" 💡 地域おこし協力隊 × "),
        Span::styled(
            "生成AIラボ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
    ];

    let on_home = app.state.current_view == View::Home;
    for anchor in Anchor::ALL {
        let style = if on_home {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(
            format!(" {}:{} ", anchor.shortcut(), anchor.label()),
            style,
        ));
    }

    let contact_style = if app.state.current_view == View::Contact {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    spans.push(Span::raw(" "));
    spans.push(Span::styled(" c:お問い合わせ ", contact_style));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bar), area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    // Relay request indicator
    let indicator = if app.contact.is_in_flight() {
        Span::styled(" ◌ ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    };
    spans.push(indicator);
    spans.push(Span::styled(
        format!("{} ", app.state.current_view.label()),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));

    spans.push(Span::styled(
        get_view_hints(app),
        Style::default().fg(Color::Gray),
    ));

    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Yellow)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    // Quit hint on the right (double Ctrl+C to quit)
    let quit_hint = " ^C^C:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        width: (quit_hint.len() as u16).min(area.width),
        ..area
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(app: &App) -> String {
    match app.state.current_view {
        View::Home => "j/k:scroll  d/u:page  1-4:jump  c:contact  q:quit".to_string(),
        View::Contact => {
            if matches!(app.contact.status_view(), StatusView::Succeeded { .. }) {
                return "Enter:new inquiry  Esc:back".to_string();
            }
            let row_hint = match app.state.contact_form.active() {
                FormRow::Field(field) if field.is_multiline() => "Enter:newline",
                FormRow::Field(_) => "Enter:next",
                FormRow::Challenge => "Space:verify",
                FormRow::Submit => "Enter:send",
            };
            format!("Tab/S-Tab:field  {row_hint}  ^S:send  Esc:back")
        }
    }
}
