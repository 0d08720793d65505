//! Contact view: form rows, status banner and result panel

use super::components::{render_button, BUTTON_HEIGHT};
use super::forms::{draw_field, draw_help_text, FieldView};
use crate::app::App;
use crate::contact::{ErrorKey, StatusView};
use crate::state::FormRow;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const INTRO: &str = "生成AIラボについてのご質問やご相談など、お気軽にお問い合わせください。";

/// Draw the contact view
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" お問い合わせ ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match app.contact.status_view() {
        StatusView::Succeeded { message } => draw_success_panel(frame, inner, message),
        view => draw_form(frame, inner, app, &view),
    }
}

fn draw_success_panel(frame: &mut Frame, area: Rect, message: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(4),
            Constraint::Length(BUTTON_HEIGHT),
            Constraint::Min(0),
        ])
        .margin(1)
        .split(area);

    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            "✓ 送信完了",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(text, chunks[1]);

    let button_area = centered(chunks[2], 32);
    render_button(
        frame,
        button_area,
        "新しいお問い合わせを作成",
        true,
        true,
        Color::Green,
    );
}

fn draw_form(frame: &mut Frame, area: Rect, app: &App, view: &StatusView) {
    let form = &app.state.contact_form;
    let rows = form.rows();

    let mut constraints = vec![
        Constraint::Length(1), // Intro
        Constraint::Length(1), // Status banner
    ];
    constraints.extend(rows.iter().map(|row| {
        if row.is_multiline() {
            Constraint::Min(6)
        } else {
            Constraint::Length(BUTTON_HEIGHT)
        }
    }));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .horizontal_margin(1)
        .split(area);

    draw_help_text(frame, chunks[0], INTRO);
    draw_banner(frame, chunks[1], view);

    let errors = app.contact.errors();
    for (row, chunk) in rows.iter().zip(chunks.iter().skip(2)) {
        let is_active = form.is_active(*row);
        match row {
            FormRow::Field(field) => draw_field(
                frame,
                *chunk,
                FieldView {
                    label: field.label(),
                    value: app.contact.fields().get(*field),
                    placeholder: field.placeholder(),
                    is_active,
                    is_multiline: field.is_multiline(),
                    error: errors.get(*field),
                },
            ),
            FormRow::Challenge => draw_challenge(
                frame,
                *chunk,
                app.contact.challenge_checked(),
                is_active,
                errors.get(ErrorKey::Challenge),
            ),
            FormRow::Submit => {
                let (label, enabled) = match view {
                    StatusView::Submitting => ("送信中...", false),
                    StatusView::Failed { .. } => ("再送信する", true),
                    _ => ("送信する", true),
                };
                render_button(
                    frame,
                    centered(*chunk, 24),
                    label,
                    is_active,
                    enabled,
                    Color::Green,
                );
            }
        }
    }
}

/// One-line status under the intro
fn draw_banner(frame: &mut Frame, area: Rect, view: &StatusView) {
    let (text, color) = match view {
        StatusView::Editing {
            notice: Some(notice),
            ..
        } => {
            let color = if notice.blocking {
                Color::Red
            } else {
                Color::Yellow
            };
            (notice.message.as_str(), color)
        }
        StatusView::Editing { errors, .. } if !errors.is_empty() => {
            ("入力内容を確認してください", Color::Red)
        }
        StatusView::Editing { .. } => ("", Color::Reset),
        StatusView::Submitting => ("送信中...", Color::Yellow),
        StatusView::Failed { message } => (*message, Color::Red),
        StatusView::Succeeded { message } => (*message, Color::Green),
    };

    let banner = Paragraph::new(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(banner, area);
}

fn draw_challenge(frame: &mut Frame, area: Rect, checked: bool, is_active: bool, error: Option<&str>) {
    let border_color = match (error.is_some(), is_active) {
        (true, _) => Color::Red,
        (false, true) => Color::Cyan,
        (false, false) => Color::DarkGray,
    };
    let mark = if checked { "[x]" } else { "[ ]" };
    let mark_style = if checked {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let mut block = Block::default()
        .title(" 認証 ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    if let Some(error) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {error} "),
            Style::default().fg(Color::Red),
        )));
    }

    let content = Line::from(vec![
        Span::styled(mark, mark_style),
        Span::raw(" 私はロボットではありません"),
        Span::styled("  (Space)", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// A horizontally centered slice of `area`, at most `width` wide
fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}
