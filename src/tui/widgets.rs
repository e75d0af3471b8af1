//! Reusable TUI widgets

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

// Color scheme
pub const COLOR_BG: Color = Color::Rgb(15, 23, 42);
pub const COLOR_PANEL: Color = Color::Rgb(30, 41, 59);
pub const COLOR_MUTED: Color = Color::Rgb(148, 163, 184);
pub const COLOR_ACCENT: Color = Color::Rgb(129, 140, 248);
pub const COLOR_PINK: Color = Color::Rgb(244, 114, 182);
pub const COLOR_CYAN: Color = Color::Rgb(34, 211, 238);
pub const COLOR_LIME: Color = Color::Rgb(132, 204, 22);
pub const COLOR_FOCUS: Color = Color::Rgb(250, 204, 21);

/// Status message tone for styling
#[derive(Clone, Copy, Default)]
pub enum StatusTone {
    #[default]
    Info,
    Success,
    Error,
    Warning,
}

impl StatusTone {
    pub fn color(self) -> Color {
        match self {
            StatusTone::Info => COLOR_CYAN,
            StatusTone::Success => Color::Green,
            StatusTone::Error => Color::Red,
            StatusTone::Warning => Color::Yellow,
        }
    }
}

/// Create a themed block with consistent styling
pub fn themed_block(title: impl Into<String>, border_color: Color) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            title.into(),
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(COLOR_PANEL).fg(Color::White))
}

/// Create a centered rectangle for modal dialogs
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Blocking alert: drawn over everything until dismissed
pub fn draw_alert(frame: &mut Frame<'_>, message: &str) {
    let popup = centered_rect(60, 30, frame.size());
    frame.render_widget(Clear, popup);
    let text = vec![
        Line::from(""),
        Line::styled(
            message.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::styled("按 Enter 确定", Style::default().fg(COLOR_MUTED)),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(ratatui::layout::Alignment::Center)
        .block(themed_block(" ⚠ 出错了 ", Color::Red))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup);
}

/// Draw a status bar with message and help text
pub fn draw_status_bar(
    frame: &mut Frame<'_>,
    area: Rect,
    message: &str,
    tone: StatusTone,
    help_line: &str,
) {
    let info = Line::styled(
        message.to_string(),
        Style::default()
            .fg(tone.color())
            .add_modifier(Modifier::BOLD),
    );
    let help = Line::styled(help_line.to_string(), Style::default().fg(COLOR_MUTED));

    let paragraph = Paragraph::new(vec![info, help])
        .block(themed_block("Status", COLOR_ACCENT))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
