//! Floating coach chat panel

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::model::{ChatMessage, Role};
use crate::tui::format_clock;
use crate::tui::widgets::{themed_block, COLOR_ACCENT, COLOR_CYAN, COLOR_FOCUS, COLOR_MUTED, COLOR_PINK};

const PANEL_WIDTH: u16 = 48;
const PANEL_HEIGHT: u16 = 24;

/// What the panel wants the app to do after a key press
pub enum ChatAction {
    None,
    Close,
    Send(String),
    /// Enter pressed while the coach is still answering; the input is kept
    Waiting,
}

#[derive(Default)]
pub struct ChatPanel {
    pub open: bool,
    input: String,
}

impl ChatPanel {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn handle_key(&mut self, key: KeyEvent, typing: bool) -> ChatAction {
        match key.code {
            KeyCode::Esc => {
                self.open = false;
                ChatAction::Close
            }
            KeyCode::Enter if typing => ChatAction::Waiting,
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.input);
                if text.trim().is_empty() {
                    ChatAction::None
                } else {
                    ChatAction::Send(text)
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                ChatAction::None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                ChatAction::None
            }
            _ => ChatAction::None,
        }
    }
}

/// Bottom-right floating panel, like a chat bubble over the page
fn panel_area(area: Rect) -> Rect {
    let width = PANEL_WIDTH.min(area.width.saturating_sub(2));
    let height = PANEL_HEIGHT.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + area.height.saturating_sub(height + 1),
        width,
        height,
    }
}

fn message_lines(message: &ChatMessage) -> Vec<Line<'static>> {
    let (who, color) = match message.role {
        Role::User => ("你", COLOR_PINK),
        Role::Model => ("教练", COLOR_CYAN),
    };
    vec![
        Line::from(vec![
            Span::styled(
                who.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {}", format_clock(message.timestamp)),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(message.text.clone()),
        Line::from(""),
    ]
}

pub fn draw_chat_panel(
    frame: &mut Frame<'_>,
    area: Rect,
    panel: &ChatPanel,
    transcript: &[ChatMessage],
    typing: bool,
) {
    let popup = panel_area(area);
    if popup.height < 6 {
        return;
    }
    frame.render_widget(Clear, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(popup);

    let mut lines: Vec<Line> = transcript.iter().flat_map(message_lines).collect();
    if typing {
        lines.push(Line::styled(
            "教练正在输入...",
            Style::default().fg(COLOR_MUTED).add_modifier(Modifier::ITALIC),
        ));
    }

    // Keep the newest messages in view
    let inner_height = chunks[0].height.saturating_sub(2);
    let inner_width = chunks[0].width.saturating_sub(2).max(1) as usize;
    let rendered: usize = lines
        .iter()
        .map(|l| (l.width().max(1) + inner_width - 1) / inner_width)
        .sum();
    let scroll = rendered.saturating_sub(inner_height as usize) as u16;

    let history = Paragraph::new(lines)
        .block(themed_block(" 🤖 AI 教练助手 · Esc 关闭 ", COLOR_ACCENT))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(history, chunks[0]);

    let input = if panel.input.is_empty() {
        Line::styled("询问计划调整...", Style::default().fg(COLOR_MUTED))
    } else {
        Line::from(vec![
            Span::raw(panel.input.clone()),
            Span::styled("▏", Style::default().fg(COLOR_FOCUS)),
        ])
    };
    let title = if typing { " 等待回复... " } else { " Enter 发送 " };
    let input = Paragraph::new(input).block(themed_block(title, COLOR_FOCUS));
    frame.render_widget(input, chunks[1]);
}
