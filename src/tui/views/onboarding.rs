//! Onboarding view - the three-step profile wizard and the loading screen

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph, Wrap};
use ratatui::Frame;

use crate::error::OnboardingError;
use crate::model::{ActivityLevel, Gender, Goal, UserProfile};
use crate::onboarding::{OnboardingFlow, Step, STEP_COUNT};
use crate::tui::widgets::{
    centered_rect, themed_block, COLOR_ACCENT, COLOR_FOCUS, COLOR_LIME, COLOR_MUTED, COLOR_PANEL,
    COLOR_PINK,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Field {
    Name,
    Gender,
    Age,
    Height,
    Weight,
    Activity,
    Goal,
    Diet,
}

impl Field {
    fn for_step(step: Step) -> &'static [Field] {
        match step {
            Step::Basics => &[Field::Name, Field::Gender, Field::Age],
            Step::Body => &[Field::Height, Field::Weight, Field::Activity],
            Step::Goals | Step::Submitted => &[Field::Goal, Field::Diet],
        }
    }

    fn label(self) -> &'static str {
        match self {
            Field::Name => "昵称",
            Field::Gender => "性别",
            Field::Age => "年龄",
            Field::Height => "身高 (cm)",
            Field::Weight => "体重 (kg)",
            Field::Activity => "日常活动量",
            Field::Goal => "主要目标",
            Field::Diet => "饮食偏好/忌口 (选填)",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Field::Name => "你的名字",
            Field::Age => "25",
            Field::Height => "175",
            Field::Weight => "70",
            Field::Diet => "例如：不吃香菜，乳糖不耐受，素食...",
            Field::Gender | Field::Activity | Field::Goal => "",
        }
    }

    fn is_choice(self) -> bool {
        matches!(self, Field::Gender | Field::Activity | Field::Goal)
    }
}

/// What a key press did to the wizard
#[derive(Debug)]
pub enum FormOutcome {
    Idle,
    Moved(Step),
    Submitted(UserProfile),
    Rejected(OnboardingError),
}

/// Wizard state plus the raw text typed into numeric fields
#[derive(Default)]
pub struct OnboardingForm {
    pub flow: OnboardingFlow,
    focus: usize,
    age: String,
    height: String,
    weight: String,
}

impl OnboardingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn fields(&self) -> &'static [Field] {
        Field::for_step(self.flow.step())
    }

    fn focused(&self) -> Field {
        let fields = self.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    fn move_focus(&mut self, delta: isize) {
        let len = self.fields().len() as isize;
        self.focus = (self.focus as isize + delta).rem_euclid(len) as usize;
    }

    fn text_value(&self, field: Field) -> String {
        let draft = self.flow.draft();
        match field {
            Field::Name => draft.name.clone(),
            Field::Age => self.age.clone(),
            Field::Height => self.height.clone(),
            Field::Weight => self.weight.clone(),
            Field::Diet => draft.dietary_restrictions.clone(),
            Field::Gender => draft.gender.to_string(),
            Field::Activity => draft.activity_level.description().to_string(),
            Field::Goal => draft.goal.label().to_string(),
        }
    }

    fn edit(&mut self, field: Field, edit: impl FnOnce(&mut String)) {
        match field {
            Field::Name => edit(&mut self.flow.draft_mut().name),
            Field::Diet => edit(&mut self.flow.draft_mut().dietary_restrictions),
            Field::Age => {
                edit(&mut self.age);
                self.flow.draft_mut().age = self.age.trim().parse().ok();
            }
            Field::Height => {
                edit(&mut self.height);
                self.flow.draft_mut().height = self.height.trim().parse().ok();
            }
            Field::Weight => {
                edit(&mut self.weight);
                self.flow.draft_mut().weight = self.weight.trim().parse().ok();
            }
            Field::Gender | Field::Activity | Field::Goal => {}
        }
    }

    fn cycle(&mut self, field: Field, delta: isize) {
        fn step<T: Copy + PartialEq>(all: &[T], current: T, delta: isize) -> T {
            let index = all.iter().position(|v| *v == current).unwrap_or(0) as isize;
            all[(index + delta).rem_euclid(all.len() as isize) as usize]
        }

        let draft = self.flow.draft_mut();
        match field {
            Field::Gender => draft.gender = step(&Gender::ALL, draft.gender, delta),
            Field::Activity => {
                draft.activity_level = step(&ActivityLevel::ALL, draft.activity_level, delta)
            }
            Field::Goal => draft.goal = step(&Goal::ALL, draft.goal, delta),
            _ => {}
        }
    }

    /// Handle a key while the wizard has focus. `busy` blocks submission.
    pub fn handle_key(&mut self, key: KeyEvent, busy: bool) -> FormOutcome {
        let field = self.focused();
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(-1),
            KeyCode::Left if field.is_choice() => self.cycle(field, -1),
            KeyCode::Right if field.is_choice() => self.cycle(field, 1),
            KeyCode::Char(' ') if field.is_choice() => self.cycle(field, 1),
            KeyCode::Esc => {
                return match self.flow.back() {
                    Ok(step) => {
                        self.focus = 0;
                        FormOutcome::Moved(step)
                    }
                    Err(e) => FormOutcome::Rejected(e),
                }
            }
            KeyCode::Enter => {
                if self.flow.step() == Step::Goals {
                    return match self.flow.submit(busy) {
                        Ok(profile) => FormOutcome::Submitted(profile),
                        Err(e) => FormOutcome::Rejected(e),
                    };
                }
                return match self.flow.advance() {
                    Ok(step) => {
                        self.focus = 0;
                        FormOutcome::Moved(step)
                    }
                    Err(e) => FormOutcome::Rejected(e),
                };
            }
            KeyCode::Backspace => self.edit(field, |s| {
                s.pop();
            }),
            KeyCode::Char(c) => match field {
                Field::Age if c.is_ascii_digit() => self.edit(field, |s| s.push(c)),
                Field::Height | Field::Weight if c.is_ascii_digit() || c == '.' => {
                    self.edit(field, |s| s.push(c))
                }
                Field::Name | Field::Diet => self.edit(field, |s| s.push(c)),
                _ => {}
            },
            _ => {}
        }
        FormOutcome::Idle
    }
}

pub fn draw_onboarding_view(frame: &mut Frame<'_>, area: Rect, form: &OnboardingForm, loading: bool) {
    let panel = centered_rect(70, 80, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(panel);

    let title = Paragraph::new(vec![
        Line::styled(
            "FitToon AI",
            Style::default().fg(COLOR_PINK).add_modifier(Modifier::BOLD),
        ),
        Line::styled("打造你的专属二次元健身计划", Style::default().fg(COLOR_MUTED)),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let step = form.flow.step();
    let gauge = Gauge::default()
        .block(themed_block(
            format!(" 第 {}/{} 步 · {} ", step.number(), STEP_COUNT, step.title()),
            COLOR_ACCENT,
        ))
        .gauge_style(Style::default().fg(COLOR_PINK).bg(COLOR_PANEL))
        .ratio(form.flow.progress().clamp(0.0, 1.0))
        .label("");
    frame.render_widget(gauge, chunks[1]);

    if loading {
        draw_loading(frame, chunks[2], form);
    } else {
        draw_fields(frame, chunks[2], form);
    }

    let actions = if loading {
        Line::styled("⏳ AI生成中...", Style::default().fg(COLOR_FOCUS))
    } else {
        match step {
            Step::Basics | Step::Body => {
                let next_style = if form.flow.can_advance() {
                    Style::default().fg(COLOR_LIME).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(COLOR_MUTED)
                };
                let back = if step == Step::Body { " · Esc 返回" } else { "" };
                Line::from(vec![
                    Span::styled("Enter 下一步", next_style),
                    Span::raw(format!("{} · Tab 切换输入 · ←/→ 选择", back)),
                ])
            }
            Step::Goals | Step::Submitted => Line::from(vec![
                Span::styled(
                    "Enter 生成计划 ⚡",
                    Style::default().fg(COLOR_LIME).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" · Esc 返回 · ←/→ 选择目标"),
            ]),
        }
    };
    let footer = Paragraph::new(actions)
        .alignment(Alignment::Center)
        .block(themed_block("", COLOR_MUTED));
    frame.render_widget(footer, chunks[3]);
}

fn draw_fields(frame: &mut Frame<'_>, area: Rect, form: &OnboardingForm) {
    let focused = form.focused();
    let mut lines = Vec::new();
    for &field in form.fields() {
        let is_focused = field == focused;
        let label_style = if is_focused {
            Style::default().fg(COLOR_FOCUS).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(COLOR_MUTED)
        };
        lines.push(Line::styled(field.label(), label_style));

        let value = form.text_value(field);
        let value_span = if field.is_choice() {
            Span::styled(
                format!("◀ {} ▶", value),
                Style::default().fg(ratatui::style::Color::White),
            )
        } else if value.is_empty() {
            Span::styled(field.placeholder(), Style::default().fg(COLOR_MUTED))
        } else {
            Span::raw(value)
        };
        let cursor = if is_focused && !field.is_choice() { "▏" } else { "" };
        lines.push(Line::from(vec![
            Span::raw(if is_focused { "› " } else { "  " }),
            value_span,
            Span::styled(cursor, Style::default().fg(COLOR_FOCUS)),
        ]));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines)
        .block(themed_block(format!(" {} ", form.flow.step().title()), COLOR_ACCENT))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_loading(frame: &mut Frame<'_>, area: Rect, form: &OnboardingForm) {
    let name = form.flow.draft().name.trim().to_string();
    let lines = vec![
        Line::from(""),
        Line::styled(
            format!("正在为 {} 打造专属计划...", name),
            Style::default().fg(COLOR_FOCUS).add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::styled("AI 教练正在热身中，请稍候 🏃", Style::default().fg(COLOR_MUTED)),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(themed_block(" AI生成中 ", COLOR_PINK));
    frame.render_widget(paragraph, area);
}
