//! Dashboard view - greeting header, day selector, daily plan and weekly stats

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use crate::dashboard::{
    average_calories, calorie_chart, daily_calories, weekly_workouts, DashboardState, Tab,
};
use crate::model::{DailyPlan, Intensity, UserProfile, WeeklyPlan};
use crate::tui::widgets::{
    themed_block, COLOR_ACCENT, COLOR_CYAN, COLOR_FOCUS, COLOR_LIME, COLOR_MUTED, COLOR_PINK,
};
use crate::tui::{ellipsize, format_kcal};

const SUMMARY_PREVIEW_CHARS: usize = 100;

pub fn draw_dashboard_view(
    frame: &mut Frame<'_>,
    area: Rect,
    profile: &UserProfile,
    plan: &WeeklyPlan,
    state: &DashboardState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(10)])
        .split(area);

    draw_header(frame, chunks[0], profile, plan, state);

    match state.tab {
        Tab::Plan => draw_plan_tab(frame, chunks[1], plan, state),
        Tab::Stats => draw_stats_tab(frame, chunks[1], profile, plan),
    }
}

fn draw_header(
    frame: &mut Frame<'_>,
    area: Rect,
    profile: &UserProfile,
    plan: &WeeklyPlan,
    state: &DashboardState,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(24)])
        .split(area);

    let focus = state
        .current(plan)
        .map(|d| d.focus.as_str())
        .unwrap_or("-");
    let greeting = Paragraph::new(vec![
        Line::styled(
            format!("Hi, {}! 👋", profile.name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Line::styled(format!("今日目标: {}", focus), Style::default().fg(COLOR_MUTED)),
    ])
    .block(themed_block(" FitToon ", COLOR_PINK));
    frame.render_widget(greeting, chunks[0]);

    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();
    let tabs = Tabs::new(titles)
        .select(state.tab.index())
        .block(themed_block(" Tab 切换 ", COLOR_ACCENT))
        .highlight_style(Style::default().fg(COLOR_FOCUS).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[1]);
}

fn draw_plan_tab(frame: &mut Frame<'_>, area: Rect, plan: &WeeklyPlan, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(4), Constraint::Min(6)])
        .split(area);

    let days: Vec<Line> = plan.days.iter().map(|d| Line::from(d.day.clone())).collect();
    let selector = Tabs::new(days)
        .select(state.selected_day())
        .block(themed_block(" ←/→ 选择日期 ", COLOR_ACCENT))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(selector, chunks[0]);

    let Some(day) = state.current(plan) else {
        let empty = Paragraph::new("请选择日期查看计划").block(themed_block("", COLOR_MUTED));
        frame.render_widget(empty, chunks[2]);
        return;
    };

    let summary = Paragraph::new(vec![
        Line::styled(
            format!("{} - {}", day.day, day.focus),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            ellipsize(&plan.summary, SUMMARY_PREVIEW_CHARS),
            Style::default().fg(COLOR_MUTED),
        ),
    ])
    .block(themed_block("", COLOR_ACCENT))
    .wrap(Wrap { trim: true });
    frame.render_widget(summary, chunks[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    frame.render_widget(workouts_panel(day), columns[0]);
    frame.render_widget(meals_panel(day), columns[1]);
}

fn intensity_color(intensity: Intensity) -> Color {
    match intensity {
        Intensity::High => Color::Red,
        Intensity::Medium => Color::Yellow,
        Intensity::Low => Color::Green,
    }
}

fn workouts_panel(day: &DailyPlan) -> Paragraph<'static> {
    let mut lines = Vec::new();
    if day.workouts.is_empty() {
        lines.push(Line::styled(
            "今日休息日！好好恢复 💪",
            Style::default().fg(COLOR_MUTED),
        ));
    }
    for workout in &day.workouts {
        lines.push(Line::from(vec![
            Span::styled(
                workout.name.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("[{} Intensity]", workout.intensity),
                Style::default().fg(intensity_color(workout.intensity)),
            ),
        ]));
        lines.push(Line::styled(
            workout.duration.clone(),
            Style::default().fg(COLOR_MUTED),
        ));
        for exercise in &workout.exercises {
            lines.push(Line::from(vec![
                Span::styled(" • ", Style::default().fg(COLOR_CYAN)),
                Span::raw(exercise.clone()),
            ]));
        }
        lines.push(Line::from(""));
    }

    Paragraph::new(lines)
        .block(themed_block(" 🏋 今日训练 ", COLOR_CYAN))
        .wrap(Wrap { trim: true })
}

fn meals_panel(day: &DailyPlan) -> Paragraph<'static> {
    let mut lines = Vec::new();
    for (slot, meal) in day.meals.iter() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", slot),
                Style::default().fg(COLOR_FOCUS).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                meal.name.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {} kcal", format_kcal(meal.calories)),
                Style::default().fg(COLOR_MUTED),
            ),
        ]));
        if !meal.description.is_empty() {
            lines.push(Line::styled(
                meal.description.clone(),
                Style::default().fg(COLOR_MUTED),
            ));
        }
        lines.push(Line::styled(
            format!(
                "P: {}  C: {}  F: {}",
                meal.macros.protein, meal.macros.carbs, meal.macros.fats
            ),
            Style::default().fg(Color::DarkGray),
        ));
        lines.push(Line::from(""));
    }
    lines.push(Line::styled(
        format!("合计 {} kcal", format_kcal(daily_calories(day))),
        Style::default().fg(COLOR_PINK).add_modifier(Modifier::BOLD),
    ));

    Paragraph::new(lines)
        .block(themed_block(" 🔥 今日饮食 ", COLOR_PINK))
        .wrap(Wrap { trim: true })
}

fn stat_card(title: &str, value: String, unit: &str, color: Color) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::styled(title.to_string(), Style::default().fg(COLOR_MUTED)),
        Line::from(vec![
            Span::styled(
                value,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", unit), Style::default().fg(COLOR_MUTED)),
        ]),
    ])
    .block(themed_block("", color))
}

fn draw_stats_tab(frame: &mut Frame<'_>, area: Rect, profile: &UserProfile, plan: &WeeklyPlan) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(8)])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[0]);

    frame.render_widget(
        stat_card("当前体重", profile.weight.to_string(), "kg", COLOR_ACCENT),
        cards[0],
    );
    frame.render_widget(
        stat_card("目标", profile.goal.label().to_string(), "", COLOR_PINK),
        cards[1],
    );
    frame.render_widget(
        stat_card("本周训练", weekly_workouts(plan).to_string(), "节课", COLOR_LIME),
        cards[2],
    );

    let stats = calorie_chart(plan);
    let bars: Vec<Bar> = stats
        .iter()
        .map(|day| {
            // rest days are drawn muted
            let color = if day.workouts == 0 { COLOR_MUTED } else { COLOR_ACCENT };
            Bar::default()
                .label(Line::from(day.label.clone()))
                .value(day.calories.max(0.0).round() as u64)
                .text_value(format_kcal(day.calories))
                .style(Style::default().fg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(themed_block(
            format!(
                " 卡路里摄入预测 · 日均 {} kcal ",
                format_kcal(average_calories(plan).round())
            ),
            COLOR_ACCENT,
        ))
        .data(BarGroup::default().bars(&bars))
        .bar_width(8)
        .bar_gap(2)
        .bar_style(Style::default().fg(COLOR_ACCENT))
        .value_style(Style::default().fg(Color::Black).bg(COLOR_ACCENT));
    frame.render_widget(chart, chunks[1]);
}
