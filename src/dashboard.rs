//! Plan viewer state and the weekly statistics shown on the stats tab.

use crate::model::{DailyPlan, WeeklyPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Plan,
    Stats,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Plan, Tab::Stats];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Plan => "计划",
            Tab::Stats => "统计",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Plan => 0,
            Tab::Stats => 1,
        }
    }

    pub fn toggle(&self) -> Tab {
        match self {
            Tab::Plan => Tab::Stats,
            Tab::Stats => Tab::Plan,
        }
    }
}

/// Which day and tab are showing. The selected index always points at a real day.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    selected_day: usize,
    pub tab: Tab,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_day(&self) -> usize {
        self.selected_day
    }

    pub fn select_day(&mut self, index: usize, plan: &WeeklyPlan) {
        self.selected_day = index.min(plan.days.len().saturating_sub(1));
    }

    pub fn next_day(&mut self, plan: &WeeklyPlan) {
        self.select_day(self.selected_day + 1, plan);
    }

    pub fn previous_day(&mut self, plan: &WeeklyPlan) {
        self.select_day(self.selected_day.saturating_sub(1), plan);
    }

    pub fn current<'a>(&self, plan: &'a WeeklyPlan) -> Option<&'a DailyPlan> {
        plan.days.get(self.selected_day)
    }
}

/// One bar of the calorie chart
#[derive(Debug, Clone, PartialEq)]
pub struct DayStats {
    pub label: String,
    pub calories: f64,
    pub workouts: usize,
}

pub fn daily_calories(day: &DailyPlan) -> f64 {
    day.meals.total_calories()
}

pub fn weekly_workouts(plan: &WeeklyPlan) -> usize {
    plan.days.iter().map(|d| d.workouts.len()).sum()
}

/// Per-day totals labelled with the first three characters of the day name
pub fn calorie_chart(plan: &WeeklyPlan) -> Vec<DayStats> {
    plan.days
        .iter()
        .map(|day| DayStats {
            label: day.day.chars().take(3).collect(),
            calories: daily_calories(day),
            workouts: day.workouts.len(),
        })
        .collect()
}

pub fn average_calories(plan: &WeeklyPlan) -> f64 {
    if plan.days.is_empty() {
        return 0.0;
    }
    plan.days.iter().map(daily_calories).sum::<f64>() / plan.days.len() as f64
}
