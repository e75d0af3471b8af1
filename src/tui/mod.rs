//! Terminal front-end for fittoon
//!
//! Screens:
//! - Onboarding wizard (three steps with a progress bar)
//! - Loading screen while the weekly plan is generated
//! - Dashboard with the daily plan and weekly stats
//! - Floating coach chat, available from every screen

mod app;
mod views;
mod widgets;

pub use app::{run_tui, TuiConfig};

use chrono::{Local, TimeZone};

/// Format a millisecond timestamp as local wall-clock time ("14:05")
pub fn format_clock(ms: i64) -> String {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Ellipsize text to fit within max_chars
pub fn ellipsize(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else if max_chars == 0 {
        String::new()
    } else {
        let take = max_chars.saturating_sub(1);
        let mut result = value.chars().take(take).collect::<String>();
        result.push('…');
        result
    }
}

/// Format a calorie figure without a trailing ".0"
pub fn format_kcal(calories: f64) -> String {
    if calories.fract() == 0.0 {
        format!("{:.0}", calories)
    } else {
        format!("{:.1}", calories)
    }
}
