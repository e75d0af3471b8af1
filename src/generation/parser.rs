//! Turn generator text into a `WeeklyPlan`

use crate::error::GenerationError;
use crate::model::WeeklyPlan;
use tracing::debug;

pub const DAYS_PER_WEEK: usize = 7;

/// Parse generator output. The text should be bare JSON, but a fenced or
/// prose-wrapped object is accepted too.
pub fn parse_weekly_plan(raw: &str) -> Result<WeeklyPlan, GenerationError> {
    if raw.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let json_str = extract_json(raw).ok_or_else(|| {
        debug!(
            "No JSON object in generator output: {}...",
            raw.chars().take(200).collect::<String>()
        );
        GenerationError::Malformed("no JSON object found in response".to_string())
    })?;

    let plan: WeeklyPlan = serde_json::from_str(&json_str).map_err(|e| {
        if e.is_data() {
            GenerationError::SchemaMismatch(e.to_string())
        } else {
            GenerationError::Malformed(e.to_string())
        }
    })?;

    if plan.days.len() != DAYS_PER_WEEK {
        return Err(GenerationError::SchemaMismatch(format!(
            "expected {} days, got {}",
            DAYS_PER_WEEK,
            plan.days.len()
        )));
    }

    Ok(plan)
}

/// Extract a JSON object from a string that might contain markdown code blocks
fn extract_json(s: &str) -> Option<String> {
    let trimmed = s.trim();

    // The whole string is valid JSON
    if trimmed.starts_with('{') && serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return Some(trimmed.to_string());
    }

    // Fenced code block
    let re = regex::Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```").ok()?;
    for cap in re.captures_iter(s) {
        let potential_json = cap.get(1)?.as_str().trim();
        if serde_json::from_str::<serde_json::Value>(potential_json).is_ok() {
            return Some(potential_json.to_string());
        }
    }

    // First balanced object, skipping braces inside string literals
    let brace_start = s.find('{')?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escaped = false;
    let mut end = None;

    for (i, c) in s[brace_start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(brace_start + i + 1);
                    break;
                }
            }
            _ => {}
        }
    }

    let potential_json = &s[brace_start..end?];
    serde_json::from_str::<serde_json::Value>(potential_json)
        .ok()
        .map(|_| potential_json.to_string())
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Profiles and plan JSON shared by tests across modules.

    use crate::model::{ActivityLevel, Gender, Goal, UserProfile};

    pub fn sample_profile() -> UserProfile {
        UserProfile {
            name: "小红".to_string(),
            age: 26,
            height: 165.0,
            weight: 55.0,
            gender: Gender::Female,
            goal: Goal::ImproveCardio,
            dietary_restrictions: "素食".to_string(),
            activity_level: ActivityLevel::Active,
        }
    }

    pub fn day_json(day: &str, workouts: usize, calories: [f64; 3], snack: Option<f64>) -> String {
        let workouts: Vec<String> = (0..workouts)
            .map(|i| {
                format!(
                    r#"{{"name": "训练{i}", "duration": "30 分钟", "intensity": "High", "exercises": ["深蹲 4x12", "平板支撑 3x60s"]}}"#
                )
            })
            .collect();
        let meal = |name: &str, kcal: f64| {
            format!(
                r#"{{"name": "{name}", "calories": {kcal}, "macros": {{"protein": "30g", "carbs": "50g", "fats": "10g"}}, "description": "好吃又健康"}}"#
            )
        };
        let snack = snack
            .map(|kcal| format!(r#", "snack": {}"#, meal("坚果", kcal)))
            .unwrap_or_default();
        format!(
            r#"{{"day": "{day}", "focus": "燃脂", "workouts": [{}], "meals": {{"breakfast": {}, "lunch": {}, "dinner": {}{}}}, "status": "pending"}}"#,
            workouts.join(", "),
            meal("燕麦", calories[0]),
            meal("鸡胸肉沙拉", calories[1]),
            meal("三文鱼", calories[2]),
            snack
        )
    }

    /// A valid seven-day plan: day N has N % 3 workouts, Monday has a snack
    pub fn week_json() -> String {
        let names = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];
        let days: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let snack = if i == 0 { Some(200.0) } else { None };
                day_json(name, i % 3, [400.0, 600.0, 700.0], snack)
            })
            .collect();
        format!(
            r#"{{"summary": "超燃一周！💪", "days": [{}], "createdAt": "2026-10-19T08:00:00Z"}}"#,
            days.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{day_json, week_json};
    use super::*;

    #[test]
    fn test_parse_direct_json() {
        let plan = parse_weekly_plan(&week_json()).unwrap();
        assert_eq!(plan.days.len(), 7);
        assert_eq!(plan.days[0].day, "周一");
        assert_eq!(plan.days[0].meals.snack.as_ref().unwrap().calories, 200.0);
        assert_eq!(plan.created_at, "2026-10-19T08:00:00Z");
    }

    #[test]
    fn test_parse_markdown_wrapped() {
        let md = format!("好的，这是你的计划：\n\n```json\n{}\n```\n加油！", week_json());
        let plan = parse_weekly_plan(&md).unwrap();
        assert_eq!(plan.summary, "超燃一周！💪");
    }

    #[test]
    fn test_parse_prose_wrapped_with_braces_in_strings() {
        let json = week_json().replace("超燃一周！💪", "本周 {重点} 是腿");
        let raw = format!("Here you go: {} -- enjoy", json);
        let plan = parse_weekly_plan(&raw).unwrap();
        assert_eq!(plan.summary, "本周 {重点} 是腿");
    }

    #[test]
    fn test_empty_response() {
        assert!(matches!(
            parse_weekly_plan("   \n"),
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_weekly_plan(r#"{"summary": "oops", "days": [ "#),
            Err(GenerationError::Malformed(_))
        ));
        assert!(matches!(
            parse_weekly_plan("sorry, I cannot help with that"),
            Err(GenerationError::Malformed(_))
        ));
    }

    #[test]
    fn test_wrong_day_count_is_schema_mismatch() {
        let raw = format!(
            r#"{{"summary": "short", "days": [{}]}}"#,
            day_json("周一", 1, [1.0, 2.0, 3.0], None)
        );
        match parse_weekly_plan(&raw) {
            Err(GenerationError::SchemaMismatch(msg)) => assert!(msg.contains("got 1")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_missing_meal_is_schema_mismatch() {
        let json = week_json().replacen(r#""lunch""#, r#""brunch""#, 1);
        assert!(matches!(
            parse_weekly_plan(&json),
            Err(GenerationError::SchemaMismatch(_))
        ));
    }
}
