use serde::{Deserialize, Serialize};

/// A full week of workouts and meals, replaced wholesale on every regeneration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlan {
    pub summary: String,

    /// Calendar order, Monday first
    pub days: Vec<DailyPlan>,

    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DailyPlan {
    /// Label such as "周一" or "Monday"
    pub day: String,

    /// Theme of the day, e.g. "腿部训练日"
    pub focus: String,

    /// Empty on rest days
    #[serde(default)]
    pub workouts: Vec<Workout>,

    pub meals: Meals,

    /// Carried for forward compatibility; nothing reads or writes it yet.
    #[serde(default)]
    pub status: DayStatus,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Meals {
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snack: Option<Meal>,
}

impl Meals {
    /// Meals in serving order with their slot label
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Meal)> {
        [
            ("早餐", Some(&self.breakfast)),
            ("午餐", Some(&self.lunch)),
            ("晚餐", Some(&self.dinner)),
            ("加餐", self.snack.as_ref()),
        ]
        .into_iter()
        .filter_map(|(label, meal)| meal.map(|m| (label, m)))
    }

    /// Sum of every meal's calories, snack included when present
    pub fn total_calories(&self) -> f64 {
        self.iter().map(|(_, meal)| meal.calories).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Workout {
    pub name: String,

    /// Free-form, e.g. "45 分钟"
    #[serde(default)]
    pub duration: String,

    #[serde(default)]
    pub intensity: Intensity,

    #[serde(default)]
    pub exercises: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Intensity {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intensity::Low => write!(f, "Low"),
            Intensity::Medium => write!(f, "Medium"),
            Intensity::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Meal {
    pub name: String,

    pub calories: f64,

    #[serde(default)]
    pub macros: Macros,

    #[serde(default)]
    pub description: String,
}

/// Macro magnitudes are kept exactly as the generator wrote them ("30g", "约 40 克").
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Macros {
    #[serde(default)]
    pub protein: String,
    #[serde(default)]
    pub carbs: String,
    #[serde(default)]
    pub fats: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    #[default]
    Pending,
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(calories: f64) -> Meal {
        Meal {
            name: "燕麦".to_string(),
            calories,
            macros: Macros::default(),
            description: String::new(),
        }
    }

    #[test]
    fn test_total_calories_without_snack() {
        let meals = Meals {
            breakfast: meal(400.0),
            lunch: meal(600.0),
            dinner: meal(700.0),
            snack: None,
        };
        assert_eq!(meals.total_calories(), 1700.0);
        assert_eq!(meals.iter().count(), 3);
    }

    #[test]
    fn test_total_calories_with_snack() {
        let meals = Meals {
            breakfast: meal(400.0),
            lunch: meal(600.0),
            dinner: meal(700.0),
            snack: Some(meal(150.0)),
        };
        assert_eq!(meals.total_calories(), 1850.0);
        let labels: Vec<_> = meals.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["早餐", "午餐", "晚餐", "加餐"]);
    }

    #[test]
    fn test_day_defaults() {
        let json = r#"{
            "day": "周日",
            "focus": "休息日",
            "meals": {
                "breakfast": {"name": "a", "calories": 1},
                "lunch": {"name": "b", "calories": 2},
                "dinner": {"name": "c", "calories": 3}
            }
        }"#;
        let day: DailyPlan = serde_json::from_str(json).unwrap();
        assert!(day.workouts.is_empty());
        assert_eq!(day.status, DayStatus::Pending);
        assert!(day.meals.snack.is_none());
    }

    #[test]
    fn test_missing_dinner_is_rejected() {
        let json = r#"{
            "day": "周一",
            "focus": "腿",
            "meals": {
                "breakfast": {"name": "a", "calories": 1},
                "lunch": {"name": "b", "calories": 2}
            }
        }"#;
        assert!(serde_json::from_str::<DailyPlan>(json).is_err());
    }
}
