use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
            Gender::Other => write!(f, "Other"),
        }
    }
}

/// Primary training goal. Displayed (and sent to the generator) with its Chinese label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    #[default]
    #[serde(alias = "减脂")]
    LoseWeight,
    #[serde(alias = "增肌")]
    BuildMuscle,
    #[serde(alias = "保持健康")]
    Maintain,
    #[serde(alias = "提升耐力")]
    ImproveCardio,
}

impl Goal {
    pub const ALL: [Goal; 4] = [
        Goal::LoseWeight,
        Goal::BuildMuscle,
        Goal::Maintain,
        Goal::ImproveCardio,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "减脂",
            Goal::BuildMuscle => "增肌",
            Goal::Maintain => "保持健康",
            Goal::ImproveCardio => "提升耐力",
        }
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    #[serde(rename = "Lightly Active", alias = "LightlyActive")]
    LightlyActive,
    Active,
    #[serde(rename = "Very Active", alias = "VeryActive")]
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 4] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    /// Human description shown next to the option in the wizard
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "久坐不动 (办公室工作)",
            ActivityLevel::LightlyActive => "轻度活动 (每周运动1-2次)",
            ActivityLevel::Active => "活跃 (每周运动3-5次)",
            ActivityLevel::VeryActive => "非常活跃 (每天高强度运动)",
        }
    }
}

impl std::fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityLevel::Sedentary => write!(f, "Sedentary"),
            ActivityLevel::LightlyActive => write!(f, "Lightly Active"),
            ActivityLevel::Active => write!(f, "Active"),
            ActivityLevel::VeryActive => write!(f, "Very Active"),
        }
    }
}

/// A completed onboarding profile. Only built through `ProfileDraft::build`,
/// which performs the presence checks.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    /// Centimetres
    pub height: f64,
    /// Kilograms
    pub weight: f64,
    pub gender: Gender,
    pub goal: Goal,
    #[serde(default)]
    pub dietary_restrictions: String,
    pub activity_level: ActivityLevel,
}
