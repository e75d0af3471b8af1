//! Three-step profile wizard.
//!
//! Basics (name, age) -> Body (height, weight) -> Goals (goal, activity, diet).
//! Moving forward checks the current step's required fields; moving back keeps
//! everything entered so far. Submission assembles a `UserProfile`.

use crate::error::OnboardingError;
use crate::model::{ActivityLevel, Gender, Goal, UserProfile};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Basics,
    Body,
    Goals,
    Submitted,
}

impl Step {
    pub fn next(&self) -> Option<Step> {
        match self {
            Step::Basics => Some(Step::Body),
            Step::Body => Some(Step::Goals),
            Step::Goals | Step::Submitted => None,
        }
    }

    pub fn previous(&self) -> Option<Step> {
        match self {
            Step::Body => Some(Step::Basics),
            Step::Goals => Some(Step::Body),
            Step::Basics | Step::Submitted => None,
        }
    }

    /// 1-based position among the input steps
    pub fn number(&self) -> usize {
        match self {
            Step::Basics => 1,
            Step::Body => 2,
            Step::Goals | Step::Submitted => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::Basics => "基础档案",
            Step::Body => "身体数据",
            Step::Goals | Step::Submitted => "目标与饮食",
        }
    }
}

pub const STEP_COUNT: usize = 3;

/// Partially entered profile. Also the shape of a `--profile` file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileDraft {
    pub name: String,
    pub age: Option<u32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub gender: Gender,
    pub goal: Goal,
    pub dietary_restrictions: String,
    pub activity_level: ActivityLevel,
}

impl ProfileDraft {
    fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Required fields of `step` that are still absent
    pub fn missing_for(&self, step: Step) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match step {
            Step::Basics => {
                if !self.has_name() {
                    missing.push("name");
                }
                if !self.age.is_some_and(|a| a > 0) {
                    missing.push("age");
                }
            }
            Step::Body => {
                if !self.height.is_some_and(|h| h > 0.0) {
                    missing.push("height");
                }
                if !self.weight.is_some_and(|w| w > 0.0) {
                    missing.push("weight");
                }
            }
            Step::Goals | Step::Submitted => {}
        }
        missing
    }

    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = self.missing_for(Step::Basics);
        missing.extend(self.missing_for(Step::Body));
        missing
    }

    pub fn build(&self) -> Result<UserProfile, OnboardingError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(OnboardingError::MissingFields(missing));
        }
        Ok(UserProfile {
            name: self.name.trim().to_string(),
            age: self.age.unwrap_or_default(),
            height: self.height.unwrap_or_default(),
            weight: self.weight.unwrap_or_default(),
            gender: self.gender,
            goal: self.goal,
            dietary_restrictions: self.dietary_restrictions.trim().to_string(),
            activity_level: self.activity_level,
        })
    }
}

#[derive(Debug, Default)]
pub struct OnboardingFlow {
    step: Step,
    draft: ProfileDraft,
}

impl OnboardingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ProfileDraft {
        &mut self.draft
    }

    pub fn can_advance(&self) -> bool {
        self.step.next().is_some() && self.draft.missing_for(self.step).is_empty()
    }

    pub fn advance(&mut self) -> Result<Step, OnboardingError> {
        let next = match self.step {
            Step::Submitted => return Err(OnboardingError::AlreadySubmitted),
            Step::Goals => return Err(OnboardingError::NotFinalStep),
            step => step.next().ok_or(OnboardingError::NotFinalStep)?,
        };
        let missing = self.draft.missing_for(self.step);
        if !missing.is_empty() {
            return Err(OnboardingError::MissingFields(missing));
        }
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> Result<Step, OnboardingError> {
        if self.step == Step::Submitted {
            return Err(OnboardingError::AlreadySubmitted);
        }
        let previous = self.step.previous().ok_or(OnboardingError::NoPreviousStep)?;
        self.step = previous;
        Ok(previous)
    }

    /// Finish the wizard. Refused while a plan is being generated (`busy`).
    pub fn submit(&mut self, busy: bool) -> Result<UserProfile, OnboardingError> {
        match self.step {
            Step::Submitted => return Err(OnboardingError::AlreadySubmitted),
            Step::Goals => {}
            _ => return Err(OnboardingError::NotFinalStep),
        }
        if busy {
            return Err(OnboardingError::Busy);
        }
        let profile = self.draft.build()?;
        self.step = Step::Submitted;
        Ok(profile)
    }

    /// Fraction of the wizard reached, for the progress bar
    pub fn progress(&self) -> f64 {
        self.step.number() as f64 / STEP_COUNT as f64
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> OnboardingFlow {
        let mut flow = OnboardingFlow::new();
        let draft = flow.draft_mut();
        draft.name = "Alex".to_string();
        draft.age = Some(28);
        draft.height = Some(175.0);
        draft.weight = Some(70.0);
        flow
    }

    #[test]
    fn test_defaults() {
        let draft = ProfileDraft::default();
        assert_eq!(draft.gender, Gender::Male);
        assert_eq!(draft.goal, Goal::LoseWeight);
        assert_eq!(draft.activity_level, ActivityLevel::Sedentary);
        assert!(draft.dietary_restrictions.is_empty());
    }

    #[test]
    fn test_cannot_leave_basics_without_name_and_age() {
        let mut flow = OnboardingFlow::new();
        assert!(!flow.can_advance());
        assert_eq!(
            flow.advance(),
            Err(OnboardingError::MissingFields(vec!["name", "age"]))
        );

        flow.draft_mut().name = "   ".to_string();
        flow.draft_mut().age = Some(30);
        assert_eq!(
            flow.advance(),
            Err(OnboardingError::MissingFields(vec!["name"]))
        );
        assert_eq!(flow.step(), Step::Basics);
    }

    #[test]
    fn test_body_requires_height_and_weight() {
        let mut flow = OnboardingFlow::new();
        flow.draft_mut().name = "Alex".to_string();
        flow.draft_mut().age = Some(28);
        assert_eq!(flow.advance(), Ok(Step::Body));

        flow.draft_mut().height = Some(175.0);
        flow.draft_mut().weight = Some(0.0);
        assert_eq!(
            flow.advance(),
            Err(OnboardingError::MissingFields(vec!["weight"]))
        );
        flow.draft_mut().weight = Some(70.0);
        assert_eq!(flow.advance(), Ok(Step::Goals));
    }

    #[test]
    fn test_back_preserves_values() {
        let mut flow = filled();
        flow.advance().unwrap();
        flow.advance().unwrap();
        flow.draft_mut().dietary_restrictions = "无麸质".to_string();

        assert_eq!(flow.back(), Ok(Step::Body));
        assert_eq!(flow.back(), Ok(Step::Basics));
        assert_eq!(flow.back(), Err(OnboardingError::NoPreviousStep));
        assert_eq!(flow.draft().name, "Alex");
        assert_eq!(flow.draft().weight, Some(70.0));
        assert_eq!(flow.draft().dietary_restrictions, "无麸质");
    }

    #[test]
    fn test_submit_only_from_goals() {
        let mut flow = filled();
        assert_eq!(flow.submit(false), Err(OnboardingError::NotFinalStep));

        flow.advance().unwrap();
        flow.advance().unwrap();
        assert_eq!(flow.advance(), Err(OnboardingError::NotFinalStep));
        assert_eq!(flow.submit(true), Err(OnboardingError::Busy));

        let profile = flow.submit(false).unwrap();
        assert_eq!(profile.name, "Alex");
        assert_eq!(profile.age, 28);
        assert_eq!(profile.goal, Goal::LoseWeight);
        assert_eq!(flow.step(), Step::Submitted);
        assert_eq!(flow.submit(false), Err(OnboardingError::AlreadySubmitted));
    }

    #[test]
    fn test_progress_and_reset() {
        let mut flow = filled();
        assert!((flow.progress() - 1.0 / 3.0).abs() < f64::EPSILON);
        flow.advance().unwrap();
        flow.advance().unwrap();
        assert!((flow.progress() - 1.0).abs() < f64::EPSILON);

        flow.reset();
        assert_eq!(flow.step(), Step::Basics);
        assert_eq!(flow.draft(), &ProfileDraft::default());
    }

    #[test]
    fn test_draft_from_yaml() {
        let yaml = r#"
name: 小明
age: 35
height: 172
goal: 增肌
activityLevel: Very Active
"#;
        let draft: ProfileDraft = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(draft.goal, Goal::BuildMuscle);
        assert_eq!(draft.activity_level, ActivityLevel::VeryActive);
        assert_eq!(
            draft.build(),
            Err(OnboardingError::MissingFields(vec!["weight"]))
        );
    }
}
