//! Application state: who the user is and which plan they are looking at.
//!
//! NoPlan -> Loading -> PlanReady, with NoPlan as the recovery state. At most one
//! generation is in flight; outcomes arriving outside Loading are rejected.

use crate::error::{GenerationError, SessionError};
use crate::generation::PlanGenerator;
use crate::model::{UserProfile, WeeklyPlan};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoPlan,
    Loading,
    PlanReady,
}

#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    NoPlan,
    Loading {
        profile: UserProfile,
    },
    PlanReady {
        profile: UserProfile,
        plan: WeeklyPlan,
    },
}

#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            SessionState::NoPlan => Phase::NoPlan,
            SessionState::Loading { .. } => Phase::Loading,
            SessionState::PlanReady { .. } => Phase::PlanReady,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == Phase::Loading
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match &self.state {
            SessionState::NoPlan => None,
            SessionState::Loading { profile } | SessionState::PlanReady { profile, .. } => {
                Some(profile)
            }
        }
    }

    pub fn plan(&self) -> Option<&WeeklyPlan> {
        match &self.state {
            SessionState::PlanReady { plan, .. } => Some(plan),
            _ => None,
        }
    }

    /// Onboarding finished: hold the profile while its plan is generated
    pub fn begin(&mut self, profile: UserProfile) -> Result<(), SessionError> {
        match self.state {
            SessionState::NoPlan => {
                info!("Generating plan for {}", profile.name);
                self.state = SessionState::Loading { profile };
                Ok(())
            }
            SessionState::Loading { .. } => Err(SessionError::GenerationInFlight),
            SessionState::PlanReady { .. } => Err(SessionError::PlanAlreadyLoaded),
        }
    }

    pub fn succeed(&mut self, plan: WeeklyPlan) -> Result<(), SessionError> {
        match std::mem::take(&mut self.state) {
            SessionState::Loading { profile } => {
                info!("Plan ready with {} days", plan.days.len());
                self.state = SessionState::PlanReady { profile, plan };
                Ok(())
            }
            other => {
                self.state = other;
                Err(SessionError::NotLoading)
            }
        }
    }

    /// Generation failed: drop the profile and go back to onboarding
    pub fn fail(&mut self, error: &GenerationError) -> Result<(), SessionError> {
        if !self.is_loading() {
            return Err(SessionError::NotLoading);
        }
        warn!("Plan generation failed, discarding profile: {}", error);
        self.state = SessionState::NoPlan;
        Ok(())
    }

    pub fn finish(&mut self, outcome: Result<WeeklyPlan, GenerationError>) -> Result<(), SessionError> {
        match outcome {
            Ok(plan) => self.succeed(plan),
            Err(e) => self.fail(&e),
        }
    }

    /// Discard the plan and profile. Refused while generating.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.is_loading() {
            return Err(SessionError::GenerationInFlight);
        }
        if self.phase() == Phase::PlanReady {
            info!("Session reset");
        }
        self.state = SessionState::NoPlan;
        Ok(())
    }

    /// begin, generate, finish: the non-interactive path
    pub async fn run(&mut self, generator: &PlanGenerator, profile: UserProfile) -> Result<(), SessionError> {
        self.begin(profile.clone())?;
        match generator.generate(&profile).await {
            Ok(plan) => self.succeed(plan),
            Err(e) => {
                self.fail(&e)?;
                Err(e.into())
            }
        }
    }

    pub fn into_plan(self) -> Option<WeeklyPlan> {
        match self.state {
            SessionState::PlanReady { plan, .. } => Some(plan),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::parse_weekly_plan;
    use crate::generation::parser::fixtures::{sample_profile, week_json};
    use crate::provider::testing::{Scripted, ScriptedClient};

    fn plan() -> WeeklyPlan {
        parse_weekly_plan(&week_json()).unwrap()
    }

    #[test]
    fn test_happy_path() {
        let mut session = Session::new();
        assert_eq!(session.phase(), Phase::NoPlan);
        assert!(session.profile().is_none());

        session.begin(sample_profile()).unwrap();
        assert!(session.is_loading());
        assert_eq!(session.profile().unwrap().name, "小红");
        assert!(session.plan().is_none());

        session.finish(Ok(plan())).unwrap();
        assert_eq!(session.phase(), Phase::PlanReady);
        assert_eq!(session.plan().unwrap().days.len(), 7);
    }

    #[test]
    fn test_single_loading_episode() {
        let mut session = Session::new();
        session.begin(sample_profile()).unwrap();
        assert!(matches!(
            session.begin(sample_profile()),
            Err(SessionError::GenerationInFlight)
        ));
        assert!(matches!(session.reset(), Err(SessionError::GenerationInFlight)));
        assert!(session.is_loading());
    }

    #[test]
    fn test_failure_discards_profile() {
        let mut session = Session::new();
        session.begin(sample_profile()).unwrap();
        session
            .finish(Err(GenerationError::EmptyResponse))
            .unwrap();
        assert_eq!(session.phase(), Phase::NoPlan);
        assert!(session.profile().is_none());
    }

    #[test]
    fn test_stale_outcome_rejected() {
        let mut session = Session::new();
        assert!(matches!(session.succeed(plan()), Err(SessionError::NotLoading)));
        assert!(matches!(
            session.fail(&GenerationError::EmptyResponse),
            Err(SessionError::NotLoading)
        ));

        session.begin(sample_profile()).unwrap();
        session.succeed(plan()).unwrap();
        assert!(matches!(session.succeed(plan()), Err(SessionError::NotLoading)));
        assert_eq!(session.phase(), Phase::PlanReady);
        assert!(matches!(
            session.begin(sample_profile()),
            Err(SessionError::PlanAlreadyLoaded)
        ));
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut session = Session::new();
        session.begin(sample_profile()).unwrap();
        session.succeed(plan()).unwrap();

        session.reset().unwrap();
        assert_eq!(session.phase(), Phase::NoPlan);
        assert!(session.plan().is_none());
        assert!(session.profile().is_none());
        session.reset().unwrap();
    }

    #[tokio::test]
    async fn test_run_success_and_failure() {
        let client = ScriptedClient::new(vec![Scripted::text(week_json())]);
        let mut session = Session::new();
        session
            .run(&PlanGenerator::new(client), sample_profile())
            .await
            .unwrap();
        assert_eq!(session.into_plan().unwrap().summary, "超燃一周！💪");

        let client = ScriptedClient::new(vec![Scripted::text("not json")]);
        let mut session = Session::new();
        let err = session
            .run(&PlanGenerator::new(client), sample_profile())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Generation(GenerationError::Malformed(_))
        ));
        assert_eq!(session.phase(), Phase::NoPlan);
    }
}
