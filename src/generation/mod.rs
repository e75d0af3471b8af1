//! Plan generation: one profile in, one weekly plan out, one upstream call.
//!
//! The generator is asked for strict JSON constrained by `schema::weekly_plan_schema`.
//! Any failure (transport, empty body, malformed or non-conforming JSON) is fatal for
//! the call; nothing is retried or cached.

pub mod parser;
pub mod prompt;
pub mod schema;

pub use parser::parse_weekly_plan;
pub use prompt::{build_plan_prompt, PLAN_SYSTEM_INSTRUCTION};
pub use schema::{weekly_plan_schema, PLAN_SCHEMA_VERSION};

use crate::error::GenerationError;
use crate::model::{Turn, UserProfile, WeeklyPlan};
use crate::provider::{GenerateRequest, ModelClient, ResponseFormat};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use tracing::{error, info, instrument};

pub struct PlanGenerator {
    client: Arc<dyn ModelClient>,
    temperature: Option<f32>,
}

impl PlanGenerator {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// The exact request `generate` would send for this profile
    pub fn request_for(&self, profile: &UserProfile) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Turn::user(build_plan_prompt(profile))],
            system_instruction: Some(PLAN_SYSTEM_INSTRUCTION.to_string()),
            response_format: ResponseFormat::Json(weekly_plan_schema()),
            temperature: self.temperature,
        }
    }

    #[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4(), provider = self.client.name()))]
    pub async fn generate(&self, profile: &UserProfile) -> Result<WeeklyPlan, GenerationError> {
        info!(
            schema_version = PLAN_SCHEMA_VERSION,
            "Generating weekly plan for {}", profile.name
        );

        let request = self.request_for(profile);
        let output = self.client.generate(&request).await.map_err(|e| {
            error!("Plan request failed: {}", e);
            GenerationError::from(e)
        })?;

        let mut plan = parse_weekly_plan(&output.text).map_err(|e| {
            error!("Could not parse generated plan: {}", e);
            e
        })?;

        if plan.created_at.trim().is_empty() {
            plan.created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        }

        info!(
            "Plan from {} ready in {:?}: {} days, {} workouts",
            output.model,
            output.duration,
            plan.days.len(),
            plan.days.iter().map(|d| d.workouts.len()).sum::<usize>()
        );
        Ok(plan)
    }
}
