//! Generate command - one profile file in, one weekly plan out

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use super::GenerateArgs;
use crate::config::Config;
use crate::generation::PlanGenerator;
use crate::onboarding::ProfileDraft;
use crate::provider::create_client;
use crate::session::Session;

pub async fn execute(config: &Config, args: GenerateArgs) -> Result<()> {
    let draft = load_profile(&args.profile)?;
    let profile = draft
        .build()
        .with_context(|| format!("Incomplete profile in {}", args.profile.display()))?;

    let generator = PlanGenerator::new(create_client(config)).with_temperature(config.temperature);

    if args.dry_run {
        info!("DRY RUN - no model call will be made");
        let request = generator.request_for(&profile);
        println!("Model: {}", config.model);
        if let Some(system) = &request.system_instruction {
            println!("System: {}", system);
        }
        for turn in &request.contents {
            println!("{}", turn.text);
        }
        return Ok(());
    }

    let mut session = Session::new();
    session.run(&generator, profile).await?;
    let plan = session
        .into_plan()
        .context("Generation finished without a plan")?;

    let json = serde_json::to_string_pretty(&plan)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write plan to {}", path.display()))?;
            eprintln!("Plan written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn load_profile(path: &Path) -> Result<ProfileDraft> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile from {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse profile from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_profile_accepts_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"name": "Alex", "age": 28, "height": 175, "weight": 70, "dietaryRestrictions": "素食"}}"#
        )
        .unwrap();
        let draft = load_profile(file.path()).unwrap();
        let profile = draft.build().unwrap();
        assert_eq!(profile.dietary_restrictions, "素食");
    }

    #[test]
    fn test_load_profile_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_profile(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read profile"));
    }
}
