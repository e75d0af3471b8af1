use super::SchemaArgs;
use crate::config::Config;
use crate::generation::{weekly_plan_schema, PLAN_SCHEMA_VERSION};
use schemars::schema_for;

pub fn execute(args: SchemaArgs) -> anyhow::Result<()> {
    let json = if args.config_schema {
        serde_json::to_string_pretty(&schema_for!(Config))?
    } else {
        tracing::debug!("Plan schema version {}", PLAN_SCHEMA_VERSION);
        serde_json::to_string_pretty(&weekly_plan_schema())?
    };
    println!("{}", json);
    Ok(())
}
