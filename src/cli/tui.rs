//! TUI command - launches the interactive terminal UI

use anyhow::Result;
use std::sync::Arc;

use crate::assistant::Assistant;
use crate::config::Config;
use crate::conversation::CoachChat;
use crate::generation::PlanGenerator;
use crate::provider::create_client;
use crate::tui::{run_tui, TuiConfig};

pub fn execute(config: &Config) -> Result<()> {
    let client = create_client(config);

    let generator = PlanGenerator::new(client.clone()).with_temperature(config.temperature);
    let chat = CoachChat::new(client)
        .with_max_history(config.max_history_messages)
        .with_temperature(config.temperature);

    run_tui(TuiConfig {
        generator: Arc::new(generator),
        assistant: Arc::new(Assistant::new(chat)),
    })
}
