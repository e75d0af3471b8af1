//! Chat command - talk to the coach from a plain terminal

use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::assistant::{Assistant, GREETING};
use crate::config::Config;
use crate::conversation::CoachChat;
use crate::provider::create_client;

pub async fn execute(config: &Config) -> Result<()> {
    let chat = CoachChat::new(create_client(config))
        .with_max_history(config.max_history_messages)
        .with_temperature(config.temperature);
    let assistant = Assistant::new(chat);

    println!("🤖 {}", GREETING);
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if matches!(line, "/quit" | "/exit") {
            break;
        }
        if let Some(reply) = assistant.send(line).await {
            println!("🤖 {}", reply.text);
        }
        prompt()?;
    }
    Ok(())
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}
