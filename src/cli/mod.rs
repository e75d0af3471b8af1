pub mod chat;
pub mod generate;
pub mod schema;
pub mod tui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fittoon")]
#[command(
    author,
    version,
    about = "Cartoon fitness coach: weekly workout and meal plans generated by Gemini"
)]
pub struct Cli {
    /// Defaults to `tui`
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file (optional; defaults apply when missing)
    #[arg(short, long, global = true, env = "FITTOON_CONFIG", default_value = "fittoon.yaml")]
    pub config: PathBuf,

    /// Override the Gemini model
    #[arg(long, global = true, env = "FITTOON_MODEL")]
    pub model: Option<String>,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive terminal app
    Tui,

    /// Generate one weekly plan from a profile file and print it as JSON
    Generate(GenerateArgs),

    /// Chat with the coach on stdin/stdout
    Chat,

    /// Print the plan response schema, or the config JSON Schema
    Schema(SchemaArgs),
}

#[derive(Parser, Clone)]
pub struct GenerateArgs {
    /// Profile YAML/JSON file (name, age, height, weight, gender, goal, ...)
    #[arg(short, long)]
    pub profile: PathBuf,

    /// Write the plan here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Validate the profile and print the request without calling the model
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Clone)]
pub struct SchemaArgs {
    /// Print the config file schema instead of the plan schema
    #[arg(long)]
    pub config_schema: bool,
}
