use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use task_console_core::api::ThemePreset;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    Amber,
    Classic,
}

impl From<ThemeArg> for ThemePreset {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Amber => ThemePreset::Amber,
            ThemeArg::Classic => ThemePreset::Classic,
        }
    }
}

/// Console for the tasks REST service. Without a subcommand, opens the
/// interactive table.
#[derive(Parser, Debug)]
#[command(name = "task-console", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the tasks service (overrides config and TASK_CONSOLE_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Colour/label preset.
    #[arg(long, value_enum, global = true)]
    pub theme: Option<ThemeArg>,

    /// Explicit config file instead of ~/.task-console/config.toml or ./config.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for non-interactive commands.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SearchArgs {
    /// Name filter; empty lists everything.
    #[arg(default_value = "")]
    pub query: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct IdArgs {
    pub id: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub owner: String,

    #[arg(long)]
    pub command: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all tasks.
    List,
    /// Search tasks by name.
    Search(SearchArgs),
    /// Show one task.
    Show(IdArgs),
    /// Create a task.
    Create(CreateArgs),
    /// Delete a task.
    Delete(IdArgs),
    /// Execute a task's command on the server and print the result.
    Run(IdArgs),
}
