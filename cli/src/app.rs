//! Binary wiring: merge flag overrides into the config, build the client and
//! hand over to either the interactive console or a one-shot command.
use std::io::Write;
use std::sync::Arc;

use crate::commands::cli::{Args, Commands};
use crate::commands::tasks;
use task_console_core::api as core_api;

/// CLI flags win over file and environment settings.
pub fn apply_flag_overrides(cfg: &mut core_api::AppConfig, args: &Args) {
    if let Some(url) = args.api_url.as_deref().map(str::trim) {
        if !url.is_empty() {
            cfg.api.base_url = url.to_string();
        }
    }
    if let Some(theme) = args.theme {
        cfg.theme.preset = theme.into();
    }
}

#[tracing::instrument(name = "cli.run_app", skip_all, fields(interactive = interactive))]
pub async fn run_app(
    args: Args,
    cfg: core_api::AppConfig,
    interactive: bool,
) -> Result<i32, core_api::CliError> {
    let client = core_api::HttpTaskClient::new(&cfg.api.base_url, cfg.api.timeout_ms)?;
    let theme = cfg.theme.resolve();
    tracing::debug!(
        base_url = %cfg.api.base_url,
        theme = %cfg.theme.preset,
        "client ready"
    );

    if interactive {
        crate::tui::run_console(Arc::new(client), &cfg.tui, theme).await?;
        return Ok(0);
    }

    let command = args.command.unwrap_or(Commands::List);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_command(&client, &theme, command, args.format, &mut out).await?;
    out.flush()?;
    Ok(0)
}

pub async fn run_command<W: Write>(
    api: &dyn core_api::TaskApi,
    theme: &core_api::Theme,
    command: Commands,
    format: crate::commands::cli::OutputFormat,
    out: &mut W,
) -> Result<(), core_api::CliError> {
    match command {
        Commands::List => tasks::handle_list(api, theme, format, out).await,
        Commands::Search(s) => tasks::handle_search(api, &s.query, theme, format, out).await,
        Commands::Show(s) => tasks::handle_show(api, &s.id, format, out).await,
        Commands::Create(c) => tasks::handle_create(api, c, format, out).await,
        Commands::Delete(s) => tasks::handle_delete(api, &s.id, out).await,
        Commands::Run(s) => tasks::handle_run(api, &s.id, format, out).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flags_override_config() {
        let mut cfg = core_api::AppConfig::default();
        let args = Args::try_parse_from([
            "task-console",
            "--api-url",
            " http://tasks.internal:9000 ",
            "--theme",
            "classic",
        ])
        .unwrap();
        apply_flag_overrides(&mut cfg, &args);
        assert_eq!(cfg.api.base_url, "http://tasks.internal:9000");
        assert_eq!(cfg.theme.preset, core_api::ThemePreset::Classic);
    }

    #[test]
    fn test_blank_api_url_flag_is_ignored() {
        let mut cfg = core_api::AppConfig::default();
        let before = cfg.api.base_url.clone();
        let args = Args::try_parse_from(["task-console", "--api-url", "  "]).unwrap();
        apply_flag_overrides(&mut cfg, &args);
        assert_eq!(cfg.api.base_url, before);
    }
}
