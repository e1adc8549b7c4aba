use clap::Parser;
mod app;
mod commands;
mod tui;
use commands::cli;
use task_console_core::api as core_api;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, core_api::CliError> {
    let args = cli::Args::parse();
    let mut cfg = core_api::load(args.config.as_deref())?;
    app::apply_flag_overrides(&mut cfg, &args);

    let tui_check = args
        .command
        .is_none()
        .then(|| tui::check_tui_support(&cfg.tui));
    let interactive = matches!(tui_check, Some(Ok(())));

    // The console owns the terminal; stderr logging would tear the screen.
    init_tracing(&cfg.logging, !interactive).map_err(core_api::CliError::Command)?;
    if let Some(Err(reason)) = &tui_check {
        tracing::info!(reason = %reason, "console unavailable, falling back to list");
    }

    app::run_app(args, cfg, interactive).await
}

fn exit_code_for_error(e: &core_api::CliError) -> i32 {
    // 0: success
    // 11: config error
    // 20: terminal / IO error
    // 30: tasks service reported or transport failure
    // 50: internal/uncategorized
    match e {
        core_api::CliError::Config(_) => 11,
        core_api::CliError::Io(_) => 20,
        core_api::CliError::Terminal(_) => 20,
        core_api::CliError::Api(_) => 30,
        core_api::CliError::Command(_) => 50,
        core_api::CliError::Anyhow(_) => 50,
    }
}

fn init_tracing(logging: &core_api::LoggingConfig, allow_console: bool) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("task-console"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("task-console.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    let console = logging.console && allow_console;
    if !console && maybe_writer.is_none() {
        return Ok(());
    }

    let console_layer = console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
