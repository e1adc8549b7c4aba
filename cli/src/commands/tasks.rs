//! Non-interactive task commands: one request, printed result, exit code.
use std::io::Write;

use crate::commands::cli::{CreateArgs, OutputFormat};
use task_console_core::api as core_api;
use task_console_core::console::{DELETE_FAILED, LOAD_FAILED, RUN_FAILED, SAVE_FAILED};

const SHOW_FAILED: &str = "Failed to load task";

const COMMAND_WIDTH: usize = 32;
const NAME_WIDTH: usize = 20;

pub async fn handle_list<W: Write>(
    api: &dyn core_api::TaskApi,
    theme: &core_api::Theme,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), core_api::CliError> {
    let tasks = api
        .list()
        .await
        .map_err(|e| core_api::CliError::api(&e, LOAD_FAILED))?;
    write_tasks(out, &tasks, theme, format)
}

/// Empty query lists everything; a 404 prints an empty result.
pub async fn handle_search<W: Write>(
    api: &dyn core_api::TaskApi,
    query: &str,
    theme: &core_api::Theme,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), core_api::CliError> {
    if query.is_empty() {
        return handle_list(api, theme, format, out).await;
    }
    let tasks = match api.search(query).await {
        Ok(tasks) => tasks,
        Err(e) if e.is_not_found() => Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "search failed");
            return Err(core_api::CliError::Api(
                task_console_core::console::SEARCH_FAILED.to_string(),
            ));
        }
    };
    write_tasks(out, &tasks, theme, format)
}

pub async fn handle_show<W: Write>(
    api: &dyn core_api::TaskApi,
    id: &str,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), core_api::CliError> {
    let task = match api.get(id).await {
        Ok(task) => task,
        Err(e) if e.is_not_found() => {
            return Err(core_api::CliError::Api(format!("task not found: {id}")))
        }
        Err(e) => return Err(core_api::CliError::api(&e, SHOW_FAILED)),
    };
    match format {
        OutputFormat::Json => write_json(out, &task),
        OutputFormat::Text => write_result(out, &core_api::ExecutionResult::from_task(task)),
    }
}

pub async fn handle_create<W: Write>(
    api: &dyn core_api::TaskApi,
    args: CreateArgs,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), core_api::CliError> {
    let mut form = core_api::TaskForm::default();
    form.set(core_api::Field::Name, args.name);
    form.set(core_api::Field::Owner, args.owner);
    form.set(core_api::Field::Command, args.command);
    let Some(draft) = form.validate() else {
        let missing: Vec<&str> = core_api::Field::ALL
            .into_iter()
            .filter_map(|f| form.error(f))
            .collect();
        return Err(core_api::CliError::Command(missing.join(", ")));
    };

    let saved = api
        .save(&draft)
        .await
        .map_err(|e| core_api::CliError::api(&e, SAVE_FAILED))?;
    match (format, saved) {
        (OutputFormat::Json, Some(task)) => write_json(out, &task),
        (OutputFormat::Json, None) => write_json(out, &draft),
        (OutputFormat::Text, saved) => {
            let id = saved.and_then(|t| t.id).unwrap_or_default();
            writeln!(out, "{} {}", task_console_core::console::SAVED, id.trim())?;
            Ok(())
        }
    }
}

pub async fn handle_delete<W: Write>(
    api: &dyn core_api::TaskApi,
    id: &str,
    out: &mut W,
) -> Result<(), core_api::CliError> {
    api.delete(id)
        .await
        .map_err(|e| core_api::CliError::api(&e, DELETE_FAILED))?;
    writeln!(out, "{}", task_console_core::console::DELETED)?;
    Ok(())
}

pub async fn handle_run<W: Write>(
    api: &dyn core_api::TaskApi,
    id: &str,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), core_api::CliError> {
    let task = api
        .execute(id)
        .await
        .map_err(|e| core_api::CliError::api(&e, RUN_FAILED))?;
    match format {
        OutputFormat::Json => write_json(out, &task),
        OutputFormat::Text => write_result(out, &core_api::ExecutionResult::from_task(task)),
    }
}

fn write_json<W: Write, T: serde::Serialize + ?Sized>(
    out: &mut W,
    value: &T,
) -> Result<(), core_api::CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| core_api::CliError::Command(format!("json encode failed: {e}")))?;
    writeln!(out, "{text}")?;
    Ok(())
}

fn write_tasks<W: Write>(
    out: &mut W,
    tasks: &[core_api::Task],
    theme: &core_api::Theme,
    format: OutputFormat,
) -> Result<(), core_api::CliError> {
    match format {
        OutputFormat::Json => write_json(out, tasks),
        OutputFormat::Text => write_table(out, &core_api::project_rows(tasks), theme),
    }
}

pub fn write_table<W: Write>(
    out: &mut W,
    rows: &[core_api::TaskRow],
    theme: &core_api::Theme,
) -> Result<(), core_api::CliError> {
    let id_width = theme.id_width as usize;
    writeln!(
        out,
        "{:<id_width$}  {:<NAME_WIDTH$}  {:<NAME_WIDTH$}  {:<COMMAND_WIDTH$}  {}",
        "ID", "Name", "Owner", "Command", theme.executions_label
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<id_width$}  {:<NAME_WIDTH$}  {:<NAME_WIDTH$}  {:<COMMAND_WIDTH$}  {}",
            core_api::ellipsize(row.id_label(), id_width),
            core_api::ellipsize(&row.name, NAME_WIDTH),
            core_api::ellipsize(&row.owner, NAME_WIDTH),
            core_api::ellipsize(&row.command, COMMAND_WIDTH),
            row.recent_label()
        )?;
    }
    if rows.is_empty() {
        writeln!(out, "(no tasks)")?;
    }
    Ok(())
}

pub fn write_result<W: Write>(
    out: &mut W,
    result: &core_api::ExecutionResult,
) -> Result<(), core_api::CliError> {
    writeln!(out, "Task JSON")?;
    writeln!(out, "{}", result.json)?;
    if let Some(output) = &result.latest_output {
        writeln!(out)?;
        writeln!(out, "Latest Execution Output")?;
        write!(out, "{output}")?;
        if !output.ends_with('\n') {
            writeln!(out)?;
        }
    }
    Ok(())
}
