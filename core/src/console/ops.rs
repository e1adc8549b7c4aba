//! Console operations. Each one issues its HTTP call(s) and returns an
//! [`Outcome`] describing how the view state should change; nothing here
//! touches the state itself, so several operations can be in flight at once
//! and be applied in whatever order their responses arrive.

use crate::client::TaskApi;
use crate::error::ApiError;
use crate::model::{Task, TaskDraft};

use super::notice::Notice;

pub const LOAD_FAILED: &str = "Failed to load tasks";
pub const SEARCH_FAILED: &str = "Search failed";
pub const DELETE_FAILED: &str = "Delete failed";
pub const RUN_FAILED: &str = "Run failed";
pub const SAVE_FAILED: &str = "Save failed";
pub const DELETED: &str = "Deleted";
pub const SAVED: &str = "Saved";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LoadAll,
    Search(String),
    Remove(String),
    Run(String),
    Submit(TaskDraft),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::LoadAll => "load_all",
            Action::Search(_) => "search",
            Action::Remove(_) => "remove",
            Action::Run(_) => "run",
            Action::Submit(_) => "submit",
        }
    }

    /// Notification text when the operation fails without a usable message.
    pub fn fallback(&self) -> &'static str {
        match self {
            Action::LoadAll => LOAD_FAILED,
            Action::Search(_) => SEARCH_FAILED,
            Action::Remove(_) => DELETE_FAILED,
            Action::Run(_) => RUN_FAILED,
            Action::Submit(_) => SAVE_FAILED,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TasksChange {
    /// Replace the whole collection (list/search/reload).
    Replace(Vec<Task>),
    /// Substitute the task with the same id in place.
    Patch(Task),
}

/// What the result modal shows after a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub task: Task,
    /// The returned record, pretty-printed.
    pub json: String,
    pub latest_output: Option<String>,
}

impl ExecutionResult {
    pub fn from_task(task: Task) -> Self {
        let json = serde_json::to_string_pretty(&task).unwrap_or_else(|e| {
            tracing::warn!(target: "task_console.console", error = %e, "task json render failed");
            format!("{task:#?}")
        });
        let latest_output = task.latest_execution().map(|e| e.output.clone());
        Self {
            task,
            json,
            latest_output,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outcome {
    pub tasks: Option<TasksChange>,
    pub result: Option<ExecutionResult>,
    pub close_form: bool,
    pub notices: Vec<Notice>,
}

impl Outcome {
    fn replace(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Some(TasksChange::Replace(tasks)),
            ..Default::default()
        }
    }

    pub fn failed(text: String) -> Self {
        Self {
            notices: vec![Notice::error(text)],
            ..Default::default()
        }
    }

    fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }
}

fn report(op: &'static str, err: &ApiError, fallback: &str) -> Outcome {
    tracing::warn!(
        target: "task_console.console",
        op = op,
        kind = %err.kind(),
        status = ?err.status(),
        error = %err,
        "operation failed"
    );
    Outcome::failed(err.user_message(fallback))
}

#[tracing::instrument(name = "console.perform", skip(api), fields(op = action.name()))]
pub async fn perform<A: TaskApi + ?Sized>(api: &A, action: Action) -> Outcome {
    match action {
        Action::LoadAll => load_all(api).await,
        Action::Search(query) => search(api, &query).await,
        Action::Remove(id) => remove(api, &id).await,
        Action::Run(id) => run(api, &id).await,
        Action::Submit(draft) => submit(api, &draft).await,
    }
}

pub async fn load_all<A: TaskApi + ?Sized>(api: &A) -> Outcome {
    match api.list().await {
        Ok(tasks) => Outcome::replace(tasks),
        Err(err) => report("load_all", &err, LOAD_FAILED),
    }
}

/// Empty query lists everything; a 404 from the filtered endpoint means no
/// matches.
pub async fn search<A: TaskApi + ?Sized>(api: &A, query: &str) -> Outcome {
    if query.is_empty() {
        return load_all(api).await;
    }
    match api.search(query).await {
        Ok(tasks) => Outcome::replace(tasks),
        Err(err) if err.is_not_found() => Outcome::replace(Vec::new()),
        Err(err) => {
            tracing::warn!(target: "task_console.console", op = "search", error = %err, "search failed");
            Outcome::failed(SEARCH_FAILED.to_string())
        }
    }
}

pub async fn remove<A: TaskApi + ?Sized>(api: &A, id: &str) -> Outcome {
    match api.delete(id).await {
        Ok(()) => load_all(api).await.with_notice(Notice::success(DELETED)),
        Err(err) => report("remove", &err, DELETE_FAILED),
    }
}

pub async fn run<A: TaskApi + ?Sized>(api: &A, id: &str) -> Outcome {
    match api.execute(id).await {
        Ok(task) => Outcome {
            result: Some(ExecutionResult::from_task(task.clone())),
            tasks: Some(TasksChange::Patch(task)),
            ..Default::default()
        },
        Err(err) => report("run", &err, RUN_FAILED),
    }
}

pub async fn submit<A: TaskApi + ?Sized>(api: &A, draft: &TaskDraft) -> Outcome {
    match api.save(draft).await {
        Ok(_) => {
            let mut outcome = load_all(api).await;
            outcome.close_form = true;
            outcome.with_notice(Notice::success(SAVED))
        }
        Err(err) => report("submit", &err, SAVE_FAILED),
    }
}
