use std::time::{Duration, Instant};

use crate::config::TuiConfig;
use crate::model::Task;
use crate::table::{paginate, project_rows, Page, TaskRow};

use super::form::TaskForm;
use super::notice::Notices;
use super::ops::{Action, ExecutionResult, Outcome, TasksChange};

/// In-memory view model of the console.
///
/// The task collection mirrors the last successful list/search response and
/// is only ever changed by [`ConsoleState::apply`].
#[derive(Debug, Clone)]
pub struct ConsoleState {
    tasks: Vec<Task>,
    in_flight: usize,
    pub query: String,
    page: usize,
    page_size: usize,
    selected: usize,
    pub form_open: bool,
    pub form: TaskForm,
    pub result: Option<ExecutionResult>,
    pub notices: Notices,
}

impl ConsoleState {
    pub fn new(cfg: &TuiConfig) -> Self {
        Self {
            tasks: Vec::new(),
            in_flight: 0,
            query: String::new(),
            page: 0,
            page_size: cfg.page_size.max(1),
            selected: 0,
            form_open: false,
            form: TaskForm::default(),
            result: None,
            notices: Notices::new(
                Duration::from_millis(cfg.notification_ttl_ms),
                cfg.max_notifications,
            ),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Marks an operation as started. Pair with exactly one [`Self::apply`].
    pub fn begin(&mut self, action: &Action) {
        self.in_flight += 1;
        tracing::debug!(
            target: "task_console.console",
            op = action.name(),
            in_flight = self.in_flight,
            "operation started"
        );
    }

    pub fn apply(&mut self, outcome: Outcome) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match outcome.tasks {
            Some(TasksChange::Replace(tasks)) => {
                self.tasks = tasks;
                self.clamp_selection();
            }
            Some(TasksChange::Patch(task)) => self.patch(task),
            None => {}
        }

        if outcome.close_form {
            self.form_open = false;
            self.form.clear();
        }

        if let Some(result) = outcome.result {
            self.result = Some(result);
        }

        for notice in outcome.notices {
            self.notices.push(notice);
        }
    }

    fn patch(&mut self, task: Task) {
        let Some(id) = task.id.clone() else {
            tracing::debug!(target: "task_console.console", "returned task has no id, nothing to patch");
            return;
        };
        for slot in self.tasks.iter_mut().filter(|t| t.has_id(&id)) {
            *slot = task.clone();
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.notices.expire(now);
    }

    // --- table & paging -------------------------------------------------

    pub fn page(&self) -> Page {
        paginate(self.tasks.len(), self.page, self.page_size)
    }

    /// Rows of the current page.
    pub fn visible_rows(&self) -> Vec<TaskRow> {
        let page = self.page();
        project_rows(&self.tasks[page.range])
    }

    /// Selection index within the current page.
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let page = self.page();
        self.tasks[page.range].get(self.selected)
    }

    pub fn select_next(&mut self) {
        let len = self.page().range.len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn next_page(&mut self) {
        let page = self.page();
        if page.has_next() {
            self.page = page.index + 1;
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        let page = self.page();
        if page.has_prev() {
            self.page = page.index - 1;
            self.selected = 0;
        }
    }

    fn clamp_selection(&mut self) {
        let page = self.page();
        self.page = page.index;
        self.selected = self.selected.min(page.range.len().saturating_sub(1));
    }

    // --- requests -------------------------------------------------------

    pub fn search_action(&self) -> Action {
        Action::Search(self.query.clone())
    }

    pub fn run_selected(&self) -> Option<Action> {
        self.selected_id().map(Action::Run)
    }

    pub fn remove_selected(&self) -> Option<Action> {
        self.selected_id().map(Action::Remove)
    }

    fn selected_id(&self) -> Option<String> {
        let id = self.selected_task().and_then(|t| t.id.clone());
        if id.is_none() {
            tracing::debug!(target: "task_console.console", "no selected task with an id");
        }
        id
    }

    pub fn open_form(&mut self) {
        self.form_open = true;
    }

    /// Closes the form and keeps what was typed.
    pub fn cancel_form(&mut self) {
        self.form_open = false;
    }

    /// Validates the form; `None` means a field is missing and no request
    /// should be sent.
    pub fn submit_form(&mut self) -> Option<Action> {
        self.form.validate().map(Action::Submit)
    }

    pub fn close_result(&mut self) {
        self.result = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::form::Field;
    use crate::console::notice::{Notice, NoticeLevel};
    use crate::model::Execution;
    use pretty_assertions::assert_eq;

    fn task(id: &str, runs: usize) -> Task {
        Task {
            id: Some(id.to_string()),
            name: format!("task-{id}"),
            owner: "ops".to_string(),
            command: "echo hi".to_string(),
            executions: (0..runs)
                .map(|i| Execution {
                    start_time: format!("2024-01-01T00:00:0{i}"),
                    end_time: format!("2024-01-01T00:00:0{i}"),
                    output: format!("run {i}"),
                    extra: Default::default(),
                })
                .collect(),
            extra: Default::default(),
        }
    }

    fn state_with(tasks: Vec<Task>) -> ConsoleState {
        let mut s = ConsoleState::new(&TuiConfig::default());
        s.begin(&Action::LoadAll);
        s.apply(Outcome {
            tasks: Some(TasksChange::Replace(tasks)),
            ..Default::default()
        });
        s
    }

    #[test]
    fn test_loading_tracks_overlapping_operations() {
        let mut s = ConsoleState::new(&TuiConfig::default());
        s.begin(&Action::LoadAll);
        s.begin(&Action::Run("1".into()));
        assert!(s.is_loading());
        s.apply(Outcome::default());
        assert!(s.is_loading());
        s.apply(Outcome::default());
        assert!(!s.is_loading());
        s.apply(Outcome::default());
        assert_eq!(s.in_flight(), 0);
    }

    #[test]
    fn test_patch_replaces_matching_task_only() {
        let mut s = state_with(vec![task("1", 0), task("2", 0)]);
        let updated = task("2", 1);
        s.begin(&Action::Run("2".into()));
        s.apply(Outcome {
            result: Some(ExecutionResult::from_task(updated.clone())),
            tasks: Some(TasksChange::Patch(updated)),
            ..Default::default()
        });
        assert_eq!(s.tasks()[0].executions.len(), 0);
        assert_eq!(s.tasks()[1].executions.len(), 1);
        assert_eq!(
            s.result.as_ref().unwrap().latest_output.as_deref(),
            Some("run 0")
        );
    }

    #[test]
    fn test_patch_with_unknown_id_is_noop() {
        let mut s = state_with(vec![task("1", 0)]);
        s.apply(Outcome {
            tasks: Some(TasksChange::Patch(task("9", 2))),
            ..Default::default()
        });
        assert_eq!(s.tasks().len(), 1);
        assert_eq!(s.tasks()[0].executions.len(), 0);
    }

    #[test]
    fn test_pagination_is_client_side_with_eight_rows() {
        let mut s = state_with((0..10).map(|i| task(&i.to_string(), 0)).collect());
        assert_eq!(s.visible_rows().len(), 8);
        s.next_page();
        assert_eq!(s.visible_rows().len(), 2);
        assert_eq!(s.page().label(), "2/2");
        s.next_page();
        assert_eq!(s.page().index, 1);
        s.prev_page();
        assert_eq!(s.page().index, 0);
    }

    #[test]
    fn test_shrinking_collection_clamps_page_and_selection() {
        let mut s = state_with((0..10).map(|i| task(&i.to_string(), 0)).collect());
        s.next_page();
        s.select_next();
        s.apply(Outcome {
            tasks: Some(TasksChange::Replace(vec![task("a", 0), task("b", 0)])),
            ..Default::default()
        });
        assert_eq!(s.page().index, 0);
        assert_eq!(s.selected(), 1);
        assert_eq!(s.selected_task().unwrap().id.as_deref(), Some("b"));
    }

    #[test]
    fn test_selection_maps_to_actions() {
        let mut s = state_with(vec![task("1", 0), task("2", 0)]);
        s.select_next();
        s.select_next();
        assert_eq!(s.run_selected(), Some(Action::Run("2".into())));
        assert_eq!(s.remove_selected(), Some(Action::Remove("2".into())));
        s.select_prev();
        assert_eq!(s.run_selected(), Some(Action::Run("1".into())));
    }

    #[test]
    fn test_actions_need_an_id() {
        let mut t = task("1", 0);
        t.id = None;
        let s = state_with(vec![t]);
        assert_eq!(s.run_selected(), None);
        let empty = state_with(Vec::new());
        assert_eq!(empty.remove_selected(), None);
    }

    #[test]
    fn test_invalid_form_issues_no_action() {
        let mut s = state_with(Vec::new());
        s.open_form();
        s.form.set(Field::Name, "Print Hello");
        assert_eq!(s.submit_form(), None);
        assert!(s.form_open);
        assert!(s.form.error(Field::Owner).is_some());
    }

    #[test]
    fn test_successful_submit_closes_and_clears_form() {
        let mut s = state_with(Vec::new());
        s.open_form();
        s.form.set(Field::Name, "Print Hello");
        s.form.set(Field::Owner, "John Smith");
        s.form.set(Field::Command, "echo Hello World!");
        let action = s.submit_form().unwrap();
        s.begin(&action);
        s.apply(Outcome {
            tasks: Some(TasksChange::Replace(vec![task("new", 0)])),
            close_form: true,
            notices: vec![Notice::success("Saved")],
            ..Default::default()
        });
        assert!(!s.form_open);
        assert!(s.form.is_empty());
        assert_eq!(s.notices.latest().unwrap().level, NoticeLevel::Success);
    }

    #[test]
    fn test_cancel_keeps_form_values() {
        let mut s = state_with(Vec::new());
        s.open_form();
        s.form.set(Field::Name, "draft");
        s.cancel_form();
        assert!(!s.form_open);
        assert_eq!(s.form.value(Field::Name), "draft");
    }

    #[test]
    fn test_tick_expires_notices() {
        let mut s = state_with(Vec::new());
        s.apply(Outcome {
            notices: vec![Notice::error("boom")],
            ..Default::default()
        });
        assert_eq!(s.notices.len(), 1);
        s.tick(Instant::now() + Duration::from_secs(60));
        assert!(s.notices.is_empty());
    }
}
