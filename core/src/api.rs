//! Stable re-exports for consumers (`cli` and tests).
//!
//! Prefer importing from `task_console_core::api` instead of reaching into
//! internal modules.

pub use crate::client::{HttpTaskClient, TaskApi};
pub use crate::config::{load, ApiConfig, AppConfig, LoggingConfig, TuiConfig};
pub use crate::console::{
    perform, Action, ConsoleState, ExecutionResult, Field, Notice, NoticeLevel, Outcome,
    TaskForm, TasksChange,
};
pub use crate::error::{ApiError, ApiErrorKind, CliError, ConfigError};
pub use crate::model::{Execution, Task, TaskDraft};
pub use crate::table::{
    ellipsize, format_timestamp, paginate, project_rows, Page, TaskRow, EMPTY_PLACEHOLDER,
};
pub use crate::theme::{Theme, ThemeConfig, ThemePreset};
