//! View model for the task console: state, operations and the new-task form.

mod form;
mod notice;
mod ops;
mod state;

pub use form::{Field, TaskForm};
pub use notice::{Notice, NoticeLevel, Notices};
pub use ops::{
    load_all, perform, remove, run, search, submit, Action, ExecutionResult, Outcome, TasksChange,
    DELETED, DELETE_FAILED, LOAD_FAILED, RUN_FAILED, SAVED, SAVE_FAILED, SEARCH_FAILED,
};
pub use state::ConsoleState;
