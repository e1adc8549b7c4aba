//! Pure projections from the task collection to what the table shows.

mod paging;
mod projection;

pub use paging::{paginate, Page};
pub use projection::{
    ellipsize, format_timestamp, project_row, project_rows, RunTag, TaskRow, EMPTY_PLACEHOLDER,
    RECENT_RUNS_LIMIT,
};
