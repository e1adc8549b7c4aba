use async_trait::async_trait;

use crate::error::ApiError;
use crate::model::{Task, TaskDraft};

/// The REST contract the console consumes. The backend is an external
/// collaborator; this trait is the seam tests use to stand in for it.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// `GET /tasks`
    async fn list(&self) -> Result<Vec<Task>, ApiError>;
    /// `GET /tasks?name=<q>`
    async fn search(&self, name: &str) -> Result<Vec<Task>, ApiError>;
    /// `GET /tasks?id=<id>`
    async fn get(&self, id: &str) -> Result<Task, ApiError>;
    /// `PUT /tasks`. The backend echoes the stored record; an empty body is
    /// still a success.
    async fn save(&self, draft: &TaskDraft) -> Result<Option<Task>, ApiError>;
    /// `DELETE /tasks?id=<id>`
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
    /// `PUT /tasks/{id}/execute`
    async fn execute(&self, id: &str) -> Result<Task, ApiError>;
}
