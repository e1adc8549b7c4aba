use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::r#trait::TaskApi;
use crate::error::{ApiError, ApiErrorKind};
use crate::model::{Task, TaskDraft};

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Option<T>, ApiError> {
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp
        .text()
        .await
        .map_err(|err| ApiError::from_reqwest(err, url.clone()))?;

    if !status.is_success() {
        return Err(ApiError::status_error(status.as_u16(), url, body));
    }

    if body.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str::<T>(&body)
        .map(Some)
        .map_err(|err| ApiError::decode_error(status.as_u16(), url, err, body))
}

async fn require_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status().as_u16();
    let url = resp.url().to_string();
    read_json(resp).await?.ok_or_else(|| {
        ApiError::transport(
            ApiErrorKind::Decode,
            format!("empty response body (status={status} url={url})"),
        )
    })
}

async fn ensure_success(resp: reqwest::Response) -> Result<(), ApiError> {
    let status = resp.status();
    let url = resp.url().to_string();

    if status.is_success() {
        return Ok(());
    }

    let body = resp
        .text()
        .await
        .map_err(|err| ApiError::from_reqwest(err, url.clone()))?;
    Err(ApiError::status_error(status.as_u16(), url, body))
}

/// reqwest-backed [`TaskApi`].
#[derive(Clone)]
pub struct HttpTaskClient {
    http: reqwest::Client,
    // Pre-built collection endpoint; per-task URLs are derived from it.
    url_tasks: Url,
}

impl HttpTaskClient {
    /// `timeout_ms = None` keeps reqwest's default (no overall timeout).
    pub fn new(base_url: &str, timeout_ms: Option<u64>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(ms) = timeout_ms {
            builder = builder.timeout(std::time::Duration::from_millis(ms));
        }
        let http = builder.build()?;
        let normalized = base_url.trim_end_matches('/');
        let url_tasks = Url::parse(&format!("{}/tasks", normalized))
            .map_err(|e| anyhow::anyhow!("invalid api base url {:?}: {}", base_url, e))?;
        Ok(Self { http, url_tasks })
    }

    pub fn base_url(&self) -> &str {
        self.url_tasks.as_str()
    }

    fn execute_url(&self, id: &str) -> Result<Url, ApiError> {
        let mut url = self.url_tasks.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::transport(
                    ApiErrorKind::Request,
                    format!("cannot build execute url from {}", self.url_tasks),
                )
            })?
            .push(id)
            .push("execute");
        Ok(url)
    }

    async fn send(
        &self,
        req: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, ApiError> {
        req.send()
            .await
            .map_err(|err| ApiError::from_reqwest(err, url.to_string()))
    }
}

#[async_trait]
impl TaskApi for HttpTaskClient {
    async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let url = self.url_tasks.as_str();
        tracing::debug!(target: "task_console.http", stage = "tasks.list.in", url = %url);
        let resp = self.send(self.http.get(url), url).await?;
        let status = resp.status();
        let tasks = read_json::<Vec<Task>>(resp).await?.unwrap_or_default();
        tracing::debug!(
            target: "task_console.http",
            stage = "tasks.list.out",
            status = %status,
            count = tasks.len()
        );
        Ok(tasks)
    }

    async fn search(&self, name: &str) -> Result<Vec<Task>, ApiError> {
        let url = self.url_tasks.as_str();
        tracing::debug!(
            target: "task_console.http",
            stage = "tasks.search.in",
            url = %url,
            query_len = name.len()
        );
        let req = self.http.get(url).query(&[("name", name)]);
        let resp = self.send(req, url).await?;
        let status = resp.status();
        let tasks = read_json::<Vec<Task>>(resp).await?.unwrap_or_default();
        tracing::debug!(
            target: "task_console.http",
            stage = "tasks.search.out",
            status = %status,
            count = tasks.len()
        );
        Ok(tasks)
    }

    async fn get(&self, id: &str) -> Result<Task, ApiError> {
        let url = self.url_tasks.as_str();
        tracing::debug!(target: "task_console.http", stage = "tasks.get.in", url = %url, id = %id);
        let req = self.http.get(url).query(&[("id", id)]);
        let resp = self.send(req, url).await?;
        let status = resp.status();
        let task = require_json::<Task>(resp).await?;
        tracing::debug!(target: "task_console.http", stage = "tasks.get.out", status = %status);
        Ok(task)
    }

    async fn save(&self, draft: &TaskDraft) -> Result<Option<Task>, ApiError> {
        let url = self.url_tasks.as_str();
        tracing::debug!(
            target: "task_console.http",
            stage = "tasks.save.in",
            url = %url,
            name = %draft.name,
            owner = %draft.owner
        );
        let req = self.http.put(url).json(draft);
        let resp = self.send(req, url).await?;
        let status = resp.status();
        let saved = read_json::<Task>(resp).await?;
        tracing::debug!(
            target: "task_console.http",
            stage = "tasks.save.out",
            status = %status,
            id = ?saved.as_ref().and_then(|t| t.id.as_deref())
        );
        Ok(saved)
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.url_tasks.as_str();
        tracing::debug!(target: "task_console.http", stage = "tasks.delete.in", url = %url, id = %id);
        let req = self.http.delete(url).query(&[("id", id)]);
        let resp = self.send(req, url).await?;
        let status = resp.status();
        ensure_success(resp).await?;
        tracing::debug!(target: "task_console.http", stage = "tasks.delete.out", status = %status);
        Ok(())
    }

    async fn execute(&self, id: &str) -> Result<Task, ApiError> {
        let url = self.execute_url(id)?;
        tracing::debug!(target: "task_console.http", stage = "tasks.execute.in", url = %url);
        let resp = self.send(self.http.put(url.clone()), url.as_str()).await?;
        let status = resp.status();
        let task = require_json::<Task>(resp).await?;
        tracing::debug!(
            target: "task_console.http",
            stage = "tasks.execute.out",
            status = %status,
            executions = task.executions.len()
        );
        Ok(task)
    }
}
