use serde_json::Value;
use std::{error::Error as StdError, fmt};

const BODY_PREVIEW_LIMIT: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Decode,
    Status,
    Unknown,
}

impl ApiErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Decode => "decode",
            Self::Status => "status",
            Self::Unknown => "unknown",
        }
    }

    /// Everything except a well-formed HTTP status failure.
    pub fn is_transport(self) -> bool {
        !matches!(self, Self::Status)
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed call against the tasks REST API.
///
/// Carries enough of the response to derive a human-readable notification:
/// the status, the raw body (if any was read) and the transport message.
#[derive(Debug)]
pub struct ApiError {
    kind: ApiErrorKind,
    status: Option<u16>,
    url: Option<String>,
    body: Option<String>,
    message: String,
    source: Option<anyhow::Error>,
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, url: String) -> Self {
        let kind = if err.is_timeout() {
            ApiErrorKind::Timeout
        } else if err.is_connect() {
            ApiErrorKind::Connect
        } else if err.is_request() {
            ApiErrorKind::Request
        } else if err.is_body() {
            ApiErrorKind::Body
        } else if err.is_decode() {
            ApiErrorKind::Decode
        } else {
            ApiErrorKind::Unknown
        };
        let status = err.status().map(|s| s.as_u16());
        let message = err.to_string();
        ApiError {
            kind,
            status,
            url: Some(url),
            body: None,
            message,
            source: Some(anyhow::Error::new(err)),
        }
    }

    pub fn status_error(status: u16, url: String, body: String) -> Self {
        ApiError {
            kind: ApiErrorKind::Status,
            status: Some(status),
            url: Some(url),
            message: preview_body(&body),
            body: Some(body),
            source: None,
        }
    }

    pub fn decode_error(status: u16, url: String, err: serde_json::Error, body: String) -> Self {
        let message = format!("failed to decode response body: {}", err);
        ApiError {
            kind: ApiErrorKind::Decode,
            status: Some(status),
            url: Some(url),
            body: None,
            message,
            source: Some(anyhow::Error::new(err)),
        }
        .with_preview(&body)
    }

    /// Transport-level failure that never reached a response (or whose
    /// response could not be read).
    pub fn transport(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        ApiError {
            kind,
            status: None,
            url: None,
            body: None,
            message: message.into(),
            source: None,
        }
    }

    fn with_preview(mut self, body: &str) -> Self {
        self.message = format!("{} | body={}", self.message, preview_body(body));
        self
    }

    /// Human-readable text for a notification.
    ///
    /// Order of preference: a `message` field in a JSON error body, the raw
    /// body when it is plain text, the transport error's own message, and
    /// finally `fallback`. A JSON body that is neither a string nor carries a
    /// usable `message` goes straight to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        if let Some(body) = self.body.as_deref() {
            match body_message(body) {
                BodyMessage::Text(text) => return text,
                BodyMessage::Opaque => return fallback.to_string(),
                BodyMessage::Empty => {}
            }
        }
        if self.kind.is_transport() {
            let msg = self.message.trim();
            if !msg.is_empty() {
                return msg.to_string();
            }
        }
        fallback.to_string()
    }
}

enum BodyMessage {
    Text(String),
    Opaque,
    Empty,
}

fn body_message(body: &str) -> BodyMessage {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return BodyMessage::Empty;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => match map.get("message").and_then(Value::as_str) {
            Some(msg) if !msg.trim().is_empty() => BodyMessage::Text(msg.to_string()),
            _ => BodyMessage::Opaque,
        },
        Ok(Value::String(s)) if !s.trim().is_empty() => BodyMessage::Text(s),
        Ok(Value::String(_)) | Ok(Value::Null) => BodyMessage::Empty,
        Ok(_) => BodyMessage::Opaque,
        Err(_) => BodyMessage::Text(trimmed.to_string()),
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "api error kind={}", self.kind)?;
        if let Some(status) = self.status {
            write!(f, " status={}", status)?;
        }
        if let Some(url) = &self.url {
            write!(f, " url={}", url)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl StdError for ApiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

pub(crate) fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out = String::new();
    let mut truncated = false;
    for (idx, ch) in trimmed.chars().enumerate() {
        if idx >= BODY_PREVIEW_LIMIT {
            truncated = true;
            break;
        }
        out.push(ch);
    }

    if truncated {
        out.push_str("...");
    }

    out
}
