use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One historical run of a task's command, as recorded by the backend.
///
/// Timestamps and output are shown as text; `null` reads as empty and a
/// number (epoch millis, an exit code) as its decimal form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub output: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named, owned, executable command record.
///
/// The backend is authoritative for every field. Fields this console does not
/// know about are kept in `extra` so a returned record can be echoed back
/// verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub command: String,
    #[serde(
        default,
        rename = "taskExecutions",
        alias = "executions",
        deserialize_with = "null_as_empty"
    )]
    pub executions: Vec<Execution>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn latest_execution(&self) -> Option<&Execution> {
        self.executions.last()
    }

    /// Up to `limit` executions, most recent first.
    pub fn recent_executions(&self, limit: usize) -> impl Iterator<Item = &Execution> {
        self.executions.iter().rev().take(limit)
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

/// Body of a creation request: exactly the three form values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub name: String,
    pub owner: String,
    pub command: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Execution>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = Option::<Vec<Execution>>::deserialize(deserializer)?;
    Ok(v.unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_task_decodes_backend_shape() {
        let raw = r#"{
            "id": "123",
            "name": "Print Hello",
            "owner": "John Smith",
            "command": "echo Hello World!",
            "taskExecutions": [
                {"startTime": "2024-05-01T10:00:00Z", "endTime": "2024-05-01T10:00:01Z", "output": "Hello World!\n"}
            ]
        }"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.id.as_deref(), Some("123"));
        assert_eq!(task.executions.len(), 1);
        assert_eq!(task.latest_execution().unwrap().output, "Hello World!\n");
        assert!(task.extra.is_empty());
    }

    #[test]
    fn test_task_accepts_missing_and_null_executions() {
        let missing: Task =
            serde_json::from_str(r#"{"id":"1","name":"a","owner":"b","command":"c"}"#).unwrap();
        assert!(missing.executions.is_empty());

        let null: Task = serde_json::from_str(
            r#"{"id":"1","name":"a","owner":"b","command":"c","taskExecutions":null}"#,
        )
        .unwrap();
        assert!(null.executions.is_empty());
    }

    #[test]
    fn test_task_accepts_executions_alias() {
        let task: Task = serde_json::from_str(
            r#"{"name":"a","owner":"b","command":"c","executions":[{"startTime":"s","endTime":"e","output":"o"}]}"#,
        )
        .unwrap();
        assert_eq!(task.executions.len(), 1);
        assert!(task.id.is_none());
    }

    #[test]
    fn test_execution_tolerates_null_and_numeric_fields() {
        let raw = r#"{"name":"a","owner":"b","command":"c","taskExecutions":[
            {"startTime": 1714557600000, "endTime": null, "output": 0, "exitCode": 2}
        ]}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        let run = &task.executions[0];
        assert_eq!(run.start_time, "1714557600000");
        assert_eq!(run.end_time, "");
        assert_eq!(run.output, "0");
        assert_eq!(run.extra["exitCode"], 2);

        let back = serde_json::to_value(&task).unwrap();
        assert_eq!(back["taskExecutions"][0]["exitCode"], 2);
    }

    #[test]
    fn test_unknown_fields_survive_reserialization() {
        let raw = r#"{"id":"1","name":"a","owner":"b","command":"c","taskExecutions":[],"createdBy":"ops"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        let back = serde_json::to_value(&task).unwrap();
        assert_eq!(back["createdBy"], "ops");
        assert_eq!(back["taskExecutions"], serde_json::json!([]));
    }

    #[test]
    fn test_recent_executions_most_recent_first() {
        let exec = |n: &str| Execution {
            start_time: n.to_string(),
            end_time: n.to_string(),
            output: String::new(),
            extra: Map::new(),
        };
        let task = Task {
            id: Some("1".into()),
            name: "a".into(),
            owner: "b".into(),
            command: "c".into(),
            executions: vec![exec("1"), exec("2"), exec("3"), exec("4")],
            extra: Map::new(),
        };
        let starts: Vec<&str> = task
            .recent_executions(3)
            .map(|e| e.start_time.as_str())
            .collect();
        assert_eq!(starts, vec!["4", "3", "2"]);
    }

    #[test]
    fn test_draft_serializes_exact_body() {
        let draft = TaskDraft {
            name: "Print Hello".into(),
            owner: "John Smith".into(),
            command: "echo Hello World!".into(),
        };
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({
                "name": "Print Hello",
                "owner": "John Smith",
                "command": "echo Hello World!"
            })
        );
    }
}
