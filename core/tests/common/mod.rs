#![allow(dead_code)]

use serde_json::{json, Value};
use task_console_core::api::{HttpTaskClient, TuiConfig};

pub fn task_json(id: &str, name: &str, outputs: &[&str]) -> Value {
    let executions: Vec<Value> = outputs
        .iter()
        .enumerate()
        .map(|(i, out)| {
            json!({
                "startTime": format!("2024-05-01T10:00:0{i}Z"),
                "endTime": format!("2024-05-01T10:00:0{i}Z"),
                "output": out,
            })
        })
        .collect();
    json!({
        "id": id,
        "name": name,
        "owner": "John Smith",
        "command": "echo Hello World!",
        "taskExecutions": executions,
    })
}

pub fn tasks_body(tasks: &[Value]) -> String {
    Value::Array(tasks.to_vec()).to_string()
}

pub fn client(url: String) -> HttpTaskClient {
    HttpTaskClient::new(&url, Some(2_000)).expect("client")
}

pub fn tui_config() -> TuiConfig {
    TuiConfig::default()
}
