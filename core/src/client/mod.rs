pub mod http;
pub mod r#trait;

pub use http::HttpTaskClient;
pub use r#trait::TaskApi;
