mod load;
mod types;

pub use load::{
    apply_env_overrides, get_data_dir, load, validate, ENV_API_URL, ENV_THEME,
};
pub use types::{ApiConfig, AppConfig, LoggingConfig, TuiConfig};
