//! Theme tokens for the console.
//!
//! Colours are `#RRGGBB` strings; the terminal front-end converts them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    #[default]
    Amber,
    Classic,
}

impl ThemePreset {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Amber => "amber",
            Self::Classic => "classic",
        }
    }
}

impl fmt::Display for ThemePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amber" => Ok(Self::Amber),
            "classic" => Ok(Self::Classic),
            other => Err(format!(
                "unknown theme preset '{other}' (expected amber or classic)"
            )),
        }
    }
}

/// Resolved set of tokens the renderer reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub title: String,
    pub executions_label: String,
    pub primary: String,
    pub header_bg: String,
    pub header_fg: String,
    pub table_header_bg: String,
    pub tag: String,
    pub muted: String,
    pub json_bg: String,
    pub output_bg: String,
    pub output_border: String,
    pub id_width: u16,
}

impl Theme {
    pub fn amber() -> Self {
        Self {
            title: "Task Management System".to_string(),
            executions_label: "Recent Runs".to_string(),
            primary: "#B86B00".to_string(),
            header_bg: "#7C3F00".to_string(),
            header_fg: "#FFFFFF".to_string(),
            table_header_bg: "#FFF6E5".to_string(),
            tag: "#2F54EB".to_string(),
            muted: "#8C8C8C".to_string(),
            json_bg: "#F8FAFC".to_string(),
            output_bg: "#EEF4FF".to_string(),
            output_border: "#DBEAFE".to_string(),
            id_width: 18,
        }
    }

    pub fn classic() -> Self {
        Self {
            title: "Kaiburr Tasks".to_string(),
            executions_label: "Executions".to_string(),
            primary: "#1677FF".to_string(),
            header_bg: "#001529".to_string(),
            header_fg: "#FFFFFF".to_string(),
            table_header_bg: "#FAFAFA".to_string(),
            tag: "#1677FF".to_string(),
            muted: "#8C8C8C".to_string(),
            json_bg: "#F5F5F5".to_string(),
            output_bg: "#E6F7FF".to_string(),
            output_border: "#91D5FF".to_string(),
            id_width: 24,
        }
    }

    pub fn preset(preset: ThemePreset) -> Self {
        match preset {
            ThemePreset::Amber => Self::amber(),
            ThemePreset::Classic => Self::classic(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::amber()
    }
}

/// `[theme]` section: a preset plus optional per-token overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default)]
    pub preset: ThemePreset,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub executions_label: Option<String>,
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub header_bg: Option<String>,
    #[serde(default)]
    pub header_fg: Option<String>,
    #[serde(default)]
    pub table_header_bg: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub muted: Option<String>,
    #[serde(default)]
    pub json_bg: Option<String>,
    #[serde(default)]
    pub output_bg: Option<String>,
    #[serde(default)]
    pub output_border: Option<String>,
    #[serde(default)]
    pub id_width: Option<u16>,
}

impl ThemeConfig {
    pub fn resolve(&self) -> Theme {
        let mut theme = Theme::preset(self.preset);
        let pick = |slot: &mut String, v: &Option<String>| {
            if let Some(v) = v.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                *slot = v.to_string();
            }
        };
        pick(&mut theme.title, &self.title);
        pick(&mut theme.executions_label, &self.executions_label);
        pick(&mut theme.primary, &self.primary);
        pick(&mut theme.header_bg, &self.header_bg);
        pick(&mut theme.header_fg, &self.header_fg);
        pick(&mut theme.table_header_bg, &self.table_header_bg);
        pick(&mut theme.tag, &self.tag);
        pick(&mut theme.muted, &self.muted);
        pick(&mut theme.json_bg, &self.json_bg);
        pick(&mut theme.output_bg, &self.output_bg);
        pick(&mut theme.output_border, &self.output_border);
        if let Some(w) = self.id_width.filter(|w| *w > 0) {
            theme.id_width = w;
        }
        theme
    }
}
