use std::str::FromStr;

use ratatui::style::Color;
use task_console_core::api::Theme;

/// Theme colour tokens resolved to terminal colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub table_header_bg: Color,
    pub tag: Color,
    pub muted: Color,
    pub json_bg: Color,
    pub output_bg: Color,
    pub output_border: Color,
    pub error: Color,
    /// Text drawn over the light header/JSON/output backgrounds.
    pub on_light: Color,
}

impl Palette {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            primary: color(&theme.primary, Color::Cyan),
            header_bg: color(&theme.header_bg, Color::Reset),
            header_fg: color(&theme.header_fg, Color::White),
            table_header_bg: color(&theme.table_header_bg, Color::Reset),
            tag: color(&theme.tag, Color::Blue),
            muted: color(&theme.muted, Color::DarkGray),
            json_bg: color(&theme.json_bg, Color::Reset),
            output_bg: color(&theme.output_bg, Color::Reset),
            output_border: color(&theme.output_border, Color::Gray),
            error: Color::Red,
            on_light: Color::Black,
        }
    }
}

fn color(raw: &str, fallback: Color) -> Color {
    Color::from_str(raw.trim()).unwrap_or_else(|_| {
        tracing::debug!(value = raw, "unparseable theme colour, using fallback");
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_tokens_become_rgb() {
        let palette = Palette::from_theme(&Theme::amber());
        assert_eq!(palette.header_bg, Color::Rgb(0x7C, 0x3F, 0x00));
        assert_eq!(palette.header_fg, Color::Rgb(0xFF, 0xFF, 0xFF));
    }

    #[test]
    fn test_bad_token_falls_back() {
        let theme = Theme {
            primary: "not-a-colour".to_string(),
            ..Theme::classic()
        };
        assert_eq!(Palette::from_theme(&theme).primary, Color::Cyan);
    }
}
