//! Color themes for the search screen
//!
//! Four schemes selectable with `--theme` / `VIDSEARCH_THEME`.

use ratatui::style::Color;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Muted modern palette (default)
    #[default]
    Nord,
    /// White on blue
    DosBlue,
    /// Amber on black
    AmberCrt,
    /// Green on black
    GreenPhosphor,
}

impl Theme {
    /// Parse theme name from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "nord" => Ok(Theme::Nord),
            "dos" | "dosblue" | "dos-blue" => Ok(Theme::DosBlue),
            "amber" | "ambercrt" | "amber-crt" => Ok(Theme::AmberCrt),
            "green" | "greenphosphor" | "green-phosphor" => Ok(Theme::GreenPhosphor),
            _ => Err(format!(
                "Unknown theme '{s}'. Available: nord, dos-blue, amber-crt, green-phosphor"
            )),
        }
    }

    pub fn colors(&self) -> ColorScheme {
        match self {
            Theme::Nord => ColorScheme::nord(),
            Theme::DosBlue => ColorScheme::dos_blue(),
            Theme::AmberCrt => ColorScheme::amber_crt(),
            Theme::GreenPhosphor => ColorScheme::green_phosphor(),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Nord => write!(f, "nord"),
            Theme::DosBlue => write!(f, "dos-blue"),
            Theme::AmberCrt => write!(f, "amber-crt"),
            Theme::GreenPhosphor => write!(f, "green-phosphor"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    pub background: Color,
    /// Background of the selected card
    pub background_focused: Color,
    pub text: Color,
    /// Secondary text (thumbnail URLs, hints)
    pub text_dim: Color,
    pub focus_border: Color,
    pub unfocused_border: Color,
    /// Screen title
    pub header: Color,
    /// "Watch Now" and thumbnail link rows
    pub link: Color,
    pub toast_success: Color,
    pub toast_error: Color,
    pub debug_indicator: Color,
}

impl ColorScheme {
    pub fn nord() -> Self {
        Self {
            background: Color::Black,
            background_focused: Color::Rgb(40, 40, 40),
            text: Color::White,
            text_dim: Color::Gray,
            focus_border: Color::Yellow,
            unfocused_border: Color::Gray,
            header: Color::Rgb(191, 97, 106),
            link: Color::Rgb(136, 192, 208),
            toast_success: Color::Green,
            toast_error: Color::Red,
            debug_indicator: Color::Magenta,
        }
    }

    pub fn dos_blue() -> Self {
        Self {
            background: Color::Blue,
            background_focused: Color::Rgb(20, 20, 255),
            text: Color::White,
            text_dim: Color::LightBlue,
            focus_border: Color::Yellow,
            unfocused_border: Color::Cyan,
            header: Color::LightYellow,
            link: Color::LightCyan,
            toast_success: Color::LightGreen,
            toast_error: Color::LightRed,
            debug_indicator: Color::LightMagenta,
        }
    }

    pub fn amber_crt() -> Self {
        let amber = Color::Rgb(255, 176, 0);
        let amber_bright = Color::Rgb(255, 200, 100);
        let amber_dim = Color::Rgb(180, 120, 0);

        Self {
            background: Color::Black,
            background_focused: Color::Rgb(30, 20, 0),
            text: amber,
            text_dim: amber_dim,
            focus_border: amber_bright,
            unfocused_border: amber_dim,
            header: amber_bright,
            link: amber_bright,
            toast_success: Color::Rgb(100, 255, 100),
            toast_error: Color::Red,
            debug_indicator: Color::Rgb(255, 100, 255),
        }
    }

    pub fn green_phosphor() -> Self {
        let green = Color::Rgb(0, 255, 0);
        let green_dim = Color::Rgb(0, 180, 0);
        let green_bright = Color::Rgb(100, 255, 100);

        Self {
            background: Color::Black,
            background_focused: Color::Rgb(0, 25, 0),
            text: green,
            text_dim: green_dim,
            focus_border: green_bright,
            unfocused_border: green_dim,
            header: green_bright,
            link: green_bright,
            toast_success: green_bright,
            toast_error: Color::Red,
            debug_indicator: Color::Cyan,
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::nord()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parsing() {
        assert_eq!(Theme::from_str("nord").unwrap(), Theme::Nord);
        assert_eq!(Theme::from_str("NORD").unwrap(), Theme::Nord);
        assert_eq!(Theme::from_str("dos-blue").unwrap(), Theme::DosBlue);
        assert_eq!(Theme::from_str("amber").unwrap(), Theme::AmberCrt);
        assert_eq!(Theme::from_str("green").unwrap(), Theme::GreenPhosphor);
        assert!(Theme::from_str("invalid").is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for theme in [Theme::Nord, Theme::DosBlue, Theme::AmberCrt, Theme::GreenPhosphor] {
            assert_eq!(Theme::from_str(&theme.to_string()).unwrap(), theme);
        }
    }
}
