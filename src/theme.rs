//! Light and dark themes and their terminal palettes.

use crate::storage::LocalStorage;
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// Storage key holding the theme preference.
pub const STORAGE_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Page-wide colour scheme.
pub enum Theme {
    #[default]
    /// Dark text on a light background, the first-run default.
    Light,
    /// Light text on a dark background.
    Dark,
}

#[derive(Clone, Copy, Debug)]
/// Styles used by the renderer for one theme.
pub struct Palette {
    /// Body text.
    pub text: Style,
    /// Section title.
    pub title: Style,
    /// Level 2 headings.
    pub heading: Style,
    /// Level 3 and deeper headings.
    pub subheading: Style,
    /// Inline code and unhighlighted code blocks.
    pub code: Style,
    /// Quoted blocks and rules.
    pub quote: Style,
    /// Search highlight marks.
    pub mark: Style,
    /// Active navigation entry and focused borders.
    pub accent: Style,
    /// Secondary text such as counts and hints.
    pub dim: Style,
}

impl Theme {
    /// Reads the persisted preference, defaulting to light.
    #[must_use]
    pub fn load(storage: &LocalStorage) -> Self {
        storage.get(STORAGE_KEY).unwrap_or_default()
    }

    #[must_use]
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    /// Name used in status messages and storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    /// Bundled syntect theme used for code blocks.
    pub fn syntax_theme(self) -> &'static str {
        match self {
            Self::Light => "InspiredGitHub",
            Self::Dark => "base16-ocean.dark",
        }
    }

    #[must_use]
    /// Renderer styles for this theme.
    pub fn palette(self) -> Palette {
        match self {
            Self::Light => Palette {
                text: Style::default().fg(Color::Black).bg(Color::White),
                title: Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                heading: Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
                subheading: Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
                code: Style::default().fg(Color::Red).bg(Color::Rgb(240, 240, 240)),
                quote: Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
                mark: Style::default().fg(Color::Black).bg(Color::Yellow),
                accent: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
                dim: Style::default().fg(Color::Gray),
            },
            Self::Dark => Palette {
                text: Style::default().fg(Color::Gray).bg(Color::Black),
                title: Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                heading: Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                subheading: Style::default()
                    .fg(Color::LightMagenta)
                    .add_modifier(Modifier::BOLD),
                code: Style::default()
                    .fg(Color::LightRed)
                    .bg(Color::Rgb(40, 44, 52)),
                quote: Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
                mark: Style::default()
                    .fg(Color::Black)
                    .bg(Color::Rgb(255, 165, 0)),
                accent: Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                dim: Style::default().fg(Color::DarkGray),
            },
        }
    }
}
