//! Configuration to acknowledge reader preferences as well as set defaults.
//!
//! Specifically, we try to find a vellum.toml, and if present we load settings from there.
//! Any field it leaves out keeps its default. The switches at the end turn individual features
//! off without affecting the others.

use facet::Facet;
use std::fs;
use std::path::Path;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "vellum.toml";

#[derive(Facet, Clone, Debug)]
/// Reader preferences loaded from vellum.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "docs".to_string())]
    /// Directory holding the section templates when no paths are given.
    pub content_dir: String,
    #[facet(default = vec!["md".to_string()])]
    /// File suffixes to match when scanning directories.
    pub file_extensions: Vec<String>,
    #[facet(default = "home".to_string())]
    /// Section shown at startup and addressed by an empty location.
    pub home_section: String,
    #[facet(default = "introduction".to_string())]
    /// Section opened when the location is cleared after startup.
    pub initial_section: String,
    #[facet(default = 100)]
    /// Maximum line width for wrapping section text.
    pub wrap_width: usize,
    #[facet(default = 3)]
    /// Lines kept above the first search highlight when scrolling to it.
    pub header_clearance: usize,
    #[facet(default = 2)]
    /// Lines kept above a heading when jumping to it from the TOC.
    pub toc_clearance: usize,
    #[facet(default = 300)]
    /// Fade delay before a navigation swaps the displayed content.
    pub transition_ms: u64,
    #[facet(default = 32)]
    /// Columns used by the navigation sidebar.
    pub sidebar_width: u16,
    #[facet(default = true)]
    /// Enables the search box.
    pub search: bool,
    #[facet(default = true)]
    /// Enables the navigation sidebar.
    pub sidebar: bool,
    #[facet(default = true)]
    /// Enables the theme toggle.
    pub theme_toggle: bool,
    #[facet(default = true)]
    /// Enables the table of contents pane.
    pub toc: bool,
}

impl Default for Config {
    /// Every field at its facet default, as an empty vellum.toml would give.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    fn default() -> Self {
        facet_toml::from_str::<Self>("").unwrap()
    }
}

impl Config {
    #[must_use]
    /// Load configuration from vellum.toml if present.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from `path`, keeping defaults if it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(contents) = fs::read_to_string(path) {
            if let Ok(config) = facet_toml::from_str::<Self>(&contents) {
                return config;
            }
            tracing::warn!(path = %path.display(), "ignoring invalid configuration");
        }
        Self::default()
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
