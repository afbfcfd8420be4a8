//! The controller owning everything the browser shows.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated as the reader
//! navigates and searches. `AppState` holds the navigation state, the mounted section, its TOC,
//! the search box and results, the theme and sidebar, and answers the named events in
//! [`crate::event::AppEvent`].
//!
//! Navigation is staged: the location, active entry and scroll position change at once, while
//! the content swap waits for a short fade. A second navigation before the swap simply replaces
//! the pending one, so the latest request always wins. The TOC and any search highlight are
//! rebuilt only after the swap has mounted the new content.

use crate::clipboard::{Clipboard, SystemClipboard};
use crate::config::Config;
use crate::content::Node;
use crate::error::{Error, Result};
use crate::event::AppEvent;
use crate::highlight::{apply_highlight, clear_highlight};
use crate::location::{History, Location};
use crate::render::{render, CodeHighlighter, Rendered};
use crate::search::{normalize_query, search, SearchResult};
use crate::storage::LocalStorage;
use crate::store::ContentStore;
use crate::theme::{self, Theme};
use crate::toc::{build_toc, TocEntry};
use std::time::{Duration, Instant};

/// Terminal width below which the sidebar becomes an overlay.
pub const OVERLAY_BREAKPOINT: u16 = 100;
/// How long a status message stays visible.
pub const MESSAGE_TTL: Duration = Duration::from_secs(2);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Which section is displayed and which search query is active.
pub struct NavigationState {
    /// Section most recently navigated to.
    pub current_section_id: String,
    /// Query reapplied as a highlight whenever content is mounted; empty when inactive.
    pub active_query: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Pane receiving keystrokes.
pub enum Focus {
    /// Section content scrolls.
    Content,
    /// Navigation list or search results.
    Sidebar,
    /// Search box captures text.
    Search,
    /// Table of contents.
    Toc,
    /// `:` command line captures text.
    Command,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A content swap waiting for its fade to finish.
pub struct Transition {
    /// Section to mount.
    pub section_id: String,
    /// When the swap should happen.
    pub due: Instant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Scroll position to settle once the content has been laid out.
pub enum ScrollRequest {
    /// Back to the first line.
    Top,
    /// First search mark, below the header clearance.
    FirstMark,
    /// A heading anchor, below the TOC clearance.
    Anchor(String),
}

/// Browser state and the operations that change it.
pub struct AppState {
    /// Loaded section templates.
    pub store: ContentStore,
    /// Reader preferences.
    pub config: Config,
    /// Displayed section and active query.
    pub nav: NavigationState,
    /// Mounted content tree, a highlighted clone of the current template.
    pub display: Option<Node>,
    /// TOC of the mounted content.
    pub toc: Vec<TocEntry>,
    /// Selected TOC entry.
    pub toc_index: usize,
    /// Active colour scheme.
    pub theme: Theme,
    /// Whether the sidebar is showing.
    pub sidebar_open: bool,
    /// Whether the sidebar overlays the content instead of sitting beside it.
    pub overlay: bool,
    /// Raw search box contents.
    pub search_input: String,
    /// Normalized query the current results were computed for.
    pub search_query: String,
    /// Results for `search_query`, in store order.
    pub results: Vec<SearchResult>,
    /// Selected search result.
    pub result_index: usize,
    /// Selected navigation entry.
    pub nav_index: usize,
    /// Pane receiving keystrokes.
    pub focus: Focus,
    /// Text typed after `:`.
    pub command_buffer: String,
    /// Content swap waiting on its fade.
    pub pending: Option<Transition>,
    /// First content line shown.
    pub scroll: usize,
    /// Scroll target to resolve after the next layout.
    pub pending_scroll: Option<ScrollRequest>,
    /// Current location fragment.
    pub location: Location,
    /// Visited locations.
    pub history: History,
    /// Status feedback and when it expires.
    pub message: Option<(String, Instant)>,
    storage: LocalStorage,
    clipboard: Box<dyn Clipboard>,
    rendered: Rendered,
    generation: u64,
    layout_key: Option<(usize, Theme, u64)>,
}

impl AppState {
    #[must_use]
    /// Initialises state over a loaded store, reading the persisted theme from `storage`.
    pub fn new(store: ContentStore, config: Config, storage: LocalStorage) -> Self {
        let theme = Theme::load(&storage);
        tracing::info!(theme = theme.as_str(), "starting");
        Self {
            store,
            config,
            nav: NavigationState::default(),
            display: None,
            toc: Vec::new(),
            toc_index: 0,
            theme,
            sidebar_open: true,
            overlay: false,
            search_input: String::new(),
            search_query: String::new(),
            results: Vec::new(),
            result_index: 0,
            nav_index: 0,
            focus: Focus::Content,
            command_buffer: String::new(),
            pending: None,
            scroll: 0,
            pending_scroll: None,
            location: Location::default(),
            history: History::default(),
            message: None,
            storage,
            clipboard: Box::new(SystemClipboard::default()),
            rendered: Rendered::default(),
            generation: 0,
            layout_key: None,
        }
    }

    #[must_use]
    /// Replaces the clipboard used for copying code.
    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Opens the section named by `location`, or the home section when it names none.
    ///
    /// An unknown section in the location falls back to home. The first swap happens without a
    /// fade.
    ///
    /// # Errors
    ///
    /// Returns an error if neither the requested nor the home section exists.
    pub fn start(&mut self, location: &Location) -> Result<()> {
        let home = self.config.home_section.clone();
        let opened = if location.is_empty() {
            self.navigate(&home)
        } else {
            self.navigate(location.fragment()).or_else(|_| self.navigate(&home))
        };
        let opened = opened.or_else(|e| {
            let first = self.store.sections().first().map(|s| s.id.clone());
            first.map_or(Err(e), |id| self.navigate(&id))
        });
        self.complete_transition();
        opened
    }

    /// Answers one input event. Failures are logged and reported in the status bar.
    pub fn dispatch(&mut self, event: AppEvent) {
        let outcome = match event {
            AppEvent::QueryChanged(input) => {
                self.query_changed(input);
                Ok(())
            }
            AppEvent::SearchCleared => {
                self.query_changed(String::new());
                if self.focus == Focus::Search {
                    self.focus = Focus::Content;
                }
                Ok(())
            }
            AppEvent::SearchSubmitted => {
                if self.results.is_empty() {
                    Ok(())
                } else {
                    self.focus = Focus::Content;
                    self.open_result(self.result_index)
                }
            }
            AppEvent::ResultOpened(index) => self.open_result(index),
            AppEvent::NavigateRequested(id) => self.navigate(&id),
            AppEvent::LocationChanged(location) => self.location_changed(&location),
            AppEvent::HistoryBack => self.history_step(false),
            AppEvent::HistoryForward => self.history_step(true),
            AppEvent::ThemeToggled => {
                self.toggle_theme();
                Ok(())
            }
            AppEvent::SidebarToggled => {
                self.toggle_sidebar();
                Ok(())
            }
            AppEvent::SidebarDismissed => {
                self.dismiss_sidebar();
                Ok(())
            }
            AppEvent::TocSelected(index) => {
                self.select_toc(index);
                Ok(())
            }
            AppEvent::CopyRequested => {
                self.copy_code();
                Ok(())
            }
            AppEvent::Scrolled(delta) => {
                self.scroll_by(delta);
                Ok(())
            }
            AppEvent::Resized(width) => {
                self.set_viewport_width(width);
                Ok(())
            }
            AppEvent::Tick(now) => {
                self.tick(now);
                Ok(())
            }
        };

        if let Err(e) = outcome {
            self.flash(e.to_string());
        }
    }

    // --- Navigator ---

    /// Navigates to `section_id`, recording the move in history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SectionNotFound`] if there is no such section; nothing changes then.
    pub fn navigate(&mut self, section_id: &str) -> Result<()> {
        self.navigate_inner(section_id, true)
    }

    fn navigate_inner(&mut self, section_id: &str, record: bool) -> Result<()> {
        let Some(position) = self
            .store
            .sections()
            .iter()
            .position(|section| section.id == section_id)
        else {
            tracing::error!(section = section_id, "template not found");
            return Err(Error::SectionNotFound(section_id.to_string()));
        };

        self.location = Location::for_section(section_id, &self.config.home_section);
        if record {
            self.history.push(self.location.clone());
        }
        self.nav_index = position;
        self.scroll = 0;
        self.pending_scroll = Some(ScrollRequest::Top);
        self.dismiss_sidebar();
        self.nav.current_section_id = section_id.to_string();

        let due = Instant::now() + Duration::from_millis(self.config.transition_ms);
        if let Some(replaced) = self.pending.replace(Transition {
            section_id: section_id.to_string(),
            due,
        }) {
            tracing::debug!(section = %replaced.section_id, "superseded pending transition");
        }
        tracing::info!(section = section_id, location = %self.location, "navigate");

        if self.config.transition_ms == 0 {
            self.complete_transition();
        }
        Ok(())
    }

    /// Mounts the pending section now, rebuilding its TOC and reapplying the active query.
    pub fn complete_transition(&mut self) {
        let Some(transition) = self.pending.take() else {
            return;
        };
        let Some(template) = self.store.template(&transition.section_id) else {
            tracing::error!(section = %transition.section_id, "template vanished before swap");
            return;
        };

        let mut root = template.root.clone();
        self.toc = if self.config.toc && transition.section_id != self.config.home_section {
            build_toc(&mut root)
        } else {
            Vec::new()
        };
        self.toc_index = 0;

        if !self.nav.active_query.is_empty()
            && apply_highlight(&mut root, &self.nav.active_query) > 0
        {
            self.pending_scroll = Some(ScrollRequest::FirstMark);
        }

        self.display = Some(root);
        self.generation += 1;
    }

    /// Completes a due transition and expires old status messages.
    pub fn tick(&mut self, now: Instant) {
        if self
            .pending
            .as_ref()
            .is_some_and(|transition| transition.due <= now)
        {
            self.complete_transition();
        }
        if self
            .message
            .as_ref()
            .is_some_and(|(_, expires)| *expires <= now)
        {
            self.message = None;
        }
    }

    #[must_use]
    /// Whether the content pane is fading between sections.
    pub fn is_fading(&self) -> bool {
        self.pending.is_some()
    }

    fn location_changed(&mut self, location: &Location) -> Result<()> {
        let target = if location.is_empty() {
            self.config.initial_section.clone()
        } else {
            location.fragment().to_string()
        };
        self.navigate(&target)
    }

    fn history_step(&mut self, forward: bool) -> Result<()> {
        let step = if forward {
            self.history.forward()
        } else {
            self.history.back()
        };
        let Some(location) = step.cloned() else {
            return Ok(());
        };
        let target = if location.is_empty() {
            self.config.home_section.clone()
        } else {
            location.fragment().to_string()
        };
        self.navigate_inner(&target, false)
    }

    #[must_use]
    /// Position of the displayed section in the navigation list.
    pub fn active_nav_index(&self) -> Option<usize> {
        self.store
            .sections()
            .iter()
            .position(|section| section.id == self.nav.current_section_id)
    }

    // --- Search ---

    /// Updates the search box and recomputes results.
    ///
    /// An empty query ends search mode: results go, the navigation list returns, the active
    /// query is dropped and the displayed content is unhighlighted.
    pub fn query_changed(&mut self, input: String) {
        if !self.config.search {
            return;
        }
        self.search_input = input;
        let query = normalize_query(&self.search_input);

        if query.is_empty() {
            self.clear_search();
            return;
        }

        self.results = search(self.store.sections(), &query);
        self.result_index = 0;
        self.search_query = query;
    }

    fn clear_search(&mut self) {
        self.results.clear();
        self.result_index = 0;
        self.search_query.clear();
        self.nav.active_query.clear();
        if let Some(root) = self.display.as_mut() {
            if clear_highlight(root) > 0 {
                self.generation += 1;
            }
        }
    }

    #[must_use]
    /// Whether the sidebar lists search results instead of sections.
    pub fn is_search_mode(&self) -> bool {
        !self.search_query.is_empty()
    }

    /// Opens a search result, making its query the active highlight.
    ///
    /// # Errors
    ///
    /// Returns an error if the result's section no longer exists.
    pub fn open_result(&mut self, index: usize) -> Result<()> {
        let Some(result) = self.results.get(index) else {
            return Ok(());
        };
        let section_id = result.section_id.clone();
        self.nav.active_query = self.search_query.clone();
        self.result_index = index;
        self.navigate(&section_id)
    }

    // --- Theme, sidebar, TOC, clipboard ---

    /// Flips the theme and persists the choice.
    pub fn toggle_theme(&mut self) {
        if !self.config.theme_toggle {
            return;
        }
        self.theme = self.theme.toggled();
        if let Err(e) = self.storage.set(theme::STORAGE_KEY, &self.theme) {
            tracing::warn!(error = %e, "could not persist theme");
        }
        tracing::info!(theme = self.theme.as_str(), "theme toggled");
    }

    /// Opens or closes the sidebar.
    pub fn toggle_sidebar(&mut self) {
        if !self.config.sidebar {
            return;
        }
        self.sidebar_open = !self.sidebar_open;
        if !self.sidebar_open && self.focus == Focus::Sidebar {
            self.focus = Focus::Content;
        }
    }

    /// Closes the sidebar if it is open as an overlay.
    pub fn dismiss_sidebar(&mut self) {
        if self.overlay && self.sidebar_open {
            self.sidebar_open = false;
            if self.focus == Focus::Sidebar {
                self.focus = Focus::Content;
            }
        }
    }

    #[must_use]
    /// Whether the sidebar should be drawn.
    pub fn sidebar_visible(&self) -> bool {
        self.config.sidebar && self.sidebar_open
    }

    #[must_use]
    /// Whether the search box needs a panel of its own because the sidebar is disabled.
    pub fn search_panel_visible(&self) -> bool {
        self.config.search
            && !self.config.sidebar
            && (self.focus == Focus::Search || self.is_search_mode())
    }

    /// Switches between docked and overlay sidebar for a terminal `width` columns wide.
    ///
    /// Becoming an overlay closes the sidebar so it does not cover the content unasked.
    pub fn set_viewport_width(&mut self, width: u16) {
        let overlay = width < OVERLAY_BREAKPOINT;
        if overlay && !self.overlay {
            self.sidebar_open = false;
        } else if !overlay && self.overlay {
            self.sidebar_open = true;
        }
        self.overlay = overlay;
    }

    /// Scrolls to the heading of a TOC entry.
    pub fn select_toc(&mut self, index: usize) {
        if let Some(entry) = self.toc.get(index) {
            self.toc_index = index;
            self.pending_scroll = Some(ScrollRequest::Anchor(entry.anchor.clone()));
        }
    }

    /// Copies the code block at or below the top of the viewport.
    ///
    /// Only success is reported; a failed copy is silent.
    pub fn copy_code(&mut self) {
        let Some(block) = self.rendered.code_block_from(self.scroll) else {
            return;
        };
        let text = block.text.clone();
        if self.clipboard.copy(&text) {
            self.flash("Copied".to_string());
        }
    }

    /// Moves the viewport, clamped to the laid-out content.
    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.rendered.lines.len().saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    /// Shows `text` in the status bar for [`MESSAGE_TTL`].
    pub fn flash(&mut self, text: String) {
        self.message = Some((text, Instant::now() + MESSAGE_TTL));
    }

    // --- Layout ---

    #[must_use]
    /// Most recent layout of the mounted content.
    pub fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    /// Lays out the mounted content at `width`, reusing the last layout when nothing changed,
    /// then settles any pending scroll request against it.
    pub fn layout(&mut self, width: usize, code: &CodeHighlighter) -> &Rendered {
        let key = (width, self.theme, self.generation);
        if self.layout_key != Some(key) {
            self.rendered = match &self.display {
                Some(root) => render(root, width, self.theme, code),
                None => Rendered::default(),
            };
            self.layout_key = Some(key);
        }

        match self.pending_scroll.take() {
            Some(ScrollRequest::Top) => self.scroll = 0,
            Some(ScrollRequest::FirstMark) => {
                if let Some(line) = self.rendered.first_mark {
                    self.scroll = line.saturating_sub(self.config.header_clearance);
                }
            }
            Some(ScrollRequest::Anchor(anchor)) => {
                if let Some(line) = self.rendered.anchor_line(&anchor) {
                    self.scroll = line.saturating_sub(self.config.toc_clearance);
                }
            }
            None => {}
        }
        &self.rendered
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
