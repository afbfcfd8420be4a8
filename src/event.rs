//! Named input events the controller responds to.
//!
//! Key handling in the binary translates keystrokes into these; tests dispatch them directly.

use crate::location::Location;
use std::time::Instant;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Something the reader did, or time passing.
pub enum AppEvent {
    /// The search box now holds this text.
    QueryChanged(String),
    /// Escape in the search box: clear it and leave it.
    SearchCleared,
    /// Enter in the search box: open the selected result and move to the content.
    SearchSubmitted,
    /// A search result was opened by position.
    ResultOpened(usize),
    /// A navigation entry or link asked for a section.
    NavigateRequested(String),
    /// The location fragment was changed from outside.
    LocationChanged(Location),
    /// Step back through visited locations.
    HistoryBack,
    /// Step forward through visited locations.
    HistoryForward,
    /// Flip between light and dark.
    ThemeToggled,
    /// Open or close the navigation sidebar.
    SidebarToggled,
    /// Input landed outside the sidebar while it was an overlay.
    SidebarDismissed,
    /// A TOC entry was chosen by position.
    TocSelected(usize),
    /// Copy the code block nearest the top of the viewport.
    CopyRequested,
    /// Scroll the content by this many lines.
    Scrolled(isize),
    /// The terminal was resized to this many columns.
    Resized(u16),
    /// Timers may have come due.
    Tick(Instant),
}
