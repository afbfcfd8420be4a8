//! The UI renders the application state into something visible.
//!
//! Three panes side by side: the navigation sidebar (or search results while a query is typed),
//! the mounted section, and its table of contents, with a status bar underneath. On a narrow
//! terminal the sidebar is drawn over the content instead of beside it.

use crate::app_state::{AppState, Focus, OVERLAY_BREAKPOINT};
use crate::highlight::{MarkedText, Segment};
use crate::render::CodeHighlighter;
use crate::search::SearchResult;
use crate::theme::Palette;
use crate::toc::TocLevel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Columns used by the table of contents pane.
pub const TOC_WIDTH: u16 = 28;
/// Snippet lines shown per search result.
const SNIPPET_LINES: usize = 3;

/// Renders the whole browser for the current application state.
pub fn draw(f: &mut Frame, app: &mut AppState, code: &CodeHighlighter) {
    let palette = app.theme.palette();
    f.render_widget(Block::default().style(palette.text), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let panel = app.sidebar_visible() || app.search_panel_visible();
    let docked = panel && !app.overlay;
    let show_toc =
        app.config.toc && !app.toc.is_empty() && chunks[0].width >= OVERLAY_BREAKPOINT;

    let mut constraints = Vec::with_capacity(3);
    if docked {
        constraints.push(Constraint::Length(app.config.sidebar_width));
    }
    constraints.push(Constraint::Min(0));
    if show_toc {
        constraints.push(Constraint::Length(TOC_WIDTH));
    }
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(chunks[0]);

    let content_pane = usize::from(docked);
    if docked {
        draw_sidebar(f, app, &palette, panes[0]);
    }
    draw_content(f, app, code, &palette, panes[content_pane]);
    if show_toc {
        draw_toc(f, app, &palette, panes[content_pane + 1]);
    }

    if panel && app.overlay {
        let area = Rect {
            width: app.config.sidebar_width.min(chunks[0].width),
            ..chunks[0]
        };
        f.render_widget(Clear, area);
        draw_sidebar(f, app, &palette, area);
    }

    draw_status(f, app, &palette, chunks[1]);
}

fn pane_block<'a>(title: impl Into<Line<'a>>, focused: bool, palette: &Palette) -> Block<'a> {
    let border = if focused { palette.accent } else { palette.dim };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .style(palette.text)
        .title(title)
}

fn draw_content(
    f: &mut Frame,
    app: &mut AppState,
    code: &CodeHighlighter,
    palette: &Palette,
    area: Rect,
) {
    let title = app
        .store
        .section(&app.nav.current_section_id)
        .map_or_else(String::new, |section| section.title.clone());
    let location = if app.location.is_empty() {
        "/".to_string()
    } else {
        app.location.to_string()
    };
    let block = pane_block(
        format!(" {title} ─ {location} "),
        app.focus == Focus::Content,
        palette,
    );

    let inner = block.inner(area);
    let width = usize::from(inner.width).min(app.config.wrap_width);
    app.layout(width, code);
    let scroll = u16::try_from(app.scroll).unwrap_or(u16::MAX);

    let mut paragraph = Paragraph::new(app.rendered().lines.clone())
        .block(block)
        .scroll((scroll, 0));
    if app.is_fading() {
        paragraph = paragraph.style(palette.text.add_modifier(Modifier::DIM));
    }
    f.render_widget(paragraph, area);
}

fn draw_sidebar(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let (search_area, list_area) = if app.config.search {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);
        (Some(parts[0]), parts[1])
    } else {
        (None, area)
    };

    if let Some(search_area) = search_area {
        let focused = app.focus == Focus::Search;
        let input = Paragraph::new(app.search_input.as_str())
            .block(pane_block(" Search (/) ", focused, palette));
        f.render_widget(input, search_area);
        if focused {
            let typed = u16::try_from(app.search_input.chars().count()).unwrap_or(u16::MAX);
            let x = search_area
                .x
                .saturating_add(1)
                .saturating_add(typed)
                .min(search_area.right().saturating_sub(2));
            f.set_cursor_position(Position::new(x, search_area.y + 1));
        }
    }

    let focused = app.focus == Focus::Sidebar;
    if app.is_search_mode() {
        draw_results(f, app, palette, list_area, focused);
    } else if app.config.sidebar {
        draw_nav(f, app, palette, list_area, focused);
    }
}

fn draw_nav(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect, focused: bool) {
    let active = app.active_nav_index();
    let items: Vec<ListItem> = app
        .store
        .sections()
        .iter()
        .enumerate()
        .map(|(i, section)| {
            if Some(i) == active {
                ListItem::new(Line::from(vec![
                    Span::styled("▸ ", palette.accent),
                    Span::styled(section.title.clone(), palette.accent),
                ]))
            } else {
                ListItem::new(Line::from(format!("  {}", section.title)))
            }
        })
        .collect();

    let list = List::new(items)
        .block(pane_block(" Sections ", focused, palette))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if focused {
        state.select(Some(app.nav_index));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_results(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect, focused: bool) {
    if app.results.is_empty() {
        let message = Paragraph::new(Line::from(vec![
            Span::raw("No results found for \""),
            Span::styled(
                app.search_query.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("\""),
        ]))
        .block(pane_block(" Search ", focused, palette));
        f.render_widget(message, area);
        return;
    }

    let count = app.results.len();
    let header = format!(" Found {count} result{} ", if count > 1 { "s" } else { "" });
    let width = usize::from(area.width.saturating_sub(2)).max(1);
    let items: Vec<ListItem> = app
        .results
        .iter()
        .map(|result| result_item(result, &app.search_query, width, palette))
        .collect();

    let list = List::new(items)
        .block(pane_block(header, focused, palette))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if focused {
        state.select(Some(app.result_index));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn result_item(
    result: &SearchResult,
    query: &str,
    width: usize,
    palette: &Palette,
) -> ListItem<'static> {
    let title_style = palette.accent;
    let mut lines = vec![Line::from(marked_spans(
        &MarkedText::highlight(&result.title, query),
        title_style,
        palette.mark,
    ))];
    lines.extend(wrap_marked(
        &result.snippet,
        width,
        SNIPPET_LINES,
        palette.dim,
        palette.mark,
    ));

    let mut tags = Vec::new();
    for heading in result.heading_tags() {
        tags.push(Span::styled("# ", palette.dim));
        tags.extend(marked_spans(
            &MarkedText::highlight(&heading.text, query),
            palette.text,
            palette.mark,
        ));
        tags.push(Span::raw("  "));
    }
    if !tags.is_empty() {
        lines.push(Line::from(tags));
    }
    lines.push(Line::default());
    ListItem::new(Text::from(lines))
}

/// Spans for marked text, with matches in `mark` style.
#[must_use]
pub fn marked_spans(text: &MarkedText, base: Style, mark: Style) -> Vec<Span<'static>> {
    text.segments
        .iter()
        .map(|segment| match segment {
            Segment::Plain(text) => Span::styled(text.clone(), base),
            Segment::Match(text) => Span::styled(text.clone(), mark),
        })
        .collect()
}

/// Hard-wraps marked text into at most `max_lines` lines of `width` characters.
///
/// Line breaks and runs of whitespace are drawn as a single space.
#[must_use]
pub fn wrap_marked(
    text: &MarkedText,
    width: usize,
    max_lines: usize,
    base: Style,
    mark: Style,
) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut used = 0;
    let mut after_space = false;

    for segment in &text.segments {
        let style = match segment {
            Segment::Plain(_) => base,
            Segment::Match(_) => mark,
        };
        let mut run = String::new();
        for c in segment.as_str().chars() {
            let c = if c.is_whitespace() { ' ' } else { c };
            if c == ' ' && after_space {
                continue;
            }
            after_space = c == ' ';
            if used == width {
                if !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), style));
                }
                lines.push(Line::from(std::mem::take(&mut spans)));
                used = 0;
                if lines.len() == max_lines {
                    return lines;
                }
            }
            run.push(c);
            used += 1;
        }
        if !run.is_empty() {
            spans.push(Span::styled(run, style));
        }
    }
    if !spans.is_empty() && lines.len() < max_lines {
        lines.push(Line::from(spans));
    }
    lines
}

fn draw_toc(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let items: Vec<ListItem> = app
        .toc
        .iter()
        .map(|entry| match entry.level {
            TocLevel::Primary => {
                ListItem::new(Line::from(Span::styled(entry.label.clone(), palette.heading)))
            }
            TocLevel::Secondary => ListItem::new(Line::from(format!("  {}", entry.label))),
        })
        .collect();

    let focused = app.focus == Focus::Toc;
    let list = List::new(items)
        .block(pane_block(" Contents ", focused, palette))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if focused {
        state.select(Some(app.toc_index));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_status(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let text = if app.focus == Focus::Command {
        format!(":{}", app.command_buffer)
    } else if let Some((message, _)) = &app.message {
        message.clone()
    } else {
        match app.focus {
            Focus::Search => "Type to search | Enter: Open | ↓: Results | Esc: Clear".to_string(),
            Focus::Sidebar => {
                "↑/↓: Select | Enter: Open | Tab: Next pane | Esc: Close | q: Quit".to_string()
            }
            Focus::Toc => "↑/↓: Select | Enter: Jump | Tab: Next pane | q: Quit".to_string(),
            Focus::Content | Focus::Command => {
                concat!(
                    "/: Search | s: Sidebar | t: Theme | y: Copy code | ",
                    "←/→: Back/Forward | :go #id | q: Quit",
                )
                .to_string()
            }
        }
    };

    let status = Paragraph::new(text).block(pane_block("", false, palette));
    f.render_widget(status, area);
}

#[cfg(test)]
#[path = "tests/ui.rs"]
mod tests;
