use super::{AppState, Focus, ScrollRequest};
use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::content::{Node, Tag};
use crate::error::Error;
use crate::event::AppEvent;
use crate::location::Location;
use crate::render::CodeHighlighter;
use crate::storage::LocalStorage;
use crate::store::{ContentStore, Template};
use crate::theme::Theme;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn template(id: &str, children: Vec<Node>) -> Template {
    Template {
        id: id.to_string(),
        root: Node::element(Tag::Section, children),
    }
}

fn heading(level: u8, text: &str) -> Node {
    Node::element(Tag::Heading(level), vec![Node::text(text)])
}

fn paragraph(text: &str) -> Node {
    Node::element(Tag::Paragraph, vec![Node::text(text)])
}

fn store() -> ContentStore {
    ContentStore::new(vec![
        template(
            "home",
            vec![
                heading(1, "Asset Management Documentation"),
                paragraph("Start with the introduction."),
            ],
        ),
        template(
            "introduction",
            vec![
                heading(1, "Introduction"),
                heading(2, "Overview"),
                paragraph("Every asset gets a tag. Pick a theme later."),
            ],
        ),
        template(
            "theming",
            vec![
                heading(1, "Theming"),
                paragraph("Light is the default."),
                heading(2, "Dark mode"),
                paragraph("The dark theme is easier at night."),
                heading(3, "Toggle"),
                Node::element(
                    Tag::CodeBlock(None),
                    vec![Node::text("vellum --theme dark")],
                ),
            ],
        ),
        template(
            "deployment",
            vec![heading(1, "Deployment"), paragraph("Ship the build.")],
        ),
    ])
}

fn config() -> Config {
    Config {
        transition_ms: 0,
        ..Config::default()
    }
}

fn app() -> AppState {
    let mut app = AppState::new(store(), config(), LocalStorage::in_memory());
    app.start(&Location::default()).unwrap();
    app
}

#[derive(Default)]
struct FakeClipboard {
    copied: Rc<RefCell<Vec<String>>>,
    fail: bool,
}

impl Clipboard for FakeClipboard {
    fn copy(&mut self, text: &str) -> bool {
        if self.fail {
            return false;
        }
        self.copied.borrow_mut().push(text.to_string());
        true
    }
}

#[test]
fn test_start_opens_home_without_toc() {
    let app = app();
    assert_eq!(app.nav.current_section_id, "home");
    assert!(app.location.is_empty());
    assert!(app.toc.is_empty());
    assert!(app.display.is_some());
    assert!(!app.is_fading());
}

#[test]
fn test_start_with_unknown_location_falls_back_to_home() {
    let mut app = AppState::new(store(), config(), LocalStorage::in_memory());
    app.start(&Location::parse("#nowhere")).unwrap();
    assert_eq!(app.nav.current_section_id, "home");
}

#[test]
fn test_start_at_location() {
    let mut app = AppState::new(store(), config(), LocalStorage::in_memory());
    app.start(&Location::parse("#theming")).unwrap();
    assert_eq!(app.nav.current_section_id, "theming");
    assert_eq!(app.toc.len(), 2);
}

#[test]
fn test_navigate_updates_location_toc_and_active_entry() {
    let mut app = app();
    app.navigate("theming").unwrap();

    assert_eq!(app.nav.current_section_id, "theming");
    assert_eq!(app.location.to_string(), "#theming");
    assert_eq!(app.active_nav_index(), Some(2));
    let labels: Vec<&str> = app.toc.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["Dark mode", "Toggle"]);
    assert_eq!(
        app.display.as_ref().unwrap().text_content(),
        app.store.template("theming").unwrap().root.text_content()
    );
}

#[test]
fn test_navigate_to_unknown_section_changes_nothing() {
    let mut app = app();
    app.navigate("introduction").unwrap();
    let display = app.display.clone();

    let err = app.navigate("missing").unwrap_err();
    assert!(matches!(err, Error::SectionNotFound(ref id) if id == "missing"));
    assert_eq!(app.nav.current_section_id, "introduction");
    assert_eq!(app.location.to_string(), "#introduction");
    assert_eq!(app.display, display);
}

#[test]
fn test_unknown_section_from_event_is_reported() {
    let mut app = app();
    app.dispatch(AppEvent::NavigateRequested("missing".to_string()));
    assert_eq!(app.nav.current_section_id, "home");
    let (message, _) = app.message.clone().unwrap();
    assert!(message.contains("missing"));
}

#[test]
fn test_navigating_home_clears_location() {
    let mut app = app();
    app.navigate("theming").unwrap();
    app.navigate("home").unwrap();
    assert!(app.location.is_empty());
    assert!(app.toc.is_empty());
}

#[test]
fn test_transition_swaps_content_after_delay() {
    let mut app = AppState::new(
        store(),
        Config::default(),
        LocalStorage::in_memory(),
    );
    app.start(&Location::default()).unwrap();

    app.navigate("introduction").unwrap();
    assert_eq!(app.nav.current_section_id, "introduction");
    assert_eq!(app.location.to_string(), "#introduction");
    assert!(app.is_fading());
    let home = app.store.template("home").unwrap().root.clone();
    assert_eq!(app.display.as_ref(), Some(&home));

    app.tick(Instant::now() + Duration::from_secs(5));
    assert!(!app.is_fading());
    assert!(app
        .display
        .as_ref()
        .unwrap()
        .text_content()
        .contains("Every asset gets a tag."));
}

#[test]
fn test_latest_navigation_wins() {
    let mut app = AppState::new(
        store(),
        Config::default(),
        LocalStorage::in_memory(),
    );
    app.start(&Location::default()).unwrap();

    app.navigate("introduction").unwrap();
    app.navigate("deployment").unwrap();
    assert_eq!(app.pending.as_ref().unwrap().section_id, "deployment");

    app.tick(Instant::now() + Duration::from_secs(5));
    assert_eq!(app.nav.current_section_id, "deployment");
    assert!(app
        .display
        .as_ref()
        .unwrap()
        .text_content()
        .contains("Ship the build."));
    assert!(app.pending.is_none());
}

#[test]
fn test_query_results_and_search_mode() {
    let mut app = app();
    app.dispatch(AppEvent::QueryChanged("  ASSET ".to_string()));

    assert!(app.is_search_mode());
    assert_eq!(app.search_query, "asset");
    let ids: Vec<&str> = app.results.iter().map(|r| r.section_id.as_str()).collect();
    assert_eq!(ids, vec!["home", "introduction"]);
    // Typing alone does not highlight the displayed content.
    assert_eq!(app.display.as_ref().unwrap().mark_count(), 0);
}

#[test]
fn test_query_case_gives_same_results() {
    let mut app = app();
    app.query_changed("THEME".to_string());
    let upper = app.results.clone();
    app.query_changed("Theme".to_string());
    assert_eq!(app.results, upper);
    app.query_changed("theme".to_string());
    assert_eq!(app.results, upper);
    assert_eq!(upper.len(), 2);
}

#[test]
fn test_open_result_highlights_and_scrolls_to_first_mark() {
    let code = CodeHighlighter::new();
    let mut app = app();
    app.query_changed("night".to_string());
    app.dispatch(AppEvent::ResultOpened(0));

    assert_eq!(app.nav.current_section_id, "theming");
    assert_eq!(app.nav.active_query, "night");
    assert_eq!(app.display.as_ref().unwrap().mark_count(), 1);
    assert_eq!(app.pending_scroll, Some(ScrollRequest::FirstMark));

    app.layout(80, &code);
    let first_mark = app.rendered().first_mark.unwrap();
    assert_eq!(
        app.scroll,
        first_mark.saturating_sub(app.config.header_clearance)
    );
}

#[test]
fn test_active_query_is_reapplied_on_navigation() {
    let mut app = app();
    app.query_changed("theme".to_string());
    app.open_result(0).unwrap();
    assert_eq!(app.nav.current_section_id, "introduction");
    assert_eq!(app.display.as_ref().unwrap().mark_count(), 1);

    app.navigate("theming").unwrap();
    assert!(app.display.as_ref().unwrap().mark_count() > 0);

    app.navigate("deployment").unwrap();
    assert_eq!(app.display.as_ref().unwrap().mark_count(), 0);
}

#[test]
fn test_clearing_query_clears_results_and_highlights() {
    let mut app = app();
    app.query_changed("theme".to_string());
    app.open_result(1).unwrap();
    assert!(app.display.as_ref().unwrap().mark_count() > 0);

    app.dispatch(AppEvent::QueryChanged(String::new()));
    assert!(app.results.is_empty());
    assert!(!app.is_search_mode());
    assert!(app.nav.active_query.is_empty());
    assert_eq!(app.display.as_ref().unwrap().mark_count(), 0);

    // Structure is back to the freshly mounted section.
    let mut fresh = app.store.template("theming").unwrap().root.clone();
    crate::toc::build_toc(&mut fresh);
    assert_eq!(app.display.as_ref(), Some(&fresh));
}

#[test]
fn test_search_cleared_event_leaves_search_box() {
    let mut app = app();
    app.focus = Focus::Search;
    app.dispatch(AppEvent::QueryChanged("asset".to_string()));
    app.dispatch(AppEvent::SearchCleared);
    assert!(app.search_input.is_empty());
    assert!(!app.is_search_mode());
    assert_eq!(app.focus, Focus::Content);
}

#[test]
fn test_submitting_search_opens_selected_result() {
    let mut app = app();
    app.focus = Focus::Search;
    app.dispatch(AppEvent::QueryChanged("night".to_string()));
    app.dispatch(AppEvent::SearchSubmitted);

    assert_eq!(app.nav.current_section_id, "theming");
    assert_eq!(app.nav.active_query, "night");
    assert_eq!(app.focus, Focus::Content);
}

#[test]
fn test_submitting_search_without_results_stays_in_box() {
    let mut app = app();
    app.focus = Focus::Search;
    app.dispatch(AppEvent::QueryChanged("zzz".to_string()));
    app.dispatch(AppEvent::SearchSubmitted);

    assert_eq!(app.nav.current_section_id, "home");
    assert_eq!(app.focus, Focus::Search);
}

#[test]
fn test_search_disabled_ignores_queries() {
    let mut app = AppState::new(
        store(),
        Config {
            search: false,
            ..config()
        },
        LocalStorage::in_memory(),
    );
    app.start(&Location::default()).unwrap();
    app.query_changed("asset".to_string());
    assert!(app.results.is_empty());
    assert!(!app.is_search_mode());
    // Other features keep working.
    app.navigate("theming").unwrap();
    assert_eq!(app.toc.len(), 2);
}

#[test]
fn test_toc_disabled_skips_toc() {
    let mut app = AppState::new(
        store(),
        Config {
            toc: false,
            ..config()
        },
        LocalStorage::in_memory(),
    );
    app.start(&Location::parse("#theming")).unwrap();
    assert!(app.toc.is_empty());
}

#[test]
fn test_theme_toggle_persists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");

    let mut app = AppState::new(store(), config(), LocalStorage::open(path.clone()));
    assert_eq!(app.theme, Theme::Light);
    app.dispatch(AppEvent::ThemeToggled);
    assert_eq!(app.theme, Theme::Dark);

    let reopened = AppState::new(store(), config(), LocalStorage::open(path));
    assert_eq!(reopened.theme, Theme::Dark);
}

#[test]
fn test_theme_toggle_disabled() {
    let mut app = AppState::new(
        store(),
        Config {
            theme_toggle: false,
            ..config()
        },
        LocalStorage::in_memory(),
    );
    app.toggle_theme();
    assert_eq!(app.theme, Theme::Light);
}

#[test]
fn test_overlay_sidebar_closes_on_navigation() {
    let mut app = app();
    app.dispatch(AppEvent::Resized(80));
    assert!(app.overlay);
    assert!(!app.sidebar_visible());

    app.dispatch(AppEvent::SidebarToggled);
    assert!(app.sidebar_visible());
    app.navigate("theming").unwrap();
    assert!(!app.sidebar_visible());

    app.dispatch(AppEvent::SidebarToggled);
    app.dispatch(AppEvent::SidebarDismissed);
    assert!(!app.sidebar_visible());

    app.dispatch(AppEvent::Resized(140));
    assert!(!app.overlay);
    assert!(app.sidebar_visible());
}

#[test]
fn test_docked_sidebar_ignores_dismiss() {
    let mut app = app();
    app.dispatch(AppEvent::Resized(140));
    app.dispatch(AppEvent::SidebarDismissed);
    app.navigate("theming").unwrap();
    assert!(app.sidebar_visible());
}

#[test]
fn test_toc_selection_scrolls_to_anchor() {
    let code = CodeHighlighter::new();
    let mut app = app();
    app.navigate("theming").unwrap();
    app.layout(80, &code);

    app.dispatch(AppEvent::TocSelected(1));
    assert_eq!(app.toc_index, 1);
    app.layout(80, &code);

    let line = app.rendered().anchor_line(&app.toc[1].anchor).unwrap();
    assert_eq!(app.scroll, line.saturating_sub(app.config.toc_clearance));
}

#[test]
fn test_copy_code_reports_success_only() {
    let code = CodeHighlighter::new();
    let clipboard = FakeClipboard::default();
    let copied = Rc::clone(&clipboard.copied);
    let mut app = app().with_clipboard(Box::new(clipboard));
    app.navigate("theming").unwrap();
    app.layout(80, &code);

    app.dispatch(AppEvent::CopyRequested);
    assert_eq!(*copied.borrow(), vec!["vellum --theme dark".to_string()]);
    assert_eq!(app.message.as_ref().map(|(m, _)| m.as_str()), Some("Copied"));

    let mut failing = app_with_failing_clipboard();
    failing.navigate("theming").unwrap();
    failing.layout(80, &code);
    failing.dispatch(AppEvent::CopyRequested);
    assert!(failing.message.is_none());
}

fn app_with_failing_clipboard() -> AppState {
    app().with_clipboard(Box::new(FakeClipboard {
        fail: true,
        ..FakeClipboard::default()
    }))
}

#[test]
fn test_history_back_and_forward() {
    let mut app = app();
    app.navigate("introduction").unwrap();
    app.navigate("theming").unwrap();

    app.dispatch(AppEvent::HistoryBack);
    assert_eq!(app.nav.current_section_id, "introduction");
    app.dispatch(AppEvent::HistoryBack);
    assert_eq!(app.nav.current_section_id, "home");
    app.dispatch(AppEvent::HistoryBack);
    assert_eq!(app.nav.current_section_id, "home");

    app.dispatch(AppEvent::HistoryForward);
    assert_eq!(app.nav.current_section_id, "introduction");
    app.dispatch(AppEvent::HistoryForward);
    assert_eq!(app.nav.current_section_id, "theming");
}

#[test]
fn test_location_change_navigates() {
    let mut app = app();
    app.dispatch(AppEvent::LocationChanged(Location::parse("#deployment")));
    assert_eq!(app.nav.current_section_id, "deployment");

    app.dispatch(AppEvent::LocationChanged(Location::default()));
    assert_eq!(app.nav.current_section_id, "introduction");
}

#[test]
fn test_scroll_is_clamped_to_content() {
    let code = CodeHighlighter::new();
    let mut app = app();
    app.navigate("theming").unwrap();
    app.layout(80, &code);

    app.dispatch(AppEvent::Scrolled(-5));
    assert_eq!(app.scroll, 0);
    app.dispatch(AppEvent::Scrolled(isize::MAX));
    assert_eq!(app.scroll, app.rendered().lines.len() - 1);
}

#[test]
fn test_messages_expire() {
    let mut app = app();
    app.dispatch(AppEvent::NavigateRequested("missing".to_string()));
    assert!(app.message.is_some());
    app.dispatch(AppEvent::Tick(Instant::now() + Duration::from_secs(10)));
    assert!(app.message.is_none());
}

#[test]
fn test_flash_sets_an_expiring_message() {
    let mut app = app();
    let before = Instant::now();
    app.flash("Unknown command: zap".to_string());

    let (text, until) = app.message.clone().unwrap();
    assert_eq!(text, "Unknown command: zap");
    assert!(until >= before + super::MESSAGE_TTL);
}
