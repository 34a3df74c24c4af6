//! Structural rendering checks on a headless backend.
//!
//! Glyphs and colors are presentation details, so these assert structure:
//! the frame always renders, tab titles are present, the active tab is
//! highlighted, and identical state produces identical output.

use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::style::Modifier;
use ratatui::Terminal;

use grun::app::{App, DashboardEvent, ListNav};
use grun::config::Config;
use grun::infrastructure::cloudrun::ResourceKind;
use grun::registry::TabRegistry;
use grun::ui;

const WIDTH: u16 = 80;
const HEIGHT: u16 = 24;

fn dashboard() -> App {
    App::new(TabRegistry::cloud_run("Project: demo".into()), Config::default())
}

fn render(app: &mut App) -> Buffer {
    let backend = TestBackend::new(WIDTH, HEIGHT);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| ui::draw(f, app)).unwrap();
    terminal.backend().buffer().clone()
}

fn rows(buffer: &Buffer) -> Vec<String> {
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer.get(x, y).symbol())
                .collect::<String>()
        })
        .collect()
}

fn flat(buffer: &Buffer) -> String {
    rows(buffer).join("\n")
}

#[test]
fn rendering_is_deterministic() {
    let mut app = dashboard();
    app.apply_resources(ResourceKind::Services, vec!["svc-a".into(), "svc-b".into()]);
    app.handle_event(DashboardEvent::ListNavigate(ListNav::Down));

    let first = render(&mut app);
    let second = render(&mut app);
    assert_eq!(first, second);
}

#[test]
fn frame_has_tab_bar_content_and_footer() {
    let mut app = dashboard();
    app.apply_resources(ResourceKind::Services, vec!["svc-a".into(), "svc-b".into()]);

    let buffer = render(&mut app);
    let rows = rows(&buffer);
    assert_eq!(rows.len(), HEIGHT as usize);

    let text = rows.join("\n");
    for title in ["Services", "Jobs", "Info"] {
        assert!(text.contains(title), "missing tab title {title}");
    }
    assert!(text.contains("1. svc-a"));
    assert!(text.contains("2. svc-b"));
    // Footer names the bindings.
    assert!(rows[HEIGHT as usize - 1].contains("q: exit"));
}

#[test]
fn active_tab_label_is_highlighted() {
    let mut app = dashboard();
    let buffer = render(&mut app);

    // The active tab label sits in the second row of the tab bar and is
    // rendered bold; inactive labels are not.
    let label_row = 1u16;
    let bold_cells = (0..WIDTH)
        .filter(|&x| {
            let cell = buffer.get(x, label_row);
            cell.modifier.contains(Modifier::BOLD) && cell.symbol() != " "
        })
        .count();
    assert!(bold_cells > 0, "no highlighted tab label found");
}

#[test]
fn highlight_follows_the_active_tab() {
    let mut app = dashboard();
    let before = render(&mut app);
    app.handle_event(DashboardEvent::TabRight);
    let after = render(&mut app);
    assert_ne!(before, after);
}

#[test]
fn failed_fetch_still_renders_a_frame() {
    let mut app = dashboard();
    app.apply_fetch_error(ResourceKind::Services, "permission denied");

    let buffer = render(&mut app);
    let text = flat(&buffer);
    // The list pane is present (and marked stale) even with no items, and
    // the raw error only reaches the status line, never the pane.
    assert!(text.contains("Cloud Run Services (stale)"));
    assert!(text.contains("Listing services failed"));
}

#[test]
fn preview_pane_tracks_the_active_tab() {
    let mut app = dashboard();
    // Lowercase fragments match the preview text, not the pane titles.
    let services = flat(&render(&mut app));
    assert!(services.contains("Cloud Run services"));

    app.handle_event(DashboardEvent::TabRight);
    let jobs = flat(&render(&mut app));
    assert!(jobs.contains("Cloud Run jobs"));
}

#[test]
fn focused_mode_shows_both_widget_panes() {
    let mut app = dashboard();
    app.handle_event(DashboardEvent::ToggleFocus);

    let text = flat(&render(&mut app));
    assert!(text.contains("timer"));
    assert!(text.contains("spinner"));
    // Tab content is replaced entirely in focused mode.
    assert!(!text.contains("Cloud Run Services"));
}

#[test]
fn static_info_tab_renders_its_text() {
    let mut app = dashboard();
    app.handle_event(DashboardEvent::TabRight);
    app.handle_event(DashboardEvent::TabRight);

    let text = flat(&render(&mut app));
    assert!(text.contains("Project: demo"));
}
