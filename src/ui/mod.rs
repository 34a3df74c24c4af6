//! Frame composition
//!
//! Pure projection of app state onto a ratatui frame: tab bar sized to half
//! the terminal width, a content window continuing the tab bar's bottom
//! border, a preview pane on the right, and a one-line help footer. Nothing
//! in here mutates dashboard state except the list viewport offset, which
//! depends on the pane height only known at draw time.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::border;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;
pub mod widgets;

use crate::app::{App, FocusMode, FocusedWidget, StatusLevel};
use crate::infrastructure::cloudrun::ResourceKind;
use crate::registry::ContentSource;

// 69 for chrome, 241 for help text.
const HIGHLIGHT: Color = Color::Magenta;
const CHROME: Color = Color::Indexed(69);
const HELP: Color = Color::Indexed(241);

pub fn draw(f: &mut Frame, app: &mut App) {
    let areas = layout::areas(f.size());

    match app.focus {
        FocusMode::TabBrowsing => draw_tab_view(f, areas.content, app),
        FocusMode::FocusedWidget => draw_focused_view(f, areas.content, app),
    }

    draw_status_line(f, areas.status_line, app);
    draw_footer(f, areas.footer, app);
}

/// Tab bar plus active-tab content window on the left, preview pane on the
/// right.
fn draw_tab_view(f: &mut Frame, area: Rect, app: &mut App) {
    let tab_count = app.registry.len() as u16;
    if tab_count == 0 || area.height < 5 || area.width < 12 {
        return;
    }

    // Half the terminal, divided evenly by tab count, remainder floored.
    let per_tab = ((area.width / 2) / tab_count).max(4);
    let row_width = per_tab * tab_count;

    for (i, title) in app.registry.titles().enumerate() {
        let cell = Rect {
            x: area.x + i as u16 * per_tab,
            y: area.y,
            width: per_tab,
            height: 3,
        };
        let is_first = i == 0;
        let is_last = i + 1 == app.registry.len();
        let is_active = i == app.active_tab;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(tab_border(is_first, is_last, is_active))
            .border_style(Style::default().fg(HIGHLIGHT));
        let label = if is_active {
            Line::styled(title, Style::default().add_modifier(Modifier::BOLD))
        } else {
            Line::raw(title)
        };
        let tab = Paragraph::new(label).alignment(Alignment::Center).block(block);
        f.render_widget(tab, cell);
    }

    // The window's top border is the tab bar's bottom border, so it is
    // suppressed here; one extra column closes the right edge.
    let window = Rect {
        x: area.x,
        y: area.y + 3,
        width: (row_width + 1).min(area.width),
        height: area.height - 3,
    };
    let block = Block::default()
        .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
        .border_style(Style::default().fg(HIGHLIGHT));
    let inner = block.inner(window);
    f.render_widget(block, window);

    match app.registry.content_for(app.active_tab).clone() {
        ContentSource::StaticText(text) => {
            let paragraph = Paragraph::new(text).wrap(Wrap { trim: true });
            f.render_widget(paragraph, inner);
        }
        ContentSource::ResourceList(kind) => {
            draw_resource_list(f, inner, app, kind);
        }
    }

    // Preview pane: roughly half the remaining width, fixed margin.
    let preview_x = area.x + row_width + 2;
    let preview_width = (area.width / 2)
        .saturating_sub(15)
        .min(area.width.saturating_sub(row_width + 2));
    if preview_width >= 3 {
        let preview = Rect {
            x: preview_x,
            y: area.y,
            width: preview_width,
            height: area.height,
        };
        let paragraph = Paragraph::new(app.registry.preview_for(app.active_tab))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(CHROME)),
            );
        f.render_widget(paragraph, preview);
    }
}

/// Corner glyphs depend on three independent booleans; middle tabs keep the
/// default rounded set. The active tab's bottom edge stays open so the
/// window below visually continues it.
fn tab_border(is_first: bool, is_last: bool, is_active: bool) -> border::Set {
    let mut set = border::ROUNDED;
    if is_active {
        set.bottom_left = "┘";
        set.horizontal_bottom = " ";
        set.bottom_right = "└";
    } else {
        set.bottom_left = "┴";
        set.bottom_right = "┴";
    }
    if is_first {
        set.bottom_left = if is_active { "│" } else { "├" };
    }
    if is_last {
        set.bottom_right = if is_active { "│" } else { "┤" };
    }
    set
}

fn draw_resource_list(f: &mut Frame, area: Rect, app: &mut App, kind: ResourceKind) {
    if area.height < 2 {
        return;
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let stale = app.list(kind).stale;
    let title = if stale {
        format!("{} (stale)", kind.title())
    } else {
        kind.title().to_string()
    };
    let title = Paragraph::new(Line::styled(
        title,
        Style::default().fg(CHROME).add_modifier(Modifier::BOLD),
    ));
    f.render_widget(title, chunks[0]);

    let list_area = chunks[1];
    let list = app.list_mut(kind);
    list.ensure_visible(list_area.height as usize);

    let items: Vec<ListItem> = list
        .items
        .iter()
        .enumerate()
        .map(|(i, name)| ListItem::new(format!("{}. {}", i + 1, name)))
        .collect();
    let selected = if list.items.is_empty() {
        None
    } else {
        Some(list.selected)
    };
    let offset = list.offset;

    let mut state = ListState::default().with_selected(selected);
    *state.offset_mut() = offset;
    let widget = List::new(items)
        .highlight_symbol("> ")
        .highlight_style(Style::default().fg(Color::Indexed(170)));
    f.render_stateful_widget(widget, list_area, &mut state);
}

/// Focused-widget mode: timer and spinner side by side, the focused one
/// with a highlighted border.
fn draw_focused_view(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let panes = [
        (FocusedWidget::Timer, format!("{:>4}", app.timer.view())),
        (FocusedWidget::Spinner, app.spinner.view().to_string()),
    ];
    for ((widget, content), chunk) in panes.into_iter().zip(chunks.iter()) {
        let focused = app.focused_widget == widget;
        let border_style = if focused {
            Style::default().fg(HIGHLIGHT)
        } else {
            Style::default().fg(CHROME)
        };
        let paragraph = Paragraph::new(content)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(widget.name()),
            );
        f.render_widget(paragraph, *chunk);
    }
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let Some(status) = app.status.as_ref() else {
        return;
    };
    let color = match status.level {
        StatusLevel::Info => Color::Cyan,
        StatusLevel::Warn => Color::Yellow,
    };
    let paragraph = Paragraph::new(Line::styled(
        status.text.clone(),
        Style::default().fg(color),
    ));
    f.render_widget(paragraph, area);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let text = match app.focus {
        FocusMode::TabBrowsing => format!(
            "←/→ h/l: tab • ↑/↓ k/j: select • r: refresh • tab: focus {} • q: exit",
            app.focused_widget.name()
        ),
        FocusMode::FocusedWidget => match app.focused_widget {
            FocusedWidget::Spinner => format!(
                "tab: back • n: new spinner ({}) • q: exit",
                app.spinner.variant_name()
            ),
            FocusedWidget::Timer => "tab: back • n: new timer • q: exit".to_string(),
        },
    };
    let paragraph = Paragraph::new(Line::styled(text, Style::default().fg(HELP)));
    f.render_widget(paragraph, area);
}
