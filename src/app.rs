//! Dashboard state and event reducer
//!
//! `App` is the single owner of all mutable dashboard state. Input and
//! animation ticks arrive as `DashboardEvent`s, are reduced one at a time,
//! and may produce follow-up `Effect`s (schedule a tick, re-run a fetch)
//! that the event loop carries out. Rendering only ever reads this state,
//! so every frame observes a fully applied transition.

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::infrastructure::cloudrun::ResourceKind;
use crate::registry::TabRegistry;
use crate::ui::widgets::{SpinnerState, TimerState, TIMER_TICK};

const STATUS_TTL: Duration = Duration::from_secs(4);

/// Whether input drives tab/list navigation or a focused sub-widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    TabBrowsing,
    FocusedWidget,
}

/// Which sub-widget receives `n` while in focused mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedWidget {
    Timer,
    Spinner,
}

impl FocusedWidget {
    pub fn name(&self) -> &'static str {
        match self {
            FocusedWidget::Timer => "timer",
            FocusedWidget::Spinner => "spinner",
        }
    }

    fn other(&self) -> Self {
        match self {
            FocusedWidget::Timer => FocusedWidget::Spinner,
            FocusedWidget::Spinner => FocusedWidget::Timer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListNav {
    Up,
    Down,
}

/// Animation tick origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSource {
    Timer,
    Spinner,
}

/// Every input the reducer understands. Anything else never reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    Quit,
    TabLeft,
    TabRight,
    ToggleFocus,
    NextVariant,
    ListNavigate(ListNav),
    Refresh,
    Tick(TickSource),
}

/// Follow-up work requested by a state transition. The reducer itself
/// performs no I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ScheduleTick(TickSource, Duration),
    FetchResources(ResourceKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

/// Selection state for one resource-backed tab
#[derive(Debug, Clone, Default)]
pub struct ResourceListState {
    pub items: Vec<String>,
    pub selected: usize,
    pub offset: usize,
    /// Set when the last fetch failed or timed out; cleared on success
    pub stale: bool,
}

impl ResourceListState {
    /// Replace the snapshot wholesale and reset the selection.
    pub fn replace(&mut self, items: Vec<String>) {
        self.items = items;
        self.selected = 0;
        self.offset = 0;
        self.stale = false;
    }

    fn navigate(&mut self, nav: ListNav) {
        match nav {
            ListNav::Up => self.selected = self.selected.saturating_sub(1),
            ListNav::Down => {
                if !self.items.is_empty() {
                    self.selected = (self.selected + 1).min(self.items.len() - 1);
                }
            }
        }
    }

    /// Keep the selection inside the visible window of `height` rows.
    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }
    }
}

pub struct App {
    pub registry: TabRegistry,
    pub active_tab: usize,
    pub focus: FocusMode,
    pub focused_widget: FocusedWidget,
    pub timer: TimerState,
    pub spinner: SpinnerState,
    pub services: ResourceListState,
    pub jobs: ResourceListState,
    pub config: Config,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
}

impl App {
    pub fn new(registry: TabRegistry, config: Config) -> Self {
        Self {
            registry,
            active_tab: 0,
            focus: FocusMode::TabBrowsing,
            focused_widget: FocusedWidget::Timer,
            timer: TimerState::default(),
            spinner: SpinnerState::new(),
            services: ResourceListState::default(),
            jobs: ResourceListState::default(),
            config,
            status: None,
            should_quit: false,
        }
    }

    /// Effects that start the animations; delivered once before the loop.
    pub fn init_effects(&self) -> Vec<Effect> {
        vec![
            Effect::ScheduleTick(TickSource::Timer, TIMER_TICK),
            Effect::ScheduleTick(TickSource::Spinner, self.spinner.interval()),
        ]
    }

    pub fn list(&self, kind: ResourceKind) -> &ResourceListState {
        match kind {
            ResourceKind::Services => &self.services,
            ResourceKind::Jobs => &self.jobs,
        }
    }

    pub fn list_mut(&mut self, kind: ResourceKind) -> &mut ResourceListState {
        match kind {
            ResourceKind::Services => &mut self.services,
            ResourceKind::Jobs => &mut self.jobs,
        }
    }

    /// Resource kind backing the active tab, if any.
    pub fn active_resource(&self) -> Option<ResourceKind> {
        self.registry.resource_kind(self.active_tab)
    }

    /// Reduce one event. Total over valid state: navigation saturates,
    /// meaningless events are no-ops, nothing here can fail.
    pub fn handle_event(&mut self, event: DashboardEvent) -> Vec<Effect> {
        match event {
            DashboardEvent::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            DashboardEvent::TabRight => {
                self.active_tab = (self.active_tab + 1).min(self.registry.len() - 1);
                Vec::new()
            }
            DashboardEvent::TabLeft => {
                self.active_tab = self.active_tab.saturating_sub(1);
                Vec::new()
            }
            DashboardEvent::ToggleFocus => {
                match self.focus {
                    FocusMode::TabBrowsing => self.focus = FocusMode::FocusedWidget,
                    FocusMode::FocusedWidget => {
                        self.focus = FocusMode::TabBrowsing;
                        // Alternate which widget gets focus next time so
                        // both stay reachable from the keyboard.
                        self.focused_widget = self.focused_widget.other();
                    }
                }
                Vec::new()
            }
            DashboardEvent::NextVariant => self.next_variant(),
            DashboardEvent::ListNavigate(nav) => {
                if self.focus == FocusMode::TabBrowsing {
                    if let Some(kind) = self.active_resource() {
                        self.list_mut(kind).navigate(nav);
                    }
                }
                Vec::new()
            }
            DashboardEvent::Refresh => self.refresh(),
            DashboardEvent::Tick(source) => self.tick(source),
        }
    }

    fn next_variant(&mut self) -> Vec<Effect> {
        if self.focus != FocusMode::FocusedWidget {
            return Vec::new();
        }
        self.spinner.next_variant();
        match self.focused_widget {
            FocusedWidget::Spinner => {
                self.spinner.reset();
                vec![Effect::ScheduleTick(
                    TickSource::Spinner,
                    self.spinner.interval(),
                )]
            }
            FocusedWidget::Timer => {
                self.timer.reset();
                vec![Effect::ScheduleTick(TickSource::Timer, TIMER_TICK)]
            }
        }
    }

    fn refresh(&mut self) -> Vec<Effect> {
        let Some(kind) = self.active_resource() else {
            return Vec::new();
        };
        self.set_status(format!("Refreshing {}…", kind.collection()), StatusLevel::Info);
        vec![Effect::FetchResources(kind)]
    }

    /// Route a tick to its widget. Both widgets keep animating while their
    /// own running flag is set, regardless of focus.
    fn tick(&mut self, source: TickSource) -> Vec<Effect> {
        match source {
            TickSource::Timer => {
                self.timer.advance();
                if self.timer.running() {
                    vec![Effect::ScheduleTick(TickSource::Timer, TIMER_TICK)]
                } else {
                    Vec::new()
                }
            }
            TickSource::Spinner => {
                self.spinner.advance();
                if self.spinner.running() {
                    vec![Effect::ScheduleTick(
                        TickSource::Spinner,
                        self.spinner.interval(),
                    )]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Apply a completed listing: wholesale replacement, selection reset.
    pub fn apply_resources(&mut self, kind: ResourceKind, names: Vec<String>) {
        let count = names.len();
        self.list_mut(kind).replace(names);
        self.set_status(
            format!("Loaded {count} {}", kind.collection()),
            StatusLevel::Info,
        );
    }

    /// A fetch failed. Existing items stay (possibly stale); the failure is
    /// surfaced on the status line only, never inline in a pane.
    pub fn apply_fetch_error(&mut self, kind: ResourceKind, message: &str) {
        self.list_mut(kind).stale = true;
        self.set_status(
            format!("Listing {} failed: {message}", kind.collection()),
            StatusLevel::Warn,
        );
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    /// Housekeeping run once per loop iteration.
    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::widgets::SPINNER_VARIANTS;

    fn app() -> App {
        App::new(TabRegistry::cloud_run("info".into()), Config::default())
    }

    #[test]
    fn tab_right_saturates_at_last_tab() {
        let mut app = app();
        for _ in 0..3 {
            app.handle_event(DashboardEvent::TabRight);
        }
        assert_eq!(app.active_tab, 2);
    }

    #[test]
    fn tab_left_saturates_at_first_tab() {
        let mut app = app();
        app.handle_event(DashboardEvent::TabLeft);
        app.handle_event(DashboardEvent::TabLeft);
        assert_eq!(app.active_tab, 0);
    }

    #[test]
    fn tab_index_stays_in_bounds_for_any_sequence() {
        let mut app = app();
        let moves = [
            DashboardEvent::TabRight,
            DashboardEvent::TabRight,
            DashboardEvent::TabLeft,
            DashboardEvent::TabRight,
            DashboardEvent::TabRight,
            DashboardEvent::TabRight,
            DashboardEvent::TabLeft,
            DashboardEvent::TabLeft,
            DashboardEvent::TabLeft,
            DashboardEvent::TabLeft,
        ];
        for event in moves {
            app.handle_event(event);
            assert!(app.active_tab < app.registry.len());
        }
    }

    #[test]
    fn list_navigation_saturates() {
        let mut app = app();
        app.apply_resources(
            ResourceKind::Services,
            vec!["svc-a".into(), "svc-b".into()],
        );
        for _ in 0..3 {
            app.handle_event(DashboardEvent::ListNavigate(ListNav::Down));
        }
        assert_eq!(app.services.selected, 1);
        for _ in 0..3 {
            app.handle_event(DashboardEvent::ListNavigate(ListNav::Up));
        }
        assert_eq!(app.services.selected, 0);
    }

    #[test]
    fn list_navigation_on_empty_list_stays_at_zero() {
        let mut app = app();
        app.handle_event(DashboardEvent::ListNavigate(ListNav::Down));
        app.handle_event(DashboardEvent::ListNavigate(ListNav::Up));
        assert_eq!(app.services.selected, 0);
    }

    #[test]
    fn list_navigation_ignored_on_static_tab() {
        let mut app = app();
        app.apply_resources(ResourceKind::Services, vec!["svc-a".into(), "svc-b".into()]);
        app.active_tab = 2;
        app.handle_event(DashboardEvent::ListNavigate(ListNav::Down));
        assert_eq!(app.services.selected, 0);
    }

    #[test]
    fn toggle_focus_is_an_involution_on_mode() {
        let mut app = app();
        let before = app.focus;
        app.handle_event(DashboardEvent::ToggleFocus);
        assert_eq!(app.focus, FocusMode::FocusedWidget);
        app.handle_event(DashboardEvent::ToggleFocus);
        assert_eq!(app.focus, before);
    }

    #[test]
    fn focus_entries_alternate_widgets() {
        let mut app = app();
        app.handle_event(DashboardEvent::ToggleFocus);
        assert_eq!(app.focused_widget, FocusedWidget::Timer);
        app.handle_event(DashboardEvent::ToggleFocus);
        app.handle_event(DashboardEvent::ToggleFocus);
        assert_eq!(app.focused_widget, FocusedWidget::Spinner);
    }

    #[test]
    fn next_variant_cycles_through_all_variants() {
        let mut app = app();
        // Enter focused mode so NextVariant is meaningful.
        app.handle_event(DashboardEvent::ToggleFocus);
        let start = app.spinner.variant_index();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..SPINNER_VARIANTS.len() {
            seen.insert(app.spinner.variant_index());
            app.handle_event(DashboardEvent::NextVariant);
        }
        assert_eq!(seen.len(), SPINNER_VARIANTS.len());
        assert_eq!(app.spinner.variant_index(), start);
    }

    #[test]
    fn next_variant_is_noop_while_browsing_tabs() {
        let mut app = app();
        let before = app.spinner.variant_index();
        let effects = app.handle_event(DashboardEvent::NextVariant);
        assert!(effects.is_empty());
        assert_eq!(app.spinner.variant_index(), before);
    }

    #[test]
    fn next_variant_resets_focused_widget() {
        let mut app = app();
        app.handle_event(DashboardEvent::ToggleFocus);
        assert_eq!(app.focused_widget, FocusedWidget::Timer);
        app.handle_event(DashboardEvent::Tick(TickSource::Timer));
        let effects = app.handle_event(DashboardEvent::NextVariant);
        assert_eq!(app.timer, TimerState::default());
        assert!(matches!(
            effects.as_slice(),
            [Effect::ScheduleTick(TickSource::Timer, _)]
        ));
    }

    #[test]
    fn ticks_advance_widgets_regardless_of_focus() {
        let mut app = app();
        assert_eq!(app.focus, FocusMode::TabBrowsing);
        let frame_before = app.spinner.view();
        let effects = app.handle_event(DashboardEvent::Tick(TickSource::Spinner));
        assert_ne!(app.spinner.view(), frame_before);
        assert!(matches!(
            effects.as_slice(),
            [Effect::ScheduleTick(TickSource::Spinner, _)]
        ));
    }

    #[test]
    fn timer_stops_rescheduling_at_zero() {
        let mut app = app();
        for _ in 0..59 {
            app.handle_event(DashboardEvent::Tick(TickSource::Timer));
        }
        let effects = app.handle_event(DashboardEvent::Tick(TickSource::Timer));
        assert!(effects.is_empty());
        assert!(!app.timer.running());
    }

    #[test]
    fn refresh_requests_fetch_for_active_resource_tab() {
        let mut app = app();
        let effects = app.handle_event(DashboardEvent::Refresh);
        assert_eq!(
            effects,
            vec![Effect::FetchResources(ResourceKind::Services)]
        );

        app.active_tab = 2;
        assert!(app.handle_event(DashboardEvent::Refresh).is_empty());
    }

    #[test]
    fn fetch_failure_degrades_to_stale_empty_list() {
        let mut app = app();
        app.apply_fetch_error(ResourceKind::Services, "permission denied");
        assert!(app.services.items.is_empty());
        assert_eq!(app.services.selected, 0);
        assert!(app.services.stale);
        assert!(matches!(
            app.status.as_ref().map(|s| s.level),
            Some(StatusLevel::Warn)
        ));
    }

    #[test]
    fn refresh_replaces_items_and_resets_selection() {
        let mut app = app();
        app.apply_resources(
            ResourceKind::Jobs,
            vec!["a".into(), "b".into(), "c".into()],
        );
        app.active_tab = 1;
        app.handle_event(DashboardEvent::ListNavigate(ListNav::Down));
        assert_eq!(app.jobs.selected, 1);
        app.apply_resources(ResourceKind::Jobs, vec!["x".into()]);
        assert_eq!(app.jobs.selected, 0);
        assert_eq!(app.jobs.items, vec!["x"]);
        assert!(!app.jobs.stale);
    }

    #[test]
    fn ensure_visible_scrolls_both_directions() {
        let mut list = ResourceListState::default();
        list.replace((0..20).map(|i| format!("svc-{i}")).collect());
        list.selected = 12;
        list.ensure_visible(5);
        assert_eq!(list.offset, 8);
        list.selected = 3;
        list.ensure_visible(5);
        assert_eq!(list.offset, 3);
    }
}
