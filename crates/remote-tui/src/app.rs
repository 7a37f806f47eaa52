//! App: the event loop that owns the stores and every component.
//!
//! - Terminal events arrive from a blocking reader task over an `mpsc` channel.
//! - Action results arrive as `StoreMessage`s on a second channel and are
//!   committed in arrival order.
//! - After every commit the App drains component subscriptions, so each
//!   component sees the state the event describes.
//! - Components return `Vec<Action>`; `dispatch` carries them out and keeps
//!   going until the cascade settles.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use remote_proto::config::Config;
use remote_proto::Gateway;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    bus::{ActionKind, EventBus, MutationKind},
    component::{deliver, Component},
    components::{main_view::MainView, playlist_panel::PlaylistPanel, sidenav::{self, SideNav}},
    focus::Focus,
    store::{Dispatcher, Store, StoreMessage},
    store::layout::{LayoutState, MainView as View},
    theme::C_BG,
    widgets::{
        status_bar::{draw_status_bar, InputMode},
        toast::ToastManager,
    },
};

/// Upper bound on actions handled for one input before the cascade is cut.
const MAX_CASCADE: usize = 64;

/// Where each pane was last drawn; zero-sized when hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaneAreas {
    pub sidenav: Rect,
    pub main: Rect,
    pub playlist: Rect,
}

fn playlist_width(total: u16, narrow: bool) -> u16 {
    let pct = if narrow { 60 } else { 35 };
    (total as u32 * pct / 100).max(24).min(total as u32) as u16
}

/// Split the body into side navigation, main view and playlist panel.
pub fn body_layout(area: Rect, layout: &LayoutState, narrow: bool) -> PaneAreas {
    let nav_w = if layout.navbar_open {
        sidenav::width(area.width, narrow)
    } else {
        0
    };
    let list_w = if layout.playlist_open {
        playlist_width(area.width, narrow).min(area.width - nav_w)
    } else {
        0
    };
    let main_w = area.width - nav_w - list_w;

    let column = |x: u16, width: u16| {
        if width == 0 {
            Rect::default()
        } else {
            Rect { x, width, ..area }
        }
    };
    PaneAreas {
        sidenav: column(area.x, nav_w),
        main: column(area.x + nav_w, main_w),
        playlist: column(area.x + nav_w + main_w, list_w),
    }
}

fn hit(r: Rect, col: u16, row: u16) -> bool {
    r.width > 0 && r.height > 0 && col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
}

pub struct App {
    config: Config,
    store: Store,
    dispatcher: Dispatcher,
    store_rx: Option<mpsc::Receiver<StoreMessage>>,
    focus: Focus,
    input_mode: InputMode,
    sidenav: SideNav,
    main_view: MainView,
    playlist_panel: PlaylistPanel,
    toast: ToastManager,
    areas: PaneAreas,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, gateway: Gateway) -> Self {
        let bus = EventBus::new();
        let (tx, rx) = mpsc::channel::<StoreMessage>(1024);
        let dispatcher = Dispatcher::new(gateway, bus.clone(), tx);
        let store = Store::new(AppState::new(config.ui.narrow_width), bus);
        let main_view = MainView::new(config.polling.status_interval(), &config.ui);
        let playlist_panel = PlaylistPanel::new(config.polling.playlist_interval());
        Self {
            config,
            store,
            dispatcher,
            store_rx: Some(rx),
            focus: Focus::new(),
            input_mode: InputMode::Normal,
            sidenav: SideNav::new(),
            main_view,
            playlist_panel,
            toast: ToastManager::new(),
            areas: PaneAreas::default(),
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut store_rx = self
            .store_rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("app loop already ran"))?;

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        let size = terminal.size()?;
        debug!("run(): terminal created, size={:?}", size);
        self.store.state_mut().width = size.width;

        let result = self.event_loop(&mut terminal, &mut store_rx).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        terminal.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        store_rx: &mut mpsc::Receiver<StoreMessage>,
    ) -> anyhow::Result<()> {
        let (event_tx, mut event_rx) = mpsc::channel::<Event>(1024);
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(ev).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("terminal event reader stopped: {}", e);
                    break;
                }
            }
        });

        self.mount();
        info!("remote for {} ready", self.config.player.base_url);

        // Seek bar interpolation and toast expiry.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            terminal.draw(|f| self.draw(f))?;
            if self.should_quit {
                break;
            }

            tokio::select! {
                ev = event_rx.recv() => match ev {
                    Some(ev) => self.handle_event(ev),
                    None => self.should_quit = true,
                },
                Some(msg) = store_rx.recv() => {
                    self.handle_store_message(msg);
                    // Commit whatever else already arrived before redrawing.
                    while let Ok(msg) = store_rx.try_recv() {
                        self.handle_store_message(msg);
                    }
                }
                _ = ui_tick.tick() => {
                    self.toast.tick();
                }
            }
        }
        info!("quitting");
        Ok(())
    }

    fn mount(&mut self) {
        let bus = self.store.bus().clone();
        self.sidenav.mount(&bus, &self.dispatcher);
        self.main_view.player.mount(&bus, &self.dispatcher);
        self.main_view.library.mount(&bus, &self.dispatcher);
        self.playlist_panel.mount(&bus, &self.dispatcher);
    }

    fn refresh(&mut self) {
        self.main_view.player.refresh(&self.dispatcher);
        self.playlist_panel.refresh(&self.dispatcher);
    }

    // ── Incoming messages ─────────────────────────────────────────────────────

    fn handle_event(&mut self, ev: Event) {
        let actions = match ev {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => vec![Action::Resize(w, h)],
            _ => vec![],
        };
        self.dispatch(actions);
    }

    fn handle_store_message(&mut self, msg: StoreMessage) {
        match msg {
            StoreMessage::Commit(mutation) => {
                if mutation.kind() == MutationKind::SetStatus {
                    self.store.state_mut().online = true;
                }
                self.store.commit(mutation);
                let actions = self.settle();
                self.dispatch(actions);
            }
            StoreMessage::Failed { action, error } => {
                if action == ActionKind::FetchStatus {
                    self.store.state_mut().online = false;
                }
                self.toast.error(format!("{}: {}", action.label(), error));
            }
        }
    }

    // ── Input routing ─────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![Action::Quit];
        }
        // Text entry owns the keyboard until it closes.
        if self.input_mode != InputMode::Normal {
            return self.focused_key(key);
        }

        let global = match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::BackTab => Some(Action::FocusPrev),
            KeyCode::Char('m') => Some(Action::ToggleNavbar),
            KeyCode::Char('p') => Some(Action::TogglePlaylist),
            KeyCode::Char('1') => Some(Action::SetPlayerView),
            KeyCode::Char('2') => Some(Action::SetLibraryView),
            KeyCode::Char('R') => Some(Action::Refresh),
            KeyCode::Esc if self.focus.is_focused(ComponentId::SideNav) => Some(Action::CloseNavbar),
            KeyCode::Esc => Some(Action::DismissPlaylist),
            _ => None,
        };
        if let Some(action) = global {
            return vec![action];
        }
        if let Some(action) = self.main_view.player.transport_key(key, self.store.state()) {
            return vec![action];
        }
        self.focused_key(key)
    }

    fn focused_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let state = self.store.state();
        match self.focus.current() {
            ComponentId::SideNav => self.sidenav.handle_key(key, state),
            ComponentId::MainView => self.main_view.handle_key(key, state),
            ComponentId::PlaylistPanel => self.playlist_panel.handle_key(key, state),
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_click = matches!(event.kind, MouseEventKind::Down(_));
        if !is_click && !matches!(event.kind, MouseEventKind::ScrollUp | MouseEventKind::ScrollDown) {
            return vec![];
        }
        let (col, row) = (event.column, event.row);
        let areas = self.areas;
        let state = self.store.state();

        if is_click && state.is_narrow() && state.layout.playlist_open && !hit(areas.playlist, col, row) {
            return vec![Action::DismissPlaylist];
        }

        let (component, area): (&mut dyn Component, Rect) = if hit(areas.sidenav, col, row) {
            (&mut self.sidenav as &mut dyn Component, areas.sidenav)
        } else if hit(areas.playlist, col, row) {
            (&mut self.playlist_panel as &mut dyn Component, areas.playlist)
        } else if hit(areas.main, col, row) {
            (&mut self.main_view as &mut dyn Component, areas.main)
        } else {
            return vec![];
        };

        let id = component.id();
        let mut actions = component.handle_mouse(event, area, state);
        if is_click && !self.focus.is_focused(id) {
            actions.insert(0, Action::FocusPane(id));
        }
        actions
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, actions: Vec<Action>) {
        let mut queue: VecDeque<Action> = actions.into();
        let mut handled = 0usize;
        while let Some(action) = queue.pop_front() {
            handled += 1;
            if handled > MAX_CASCADE {
                warn!("action cascade cut after {} steps at {:?}", MAX_CASCADE, action);
                break;
            }
            self.apply_action(action);
            queue.extend(self.settle());
        }
    }

    /// Deliver pending bus events to every component.
    fn settle(&mut self) -> Vec<Action> {
        let state = self.store.state();
        let mut out = Vec::new();
        out.extend(deliver(&mut self.sidenav, state));
        out.extend(deliver(&mut self.main_view.player, state));
        out.extend(deliver(&mut self.main_view.library, state));
        out.extend(deliver(&mut self.playlist_panel, state));
        out
    }

    fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        let before = self.pane_in_front();
        match action {
            // ── Status store ──────────────────────────────────────────────────
            Action::Play(id) => self.dispatcher.play(id),
            Action::Pause => self.dispatcher.pause(),
            Action::Stop => self.dispatcher.stop(),
            Action::Next => self.dispatcher.next(),
            Action::Previous => self.dispatcher.previous(),
            Action::ToggleRandom => self.dispatcher.toggle_random(),
            Action::ToggleRepeat => self.dispatcher.toggle_repeat(),
            Action::ToggleLoop => self.dispatcher.toggle_loop(),
            Action::SetVolume(level) => self.dispatcher.update_volume(level),
            Action::Seek(target) => self.dispatcher.seek(target),

            // ── Playlist store ────────────────────────────────────────────────
            Action::AddItem(uri) => self.dispatcher.add_item(uri),
            Action::RemoveItem(id) => self.dispatcher.remove_item(id),

            // ── Layout store ──────────────────────────────────────────────────
            Action::SetPlayerView => self.store.set_player_view(),
            Action::SetLibraryView => self.store.set_library_view(),
            Action::ToggleNavbar => {
                if self.store.state().layout.navbar_open {
                    self.store.close_navbar();
                } else {
                    self.store.open_navbar_gesture();
                }
            }
            Action::TogglePlaylist => {
                if self.store.state().layout.playlist_open {
                    self.store.close_playlist();
                } else {
                    self.store.open_playlist_gesture();
                }
            }
            Action::OpenPlaylist => self.store.open_playlist_gesture(),
            Action::CloseNavbar => self.store.close_navbar(),
            Action::DismissPlaylist => self.store.outside_playlist_gesture(),

            // ── Navigation ────────────────────────────────────────────────────
            Action::FocusNext => self.focus.next(&self.store.state().layout),
            Action::FocusPrev => self.focus.prev(&self.store.state().layout),
            Action::FocusPane(id) => self.focus.set(id, &self.store.state().layout),

            // ── Text entry ────────────────────────────────────────────────────
            Action::OpenFilter => self.input_mode = InputMode::Filter,
            Action::OpenPrompt => self.input_mode = InputMode::Prompt,
            Action::CloseInput => self.input_mode = InputMode::Normal,

            // ── System ────────────────────────────────────────────────────────
            Action::Refresh => {
                self.refresh();
                self.toast.info("refreshing");
            }
            Action::Notify(message) => self.toast.info(message),
            Action::Quit => self.should_quit = true,
            Action::Resize(width, _) => self.store.state_mut().width = width,
        }
        self.focus.revalidate(&self.store.state().layout);
        // Text entry belongs to the pane that opened it.
        if self.input_mode != InputMode::Normal && self.pane_in_front() != before {
            self.cancel_input();
        }
    }

    fn pane_in_front(&self) -> (ComponentId, View) {
        (self.focus.current(), self.store.state().layout.main_view)
    }

    fn cancel_input(&mut self) {
        let playlist = self.playlist_panel.cancel_input();
        let library = self.main_view.library.cancel_input();
        debug!(
            "cancel {:?} input (playlist: {}, library: {})",
            self.input_mode, playlist, library
        );
        self.input_mode = InputMode::Normal;
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let [body, status] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        let state = self.store.state();
        self.areas = body_layout(body, &state.layout, state.is_narrow());
        let areas = self.areas;

        if areas.sidenav.width > 0 {
            let focused = self.focus.is_focused(ComponentId::SideNav);
            self.sidenav.draw(frame, areas.sidenav, focused, state);
        }
        if areas.main.width > 0 {
            let focused = self.focus.is_focused(ComponentId::MainView);
            self.main_view.draw(frame, areas.main, focused, state);
        }
        if areas.playlist.width > 0 {
            let focused = self.focus.is_focused(ComponentId::PlaylistPanel);
            self.playlist_panel.draw(frame, areas.playlist, focused, state);
        }

        draw_status_bar(frame, status, self.input_mode, state.online, &self.config.player.base_url);
        self.toast.draw(frame, area);
    }
}
