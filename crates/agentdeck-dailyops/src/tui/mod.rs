//! Ratatui console for the daily-ops coordinator.
//!
//! Five tabs over one event loop: Today, Schedule, Wellness, Wallet, Chat.
//! Agent calls run on worker threads and come back as [`AppEvent`]s.

pub mod event;
pub mod screens;
pub mod theme;

use crate::config::{AppConfig, CAMPUS_LOCATION, FIRST_LECTURE_TIME, HOME_LOCATION};
use agentdeck_bridge::AgentBridge;
use chrono::{DateTime, Local};
use event::AppEvent;
use screens::{chat, schedule, today, wallet, wellness};
use std::sync::mpsc;
use std::time::Duration;
use tracing::info;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

// ─── Core types ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Today,
    Schedule,
    Wellness,
    Wallet,
    Chat,
}

const TABS: &[Tab] = &[
    Tab::Today,
    Tab::Schedule,
    Tab::Wellness,
    Tab::Wallet,
    Tab::Chat,
];

impl Tab {
    fn label(self) -> &'static str {
        match self {
            Tab::Today => "Today",
            Tab::Schedule => "Schedule",
            Tab::Wellness => "Wellness",
            Tab::Wallet => "Wallet",
            Tab::Chat => "Chat",
        }
    }

    fn index(self) -> usize {
        TABS.iter().position(|&t| t == self).unwrap_or(0)
    }
}

struct App {
    active_tab: Tab,
    should_quit: bool,
    event_tx: mpsc::Sender<AppEvent>,
    /// Double Ctrl+C quit: true after first Ctrl+C press.
    ctrl_c_pending: bool,
    /// Tick counter when first Ctrl+C was pressed (auto-resets after ~2s).
    ctrl_c_tick: usize,
    /// Global tick counter for Ctrl+C timeout tracking.
    tick_count: usize,

    bridge: AgentBridge,
    coordinator: String,
    /// Wall clock shown in the tab bar, refreshed once a minute.
    now: DateTime<Local>,
    /// Blocking notice. Swallows every key until dismissed.
    alert: Option<String>,

    // Screen states
    today: today::TodayState,
    schedule: schedule::ScheduleState,
    wellness: wellness::WellnessState,
    wallet: wallet::WalletState,
    chat: chat::ChatState,
}

// ─── App construction ────────────────────────────────────────────────────────

impl App {
    fn new(config: &AppConfig, event_tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            active_tab: Tab::Today,
            should_quit: false,
            event_tx,
            ctrl_c_pending: false,
            ctrl_c_tick: 0,
            tick_count: 0,
            bridge: AgentBridge::new(
                config.endpoint.clone(),
                config.user_id.clone(),
                config.api_key.clone(),
            ),
            coordinator: config.coordinator.clone(),
            now: Local::now(),
            alert: None,
            today: today::TodayState::new(),
            schedule: schedule::ScheduleState::new(),
            wellness: wellness::WellnessState::new(),
            wallet: wallet::WalletState::new(),
            chat: chat::ChatState::new(),
        }
    }

    // ─── Event dispatch ──────────────────────────────────────────────────────

    fn handle_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => self.handle_tick(),
            AppEvent::ClockTick => self.now = Local::now(),
            AppEvent::BriefingLoaded(briefing) => {
                // The wellness tab mirrors the coordinator's score
                self.wellness.agent_score = Some(briefing.wellness_alerts.wellness_score);
                self.today.briefing = Some(*briefing);
                self.today.loading = false;
                self.today.status_msg.clear();
                info!("Morning briefing loaded");
            }
            AppEvent::BriefingFailed(err) => {
                self.today.loading = false;
                self.today.status_msg = err;
            }
            AppEvent::ChatReply(text) => self.chat.push_reply(text),
            AppEvent::ChatFailed(err) => {
                self.chat.waiting = false;
                self.chat.status_msg = err;
            }
            AppEvent::RidesLoaded(rides) => {
                self.wallet.searching = false;
                self.wallet.rides = rides;
                if !self.wallet.rides.is_empty() {
                    self.wallet.ride_list_state.select(Some(0));
                    self.wallet.ride_field = 2;
                }
            }
            AppEvent::TrainLoaded(status) => {
                self.today.train = Some(status);
                self.today.train_loading = false;
                self.today.status_msg.clear();
            }
            AppEvent::TrainFailed(err) => {
                self.today.train_loading = false;
                self.today.status_msg = err;
            }
            AppEvent::IndicatorReply(text) => {
                self.today.indicator_loading = false;
                self.chat.push_reply(text);
                self.switch_tab(Tab::Chat);
            }
            AppEvent::IndicatorFailed(err) => {
                self.today.indicator_loading = false;
                self.today.status_msg = err;
            }
        }
    }

    fn handle_key(&mut self, key: ratatui::crossterm::event::KeyEvent) {
        use ratatui::crossterm::event::{KeyCode, KeyModifiers};

        // ── Global: Double Ctrl+C to quit ───────────────────────────────────
        let is_ctrl_c =
            key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if is_ctrl_c {
            if self.ctrl_c_pending {
                self.should_quit = true;
                return;
            }
            self.ctrl_c_pending = true;
            self.ctrl_c_tick = self.tick_count;
            // First press only shows the "press again" hint in the tab bar
            return;
        }
        // Any other key clears the pending Ctrl+C state
        self.ctrl_c_pending = false;

        // ── Global: Ctrl+Q quit ─────────────────────────────────────────────
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // A blocking alert eats everything until dismissed
        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return;
        }

        // Tab switching stays out of the way of open forms, where Tab
        // cycles fields instead
        if !self.modal_open() {
            if key.code == KeyCode::Tab && key.modifiers.is_empty() {
                self.next_tab();
                return;
            }
            if key.code == KeyCode::BackTab {
                self.prev_tab();
                return;
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match key.code {
                    KeyCode::Left => {
                        self.prev_tab();
                        return;
                    }
                    KeyCode::Right => {
                        self.next_tab();
                        return;
                    }
                    _ => {}
                }
            }
            // Fallback: Alt+1-5 for direct jump
            if key.modifiers.contains(KeyModifiers::ALT) {
                let jump = match key.code {
                    KeyCode::Char('1') => Some(Tab::Today),
                    KeyCode::Char('2') => Some(Tab::Schedule),
                    KeyCode::Char('3') => Some(Tab::Wellness),
                    KeyCode::Char('4') => Some(Tab::Wallet),
                    KeyCode::Char('5') => Some(Tab::Chat),
                    _ => None,
                };
                if let Some(tab) = jump {
                    self.switch_tab(tab);
                    return;
                }
            }
        }

        // ── Route to screen handler ─────────────────────────────────────────
        match self.active_tab {
            Tab::Today => {
                let action = self.today.handle_key(key);
                self.handle_today_action(action);
            }
            Tab::Schedule => self.schedule.handle_key(key),
            Tab::Wellness => self.wellness.handle_key(key),
            Tab::Wallet => {
                let action = self.wallet.handle_key(key);
                self.handle_wallet_action(action);
            }
            Tab::Chat => {
                let action = self.chat.handle_key(key);
                self.handle_chat_action(action);
            }
        }
    }

    fn handle_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        // Auto-reset Ctrl+C pending after ~2s (40 ticks at 50ms)
        if self.ctrl_c_pending && self.tick_count.wrapping_sub(self.ctrl_c_tick) > 40 {
            self.ctrl_c_pending = false;
        }
        self.today.tick();
        self.schedule.tick();
        self.wellness.tick();
        self.wallet.tick();
        self.chat.tick();
    }

    fn modal_open(&self) -> bool {
        self.alert.is_some()
            || self.schedule.show_event_modal
            || self.schedule.show_subject_modal
            || self.wallet.show_topup_modal
            || self.wallet.show_ride_modal
    }

    // ─── Tab navigation ──────────────────────────────────────────────────────

    fn next_tab(&mut self) {
        let idx = self.active_tab.index();
        self.switch_tab(TABS[(idx + 1) % TABS.len()]);
    }

    fn prev_tab(&mut self) {
        let idx = self.active_tab.index();
        let prev = if idx == 0 { TABS.len() - 1 } else { idx - 1 };
        self.switch_tab(TABS[prev]);
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.on_tab_enter(tab);
    }

    /// Called when a tab becomes active. Loads data if needed.
    fn on_tab_enter(&mut self, tab: Tab) {
        if tab == Tab::Today && self.today.briefing.is_none() && !self.today.loading {
            self.refresh_briefing();
        }
    }

    // ─── Agent call helpers ──────────────────────────────────────────────────

    fn refresh_briefing(&mut self) {
        if self.today.loading {
            return;
        }
        self.today.loading = true;
        self.today.status_msg.clear();
        let prompt = format!(
            "I have a {FIRST_LECTURE_TIME} lecture at {CAMPUS_LOCATION}. What should I do now? \
             I'm currently at {HOME_LOCATION}."
        );
        event::spawn_fetch_briefing(
            self.bridge.clone(),
            self.coordinator.clone(),
            prompt,
            self.event_tx.clone(),
        );
    }

    fn track_train(&mut self) {
        if self.today.train_loading {
            return;
        }
        self.today.train_loading = true;
        let prompt = format!(
            "Track the next Western Line local train from {HOME_LOCATION} to {CAMPUS_LOCATION}. \
             Provide real-time location, current station, next station, ETA, and any delays. \
             Format as live tracking data."
        );
        event::spawn_track_train(
            self.bridge.clone(),
            self.coordinator.clone(),
            prompt,
            self.event_tx.clone(),
        );
    }

    fn check_indicator(&mut self) {
        if self.today.indicator_loading {
            return;
        }
        self.today.indicator_loading = true;
        let prompt = format!(
            "Check current Mumbai local train status from {HOME_LOCATION} to {CAMPUS_LOCATION}. \
             Use M Indicator app data if available, or search for real-time Western Line train \
             timings."
        );
        event::spawn_indicator_check(
            self.bridge.clone(),
            self.coordinator.clone(),
            prompt,
            self.event_tx.clone(),
        );
    }

    // ─── Tab action handlers ─────────────────────────────────────────────────

    fn handle_today_action(&mut self, action: today::TodayAction) {
        match action {
            today::TodayAction::Continue => {}
            today::TodayAction::Refresh => self.refresh_briefing(),
            today::TodayAction::TrackTrain => self.track_train(),
            today::TodayAction::CheckIndicator => self.check_indicator(),
            today::TodayAction::BookRide => {
                // Jump straight into the wallet's booking form
                self.switch_tab(Tab::Wallet);
                self.wallet.open_ride_modal();
            }
        }
    }

    fn handle_wallet_action(&mut self, action: wallet::WalletAction) {
        match action {
            wallet::WalletAction::Continue => {}
            wallet::WalletAction::SearchRides => {
                event::spawn_search_rides(self.event_tx.clone());
            }
            wallet::WalletAction::Alert(msg) => self.alert = Some(msg),
        }
    }

    fn handle_chat_action(&mut self, action: chat::ChatAction) {
        match action {
            chat::ChatAction::Continue => {}
            chat::ChatAction::Send(text) => {
                self.chat.waiting = true;
                event::spawn_send_chat(
                    self.bridge.clone(),
                    self.coordinator.clone(),
                    text,
                    self.event_tx.clone(),
                );
            }
        }
    }

    // ─── Drawing ─────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        let chunks = Layout::vertical([
            Constraint::Length(1), // tab bar
            Constraint::Min(1),    // content
        ])
        .split(area);

        self.draw_tab_bar(frame, chunks[0]);

        match self.active_tab {
            Tab::Today => today::draw(frame, chunks[1], &mut self.today),
            Tab::Schedule => schedule::draw(frame, chunks[1], &mut self.schedule),
            Tab::Wellness => wellness::draw(frame, chunks[1], &mut self.wellness),
            Tab::Wallet => wallet::draw(frame, chunks[1], &mut self.wallet),
            Tab::Chat => chat::draw(frame, chunks[1], &mut self.chat),
        }

        if let Some(msg) = self.alert.clone() {
            draw_alert(frame, area, &msg);
        }
    }

    fn draw_tab_bar(&self, frame: &mut ratatui::Frame, area: Rect) {
        let width = area.width as usize;

        let mut spans: Vec<Span> = vec![Span::raw(" ")];
        for &tab in TABS {
            let label = format!(" {} ", tab.label());
            if tab == self.active_tab {
                spans.push(Span::styled(label, theme::tab_active()));
            } else {
                spans.push(Span::styled(label, theme::tab_inactive()));
            }
            spans.push(Span::raw(" "));
        }

        // Right-aligned clock and quit hint (yellow warning when Ctrl+C pending)
        let hint = if self.ctrl_c_pending {
            "Press Ctrl+C again to quit".to_string()
        } else {
            format!("{}  Ctrl+C×2 quit  Tab switch", self.now.format("%a %H:%M"))
        };
        let hint_style = if self.ctrl_c_pending {
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(ratatui::style::Modifier::BOLD)
        } else {
            theme::hint_style()
        };
        let spans_width: usize = spans.iter().map(|s| s.content.len()).sum();
        let padding = width.saturating_sub(spans_width + hint.len() + 1);
        if padding > 0 {
            spans.push(Span::raw(" ".repeat(padding)));
            spans.push(Span::styled(hint, hint_style));
        }

        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_CARD));
        frame.render_widget(bar, area);
    }
}

/// Blocking notice rendered over whatever tab is active.
fn draw_alert(frame: &mut ratatui::Frame, area: Rect, msg: &str) {
    let modal = centered_rect(50, 7, area);
    frame.render_widget(Clear, modal);

    let block = Block::default()
        .title(Span::styled(" Notice ", theme::title_style()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::YELLOW))
        .padding(Padding::uniform(1));
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let rows = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(inner);
    frame.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(theme::TEXT))
            .wrap(Wrap { trim: true }),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled("[Enter] dismiss", theme::hint_style())),
        rows[1],
    );
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(height),
        Constraint::Min(0),
    ])
    .split(area);
    let horizontal = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(vertical[1]);
    horizontal[1]
}

// ─── Entry point ─────────────────────────────────────────────────────────────

/// Entry point for the daily-ops console.
pub fn run(config: AppConfig) {
    // Panic hook: always restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        original_hook(info);
    }));

    let mut terminal = ratatui::init();

    // 50ms tick drives the spinners; the clock thread wakes once a minute
    let (tx, rx) = event::spawn_event_thread(Duration::from_millis(50));
    event::spawn_clock_thread(tx.clone());
    let mut app = App::new(&config, tx);

    // The morning briefing starts loading before the first keypress
    app.refresh_briefing();

    // ── Main loop ────────────────────────────────────────────────────────────
    // Draw first, then block on events. This ensures the first frame appears
    // immediately, before any event processing.
    while !app.should_quit {
        terminal
            .draw(|frame| app.draw(frame))
            .expect("Failed to draw");

        // Block until at least one event arrives (or 33ms timeout for ~30fps)
        match rx.recv_timeout(Duration::from_millis(33)) {
            Ok(ev) => app.handle_event(ev),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
        // Drain all queued events immediately (batch processing)
        while let Ok(ev) = rx.try_recv() {
            app.handle_event(ev);
        }
    }

    ratatui::restore();
}
