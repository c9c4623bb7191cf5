//! Ratatui console for the recruiting agents.
//!
//! Four tabs over one event loop: Candidates, Postings, Outreach, Activity.
//! Agent calls run on worker threads and come back as [`AppEvent`]s; failures
//! land in the Activity feed instead of a blocking alert.

pub mod event;
pub mod screens;
pub mod theme;

use crate::config::AppConfig;
use agentdeck_bridge::AgentBridge;
use agentdeck_types::record::AgentLog;
use chrono::{DateTime, Local};
use event::AppEvent;
use screens::{activity, candidates, outreach, postings};
use std::sync::mpsc;
use std::time::Duration;
use tracing::info;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

// ─── Core types ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Candidates,
    Postings,
    Outreach,
    Activity,
}

const TABS: &[Tab] = &[Tab::Candidates, Tab::Postings, Tab::Outreach, Tab::Activity];

impl Tab {
    fn label(self) -> &'static str {
        match self {
            Tab::Candidates => "Candidates",
            Tab::Postings => "Postings",
            Tab::Outreach => "Outreach",
            Tab::Activity => "Activity",
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
    screening_agent: String,
    posting_agent: String,
    outreach_agent: String,
    /// Wall clock shown in the tab bar, refreshed once a minute.
    now: DateTime<Local>,

    // Screen states
    candidates: candidates::CandidatesState,
    postings: postings::PostingsState,
    outreach: outreach::OutreachState,
    activity: activity::ActivityState,
}

// ─── App construction ────────────────────────────────────────────────────────

impl App {
    fn new(config: &AppConfig, event_tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            active_tab: Tab::Candidates,
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
            screening_agent: config.screening.clone(),
            posting_agent: config.posting.clone(),
            outreach_agent: config.outreach.clone(),
            now: Local::now(),
            candidates: candidates::CandidatesState::new(),
            postings: postings::PostingsState::new(),
            outreach: outreach::OutreachState::new(),
            activity: activity::ActivityState::new(),
        }
    }

    // ─── Event dispatch ──────────────────────────────────────────────────────

    fn handle_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => self.handle_tick(),
            AppEvent::ClockTick => self.now = Local::now(),
            AppEvent::ScreeningDone {
                name,
                email,
                role,
                review,
            } => {
                self.candidates.screening = false;
                self.candidates.status_msg.clear();
                self.activity.push(AgentLog::info(
                    "Screening Agent",
                    format!(
                        "Scored {name}: {:.1} ({})",
                        review.score,
                        review.verdict.label()
                    ),
                ));
                self.candidates
                    .push_candidate(event::candidate_from_review(name, email, role, *review));
                info!("Resume screening finished");
            }
            AppEvent::ScreeningFailed { name, error } => {
                self.candidates.screening = false;
                self.candidates.status_msg = format!("Screening failed for {name}.");
                self.activity.push(AgentLog::error(
                    "Screening Agent",
                    format!("Screening {name} failed: {error}"),
                ));
            }
            AppEvent::PostingOptimized { id, review } => {
                if let Some(title) = self.postings.mark_optimized(&id, &review) {
                    self.activity
                        .push(AgentLog::info("Posting Agent", format!("Optimized '{title}'.")));
                }
            }
            AppEvent::OptimizeFailed { id, error } => {
                self.postings.status_msg.clear();
                let subject = self.postings.title_of(&id).unwrap_or(id);
                self.activity.push(AgentLog::error(
                    "Posting Agent",
                    format!("Optimize failed for '{subject}': {error}"),
                ));
            }
            AppEvent::BroadcastDone { id, report } => {
                self.postings.status_msg.clear();
                if let Some(title) = self.postings.mark_broadcast(&id, &report) {
                    let message = if report.channels.is_empty() {
                        if report.confirmation.trim().is_empty() {
                            format!("Broadcast '{title}'.")
                        } else {
                            report.confirmation.clone()
                        }
                    } else {
                        format!("'{title}' live on {}.", report.channels.join(", "))
                    };
                    self.activity.push(AgentLog::info("Posting Agent", message));
                    info!("Posting broadcast finished");
                }
            }
            AppEvent::BroadcastFailed { id, error } => {
                // The optimize leg already landed; the posting stays
                // Optimized and the feed shows both entries.
                self.postings.status_msg.clear();
                let subject = self.postings.title_of(&id).unwrap_or(id);
                self.activity.push(AgentLog::error(
                    "Posting Agent",
                    format!("Broadcast failed for '{subject}': {error}"),
                ));
            }
            AppEvent::OutreachReply(text) => {
                self.outreach.push_reply(text);
                self.activity
                    .push(AgentLog::info("Outreach Agent", "Replied in the engagement feed."));
            }
            AppEvent::OutreachFailed(error) => {
                self.outreach.waiting = false;
                self.outreach.status_msg = "Send failed. See Activity.".to_string();
                self.activity.push(AgentLog::error("Outreach Agent", error));
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
            // Fallback: Alt+1-4 for direct jump
            if key.modifiers.contains(KeyModifiers::ALT) {
                let jump = match key.code {
                    KeyCode::Char('1') => Some(Tab::Candidates),
                    KeyCode::Char('2') => Some(Tab::Postings),
                    KeyCode::Char('3') => Some(Tab::Outreach),
                    KeyCode::Char('4') => Some(Tab::Activity),
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
            Tab::Candidates => {
                let action = self.candidates.handle_key(key);
                self.handle_candidates_action(action);
            }
            Tab::Postings => {
                let action = self.postings.handle_key(key);
                self.handle_postings_action(action);
            }
            Tab::Outreach => {
                let action = self.outreach.handle_key(key);
                self.handle_outreach_action(action);
            }
            Tab::Activity => self.activity.handle_key(key),
        }
    }

    fn handle_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        // Auto-reset Ctrl+C pending after ~2s (40 ticks at 50ms)
        if self.ctrl_c_pending && self.tick_count.wrapping_sub(self.ctrl_c_tick) > 40 {
            self.ctrl_c_pending = false;
        }
        self.candidates.tick();
        self.postings.tick();
        self.outreach.tick();
        self.activity.tick();
    }

    fn modal_open(&self) -> bool {
        self.candidates.show_form || self.postings.show_form
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
    }

    // ─── Tab action handlers ─────────────────────────────────────────────────

    fn handle_candidates_action(&mut self, action: candidates::CandidatesAction) {
        match action {
            candidates::CandidatesAction::Continue => {}
            candidates::CandidatesAction::Screen {
                name,
                email,
                role,
                resume,
            } => {
                let prompt = format!(
                    "Score this resume for the {role} role on a 0-100 scale. Candidate: {name} \
                     ({email}). Resume text: {resume}. Reply with JSON fields score, verdict \
                     (Reject, Review or Schedule), skills and reasoning."
                );
                self.activity.push(AgentLog::info(
                    "Screening Agent",
                    format!("Screening resume for {name}..."),
                ));
                event::spawn_screen_resume(
                    self.bridge.clone(),
                    self.screening_agent.clone(),
                    prompt,
                    name,
                    email,
                    role,
                    self.event_tx.clone(),
                );
            }
            candidates::CandidatesAction::Compose { name, role } => {
                // Jump straight into the engagement feed with the chip set
                self.outreach.set_target(name, role);
                self.switch_tab(Tab::Outreach);
            }
        }
    }

    fn handle_postings_action(&mut self, action: postings::PostingsAction) {
        match action {
            postings::PostingsAction::Continue => {}
            postings::PostingsAction::Publish {
                id,
                title,
                body,
                location,
                salary,
            } => {
                let mut prompt =
                    format!("Optimize this job posting for reach and clarity. Title: {title}.");
                if !location.is_empty() {
                    prompt.push_str(&format!(" Location: {location}."));
                }
                if !salary.is_empty() {
                    prompt.push_str(&format!(" Salary range: {salary}."));
                }
                prompt.push_str(&format!(
                    " Description: {body}. Reply with JSON fields optimized_title, \
                     optimized_body and improvements."
                ));
                self.activity.push(AgentLog::info(
                    "Posting Agent",
                    format!("Optimizing '{title}'..."),
                ));
                event::spawn_publish_posting(
                    self.bridge.clone(),
                    self.posting_agent.clone(),
                    id,
                    title,
                    body,
                    prompt,
                    self.event_tx.clone(),
                );
            }
        }
    }

    fn handle_outreach_action(&mut self, action: outreach::OutreachAction) {
        match action {
            outreach::OutreachAction::Continue => {}
            outreach::OutreachAction::Send(text) => {
                self.outreach.waiting = true;
                self.outreach.status_msg.clear();
                let prompt = outreach_prompt(self.outreach.target.as_ref(), &text);
                event::spawn_send_outreach(
                    self.bridge.clone(),
                    self.outreach_agent.clone(),
                    prompt,
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
            Tab::Candidates => candidates::draw(frame, chunks[1], &mut self.candidates),
            Tab::Postings => postings::draw(frame, chunks[1], &mut self.postings),
            Tab::Outreach => outreach::draw(frame, chunks[1], &mut self.outreach),
            Tab::Activity => activity::draw(frame, chunks[1], &mut self.activity),
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

/// The target chip travels to the agent as prompt context; the transcript
/// keeps only what was typed.
fn outreach_prompt(target: Option<&(String, String)>, text: &str) -> String {
    match target {
        Some((name, role)) => format!("Regarding candidate {name} ({role}): {text}"),
        None => text.to_string(),
    }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

/// Entry point for the recruiting console.
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

#[cfg(test)]
mod tests {
    use super::*;
    use agentdeck_types::agent::{PostingReview, ResumeReview};
    use agentdeck_types::record::{JobPosting, LogSeverity, PostingStatus, Verdict};
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    // The port is closed, so any call a test accidentally triggers fails
    // fast inside its worker thread.
    fn test_app() -> (App, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let config = AppConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            user_id: "recruiter@agentdeck.in".to_string(),
            api_key: None,
            screening: "screen".to_string(),
            posting: "post".to_string(),
            outreach: "reach".to_string(),
        };
        (App::new(&config, tx), rx)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn seeded_posting(app: &mut App) -> String {
        let posting = JobPosting::draft("Backend Engineer", "Own the pipeline.", "Mumbai", "");
        let id = posting.id.clone();
        app.postings.postings.push(posting);
        id
    }

    #[test]
    fn test_tab_cycle_wraps() {
        let (mut app, _rx) = test_app();
        assert!(matches!(app.active_tab, Tab::Candidates));
        for expected in [Tab::Postings, Tab::Outreach, Tab::Activity, Tab::Candidates] {
            app.next_tab();
            assert!(app.active_tab == expected);
        }
        app.prev_tab();
        assert!(matches!(app.active_tab, Tab::Activity));
    }

    #[test]
    fn test_screening_done_prepends_candidate_and_logs() {
        let (mut app, _rx) = test_app();
        app.candidates.screening = true;

        let review = ResumeReview {
            score: 91.0,
            verdict: Verdict::Schedule,
            skills: vec!["Rust".to_string()],
            reasoning: "Strong fit.".to_string(),
        };
        app.handle_event(AppEvent::ScreeningDone {
            name: "Asha Patel".to_string(),
            email: "asha@example.com".to_string(),
            role: "Backend Engineer".to_string(),
            review: Box::new(review),
        });

        assert!(!app.candidates.screening);
        assert_eq!(app.candidates.candidates[0].name, "Asha Patel");
        assert_eq!(app.candidates.candidates[0].score, 91.0);
        let log = &app.activity.logs[0];
        assert_eq!(log.severity, LogSeverity::Info);
        assert!(log.message.contains("Scored Asha Patel"));
    }

    #[test]
    fn test_screening_failure_logs_error() {
        let (mut app, _rx) = test_app();
        app.candidates.screening = true;

        app.handle_event(AppEvent::ScreeningFailed {
            name: "Asha Patel".to_string(),
            error: "no route to host".to_string(),
        });

        assert!(!app.candidates.screening);
        assert!(app.candidates.candidates.is_empty());
        let log = &app.activity.logs[0];
        assert_eq!(log.severity, LogSeverity::Error);
        assert!(log.message.contains("no route to host"));
    }

    #[test]
    fn test_optimize_failure_leaves_posting_draft() {
        let (mut app, _rx) = test_app();
        let id = seeded_posting(&mut app);

        app.handle_event(AppEvent::OptimizeFailed {
            id,
            error: "agent timed out".to_string(),
        });

        assert_eq!(app.postings.postings[0].status, PostingStatus::Draft);
        assert_eq!(app.activity.logs[0].severity, LogSeverity::Error);
    }

    #[test]
    fn test_broadcast_failure_leaves_posting_optimized() {
        let (mut app, _rx) = test_app();
        let id = seeded_posting(&mut app);

        let review = PostingReview {
            optimized_title: "Senior Backend Engineer".to_string(),
            optimized_body: "Own a high-volume pipeline.".to_string(),
            improvements: vec!["Sharper title".to_string()],
        };
        app.handle_event(AppEvent::PostingOptimized {
            id: id.clone(),
            review: Box::new(review),
        });
        app.handle_event(AppEvent::BroadcastFailed {
            id,
            error: "channel push rejected".to_string(),
        });

        let posting = &app.postings.postings[0];
        assert_eq!(posting.status, PostingStatus::Optimized);
        assert!(posting.optimized_copy.is_some());
        // Both legs are in the feed: the optimize info and the broadcast error
        assert_eq!(app.activity.logs[0].severity, LogSeverity::Error);
        assert!(app.activity.logs[0].message.contains("Broadcast failed"));
        assert_eq!(app.activity.logs[1].severity, LogSeverity::Info);
        assert!(app.activity.logs[1].message.contains("Optimized"));
    }

    #[test]
    fn test_broadcast_done_records_channels_and_logs() {
        let (mut app, _rx) = test_app();
        let id = seeded_posting(&mut app);
        app.handle_event(AppEvent::PostingOptimized {
            id: id.clone(),
            review: Box::new(PostingReview::default()),
        });

        let report = agentdeck_types::agent::BroadcastReport {
            channels: vec!["LinkedIn".to_string(), "Referrals".to_string()],
            confirmation: String::new(),
        };
        app.handle_event(AppEvent::BroadcastDone {
            id,
            report: Box::new(report),
        });

        let posting = &app.postings.postings[0];
        assert_eq!(posting.status, PostingStatus::Broadcast);
        assert_eq!(posting.channels, vec!["LinkedIn", "Referrals"]);
        assert!(app.activity.logs[0].message.contains("live on LinkedIn, Referrals"));
    }

    #[test]
    fn test_compose_key_targets_outreach() {
        let (mut app, _rx) = test_app();
        app.candidates.push_candidate(agentdeck_types::record::Candidate::new(
            "Asha Patel",
            "asha@example.com",
            "Backend Engineer",
            91.0,
            Verdict::Schedule,
            Vec::new(),
            "",
        ));

        app.handle_key(press(KeyCode::Char('o')));
        assert!(matches!(app.active_tab, Tab::Outreach));
        assert_eq!(
            app.outreach.target,
            Some(("Asha Patel".to_string(), "Backend Engineer".to_string()))
        );
    }

    #[test]
    fn test_outreach_prompt_wraps_target() {
        let target = Some(("Asha Patel".to_string(), "Backend Engineer".to_string()));
        assert_eq!(
            outreach_prompt(target.as_ref(), "Invite her to the loop"),
            "Regarding candidate Asha Patel (Backend Engineer): Invite her to the loop"
        );
        assert_eq!(outreach_prompt(None, "General sourcing tips?"), "General sourcing tips?");
    }

    #[test]
    fn test_outreach_failure_lands_in_activity() {
        let (mut app, _rx) = test_app();
        app.outreach.waiting = true;

        app.handle_event(AppEvent::OutreachFailed("connection refused".to_string()));
        assert!(!app.outreach.waiting);
        let log = &app.activity.logs[0];
        assert_eq!(log.severity, LogSeverity::Error);
        assert_eq!(log.agent, "Outreach Agent");
    }

    #[test]
    fn test_tab_key_cycles_fields_inside_forms() {
        let (mut app, _rx) = test_app();
        app.handle_key(press(KeyCode::Char('a')));
        assert!(app.candidates.show_form);

        app.handle_key(press(KeyCode::Tab));
        assert!(matches!(app.active_tab, Tab::Candidates));
        assert_eq!(app.candidates.form_field, 1);
    }

    #[test]
    fn test_double_ctrl_c_quits() {
        let (mut app, _rx) = test_app();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        app.handle_key(ctrl_c);
        assert!(app.ctrl_c_pending);
        assert!(!app.should_quit);

        // Any other key cancels the pending quit
        app.handle_key(press(KeyCode::Char('x')));
        assert!(!app.ctrl_c_pending);

        app.handle_key(ctrl_c);
        app.handle_key(ctrl_c);
        assert!(app.should_quit);
    }
}
