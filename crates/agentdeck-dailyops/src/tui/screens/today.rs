//! Today screen: morning briefing from the coordinator + live train panel.

use crate::tui::theme;
use agentdeck_types::agent::{Confidence, DailyBriefing};
use agentdeck_types::record::{TrainState, TrainStatus};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};
use ratatui::Frame;

// ── State ───────────────────────────────────────────────────────────────────

pub struct TodayState {
    pub briefing: Option<DailyBriefing>,
    pub loading: bool,
    pub train: Option<TrainStatus>,
    pub train_loading: bool,
    pub indicator_loading: bool,
    /// Expands the safety panel to show precautions and meeting points.
    pub show_safety: bool,
    pub tick: usize,
    pub status_msg: String,
}

pub enum TodayAction {
    Continue,
    /// Re-run the morning briefing.
    Refresh,
    /// Ask for a live position of the next local.
    TrackTrain,
    /// Pull an M-Indicator style line status into the chat feed.
    CheckIndicator,
    /// Jump to the wallet tab with the booking form open.
    BookRide,
}

impl TodayState {
    pub fn new() -> Self {
        Self {
            briefing: None,
            loading: false,
            train: None,
            train_loading: false,
            indicator_loading: false,
            show_safety: false,
            tick: 0,
            status_msg: String::new(),
        }
    }

    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> TodayAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return TodayAction::Continue;
        }

        match key.code {
            KeyCode::Char('r') if !self.loading => return TodayAction::Refresh,
            KeyCode::Char('t') if !self.train_loading => return TodayAction::TrackTrain,
            KeyCode::Char('m') if !self.indicator_loading => return TodayAction::CheckIndicator,
            KeyCode::Char('b') => return TodayAction::BookRide,
            KeyCode::Char('s') => self.show_safety = !self.show_safety,
            _ => {}
        }
        TodayAction::Continue
    }
}

// ── Rendering ───────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, area: Rect, state: &mut TodayState) {
    let chunks = Layout::vertical([
        Constraint::Length(7),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(area);

    draw_recommendation(f, chunks[0], state);

    let columns =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).split(chunks[1]);

    let left = Layout::vertical([Constraint::Min(0), Constraint::Length(8)]).split(columns[0]);
    draw_transport(f, left[0], state);
    draw_schedule_overview(f, left[1], state);

    let safety_height = if state.show_safety { 11 } else { 5 };
    let right = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(safety_height),
        Constraint::Length(7),
    ])
    .split(columns[1]);
    draw_wellness_alerts(f, right[0], state);
    draw_safety(f, right[1], state);
    draw_train(f, right[2], state);

    let hint = if state.status_msg.is_empty() {
        "[r] refresh briefing  [t] track train  [m] m-indicator  [b] book ride  [s] safety detail".to_string()
    } else {
        format!("{}  [r] retry", state.status_msg)
    };
    f.render_widget(Paragraph::new(hint).style(theme::hint_style()), chunks[2]);
}

fn draw_recommendation(f: &mut Frame, area: Rect, state: &TodayState) {
    let title = if state.loading {
        let frame = theme::SPINNER_FRAMES[state.tick % theme::SPINNER_FRAMES.len()];
        format!(" {frame} Recommendation ")
    } else {
        " Recommendation ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, theme::title_style()))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(b) = &state.briefing else {
        let text = if state.loading {
            "Asking the coordinator for today's plan..."
        } else {
            "No briefing yet. Press [r] to ask the coordinator."
        };
        f.render_widget(Paragraph::new(text).style(theme::dim_style()), inner);
        return;
    };

    let rec = &b.unified_recommendation;
    let lines = vec![
        Line::from(Span::styled(
            rec.summary.clone(),
            Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Do now: ", theme::dim_style()),
            Span::styled(rec.primary_action.clone(), Style::default().fg(theme::ACCENT)),
        ]),
        Line::from(Span::styled(rec.reasoning.clone(), theme::dim_style())),
        Line::from(vec![
            Span::styled("Confidence: ", theme::dim_style()),
            Span::styled(rec.confidence_level.label(), confidence_style(rec.confidence_level)),
            Span::styled(
                format!("  (overall {:.0}%)", b.overall_confidence_score),
                theme::dim_style(),
            ),
        ]),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn draw_transport(f: &mut Frame, area: Rect, state: &TodayState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Transport ", theme::title_style()))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(b) = &state.briefing else {
        f.render_widget(Paragraph::new("No plan yet.").style(theme::dim_style()), inner);
        return;
    };

    let plan = &b.transport_plan;
    let mut lines = vec![
        Line::from(Span::styled(
            plan.recommended_route.clone(),
            Style::default().fg(theme::TEXT),
        )),
        Line::from(vec![
            Span::styled("Mode ", theme::dim_style()),
            Span::styled(plan.mode.clone(), Style::default().fg(theme::CYAN)),
            Span::styled("  Depart ", theme::dim_style()),
            Span::styled(plan.departure_time.clone(), Style::default().fg(theme::TEXT)),
            Span::styled("  ETA ", theme::dim_style()),
            Span::styled(plan.eta.clone(), Style::default().fg(theme::TEXT)),
        ]),
        Line::from(vec![
            Span::styled("Cost ", theme::dim_style()),
            Span::styled(format!("₹{:.0}", plan.cost), Style::default().fg(theme::GREEN)),
            Span::styled("  Safety ", theme::dim_style()),
            Span::styled(plan.safety_level.clone(), Style::default().fg(theme::TEXT)),
        ]),
    ];
    if !plan.alternatives.is_empty() {
        lines.push(Line::from(Span::styled("Alternatives:", theme::dim_style())));
        for alt in &plan.alternatives {
            lines.push(Line::from(format!("  • {alt}")));
        }
    }
    if !b.conflicts_and_tradeoffs.is_empty() {
        lines.push(Line::from(Span::styled("Trade-offs:", theme::dim_style())));
        for t in &b.conflicts_and_tradeoffs {
            lines.push(Line::from(vec![
                Span::styled(format!("  {} ", t.conflict_type), Style::default().fg(theme::YELLOW)),
                Span::styled(format!("chose {}", t.chosen_option), Style::default().fg(theme::TEXT)),
            ]));
            if !t.rationale.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", t.rationale),
                    theme::dim_style(),
                )));
            }
        }
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_schedule_overview(f: &mut Frame, area: Rect, state: &TodayState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Schedule ", theme::title_style()))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(b) = &state.briefing else {
        f.render_widget(
            Paragraph::new("Coordinator view of the day appears here.").style(theme::dim_style()),
            inner,
        );
        return;
    };

    let overview = &b.schedule_overview;
    let mut lines: Vec<Line> = overview
        .next_events
        .iter()
        .map(|e| Line::from(format!("• {e}")))
        .collect();
    if !overview.buffer_status.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Buffers: ", theme::dim_style()),
            Span::styled(overview.buffer_status.clone(), Style::default().fg(theme::TEXT)),
        ]));
    }
    for resolved in &overview.conflicts_resolved {
        lines.push(Line::from(Span::styled(
            format!("Resolved: {resolved}"),
            Style::default().fg(theme::GREEN),
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled("Nothing scheduled.", theme::dim_style())));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn draw_wellness_alerts(f: &mut Frame, area: Rect, state: &TodayState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Wellness ", theme::title_style()))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(b) = &state.briefing else {
        f.render_widget(
            Paragraph::new("Hydration and meal nudges appear here.").style(theme::dim_style()),
            inner,
        );
        return;
    };

    let alerts = &b.wellness_alerts;
    let mut lines = vec![Line::from(vec![
        Span::styled("Score ", theme::dim_style()),
        Span::styled(
            format!("{:.0}/100", alerts.wellness_score),
            Style::default().fg(score_color(alerts.wellness_score)),
        ),
    ])];
    for action in &alerts.immediate_actions {
        lines.push(Line::from(vec![
            Span::styled("! ", Style::default().fg(theme::YELLOW)),
            Span::styled(action.clone(), Style::default().fg(theme::TEXT)),
        ]));
    }
    for reminder in &alerts.scheduled_reminders {
        lines.push(Line::from(Span::styled(format!("  {reminder}"), theme::dim_style())));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn draw_safety(f: &mut Frame, area: Rect, state: &TodayState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Safety & Social ", theme::title_style()))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(b) = &state.briefing else {
        f.render_widget(Paragraph::new("No notes yet.").style(theme::dim_style()), inner);
        return;
    };

    let safety = &b.safety_notes;
    let social = &b.social_opportunities;
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Safety ", theme::dim_style()),
            Span::styled(safety.overall_safety.clone(), Style::default().fg(theme::TEXT)),
            Span::styled(
                if safety.emergency_contacts_ready {
                    "  contacts ready"
                } else {
                    "  contacts not set"
                },
                theme::dim_style(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Group travel ", theme::dim_style()),
            Span::styled(
                if social.group_travel_available { "available" } else { "none" },
                Style::default().fg(if social.group_travel_available {
                    theme::GREEN
                } else {
                    theme::TEXT_TERTIARY
                }),
            ),
        ]),
    ];
    if state.show_safety {
        for p in &safety.key_precautions {
            lines.push(Line::from(format!("  • {p}")));
        }
        for m in &social.meeting_points {
            lines.push(Line::from(Span::styled(
                format!("  meet at {m}"),
                Style::default().fg(theme::CYAN),
            )));
        }
        if !social.coordination_notes.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  {}", social.coordination_notes),
                theme::dim_style(),
            )));
        }
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn draw_train(f: &mut Frame, area: Rect, state: &TodayState) {
    let title = if state.train_loading {
        let frame = theme::SPINNER_FRAMES[state.tick % theme::SPINNER_FRAMES.len()];
        format!(" {frame} Live Train ")
    } else {
        " Live Train ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, theme::title_style()))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(train) = &state.train else {
        f.render_widget(
            Paragraph::new("Press [t] to track the next local.").style(theme::dim_style()),
            inner,
        );
        return;
    };

    let lines = vec![
        Line::from(Span::styled(
            format!("{} {}", train.number, train.name),
            Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("At ", theme::dim_style()),
            Span::styled(train.current_location.clone(), Style::default().fg(theme::CYAN)),
            Span::styled("  next ", theme::dim_style()),
            Span::styled(train.next_station.clone(), Style::default().fg(theme::TEXT)),
        ]),
        Line::from(vec![
            Span::styled("ETA ", theme::dim_style()),
            Span::styled(train.estimated_arrival.clone(), Style::default().fg(theme::TEXT)),
            Span::styled(
                train
                    .platform
                    .as_ref()
                    .map(|p| format!("  platform {p}"))
                    .unwrap_or_default(),
                theme::dim_style(),
            ),
        ]),
        Line::from(train_state_span(train)),
    ];
    f.render_widget(Paragraph::new(lines), inner);
}

fn train_state_span(train: &TrainStatus) -> Span<'static> {
    match train.state {
        TrainState::OnTime => Span::styled("on time", Style::default().fg(theme::GREEN)),
        TrainState::Delayed => Span::styled(
            format!("delayed {} min", train.delay_minutes),
            Style::default().fg(theme::RED),
        ),
        TrainState::Approaching => {
            Span::styled("approaching", Style::default().fg(theme::YELLOW))
        }
    }
}

fn confidence_style(level: Confidence) -> Style {
    match level {
        Confidence::High => Style::default().fg(theme::GREEN),
        Confidence::Medium => Style::default().fg(theme::YELLOW),
        Confidence::Low => Style::default().fg(theme::RED),
        Confidence::Unknown => theme::dim_style(),
    }
}

fn score_color(score: f64) -> ratatui::style::Color {
    if score >= 75.0 {
        theme::GREEN
    } else if score >= 40.0 {
        theme::YELLOW
    } else {
        theme::RED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_refresh_blocked_while_loading() {
        let mut state = TodayState::new();
        assert!(matches!(state.handle_key(press(KeyCode::Char('r'))), TodayAction::Refresh));

        state.loading = true;
        assert!(matches!(state.handle_key(press(KeyCode::Char('r'))), TodayAction::Continue));
    }

    #[test]
    fn test_train_tracking_blocked_while_loading() {
        let mut state = TodayState::new();
        assert!(matches!(
            state.handle_key(press(KeyCode::Char('t'))),
            TodayAction::TrackTrain
        ));

        state.train_loading = true;
        assert!(matches!(state.handle_key(press(KeyCode::Char('t'))), TodayAction::Continue));
    }

    #[test]
    fn test_indicator_check_blocked_while_loading() {
        let mut state = TodayState::new();
        assert!(matches!(
            state.handle_key(press(KeyCode::Char('m'))),
            TodayAction::CheckIndicator
        ));

        state.indicator_loading = true;
        assert!(matches!(state.handle_key(press(KeyCode::Char('m'))), TodayAction::Continue));
    }

    #[test]
    fn test_safety_detail_toggles() {
        let mut state = TodayState::new();
        assert!(!state.show_safety);
        state.handle_key(press(KeyCode::Char('s')));
        assert!(state.show_safety);
        state.handle_key(press(KeyCode::Char('s')));
        assert!(!state.show_safety);
    }

    #[test]
    fn test_book_ride_shortcut() {
        let mut state = TodayState::new();
        assert!(matches!(state.handle_key(press(KeyCode::Char('b'))), TodayAction::BookRide));
    }
}
