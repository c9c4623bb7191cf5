//! Wellness screen: hydration and meal tracking plus timed reminders.

use crate::tui::theme;
use agentdeck_types::record::{HydrationReminder, Priority};
use chrono::NaiveTime;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph};
use ratatui::Frame;

/// Energy levels cycled with `e`.
pub const ENERGY_LEVELS: &[&str] = &["Low", "Okay", "Good", "Great"];

/// How far a snooze pushes a reminder.
const SNOOZE_MINUTES: i64 = 30;

pub struct WellnessState {
    pub water_glasses: u32,
    pub water_goal: u32,
    pub meals_logged: u32,
    pub energy_level: usize,
    pub reminders: Vec<HydrationReminder>,
    pub reminder_list_state: ListState,
    /// Wellness score from the latest briefing, when one has arrived.
    pub agent_score: Option<f64>,
    pub tick: usize,
    pub status_msg: String,
}

impl WellnessState {
    pub fn new() -> Self {
        let mut reminder_list_state = ListState::default();
        reminder_list_state.select(Some(0));
        Self {
            water_glasses: 4,
            water_goal: 8,
            meals_logged: 2,
            energy_level: energy_index("Good"),
            reminders: vec![
                HydrationReminder::new(
                    at(10, 30),
                    "Lecture session start; ensure hydration for optimal focus.",
                    Priority::Medium,
                ),
                HydrationReminder::new(
                    at(12, 0),
                    "Midway through lectures; prevent fatigue and maintain alertness.",
                    Priority::High,
                ),
            ],
            reminder_list_state,
            agent_score: None,
            tick: 0,
            status_msg: String::new(),
        }
    }

    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }

        match key.code {
            KeyCode::Char('w') => self.log_water(),
            KeyCode::Char('m') => self.log_meal(),
            KeyCode::Char('e') => {
                self.energy_level = (self.energy_level + 1) % ENERGY_LEVELS.len();
            }
            KeyCode::Char('s') => self.snooze_selected(),
            KeyCode::Char('d') => self.dismiss_selected(),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            _ => {}
        }
    }

    pub fn log_water(&mut self) {
        self.water_glasses = self.water_glasses.saturating_add(1);
        self.status_msg = format!(
            "Logged a glass of water ({}/{}).",
            self.water_glasses, self.water_goal
        );
    }

    pub fn log_meal(&mut self) {
        self.meals_logged = self.meals_logged.saturating_add(1);
        self.status_msg = format!("Logged a meal ({} today).", self.meals_logged);
    }

    /// Pushes the selected reminder 30 minutes later. Wraps past midnight.
    pub fn snooze_selected(&mut self) {
        let Some(idx) = self.reminder_list_state.selected() else {
            return;
        };
        if let Some(reminder) = self.reminders.get_mut(idx) {
            reminder.time += chrono::Duration::minutes(SNOOZE_MINUTES);
            self.status_msg = format!("Snoozed until {}.", reminder.time.format("%H:%M"));
        }
    }

    /// Removes the selected reminder. Dismissing on an empty list is a no-op.
    pub fn dismiss_selected(&mut self) {
        let Some(idx) = self.reminder_list_state.selected() else {
            return;
        };
        if idx < self.reminders.len() {
            let removed = self.reminders.remove(idx);
            self.status_msg = format!("Dismissed the {} reminder.", removed.time.format("%H:%M"));
        }
        if self.reminders.is_empty() {
            self.reminder_list_state.select(None);
        } else {
            self.reminder_list_state
                .select(Some(idx.min(self.reminders.len() - 1)));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.reminders.is_empty() {
            return;
        }
        let i = self.reminder_list_state.selected().unwrap_or(0) as isize;
        let next = (i + delta).rem_euclid(self.reminders.len() as isize) as usize;
        self.reminder_list_state.select(Some(next));
    }
}

fn at(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap_or_default()
}

fn energy_index(label: &str) -> usize {
    ENERGY_LEVELS.iter().position(|l| *l == label).unwrap_or(0)
}

// ── Drawing ─────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, area: Rect, state: &mut WellnessState) {
    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(area);
    let columns =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).split(chunks[0]);

    draw_trackers(f, columns[0], state);
    draw_reminders(f, columns[1], state);

    let hint = if state.status_msg.is_empty() {
        "[w] water  [m] meal  [e] energy  [s] snooze  [d] dismiss  [j/k] move".to_string()
    } else {
        format!("{}  [w] water  [m] meal", state.status_msg)
    };
    f.render_widget(Paragraph::new(hint).style(theme::hint_style()), chunks[1]);
}

fn draw_trackers(f: &mut Frame, area: Rect, state: &WellnessState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Today's Trackers ", theme::title_style()))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled("Water", theme::dim_style())),
        rows[0],
    );
    let ratio = f64::from(state.water_glasses.min(state.water_goal))
        / f64::from(state.water_goal.max(1));
    f.render_widget(
        Gauge::default()
            .ratio(ratio)
            .gauge_style(Style::default().fg(theme::CYAN).bg(theme::BG_CARD))
            .label(format!("{}/{} glasses", state.water_glasses, state.water_goal)),
        rows[1],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Meals logged  ", theme::dim_style()),
            Span::styled(
                state.meals_logged.to_string(),
                Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
            ),
        ])),
        rows[2],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Energy        ", theme::dim_style()),
            Span::styled(
                ENERGY_LEVELS[state.energy_level % ENERGY_LEVELS.len()],
                Style::default().fg(theme::GREEN),
            ),
        ])),
        rows[3],
    );
    let score_line = match state.agent_score {
        Some(score) => Line::from(vec![
            Span::styled("Agent score   ", theme::dim_style()),
            Span::styled(format!("{score:.0}/100"), Style::default().fg(theme::ACCENT)),
        ]),
        None => Line::from(Span::styled(
            "Agent score   waiting for the briefing",
            theme::dim_style(),
        )),
    };
    f.render_widget(Paragraph::new(score_line), rows[4]);
}

fn draw_reminders(f: &mut Frame, area: Rect, state: &mut WellnessState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Hydration Reminders ", theme::title_style()));

    if state.reminders.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new("All reminders handled.").style(theme::dim_style()),
            inner,
        );
        return;
    }

    let items: Vec<ListItem> = state
        .reminders
        .iter()
        .map(|r| {
            let urgency_style = match r.urgency {
                Priority::High => Style::default().fg(theme::RED),
                Priority::Medium => Style::default().fg(theme::YELLOW),
                Priority::Low => Style::default().fg(theme::GREEN),
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", r.time.format("%H:%M")),
                    Style::default().fg(theme::CYAN),
                ),
                Span::styled(format!("[{}] ", r.urgency.label()), urgency_style),
                Span::styled(r.reason.clone(), Style::default().fg(theme::TEXT)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::selected_style());
    f.render_stateful_widget(list, area, &mut state.reminder_list_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_seeded_trackers() {
        let state = WellnessState::new();
        assert_eq!(state.water_glasses, 4);
        assert_eq!(state.water_goal, 8);
        assert_eq!(state.meals_logged, 2);
        assert_eq!(ENERGY_LEVELS[state.energy_level], "Good");
        assert_eq!(state.reminders.len(), 2);
    }

    #[test]
    fn test_water_and_meal_logging() {
        let mut state = WellnessState::new();
        state.handle_key(press(KeyCode::Char('w')));
        state.handle_key(press(KeyCode::Char('w')));
        state.handle_key(press(KeyCode::Char('m')));
        assert_eq!(state.water_glasses, 6);
        assert_eq!(state.meals_logged, 3);
    }

    #[test]
    fn test_snooze_pushes_reminder_30_minutes() {
        let mut state = WellnessState::new();
        state.reminder_list_state.select(Some(0));
        state.snooze_selected();
        assert_eq!(state.reminders[0].time, at(11, 0));
        state.snooze_selected();
        assert_eq!(state.reminders[0].time, at(11, 30));
    }

    #[test]
    fn test_dismiss_removes_and_is_safe_on_empty() {
        let mut state = WellnessState::new();
        state.reminder_list_state.select(Some(0));
        state.dismiss_selected();
        assert_eq!(state.reminders.len(), 1);
        state.dismiss_selected();
        assert!(state.reminders.is_empty());
        assert!(state.reminder_list_state.selected().is_none());

        // Nothing left to dismiss
        state.dismiss_selected();
        assert!(state.reminders.is_empty());
    }

    #[test]
    fn test_energy_cycles() {
        let mut state = WellnessState::new();
        let start = state.energy_level;
        for _ in 0..ENERGY_LEVELS.len() {
            state.handle_key(press(KeyCode::Char('e')));
        }
        assert_eq!(state.energy_level, start);
    }
}
