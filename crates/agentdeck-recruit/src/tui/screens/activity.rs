//! Activity screen: everything the agents did, newest first.
//!
//! Every controller appends here, including failures, so the feed doubles
//! as the error surface for the whole console. Entries are never evicted.

use crate::tui::theme;
use agentdeck_types::record::{AgentLog, LogSeverity};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

pub struct ActivityState {
    /// Log lines, newest first, unbounded.
    pub logs: Vec<AgentLog>,
    pub list_state: ListState,
    /// `None` shows every severity.
    pub filter: Option<LogSeverity>,
    pub tick: usize,
}

impl ActivityState {
    pub fn new() -> Self {
        Self {
            logs: Vec::new(),
            list_state: ListState::default(),
            filter: None,
            tick: 0,
        }
    }

    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Prepend a log line.
    pub fn push(&mut self, log: AgentLog) {
        self.logs.insert(0, log);
    }

    /// Indices into `logs` that survive the active severity filter.
    pub fn filtered_indices(&self) -> Vec<usize> {
        self.logs
            .iter()
            .enumerate()
            .filter(|(_, l)| self.filter.map_or(true, |f| l.severity == f))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }

        match key.code {
            KeyCode::Char('f') => {
                self.filter = next_filter(self.filter);
                let len = self.filtered_indices().len();
                self.list_state.select(if len == 0 { None } else { Some(0) });
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.filtered_indices().len();
        if len == 0 {
            return;
        }
        let i = self.list_state.selected().unwrap_or(0) as isize;
        let next = (i + delta).rem_euclid(len as isize) as usize;
        self.list_state.select(Some(next));
    }
}

fn next_filter(f: Option<LogSeverity>) -> Option<LogSeverity> {
    match f {
        None => Some(LogSeverity::Info),
        Some(LogSeverity::Info) => Some(LogSeverity::Warn),
        Some(LogSeverity::Warn) => Some(LogSeverity::Error),
        Some(LogSeverity::Error) => None,
    }
}

fn severity_style(s: LogSeverity) -> Style {
    match s {
        LogSeverity::Info => Style::default().fg(theme::CYAN),
        LogSeverity::Warn => Style::default().fg(theme::YELLOW),
        LogSeverity::Error => Style::default().fg(theme::RED),
    }
}

// ── Drawing ─────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, area: Rect, state: &mut ActivityState) {
    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::dim_style())
        .title(Span::styled(" Activity ", theme::title_style()));

    let filtered = state.filtered_indices();
    let items: Vec<ListItem> = filtered
        .iter()
        .map(|&i| {
            let log = &state.logs[i];
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<6}", log.severity.label()),
                    severity_style(log.severity),
                ),
                Span::styled(
                    format!("{} ", log.timestamp.format("%H:%M:%S")),
                    theme::dim_style(),
                ),
                Span::styled(
                    format!("{:<16}", log.agent),
                    Style::default().fg(theme::ACCENT),
                ),
                Span::styled(log.message.clone(), Style::default().fg(theme::TEXT)),
            ]))
        })
        .collect();

    if items.is_empty() {
        let inner = block.inner(chunks[0]);
        f.render_widget(block, chunks[0]);
        let msg = if state.logs.is_empty() {
            "No activity yet. Screen a resume or publish a posting."
        } else {
            "No entries at this severity."
        };
        f.render_widget(Paragraph::new(msg).style(theme::dim_style()), inner);
    } else {
        let list = List::new(items)
            .block(block)
            .highlight_style(theme::selected_style());
        f.render_stateful_widget(list, chunks[0], &mut state.list_state);
    }

    let filter_label = match state.filter {
        None => "all",
        Some(s) => s.label(),
    };
    f.render_widget(
        Paragraph::new(format!("filter: {filter_label}  [f] filter  [j/k] move"))
            .style(theme::hint_style()),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_push_prepends() {
        let mut state = ActivityState::new();
        state.push(AgentLog::info("Screening Agent", "Scored Asha Patel: 91.0"));
        state.push(AgentLog::error("Posting Agent", "Broadcast failed"));
        assert_eq!(state.logs[0].message, "Broadcast failed");
        assert_eq!(state.logs[1].agent, "Screening Agent");
    }

    #[test]
    fn test_feed_is_unbounded() {
        let mut state = ActivityState::new();
        for i in 0..500 {
            state.push(AgentLog::info("Screening Agent", format!("entry {i}")));
        }
        assert_eq!(state.logs.len(), 500);
        assert_eq!(state.logs[0].message, "entry 499");
    }

    #[test]
    fn test_filter_cycles_through_severities() {
        let mut state = ActivityState::new();
        state.handle_key(press(KeyCode::Char('f')));
        assert_eq!(state.filter, Some(LogSeverity::Info));
        state.handle_key(press(KeyCode::Char('f')));
        assert_eq!(state.filter, Some(LogSeverity::Warn));
        state.handle_key(press(KeyCode::Char('f')));
        assert_eq!(state.filter, Some(LogSeverity::Error));
        state.handle_key(press(KeyCode::Char('f')));
        assert_eq!(state.filter, None);
    }

    #[test]
    fn test_filter_narrows_the_feed() {
        let mut state = ActivityState::new();
        state.push(AgentLog::info("Screening Agent", "ok"));
        state.push(AgentLog::error("Posting Agent", "failed"));
        state.push(AgentLog::info("Outreach Agent", "sent"));

        assert_eq!(state.filtered_indices().len(), 3);
        state.filter = Some(LogSeverity::Error);
        assert_eq!(state.filtered_indices(), vec![1]);
        state.filter = Some(LogSeverity::Warn);
        assert!(state.filtered_indices().is_empty());
    }

    #[test]
    fn test_selection_wraps_within_filtered_view() {
        let mut state = ActivityState::new();
        state.push(AgentLog::info("Screening Agent", "one"));
        state.push(AgentLog::info("Screening Agent", "two"));
        state.list_state.select(Some(0));
        state.handle_key(press(KeyCode::Char('k')));
        assert_eq!(state.list_state.selected(), Some(1));
        state.handle_key(press(KeyCode::Char('j')));
        assert_eq!(state.list_state.selected(), Some(0));
    }
}
