//! Outreach screen: chat-style engagement feed against the outreach agent.
//!
//! A candidate picked on the Candidates tab becomes the target chip; the
//! app folds the chip into the prompt, the transcript shows only what was
//! typed.

use crate::tui::theme;
use agentdeck_types::record::{ChatMessage, ChatRole};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph};
use ratatui::Frame;

pub struct OutreachState {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub waiting: bool,
    /// Candidate (name, role) the next drafts are about.
    pub target: Option<(String, String)>,
    pub tick: usize,
    pub status_msg: String,
}

pub enum OutreachAction {
    Continue,
    /// Dispatch this draft to the outreach agent.
    Send(String),
}

impl OutreachState {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(
                "Hi! I draft candidate outreach and follow-ups. Pick a candidate \
                 with [o] on the Candidates tab, or just tell me what to write.",
            )],
            input: String::new(),
            waiting: false,
            target: None,
            tick: 0,
            status_msg: String::new(),
        }
    }

    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn push_reply(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(text));
        self.waiting = false;
    }

    /// Aim subsequent drafts at this candidate. The chip stays until
    /// cleared with Esc or replaced by another pick.
    pub fn set_target(&mut self, name: impl Into<String>, role: impl Into<String>) {
        self.target = Some((name.into(), role.into()));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OutreachAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return OutreachAction::Continue;
        }

        match key.code {
            KeyCode::Enter => {
                let text = self.input.trim().to_string();
                // Empty drafts never reach the agent
                if text.is_empty() || self.waiting {
                    return OutreachAction::Continue;
                }
                self.messages.push(ChatMessage::user(text.clone()));
                self.input.clear();
                OutreachAction::Send(text)
            }
            // Esc drops the chip, but never eats an in-progress draft
            KeyCode::Esc if self.input.is_empty() => {
                self.target = None;
                OutreachAction::Continue
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                OutreachAction::Continue
            }
            KeyCode::Backspace => {
                self.input.pop();
                OutreachAction::Continue
            }
            _ => OutreachAction::Continue,
        }
    }
}

// ── Drawing ─────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, area: Rect, state: &mut OutreachState) {
    let chunks = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .split(area);

    draw_feed(f, chunks[0], state);
    draw_input(f, chunks[1], state);

    let hint = if !state.status_msg.is_empty() {
        state.status_msg.clone()
    } else if let Some((name, _)) = &state.target {
        format!("Drafting for {name}  [Enter] send  [Esc] clear target")
    } else {
        "[Enter] send  [o] on Candidates targets a candidate".to_string()
    };
    f.render_widget(Paragraph::new(hint).style(theme::hint_style()), chunks[2]);
}

fn draw_feed(f: &mut Frame, area: Rect, state: &OutreachState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Engagement Feed ", theme::title_style()))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let width = inner.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for msg in &state.messages {
        let (prefix, style) = match msg.role {
            ChatRole::User => ("You", Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)),
            ChatRole::Assistant => (
                "Outreach",
                Style::default().fg(theme::CYAN).add_modifier(Modifier::BOLD),
            ),
        };
        lines.push(Line::from(Span::styled(prefix, style)));
        for row in wrap_text(&msg.content, width) {
            lines.push(Line::from(Span::styled(
                format!("  {row}"),
                Style::default().fg(theme::TEXT),
            )));
        }
        lines.push(Line::from(""));
    }
    if state.waiting {
        let frame = theme::SPINNER_FRAMES[state.tick % theme::SPINNER_FRAMES.len()];
        lines.push(Line::from(Span::styled(
            format!("{frame} Outreach agent is drafting..."),
            theme::dim_style(),
        )));
    }

    // Keep the tail of the feed in view
    let visible = inner.height as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;
    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
}

fn draw_input(f: &mut Frame, area: Rect, state: &OutreachState) {
    let border = if state.waiting {
        theme::dim_style()
    } else {
        Style::default().fg(theme::ACCENT)
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .padding(Padding::horizontal(1));
    if let Some((name, role)) = &state.target {
        block = block.title(Span::styled(
            format!(" To: {name} ({role}) "),
            Style::default().fg(theme::CYAN),
        ));
    }
    let inner = block.inner(area);
    f.render_widget(block, area);

    f.render_widget(
        Paragraph::new(Span::styled(
            format!("{}\u{2588}", state.input),
            Style::default().fg(theme::TEXT),
        )),
        inner,
    );
}

/// Greedy word wrap; unbreakable words get hard-split at the pane width.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let mut rows = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.len() + 1 + word.len() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                rows.push(std::mem::take(&mut current));
                current = word.to_string();
            }
            while current.len() > width {
                let head: String = current.chars().take(width).collect();
                current = current.chars().skip(width).collect();
                rows.push(head);
            }
        }
        rows.push(current);
    }
    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_empty_draft_never_sends() {
        let mut state = OutreachState::new();
        let before = state.messages.len();
        assert!(matches!(
            state.handle_key(press(KeyCode::Enter)),
            OutreachAction::Continue
        ));
        state.input = "  ".to_string();
        assert!(matches!(
            state.handle_key(press(KeyCode::Enter)),
            OutreachAction::Continue
        ));
        assert_eq!(state.messages.len(), before);
    }

    #[test]
    fn test_send_appends_raw_draft() {
        let mut state = OutreachState::new();
        state.set_target("Asha Patel", "Backend Engineer");
        state.input = "Invite her to the Tuesday loop".to_string();
        match state.handle_key(press(KeyCode::Enter)) {
            OutreachAction::Send(text) => assert_eq!(text, "Invite her to the Tuesday loop"),
            OutreachAction::Continue => panic!("expected a send"),
        }
        // The chip is prompt context, not transcript content
        let last = state.messages.last().unwrap();
        assert_eq!(last.role, ChatRole::User);
        assert_eq!(last.content, "Invite her to the Tuesday loop");
        assert!(state.target.is_some(), "target survives a send");
    }

    #[test]
    fn test_no_sends_while_waiting() {
        let mut state = OutreachState::new();
        state.waiting = true;
        state.input = "follow up".to_string();
        assert!(matches!(
            state.handle_key(press(KeyCode::Enter)),
            OutreachAction::Continue
        ));
        assert_eq!(state.input, "follow up");
    }

    #[test]
    fn test_esc_clears_target_only_on_blank_input() {
        let mut state = OutreachState::new();
        state.set_target("Asha Patel", "Backend Engineer");
        state.input = "dra".to_string();
        state.handle_key(press(KeyCode::Esc));
        assert!(state.target.is_some());

        state.input.clear();
        state.handle_key(press(KeyCode::Esc));
        assert!(state.target.is_none());
    }

    #[test]
    fn test_push_reply_clears_waiting() {
        let mut state = OutreachState::new();
        state.waiting = true;
        state.push_reply("Drafted the intro email.");
        assert!(!state.waiting);
        assert_eq!(state.messages.last().unwrap().role, ChatRole::Assistant);
    }

    #[test]
    fn test_wrap_text_hard_splits_long_words() {
        assert_eq!(wrap_text("aaaaaaaaaa", 4), vec!["aaaa", "aaaa", "aa"]);
    }
}
