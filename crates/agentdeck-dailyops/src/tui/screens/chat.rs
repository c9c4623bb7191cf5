//! Chat screen: free-form conversation with the coordinator agent.
//!
//! The screen owns the transcript and the input line. Sending is the app's
//! job; the screen only reports what to send via [`ChatAction::Send`].

use crate::tui::theme;
use agentdeck_types::record::{ChatMessage, ChatRole};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph};
use ratatui::Frame;

/// Canned prompts reachable with a single digit when the input is empty.
pub const QUICK_ACTIONS: &[&str] = &[
    "Plan tomorrow",
    "Coordinate with friends",
    "Find food nearby",
    "Check train status",
];

// ── State ───────────────────────────────────────────────────────────────────

pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub waiting: bool,
    pub tick: usize,
    pub status_msg: String,
}

pub enum ChatAction {
    Continue,
    /// Dispatch this instruction to the coordinator.
    Send(String),
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(
                "Hey! I'm your daily ops coordinator. Ask me anything about \
                 your day, or use the quick prompts below.",
            )],
            input: String::new(),
            waiting: false,
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

    pub fn handle_key(&mut self, key: KeyEvent) -> ChatAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return ChatAction::Continue;
        }

        match key.code {
            KeyCode::Enter => {
                let text = self.input.trim().to_string();
                // Empty submissions never reach the agent
                if text.is_empty() || self.waiting {
                    return ChatAction::Continue;
                }
                self.messages.push(ChatMessage::user(text.clone()));
                self.input.clear();
                ChatAction::Send(text)
            }
            // Quick prompts fire immediately, but only from a blank line so
            // digits can still be typed mid-sentence
            KeyCode::Char(c @ '1'..='4') if self.input.is_empty() && !self.waiting => {
                let idx = (c as usize) - ('1' as usize);
                let prompt = QUICK_ACTIONS[idx].to_string();
                self.messages.push(ChatMessage::user(prompt.clone()));
                ChatAction::Send(prompt)
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                ChatAction::Continue
            }
            KeyCode::Backspace => {
                self.input.pop();
                ChatAction::Continue
            }
            _ => ChatAction::Continue,
        }
    }
}

// ── Drawing ─────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, area: Rect, state: &mut ChatState) {
    let chunks = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .split(area);

    draw_transcript(f, chunks[0], state);
    draw_input(f, chunks[1], state);

    let hint = if state.status_msg.is_empty() {
        format!(
            "[1] {}  [2] {}  [3] {}  [4] {}",
            QUICK_ACTIONS[0], QUICK_ACTIONS[1], QUICK_ACTIONS[2], QUICK_ACTIONS[3]
        )
    } else {
        state.status_msg.clone()
    };
    f.render_widget(Paragraph::new(hint).style(theme::hint_style()), chunks[2]);
}

fn draw_transcript(f: &mut Frame, area: Rect, state: &ChatState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Coordinator Chat ", theme::title_style()))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let width = inner.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for msg in &state.messages {
        let (prefix, style) = match msg.role {
            ChatRole::User => ("You", Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)),
            ChatRole::Assistant => (
                "Coordinator",
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
            format!("{frame} Coordinator is thinking..."),
            theme::dim_style(),
        )));
    }

    // Keep the tail of the conversation in view
    let visible = inner.height as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;
    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
}

fn draw_input(f: &mut Frame, area: Rect, state: &ChatState) {
    let border = if state.waiting {
        theme::dim_style()
    } else {
        Style::default().fg(theme::ACCENT)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .padding(Padding::horizontal(1));
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

/// Greedy word wrap. Long unbreakable words get hard-split so the
/// transcript never overflows the pane.
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
    fn test_empty_enter_sends_nothing() {
        let mut state = ChatState::new();
        let before = state.messages.len();
        let action = state.handle_key(press(KeyCode::Enter));
        assert!(matches!(action, ChatAction::Continue));
        assert_eq!(state.messages.len(), before);

        state.input = "   ".to_string();
        let action = state.handle_key(press(KeyCode::Enter));
        assert!(matches!(action, ChatAction::Continue));
        assert_eq!(state.messages.len(), before);
    }

    #[test]
    fn test_enter_appends_and_clears() {
        let mut state = ChatState::new();
        state.input = "where can I get lunch".to_string();
        let action = state.handle_key(press(KeyCode::Enter));
        match action {
            ChatAction::Send(text) => assert_eq!(text, "where can I get lunch"),
            ChatAction::Continue => panic!("expected a send"),
        }
        assert!(state.input.is_empty());
        let last = state.messages.last().unwrap();
        assert_eq!(last.role, ChatRole::User);
        assert_eq!(last.content, "where can I get lunch");
    }

    #[test]
    fn test_quick_action_fires_from_blank_input() {
        let mut state = ChatState::new();
        let action = state.handle_key(press(KeyCode::Char('1')));
        match action {
            ChatAction::Send(text) => assert_eq!(text, "Plan tomorrow"),
            ChatAction::Continue => panic!("expected a send"),
        }
        assert_eq!(state.messages.last().unwrap().content, "Plan tomorrow");
    }

    #[test]
    fn test_digit_is_text_once_typing_started() {
        let mut state = ChatState::new();
        state.input = "platform ".to_string();
        let action = state.handle_key(press(KeyCode::Char('2')));
        assert!(matches!(action, ChatAction::Continue));
        assert_eq!(state.input, "platform 2");
    }

    #[test]
    fn test_no_sends_while_waiting() {
        let mut state = ChatState::new();
        state.waiting = true;
        state.input = "hello?".to_string();
        assert!(matches!(state.handle_key(press(KeyCode::Enter)), ChatAction::Continue));
        state.input.clear();
        assert!(matches!(
            state.handle_key(press(KeyCode::Char('3'))),
            ChatAction::Continue
        ));
    }

    #[test]
    fn test_push_reply_clears_waiting() {
        let mut state = ChatState::new();
        state.waiting = true;
        state.push_reply("All set.");
        assert!(!state.waiting);
        assert_eq!(state.messages.last().unwrap().role, ChatRole::Assistant);
    }

    #[test]
    fn test_wrap_text_splits_long_words() {
        let rows = wrap_text("aaaaaaaaaa", 4);
        assert_eq!(rows, vec!["aaaa", "aaaa", "aa"]);
        let rows = wrap_text("two words here", 9);
        assert_eq!(rows, vec!["two words", "here"]);
    }
}
