//! Postings screen: draft a job posting, then watch it move through the
//! optimize and broadcast legs.

use crate::tui::theme;
use agentdeck_types::agent::{BroadcastReport, PostingReview};
use agentdeck_types::record::{JobPosting, PostingStatus};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap};
use ratatui::Frame;

/// What the app should do after a key press on this screen.
pub enum PostingsAction {
    Continue,
    /// Kick off the optimize/broadcast flow for a fresh draft.
    Publish {
        id: String,
        title: String,
        body: String,
        location: String,
        salary: String,
    },
}

pub struct PostingsState {
    /// Postings, newest first. Each one tracks its own flow status, so
    /// several can be in flight at once.
    pub postings: Vec<JobPosting>,
    pub list_state: ListState,
    pub tick: usize,
    pub status_msg: String,
    // Posting form
    pub show_form: bool,
    pub form_title: String,
    pub form_body: String,
    pub form_location: String,
    pub form_salary: String,
    pub form_field: usize,
}

impl PostingsState {
    pub fn new() -> Self {
        Self {
            postings: Vec::new(),
            list_state: ListState::default(),
            tick: 0,
            status_msg: String::new(),
            show_form: false,
            form_title: String::new(),
            form_body: String::new(),
            form_location: String::new(),
            form_salary: String::new(),
            form_field: 0,
        }
    }

    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn title_of(&self, id: &str) -> Option<String> {
        self.postings
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.title.clone())
    }

    /// Apply the optimize result. Returns the title for logging, `None`
    /// when the posting has vanished.
    pub fn mark_optimized(&mut self, id: &str, review: &PostingReview) -> Option<String> {
        let posting = self.postings.iter_mut().find(|p| p.id == id)?;
        posting.status = PostingStatus::Optimized;
        let title = review.optimized_title.trim();
        let body = review.optimized_body.trim();
        posting.optimized_copy = match (title.is_empty(), body.is_empty()) {
            (true, true) => None,
            (false, true) => Some(title.to_string()),
            (true, false) => Some(body.to_string()),
            (false, false) => Some(format!("{title}\n{body}")),
        };
        posting.improvements = review.improvements.clone();
        Some(posting.title.clone())
    }

    /// Apply the broadcast result. Returns the title for logging.
    pub fn mark_broadcast(&mut self, id: &str, report: &BroadcastReport) -> Option<String> {
        let posting = self.postings.iter_mut().find(|p| p.id == id)?;
        posting.status = PostingStatus::Broadcast;
        posting.channels = report.channels.clone();
        Some(posting.title.clone())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PostingsAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return PostingsAction::Continue;
        }

        if self.show_form {
            return self.handle_form_key(key);
        }

        match key.code {
            KeyCode::Char('a') => self.open_form(),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            _ => {}
        }
        PostingsAction::Continue
    }

    fn open_form(&mut self) {
        self.show_form = true;
        self.form_title.clear();
        self.form_body.clear();
        self.form_location.clear();
        self.form_salary.clear();
        self.form_field = 0;
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> PostingsAction {
        match key.code {
            KeyCode::Esc => {
                self.show_form = false;
            }
            KeyCode::Tab => {
                self.form_field = (self.form_field + 1) % 4;
            }
            KeyCode::BackTab => {
                self.form_field = if self.form_field == 0 {
                    3
                } else {
                    self.form_field - 1
                };
            }
            KeyCode::Enter => return self.submit_form(),
            KeyCode::Char(c) => match self.form_field {
                0 => self.form_title.push(c),
                1 => self.form_body.push(c),
                2 => self.form_location.push(c),
                3 => self.form_salary.push(c),
                _ => {}
            },
            KeyCode::Backspace => match self.form_field {
                0 => {
                    self.form_title.pop();
                }
                1 => {
                    self.form_body.pop();
                }
                2 => {
                    self.form_location.pop();
                }
                3 => {
                    self.form_salary.pop();
                }
                _ => {}
            },
            _ => {}
        }
        PostingsAction::Continue
    }

    /// Validates the form. Title and description are required; location and
    /// salary may stay blank.
    fn submit_form(&mut self) -> PostingsAction {
        if self.form_title.trim().is_empty() || self.form_body.trim().is_empty() {
            self.status_msg = "Title and description are required.".to_string();
            return PostingsAction::Continue;
        }

        let posting = JobPosting::draft(
            self.form_title.trim(),
            self.form_body.trim(),
            self.form_location.trim(),
            self.form_salary.trim(),
        );
        let action = PostingsAction::Publish {
            id: posting.id.clone(),
            title: posting.title.clone(),
            body: posting.body.clone(),
            location: posting.location.clone(),
            salary: posting.salary.clone(),
        };
        self.status_msg = format!("Publishing '{}'...", posting.title);
        self.postings.insert(0, posting);
        self.list_state.select(Some(0));
        self.show_form = false;
        action
    }

    fn move_selection(&mut self, delta: isize) {
        if self.postings.is_empty() {
            return;
        }
        let i = self.list_state.selected().unwrap_or(0) as isize;
        let next = (i + delta).rem_euclid(self.postings.len() as isize) as usize;
        self.list_state.select(Some(next));
    }
}

fn status_style(status: PostingStatus) -> Style {
    match status {
        PostingStatus::Draft => theme::dim_style(),
        PostingStatus::Optimized => Style::default().fg(theme::YELLOW),
        PostingStatus::Broadcast => Style::default().fg(theme::GREEN),
    }
}

// ── Drawing ─────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, area: Rect, state: &mut PostingsState) {
    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(area);
    let columns =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(chunks[0]);

    draw_posting_list(f, columns[0], state);
    draw_posting_detail(f, columns[1], state);

    let hint = if state.status_msg.is_empty() {
        "[a] new posting  [j/k] move".to_string()
    } else {
        format!("{}  [a] new posting", state.status_msg)
    };
    f.render_widget(Paragraph::new(hint).style(theme::hint_style()), chunks[1]);

    if state.show_form {
        draw_form(f, area, state);
    }
}

fn draw_posting_list(f: &mut Frame, area: Rect, state: &mut PostingsState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::dim_style())
        .title(Span::styled(" Postings ", theme::title_style()));

    let items: Vec<ListItem> = state
        .postings
        .iter()
        .map(|p| {
            let mut spans = vec![
                Span::styled(
                    format!("{:<11}", p.status.label()),
                    status_style(p.status).add_modifier(Modifier::BOLD),
                ),
                Span::styled(p.title.clone(), Style::default().fg(theme::TEXT)),
            ];
            if !p.location.is_empty() {
                spans.push(Span::styled(format!("  @{}", p.location), theme::dim_style()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    if items.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new("No postings yet. Press [a] to draft one.").style(theme::dim_style()),
            inner,
        );
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::selected_style());
    f.render_stateful_widget(list, area, &mut state.list_state);
}

fn draw_posting_detail(f: &mut Frame, area: Rect, state: &PostingsState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::dim_style())
        .title(Span::styled(" Posting Detail ", theme::title_style()))
        .padding(Padding::uniform(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(p) = state.postings.get(state.list_state.selected().unwrap_or(usize::MAX)) else {
        f.render_widget(
            Paragraph::new("Select a posting to see the flow detail.").style(theme::dim_style()),
            inner,
        );
        return;
    };

    let mut meta = vec![Span::styled(
        p.status.label().to_string(),
        status_style(p.status).add_modifier(Modifier::BOLD),
    )];
    if !p.location.is_empty() {
        meta.push(Span::styled(format!("  {}", p.location), theme::dim_style()));
    }
    if !p.salary.is_empty() {
        meta.push(Span::styled(format!("  {}", p.salary), Style::default().fg(theme::CYAN)));
    }
    meta.push(Span::styled(
        format!("  {}", p.created_at.format("%d %b %H:%M")),
        theme::dim_style(),
    ));

    let mut lines = vec![
        Line::from(Span::styled(
            p.title.clone(),
            Style::default()
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(meta),
        Line::from(""),
        Line::from(Span::styled(p.body.clone(), Style::default().fg(theme::TEXT))),
    ];

    if let Some(copy) = &p.optimized_copy {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Optimized copy",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )));
        for part in copy.lines() {
            lines.push(Line::from(Span::styled(
                part.to_string(),
                Style::default().fg(theme::TEXT),
            )));
        }
    }
    if !p.improvements.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Improvements",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )));
        for note in &p.improvements {
            lines.push(Line::from(Span::styled(
                format!("• {note}"),
                Style::default().fg(theme::TEXT),
            )));
        }
    }
    if !p.channels.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Live on ", theme::dim_style()),
            Span::styled(
                p.channels.join(", "),
                Style::default().fg(theme::GREEN),
            ),
        ]));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn draw_form(f: &mut Frame, area: Rect, state: &PostingsState) {
    let modal = centered_rect(60, 10, area);
    f.render_widget(Clear, modal);

    let block = Block::default()
        .title(Span::styled(" New Posting ", theme::title_style()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .padding(Padding::uniform(1));
    let inner = block.inner(modal);
    f.render_widget(block, modal);

    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(inner);

    let field_style = |idx: usize| {
        if state.form_field == idx {
            Style::default()
                .fg(theme::CYAN)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::dim_style()
        }
    };

    let text_row = |label: &str, value: &str, idx: usize| {
        Line::from(vec![
            Span::styled(format!("{label:<14}"), field_style(idx)),
            Span::styled(format!("{value}\u{2588}"), Style::default().fg(theme::TEXT)),
        ])
    };

    f.render_widget(
        Paragraph::new(text_row("Title:", &state.form_title, 0)),
        rows[0],
    );
    f.render_widget(
        Paragraph::new(text_row("Description:", &state.form_body, 1)),
        rows[1],
    );
    f.render_widget(
        Paragraph::new(text_row("Location:", &state.form_location, 2)),
        rows[2],
    );
    f.render_widget(
        Paragraph::new(text_row("Salary range:", &state.form_salary, 3)),
        rows[3],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            "[Tab] field  [Enter] publish  [Esc] cancel",
            theme::hint_style(),
        )),
        rows[4],
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

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn fill_form(state: &mut PostingsState) {
        state.form_title = "Backend Engineer".to_string();
        state.form_body = "Own the order pipeline.".to_string();
        state.form_location = "Mumbai".to_string();
        state.form_salary = "18-24 LPA".to_string();
    }

    #[test]
    fn test_incomplete_form_never_publishes() {
        let mut state = PostingsState::new();
        state.show_form = true;
        fill_form(&mut state);
        state.form_body = " ".to_string();

        let action = state.handle_key(press(KeyCode::Enter));
        assert!(matches!(action, PostingsAction::Continue));
        assert!(state.postings.is_empty());
        assert!(state.show_form);
        assert_eq!(state.status_msg, "Title and description are required.");
    }

    #[test]
    fn test_submit_drafts_and_publishes() {
        let mut state = PostingsState::new();
        state.show_form = true;
        fill_form(&mut state);

        let action = state.handle_key(press(KeyCode::Enter));
        let (id, title) = match action {
            PostingsAction::Publish { id, title, .. } => (id, title),
            _ => panic!("expected a publish action"),
        };
        assert_eq!(title, "Backend Engineer");
        assert_eq!(state.postings.len(), 1);
        assert_eq!(state.postings[0].id, id);
        assert_eq!(state.postings[0].status, PostingStatus::Draft);
        assert!(!state.show_form);
    }

    #[test]
    fn test_location_and_salary_are_optional() {
        let mut state = PostingsState::new();
        state.show_form = true;
        state.form_title = "Designer".to_string();
        state.form_body = "Own the design system.".to_string();

        assert!(matches!(
            state.handle_key(press(KeyCode::Enter)),
            PostingsAction::Publish { .. }
        ));
        assert_eq!(state.postings[0].location, "");
        assert_eq!(state.postings[0].salary, "");
    }

    #[test]
    fn test_mark_optimized_stores_copy_and_notes() {
        let mut state = PostingsState::new();
        let posting = JobPosting::draft("Backend Engineer", "Own the pipeline.", "", "");
        let id = posting.id.clone();
        state.postings.push(posting);

        let review = PostingReview {
            optimized_title: "Senior Backend Engineer (Rust)".to_string(),
            optimized_body: "Own a high-volume order pipeline.".to_string(),
            improvements: vec!["Named the stack".to_string()],
        };
        let title = state.mark_optimized(&id, &review);
        assert_eq!(title.as_deref(), Some("Backend Engineer"));

        let p = &state.postings[0];
        assert_eq!(p.status, PostingStatus::Optimized);
        assert_eq!(
            p.optimized_copy.as_deref(),
            Some("Senior Backend Engineer (Rust)\nOwn a high-volume order pipeline.")
        );
        assert_eq!(p.improvements, vec!["Named the stack"]);
    }

    #[test]
    fn test_mark_optimized_with_empty_review_keeps_no_copy() {
        let mut state = PostingsState::new();
        let posting = JobPosting::draft("Backend Engineer", "Own the pipeline.", "", "");
        let id = posting.id.clone();
        state.postings.push(posting);

        state.mark_optimized(&id, &PostingReview::default());
        let p = &state.postings[0];
        assert_eq!(p.status, PostingStatus::Optimized);
        assert!(p.optimized_copy.is_none());
    }

    #[test]
    fn test_mark_broadcast_records_channels() {
        let mut state = PostingsState::new();
        let posting = JobPosting::draft("Backend Engineer", "Own the pipeline.", "", "");
        let id = posting.id.clone();
        state.postings.push(posting);

        state.mark_optimized(&id, &PostingReview::default());
        let report = BroadcastReport {
            channels: vec!["LinkedIn".to_string(), "Referrals".to_string()],
            confirmation: "Posted to 2 channels.".to_string(),
        };
        state.mark_broadcast(&id, &report);

        let p = &state.postings[0];
        assert_eq!(p.status, PostingStatus::Broadcast);
        assert_eq!(p.channels, vec!["LinkedIn", "Referrals"]);
    }

    #[test]
    fn test_marks_for_unknown_id_are_noops() {
        let mut state = PostingsState::new();
        assert!(state.mark_optimized("missing", &PostingReview::default()).is_none());
        assert!(state
            .mark_broadcast("missing", &BroadcastReport::default())
            .is_none());
    }
}
