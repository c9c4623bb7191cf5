//! Candidates screen: resume screening form plus the scored pipeline.
//!
//! The list starts empty; every entry comes back from the screening agent.

use crate::tui::theme;
use agentdeck_types::record::{Candidate, Verdict};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap};
use ratatui::Frame;

/// What the app should do after a key press on this screen.
pub enum CandidatesAction {
    Continue,
    /// Send the resume form to the screening agent.
    Screen {
        name: String,
        email: String,
        role: String,
        resume: String,
    },
    /// Open the outreach tab with this candidate preloaded.
    Compose { name: String, role: String },
}

pub struct CandidatesState {
    /// Screened candidates, newest first.
    pub candidates: Vec<Candidate>,
    pub list_state: ListState,
    /// True while a resume is out with the screening agent.
    pub screening: bool,
    pub tick: usize,
    pub status_msg: String,
    // Screening form
    pub show_form: bool,
    pub form_name: String,
    pub form_email: String,
    pub form_role: String,
    pub form_resume: String,
    pub form_field: usize,
}

impl CandidatesState {
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
            list_state: ListState::default(),
            screening: false,
            tick: 0,
            status_msg: String::new(),
            show_form: false,
            form_name: String::new(),
            form_email: String::new(),
            form_role: String::new(),
            form_resume: String::new(),
            form_field: 0,
        }
    }

    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Prepend a screened candidate and focus it.
    pub fn push_candidate(&mut self, candidate: Candidate) {
        self.candidates.insert(0, candidate);
        self.list_state.select(Some(0));
    }

    pub fn selected(&self) -> Option<&Candidate> {
        self.candidates.get(self.list_state.selected()?)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> CandidatesAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return CandidatesAction::Continue;
        }

        if self.show_form {
            return self.handle_form_key(key);
        }

        match key.code {
            KeyCode::Char('a') => {
                self.open_form();
            }
            KeyCode::Char('o') => {
                if let Some(c) = self.selected() {
                    return CandidatesAction::Compose {
                        name: c.name.clone(),
                        role: c.role.clone(),
                    };
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            _ => {}
        }
        CandidatesAction::Continue
    }

    fn open_form(&mut self) {
        self.show_form = true;
        self.form_name.clear();
        self.form_email.clear();
        self.form_role.clear();
        self.form_resume.clear();
        self.form_field = 0;
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> CandidatesAction {
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
                0 => self.form_name.push(c),
                1 => self.form_email.push(c),
                2 => self.form_role.push(c),
                3 => self.form_resume.push(c),
                _ => {}
            },
            KeyCode::Backspace => match self.form_field {
                0 => {
                    self.form_name.pop();
                }
                1 => {
                    self.form_email.pop();
                }
                2 => {
                    self.form_role.pop();
                }
                3 => {
                    self.form_resume.pop();
                }
                _ => {}
            },
            _ => {}
        }
        CandidatesAction::Continue
    }

    /// Validates the form. All four fields are required; nothing is sent to
    /// the agent until every one of them has text.
    fn submit_form(&mut self) -> CandidatesAction {
        if self.form_name.trim().is_empty()
            || self.form_email.trim().is_empty()
            || self.form_role.trim().is_empty()
            || self.form_resume.trim().is_empty()
        {
            self.status_msg = "All fields are required.".to_string();
            return CandidatesAction::Continue;
        }
        if self.screening {
            return CandidatesAction::Continue;
        }

        let name = self.form_name.trim().to_string();
        let email = self.form_email.trim().to_string();
        let role = self.form_role.trim().to_string();
        let resume = self.form_resume.trim().to_string();

        self.show_form = false;
        self.screening = true;
        self.status_msg = format!("Screening resume for {name}...");
        CandidatesAction::Screen {
            name,
            email,
            role,
            resume,
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.candidates.is_empty() {
            return;
        }
        let i = self.list_state.selected().unwrap_or(0) as isize;
        let next = (i + delta).rem_euclid(self.candidates.len() as isize) as usize;
        self.list_state.select(Some(next));
    }
}

fn verdict_color(v: Verdict) -> Color {
    match v {
        Verdict::Schedule => theme::GREEN,
        Verdict::Review => theme::YELLOW,
        Verdict::Reject => theme::RED,
    }
}

// ── Drawing ─────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, area: Rect, state: &mut CandidatesState) {
    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(area);
    let columns =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).split(chunks[0]);

    draw_pipeline(f, columns[0], state);
    draw_detail(f, columns[1], state);

    let hint = if state.screening {
        let frame = theme::SPINNER_FRAMES[state.tick % theme::SPINNER_FRAMES.len()];
        format!("{frame} Screening resume...")
    } else if state.status_msg.is_empty() {
        "[a] screen resume  [o] outreach  [j/k] move".to_string()
    } else {
        format!("{}  [a] screen resume  [o] outreach", state.status_msg)
    };
    f.render_widget(Paragraph::new(hint).style(theme::hint_style()), chunks[1]);

    if state.show_form {
        draw_form(f, area, state);
    }
}

fn draw_pipeline(f: &mut Frame, area: Rect, state: &mut CandidatesState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::dim_style())
        .title(Span::styled(" Pipeline ", theme::title_style()));

    let items: Vec<ListItem> = state
        .candidates
        .iter()
        .map(|c| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>5.1} ", c.score),
                    Style::default().fg(verdict_color(c.verdict)),
                ),
                Span::styled(
                    format!("{:<9}", c.verdict.label()),
                    Style::default()
                        .fg(verdict_color(c.verdict))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(c.name.clone(), Style::default().fg(theme::TEXT)),
                Span::styled(format!("  {}", c.role), theme::dim_style()),
            ]))
        })
        .collect();

    if items.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new("No candidates yet. Press [a] to screen a resume.")
                .style(theme::dim_style()),
            inner,
        );
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::selected_style());
    f.render_stateful_widget(list, area, &mut state.list_state);
}

fn draw_detail(f: &mut Frame, area: Rect, state: &CandidatesState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::dim_style())
        .title(Span::styled(" Screening Detail ", theme::title_style()))
        .padding(Padding::uniform(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(c) = state.candidates.get(state.list_state.selected().unwrap_or(usize::MAX)) else {
        f.render_widget(
            Paragraph::new("Select a candidate to see the screening detail.")
                .style(theme::dim_style()),
            inner,
        );
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            c.name.clone(),
            Style::default()
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(c.email.clone(), Style::default().fg(theme::CYAN)),
            Span::styled(format!("  {}", c.role), theme::dim_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Score   ", theme::dim_style()),
            Span::styled(
                format!("{:.1} / 100", c.score),
                Style::default()
                    .fg(verdict_color(c.verdict))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Verdict ", theme::dim_style()),
            Span::styled(
                c.verdict.label().to_string(),
                Style::default().fg(verdict_color(c.verdict)),
            ),
        ]),
        Line::from(vec![
            Span::styled("Scored  ", theme::dim_style()),
            Span::styled(
                c.submitted_at.format("%d %b %H:%M").to_string(),
                Style::default().fg(theme::TEXT),
            ),
        ]),
        Line::from(""),
    ];
    if !c.skills.is_empty() {
        lines.push(Line::from(Span::styled(
            "Skills",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            c.skills.join(", "),
            Style::default().fg(theme::TEXT),
        )));
        lines.push(Line::from(""));
    }
    if !c.reasoning.is_empty() {
        lines.push(Line::from(Span::styled(
            "Reasoning",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            c.reasoning.clone(),
            Style::default().fg(theme::TEXT),
        )));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn draw_form(f: &mut Frame, area: Rect, state: &CandidatesState) {
    let modal = centered_rect(60, 10, area);
    f.render_widget(Clear, modal);

    let block = Block::default()
        .title(Span::styled(" Screen Resume ", theme::title_style()))
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
            Span::styled(format!("{label:<9}"), field_style(idx)),
            Span::styled(format!("{value}\u{2588}"), Style::default().fg(theme::TEXT)),
        ])
    };

    f.render_widget(
        Paragraph::new(text_row("Name:", &state.form_name, 0)),
        rows[0],
    );
    f.render_widget(
        Paragraph::new(text_row("Email:", &state.form_email, 1)),
        rows[1],
    );
    f.render_widget(
        Paragraph::new(text_row("Role:", &state.form_role, 2)),
        rows[2],
    );
    f.render_widget(
        Paragraph::new(text_row("Resume:", &state.form_resume, 3)),
        rows[3],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            "[Tab] field  [Enter] screen  [Esc] cancel",
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

    fn fill_form(state: &mut CandidatesState) {
        state.form_name = "Asha Patel".to_string();
        state.form_email = "asha@example.com".to_string();
        state.form_role = "Backend Engineer".to_string();
        state.form_resume = "Six years of Rust and Postgres.".to_string();
    }

    #[test]
    fn test_incomplete_form_never_screens() {
        let mut state = CandidatesState::new();
        state.show_form = true;
        fill_form(&mut state);
        state.form_resume = "   ".to_string();

        let action = state.handle_key(press(KeyCode::Enter));
        assert!(matches!(action, CandidatesAction::Continue));
        assert!(state.show_form, "form stays open on validation failure");
        assert!(!state.screening);
        assert_eq!(state.status_msg, "All fields are required.");
    }

    #[test]
    fn test_valid_form_submits_trimmed_fields() {
        let mut state = CandidatesState::new();
        state.show_form = true;
        fill_form(&mut state);
        state.form_name = "  Asha Patel  ".to_string();

        let action = state.handle_key(press(KeyCode::Enter));
        match action {
            CandidatesAction::Screen {
                name, email, role, ..
            } => {
                assert_eq!(name, "Asha Patel");
                assert_eq!(email, "asha@example.com");
                assert_eq!(role, "Backend Engineer");
            }
            _ => panic!("expected a screening submission"),
        }
        assert!(!state.show_form);
        assert!(state.screening);
    }

    #[test]
    fn test_second_submit_waits_for_first() {
        let mut state = CandidatesState::new();
        state.show_form = true;
        fill_form(&mut state);
        assert!(matches!(
            state.handle_key(press(KeyCode::Enter)),
            CandidatesAction::Screen { .. }
        ));

        state.show_form = true;
        fill_form(&mut state);
        assert!(matches!(
            state.handle_key(press(KeyCode::Enter)),
            CandidatesAction::Continue
        ));
    }

    #[test]
    fn test_tab_cycles_form_fields() {
        let mut state = CandidatesState::new();
        state.handle_key(press(KeyCode::Char('a')));
        assert!(state.show_form);
        assert_eq!(state.form_field, 0);
        state.handle_key(press(KeyCode::Tab));
        assert_eq!(state.form_field, 1);
        state.handle_key(press(KeyCode::BackTab));
        assert_eq!(state.form_field, 0);
        state.handle_key(press(KeyCode::BackTab));
        assert_eq!(state.form_field, 3);
    }

    #[test]
    fn test_typing_lands_in_active_field() {
        let mut state = CandidatesState::new();
        state.handle_key(press(KeyCode::Char('a')));
        state.handle_key(press(KeyCode::Char('R')));
        state.handle_key(press(KeyCode::Tab));
        state.handle_key(press(KeyCode::Char('r')));
        state.handle_key(press(KeyCode::Backspace));
        assert_eq!(state.form_name, "R");
        assert_eq!(state.form_email, "");
    }

    #[test]
    fn test_push_candidate_prepends_and_selects() {
        let mut state = CandidatesState::new();
        state.push_candidate(Candidate::new(
            "Ravi Nair",
            "ravi@example.com",
            "Platform Engineer",
            72.0,
            Verdict::Review,
            vec!["Go".to_string()],
            "Solid but narrow.",
        ));
        state.push_candidate(Candidate::new(
            "Asha Patel",
            "asha@example.com",
            "Backend Engineer",
            91.0,
            Verdict::Schedule,
            vec!["Rust".to_string()],
            "Strong fit.",
        ));
        assert_eq!(state.candidates[0].name, "Asha Patel");
        assert_eq!(state.list_state.selected(), Some(0));
    }

    #[test]
    fn test_compose_targets_selected_candidate() {
        let mut state = CandidatesState::new();
        state.push_candidate(Candidate::new(
            "Asha Patel",
            "asha@example.com",
            "Backend Engineer",
            91.0,
            Verdict::Schedule,
            Vec::new(),
            "",
        ));
        match state.handle_key(press(KeyCode::Char('o'))) {
            CandidatesAction::Compose { name, role } => {
                assert_eq!(name, "Asha Patel");
                assert_eq!(role, "Backend Engineer");
            }
            _ => panic!("expected a compose action"),
        }
    }

    #[test]
    fn test_compose_without_selection_is_noop() {
        let mut state = CandidatesState::new();
        assert!(matches!(
            state.handle_key(press(KeyCode::Char('o'))),
            CandidatesAction::Continue
        ));
    }
}
