//! Schedule screen: calendar events and subject preferences, full CRUD.
//!
//! Everything here is in-memory. The lists start from a seeded day so the
//! screen is never empty on first launch.

use crate::tui::theme;
use agentdeck_types::record::{EventCategory, Priority, ScheduleEvent, SubjectPreference};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};
use ratatui::Frame;

/// Colors a subject can be tagged with in the edit modal.
pub const SUBJECT_COLORS: &[&str] = &["blue", "purple", "green", "orange", "pink"];

// ── State ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ScheduleFocus {
    Events,
    Subjects,
}

pub struct ScheduleState {
    pub events: Vec<ScheduleEvent>,
    pub subjects: Vec<SubjectPreference>,
    pub focus: ScheduleFocus,
    pub list_state: ListState,
    pub subject_list_state: ListState,
    /// `None` shows every category.
    pub filter: Option<EventCategory>,
    pub tick: usize,
    pub status_msg: String,
    // Event modal
    pub show_event_modal: bool,
    pub editing_id: Option<String>,
    pub form_name: String,
    pub form_start: String,
    pub form_end: String,
    pub form_location: String,
    pub form_priority: Priority,
    pub form_category: EventCategory,
    pub form_description: String,
    pub form_field: usize,
    // Subject modal
    pub show_subject_modal: bool,
    pub subject_editing_id: Option<String>,
    pub subject_name: String,
    pub subject_color: usize,
    pub subject_professor: String,
    pub subject_field: usize,
}

impl ScheduleState {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            events: vec![
                ScheduleEvent::new(
                    "Morning Lecture",
                    "09:00",
                    "11:00",
                    "Churchgate",
                    Priority::High,
                    EventCategory::Lecture,
                    Some("Advanced Mathematics".to_string()),
                ),
                ScheduleEvent::new(
                    "Afternoon Lecture",
                    "14:00",
                    "16:00",
                    "Churchgate",
                    Priority::High,
                    EventCategory::Lecture,
                    Some("Computer Science Lab".to_string()),
                ),
                ScheduleEvent::new(
                    "Internship Meeting",
                    "17:00",
                    "18:00",
                    "BKC",
                    Priority::High,
                    EventCategory::Internship,
                    Some("Weekly sync with team".to_string()),
                ),
            ],
            subjects: vec![
                SubjectPreference::new("Advanced Mathematics", "blue", Some("Dr. Sharma".to_string())),
                SubjectPreference::new("Computer Science Lab", "purple", Some("Prof. Mehta".to_string())),
            ],
            focus: ScheduleFocus::Events,
            list_state,
            subject_list_state: ListState::default(),
            filter: None,
            tick: 0,
            status_msg: String::new(),
            show_event_modal: false,
            editing_id: None,
            form_name: String::new(),
            form_start: String::new(),
            form_end: String::new(),
            form_location: String::new(),
            form_priority: Priority::Medium,
            form_category: EventCategory::Lecture,
            form_description: String::new(),
            form_field: 0,
            show_subject_modal: false,
            subject_editing_id: None,
            subject_name: String::new(),
            subject_color: 0,
            subject_professor: String::new(),
            subject_field: 0,
        }
    }

    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Indices into `events` that survive the active category filter.
    pub fn filtered_indices(&self) -> Vec<usize> {
        self.events
            .iter()
            .enumerate()
            .filter(|(_, e)| self.filter.map_or(true, |f| e.category == f))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }

        // Modal key handling
        if self.show_event_modal {
            self.handle_event_modal_key(key);
            return;
        }
        if self.show_subject_modal {
            self.handle_subject_modal_key(key);
            return;
        }

        match key.code {
            KeyCode::Left | KeyCode::Right => {
                self.focus = match self.focus {
                    ScheduleFocus::Events => ScheduleFocus::Subjects,
                    ScheduleFocus::Subjects => ScheduleFocus::Events,
                };
            }
            KeyCode::Char('f') if self.focus == ScheduleFocus::Events => {
                self.filter = next_filter(self.filter);
                let len = self.filtered_indices().len();
                self.list_state.select(if len == 0 { None } else { Some(0) });
            }
            KeyCode::Char('a') => match self.focus {
                ScheduleFocus::Events => self.open_add_event(),
                ScheduleFocus::Subjects => self.open_add_subject(),
            },
            KeyCode::Char('e') | KeyCode::Enter => match self.focus {
                ScheduleFocus::Events => self.open_edit_event(),
                ScheduleFocus::Subjects => self.open_edit_subject(),
            },
            KeyCode::Char('d') => match self.focus {
                ScheduleFocus::Events => self.delete_selected_event(),
                ScheduleFocus::Subjects => self.delete_selected_subject(),
            },
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let (list_state, len) = match self.focus {
            ScheduleFocus::Events => {
                let len = self.filtered_indices().len();
                (&mut self.list_state, len)
            }
            ScheduleFocus::Subjects => (&mut self.subject_list_state, self.subjects.len()),
        };
        if len == 0 {
            return;
        }
        let i = list_state.selected().unwrap_or(0) as isize;
        let next = (i + delta).rem_euclid(len as isize) as usize;
        list_state.select(Some(next));
    }

    fn selected_event_index(&self) -> Option<usize> {
        let filtered = self.filtered_indices();
        filtered.get(self.list_state.selected()?).copied()
    }

    // ── Event CRUD ──────────────────────────────────────────────────────────

    fn open_add_event(&mut self) {
        self.show_event_modal = true;
        self.editing_id = None;
        self.form_name.clear();
        self.form_start.clear();
        self.form_end.clear();
        self.form_location.clear();
        self.form_priority = Priority::Medium;
        self.form_category = EventCategory::Lecture;
        self.form_description.clear();
        self.form_field = 0;
    }

    fn open_edit_event(&mut self) {
        let Some(idx) = self.selected_event_index() else {
            return;
        };
        let ev = &self.events[idx];
        self.show_event_modal = true;
        self.editing_id = Some(ev.id.clone());
        self.form_name = ev.name.clone();
        self.form_start = ev.start_time.clone();
        self.form_end = ev.end_time.clone();
        self.form_location = ev.location.clone();
        self.form_priority = ev.priority;
        self.form_category = ev.category;
        self.form_description = ev.description.clone().unwrap_or_default();
        self.form_field = 0;
    }

    /// Applies the event form. Returns false and keeps the modal open when a
    /// required field is blank.
    pub fn save_event(&mut self) -> bool {
        if self.form_name.trim().is_empty()
            || self.form_start.trim().is_empty()
            || self.form_end.trim().is_empty()
            || self.form_location.trim().is_empty()
        {
            self.status_msg = "Name, times and location are required.".to_string();
            return false;
        }

        let description = if self.form_description.trim().is_empty() {
            None
        } else {
            Some(self.form_description.trim().to_string())
        };

        match self.editing_id.clone() {
            Some(id) => {
                // The event may have been deleted mid-edit; saving then
                // changes nothing.
                if let Some(ev) = self.events.iter_mut().find(|e| e.id == id) {
                    ev.name = self.form_name.trim().to_string();
                    ev.start_time = self.form_start.trim().to_string();
                    ev.end_time = self.form_end.trim().to_string();
                    ev.location = self.form_location.trim().to_string();
                    ev.priority = self.form_priority;
                    ev.category = self.form_category;
                    ev.description = description;
                    self.status_msg = format!("Updated '{}'.", ev.name);
                }
            }
            None => {
                self.events.push(ScheduleEvent::new(
                    self.form_name.trim(),
                    self.form_start.trim(),
                    self.form_end.trim(),
                    self.form_location.trim(),
                    self.form_priority,
                    self.form_category,
                    description,
                ));
                self.status_msg = format!("Added '{}'.", self.form_name.trim());
            }
        }
        self.show_event_modal = false;
        true
    }

    fn delete_selected_event(&mut self) {
        let Some(idx) = self.selected_event_index() else {
            return;
        };
        let id = self.events[idx].id.clone();
        self.delete_event(&id);
    }

    /// Removes an event by id. Deleting an id that is already gone is a no-op.
    pub fn delete_event(&mut self, id: &str) {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        if self.events.len() != before {
            self.status_msg = "Event deleted.".to_string();
        }
        let len = self.filtered_indices().len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            let i = self.list_state.selected().unwrap_or(0);
            self.list_state.select(Some(i.min(len - 1)));
        }
    }

    fn handle_event_modal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.show_event_modal = false;
            }
            KeyCode::Tab => {
                self.form_field = (self.form_field + 1) % 7;
            }
            KeyCode::BackTab => {
                self.form_field = if self.form_field == 0 {
                    6
                } else {
                    self.form_field - 1
                };
            }
            KeyCode::Left => match self.form_field {
                4 => self.form_priority = prev_priority(self.form_priority),
                5 => self.form_category = prev_category(self.form_category),
                _ => {}
            },
            KeyCode::Right => match self.form_field {
                4 => self.form_priority = next_priority(self.form_priority),
                5 => self.form_category = next_category(self.form_category),
                _ => {}
            },
            KeyCode::Enter => {
                self.save_event();
            }
            KeyCode::Char(c) => match self.form_field {
                0 => self.form_name.push(c),
                1 => self.form_start.push(c),
                2 => self.form_end.push(c),
                3 => self.form_location.push(c),
                6 => self.form_description.push(c),
                _ => {}
            },
            KeyCode::Backspace => match self.form_field {
                0 => {
                    self.form_name.pop();
                }
                1 => {
                    self.form_start.pop();
                }
                2 => {
                    self.form_end.pop();
                }
                3 => {
                    self.form_location.pop();
                }
                6 => {
                    self.form_description.pop();
                }
                _ => {}
            },
            _ => {}
        }
    }

    // ── Subject CRUD ────────────────────────────────────────────────────────

    fn open_add_subject(&mut self) {
        self.show_subject_modal = true;
        self.subject_editing_id = None;
        self.subject_name.clear();
        self.subject_color = 0;
        self.subject_professor.clear();
        self.subject_field = 0;
    }

    fn open_edit_subject(&mut self) {
        let Some(idx) = self.subject_list_state.selected() else {
            return;
        };
        let Some(subject) = self.subjects.get(idx) else {
            return;
        };
        self.show_subject_modal = true;
        self.subject_editing_id = Some(subject.id.clone());
        self.subject_name = subject.name.clone();
        self.subject_color = SUBJECT_COLORS
            .iter()
            .position(|c| *c == subject.color)
            .unwrap_or(0);
        self.subject_professor = subject.professor.clone().unwrap_or_default();
        self.subject_field = 0;
    }

    /// Applies the subject form. Only the name is required.
    pub fn save_subject(&mut self) -> bool {
        if self.subject_name.trim().is_empty() {
            self.status_msg = "Subject name is required.".to_string();
            return false;
        }
        let color = SUBJECT_COLORS[self.subject_color % SUBJECT_COLORS.len()].to_string();
        let professor = if self.subject_professor.trim().is_empty() {
            None
        } else {
            Some(self.subject_professor.trim().to_string())
        };

        match self.subject_editing_id.clone() {
            Some(id) => {
                if let Some(s) = self.subjects.iter_mut().find(|s| s.id == id) {
                    s.name = self.subject_name.trim().to_string();
                    s.color = color;
                    s.professor = professor;
                    self.status_msg = format!("Updated subject '{}'.", s.name);
                }
            }
            None => {
                self.subjects.push(SubjectPreference::new(
                    self.subject_name.trim(),
                    color,
                    professor,
                ));
                self.status_msg = format!("Added subject '{}'.", self.subject_name.trim());
            }
        }
        self.show_subject_modal = false;
        true
    }

    fn delete_selected_subject(&mut self) {
        let Some(idx) = self.subject_list_state.selected() else {
            return;
        };
        if idx < self.subjects.len() {
            self.subjects.remove(idx);
            self.status_msg = "Subject removed.".to_string();
        }
        if self.subjects.is_empty() {
            self.subject_list_state.select(None);
        } else {
            self.subject_list_state
                .select(Some(idx.min(self.subjects.len() - 1)));
        }
    }

    fn handle_subject_modal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.show_subject_modal = false;
            }
            KeyCode::Tab => {
                self.subject_field = (self.subject_field + 1) % 3;
            }
            KeyCode::BackTab => {
                self.subject_field = if self.subject_field == 0 {
                    2
                } else {
                    self.subject_field - 1
                };
            }
            KeyCode::Left if self.subject_field == 1 => {
                self.subject_color =
                    (self.subject_color + SUBJECT_COLORS.len() - 1) % SUBJECT_COLORS.len();
            }
            KeyCode::Right if self.subject_field == 1 => {
                self.subject_color = (self.subject_color + 1) % SUBJECT_COLORS.len();
            }
            KeyCode::Enter => {
                self.save_subject();
            }
            KeyCode::Char(c) => match self.subject_field {
                0 => self.subject_name.push(c),
                2 => self.subject_professor.push(c),
                _ => {}
            },
            KeyCode::Backspace => match self.subject_field {
                0 => {
                    self.subject_name.pop();
                }
                2 => {
                    self.subject_professor.pop();
                }
                _ => {}
            },
            _ => {}
        }
    }
}

fn next_priority(p: Priority) -> Priority {
    match p {
        Priority::Low => Priority::Medium,
        Priority::Medium => Priority::High,
        Priority::High => Priority::Low,
    }
}

fn prev_priority(p: Priority) -> Priority {
    match p {
        Priority::Low => Priority::High,
        Priority::Medium => Priority::Low,
        Priority::High => Priority::Medium,
    }
}

fn next_category(c: EventCategory) -> EventCategory {
    match c {
        EventCategory::Lecture => EventCategory::Internship,
        EventCategory::Internship => EventCategory::Social,
        EventCategory::Social => EventCategory::Personal,
        EventCategory::Personal => EventCategory::Lecture,
    }
}

fn prev_category(c: EventCategory) -> EventCategory {
    match c {
        EventCategory::Lecture => EventCategory::Personal,
        EventCategory::Internship => EventCategory::Lecture,
        EventCategory::Social => EventCategory::Internship,
        EventCategory::Personal => EventCategory::Social,
    }
}

fn next_filter(f: Option<EventCategory>) -> Option<EventCategory> {
    match f {
        None => Some(EventCategory::Lecture),
        Some(EventCategory::Lecture) => Some(EventCategory::Internship),
        Some(EventCategory::Internship) => Some(EventCategory::Social),
        Some(EventCategory::Social) => Some(EventCategory::Personal),
        Some(EventCategory::Personal) => None,
    }
}

// ── Drawing ─────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, area: Rect, state: &mut ScheduleState) {
    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(area);
    let columns =
        Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)]).split(chunks[0]);

    draw_event_list(f, columns[0], state);
    draw_subject_list(f, columns[1], state);

    let filter_label = match state.filter {
        None => "all",
        Some(c) => c.label(),
    };
    let hint = if state.status_msg.is_empty() {
        format!(
            "filter: {filter_label}  [a] add  [e] edit  [d] delete  [f] filter  [←/→] pane  [j/k] move"
        )
    } else {
        format!("{}  [a] add  [e] edit  [d] delete", state.status_msg)
    };
    f.render_widget(Paragraph::new(hint).style(theme::hint_style()), chunks[1]);

    if state.show_event_modal {
        draw_event_modal(f, area, state);
    }
    if state.show_subject_modal {
        draw_subject_modal(f, area, state);
    }
}

fn draw_event_list(f: &mut Frame, area: Rect, state: &mut ScheduleState) {
    let focused = state.focus == ScheduleFocus::Events;
    let border = if focused {
        Style::default().fg(theme::ACCENT)
    } else {
        theme::dim_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(" Events ", theme::title_style()));
    let filtered = state.filtered_indices();

    let items: Vec<ListItem> = filtered
        .iter()
        .map(|&i| {
            let ev = &state.events[i];
            let mut spans = vec![
                Span::styled(
                    format!("{:<6}", ev.priority.label()),
                    Style::default().fg(priority_color(ev.priority)),
                ),
                Span::styled(
                    format!("{}-{} ", ev.start_time, ev.end_time),
                    Style::default().fg(theme::CYAN),
                ),
                Span::styled(ev.name.clone(), Style::default().fg(theme::TEXT)),
                Span::styled(format!("  @{}", ev.location), theme::dim_style()),
                Span::styled(format!("  [{}]", ev.category.label()), theme::dim_style()),
            ];
            if let Some(desc) = &ev.description {
                spans.push(Span::styled(format!("  {desc}"), theme::dim_style()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    if items.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new("No events match this filter. Press [a] to add one.")
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

fn draw_subject_list(f: &mut Frame, area: Rect, state: &mut ScheduleState) {
    let focused = state.focus == ScheduleFocus::Subjects;
    let border = if focused {
        Style::default().fg(theme::ACCENT)
    } else {
        theme::dim_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(" Subjects ", theme::title_style()));

    let items: Vec<ListItem> = state
        .subjects
        .iter()
        .map(|s| {
            let mut spans = vec![
                Span::styled("■ ", Style::default().fg(subject_color(&s.color))),
                Span::styled(s.name.clone(), Style::default().fg(theme::TEXT)),
            ];
            if let Some(prof) = &s.professor {
                spans.push(Span::styled(format!("  {prof}"), theme::dim_style()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    if items.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new("No subjects yet.").style(theme::dim_style()),
            inner,
        );
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::selected_style());
    f.render_stateful_widget(list, area, &mut state.subject_list_state);
}

fn draw_event_modal(f: &mut Frame, area: Rect, state: &ScheduleState) {
    let modal = centered_rect(56, 13, area);
    f.render_widget(Clear, modal);

    let title = if state.editing_id.is_some() {
        " Edit Event "
    } else {
        " Add Event "
    };
    let block = Block::default()
        .title(Span::styled(title, theme::title_style()))
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
            Span::styled(format!("{label:<13}"), field_style(idx)),
            Span::styled(format!("{value}\u{2588}"), Style::default().fg(theme::TEXT)),
        ])
    };

    f.render_widget(
        Paragraph::new(text_row("Name:", &state.form_name, 0)),
        rows[0],
    );
    f.render_widget(
        Paragraph::new(text_row("Start (HH:MM):", &state.form_start, 1)),
        rows[1],
    );
    f.render_widget(
        Paragraph::new(text_row("End (HH:MM):", &state.form_end, 2)),
        rows[2],
    );
    f.render_widget(
        Paragraph::new(text_row("Location:", &state.form_location, 3)),
        rows[3],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{:<13}", "Priority:"), field_style(4)),
            Span::styled(
                format!("< {} >", state.form_priority.label()),
                Style::default().fg(priority_color(state.form_priority)),
            ),
        ])),
        rows[4],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{:<13}", "Category:"), field_style(5)),
            Span::styled(
                format!("< {} >", state.form_category.label()),
                Style::default().fg(theme::TEXT),
            ),
        ])),
        rows[5],
    );
    f.render_widget(
        Paragraph::new(text_row("Description:", &state.form_description, 6)),
        rows[6],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            "[Tab] field  [←/→] cycle  [Enter] save  [Esc] cancel",
            theme::hint_style(),
        )),
        rows[7],
    );
}

fn draw_subject_modal(f: &mut Frame, area: Rect, state: &ScheduleState) {
    let modal = centered_rect(46, 9, area);
    f.render_widget(Clear, modal);

    let title = if state.subject_editing_id.is_some() {
        " Edit Subject "
    } else {
        " Add Subject "
    };
    let block = Block::default()
        .title(Span::styled(title, theme::title_style()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .padding(Padding::uniform(1));
    let inner = block.inner(modal);
    f.render_widget(block, modal);

    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(inner);

    let field_style = |idx: usize| {
        if state.subject_field == idx {
            Style::default()
                .fg(theme::CYAN)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::dim_style()
        }
    };

    let color_name = SUBJECT_COLORS[state.subject_color % SUBJECT_COLORS.len()];
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{:<12}", "Name:"), field_style(0)),
            Span::styled(
                format!("{}\u{2588}", state.subject_name),
                Style::default().fg(theme::TEXT),
            ),
        ])),
        rows[0],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{:<12}", "Color:"), field_style(1)),
            Span::styled(
                format!("< {color_name} >"),
                Style::default().fg(subject_color(color_name)),
            ),
        ])),
        rows[1],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{:<12}", "Professor:"), field_style(2)),
            Span::styled(
                format!("{}\u{2588}", state.subject_professor),
                Style::default().fg(theme::TEXT),
            ),
        ])),
        rows[2],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            "[Tab] field  [←/→] color  [Enter] save  [Esc] cancel",
            theme::hint_style(),
        )),
        rows[3],
    );
}

fn priority_color(p: Priority) -> Color {
    match p {
        Priority::High => theme::RED,
        Priority::Medium => theme::YELLOW,
        Priority::Low => theme::GREEN,
    }
}

fn subject_color(name: &str) -> Color {
    match name {
        "blue" => theme::ACCENT,
        "purple" => theme::PURPLE,
        "green" => theme::GREEN,
        "orange" => theme::YELLOW,
        "pink" => theme::RED,
        _ => theme::TEXT,
    }
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

    fn fill_event_form(state: &mut ScheduleState, name: &str) {
        state.form_name = name.to_string();
        state.form_start = "10:00".to_string();
        state.form_end = "11:00".to_string();
        state.form_location = "Dadar".to_string();
    }

    #[test]
    fn test_seeded_day() {
        let state = ScheduleState::new();
        assert_eq!(state.events.len(), 3);
        assert_eq!(state.subjects.len(), 2);
        assert_eq!(state.events[0].name, "Morning Lecture");
        assert_eq!(state.events[2].category, EventCategory::Internship);
    }

    #[test]
    fn test_save_event_adds_when_not_editing() {
        let mut state = ScheduleState::new();
        state.show_event_modal = true;
        fill_event_form(&mut state, "Study Group");
        assert!(state.save_event());
        assert_eq!(state.events.len(), 4);
        assert!(!state.show_event_modal);
        assert_eq!(state.events[3].name, "Study Group");
    }

    #[test]
    fn test_save_event_rejects_blank_required_fields() {
        let mut state = ScheduleState::new();
        state.show_event_modal = true;
        fill_event_form(&mut state, "   ");
        assert!(!state.save_event());
        assert_eq!(state.events.len(), 3);
        assert!(state.show_event_modal, "modal stays open on validation failure");
        assert!(!state.status_msg.is_empty());
    }

    #[test]
    fn test_save_event_edits_in_place() {
        let mut state = ScheduleState::new();
        let id = state.events[0].id.clone();
        state.editing_id = Some(id.clone());
        fill_event_form(&mut state, "Morning Lecture (moved)");
        assert!(state.save_event());
        assert_eq!(state.events.len(), 3);
        assert_eq!(state.events[0].id, id);
        assert_eq!(state.events[0].name, "Morning Lecture (moved)");
        assert_eq!(state.events[0].start_time, "10:00");
    }

    #[test]
    fn test_save_event_for_deleted_id_changes_nothing() {
        let mut state = ScheduleState::new();
        let id = state.events[0].id.clone();
        state.delete_event(&id);
        assert_eq!(state.events.len(), 2);

        state.editing_id = Some(id);
        fill_event_form(&mut state, "Ghost");
        assert!(state.save_event());
        assert_eq!(state.events.len(), 2);
        assert!(state.events.iter().all(|e| e.name != "Ghost"));
    }

    #[test]
    fn test_delete_event_is_idempotent() {
        let mut state = ScheduleState::new();
        let id = state.events[1].id.clone();
        state.delete_event(&id);
        assert_eq!(state.events.len(), 2);
        state.delete_event(&id);
        assert_eq!(state.events.len(), 2);
    }

    #[test]
    fn test_filter_narrows_event_list() {
        let mut state = ScheduleState::new();
        assert_eq!(state.filtered_indices().len(), 3);
        state.filter = Some(EventCategory::Lecture);
        assert_eq!(state.filtered_indices(), vec![0, 1]);
        state.filter = Some(EventCategory::Social);
        assert!(state.filtered_indices().is_empty());
    }

    #[test]
    fn test_save_subject_requires_name() {
        let mut state = ScheduleState::new();
        state.show_subject_modal = true;
        state.subject_name = "  ".to_string();
        assert!(!state.save_subject());
        assert_eq!(state.subjects.len(), 2);

        state.subject_name = "Statistics".to_string();
        state.subject_color = 2;
        assert!(state.save_subject());
        assert_eq!(state.subjects.len(), 3);
        assert_eq!(state.subjects[2].color, "green");
        assert!(state.subjects[2].professor.is_none());
    }

    #[test]
    fn test_subject_edit_updates_in_place() {
        let mut state = ScheduleState::new();
        let id = state.subjects[0].id.clone();
        state.subject_editing_id = Some(id.clone());
        state.subject_name = "Advanced Mathematics II".to_string();
        state.subject_color = 3;
        state.subject_professor = "Dr. Sharma".to_string();
        assert!(state.save_subject());
        assert_eq!(state.subjects.len(), 2);
        assert_eq!(state.subjects[0].id, id);
        assert_eq!(state.subjects[0].color, "orange");
    }
}
