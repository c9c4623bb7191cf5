//! Display records owned by individual console screens.
//!
//! Every record here is screen-local, in-memory state: lists are mutated
//! only by the screen that owns them and nothing survives process exit.
//! There is no referential integrity between record kinds.

use chrono::{DateTime, Local, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority of a schedule event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can slip without consequence.
    Low,
    /// Should happen on time.
    Medium,
    /// Must not be missed.
    High,
}

impl Priority {
    /// Short display label.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// What kind of commitment a schedule event is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    /// A class or lecture.
    Lecture,
    /// Internship work or meetings.
    Internship,
    /// Social plans.
    Social,
    /// Everything personal.
    Personal,
}

impl EventCategory {
    /// Short display label.
    pub fn label(&self) -> &'static str {
        match self {
            EventCategory::Lecture => "lecture",
            EventCategory::Internship => "internship",
            EventCategory::Social => "social",
            EventCategory::Personal => "personal",
        }
    }
}

/// One entry in the day schedule.
///
/// Times are plain "HH:MM" text exactly as typed into the form; no
/// overlap or ordering invariant is enforced across the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    /// Unique id, used for edit/delete targeting.
    pub id: String,
    /// Event name shown in the list.
    pub name: String,
    /// Start time as "HH:MM" text.
    pub start_time: String,
    /// End time as "HH:MM" text.
    pub end_time: String,
    /// Where the event happens.
    pub location: String,
    /// How important the event is.
    pub priority: Priority,
    /// What kind of event it is.
    pub category: EventCategory,
    /// Optional free-text detail line.
    pub description: Option<String>,
}

impl ScheduleEvent {
    /// Create an event with a fresh id.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        location: impl Into<String>,
        priority: Priority,
        category: EventCategory,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            location: location.into(),
            priority,
            category,
            description,
        }
    }
}

/// A subject the student is enrolled in, used to color schedule entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectPreference {
    /// Unique id, used for edit targeting.
    pub id: String,
    /// Subject name.
    pub name: String,
    /// Accent color name (matched against the app palette by name).
    pub color: String,
    /// Who teaches it, when known.
    pub professor: Option<String>,
}

impl SubjectPreference {
    /// Create a subject with a fresh id.
    pub fn new(name: impl Into<String>, color: impl Into<String>, professor: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
            professor,
        }
    }
}

/// Screening verdict for a candidate, echoed verbatim from the agent.
///
/// Unrecognized verdict strings fold into `Review`: the screening flow
/// treats "the agent said something new" the same as "the agent said to
/// take another look".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verdict {
    /// Not a fit.
    Reject,
    /// Move straight to interview scheduling.
    Schedule,
    /// Needs a human pass.
    #[default]
    #[serde(other)]
    Review,
}

impl Verdict {
    /// Short display label.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Reject => "Reject",
            Verdict::Review => "Review",
            Verdict::Schedule => "Schedule",
        }
    }
}

/// A screened candidate. Append-only: never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique id.
    pub id: String,
    /// Candidate name as entered in the screening form.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Role they applied for.
    pub role: String,
    /// Numeric fit score (0-100) from the screening agent.
    pub score: f64,
    /// Screening verdict from the agent.
    pub verdict: Verdict,
    /// Skills the agent pulled out of the resume.
    pub skills: Vec<String>,
    /// Free-text reasoning from the agent.
    pub reasoning: String,
    /// When the resume was submitted for screening.
    pub submitted_at: DateTime<Local>,
}

impl Candidate {
    /// Record a screening result with a fresh id, dated now.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        score: f64,
        verdict: Verdict,
        skills: Vec<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            role: role.into(),
            score,
            verdict,
            skills,
            reasoning: reasoning.into(),
            submitted_at: Local::now(),
        }
    }
}

/// Direction of a wallet transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxDirection {
    /// Money in.
    Credit,
    /// Money out.
    Debit,
}

/// One line in the wallet ledger.
///
/// The ledger is append-only (newest first) and the displayed balance is
/// tracked separately by the wallet screen; the two stay consistent only
/// because every write path updates both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransaction {
    /// Unique id.
    pub id: String,
    /// Credit or debit.
    pub direction: TxDirection,
    /// Amount in whole rupees, always positive; direction carries the sign.
    pub amount: i64,
    /// Human description ("Ride booking - Rapido Bike").
    pub description: String,
    /// When the transaction happened.
    pub timestamp: DateTime<Local>,
    /// Marketplace provider for ride debits, when applicable.
    pub provider: Option<String>,
}

impl WalletTransaction {
    /// Create a credit entry dated now.
    pub fn credit(amount: i64, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            direction: TxDirection::Credit,
            amount,
            description: description.into(),
            timestamp: Local::now(),
            provider: None,
        }
    }

    /// Create a debit entry dated now.
    pub fn debit(amount: i64, description: impl Into<String>, provider: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            direction: TxDirection::Debit,
            amount,
            description: description.into(),
            timestamp: Local::now(),
            provider,
        }
    }
}

/// Severity of an activity log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    /// Routine progress.
    Info,
    /// Something degraded but the flow continued.
    Warn,
    /// A call failed outright.
    Error,
}

impl LogSeverity {
    /// Short display label.
    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Info => "info",
            LogSeverity::Warn => "warn",
            LogSeverity::Error => "error",
        }
    }
}

/// One line in the agent activity feed. Display only; grows unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentLog {
    /// When the line was appended.
    pub timestamp: DateTime<Local>,
    /// Which agent (or flow) produced it.
    pub agent: String,
    /// The line itself.
    pub message: String,
    /// How bad it is.
    pub severity: LogSeverity,
}

impl AgentLog {
    /// Append-ready info line dated now.
    pub fn info(agent: impl Into<String>, message: impl Into<String>) -> Self {
        Self::entry(agent, message, LogSeverity::Info)
    }

    /// Append-ready warn line dated now.
    pub fn warn(agent: impl Into<String>, message: impl Into<String>) -> Self {
        Self::entry(agent, message, LogSeverity::Warn)
    }

    /// Append-ready error line dated now.
    pub fn error(agent: impl Into<String>, message: impl Into<String>) -> Self {
        Self::entry(agent, message, LogSeverity::Error)
    }

    fn entry(agent: impl Into<String>, message: impl Into<String>, severity: LogSeverity) -> Self {
        Self {
            timestamp: Local::now(),
            agent: agent.into(),
            message: message.into(),
            severity,
        }
    }
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person at the keyboard.
    User,
    /// The agent on the other side of the bridge.
    Assistant,
}

/// One message in a chat-style feed. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote it.
    pub role: ChatRole,
    /// The message body.
    pub content: String,
    /// When it was appended.
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    /// Create a user message dated now.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Local::now(),
        }
    }

    /// Create an assistant message dated now.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Local::now(),
        }
    }
}

/// Ride marketplace provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideProvider {
    /// Rapido bikes and autos.
    Rapido,
    /// Uber cars and motos.
    Uber,
}

impl RideProvider {
    /// Brand name for display.
    pub fn label(&self) -> &'static str {
        match self {
            RideProvider::Rapido => "Rapido",
            RideProvider::Uber => "Uber",
        }
    }
}

/// One bookable option returned by the mock ride search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideOption {
    /// Which marketplace the option comes from.
    pub provider: RideProvider,
    /// Vehicle type ("Bike", "UberGo", ...).
    pub vehicle: String,
    /// Fare in whole rupees.
    pub price: i64,
    /// Pickup estimate as display text ("5 mins").
    pub eta: String,
    /// Trip distance as display text ("8.2 km").
    pub distance: String,
}

/// Running state of a tracked local train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrainState {
    /// Running to timetable.
    OnTime,
    /// Behind timetable.
    Delayed,
    /// Pulling into the next station.
    Approaching,
}

impl TrainState {
    /// Short display label.
    pub fn label(&self) -> &'static str {
        match self {
            TrainState::OnTime => "on time",
            TrainState::Delayed => "delayed",
            TrainState::Approaching => "approaching",
        }
    }
}

/// Live position snapshot for one local train.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainStatus {
    /// Train number ("12345").
    pub number: String,
    /// Service name ("Western Line Local").
    pub name: String,
    /// Where the train is right now.
    pub current_location: String,
    /// Next stop.
    pub next_station: String,
    /// Arrival estimate as display text.
    pub estimated_arrival: String,
    /// Minutes behind timetable.
    pub delay_minutes: i64,
    /// Platform at the next stop, when known.
    pub platform: Option<String>,
    /// Running state.
    pub state: TrainState,
}

/// A timed hydration nudge on the wellness board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrationReminder {
    /// Stable id, used when dismissing.
    pub id: String,
    /// When the nudge fires.
    pub time: NaiveTime,
    /// Why this moment matters ("Lecture session start; ...").
    pub reason: String,
    /// How insistent the nudge is.
    pub urgency: Priority,
}

impl HydrationReminder {
    /// Builds a reminder with a fresh id.
    pub fn new(time: NaiveTime, reason: impl Into<String>, urgency: Priority) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            time,
            reason: reason.into(),
            urgency,
        }
    }
}

/// Lifecycle of a job posting in the recruiting console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingStatus {
    /// Entered but not yet touched by an agent.
    Draft,
    /// Rewritten by the optimizer agent.
    Optimized,
    /// Published to the sourcing channels.
    Broadcast,
}

impl PostingStatus {
    /// Short display label.
    pub fn label(&self) -> &'static str {
        match self {
            PostingStatus::Draft => "draft",
            PostingStatus::Optimized => "optimized",
            PostingStatus::Broadcast => "broadcast",
        }
    }
}

/// A job posting moving through the optimize/broadcast flow.
///
/// The status advances one call at a time and is never rolled back: a
/// failed broadcast leaves the posting `Optimized`, which is exactly what
/// the activity log will show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    /// Unique id.
    pub id: String,
    /// Role title as entered.
    pub title: String,
    /// Raw description as entered.
    pub body: String,
    /// Hiring location as entered (may be empty).
    pub location: String,
    /// Salary range as entered (may be empty).
    pub salary: String,
    /// Where the posting is in the flow.
    pub status: PostingStatus,
    /// Agent-rewritten copy, present once optimized.
    pub optimized_copy: Option<String>,
    /// Improvement notes from the optimizer.
    pub improvements: Vec<String>,
    /// Channels the broadcast agent reported posting to.
    pub channels: Vec<String>,
    /// When the posting was entered.
    pub created_at: DateTime<Local>,
}

impl JobPosting {
    /// Create a draft posting with a fresh id, dated now.
    pub fn draft(
        title: impl Into<String>,
        body: impl Into<String>,
        location: impl Into<String>,
        salary: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            body: body.into(),
            location: location.into(),
            salary: salary.into(),
            status: PostingStatus::Draft,
            optimized_copy: None,
            improvements: Vec::new(),
            channels: Vec::new(),
            created_at: Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_event_new_assigns_unique_ids() {
        let a = ScheduleEvent::new(
            "Morning Lecture",
            "09:00",
            "11:00",
            "Churchgate",
            Priority::High,
            EventCategory::Lecture,
            None,
        );
        let b = ScheduleEvent::new(
            "Morning Lecture",
            "09:00",
            "11:00",
            "Churchgate",
            Priority::High,
            EventCategory::Lecture,
            None,
        );
        assert_ne!(a.id, b.id);
        assert_eq!(a.priority.label(), "high");
        assert_eq!(a.category.label(), "lecture");
    }

    #[test]
    fn test_wallet_transaction_ctors() {
        let credit = WalletTransaction::credit(1000, "Top-up");
        assert_eq!(credit.direction, TxDirection::Credit);
        assert_eq!(credit.amount, 1000);
        assert!(credit.provider.is_none());

        let debit = WalletTransaction::debit(120, "Ride booking - UberGo", Some("Uber".into()));
        assert_eq!(debit.direction, TxDirection::Debit);
        assert_eq!(debit.provider.as_deref(), Some("Uber"));
    }

    #[test]
    fn test_verdict_unknown_string_folds_into_review() {
        let v: Verdict = serde_json::from_value(serde_json::json!("Strong Hire")).unwrap();
        assert_eq!(v, Verdict::Review);
        let v: Verdict = serde_json::from_value(serde_json::json!("Schedule")).unwrap();
        assert_eq!(v, Verdict::Schedule);
    }

    #[test]
    fn test_train_state_serde_kebab() {
        let json = serde_json::to_value(TrainState::OnTime).unwrap();
        assert_eq!(json, "on-time");
        let state: TrainState = serde_json::from_value(serde_json::json!("approaching")).unwrap();
        assert_eq!(state, TrainState::Approaching);
    }

    #[test]
    fn test_agent_log_ctors_set_severity() {
        assert_eq!(AgentLog::info("screening", "ok").severity, LogSeverity::Info);
        assert_eq!(AgentLog::warn("screening", "hm").severity, LogSeverity::Warn);
        assert_eq!(AgentLog::error("screening", "no").severity, LogSeverity::Error);
    }

    #[test]
    fn test_posting_draft_starts_clean() {
        let posting = JobPosting::draft("Backend Engineer", "Build APIs", "Mumbai", "18-24 LPA");
        assert_eq!(posting.status, PostingStatus::Draft);
        assert!(posting.optimized_copy.is_none());
        assert!(posting.improvements.is_empty());
        assert!(posting.channels.is_empty());
    }

    #[test]
    fn test_hydration_reminder_new_assigns_id() {
        let time = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
        let a = HydrationReminder::new(time, "Lecture session start", Priority::Medium);
        let b = HydrationReminder::new(time, "Lecture session start", Priority::Medium);
        assert_ne!(a.id, b.id);
        assert_eq!(a.urgency, Priority::Medium);
    }
}
