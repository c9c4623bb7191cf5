//! Payload shapes returned by the remote agents.
//!
//! The agents return free-form JSON with no schema contract, so every
//! struct here deserializes tolerantly: all fields default when absent
//! and unrecognized enum strings fold into a catch-all. A payload that
//! fails to parse wholesale is handled by the caller (typically by
//! falling back to `Default` and showing the raw text), never by
//! surfacing a parse error to the user.

use serde::{Deserialize, Serialize};

/// Confidence band attached to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// The agent is sure.
    High,
    /// The agent hedged.
    Medium,
    /// The agent is guessing.
    Low,
    /// Absent or a string the agent invented.
    #[default]
    #[serde(other)]
    Unknown,
}

impl Confidence {
    /// Uppercase badge text.
    pub fn label(&self) -> &'static str {
        match self {
            Confidence::High => "HIGH",
            Confidence::Medium => "MEDIUM",
            Confidence::Low => "LOW",
            Confidence::Unknown => "N/A",
        }
    }
}

/// The headline recommendation of a daily briefing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnifiedRecommendation {
    /// One-paragraph summary of what to do now.
    pub summary: String,
    /// The single next action.
    pub primary_action: String,
    /// Why the agent recommends it.
    pub reasoning: String,
    /// How confident the agent is.
    pub confidence_level: Confidence,
}

/// Door-to-door transport recommendation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportPlan {
    /// The route to take.
    pub recommended_route: String,
    /// Mode of travel ("train", "auto", ...).
    pub mode: String,
    /// When to leave.
    pub departure_time: String,
    /// Arrival estimate.
    pub eta: String,
    /// Fare estimate in rupees.
    pub cost: f64,
    /// Safety assessment of the route.
    pub safety_level: String,
    /// Backup routes.
    pub alternatives: Vec<String>,
}

/// How the day's calendar looks after coordination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleOverview {
    /// Upcoming commitments in order.
    pub next_events: Vec<String>,
    /// Clashes the agent already resolved.
    pub conflicts_resolved: Vec<String>,
    /// How much slack is left between events.
    pub buffer_status: String,
}

/// Wellness nudges for the day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WellnessAlerts {
    /// Things to do right now.
    pub immediate_actions: Vec<String>,
    /// Reminders queued for later.
    pub scheduled_reminders: Vec<String>,
    /// Overall wellness score, 0-100.
    pub wellness_score: f64,
}

/// Safety assessment for the day's plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyNotes {
    /// One-line overall assessment.
    pub overall_safety: String,
    /// Precautions worth taking.
    pub key_precautions: Vec<String>,
    /// Whether emergency contacts are set up.
    pub emergency_contacts_ready: bool,
}

/// Group-travel and meetup options the agent found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialOpportunities {
    /// Whether friends are travelling the same way.
    pub group_travel_available: bool,
    /// Where to meet them.
    pub meeting_points: Vec<String>,
    /// How the agent suggests coordinating.
    pub coordination_notes: String,
}

/// One conflict the agent had to trade off while planning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeOff {
    /// What clashed.
    pub conflict_type: String,
    /// The options considered.
    pub options: Vec<String>,
    /// The option the agent picked.
    pub chosen_option: String,
    /// Why it picked that one.
    pub rationale: String,
}

/// Full coordinator briefing: everything the daily-ops agent plans at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyBriefing {
    /// The headline recommendation.
    pub unified_recommendation: UnifiedRecommendation,
    /// How to get there.
    pub transport_plan: TransportPlan,
    /// The day's calendar after coordination.
    pub schedule_overview: ScheduleOverview,
    /// Wellness nudges.
    pub wellness_alerts: WellnessAlerts,
    /// Safety assessment.
    pub safety_notes: SafetyNotes,
    /// Group-travel options.
    pub social_opportunities: SocialOpportunities,
    /// Conflicts the agent traded off.
    pub conflicts_and_tradeoffs: Vec<TradeOff>,
    /// User preferences the agent says it honored.
    pub user_preferences_applied: Vec<String>,
    /// Overall plan confidence, 0-100.
    pub overall_confidence_score: f64,
}

/// Screening result for one resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeReview {
    /// Fit score, 0-100. Absent scores read as 0.
    pub score: f64,
    /// Reject / Review / Schedule, folding unknown strings into Review.
    pub verdict: crate::record::Verdict,
    /// Skills pulled from the resume.
    pub skills: Vec<String>,
    /// Free-text reasoning.
    pub reasoning: String,
}

/// Optimizer result for one job posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostingReview {
    /// Rewritten title.
    pub optimized_title: String,
    /// Rewritten posting copy.
    pub optimized_body: String,
    /// What the optimizer changed and why.
    pub improvements: Vec<String>,
}

/// Broadcast confirmation for one job posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastReport {
    /// Channels the posting went out to.
    pub channels: Vec<String>,
    /// One-line confirmation text.
    pub confirmation: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Verdict;
    use serde_json::json;

    #[test]
    fn test_resume_review_missing_fields_default() {
        let review: ResumeReview = serde_json::from_value(json!({})).unwrap();
        assert_eq!(review.score, 0.0);
        assert_eq!(review.verdict, Verdict::Review);
        assert!(review.skills.is_empty());
        assert!(review.reasoning.is_empty());
    }

    #[test]
    fn test_resume_review_full_payload() {
        let review: ResumeReview = serde_json::from_value(json!({
            "score": 87,
            "verdict": "Schedule",
            "skills": ["Rust", "SQL"],
            "reasoning": "Strong systems background."
        }))
        .unwrap();
        assert_eq!(review.score, 87.0);
        assert_eq!(review.verdict, Verdict::Schedule);
        assert_eq!(review.skills, vec!["Rust", "SQL"]);
    }

    #[test]
    fn test_briefing_partial_payload_keeps_present_subtrees() {
        let briefing: DailyBriefing = serde_json::from_value(json!({
            "unified_recommendation": {
                "summary": "Leave by 8:10 to make the 9 AM lecture.",
                "confidence_level": "high"
            },
            "transport_plan": { "mode": "train", "cost": 45 }
        }))
        .unwrap();
        assert_eq!(
            briefing.unified_recommendation.summary,
            "Leave by 8:10 to make the 9 AM lecture."
        );
        assert_eq!(briefing.unified_recommendation.confidence_level, Confidence::High);
        // Absent within a present subtree still defaults.
        assert!(briefing.unified_recommendation.primary_action.is_empty());
        assert_eq!(briefing.transport_plan.cost, 45.0);
        // Whole absent subtrees default too.
        assert!(briefing.schedule_overview.next_events.is_empty());
        assert_eq!(briefing.wellness_alerts.wellness_score, 0.0);
    }

    #[test]
    fn test_confidence_unknown_string_folds() {
        let c: Confidence = serde_json::from_value(json!("very high")).unwrap();
        assert_eq!(c, Confidence::Unknown);
        assert_eq!(c.label(), "N/A");
    }

    #[test]
    fn test_empty_briefing_is_default() {
        let briefing: DailyBriefing = serde_json::from_value(json!({})).unwrap();
        assert_eq!(briefing, DailyBriefing::default());
    }
}
