//! Event system: crossterm polling, tick timers, recruiting agent workers.

use agentdeck_bridge::AgentBridge;
use agentdeck_types::agent::{BroadcastReport, PostingReview, ResumeReview};
use agentdeck_types::record::Candidate;
use ratatui::crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use serde_json::Value;
use std::sync::mpsc;
use std::time::Duration;
use tracing::warn;

/// Unified application event.
pub enum AppEvent {
    /// A crossterm key press event (filtered to Press only).
    Key(KeyEvent),
    /// Periodic tick for animations (spinners, etc.).
    Tick,
    /// One-minute heartbeat that refreshes the header clock.
    ClockTick,
    /// Screening result for a submitted resume.
    ScreeningDone {
        name: String,
        email: String,
        role: String,
        review: Box<ResumeReview>,
    },
    /// Screening call failed or the agent refused it.
    ScreeningFailed { name: String, error: String },
    /// First leg of the posting flow succeeded.
    PostingOptimized {
        id: String,
        review: Box<PostingReview>,
    },
    /// Optimize call failed; the posting stays Draft.
    OptimizeFailed { id: String, error: String },
    /// Second leg succeeded; the posting is out on the channels.
    BroadcastDone {
        id: String,
        report: Box<BroadcastReport>,
    },
    /// Broadcast failed; the posting stays Optimized.
    BroadcastFailed { id: String, error: String },
    /// Outreach agent turn for the engagement feed.
    OutreachReply(String),
    /// Outreach call failed.
    OutreachFailed(String),
}

/// Spawn the crossterm polling + tick thread. Returns sender + receiver.
pub fn spawn_event_thread(
    tick_rate: Duration,
) -> (mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>) {
    let (tx, rx) = mpsc::channel();
    let poll_tx = tx.clone();

    std::thread::spawn(move || {
        loop {
            if event::poll(tick_rate).unwrap_or(false) {
                if let Ok(ev) = event::read() {
                    let sent = match ev {
                        // Only forward Press events. Windows also delivers
                        // Release and Repeat, which doubles keystrokes.
                        CtEvent::Key(key) if key.kind == KeyEventKind::Press => {
                            poll_tx.send(AppEvent::Key(key))
                        }
                        _ => Ok(()),
                    };
                    if sent.is_err() {
                        break;
                    }
                }
            } else {
                // No input within tick_rate, send a tick for animations
                if poll_tx.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        }
    });

    (tx, rx)
}

/// Wall-clock heartbeat. Fires once a minute so the header clock stays honest.
pub fn spawn_clock_thread(tx: mpsc::Sender<AppEvent>) {
    std::thread::spawn(move || loop {
        std::thread::sleep(Duration::from_secs(60));
        if tx.send(AppEvent::ClockTick).is_err() {
            break;
        }
    });
}

/// Score one resume on a background thread.
///
/// The form fields travel through the worker and come back in the
/// completion event, so the UI never has to hold a pending draft.
pub fn spawn_screen_resume(
    bridge: AgentBridge,
    agent_id: String,
    prompt: String,
    name: String,
    email: String,
    role: String,
    tx: mpsc::Sender<AppEvent>,
) {
    std::thread::spawn(move || match bridge.call(&prompt, &agent_id) {
        Ok(reply) if reply.is_success() => {
            // Tolerant decode: a missing score reads as 0, an unknown
            // verdict as Review
            let review: ResumeReview = serde_json::from_value(reply.result).unwrap_or_default();
            let _ = tx.send(AppEvent::ScreeningDone {
                name,
                email,
                role,
                review: Box::new(review),
            });
        }
        Ok(reply) => {
            warn!(status = %reply.status, "Screening agent refused the resume");
            let _ = tx.send(AppEvent::ScreeningFailed {
                name,
                error: format!("Screening agent returned status '{}'", reply.status),
            });
        }
        Err(e) => {
            let _ = tx.send(AppEvent::ScreeningFailed {
                name,
                error: e.to_string(),
            });
        }
    });
}

/// Run the two-leg posting flow: optimize, then broadcast the optimized
/// copy. Each leg reports its own event, and a failed second leg leaves
/// the first leg's effect in place; nothing is rolled back.
pub fn spawn_publish_posting(
    bridge: AgentBridge,
    agent_id: String,
    posting_id: String,
    title: String,
    body: String,
    prompt: String,
    tx: mpsc::Sender<AppEvent>,
) {
    std::thread::spawn(move || {
        let review: PostingReview = match bridge.call(&prompt, &agent_id) {
            Ok(reply) if reply.is_success() => {
                serde_json::from_value(reply.result).unwrap_or_default()
            }
            Ok(reply) => {
                warn!(status = %reply.status, "Posting agent refused the optimize");
                let _ = tx.send(AppEvent::OptimizeFailed {
                    id: posting_id,
                    error: format!("Posting agent returned status '{}'", reply.status),
                });
                return;
            }
            Err(e) => {
                let _ = tx.send(AppEvent::OptimizeFailed {
                    id: posting_id,
                    error: e.to_string(),
                });
                return;
            }
        };
        let _ = tx.send(AppEvent::PostingOptimized {
            id: posting_id.clone(),
            review: Box::new(review.clone()),
        });

        // Broadcast whatever the optimizer produced, falling back to the
        // entered copy when it returned nothing usable
        let out_title = if review.optimized_title.trim().is_empty() {
            &title
        } else {
            &review.optimized_title
        };
        let out_body = if review.optimized_body.trim().is_empty() {
            &body
        } else {
            &review.optimized_body
        };
        let broadcast_prompt = format!(
            "Broadcast this job posting to all our sourcing channels (LinkedIn, job boards, \
             referral network) and confirm where it went out. Title: {out_title}. \
             Posting: {out_body}"
        );
        match bridge.call(&broadcast_prompt, &agent_id) {
            Ok(reply) if reply.is_success() => {
                let report: BroadcastReport =
                    serde_json::from_value(reply.result).unwrap_or_default();
                let _ = tx.send(AppEvent::BroadcastDone {
                    id: posting_id,
                    report: Box::new(report),
                });
            }
            Ok(reply) => {
                warn!(status = %reply.status, "Posting agent refused the broadcast");
                let _ = tx.send(AppEvent::BroadcastFailed {
                    id: posting_id,
                    error: format!("Posting agent returned status '{}'", reply.status),
                });
            }
            Err(e) => {
                let _ = tx.send(AppEvent::BroadcastFailed {
                    id: posting_id,
                    error: e.to_string(),
                });
            }
        }
    });
}

/// Send one outreach draft to the engagement agent.
pub fn spawn_send_outreach(
    bridge: AgentBridge,
    agent_id: String,
    prompt: String,
    tx: mpsc::Sender<AppEvent>,
) {
    std::thread::spawn(move || match bridge.call(&prompt, &agent_id) {
        Ok(reply) if reply.is_success() => {
            let _ = tx.send(AppEvent::OutreachReply(reply_text(&reply.result)));
        }
        Ok(reply) => {
            let _ = tx.send(AppEvent::OutreachFailed(format!(
                "Outreach agent returned status '{}'",
                reply.status
            )));
        }
        Err(e) => {
            let _ = tx.send(AppEvent::OutreachFailed(e.to_string()));
        }
    });
}

/// Prefer a conversational text field; fall back to raw text, then to
/// pretty-printed JSON so the feed always shows something.
pub(crate) fn reply_text(result: &Value) -> String {
    for key in ["message", "response", "summary"] {
        if let Some(text) = result[key].as_str() {
            if !text.trim().is_empty() {
                return text.to_string();
            }
        }
    }
    if let Some(text) = result.as_str() {
        return text.to_string();
    }
    serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string())
}

/// Build the display record for a screened candidate.
pub(crate) fn candidate_from_review(
    name: String,
    email: String,
    role: String,
    review: ResumeReview,
) -> Candidate {
    Candidate::new(
        name,
        email,
        role,
        review.score,
        review.verdict,
        review.skills,
        review.reasoning,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdeck_types::record::Verdict;
    use serde_json::json;

    #[test]
    fn test_reply_text_prefers_message_field() {
        let result = json!({"message": "Drafted the follow-up email.", "tone": "warm"});
        assert_eq!(reply_text(&result), "Drafted the follow-up email.");
    }

    #[test]
    fn test_reply_text_walks_fallback_keys() {
        let result = json!({"message": " ", "summary": "Reached out on LinkedIn."});
        assert_eq!(reply_text(&result), "Reached out on LinkedIn.");
    }

    #[test]
    fn test_reply_text_passes_plain_strings_through() {
        assert_eq!(reply_text(&json!("Sent.")), "Sent.");
    }

    #[test]
    fn test_reply_text_falls_back_to_pretty_json() {
        let text = reply_text(&json!({"channels": ["LinkedIn"]}));
        assert!(text.contains("channels"));
        assert!(text.contains('\n'), "expected pretty-printed JSON: {text}");
    }

    #[test]
    fn test_candidate_from_empty_review_defaults() {
        let review: ResumeReview = serde_json::from_value(json!({})).unwrap();
        let candidate = candidate_from_review(
            "Asha Patel".to_string(),
            "asha@example.com".to_string(),
            "Backend Engineer".to_string(),
            review,
        );
        assert_eq!(candidate.score, 0.0);
        assert_eq!(candidate.verdict, Verdict::Review);
        assert!(candidate.skills.is_empty());
        assert!(!candidate.id.is_empty());
    }

    #[test]
    fn test_candidate_from_review_copies_agent_fields() {
        let review = ResumeReview {
            score: 87.0,
            verdict: Verdict::Schedule,
            skills: vec!["Rust".to_string(), "Redis".to_string()],
            reasoning: "Strong systems background.".to_string(),
        };
        let candidate = candidate_from_review(
            "Ravi Nair".to_string(),
            "ravi@example.com".to_string(),
            "Platform Engineer".to_string(),
            review,
        );
        assert_eq!(candidate.score, 87.0);
        assert_eq!(candidate.verdict, Verdict::Schedule);
        assert_eq!(candidate.skills, vec!["Rust", "Redis"]);
        assert_eq!(candidate.role, "Platform Engineer");
    }
}
