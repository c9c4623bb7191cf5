//! Event system: crossterm polling, tick timers, coordinator worker threads.

use agentdeck_bridge::AgentBridge;
use agentdeck_types::agent::DailyBriefing;
use agentdeck_types::record::{RideOption, RideProvider, TrainState, TrainStatus};
use chrono::Local;
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
    /// Morning briefing arrived from the coordinator.
    BriefingLoaded(Box<DailyBriefing>),
    /// Briefing call failed or the coordinator refused it.
    BriefingFailed(String),
    /// Assistant turn for the chat feed.
    ChatReply(String),
    /// Chat call failed.
    ChatFailed(String),
    /// Mock ride search finished.
    RidesLoaded(Vec<RideOption>),
    /// Live train snapshot is ready.
    TrainLoaded(TrainStatus),
    /// Train tracking call failed.
    TrainFailed(String),
    /// M-Indicator style status check came back.
    IndicatorReply(String),
    /// M-Indicator style status check failed.
    IndicatorFailed(String),
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

/// Ask the coordinator for the morning briefing in a background thread.
pub fn spawn_fetch_briefing(
    bridge: AgentBridge,
    agent_id: String,
    prompt: String,
    tx: mpsc::Sender<AppEvent>,
) {
    std::thread::spawn(move || match bridge.call(&prompt, &agent_id) {
        Ok(reply) if reply.is_success() => {
            // Tolerant decode: missing or mistyped sections become defaults
            let briefing: DailyBriefing = serde_json::from_value(reply.result).unwrap_or_default();
            let _ = tx.send(AppEvent::BriefingLoaded(Box::new(briefing)));
        }
        Ok(reply) => {
            warn!(status = %reply.status, "Coordinator refused the briefing");
            let _ = tx.send(AppEvent::BriefingFailed(format!(
                "Coordinator returned status '{}'",
                reply.status
            )));
        }
        Err(e) => {
            let _ = tx.send(AppEvent::BriefingFailed(e.to_string()));
        }
    });
}

/// Send one chat turn to the coordinator and summarize the reply.
pub fn spawn_send_chat(
    bridge: AgentBridge,
    agent_id: String,
    prompt: String,
    tx: mpsc::Sender<AppEvent>,
) {
    std::thread::spawn(move || match bridge.call(&prompt, &agent_id) {
        Ok(reply) if reply.is_success() => {
            let _ = tx.send(AppEvent::ChatReply(reply_text(&reply.result)));
        }
        Ok(reply) => {
            let _ = tx.send(AppEvent::ChatFailed(format!(
                "Coordinator returned status '{}'",
                reply.status
            )));
        }
        Err(e) => {
            let _ = tx.send(AppEvent::ChatFailed(e.to_string()));
        }
    });
}

/// Mock ride search. The marketplace adapters are not wired up, so this
/// sleeps briefly and returns a fixed quote sheet.
pub fn spawn_search_rides(tx: mpsc::Sender<AppEvent>) {
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_secs(1));
        let _ = tx.send(AppEvent::RidesLoaded(mock_rides()));
    });
}

/// Ask the coordinator to track the next local and normalize the answer.
pub fn spawn_track_train(
    bridge: AgentBridge,
    agent_id: String,
    prompt: String,
    tx: mpsc::Sender<AppEvent>,
) {
    std::thread::spawn(move || match bridge.call(&prompt, &agent_id) {
        Ok(reply) if reply.is_success() => {
            let _ = tx.send(AppEvent::TrainLoaded(train_from_result(&reply.result)));
        }
        Ok(reply) => {
            let _ = tx.send(AppEvent::TrainFailed(format!(
                "Coordinator returned status '{}'",
                reply.status
            )));
        }
        Err(e) => {
            let _ = tx.send(AppEvent::TrainFailed(e.to_string()));
        }
    });
}

/// Pull an M-Indicator style line status summary for the chat feed.
pub fn spawn_indicator_check(
    bridge: AgentBridge,
    agent_id: String,
    prompt: String,
    tx: mpsc::Sender<AppEvent>,
) {
    std::thread::spawn(move || match bridge.call(&prompt, &agent_id) {
        Ok(reply) if reply.is_success() => {
            let _ = tx.send(AppEvent::IndicatorReply(reply_text(&reply.result)));
        }
        Ok(reply) => {
            let _ = tx.send(AppEvent::IndicatorFailed(format!(
                "Coordinator returned status '{}'",
                reply.status
            )));
        }
        Err(e) => {
            let _ = tx.send(AppEvent::IndicatorFailed(e.to_string()));
        }
    });
}

/// Prefer the coordinator's one-line summary; fall back to raw text, then to
/// pretty-printed JSON so the user always sees something.
pub(crate) fn reply_text(result: &Value) -> String {
    if let Some(summary) = result["unified_recommendation"]["summary"].as_str() {
        if !summary.trim().is_empty() {
            return summary.to_string();
        }
    }
    if let Some(text) = result.as_str() {
        return text.to_string();
    }
    serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string())
}

/// Fixed quote sheet standing in for the Rapido and Uber adapters.
pub(crate) fn mock_rides() -> Vec<RideOption> {
    vec![
        RideOption {
            provider: RideProvider::Rapido,
            vehicle: "Bike".to_string(),
            price: 45,
            eta: "5 mins".to_string(),
            distance: "8.2 km".to_string(),
        },
        RideOption {
            provider: RideProvider::Rapido,
            vehicle: "Auto".to_string(),
            price: 85,
            eta: "6 mins".to_string(),
            distance: "8.2 km".to_string(),
        },
        RideOption {
            provider: RideProvider::Uber,
            vehicle: "UberGo".to_string(),
            price: 120,
            eta: "4 mins".to_string(),
            distance: "8.2 km".to_string(),
        },
        RideOption {
            provider: RideProvider::Uber,
            vehicle: "UberMoto".to_string(),
            price: 50,
            eta: "5 mins".to_string(),
            distance: "8.2 km".to_string(),
        },
    ]
}

/// Coordinator answers are prose more often than structured tracking data.
/// Read whatever fields are present and fall back to the scheduled service.
pub(crate) fn train_from_result(result: &Value) -> TrainStatus {
    let state = match result["status"].as_str().unwrap_or("on-time") {
        "delayed" => TrainState::Delayed,
        "approaching" => TrainState::Approaching,
        _ => TrainState::OnTime,
    };
    TrainStatus {
        number: result["train_number"].as_str().unwrap_or("12345").to_string(),
        name: result["train_name"]
            .as_str()
            .unwrap_or("Western Line Local")
            .to_string(),
        current_location: result["current_location"]
            .as_str()
            .unwrap_or("Bandra")
            .to_string(),
        next_station: result["next_station"].as_str().unwrap_or("Mahim").to_string(),
        estimated_arrival: result["estimated_arrival"]
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| {
                (Local::now() + chrono::Duration::minutes(15))
                    .format("%H:%M")
                    .to_string()
            }),
        delay_minutes: result["delay"].as_i64().unwrap_or(2),
        platform: Some(result["platform"].as_str().unwrap_or("2").to_string()),
        state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_text_prefers_summary() {
        let result = json!({
            "unified_recommendation": {"summary": "Leave by 7:45 AM."},
            "transport_plan": {"mode": "train"}
        });
        assert_eq!(reply_text(&result), "Leave by 7:45 AM.");
    }

    #[test]
    fn test_reply_text_passes_plain_strings_through() {
        let result = json!("Take the 8:02 fast local.");
        assert_eq!(reply_text(&result), "Take the 8:02 fast local.");
    }

    #[test]
    fn test_reply_text_falls_back_to_pretty_json() {
        let result = json!({"transport_plan": {"mode": "metro"}});
        let text = reply_text(&result);
        assert!(text.contains("transport_plan"));
        assert!(text.contains('\n'), "expected pretty-printed JSON: {text}");
    }

    #[test]
    fn test_reply_text_ignores_blank_summary() {
        let result = json!({"unified_recommendation": {"summary": "  "}});
        let text = reply_text(&result);
        assert_ne!(text.trim(), "");
        assert!(text.contains("unified_recommendation"));
    }

    #[test]
    fn test_mock_rides_quote_sheet() {
        let rides = mock_rides();
        assert_eq!(rides.len(), 4);
        assert_eq!(rides[0].provider, RideProvider::Rapido);
        assert_eq!(rides[0].price, 45);
        assert_eq!(rides[2].vehicle, "UberGo");
        assert_eq!(rides[2].price, 120);
    }

    #[test]
    fn test_train_from_result_reads_structured_fields() {
        let result = json!({
            "train_number": "90041",
            "train_name": "Churchgate Fast",
            "current_location": "Dadar",
            "next_station": "Mumbai Central",
            "estimated_arrival": "09:12",
            "delay": 6,
            "platform": "4",
            "status": "delayed"
        });
        let train = train_from_result(&result);
        assert_eq!(train.number, "90041");
        assert_eq!(train.next_station, "Mumbai Central");
        assert_eq!(train.delay_minutes, 6);
        assert_eq!(train.state, TrainState::Delayed);
    }

    #[test]
    fn test_train_from_result_defaults_on_prose_answers() {
        let train = train_from_result(&json!("The next local leaves shortly."));
        assert_eq!(train.number, "12345");
        assert_eq!(train.name, "Western Line Local");
        assert_eq!(train.current_location, "Bandra");
        assert_eq!(train.state, TrainState::OnTime);
        assert_eq!(train.platform.as_deref(), Some("2"));
    }
}
