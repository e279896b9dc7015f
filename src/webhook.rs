//! Handling of LINE webhook deliveries, used to discover group ids.

use std::fs::OpenOptions;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::error::Result;

pub const GROUP_ID_LOG: &str = "group_id_log.csv";

#[derive(Debug, Deserialize)]
struct WebhookBody {
    #[serde(default)]
    events: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Event {
    #[serde(rename = "type")]
    kind: String,
    source: Option<Source>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Source {
    #[serde(rename = "type")]
    kind: String,
    group_id: Option<String>,
}

/// Group ids of every message event posted from a group.
///
/// Events are read one at a time; one that does not parse is skipped.
pub fn detect_group_ids(body: &str) -> Result<Vec<String>> {
    let parsed: WebhookBody = serde_json::from_str(body)?;
    Ok(parsed
        .events
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<Event>(raw) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(error = %e, "skipping unreadable webhook event");
                None
            }
        })
        .filter(|e| e.kind == "message")
        .filter_map(|e| e.source)
        .filter(|s| s.kind == "group")
        .filter_map(|s| s.group_id)
        .collect())
}

/// Append one detection to the CSV log, creating it on first use.
pub fn append_group_id(log_path: &Path, at: NaiveDateTime, group_id: &str) -> Result<()> {
    if let Some(dir) = log_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_path)?;
    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record([
        at.format("%Y-%m-%d %H:%M:%S").to_string().as_str(),
        "Group ID Detected",
        group_id,
    ])?;
    wtr.flush()?;
    Ok(())
}

/// Process a webhook body and return the JSON acknowledgement.
///
/// Malformed payloads are logged and still acknowledged.
pub fn handle(body: &str, log_path: &Path, now: NaiveDateTime) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(json!({"status": "no data"}));
    }
    match detect_group_ids(body) {
        Ok(ids) => {
            for id in ids {
                info!(group_id = %id, "group id detected");
                append_group_id(log_path, now, &id)?;
            }
        }
        Err(e) => error!(error = %e, "webhook payload rejected"),
    }
    Ok(json!({"status": "ok"}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const BODY: &str = r#"{
        "destination": "Uxxx",
        "events": [
            {"type": "message", "source": {"type": "group", "groupId": "C111", "userId": "U1"}},
            {"type": "message", "source": {"type": "user", "userId": "U2"}},
            {"type": "join", "source": {"type": "group", "groupId": "C222"}},
            {"type": "message", "source": {"type": "group", "groupId": "C333"}}
        ]
    }"#;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 14)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_detects_group_message_events_only() {
        assert_eq!(detect_group_ids(BODY).unwrap(), vec!["C111", "C333"]);
        assert!(detect_group_ids(r#"{"events": []}"#).unwrap().is_empty());
        assert!(detect_group_ids(r#"{}"#).unwrap().is_empty());
    }

    #[test]
    fn test_bad_event_does_not_hide_the_others() {
        let body = r#"{"events": [
            {"type": "message", "source": "not-an-object"},
            {"type": "message", "source": {"type": "group", "groupId": 7}},
            {"type": "message", "source": {"type": "group", "groupId": "C444"}}
        ]}"#;
        assert_eq!(detect_group_ids(body).unwrap(), vec!["C444"]);
    }

    #[test]
    fn test_handle_logs_detected_ids() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("logs").join(GROUP_ID_LOG);
        let ack = handle(BODY, &log, now()).unwrap();
        assert_eq!(ack, json!({"status": "ok"}));
        let content = std::fs::read_to_string(&log).unwrap();
        assert_eq!(
            content,
            "2025-08-14 12:00:00,Group ID Detected,C111\n2025-08-14 12:00:00,Group ID Detected,C333\n"
        );
    }

    #[test]
    fn test_handle_empty_and_malformed_bodies() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join(GROUP_ID_LOG);
        assert_eq!(handle("  ", &log, now()).unwrap(), json!({"status": "no data"}));
        assert_eq!(handle("{not json", &log, now()).unwrap(), json!({"status": "ok"}));
        assert!(!log.exists());
    }
}
