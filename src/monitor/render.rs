//! Human-readable rendering of inbound server messages
//!
//! Pure functions from a parsed message to output lines, so the dispatch
//! behavior is testable without a socket or captured stdout. Every branch
//! degrades missing fields to defaults rather than failing.

use chrono::Local;
use serde_json::Value;

use crate::protocol::ServerMessage;

/// Preview length for a pushed clipboard item
const PUSH_PREVIEW_CHARS: usize = 100;
/// Preview length for items of an `all_content` listing
const LISTING_PREVIEW_CHARS: usize = 80;
/// Listings show at most this many items
const LISTING_MAX_ITEMS: usize = 3;

/// Local wall-clock prefix for event lines
pub fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Parse and render one inbound text frame.
///
/// A frame that is not valid JSON produces a single error line instead of
/// failing, so the listen loop survives any number of bad frames.
pub fn handle_frame(text: &str) -> Vec<String> {
    let ts = timestamp();
    match ServerMessage::parse(text) {
        Ok(msg) => render_message(&msg, &ts),
        Err(e) => vec![format!("[{ts}] failed to parse message: {e}")],
    }
}

/// Render one parsed message into zero or more output lines
pub fn render_message(msg: &ServerMessage, ts: &str) -> Vec<String> {
    match msg {
        ServerMessage::Sync { data } => render_sync(data, ts),

        ServerMessage::Delete { id } => {
            vec![format!(
                "[{ts}] deleted: {}",
                id.as_deref().unwrap_or("unknown")
            )]
        }

        ServerMessage::AllContent { items, count } => {
            let mut lines = vec![format!(
                "[{ts}] items on server: {}",
                count.unwrap_or(items.len())
            )];
            if !items.is_empty() {
                lines.push("latest items:".to_string());
                for (i, item) in items.iter().take(LISTING_MAX_ITEMS).enumerate() {
                    lines.push(format!(
                        "  {}. [{}] {}: {}...",
                        i + 1,
                        format_created_at(&item.created_at),
                        item.kind.as_deref().unwrap_or(""),
                        preview(&item.content, LISTING_PREVIEW_CHARS),
                    ));
                }
            }
            lines
        }

        ServerMessage::ConnectionStats { stats } => {
            vec![format!(
                "[{ts}] active connections: {}",
                stats.active_connections
            )]
        }

        ServerMessage::Unknown { tag } => vec![format!("[{ts}] unhandled message: {tag}")],
    }
}

/// A `sync` payload is either an error report, a status notice, or a new
/// clipboard item. Anything else (including a non-object payload) renders
/// nothing.
fn render_sync(data: &Value, ts: &str) -> Vec<String> {
    let Some(obj) = data.as_object() else {
        return Vec::new();
    };

    if let Some(err) = obj.get("error") {
        return vec![format!("[{ts}] error: {}", as_text(err))];
    }
    if let Some(msg) = obj.get("message") {
        return vec![format!("[{ts}] {}", as_text(msg))];
    }
    if let Some(kind) = obj.get("type").and_then(Value::as_str) {
        let content = obj.get("content").and_then(Value::as_str).unwrap_or("");
        return vec![format!(
            "[{ts}] new {kind}: {}...",
            preview(content, PUSH_PREVIEW_CHARS)
        )];
    }

    Vec::new()
}

/// Truncate to at most `max` characters, then collapse newlines to spaces
fn preview(content: &str, max: usize) -> String {
    content
        .chars()
        .take(max)
        .collect::<String>()
        .replace('\n', " ")
}

/// Cut an ISO-8601 timestamp down to `YYYY-MM-DD HH:MM:SS`
fn format_created_at(raw: &str) -> String {
    raw.chars().take(19).collect::<String>().replace('T', " ")
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "12:00:00";

    fn render_one(raw: &str) -> Vec<String> {
        render_message(&ServerMessage::parse(raw).unwrap(), TS)
    }

    #[test]
    fn delete_prints_the_literal_id() {
        let lines = render_one(r#"{"type":"delete","id":"abc123"}"#);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("abc123"));
    }

    #[test]
    fn delete_without_id_prints_unknown() {
        let lines = render_one(r#"{"type":"delete"}"#);
        assert!(lines[0].contains("unknown"));
    }

    #[test]
    fn sync_error_renders_as_error_line() {
        let lines = render_one(r#"{"type":"sync","data":{"error":"boom"}}"#);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("error"));
        assert!(lines[0].contains("boom"));
    }

    #[test]
    fn sync_message_renders_as_status_line() {
        let lines = render_one(r#"{"type":"sync","data":{"message":"synced"}}"#);
        assert_eq!(lines, vec![format!("[{TS}] synced")]);
    }

    #[test]
    fn sync_item_preview_is_capped_at_100_chars() {
        let content = "A".repeat(150);
        let raw = format!(r#"{{"type":"sync","data":{{"type":"text","content":"{content}"}}}}"#);
        let lines = render_one(&raw);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(&"A".repeat(100)));
        assert!(!lines[0].contains(&"A".repeat(101)));
    }

    #[test]
    fn sync_item_preview_collapses_newlines() {
        let lines = render_one(r#"{"type":"sync","data":{"type":"text","content":"one\ntwo"}}"#);
        assert!(lines[0].contains("one two"));
    }

    #[test]
    fn sync_with_non_object_payload_renders_nothing() {
        assert!(render_one(r#"{"type":"sync","data":"oops"}"#).is_empty());
    }

    #[test]
    fn sync_item_without_type_renders_nothing() {
        assert!(render_one(r#"{"type":"sync","data":{"content":"orphan"}}"#).is_empty());
    }

    #[test]
    fn empty_listing_reports_zero_and_no_item_lines() {
        let lines = render_one(r#"{"type":"all_content","data":[],"count":0}"#);
        assert_eq!(lines, vec![format!("[{TS}] items on server: 0")]);
    }

    #[test]
    fn listing_shows_at_most_three_items() {
        let raw = r#"{"type":"all_content","count":5,"data":[
            {"type":"text","content":"a","createdAt":"2024-01-02T03:04:05.000Z"},
            {"type":"text","content":"b","createdAt":"2024-01-02T03:04:06.000Z"},
            {"type":"text","content":"c","createdAt":"2024-01-02T03:04:07.000Z"},
            {"type":"text","content":"d","createdAt":"2024-01-02T03:04:08.000Z"},
            {"type":"text","content":"e","createdAt":"2024-01-02T03:04:09.000Z"}
        ]}"#;
        let lines = render_one(raw);
        // header, "latest items:", then three numbered lines
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("items on server: 5"));
        assert!(lines[2].contains("2024-01-02 03:04:05"));
        assert!(lines[4].starts_with("  3."));
    }

    #[test]
    fn listing_count_defaults_to_item_total() {
        let lines = render_one(r#"{"type":"all_content","data":[{"type":"text","content":"a"}]}"#);
        assert!(lines[0].contains("items on server: 1"));
    }

    #[test]
    fn connection_stats_prints_active_count() {
        let lines = render_one(r#"{"type":"connection_stats","data":{"activeConnections":3}}"#);
        assert_eq!(lines, vec![format!("[{TS}] active connections: 3")]);
    }

    #[test]
    fn unknown_tag_is_reported_with_the_raw_tag() {
        let lines = render_one(r#"{"type":"surprise"}"#);
        assert!(lines[0].contains("surprise"));
    }

    #[test]
    fn bad_frame_then_good_frame_both_produce_output() {
        let bad = handle_frame("not json");
        assert_eq!(bad.len(), 1);
        assert!(bad[0].contains("failed to parse"));

        let good = handle_frame(r#"{"type":"delete","id":"abc123"}"#);
        assert_eq!(good.len(), 1);
        assert!(good[0].contains("abc123"));
    }

    #[test]
    fn created_at_cut_keeps_date_and_time() {
        assert_eq!(
            format_created_at("2024-01-02T03:04:05.123Z"),
            "2024-01-02 03:04:05"
        );
        assert_eq!(format_created_at(""), "");
    }
}
