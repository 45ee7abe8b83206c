//! Per-line event decoding.
//!
//! The subprocess's stdout is a stream of newline-delimited JSON records,
//! possibly interleaved with non-protocol noise (stray log lines, blank
//! lines). [`decode_line`] classifies one raw line:
//!
//! - non-JSON noise → [`Decoded::Ignored`] (never aborts the turn)
//! - unknown `type` discriminator → [`Decoded::Ignored`] (forward compat)
//! - recognized tag, invalid payload → [`Decoded::Invalid`] (skip and
//!   continue), except that malformed `turn.failed`/`error` records still
//!   surface as failure events built from whatever fields are present

use serde_json::Value;

use super::events::{ThreadError, ThreadEvent};

/// Event tags this crate understands. Anything else is a future event kind
/// and is skipped.
const KNOWN_TAGS: [&str; 8] = [
    "thread.started",
    "turn.started",
    "turn.completed",
    "turn.failed",
    "item.started",
    "item.updated",
    "item.completed",
    "error",
];

/// Outcome of decoding one raw line.
#[derive(Debug)]
pub enum Decoded {
    /// A well-formed protocol event.
    Event(ThreadEvent),
    /// Non-protocol noise or an unrecognized event kind.
    Ignored,
    /// A recognized tag whose payload failed validation.
    Invalid {
        tag: String,
        error: serde_json::Error,
    },
}

/// Decode one raw line from the subprocess stdout.
pub fn decode_line(line: &str) -> Decoded {
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(_) => {
            // Not JSON at all: treat as noise, never as a fault.
            tracing::debug!(line, "skipping non-protocol output line");
            return Decoded::Ignored;
        }
    };

    let Some(tag) = value.get("type").and_then(Value::as_str) else {
        tracing::debug!(line, "skipping JSON record without a type tag");
        return Decoded::Ignored;
    };

    if !KNOWN_TAGS.contains(&tag) {
        tracing::debug!(tag, "skipping unrecognized event kind");
        return Decoded::Ignored;
    }

    let tag = tag.to_string();
    match serde_json::from_value::<ThreadEvent>(value.clone()) {
        Ok(event) => Decoded::Event(event),
        // A malformed failure record must still end the turn; salvage what
        // we can from the partial payload.
        Err(_) if tag == "turn.failed" => Decoded::Event(ThreadEvent::TurnFailed {
            error: ThreadError {
                message: salvage_message(&value, &["error", "message"])
                    .unwrap_or_else(|| "turn failed".to_string()),
            },
        }),
        Err(_) if tag == "error" => Decoded::Event(ThreadEvent::Error {
            message: salvage_message(&value, &["message"])
                .unwrap_or_else(|| "unknown stream error".to_string()),
        }),
        Err(error) => Decoded::Invalid { tag, error },
    }
}

/// Walk a field path and pull out a string, if present.
fn salvage_message(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    current.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Usage;

    #[test]
    fn decode_valid_event() {
        let line = r#"{"type":"turn.completed","usage":{"input_tokens":3,"cached_input_tokens":0,"output_tokens":1}}"#;
        let Decoded::Event(event) = decode_line(line) else {
            panic!("expected event");
        };
        assert_eq!(
            event,
            ThreadEvent::TurnCompleted {
                usage: Usage {
                    input_tokens: 3,
                    cached_input_tokens: 0,
                    output_tokens: 1,
                }
            }
        );
    }

    #[test]
    fn non_json_is_ignored() {
        assert!(matches!(decode_line("warming up..."), Decoded::Ignored));
        assert!(matches!(decode_line(""), Decoded::Ignored));
        assert!(matches!(decode_line("{not json"), Decoded::Ignored));
    }

    #[test]
    fn json_without_type_is_ignored() {
        assert!(matches!(decode_line(r#"{"id":5}"#), Decoded::Ignored));
        assert!(matches!(decode_line(r#"[1,2,3]"#), Decoded::Ignored));
    }

    #[test]
    fn unknown_tag_is_ignored() {
        let line = r#"{"type":"thread.compacted","thread_id":"t"}"#;
        assert!(matches!(decode_line(line), Decoded::Ignored));
    }

    #[test]
    fn invalid_payload_for_known_tag() {
        // item.completed requires an item payload
        let line = r#"{"type":"item.completed"}"#;
        let Decoded::Invalid { tag, .. } = decode_line(line) else {
            panic!("expected invalid");
        };
        assert_eq!(tag, "item.completed");
    }

    #[test]
    fn malformed_turn_failed_still_fails_the_turn() {
        // `error` has the wrong shape, but a message is recoverable
        let line = r#"{"type":"turn.failed","error":{"message":"out of fuel","extra":1},"junk":true}"#;
        let Decoded::Event(ThreadEvent::TurnFailed { error }) = decode_line(line) else {
            panic!("expected salvaged turn.failed");
        };
        assert_eq!(error.message, "out of fuel");

        // No usable fields at all: fall back to a generic description
        let line = r#"{"type":"turn.failed","error":42}"#;
        let Decoded::Event(ThreadEvent::TurnFailed { error }) = decode_line(line) else {
            panic!("expected salvaged turn.failed");
        };
        assert_eq!(error.message, "turn failed");
    }

    #[test]
    fn malformed_error_event_still_fails_the_turn() {
        let line = r#"{"type":"error","message":12}"#;
        let Decoded::Event(ThreadEvent::Error { message }) = decode_line(line) else {
            panic!("expected salvaged error");
        };
        assert_eq!(message, "unknown stream error");
    }

    #[test]
    fn well_formed_failure_records_pass_through() {
        let line = r#"{"type":"turn.failed","error":{"message":"refused"}}"#;
        let Decoded::Event(ThreadEvent::TurnFailed { error }) = decode_line(line) else {
            panic!("expected turn.failed");
        };
        assert_eq!(error.message, "refused");
    }
}
