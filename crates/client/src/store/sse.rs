//! Server-sent event parsing for the realtime subscription stream.
//!
//! The store streams collection changes as `text/event-stream` records:
//!
//! ```text
//! event: put
//! data: {"path": "/-Nx7Qc", "data": {"name": "Hoa hồng", ...}}
//! ```
//!
//! [`SseParser`] reassembles records from arbitrary byte chunks;
//! [`StreamEvent`] interprets the record types the store emits.

use serde::Deserialize;
use serde_json::Value;

/// A raw server-sent event record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SseRecord {
    /// The `event:` field, empty if the record carried none.
    pub event: String,
    /// The concatenated `data:` lines.
    pub data: String,
}

/// Incremental parser for an event-stream body.
///
/// Feed it byte chunks as they arrive; it yields complete records and
/// buffers partial ones across chunk boundaries.
#[derive(Debug, Default)]
pub(crate) struct SseParser {
    buffer: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a chunk and return any completed records.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseRecord> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut records = Vec::new();
        // A blank line terminates a record.
        while let Some(pos) = find_record_end(&self.buffer) {
            let raw: String = self.buffer.drain(..pos.end).collect();
            let record_text = &raw[..pos.start];
            if let Some(record) = parse_record(record_text) {
                records.push(record);
            }
        }
        records
    }
}

struct RecordEnd {
    /// Byte length of the record text.
    start: usize,
    /// Byte length including the terminating blank line.
    end: usize,
}

fn find_record_end(buffer: &str) -> Option<RecordEnd> {
    let lf = buffer.find("\n\n").map(|i| RecordEnd {
        start: i,
        end: i + 2,
    });
    let crlf = buffer.find("\r\n\r\n").map(|i| RecordEnd {
        start: i,
        end: i + 4,
    });
    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.start <= b.start { a } else { b }),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// Parse one record's lines. Returns `None` for comment-only records.
fn parse_record(text: &str) -> Option<SseRecord> {
    let mut event = String::new();
    let mut data_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.starts_with(':') {
            continue; // comment / heartbeat
        }
        if let Some(value) = line.strip_prefix("event:") {
            event = value.trim_start().to_owned();
        } else if let Some(value) = line.strip_prefix("data:") {
            data_lines.push(value.strip_prefix(' ').unwrap_or(value));
        }
    }

    if event.is_empty() && data_lines.is_empty() {
        return None;
    }

    Some(SseRecord {
        event,
        data: data_lines.join("\n"),
    })
}

/// A change notification from the realtime store.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StreamEvent {
    /// Replace the value at `path` with `data` (`null` removes it).
    Put { path: String, data: Value },
    /// Merge the children in `data` into the value at `path`.
    Patch { path: String, data: Value },
    /// Periodic heartbeat; carries no change.
    KeepAlive,
    /// The server cancelled the stream.
    Cancel,
    /// The auth credential expired; the stream must be re-established.
    AuthRevoked,
}

#[derive(Deserialize)]
struct ChangePayload {
    path: String,
    #[serde(default)]
    data: Value,
}

impl StreamEvent {
    /// Interpret a raw record. Unknown event types yield `None`.
    pub fn from_record(record: &SseRecord) -> Option<Result<Self, serde_json::Error>> {
        match record.event.as_str() {
            "put" => Some(
                serde_json::from_str::<ChangePayload>(&record.data)
                    .map(|p| Self::Put { path: p.path, data: p.data }),
            ),
            "patch" => Some(
                serde_json::from_str::<ChangePayload>(&record.data)
                    .map(|p| Self::Patch { path: p.path, data: p.data }),
            ),
            "keep-alive" => Some(Ok(Self::KeepAlive)),
            "cancel" => Some(Ok(Self::Cancel)),
            "auth_revoked" => Some(Ok(Self::AuthRevoked)),
            _ => None,
        }
    }
}
