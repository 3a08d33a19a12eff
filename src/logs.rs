// Container log payloads to timestamped entries.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::LogEntry;

const FRAME_HEADER_LEN: usize = 8;

/// `[stream, 0, 0, 0, len_be32]`, with stream 0 (stdin), 1 (stdout) or 2 (stderr).
fn is_frame_header(bytes: &[u8]) -> bool {
    bytes.len() >= FRAME_HEADER_LEN && bytes[0] <= 2 && bytes[1..4] == [0, 0, 0]
}

/// Strip the Engine's stream multiplexing headers. TTY containers send plain text, which
/// is returned unchanged.
pub fn demultiplex(bytes: &[u8]) -> Vec<u8> {
    if !is_frame_header(bytes) {
        return bytes.to_vec();
    }
    let mut out = Vec::with_capacity(bytes.len());
    let mut rest = bytes;
    while is_frame_header(rest) {
        let len = u32::from_be_bytes([rest[4], rest[5], rest[6], rest[7]]) as usize;
        let body = &rest[FRAME_HEADER_LEN..];
        let take = len.min(body.len());
        out.extend_from_slice(&body[..take]);
        rest = &body[take..];
    }
    out.extend_from_slice(rest);
    out
}

fn parse_line(line: &str) -> LogEntry {
    if let Some((head, message)) = line.split_once(' ')
        && let Ok(time) = DateTime::parse_from_rfc3339(head)
    {
        return LogEntry {
            timestamp: time
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            message: message.to_string(),
        };
    }
    LogEntry {
        timestamp: String::new(),
        message: line.to_string(),
    }
}

/// One entry per non-empty line of a `timestamps=true` log payload.
pub fn parse_log_entries(bytes: &[u8]) -> Vec<LogEntry> {
    let text = demultiplex(bytes);
    String::from_utf8_lossy(&text)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}
