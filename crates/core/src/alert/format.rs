use chrono::{DateTime, Utc};

use crate::alert::entity::Alert;

/// strftime pattern of the trailing timestamp line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// # Summary
/// Renders an alert as the Telegram Markdown message.
///
/// # Logic
/// 1. Headline with the side marker on both ends and the bold action.
/// 2. Bold symbol followed by the exchange; this line is always present,
///    so an empty exchange leaves a trailing space.
/// 3. Optional lines for timeframe, expiry, confidence and note, skipped
///    entirely when their field is empty or absent.
/// 4. Timestamp line in UTC.
///
/// # Arguments
/// * `alert` - The parsed alert.
/// * `timestamp` - Instant printed on the last line.
///
/// # Returns
/// * Lines joined with `\n`, without blank lines.
pub fn format_message(alert: &Alert, timestamp: DateTime<Utc>) -> String {
    let marker = alert.side.marker();

    let lines = [
        Some(format!("{marker} *{} SIGNAL!* {marker}", alert.action)),
        Some(format!("*{}* {}", alert.symbol, alert.exchange)),
        (!alert.timeframe.is_empty()).then(|| format!("Timeframe: `{}`", alert.timeframe)),
        alert
            .expiry_minutes
            .as_ref()
            .map(|minutes| format!("Suggested expiry: {} min", minutes.text)),
        alert
            .confidence
            .map(|confidence| format!("Confidence: {:.0}%", confidence * 100.0)),
        (!alert.note.is_empty()).then(|| format!("Note: {}", alert.note)),
        Some(format!("Timestamp: {}", timestamp.format(TIMESTAMP_FORMAT))),
    ];

    lines.into_iter().flatten().collect::<Vec<_>>().join("\n")
}
