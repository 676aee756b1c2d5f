use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod admin;
pub mod contest;
/// Health check payload.
pub mod health;
pub mod validation;

/// RFC 3339 rendering used by every payload and by stored timestamps.
pub(crate) fn format_timestamp(time: OffsetDateTime) -> String {
    time.format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
