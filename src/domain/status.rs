use serde::Serialize;

/// Lifecycle of an announcement row. Rows move strictly forward:
/// `Scheduled` (armed, invisible to queries) -> `Sending` -> `Sent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Scheduled,
    Sending,
    Sent,
}
