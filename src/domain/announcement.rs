use chrono::{DateTime, Utc};

use super::{AnnouncementId, DeliveryStatus, RecipientId};

/// A scheduled broadcast message together with its delivery progress.
///
/// `delivered_to` grows monotonically in roster order and never contains
/// duplicates; once it covers the whole roster the status becomes `Sent`.
#[derive(Debug, Clone)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub content: String,
    pub send_at: DateTime<Utc>,
    pub delivered_to: Vec<RecipientId>,
    pub status: DeliveryStatus,
}
