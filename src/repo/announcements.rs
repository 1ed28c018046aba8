use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::domain::{Announcement, AnnouncementId, DeliveryStatus, RecipientId};
use crate::repo::ensure_only_one_row_updated;
use crate::repository;

#[derive(sqlx::FromRow)]
struct AnnouncementEntity {
    id: i64,
    content: String,
    send_at: DateTime<Utc>,
    delivered_to: String,
    status: String,
}

impl TryFrom<AnnouncementEntity> for Announcement {
    type Error = anyhow::Error;

    fn try_from(value: AnnouncementEntity) -> Result<Self, Self::Error> {
        let status = value.status.parse()
            .context(format!("unknown delivery status of the announcement with id = {}", value.id))?;
        Ok(Self {
            id: AnnouncementId(value.id),
            content: value.content,
            send_at: value.send_at,
            delivered_to: decode_delivered_to(&value.delivered_to)?,
            status,
        })
    }
}

repository!(Announcements,
    pub async fn create_announcement(&self, content: &str, send_at: DateTime<Utc>) -> anyhow::Result<AnnouncementId> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO announcements (content, send_at, delivered_to, status) VALUES (?, ?, ?, ?) RETURNING id")
            .bind(content)
            .bind(send_at)
            .bind(encode_delivered_to(&[])?)
            .bind(DeliveryStatus::Scheduled.to_string())
            .fetch_one(&self.pool)
            .await
            .map(AnnouncementId)
            .context("couldn't create an announcement")
    }
,
    pub async fn get_announcement(&self, id: AnnouncementId) -> anyhow::Result<Option<Announcement>> {
        sqlx::query_as::<_, AnnouncementEntity>(
            "SELECT id, content, send_at, delivered_to, status FROM announcements
                WHERE id = ? AND status <> ?")
            .bind(id.0)
            .bind(DeliveryStatus::Scheduled.to_string())
            .fetch_optional(&self.pool)
            .await
            .context(format!("couldn't get the announcement with id = {id}"))?
            .map(Announcement::try_from)
            .transpose()
    }
,
    pub async fn list_announcements(&self) -> anyhow::Result<Vec<Announcement>> {
        sqlx::query_as::<_, AnnouncementEntity>(
            "SELECT id, content, send_at, delivered_to, status FROM announcements
                WHERE status <> ? ORDER BY send_at DESC")
            .bind(DeliveryStatus::Scheduled.to_string())
            .fetch_all(&self.pool)
            .await
            .context("couldn't list the announcements")?
            .into_iter()
            .map(Announcement::try_from)
            .collect()
    }
,
    pub async fn get_delivered_to(&self, id: AnnouncementId) -> anyhow::Result<Option<Vec<RecipientId>>> {
        sqlx::query_scalar::<_, String>(
            "SELECT delivered_to FROM announcements WHERE id = ? AND status <> ?")
            .bind(id.0)
            .bind(DeliveryStatus::Scheduled.to_string())
            .fetch_optional(&self.pool)
            .await
            .context(format!("couldn't get the delivery progress of the announcement with id = {id}"))?
            .map(|raw| decode_delivered_to(&raw))
            .transpose()
    }
,
    pub async fn update_delivered_to(&self, id: AnnouncementId, delivered_to: &[RecipientId]) -> anyhow::Result<()> {
        sqlx::query("UPDATE announcements SET delivered_to = ? WHERE id = ?")
            .bind(encode_delivered_to(delivered_to)?)
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(Into::into)
            .and_then(ensure_only_one_row_updated)
            .context(format!("couldn't update the delivery progress of the announcement with id = {id}"))
            .map(|_| ())
    }
,
    /// Moves the row out of the `scheduled` state, making it visible to
    /// queries. Returns false if the announcement was already sent, in which
    /// case the delivery pass must not run again.
    pub async fn mark_sending(&self, id: AnnouncementId) -> anyhow::Result<bool> {
        sqlx::query("UPDATE announcements SET status = ? WHERE id = ? AND status <> ?")
            .bind(DeliveryStatus::Sending.to_string())
            .bind(id.0)
            .bind(DeliveryStatus::Sent.to_string())
            .execute(&self.pool)
            .await
            .map(|res| res.rows_affected() == 1)
            .context(format!("couldn't mark the announcement with id = {id} as being sent"))
    }
,
    pub async fn mark_sent(&self, id: AnnouncementId) -> anyhow::Result<()> {
        sqlx::query("UPDATE announcements SET status = ? WHERE id = ?")
            .bind(DeliveryStatus::Sent.to_string())
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(Into::into)
            .and_then(ensure_only_one_row_updated)
            .context(format!("couldn't mark the announcement with id = {id} as sent"))
            .map(|_| ())
    }
,
    pub async fn list_unsent(&self) -> anyhow::Result<Vec<Announcement>> {
        sqlx::query_as::<_, AnnouncementEntity>(
            "SELECT id, content, send_at, delivered_to, status FROM announcements
                WHERE status <> ? ORDER BY send_at")
            .bind(DeliveryStatus::Sent.to_string())
            .fetch_all(&self.pool)
            .await
            .context("couldn't list the unsent announcements")?
            .into_iter()
            .map(Announcement::try_from)
            .collect()
    }
);

fn encode_delivered_to(delivered_to: &[RecipientId]) -> anyhow::Result<String> {
    serde_json::to_string(delivered_to)
        .context("couldn't serialize the delivery progress")
}

fn decode_delivered_to(raw: &str) -> anyhow::Result<Vec<RecipientId>> {
    serde_json::from_str(raw)
        .context("couldn't deserialize the delivery progress")
}
