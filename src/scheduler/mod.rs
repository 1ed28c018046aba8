mod sink;

pub use sink::*;

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use flurry::HashSet;

use crate::config::Roster;
use crate::domain::AnnouncementId;
use crate::metrics;
use crate::repo;

/// Arms one timer per announcement and runs the delivery pass when it fires.
///
/// The store is the sole source of truth for delivery progress; the only
/// state kept here is the set of armed announcement ids, which makes
/// re-arming idempotent.
#[derive(Clone)]
pub struct Scheduler {
    announcements: repo::Announcements,
    roster: Roster,
    sink: Arc<dyn DeliverySink>,
    pending: Arc<HashSet<i64>>,
}

impl Scheduler {
    pub fn new(announcements: repo::Announcements, roster: Roster, sink: Arc<dyn DeliverySink>) -> Self {
        Self {
            announcements,
            roster,
            sink,
            pending: Arc::new(HashSet::new()),
        }
    }

    /// Durably registers an announcement and arms its timer. Returns as soon
    /// as the row is written; a past send time fires immediately.
    pub async fn schedule(&self, content: String, send_at: DateTime<Utc>) -> anyhow::Result<AnnouncementId> {
        let id = self.announcements.create_announcement(&content, send_at).await?;
        self.arm(id, send_at);
        metrics::SCHEDULED_COUNTER.inc();
        log::info!("announcement {id} is scheduled to be sent at {send_at}");
        Ok(id)
    }

    /// Re-arms a timer for every persisted announcement that hasn't finished
    /// its delivery pass; called once at startup. Returns the number of
    /// announcements found.
    pub async fn rearm_pending(&self) -> anyhow::Result<usize> {
        let unsent = self.announcements.list_unsent().await?;
        let count = unsent.len();
        for announcement in unsent {
            self.arm(announcement.id, announcement.send_at);
        }
        Ok(count)
    }

    fn arm(&self, id: AnnouncementId, send_at: DateTime<Utc>) {
        {
            let guard = self.pending.guard();
            if !self.pending.insert(id.0, &guard) {
                log::debug!("announcement {id} is armed already");
                return;
            }
        }
        let scheduler = self.clone();
        tokio::spawn(async move {
            let delay = (send_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            tokio::time::sleep(delay).await;
            if let Err(e) = scheduler.deliver(id).await {
                log::error!("the delivery pass of announcement {id} failed: {e:#}");
            }
            let guard = scheduler.pending.guard();
            scheduler.pending.remove(&id.0, &guard);
        });
    }

    /// The delivery pass: walks the roster in order, persisting the progress
    /// after every recipient so that a crash loses at most the in-flight one.
    async fn deliver(&self, id: AnnouncementId) -> anyhow::Result<()> {
        if !self.announcements.mark_sending(id).await? {
            log::debug!("announcement {id} has been sent already");
            return Ok(());
        }
        let announcement = self.announcements.get_announcement(id).await?
            .ok_or(anyhow!("announcement {id} vanished from the store"))?;

        let mut delivered_to = announcement.delivered_to;
        for &recipient in self.roster.recipients() {
            if delivered_to.contains(&recipient) {
                continue;
            }
            self.sink.deliver(recipient, &announcement.content).await?;
            delivered_to.push(recipient);
            self.announcements.update_delivered_to(id, &delivered_to).await?;
            metrics::RECIPIENT_COUNTER.inc();
        }

        self.announcements.mark_sent(id).await?;
        metrics::SENT_COUNTER.inc();
        log::info!("announcement {id} was delivered to {} recipients", delivered_to.len());
        Ok(())
    }
}
