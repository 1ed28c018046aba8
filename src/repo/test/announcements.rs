use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{AnnouncementId, DeliveryStatus, RecipientId};
use crate::repo;
use crate::repo::test::start_sqlite;

fn at_hour(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 1, hour, 0, 0)
        .single().expect("invalid test timestamp")
}

#[tokio::test]
async fn scheduled_rows_stay_invisible_until_sending() {
    let db = start_sqlite().await;
    let announcements = repo::Announcements::new(db.clone());

    let send_at = at_hour(10);
    let id = announcements.create_announcement("hello", send_at)
        .await.expect("couldn't create an announcement");

    assert!(announcements.get_announcement(id)
        .await.expect("couldn't get the announcement").is_none());
    assert!(announcements.get_delivered_to(id)
        .await.expect("couldn't get the delivery progress").is_none());
    assert!(announcements.list_announcements()
        .await.expect("couldn't list the announcements").is_empty());

    assert!(announcements.mark_sending(id)
        .await.expect("couldn't mark the announcement as being sent"));

    let announcement = announcements.get_announcement(id)
        .await.expect("couldn't get the announcement")
        .expect("the announcement must be visible once it's being sent");
    assert_eq!(announcement.content, "hello");
    assert_eq!(announcement.send_at, send_at);
    assert_eq!(announcement.status, DeliveryStatus::Sending);
    assert!(announcement.delivered_to.is_empty());
}

#[tokio::test]
async fn delivery_progress_survives_repeated_reads() {
    let db = start_sqlite().await;
    let announcements = repo::Announcements::new(db.clone());

    let id = announcements.create_announcement("progress", at_hour(9))
        .await.expect("couldn't create an announcement");
    assert!(announcements.mark_sending(id)
        .await.expect("couldn't mark the announcement as being sent"));

    let progress: Vec<RecipientId> = [1, 2, 3].map(RecipientId).to_vec();
    announcements.update_delivered_to(id, &progress)
        .await.expect("couldn't update the delivery progress");

    // repeated reads with no writes in between must agree
    for _ in 0..2 {
        let delivered_to = announcements.get_delivered_to(id)
            .await.expect("couldn't get the delivery progress")
            .expect("the delivery progress must be present");
        assert_eq!(delivered_to, progress);
    }
}

#[tokio::test]
async fn announcements_are_listed_newest_send_time_first() {
    let db = start_sqlite().await;
    let announcements = repo::Announcements::new(db.clone());

    for (content, hour) in [("ten", 10), ("nine", 9), ("eleven", 11)] {
        let id = announcements.create_announcement(content, at_hour(hour))
            .await.expect("couldn't create an announcement");
        assert!(announcements.mark_sending(id)
            .await.expect("couldn't mark the announcement as being sent"));
    }

    let listed: Vec<String> = announcements.list_announcements()
        .await.expect("couldn't list the announcements")
        .into_iter()
        .map(|announcement| announcement.content)
        .collect();
    assert_eq!(listed, ["eleven", "ten", "nine"]);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let db = start_sqlite().await;
    let announcements = repo::Announcements::new(db.clone());
    let unknown = AnnouncementId(9999);

    assert!(announcements.get_announcement(unknown)
        .await.expect("couldn't get the announcement").is_none());
    assert!(announcements.get_delivered_to(unknown)
        .await.expect("couldn't get the delivery progress").is_none());
    assert!(announcements.update_delivered_to(unknown, &[RecipientId(1)]).await.is_err());
    assert!(announcements.mark_sent(unknown).await.is_err());
}

#[tokio::test]
async fn completed_announcements_are_not_listed_as_unsent() {
    let db = start_sqlite().await;
    let announcements = repo::Announcements::new(db.clone());

    let armed = announcements.create_announcement("armed", at_hour(12))
        .await.expect("couldn't create an announcement");
    let completed = announcements.create_announcement("completed", at_hour(13))
        .await.expect("couldn't create an announcement");
    assert!(announcements.mark_sending(completed)
        .await.expect("couldn't mark the announcement as being sent"));
    announcements.mark_sent(completed)
        .await.expect("couldn't mark the announcement as sent");

    let unsent = announcements.list_unsent()
        .await.expect("couldn't list the unsent announcements");
    assert_eq!(unsent.len(), 1);
    assert_eq!(unsent[0].id, armed);
    assert_eq!(unsent[0].status, DeliveryStatus::Scheduled);
}

#[tokio::test]
async fn sent_announcements_never_return_to_the_sending_state() {
    let db = start_sqlite().await;
    let announcements = repo::Announcements::new(db.clone());

    let id = announcements.create_announcement("done", at_hour(8))
        .await.expect("couldn't create an announcement");
    assert!(announcements.mark_sending(id)
        .await.expect("couldn't mark the announcement as being sent"));
    announcements.mark_sent(id)
        .await.expect("couldn't mark the announcement as sent");

    // a late duplicate timer must not regress the status
    assert!(!announcements.mark_sending(id)
        .await.expect("couldn't check the sending transition"));
    let announcement = announcements.get_announcement(id)
        .await.expect("couldn't get the announcement")
        .expect("the announcement must stay visible");
    assert_eq!(announcement.status, DeliveryStatus::Sent);
}
