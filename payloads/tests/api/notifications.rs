use jiff::ToSpan;
use payloads::{NotificationType, requests};

use reqwest::StatusCode;

use test_helpers::{assert_status_code, spawn_app, today};

#[tokio::test]
async fn booking_notifies_the_physiotherapist() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    app.create_alice_user().await?;
    let tomorrow = today().checked_add(1.day())?;
    let appointment = app.book_appointment(bob.id, tomorrow, 10).await?;

    // the patient gets nothing for their own booking
    assert_eq!(app.client.unread_notification_count().await?, 0);

    app.login_bob().await?;
    let unread = app.client.unread_notifications().await?;
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].notification_type, NotificationType::Appointment);
    assert_eq!(unread[0].related_object_id, Some(appointment.id.0));
    assert!(unread[0].message.starts_with("Alice Anderson booked"));

    Ok(())
}

#[tokio::test]
async fn mark_read() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let alice = app.create_alice_user().await?;
    app.push_notification(alice.id, "First", "one");
    app.push_notification(alice.id, "Second", "two");
    app.push_notification(alice.id, "Third", "three");

    let all = app
        .client
        .list_notifications(&requests::NotificationQuery::default())
        .await?;
    // newest first
    assert_eq!(
        all.iter().map(|n| n.title.as_str()).collect::<Vec<_>>(),
        vec!["Third", "Second", "First"]
    );

    app.client.mark_notification_read(&all[0].id).await?;
    assert_eq!(app.client.unread_notification_count().await?, 2);

    let query = requests::NotificationQuery {
        is_read: Some(true),
        ..Default::default()
    };
    let read = app.client.list_notifications(&query).await?;
    assert_eq!(read.len(), 1);
    assert_eq!(read[0].id, all[0].id);

    app.client.mark_all_notifications_read().await?;
    assert_eq!(app.client.unread_notification_count().await?, 0);

    Ok(())
}

#[tokio::test]
async fn other_users_notifications_are_hidden() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let carol = app.create_carol_user().await?;
    app.create_alice_user().await?;
    app.push_notification(carol.id, "Private", "for carol");

    assert!(app.client.unread_notifications().await?.is_empty());

    app.login_carol().await?;
    let unread = app.client.unread_notifications().await?;
    assert_eq!(unread.len(), 1);

    app.login_alice().await?;
    let result = app.client.mark_notification_read(&unread[0].id).await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    Ok(())
}
