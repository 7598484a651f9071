use payloads::{ClientError, NotificationType, requests};
use reqwest::StatusCode;

use test_helpers::{assert_status_code, spawn_app};

fn message(
    conversation: payloads::ConversationId,
    content: &str,
) -> requests::SendMessage {
    requests::SendMessage {
        conversation,
        content: content.into(),
    }
}

#[tokio::test]
async fn exchange_messages() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    let alice = app.create_alice_user().await?;
    let conversation = app.start_conversation(&[alice.id, bob.id]);

    let sent = app
        .client
        .send_message(&message(conversation, "  Is Thursday still on?  "))
        .await?;
    assert_eq!(sent.content, "Is Thursday still on?");
    assert_eq!(sent.sender, alice.id);

    app.login_bob().await?;
    let conversations = app.client.conversations().await?;
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].unread_count, 1);
    assert_eq!(conversations[0].last_message.as_ref(), Some(&sent));
    assert_eq!(
        conversations[0].participant_names,
        vec!["Alice Anderson", "Bob Brown"]
    );

    let unread = app.client.unread_notifications().await?;
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].notification_type, NotificationType::Message);

    // reading the thread marks alice's message as read for bob
    let messages = app.client.messages(&conversation).await?;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].is_read);
    assert_eq!(app.client.conversations().await?[0].unread_count, 0);

    app.client
        .send_message(&message(conversation, "Yes, see you at 10."))
        .await?;
    app.login_alice().await?;
    let messages = app.client.messages(&conversation).await?;
    assert_eq!(
        messages.iter().map(|m| m.sender).collect::<Vec<_>>(),
        vec![alice.id, bob.id]
    );

    Ok(())
}

#[tokio::test]
async fn blank_messages_are_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    let alice = app.create_alice_user().await?;
    let conversation = app.start_conversation(&[alice.id, bob.id]);

    let result = app.client.send_message(&message(conversation, "   ")).await;
    match result {
        Err(ClientError::Validation(fields)) => {
            assert_eq!(fields.first("content"), Some("This field may not be blank."));
        }
        other => panic!("Expected validation errors, got {other:?}"),
    }
    assert!(app.client.messages(&conversation).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn outsiders_cannot_read_or_post() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    let alice = app.create_alice_user().await?;
    app.create_carol_user().await?;
    let conversation = app.start_conversation(&[alice.id, bob.id]);
    app.client
        .send_message(&message(conversation, "Private question"))
        .await?;

    app.login_carol().await?;
    assert!(app.client.conversations().await?.is_empty());
    assert_status_code(
        app.client.messages(&conversation).await,
        StatusCode::NOT_FOUND,
    );
    assert_status_code(
        app.client.send_message(&message(conversation, "hello")).await,
        StatusCode::NOT_FOUND,
    );

    Ok(())
}
