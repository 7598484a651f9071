use payloads::{ClientError, requests};
use test_helpers::{TestApp, alice_credentials, login_credentials, spawn_app};
use ui::AuthState;
use ui::session::{SessionService, StorageKeys};
use ui::storage::{DurableStorage, MemoryStorage};

fn keys() -> StorageKeys {
    StorageKeys {
        token: "auth_token".into(),
        user: "user_data".into(),
    }
}

fn session_for(
    app: &TestApp,
    storage: &MemoryStorage,
) -> SessionService<MemoryStorage> {
    SessionService::new(app.new_client(), storage.clone(), keys())
}

#[tokio::test]
async fn login_persists_token_and_user() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_bob_user().await?;
    let storage = MemoryStorage::default();
    let session = session_for(&app, &storage);

    let user = session.login(&login_credentials("bob")).await?;
    assert_eq!(user.username, "bob");
    assert!(session.client().has_token());
    assert_eq!(storage.get("auth_token"), session.client().token());

    let stored: payloads::responses::UserSummary =
        serde_json::from_str(&storage.get("user_data").unwrap_or_default())?;
    assert_eq!(stored, user);
    Ok(())
}

#[tokio::test]
async fn bad_password_leaves_storage_empty() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_bob_user().await?;
    let storage = MemoryStorage::default();
    let session = session_for(&app, &storage);

    let result = session
        .login(&requests::LoginCredentials {
            username: "bob".into(),
            password: "wrong-password".into(),
        })
        .await;

    let error = result.expect_err("login should fail");
    assert!(!error.is_auth_expired());
    assert!(storage.is_empty());
    assert!(!session.client().has_token());
    Ok(())
}

#[tokio::test]
async fn a_new_page_load_restores_the_session() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_bob_user().await?;
    let storage = MemoryStorage::default();
    let user = session_for(&app, &storage)
        .login(&login_credentials("bob"))
        .await?;

    let reloaded = session_for(&app, &storage);
    assert_eq!(reloaded.initialize(), AuthState::LoggedIn(user.clone()));

    let fresh = reloaded.refresh_user().await?;
    assert_eq!(fresh.id, user.id);
    Ok(())
}

#[tokio::test]
async fn register_signs_the_new_user_in() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let storage = MemoryStorage::default();
    let session = session_for(&app, &storage);

    let user = session.register(&alice_credentials()).await?;
    let user = user.expect("the backend returns a token on registration");
    assert_eq!(user.username, "alice");
    assert!(storage.contains("auth_token"));
    assert!(storage.contains("user_data"));
    Ok(())
}

#[tokio::test]
async fn mismatched_passwords_are_rejected_before_sending() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let storage = MemoryStorage::default();
    let session = session_for(&app, &storage);

    let mut details = alice_credentials();
    details.password_confirm = "something-else".into();
    let error = session
        .register(&details)
        .await
        .expect_err("registration should fail");

    let fields = error.field_errors().expect("field errors");
    assert!(fields.first("password_confirm").is_some());
    assert!(storage.is_empty());

    // nothing reached the backend, so alice can still register
    session.register(&alice_credentials()).await?;
    Ok(())
}

#[tokio::test]
async fn revoked_token_expires_the_session() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_bob_user().await?;
    let storage = MemoryStorage::default();
    let session = session_for(&app, &storage);
    session.login(&login_credentials("bob")).await?;

    app.revoke_all_tokens();

    let error = session
        .refresh_user()
        .await
        .expect_err("the token was revoked");
    assert!(error.is_auth_expired());
    assert!(storage.is_empty());
    assert!(!session.client().has_token());
    Ok(())
}

#[tokio::test]
async fn sign_out_invalidates_the_token_on_the_backend() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_bob_user().await?;
    let storage = MemoryStorage::default();
    let session = session_for(&app, &storage);
    session.login(&login_credentials("bob")).await?;

    let token = session.client().token().expect("logged in");
    session.sign_out().await;
    assert!(storage.is_empty());
    assert!(!session.client().has_token());

    let stale = app.new_client();
    stale.set_token(token);
    let result = stale.current_user().await;
    assert!(matches!(result, Err(ClientError::AuthExpired)));
    Ok(())
}

#[tokio::test]
async fn profile_updates_are_cached() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_bob_user().await?;
    let storage = MemoryStorage::default();
    let session = session_for(&app, &storage);
    session.login(&login_credentials("bob")).await?;

    let updated = session
        .update_profile(&requests::UpdateProfile {
            first_name: Some("Robert".into()),
            ..Default::default()
        })
        .await?;
    assert_eq!(updated.first_name, "Robert");

    let reloaded = session_for(&app, &storage);
    let AuthState::LoggedIn(cached) = reloaded.initialize() else {
        panic!("expected a restored session");
    };
    assert_eq!(cached.first_name, "Robert");
    Ok(())
}

#[tokio::test]
async fn invalid_email_reports_field_errors() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_bob_user().await?;
    let storage = MemoryStorage::default();
    let session = session_for(&app, &storage);
    session.login(&login_credentials("bob")).await?;

    let error = session
        .update_profile(&requests::UpdateProfile {
            email: Some("not-an-email".into()),
            ..Default::default()
        })
        .await
        .expect_err("email is invalid");
    let fields = error.field_errors().expect("field errors");
    assert!(fields.first("email").is_some());
    // a rejected update keeps the session
    assert!(session.client().has_token());
    Ok(())
}

#[tokio::test]
async fn token_only_login_fetches_the_user() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    app.omit_user_on_login();
    let storage = MemoryStorage::default();
    let session = session_for(&app, &storage);

    let user = session.login(&login_credentials("bob")).await?;
    assert_eq!(user, bob);
    assert!(session.client().has_token());

    let stored: payloads::responses::UserSummary =
        serde_json::from_str(&storage.get("user_data").unwrap_or_default())?;
    assert_eq!(stored, bob);

    let reloaded = session_for(&app, &storage);
    assert_eq!(reloaded.initialize(), AuthState::LoggedIn(bob));
    Ok(())
}

#[tokio::test]
async fn failed_user_fetch_after_login_leaves_no_session() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_bob_user().await?;
    app.issue_dead_tokens_on_login();
    let storage = MemoryStorage::default();
    let session = session_for(&app, &storage);

    let error = session
        .login(&login_credentials("bob"))
        .await
        .expect_err("the user could not be fetched");
    assert!(error.is_auth_expired());
    assert!(storage.is_empty());
    assert!(!session.client().has_token());
    assert_eq!(session_for(&app, &storage).initialize(), AuthState::LoggedOut);
    Ok(())
}
