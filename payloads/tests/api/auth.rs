use payloads::{ClientError, Role, requests};
use reqwest::StatusCode;

use test_helpers::{
    alice_credentials, assert_status_code, login_credentials, spawn_app,
};

#[tokio::test]
async fn login_refused() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let body = requests::LoginCredentials {
        username: "random".into(),
        password: "random".into(),
    };
    let result = app.client.login(&body).await;

    // no token was attached, so this is not an expired session
    match result {
        Err(ClientError::APIError(code, text)) => {
            assert_eq!(code, StatusCode::UNAUTHORIZED);
            assert_eq!(text, "Invalid credentials");
        }
        other => panic!("Expected APIError, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn register_returns_user_and_token() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let response = app.client.register(&alice_credentials()).await?;
    let user = response.user.expect("registration embeds the user");
    assert_eq!(user.username, "alice");
    assert_eq!(user.role, Role::Patient);
    assert!(!response.token.is_empty());

    app.client.set_token(response.token);
    let me = app.client.current_user().await?;
    assert_eq!(me, user);

    Ok(())
}

#[tokio::test]
async fn invalid_registration_reports_field_errors() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;

    let mut body = alice_credentials();
    body.password_confirm = "something-else".into();
    let result = app.new_client().register(&body).await;

    let fields = match result {
        Err(ClientError::Validation(fields)) => fields,
        other => panic!("Expected validation errors, got {other:?}"),
    };
    assert_eq!(
        fields.first("username"),
        Some("A user with that username already exists.")
    );
    assert_eq!(fields.first("password_confirm"), Some("Passwords do not match"));
    assert!(fields.get("first_name").is_none());

    Ok(())
}

#[tokio::test]
async fn admins_cannot_self_register() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let mut body = alice_credentials();
    body.role = Role::Admin;
    let result = app.client.register(&body).await;
    assert!(
        result
            .as_ref()
            .err()
            .and_then(ClientError::field_errors)
            .is_some_and(|fields| fields.get("user_type").is_some()),
        "unexpected result {result:?}"
    );

    Ok(())
}

#[tokio::test]
async fn revoked_token_means_expired_session() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;

    app.revoke_all_tokens();
    let result = app.client.current_user().await;
    assert!(matches!(result, Err(ClientError::AuthExpired)));

    Ok(())
}

#[tokio::test]
async fn missing_token_is_not_an_expired_session() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let result = app.client.current_user().await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn logout_invalidates_the_token() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;

    let other_session = app.new_client();
    let response = other_session.login(&login_credentials("alice")).await?;
    other_session.set_token(response.token);

    app.client.logout().await?;
    assert!(matches!(
        app.client.current_user().await,
        Err(ClientError::AuthExpired)
    ));

    // other tokens for the same user stay valid
    other_session.current_user().await?;

    Ok(())
}

#[tokio::test]
async fn update_profile() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;

    let details = requests::UpdateProfile {
        first_name: Some("Alicia".into()),
        phone_number: Some("555-0100".into()),
        ..Default::default()
    };
    let user = app.client.update_profile(&details).await?;
    assert_eq!(user.first_name, "Alicia");
    assert_eq!(user.last_name, "Anderson");
    assert_eq!(app.client.current_user().await?.display_name(), "Alicia Anderson");

    let invalid = requests::UpdateProfile {
        email: Some("not-an-email".into()),
        ..Default::default()
    };
    let result = app.client.update_profile(&invalid).await;
    assert!(matches!(result, Err(ClientError::Validation(_))));

    Ok(())
}

#[tokio::test]
async fn change_password() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;

    let wrong = requests::ChangePassword {
        old_password: "not-my-password".into(),
        new_password: "a-new-password".into(),
    };
    let result = app.client.change_password(&wrong).await;
    let fields = result.as_ref().err().and_then(ClientError::field_errors);
    assert_eq!(fields.and_then(|f| f.first("old_password")), Some("Wrong password."));

    let details = requests::ChangePassword {
        old_password: test_helpers::TEST_PASSWORD.into(),
        new_password: "a-new-password".into(),
    };
    let message = app.client.change_password(&details).await?;
    assert_eq!(message.message, "Password changed successfully");

    let result = app.new_client().login(&login_credentials("alice")).await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);

    app.new_client()
        .login(&requests::LoginCredentials {
            username: "alice".into(),
            password: "a-new-password".into(),
        })
        .await?;

    Ok(())
}

#[tokio::test]
async fn patients_only_see_physiotherapists() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_bob_user().await?;
    app.create_carol_user().await?;
    app.create_alice_user().await?;

    let users = app.client.list_users(&requests::UserQuery::default()).await?;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "bob");

    let physios = app.client.physiotherapists().await?;
    assert_eq!(physios, users);

    Ok(())
}

#[tokio::test]
async fn admin_manages_users() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_admin_user()?;
    let carol = app.create_carol_user().await?;
    app.login_admin().await?;

    let query = requests::UserQuery {
        role: Some(Role::Patient),
        ..Default::default()
    };
    assert_eq!(app.client.list_users(&query).await?, vec![carol.clone()]);

    let details = requests::UpdateUser {
        is_active: Some(false),
        ..Default::default()
    };
    let updated = app.client.update_user(&carol.id, &details).await?;
    assert!(!updated.is_active);

    // deactivated accounts cannot log in
    let result = app.new_client().login(&login_credentials("carol")).await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);

    app.client.delete_user(&carol.id).await?;
    assert_status_code(app.client.get_user(&carol.id).await, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn patients_cannot_delete_users() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    app.create_alice_user().await?;

    let result = app.client.delete_user(&bob.id).await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    Ok(())
}
