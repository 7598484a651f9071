//! Who is signed in, kept in durable storage so it survives reloads.
//!
//! [`SessionService`] owns the auth token held by the [`APIClient`] and the
//! two storage entries (token and serialized user). Every operation reports
//! failure through [`SessionError`]; nothing here panics.

use payloads::{APIClient, ClientError, FieldErrors, requests, responses};

use crate::config::AuthConfig;
use crate::state::AuthState;
use crate::storage::DurableStorage;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("Could not save your session")]
    Serialize(#[from] serde_json::Error),
}

impl SessionError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Client(e) => e.field_errors(),
            Self::Serialize(_) => None,
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Client(ClientError::AuthExpired))
    }
}

/// Storage key names for the token and the cached user.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageKeys {
    pub token: String,
    pub user: String,
}

impl From<&AuthConfig> for StorageKeys {
    fn from(auth: &AuthConfig) -> Self {
        Self {
            token: auth.token_storage_key.clone(),
            user: auth.user_storage_key.clone(),
        }
    }
}

pub struct SessionService<S> {
    client: APIClient,
    storage: S,
    keys: StorageKeys,
}

impl<S: DurableStorage> SessionService<S> {
    pub fn new(client: APIClient, storage: S, keys: StorageKeys) -> Self {
        Self {
            client,
            storage,
            keys,
        }
    }

    pub fn client(&self) -> &APIClient {
        &self.client
    }

    /// Restore the session saved by a previous page load.
    ///
    /// Both entries must be present and the user must parse; anything else
    /// clears the stored entries and starts logged out.
    pub fn initialize(&self) -> AuthState {
        let token = self.storage.get(&self.keys.token);
        let user = self.storage.get(&self.keys.user);

        match (token, user) {
            (Some(token), Some(user)) => {
                match serde_json::from_str::<responses::UserSummary>(&user) {
                    Ok(user) => {
                        self.client.set_token(token);
                        tracing::info!(user_id = %user.id, "restored session");
                        AuthState::LoggedIn(user)
                    }
                    Err(e) => {
                        tracing::warn!("discarding unreadable stored user: {e}");
                        self.clear();
                        AuthState::LoggedOut
                    }
                }
            }
            (None, None) => AuthState::LoggedOut,
            _ => {
                tracing::warn!("discarding incomplete stored session");
                self.clear();
                AuthState::LoggedOut
            }
        }
    }

    pub async fn login(
        &self,
        credentials: &requests::LoginCredentials,
    ) -> Result<responses::UserSummary, SessionError> {
        // a stale token would turn a bad password into "session expired"
        self.clear();

        let response = match self.client.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(username = %credentials.username, "login failed: {e}");
                return Err(e.into());
            }
        };
        let user = self.establish(response).await?;
        tracing::info!(user_id = %user.id, "logged in");
        Ok(user)
    }

    /// Create an account. When the backend hands back a token the new user
    /// is signed in straight away and returned.
    pub async fn register(
        &self,
        details: &requests::RegisterAccount,
    ) -> Result<Option<responses::UserSummary>, SessionError> {
        let problems = details.validate();
        if !problems.is_empty() {
            return Err(ClientError::Validation(problems.into_iter().collect()).into());
        }

        self.clear();
        let response = self.client.register(details).await?;
        if response.token.is_empty() {
            tracing::info!(username = %details.username, "registered");
            return Ok(None);
        }
        let user = self.establish(response).await?;
        tracing::info!(user_id = %user.id, "registered and logged in");
        Ok(Some(user))
    }

    /// Forget the session locally. Never fails.
    pub fn logout(&self) {
        self.clear();
        tracing::info!("logged out");
    }

    /// Forget the session locally, then ask the backend to invalidate the
    /// token. A failure on the backend side is logged and otherwise ignored.
    pub async fn sign_out(&self) {
        let token = self.client.token();
        self.logout();

        if let Some(token) = token {
            let detached = APIClient::new(
                self.client.address.clone(),
                self.client.inner_client.clone(),
            );
            detached.set_token(token);
            if let Err(e) = detached.logout().await {
                tracing::warn!("backend logout failed: {e}");
            }
        }
    }

    /// The backend rejected our token.
    pub fn expire(&self) {
        tracing::info!("session expired");
        self.clear();
    }

    /// Reload the signed in user from the backend and cache it.
    pub async fn refresh_user(
        &self,
    ) -> Result<responses::UserSummary, SessionError> {
        let user = self.guard(self.client.current_user().await)?;
        self.persist_user(&user)?;
        Ok(user)
    }

    pub async fn update_profile(
        &self,
        details: &requests::UpdateProfile,
    ) -> Result<responses::UserSummary, SessionError> {
        let user = self.guard(self.client.update_profile(details).await)?;
        self.persist_user(&user)?;
        tracing::info!(user_id = %user.id, "profile updated");
        Ok(user)
    }

    pub async fn change_password(
        &self,
        details: &requests::ChangePassword,
    ) -> Result<(), SessionError> {
        self.guard(self.client.change_password(details).await)?;
        tracing::info!("password changed");
        Ok(())
    }

    async fn establish(
        &self,
        response: responses::AuthResponse,
    ) -> Result<responses::UserSummary, SessionError> {
        self.client.set_token(response.token.clone());
        let user = match response.user {
            Some(user) => user,
            None => match self.client.current_user().await {
                Ok(user) => user,
                Err(e) => {
                    self.clear();
                    return Err(e.into());
                }
            },
        };

        if let Err(e) = self.persist_user(&user) {
            self.clear();
            return Err(e);
        }
        self.storage.set(&self.keys.token, &response.token);
        Ok(user)
    }

    fn persist_user(
        &self,
        user: &responses::UserSummary,
    ) -> Result<(), SessionError> {
        let json = serde_json::to_string(user)?;
        self.storage.set(&self.keys.user, &json);
        Ok(())
    }

    /// Clear the session when a call reports the token as expired.
    fn guard<T>(&self, result: Result<T, ClientError>) -> Result<T, SessionError> {
        if let Err(ClientError::AuthExpired) = &result {
            self.expire();
        }
        Ok(result?)
    }

    fn clear(&self) {
        self.client.clear_token();
        self.storage.remove(&self.keys.token);
        self.storage.remove(&self.keys.user);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn service(storage: &MemoryStorage) -> SessionService<MemoryStorage> {
        let client =
            APIClient::new("http://127.0.0.1:9/api", reqwest::Client::new());
        SessionService::new(
            client,
            storage.clone(),
            StorageKeys {
                token: "token".into(),
                user: "user".into(),
            },
        )
    }

    #[test]
    fn empty_storage_is_logged_out() {
        let storage = MemoryStorage::default();
        assert_eq!(service(&storage).initialize(), AuthState::LoggedOut);
    }

    #[test]
    fn restores_token_and_user() {
        let storage = MemoryStorage::default();
        storage.set("token", "abc");
        storage.set(
            "user",
            r#"{"id": 1, "username": "pat1", "email": "pat1@example.com",
                "user_type": "patient"}"#,
        );

        let session = service(&storage);
        let AuthState::LoggedIn(user) = session.initialize() else {
            panic!("expected a restored session");
        };
        assert_eq!(user.username, "pat1");
        assert_eq!(session.client().token().as_deref(), Some("abc"));
    }

    #[test]
    fn corrupt_user_is_purged() {
        let storage = MemoryStorage::default();
        storage.set("token", "abc");
        storage.set("user", "{not json");

        let session = service(&storage);
        assert_eq!(session.initialize(), AuthState::LoggedOut);
        assert!(storage.is_empty());
        assert!(!session.client().has_token());
    }

    #[test]
    fn token_without_user_is_purged() {
        let storage = MemoryStorage::default();
        storage.set("token", "abc");

        assert_eq!(service(&storage).initialize(), AuthState::LoggedOut);
        assert!(!storage.contains("token"));
    }

    #[test]
    fn logout_clears_everything() {
        let storage = MemoryStorage::default();
        storage.set("token", "abc");
        storage.set("user", "{}");
        let session = service(&storage);
        session.client().set_token("abc");

        session.logout();
        assert!(storage.is_empty());
        assert!(!session.client().has_token());
    }
}
