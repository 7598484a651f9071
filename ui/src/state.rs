use payloads::{Role, responses};
use yewdux::prelude::*;

#[derive(Clone, Debug, PartialEq, Default)]
pub enum AuthState {
    /// Stored session not checked yet
    #[default]
    Unknown,
    LoggedOut,
    LoggedIn(responses::UserSummary),
}

#[derive(Default, Clone, PartialEq, Store)]
pub struct State {
    pub auth_state: AuthState,
}

impl State {
    pub fn is_authenticated(&self) -> bool {
        matches!(self.auth_state, AuthState::LoggedIn(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.auth_state, AuthState::Unknown)
    }

    pub fn user(&self) -> Option<&responses::UserSummary> {
        match &self.auth_state {
            AuthState::LoggedIn(user) => Some(user),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }

    pub fn login(&mut self, user: responses::UserSummary) {
        self.auth_state = AuthState::LoggedIn(user);
    }

    pub fn logout(&mut self) {
        self.auth_state = AuthState::LoggedOut;
    }
}
