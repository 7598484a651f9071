use crate::{
    AppointmentId, ConversationId, ExerciseId, ExercisePlanId, ListEnvelope,
    NotificationId, UserId, requests, responses,
};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// Authorization scheme expected by the backend's token authentication.
const AUTH_SCHEME: &str = "Token";

/// A sent request together with whether it carried the auth token, which
/// decides how a 401 is interpreted.
pub struct Reply {
    pub response: reqwest::Response,
    pub authenticated: bool,
}

type ReplyResult = Result<Reply, reqwest::Error>;

/// An API client for interfacing with the backend.
///
/// Clones share the same auth token, so setting or clearing it through any
/// handle affects every request made afterwards.
#[derive(Clone)]
pub struct APIClient {
    /// Base address including the api prefix, e.g. `http://host:12000/api`.
    pub address: String,
    pub inner_client: reqwest::Client,
    token: Arc<RwLock<Option<String>>>,
}

impl APIClient {
    pub fn new(address: impl Into<String>, inner_client: reqwest::Client) -> Self {
        Self {
            address: address.into(),
            inner_client,
            token: Arc::default(),
        }
    }

    /// Build a client whose requests time out after `timeout`. Browsers
    /// manage fetch timeouts themselves, so the limit only applies natively.
    pub fn with_timeout(
        address: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let builder = reqwest::Client::builder();

        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(timeout);
        #[cfg(target_arch = "wasm32")]
        let _ = timeout;

        Ok(Self::new(address, builder.build()?))
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) =
            Some(token.into());
    }

    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// Helper methods for http actions
impl APIClient {
    fn format_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.address.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> (RequestBuilder, bool) {
        let request = self.inner_client.request(method, self.format_url(path));
        match self.token() {
            Some(token) => (
                request.header(
                    reqwest::header::AUTHORIZATION,
                    format!("{AUTH_SCHEME} {token}"),
                ),
                true,
            ),
            None => (request, false),
        }
    }

    async fn send(request: RequestBuilder, authenticated: bool) -> ReplyResult {
        let response = request.send().await?;
        Ok(Reply {
            response,
            authenticated,
        })
    }

    async fn empty_get(&self, path: &str) -> ReplyResult {
        let (request, authenticated) = self.request(Method::GET, path);
        Self::send(request, authenticated).await
    }

    async fn query_get(
        &self,
        path: &str,
        query: &impl Serialize,
    ) -> ReplyResult {
        let (request, authenticated) = self.request(Method::GET, path);
        Self::send(request.query(query), authenticated).await
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> ReplyResult {
        let (request, authenticated) = self.request(Method::POST, path);
        Self::send(request.json(body), authenticated).await
    }

    async fn empty_post(&self, path: &str) -> ReplyResult {
        let (request, authenticated) = self.request(Method::POST, path);
        Self::send(request, authenticated).await
    }

    async fn put(&self, path: &str, body: &impl Serialize) -> ReplyResult {
        let (request, authenticated) = self.request(Method::PUT, path);
        Self::send(request.json(body), authenticated).await
    }

    async fn patch(&self, path: &str, body: &impl Serialize) -> ReplyResult {
        let (request, authenticated) = self.request(Method::PATCH, path);
        Self::send(request.json(body), authenticated).await
    }

    async fn delete(&self, path: &str) -> ReplyResult {
        let (request, authenticated) = self.request(Method::DELETE, path);
        Self::send(request, authenticated).await
    }
}

/// Authentication and the current user
impl APIClient {
    pub async fn health_check(
        &self,
    ) -> Result<responses::HealthStatus, ClientError> {
        let reply = self.empty_get("health/").await?;
        ok_body(reply).await
    }

    /// Exchange credentials for a token. The token is not stored on the
    /// client; the session layer decides when to adopt it.
    pub async fn login(
        &self,
        details: &requests::LoginCredentials,
    ) -> Result<responses::AuthResponse, ClientError> {
        let reply = self.post("auth/login/", details).await?;
        ok_body(reply).await
    }

    pub async fn register(
        &self,
        details: &requests::RegisterAccount,
    ) -> Result<responses::AuthResponse, ClientError> {
        let reply = self.post("auth/register/", details).await?;
        ok_body(reply).await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let reply = self.empty_post("auth/logout/").await?;
        ok_empty(reply).await
    }

    pub async fn current_user(
        &self,
    ) -> Result<responses::UserSummary, ClientError> {
        let reply = self.empty_get("users/me/").await?;
        ok_body(reply).await
    }

    pub async fn update_profile(
        &self,
        details: &requests::UpdateProfile,
    ) -> Result<responses::UserSummary, ClientError> {
        let reply = self.put("auth/profile/", details).await?;
        ok_body(reply).await
    }

    pub async fn change_password(
        &self,
        details: &requests::ChangePassword,
    ) -> Result<responses::SuccessMessage, ClientError> {
        let reply = self.post("users/change_password/", details).await?;
        ok_body(reply).await
    }
}

/// Appointments and booking
impl APIClient {
    pub async fn list_appointments(
        &self,
        query: &requests::AppointmentQuery,
    ) -> Result<Vec<responses::Appointment>, ClientError> {
        let reply = self.query_get("appointments/", query).await?;
        ok_list(reply).await
    }

    pub async fn upcoming_appointments(
        &self,
    ) -> Result<Vec<responses::Appointment>, ClientError> {
        let reply = self.empty_get("appointments/upcoming/").await?;
        ok_list(reply).await
    }

    pub async fn todays_appointments(
        &self,
    ) -> Result<Vec<responses::Appointment>, ClientError> {
        let reply = self.empty_get("appointments/today/").await?;
        ok_list(reply).await
    }

    pub async fn get_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<responses::Appointment, ClientError> {
        let reply = self
            .empty_get(&format!("appointments/{appointment_id}/"))
            .await?;
        ok_body(reply).await
    }

    pub async fn create_appointment(
        &self,
        details: &requests::CreateAppointment,
    ) -> Result<responses::Appointment, ClientError> {
        let reply = self.post("appointments/", details).await?;
        ok_body(reply).await
    }

    pub async fn update_appointment(
        &self,
        appointment_id: &AppointmentId,
        details: &requests::UpdateAppointment,
    ) -> Result<responses::Appointment, ClientError> {
        let reply = self
            .patch(&format!("appointments/{appointment_id}/"), details)
            .await?;
        ok_body(reply).await
    }

    pub async fn cancel_appointment(
        &self,
        appointment_id: &AppointmentId,
        details: &requests::CancelAppointment,
    ) -> Result<responses::Appointment, ClientError> {
        let reply = self
            .post(&format!("appointments/{appointment_id}/cancel/"), details)
            .await?;
        ok_body(reply).await
    }

    pub async fn confirm_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<responses::Appointment, ClientError> {
        let reply = self
            .empty_post(&format!("appointments/{appointment_id}/confirm/"))
            .await?;
        ok_body(reply).await
    }

    pub async fn complete_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<responses::Appointment, ClientError> {
        let reply = self
            .empty_post(&format!("appointments/{appointment_id}/complete/"))
            .await?;
        ok_body(reply).await
    }

    /// Bookable slots for a physiotherapist on a given day, as computed by
    /// the backend from existing appointments.
    pub async fn available_time_slots(
        &self,
        query: &requests::TimeSlotQuery,
    ) -> Result<Vec<responses::TimeSlot>, ClientError> {
        let reply =
            self.query_get("appointments/available-slots/", query).await?;
        ok_list(reply).await
    }
}

/// Exercises, plans and progress
impl APIClient {
    pub async fn list_exercises(
        &self,
        query: &requests::ExerciseQuery,
    ) -> Result<Vec<responses::Exercise>, ClientError> {
        let reply = self.query_get("exercises/", query).await?;
        ok_list(reply).await
    }

    pub async fn exercise_categories(
        &self,
    ) -> Result<Vec<responses::ExerciseCategory>, ClientError> {
        let reply = self.empty_get("exercise-categories/").await?;
        ok_list(reply).await
    }

    pub async fn get_exercise(
        &self,
        exercise_id: &ExerciseId,
    ) -> Result<responses::Exercise, ClientError> {
        let reply = self.empty_get(&format!("exercises/{exercise_id}/")).await?;
        ok_body(reply).await
    }

    pub async fn create_exercise(
        &self,
        details: &requests::NewExercise,
    ) -> Result<responses::Exercise, ClientError> {
        let reply = self.post("exercises/", details).await?;
        ok_body(reply).await
    }

    pub async fn update_exercise(
        &self,
        exercise_id: &ExerciseId,
        details: &requests::UpdateExercise,
    ) -> Result<responses::Exercise, ClientError> {
        let reply = self
            .patch(&format!("exercises/{exercise_id}/"), details)
            .await?;
        ok_body(reply).await
    }

    pub async fn delete_exercise(
        &self,
        exercise_id: &ExerciseId,
    ) -> Result<(), ClientError> {
        let reply = self.delete(&format!("exercises/{exercise_id}/")).await?;
        ok_empty(reply).await
    }

    pub async fn list_exercise_plans(
        &self,
        query: &requests::ExercisePlanQuery,
    ) -> Result<Vec<responses::ExercisePlan>, ClientError> {
        let reply = self.query_get("exercise-plans/", query).await?;
        ok_list(reply).await
    }

    pub async fn active_exercise_plans(
        &self,
    ) -> Result<Vec<responses::ExercisePlan>, ClientError> {
        let reply = self.empty_get("exercise-plans/active/").await?;
        ok_list(reply).await
    }

    pub async fn plan_items(
        &self,
        plan_id: &ExercisePlanId,
    ) -> Result<Vec<responses::PlanItem>, ClientError> {
        let query = requests::PlanItemQuery {
            exercise_plan: *plan_id,
        };
        let reply = self.query_get("exercise-plan-items/", &query).await?;
        ok_list(reply).await
    }

    pub async fn activate_exercise_plan(
        &self,
        plan_id: &ExercisePlanId,
    ) -> Result<responses::ExercisePlan, ClientError> {
        let reply = self
            .empty_post(&format!("exercise-plans/{plan_id}/activate/"))
            .await?;
        ok_body(reply).await
    }

    pub async fn complete_exercise_plan(
        &self,
        plan_id: &ExercisePlanId,
    ) -> Result<responses::ExercisePlan, ClientError> {
        let reply = self
            .empty_post(&format!("exercise-plans/{plan_id}/complete/"))
            .await?;
        ok_body(reply).await
    }

    pub async fn list_exercise_progress(
        &self,
        query: &requests::ExerciseProgressQuery,
    ) -> Result<Vec<responses::ExerciseProgress>, ClientError> {
        let reply = self.query_get("exercise-progress/", query).await?;
        ok_list(reply).await
    }

    pub async fn create_exercise_progress(
        &self,
        details: &requests::NewExerciseProgress,
    ) -> Result<responses::ExerciseProgress, ClientError> {
        let reply = self.post("exercise-progress/", details).await?;
        ok_body(reply).await
    }

    pub async fn exercise_progress_stats(
        &self,
        plan_id: Option<ExercisePlanId>,
    ) -> Result<responses::ProgressStats, ClientError> {
        let query = requests::ProgressStatsQuery {
            exercise_plan: plan_id,
        };
        let reply = self.query_get("exercise-progress/stats/", &query).await?;
        ok_body(reply).await
    }
}

/// User management
impl APIClient {
    pub async fn list_users(
        &self,
        query: &requests::UserQuery,
    ) -> Result<Vec<responses::UserSummary>, ClientError> {
        let reply = self.query_get("users/", query).await?;
        ok_list(reply).await
    }

    pub async fn physiotherapists(
        &self,
    ) -> Result<Vec<responses::UserSummary>, ClientError> {
        let query = requests::UserQuery {
            role: Some(crate::Role::Physiotherapist),
            is_active: Some(true),
            ..Default::default()
        };
        self.list_users(&query).await
    }

    pub async fn get_user(
        &self,
        user_id: &UserId,
    ) -> Result<responses::UserSummary, ClientError> {
        let reply = self.empty_get(&format!("users/{user_id}/")).await?;
        ok_body(reply).await
    }

    pub async fn create_user(
        &self,
        details: &requests::RegisterAccount,
    ) -> Result<responses::UserSummary, ClientError> {
        let reply = self.post("users/", details).await?;
        ok_body(reply).await
    }

    pub async fn update_user(
        &self,
        user_id: &UserId,
        details: &requests::UpdateUser,
    ) -> Result<responses::UserSummary, ClientError> {
        let reply = self.patch(&format!("users/{user_id}/"), details).await?;
        ok_body(reply).await
    }

    pub async fn delete_user(&self, user_id: &UserId) -> Result<(), ClientError> {
        let reply = self.delete(&format!("users/{user_id}/")).await?;
        ok_empty(reply).await
    }
}

/// Notifications stored by the backend
impl APIClient {
    pub async fn list_notifications(
        &self,
        query: &requests::NotificationQuery,
    ) -> Result<Vec<responses::Notification>, ClientError> {
        let reply = self.query_get("notifications/", query).await?;
        ok_list(reply).await
    }

    pub async fn unread_notifications(
        &self,
    ) -> Result<Vec<responses::Notification>, ClientError> {
        let reply = self.empty_get("notifications/unread/").await?;
        ok_list(reply).await
    }

    pub async fn unread_notification_count(&self) -> Result<usize, ClientError> {
        Ok(self.unread_notifications().await?.len())
    }

    pub async fn mark_notification_read(
        &self,
        notification_id: &NotificationId,
    ) -> Result<(), ClientError> {
        let reply = self
            .empty_post(&format!("notifications/{notification_id}/mark_read/"))
            .await?;
        ok_empty(reply).await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<(), ClientError> {
        let reply = self.empty_post("notifications/mark_all_read/").await?;
        ok_empty(reply).await
    }
}

/// Dashboard, analytics and search
impl APIClient {
    pub async fn dashboard_stats(
        &self,
    ) -> Result<responses::DashboardStats, ClientError> {
        let reply = self.empty_get("dashboard/stats/").await?;
        ok_body(reply).await
    }

    pub async fn recent_activity(
        &self,
        limit: u32,
    ) -> Result<Vec<responses::ActivityItem>, ClientError> {
        let query = requests::ActivityQuery { limit };
        let reply = self.query_get("dashboard/activity/", &query).await?;
        ok_list(reply).await
    }

    pub async fn exercise_analytics(
        &self,
        days: u32,
    ) -> Result<responses::ExerciseAnalytics, ClientError> {
        let query = requests::AnalyticsWindow { days };
        let reply = self.query_get("analytics/exercises/", &query).await?;
        ok_body(reply).await
    }

    pub async fn appointment_analytics(
        &self,
        days: u32,
    ) -> Result<responses::AppointmentAnalytics, ClientError> {
        let query = requests::AnalyticsWindow { days };
        let reply = self.query_get("analytics/appointments/", &query).await?;
        ok_body(reply).await
    }

    pub async fn search(
        &self,
        query: &requests::SearchQuery,
    ) -> Result<responses::SearchResults, ClientError> {
        let reply = self.query_get("search/", query).await?;
        ok_body(reply).await
    }

    pub async fn quick_action(
        &self,
        details: &requests::QuickAction,
    ) -> Result<responses::QuickActionResult, ClientError> {
        let reply = self.post("actions/", details).await?;
        ok_body(reply).await
    }
}

/// Conversations and messages
impl APIClient {
    pub async fn conversations(
        &self,
    ) -> Result<Vec<responses::Conversation>, ClientError> {
        let reply = self.empty_get("conversations/").await?;
        ok_list(reply).await
    }

    pub async fn messages(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<responses::Message>, ClientError> {
        let query = requests::MessageQuery {
            conversation: *conversation_id,
        };
        let reply = self.query_get("messages/", &query).await?;
        ok_list(reply).await
    }

    pub async fn send_message(
        &self,
        details: &requests::SendMessage,
    ) -> Result<responses::Message, ClientError> {
        let reply = self.post("messages/", details).await?;
        ok_body(reply).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A request carrying the auth token was rejected; the token is no
    /// longer valid and the session must be cleared.
    #[error("Your session has expired. Please sign in again.")]
    AuthExpired,
    /// Field-level validation failures, to be shown next to form inputs.
    #[error("{0}")]
    Validation(FieldErrors),
    /// An unhandled API error to display, containing the extracted message.
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::AuthExpired => Some(StatusCode::UNAUTHORIZED),
            Self::Validation(_) => Some(StatusCode::BAD_REQUEST),
            Self::APIError(status, _) => Some(*status),
            Self::Network(e) => e.status(),
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Per-field validation messages from a 400 response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(pub BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Key used by the backend for errors not tied to a single field.
    pub const NON_FIELD: &'static str = "non_field_errors";

    /// Parse a `{field: [messages]}` body. Bodies that only carry a general
    /// `error`/`detail` message are not field errors.
    pub fn parse(body: &str) -> Option<Self> {
        let serde_json::Value::Object(map) =
            serde_json::from_str::<serde_json::Value>(body).ok()?
        else {
            return None;
        };

        let mut fields = BTreeMap::new();
        for (field, value) in map {
            if field == "error" || field == "detail" {
                continue;
            }
            let messages = match value {
                serde_json::Value::String(message) => vec![message],
                serde_json::Value::Array(items) => items
                    .into_iter()
                    .filter_map(|item| match item {
                        serde_json::Value::String(message) => Some(message),
                        _ => None,
                    })
                    .collect(),
                _ => continue,
            };
            if !messages.is_empty() {
                fields.insert(field, messages);
            }
        }

        if fields.is_empty() {
            None
        } else {
            Some(Self(fields))
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field)?.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (field, message) in iter {
            fields
                .entry(field.to_string())
                .or_default()
                .push(message.to_string());
        }
        Self(fields)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str(" ")?;
                }
                first = false;
                if field == Self::NON_FIELD {
                    write!(f, "{message}")?;
                } else {
                    write!(f, "{field}: {message}")?;
                }
            }
        }
        Ok(())
    }
}

/// Pull a human readable message out of an error body.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) =
        serde_json::from_str::<serde_json::Value>(body)
    {
        for key in ["error", "detail", "message"] {
            if let Some(serde_json::Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

/// Map a failed response onto the error taxonomy.
pub fn classify_error(
    status: StatusCode,
    body: &str,
    authenticated: bool,
) -> ClientError {
    tracing::debug!(%status, authenticated, "api request failed");
    if status == StatusCode::UNAUTHORIZED && authenticated {
        return ClientError::AuthExpired;
    }
    if status == StatusCode::BAD_REQUEST
        && let Some(fields) = FieldErrors::parse(body)
    {
        return ClientError::Validation(fields);
    }
    ClientError::APIError(status, error_message(status, body))
}

async fn into_error(reply: Reply) -> ClientError {
    let status = reply.response.status();
    match reply.response.text().await {
        Ok(body) => classify_error(status, &body, reply.authenticated),
        Err(e) => ClientError::Network(e),
    }
}

/// Deserialize a successful request into the desired type, or return an
/// appropriate error.
pub async fn ok_body<T: serde::de::DeserializeOwned>(
    reply: Reply,
) -> Result<T, ClientError> {
    if !reply.response.status().is_success() {
        return Err(into_error(reply).await);
    }
    Ok(reply.response.json::<T>().await?)
}

/// Deserialize a list response, accepting both bare arrays and paginated
/// envelopes.
pub async fn ok_list<T: serde::de::DeserializeOwned>(
    reply: Reply,
) -> Result<Vec<T>, ClientError> {
    Ok(ok_body::<ListEnvelope<T>>(reply).await?.into_vec())
}

/// Check that an empty response is OK, returning a ClientError if not.
pub async fn ok_empty(reply: Reply) -> Result<(), ClientError> {
    if !reply.response.status().is_success() {
        return Err(into_error(reply).await);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_with_token_means_expired_session() {
        let error = classify_error(
            StatusCode::UNAUTHORIZED,
            r#"{"detail": "Invalid token."}"#,
            true,
        );
        assert!(matches!(error, ClientError::AuthExpired));
    }

    #[test]
    fn unauthorized_without_token_is_a_plain_error() {
        let error = classify_error(
            StatusCode::UNAUTHORIZED,
            r#"{"error": "Invalid credentials"}"#,
            false,
        );
        match error {
            ClientError::APIError(status, message) => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(message, "Invalid credentials");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bad_request_with_field_map_is_validation() {
        let error = classify_error(
            StatusCode::BAD_REQUEST,
            r#"{"username": ["A user with that username already exists."],
                "password": "This password is too short."}"#,
            false,
        );
        let fields = error.field_errors().expect("field errors");
        assert_eq!(
            fields.first("username"),
            Some("A user with that username already exists.")
        );
        assert_eq!(fields.first("password"), Some("This password is too short."));
        assert_eq!(
            error.to_string(),
            "password: This password is too short. \
             username: A user with that username already exists."
        );
    }

    #[test]
    fn bad_request_with_only_detail_is_not_validation() {
        let error = classify_error(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Slot already taken"}"#,
            true,
        );
        assert!(matches!(
            error,
            ClientError::APIError(StatusCode::BAD_REQUEST, ref m) if m == "Slot already taken"
        ));
    }

    #[test]
    fn non_json_body_is_used_verbatim_and_empty_body_uses_reason() {
        let error = classify_error(StatusCode::NOT_FOUND, " gone ", true);
        assert_eq!(error.to_string(), "gone");
        let error = classify_error(StatusCode::NOT_FOUND, "", true);
        assert_eq!(error.to_string(), "Not Found");
    }

    #[test]
    fn non_field_errors_display_without_prefix() {
        let fields = FieldErrors::parse(
            r#"{"non_field_errors": ["End time must be after start time."]}"#,
        )
        .unwrap();
        assert_eq!(fields.to_string(), "End time must be after start time.");
    }

    #[test]
    fn token_is_shared_between_clones() {
        let client = APIClient::new("http://localhost/api", reqwest::Client::new());
        let clone = client.clone();
        client.set_token("abc");
        assert_eq!(clone.token().as_deref(), Some("abc"));
        clone.clear_token();
        assert!(!client.has_token());
    }

    #[test]
    fn urls_join_with_a_single_slash() {
        let client =
            APIClient::new("http://localhost:12000/api/", reqwest::Client::new());
        assert_eq!(
            client.format_url("/appointments/"),
            "http://localhost:12000/api/appointments/"
        );
    }
}
