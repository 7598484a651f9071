pub mod appointments;
pub mod auth;
pub mod dashboard;
pub mod exercises;
pub mod messages;
pub mod notifications;
pub mod users;

use std::future::{Ready, ready};

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, Responder, ResponseError,
    body::BoxBody, dev::HttpServiceFactory, dev::Payload, get, http::StatusCode,
    http::header, web,
};
use payloads::responses;
use serde_json::json;

use super::SharedStore;
use super::store::{StoreError, lock};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Specific paths are registered before the `{id}` paths they would
/// otherwise be captured by.
pub fn api_services() -> impl HttpServiceFactory {
    web::scope("/api")
        .service(health_check)
        .service(auth::login)
        .service(auth::register)
        .service(auth::logout)
        .service(auth::update_profile)
        .service(users::current_user)
        .service(users::change_password)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(appointments::upcoming)
        .service(appointments::today)
        .service(appointments::available_slots)
        .service(appointments::list_appointments)
        .service(appointments::create_appointment)
        .service(appointments::get_appointment)
        .service(appointments::update_appointment)
        .service(appointments::cancel_appointment)
        .service(appointments::confirm_appointment)
        .service(appointments::complete_appointment)
        .service(exercises::categories)
        .service(exercises::list_exercises)
        .service(exercises::create_exercise)
        .service(exercises::get_exercise)
        .service(exercises::update_exercise)
        .service(exercises::delete_exercise)
        .service(exercises::active_plans)
        .service(exercises::list_plans)
        .service(exercises::activate_plan)
        .service(exercises::complete_plan)
        .service(exercises::plan_items)
        .service(exercises::progress_stats)
        .service(exercises::list_progress)
        .service(exercises::create_progress)
        .service(notifications::unread)
        .service(notifications::mark_all_read)
        .service(notifications::list_notifications)
        .service(notifications::mark_read)
        .service(dashboard::stats)
        .service(dashboard::activity)
        .service(dashboard::exercise_analytics)
        .service(dashboard::appointment_analytics)
        .service(dashboard::search)
        .service(dashboard::quick_action)
        .service(messages::conversations)
        .service(messages::list_messages)
        .service(messages::send_message)
}

#[get("/health/")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "healthy" }))
}

#[derive(Debug, thiserror::Error)]
pub enum APIError {
    #[error("Authentication credentials were not provided.")]
    NotAuthenticated,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError for APIError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::Store(e) => match e {
                StoreError::InvalidCredentials | StoreError::InvalidToken => {
                    StatusCode::UNAUTHORIZED
                }
                StoreError::NotFound => StatusCode::NOT_FOUND,
                StoreError::PermissionDenied => StatusCode::FORBIDDEN,
                StoreError::Rejected(_) | StoreError::Validation(_) => {
                    StatusCode::BAD_REQUEST
                }
            },
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            Self::Store(StoreError::Validation(fields)) => response.json(fields),
            Self::Store(e @ (StoreError::InvalidCredentials | StoreError::Rejected(_))) => {
                response.json(json!({ "error": e.to_string() }))
            }
            _ => response.json(json!({ "detail": self.to_string() })),
        }
    }
}

/// The authenticated user behind a request's `Authorization: Token ..`
/// header.
pub struct Caller {
    pub user: responses::UserSummary,
    pub token: String,
}

impl FromRequest for Caller {
    type Error = APIError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<Caller, APIError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Token "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(APIError::NotAuthenticated)?;
    let store = req
        .app_data::<SharedStore>()
        .ok_or(APIError::NotAuthenticated)?;
    let user = lock(store).authenticate(token)?;
    Ok(Caller {
        user,
        token: token.to_string(),
    })
}

/// Slice a full result list into a DRF-style page.
pub fn paginate<T>(
    items: Vec<T>,
    page: Option<u32>,
    page_size: Option<u32>,
) -> responses::Page<T> {
    let page = page.unwrap_or(1).max(1);
    let size = page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let count = items.len();
    let start = (page as usize - 1) * size as usize;
    let results = items.into_iter().skip(start).take(size as usize).collect();
    responses::Page {
        results,
        count: Some(count as u64),
        next: (start + (size as usize) < count)
            .then(|| format!("?page={}&page_size={size}", page + 1)),
        previous: (page > 1)
            .then(|| format!("?page={}&page_size={size}", page - 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_link_to_their_neighbours() {
        let page = paginate((1..=45).collect(), Some(2), None);
        assert_eq!(page.results, (21..=40).collect::<Vec<_>>());
        assert_eq!(page.count, Some(45));
        assert_eq!(page.next.as_deref(), Some("?page=3&page_size=20"));
        assert_eq!(page.previous.as_deref(), Some("?page=1&page_size=20"));

        let last = paginate((1..=45).collect::<Vec<i32>>(), Some(3), None);
        assert_eq!(last.results.len(), 5);
        assert!(last.next.is_none());
    }

    #[test]
    fn page_size_is_capped() {
        let page = paginate(vec![0; 500], None, Some(1000));
        assert_eq!(page.results.len(), MAX_PAGE_SIZE as usize);
    }
}
