use actix_web::{HttpResponse, post, put, web};
use payloads::{requests, responses};
use serde_json::json;

use super::{APIError, Caller};
use crate::stub::SharedStore;
use crate::stub::store::lock;

#[tracing::instrument(
    skip_all,
    fields(username = %credentials.username, user_id = tracing::field::Empty)
)]
#[post("/auth/login/")]
pub async fn login(
    credentials: web::Json<requests::LoginCredentials>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let (user, token) = lock(&store).login(&credentials)?;
    if let Some(user) = &user {
        tracing::Span::current()
            .record("user_id", tracing::field::display(&user.id));
    }
    Ok(HttpResponse::Ok().json(responses::AuthResponse { token, user }))
}

#[tracing::instrument(skip_all, fields(username = %details.username))]
#[post("/auth/register/")]
pub async fn register(
    details: web::Json<requests::RegisterAccount>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let (user, token) = lock(&store).register(&details)?;
    Ok(HttpResponse::Created().json(responses::AuthResponse {
        token,
        user: Some(user),
    }))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[post("/auth/logout/")]
pub async fn logout(
    caller: Caller,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    lock(&store).logout(&caller.token);
    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully logged out" })))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[put("/auth/profile/")]
pub async fn update_profile(
    caller: Caller,
    details: web::Json<requests::UpdateProfile>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let user = lock(&store).update_profile(&caller.user.id, &details)?;
    Ok(HttpResponse::Ok().json(user))
}
