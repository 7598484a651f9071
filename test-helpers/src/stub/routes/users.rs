use actix_web::{HttpResponse, delete, get, patch, post, web};
use payloads::{UserId, requests, responses};

use super::{APIError, Caller, paginate};
use crate::stub::SharedStore;
use crate::stub::store::{StoreError, lock};

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/users/me/")]
pub async fn current_user(caller: Caller) -> Result<HttpResponse, APIError> {
    Ok(HttpResponse::Ok().json(caller.user))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[post("/users/change_password/")]
pub async fn change_password(
    caller: Caller,
    details: web::Json<requests::ChangePassword>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    lock(&store).change_password(&caller.user.id, &details)?;
    Ok(HttpResponse::Ok().json(responses::SuccessMessage {
        message: "Password changed successfully".into(),
    }))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/users/")]
pub async fn list_users(
    caller: Caller,
    query: web::Query<requests::UserQuery>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let users = lock(&store).list_users(&caller.user, &query);
    Ok(HttpResponse::Ok().json(paginate(users, query.page, query.page_size)))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[post("/users/")]
pub async fn create_user(
    caller: Caller,
    details: web::Json<requests::RegisterAccount>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    if caller.user.role != payloads::Role::Admin {
        return Err(StoreError::PermissionDenied.into());
    }
    let user = lock(&store).create_account(&details)?;
    Ok(HttpResponse::Created().json(user))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/users/{target}/")]
pub async fn get_user(
    caller: Caller,
    path: web::Path<i64>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let user = lock(&store).get_user(&caller.user, &UserId(*path))?;
    Ok(HttpResponse::Ok().json(user))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[patch("/users/{target}/")]
pub async fn update_user(
    caller: Caller,
    path: web::Path<i64>,
    details: web::Json<requests::UpdateUser>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let user =
        lock(&store).update_user(&caller.user, &UserId(*path), &details)?;
    Ok(HttpResponse::Ok().json(user))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[delete("/users/{target}/")]
pub async fn delete_user(
    caller: Caller,
    path: web::Path<i64>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    lock(&store).delete_user(&caller.user, &UserId(*path))?;
    Ok(HttpResponse::NoContent().finish())
}
