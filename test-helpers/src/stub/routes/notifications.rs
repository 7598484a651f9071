use actix_web::{HttpResponse, get, post, web};
use payloads::{NotificationId, requests};
use serde_json::json;

use super::{APIError, Caller, paginate};
use crate::stub::SharedStore;
use crate::stub::store::lock;

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/notifications/")]
pub async fn list_notifications(
    caller: Caller,
    query: web::Query<requests::NotificationQuery>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let notifications = lock(&store).list_notifications(&caller.user, &query);
    Ok(HttpResponse::Ok().json(paginate(
        notifications,
        query.page,
        query.page_size,
    )))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/notifications/unread/")]
pub async fn unread(
    caller: Caller,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    Ok(HttpResponse::Ok().json(lock(&store).unread_notifications(&caller.user)))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[post("/notifications/mark_all_read/")]
pub async fn mark_all_read(
    caller: Caller,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    lock(&store).mark_all_notifications_read(&caller.user);
    Ok(HttpResponse::Ok()
        .json(json!({ "message": "All notifications marked as read" })))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[post("/notifications/{notification_id}/mark_read/")]
pub async fn mark_read(
    caller: Caller,
    path: web::Path<i64>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    lock(&store)
        .mark_notification_read(&caller.user, &NotificationId(*path))?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Notification marked as read" })))
}
