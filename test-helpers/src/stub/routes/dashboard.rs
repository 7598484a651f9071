use actix_web::{HttpResponse, get, post, web};
use payloads::requests;

use super::{APIError, Caller};
use crate::stub::SharedStore;
use crate::stub::store::lock;

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/dashboard/stats/")]
pub async fn stats(
    caller: Caller,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    Ok(HttpResponse::Ok().json(lock(&store).dashboard_stats(&caller.user)))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/dashboard/activity/")]
pub async fn activity(
    caller: Caller,
    query: web::Query<requests::ActivityQuery>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let activity =
        lock(&store).recent_activity(&caller.user, query.limit as usize);
    Ok(HttpResponse::Ok().json(activity))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/analytics/exercises/")]
pub async fn exercise_analytics(
    caller: Caller,
    query: web::Query<requests::AnalyticsWindow>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let analytics = lock(&store).exercise_analytics(&caller.user, query.days);
    Ok(HttpResponse::Ok().json(analytics))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/analytics/appointments/")]
pub async fn appointment_analytics(
    caller: Caller,
    query: web::Query<requests::AnalyticsWindow>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let analytics =
        lock(&store).appointment_analytics(&caller.user, query.days);
    Ok(HttpResponse::Ok().json(analytics))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id, q = %query.q))]
#[get("/search/")]
pub async fn search(
    caller: Caller,
    query: web::Query<requests::SearchQuery>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    Ok(HttpResponse::Ok().json(lock(&store).search(&caller.user, &query.q)))
}

#[tracing::instrument(
    skip_all,
    fields(user_id = %caller.user.id, action = %details.action)
)]
#[post("/actions/")]
pub async fn quick_action(
    caller: Caller,
    details: web::Json<requests::QuickAction>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let result = lock(&store).quick_action(&caller.user, &details)?;
    Ok(HttpResponse::Ok().json(result))
}
