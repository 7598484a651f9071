use actix_web::{HttpResponse, get, patch, post, web};
use payloads::{AppointmentId, requests};

use super::{APIError, Caller, paginate};
use crate::stub::SharedStore;
use crate::stub::store::lock;

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/appointments/")]
pub async fn list_appointments(
    caller: Caller,
    query: web::Query<requests::AppointmentQuery>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let appointments = lock(&store).list_appointments(&caller.user, &query);
    Ok(HttpResponse::Ok().json(paginate(
        appointments,
        query.page,
        query.page_size,
    )))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/appointments/upcoming/")]
pub async fn upcoming(
    caller: Caller,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    Ok(HttpResponse::Ok().json(lock(&store).upcoming_appointments(&caller.user)))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/appointments/today/")]
pub async fn today(
    caller: Caller,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    Ok(HttpResponse::Ok().json(lock(&store).todays_appointments(&caller.user)))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/appointments/available-slots/")]
pub async fn available_slots(
    caller: Caller,
    query: web::Query<requests::TimeSlotQuery>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let slots = lock(&store).available_time_slots(&query)?;
    Ok(HttpResponse::Ok().json(slots))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[post("/appointments/")]
pub async fn create_appointment(
    caller: Caller,
    details: web::Json<requests::CreateAppointment>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let appointment = lock(&store).create_appointment(&caller.user, &details)?;
    Ok(HttpResponse::Created().json(appointment))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/appointments/{appointment_id}/")]
pub async fn get_appointment(
    caller: Caller,
    path: web::Path<i64>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let appointment =
        lock(&store).get_appointment(&caller.user, &AppointmentId(*path))?;
    Ok(HttpResponse::Ok().json(appointment))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[patch("/appointments/{appointment_id}/")]
pub async fn update_appointment(
    caller: Caller,
    path: web::Path<i64>,
    details: web::Json<requests::UpdateAppointment>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let appointment = lock(&store).update_appointment(
        &caller.user,
        &AppointmentId(*path),
        &details,
    )?;
    Ok(HttpResponse::Ok().json(appointment))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[post("/appointments/{appointment_id}/cancel/")]
pub async fn cancel_appointment(
    caller: Caller,
    path: web::Path<i64>,
    details: web::Json<requests::CancelAppointment>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let appointment = lock(&store).cancel_appointment(
        &caller.user,
        &AppointmentId(*path),
        details.into_inner().reason,
    )?;
    Ok(HttpResponse::Ok().json(appointment))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[post("/appointments/{appointment_id}/confirm/")]
pub async fn confirm_appointment(
    caller: Caller,
    path: web::Path<i64>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let appointment =
        lock(&store).confirm_appointment(&caller.user, &AppointmentId(*path))?;
    Ok(HttpResponse::Ok().json(appointment))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[post("/appointments/{appointment_id}/complete/")]
pub async fn complete_appointment(
    caller: Caller,
    path: web::Path<i64>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let appointment =
        lock(&store).complete_appointment(&caller.user, &AppointmentId(*path))?;
    Ok(HttpResponse::Ok().json(appointment))
}
