use actix_web::{HttpResponse, delete, get, patch, post, web};
use payloads::{ExerciseId, ExercisePlanId, PlanStatus, requests};

use super::{APIError, Caller, paginate};
use crate::stub::SharedStore;
use crate::stub::store::lock;

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/exercise-categories/")]
pub async fn categories(
    caller: Caller,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    Ok(HttpResponse::Ok().json(lock(&store).exercise_categories()))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/exercises/")]
pub async fn list_exercises(
    caller: Caller,
    query: web::Query<requests::ExerciseQuery>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let exercises = lock(&store).list_exercises(&caller.user, &query);
    Ok(HttpResponse::Ok().json(paginate(exercises, query.page, query.page_size)))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[post("/exercises/")]
pub async fn create_exercise(
    caller: Caller,
    details: web::Json<requests::NewExercise>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let exercise = lock(&store).create_exercise(&caller.user, &details)?;
    Ok(HttpResponse::Created().json(exercise))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/exercises/{exercise_id}/")]
pub async fn get_exercise(
    caller: Caller,
    path: web::Path<i64>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let exercise = lock(&store).get_exercise(&ExerciseId(*path))?;
    Ok(HttpResponse::Ok().json(exercise))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[patch("/exercises/{exercise_id}/")]
pub async fn update_exercise(
    caller: Caller,
    path: web::Path<i64>,
    details: web::Json<requests::UpdateExercise>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let exercise = lock(&store).update_exercise(
        &caller.user,
        &ExerciseId(*path),
        &details,
    )?;
    Ok(HttpResponse::Ok().json(exercise))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[delete("/exercises/{exercise_id}/")]
pub async fn delete_exercise(
    caller: Caller,
    path: web::Path<i64>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    lock(&store).delete_exercise(&caller.user, &ExerciseId(*path))?;
    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/exercise-plans/")]
pub async fn list_plans(
    caller: Caller,
    query: web::Query<requests::ExercisePlanQuery>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let plans = lock(&store).list_exercise_plans(&caller.user, &query);
    Ok(HttpResponse::Ok().json(paginate(plans, query.page, query.page_size)))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/exercise-plans/active/")]
pub async fn active_plans(
    caller: Caller,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    Ok(HttpResponse::Ok().json(lock(&store).active_exercise_plans(&caller.user)))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[post("/exercise-plans/{plan_id}/activate/")]
pub async fn activate_plan(
    caller: Caller,
    path: web::Path<i64>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let plan = lock(&store).set_plan_status(
        &caller.user,
        &ExercisePlanId(*path),
        PlanStatus::Active,
    )?;
    Ok(HttpResponse::Ok().json(plan))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[post("/exercise-plans/{plan_id}/complete/")]
pub async fn complete_plan(
    caller: Caller,
    path: web::Path<i64>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let plan = lock(&store).set_plan_status(
        &caller.user,
        &ExercisePlanId(*path),
        PlanStatus::Completed,
    )?;
    Ok(HttpResponse::Ok().json(plan))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/exercise-plan-items/")]
pub async fn plan_items(
    caller: Caller,
    query: web::Query<requests::PlanItemQuery>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let items = lock(&store).plan_items(&caller.user, &query.exercise_plan)?;
    Ok(HttpResponse::Ok().json(items))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/exercise-progress/stats/")]
pub async fn progress_stats(
    caller: Caller,
    query: web::Query<requests::ProgressStatsQuery>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let stats =
        lock(&store).exercise_progress_stats(&caller.user, query.exercise_plan);
    Ok(HttpResponse::Ok().json(stats))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/exercise-progress/")]
pub async fn list_progress(
    caller: Caller,
    query: web::Query<requests::ExerciseProgressQuery>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let progress = lock(&store).list_exercise_progress(&caller.user, &query);
    Ok(HttpResponse::Ok().json(paginate(progress, query.page, query.page_size)))
}

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[post("/exercise-progress/")]
pub async fn create_progress(
    caller: Caller,
    details: web::Json<requests::NewExerciseProgress>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let progress =
        lock(&store).create_exercise_progress(&caller.user, &details)?;
    Ok(HttpResponse::Created().json(progress))
}
