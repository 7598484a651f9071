use actix_web::{HttpResponse, get, post, web};
use payloads::requests;

use super::{APIError, Caller};
use crate::stub::SharedStore;
use crate::stub::store::lock;

#[tracing::instrument(skip_all, fields(user_id = %caller.user.id))]
#[get("/conversations/")]
pub async fn conversations(
    caller: Caller,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    Ok(HttpResponse::Ok().json(lock(&store).conversations(&caller.user)))
}

#[tracing::instrument(
    skip_all,
    fields(user_id = %caller.user.id, conversation = %query.conversation)
)]
#[get("/messages/")]
pub async fn list_messages(
    caller: Caller,
    query: web::Query<requests::MessageQuery>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let messages = lock(&store).messages(&caller.user, &query.conversation)?;
    Ok(HttpResponse::Ok().json(messages))
}

#[tracing::instrument(
    skip_all,
    fields(user_id = %caller.user.id, conversation = %details.conversation)
)]
#[post("/messages/")]
pub async fn send_message(
    caller: Caller,
    details: web::Json<requests::SendMessage>,
    store: SharedStore,
) -> Result<HttpResponse, APIError> {
    let message = lock(&store).send_message(&caller.user, &details)?;
    Ok(HttpResponse::Created().json(message))
}
