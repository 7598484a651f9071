use payloads::{ClientError, NotificationId, requests, responses};
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::{ApiHandle, ApiOptions, MutationHandle, use_api, use_mutation};

/// Notifications stored by the backend, newest first. Not to be confused
/// with the in-app toasts in `contexts::notifications`.
#[hook]
pub fn use_server_notifications(
    query: requests::NotificationQuery,
) -> ApiHandle<Vec<responses::Notification>> {
    use_api(query, ApiOptions::default(), |query| async move {
        get_api_client().list_notifications(&query).await
    })
}

#[hook]
pub fn use_unread_notifications() -> ApiHandle<Vec<responses::Notification>> {
    use_api((), ApiOptions::default(), |_| async move {
        get_api_client().unread_notifications().await
    })
}

#[hook]
pub fn use_mark_notification_read()
-> MutationHandle<NotificationId, (), ClientError> {
    use_mutation(|id: NotificationId| async move {
        get_api_client().mark_notification_read(&id).await
    })
}

#[hook]
pub fn use_mark_all_notifications_read() -> MutationHandle<(), (), ClientError> {
    use_mutation(|_: ()| async move {
        get_api_client().mark_all_notifications_read().await
    })
}
