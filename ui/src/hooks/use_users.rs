use payloads::{ClientError, UserId, requests, responses};
use yew::prelude::*;
use yewdux::prelude::*;

use crate::hooks::use_session::session;
use crate::hooks::{ApiHandle, ApiOptions, MutationHandle, use_api, use_mutation};
use crate::session::SessionError;
use crate::{State, get_api_client};

#[hook]
pub fn use_users(
    query: requests::UserQuery,
) -> ApiHandle<Vec<responses::UserSummary>> {
    use_api(query, ApiOptions::default(), |query| async move {
        get_api_client().list_users(&query).await
    })
}

#[hook]
pub fn use_physiotherapists() -> ApiHandle<Vec<responses::UserSummary>> {
    use_api((), ApiOptions::default(), |_| async move {
        get_api_client().physiotherapists().await
    })
}

#[hook]
pub fn use_user(user_id: UserId) -> ApiHandle<responses::UserSummary> {
    use_api(user_id, ApiOptions::default(), |id| async move {
        get_api_client().get_user(&id).await
    })
}

/// The signed in user as the backend currently sees it. A successful load
/// refreshes the cached copy.
#[hook]
pub fn use_current_user() -> ApiHandle<responses::UserSummary> {
    let (_, dispatch) = use_store::<State>();
    let on_success = Callback::from(move |user: responses::UserSummary| {
        dispatch.reduce_mut(|state| state.login(user));
    });
    use_api(
        (),
        ApiOptions::default().on_success(on_success),
        |_| async move { session().refresh_user().await },
    )
}

#[hook]
pub fn use_create_user()
-> MutationHandle<requests::RegisterAccount, responses::UserSummary, ClientError>
{
    use_mutation(|details: requests::RegisterAccount| async move {
        get_api_client().create_user(&details).await
    })
}

#[hook]
pub fn use_update_user() -> MutationHandle<
    (UserId, requests::UpdateUser),
    responses::UserSummary,
    ClientError,
> {
    use_mutation(|(id, details): (UserId, requests::UpdateUser)| async move {
        get_api_client().update_user(&id, &details).await
    })
}

#[hook]
pub fn use_delete_user() -> MutationHandle<UserId, (), ClientError> {
    use_mutation(|id: UserId| async move {
        get_api_client().delete_user(&id).await
    })
}

/// Update the signed in user's profile and the cached session user.
#[hook]
pub fn use_update_profile() -> MutationHandle<
    requests::UpdateProfile,
    responses::UserSummary,
    SessionError,
> {
    let (_, dispatch) = use_store::<State>();
    use_mutation(move |details: requests::UpdateProfile| {
        let dispatch = dispatch.clone();
        async move {
            let user = session().update_profile(&details).await?;
            dispatch.reduce_mut(|state| state.login(user.clone()));
            Ok::<_, SessionError>(user)
        }
    })
}

#[hook]
pub fn use_change_password()
-> MutationHandle<requests::ChangePassword, (), SessionError> {
    use_mutation(|details: requests::ChangePassword| async move {
        session().change_password(&details).await
    })
}
