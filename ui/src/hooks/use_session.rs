use payloads::{requests, responses};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::config::config;
use crate::session::{SessionError, SessionService, StorageKeys};
use crate::storage::LocalStorage;
use crate::{Route, State, get_api_client};

/// The session service over the shared API client and `localStorage`.
pub fn session() -> SessionService<LocalStorage> {
    SessionService::new(
        get_api_client(),
        LocalStorage,
        StorageKeys::from(&config().auth),
    )
}

/// Forget the session after the backend rejected our token.
pub fn expire_session(dispatch: &Dispatch<State>) {
    session().expire();
    dispatch.reduce_mut(|state| state.logout());
}

/// Restore the stored session once on startup.
#[hook]
pub fn use_session_bootstrap() {
    let (_, dispatch) = use_store::<State>();

    use_effect_with((), move |_| {
        let auth_state = session().initialize();
        dispatch.reduce_mut(|state| state.auth_state = auth_state);
    });
}

/// Sign in and publish the user to the store. The returned future resolves
/// with the error so forms can show it per field.
#[hook]
pub fn use_login()
-> Callback<requests::LoginCredentials, LocalFuture<responses::UserSummary>> {
    let (_, dispatch) = use_store::<State>();

    use_callback((), move |credentials: requests::LoginCredentials, _| {
        let dispatch = dispatch.clone();
        Box::pin(async move {
            let user = session().login(&credentials).await?;
            dispatch.reduce_mut(|state| state.login(user.clone()));
            Ok::<_, SessionError>(user)
        }) as LocalFuture<responses::UserSummary>
    })
}

/// Create an account, signing in straight away when the backend allows it.
#[hook]
pub fn use_register() -> Callback<
    requests::RegisterAccount,
    LocalFuture<Option<responses::UserSummary>>,
> {
    let (_, dispatch) = use_store::<State>();

    use_callback((), move |details: requests::RegisterAccount, _| {
        let dispatch = dispatch.clone();
        Box::pin(async move {
            let user = session().register(&details).await?;
            if let Some(user) = &user {
                let user = user.clone();
                dispatch.reduce_mut(|state| state.login(user));
            }
            Ok::<_, SessionError>(user)
        }) as LocalFuture<Option<responses::UserSummary>>
    })
}

#[hook]
pub fn use_logout() -> Callback<MouseEvent> {
    let (_, dispatch) = use_store::<State>();
    let navigator = use_navigator();

    Callback::from(move |_| {
        let dispatch = dispatch.clone();
        let navigator = navigator.clone();

        yew::platform::spawn_local(async move {
            session().sign_out().await;
            dispatch.reduce_mut(|state| state.logout());
            if let Some(navigator) = navigator {
                navigator.push(&Route::Login);
            }
        });
    })
}

/// The signed in user, or None while unknown or logged out.
#[hook]
pub fn use_require_auth() -> Option<responses::UserSummary> {
    let (state, _) = use_store::<State>();
    state.user().cloned()
}

pub type LocalFuture<T> =
    futures::future::LocalBoxFuture<'static, Result<T, SessionError>>;
