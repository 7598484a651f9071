use payloads::{Role, responses};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::components::{LoginForm, login_form::AuthMode};
use crate::utils::is_dev_mode;
use crate::{AuthState, Route, State};

#[derive(Properties, PartialEq)]
pub struct RequireAuthProps {
    /// Rendered with the signed in user.
    pub render: Callback<responses::UserSummary, Html>,
    /// Only these roles may see the page. Empty allows everyone signed in.
    #[prop_or_default]
    pub roles: Vec<Role>,
}

/// Shows a spinner while the stored session is checked, a login form when
/// logged out, and the page otherwise.
#[function_component]
pub fn RequireAuth(props: &RequireAuthProps) -> Html {
    let (state, _) = use_store::<State>();

    match &state.auth_state {
        AuthState::Unknown => html! {
            <div class="text-center py-8">
                <div class="inline-block animate-spin rounded-full h-8 w-8 border-2 border-neutral-900 dark:border-neutral-100 border-t-transparent dark:border-t-transparent"></div>
            </div>
        },
        AuthState::LoggedOut => html! {
            <div class="flex items-center justify-center min-h-[60vh]">
                <div class="max-w-md w-full space-y-4">
                    <LoginForm
                        title="Sign in to continue"
                        description="Please sign in to access this page"
                        submit_text="Sign in"
                        mode={AuthMode::Login}
                        on_success={Callback::noop()}
                        show_dev_credentials={is_dev_mode()}
                    />
                    <div class="text-center">
                        <p class="text-sm text-neutral-600 dark:text-neutral-400">
                            {"Don't have an account? "}
                            <Link<Route>
                                to={Route::Register}
                                classes="text-neutral-900 dark:text-neutral-100 hover:text-neutral-700 dark:hover:text-neutral-300 font-medium underline"
                            >
                                {"Create one"}
                            </Link<Route>>
                        </p>
                    </div>
                </div>
            </div>
        },
        AuthState::LoggedIn(user)
            if !props.roles.is_empty() && !props.roles.contains(&user.role) =>
        {
            html! {
                <div class="text-center py-12">
                    <h2 class="text-xl font-semibold text-neutral-900 dark:text-neutral-100">
                        {"Not available"}
                    </h2>
                    <p class="mt-2 text-neutral-600 dark:text-neutral-400">
                        {format!("This page is not available to {} accounts.", user.role.label())}
                    </p>
                </div>
            }
        }
        AuthState::LoggedIn(user) => props.render.emit(user.clone()),
    }
}
