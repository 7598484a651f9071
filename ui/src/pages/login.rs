use payloads::responses;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::components::{LoginForm, login_form::AuthMode};
use crate::config::config;
use crate::contexts::notifications::use_notifications;
use crate::hooks::{use_push_route, use_title};
use crate::state::State;
use crate::utils::is_dev_mode;
use crate::Route;

#[function_component]
pub fn LoginPage() -> Html {
    use_title("Sign in");
    let push_route = use_push_route();
    let notifications = use_notifications();
    let (state, _) = use_store::<State>();

    {
        let push_route = push_route.clone();
        use_effect_with(state.is_authenticated(), move |is_authenticated| {
            if *is_authenticated {
                push_route.emit(Route::Home);
            }
        });
    }

    let on_success = Callback::from(move |user: Option<responses::UserSummary>| {
        if let Some(user) = user {
            notifications.success(format!("Welcome back, {}!", user.display_name()));
        }
        push_route.emit(Route::Home);
    });

    html! {
        <div class="flex items-center justify-center min-h-[60vh]">
            <div class="max-w-md w-full space-y-4">
                <LoginForm
                    title={format!("Sign in to {}", config().app.name)}
                    description="Enter your credentials to continue"
                    submit_text="Sign in"
                    mode={AuthMode::Login}
                    {on_success}
                    show_dev_credentials={is_dev_mode()}
                />
                <p class="text-center text-sm text-neutral-600 dark:text-neutral-400">
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
    }
}
