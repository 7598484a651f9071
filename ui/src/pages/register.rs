use payloads::responses;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::components::{LoginForm, login_form::AuthMode};
use crate::config::config;
use crate::contexts::notifications::use_notifications;
use crate::hooks::{use_push_route, use_title};

#[function_component]
pub fn RegisterPage() -> Html {
    use_title("Create account");
    let push_route = use_push_route();
    let notifications = use_notifications();

    // without a token the account still has to sign in
    let on_success = Callback::from(move |user: Option<responses::UserSummary>| {
        match user {
            Some(user) => {
                notifications.success(format!("Welcome, {}!", user.display_name()));
                push_route.emit(Route::Home);
            }
            None => {
                notifications.info("Account created. Please sign in.");
                push_route.emit(Route::Login);
            }
        }
    });

    html! {
        <div class="flex items-center justify-center min-h-[60vh]">
            <div class="max-w-md w-full space-y-4">
                <LoginForm
                    title="Create your account"
                    description={format!("Join {} to get started", config().app.name)}
                    submit_text="Create account"
                    mode={AuthMode::Register}
                    {on_success}
                />
                <p class="text-center text-sm text-neutral-600 dark:text-neutral-400">
                    {"Already have an account? "}
                    <Link<Route>
                        to={Route::Login}
                        classes="text-neutral-900 dark:text-neutral-100 hover:text-neutral-700 dark:hover:text-neutral-300 font-medium underline"
                    >
                        {"Sign in"}
                    </Link<Route>>
                </p>
            </div>
        </div>
    }
}
