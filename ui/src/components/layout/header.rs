use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::components::GlobalSearch;
use crate::config::config;
use crate::hooks::use_logout;
use crate::hooks::use_polling;
use crate::hooks::use_server_notifications::use_unread_notifications;
use crate::{Route, State};

const LINK_CLASS: &str = "text-sm font-medium text-neutral-600 hover:text-neutral-900 dark:text-neutral-300 dark:hover:text-white";

#[function_component]
pub fn Header() -> Html {
    let (state, _) = use_store::<State>();
    let app_name = &config().app.name;

    html! {
        <header class="bg-white dark:bg-neutral-800 border-b border-neutral-200 dark:border-neutral-700">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <Link<Route> to={Route::Home} classes="text-xl font-semibold text-neutral-900 dark:text-white">
                        {app_name}
                    </Link<Route>>
                    if let Some(user) = state.user() {
                        <SignedInNav name={user.display_name()} />
                    } else if !state.is_loading() {
                        <nav class="flex items-center space-x-4">
                            <Link<Route> to={Route::Login} classes={LINK_CLASS}>{"Sign in"}</Link<Route>>
                            <Link<Route> to={Route::Register} classes={LINK_CLASS}>{"Register"}</Link<Route>>
                        </nav>
                    }
                </div>
            </div>
        </header>
    }
}

#[derive(Properties, PartialEq)]
struct SignedInNavProps {
    name: AttrValue,
}

#[function_component]
fn SignedInNav(props: &SignedInNavProps) -> Html {
    let features = &config().features;
    let on_logout = use_logout();

    html! {
        <nav class="flex items-center space-x-6">
            <GlobalSearch />
            <Link<Route> to={Route::Appointments} classes={LINK_CLASS}>{"Appointments"}</Link<Route>>
            if features.exercise_tracking {
                <Link<Route> to={Route::Exercises} classes={LINK_CLASS}>{"Exercises"}</Link<Route>>
            }
            if features.chat {
                <Link<Route> to={Route::Chat} classes={LINK_CLASS}>{"Messages"}</Link<Route>>
            }
            if features.analytics {
                <Link<Route> to={Route::Analytics} classes={LINK_CLASS}>{"Analytics"}</Link<Route>>
            }
            if features.notifications {
                <NotificationBell />
            }
            <Link<Route> to={Route::Settings} classes={LINK_CLASS}>{&props.name}</Link<Route>>
            <button onclick={on_logout} class={LINK_CLASS}>{"Sign out"}</button>
        </nav>
    }
}

/// Link to the notification page with the unread count, refreshed on the
/// analytics interval.
#[function_component]
fn NotificationBell() -> Html {
    let unread = use_unread_notifications();
    use_polling(
        unread.refetch.clone(),
        config().ui.analytics_refresh_interval_ms,
        true,
    );
    let count = unread.data.as_ref().map_or(0, Vec::len);

    html! {
        <Link<Route> to={Route::Notifications} classes={classes!(LINK_CLASS, "relative")}>
            {"Notifications"}
            if count > 0 {
                <span class="ml-1 inline-flex items-center justify-center px-2 py-0.5 text-xs font-bold rounded-full bg-red-600 text-white">
                    {count}
                </span>
            }
        </Link<Route>>
    }
}
