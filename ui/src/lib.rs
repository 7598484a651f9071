use payloads::APIClient;
use std::time::Duration;
use yew::prelude::*;
use yew_router::prelude::*;

pub mod components;
pub mod config;
pub mod contexts;
pub mod hooks;
pub mod logs;
pub mod pages;
pub mod session;
pub mod state;
pub mod storage;
pub mod utils;

pub use state::{AuthState, State};

use components::MainLayout;
use contexts::notifications::NotificationProvider;
use hooks::use_session_bootstrap;
use pages::*;

thread_local! {
    static API_CLIENT: APIClient = build_api_client();
}

fn build_api_client() -> APIClient {
    let api = &config::config().api;
    APIClient::with_timeout(&api.base_url, Duration::from_millis(api.timeout_ms))
        .unwrap_or_else(|e| {
            tracing::warn!("falling back to a default http client: {e}");
            APIClient::new(&api.base_url, reqwest::Client::new())
        })
}

/// The shared API client. Clones share the auth token, so signing in
/// through one handle authenticates every other.
pub fn get_api_client() -> APIClient {
    API_CLIENT.with(APIClient::clone)
}

#[function_component]
pub fn App() -> Html {
    html! {
        <NotificationProvider>
            <BrowserRouter>
                <SessionBootstrap />
                <MainLayout>
                    <Switch<Route> render={switch} />
                </MainLayout>
            </BrowserRouter>
        </NotificationProvider>
    }
}

#[function_component]
fn SessionBootstrap() -> Html {
    use_session_bootstrap();
    html! {}
}

#[derive(Clone, Copy, Debug, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/appointments")]
    Appointments,
    #[at("/appointments/new")]
    BookAppointment,
    #[at("/exercises")]
    Exercises,
    #[at("/notifications")]
    Notifications,
    #[at("/messages")]
    Chat,
    #[at("/analytics")]
    Analytics,
    #[at("/settings")]
    Settings,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(route: Route) -> Html {
    let features = &config::config().features;
    match route {
        Route::Home => html! { <DashboardPage /> },
        Route::Login => html! { <LoginPage /> },
        Route::Register => html! { <RegisterPage /> },
        Route::Appointments => html! { <AppointmentsPage /> },
        Route::BookAppointment => html! { <BookingPage /> },
        Route::Exercises if features.exercise_tracking => {
            html! { <ExercisesPage /> }
        }
        Route::Notifications if features.notifications => {
            html! { <NotificationsPage /> }
        }
        Route::Chat if features.chat => html! { <ChatPage /> },
        Route::Analytics if features.analytics => html! { <AnalyticsPage /> },
        Route::Settings => html! { <SettingsPage /> },
        _ => html! { <NotFoundPage /> },
    }
}
