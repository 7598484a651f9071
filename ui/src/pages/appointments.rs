use payloads::{AppointmentId, AppointmentStatus, Role, responses};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::components::{AppointmentList, RequireAuth};
use crate::contexts::notifications::use_notifications;
use crate::hooks::use_appointments::{
    AppointmentFilter, use_cancel_appointment, use_complete_appointment,
    use_confirm_appointment, use_filtered_appointments,
};
use crate::hooks::use_title;

const FILTERS: [AppointmentFilter; 6] = [
    AppointmentFilter::All,
    AppointmentFilter::Upcoming,
    AppointmentFilter::Today,
    AppointmentFilter::Status(AppointmentStatus::Confirmed),
    AppointmentFilter::Status(AppointmentStatus::Completed),
    AppointmentFilter::Status(AppointmentStatus::Cancelled),
];

#[function_component]
pub fn AppointmentsPage() -> Html {
    use_title("Appointments");
    let render = Callback::from(|user: responses::UserSummary| {
        html! { <Appointments viewer={user.role} /> }
    });
    html! { <RequireAuth {render} /> }
}

#[derive(Properties, PartialEq)]
struct AppointmentsProps {
    viewer: Role,
}

#[function_component]
fn Appointments(props: &AppointmentsProps) -> Html {
    let filter = use_state(AppointmentFilter::default);
    let appointments = use_filtered_appointments(*filter);
    let cancel = use_cancel_appointment();
    let confirm = use_confirm_appointment();
    let complete = use_complete_appointment();
    let notifications = use_notifications();

    // the list only changes once the backend has answered; a failed cancel
    // leaves the appointment where it was
    let after = {
        let notifications = notifications.clone();
        let refetch = appointments.refetch.clone();
        move |success: &'static str| {
            let notifications = notifications.clone();
            let refetch = refetch.clone();
            move |result: Result<responses::Appointment, payloads::ClientError>| {
                match result {
                    Ok(_) => {
                        notifications.success(success);
                        refetch.emit(());
                    }
                    Err(e) => {
                        notifications.error(e.to_string());
                    }
                }
            }
        }
    };

    let on_cancel = {
        let cancel = cancel.clone();
        let done = after("Appointment cancelled");
        Callback::from(move |id: AppointmentId| {
            let confirmed = web_sys::window()
                .and_then(|w| {
                    w.confirm_with_message("Cancel this appointment?").ok()
                })
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            let pending = cancel.mutate((id, None));
            let done = done.clone();
            yew::platform::spawn_local(async move { done(pending.await) });
        })
    };

    let on_confirm = {
        let confirm = confirm.clone();
        let done = after("Appointment confirmed");
        Callback::from(move |id: AppointmentId| {
            let pending = confirm.mutate(id);
            let done = done.clone();
            yew::platform::spawn_local(async move { done(pending.await) });
        })
    };

    let on_complete = {
        let complete = complete.clone();
        let done = after("Appointment completed");
        Callback::from(move |id: AppointmentId| {
            let pending = complete.mutate(id);
            let done = done.clone();
            yew::platform::spawn_local(async move { done(pending.await) });
        })
    };

    let busy = cancel.loading || confirm.loading || complete.loading;
    let viewer = props.viewer;

    html! {
        <div class="space-y-6">
            <div class="flex flex-wrap justify-between items-center gap-4">
                <h1 class="text-2xl font-bold">{"Appointments"}</h1>
                <Link<Route> to={Route::BookAppointment} classes="px-4 py-2 rounded-md bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900 text-sm font-medium">
                    {"Book appointment"}
                </Link<Route>>
            </div>

            <div class="flex flex-wrap gap-2">
                {for FILTERS.iter().map(|option| {
                    let option = *option;
                    let active = *filter == option;
                    let onclick = {
                        let filter = filter.clone();
                        Callback::from(move |_: MouseEvent| filter.set(option))
                    };
                    html! {
                        <button
                            {onclick}
                            class={classes!(
                                "px-3", "py-1", "rounded-full", "text-sm", "border",
                                if active {
                                    "bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900"
                                } else {
                                    "border-neutral-300 dark:border-neutral-600"
                                }
                            )}
                        >
                            {option.label()}
                        </button>
                    }
                })}
            </div>

            {appointments.render("appointments", |list, reloading| html! {
                <div class={classes!(reloading.then_some("opacity-60"))}>
                    <AppointmentList
                        appointments={list.clone()}
                        {viewer}
                        on_cancel={on_cancel.clone()}
                        on_confirm={on_confirm.clone()}
                        on_complete={on_complete.clone()}
                        {busy}
                    />
                </div>
            })}
        </div>
    }
}
