use payloads::{AppointmentId, Role, responses};
use yew::prelude::*;

use crate::utils::status_badge_classes;
use crate::utils::time::{format_date, format_time_range};

#[derive(Properties, PartialEq)]
pub struct AppointmentListProps {
    pub appointments: Vec<responses::Appointment>,
    /// Whose eyes the list is for; decides which name and actions show.
    pub viewer: Role,
    #[prop_or_default]
    pub on_cancel: Option<Callback<AppointmentId>>,
    #[prop_or_default]
    pub on_confirm: Option<Callback<AppointmentId>>,
    #[prop_or_default]
    pub on_complete: Option<Callback<AppointmentId>>,
    /// Actions are disabled while one is in flight.
    #[prop_or_default]
    pub busy: bool,
    #[prop_or("No appointments found.".into())]
    pub empty_text: AttrValue,
}

#[function_component]
pub fn AppointmentList(props: &AppointmentListProps) -> Html {
    if props.appointments.is_empty() {
        return html! {
            <p class="text-center py-8 text-neutral-600 dark:text-neutral-400">
                {&props.empty_text}
            </p>
        };
    }

    html! {
        <ul class="divide-y divide-neutral-200 dark:divide-neutral-700 bg-white dark:bg-neutral-800 rounded-lg shadow">
            {for props.appointments.iter().map(|appointment| html! {
                <AppointmentRow
                    key={appointment.id.0}
                    appointment={appointment.clone()}
                    viewer={props.viewer}
                    on_cancel={props.on_cancel.clone()}
                    on_confirm={props.on_confirm.clone()}
                    on_complete={props.on_complete.clone()}
                    busy={props.busy}
                />
            })}
        </ul>
    }
}

#[derive(Properties, PartialEq)]
struct AppointmentRowProps {
    appointment: responses::Appointment,
    viewer: Role,
    on_cancel: Option<Callback<AppointmentId>>,
    on_confirm: Option<Callback<AppointmentId>>,
    on_complete: Option<Callback<AppointmentId>>,
    busy: bool,
}

#[function_component]
fn AppointmentRow(props: &AppointmentRowProps) -> Html {
    let appointment = &props.appointment;
    let id = appointment.id;
    let counterpart = match props.viewer {
        Role::Patient => appointment.physiotherapist_name.clone(),
        Role::Physiotherapist | Role::Admin => appointment.patient_name.clone(),
    }
    .unwrap_or_default();

    let staff = props.viewer != Role::Patient;
    let status = appointment.status;
    let action = |label: &'static str, callback: &Option<Callback<AppointmentId>>, show: bool| {
        callback.as_ref().filter(|_| show).map(|callback| {
            let callback = callback.clone();
            html! {
                <button
                    disabled={props.busy}
                    onclick={Callback::from(move |_: MouseEvent| callback.emit(id))}
                    class="text-sm font-medium text-neutral-700 dark:text-neutral-300 hover:underline disabled:opacity-50"
                >
                    {label}
                </button>
            }
        })
    };

    html! {
        <li class="p-4 flex items-center justify-between gap-4">
            <div>
                <p class="font-medium text-neutral-900 dark:text-neutral-100">
                    {appointment.appointment_type.label()}
                    if !counterpart.is_empty() {
                        <span class="text-neutral-500">{format!(" with {counterpart}")}</span>
                    }
                </p>
                <p class="text-sm text-neutral-600 dark:text-neutral-400">
                    {format!(
                        "{}, {}",
                        format_date(appointment.date),
                        format_time_range(appointment.start_time, appointment.end_time)
                    )}
                </p>
                if !appointment.reason.is_empty() {
                    <p class="text-sm text-neutral-500 dark:text-neutral-400">{&appointment.reason}</p>
                }
                if let Some(reason) = &appointment.cancellation_reason {
                    <p class="text-sm text-red-600 dark:text-red-400">{format!("Cancelled: {reason}")}</p>
                }
            </div>
            <div class="flex items-center gap-3">
                <span class={classes!("px-2", "py-1", "text-xs", "rounded-full", status_badge_classes(status))}>
                    {status.label()}
                </span>
                {action("Confirm", &props.on_confirm, staff && status == payloads::AppointmentStatus::Scheduled)}
                {action("Complete", &props.on_complete, staff && status == payloads::AppointmentStatus::Confirmed)}
                {action("Cancel", &props.on_cancel, status.is_cancellable())}
            </div>
        </li>
    }
}
