//! Booking flow: physiotherapist, then date, then slot, then confirm.
//! Staff booking on behalf of a patient pick the patient first.

use jiff::civil::Date;
use payloads::{AppointmentType, Role, UserId, requests, responses};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::Route;
use crate::components::{RequireAuth, SlotPicker};
use crate::contexts::notifications::use_notifications;
use crate::hooks::use_appointments::{
    use_available_slots, use_create_appointment,
};
use crate::hooks::use_users::{use_physiotherapists, use_users};
use crate::hooks::{use_push_route, use_title};
use crate::utils::time::{
    format_date, format_time_range, parse_date_input, today,
};

#[function_component]
pub fn BookingPage() -> Html {
    use_title("Book appointment");
    let render = Callback::from(|user: responses::UserSummary| {
        html! { <Booking viewer={user.role} /> }
    });
    html! { <RequireAuth {render} /> }
}

#[derive(Properties, PartialEq)]
struct BookingProps {
    viewer: Role,
}

fn select_id(e: &Event) -> Option<UserId> {
    let value = e.target_dyn_into::<HtmlSelectElement>()?.value();
    value.parse().ok().map(UserId)
}

#[function_component]
fn Booking(props: &BookingProps) -> Html {
    let physiotherapist = use_state(|| None::<UserId>);
    let patient = use_state(|| None::<UserId>);
    let date = use_state(|| None::<Date>);
    let slot = use_state(|| None::<responses::TimeSlot>);
    let appointment_type = use_state(|| AppointmentType::Consultation);
    let reason = use_state(String::new);

    let physiotherapists = use_physiotherapists();
    let slots = use_available_slots(*physiotherapist, *date);
    let create = use_create_appointment();
    let notifications = use_notifications();
    let push_route = use_push_route();
    let staff = props.viewer != Role::Patient;

    let on_physiotherapist = {
        let physiotherapist = physiotherapist.clone();
        let slot = slot.clone();
        Callback::from(move |e: Event| {
            physiotherapist.set(select_id(&e));
            slot.set(None);
        })
    };

    let on_patient = {
        let patient = patient.clone();
        Callback::from(move |id: Option<UserId>| patient.set(id))
    };

    let on_date = {
        let date = date.clone();
        let slot = slot.clone();
        Callback::from(move |e: Event| {
            let value = e
                .target_dyn_into::<HtmlInputElement>()
                .map(|input| input.value())
                .unwrap_or_default();
            date.set(parse_date_input(&value));
            slot.set(None);
        })
    };

    let on_slot = {
        let slot = slot.clone();
        Callback::from(move |picked: responses::TimeSlot| slot.set(Some(picked)))
    };

    let on_type = {
        let appointment_type = appointment_type.clone();
        Callback::from(move |e: Event| {
            let picked = e
                .target_dyn_into::<HtmlSelectElement>()
                .and_then(|select| select.value().parse::<usize>().ok())
                .and_then(|index| AppointmentType::ALL.get(index).copied());
            if let Some(picked) = picked {
                appointment_type.set(picked);
            }
        })
    };

    let on_reason = {
        let reason = reason.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
                reason.set(area.value());
            }
        })
    };

    let details = match (*physiotherapist, *date, &*slot) {
        (Some(physiotherapist), Some(date), Some(slot))
            if !reason.trim().is_empty() && (!staff || patient.is_some()) =>
        {
            Some(requests::CreateAppointment {
                physiotherapist,
                patient: *patient,
                date,
                start_time: slot.start_time,
                end_time: slot.end_time,
                appointment_type: *appointment_type,
                reason: reason.trim().to_string(),
                symptoms: None,
            })
        }
        _ => None,
    };

    let on_book = {
        let create = create.clone();
        let details = details.clone();
        let refetch_slots = slots.refetch.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(details) = details.clone() else {
                return;
            };
            let pending = create.mutate(details);
            let notifications = notifications.clone();
            let push_route = push_route.clone();
            let refetch_slots = refetch_slots.clone();
            yew::platform::spawn_local(async move {
                match pending.await {
                    Ok(appointment) => {
                        notifications.success(format!(
                            "Booked for {} at {}",
                            format_date(appointment.date),
                            format_time_range(appointment.start_time, appointment.end_time)
                        ));
                        push_route.emit(Route::Appointments);
                    }
                    Err(e) => {
                        // the slot may have been taken meanwhile
                        notifications.error(e.to_string());
                        refetch_slots.emit(());
                    }
                }
            });
        })
    };

    let min_date = today().to_string();

    html! {
        <div class="max-w-2xl space-y-6">
            <h1 class="text-2xl font-bold">{"Book an appointment"}</h1>

            if staff {
                <PatientPicker on_change={on_patient} />
            }

            <section class="space-y-2">
                <h2 class="font-semibold">{"1. Physiotherapist"}</h2>
                {physiotherapists.render("physiotherapists", |list, _| html! {
                    <select onchange={on_physiotherapist.clone()} class="w-full px-3 py-2 border rounded-md bg-white dark:bg-neutral-700">
                        <option value="" selected={physiotherapist.is_none()}>{"Choose a physiotherapist"}</option>
                        {for list.iter().map(|p| html! {
                            <option
                                value={p.id.to_string()}
                                selected={*physiotherapist == Some(p.id)}
                            >
                                {p.display_name()}
                            </option>
                        })}
                    </select>
                })}
            </section>

            if physiotherapist.is_some() {
                <section class="space-y-2">
                    <h2 class="font-semibold">{"2. Date"}</h2>
                    <input
                        type="date"
                        min={min_date}
                        onchange={on_date}
                        class="px-3 py-2 border rounded-md bg-white dark:bg-neutral-700"
                    />
                </section>
            }

            if let Some(date) = *date {
                <section class="space-y-2">
                    <h2 class="font-semibold">{format!("3. Time on {}", format_date(date))}</h2>
                    {slots.render("available times", |list, _| html! {
                        <SlotPicker
                            slots={list.clone()}
                            selected={(*slot).clone()}
                            on_select={on_slot.clone()}
                        />
                    })}
                </section>
            }

            if slot.is_some() {
                <section class="space-y-3">
                    <h2 class="font-semibold">{"4. Details"}</h2>
                    <select onchange={on_type} class="w-full px-3 py-2 border rounded-md bg-white dark:bg-neutral-700">
                        {for AppointmentType::ALL.iter().enumerate().map(|(index, kind)| html! {
                            <option value={index.to_string()} selected={*kind == *appointment_type}>
                                {kind.label()}
                            </option>
                        })}
                    </select>
                    <textarea
                        oninput={on_reason}
                        placeholder="Reason for the visit"
                        class="w-full px-3 py-2 border rounded-md bg-white dark:bg-neutral-700"
                    />
                    <button
                        onclick={on_book}
                        disabled={details.is_none() || create.loading}
                        class="px-4 py-2 rounded-md bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900 disabled:opacity-50"
                    >
                        {if create.loading { "Booking..." } else { "Confirm booking" }}
                    </button>
                    if let Some(error) = &create.error {
                        <p class="text-sm text-red-600 dark:text-red-400">{error}</p>
                    }
                </section>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct PatientPickerProps {
    on_change: Callback<Option<UserId>>,
}

#[function_component]
fn PatientPicker(props: &PatientPickerProps) -> Html {
    let patients = use_users(requests::UserQuery {
        role: Some(Role::Patient),
        is_active: Some(true),
        ..Default::default()
    });
    let onchange = props.on_change.reform(|e: Event| select_id(&e));

    html! {
        <section class="space-y-2">
            <h2 class="font-semibold">{"Patient"}</h2>
            {patients.render("patients", |list, _| html! {
                <select onchange={onchange.clone()} class="w-full px-3 py-2 border rounded-md bg-white dark:bg-neutral-700">
                    <option value="">{"Choose a patient"}</option>
                    {for list.iter().map(|p| html! {
                        <option value={p.id.to_string()}>{p.display_name()}</option>
                    })}
                </select>
            })}
        </section>
    }
}
