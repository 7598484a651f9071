use payloads::responses::{Appointment, SearchResults};
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::hooks::use_search::{is_searchable, use_search};
use crate::utils::time::{format_date, format_time_range};

/// Search box in the header. Results for users, appointments and exercises
/// drop down below it once the query is long enough.
#[function_component]
pub fn GlobalSearch() -> Html {
    let query = use_state(String::new);
    let results = use_search((*query).clone());

    let oninput = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                query.set(input.value());
            }
        })
    };
    let close = {
        let query = query.clone();
        Callback::from(move |_: MouseEvent| query.set(String::new()))
    };

    html! {
        <div class="relative">
            <input
                type="search"
                placeholder="Search..."
                value={(*query).clone()}
                {oninput}
                class="w-48 px-3 py-1.5 text-sm border border-neutral-300 dark:border-neutral-600 rounded-md bg-white dark:bg-neutral-700"
            />
            if is_searchable(&query) {
                <div class="absolute right-0 mt-2 w-80 max-h-96 overflow-y-auto p-3 rounded-md shadow-lg bg-white dark:bg-neutral-800 border border-neutral-200 dark:border-neutral-700 z-20">
                    if results.is_initial_loading() {
                        <p class="text-sm text-neutral-500">{"Searching..."}</p>
                    } else {
                        {results.render("search results", |found, _| html! {
                            <SearchResultList found={found.clone()} on_select={close.clone()} />
                        })}
                    }
                </div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct SearchResultListProps {
    found: SearchResults,
    on_select: Callback<MouseEvent>,
}

/// "Mon, 15 Jan 2024, 09:00 - 10:00 with Bob Brown"
fn appointment_line(appointment: &Appointment) -> String {
    let when = format!(
        "{}, {}",
        format_date(appointment.date),
        format_time_range(appointment.start_time, appointment.end_time)
    );
    match &appointment.physiotherapist_name {
        Some(name) => format!("{when} with {name}"),
        None => when,
    }
}

const SECTION_CLASS: &str = "text-xs font-semibold uppercase text-neutral-500 mt-2 mb-1";
const ITEM_CLASS: &str = "block px-2 py-1 text-sm rounded hover:bg-neutral-100 dark:hover:bg-neutral-700";

#[function_component]
fn SearchResultList(props: &SearchResultListProps) -> Html {
    let found = &props.found;
    if found.is_empty() {
        return html! {
            <p class="text-sm text-neutral-500">{"No matches"}</p>
        };
    }

    html! {
        <div onclick={props.on_select.clone()}>
            if !found.users.is_empty() {
                <h3 class={SECTION_CLASS}>{"People"}</h3>
                {for found.users.iter().map(|user| html! {
                    <div key={user.id.to_string()} class={ITEM_CLASS}>
                        {user.display_name()}
                        <span class="ml-2 text-neutral-500">{user.role.label()}</span>
                    </div>
                })}
            }
            if !found.appointments.is_empty() {
                <h3 class={SECTION_CLASS}>{"Appointments"}</h3>
                {for found.appointments.iter().map(|a| html! {
                    <Link<Route> key={a.id.to_string()} to={Route::Appointments} classes={ITEM_CLASS}>
                        {appointment_line(a)}
                        <span class="ml-2 text-neutral-500">{a.status.label()}</span>
                    </Link<Route>>
                })}
            }
            if !found.exercises.is_empty() {
                <h3 class={SECTION_CLASS}>{"Exercises"}</h3>
                {for found.exercises.iter().map(|e| html! {
                    <Link<Route> key={e.id.to_string()} to={Route::Exercises} classes={ITEM_CLASS}>
                        {&e.name}
                        <span class="ml-2 text-neutral-500">{e.difficulty.label()}</span>
                    </Link<Route>>
                })}
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use jiff::civil::{date, time};
    use payloads::{
        AppointmentId, AppointmentStatus, AppointmentType, UserId,
    };

    fn appointment(physiotherapist_name: Option<&str>) -> Appointment {
        Appointment {
            id: AppointmentId(5),
            patient: UserId(1),
            physiotherapist: UserId(2),
            patient_name: None,
            physiotherapist_name: physiotherapist_name.map(str::to_string),
            date: date(2024, 1, 15),
            start_time: time(9, 0, 0, 0),
            end_time: time(10, 0, 0, 0),
            status: AppointmentStatus::Scheduled,
            appointment_type: AppointmentType::Therapy,
            reason: String::new(),
            notes: None,
            cost: None,
            cancellation_reason: None,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn appointment_lines_name_the_physiotherapist() {
        assert_eq!(
            appointment_line(&appointment(Some("Bob Brown"))),
            "Mon, 15 Jan 2024, 09:00 - 10:00 with Bob Brown"
        );
        assert_eq!(
            appointment_line(&appointment(None)),
            "Mon, 15 Jan 2024, 09:00 - 10:00"
        );
    }
}
