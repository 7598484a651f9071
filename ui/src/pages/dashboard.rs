use payloads::{AppointmentId, Role, requests, responses};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::components::{AppointmentList, RequireAuth};
use crate::contexts::notifications::use_notifications;
use crate::hooks::use_analytics::use_dashboard_data;
use crate::hooks::use_appointments::{
    use_todays_appointments, use_upcoming_appointments,
};
use crate::hooks::use_exercises::use_todays_exercises;
use crate::hooks::use_messages::use_quick_action;
use crate::hooks::use_title;
use crate::utils::time::{format_timestamp, time_ago};

const ACTIVITY_LIMIT: u32 = 8;

#[function_component]
pub fn DashboardPage() -> Html {
    use_title("Dashboard");
    let render = Callback::from(|user: responses::UserSummary| {
        html! { <Dashboard {user} /> }
    });
    html! { <RequireAuth {render} /> }
}

#[derive(Properties, PartialEq)]
struct DashboardProps {
    user: responses::UserSummary,
}

#[function_component]
fn Dashboard(props: &DashboardProps) -> Html {
    let data = use_dashboard_data(ACTIVITY_LIMIT);
    let user = &props.user;

    html! {
        <div class="space-y-8">
            <div>
                <h1 class="text-2xl font-bold">{format!("Hello, {}", user.display_name())}</h1>
                <p class="text-neutral-600 dark:text-neutral-400">{user.role.label()}</p>
            </div>

            {data.render("dashboard", |data, _| html! {
                <StatCards stats={data.stats.clone()} role={user.role} />
            })}

            if user.role == Role::Patient {
                <PatientPanels />
            } else {
                <StaffPanels on_change={data.refetch.clone()} />
            }

            {data.render("recent activity", |data, _| html! {
                <ActivityFeed items={data.activity.clone()} />
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct StatCardsProps {
    stats: responses::DashboardStats,
    role: Role,
}

#[function_component]
fn StatCards(props: &StatCardsProps) -> Html {
    let stats = &props.stats;
    let mut cards = vec![
        ("Upcoming appointments", stats.upcoming_appointments),
        ("Today's appointments", stats.todays_appointments),
        ("Completed appointments", stats.completed_appointments),
        ("Unread notifications", stats.unread_notifications),
    ];
    match props.role {
        Role::Patient => {
            cards.push(("Active exercise plans", stats.active_exercise_plans));
            cards.push(("Exercises done today", stats.completed_exercises_today));
            cards.push(("Day streak", stats.exercise_streak));
        }
        Role::Physiotherapist | Role::Admin => {
            if let Some(patients) = stats.total_patients {
                cards.push(("Patients", patients));
            }
            cards.push(("Active exercise plans", stats.active_exercise_plans));
        }
    }

    html! {
        <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
            {for cards.into_iter().map(|(label, value)| html! {
                <div class="p-4 bg-white dark:bg-neutral-800 rounded-lg shadow">
                    <p class="text-sm text-neutral-600 dark:text-neutral-400">{label}</p>
                    <p class="text-2xl font-semibold">{value}</p>
                </div>
            })}
        </div>
    }
}

#[function_component]
fn PatientPanels() -> Html {
    let upcoming = use_upcoming_appointments();
    let exercises = use_todays_exercises();

    html! {
        <div class="grid md:grid-cols-2 gap-6">
            <section class="space-y-3">
                <div class="flex justify-between items-center">
                    <h2 class="text-lg font-semibold">{"Upcoming appointments"}</h2>
                    <Link<Route> to={Route::BookAppointment} classes="text-sm underline">
                        {"Book an appointment"}
                    </Link<Route>>
                </div>
                {upcoming.render("appointments", |appointments, _| html! {
                    <AppointmentList
                        appointments={appointments.clone()}
                        viewer={Role::Patient}
                        empty_text="No upcoming appointments."
                    />
                })}
            </section>
            <section class="space-y-3">
                <div class="flex justify-between items-center">
                    <h2 class="text-lg font-semibold">{"Today's exercises"}</h2>
                    <Link<Route> to={Route::Exercises} classes="text-sm underline">
                        {"Log progress"}
                    </Link<Route>>
                </div>
                {exercises.render("exercises", |items, _| if items.is_empty() {
                    html! { <p class="text-neutral-600 dark:text-neutral-400">{"Rest day. Nothing scheduled."}</p> }
                } else {
                    html! {
                        <ul class="bg-white dark:bg-neutral-800 rounded-lg shadow divide-y divide-neutral-200 dark:divide-neutral-700">
                            {for items.iter().map(|item| html! {
                                <li key={item.id.0} class="p-3">
                                    {item.exercise_name.clone().unwrap_or_else(|| format!("Exercise #{}", item.exercise))}
                                </li>
                            })}
                        </ul>
                    }
                })}
            </section>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct StaffPanelsProps {
    on_change: Callback<()>,
}

#[function_component]
fn StaffPanels(props: &StaffPanelsProps) -> Html {
    let today = use_todays_appointments();
    let quick_action = use_quick_action();
    let notifications = use_notifications();

    // confirm through the backend's quick action shortcut
    let on_confirm = {
        let quick_action = quick_action.clone();
        let refetch = today.refetch.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |id: AppointmentId| {
            let pending = quick_action.mutate(requests::QuickAction {
                action: "confirm_appointment".into(),
                data: serde_json::json!({ "appointment_id": id.0 }),
            });
            let notifications = notifications.clone();
            let refetch = refetch.clone();
            let on_change = on_change.clone();
            yew::platform::spawn_local(async move {
                match pending.await {
                    Ok(result) => {
                        notifications.success(result.message);
                        refetch.emit(());
                        on_change.emit(());
                    }
                    Err(e) => {
                        notifications.error(e.to_string());
                    }
                }
            });
        })
    };

    html! {
        <section class="space-y-3">
            <div class="flex justify-between items-center">
                <h2 class="text-lg font-semibold">{"Today's schedule"}</h2>
                <Link<Route> to={Route::Appointments} classes="text-sm underline">
                    {"All appointments"}
                </Link<Route>>
            </div>
            {today.render("today's appointments", |appointments, _| html! {
                <AppointmentList
                    appointments={appointments.clone()}
                    viewer={Role::Physiotherapist}
                    on_confirm={on_confirm.clone()}
                    busy={quick_action.loading}
                    empty_text="Nothing scheduled today."
                />
            })}
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct ActivityFeedProps {
    items: Vec<responses::ActivityItem>,
}

#[function_component]
fn ActivityFeed(props: &ActivityFeedProps) -> Html {
    let now = jiff::Timestamp::now();

    html! {
        <section class="space-y-3">
            <h2 class="text-lg font-semibold">{"Recent activity"}</h2>
            if props.items.is_empty() {
                <p class="text-neutral-600 dark:text-neutral-400">{"No recent activity."}</p>
            } else {
                <ul class="space-y-2">
                    {for props.items.iter().map(|item| html! {
                        <li class="p-3 bg-white dark:bg-neutral-800 rounded-lg shadow flex justify-between">
                            <div>
                                <p class="font-medium">{&item.title}</p>
                                <p class="text-sm text-neutral-600 dark:text-neutral-400">{&item.description}</p>
                            </div>
                            <span
                                class="text-xs text-neutral-500"
                                title={format_timestamp(item.timestamp)}
                            >
                                {time_ago(item.timestamp, now)}
                            </span>
                        </li>
                    })}
                </ul>
            }
        </section>
    }
}
