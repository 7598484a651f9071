use payloads::{Role, responses};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::components::RequireAuth;
use crate::config::config;
use crate::hooks::use_analytics::{
    use_appointment_analytics, use_exercise_analytics,
};
use crate::hooks::{use_polling, use_title};

const WINDOWS: [u32; 3] = [7, 30, 90];

#[function_component]
pub fn AnalyticsPage() -> Html {
    use_title("Analytics");
    let render = Callback::from(|user: responses::UserSummary| {
        html! { <Analytics viewer={user.role} /> }
    });
    html! { <RequireAuth {render} /> }
}

#[derive(Properties, PartialEq)]
struct AnalyticsProps {
    viewer: Role,
}

#[function_component]
fn Analytics(props: &AnalyticsProps) -> Html {
    let days = use_state(|| 30u32);
    let exercises = use_exercise_analytics(*days);
    let appointments = use_appointment_analytics(*days);

    let refresh_ms = config().ui.analytics_refresh_interval_ms;
    use_polling(exercises.refetch.clone(), refresh_ms, true);
    use_polling(appointments.refetch.clone(), refresh_ms, true);

    let on_window = {
        let days = days.clone();
        Callback::from(move |e: Event| {
            if let Some(value) = e
                .target_dyn_into::<HtmlSelectElement>()
                .and_then(|select| select.value().parse().ok())
            {
                days.set(value);
            }
        })
    };

    html! {
        <div class="space-y-8">
            <div class="flex justify-between items-center">
                <h1 class="text-2xl font-bold">
                    {if props.viewer == Role::Patient { "My progress" } else { "Clinic analytics" }}
                </h1>
                <select onchange={on_window} class="px-3 py-2 border rounded-md bg-white dark:bg-neutral-700">
                    {for WINDOWS.iter().map(|window| html! {
                        <option value={window.to_string()} selected={*window == *days}>
                            {format!("Last {window} days")}
                        </option>
                    })}
                </select>
            </div>

            <section class="space-y-3">
                <h2 class="text-lg font-semibold">{"Exercise sessions"}</h2>
                {exercises.render("exercise analytics", |data, _| html! {
                    <ExerciseSummary data={data.clone()} />
                })}
            </section>

            <section class="space-y-3">
                <h2 class="text-lg font-semibold">{"Appointments"}</h2>
                {appointments.render("appointment analytics", |data, _| html! {
                    <AppointmentSummary data={data.clone()} />
                })}
            </section>
        </div>
    }
}

fn average(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

#[derive(Properties, PartialEq)]
struct ExerciseSummaryProps {
    data: responses::ExerciseAnalytics,
}

#[function_component]
fn ExerciseSummary(props: &ExerciseSummaryProps) -> Html {
    let data = &props.data;
    let peak = data.daily.iter().map(|d| d.count).max().unwrap_or(0).max(1);

    html! {
        <div class="space-y-4">
            <dl class="grid grid-cols-2 md:grid-cols-5 gap-4">
                <Figure label="Sessions" value={data.total_sessions.to_string()} />
                <Figure label="Completed" value={data.completed_sessions.to_string()} />
                <Figure label="Completion rate" value={format!("{:.0}%", data.completion_rate)} />
                <Figure label="Avg. difficulty" value={average(data.average_difficulty)} />
                <Figure
                    label="Avg. pain"
                    value={format!("{} → {}", average(data.average_pain_before), average(data.average_pain_after))}
                />
            </dl>
            <div class="flex items-end gap-1 h-32 p-2 bg-white dark:bg-neutral-800 rounded-lg shadow">
                {for data.daily.iter().map(|day| {
                    let height = day.count * 100 / peak;
                    html! {
                        <div
                            class="flex-1 bg-neutral-900 dark:bg-neutral-100 rounded-t"
                            style={format!("height: {height}%")}
                            title={format!("{}: {}", day.date, day.count)}
                        />
                    }
                })}
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct AppointmentSummaryProps {
    data: responses::AppointmentAnalytics,
}

#[function_component]
fn AppointmentSummary(props: &AppointmentSummaryProps) -> Html {
    let data = &props.data;

    html! {
        <div class="space-y-4">
            <dl class="grid grid-cols-2 md:grid-cols-4 gap-4">
                <Figure label="Total" value={data.total.to_string()} />
                <Figure label="Completed" value={data.completed.to_string()} />
                <Figure label="Cancelled" value={data.cancelled.to_string()} />
                <Figure label="No-shows" value={data.no_show.to_string()} />
            </dl>
            if !data.by_type.is_empty() {
                <ul class="bg-white dark:bg-neutral-800 rounded-lg shadow divide-y divide-neutral-200 dark:divide-neutral-700">
                    {for data.by_type.iter().map(|entry| html! {
                        <li class="p-3 flex justify-between">
                            <span>{entry.appointment_type.label()}</span>
                            <span class="font-medium">{entry.count}</span>
                        </li>
                    })}
                </ul>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct FigureProps {
    label: AttrValue,
    value: AttrValue,
}

#[function_component]
fn Figure(props: &FigureProps) -> Html {
    html! {
        <div class="p-4 bg-white dark:bg-neutral-800 rounded-lg shadow">
            <dt class="text-sm text-neutral-600 dark:text-neutral-400">{&props.label}</dt>
            <dd class="text-2xl font-semibold">{&props.value}</dd>
        </div>
    }
}
