use payloads::{
    CompletionStatus, ExerciseId, ExercisePlanId, PlanStatus, Role, requests,
    responses,
};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::RequireAuth;
use crate::contexts::notifications::use_notifications;
use crate::hooks::use_exercises::{
    use_active_plans, use_complete_plan, use_delete_exercise,
    use_exercise_plans, use_exercises, use_log_progress, use_progress_stats,
    use_todays_exercises,
};
use crate::hooks::use_title;
use crate::utils::time::{format_date, today};

#[function_component]
pub fn ExercisesPage() -> Html {
    use_title("Exercises");
    let render = Callback::from(|user: responses::UserSummary| match user.role {
        Role::Patient => html! { <PatientExercises /> },
        Role::Physiotherapist | Role::Admin => html! { <ExerciseLibrary /> },
    });
    html! { <RequireAuth {render} /> }
}

#[function_component]
fn PatientExercises() -> Html {
    let stats = use_progress_stats(None);
    let plans = use_active_plans();
    let todays = use_todays_exercises();
    let on_logged = stats.refetch.clone();

    html! {
        <div class="space-y-8">
            <h1 class="text-2xl font-bold">{"My exercises"}</h1>

            {stats.render("progress", |stats, _| html! {
                <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                    <Stat label="Sessions" value={stats.total_sessions.to_string()} />
                    <Stat label="Completion rate" value={format!("{:.0}%", stats.completion_rate)} />
                    <Stat label="Current streak" value={format!("{} days", stats.current_streak)} />
                    <Stat
                        label="Avg. pain reduction"
                        value={stats.average_pain_reduction.map_or("-".to_string(), |v| format!("{v:.1}"))}
                    />
                </div>
            })}

            <section class="space-y-3">
                <h2 class="text-lg font-semibold">{format!("Today, {}", format_date(today()))}</h2>
                {todays.render("today's exercises", |items, _| if items.is_empty() {
                    html! { <p class="text-neutral-600 dark:text-neutral-400">{"Nothing scheduled today."}</p> }
                } else {
                    html! {
                        <ul class="space-y-3">
                            {for items.iter().map(|item| html! {
                                <LogProgressItem key={item.id.0} item={item.clone()} on_logged={on_logged.clone()} />
                            })}
                        </ul>
                    }
                })}
            </section>

            <section class="space-y-3">
                <h2 class="text-lg font-semibold">{"Active plans"}</h2>
                {plans.render("plans", |plans, _| html! {
                    <PlanList plans={plans.clone()} />
                })}
            </section>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct StatProps {
    label: AttrValue,
    value: AttrValue,
}

#[function_component]
fn Stat(props: &StatProps) -> Html {
    html! {
        <div class="p-4 bg-white dark:bg-neutral-800 rounded-lg shadow">
            <p class="text-sm text-neutral-600 dark:text-neutral-400">{&props.label}</p>
            <p class="text-2xl font-semibold">{&props.value}</p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct LogProgressItemProps {
    item: responses::PlanItem,
    on_logged: Callback<()>,
}

fn number_input(node: &NodeRef) -> Option<u8> {
    node.cast::<HtmlInputElement>()?.value().trim().parse().ok()
}

#[function_component]
fn LogProgressItem(props: &LogProgressItemProps) -> Html {
    let open = use_state(|| false);
    let log = use_log_progress();
    let notifications = use_notifications();
    let status_ref = use_node_ref();
    let pain_before_ref = use_node_ref();
    let pain_after_ref = use_node_ref();
    let difficulty_ref = use_node_ref();
    let notes_ref = use_node_ref();
    let item = &props.item;

    let toggle = {
        let open = open.clone();
        Callback::from(move |_: MouseEvent| open.set(!*open))
    };

    let on_submit = {
        let open = open.clone();
        let log = log.clone();
        let on_logged = props.on_logged.clone();
        let item_id = item.id;
        let status_ref = status_ref.clone();
        let pain_before_ref = pain_before_ref.clone();
        let pain_after_ref = pain_after_ref.clone();
        let difficulty_ref = difficulty_ref.clone();
        let notes_ref = notes_ref.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let completion_status = status_ref
                .cast::<HtmlSelectElement>()
                .and_then(|s| s.value().parse::<usize>().ok())
                .and_then(|index| CompletionStatus::ALL.get(index).copied())
                .unwrap_or(CompletionStatus::Completed);
            let notes = notes_ref
                .cast::<HtmlInputElement>()
                .map(|input| input.value().trim().to_string())
                .filter(|notes| !notes.is_empty());
            let details = requests::NewExerciseProgress {
                exercise_plan_item: item_id,
                date_completed: today(),
                completion_status,
                completed_repetitions: None,
                completed_sets: None,
                actual_duration: None,
                difficulty_rating: number_input(&difficulty_ref),
                pain_level_before: number_input(&pain_before_ref),
                pain_level_after: number_input(&pain_after_ref),
                notes,
            };

            let pending = log.mutate(details);
            let open = open.clone();
            let notifications = notifications.clone();
            let on_logged = on_logged.clone();
            yew::platform::spawn_local(async move {
                match pending.await {
                    Ok(_) => {
                        notifications.success("Progress logged. Keep it up!");
                        open.set(false);
                        on_logged.emit(());
                    }
                    Err(e) => {
                        notifications.error(e.to_string());
                    }
                }
            });
        })
    };

    let name = item
        .exercise_name
        .clone()
        .unwrap_or_else(|| format!("Exercise #{}", item.exercise));
    let prescription = match (item.custom_sets, item.custom_repetitions) {
        (Some(sets), Some(reps)) => format!("{sets} x {reps}"),
        _ => String::new(),
    };

    html! {
        <li class="p-4 bg-white dark:bg-neutral-800 rounded-lg shadow space-y-3">
            <div class="flex justify-between items-center">
                <div>
                    <p class="font-medium">{name}</p>
                    if !prescription.is_empty() {
                        <p class="text-sm text-neutral-600 dark:text-neutral-400">{prescription}</p>
                    }
                </div>
                <button onclick={toggle} class="text-sm underline">
                    {if *open { "Close" } else { "Log progress" }}
                </button>
            </div>
            if *open {
                <form onsubmit={on_submit} class="grid grid-cols-2 gap-3">
                    <label class="col-span-2 text-sm">
                        {"Result"}
                        <select ref={status_ref} class="mt-1 w-full px-2 py-1 border rounded-md bg-white dark:bg-neutral-700">
                            {for CompletionStatus::ALL.iter().enumerate().map(|(index, status)| html! {
                                <option value={index.to_string()}>{status.label()}</option>
                            })}
                        </select>
                    </label>
                    <label class="text-sm">
                        {"Pain before (0-10)"}
                        <input ref={pain_before_ref} type="number" min="0" max="10" class="mt-1 w-full px-2 py-1 border rounded-md bg-white dark:bg-neutral-700" />
                    </label>
                    <label class="text-sm">
                        {"Pain after (0-10)"}
                        <input ref={pain_after_ref} type="number" min="0" max="10" class="mt-1 w-full px-2 py-1 border rounded-md bg-white dark:bg-neutral-700" />
                    </label>
                    <label class="text-sm">
                        {"Difficulty (1-10)"}
                        <input ref={difficulty_ref} type="number" min="1" max="10" class="mt-1 w-full px-2 py-1 border rounded-md bg-white dark:bg-neutral-700" />
                    </label>
                    <label class="text-sm">
                        {"Notes"}
                        <input ref={notes_ref} type="text" class="mt-1 w-full px-2 py-1 border rounded-md bg-white dark:bg-neutral-700" />
                    </label>
                    if let Some(error) = &log.error {
                        <p class="col-span-2 text-sm text-red-600 dark:text-red-400">{error}</p>
                    }
                    <button
                        type="submit"
                        disabled={log.loading}
                        class="col-span-2 px-4 py-2 rounded-md bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900 disabled:opacity-50"
                    >
                        {if log.loading { "Saving..." } else { "Save" }}
                    </button>
                </form>
            }
        </li>
    }
}

#[derive(Properties, PartialEq)]
struct PlanListProps {
    plans: Vec<responses::ExercisePlan>,
    #[prop_or_default]
    on_complete: Option<Callback<ExercisePlanId>>,
}

#[function_component]
fn PlanList(props: &PlanListProps) -> Html {
    if props.plans.is_empty() {
        return html! {
            <p class="text-neutral-600 dark:text-neutral-400">{"No exercise plans yet."}</p>
        };
    }

    html! {
        <ul class="space-y-3">
            {for props.plans.iter().map(|plan| {
                let complete = props
                    .on_complete
                    .as_ref()
                    .filter(|_| plan.status == PlanStatus::Active)
                    .map(|callback| {
                        let id = plan.id;
                        callback.reform(move |_: MouseEvent| id)
                    });
                html! {
                    <li key={plan.id.0} class="p-4 bg-white dark:bg-neutral-800 rounded-lg shadow">
                        <div class="flex justify-between items-center">
                            <p class="font-medium">{&plan.name}</p>
                            if let Some(onclick) = complete {
                                <button {onclick} class="text-sm underline">{"Mark completed"}</button>
                            }
                        </div>
                        if !plan.goals.is_empty() {
                            <p class="text-sm text-neutral-600 dark:text-neutral-400">{&plan.goals}</p>
                        }
                        <p class="text-sm text-neutral-500">
                            {format!(
                                "{} times a week, since {}",
                                plan.frequency_per_week,
                                format_date(plan.start_date)
                            )}
                        </p>
                    </li>
                }
            })}
        </ul>
    }
}

#[function_component]
fn ExerciseLibrary() -> Html {
    let search = use_state(String::new);
    let exercises = use_exercises(requests::ExerciseQuery {
        search: Some(search.trim().to_string()).filter(|s| !s.is_empty()),
        ..Default::default()
    });
    let plans = use_exercise_plans(requests::ExercisePlanQuery::default());
    let delete = use_delete_exercise();
    let complete = use_complete_plan();
    let notifications = use_notifications();

    let on_search = {
        let search = search.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                search.set(input.value());
            }
        })
    };

    let on_delete = {
        let delete = delete.clone();
        let refetch = exercises.refetch.clone();
        let notifications = notifications.clone();
        Callback::from(move |id: ExerciseId| {
            let pending = delete.mutate(id);
            let refetch = refetch.clone();
            let notifications = notifications.clone();
            yew::platform::spawn_local(async move {
                match pending.await {
                    Ok(()) => {
                        notifications.success("Exercise removed");
                        refetch.emit(());
                    }
                    Err(e) => {
                        notifications.error(e.to_string());
                    }
                }
            });
        })
    };

    let on_complete = {
        let complete = complete.clone();
        let refetch = plans.refetch.clone();
        Callback::from(move |id: ExercisePlanId| {
            let pending = complete.mutate(id);
            let refetch = refetch.clone();
            let notifications = notifications.clone();
            yew::platform::spawn_local(async move {
                match pending.await {
                    Ok(plan) => {
                        notifications.success(format!("{} completed", plan.name));
                        refetch.emit(());
                    }
                    Err(e) => {
                        notifications.error(e.to_string());
                    }
                }
            });
        })
    };

    html! {
        <div class="space-y-8">
            <h1 class="text-2xl font-bold">{"Exercises"}</h1>

            <section class="space-y-3">
                <h2 class="text-lg font-semibold">{"Exercise plans"}</h2>
                {plans.render("plans", |plans, _| html! {
                    <PlanList plans={plans.clone()} on_complete={on_complete.clone()} />
                })}
            </section>

            <section class="space-y-3">
                <div class="flex justify-between items-center gap-4">
                    <h2 class="text-lg font-semibold">{"Library"}</h2>
                    <input
                        type="search"
                        placeholder="Search exercises"
                        value={(*search).clone()}
                        oninput={on_search}
                        class="px-3 py-2 border rounded-md bg-white dark:bg-neutral-700"
                    />
                </div>
                {exercises.render("exercises", |list, _| html! {
                    <ul class="divide-y divide-neutral-200 dark:divide-neutral-700 bg-white dark:bg-neutral-800 rounded-lg shadow">
                        {for list.iter().map(|exercise| {
                            let id = exercise.id;
                            let onclick = on_delete.reform(move |_: MouseEvent| id);
                            html! {
                                <li key={exercise.id.0} class="p-3 flex justify-between items-center">
                                    <div>
                                        <p class="font-medium">{&exercise.name}</p>
                                        <p class="text-sm text-neutral-600 dark:text-neutral-400">
                                            {format!(
                                                "{} · {} min{}",
                                                exercise.difficulty.label(),
                                                exercise.duration,
                                                exercise.category_name.as_deref().map(|c| format!(" · {c}")).unwrap_or_default()
                                            )}
                                        </p>
                                    </div>
                                    <button
                                        {onclick}
                                        disabled={delete.loading}
                                        class="text-sm text-red-600 dark:text-red-400 underline disabled:opacity-50"
                                    >
                                        {"Remove"}
                                    </button>
                                </li>
                            }
                        })}
                    </ul>
                })}
            </section>
        </div>
    }
}
