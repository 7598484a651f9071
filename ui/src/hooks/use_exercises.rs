use futures::future::try_join_all;
use jiff::civil::Date;
use payloads::{
    ClientError, ExerciseId, ExercisePlanId, requests, responses,
};
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::{ApiHandle, ApiOptions, MutationHandle, use_api, use_mutation};
use crate::utils::time::today;

#[hook]
pub fn use_exercises(
    query: requests::ExerciseQuery,
) -> ApiHandle<Vec<responses::Exercise>> {
    use_api(query, ApiOptions::default(), |query| async move {
        get_api_client().list_exercises(&query).await
    })
}

#[hook]
pub fn use_exercise_categories() -> ApiHandle<Vec<responses::ExerciseCategory>> {
    use_api((), ApiOptions::default(), |_| async move {
        get_api_client().exercise_categories().await
    })
}

#[hook]
pub fn use_exercise(exercise_id: ExerciseId) -> ApiHandle<responses::Exercise> {
    use_api(exercise_id, ApiOptions::default(), |id| async move {
        get_api_client().get_exercise(&id).await
    })
}

#[hook]
pub fn use_exercise_plans(
    query: requests::ExercisePlanQuery,
) -> ApiHandle<Vec<responses::ExercisePlan>> {
    use_api(query, ApiOptions::default(), |query| async move {
        get_api_client().list_exercise_plans(&query).await
    })
}

#[hook]
pub fn use_active_plans() -> ApiHandle<Vec<responses::ExercisePlan>> {
    use_api((), ApiOptions::default(), |_| async move {
        get_api_client().active_exercise_plans().await
    })
}

#[hook]
pub fn use_plan_items(
    plan_id: Option<ExercisePlanId>,
) -> ApiHandle<Vec<responses::PlanItem>> {
    use_api(plan_id, ApiOptions::when(plan_id.is_some()), |plan_id| async move {
        match plan_id {
            Some(plan_id) => get_api_client().plan_items(&plan_id).await,
            None => Ok(Vec::new()),
        }
    })
}

#[hook]
pub fn use_exercise_progress(
    query: requests::ExerciseProgressQuery,
) -> ApiHandle<Vec<responses::ExerciseProgress>> {
    use_api(query, ApiOptions::default(), |query| async move {
        get_api_client().list_exercise_progress(&query).await
    })
}

#[hook]
pub fn use_progress_stats(
    plan_id: Option<ExercisePlanId>,
) -> ApiHandle<responses::ProgressStats> {
    use_api(plan_id, ApiOptions::default(), |plan_id| async move {
        get_api_client().exercise_progress_stats(plan_id).await
    })
}

/// Plan items of every active plan that fall on today's weekday.
#[hook]
pub fn use_todays_exercises() -> ApiHandle<Vec<responses::PlanItem>> {
    use_api(today(), ApiOptions::default(), |date| async move {
        let client = get_api_client();
        let plans = client.active_exercise_plans().await?;
        let items =
            try_join_all(plans.iter().map(|plan| client.plan_items(&plan.id)))
                .await?;
        Ok::<_, ClientError>(scheduled_on(items.into_iter().flatten(), date))
    })
}

/// Items scheduled for the weekday of `date`, in plan order.
pub fn scheduled_on(
    items: impl IntoIterator<Item = responses::PlanItem>,
    date: Date,
) -> Vec<responses::PlanItem> {
    let weekday = date.weekday().to_monday_zero_offset() as u8;
    let mut items: Vec<_> = items
        .into_iter()
        .filter(|item| item.day_of_week == weekday)
        .collect();
    items.sort_by_key(|item| (item.exercise_plan, item.order));
    items
}

#[hook]
pub fn use_log_progress() -> MutationHandle<
    requests::NewExerciseProgress,
    responses::ExerciseProgress,
    ClientError,
> {
    use_mutation(|details: requests::NewExerciseProgress| async move {
        get_api_client().create_exercise_progress(&details).await
    })
}

#[hook]
pub fn use_create_exercise()
-> MutationHandle<requests::NewExercise, responses::Exercise, ClientError> {
    use_mutation(|details: requests::NewExercise| async move {
        get_api_client().create_exercise(&details).await
    })
}

#[hook]
pub fn use_update_exercise() -> MutationHandle<
    (ExerciseId, requests::UpdateExercise),
    responses::Exercise,
    ClientError,
> {
    use_mutation(
        |(id, details): (ExerciseId, requests::UpdateExercise)| async move {
            get_api_client().update_exercise(&id, &details).await
        },
    )
}

#[hook]
pub fn use_delete_exercise() -> MutationHandle<ExerciseId, (), ClientError> {
    use_mutation(|id: ExerciseId| async move {
        get_api_client().delete_exercise(&id).await
    })
}

#[hook]
pub fn use_activate_plan()
-> MutationHandle<ExercisePlanId, responses::ExercisePlan, ClientError> {
    use_mutation(|id: ExercisePlanId| async move {
        get_api_client().activate_exercise_plan(&id).await
    })
}

#[hook]
pub fn use_complete_plan()
-> MutationHandle<ExercisePlanId, responses::ExercisePlan, ClientError> {
    use_mutation(|id: ExercisePlanId| async move {
        get_api_client().complete_exercise_plan(&id).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use payloads::PlanItemId;

    fn item(id: i64, plan: i64, day_of_week: u8, order: u32) -> responses::PlanItem {
        responses::PlanItem {
            id: PlanItemId(id),
            exercise_plan: ExercisePlanId(plan),
            exercise: ExerciseId(1),
            exercise_name: None,
            day_of_week,
            week_number: 1,
            custom_repetitions: None,
            custom_sets: None,
            custom_duration: None,
            is_mandatory: true,
            order,
        }
    }

    #[test]
    fn keeps_only_items_for_the_weekday() {
        // 2024-01-03 is a Wednesday
        let wednesday = date(2024, 1, 3);
        let items = vec![
            item(1, 1, 2, 1),
            item(2, 1, 0, 0),
            item(3, 1, 2, 0),
            item(4, 2, 2, 0),
        ];
        let ids: Vec<_> = scheduled_on(items, wednesday)
            .into_iter()
            .map(|i| i.id.0)
            .collect();
        assert_eq!(ids, vec![3, 1, 4]);
    }

    #[test]
    fn sunday_is_day_six() {
        let sunday = date(2024, 1, 7);
        let picked = scheduled_on(vec![item(1, 1, 6, 0)], sunday);
        assert_eq!(picked.len(), 1);
    }
}
