use payloads::{
    ClientError, CompletionStatus, Difficulty, PlanStatus, requests,
};
use reqwest::StatusCode;

use test_helpers::{assert_status_code, spawn_app, today};

fn session(
    item: payloads::PlanItemId,
    status: CompletionStatus,
) -> requests::NewExerciseProgress {
    requests::NewExerciseProgress {
        exercise_plan_item: item,
        date_completed: today(),
        completion_status: status,
        completed_repetitions: Some(10),
        completed_sets: Some(3),
        actual_duration: Some(12),
        difficulty_rating: Some(5),
        pain_level_before: Some(6),
        pain_level_after: Some(4),
        notes: None,
    }
}

#[tokio::test]
async fn patient_sees_active_plan_and_items() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    let alice = app.create_alice_user().await?;
    let (plan, items) = app.create_test_plan(&alice, &bob)?;

    let active = app.client.active_exercise_plans().await?;
    assert_eq!(active, vec![plan.clone()]);

    let fetched = app.client.plan_items(&plan.id).await?;
    assert_eq!(fetched, items);
    assert_eq!(fetched[0].exercise_name.as_deref(), Some("Straight Leg Raise"));

    // another patient cannot read the plan
    app.create_carol_user().await?;
    app.login_carol().await?;
    assert!(app.client.active_exercise_plans().await?.is_empty());
    assert_status_code(
        app.client.plan_items(&plan.id).await,
        StatusCode::NOT_FOUND,
    );

    Ok(())
}

#[tokio::test]
async fn log_progress_and_read_stats() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    let alice = app.create_alice_user().await?;
    let (plan, items) = app.create_test_plan(&alice, &bob)?;

    let logged = app
        .client
        .create_exercise_progress(&session(items[0].id, CompletionStatus::Completed))
        .await?;
    assert_eq!(logged.patient, alice.id);
    app.client
        .create_exercise_progress(&session(items[1].id, CompletionStatus::Partial))
        .await?;

    let stats = app.client.exercise_progress_stats(Some(plan.id)).await?;
    assert_eq!(stats.total_sessions, 2);
    assert_eq!(stats.completed_sessions, 1);
    assert_eq!(stats.completion_rate, 50.0);
    assert_eq!(stats.current_streak, 1);
    assert_eq!(stats.average_pain_reduction, Some(2.0));

    let query = requests::ExerciseProgressQuery {
        exercise_plan_item: Some(items[0].id),
        ..Default::default()
    };
    let progress = app.client.list_exercise_progress(&query).await?;
    assert_eq!(progress, vec![logged]);

    Ok(())
}

#[tokio::test]
async fn progress_is_validated() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    let alice = app.create_alice_user().await?;
    let (_, items) = app.create_test_plan(&alice, &bob)?;

    let mut details = session(items[0].id, CompletionStatus::Completed);
    details.pain_level_after = Some(11);
    let result = app.client.create_exercise_progress(&details).await;
    let fields = match result {
        Err(ClientError::Validation(fields)) => fields,
        other => panic!("Expected validation errors, got {other:?}"),
    };
    assert!(fields.get("pain_level_after").is_some());

    // physiotherapists do not log progress themselves
    app.login_bob().await?;
    let result = app
        .client
        .create_exercise_progress(&session(items[0].id, CompletionStatus::Completed))
        .await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn exercise_library() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_bob_user().await?;
    app.create_alice_user().await?;

    let categories = app.client.exercise_categories().await?;
    assert_eq!(categories.len(), 4);

    let details = requests::NewExercise {
        name: "Heel Slide".into(),
        description: "Gentle knee flexion".into(),
        instructions: "Slide the heel towards the buttocks".into(),
        category: categories[1].id,
        difficulty: Difficulty::Beginner,
        target_body_parts: vec!["knee".into()],
        duration: 5,
        repetitions: Some(15),
        sets: Some(2),
    };

    // patients cannot add to the library
    let result = app.client.create_exercise(&details).await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    app.login_bob().await?;
    let exercise = app.client.create_exercise(&details).await?;
    assert_eq!(exercise.category_name.as_deref(), Some("Flexibility"));

    let update = requests::UpdateExercise {
        difficulty: Some(Difficulty::Intermediate),
        ..Default::default()
    };
    let updated = app.client.update_exercise(&exercise.id, &update).await?;
    assert_eq!(updated.difficulty, Difficulty::Intermediate);
    assert_eq!(app.client.get_exercise(&exercise.id).await?, updated);

    let query = requests::ExerciseQuery {
        search: Some("heel".into()),
        ..Default::default()
    };
    assert_eq!(app.client.list_exercises(&query).await?, vec![updated]);

    app.client.delete_exercise(&exercise.id).await?;
    assert_status_code(
        app.client.get_exercise(&exercise.id).await,
        StatusCode::NOT_FOUND,
    );

    Ok(())
}

#[tokio::test]
async fn physiotherapist_completes_plan() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    let alice = app.create_alice_user().await?;
    let (plan, _) = app.create_test_plan(&alice, &bob)?;

    assert_status_code(
        app.client.complete_exercise_plan(&plan.id).await,
        StatusCode::FORBIDDEN,
    );

    app.login_bob().await?;
    let completed = app.client.complete_exercise_plan(&plan.id).await?;
    assert_eq!(completed.status, PlanStatus::Completed);
    assert_eq!(completed.end_date, Some(today()));

    let query = requests::ExercisePlanQuery {
        status: Some(PlanStatus::Completed),
        ..Default::default()
    };
    assert_eq!(app.client.list_exercise_plans(&query).await?.len(), 1);

    let reactivated = app.client.activate_exercise_plan(&plan.id).await?;
    assert_eq!(reactivated.status, PlanStatus::Active);

    Ok(())
}
