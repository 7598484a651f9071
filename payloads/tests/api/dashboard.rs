use jiff::ToSpan;
use payloads::{AppointmentType, CompletionStatus, requests};
use reqwest::StatusCode;

use test_helpers::{assert_status_code, spawn_app, today};

fn completed_session(
    item: payloads::PlanItemId,
) -> requests::NewExerciseProgress {
    requests::NewExerciseProgress {
        exercise_plan_item: item,
        date_completed: today(),
        completion_status: CompletionStatus::Completed,
        completed_repetitions: Some(12),
        completed_sets: Some(3),
        actual_duration: Some(10),
        difficulty_rating: Some(4),
        pain_level_before: Some(5),
        pain_level_after: Some(3),
        notes: Some("Felt easier today".into()),
    }
}

#[tokio::test]
async fn dashboard_stats_per_role() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    let alice = app.create_alice_user().await?;
    let (_, items) = app.create_test_plan(&alice, &bob)?;
    let tomorrow = today().checked_add(1.day())?;
    app.book_appointment(bob.id, tomorrow, 10).await?;
    app.client
        .create_exercise_progress(&completed_session(items[0].id))
        .await?;

    let stats = app.client.dashboard_stats().await?;
    assert_eq!(stats.total_patients, None);
    assert_eq!(stats.upcoming_appointments, 1);
    assert_eq!(stats.todays_appointments, 0);
    assert_eq!(stats.active_exercise_plans, 1);
    assert_eq!(stats.completed_exercises_today, 1);
    assert_eq!(stats.exercise_streak, 1);
    assert_eq!(stats.unread_notifications, 0);

    app.login_bob().await?;
    let stats = app.client.dashboard_stats().await?;
    assert_eq!(stats.total_patients, Some(1));
    assert_eq!(stats.upcoming_appointments, 1);
    assert_eq!(stats.exercise_streak, 0);
    assert_eq!(stats.unread_notifications, 1);

    Ok(())
}

#[tokio::test]
async fn recent_activity_is_newest_first() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    let alice = app.create_alice_user().await?;
    let (_, items) = app.create_test_plan(&alice, &bob)?;
    let tomorrow = today().checked_add(1.day())?;
    app.book_appointment(bob.id, tomorrow, 10).await?;
    app.client
        .create_exercise_progress(&completed_session(items[1].id))
        .await?;

    let activity = app.client.recent_activity(10).await?;
    assert_eq!(activity.len(), 2);
    assert!(activity[0].timestamp >= activity[1].timestamp);
    assert!(activity.iter().any(|a| a.kind == "appointment"
        && a.title == "Therapy Session with Bob Brown"));
    assert!(
        activity
            .iter()
            .any(|a| a.kind == "exercise" && a.title == "Wall Squat logged")
    );

    assert_eq!(app.client.recent_activity(1).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn analytics_cover_the_requested_window() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    let alice = app.create_alice_user().await?;
    let (_, items) = app.create_test_plan(&alice, &bob)?;
    app.client
        .create_exercise_progress(&completed_session(items[0].id))
        .await?;
    let booked = app.book_appointment(bob.id, today(), 16).await?;
    app.client
        .cancel_appointment(&booked.id, &requests::CancelAppointment::default())
        .await?;

    let exercises = app.client.exercise_analytics(7).await?;
    assert_eq!(exercises.days, 7);
    assert_eq!(exercises.daily.len(), 7);
    assert_eq!(exercises.total_sessions, 1);
    assert_eq!(exercises.completion_rate, 100.0);
    assert_eq!(exercises.average_pain_before, Some(5.0));
    assert_eq!(exercises.daily.last().map(|d| (d.date, d.count)), Some((today(), 1)));

    let appointments = app.client.appointment_analytics(30).await?;
    assert_eq!(appointments.days, 30);
    assert_eq!(appointments.total, 1);
    assert_eq!(appointments.cancelled, 1);
    assert_eq!(appointments.by_type.len(), 1);
    assert_eq!(appointments.by_type[0].appointment_type, AppointmentType::Therapy);

    Ok(())
}

#[tokio::test]
async fn search_across_records() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    let alice = app.create_alice_user().await?;
    app.create_test_plan(&alice, &bob)?;
    let tomorrow = today().checked_add(1.day())?;
    let appointment = app.book_appointment(bob.id, tomorrow, 10).await?;

    let query = requests::SearchQuery { q: "knee".into() };
    let results = app.client.search(&query).await?;
    assert_eq!(results.appointments, vec![appointment]);
    assert_eq!(results.exercises.len(), 2);
    assert!(results.users.is_empty());

    let query = requests::SearchQuery { q: "brown".into() };
    let results = app.client.search(&query).await?;
    assert_eq!(results.users, vec![bob]);

    let query = requests::SearchQuery { q: "  ".into() };
    assert_eq!(app.client.search(&query).await?, Default::default());

    Ok(())
}

#[tokio::test]
async fn quick_actions() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    app.create_alice_user().await?;
    let tomorrow = today().checked_add(1.day())?;
    let appointment = app.book_appointment(bob.id, tomorrow, 10).await?;

    app.login_bob().await?;
    let action = requests::QuickAction {
        action: "confirm_appointment".into(),
        data: serde_json::json!({ "appointment_id": appointment.id.0 }),
    };
    let result = app.client.quick_action(&action).await?;
    assert!(result.success);
    assert_eq!(result.message, "Appointment confirmed successfully");

    let action = requests::QuickAction {
        action: "mark_all_notifications_read".into(),
        data: serde_json::Value::Null,
    };
    app.client.quick_action(&action).await?;
    assert_eq!(app.client.unread_notification_count().await?, 0);

    let action = requests::QuickAction {
        action: "launch_rocket".into(),
        data: serde_json::Value::Null,
    };
    assert_status_code(
        app.client.quick_action(&action).await,
        StatusCode::BAD_REQUEST,
    );

    Ok(())
}
