use jiff::ToSpan;
use payloads::{AppointmentId, AppointmentStatus, ClientError, requests};
use reqwest::StatusCode;

use test_helpers::{
    appointment_details, assert_status_code, spawn_app, today,
};

#[tokio::test]
async fn book_and_fetch_appointment() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    let alice = app.create_alice_user().await?;
    let tomorrow = today().checked_add(1.day())?;

    let appointment = app.book_appointment(bob.id, tomorrow, 10).await?;
    assert_eq!(appointment.patient, alice.id);
    assert_eq!(appointment.physiotherapist, bob.id);
    assert_eq!(appointment.status, AppointmentStatus::Scheduled);
    assert_eq!(appointment.physiotherapist_name.as_deref(), Some("Bob Brown"));
    assert!(appointment.cost.is_some());

    let fetched = app.client.get_appointment(&appointment.id).await?;
    assert_eq!(fetched, appointment);

    let listed = app
        .client
        .list_appointments(&requests::AppointmentQuery::default())
        .await?;
    assert_eq!(listed, vec![appointment]);

    Ok(())
}

#[tokio::test]
async fn double_booking_is_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    app.create_carol_user().await?;
    app.create_alice_user().await?;
    let tomorrow = today().checked_add(1.day())?;

    app.book_appointment(bob.id, tomorrow, 10).await?;

    app.login_carol().await?;
    let result = app.book_appointment(bob.id, tomorrow, 10).await;
    let error = result.expect_err("slot is already taken");
    let error = error.downcast::<ClientError>()?;
    assert_eq!(
        error.field_errors().and_then(|f| f.first("non_field_errors")),
        Some("This time slot is not available.")
    );

    // an adjacent slot is fine
    app.book_appointment(bob.id, tomorrow, 11).await?;

    Ok(())
}

#[tokio::test]
async fn end_must_follow_start() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    app.create_alice_user().await?;

    let mut details = appointment_details(bob.id, today(), 12);
    std::mem::swap(&mut details.start_time, &mut details.end_time);
    let result = app.client.create_appointment(&details).await;
    assert!(matches!(result, Err(ClientError::Validation(_))));

    Ok(())
}

#[tokio::test]
async fn available_slots_reflect_bookings() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    app.create_alice_user().await?;
    let tomorrow = today().checked_add(1.day())?;

    let query = requests::TimeSlotQuery {
        physiotherapist_id: bob.id,
        date: tomorrow,
    };
    let slots = app.client.available_time_slots(&query).await?;
    assert_eq!(slots.len(), 8);
    assert!(slots.iter().all(|s| s.available));

    app.book_appointment(bob.id, tomorrow, 13).await?;
    let slots = app.client.available_time_slots(&query).await?;
    let booked: Vec<_> = slots
        .iter()
        .filter(|s| !s.available)
        .map(|s| s.start_time.hour())
        .collect();
    assert_eq!(booked, vec![13]);

    Ok(())
}

#[tokio::test]
async fn upcoming_and_today() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    app.create_alice_user().await?;
    let next_week = today().checked_add(7.days())?;

    let later = app.book_appointment(bob.id, next_week, 9).await?;
    let now = app.book_appointment(bob.id, today(), 16).await?;

    let upcoming = app.client.upcoming_appointments().await?;
    assert_eq!(
        upcoming.iter().map(|a| a.id).collect::<Vec<_>>(),
        vec![now.id, later.id]
    );

    let todays = app.client.todays_appointments().await?;
    assert_eq!(todays.iter().map(|a| a.id).collect::<Vec<_>>(), vec![now.id]);

    Ok(())
}

#[tokio::test]
async fn cancel_appointment() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    app.create_alice_user().await?;
    let tomorrow = today().checked_add(1.day())?;
    let appointment = app.book_appointment(bob.id, tomorrow, 10).await?;

    let reason = requests::CancelAppointment {
        reason: Some("Feeling better".into()),
    };
    let cancelled = app.client.cancel_appointment(&appointment.id, &reason).await?;
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Feeling better"));
    assert!(app.client.upcoming_appointments().await?.is_empty());

    // a second cancellation is refused with a plain error message
    match app.client.cancel_appointment(&appointment.id, &reason).await {
        Err(ClientError::APIError(code, message)) => {
            assert_eq!(code, StatusCode::BAD_REQUEST);
            assert_eq!(message, "Appointment cannot be cancelled");
        }
        other => panic!("Expected APIError, got {other:?}"),
    }

    // the slot is free again
    app.book_appointment(bob.id, tomorrow, 10).await?;

    Ok(())
}

#[tokio::test]
async fn only_staff_confirm_and_complete() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    app.create_alice_user().await?;
    let tomorrow = today().checked_add(1.day())?;
    let appointment = app.book_appointment(bob.id, tomorrow, 10).await?;

    let result = app.client.confirm_appointment(&appointment.id).await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    app.login_bob().await?;
    let confirmed = app.client.confirm_appointment(&appointment.id).await?;
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);

    let result = app.client.confirm_appointment(&appointment.id).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    let completed = app.client.complete_appointment(&appointment.id).await?;
    assert_eq!(completed.status, AppointmentStatus::Completed);

    Ok(())
}

#[tokio::test]
async fn filter_by_status() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    app.create_alice_user().await?;
    let tomorrow = today().checked_add(1.day())?;
    let kept = app.book_appointment(bob.id, tomorrow, 10).await?;
    let dropped = app.book_appointment(bob.id, tomorrow, 11).await?;
    app.client
        .cancel_appointment(&dropped.id, &requests::CancelAppointment::default())
        .await?;

    let query = requests::AppointmentQuery {
        status: Some(AppointmentStatus::Scheduled),
        ..Default::default()
    };
    let scheduled = app.client.list_appointments(&query).await?;
    assert_eq!(scheduled.iter().map(|a| a.id).collect::<Vec<_>>(), vec![kept.id]);

    let query = requests::AppointmentQuery {
        status: Some(AppointmentStatus::Cancelled),
        ..Default::default()
    };
    let cancelled = app.client.list_appointments(&query).await?;
    assert_eq!(cancelled.iter().map(|a| a.id).collect::<Vec<_>>(), vec![dropped.id]);

    Ok(())
}

#[tokio::test]
async fn reschedule_appointment() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    app.create_alice_user().await?;
    let tomorrow = today().checked_add(1.day())?;
    let appointment = app.book_appointment(bob.id, tomorrow, 10).await?;

    let details = requests::UpdateAppointment {
        start_time: Some(jiff::civil::time(14, 0, 0, 0)),
        end_time: Some(jiff::civil::time(15, 0, 0, 0)),
        notes: Some("Moved to the afternoon".into()),
        ..Default::default()
    };
    let updated = app.client.update_appointment(&appointment.id, &details).await?;
    assert_eq!(updated.start_time, jiff::civil::time(14, 0, 0, 0));
    assert_eq!(updated.notes.as_deref(), Some("Moved to the afternoon"));

    // patients cannot set the status directly
    let details = requests::UpdateAppointment {
        status: Some(AppointmentStatus::Completed),
        ..Default::default()
    };
    let result = app.client.update_appointment(&appointment.id, &details).await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn other_patients_appointments_are_hidden() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bob = app.create_bob_user().await?;
    app.create_carol_user().await?;
    app.create_alice_user().await?;
    let tomorrow = today().checked_add(1.day())?;
    let appointment = app.book_appointment(bob.id, tomorrow, 10).await?;

    app.login_carol().await?;
    assert_status_code(
        app.client.get_appointment(&appointment.id).await,
        StatusCode::NOT_FOUND,
    );
    assert_status_code(
        app.client.get_appointment(&AppointmentId(9999)).await,
        StatusCode::NOT_FOUND,
    );
    assert!(
        app.client
            .list_appointments(&requests::AppointmentQuery::default())
            .await?
            .is_empty()
    );

    Ok(())
}
