//! Sample data for the development server and for tests that want a
//! populated clinic.
//!
//! The dataset covers every screen of the UI:
//! - a physiotherapist, two patients and an admin
//! - an active exercise plan for the first patient with progress logged
//! - upcoming, today's and cancelled appointments
//! - notifications generated by those bookings
//! - a conversation between the first patient and the physiotherapist

use anyhow::Result;
use jiff::ToSpan;
use payloads::{CompletionStatus, requests, responses};

use crate::{TEST_PASSWORD, TestApp, account, today};

pub struct DevDataset {
    pub physiotherapist: responses::UserSummary,
    pub patient: responses::UserSummary,
    pub second_patient: responses::UserSummary,
    pub admin: responses::UserSummary,
    pub plan: responses::ExercisePlan,
    pub appointments: Vec<responses::Appointment>,
}

impl DevDataset {
    pub async fn create(app: &TestApp) -> Result<Self> {
        tracing::info!("👤 Creating clinic staff and patients");
        let physiotherapist = app.create_bob_user().await?;
        let second_physio = app
            .register(&account(
                "dr_lee",
                "Morgan",
                "Lee",
                payloads::Role::Physiotherapist,
            ))
            .await?;
        let second_patient = app.create_carol_user().await?;
        let admin = app.create_admin_user()?;
        let patient = app.create_alice_user().await?;

        tracing::info!("🏋️ Creating an exercise plan");
        let (plan, items) = app.create_test_plan(&patient, &physiotherapist)?;

        tracing::info!("📅 Booking appointments");
        let tomorrow = today().checked_add(1.day())?;
        let next_week = today().checked_add(7.days())?;
        let mut appointments = vec![
            app.book_appointment(physiotherapist.id, tomorrow, 10).await?,
            app.book_appointment(physiotherapist.id, next_week, 14).await?,
            app.book_appointment(second_physio.id, today(), 16).await?,
        ];
        let cancelled =
            app.book_appointment(physiotherapist.id, next_week, 9).await?;
        appointments.push(
            app.client
                .cancel_appointment(
                    &cancelled.id,
                    &requests::CancelAppointment {
                        reason: Some("Schedule conflict".into()),
                    },
                )
                .await?,
        );

        tracing::info!("📈 Logging exercise progress");
        let yesterday = today().yesterday()?;
        let sessions = [
            (yesterday, &items[0]),
            (today(), &items[0]),
            (today(), &items[1]),
        ];
        for (date, item) in sessions {
            app.client
                .create_exercise_progress(&requests::NewExerciseProgress {
                    exercise_plan_item: item.id,
                    date_completed: date,
                    completion_status: CompletionStatus::Completed,
                    completed_repetitions: Some(12),
                    completed_sets: Some(3),
                    actual_duration: Some(12),
                    difficulty_rating: Some(4),
                    pain_level_before: Some(5),
                    pain_level_after: Some(3),
                    notes: None,
                })
                .await?;
        }

        tracing::info!("💬 Starting a conversation");
        let conversation =
            app.start_conversation(&[patient.id, physiotherapist.id]);
        app.client
            .send_message(&requests::SendMessage {
                conversation,
                content: "Hi, my knee feels better after the exercises.".into(),
            })
            .await?;
        app.login_bob().await?;
        app.client
            .send_message(&requests::SendMessage {
                conversation,
                content: "Great to hear! Keep going with the plan.".into(),
            })
            .await?;

        app.push_notification(
            patient.id,
            "Welcome",
            "Your care team has set up your account.",
        );
        app.login_alice().await?;

        Ok(Self {
            physiotherapist,
            patient,
            second_patient,
            admin,
            plan,
            appointments,
        })
    }

    pub fn print_summary(&self) {
        tracing::info!("📋 Development dataset");
        for user in [
            &self.patient,
            &self.second_patient,
            &self.physiotherapist,
            &self.admin,
        ] {
            tracing::info!(
                "   {:<16} {:<10} password: {}",
                user.username,
                user.role.label(),
                TEST_PASSWORD
            );
        }
        tracing::info!(
            "   plan '{}' with {} appointments booked",
            self.plan.name,
            self.appointments.len()
        );
    }
}
