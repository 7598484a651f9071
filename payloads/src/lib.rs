pub mod api_client;
pub mod requests;
pub mod responses;

pub use api_client::{APIClient, ClientError, FieldErrors};
pub use responses::ListEnvelope;

use serde::{Deserialize, Serialize};

macro_rules! integer_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(
                Debug,
                Clone,
                Copy,
                PartialEq,
                Eq,
                Hash,
                PartialOrd,
                Ord,
                Serialize,
                Deserialize,
                derive_more::Display,
            )]
            #[serde(transparent)]
            pub struct $name(pub i64);
        )*
    };
}

integer_id!(
    UserId,
    AppointmentId,
    ExerciseId,
    ExerciseCategoryId,
    ExercisePlanId,
    /// A single scheduled exercise inside a plan (exercise + weekday + week).
    PlanItemId,
    ExerciseProgressId,
    NotificationId,
    ConversationId,
    MessageId,
);

/// Account type. Serialized as the backend's `user_type` values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Patient,
    Physiotherapist,
    Admin,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Physiotherapist => "Physiotherapist",
            Self::Admin => "Admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
    Rescheduled,
}

impl AppointmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Confirmed => "Confirmed",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::NoShow => "No Show",
            Self::Rescheduled => "Rescheduled",
        }
    }

    /// Whether the appointment can still be cancelled by either party.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Scheduled | Self::Confirmed | Self::Rescheduled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    Consultation,
    FollowUp,
    Therapy,
    Assessment,
    Treatment,
    Emergency,
}

impl AppointmentType {
    pub const ALL: [AppointmentType; 6] = [
        Self::Consultation,
        Self::FollowUp,
        Self::Therapy,
        Self::Assessment,
        Self::Treatment,
        Self::Emergency,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Consultation => "Initial Consultation",
            Self::FollowUp => "Follow-up",
            Self::Therapy => "Therapy Session",
            Self::Assessment => "Assessment",
            Self::Treatment => "Treatment",
            Self::Emergency => "Emergency",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Draft,
    Active,
    Completed,
    Paused,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Completed,
    Partial,
    Skipped,
    Modified,
}

impl CompletionStatus {
    pub const ALL: [CompletionStatus; 4] =
        [Self::Completed, Self::Partial, Self::Skipped, Self::Modified];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Partial => "Partially completed",
            Self::Skipped => "Skipped",
            Self::Modified => "Modified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Appointment,
    Message,
    Exercise,
    System,
}
