use crate::{
    AppointmentId, AppointmentStatus, AppointmentType, CompletionStatus,
    ConversationId, Difficulty, ExerciseCategoryId, ExerciseId,
    ExercisePlanId, ExerciseProgressId, MessageId, NotificationId,
    NotificationType, PlanItemId, PlanStatus, Role, UserId,
};
use jiff::Timestamp;
use jiff::civil::{Date, Time};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// List responses come either as a bare array or as a paginated envelope.
///
/// Both shapes are accepted so callers never need to care which one a given
/// endpoint uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Paginated(Page<T>),
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Paginated(page) => page.results,
            Self::Bare(items) => items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

/// The signed in user, as cached in durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(rename = "user_type")]
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl UserSummary {
    /// "First Last" when either is set, otherwise the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string();
        if full.is_empty() {
            self.username.clone()
        } else {
            full
        }
    }
}

/// Returned by login and registration. Registration and newer login
/// endpoints embed the user; older ones only return the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessMessage {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient: UserId,
    pub physiotherapist: UserId,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub physiotherapist_name: Option<String>,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub status: AppointmentStatus,
    pub appointment_type: AppointmentType,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub cost: Option<Decimal>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_time: Time,
    pub end_time: Time,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseCategory {
    pub id: ExerciseCategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    pub category: ExerciseCategoryId,
    #[serde(default)]
    pub category_name: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub target_body_parts: Vec<String>,
    /// Minutes.
    pub duration: u32,
    #[serde(default)]
    pub repetitions: Option<u32>,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub equipment_needed: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExercisePlan {
    pub id: ExercisePlanId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub patient: UserId,
    pub physiotherapist: UserId,
    pub start_date: Date,
    #[serde(default)]
    pub end_date: Option<Date>,
    pub status: PlanStatus,
    #[serde(default)]
    pub goals: String,
    pub frequency_per_week: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    pub id: PlanItemId,
    pub exercise_plan: ExercisePlanId,
    pub exercise: ExerciseId,
    #[serde(default)]
    pub exercise_name: Option<String>,
    /// 0 = Monday .. 6 = Sunday.
    pub day_of_week: u8,
    pub week_number: u32,
    #[serde(default)]
    pub custom_repetitions: Option<u32>,
    #[serde(default)]
    pub custom_sets: Option<u32>,
    #[serde(default)]
    pub custom_duration: Option<u32>,
    #[serde(default)]
    pub is_mandatory: bool,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseProgress {
    pub id: ExerciseProgressId,
    pub patient: UserId,
    pub exercise_plan_item: PlanItemId,
    pub date_completed: Date,
    pub completion_status: CompletionStatus,
    #[serde(default)]
    pub completed_repetitions: Option<u32>,
    #[serde(default)]
    pub completed_sets: Option<u32>,
    #[serde(default)]
    pub actual_duration: Option<u32>,
    #[serde(default)]
    pub difficulty_rating: Option<u8>,
    #[serde(default)]
    pub pain_level_before: Option<u8>,
    #[serde(default)]
    pub pain_level_after: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub total_sessions: u32,
    pub completed_sessions: u32,
    /// Percentage in 0..=100.
    pub completion_rate: f64,
    pub current_streak: u32,
    #[serde(default)]
    pub average_pain_reduction: Option<f64>,
}

/// A persisted notification from the backend, distinct from transient
/// toasts shown by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
    #[serde(default)]
    pub related_object_id: Option<i64>,
    #[serde(default)]
    pub related_object_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub participants: Vec<UserId>,
    #[serde(default)]
    pub participant_names: Vec<String>,
    #[serde(default)]
    pub last_message: Option<Message>,
    #[serde(default)]
    pub unread_count: u32,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation: ConversationId,
    pub sender: UserId,
    #[serde(default)]
    pub sender_name: Option<String>,
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub total_patients: Option<u64>,
    pub upcoming_appointments: u64,
    pub todays_appointments: u64,
    pub completed_appointments: u64,
    pub active_exercise_plans: u64,
    pub completed_exercises_today: u64,
    pub exercise_streak: u64,
    pub unread_notifications: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: Date,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseAnalytics {
    pub days: u32,
    pub total_sessions: u32,
    pub completed_sessions: u32,
    pub completion_rate: f64,
    #[serde(default)]
    pub average_difficulty: Option<f64>,
    #[serde(default)]
    pub average_pain_before: Option<f64>,
    #[serde(default)]
    pub average_pain_after: Option<f64>,
    #[serde(default)]
    pub daily: Vec<DailyCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub appointment_type: AppointmentType,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentAnalytics {
    pub days: u32,
    pub total: u32,
    pub completed: u32,
    pub cancelled: u32,
    pub no_show: u32,
    #[serde(default)]
    pub by_type: Vec<TypeCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResults {
    pub users: Vec<UserSummary>,
    pub appointments: Vec<Appointment>,
    pub exercises: Vec<Exercise>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.appointments.is_empty()
            && self.exercises.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickActionResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_and_paginated_lists_normalize_the_same() {
        let bare: ListEnvelope<u32> = serde_json::from_str("[1, 2, 3]").unwrap();
        let paged: ListEnvelope<u32> = serde_json::from_str(
            r#"{"count": 3, "next": null, "previous": null, "results": [1, 2, 3]}"#,
        )
        .unwrap();
        assert_eq!(bare.into_vec(), vec![1, 2, 3]);
        assert_eq!(paged.into_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn results_without_pagination_metadata_are_accepted() {
        let list: ListEnvelope<u32> =
            serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(list.into_vec().is_empty());
    }

    #[test]
    fn user_summary_reads_backend_field_names() {
        let user: UserSummary = serde_json::from_str(
            r#"{"id": 1, "username": "pat1", "email": "p@example.com",
                "first_name": "Pat", "last_name": "", "user_type": "patient",
                "is_active": true}"#,
        )
        .unwrap();
        assert_eq!(user.role, Role::Patient);
        assert_eq!(user.display_name(), "Pat");
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let user = UserSummary {
            id: UserId(3),
            username: "drsmith".into(),
            email: "s@example.com".into(),
            first_name: String::new(),
            last_name: String::new(),
            role: Role::Physiotherapist,
            is_active: true,
        };
        assert_eq!(user.display_name(), "drsmith");
    }

    #[test]
    fn login_response_without_user() {
        let auth: AuthResponse =
            serde_json::from_str(r#"{"token": "abc"}"#).unwrap();
        assert_eq!(auth.token, "abc");
        assert!(auth.user.is_none());
    }

    #[test]
    fn appointment_accepts_decimal_cost_as_string() {
        let appointment: Appointment = serde_json::from_str(
            r#"{"id": 5, "patient": 1, "physiotherapist": 2,
                "date": "2025-03-01", "start_time": "09:00:00",
                "end_time": "10:00:00", "status": "scheduled",
                "appointment_type": "follow_up", "reason": "knee",
                "cost": "80.00", "created_at": "2025-02-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(appointment.cost, Some(Decimal::new(8000, 2)));
        assert!(appointment.status.is_cancellable());
    }
}
