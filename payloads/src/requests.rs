use crate::{
    AppointmentStatus, AppointmentType, CompletionStatus, ConversationId,
    Difficulty, ExerciseCategoryId, ExercisePlanId, NotificationType,
    PlanItemId, PlanStatus, Role, UserId,
};
use jiff::civil::{Date, Time};
use serde::{Deserialize, Serialize};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 150;
pub const PASSWORD_MIN_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// Account creation, used both for self registration and for admins
/// creating users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "user_type")]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl RegisterAccount {
    /// Client-side checks mirrored from the backend serializer, keyed by
    /// field name so forms can show them inline.
    pub fn validate(&self) -> Vec<(&'static str, &'static str)> {
        let mut problems = Vec::new();
        let username_len = self.username.trim().len();
        if username_len < USERNAME_MIN_LEN {
            problems.push(("username", "Username must be at least 3 characters"));
        } else if username_len > USERNAME_MAX_LEN {
            problems.push(("username", "Username is too long"));
        }
        if !self.email.contains('@') {
            problems.push(("email", "Please enter a valid email address"));
        }
        if self.password.len() < PASSWORD_MIN_LEN {
            problems
                .push(("password", "Password must be at least 8 characters"));
        }
        if self.password != self.password_confirm {
            problems.push(("password_confirm", "Passwords do not match"));
        }
        problems
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePassword {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserQuery {
    #[serde(
        rename = "user_type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Filters for the appointment list. Field names follow the backend's
/// query parameter names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppointmentQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    #[serde(
        rename = "date__gte",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_from: Option<Date>,
    #[serde(
        rename = "date__lte",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_to: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physiotherapist: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAppointment {
    pub physiotherapist: UserId,
    /// Required when a physiotherapist or admin books on behalf of a
    /// patient; patients book for themselves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<UserId>,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub appointment_type: AppointmentType,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAppointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CancelAppointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlotQuery {
    pub physiotherapist_id: UserId,
    pub date: Date,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExerciseQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ExerciseCategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExercise {
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub category: ExerciseCategoryId,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub target_body_parts: Vec<String>,
    /// Minutes.
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateExercise {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExercisePlanQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PlanStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExerciseProgressQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_plan_item: Option<PlanItemId>,
    #[serde(
        rename = "date_completed__gte",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub since: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExerciseProgress {
    pub exercise_plan_item: PlanItemId,
    pub date_completed: Date,
    pub completion_status: CompletionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_repetitions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_sets: Option<u32>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<u32>,
    /// 1 (very easy) to 10 (very hard).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_rating: Option<u8>,
    /// 0 (no pain) to 10 (worst).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_level_before: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_level_after: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_type: Option<NotificationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessage {
    pub conversation: ConversationId,
    pub content: String,
}

/// A named shortcut executed by the backend, e.g.
/// `"mark_all_notifications_read"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickAction {
    pub action: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalyticsWindow {
    pub days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityQuery {
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanItemQuery {
    pub exercise_plan: ExercisePlanId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageQuery {
    pub conversation: ConversationId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgressStatsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_plan: Option<ExercisePlanId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> RegisterAccount {
        RegisterAccount {
            username: "pat1".into(),
            email: "pat1@example.com".into(),
            password: "password123".into(),
            password_confirm: "password123".into(),
            first_name: "Pat".into(),
            last_name: "One".into(),
            role: Role::Patient,
            phone_number: None,
        }
    }

    #[test]
    fn valid_account_has_no_problems() {
        assert!(account().validate().is_empty());
    }

    #[test]
    fn mismatched_passwords_are_reported_on_confirm_field() {
        let mut details = account();
        details.password_confirm = "different123".into();
        assert_eq!(
            details.validate(),
            vec![("password_confirm", "Passwords do not match")]
        );
    }

    #[test]
    fn short_username_and_bad_email_reported_together() {
        let mut details = account();
        details.username = "ab".into();
        details.email = "nope".into();
        let fields: Vec<_> =
            details.validate().into_iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["username", "email"]);
    }

    #[test]
    fn role_serializes_as_user_type() {
        let json = serde_json::to_value(account()).unwrap();
        assert_eq!(json["user_type"], "patient");
        assert!(json.get("phone_number").is_none());
    }
}
