//! In-memory state of the stub backend.
//!
//! Every handler locks the whole store for the duration of a request, so the
//! methods here are plain synchronous functions over `&self` / `&mut self`.
//! Visibility follows the role of the caller: patients see their own
//! records, physiotherapists the records they are assigned to, admins see
//! everything.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use jiff::civil::{Date, Time};
use jiff::{Timestamp, Zoned};
use payloads::{
    AppointmentId, AppointmentStatus, AppointmentType, CompletionStatus,
    ConversationId, ExerciseCategoryId, ExerciseId, ExercisePlanId,
    ExerciseProgressId, MessageId, NotificationId, NotificationType,
    PlanItemId, PlanStatus, Role, UserId, requests, responses,
};
use rust_decimal::Decimal;
use uuid::Uuid;

/// First and last bookable hour of a physiotherapist's working day.
const OPENING_HOUR: i8 = 9;
const CLOSING_HOUR: i8 = 17;

pub type FieldMap = BTreeMap<String, Vec<String>>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid token.")]
    InvalidToken,
    #[error("Not found.")]
    NotFound,
    #[error("You do not have permission to perform this action.")]
    PermissionDenied,
    #[error("{0}")]
    Rejected(String),
    #[error("Invalid input")]
    Validation(FieldMap),
}

fn field_error(field: &str, message: &str) -> StoreError {
    let mut fields = FieldMap::new();
    fields.insert(field.to_string(), vec![message.to_string()]);
    StoreError::Validation(fields)
}

pub fn lock(store: &Mutex<Store>) -> MutexGuard<'_, Store> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn today() -> Date {
    Zoned::now().date()
}

/// What a successful login answers with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginReply {
    /// Token and user.
    #[default]
    Full,
    /// Only the token; clients fetch the user separately.
    TokenOnly,
    /// Only a token that no endpoint accepts.
    DeadToken,
}

struct UserRecord {
    user: responses::UserSummary,
    password: String,
    phone_number: Option<String>,
}

struct NotificationRecord {
    recipient: UserId,
    notification: responses::Notification,
}

struct ProgressRecord {
    progress: responses::ExerciseProgress,
    created_at: Timestamp,
}

struct ConversationRecord {
    id: ConversationId,
    participants: Vec<UserId>,
    updated_at: Timestamp,
}

/// A new exercise plan, inserted directly by test setup.
#[derive(Debug, Clone)]
pub struct NewPlan {
    pub name: String,
    pub patient: UserId,
    pub physiotherapist: UserId,
    pub start_date: Date,
    pub status: PlanStatus,
    pub goals: String,
    pub frequency_per_week: u32,
}

/// A new plan item, inserted directly by test setup.
#[derive(Debug, Clone)]
pub struct NewPlanItem {
    pub exercise_plan: ExercisePlanId,
    pub exercise: ExerciseId,
    /// 0 = Monday
    pub day_of_week: u8,
    pub week_number: u32,
    pub order: u32,
}

pub struct Store {
    next_id: i64,
    users: Vec<UserRecord>,
    tokens: HashMap<String, UserId>,
    appointments: Vec<responses::Appointment>,
    categories: Vec<responses::ExerciseCategory>,
    exercises: Vec<responses::Exercise>,
    plans: Vec<responses::ExercisePlan>,
    plan_items: Vec<responses::PlanItem>,
    progress: Vec<ProgressRecord>,
    notifications: Vec<NotificationRecord>,
    conversations: Vec<ConversationRecord>,
    messages: Vec<responses::Message>,
    login_reply: LoginReply,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// An empty store with the default exercise categories.
    pub fn new() -> Self {
        let mut store = Self {
            next_id: 1,
            users: Vec::new(),
            tokens: HashMap::new(),
            appointments: Vec::new(),
            categories: Vec::new(),
            exercises: Vec::new(),
            plans: Vec::new(),
            plan_items: Vec::new(),
            progress: Vec::new(),
            notifications: Vec::new(),
            conversations: Vec::new(),
            messages: Vec::new(),
            login_reply: LoginReply::default(),
        };
        for (name, color) in [
            ("Strength", "#ef4444"),
            ("Flexibility", "#3b82f6"),
            ("Balance", "#10b981"),
            ("Cardio", "#f59e0b"),
        ] {
            let id = ExerciseCategoryId(store.next_id());
            store.categories.push(responses::ExerciseCategory {
                id,
                name: name.to_string(),
                description: None,
                color: Some(color.to_string()),
            });
        }
        store
    }

    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn issue_token(&mut self, user_id: UserId) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.insert(token.clone(), user_id);
        token
    }

    fn user(&self, user_id: &UserId) -> Option<&responses::UserSummary> {
        self.users
            .iter()
            .map(|r| &r.user)
            .find(|u| u.id == *user_id)
    }

    fn display_name(&self, user_id: &UserId) -> Option<String> {
        self.user(user_id).map(responses::UserSummary::display_name)
    }

    fn notify(
        &mut self,
        recipient: UserId,
        notification_type: NotificationType,
        title: &str,
        message: String,
        related: Option<(i64, &str)>,
    ) {
        let id = NotificationId(self.next_id());
        self.notifications.push(NotificationRecord {
            recipient,
            notification: responses::Notification {
                id,
                notification_type,
                title: title.to_string(),
                message,
                is_read: false,
                created_at: Timestamp::now(),
                related_object_id: related.map(|(id, _)| id),
                related_object_type: related.map(|(_, kind)| kind.to_string()),
            },
        });
    }
}

/// Accounts and authentication
impl Store {
    fn insert_user(
        &mut self,
        details: &requests::RegisterAccount,
    ) -> Result<responses::UserSummary, StoreError> {
        let mut fields = FieldMap::new();
        for (field, message) in details.validate() {
            fields
                .entry(field.to_string())
                .or_default()
                .push(message.to_string());
        }
        let username = details.username.trim();
        if self.users.iter().any(|r| r.user.username == username) {
            fields
                .entry("username".into())
                .or_default()
                .push("A user with that username already exists.".into());
        }
        if self
            .users
            .iter()
            .any(|r| r.user.email.eq_ignore_ascii_case(&details.email))
        {
            fields
                .entry("email".into())
                .or_default()
                .push("A user with this email already exists.".into());
        }
        if !fields.is_empty() {
            return Err(StoreError::Validation(fields));
        }

        let user = responses::UserSummary {
            id: UserId(self.next_id()),
            username: username.to_string(),
            email: details.email.clone(),
            first_name: details.first_name.clone(),
            last_name: details.last_name.clone(),
            role: details.role,
            is_active: true,
        };
        self.users.push(UserRecord {
            user: user.clone(),
            password: details.password.clone(),
            phone_number: details.phone_number.clone(),
        });
        Ok(user)
    }

    /// Self-service registration. Admin accounts cannot be self-registered.
    pub fn register(
        &mut self,
        details: &requests::RegisterAccount,
    ) -> Result<(responses::UserSummary, String), StoreError> {
        if details.role == Role::Admin {
            return Err(field_error(
                "user_type",
                "\"admin\" is not a valid choice.",
            ));
        }
        let user = self.insert_user(details)?;
        let token = self.issue_token(user.id);
        Ok((user, token))
    }

    /// Create an account of any role, bypassing the registration rules on
    /// roles.
    pub fn create_account(
        &mut self,
        details: &requests::RegisterAccount,
    ) -> Result<responses::UserSummary, StoreError> {
        self.insert_user(details)
    }

    pub fn set_login_reply(&mut self, reply: LoginReply) {
        self.login_reply = reply;
    }

    /// The user is `None` unless the login reply is [`LoginReply::Full`].
    pub fn login(
        &mut self,
        credentials: &requests::LoginCredentials,
    ) -> Result<(Option<responses::UserSummary>, String), StoreError> {
        let user = self
            .users
            .iter()
            .find(|r| {
                r.user.username == credentials.username
                    && r.password == credentials.password
                    && r.user.is_active
            })
            .map(|r| r.user.clone())
            .ok_or(StoreError::InvalidCredentials)?;
        match self.login_reply {
            LoginReply::Full => {
                let token = self.issue_token(user.id);
                Ok((Some(user), token))
            }
            LoginReply::TokenOnly => Ok((None, self.issue_token(user.id))),
            LoginReply::DeadToken => {
                Ok((None, Uuid::new_v4().simple().to_string()))
            }
        }
    }

    pub fn authenticate(
        &self,
        token: &str,
    ) -> Result<responses::UserSummary, StoreError> {
        let user_id = self.tokens.get(token).ok_or(StoreError::InvalidToken)?;
        match self.user(user_id) {
            Some(user) if user.is_active => Ok(user.clone()),
            _ => Err(StoreError::InvalidToken),
        }
    }

    pub fn logout(&mut self, token: &str) {
        self.tokens.remove(token);
    }

    /// Drop every token, as if the backend had been restarted with a fresh
    /// token table.
    pub fn revoke_all_tokens(&mut self) {
        self.tokens.clear();
    }

    pub fn update_profile(
        &mut self,
        user_id: &UserId,
        details: &requests::UpdateProfile,
    ) -> Result<responses::UserSummary, StoreError> {
        if let Some(email) = &details.email
            && !email.contains('@')
        {
            return Err(field_error("email", "Enter a valid email address."));
        }
        let record = self
            .users
            .iter_mut()
            .find(|r| r.user.id == *user_id)
            .ok_or(StoreError::NotFound)?;
        if let Some(first_name) = &details.first_name {
            record.user.first_name = first_name.clone();
        }
        if let Some(last_name) = &details.last_name {
            record.user.last_name = last_name.clone();
        }
        if let Some(email) = &details.email {
            record.user.email = email.clone();
        }
        if let Some(phone_number) = &details.phone_number {
            record.phone_number = Some(phone_number.clone());
        }
        Ok(record.user.clone())
    }

    pub fn change_password(
        &mut self,
        user_id: &UserId,
        details: &requests::ChangePassword,
    ) -> Result<(), StoreError> {
        let record = self
            .users
            .iter_mut()
            .find(|r| r.user.id == *user_id)
            .ok_or(StoreError::NotFound)?;
        if record.password != details.old_password {
            return Err(field_error("old_password", "Wrong password."));
        }
        if details.new_password.len() < requests::PASSWORD_MIN_LEN {
            return Err(field_error(
                "new_password",
                "This password is too short. It must contain at least 8 characters.",
            ));
        }
        record.password = details.new_password.clone();
        Ok(())
    }
}

/// User management
impl Store {
    pub fn list_users(
        &self,
        caller: &responses::UserSummary,
        query: &requests::UserQuery,
    ) -> Vec<responses::UserSummary> {
        let search = query.search.as_deref().map(str::to_lowercase);
        self.users
            .iter()
            .map(|r| &r.user)
            .filter(|u| {
                caller.role != Role::Patient || u.role == Role::Physiotherapist
            })
            .filter(|u| query.role.is_none_or(|role| u.role == role))
            .filter(|u| query.is_active.is_none_or(|a| u.is_active == a))
            .filter(|u| {
                search.as_deref().is_none_or(|s| user_matches(u, s))
            })
            .cloned()
            .collect()
    }

    pub fn get_user(
        &self,
        caller: &responses::UserSummary,
        user_id: &UserId,
    ) -> Result<responses::UserSummary, StoreError> {
        let user = self.user(user_id).ok_or(StoreError::NotFound)?;
        let visible = caller.role != Role::Patient
            || user.id == caller.id
            || user.role == Role::Physiotherapist;
        if !visible {
            return Err(StoreError::NotFound);
        }
        Ok(user.clone())
    }

    pub fn update_user(
        &mut self,
        caller: &responses::UserSummary,
        user_id: &UserId,
        details: &requests::UpdateUser,
    ) -> Result<responses::UserSummary, StoreError> {
        if caller.role != Role::Admin && caller.id != *user_id {
            return Err(StoreError::PermissionDenied);
        }
        if details.is_active.is_some() && caller.role != Role::Admin {
            return Err(StoreError::PermissionDenied);
        }
        let record = self
            .users
            .iter_mut()
            .find(|r| r.user.id == *user_id)
            .ok_or(StoreError::NotFound)?;
        if let Some(first_name) = &details.first_name {
            record.user.first_name = first_name.clone();
        }
        if let Some(last_name) = &details.last_name {
            record.user.last_name = last_name.clone();
        }
        if let Some(email) = &details.email {
            record.user.email = email.clone();
        }
        if let Some(is_active) = details.is_active {
            record.user.is_active = is_active;
        }
        Ok(record.user.clone())
    }

    pub fn delete_user(
        &mut self,
        caller: &responses::UserSummary,
        user_id: &UserId,
    ) -> Result<(), StoreError> {
        if caller.role != Role::Admin {
            return Err(StoreError::PermissionDenied);
        }
        let before = self.users.len();
        self.users.retain(|r| r.user.id != *user_id);
        if self.users.len() == before {
            return Err(StoreError::NotFound);
        }
        self.tokens.retain(|_, id| id != user_id);
        Ok(())
    }
}

fn user_matches(user: &responses::UserSummary, needle: &str) -> bool {
    [&user.username, &user.first_name, &user.last_name, &user.email]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn can_see_appointment(
    caller: &responses::UserSummary,
    appointment: &responses::Appointment,
) -> bool {
    match caller.role {
        Role::Admin => true,
        Role::Patient => appointment.patient == caller.id,
        Role::Physiotherapist => appointment.physiotherapist == caller.id,
    }
}

fn overlaps(
    appointment: &responses::Appointment,
    start: Time,
    end: Time,
) -> bool {
    appointment.start_time < end && start < appointment.end_time
}

/// Appointments and booking
impl Store {
    fn visible_appointments<'a>(
        &'a self,
        caller: &'a responses::UserSummary,
    ) -> impl Iterator<Item = &'a responses::Appointment> + 'a {
        self.appointments
            .iter()
            .filter(move |a| can_see_appointment(caller, a))
    }

    fn slot_taken(
        &self,
        physiotherapist: &UserId,
        date: Date,
        start: Time,
        end: Time,
        except: Option<AppointmentId>,
    ) -> bool {
        self.appointments.iter().any(|a| {
            a.physiotherapist == *physiotherapist
                && a.date == date
                && a.status != AppointmentStatus::Cancelled
                && Some(a.id) != except
                && overlaps(a, start, end)
        })
    }

    fn appointment_mut(
        &mut self,
        caller: &responses::UserSummary,
        appointment_id: &AppointmentId,
    ) -> Result<&mut responses::Appointment, StoreError> {
        self.appointments
            .iter_mut()
            .find(|a| a.id == *appointment_id && can_see_appointment(caller, a))
            .ok_or(StoreError::NotFound)
    }

    pub fn list_appointments(
        &self,
        caller: &responses::UserSummary,
        query: &requests::AppointmentQuery,
    ) -> Vec<responses::Appointment> {
        let mut appointments: Vec<_> = self
            .visible_appointments(caller)
            .filter(|a| query.status.is_none_or(|s| a.status == s))
            .filter(|a| query.date.is_none_or(|d| a.date == d))
            .filter(|a| query.date_from.is_none_or(|d| a.date >= d))
            .filter(|a| query.date_to.is_none_or(|d| a.date <= d))
            .filter(|a| query.patient.is_none_or(|p| a.patient == p))
            .filter(|a| {
                query.physiotherapist.is_none_or(|p| a.physiotherapist == p)
            })
            .cloned()
            .collect();
        appointments.sort_by(|a, b| {
            (b.date, b.start_time).cmp(&(a.date, a.start_time))
        });
        appointments
    }

    /// Scheduled or confirmed appointments from today onwards, soonest first.
    pub fn upcoming_appointments(
        &self,
        caller: &responses::UserSummary,
    ) -> Vec<responses::Appointment> {
        let today = today();
        let mut appointments: Vec<_> = self
            .visible_appointments(caller)
            .filter(|a| {
                a.date >= today
                    && matches!(
                        a.status,
                        AppointmentStatus::Scheduled
                            | AppointmentStatus::Confirmed
                    )
            })
            .cloned()
            .collect();
        appointments.sort_by_key(|a| (a.date, a.start_time));
        appointments
    }

    pub fn todays_appointments(
        &self,
        caller: &responses::UserSummary,
    ) -> Vec<responses::Appointment> {
        let today = today();
        let mut appointments: Vec<_> = self
            .visible_appointments(caller)
            .filter(|a| a.date == today)
            .cloned()
            .collect();
        appointments.sort_by_key(|a| a.start_time);
        appointments
    }

    pub fn get_appointment(
        &self,
        caller: &responses::UserSummary,
        appointment_id: &AppointmentId,
    ) -> Result<responses::Appointment, StoreError> {
        self.visible_appointments(caller)
            .find(|a| a.id == *appointment_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    pub fn create_appointment(
        &mut self,
        caller: &responses::UserSummary,
        details: &requests::CreateAppointment,
    ) -> Result<responses::Appointment, StoreError> {
        let patient = match caller.role {
            Role::Patient => caller.id,
            _ => details
                .patient
                .ok_or_else(|| field_error("patient", "This field is required."))?,
        };
        if !self.user(&patient).is_some_and(|u| u.role == Role::Patient) {
            return Err(field_error("patient", "Invalid patient."));
        }
        if !self
            .user(&details.physiotherapist)
            .is_some_and(|u| u.role == Role::Physiotherapist && u.is_active)
        {
            return Err(field_error(
                "physiotherapist",
                "Invalid physiotherapist.",
            ));
        }
        if caller.role == Role::Physiotherapist
            && details.physiotherapist != caller.id
        {
            return Err(StoreError::PermissionDenied);
        }
        if details.reason.trim().is_empty() {
            return Err(field_error("reason", "This field may not be blank."));
        }
        if details.date < today() {
            return Err(field_error(
                "date",
                "Appointments cannot be booked in the past.",
            ));
        }
        if details.end_time <= details.start_time {
            return Err(field_error(
                "non_field_errors",
                "End time must be after start time.",
            ));
        }
        if self.slot_taken(
            &details.physiotherapist,
            details.date,
            details.start_time,
            details.end_time,
            None,
        ) {
            return Err(field_error(
                "non_field_errors",
                "This time slot is not available.",
            ));
        }

        let appointment = responses::Appointment {
            id: AppointmentId(self.next_id()),
            patient,
            physiotherapist: details.physiotherapist,
            patient_name: self.display_name(&patient),
            physiotherapist_name: self.display_name(&details.physiotherapist),
            date: details.date,
            start_time: details.start_time,
            end_time: details.end_time,
            status: AppointmentStatus::Scheduled,
            appointment_type: details.appointment_type,
            reason: details.reason.clone(),
            notes: details.symptoms.clone(),
            cost: Some(appointment_cost(details.appointment_type)),
            cancellation_reason: None,
            created_at: Timestamp::now(),
        };
        self.appointments.push(appointment.clone());

        let patient_name = appointment.patient_name.clone().unwrap_or_default();
        self.notify(
            appointment.physiotherapist,
            NotificationType::Appointment,
            "New appointment",
            format!(
                "{patient_name} booked {} on {} at {}",
                appointment.appointment_type.label(),
                appointment.date,
                appointment.start_time.strftime("%H:%M"),
            ),
            Some((appointment.id.0, "appointment")),
        );
        Ok(appointment)
    }

    pub fn update_appointment(
        &mut self,
        caller: &responses::UserSummary,
        appointment_id: &AppointmentId,
        details: &requests::UpdateAppointment,
    ) -> Result<responses::Appointment, StoreError> {
        let current = self.get_appointment(caller, appointment_id)?;
        if details.status.is_some() && caller.role == Role::Patient {
            return Err(StoreError::PermissionDenied);
        }
        let date = details.date.unwrap_or(current.date);
        let start = details.start_time.unwrap_or(current.start_time);
        let end = details.end_time.unwrap_or(current.end_time);
        if end <= start {
            return Err(field_error(
                "non_field_errors",
                "End time must be after start time.",
            ));
        }
        if (date, start, end) != (current.date, current.start_time, current.end_time)
            && self.slot_taken(
                &current.physiotherapist,
                date,
                start,
                end,
                Some(current.id),
            )
        {
            return Err(field_error(
                "non_field_errors",
                "This time slot is not available.",
            ));
        }

        let appointment = self.appointment_mut(caller, appointment_id)?;
        appointment.date = date;
        appointment.start_time = start;
        appointment.end_time = end;
        if let Some(status) = details.status {
            appointment.status = status;
        }
        if let Some(notes) = &details.notes {
            appointment.notes = Some(notes.clone());
        }
        Ok(appointment.clone())
    }

    pub fn cancel_appointment(
        &mut self,
        caller: &responses::UserSummary,
        appointment_id: &AppointmentId,
        reason: Option<String>,
    ) -> Result<responses::Appointment, StoreError> {
        let appointment = self.appointment_mut(caller, appointment_id)?;
        if !appointment.status.is_cancellable() {
            return Err(StoreError::Rejected(
                "Appointment cannot be cancelled".into(),
            ));
        }
        appointment.status = AppointmentStatus::Cancelled;
        appointment.cancellation_reason = reason;
        let appointment = appointment.clone();

        let other = if caller.id == appointment.patient {
            appointment.physiotherapist
        } else {
            appointment.patient
        };
        self.notify(
            other,
            NotificationType::Appointment,
            "Appointment cancelled",
            format!(
                "The appointment on {} at {} was cancelled",
                appointment.date,
                appointment.start_time.strftime("%H:%M"),
            ),
            Some((appointment.id.0, "appointment")),
        );
        Ok(appointment)
    }

    pub fn confirm_appointment(
        &mut self,
        caller: &responses::UserSummary,
        appointment_id: &AppointmentId,
    ) -> Result<responses::Appointment, StoreError> {
        if caller.role == Role::Patient {
            return Err(StoreError::PermissionDenied);
        }
        let appointment = self.appointment_mut(caller, appointment_id)?;
        if appointment.status != AppointmentStatus::Scheduled {
            return Err(StoreError::Rejected(
                "Only scheduled appointments can be confirmed".into(),
            ));
        }
        appointment.status = AppointmentStatus::Confirmed;
        let appointment = appointment.clone();
        self.notify(
            appointment.patient,
            NotificationType::Appointment,
            "Appointment confirmed",
            format!(
                "Your appointment on {} at {} is confirmed",
                appointment.date,
                appointment.start_time.strftime("%H:%M"),
            ),
            Some((appointment.id.0, "appointment")),
        );
        Ok(appointment)
    }

    pub fn complete_appointment(
        &mut self,
        caller: &responses::UserSummary,
        appointment_id: &AppointmentId,
    ) -> Result<responses::Appointment, StoreError> {
        if caller.role == Role::Patient {
            return Err(StoreError::PermissionDenied);
        }
        let appointment = self.appointment_mut(caller, appointment_id)?;
        appointment.status = AppointmentStatus::Completed;
        Ok(appointment.clone())
    }

    /// Hourly slots across the working day, marked unavailable when they
    /// overlap an appointment that is not cancelled.
    pub fn available_time_slots(
        &self,
        query: &requests::TimeSlotQuery,
    ) -> Result<Vec<responses::TimeSlot>, StoreError> {
        if !self
            .user(&query.physiotherapist_id)
            .is_some_and(|u| u.role == Role::Physiotherapist)
        {
            return Err(StoreError::NotFound);
        }
        Ok((OPENING_HOUR..CLOSING_HOUR)
            .map(|hour| {
                let start_time = jiff::civil::time(hour, 0, 0, 0);
                let end_time = jiff::civil::time(hour + 1, 0, 0, 0);
                responses::TimeSlot {
                    start_time,
                    end_time,
                    available: !self.slot_taken(
                        &query.physiotherapist_id,
                        query.date,
                        start_time,
                        end_time,
                        None,
                    ),
                }
            })
            .collect())
    }
}

fn appointment_cost(appointment_type: AppointmentType) -> Decimal {
    match appointment_type {
        AppointmentType::Consultation | AppointmentType::Assessment => {
            Decimal::new(9000, 2)
        }
        AppointmentType::Emergency => Decimal::new(15000, 2),
        _ => Decimal::new(7500, 2),
    }
}

fn requires_staff(caller: &responses::UserSummary) -> Result<(), StoreError> {
    if caller.role == Role::Patient {
        Err(StoreError::PermissionDenied)
    } else {
        Ok(())
    }
}

/// Exercise library
impl Store {
    pub fn exercise_categories(&self) -> Vec<responses::ExerciseCategory> {
        self.categories.clone()
    }

    pub fn list_exercises(
        &self,
        caller: &responses::UserSummary,
        query: &requests::ExerciseQuery,
    ) -> Vec<responses::Exercise> {
        let search = query.search.as_deref().map(str::to_lowercase);
        self.exercises
            .iter()
            .filter(|e| e.is_active || caller.role != Role::Patient)
            .filter(|e| query.category.is_none_or(|c| e.category == c))
            .filter(|e| query.difficulty.is_none_or(|d| e.difficulty == d))
            .filter(|e| {
                search.as_deref().is_none_or(|s| exercise_matches(e, s))
            })
            .cloned()
            .collect()
    }

    pub fn get_exercise(
        &self,
        exercise_id: &ExerciseId,
    ) -> Result<responses::Exercise, StoreError> {
        self.exercises
            .iter()
            .find(|e| e.id == *exercise_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    pub fn create_exercise(
        &mut self,
        caller: &responses::UserSummary,
        details: &requests::NewExercise,
    ) -> Result<responses::Exercise, StoreError> {
        requires_staff(caller)?;
        let mut fields = FieldMap::new();
        if details.name.trim().is_empty() {
            fields.insert("name".into(), vec!["This field may not be blank.".into()]);
        }
        if details.duration == 0 {
            fields.insert(
                "duration".into(),
                vec!["Ensure this value is greater than or equal to 1.".into()],
            );
        }
        let category_name = self
            .categories
            .iter()
            .find(|c| c.id == details.category)
            .map(|c| c.name.clone());
        if category_name.is_none() {
            fields.insert("category".into(), vec!["Invalid category.".into()]);
        }
        if !fields.is_empty() {
            return Err(StoreError::Validation(fields));
        }

        let exercise = responses::Exercise {
            id: ExerciseId(self.next_id()),
            name: details.name.trim().to_string(),
            description: details.description.clone(),
            instructions: details.instructions.clone(),
            category: details.category,
            category_name,
            difficulty: details.difficulty,
            target_body_parts: details.target_body_parts.clone(),
            duration: details.duration,
            repetitions: details.repetitions,
            sets: details.sets,
            equipment_needed: Vec::new(),
            is_active: true,
        };
        self.exercises.push(exercise.clone());
        Ok(exercise)
    }

    pub fn update_exercise(
        &mut self,
        caller: &responses::UserSummary,
        exercise_id: &ExerciseId,
        details: &requests::UpdateExercise,
    ) -> Result<responses::Exercise, StoreError> {
        requires_staff(caller)?;
        let exercise = self
            .exercises
            .iter_mut()
            .find(|e| e.id == *exercise_id)
            .ok_or(StoreError::NotFound)?;
        if let Some(name) = &details.name {
            exercise.name = name.clone();
        }
        if let Some(description) = &details.description {
            exercise.description = description.clone();
        }
        if let Some(instructions) = &details.instructions {
            exercise.instructions = instructions.clone();
        }
        if let Some(difficulty) = details.difficulty {
            exercise.difficulty = difficulty;
        }
        if let Some(duration) = details.duration {
            exercise.duration = duration;
        }
        if let Some(is_active) = details.is_active {
            exercise.is_active = is_active;
        }
        Ok(exercise.clone())
    }

    pub fn delete_exercise(
        &mut self,
        caller: &responses::UserSummary,
        exercise_id: &ExerciseId,
    ) -> Result<(), StoreError> {
        requires_staff(caller)?;
        let before = self.exercises.len();
        self.exercises.retain(|e| e.id != *exercise_id);
        if self.exercises.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

fn exercise_matches(exercise: &responses::Exercise, needle: &str) -> bool {
    exercise.name.to_lowercase().contains(needle)
        || exercise.description.to_lowercase().contains(needle)
        || exercise
            .target_body_parts
            .iter()
            .any(|part| part.to_lowercase().contains(needle))
}

fn can_see_plan(
    caller: &responses::UserSummary,
    plan: &responses::ExercisePlan,
) -> bool {
    match caller.role {
        Role::Admin => true,
        Role::Patient => plan.patient == caller.id,
        Role::Physiotherapist => plan.physiotherapist == caller.id,
    }
}

/// Exercise plans
impl Store {
    pub fn insert_plan(&mut self, details: NewPlan) -> responses::ExercisePlan {
        let plan = responses::ExercisePlan {
            id: ExercisePlanId(self.next_id()),
            name: details.name,
            description: String::new(),
            patient: details.patient,
            physiotherapist: details.physiotherapist,
            start_date: details.start_date,
            end_date: None,
            status: details.status,
            goals: details.goals,
            frequency_per_week: details.frequency_per_week,
        };
        self.plans.push(plan.clone());
        plan
    }

    pub fn insert_plan_item(
        &mut self,
        details: NewPlanItem,
    ) -> Result<responses::PlanItem, StoreError> {
        let exercise_name = self.get_exercise(&details.exercise)?.name;
        let item = responses::PlanItem {
            id: PlanItemId(self.next_id()),
            exercise_plan: details.exercise_plan,
            exercise: details.exercise,
            exercise_name: Some(exercise_name),
            day_of_week: details.day_of_week,
            week_number: details.week_number,
            custom_repetitions: None,
            custom_sets: None,
            custom_duration: None,
            is_mandatory: true,
            order: details.order,
        };
        self.plan_items.push(item.clone());
        Ok(item)
    }

    pub fn list_exercise_plans(
        &self,
        caller: &responses::UserSummary,
        query: &requests::ExercisePlanQuery,
    ) -> Vec<responses::ExercisePlan> {
        self.plans
            .iter()
            .filter(|p| can_see_plan(caller, p))
            .filter(|p| query.status.is_none_or(|s| p.status == s))
            .filter(|p| query.patient.is_none_or(|id| p.patient == id))
            .cloned()
            .collect()
    }

    pub fn active_exercise_plans(
        &self,
        caller: &responses::UserSummary,
    ) -> Vec<responses::ExercisePlan> {
        let query = requests::ExercisePlanQuery {
            status: Some(PlanStatus::Active),
            ..Default::default()
        };
        self.list_exercise_plans(caller, &query)
    }

    pub fn plan_items(
        &self,
        caller: &responses::UserSummary,
        plan_id: &ExercisePlanId,
    ) -> Result<Vec<responses::PlanItem>, StoreError> {
        if !self
            .plans
            .iter()
            .any(|p| p.id == *plan_id && can_see_plan(caller, p))
        {
            return Err(StoreError::NotFound);
        }
        let mut items: Vec<_> = self
            .plan_items
            .iter()
            .filter(|i| i.exercise_plan == *plan_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| (i.week_number, i.day_of_week, i.order));
        Ok(items)
    }

    pub fn set_plan_status(
        &mut self,
        caller: &responses::UserSummary,
        plan_id: &ExercisePlanId,
        status: PlanStatus,
    ) -> Result<responses::ExercisePlan, StoreError> {
        requires_staff(caller)?;
        let plan = self
            .plans
            .iter_mut()
            .find(|p| p.id == *plan_id && can_see_plan(caller, p))
            .ok_or(StoreError::NotFound)?;
        plan.status = status;
        if status == PlanStatus::Completed {
            plan.end_date = Some(today());
        }
        Ok(plan.clone())
    }
}

/// Progress logged against plan items
impl Store {
    fn plan_of_item(&self, item_id: &PlanItemId) -> Option<&responses::ExercisePlan> {
        let item = self.plan_items.iter().find(|i| i.id == *item_id)?;
        self.plans.iter().find(|p| p.id == item.exercise_plan)
    }

    fn visible_progress<'a>(
        &'a self,
        caller: &'a responses::UserSummary,
    ) -> impl Iterator<Item = &'a ProgressRecord> + 'a {
        self.progress.iter().filter(move |r| match caller.role {
            Role::Admin => true,
            Role::Patient => r.progress.patient == caller.id,
            Role::Physiotherapist => self
                .plan_of_item(&r.progress.exercise_plan_item)
                .is_some_and(|p| p.physiotherapist == caller.id),
        })
    }

    pub fn list_exercise_progress(
        &self,
        caller: &responses::UserSummary,
        query: &requests::ExerciseProgressQuery,
    ) -> Vec<responses::ExerciseProgress> {
        let mut progress: Vec<_> = self
            .visible_progress(caller)
            .map(|r| &r.progress)
            .filter(|p| {
                query.exercise_plan_item.is_none_or(|i| p.exercise_plan_item == i)
            })
            .filter(|p| query.since.is_none_or(|d| p.date_completed >= d))
            .cloned()
            .collect();
        progress.sort_by(|a, b| b.date_completed.cmp(&a.date_completed));
        progress
    }

    pub fn create_exercise_progress(
        &mut self,
        caller: &responses::UserSummary,
        details: &requests::NewExerciseProgress,
    ) -> Result<responses::ExerciseProgress, StoreError> {
        if caller.role != Role::Patient {
            return Err(StoreError::PermissionDenied);
        }
        if !self
            .plan_of_item(&details.exercise_plan_item)
            .is_some_and(|p| p.patient == caller.id)
        {
            return Err(field_error("exercise_plan_item", "Invalid plan item."));
        }
        let mut fields = FieldMap::new();
        for (field, value) in [
            ("pain_level_before", details.pain_level_before),
            ("pain_level_after", details.pain_level_after),
        ] {
            if value.is_some_and(|v| v > 10) {
                fields.insert(
                    field.into(),
                    vec!["Ensure this value is less than or equal to 10.".into()],
                );
            }
        }
        if details.difficulty_rating.is_some_and(|v| !(1..=10).contains(&v)) {
            fields.insert(
                "difficulty_rating".into(),
                vec!["Ensure this value is between 1 and 10.".into()],
            );
        }
        if details.date_completed > today() {
            fields.insert(
                "date_completed".into(),
                vec!["Progress cannot be logged for a future date.".into()],
            );
        }
        if !fields.is_empty() {
            return Err(StoreError::Validation(fields));
        }

        let progress = responses::ExerciseProgress {
            id: ExerciseProgressId(self.next_id()),
            patient: caller.id,
            exercise_plan_item: details.exercise_plan_item,
            date_completed: details.date_completed,
            completion_status: details.completion_status,
            completed_repetitions: details.completed_repetitions,
            completed_sets: details.completed_sets,
            actual_duration: details.actual_duration,
            difficulty_rating: details.difficulty_rating,
            pain_level_before: details.pain_level_before,
            pain_level_after: details.pain_level_after,
            notes: details.notes.clone(),
        };
        self.progress.push(ProgressRecord {
            progress: progress.clone(),
            created_at: Timestamp::now(),
        });
        Ok(progress)
    }

    pub fn exercise_progress_stats(
        &self,
        caller: &responses::UserSummary,
        plan_id: Option<ExercisePlanId>,
    ) -> responses::ProgressStats {
        let progress: Vec<_> = self
            .visible_progress(caller)
            .map(|r| &r.progress)
            .filter(|p| {
                plan_id.is_none_or(|id| {
                    self.plan_of_item(&p.exercise_plan_item)
                        .is_some_and(|plan| plan.id == id)
                })
            })
            .collect();
        let total_sessions = progress.len() as u32;
        let completed_sessions = progress
            .iter()
            .filter(|p| p.completion_status == CompletionStatus::Completed)
            .count() as u32;
        let completion_rate = if total_sessions == 0 {
            0.0
        } else {
            f64::from(completed_sessions) * 100.0 / f64::from(total_sessions)
        };
        let reductions: Vec<f64> = progress
            .iter()
            .filter_map(|p| {
                Some(
                    f64::from(p.pain_level_before?)
                        - f64::from(p.pain_level_after?),
                )
            })
            .collect();
        responses::ProgressStats {
            total_sessions,
            completed_sessions,
            completion_rate,
            current_streak: streak(progress.iter().copied()),
            average_pain_reduction: average(&reductions),
        }
    }
}

fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Consecutive days with a completed session, ending today (or yesterday when
/// nothing has been logged yet today).
fn streak<'a>(
    progress: impl Iterator<Item = &'a responses::ExerciseProgress>,
) -> u32 {
    let days: BTreeSet<Date> = progress
        .filter(|p| p.completion_status == CompletionStatus::Completed)
        .map(|p| p.date_completed)
        .collect();
    let mut day = today();
    if !days.contains(&day) {
        match day.yesterday() {
            Ok(yesterday) => day = yesterday,
            Err(_) => return 0,
        }
    }
    let mut count = 0;
    while days.contains(&day) {
        count += 1;
        match day.yesterday() {
            Ok(yesterday) => day = yesterday,
            Err(_) => break,
        }
    }
    count
}

/// Stored notifications
impl Store {
    pub fn list_notifications(
        &self,
        caller: &responses::UserSummary,
        query: &requests::NotificationQuery,
    ) -> Vec<responses::Notification> {
        let mut notifications: Vec<_> = self
            .notifications
            .iter()
            .filter(|r| r.recipient == caller.id)
            .map(|r| &r.notification)
            .filter(|n| query.is_read.is_none_or(|read| n.is_read == read))
            .filter(|n| {
                query.notification_type.is_none_or(|t| n.notification_type == t)
            })
            .cloned()
            .collect();
        notifications.sort_by(|a, b| {
            (b.created_at, b.id).cmp(&(a.created_at, a.id))
        });
        notifications
    }

    pub fn unread_notifications(
        &self,
        caller: &responses::UserSummary,
    ) -> Vec<responses::Notification> {
        let query = requests::NotificationQuery {
            is_read: Some(false),
            ..Default::default()
        };
        self.list_notifications(caller, &query)
    }

    pub fn mark_notification_read(
        &mut self,
        caller: &responses::UserSummary,
        notification_id: &NotificationId,
    ) -> Result<(), StoreError> {
        let record = self
            .notifications
            .iter_mut()
            .find(|r| {
                r.recipient == caller.id && r.notification.id == *notification_id
            })
            .ok_or(StoreError::NotFound)?;
        record.notification.is_read = true;
        Ok(())
    }

    pub fn mark_all_notifications_read(&mut self, caller: &responses::UserSummary) {
        self.notifications
            .iter_mut()
            .filter(|r| r.recipient == caller.id)
            .for_each(|r| r.notification.is_read = true);
    }

    /// Deliver a system notification directly, for test setup.
    pub fn push_notification(
        &mut self,
        recipient: UserId,
        notification_type: NotificationType,
        title: &str,
        message: &str,
    ) {
        self.notify(recipient, notification_type, title, message.to_string(), None);
    }
}

/// Dashboard and analytics
impl Store {
    pub fn dashboard_stats(
        &self,
        caller: &responses::UserSummary,
    ) -> responses::DashboardStats {
        let today = today();
        let total_patients = match caller.role {
            Role::Patient => None,
            Role::Admin => Some(
                self.users
                    .iter()
                    .filter(|r| r.user.role == Role::Patient)
                    .count() as u64,
            ),
            Role::Physiotherapist => Some(
                self.visible_appointments(caller)
                    .map(|a| a.patient)
                    .collect::<BTreeSet<_>>()
                    .len() as u64,
            ),
        };
        let progress: Vec<_> =
            self.visible_progress(caller).map(|r| &r.progress).collect();
        responses::DashboardStats {
            total_patients,
            upcoming_appointments: self.upcoming_appointments(caller).len()
                as u64,
            todays_appointments: self.todays_appointments(caller).len() as u64,
            completed_appointments: self
                .visible_appointments(caller)
                .filter(|a| a.status == AppointmentStatus::Completed)
                .count() as u64,
            active_exercise_plans: self.active_exercise_plans(caller).len()
                as u64,
            completed_exercises_today: progress
                .iter()
                .filter(|p| {
                    p.date_completed == today
                        && p.completion_status == CompletionStatus::Completed
                })
                .count() as u64,
            exercise_streak: if caller.role == Role::Patient {
                u64::from(streak(progress.iter().copied()))
            } else {
                0
            },
            unread_notifications: self.unread_notifications(caller).len()
                as u64,
        }
    }

    pub fn recent_activity(
        &self,
        caller: &responses::UserSummary,
        limit: usize,
    ) -> Vec<responses::ActivityItem> {
        let appointments = self.visible_appointments(caller).map(|a| {
            let with = if caller.id == a.patient {
                a.physiotherapist_name.clone()
            } else {
                a.patient_name.clone()
            };
            responses::ActivityItem {
                kind: "appointment".into(),
                title: format!(
                    "{} with {}",
                    a.appointment_type.label(),
                    with.unwrap_or_default()
                ),
                description: format!(
                    "{} on {} at {}",
                    a.status.label(),
                    a.date,
                    a.start_time.strftime("%H:%M")
                ),
                timestamp: a.created_at,
            }
        });
        let exercises = self.visible_progress(caller).map(|r| {
            let name = self
                .plan_items
                .iter()
                .find(|i| i.id == r.progress.exercise_plan_item)
                .and_then(|i| i.exercise_name.clone())
                .unwrap_or_else(|| "Exercise".into());
            responses::ActivityItem {
                kind: "exercise".into(),
                title: format!("{name} logged"),
                description: format!("{:?}", r.progress.completion_status)
                    .to_lowercase(),
                timestamp: r.created_at,
            }
        });
        let messages = self
            .messages
            .iter()
            .filter(|m| self.is_participant(caller, &m.conversation))
            .map(|m| responses::ActivityItem {
                kind: "message".into(),
                title: format!(
                    "Message from {}",
                    m.sender_name.clone().unwrap_or_default()
                ),
                description: m.content.clone(),
                timestamp: m.created_at,
            });

        let mut activity: Vec<_> =
            appointments.chain(exercises).chain(messages).collect();
        activity.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        activity.truncate(limit);
        activity
    }

    /// Daily session counts and averages over the last `days` days,
    /// including today.
    pub fn exercise_analytics(
        &self,
        caller: &responses::UserSummary,
        days: u32,
    ) -> responses::ExerciseAnalytics {
        let window = window(days);
        let progress: Vec<_> = self
            .visible_progress(caller)
            .map(|r| &r.progress)
            .filter(|p| window.contains(&p.date_completed))
            .collect();
        let total_sessions = progress.len() as u32;
        let completed_sessions = progress
            .iter()
            .filter(|p| p.completion_status == CompletionStatus::Completed)
            .count() as u32;
        let collect = |f: fn(&responses::ExerciseProgress) -> Option<u8>| {
            progress
                .iter()
                .filter_map(|p| f(p).map(f64::from))
                .collect::<Vec<_>>()
        };
        responses::ExerciseAnalytics {
            days: window.len() as u32,
            total_sessions,
            completed_sessions,
            completion_rate: if total_sessions == 0 {
                0.0
            } else {
                f64::from(completed_sessions) * 100.0
                    / f64::from(total_sessions)
            },
            average_difficulty: average(&collect(|p| p.difficulty_rating)),
            average_pain_before: average(&collect(|p| p.pain_level_before)),
            average_pain_after: average(&collect(|p| p.pain_level_after)),
            daily: window
                .iter()
                .map(|day| responses::DailyCount {
                    date: *day,
                    count: progress
                        .iter()
                        .filter(|p| p.date_completed == *day)
                        .count() as u32,
                })
                .collect(),
        }
    }

    pub fn appointment_analytics(
        &self,
        caller: &responses::UserSummary,
        days: u32,
    ) -> responses::AppointmentAnalytics {
        let window = window(days);
        let appointments: Vec<_> = self
            .visible_appointments(caller)
            .filter(|a| window.contains(&a.date))
            .collect();
        let count = |status: AppointmentStatus| {
            appointments.iter().filter(|a| a.status == status).count() as u32
        };
        responses::AppointmentAnalytics {
            days: window.len() as u32,
            total: appointments.len() as u32,
            completed: count(AppointmentStatus::Completed),
            cancelled: count(AppointmentStatus::Cancelled),
            no_show: count(AppointmentStatus::NoShow),
            by_type: AppointmentType::ALL
                .iter()
                .map(|t| responses::TypeCount {
                    appointment_type: *t,
                    count: appointments
                        .iter()
                        .filter(|a| a.appointment_type == *t)
                        .count() as u32,
                })
                .filter(|c| c.count > 0)
                .collect(),
        }
    }

    pub fn search(
        &self,
        caller: &responses::UserSummary,
        query: &str,
    ) -> responses::SearchResults {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return responses::SearchResults::default();
        }
        let users = self.list_users(
            caller,
            &requests::UserQuery {
                search: Some(needle.clone()),
                ..Default::default()
            },
        );
        let appointments = self
            .visible_appointments(caller)
            .filter(|a| {
                a.reason.to_lowercase().contains(&needle)
                    || [&a.patient_name, &a.physiotherapist_name]
                        .iter()
                        .any(|n| {
                            n.as_deref()
                                .is_some_and(|n| n.to_lowercase().contains(&needle))
                        })
            })
            .cloned()
            .collect();
        let exercises = self
            .list_exercises(caller, &requests::ExerciseQuery::default())
            .into_iter()
            .filter(|e| exercise_matches(e, &needle))
            .collect();
        responses::SearchResults {
            users,
            appointments,
            exercises,
        }
    }
}

/// The last `days` days up to and including today, oldest first. The window
/// is at least one day and at most a year.
fn window(days: u32) -> Vec<Date> {
    let days = days.clamp(1, 365);
    let mut dates = Vec::with_capacity(days as usize);
    let mut day = today();
    for _ in 0..days {
        dates.push(day);
        match day.yesterday() {
            Ok(yesterday) => day = yesterday,
            Err(_) => break,
        }
    }
    dates.reverse();
    dates
}

/// Conversations and messages
impl Store {
    fn is_participant(
        &self,
        caller: &responses::UserSummary,
        conversation_id: &ConversationId,
    ) -> bool {
        self.conversations
            .iter()
            .any(|c| c.id == *conversation_id && c.participants.contains(&caller.id))
    }

    pub fn start_conversation(&mut self, participants: Vec<UserId>) -> ConversationId {
        let id = ConversationId(self.next_id());
        self.conversations.push(ConversationRecord {
            id,
            participants,
            updated_at: Timestamp::now(),
        });
        id
    }

    pub fn conversations(
        &self,
        caller: &responses::UserSummary,
    ) -> Vec<responses::Conversation> {
        let mut conversations: Vec<_> = self
            .conversations
            .iter()
            .filter(|c| c.participants.contains(&caller.id))
            .map(|c| {
                let messages: Vec<_> = self
                    .messages
                    .iter()
                    .filter(|m| m.conversation == c.id)
                    .collect();
                responses::Conversation {
                    id: c.id,
                    participants: c.participants.clone(),
                    participant_names: c
                        .participants
                        .iter()
                        .filter_map(|id| self.display_name(id))
                        .collect(),
                    last_message: messages.last().map(|m| (*m).clone()),
                    unread_count: messages
                        .iter()
                        .filter(|m| m.sender != caller.id && !m.is_read)
                        .count() as u32,
                    updated_at: c.updated_at,
                }
            })
            .collect();
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        conversations
    }

    /// Messages in a conversation, oldest first. Reading them marks the other
    /// participants' messages as read.
    pub fn messages(
        &mut self,
        caller: &responses::UserSummary,
        conversation_id: &ConversationId,
    ) -> Result<Vec<responses::Message>, StoreError> {
        if !self.is_participant(caller, conversation_id) {
            return Err(StoreError::NotFound);
        }
        let mut messages = Vec::new();
        for message in self
            .messages
            .iter_mut()
            .filter(|m| m.conversation == *conversation_id)
        {
            if message.sender != caller.id {
                message.is_read = true;
            }
            messages.push(message.clone());
        }
        Ok(messages)
    }

    pub fn send_message(
        &mut self,
        caller: &responses::UserSummary,
        details: &requests::SendMessage,
    ) -> Result<responses::Message, StoreError> {
        if !self.is_participant(caller, &details.conversation) {
            return Err(StoreError::NotFound);
        }
        let content = details.content.trim();
        if content.is_empty() {
            return Err(field_error("content", "This field may not be blank."));
        }
        let now = Timestamp::now();
        let message = responses::Message {
            id: MessageId(self.next_id()),
            conversation: details.conversation,
            sender: caller.id,
            sender_name: Some(caller.display_name()),
            content: content.to_string(),
            is_read: false,
            created_at: now,
        };
        self.messages.push(message.clone());

        let mut recipients = Vec::new();
        if let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == details.conversation)
        {
            conversation.updated_at = now;
            recipients = conversation
                .participants
                .iter()
                .copied()
                .filter(|id| *id != caller.id)
                .collect();
        }
        for recipient in recipients {
            self.notify(
                recipient,
                NotificationType::Message,
                "New message",
                format!("{} sent you a message", caller.display_name()),
                Some((details.conversation.0, "conversation")),
            );
        }
        Ok(message)
    }
}

/// Shortcuts offered on the dashboard.
impl Store {
    pub fn quick_action(
        &mut self,
        caller: &responses::UserSummary,
        action: &requests::QuickAction,
    ) -> Result<responses::QuickActionResult, StoreError> {
        let appointment_id = || {
            action
                .data
                .get("appointment_id")
                .and_then(serde_json::Value::as_i64)
                .map(AppointmentId)
                .ok_or_else(|| {
                    field_error("appointment_id", "This field is required.")
                })
        };
        let message = match action.action.as_str() {
            "mark_all_notifications_read" => {
                self.mark_all_notifications_read(caller);
                "All notifications marked as read"
            }
            "cancel_appointment" => {
                let reason = action
                    .data
                    .get("reason")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string);
                self.cancel_appointment(caller, &appointment_id()?, reason)?;
                "Appointment cancelled successfully"
            }
            "confirm_appointment" => {
                self.confirm_appointment(caller, &appointment_id()?)?;
                "Appointment confirmed successfully"
            }
            other => {
                return Err(StoreError::Rejected(format!(
                    "Unknown action: {other}"
                )));
            }
        };
        Ok(responses::QuickActionResult {
            success: true,
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(username: &str, role: Role) -> requests::RegisterAccount {
        requests::RegisterAccount {
            username: username.into(),
            email: format!("{username}@example.com"),
            password: "password123".into(),
            password_confirm: "password123".into(),
            first_name: username.into(),
            last_name: "Test".into(),
            role,
            phone_number: None,
        }
    }

    #[test]
    fn registration_reports_every_field_problem() {
        let mut store = Store::new();
        store.register(&account("alice", Role::Patient)).unwrap();

        let mut duplicate = account("alice", Role::Patient);
        duplicate.password_confirm = "different".into();
        let Err(StoreError::Validation(fields)) = store.register(&duplicate)
        else {
            panic!("expected validation errors");
        };
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password_confirm"));
    }

    #[test]
    fn booked_slots_are_unavailable() {
        let mut store = Store::new();
        let (patient, _) =
            store.register(&account("pat", Role::Patient)).unwrap();
        let (physio, _) = store
            .register(&account("phys", Role::Physiotherapist))
            .unwrap();
        let tomorrow = today().tomorrow().unwrap();
        let details = requests::CreateAppointment {
            physiotherapist: physio.id,
            patient: None,
            date: tomorrow,
            start_time: jiff::civil::time(10, 0, 0, 0),
            end_time: jiff::civil::time(11, 0, 0, 0),
            appointment_type: AppointmentType::Therapy,
            reason: "Knee pain".into(),
            symptoms: None,
        };
        store.create_appointment(&patient, &details).unwrap();
        assert!(matches!(
            store.create_appointment(&patient, &details),
            Err(StoreError::Validation(_))
        ));

        let slots = store
            .available_time_slots(&requests::TimeSlotQuery {
                physiotherapist_id: physio.id,
                date: tomorrow,
            })
            .unwrap();
        assert_eq!(slots.len(), 8);
        let taken: Vec<_> = slots.iter().filter(|s| !s.available).collect();
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].start_time, jiff::civil::time(10, 0, 0, 0));
    }

    #[test]
    fn window_ends_today_and_is_clamped() {
        let dates = window(7);
        assert_eq!(dates.len(), 7);
        assert_eq!(dates.last(), Some(&today()));
        assert_eq!(window(0).len(), 1);
    }
}
