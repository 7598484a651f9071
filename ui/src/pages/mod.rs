pub mod analytics;
pub mod appointments;
pub mod booking;
pub mod chat;
pub mod dashboard;
pub mod exercises;
pub mod login;
pub mod not_found;
pub mod notifications;
pub mod register;
pub mod settings;

pub use analytics::AnalyticsPage;
pub use appointments::AppointmentsPage;
pub use booking::BookingPage;
pub use chat::ChatPage;
pub use dashboard::DashboardPage;
pub use exercises::ExercisesPage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use notifications::NotificationsPage;
pub use register::RegisterPage;
pub use settings::SettingsPage;
