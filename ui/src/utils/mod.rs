pub mod time;

use crate::config::config;

/// Development builds get the seeded demo credentials on the login form.
pub fn is_dev_mode() -> bool {
    config().development.debug_mode
}

/// Tailwind classes for an appointment status badge.
pub fn status_badge_classes(status: payloads::AppointmentStatus) -> &'static str {
    use payloads::AppointmentStatus::*;
    match status {
        Scheduled | Rescheduled => {
            "bg-blue-100 text-blue-800 dark:bg-blue-900/30 dark:text-blue-300"
        }
        Confirmed => {
            "bg-green-100 text-green-800 dark:bg-green-900/30 dark:text-green-300"
        }
        InProgress => {
            "bg-yellow-100 text-yellow-800 dark:bg-yellow-900/30 dark:text-yellow-300"
        }
        Completed => {
            "bg-neutral-100 text-neutral-800 dark:bg-neutral-800 dark:text-neutral-300"
        }
        Cancelled | NoShow => {
            "bg-red-100 text-red-800 dark:bg-red-900/30 dark:text-red-300"
        }
    }
}
