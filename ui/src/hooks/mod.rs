pub mod use_analytics;
pub mod use_api;
pub mod use_appointments;
pub mod use_exercises;
pub mod use_messages;
pub mod use_mutation;
pub mod use_polling;
pub mod use_push_route;
pub mod use_search;
pub mod use_server_notifications;
pub mod use_session;
pub mod use_title;
pub mod use_users;

pub use use_api::{ApiHandle, ApiOptions, ErrorBanner, HookError, use_api};
pub use use_mutation::{MutationHandle, use_mutation};
pub use use_polling::use_polling;
pub use use_push_route::use_push_route;
pub use use_session::{
    use_login, use_logout, use_register, use_require_auth,
    use_session_bootstrap,
};
pub use use_title::use_title;
