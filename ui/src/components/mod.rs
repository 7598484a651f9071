pub mod appointment_list;
pub mod global_search;
pub mod layout;
pub mod login_form;
pub mod require_auth;
pub mod slot_picker;
pub mod toast;

pub use appointment_list::AppointmentList;
pub use global_search::GlobalSearch;
pub use layout::MainLayout;
pub use login_form::LoginForm;
pub use require_auth::RequireAuth;
pub use slot_picker::SlotPicker;
pub use toast::ToastContainer;
