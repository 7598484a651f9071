use payloads::{FieldErrors, requests, responses};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::RequireAuth;
use crate::contexts::notifications::use_notifications;
use crate::hooks::use_title;
use crate::hooks::use_users::{use_change_password, use_update_profile};
use crate::session::SessionError;

#[function_component]
pub fn SettingsPage() -> Html {
    use_title("Settings");
    let render = Callback::from(|user: responses::UserSummary| {
        html! {
            <div class="max-w-xl space-y-10">
                <h1 class="text-2xl font-bold">{"Settings"}</h1>
                <ProfileForm {user} />
                <PasswordForm />
            </div>
        }
    });
    html! { <RequireAuth {render} /> }
}

fn value_of(node: &NodeRef) -> String {
    node.cast::<HtmlInputElement>()
        .map(|input| input.value().trim().to_string())
        .unwrap_or_default()
}

fn first_error(errors: &Option<FieldErrors>, field: &str) -> Option<String> {
    errors.as_ref()?.first(field).map(str::to_string)
}

const INPUT_CLASS: &str = "mt-1 w-full px-3 py-2 border border-neutral-300 dark:border-neutral-600 rounded-md bg-white dark:bg-neutral-700";

#[derive(Properties, PartialEq)]
struct ProfileFormProps {
    user: responses::UserSummary,
}

#[function_component]
fn ProfileForm(props: &ProfileFormProps) -> Html {
    let update = use_update_profile();
    let notifications = use_notifications();
    let errors = use_state(|| None::<FieldErrors>);
    let first_name_ref = use_node_ref();
    let last_name_ref = use_node_ref();
    let email_ref = use_node_ref();
    let phone_ref = use_node_ref();

    let on_submit = {
        let update = update.clone();
        let errors = errors.clone();
        let refs = (
            first_name_ref.clone(),
            last_name_ref.clone(),
            email_ref.clone(),
            phone_ref.clone(),
        );
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let (first_name, last_name, email, phone) = &refs;
            let details = requests::UpdateProfile {
                first_name: Some(value_of(first_name)),
                last_name: Some(value_of(last_name)),
                email: Some(value_of(email)),
                phone_number: Some(value_of(phone)).filter(|p| !p.is_empty()),
            };
            let pending = update.mutate(details);
            let errors = errors.clone();
            let notifications = notifications.clone();
            yew::platform::spawn_local(async move {
                match pending.await {
                    Ok(_) => {
                        errors.set(None);
                        notifications.success("Profile updated");
                    }
                    Err(e) => report(&e, &errors, &notifications),
                }
            });
        })
    };

    let user = &props.user;
    let field = |label: &'static str, id: &'static str, node: NodeRef, value: String| {
        html! {
            <label class="block text-sm">
                {label}
                <input ref={node} {id} type="text" value={value} class={INPUT_CLASS} />
                if let Some(error) = first_error(&errors, id) {
                    <span class="text-red-600 dark:text-red-400">{error}</span>
                }
            </label>
        }
    };

    html! {
        <form onsubmit={on_submit} class="space-y-4">
            <h2 class="text-lg font-semibold">{"Profile"}</h2>
            <p class="text-sm text-neutral-600 dark:text-neutral-400">
                {format!("Signed in as {} ({})", user.username, user.role.label())}
            </p>
            {field("First name", "first_name", first_name_ref, user.first_name.clone())}
            {field("Last name", "last_name", last_name_ref, user.last_name.clone())}
            {field("Email", "email", email_ref, user.email.clone())}
            {field("Phone", "phone_number", phone_ref, String::new())}
            <button
                type="submit"
                disabled={update.loading}
                class="px-4 py-2 rounded-md bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900 disabled:opacity-50"
            >
                {if update.loading { "Saving..." } else { "Save profile" }}
            </button>
        </form>
    }
}

fn report(
    e: &SessionError,
    errors: &UseStateHandle<Option<FieldErrors>>,
    notifications: &crate::contexts::notifications::NotificationHandle,
) {
    match e.field_errors() {
        Some(fields) => errors.set(Some(fields.clone())),
        None => {
            notifications.error(e.to_string());
        }
    }
}

#[function_component]
fn PasswordForm() -> Html {
    let change = use_change_password();
    let notifications = use_notifications();
    let errors = use_state(|| None::<FieldErrors>);
    let old_ref = use_node_ref();
    let new_ref = use_node_ref();
    let confirm_ref = use_node_ref();

    let on_submit = {
        let change = change.clone();
        let errors = errors.clone();
        let (old_ref, new_ref, confirm_ref) =
            (old_ref.clone(), new_ref.clone(), confirm_ref.clone());
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let new_password = value_of(&new_ref);
            if new_password != value_of(&confirm_ref) {
                errors.set(Some(
                    [("confirm_password", "Passwords do not match")]
                        .into_iter()
                        .collect(),
                ));
                return;
            }
            let details = requests::ChangePassword {
                old_password: value_of(&old_ref),
                new_password,
            };
            let pending = change.mutate(details);
            let errors = errors.clone();
            let notifications = notifications.clone();
            let inputs = [old_ref.clone(), new_ref.clone(), confirm_ref.clone()];
            yew::platform::spawn_local(async move {
                match pending.await {
                    Ok(()) => {
                        errors.set(None);
                        for node in &inputs {
                            if let Some(input) = node.cast::<HtmlInputElement>() {
                                input.set_value("");
                            }
                        }
                        notifications.success("Password changed");
                    }
                    Err(e) => report(&e, &errors, &notifications),
                }
            });
        })
    };

    let field = |label: &'static str, id: &'static str, node: NodeRef| {
        html! {
            <label class="block text-sm">
                {label}
                <input ref={node} {id} type="password" autocomplete="new-password" class={INPUT_CLASS} />
                if let Some(error) = first_error(&errors, id) {
                    <span class="text-red-600 dark:text-red-400">{error}</span>
                }
            </label>
        }
    };

    html! {
        <form onsubmit={on_submit} class="space-y-4">
            <h2 class="text-lg font-semibold">{"Change password"}</h2>
            {field("Current password", "old_password", old_ref)}
            {field("New password", "new_password", new_ref)}
            {field("Confirm new password", "confirm_password", confirm_ref)}
            <button
                type="submit"
                disabled={change.loading}
                class="px-4 py-2 rounded-md bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900 disabled:opacity-50"
            >
                {if change.loading { "Saving..." } else { "Change password" }}
            </button>
        </form>
    }
}
