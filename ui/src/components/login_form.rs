use payloads::{FieldErrors, Role, requests, responses};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::hooks::{use_login, use_register};
use crate::session::SessionError;

#[derive(Clone, Copy, PartialEq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Properties, PartialEq)]
pub struct LoginFormProps {
    pub title: AttrValue,
    pub description: AttrValue,
    pub submit_text: AttrValue,
    pub mode: AuthMode,
    /// Receives the signed in user, or None when registration succeeded
    /// without signing in.
    pub on_success: Callback<Option<responses::UserSummary>>,
    #[prop_or_default]
    pub show_dev_credentials: bool,
}

const INPUT_CLASS: &str = "w-full px-3 py-2 border border-neutral-300 dark:border-neutral-600
    rounded-md shadow-sm bg-white dark:bg-neutral-700
    text-neutral-900 dark:text-neutral-100
    focus:outline-none focus:ring-2 focus:ring-neutral-500 focus:border-neutral-500
    dark:focus:ring-neutral-400 dark:focus:border-neutral-400";

fn input_value(node: &NodeRef) -> String {
    node.cast::<HtmlInputElement>()
        .map(|input| input.value())
        .unwrap_or_default()
}

fn optional(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

#[derive(Properties, PartialEq)]
struct FieldProps {
    id: AttrValue,
    label: AttrValue,
    node: NodeRef,
    #[prop_or("text".into())]
    input_type: AttrValue,
    #[prop_or_default]
    autocomplete: Option<AttrValue>,
    #[prop_or_default]
    placeholder: Option<AttrValue>,
    #[prop_or(true)]
    required: bool,
    #[prop_or_default]
    error: Option<AttrValue>,
}

#[function_component]
fn Field(props: &FieldProps) -> Html {
    html! {
        <div>
            <label for={&props.id} class="block text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-2">
                {&props.label}
            </label>
            <input
                ref={props.node.clone()}
                type={&props.input_type}
                id={&props.id}
                name={&props.id}
                autocomplete={props.autocomplete.clone()}
                placeholder={props.placeholder.clone()}
                required={props.required}
                class={INPUT_CLASS}
            />
            if let Some(error) = &props.error {
                <p class="mt-1 text-sm text-red-600 dark:text-red-400">{error}</p>
            }
        </div>
    }
}

#[function_component]
pub fn LoginForm(props: &LoginFormProps) -> Html {
    let login = use_login();
    let register = use_register();

    let username_ref = use_node_ref();
    let password_ref = use_node_ref();
    let password_confirm_ref = use_node_ref();
    let email_ref = use_node_ref();
    let first_name_ref = use_node_ref();
    let last_name_ref = use_node_ref();
    let phone_ref = use_node_ref();
    let role_ref = use_node_ref();

    let error_message = use_state(|| None::<String>);
    let field_errors = use_state(FieldErrors::default);
    let is_loading = use_state(|| false);

    // shown next to the form, or per field when the backend names one
    let report = {
        let error_message = error_message.clone();
        let field_errors = field_errors.clone();
        Callback::from(move |e: SessionError| match e.field_errors() {
            Some(fields) => {
                error_message
                    .set(fields.first(FieldErrors::NON_FIELD).map(str::to_string));
                field_errors.set(fields.clone());
            }
            None => {
                error_message.set(Some(e.to_string()));
                field_errors.set(FieldErrors::default());
            }
        })
    };

    let on_submit = {
        let error_message = error_message.clone();
        let field_errors = field_errors.clone();
        let is_loading = is_loading.clone();
        let mode = props.mode;
        let on_success = props.on_success.clone();
        let username_ref = username_ref.clone();
        let password_ref = password_ref.clone();
        let password_confirm_ref = password_confirm_ref.clone();
        let email_ref = email_ref.clone();
        let first_name_ref = first_name_ref.clone();
        let last_name_ref = last_name_ref.clone();
        let phone_ref = phone_ref.clone();
        let role_ref = role_ref.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let username = input_value(&username_ref).trim().to_string();
            let password = input_value(&password_ref);
            if username.is_empty() || password.is_empty() {
                error_message.set(Some(
                    "Please enter both username and password".to_string(),
                ));
                return;
            }

            error_message.set(None);
            field_errors.set(FieldErrors::default());
            is_loading.set(true);

            let is_loading = is_loading.clone();
            let on_success = on_success.clone();
            let report = report.clone();

            match mode {
                AuthMode::Login => {
                    let pending =
                        login.emit(requests::LoginCredentials { username, password });
                    yew::platform::spawn_local(async move {
                        match pending.await {
                            Ok(user) => on_success.emit(Some(user)),
                            Err(e) => report.emit(e),
                        }
                        is_loading.set(false);
                    });
                }
                AuthMode::Register => {
                    let role = role_ref
                        .cast::<HtmlSelectElement>()
                        .map(|select| select.value())
                        .and_then(|value| {
                            serde_json::from_value(value.into()).ok()
                        })
                        .unwrap_or(Role::Patient);
                    let details = requests::RegisterAccount {
                        username,
                        email: input_value(&email_ref).trim().to_string(),
                        password,
                        password_confirm: input_value(&password_confirm_ref),
                        first_name: input_value(&first_name_ref).trim().to_string(),
                        last_name: input_value(&last_name_ref).trim().to_string(),
                        role,
                        phone_number: optional(input_value(&phone_ref)),
                    };
                    let pending = register.emit(details);
                    yew::platform::spawn_local(async move {
                        match pending.await {
                            Ok(user) => on_success.emit(user),
                            Err(e) => report.emit(e),
                        }
                        is_loading.set(false);
                    });
                }
            }
        })
    };

    let error_for = |field: &str| -> Option<AttrValue> {
        field_errors
            .first(field)
            .map(|message| AttrValue::from(message.to_string()))
    };
    let registering = props.mode == AuthMode::Register;

    html! {
        <div class="max-w-md w-full bg-white dark:bg-neutral-800 p-8 rounded-lg shadow-md">
            <div class="mb-8 text-center">
                <h1 class="text-2xl font-bold text-neutral-900 dark:text-neutral-100 mb-2">
                    {&props.title}
                </h1>
                <p class="text-neutral-600 dark:text-neutral-400">
                    {&props.description}
                </p>
            </div>

            <form onsubmit={on_submit} class="space-y-6" novalidate={true}>
                if let Some(error) = &*error_message {
                    <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800">
                        <p class="text-sm text-red-700 dark:text-red-400">{error}</p>
                    </div>
                }

                if registering {
                    <div class="grid grid-cols-2 gap-4">
                        <Field
                            id="first_name"
                            label="First name"
                            node={first_name_ref}
                            autocomplete="given-name"
                            error={error_for("first_name")}
                        />
                        <Field
                            id="last_name"
                            label="Last name"
                            node={last_name_ref}
                            autocomplete="family-name"
                            error={error_for("last_name")}
                        />
                    </div>
                    <Field
                        id="email"
                        label="Email"
                        node={email_ref}
                        input_type="email"
                        autocomplete="email"
                        placeholder="Enter your email"
                        error={error_for("email")}
                    />
                }

                <Field
                    id="username"
                    label="Username"
                    node={username_ref}
                    autocomplete="username"
                    placeholder="Enter your username"
                    error={error_for("username")}
                />

                if registering {
                    <div>
                        <label for="user_type" class="block text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-2">
                            {"I am a"}
                        </label>
                        <select ref={role_ref} id="user_type" name="user_type" class={INPUT_CLASS}>
                            <option value="patient" selected={true}>{Role::Patient.label()}</option>
                            <option value="physiotherapist">{Role::Physiotherapist.label()}</option>
                        </select>
                    </div>
                    <Field
                        id="phone_number"
                        label="Phone (optional)"
                        node={phone_ref}
                        input_type="tel"
                        autocomplete="tel"
                        required={false}
                        error={error_for("phone_number")}
                    />
                }

                <Field
                    id="password"
                    label="Password"
                    node={password_ref}
                    input_type="password"
                    autocomplete={if registering { "new-password" } else { "current-password" }}
                    placeholder={if registering { "Choose a password" } else { "Enter your password" }}
                    error={error_for("password")}
                />

                if registering {
                    <Field
                        id="password_confirm"
                        label="Confirm password"
                        node={password_confirm_ref}
                        input_type="password"
                        autocomplete="new-password"
                        placeholder="Confirm your password"
                        error={error_for("password_confirm")}
                    />
                }

                <button
                    type="submit"
                    disabled={*is_loading}
                    class="w-full flex justify-center py-2 px-4 border border-transparent
                           rounded-md shadow-sm text-sm font-medium text-white
                           bg-neutral-900 hover:bg-neutral-800
                           dark:bg-neutral-100 dark:text-neutral-900 dark:hover:bg-neutral-200
                           focus:outline-none focus:ring-2 focus:ring-offset-2 focus:ring-neutral-500
                           disabled:opacity-50 disabled:cursor-not-allowed
                           transition-colors duration-200"
                >
                    if *is_loading {
                        {match props.mode {
                            AuthMode::Login => "Signing in...",
                            AuthMode::Register => "Creating account...",
                        }}
                    } else {
                        {&props.submit_text}
                    }
                </button>
            </form>

            if props.show_dev_credentials && !registering {
                <div class="mt-6 text-center">
                    <p class="text-sm text-neutral-600 dark:text-neutral-400">
                        {"Development credentials: alice / password123"}
                    </p>
                </div>
            }
        </div>
    }
}
