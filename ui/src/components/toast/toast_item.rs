use crate::contexts::notifications::{
    Notification, NotificationKind, use_notifications,
};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ToastItemProps {
    pub notification: Notification,
}

#[function_component]
pub fn ToastItem(props: &ToastItemProps) -> Html {
    let notifications = use_notifications();
    let notification = &props.notification;

    let (bg_class, border_class, text_class, icon) = match notification.kind {
        NotificationKind::Error => (
            "bg-red-50 dark:bg-red-900",
            "border-red-200 dark:border-red-800",
            "text-red-700 dark:text-red-400",
            "✕",
        ),
        NotificationKind::Success => (
            "bg-green-50 dark:bg-green-900",
            "border-green-200 dark:border-green-800",
            "text-green-700 dark:text-green-400",
            "✓",
        ),
        NotificationKind::Warning => (
            "bg-amber-50 dark:bg-amber-900",
            "border-amber-200 dark:border-amber-800",
            "text-amber-800 dark:text-amber-300",
            "!",
        ),
        NotificationKind::Info => (
            "bg-blue-50 dark:bg-blue-900",
            "border-blue-200 dark:border-blue-800",
            "text-blue-700 dark:text-blue-300",
            "ℹ",
        ),
    };

    let on_close = {
        let id = notification.id;
        let notifications = notifications.clone();
        Callback::from(move |_| notifications.remove(id))
    };

    let action = notification.action.as_ref().map(|action| {
        let id = notification.id;
        let on_click = action.on_click.clone();
        let notifications = notifications.clone();
        let onclick = Callback::from(move |_: MouseEvent| {
            on_click.emit(());
            notifications.remove(id);
        });
        html! {
            <button
                {onclick}
                class="mt-2 text-sm font-medium underline hover:no-underline"
            >
                {&action.label}
            </button>
        }
    });

    html! {
        <div
            role="alert"
            class={format!(
                "relative p-4 rounded-lg border shadow-lg transition-all duration-300 ease-out {bg_class} {border_class} {text_class}"
            )}
        >
            <div class="flex items-start space-x-3">
                <div class="flex-shrink-0">
                    <span class="text-sm font-medium">{icon}</span>
                </div>
                <div class="flex-1 min-w-0">
                    if let Some(title) = &notification.title {
                        <p class="text-sm font-semibold leading-5">{title}</p>
                    }
                    <p class="text-sm leading-5">{&notification.message}</p>
                    {action}
                </div>
                <div class="flex-shrink-0">
                    <button
                        onclick={on_close}
                        class="inline-flex text-neutral-400 hover:text-neutral-600 dark:hover:text-neutral-200 focus:outline-none transition-colors"
                        title="Dismiss"
                    >
                        <span class="text-lg leading-none">{"×"}</span>
                    </button>
                </div>
            </div>
        </div>
    }
}
