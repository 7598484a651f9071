use payloads::{NotificationId, requests, responses};
use yew::prelude::*;

use crate::components::RequireAuth;
use crate::contexts::notifications::use_notifications;
use crate::hooks::use_server_notifications::{
    use_mark_all_notifications_read, use_mark_notification_read,
    use_server_notifications,
};
use crate::hooks::use_title;
use crate::utils::time::{format_timestamp, time_ago};

#[function_component]
pub fn NotificationsPage() -> Html {
    use_title("Notifications");
    let render = Callback::from(|_: responses::UserSummary| {
        html! { <Notifications /> }
    });
    html! { <RequireAuth {render} /> }
}

#[function_component]
fn Notifications() -> Html {
    let unread_only = use_state(|| false);
    let list = use_server_notifications(requests::NotificationQuery {
        is_read: unread_only.then_some(false),
        ..Default::default()
    });
    let mark_read = use_mark_notification_read();
    let mark_all = use_mark_all_notifications_read();
    let toasts = use_notifications();

    let on_mark_read = {
        let mark_read = mark_read.clone();
        let refetch = list.refetch.clone();
        let toasts = toasts.clone();
        Callback::from(move |id: NotificationId| {
            let pending = mark_read.mutate(id);
            let refetch = refetch.clone();
            let toasts = toasts.clone();
            yew::platform::spawn_local(async move {
                match pending.await {
                    Ok(()) => refetch.emit(()),
                    Err(e) => {
                        toasts.error(e.to_string());
                    }
                }
            });
        })
    };

    let on_mark_all = {
        let mark_all = mark_all.clone();
        let refetch = list.refetch.clone();
        Callback::from(move |_: MouseEvent| {
            let pending = mark_all.mutate(());
            let refetch = refetch.clone();
            let toasts = toasts.clone();
            yew::platform::spawn_local(async move {
                match pending.await {
                    Ok(()) => {
                        toasts.success("All notifications marked as read");
                        refetch.emit(());
                    }
                    Err(e) => {
                        toasts.error(e.to_string());
                    }
                }
            });
        })
    };

    let toggle_filter = {
        let unread_only = unread_only.clone();
        Callback::from(move |_: MouseEvent| unread_only.set(!*unread_only))
    };

    let now = jiff::Timestamp::now();
    let busy = mark_read.loading || mark_all.loading;

    html! {
        <div class="max-w-3xl space-y-6">
            <div class="flex justify-between items-center gap-4">
                <h1 class="text-2xl font-bold">{"Notifications"}</h1>
                <div class="flex gap-4">
                    <button onclick={toggle_filter} class="text-sm underline">
                        {if *unread_only { "Show all" } else { "Unread only" }}
                    </button>
                    <button onclick={on_mark_all} disabled={busy} class="text-sm underline disabled:opacity-50">
                        {"Mark all as read"}
                    </button>
                </div>
            </div>

            {list.render("notifications", |items, _| if items.is_empty() {
                html! { <p class="text-neutral-600 dark:text-neutral-400">{"You're all caught up."}</p> }
            } else {
                html! {
                    <ul class="space-y-2">
                        {for items.iter().map(|notification| {
                            let id = notification.id;
                            let onclick = on_mark_read.reform(move |_: MouseEvent| id);
                            html! {
                                <li
                                    key={notification.id.0}
                                    class={classes!(
                                        "p-4", "rounded-lg", "shadow", "flex", "justify-between", "gap-4",
                                        if notification.is_read {
                                            "bg-white dark:bg-neutral-800"
                                        } else {
                                            "bg-blue-50 dark:bg-blue-900/20"
                                        }
                                    )}
                                >
                                    <div>
                                        <p class="font-medium">{&notification.title}</p>
                                        <p class="text-sm text-neutral-600 dark:text-neutral-400">{&notification.message}</p>
                                        <p class="text-xs text-neutral-500" title={format_timestamp(notification.created_at)}>
                                            {time_ago(notification.created_at, now)}
                                        </p>
                                    </div>
                                    if !notification.is_read {
                                        <button {onclick} disabled={busy} class="text-sm underline self-start disabled:opacity-50">
                                            {"Mark read"}
                                        </button>
                                    }
                                </li>
                            }
                        })}
                    </ul>
                }
            })}
        </div>
    }
}
