use super::ToastItem;
use crate::contexts::notifications::NotificationContext;
use yew::prelude::*;

/// Renders the notification bus in insertion order.
#[function_component]
pub fn ToastContainer() -> Html {
    let Some(context) = use_context::<NotificationContext>() else {
        return html! {};
    };

    if context.items.is_empty() {
        return html! {};
    }

    html! {
        <div class="fixed top-4 right-4 z-50 space-y-3 max-w-sm w-full">
            {for context.items.iter().map(|notification| html! {
                <ToastItem
                    key={notification.id}
                    notification={notification.clone()}
                />
            })}
        </div>
    }
}
