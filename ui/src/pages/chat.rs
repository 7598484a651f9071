use payloads::{ConversationId, requests, responses};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::RequireAuth;
use crate::config::config;
use crate::contexts::notifications::use_notifications;
use crate::hooks::use_messages::{
    use_conversation_messages, use_conversations, use_send_message,
};
use crate::hooks::{use_polling, use_title};
use crate::utils::time::format_timestamp;

#[function_component]
pub fn ChatPage() -> Html {
    use_title("Messages");
    let render = Callback::from(|user: responses::UserSummary| {
        html! { <Chat {user} /> }
    });
    html! { <RequireAuth {render} /> }
}

#[derive(Properties, PartialEq)]
struct ChatProps {
    user: responses::UserSummary,
}

#[function_component]
fn Chat(props: &ChatProps) -> Html {
    let selected = use_state(|| None::<ConversationId>);
    let conversations = use_conversations();
    let messages = use_conversation_messages(*selected);
    use_polling(
        messages.refetch.clone(),
        config().ui.analytics_refresh_interval_ms,
        selected.is_some(),
    );

    let on_select = {
        let selected = selected.clone();
        Callback::from(move |id: ConversationId| selected.set(Some(id)))
    };

    let on_sent = {
        let refetch_messages = messages.refetch.clone();
        let refetch_conversations = conversations.refetch.clone();
        Callback::from(move |_: ()| {
            refetch_messages.emit(());
            refetch_conversations.emit(());
        })
    };

    let me = props.user.id;

    html! {
        <div class="grid md:grid-cols-3 gap-6 min-h-[60vh]">
            <aside class="bg-white dark:bg-neutral-800 rounded-lg shadow">
                <h1 class="p-4 text-lg font-semibold border-b border-neutral-200 dark:border-neutral-700">{"Messages"}</h1>
                {conversations.render("conversations", |list, _| if list.is_empty() {
                    html! { <p class="p-4 text-neutral-600 dark:text-neutral-400">{"No conversations yet."}</p> }
                } else {
                    html! {
                        <ul class="divide-y divide-neutral-200 dark:divide-neutral-700">
                            {for list.iter().map(|conversation| {
                                let id = conversation.id;
                                let onclick = on_select.reform(move |_: MouseEvent| id);
                                let active = *selected == Some(id);
                                html! {
                                    <li key={id.0}>
                                        <button
                                            {onclick}
                                            class={classes!(
                                                "w-full", "text-left", "p-4",
                                                active.then_some("bg-neutral-100 dark:bg-neutral-700")
                                            )}
                                        >
                                            <p class="font-medium flex justify-between">
                                                {conversation.participant_names.join(", ")}
                                                if conversation.unread_count > 0 {
                                                    <span class="ml-2 px-2 text-xs rounded-full bg-red-600 text-white">
                                                        {conversation.unread_count}
                                                    </span>
                                                }
                                            </p>
                                            if let Some(last) = &conversation.last_message {
                                                <p class="text-sm text-neutral-600 dark:text-neutral-400 truncate">{&last.content}</p>
                                            }
                                        </button>
                                    </li>
                                }
                            })}
                        </ul>
                    }
                })}
            </aside>

            <section class="md:col-span-2 bg-white dark:bg-neutral-800 rounded-lg shadow flex flex-col">
                if let Some(conversation) = *selected {
                    <div class="flex-1 p-4 space-y-3 overflow-y-auto">
                        {messages.render("messages", |list, _| html! {
                            <>{for list.iter().map(|message| {
                                let mine = message.sender == me;
                                html! {
                                    <div key={message.id.0} class={classes!("flex", if mine { "justify-end" } else { "justify-start" })}>
                                        <div class={classes!(
                                            "max-w-md", "px-3", "py-2", "rounded-lg",
                                            if mine {
                                                "bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900"
                                            } else {
                                                "bg-neutral-100 dark:bg-neutral-700"
                                            }
                                        )}>
                                            if !mine {
                                                <p class="text-xs font-semibold">{message.sender_name.clone().unwrap_or_default()}</p>
                                            }
                                            <p>{&message.content}</p>
                                            <p class="text-xs opacity-70">{format_timestamp(message.created_at)}</p>
                                        </div>
                                    </div>
                                }
                            })}</>
                        })}
                    </div>
                    <MessageComposer {conversation} on_sent={on_sent} />
                } else {
                    <p class="m-auto text-neutral-600 dark:text-neutral-400">{"Select a conversation"}</p>
                }
            </section>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct MessageComposerProps {
    conversation: ConversationId,
    on_sent: Callback<()>,
}

#[function_component]
fn MessageComposer(props: &MessageComposerProps) -> Html {
    let send = use_send_message();
    let notifications = use_notifications();
    let input_ref = use_node_ref();

    let on_submit = {
        let send = send.clone();
        let input_ref = input_ref.clone();
        let conversation = props.conversation;
        let on_sent = props.on_sent.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(input) = input_ref.cast::<HtmlInputElement>() else {
                return;
            };
            let content = input.value();
            if content.trim().is_empty() {
                return;
            }

            let pending =
                send.mutate(requests::SendMessage { conversation, content });
            let notifications = notifications.clone();
            let on_sent = on_sent.clone();
            yew::platform::spawn_local(async move {
                match pending.await {
                    Ok(_) => {
                        input.set_value("");
                        on_sent.emit(());
                    }
                    Err(e) => {
                        notifications.error(e.to_string());
                    }
                }
            });
        })
    };

    html! {
        <form onsubmit={on_submit} class="p-4 border-t border-neutral-200 dark:border-neutral-700 flex gap-2">
            <input
                ref={input_ref}
                type="text"
                placeholder="Write a message"
                class="flex-1 px-3 py-2 border rounded-md bg-white dark:bg-neutral-700"
            />
            <button
                type="submit"
                disabled={send.loading}
                class="px-4 py-2 rounded-md bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900 disabled:opacity-50"
            >
                {"Send"}
            </button>
        </form>
    }
}
