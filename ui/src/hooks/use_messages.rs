use payloads::{ClientError, ConversationId, requests, responses};
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::{ApiHandle, ApiOptions, MutationHandle, use_api, use_mutation};

#[hook]
pub fn use_conversations() -> ApiHandle<Vec<responses::Conversation>> {
    use_api((), ApiOptions::default(), |_| async move {
        get_api_client().conversations().await
    })
}

/// Messages of the selected conversation, oldest first. Idle until one is
/// selected.
#[hook]
pub fn use_conversation_messages(
    conversation: Option<ConversationId>,
) -> ApiHandle<Vec<responses::Message>> {
    use_api(
        conversation,
        ApiOptions::when(conversation.is_some()),
        |conversation| async move {
            match conversation {
                Some(id) => get_api_client().messages(&id).await,
                None => Ok(Vec::new()),
            }
        },
    )
}

#[hook]
pub fn use_send_message()
-> MutationHandle<requests::SendMessage, responses::Message, ClientError> {
    use_mutation(|details: requests::SendMessage| async move {
        get_api_client().send_message(&details).await
    })
}

#[hook]
pub fn use_quick_action() -> MutationHandle<
    requests::QuickAction,
    responses::QuickActionResult,
    ClientError,
> {
    use_mutation(|details: requests::QuickAction| async move {
        get_api_client().quick_action(&details).await
    })
}
