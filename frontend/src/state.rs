use ask_chat_core::{AskClient, ChatTurn, Conversation, Key, PendingAsk, ScrollRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiClient;

/// Shared application state, provided via Leptos context.
#[derive(Clone, Copy)]
pub struct AppState {
    pub conversation: RwSignal<Conversation>,
    /// Last scroll the chat container should perform; set on every turn change.
    pub scroll_request: RwSignal<Option<ScrollRequest>>,
    client: StoredValue<ApiClient>,
}

impl AppState {
    /// Create a new `AppState` and provide it in the current Leptos context.
    pub fn provide() -> Self {
        let scroll_request = RwSignal::new(None::<ScrollRequest>);

        let mut conversation = Conversation::new();
        conversation.subscribe(move |event| {
            if let Some(request) = ScrollRequest::for_event(event) {
                scroll_request.set(Some(request));
            }
        });

        let state = Self {
            conversation: RwSignal::new(conversation),
            scroll_request,
            client: StoredValue::new(ApiClient::from_build_env()),
        };

        provide_context(state);
        state
    }

    pub fn turns(&self) -> Vec<ChatTurn> {
        self.conversation.with(|c| c.turns().to_vec())
    }

    pub fn pending_input(&self) -> String {
        self.conversation.with(|c| c.pending_input().to_string())
    }

    pub fn is_sending(&self) -> bool {
        self.conversation.with(|c| c.is_sending())
    }

    pub fn update_input(&self, text: String) {
        self.conversation.update(|c| c.update_input(text));
    }

    pub fn reset(&self) {
        self.conversation.update(|c| c.reset_conversation());
    }

    /// Send button.
    pub fn submit(&self) {
        if let Some(pending) = self.conversation.try_update(|c| c.begin_submit()).flatten() {
            self.dispatch(pending);
        }
    }

    /// Returns true when the key's default action must be suppressed.
    pub fn handle_key(&self, key: &str, shift_held: bool) -> bool {
        let key = Key::from_name(key);
        // Other keys never touch the conversation; skip the signal write.
        if key != Key::Enter {
            return false;
        }

        let Some(outcome) = self.conversation.try_update(|c| c.handle_key_press(key, shift_held)) else {
            return false;
        };
        let prevent = outcome.prevent_default();
        if let Some(pending) = outcome.into_pending() {
            self.dispatch(pending);
        }
        prevent
    }

    /// Runs the request off the event handler and records its outcome.
    fn dispatch(&self, pending: PendingAsk) {
        let conversation = self.conversation;
        let client = self.client.get_value();

        spawn_local(async move {
            let outcome = client.ask(pending.question(), pending.options()).await;
            if let Err(e) = &outcome {
                log::error!("Ask request failed: {e}");
            }
            conversation.update(|c| {
                c.finish_submit(pending, outcome);
            });
        });
    }
}
