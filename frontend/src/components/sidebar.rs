use ask_chat_core::ui_text::{BRAND, HISTORY_PLACEHOLDER, HISTORY_TITLE, NEW_CHAT_LABEL};
use leptos::prelude::*;

use crate::state::AppState;

/// Sidebar with the brand and the "New Chat" button.
#[component]
pub fn Sidebar() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <aside class="sidebar">
            <div class="brand">
                <div class="brand-badge">"A"</div>
                <h1>{BRAND}</h1>
            </div>

            <button class="new-chat" on:click=move |_| state.reset()>
                {NEW_CHAT_LABEL}
            </button>

            // History is not kept between sessions yet
            <div class="history-title">{HISTORY_TITLE}</div>
            <div class="history small">{HISTORY_PLACEHOLDER}</div>
        </aside>
    }
}
