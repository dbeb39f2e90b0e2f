use ask_chat_core::ui_text::{HINT_BODY, HINT_EXAMPLE, HINT_TITLE, WEB_HINT_KEYWORDS};
use leptos::prelude::*;

/// Sticky note listing the words that make the backend search the web.
/// Informational only; questions are sent unchanged.
#[component]
pub fn HintBanner() -> impl IntoView {
    view! {
        <div class="sticky-note">
            <strong>{HINT_TITLE}</strong>
            " "
            {HINT_BODY}
            <div class="note-keys">
                {WEB_HINT_KEYWORDS
                    .iter()
                    .map(|k| view! { <span class="note-pill">{*k}</span> })
                    .collect_view()}
            </div>
            <div class="small note-example">{HINT_EXAMPLE}</div>
        </div>
    }
}
