use ask_chat_core::scroll::{ScrollBehavior, ScrollTarget};
use ask_chat_core::ui_text::{BRAND, INPUT_PLACEHOLDER, send_button_label};
use ask_chat_core::{ChatTurn, ScrollRequest};
use leptos::ev;
use leptos::html;
use leptos::prelude::*;

use crate::components::hint::HintBanner;
use crate::state::AppState;

/// Header, scrolling conversation and input bar.
#[component]
pub fn ChatArea() -> impl IntoView {
    let state = expect_context::<AppState>();
    let chat_ref = NodeRef::<html::Div>::new();

    // Follow the newest turn once the list has re-rendered
    Effect::new(move |_| {
        let Some(request) = state.scroll_request.get() else {
            return;
        };
        request_animation_frame(move || {
            if let Some(el) = chat_ref.get_untracked() {
                scroll_container(&el, request);
            }
        });
    });

    view! {
        <main class="main">
            <div class="header">
                <div class="title">{BRAND}</div>
                <HintBanner />
            </div>

            <div class="chat" node_ref=chat_ref>
                <For
                    each=move || state.turns()
                    key=|turn| turn.id
                    let:turn
                >
                    <TurnBubble turn=turn />
                </For>
            </div>

            <ChatInput />
        </main>
    }
}

fn scroll_container(el: &web_sys::Element, request: ScrollRequest) {
    let options = web_sys::ScrollToOptions::new();
    match request.target {
        ScrollTarget::Bottom => options.set_top(f64::from(el.scroll_height())),
    }
    options.set_behavior(match request.behavior {
        ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
    });
    el.scroll_to_with_scroll_to_options(&options);
}

/// A single chat bubble, with the answer's sources when the backend sent any.
#[component]
fn TurnBubble(turn: ChatTurn) -> impl IntoView {
    let css_class = if turn.is_user() { "msg user" } else { "msg bot" };
    let sources = turn.sources;

    view! {
        <div class=css_class>
            {turn.text}
            {(!sources.is_empty()).then(|| {
                view! {
                    <ul class="sources">
                        {sources.into_iter().map(|s| view! { <li>{s}</li> }).collect_view()}
                    </ul>
                }
            })}
        </div>
    }
}

/// Question input and send button.
#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<AppState>();
    let is_sending = move || state.is_sending();

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if state.handle_key(&ev.key(), ev.shift_key()) {
            ev.prevent_default();
        }
    };

    view! {
        <div class="inputbar">
            <input
                placeholder=INPUT_PLACEHOLDER
                prop:value=move || state.pending_input()
                on:input=move |ev| {
                    state.update_input(event_target_value(&ev));
                }
                on:keydown=on_keydown
            />
            <button on:click=move |_| state.submit() disabled=is_sending>
                {move || send_button_label(is_sending())}
            </button>
        </div>
    }
}
