use log::{debug, warn};
use serde_json::Value;

use crate::client::AskClient;
use crate::errors::AskError;
use crate::events::{ConversationEvent, Observers, SubscriptionId};
use crate::models::{AskOptions, AskResponse, ChatTurn, TurnRole};
use crate::ui_text::{EMPTY_ANSWER_FALLBACK, ERROR_PREFIX, GREETING, NEW_CHAT_GREETING};

/// The one request a conversation has in flight.
///
/// Produced by [`Conversation::begin_submit`] and consumed by
/// [`Conversation::finish_submit`].
#[derive(Debug, PartialEq, Eq)]
pub struct PendingAsk {
    question: String,
    options: AskOptions,
}

impl PendingAsk {
    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &AskOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Self {
        if name == "Enter" {
            Key::Enter
        } else {
            Key::Other
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Let the input handle the key normally.
    PassThrough,
    /// Enter without Shift: the default newline must be suppressed. Carries
    /// the request to dispatch when the submission was accepted.
    Submit(Option<PendingAsk>),
}

impl KeyOutcome {
    pub fn prevent_default(&self) -> bool {
        matches!(self, KeyOutcome::Submit(_))
    }

    pub fn into_pending(self) -> Option<PendingAsk> {
        match self {
            KeyOutcome::Submit(pending) => pending,
            KeyOutcome::PassThrough => None,
        }
    }
}

/// Chat history, the input box value and the in-flight flag for one session.
///
/// Turns are append-only until [`Conversation::reset_conversation`]. At most
/// one request is outstanding; submissions made while it runs are dropped.
#[derive(Debug)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
    pending_input: String,
    sending: bool,
    options: AskOptions,
    next_turn_id: u64,
    observers: Observers,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self::with_options(AskOptions::default())
    }

    /// A conversation whose every question is sent with `options`.
    pub fn with_options(options: AskOptions) -> Self {
        Self {
            turns: vec![ChatTurn::new(0, TurnRole::Bot, GREETING)],
            pending_input: String::new(),
            sending: false,
            options,
            next_turn_id: 1,
            observers: Observers::default(),
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn last_turn(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn options(&self) -> &AskOptions {
        &self.options
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&ConversationEvent) + Send + Sync + 'static,
    {
        self.observers.add(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    /// Stores the input box value as typed. Trimming happens on submit.
    pub fn update_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
        self.observers
            .notify(&ConversationEvent::InputChanged(self.pending_input.clone()));
    }

    /// Discards the history and starts over from the "new chat" greeting.
    /// The input box and any request in flight are left alone.
    pub fn reset_conversation(&mut self) {
        let greeting = ChatTurn::new(self.take_turn_id(), TurnRole::Bot, NEW_CHAT_GREETING);
        self.turns = vec![greeting.clone()];
        debug!("conversation reset");
        self.observers.notify(&ConversationEvent::Reset(greeting));
    }

    /// First half of a submission: clears the input, records the user turn
    /// and marks the conversation as sending.
    ///
    /// Returns `None`, changing nothing, when the trimmed input is empty or a
    /// request is already in flight.
    pub fn begin_submit(&mut self) -> Option<PendingAsk> {
        let question = self.pending_input.trim().to_string();
        if question.is_empty() || self.sending {
            return None;
        }

        self.update_input(String::new());
        self.push_turn(TurnRole::User, question.clone(), Vec::new());
        self.set_sending(true);
        debug!("submitting question ({} chars)", question.len());

        Some(PendingAsk { question, options: self.options.clone() })
    }

    /// Second half of a submission: turns the outcome into a bot turn and
    /// clears the sending flag.
    pub fn finish_submit(&mut self, pending: PendingAsk, outcome: Result<Value, AskError>) -> &ChatTurn {
        let (text, sources) = match outcome {
            Ok(body) => {
                let response = AskResponse::from_value(&body);
                match response.answer_text() {
                    Some(answer) => (answer.to_string(), response.sources.clone()),
                    None => {
                        debug!("empty answer for {:?}, using fallback", pending.question);
                        (EMPTY_ANSWER_FALLBACK.to_string(), response.sources.clone())
                    }
                }
            }
            Err(err) => {
                warn!("ask failed: {err}");
                (format!("{ERROR_PREFIX}{err}"), Vec::new())
            }
        };

        self.push_turn(TurnRole::Bot, text, sources);
        self.set_sending(false);
        &self.turns[self.turns.len() - 1]
    }

    /// Sends the pending input through `client` and records the answer.
    /// Returns false when the submission was declined.
    pub async fn submit<C>(&mut self, client: &C) -> bool
    where
        C: AskClient + ?Sized,
    {
        let Some(pending) = self.begin_submit() else {
            return false;
        };
        let outcome = client.ask(pending.question(), pending.options()).await;
        self.finish_submit(pending, outcome);
        true
    }

    /// Enter without Shift submits; every other key is left to the input.
    pub fn handle_key_press(&mut self, key: Key, shift_held: bool) -> KeyOutcome {
        if key == Key::Enter && !shift_held {
            KeyOutcome::Submit(self.begin_submit())
        } else {
            KeyOutcome::PassThrough
        }
    }

    fn push_turn(&mut self, role: TurnRole, text: String, sources: Vec<String>) {
        let turn = ChatTurn::new(self.take_turn_id(), role, text).with_sources(sources);
        self.turns.push(turn.clone());
        self.observers.notify(&ConversationEvent::TurnAppended(turn));
    }

    fn set_sending(&mut self, sending: bool) {
        if self.sending != sending {
            self.sending = sending;
            self.observers.notify(&ConversationEvent::SendingChanged(sending));
        }
    }

    fn take_turn_id(&mut self) -> u64 {
        let id = self.next_turn_id;
        self.next_turn_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::scroll::{ScrollRequest, Viewport};

    /// Replies with a fixed outcome and records every question it receives.
    struct ScriptedClient {
        reply: Result<Value, AskError>,
        calls: RefCell<Vec<(String, AskOptions)>>,
    }

    impl ScriptedClient {
        fn answering(body: Value) -> Self {
            Self { reply: Ok(body), calls: RefCell::new(Vec::new()) }
        }

        fn failing(err: AskError) -> Self {
            Self { reply: Err(err), calls: RefCell::new(Vec::new()) }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    #[async_trait(?Send)]
    impl AskClient for ScriptedClient {
        async fn ask(&self, question: &str, options: &AskOptions) -> Result<Value, AskError> {
            self.calls
                .borrow_mut()
                .push((question.to_string(), options.clone()));
            self.reply.clone()
        }
    }

    fn texts(conv: &Conversation) -> Vec<(TurnRole, String)> {
        conv.turns().iter().map(|t| (t.role, t.text.clone())).collect()
    }

    #[test]
    fn starts_with_a_single_greeting() {
        let conv = Conversation::new();
        assert_eq!(texts(&conv), vec![(TurnRole::Bot, GREETING.to_string())]);
        assert_eq!(conv.pending_input(), "");
        assert!(!conv.is_sending());
    }

    #[tokio::test]
    async fn submit_appends_user_then_bot_turn() {
        let client = ScriptedClient::answering(json!({ "answer": "Paris" }));
        let mut conv = Conversation::new();
        conv.update_input("  capital of France?  ");

        assert!(conv.submit(&client).await);

        assert_eq!(conv.turns().len(), 3);
        assert_eq!(conv.turns()[1].role, TurnRole::User);
        assert_eq!(conv.turns()[1].text, "capital of France?");
        assert_eq!(conv.turns()[2].role, TurnRole::Bot);
        assert_eq!(conv.turns()[2].text, "Paris");
        assert_eq!(conv.pending_input(), "");
        assert!(!conv.is_sending());
        assert_eq!(client.calls.borrow()[0].0, "capital of France?");
    }

    #[tokio::test]
    async fn blank_input_is_not_submitted() {
        let client = ScriptedClient::answering(json!({ "answer": "x" }));
        let mut conv = Conversation::new();

        for input in ["", "   ", "\n\t"] {
            conv.update_input(input);
            assert!(!conv.submit(&client).await);
            assert_eq!(conv.turns().len(), 1);
            assert_eq!(conv.pending_input(), input);
        }
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn submit_while_sending_is_a_no_op() {
        let client = ScriptedClient::answering(json!({ "answer": "x" }));
        let mut conv = Conversation::new();
        conv.update_input("first");
        let pending = conv.begin_submit().expect("first submission accepted");
        assert!(conv.is_sending());

        conv.update_input("second");
        let turns_before = conv.turns().to_vec();
        assert_eq!(conv.begin_submit(), None);
        assert!(!conv.submit(&client).await);
        assert_eq!(conv.turns(), turns_before.as_slice());
        assert_eq!(conv.pending_input(), "second");
        assert_eq!(client.call_count(), 0);

        conv.finish_submit(pending, Ok(json!({ "answer": "done" })));
        assert!(!conv.is_sending());
        assert!(conv.submit(&client).await);
        assert_eq!(conv.turns().len(), 5);
    }

    #[tokio::test]
    async fn empty_or_missing_answer_uses_fallback() {
        for body in [json!({ "answer": "" }), json!({}), json!({ "answer": "   " })] {
            let client = ScriptedClient::answering(body);
            let mut conv = Conversation::new();
            conv.update_input("anything");
            conv.submit(&client).await;
            assert_eq!(conv.last_turn().unwrap().text, EMPTY_ANSWER_FALLBACK);
        }
    }

    #[tokio::test]
    async fn failure_becomes_an_error_turn() {
        let client = ScriptedClient::failing(AskError::http(500, "boom"));
        let mut conv = Conversation::new();
        conv.update_input("q");
        conv.submit(&client).await;

        let last = conv.last_turn().unwrap();
        assert_eq!(last.role, TurnRole::Bot);
        assert_eq!(last.text, "Error: API 500: boom");
        assert!(!conv.is_sending());

        let client = ScriptedClient::failing(AskError::transport("connection refused"));
        conv.update_input("again");
        conv.submit(&client).await;
        assert_eq!(conv.last_turn().unwrap().text, "Error: connection refused");
        assert_eq!(conv.turns().len(), 5);
    }

    #[tokio::test]
    async fn answer_sources_are_kept_on_the_bot_turn() {
        let client = ScriptedClient::answering(json!({
            "answer": "See the report.",
            "sources": ["https://intranet.example/report"]
        }));
        let mut conv = Conversation::new();
        conv.update_input("where?");
        conv.submit(&client).await;
        assert_eq!(conv.last_turn().unwrap().sources, vec!["https://intranet.example/report"]);
        assert!(conv.turns()[1].sources.is_empty());
    }

    #[tokio::test]
    async fn options_are_forwarded_with_every_question() {
        let options = AskOptions::default()
            .with_web(true)
            .with_web_domains(vec!["support.google.com".into()]);
        let client = ScriptedClient::answering(json!({ "answer": "ok" }));
        let mut conv = Conversation::with_options(options.clone());
        conv.update_input("latest GA4 news");
        conv.submit(&client).await;
        assert_eq!(client.calls.borrow()[0].1, options);
    }

    #[test]
    fn reset_leaves_one_greeting_and_keeps_input_and_sending() {
        let mut conv = Conversation::new();
        conv.update_input("q");
        let pending = conv.begin_submit().unwrap();
        conv.update_input("draft");

        conv.reset_conversation();
        assert_eq!(texts(&conv), vec![(TurnRole::Bot, NEW_CHAT_GREETING.to_string())]);
        assert_eq!(conv.pending_input(), "draft");
        assert!(conv.is_sending());

        conv.finish_submit(pending, Ok(json!({ "answer": "late" })));
        assert_eq!(conv.turns().len(), 2);
        assert!(!conv.is_sending());

        conv.reset_conversation();
        conv.reset_conversation();
        assert_eq!(conv.turns().len(), 1);
    }

    #[test]
    fn turn_ids_keep_increasing_across_resets() {
        let mut conv = Conversation::new();
        conv.update_input("a");
        let pending = conv.begin_submit().unwrap();
        conv.finish_submit(pending, Ok(json!({})));
        let before = conv.last_turn().unwrap().id;
        conv.reset_conversation();
        assert!(conv.turns()[0].id > before);
    }

    #[test]
    fn enter_without_shift_submits_and_suppresses_newline() {
        let mut conv = Conversation::new();
        conv.update_input("hello");

        let outcome = conv.handle_key_press(Key::Enter, true);
        assert_eq!(outcome, KeyOutcome::PassThrough);
        assert!(!outcome.prevent_default());
        assert_eq!(conv.handle_key_press(Key::Other, false), KeyOutcome::PassThrough);
        assert_eq!(conv.turns().len(), 1);

        let outcome = conv.handle_key_press(Key::from_name("Enter"), false);
        assert!(outcome.prevent_default());
        let pending = outcome.into_pending().expect("accepted");
        assert_eq!(pending.question(), "hello");

        // Still sending: Enter is swallowed but nothing is submitted.
        conv.update_input("again");
        let outcome = conv.handle_key_press(Key::Enter, false);
        assert!(outcome.prevent_default());
        assert_eq!(outcome.into_pending(), None);
    }

    #[tokio::test]
    async fn observers_see_mutations_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let client = ScriptedClient::answering(json!({ "answer": "Paris" }));
        let mut conv = Conversation::new();
        let id = conv.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        conv.update_input("q");
        conv.submit(&client).await;

        let events = seen.lock().unwrap().clone();
        assert!(matches!(&events[0], ConversationEvent::InputChanged(s) if s == "q"));
        assert!(matches!(&events[1], ConversationEvent::InputChanged(s) if s.is_empty()));
        assert!(matches!(&events[2], ConversationEvent::TurnAppended(t) if t.is_user()));
        assert_eq!(events[3], ConversationEvent::SendingChanged(true));
        assert!(matches!(&events[4], ConversationEvent::TurnAppended(t) if t.text == "Paris"));
        assert_eq!(events[5], ConversationEvent::SendingChanged(false));
        assert_eq!(events.len(), 6);

        assert!(conv.unsubscribe(id));
        assert!(!conv.unsubscribe(id));
        conv.reset_conversation();
        assert_eq!(seen.lock().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn every_turn_append_scrolls_the_view_to_the_bottom() {
        const ROWS_PER_TURN: u32 = 3;
        let viewport = Arc::new(Mutex::new(Viewport::new(5)));
        let requests = Arc::new(Mutex::new(0usize));

        let mut conv = Conversation::new();
        let (vp, count) = (viewport.clone(), requests.clone());
        conv.subscribe(move |event| {
            let mut vp = vp.lock().unwrap();
            match event {
                ConversationEvent::TurnAppended(_) => vp.grow(ROWS_PER_TURN),
                ConversationEvent::Reset(_) => vp.set_content_height(ROWS_PER_TURN),
                _ => {}
            }
            if let Some(request) = ScrollRequest::for_event(event) {
                vp.apply(request);
                *count.lock().unwrap() += 1;
            }
        });
        viewport.lock().unwrap().grow(ROWS_PER_TURN);

        let client = ScriptedClient::answering(json!({ "answer": "a" }));
        for q in ["one", "two", "three"] {
            conv.update_input(q);
            conv.submit(&client).await;
            let vp = *viewport.lock().unwrap();
            assert!(vp.is_at_bottom());
            assert!(vp.scroll_top > 0);
        }
        assert_eq!(*requests.lock().unwrap(), 6);

        conv.reset_conversation();
        assert!(viewport.lock().unwrap().is_at_bottom());
        assert_eq!(*requests.lock().unwrap(), 7);
    }
}
