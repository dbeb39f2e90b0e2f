use std::io::Write;
use std::sync::{Arc, Mutex};

use ask_chat_core::ui_text::{
    BRAND, HINT_BODY, HINT_EXAMPLE, HINT_TITLE, HISTORY_PLACEHOLDER, SENDING_LABEL,
    WEB_HINT_KEYWORDS,
};
use ask_chat_core::{
    AskClient, AskOptions, ChatTurn, Conversation, ConversationEvent, Key, TurnRole,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::errors::AppError;

/// Output shared between the session and the observer that prints turns.
pub type SharedOutput<W> = Arc<Mutex<W>>;

const CONTINUATION_INDENT: &str = "              ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Line-oriented chat front end.
///
/// Every input line is an Enter key press. A line ending in `\` behaves like
/// Shift+Enter: it adds a newline to the pending question instead of sending.
pub struct TerminalSession<C, W> {
    conversation: Conversation,
    client: C,
    out: SharedOutput<W>,
}

impl<C, W> TerminalSession<C, W>
where
    C: AskClient,
    W: Write + Send + 'static,
{
    pub fn new(mut conversation: Conversation, client: C, out: SharedOutput<W>) -> Self {
        let sink = out.clone();
        conversation.subscribe(move |event| {
            if let Ok(mut w) = sink.lock() {
                let _ = render_event(&mut *w, event);
            }
        });
        Self { conversation, client, out }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Reads lines until `/quit` or end of input.
    pub async fn run<R>(&mut self, input: R) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
    {
        self.print_welcome()?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if self.handle_line(&line).await? == Flow::Quit {
                break;
            }
        }
        info!(turns = self.conversation.turns().len(), "chat session ended");
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> Result<Flow, AppError> {
        // Commands are only recognised at the start of a question.
        if self.conversation.pending_input().trim().is_empty() {
            match line.trim() {
                "/quit" | "/exit" => return Ok(Flow::Quit),
                "/new" => {
                    self.conversation.reset_conversation();
                    return Ok(Flow::Continue);
                }
                "/help" => {
                    self.print_hints()?;
                    return Ok(Flow::Continue);
                }
                _ => {}
            }
        }

        let (text, shift_held) = match line.strip_suffix('\\') {
            Some(head) => (format!("{head}\n"), true),
            None => (line.to_string(), false),
        };
        let mut input = self.conversation.pending_input().to_string();
        input.push_str(&text);
        self.conversation.update_input(input);

        let outcome = self.conversation.handle_key_press(Key::Enter, shift_held);
        if let Some(pending) = outcome.into_pending() {
            let outcome = self.client.ask(pending.question(), pending.options()).await;
            self.conversation.finish_submit(pending, outcome);
        } else if !shift_held {
            debug!("nothing to send");
        }
        Ok(Flow::Continue)
    }

    fn print_welcome(&self) -> Result<(), AppError> {
        {
            let mut w = self.lock_out()?;
            writeln!(w, "{BRAND}")?;
            writeln!(w, "{HISTORY_PLACEHOLDER}")?;
        }
        self.print_hints()?;
        let mut w = self.lock_out()?;
        writeln!(w, "Commands: /new  /help  /quit   (end a line with \\ to continue it)")?;
        writeln!(w)?;
        for turn in self.conversation.turns() {
            write_turn(&mut *w, turn)?;
        }
        Ok(())
    }

    fn print_hints(&self) -> Result<(), AppError> {
        let mut w = self.lock_out()?;
        writeln!(w, "{HINT_TITLE} {HINT_BODY}")?;
        writeln!(w, "  {}", WEB_HINT_KEYWORDS.map(|k| format!("[{k}]")).join(" "))?;
        writeln!(w, "  {HINT_EXAMPLE}")?;
        Ok(())
    }

    fn lock_out(&self) -> Result<std::sync::MutexGuard<'_, W>, AppError> {
        self.out
            .lock()
            .map_err(|_| AppError::Io(std::io::Error::other("output lock poisoned")))
    }
}

/// Runs a single question through a fresh conversation.
///
/// Returns the bot turn, or the request failure that produced an error turn.
pub async fn ask_once<C>(client: &C, options: AskOptions, question: &str) -> Result<ChatTurn, AppError>
where
    C: AskClient + ?Sized,
{
    let mut conversation = Conversation::with_options(options);
    conversation.update_input(question);
    let pending = conversation.begin_submit().ok_or(AppError::EmptyQuestion)?;

    let outcome = client.ask(pending.question(), pending.options()).await;
    let failure = outcome.as_ref().err().cloned();
    let turn = conversation.finish_submit(pending, outcome).clone();
    match failure {
        Some(err) => Err(AppError::Ask(err)),
        None => Ok(turn),
    }
}

pub fn render_event(w: &mut impl Write, event: &ConversationEvent) -> std::io::Result<()> {
    match event {
        ConversationEvent::TurnAppended(turn) => write_turn(w, turn),
        ConversationEvent::Reset(turn) => {
            writeln!(w)?;
            writeln!(w, "──────── {} ────────", turn.created_at.format("%H:%M"))?;
            write_turn(w, turn)
        }
        ConversationEvent::SendingChanged(true) => writeln!(w, "{SENDING_LABEL}"),
        ConversationEvent::SendingChanged(false) | ConversationEvent::InputChanged(_) => Ok(()),
    }
}

pub fn write_turn(w: &mut impl Write, turn: &ChatTurn) -> std::io::Result<()> {
    let who = match turn.role {
        TurnRole::User => "you",
        TurnRole::Bot => "bot",
    };
    let mut lines = turn.text.lines();
    let first = lines.next().unwrap_or_default();
    writeln!(w, "[{}] {who}> {first}", turn.created_at.format("%H:%M"))?;
    for line in lines {
        writeln!(w, "{CONTINUATION_INDENT}{line}")?;
    }
    for source in &turn.sources {
        writeln!(w, "{CONTINUATION_INDENT}source: {source}")?;
    }
    Ok(())
}
