use crate::models::ChatTurn;

/// Mutation notifications delivered to subscribed views.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationEvent {
    TurnAppended(ChatTurn),
    /// History was replaced by the carried greeting turn.
    Reset(ChatTurn),
    InputChanged(String),
    SendingChanged(bool),
}

impl ConversationEvent {
    /// True for the events that change the visible turn list.
    pub fn touches_turns(&self) -> bool {
        matches!(self, ConversationEvent::TurnAppended(_) | ConversationEvent::Reset(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Observer = Box<dyn FnMut(&ConversationEvent) + Send + Sync>;

/// Observers in subscription order.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Observer)>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self, event: &ConversationEvent) {
        for (_, observer) in self.entries.iter_mut() {
            observer(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers").field("count", &self.entries.len()).finish()
    }
}
