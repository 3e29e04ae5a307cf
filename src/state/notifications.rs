use super::card::Card;
use crate::constants::*;
use editor_notifications_util::NotificationId;
use std::collections::VecDeque;

/// Cards of the popup area
///
/// Attached cards are on screen in arrival order. Detached cards left the
/// popup area but are kept so the log can bring them back; the newest
/// detached card is at the front and the queue is capped.
#[derive(Debug)]
pub struct NotificationState {
    cards: Vec<Card>,
    detached: VecDeque<Card>,
}

impl NotificationState {
    pub fn new() -> Self {
        Self {
            cards: Vec::with_capacity(INITIAL_CARDS_CAPACITY),
            detached: VecDeque::new(),
        }
    }

    /// Cards currently in the popup area
    pub fn visible(&self) -> &[Card] {
        &self.cards
    }

    pub fn detached(&self) -> &VecDeque<Card> {
        &self.detached
    }

    /// Append a card to the popup area
    pub fn attach(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Keep a card that never reached the popup area
    pub fn attach_hidden(&mut self, card: Card) {
        self.detached.push_front(card);
        self.detached.truncate(MAX_DETACHED_CARDS);
    }

    pub fn get(&self, id: NotificationId) -> Option<&Card> {
        self.cards
            .iter()
            .find(|c| c.id() == id)
            .or_else(|| self.detached.iter().find(|c| c.id() == id))
    }

    pub fn get_mut(&mut self, id: NotificationId) -> Option<&mut Card> {
        match self.cards.iter().position(|c| c.id() == id) {
            Some(pos) => self.cards.get_mut(pos),
            None => self.detached.iter_mut().find(|c| c.id() == id),
        }
    }

    pub fn is_attached(&self, id: NotificationId) -> bool {
        self.cards.iter().any(|c| c.id() == id)
    }

    /// Move a card out of the popup area
    pub fn detach(&mut self, id: NotificationId) {
        let Some(pos) = self.cards.iter().position(|c| c.id() == id) else {
            return;
        };

        let card = self.cards.remove(pos);
        self.attach_hidden(card);
        self.shrink_visible();
    }

    /// Move a detached card back to the end of the popup area
    pub fn reattach(&mut self, id: NotificationId) -> bool {
        let Some(pos) = self.detached.iter().position(|c| c.id() == id) else {
            return false;
        };
        match self.detached.remove(pos) {
            Some(card) => {
                self.cards.push(card);
                true
            }
            None => false,
        }
    }

    /// Every card, attached first
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Card> {
        self.cards.iter_mut().chain(self.detached.iter_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.cards.len()
    }

    fn shrink_visible(&mut self) {
        if self.cards.is_empty() {
            self.cards.shrink_to(INITIAL_CARDS_CAPACITY);
        }
    }

    /// Forget every card
    pub fn clear(&mut self) {
        self.cards.clear();
        self.detached.clear();
        self.shrink_visible();
    }
}

impl Default for NotificationState {
    fn default() -> Self {
        Self::new()
    }
}
