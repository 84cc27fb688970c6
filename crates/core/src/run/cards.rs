use crate::*;
use tracing::warn;

impl RunState {
    pub fn active_card(&self) -> Result<&ProtectionCard, RunError> {
        self.cursor
            .and_then(|cursor| self.cards.get(cursor))
            .ok_or(RunError::NoActiveCard)
    }

    /// Moves to the next depth.
    ///
    /// A card already recorded for that depth always wins; naming a different
    /// one only produces a [`RunEvent::CardMismatch`]. Reaching a new depth
    /// requires a card id from `catalog`. On error the run is left untouched.
    pub fn advance_card(
        &mut self,
        catalog: &CardCatalog,
        card_id: Option<&str>,
        events: &mut EventBus,
    ) -> Result<&ProtectionCard, RunError> {
        let next = self.cursor.map_or(0, |cursor| cursor + 1);
        if let Some(recorded) = self.cards.get(next) {
            if let Some(requested) = card_id.filter(|requested| *requested != recorded.id) {
                warn!(
                    depth = next + 1,
                    requested,
                    recorded = %recorded.id,
                    "card already recorded for this depth"
                );
                events.push(RunEvent::CardMismatch {
                    depth: next + 1,
                    requested: requested.to_string(),
                    recorded: recorded.id.clone(),
                });
            }
        } else {
            let requested = match card_id {
                Some(requested) if next == self.cards.len() => requested,
                _ => return Err(RunError::NoCardForDepth { depth: next + 1 }),
            };
            let name = catalog
                .display_name(requested)
                .ok_or_else(|| RunError::UnknownCard(requested.to_string()))?;
            self.cards.push(ProtectionCard::new(requested, name));
            events.push(RunEvent::CardRecorded {
                depth: next + 1,
                card_id: requested.to_string(),
            });
        }
        self.face(next, events)
    }

    pub fn retreat_card(&mut self, events: &mut EventBus) -> Result<&ProtectionCard, RunError> {
        let previous = match self.cursor {
            Some(cursor) if cursor > 0 && cursor <= self.cards.len() => cursor - 1,
            _ => return Err(RunError::NoPreviousCard),
        };
        self.face(previous, events)
    }

    /// Raises the active card's boost and returns what the defender owes for it.
    pub fn boost_active_card(
        &mut self,
        amount: u32,
        events: &mut EventBus,
    ) -> Result<u128, RunError> {
        let card = self
            .cursor
            .and_then(|cursor| self.cards.get_mut(cursor))
            .ok_or(RunError::NoActiveCard)?;
        let previous = card.boost;
        card.boost = previous
            .checked_add(amount)
            .ok_or_else(|| RunError::invalid("boost", "boost would overflow"))?;
        let cost = boost_cost(previous, amount);
        events.push(RunEvent::CardBoosted {
            card_id: card.id.clone(),
            card_name: card.display_name.clone(),
            amount,
            boost: card.boost,
            cost,
        });
        Ok(cost)
    }

    fn face(&mut self, index: usize, events: &mut EventBus) -> Result<&ProtectionCard, RunError> {
        let card = self.cards.get(index).ok_or(RunError::NoActiveCard)?;
        events.push(RunEvent::CardFaced {
            depth: index + 1,
            card_id: card.id.clone(),
            card_name: card.display_name.clone(),
        });
        self.cursor = Some(index);
        Ok(card)
    }
}
