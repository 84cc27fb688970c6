use crate::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StrengthSection {
    Alerts,
    Boost,
    Depth,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StrengthLine {
    pub section: StrengthSection,
    pub amount: i64,
    pub bonus: i64,
}

/// Bonus dice for the active card, one line per contributing section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StrengthBreakdown {
    pub card_id: String,
    pub card_name: String,
    pub lines: Vec<StrengthLine>,
    pub total: i64,
}

impl RunState {
    pub fn strength(&self) -> Result<StrengthBreakdown, RunError> {
        let card = self.active_card()?;
        let cursor = self.cursor.ok_or(RunError::NoActiveCard)?;
        let lines = vec![
            StrengthLine {
                section: StrengthSection::Alerts,
                amount: self.alerts,
                bonus: alert_bonus(self.alerts),
            },
            StrengthLine {
                section: StrengthSection::Boost,
                amount: i64::from(card.boost),
                bonus: i64::from(card.boost),
            },
            StrengthLine {
                section: StrengthSection::Depth,
                amount: cursor as i64 + 1,
                bonus: depth_bonus(cursor),
            },
        ];
        Ok(StrengthBreakdown {
            card_id: card.id.clone(),
            card_name: card.display_name.clone(),
            lines,
            total: total_strength_bonus(self.alerts, card.boost, cursor),
        })
    }
}
