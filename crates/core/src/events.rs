use crate::{ErrorKind, Placement};
use serde::{Deserialize, Serialize};

/// What a transition did, for the integration layer to turn into replies.
/// Depths are 1-based.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunEvent {
    RunInitiated {
        runner: String,
    },
    RunnerMoved {
        runner: String,
        group: u32,
        from: Option<Placement>,
    },
    DefenderJoined {
        name: String,
        from: Option<Placement>,
    },
    DefenseBegun {
        group: u32,
        runners: Vec<String>,
        alerts: i64,
    },
    AlertsAdded {
        delta: i64,
        total: i64,
    },
    CardRecorded {
        depth: usize,
        card_id: String,
    },
    /// The card already recorded for this depth was kept instead of the one
    /// the caller named.
    CardMismatch {
        depth: usize,
        requested: String,
        recorded: String,
    },
    CardFaced {
        depth: usize,
        card_id: String,
        card_name: String,
    },
    CardBoosted {
        card_id: String,
        card_name: String,
        amount: u32,
        boost: u32,
        cost: u128,
    },
}

impl RunEvent {
    /// Warnings carry the error category they would have been reported
    /// under; ordinary events return `None`.
    pub fn warning_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::CardMismatch { .. } => Some(ErrorKind::StateConflict),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<RunEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: RunEvent) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = RunEvent> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
