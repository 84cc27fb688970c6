use serde::{Deserialize, Serialize};

/// Bounds the command surface puts on caller-supplied arguments. The state
/// transitions themselves accept any value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CommandLimits {
    pub min_alert_delta: i64,
    pub max_alert_delta: i64,
    pub max_boost: u32,
    pub max_dice: u32,
    pub max_die_faces: u32,
}

impl Default for CommandLimits {
    fn default() -> Self {
        Self {
            min_alert_delta: -20,
            max_alert_delta: 20,
            max_boost: 10,
            max_dice: 30,
            max_die_faces: 100,
        }
    }
}

impl CommandLimits {
    pub fn alert_delta_allowed(&self, delta: i64) -> bool {
        (self.min_alert_delta..=self.max_alert_delta).contains(&delta)
    }

    pub fn boost_allowed(&self, amount: u32) -> bool {
        (1..=self.max_boost).contains(&amount)
    }
}
