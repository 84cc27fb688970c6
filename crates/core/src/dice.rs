use crate::{RngState, RunError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rolls at or above this count as a success.
pub const SUCCESS_THRESHOLD: u32 = 5;

/// `<count>d<faces>`, e.g. `6d8`. Always has at least one face.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub struct DiceSpec {
    count: u32,
    faces: u32,
}

impl DiceSpec {
    pub fn new(count: u32, faces: u32) -> Result<Self, RunError> {
        if faces == 0 {
            return Err(RunError::invalid("dice", "a die needs at least one face"));
        }
        Ok(Self { count, faces })
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn faces(&self) -> u32 {
        self.faces
    }

    pub fn roll(&self, rng: &mut RngState) -> DiceRoll {
        let mut values: Vec<u32> = (0..self.count).map(|_| rng.roll_die(self.faces)).collect();
        values.sort_unstable_by(|a, b| b.cmp(a));
        let successes = values
            .iter()
            .filter(|value| **value >= SUCCESS_THRESHOLD)
            .count();
        DiceRoll {
            spec: *self,
            values,
            successes,
        }
    }
}

impl FromStr for DiceSpec {
    type Err = RunError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lowered = raw.trim().to_ascii_lowercase();
        let invalid = || RunError::invalid("dice", format!("{raw:?} is not like 1d6 or 5d8"));
        let (count, faces) = lowered.split_once('d').ok_or_else(invalid)?;
        let count = count.parse().map_err(|_| invalid())?;
        let faces = faces.parse().map_err(|_| invalid())?;
        Self::new(count, faces).map_err(|_| invalid())
    }
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.faces)
    }
}

impl TryFrom<String> for DiceSpec {
    type Error = RunError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiceSpec> for String {
    fn from(value: DiceSpec) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiceRoll {
    pub spec: DiceSpec,
    /// Highest first.
    pub values: Vec<u32>,
    pub successes: usize,
}
