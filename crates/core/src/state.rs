use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub number: u32,
    /// Join order.
    pub members: Vec<String>,
}

impl Group {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            members: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|member| member == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProtectionCard {
    pub id: String,
    /// Resolved from the catalog when the card is first recorded.
    pub display_name: String,
    pub boost: u32,
}

impl ProtectionCard {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            boost: 0,
        }
    }
}

/// Where a participant currently sits in a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Placement {
    Group(u32),
    Defender,
}

/// One facility run.
///
/// A name is in at most one group or in the defenders list, never both.
/// `cursor` is `None` before the first card is faced and otherwise indexes
/// `cards`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Sorted ascending by number. May hold empty groups.
    pub groups: Vec<Group>,
    pub defenders: Vec<String>,
    pub alerts: i64,
    pub active_group: Option<u32>,
    pub cards: Vec<ProtectionCard>,
    pub cursor: Option<usize>,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            groups: vec![Group::new(1)],
            defenders: Vec::new(),
            alerts: 0,
            active_group: None,
            cards: Vec::new(),
            cursor: None,
        }
    }

    /// Fresh run with `runner` as the only member of group 1.
    pub fn initiate(runner: &str) -> Self {
        let mut state = Self::new();
        state.move_to_group(runner, 1);
        state
    }

    pub fn group(&self, number: u32) -> Option<&Group> {
        self.groups.iter().find(|group| group.number == number)
    }

    /// Like [`RunState::group`], but an empty group does not count. Empty
    /// groups are never encoded, so they do not survive a round trip.
    pub fn occupied_group(&self, number: u32) -> Option<&Group> {
        self.group(number).filter(|group| !group.is_empty())
    }

    /// Groups with at least one member, ascending by number.
    pub fn occupied_groups(&self) -> impl Iterator<Item = &Group> + '_ {
        self.groups.iter().filter(|group| !group.is_empty())
    }

    pub fn placement(&self, name: &str) -> Option<Placement> {
        if let Some(group) = self.groups.iter().find(|group| group.contains(name)) {
            return Some(Placement::Group(group.number));
        }
        if self.defenders.iter().any(|defender| defender == name) {
            return Some(Placement::Defender);
        }
        None
    }

    pub fn participant_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum::<usize>() + self.defenders.len()
    }

    /// Drops `name` from its group or the defenders list, if it is anywhere.
    pub fn remove_participant(&mut self, name: &str) -> Option<Placement> {
        for group in &mut self.groups {
            if let Some(index) = group.members.iter().position(|member| member == name) {
                group.members.remove(index);
                return Some(Placement::Group(group.number));
            }
        }
        let index = self.defenders.iter().position(|defender| defender == name)?;
        self.defenders.remove(index);
        Some(Placement::Defender)
    }

    pub fn move_to_group(&mut self, name: &str, number: u32) -> Option<Placement> {
        let previous = self.remove_participant(name);
        self.group_entry(number).members.push(name.to_string());
        previous
    }

    pub fn move_to_defenders(&mut self, name: &str) -> Option<Placement> {
        let previous = self.remove_participant(name);
        self.defenders.push(name.to_string());
        previous
    }

    pub(crate) fn group_entry(&mut self, number: u32) -> &mut Group {
        let index = match self.groups.binary_search_by_key(&number, |group| group.number) {
            Ok(index) => index,
            Err(index) => {
                self.groups.insert(index, Group::new(number));
                index
            }
        };
        &mut self.groups[index]
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// Empty groups are not part of a run's observable state, so they are
/// skipped when comparing.
impl PartialEq for RunState {
    fn eq(&self, other: &Self) -> bool {
        self.occupied_groups().eq(other.occupied_groups())
            && self.defenders == other.defenders
            && self.alerts == other.alerts
            && self.active_group == other.active_group
            && self.cards == other.cards
            && self.cursor == other.cursor
    }
}

impl Eq for RunState {}
