//! Text encoding of a [`RunState`].
//!
//! The encoded block is the only copy of a run's state, so [`decode`] is the
//! exact inverse of [`encode`] for every state the command engine can reach.
//! The current depth is stored only as the arrow marker in the card table.

use crate::{alert_bonus, ProtectionCard, RunState};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

mod table;

use table::{Align, Column};

pub const BANNER: &str = "`!!! Run status !!!`";
pub const TABLE_FENCE: &str = "```";
pub const CURSOR_MARKER: &str = "->";

const GROUP_PREFIX: &str = "Runner Group ";
const DEFENDERS_PREFIX: &str = "Defenders: ";
const ACTIVE_GROUP_PREFIX: &str = "Defending facility from group ";
const ALERTS_PREFIX: &str = "Alerts: ";

const CARD_COLUMNS: [Column; 4] = [
    Column {
        header: "",
        align: Align::Left,
    },
    Column {
        header: "Card ID",
        align: Align::Left,
    },
    Column {
        header: "Card name",
        align: Align::Left,
    },
    Column {
        header: "Boost",
        align: Align::Right,
    },
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no run status block found")]
    MissingBanner,
    #[error("line {line}: malformed {section} line")]
    MalformedLine { line: usize, section: &'static str },
    #[error("line {line}: {section} appears more than once")]
    DuplicateSection { line: usize, section: &'static str },
    #[error("line {line}: {name} is listed more than once")]
    DuplicateName { line: usize, name: String },
    #[error("card table opened on line {line} is never closed")]
    UnterminatedTable { line: usize },
    #[error("line {line}: malformed card row ({reason})")]
    MalformedRow { line: usize, reason: &'static str },
    #[error("line {line}: more than one card carries the cursor marker")]
    DuplicateCursor { line: usize },
}

pub fn encode(state: &RunState) -> String {
    let mut lines = vec![BANNER.to_string()];
    for group in state.occupied_groups() {
        lines.push(format!(
            "{GROUP_PREFIX}{}: {}",
            group.number,
            quote_names(&group.members)
        ));
    }
    if !state.defenders.is_empty() {
        lines.push(format!("{DEFENDERS_PREFIX}{}", quote_names(&state.defenders)));
    }
    if let Some(number) = state.active_group {
        lines.push(format!("{ACTIVE_GROUP_PREFIX}{number}"));
    }
    lines.push(format!(
        "{ALERTS_PREFIX}{} (+{})",
        state.alerts,
        alert_bonus(state.alerts)
    ));
    if !state.cards.is_empty() {
        let rows: Vec<Vec<String>> = state
            .cards
            .iter()
            .enumerate()
            .map(|(index, card)| {
                let marker = if state.cursor == Some(index) {
                    CURSOR_MARKER
                } else {
                    ""
                };
                vec![
                    marker.to_string(),
                    card.id.clone(),
                    card.display_name.clone(),
                    card.boost.to_string(),
                ]
            })
            .collect();
        lines.push(TABLE_FENCE.to_string());
        lines.extend(table::render(&CARD_COLUMNS, &rows));
        lines.push(TABLE_FENCE.to_string());
    }
    lines.join("\n")
}

fn quote_names(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Default)]
struct Seen {
    names: HashSet<String>,
    defenders: bool,
    active_group: bool,
    alerts: bool,
    table: bool,
}

fn first_occurrence(
    flag: &mut bool,
    line: usize,
    section: &'static str,
) -> Result<(), DecodeError> {
    if std::mem::replace(flag, true) {
        return Err(DecodeError::DuplicateSection { line, section });
    }
    Ok(())
}

impl Seen {
    fn names(&mut self, line: usize, names: &[String]) -> Result<(), DecodeError> {
        for name in names {
            if !self.names.insert(name.clone()) {
                return Err(DecodeError::DuplicateName {
                    line,
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Rebuilds a run from its status block.
///
/// Sections after the banner may come in any order and every section except
/// the banner is optional. Nothing is returned unless the whole block parses.
pub fn decode(text: &str) -> Result<RunState, DecodeError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_end()))
        .skip_while(|(_, line)| line.is_empty());
    match lines.next() {
        Some((_, line)) if line.trim_start() == BANNER => {}
        _ => return Err(DecodeError::MissingBanner),
    }

    let mut state = RunState {
        groups: Vec::new(),
        ..RunState::new()
    };
    let mut seen = Seen::default();

    while let Some((line_no, line)) = lines.next() {
        if line.is_empty() {
            continue;
        }
        if line == TABLE_FENCE {
            first_occurrence(&mut seen.table, line_no, "card table")?;
            let mut rows = Vec::new();
            let mut closed = false;
            for (row_no, row) in lines.by_ref() {
                if row == TABLE_FENCE {
                    closed = true;
                    break;
                }
                rows.push((row_no, row));
            }
            if !closed {
                return Err(DecodeError::UnterminatedTable { line: line_no });
            }
            let (cards, cursor) = decode_table(line_no, &rows)?;
            state.cards = cards;
            state.cursor = cursor;
        } else if let Some(rest) = line.strip_prefix(GROUP_PREFIX) {
            let malformed = DecodeError::MalformedLine {
                line: line_no,
                section: "runner group",
            };
            let (number, names) = rest.split_once(": ").ok_or(malformed.clone())?;
            let number: u32 = number.parse().map_err(|_| malformed.clone())?;
            if state.group(number).is_some() {
                return Err(DecodeError::DuplicateSection {
                    line: line_no,
                    section: "runner group",
                });
            }
            let members = parse_names(names).ok_or(malformed)?;
            seen.names(line_no, &members)?;
            state.group_entry(number).members = members;
        } else if let Some(rest) = line.strip_prefix(DEFENDERS_PREFIX) {
            first_occurrence(&mut seen.defenders, line_no, "defenders")?;
            let defenders = parse_names(rest).ok_or(DecodeError::MalformedLine {
                line: line_no,
                section: "defenders",
            })?;
            seen.names(line_no, &defenders)?;
            state.defenders = defenders;
        } else if let Some(rest) = line.strip_prefix(ACTIVE_GROUP_PREFIX) {
            first_occurrence(&mut seen.active_group, line_no, "active group")?;
            let number = rest.parse().map_err(|_| DecodeError::MalformedLine {
                line: line_no,
                section: "active group",
            })?;
            state.active_group = Some(number);
        } else if let Some(rest) = line.strip_prefix(ALERTS_PREFIX) {
            first_occurrence(&mut seen.alerts, line_no, "alerts")?;
            state.alerts = parse_alerts(rest).ok_or(DecodeError::MalformedLine {
                line: line_no,
                section: "alerts",
            })?;
        } else {
            warn!(line = line_no, content = line, "ignoring unrecognised status line");
        }
    }

    debug!(
        groups = state.groups.len(),
        defenders = state.defenders.len(),
        cards = state.cards.len(),
        cursor = ?state.cursor,
        "decoded run status"
    );
    Ok(state)
}

/// Backtick-quoted names separated by `, `.
fn parse_names(raw: &str) -> Option<Vec<String>> {
    let mut names = Vec::new();
    if raw.is_empty() {
        return Some(names);
    }
    let mut rest = raw;
    loop {
        let inner = rest.strip_prefix('`')?;
        let end = inner.find('`')?;
        if end == 0 {
            return None;
        }
        names.push(inner[..end].to_string());
        rest = &inner[end + 1..];
        if rest.is_empty() {
            return Some(names);
        }
        rest = rest.strip_prefix(", ")?;
    }
}

// The bonus in parentheses is derived, so only its shape is checked.
fn parse_alerts(raw: &str) -> Option<i64> {
    let (alerts, bonus) = raw.split_once(" (+")?;
    let bonus = bonus.strip_suffix(')')?;
    if bonus.is_empty() || !bonus.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    alerts.parse().ok()
}

fn decode_table(
    fence_line: usize,
    rows: &[(usize, &str)],
) -> Result<(Vec<ProtectionCard>, Option<usize>), DecodeError> {
    let mut rows = rows.iter().copied().filter(|(_, row)| !row.trim().is_empty());
    match rows.next() {
        Some((line, header)) => {
            if table::split_row(header).map(|cells| cells.len()) != Some(CARD_COLUMNS.len()) {
                return Err(DecodeError::MalformedRow {
                    line,
                    reason: "bad header",
                });
            }
        }
        None => {
            return Err(DecodeError::MalformedRow {
                line: fence_line,
                reason: "missing header",
            })
        }
    }
    match rows.next() {
        Some((_, rule)) if table::is_rule(rule) => {}
        Some((line, _)) => {
            return Err(DecodeError::MalformedRow {
                line,
                reason: "missing header rule",
            })
        }
        None => {
            return Err(DecodeError::MalformedRow {
                line: fence_line,
                reason: "missing header rule",
            })
        }
    }

    let mut cards = Vec::new();
    let mut cursor = None;
    for (line, row) in rows {
        let cells = table::split_row(row).ok_or(DecodeError::MalformedRow {
            line,
            reason: "not a table row",
        })?;
        let [marker, id, name, boost] = cells.as_slice() else {
            return Err(DecodeError::MalformedRow {
                line,
                reason: "expected four columns",
            });
        };
        match *marker {
            "" => {}
            CURSOR_MARKER => {
                if cursor.replace(cards.len()).is_some() {
                    return Err(DecodeError::DuplicateCursor { line });
                }
            }
            _ => {
                return Err(DecodeError::MalformedRow {
                    line,
                    reason: "unknown marker",
                })
            }
        }
        if id.is_empty() || name.is_empty() {
            return Err(DecodeError::MalformedRow {
                line,
                reason: "empty card id or name",
            });
        }
        let boost = boost.parse().map_err(|_| DecodeError::MalformedRow {
            line,
            reason: "boost is not a number",
        })?;
        cards.push(ProtectionCard {
            id: (*id).to_string(),
            display_name: (*name).to_string(),
            boost,
        });
    }
    Ok((cards, cursor))
}
