use crate::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Command {
    /// Starts the run if it has no status block yet, otherwise joins group 1.
    JoinRun { runner: String },
    JoinGroup { runner: String, group: u32 },
    Defend { name: String },
    /// Defends against group 1 when no group is named.
    BeginDefense { group: Option<u32> },
    AddAlerts { delta: i64 },
    NextCard { card: Option<String> },
    PreviousCard,
    Boost { amount: u32 },
    CalculateStrength,
    Status,
    Roll { dice: String },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinRun { .. } => "run-facility",
            Self::JoinGroup { .. } => "group",
            Self::Defend { .. } => "defend",
            Self::BeginDefense { .. } => "defend-facility",
            Self::AddAlerts { .. } => "alerts",
            Self::NextCard { .. } => "next-card",
            Self::PreviousCard => "previous-card",
            Self::Boost { .. } => "boost",
            Self::CalculateStrength => "calculate-strength",
            Self::Status => "run-status",
            Self::Roll { .. } => "roll",
        }
    }

    /// Whether a successful run of this command writes the status block back.
    pub fn writes(&self) -> bool {
        !matches!(
            self,
            Self::CalculateStrength | Self::Status | Self::Roll { .. }
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandReport {
    pub events: Vec<RunEvent>,
    /// The encoded block after the command, whether or not it was written.
    pub status: Option<String>,
    pub strength: Option<StrengthBreakdown>,
    pub roll: Option<DiceRoll>,
}

const DEFAULT_DEFENDED_GROUP: u32 = 1;

/// Runs commands against stored status blocks.
#[derive(Debug)]
pub struct CommandEngine<S> {
    store: S,
    catalog: CardCatalog,
    limits: CommandLimits,
    rng: RngState,
}

impl<S: RunStore> CommandEngine<S> {
    pub fn new(store: S, catalog: CardCatalog, limits: CommandLimits, seed: u64) -> Self {
        Self {
            store,
            catalog,
            limits,
            rng: RngState::from_seed(seed),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    pub fn limits(&self) -> &CommandLimits {
        &self.limits
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Reads, decodes, applies `command`, re-encodes and writes back.
    ///
    /// The store offers no locking, so two commands against the same run that
    /// overlap between read and write lose the earlier update. Commands are
    /// expected to be issued one at a time. Nothing is written when any step
    /// fails.
    pub fn execute(&mut self, run: &RunId, command: Command) -> Result<CommandReport, RunError> {
        validate(&self.limits, &command)?;
        let mut report = CommandReport::default();

        if let Command::Roll { dice } = &command {
            let spec: DiceSpec = dice.parse()?;
            if spec.count() > self.limits.max_dice || spec.faces() > self.limits.max_die_faces {
                return Err(RunError::invalid(
                    "dice",
                    format!(
                        "at most {}d{} may be rolled",
                        self.limits.max_dice, self.limits.max_die_faces
                    ),
                ));
            }
            report.roll = Some(spec.roll(&mut self.rng));
            return Ok(report);
        }

        let stored = self.store.read_raw(run)?;
        debug!(run = %run, found = stored.is_some(), "read status block");
        let mut events = EventBus::default();
        let mut state = match (stored, &command) {
            (Some(raw), _) => codec::decode(&raw)?,
            (None, Command::JoinRun { runner }) => {
                events.push(RunEvent::RunInitiated {
                    runner: runner.clone(),
                });
                RunState::new()
            }
            (None, _) => return Err(RunError::RunNotInitialized),
        };

        let writes = command.writes();
        let name = command.name();
        self.apply(&mut state, command, &mut events, &mut report)?;

        let status = codec::encode(&state);
        if writes {
            self.store.write_raw(run, &status)?;
            info!(run = %run, command = name, "status block written");
        }
        report.events = events.drain().collect();
        report.status = Some(status);
        Ok(report)
    }

    fn apply(
        &self,
        state: &mut RunState,
        command: Command,
        events: &mut EventBus,
        report: &mut CommandReport,
    ) -> Result<(), RunError> {
        match command {
            Command::JoinRun { runner } => {
                let from = state.move_to_group(&runner, 1);
                events.push(RunEvent::RunnerMoved {
                    runner,
                    group: 1,
                    from,
                });
            }
            Command::JoinGroup { runner, group } => {
                let from = state.move_to_group(&runner, group);
                events.push(RunEvent::RunnerMoved {
                    runner,
                    group,
                    from,
                });
            }
            Command::Defend { name } => {
                let from = state.move_to_defenders(&name);
                events.push(RunEvent::DefenderJoined { name, from });
            }
            Command::BeginDefense { group } => {
                state.begin_defense(group.unwrap_or(DEFAULT_DEFENDED_GROUP), events)?;
            }
            Command::AddAlerts { delta } => {
                state.add_alerts(delta, events);
            }
            Command::NextCard { card } => {
                state.advance_card(&self.catalog, card.as_deref(), events)?;
            }
            Command::PreviousCard => {
                state.retreat_card(events)?;
            }
            Command::Boost { amount } => {
                state.boost_active_card(amount, events)?;
            }
            Command::CalculateStrength => {
                report.strength = Some(state.strength()?);
            }
            Command::Status | Command::Roll { .. } => {}
        }
        Ok(())
    }
}

fn validate(limits: &CommandLimits, command: &Command) -> Result<(), RunError> {
    match command {
        Command::JoinRun { runner } | Command::JoinGroup { runner, .. } => {
            validate_name(runner)?;
        }
        Command::Defend { name } => validate_name(name)?,
        _ => {}
    }
    match command {
        Command::JoinGroup { group: 0, .. } | Command::BeginDefense { group: Some(0) } => {
            Err(RunError::invalid("group", "group numbers start at 1"))
        }
        Command::AddAlerts { delta } if !limits.alert_delta_allowed(*delta) => {
            Err(RunError::invalid(
                "alerts",
                format!(
                    "must be between {} and {}",
                    limits.min_alert_delta, limits.max_alert_delta
                ),
            ))
        }
        Command::Boost { amount } if !limits.boost_allowed(*amount) => Err(RunError::invalid(
            "boost",
            format!("must be between 1 and {}", limits.max_boost),
        )),
        Command::NextCard { card: Some(card) } if card.trim().is_empty() => {
            Err(RunError::invalid("card", "card id must not be empty"))
        }
        _ => Ok(()),
    }
}

/// Names are stored backtick-quoted on a single line.
pub fn validate_name(name: &str) -> Result<(), RunError> {
    if name.is_empty() {
        return Err(RunError::invalid("name", "name must not be empty"));
    }
    if name.contains(['`', '\n', '\r']) {
        return Err(RunError::invalid(
            "name",
            format!("{name:?} may not contain backticks or line breaks"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> CommandEngine<MemoryStore> {
        let catalog = CardCatalog::from_entries([("ice1", "Ice Wall"), ("gate2", "Sentry Gate")])
            .expect("catalog");
        CommandEngine::new(MemoryStore::new(), catalog, CommandLimits::default(), 1)
    }

    fn run() -> RunId {
        RunId::new("dtc-researcha")
    }

    fn join(engine: &mut CommandEngine<MemoryStore>, runner: &str) {
        engine
            .execute(
                &run(),
                Command::JoinRun {
                    runner: runner.to_string(),
                },
            )
            .expect("join");
    }

    #[test]
    fn first_join_initiates_run() {
        let mut engine = engine();
        let report = engine
            .execute(
                &run(),
                Command::JoinRun {
                    runner: "alice".to_string(),
                },
            )
            .expect("join");
        assert!(matches!(report.events[0], RunEvent::RunInitiated { .. }));
        let stored = engine.store().read_raw(&run()).expect("read").expect("stored");
        assert_eq!(
            stored,
            "`!!! Run status !!!`\nRunner Group 1: `alice`\nAlerts: 0 (+0)"
        );
        assert_eq!(report.status.as_deref(), Some(stored.as_str()));

        let report = engine
            .execute(
                &run(),
                Command::JoinRun {
                    runner: "bob".to_string(),
                },
            )
            .expect("join");
        assert!(!report
            .events
            .iter()
            .any(|event| matches!(event, RunEvent::RunInitiated { .. })));
    }

    #[test]
    fn commands_need_an_initiated_run() {
        let mut engine = engine();
        let err = engine
            .execute(&run(), Command::Status)
            .expect_err("no run yet");
        assert_eq!(err, RunError::RunNotInitialized);
        assert!(engine.store().is_empty());
    }

    #[test]
    fn corrupt_block_is_reported_and_left_alone() {
        let mut engine = engine();
        engine
            .store_mut()
            .write_raw(&run(), "hello there")
            .expect("write");
        let err = engine
            .execute(&run(), Command::AddAlerts { delta: 1 })
            .expect_err("corrupt");
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(
            engine.store().read_raw(&run()).expect("read").as_deref(),
            Some("hello there")
        );
    }

    #[test]
    fn failed_transition_writes_nothing() {
        let mut engine = engine();
        join(&mut engine, "alice");
        let before = engine.store().read_raw(&run()).expect("read");
        let err = engine
            .execute(&run(), Command::NextCard { card: None })
            .expect_err("no card yet");
        assert_eq!(err, RunError::NoCardForDepth { depth: 1 });
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(engine.store().read_raw(&run()).expect("read"), before);
    }

    #[test]
    fn read_only_commands_do_not_write() {
        let mut engine = engine();
        join(&mut engine, "alice");
        engine
            .store_mut()
            .write_raw(&run(), "`!!! Run status !!!`\n\nRunner Group 1: `alice`\nAlerts: 0 (+9)")
            .expect("write");
        let report = engine.execute(&run(), Command::Status).expect("status");
        assert_eq!(
            report.status.as_deref(),
            Some("`!!! Run status !!!`\nRunner Group 1: `alice`\nAlerts: 0 (+0)")
        );
        let stored = engine.store().read_raw(&run()).expect("read").expect("stored");
        assert!(stored.contains("(+9)"));
    }

    #[test]
    fn arguments_are_checked_against_limits() {
        let mut engine = engine();
        join(&mut engine, "alice");
        let cases = [
            Command::AddAlerts { delta: 21 },
            Command::AddAlerts { delta: -21 },
            Command::Boost { amount: 0 },
            Command::Boost { amount: 11 },
            Command::JoinGroup {
                runner: "bob".to_string(),
                group: 0,
            },
            Command::BeginDefense { group: Some(0) },
            Command::Defend {
                name: "a`b".to_string(),
            },
            Command::JoinRun {
                runner: String::new(),
            },
            Command::NextCard {
                card: Some(" ".to_string()),
            },
            Command::Roll {
                dice: "31d6".to_string(),
            },
            Command::Roll {
                dice: "2d101".to_string(),
            },
        ];
        for command in cases {
            let label = format!("{command:?}");
            let err = engine.execute(&run(), command).expect_err(&label);
            assert_eq!(err.kind(), ErrorKind::Validation, "{label}");
        }
    }

    #[test]
    fn roll_needs_no_run() {
        let mut engine = engine();
        let report = engine
            .execute(
                &run(),
                Command::Roll {
                    dice: "6d8".to_string(),
                },
            )
            .expect("roll");
        let roll = report.roll.expect("roll result");
        assert_eq!(roll.values.len(), 6);
        assert!(report.status.is_none());
        assert!(engine.store().is_empty());
    }

    #[test]
    fn unknown_card_is_a_validation_error() {
        let mut engine = engine();
        join(&mut engine, "alice");
        let err = engine
            .execute(
                &run(),
                Command::NextCard {
                    card: Some("nope".to_string()),
                },
            )
            .expect_err("unknown");
        assert_eq!(err, RunError::UnknownCard("nope".to_string()));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn command_names_match_chat_commands() {
        assert_eq!(Command::PreviousCard.name(), "previous-card");
        assert_eq!(Command::BeginDefense { group: None }.name(), "defend-facility");
        assert!(!Command::CalculateStrength.writes());
        assert!(Command::Boost { amount: 1 }.writes());
    }

    #[test]
    fn defense_defaults_to_group_one() {
        let mut engine = engine();
        join(&mut engine, "alice");
        join(&mut engine, "bob");
        let report = engine
            .execute(&run(), Command::BeginDefense { group: None })
            .expect("defend");
        assert!(matches!(
            &report.events[..],
            [RunEvent::DefenseBegun { group: 1, alerts: 1, .. }]
        ));
        let status = report.status.expect("status");
        assert!(status.contains("Defending facility from group 1"));
    }

    #[test]
    fn engine_hands_back_its_parts() {
        let engine = engine();
        assert!(engine.catalog().contains("ice1"));
        assert!(!engine.catalog().contains("trap3"));
        assert_eq!(engine.limits(), &CommandLimits::default());

        let mut engine = engine;
        join(&mut engine, "alice");
        let mut store = engine.into_store();
        assert_eq!(store.len(), 1);
        assert!(store.remove(&run()).is_some());
        assert!(store.is_empty());
        assert_eq!(store.remove(&run()), None);
    }
}
