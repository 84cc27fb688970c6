use proptest::collection::vec;
use proptest::prelude::*;
use runboard_core::{decode, encode, CardCatalog, EventBus, Placement, RunState};

const NAMES: &[&str] = &[
    "alice",
    "Bob Smith",
    "Smith, J.",
    "o'neil",
    "Zoë",
    " padded ",
    "->",
    "pipe | name",
];

const CARDS: &[(&str, &str)] = &[
    ("ice1", "Ice Wall"),
    ("ice2", "Black Ice"),
    ("gate1", "Sentry Gate"),
    ("trap1", "Tar Pit"),
    ("vault1", "Vault Door"),
];

#[derive(Debug, Clone)]
enum Op {
    Join(usize, u32),
    Defend(usize),
    Begin(u32),
    Alerts(i64),
    Next(Option<usize>),
    Previous,
    Boost(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..NAMES.len(), 1u32..6).prop_map(|(name, group)| Op::Join(name, group)),
        (0..NAMES.len()).prop_map(Op::Defend),
        (1u32..6).prop_map(Op::Begin),
        (-20i64..=20).prop_map(Op::Alerts),
        proptest::option::of(0..CARDS.len()).prop_map(Op::Next),
        Just(Op::Previous),
        (1u32..=10).prop_map(Op::Boost),
    ]
}

fn catalog() -> CardCatalog {
    CardCatalog::from_entries(CARDS.iter().copied()).expect("catalog")
}

fn reachable(ops: &[Op]) -> RunState {
    let catalog = catalog();
    let mut events = EventBus::default();
    let mut state = RunState::initiate(NAMES[0]);
    for op in ops {
        match op {
            Op::Join(name, group) => {
                state.move_to_group(NAMES[*name], *group);
            }
            Op::Defend(name) => {
                state.move_to_defenders(NAMES[*name]);
            }
            Op::Begin(group) => {
                let _ = state.begin_defense(*group, &mut events);
            }
            Op::Alerts(delta) => {
                state.add_alerts(*delta, &mut events);
            }
            Op::Next(card) => {
                let card = card.map(|index| CARDS[index].0);
                let _ = state.advance_card(&catalog, card, &mut events);
            }
            Op::Previous => {
                let _ = state.retreat_card(&mut events);
            }
            Op::Boost(amount) => {
                let _ = state.boost_active_card(*amount, &mut events);
            }
        }
    }
    state
}

proptest! {
    #[test]
    fn decode_inverts_encode(ops in vec(op(), 0..60)) {
        let state = reachable(&ops);
        let text = encode(&state);
        prop_assert_eq!(decode(&text), Ok(state));
    }

    #[test]
    fn reencoding_is_stable(ops in vec(op(), 0..60)) {
        let state = reachable(&ops);
        let text = encode(&state);
        let decoded = decode(&text).expect("decode");
        prop_assert_eq!(encode(&decoded), text);
    }

    #[test]
    fn names_sit_in_one_place(ops in vec(op(), 0..60)) {
        let state = reachable(&ops);
        let mut placed = 0;
        for name in NAMES {
            let in_groups = state
                .groups
                .iter()
                .map(|group| group.members.iter().filter(|member| member == name).count())
                .sum::<usize>();
            let in_defenders = state.defenders.iter().filter(|defender| defender == name).count();
            prop_assert!(in_groups + in_defenders <= 1, "{} placed twice", name);
            if let Some(placement) = state.placement(name) {
                placed += 1;
                match placement {
                    Placement::Group(_) => prop_assert_eq!(in_groups, 1),
                    Placement::Defender => prop_assert_eq!(in_defenders, 1),
                }
            }
        }
        prop_assert_eq!(state.participant_count(), placed);
    }

    #[test]
    fn cursor_stays_in_bounds(ops in vec(op(), 0..60)) {
        let state = reachable(&ops);
        if let Some(cursor) = state.cursor {
            prop_assert!(cursor < state.cards.len());
        }
    }
}
