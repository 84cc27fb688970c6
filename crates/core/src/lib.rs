//! Facility run state for chat-hosted tabletop sessions. Keep this crate free
//! of IO and platform concerns: storage and data loading live behind
//! [`RunStore`] and in `runboard-data`.

pub mod catalog;
pub mod codec;
pub mod command;
pub mod config;
pub mod dice;
pub mod events;
pub mod formula;
pub mod rng;
pub mod run;
pub mod state;
pub mod store;

pub use catalog::*;
pub use codec::*;
pub use command::*;
pub use config::*;
pub use dice::*;
pub use events::*;
pub use formula::*;
pub use rng::*;
pub use run::*;
pub use state::*;
pub use store::*;
