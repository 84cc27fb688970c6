//! File-backed pieces of the run tracker: the card catalog and command limits
//! loaded from JSON, plus a directory store for status blocks.

pub mod load;
pub mod store;

pub use load::*;
pub use store::*;
