mod candidate;
mod item;
mod outcome;

pub use candidate::ShortcutCandidate;
pub use item::RepairItem;
pub use outcome::{ParseOutcome, SkipReason};
