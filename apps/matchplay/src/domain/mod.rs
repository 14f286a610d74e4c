//! Domain layer: pure session logic, no I/O.

pub mod cart;
pub mod matchups;
pub mod roster;
pub mod score_entry;
pub mod selection;

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_matchups;
#[cfg(test)]
mod tests_props_matchups;
#[cfg(test)]
mod tests_selection;

// Re-exports for ergonomics
pub use cart::{QueuedResult, ResultsCart, Score, TeamSide};
pub use matchups::{generate_combinations, CombinationId, MatchupCombination, Team};
pub use roster::{Player, PlayerId, Roster};
pub use score_entry::{
    dispatch_focus, EntryContext, EntryEffect, EntryState, FocusPort, ScoreEntryEngine,
    ScoreField,
};
pub use selection::{SelectedMatchup, SelectionQueue, SlotId, SlotStatus};
