//! Fixtures shared by the domain unit tests.

use crate::domain::cart::ResultsCart;
use crate::domain::matchups::{generate_combinations, CombinationId};
use crate::domain::roster::{Player, Roster};
use crate::domain::score_entry::{EntryContext, ScoreEntryEngine};
use crate::domain::selection::SelectionQueue;

pub fn roster() -> Roster {
    Roster::new([
        Player::new("p1", "Ana"),
        Player::new("p2", "Bruno"),
        Player::new("p3", "Carla"),
        Player::new("p4", "Diego"),
    ])
    .expect("fixture roster is valid")
}

pub fn queue() -> SelectionQueue {
    SelectionQueue::new(generate_combinations(&roster()))
}

/// Queue with `picks` selected in order, plus an empty cart and engine.
pub struct Desk {
    pub queue: SelectionQueue,
    pub cart: ResultsCart,
    pub engine: ScoreEntryEngine,
}

impl Desk {
    pub fn with_picks(picks: &[CombinationId]) -> Self {
        let mut queue = queue();
        for &pick in picks {
            queue.select(pick).expect("fixture combination exists");
        }
        Self {
            queue,
            cart: ResultsCart::new(),
            engine: ScoreEntryEngine::new(),
        }
    }

    /// Borrow the engine alongside a context over queue and cart.
    pub fn parts(&mut self) -> (&mut ScoreEntryEngine, EntryContext<'_>) {
        (
            &mut self.engine,
            EntryContext {
                queue: &mut self.queue,
                cart: &mut self.cart,
            },
        )
    }
}
