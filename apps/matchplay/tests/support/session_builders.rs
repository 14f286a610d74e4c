//! Roster and session fixtures for service tests.

use matchplay::domain::{CombinationId, Player, PlayerId, QueuedResult, Roster};
use matchplay::ScoringSession;

pub fn roster() -> Roster {
    Roster::new([
        Player::new("p1", "Ana"),
        Player::new("p2", "Bruno"),
        Player::new("p3", "Carla"),
        Player::new("p4", "Diego"),
    ])
    .expect("fixture roster is valid")
}

pub fn requester() -> PlayerId {
    PlayerId::from("p1")
}

pub fn combo(n: u8) -> CombinationId {
    CombinationId::new(n).expect("combination 1..=3")
}

/// Session with one slot per `(combination, "t1t2")` entry, every slot
/// filled by pasting its score pair.
pub fn filled_session(entries: &[(u8, &str)]) -> ScoringSession {
    let mut session = ScoringSession::new(roster());
    for (n, _) in entries {
        session.select(combo(*n)).expect("select");
    }
    for (_, scores) in entries {
        let effects = session.paste(scores);
        assert!(!effects.is_empty(), "paste {scores:?} was ignored");
    }
    session
}

/// Queued results for `entries`, in session order.
pub fn queued(entries: &[(u8, &str)]) -> Vec<QueuedResult> {
    filled_session(entries).cart().snapshot()
}
