use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

/// Number of players on court for a doubles session.
pub const ROSTER_SIZE: usize = 4;

/// Opaque player identifier issued by the surrounding app.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_ref: Option<String>,
}

impl Player {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(id),
            display_name: display_name.into(),
            photo_ref: None,
        }
    }

    pub fn with_photo(mut self, photo_ref: impl Into<String>) -> Self {
        self.photo_ref = Some(photo_ref.into());
        self
    }
}

/// Four distinct players in a fixed reference order.
///
/// Seat 0 (`p1`) is the player recording the session; the submission
/// pipeline sends it as the requesting player when completing matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    players: [Player; ROSTER_SIZE],
}

impl Roster {
    pub fn new(players: [Player; ROSTER_SIZE]) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(ROSTER_SIZE);
        for player in &players {
            if !seen.insert(&player.id) {
                return Err(DomainError::validation(
                    ValidationKind::MalformedRoster,
                    format!("player {} appears more than once", player.id),
                ));
            }
        }
        Ok(Self { players })
    }

    /// Build a roster from a list, rejecting anything but four distinct players.
    pub fn try_from_players(players: Vec<Player>) -> Result<Self, DomainError> {
        let count = players.len();
        let players: [Player; ROSTER_SIZE] = players.try_into().map_err(|_| {
            DomainError::validation(
                ValidationKind::MalformedRoster,
                format!("roster needs exactly {ROSTER_SIZE} players, got {count}"),
            )
        })?;
        Self::new(players)
    }

    pub fn players(&self) -> &[Player; ROSTER_SIZE] {
        &self.players
    }

    pub fn ids(&self) -> [&PlayerId; ROSTER_SIZE] {
        [
            &self.players[0].id,
            &self.players[1].id,
            &self.players[2].id,
            &self.players[3].id,
        ]
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn requesting_player(&self) -> &PlayerId {
        &self.players[0].id
    }
}
