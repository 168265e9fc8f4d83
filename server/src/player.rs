//! Players and the fixed roster of named seats
//!
//! The roster has one seat per entry in [`PLAYER_NAMES`]. A connection takes the first
//! vacant seat when it joins and gives it back when it leaves, so a later connection
//! can reuse the seat with a fresh score.

use crate::error::GameError;
use crate::ConnectionId;
use log::info;
use treasure_shared::PLAYER_NAMES;

/// A named score accumulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    name: String,
    score: u32,
}

impl Player {
    /// Creates a player with a score of zero
    ///
    /// Fails when the name is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, GameError> {
        if name.trim().is_empty() {
            return Err(GameError::Validation(
                "player name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            score: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Adds a non-negative amount to the score
    pub fn add_score(&mut self, delta: i64) -> Result<(), GameError> {
        if delta < 0 {
            return Err(GameError::Validation(format!(
                "score delta must be non-negative, got {}",
                delta
            )));
        }
        let delta = u32::try_from(delta).unwrap_or(u32::MAX);
        self.score = self.score.saturating_add(delta);
        Ok(())
    }
}

/// Index into the roster
pub type SlotId = usize;

/// A seated player and the connection that owns the seat
#[derive(Debug)]
struct Seat {
    connection_id: ConnectionId,
    player: Player,
}

/// Fixed set of player seats
#[derive(Debug)]
pub struct Roster {
    seats: Vec<Option<Seat>>,
}

impl Roster {
    /// Creates a roster with one vacant seat per player name
    pub fn new() -> Self {
        Self {
            seats: PLAYER_NAMES.iter().map(|_| None).collect(),
        }
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.seats.len()
    }

    /// Seats a connection in the first vacant slot
    ///
    /// Returns None when every seat is occupied.
    pub fn join(&mut self, connection_id: ConnectionId) -> Option<SlotId> {
        let slot = self.seats.iter().position(Option::is_none)?;
        let player = Player::new(PLAYER_NAMES[slot]).ok()?;

        info!(
            "Connection {} seated as player {}",
            connection_id,
            player.name()
        );
        self.seats[slot] = Some(Seat {
            connection_id,
            player,
        });
        Some(slot)
    }

    /// Frees the seat held by a connection
    ///
    /// Returns true if the connection held a seat.
    pub fn leave(&mut self, connection_id: ConnectionId) -> bool {
        for seat in self.seats.iter_mut() {
            if seat.as_ref().map(|s| s.connection_id) == Some(connection_id) {
                if let Some(seat) = seat.take() {
                    info!(
                        "Player {} left with score {}",
                        seat.player.name(),
                        seat.player.score()
                    );
                }
                return true;
            }
        }
        false
    }

    pub fn player(&self, slot: SlotId) -> Option<&Player> {
        self.seats.get(slot)?.as_ref().map(|s| &s.player)
    }

    #[cfg(test)]
    pub fn player_mut(&mut self, slot: SlotId) -> Option<&mut Player> {
        self.seats.get_mut(slot)?.as_mut().map(|s| &mut s.player)
    }

    /// Player in `slot`, provided that seat belongs to `connection_id`
    pub fn seated_player_mut(
        &mut self,
        slot: SlotId,
        connection_id: ConnectionId,
    ) -> Option<&mut Player> {
        match self.seats.get_mut(slot)? {
            Some(seat) if seat.connection_id == connection_id => Some(&mut seat.player),
            _ => None,
        }
    }

    /// Player seated for a connection
    #[cfg(test)]
    pub fn player_for(&self, connection_id: ConnectionId) -> Option<&Player> {
        self.seats
            .iter()
            .flatten()
            .find(|s| s.connection_id == connection_id)
            .map(|s| &s.player)
    }

    /// Scores of seats one and two; a vacant seat counts as zero
    pub fn scores(&self) -> (u32, u32) {
        let score = |slot| self.player(slot).map(Player::score).unwrap_or(0);
        (score(0), score(1))
    }

    pub fn len(&self) -> usize {
        self.seats.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}
