//! Board dispatcher: the single owner of all mutable game state
//!
//! Connection handlers never touch the board or the roster. They send
//! [`DispatchCommand`]s over an unbounded channel and the dispatcher task applies
//! them one at a time in arrival order, so two picks of the same tile are always
//! resolved by that order and the later one scores nothing.
//!
//! Each seated connection gets its own response channel, registered in a table
//! keyed by connection ID. Responses for a connection that has already left are
//! dropped together with its channel.

use crate::board::Board;
use crate::error::GameError;
use crate::player::{Roster, SlotId};
use crate::ConnectionId;
use log::{debug, error, info, warn};
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use treasure_shared::PickResult;

/// A decoded pick on its way to the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickRequest {
    pub connection_id: ConnectionId,
    pub row: usize,
    pub col: usize,
    pub slot: SlotId,
}

/// Dispatcher answer to a [`PickRequest`], tagged with the requesting connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickResponse {
    pub connection_id: ConnectionId,
    pub result: PickResult,
}

/// Outcome of a successful join
#[derive(Debug)]
pub struct Seating {
    pub slot: SlotId,
    pub name: String,
    pub responses: mpsc::UnboundedReceiver<PickResponse>,
}

/// Point-in-time view of the game, for diagnostics and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub scores: (u32, u32),
    pub seated: usize,
    pub remaining_treasure: u32,
    pub board: String,
}

#[derive(Debug)]
pub enum DispatchCommand {
    Join {
        connection_id: ConnectionId,
        reply: oneshot::Sender<Option<Seating>>,
    },
    Pick(PickRequest),
    Leave {
        connection_id: ConnectionId,
    },
    Reset {
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    Snapshot {
        reply: oneshot::Sender<Snapshot>,
    },
    Shutdown,
}

pub struct Dispatcher {
    board: Board,
    roster: Roster,
    responders: HashMap<ConnectionId, mpsc::UnboundedSender<PickResponse>>,
}

impl Dispatcher {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            roster: Roster::new(),
            responders: HashMap::new(),
        }
    }

    /// Starts the dispatcher task and returns a handle for submitting commands
    pub fn spawn(board: Board) -> (DispatcherHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self::new(board);
        let task = tokio::spawn(dispatcher.run(rx));
        (DispatcherHandle { tx }, task)
    }

    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<DispatchCommand>) {
        info!("Board dispatcher started\n{}", self.board);

        while let Some(command) = commands.recv().await {
            if !self.handle(command) {
                break;
            }
        }

        info!("Board dispatcher stopped");
    }

    /// Applies one command. Returns false once the loop should stop.
    pub fn handle(&mut self, command: DispatchCommand) -> bool {
        match command {
            DispatchCommand::Join {
                connection_id,
                reply,
            } => {
                let seating = self.join(connection_id);
                if reply.send(seating).is_err() {
                    // Listener gave up waiting; release the seat again
                    warn!("Join reply for connection {} was not received", connection_id);
                    self.leave(connection_id);
                }
            }
            DispatchCommand::Pick(request) => {
                let result = self.apply_pick(&request);
                self.respond(request.connection_id, result);
            }
            DispatchCommand::Leave { connection_id } => {
                self.leave(connection_id);
            }
            DispatchCommand::Reset { reply } => {
                let _ = reply.send(self.reset());
            }
            DispatchCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            DispatchCommand::Shutdown => return false,
        }
        true
    }

    /// Seats a connection and registers its response channel
    pub fn join(&mut self, connection_id: ConnectionId) -> Option<Seating> {
        let slot = self.roster.join(connection_id)?;
        let name = self.roster.player(slot)?.name().to_string();

        let (tx, rx) = mpsc::unbounded_channel();
        self.responders.insert(connection_id, tx);

        Some(Seating {
            slot,
            name,
            responses: rx,
        })
    }

    /// Frees the connection's seat and drops its response channel
    pub fn leave(&mut self, connection_id: ConnectionId) -> bool {
        self.responders.remove(&connection_id);
        self.roster.leave(connection_id)
    }

    /// Picks a tile for the requesting player and reports the combined scores
    pub fn apply_pick(&mut self, request: &PickRequest) -> PickResult {
        let value = match self.board.pick(request.row, request.col) {
            Ok(value) => value,
            Err(e) => {
                debug!("Connection {}: {}", request.connection_id, e);
                return PickResult::OutOfBounds;
            }
        };

        match self
            .roster
            .seated_player_mut(request.slot, request.connection_id)
        {
            Some(player) => {
                if let Err(e) = player.add_score(i64::from(value)) {
                    error!("Could not score pick for {}: {}", player.name(), e);
                }
                debug!(
                    "Player {} picked ({}, {}) for {} points",
                    player.name(),
                    request.row,
                    request.col,
                    value
                );
            }
            None => warn!(
                "Pick from connection {} does not match a seated player",
                request.connection_id
            ),
        }

        debug!("Board after pick:\n{}", self.board);
        if value > 0 && self.board.is_cleared() {
            let (one, two) = self.roster.scores();
            info!("All treasure collected; scores One={} Two={}", one, two);
        }

        let (player_one, player_two) = self.roster.scores();
        PickResult::Scores {
            player_one,
            player_two,
        }
    }

    fn respond(&mut self, connection_id: ConnectionId, result: PickResult) {
        let Some(tx) = self.responders.get(&connection_id) else {
            debug!("Dropping response for departed connection {}", connection_id);
            return;
        };

        let response = PickResponse {
            connection_id,
            result,
        };
        if tx.send(response).is_err() {
            debug!("Connection {} stopped listening for responses", connection_id);
            self.responders.remove(&connection_id);
        }
    }

    /// Rebuilds the board with the same size and treasure levels
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.board = Board::new(self.board.size(), self.board.treasure_levels())?;
        info!("Board reset\n{}", self.board);
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            scores: self.roster.scores(),
            seated: self.roster.len(),
            remaining_treasure: self.board.remaining_treasure(),
            board: self.board.render(),
        }
    }
}

/// Cloneable sender side of the dispatcher's command channel
#[derive(Debug, Clone)]
pub struct DispatcherHandle {
    tx: mpsc::UnboundedSender<DispatchCommand>,
}

impl DispatcherHandle {
    fn send(&self, command: DispatchCommand) -> Result<(), GameError> {
        self.tx
            .send(command)
            .map_err(|_| GameError::DispatcherStopped)
    }

    /// Asks for a seat; `Ok(None)` means the roster is full
    pub async fn join(&self, connection_id: ConnectionId) -> Result<Option<Seating>, GameError> {
        let (reply, rx) = oneshot::channel();
        self.send(DispatchCommand::Join {
            connection_id,
            reply,
        })?;
        rx.await.map_err(|_| GameError::DispatcherStopped)
    }

    pub fn pick(&self, request: PickRequest) -> Result<(), GameError> {
        self.send(DispatchCommand::Pick(request))
    }

    pub fn leave(&self, connection_id: ConnectionId) {
        if self.send(DispatchCommand::Leave { connection_id }).is_err() {
            debug!("Dispatcher gone before connection {} left", connection_id);
        }
    }

    pub async fn reset(&self) -> Result<(), GameError> {
        let (reply, rx) = oneshot::channel();
        self.send(DispatchCommand::Reset { reply })?;
        rx.await.map_err(|_| GameError::DispatcherStopped)?
    }

    pub async fn snapshot(&self) -> Result<Snapshot, GameError> {
        let (reply, rx) = oneshot::channel();
        self.send(DispatchCommand::Snapshot { reply })?;
        rx.await.map_err(|_| GameError::DispatcherStopped)
    }

    pub fn shutdown(&self) {
        let _ = self.send(DispatchCommand::Shutdown);
    }
}
