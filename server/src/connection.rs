//! Per-connection session loop

use crate::dispatcher::{DispatcherHandle, PickRequest, PickResponse, Seating};
use crate::error::GameError;
use crate::player::SlotId;
use crate::ConnectionId;
use log::{debug, error, info, warn};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use treasure_shared::{read_tile, write_result};

/// Serves one seated client: reads pick bytes, forwards them to the dispatcher
/// and writes each result back before reading the next pick.
pub struct ConnectionHandler<S> {
    connection_id: ConnectionId,
    slot: SlotId,
    name: String,
    stream: S,
    dispatcher: DispatcherHandle,
    responses: mpsc::UnboundedReceiver<PickResponse>,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(
        connection_id: ConnectionId,
        seating: Seating,
        stream: S,
        dispatcher: DispatcherHandle,
    ) -> Self {
        Self {
            connection_id,
            slot: seating.slot,
            name: seating.name,
            stream,
            dispatcher,
            responses: seating.responses,
        }
    }

    /// Runs until the peer disconnects or a socket write fails
    pub async fn run(mut self) -> Result<(), GameError> {
        loop {
            let tile = match read_tile(&mut self.stream).await {
                Ok(tile) => tile,
                Err(e) if e.is_disconnect() => {
                    info!("Player {} disconnected", self.name);
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };
            debug!(
                "Player {} requested ({}, {})",
                self.name, tile.row, tile.col
            );

            self.dispatcher.pick(PickRequest {
                connection_id: self.connection_id,
                row: usize::from(tile.row),
                col: usize::from(tile.col),
                slot: self.slot,
            })?;

            let response = self.next_response().await?;
            write_result(&mut self.stream, response.result).await?;
        }
    }

    async fn next_response(&mut self) -> Result<PickResponse, GameError> {
        while let Some(response) = self.responses.recv().await {
            if response.connection_id == self.connection_id {
                return Ok(response);
            }
            warn!(
                "Connection {} discarded a response addressed to {}",
                self.connection_id, response.connection_id
            );
        }
        Err(GameError::DispatcherStopped)
    }
}

/// Runs a handler on its own task and frees its seat however it ends,
/// including when the handler panics.
pub fn spawn<S>(handler: ConnectionHandler<S>) -> JoinHandle<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let connection_id = handler.connection_id;
    let dispatcher = handler.dispatcher.clone();

    tokio::spawn(async move {
        match tokio::spawn(handler.run()).await {
            Ok(Ok(())) => debug!("Connection {} closed", connection_id),
            Ok(Err(e)) => warn!("Connection {} terminated: {}", connection_id, e),
            Err(e) => error!("Connection {} handler failed: {}", connection_id, e),
        }
        dispatcher.leave(connection_id);
    })
}
