//! TCP listener: accepts connections, seats players and spawns their handlers

use crate::connection::{self, ConnectionHandler};
use crate::dispatcher::DispatcherHandle;
use crate::error::GameError;
use crate::ConnectionId;
use log::{error, info, warn};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use treasure_shared::{write_string, PrefixWidth};

pub struct Server {
    listener: TcpListener,
    dispatcher: DispatcherHandle,
    next_connection_id: ConnectionId,
}

impl Server {
    pub async fn bind(addr: &str, dispatcher: DispatcherHandle) -> Result<Self, GameError> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            dispatcher,
            next_connection_id: 1,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, GameError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until the dispatcher stops
    pub async fn run(mut self) -> Result<(), GameError> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => self.accept(stream, addr).await?,
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        }
    }

    async fn accept(&mut self, mut stream: TcpStream, addr: SocketAddr) -> Result<(), GameError> {
        let connection_id = self.next_connection_id;
        self.next_connection_id = self.next_connection_id.wrapping_add(1);

        if let Err(e) = stream.set_nodelay(true) {
            warn!("Could not disable Nagle for {}: {}", addr, e);
        }

        let Some(seating) = self.dispatcher.join(connection_id).await? else {
            warn!("Rejecting {}: all player seats are taken", addr);
            let _ = stream.shutdown().await;
            return Ok(());
        };

        if let Err(e) = write_string(&mut stream, PrefixWidth::Two, &seating.name).await {
            warn!("Could not greet {}: {}", addr, e);
            self.dispatcher.leave(connection_id);
            return Ok(());
        }
        info!(
            "Client {} connected from {} as player {}",
            connection_id, addr, seating.name
        );

        let handler = ConnectionHandler::new(connection_id, seating, stream, self.dispatcher.clone());
        connection::spawn(handler);
        Ok(())
    }
}
