//! Server network layer handling WebSocket connections and the authority loop

use crate::client_manager::{Outbox, SessionId};
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::lifecycle::GameController;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

/// Messages sent from connection tasks to the authority loop
#[derive(Debug)]
pub enum ServerEvent {
    Connect {
        addr: SocketAddr,
        sender: Outbox,
        reply: oneshot::Sender<Option<SessionId>>,
    },
    Frame {
        id: SessionId,
        message: Message,
    },
    Disconnected {
        id: SessionId,
    },
    Shutdown,
}

/// Stops a running [`Server`] from another task
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    events: mpsc::UnboundedSender<ServerEvent>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        if self.events.send(ServerEvent::Shutdown).is_err() {
            debug!("Shutdown requested after the server stopped");
        }
    }
}

/// WebSocket server owning the game authority
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    outbox_capacity: usize,
    controller: GameController,

    // Connection tasks -> authority loop
    events_tx: mpsc::UnboundedSender<ServerEvent>,
    events_rx: mpsc::UnboundedReceiver<ServerEvent>,
}

impl Server {
    /// Validates the configuration and binds the listener.
    ///
    /// Failing to bind is the only fatal server error.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;
        let controller = GameController::new(config.board_side)?;

        let addr = config.address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        info!("Server listening on ws://{}", local_addr);
        info!(
            "Board is {}x{} with {} winning lines",
            config.board_side,
            config.board_side,
            controller.lines().len()
        );

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Server {
            listener,
            local_addr,
            outbox_capacity: config.outbox_capacity,
            controller,
            events_tx,
            events_rx,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            events: self.events_tx.clone(),
        }
    }

    /// Accepts connections and applies their events until shut down.
    ///
    /// Every registry and game mutation happens on this task.
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Server started successfully");

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, addr)) => {
                            debug!("Accepted TCP connection from {}", addr);
                            tokio::spawn(handle_connection(
                                stream,
                                addr,
                                self.events_tx.clone(),
                                self.outbox_capacity,
                            ));
                        }
                        Err(e) => {
                            error!("Error accepting connection: {}", e);
                            tokio::time::sleep(Duration::from_millis(10)).await;
                        }
                    }
                },

                event = self.events_rx.recv() => {
                    match event {
                        Some(ServerEvent::Connect { addr, sender, reply }) => {
                            let id = self.controller.on_connect(addr, sender);
                            if reply.send(id).is_err() {
                                // Connection task is gone before it learned its id
                                if let Some(id) = id {
                                    self.controller.on_disconnect(id);
                                }
                            }
                        }
                        Some(ServerEvent::Frame { id, message }) => {
                            self.controller.on_message(id, message);
                        }
                        Some(ServerEvent::Disconnected { id }) => {
                            self.controller.on_disconnect(id);
                        }
                        Some(ServerEvent::Shutdown) | None => {
                            info!("Server shutting down");
                            break;
                        }
                    }
                },
            }
        }

        Ok(())
    }
}

/// Drives one connection: handshake, admission, then frame forwarding.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    events: mpsc::UnboundedSender<ServerEvent>,
    outbox_capacity: usize,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake with {} failed: {}", addr, e);
            return;
        }
    };
    let (mut sink, mut frames) = ws_stream.split();
    let (sender, mut outbox) = mpsc::channel::<Message>(outbox_capacity);

    // Writer ends once every sender is dropped or the socket fails; the
    // registry observes that as the session going dead.
    let mut writer = tokio::spawn(async move {
        while let Some(message) = outbox.recv().await {
            if let Err(e) = sink.send(message).await {
                debug!("Write to {} failed: {}", addr, e);
                return;
            }
        }
        if let Err(e) = sink.close().await {
            debug!("Closing {} failed: {}", addr, e);
        }
    });

    let (reply_tx, reply_rx) = oneshot::channel();
    let connect = ServerEvent::Connect {
        addr,
        sender,
        reply: reply_tx,
    };
    if events.send(connect).is_err() {
        return;
    }

    let id = match reply_rx.await {
        Ok(Some(id)) => id,
        Ok(None) => {
            // Refused: the writer flushes the ERROR event and closes
            if let Err(e) = writer.await {
                error!("Writer task for {} failed: {}", addr, e);
            }
            return;
        }
        Err(_) => return,
    };

    loop {
        tokio::select! {
            frame = frames.next() => match frame {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(message @ (Message::Text(_) | Message::Binary(_)))) => {
                    if events.send(ServerEvent::Frame { id, message }).is_err() {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("Connection error on session {}: {}", id, e);
                    break;
                }
            },
            // The authority released this session and its outbox has drained
            _ = &mut writer => {
                debug!("Writer for session {} finished, dropping connection", id);
                break;
            }
        }
    }

    if events.send(ServerEvent::Disconnected { id }).is_err() {
        debug!("Authority stopped before session {} closed", id);
    }
}
