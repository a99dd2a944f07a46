use crate::autoplay::Autoplay;
use crate::game::{ClientGameState, GameStatus};
use crate::input::{parse_command, Command, HELP};
use crate::rendering::{describe_event, render_board, render_history, render_status};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use shared::{ClientMessage, ServerMessage};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::{interval, MissedTickBehavior};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("failed to encode intent: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Client {
    sink: SplitSink<Socket, Message>,
    frames: SplitStream<Socket>,
    state: ClientGameState,
    autoplay: Option<Autoplay>,
}

impl Client {
    pub async fn connect(url: &str, autoplay: Option<Autoplay>) -> Result<Self, ClientError> {
        info!("Connecting to {}...", url);
        let (socket, _) = connect_async(url)
            .await
            .map_err(|source| ClientError::Connect {
                url: url.to_string(),
                source,
            })?;
        info!("Connected to {}", url);

        let (sink, frames) = socket.split();
        Ok(Client {
            sink,
            frames,
            state: ClientGameState::new(),
            autoplay,
        })
    }

    pub fn state(&self) -> &ClientGameState {
        &self.state
    }

    /// Runs until the server closes the connection, the user quits, or
    /// autoplay reaches its move limit.
    pub async fn run(&mut self) -> Result<(), ClientError> {
        let interactive = self.autoplay.is_none();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        let period = self
            .autoplay
            .as_ref()
            .map_or(crate::autoplay::DEFAULT_INTERVAL, |autoplay| autoplay.interval());
        let mut autoplay_interval = interval(period);
        autoplay_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        if interactive {
            println!("{}", HELP);
        }

        loop {
            tokio::select! {
                frame = self.frames.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => self.handle_text(&text),
                        Some(Ok(Message::Close(_))) | None => {
                            info!("Server closed the connection");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e.into()),
                    }
                },

                line = lines.next_line(), if interactive => {
                    let Some(line) = line? else {
                        break;
                    };
                    match parse_command(&line) {
                        Ok(Command::Quit) => break,
                        Ok(Command::Help) => println!("{}", HELP),
                        Ok(Command::Show) => self.print_board(),
                        Ok(Command::History) => {
                            print!("{}", render_history(self.state.history()))
                        }
                        Ok(command) => {
                            if let Some(intent) = command.intent() {
                                self.send(&intent).await?;
                            }
                        }
                        Err(e) => println!("{}", e),
                    }
                },

                _ = autoplay_interval.tick(), if !interactive => {
                    let Some(autoplay) = self.autoplay.as_mut() else {
                        continue;
                    };
                    if autoplay.is_finished() {
                        info!("Autoplay sent {} moves, stopping", autoplay.moves_sent());
                        break;
                    }
                    let intent = autoplay.next_move(&self.state, &mut rand::thread_rng());
                    if let Some(intent) = intent {
                        self.send(&intent).await?;
                    }
                },
            }
        }

        if let Err(e) = self.sink.close().await {
            debug!("Error closing connection: {}", e);
        }
        Ok(())
    }

    async fn send(&mut self, intent: &ClientMessage) -> Result<(), ClientError> {
        let json = serde_json::to_string(intent)?;
        debug!("Sending {}", json);
        self.sink.send(Message::Text(json)).await?;
        Ok(())
    }

    fn handle_text(&mut self, text: &str) {
        let event = match serde_json::from_str::<ServerMessage>(text) {
            Ok(event) => event,
            Err(e) => {
                warn!("Ignoring unrecognised event: {}", e);
                return;
            }
        };

        println!("{}", describe_event(&event));
        let board_changed = self.state.apply(&event);
        if board_changed || self.state.status() == GameStatus::Over {
            self.print_board();
        }
        println!("{}", render_status(&self.state));
    }

    fn print_board(&self) {
        match self.state.board() {
            Some(board) => print!("{}", render_board(board, self.state.winning_line())),
            None => println!("No board yet"),
        }
    }
}
