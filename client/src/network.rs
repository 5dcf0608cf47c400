//! Client network layer: framed calls to the server and the session tasks
//!
//! A [`Connection`] wraps one TCP stream and carries one call at a time. A
//! session built on top of it runs three background tasks sharing that
//! connection: the state poll, the keep-alive and the move worker.
//!
//! A call dropped between writing its request and reading the reply leaves
//! that reply on the stream. The connection notices on its next call and
//! opens a fresh stream, so replies never get handed to the wrong caller.

use crate::config::ClientConfig;
use log::{debug, error, info, warn};
use shared::{
    decode, read_frame, write_frame, CodecError, Direction, ErrorKind, ParticipantId, Request,
    Response, Snapshot,
};
use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, timeout, Duration, MissedTickBehavior};

/// How long `Session::shutdown` waits for a task to finish its current call
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("connection failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("server error ({kind:?}): {message}")]
    Server { kind: ErrorKind, message: String },

    #[error("unexpected response: {0:?}")]
    UnexpectedResponse(Box<Response>),

    #[error("server closed the connection")]
    Closed,
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ClientError::Server {
                kind: ErrorKind::NotFound,
                ..
            }
        )
    }
}

/// One framed request/response stream to the server
pub struct Connection {
    addr: String,
    link: Mutex<Link>,
}

struct Link {
    stream: TcpStream,
    /// Set while a request is written but its reply not yet read
    in_flight: bool,
}

async fn open_stream(addr: &str) -> Result<TcpStream, ClientError> {
    let stream = TcpStream::connect(addr).await?;
    stream.set_nodelay(true)?;
    Ok(stream)
}

impl Connection {
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        let stream = open_stream(addr).await?;
        info!("Connected to server at {}", addr);

        Ok(Connection {
            addr: addr.to_string(),
            link: Mutex::new(Link {
                stream,
                in_flight: false,
            }),
        })
    }

    /// Sends one request and waits for its response
    pub async fn call(&self, request: &Request) -> Result<Response, ClientError> {
        let mut link = self.link.lock().await;

        if link.in_flight {
            warn!("Previous call did not complete, reconnecting to {}", self.addr);
            link.stream = open_stream(&self.addr).await?;
            link.in_flight = false;
        }

        link.in_flight = true;
        write_frame(&mut link.stream, request).await?;
        let body = read_frame(&mut link.stream)
            .await?
            .ok_or(ClientError::Closed)?;
        link.in_flight = false;

        match decode::<Response>(&body)? {
            Response::Error { kind, message } => Err(ClientError::Server { kind, message }),
            response => Ok(response),
        }
    }

    pub async fn join(&self) -> Result<(ParticipantId, Snapshot), ClientError> {
        match self.call(&Request::Connect).await? {
            Response::Connected {
                participant_id,
                state,
            } => Ok((participant_id, state)),
            other => Err(unexpected(other)),
        }
    }

    pub async fn leave(&self, participant_id: ParticipantId) -> Result<(), ClientError> {
        match self.call(&Request::Disconnect { participant_id }).await? {
            Response::Disconnected => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    pub async fn move_participant(
        &self,
        participant_id: ParticipantId,
        sequence: i64,
        direction: Direction,
    ) -> Result<bool, ClientError> {
        let request = Request::Move {
            participant_id,
            sequence,
            direction,
        };
        match self.call(&request).await? {
            Response::MoveResult { success } => Ok(success),
            other => Err(unexpected(other)),
        }
    }

    pub async fn get_state(&self) -> Result<Snapshot, ClientError> {
        match self.call(&Request::GetState).await? {
            Response::State { state } => Ok(state),
            other => Err(unexpected(other)),
        }
    }

    pub async fn keep_alive(&self, participant_id: ParticipantId) -> Result<(), ClientError> {
        match self.call(&Request::KeepAlive { participant_id }).await? {
            Response::KeepAliveAck => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(response: Response) -> ClientError {
    ClientError::UnexpectedResponse(Box::new(response))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Connected,
    Lost(String),
}

/// A sequenced move produced by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCommand {
    pub sequence: i64,
    pub direction: Direction,
}

/// Handle to a running session and its background tasks
pub struct Session {
    pub participant_id: ParticipantId,
    pub state: watch::Receiver<Snapshot>,
    pub status: watch::Receiver<SessionStatus>,
    connection: Arc<Connection>,
    moves: mpsc::UnboundedSender<MoveCommand>,
    stop: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Session {
    /// Connects, joins the world and starts the background tasks
    pub async fn start(config: &ClientConfig) -> Result<Self, ClientError> {
        let connection = Arc::new(Connection::connect(&config.server_addr).await?);
        let (participant_id, initial) = connection.join().await?;
        info!("Joined as participant {}", participant_id);

        let (state_tx, state_rx) = watch::channel(initial);
        let (status_tx, status_rx) = watch::channel(SessionStatus::Connected);
        let status_tx = Arc::new(status_tx);
        let (moves_tx, moves_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);

        let tasks = vec![
            tokio::spawn(poll_state(
                Arc::clone(&connection),
                state_tx,
                config.clone(),
                stop_rx.clone(),
            )),
            tokio::spawn(send_keep_alives(
                Arc::clone(&connection),
                participant_id,
                Arc::clone(&status_tx),
                config.clone(),
                stop_rx.clone(),
            )),
            tokio::spawn(forward_moves(
                Arc::clone(&connection),
                participant_id,
                moves_rx,
                status_tx,
                stop_rx,
            )),
        ];

        Ok(Session {
            participant_id,
            state: state_rx,
            status: status_rx,
            connection,
            moves: moves_tx,
            stop: stop_tx,
            tasks,
        })
    }

    /// Queues a move; false once the move worker has stopped
    pub fn send_move(&self, command: MoveCommand) -> bool {
        self.moves.send(command).is_ok()
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Stops the background tasks and leaves the world (best effort)
    ///
    /// Tasks stop between calls; one still stuck in a call after
    /// [`SHUTDOWN_GRACE`] is aborted and the connection recovers on the
    /// disconnect call.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);

        for mut task in self.tasks {
            if timeout(SHUTDOWN_GRACE, &mut task).await.is_err() {
                warn!("Background task did not stop in time, aborting it");
                task.abort();
            }
        }

        if let Err(e) = self.connection.leave(self.participant_id).await {
            warn!("Failed to disconnect cleanly: {}", e);
        } else {
            info!("Disconnected participant {}", self.participant_id);
        }
    }
}

/// Refreshes the shared snapshot; transport failures are retried after a delay
async fn poll_state(
    connection: Arc<Connection>,
    state_tx: watch::Sender<Snapshot>,
    config: ClientConfig,
    mut stop: watch::Receiver<bool>,
) {
    loop {
        let delay = match connection.get_state().await {
            Ok(state) => {
                if state_tx.send(state).is_err() {
                    debug!("State receiver dropped, stopping poll");
                    return;
                }
                config.poll_interval
            }
            Err(e) => {
                warn!("Error fetching state: {}", e);
                config.retry_delay
            }
        };

        tokio::select! {
            _ = sleep(delay) => {}
            _ = stop.changed() => return,
        }
    }
}

/// Keep-alive loop; the first failure ends the session
async fn send_keep_alives(
    connection: Arc<Connection>,
    participant_id: ParticipantId,
    status_tx: Arc<watch::Sender<SessionStatus>>,
    config: ClientConfig,
    mut stop: watch::Receiver<bool>,
) {
    let mut ticker = interval(config.keepalive_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = stop.changed() => return,
        }

        if let Err(e) = connection.keep_alive(participant_id).await {
            error!("Keep-alive failed, connection to the server may be lost: {}", e);
            let _ = status_tx.send(SessionStatus::Lost(e.to_string()));
            return;
        }
    }
}

async fn forward_moves(
    connection: Arc<Connection>,
    participant_id: ParticipantId,
    mut moves_rx: mpsc::UnboundedReceiver<MoveCommand>,
    status_tx: Arc<watch::Sender<SessionStatus>>,
    mut stop: watch::Receiver<bool>,
) {
    loop {
        let command = tokio::select! {
            command = moves_rx.recv() => match command {
                Some(command) => command,
                None => return,
            },
            _ = stop.changed() => return,
        };

        match connection
            .move_participant(participant_id, command.sequence, command.direction)
            .await
        {
            Ok(true) => debug!("Move {:?} (seq {}) applied", command.direction, command.sequence),
            Ok(false) => debug!("Move {:?} (seq {}) blocked", command.direction, command.sequence),
            Err(e) if e.is_not_found() => {
                error!("Server no longer knows participant {}", participant_id);
                let _ = status_tx.send(SessionStatus::Lost(e.to_string()));
                return;
            }
            Err(e) => warn!("Error moving: {}", e),
        }
    }
}
