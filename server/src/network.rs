//! Server network layer: framed request/response over TCP
//!
//! Every accepted connection gets its own task. A connection carries one call
//! at a time (read a request frame, answer with one response frame), while
//! separate connections are served concurrently and meet only at the state
//! store's lock.

use crate::error::EngineError;
use crate::state::StateStore;
use log::{debug, error, info, warn};
use shared::{decode, read_frame, write_frame, CodecError, ErrorKind, Request, Response};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};

/// Maps one request onto the engine and builds the reply
pub async fn dispatch(store: &StateStore, request: Request) -> Response {
    match request {
        Request::Connect => {
            let (participant_id, state) = store.connect().await;
            Response::Connected {
                participant_id,
                state,
            }
        }

        Request::Disconnect { participant_id } => {
            store.disconnect(participant_id).await;
            Response::Disconnected
        }

        Request::Move {
            participant_id,
            sequence,
            direction,
        } => match store
            .move_participant(participant_id, sequence, direction)
            .await
        {
            Ok(success) => Response::MoveResult { success },
            Err(e @ EngineError::NotFound(_)) => Response::Error {
                kind: ErrorKind::NotFound,
                message: e.to_string(),
            },
        },

        Request::GetState => Response::State {
            state: store.get_state().await,
        },

        Request::KeepAlive { participant_id } => {
            store.keep_alive(participant_id).await;
            Response::KeepAliveAck
        }
    }
}

/// TCP front end of the state engine
pub struct Server {
    listener: TcpListener,
    store: StateStore,
}

impl Server {
    pub async fn bind(addr: &str, store: StateStore) -> Result<Self, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server { listener, store })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    debug!("Accepted connection from {}", addr);
                    let store = self.store.clone();

                    tokio::spawn(async move {
                        match handle_connection(stream, store).await {
                            Ok(()) => debug!("Connection from {} closed", addr),
                            Err(e) => error!("Connection from {} failed: {}", addr, e),
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        }
    }
}

async fn handle_connection(mut stream: TcpStream, store: StateStore) -> Result<(), CodecError> {
    stream.set_nodelay(true)?;

    while let Some(body) = read_frame(&mut stream).await? {
        let response = match decode::<Request>(&body) {
            Ok(request) => dispatch(&store, request).await,
            Err(e) => {
                warn!("Malformed request frame: {}", e);
                Response::Error {
                    kind: ErrorKind::Malformed,
                    message: e.to_string(),
                }
            }
        };

        write_frame(&mut stream, &response).await?;
    }

    Ok(())
}
