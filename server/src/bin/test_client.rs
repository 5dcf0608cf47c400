use shared::{decode, read_frame, write_frame, Direction, Request, Response, DEFAULT_PORT};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::sleep;

async fn call(
    stream: &mut TcpStream,
    request: &Request,
) -> Result<Response, Box<dyn std::error::Error>> {
    write_frame(stream, request).await?;
    let body = read_frame(stream)
        .await?
        .ok_or("server closed the connection")?;
    Ok(decode(&body)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let server_addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| format!("127.0.0.1:{}", DEFAULT_PORT));

    println!("Connecting to {}", server_addr);
    let mut stream = TcpStream::connect(&server_addr).await?;

    let participant_id = match call(&mut stream, &Request::Connect).await? {
        Response::Connected {
            participant_id,
            state,
        } => {
            println!(
                "Connected as participant {} ({} rows, {} participants)",
                participant_id,
                state.grid.len(),
                state.participants.len()
            );
            participant_id
        }
        other => {
            println!("Expected Connected but got: {:?}", other);
            return Ok(());
        }
    };

    // walk a small square, replaying every move once
    let pattern = [
        Direction::Right,
        Direction::Right,
        Direction::Up,
        Direction::Up,
        Direction::Left,
        Direction::Left,
        Direction::Down,
        Direction::Down,
    ];

    for (i, direction) in pattern.iter().enumerate() {
        let sequence = i as i64 + 1;
        let request = Request::Move {
            participant_id,
            sequence,
            direction: *direction,
        };

        let first = call(&mut stream, &request).await?;
        let replay = call(&mut stream, &request).await?;
        println!(
            "Move {:?} (seq {}): {:?}, replay: {:?}",
            direction, sequence, first, replay
        );

        if let Response::State { state } = call(&mut stream, &Request::GetState).await? {
            if let Some(me) = state.participants.get(&participant_id) {
                println!("  now at ({}, {})", me.x, me.y);
            }
        }

        call(&mut stream, &Request::KeepAlive { participant_id }).await?;
        sleep(Duration::from_millis(250)).await;
    }

    println!("Sending disconnect");
    call(&mut stream, &Request::Disconnect { participant_id }).await?;

    println!("Test client finished");
    Ok(())
}
