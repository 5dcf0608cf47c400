use clap::Parser;
use client::config::{
    ClientConfig, DEFAULT_CELL_SIZE, DEFAULT_KEEPALIVE_INTERVAL, DEFAULT_POLL_INTERVAL,
    DEFAULT_RETRY_DELAY,
};
use client::game::ClientGameState;
use client::input::InputManager;
use client::network::Session;
use client::rendering::Renderer;
use log::{info, warn};
use macroquad::prelude::*;
use macroquad::Window;
use shared::DEFAULT_PORT;
use std::time::Duration;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value_t = format!("127.0.0.1:{}", DEFAULT_PORT))]
    server: String,

    /// Milliseconds between state polls
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    poll_ms: u64,

    /// Seconds between keep-alives
    #[arg(long, default_value_t = DEFAULT_KEEPALIVE_INTERVAL.as_secs())]
    keepalive_secs: u64,

    /// Milliseconds to wait before retrying a failed poll
    #[arg(long, default_value_t = DEFAULT_RETRY_DELAY.as_millis() as u64)]
    retry_ms: u64,

    /// Size of one grid cell in pixels
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE)]
    cell_size: f32,
}

impl From<Args> for ClientConfig {
    fn from(args: Args) -> Self {
        ClientConfig {
            server_addr: args.server,
            poll_interval: Duration::from_millis(args.poll_ms.max(1)),
            keepalive_interval: Duration::from_secs(args.keepalive_secs.max(1)),
            retry_delay: Duration::from_millis(args.retry_ms),
            cell_size: args.cell_size,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let config = ClientConfig::from(Args::parse());
    info!("Connecting to: {}", config.server_addr);
    info!("Controls: WASD or arrow keys to move, Esc to quit");

    let runtime = Runtime::new()?;
    let session = runtime.block_on(Session::start(&config))?;

    let renderer = Renderer::new(config.cell_size);
    let initial = session.state.borrow().clone();
    let columns = initial.grid.iter().map(Vec::len).max().unwrap_or(0);
    let (width, height) = renderer.window_size(columns, initial.grid.len());

    let window = Conf {
        window_title: "Grid World".to_string(),
        window_width: width,
        window_height: height,
        ..Default::default()
    };

    Window::from_config(window, run(runtime, session, renderer));
    Ok(())
}

async fn run(runtime: Runtime, mut session: Session, renderer: Renderer) {
    let initial = session.state.borrow_and_update().clone();
    let mut game = ClientGameState::new(session.participant_id, initial);
    let mut input = InputManager::new();

    loop {
        if session.state.has_changed().unwrap_or(false) {
            game.apply_snapshot(session.state.borrow_and_update().clone());
        }
        if session.status.has_changed().unwrap_or(false) {
            let status = session.status.borrow_and_update().clone();
            game.set_status(status);
        }

        let events = input.update();
        if events.quit {
            break;
        }
        if let Some(command) = events.movement {
            if !session.send_move(command) {
                warn!("Move worker stopped; input ignored");
            }
        }

        renderer.render(&game);
        next_frame().await;
    }

    runtime.block_on(session.shutdown());
    info!("Client finished");
}
