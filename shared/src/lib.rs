use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod codec;

pub use codec::{decode, encode, read_frame, write_frame, CodecError, MAX_FRAME_LEN};

pub const DEFAULT_PORT: u16 = 12345;
pub const SPAWN_X: i32 = 2;
pub const SPAWN_Y: i32 = 12;

pub type ParticipantId = u64;

/// Display attribute carried verbatim from the map to the consumer.
///
/// The low byte selects a color, the high bits are style flags. The server
/// never interprets these values.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attr(pub u16);

impl Attr {
    pub const DEFAULT: Attr = Attr(0x0000);
    pub const BLACK: Attr = Attr(0x0001);
    pub const RED: Attr = Attr(0x0002);
    pub const GREEN: Attr = Attr(0x0003);
    pub const YELLOW: Attr = Attr(0x0004);
    pub const BLUE: Attr = Attr(0x0005);
    pub const MAGENTA: Attr = Attr(0x0006);
    pub const CYAN: Attr = Attr(0x0007);
    pub const WHITE: Attr = Attr(0x0008);
    pub const DARK_GRAY: Attr = Attr(0x0009);

    pub const BOLD: Attr = Attr(0x0200);
    pub const DIM: Attr = Attr(0x1000);

    pub const fn with(self, other: Attr) -> Attr {
        Attr(self.0 | other.0)
    }

    /// Color component without style flags
    pub fn color(self) -> Attr {
        Attr(self.0 & 0x00ff)
    }

    pub fn has(self, flag: Attr) -> bool {
        self.0 & flag.0 == flag.0
    }
}

/// One grid location, or the appearance of a participant.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub symbol: char,
    pub fg: Attr,
    pub bg: Attr,
    pub passable: bool,
}

impl Cell {
    pub const fn new(symbol: char, fg: Attr, bg: Attr, passable: bool) -> Self {
        Self {
            symbol,
            fg,
            bg,
            passable,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    /// Unit step as (dx, dy); y grows downwards
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
            Direction::Right => (1, 0),
        }
    }

    /// Maps the classic `w a s d` keys to a direction
    pub fn from_key(key: char) -> Option<Direction> {
        match key.to_ascii_lowercase() {
            'w' => Some(Direction::Up),
            'a' => Some(Direction::Left),
            's' => Some(Direction::Down),
            'd' => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Public part of a participant, as exported in snapshots.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ParticipantView {
    pub id: ParticipantId,
    pub x: i32,
    pub y: i32,
    pub appearance: Cell,
}

/// Point-in-time copy of the whole world.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub grid: Vec<Vec<Cell>>,
    pub participants: HashMap<ParticipantId, ParticipantView>,
}

impl Snapshot {
    pub fn participant_at(&self, x: i32, y: i32) -> Option<&ParticipantView> {
        self.participants.values().find(|p| p.x == x && p.y == y)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Request {
    Connect,
    Disconnect {
        participant_id: ParticipantId,
    },
    Move {
        participant_id: ParticipantId,
        sequence: i64,
        direction: Direction,
    },
    GetState,
    KeepAlive {
        participant_id: ParticipantId,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request named a participant the server does not know
    NotFound,
    /// The request frame could not be decoded
    Malformed,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Response {
    Connected {
        participant_id: ParticipantId,
        state: Snapshot,
    },
    Disconnected,
    MoveResult {
        success: bool,
    },
    State {
        state: Snapshot,
    },
    KeepAliveAck,
    Error {
        kind: ErrorKind,
        message: String,
    },
}
