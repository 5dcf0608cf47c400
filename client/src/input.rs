//! Keyboard input turned into sequenced move commands

use crate::network::MoveCommand;
use macroquad::prelude::*;
use shared::Direction;

/// What the player asked for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputEvents {
    pub quit: bool,
    pub movement: Option<MoveCommand>,
}

/// Samples the keyboard and numbers outgoing moves
pub struct InputManager {
    next_sequence: i64,
}

impl InputManager {
    pub fn new() -> Self {
        Self { next_sequence: 1 }
    }

    /// Reads this frame's key presses. At most one move is produced per frame.
    pub fn update(&mut self) -> InputEvents {
        let quit = is_key_pressed(KeyCode::Escape);

        let direction = MOVEMENT_KEYS
            .iter()
            .copied()
            .find(|key| is_key_pressed(*key))
            .and_then(direction_for);

        InputEvents {
            quit,
            movement: direction.map(|d| self.next_move(d)),
        }
    }

    /// Wraps a direction into a move with the next sequence number
    pub fn next_move(&mut self, direction: Direction) -> MoveCommand {
        let command = MoveCommand {
            sequence: self.next_sequence,
            direction,
        };
        self.next_sequence += 1;
        command
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

const MOVEMENT_KEYS: [KeyCode; 8] = [
    KeyCode::W,
    KeyCode::A,
    KeyCode::S,
    KeyCode::D,
    KeyCode::Up,
    KeyCode::Left,
    KeyCode::Down,
    KeyCode::Right,
];

pub fn direction_for(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::W | KeyCode::Up => Some(Direction::Up),
        KeyCode::A | KeyCode::Left => Some(Direction::Left),
        KeyCode::S | KeyCode::Down => Some(Direction::Down),
        KeyCode::D | KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_start_at_one_and_increase() {
        let mut input = InputManager::new();

        let first = input.next_move(Direction::Up);
        let second = input.next_move(Direction::Left);

        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
        assert_eq!(second.direction, Direction::Left);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(direction_for(KeyCode::W), Some(Direction::Up));
        assert_eq!(direction_for(KeyCode::Up), Some(Direction::Up));
        assert_eq!(direction_for(KeyCode::A), Some(Direction::Left));
        assert_eq!(direction_for(KeyCode::S), Some(Direction::Down));
        assert_eq!(direction_for(KeyCode::Right), Some(Direction::Right));
        assert_eq!(direction_for(KeyCode::Space), None);
    }

    #[test]
    fn test_every_movement_key_maps() {
        for key in MOVEMENT_KEYS {
            assert!(direction_for(key).is_some(), "{:?}", key);
        }
    }
}
