//! The static play area and its text map loader
//!
//! The map file holds one grid row per line. Three kinds of cells exist:
//! walls (`▤`, impassable), vegetation (`♣`, passable and decorative) and
//! empty ground (any other character). Rows keep their own length, so bounds
//! are always checked against the row being addressed.

use crate::error::MapError;
use log::info;
use shared::{Attr, Cell};
use std::fs;
use std::path::Path;

pub const WALL: Cell = Cell::new(
    '▤',
    Attr::BLACK.with(Attr::BOLD).with(Attr::DIM),
    Attr::DARK_GRAY,
    false,
);
pub const VEGETATION: Cell = Cell::new('♣', Attr::GREEN, Attr::DEFAULT, true);
pub const EMPTY: Cell = Cell::new(' ', Attr::DEFAULT, Attr::DEFAULT, true);

/// Immutable collection of rows; never changes after load
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Builds a grid from map text, one row per line
    pub fn parse(text: &str) -> Self {
        let rows = text
            .lines()
            .map(|line| line.chars().map(cell_for).collect())
            .collect();
        Self { rows }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        info!("Loading map from {}", path.display());

        let text = fs::read_to_string(path).map_err(|source| MapError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        let grid = Self::parse(&text);
        info!(
            "Map loaded: {} rows, widest row {} cells",
            grid.height(),
            grid.max_width()
        );
        Ok(grid)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn max_width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Cell at (x, y), or `None` when outside the addressed row
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        let row = self.rows.get(usize::try_from(y).ok()?)?;
        row.get(usize::try_from(x).ok()?)
    }

    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_some_and(|cell| cell.passable)
    }

    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows.clone()
    }
}

fn cell_for(symbol: char) -> Cell {
    match symbol {
        s if s == WALL.symbol => WALL,
        s if s == VEGETATION.symbol => VEGETATION,
        _ => EMPTY,
    }
}
