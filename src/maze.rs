use thiserror::Error;

use crate::types::{Cell, Vec2};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze template has no rows")]
    EmptyTemplate,
    #[error("maze template row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("maze template has unknown tile {ch:?} at ({x},{y})")]
    UnknownTile { ch: char, x: usize, y: usize },
}

/// Tile grid with an immutable original layout and a live copy that loses
/// pellets as they are eaten. All coordinate access wraps toroidally.
#[derive(Clone, Debug)]
pub struct Maze {
    width: i32,
    height: i32,
    original: Vec<Vec<Cell>>,
    live: Vec<Vec<Cell>>,
}

impl Maze {
    pub fn from_template(template: &[&str]) -> Result<Self, MazeError> {
        if template.is_empty() || template[0].is_empty() {
            return Err(MazeError::EmptyTemplate);
        }
        let expected = template[0].chars().count();
        let mut original = Vec::with_capacity(template.len());
        for (y, row) in template.iter().enumerate() {
            let found = row.chars().count();
            if found != expected {
                return Err(MazeError::RaggedRow {
                    row: y,
                    expected,
                    found,
                });
            }
            let mut cells = Vec::with_capacity(expected);
            for (x, ch) in row.chars().enumerate() {
                let cell =
                    Cell::from_template_char(ch).ok_or(MazeError::UnknownTile { ch, x, y })?;
                cells.push(cell);
            }
            original.push(cells);
        }

        let live = original.clone();
        Ok(Self {
            width: expected as i32,
            height: template.len() as i32,
            original,
            live,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// `((c % n) + n) % n` on both axes.
    pub fn wrap(&self, x: i32, y: i32) -> Vec2 {
        Vec2 {
            x: (x % self.width + self.width) % self.width,
            y: (y % self.height + self.height) % self.height,
        }
    }

    pub fn cell(&self, x: i32, y: i32) -> Cell {
        let pos = self.wrap(x, y);
        self.live[pos.y as usize][pos.x as usize]
    }

    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) {
        let pos = self.wrap(x, y);
        self.live[pos.y as usize][pos.x as usize] = cell;
    }

    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.cell(x, y) == Cell::Wall
    }

    /// Full scan of the live grid for uneaten pellets of either kind.
    pub fn pellets_remaining(&self) -> usize {
        self.live
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.is_pellet())
            .count()
    }

    /// Copies the original layout back into the live grid.
    pub fn restore(&mut self) {
        for (live_row, original_row) in self.live.iter_mut().zip(self.original.iter()) {
            live_row.copy_from_slice(original_row);
        }
    }

    pub fn live_rows(&self) -> &[Vec<Cell>] {
        &self.live
    }
}
