// src/maze.rs
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const WALL_CHAR: char = '#';
const PASSAGE_CHAR: char = '.';

/// Клетка сетки: стена или проход
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub is_wall: bool,
}

impl Cell {
    pub const WALL: Cell = Cell { is_wall: true };
    pub const PASSAGE: Cell = Cell { is_wall: false };
}

/// Двумерная сетка лабиринта `height × width`, построчно
///
/// Координаты задаются как `(row, col)`. Внешнее кольцо — стены, кроме входа `(1, 0)`
/// и выхода `(height - 2, width - 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Maze {
    /// Создаёт сетку, целиком заполненную стенами
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::WALL; width * height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// Клетки за пределами сетки считаются стенами
    #[must_use]
    pub fn is_wall(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_none_or(|cell| cell.is_wall)
    }

    pub(crate) fn set_wall(&mut self, row: usize, col: usize, is_wall: bool) {
        self.cells[row * self.width + col].is_wall = is_wall;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Все клетки-проходы в порядке обхода строк
    pub fn passage_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_wall)
            .map(|(i, _)| (i / self.width, i % self.width))
    }

    #[must_use]
    pub fn passage_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_wall).count()
    }

    /// Стартовая клетка карвинга
    #[must_use]
    pub fn start(&self) -> (usize, usize) {
        (1, 1)
    }

    #[must_use]
    pub fn entrance(&self) -> (usize, usize) {
        (1, 0)
    }

    #[must_use]
    pub fn exit(&self) -> (usize, usize) {
        (self.height.saturating_sub(2), self.width.saturating_sub(1))
    }

    /// Лежит ли клетка на внешнем кольце
    #[must_use]
    pub fn is_boundary(&self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row + 1 == self.height || col + 1 == self.width
    }

    fn row_strings(&self) -> Vec<String> {
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|cell| if cell.is_wall { WALL_CHAR } else { PASSAGE_CHAR })
                    .collect()
            })
            .collect()
    }
}

/// Компактная форма для JSON: строки из `#` (стена) и `.` (проход)
#[derive(Serialize, Deserialize)]
struct MazeRepr {
    width: usize,
    height: usize,
    rows: Vec<String>,
}

impl Serialize for Maze {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MazeRepr {
            width: self.width,
            height: self.height,
            rows: self.row_strings(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Maze {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = MazeRepr::deserialize(deserializer)?;
        if repr.rows.len() != repr.height {
            return Err(D::Error::custom(format!(
                "expected {} rows, got {}",
                repr.height,
                repr.rows.len()
            )));
        }

        let mut cells = Vec::with_capacity(repr.width * repr.height);
        for (row, line) in repr.rows.iter().enumerate() {
            if line.chars().count() != repr.width {
                return Err(D::Error::custom(format!(
                    "row {row} has {} cells, expected {}",
                    line.chars().count(),
                    repr.width
                )));
            }
            for ch in line.chars() {
                cells.push(match ch {
                    WALL_CHAR => Cell::WALL,
                    PASSAGE_CHAR => Cell::PASSAGE,
                    other => {
                        return Err(D::Error::custom(format!(
                            "unexpected cell character {other:?} in row {row}"
                        )));
                    }
                });
            }
        }

        Ok(Self {
            width: repr.width,
            height: repr.height,
            cells,
        })
    }
}
