//! The fixed 5×5 color grid.
//!
//! Cells are keyed `A1`..`E5`: the letter picks the row, the digit the
//! column. Both map to a zero-based index.

use huehint_protocol::GridPosition;
use rand::Rng;
use serde::Serialize;

/// Side length of the grid.
pub const GRID_SIZE: u8 = 5;

const ROW_LETTERS: &[u8; 5] = b"ABCDE";
const COL_DIGITS: &[u8; 5] = b"12345";

/// Cell keys and their colors, row-major.
const GRID_MAP: [(&str, &str); 25] = [
    ("A1", "#33FF57"),
    ("A2", "#3357FF"),
    ("A3", "#F39C12"),
    ("A4", "#8E44AD"),
    ("A5", "#1ABC9C"),
    ("B1", "#2ECC71"),
    ("B2", "#E74C3C"),
    ("B3", "#3498DB"),
    ("B4", "#9B59B6"),
    ("B5", "#E67E22"),
    ("C1", "#BDC3C7"),
    ("C2", "#34495E"),
    ("C3", "#16A085"),
    ("C4", "#27AE60"),
    ("C5", "#2980B9"),
    ("D1", "#D35400"),
    ("D2", "#7F8C8D"),
    ("D3", "#C0392B"),
    ("D4", "#F1C40F"),
    ("D5", "#E84393"),
    ("E1", "#6C5CE7"),
    ("E2", "#00CEC9"),
    ("E3", "#FD79A8"),
    ("E4", "#FAB1A0"),
    ("E5", "#FFFFFF"),
];

/// One resolved grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetCell {
    pub key: &'static str,
    pub color: &'static str,
    pub position: GridPosition,
}

/// Read-only access to the grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridCatalog;

impl GridCatalog {
    /// All 25 cells, row by row.
    pub fn cells() -> impl Iterator<Item = TargetCell> {
        (0..GRID_MAP.len()).map(cell_at)
    }

    /// Looks up a cell by key. Keys are case-sensitive (`"c3"` is unknown).
    pub fn resolve(key: &str) -> Option<TargetCell> {
        let bytes = key.as_bytes();
        let [letter, digit] = bytes else {
            return None;
        };
        let row = ROW_LETTERS.iter().position(|l| l == letter)?;
        let col = COL_DIGITS.iter().position(|d| d == digit)?;
        Some(cell_at(row * GRID_SIZE as usize + col))
    }

    /// Picks a cell uniformly at random.
    pub fn random_cell<R: Rng + ?Sized>(rng: &mut R) -> TargetCell {
        cell_at(rng.random_range(0..GRID_MAP.len()))
    }

    /// Returns `true` if `(row, col)` lies on the grid.
    pub fn contains(row: i32, col: i32) -> bool {
        let size = i32::from(GRID_SIZE);
        (0..size).contains(&row) && (0..size).contains(&col)
    }
}

fn cell_at(index: usize) -> TargetCell {
    let (key, color) = GRID_MAP[index];
    let size = GRID_SIZE as usize;
    TargetCell {
        key,
        color,
        position: GridPosition::new((index / size) as u8, (index % size) as u8),
    }
}
