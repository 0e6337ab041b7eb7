//! Food placement by rejection sampling

use std::collections::HashSet;

use rand::Rng;
use tracing::warn;

use super::state::{Arena, Cell};

/// Sampling attempts per food cell before falling back to a scan
const ATTEMPTS_PER_CELL: usize = 4;

/// Pick a free, fully-inside cell for the next food item.
///
/// Draws columns and rows independently and uniformly, rejecting samples that
/// land on `occupied`. After a bounded number of rejections the arena is
/// scanned row by row for the first free cell instead. Returns `None` only
/// when every food cell is occupied.
pub fn place_food<R: Rng + ?Sized>(
    rng: &mut R,
    arena: &Arena,
    occupied: &HashSet<Cell>,
) -> Option<Cell> {
    let columns = arena.food_columns();
    let rows = arena.food_rows();
    if columns <= 0 || rows <= 0 {
        return None;
    }

    let max_attempts = columns as usize * rows as usize * ATTEMPTS_PER_CELL;
    for _ in 0..max_attempts {
        let cell = arena.cell_at(rng.gen_range(0..columns), rng.gen_range(0..rows));
        if !occupied.contains(&cell) {
            return Some(cell);
        }
    }

    warn!(
        occupied = occupied.len(),
        attempts = max_attempts,
        "food sampling exhausted, scanning for a free cell"
    );
    first_free_cell(arena, occupied)
}

fn first_free_cell(arena: &Arena, occupied: &HashSet<Cell>) -> Option<Cell> {
    (0..arena.food_rows())
        .flat_map(|row| (0..arena.food_columns()).map(move |col| (col, row)))
        .map(|(col, row)| arena.cell_at(col, row))
        .find(|cell| !occupied.contains(cell))
}
