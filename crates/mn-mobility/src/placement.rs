//! Deterministic stationary placement.

use mn_core::{GridLayout, Position};

/// Row-first grid positions for `count` nodes: node `i` sits in column
/// `i % grid_width`, row `i / grid_width`.
pub fn grid_positions(layout: &GridLayout, count: u32) -> Vec<Position> {
    let width = layout.grid_width.max(1);
    (0..count)
        .map(|i| {
            let col = (i % width) as f64;
            let row = (i / width) as f64;
            Position::new(layout.min_x + layout.delta_x * col, layout.min_y + layout.delta_y * row)
        })
        .collect()
}
