//! Uniform-grid bucketing of agents by position.

use std::collections::HashMap;

use boids_core::{Agent, Vec2, WorldBounds};
use smallvec::SmallVec;

type Cell = (i32, i32);

/// Buckets agent indices by grid cell so radius queries only visit nearby
/// cells instead of the whole population.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    columns: i32,
    rows: i32,
    grid: HashMap<Cell, SmallVec<[usize; 8]>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32, bounds: WorldBounds) -> Self {
        SpatialGrid {
            cell_size,
            columns: ((bounds.width / cell_size).ceil() as i32).max(1),
            rows: ((bounds.height / cell_size).ceil() as i32).max(1),
            grid: HashMap::new(),
        }
    }

    /// Get the grid cell coordinates for a position
    fn get_cell(&self, position: Vec2) -> Cell {
        let x = (position.x / self.cell_size).floor() as i32;
        let y = (position.y / self.cell_size).floor() as i32;

        // Clamp to valid range
        (x.clamp(0, self.columns - 1), y.clamp(0, self.rows - 1))
    }

    /// Rebuild the grid from scratch for the given agents
    pub fn rebuild(&mut self, agents: &[Agent]) {
        self.grid.clear();
        for (index, agent) in agents.iter().enumerate() {
            let cell = self.get_cell(agent.position);
            self.grid.entry(cell).or_default().push(index);
        }
    }

    /// Moves one agent's bucket entry after it changed position.
    pub fn relocate(&mut self, index: usize, from: Vec2, to: Vec2) {
        let old_cell = self.get_cell(from);
        let new_cell = self.get_cell(to);
        if old_cell == new_cell {
            return;
        }

        if let Some(bucket) = self.grid.get_mut(&old_cell) {
            bucket.retain(|i| *i != index);
            if bucket.is_empty() {
                self.grid.remove(&old_cell);
            }
        }
        self.grid.entry(new_cell).or_default().push(index);
    }

    /// Indices of every agent in a cell that could lie within `radius` of
    /// `center`, in ascending order.
    ///
    /// This is a superset of the true neighbours; callers still check distance.
    pub fn candidates(&self, center: Vec2, radius: f32) -> Vec<usize> {
        let mut result = Vec::new();
        // No query needs to reach further than the whole grid
        let span = self.columns.max(self.rows);
        let radius_in_cells = (radius / self.cell_size).ceil().min(span as f32) as i32;
        let (cx, cy) = self.get_cell(center);

        for x in (cx - radius_in_cells).max(0)..=(cx + radius_in_cells).min(self.columns - 1) {
            for y in (cy - radius_in_cells).max(0)..=(cy + radius_in_cells).min(self.rows - 1) {
                if let Some(indices) = self.grid.get(&(x, y)) {
                    result.extend_from_slice(indices);
                }
            }
        }

        // Keep scan order identical to a plain linear pass
        result.sort_unstable();
        result
    }

    pub fn len(&self) -> usize {
        self.grid.values().map(|bucket| bucket.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}
