//! Uniform-grid spatial hash for broad-phase neighbor queries
//!
//! The table is rebuilt from scratch every detection pass. Cell coordinates
//! are clamped to the canvas grid, so items that drift off-canvas land in the
//! border cells and are still found by queries near the edge.

use std::collections::HashMap;

use glam::{IVec2, Vec2};

#[derive(Debug, Clone)]
pub struct SpatialHash {
    cell_size: f32,
    extent: Vec2,
    /// Number of cells along each axis
    dims: IVec2,
    cells: HashMap<IVec2, Vec<usize>>,
}

impl SpatialHash {
    pub fn new(cell_size: f32, extent: Vec2) -> Self {
        let mut hash = Self {
            cell_size: 1.0,
            extent: Vec2::ONE,
            dims: IVec2::ONE,
            cells: HashMap::new(),
        };
        hash.configure(cell_size, extent);
        hash
    }

    /// Resize the grid; returns true (and empties the table) if anything changed
    pub fn configure(&mut self, cell_size: f32, extent: Vec2) -> bool {
        let cell_size = if cell_size > 0.0 && cell_size.is_finite() {
            cell_size
        } else {
            1.0
        };
        let extent = if extent.cmpgt(Vec2::ZERO).all() && extent.is_finite() {
            extent
        } else {
            Vec2::splat(cell_size)
        };
        if cell_size == self.cell_size && extent == self.extent {
            return false;
        }

        self.cell_size = cell_size;
        self.extent = extent;
        let dims = (extent / cell_size).ceil().max(Vec2::ONE);
        self.dims = IVec2::new(dims.x.min(i32::MAX as f32) as i32, dims.y.min(i32::MAX as f32) as i32);
        self.cells.clear();
        log::debug!(
            "Spatial hash resized: cell {:.1}px, {}x{} cells",
            self.cell_size,
            self.dims.x,
            self.dims.y
        );
        true
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Empty every cell, keeping allocations
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    /// Add an item to every cell its bounding circle overlaps
    pub fn insert(&mut self, index: usize, pos: Vec2, radius: f32) {
        let Some((min, max)) = self.cell_range(pos, radius) else {
            return;
        };
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                self.cells.entry(IVec2::new(x, y)).or_default().push(index);
            }
        }
    }

    /// Candidate indices in every cell the query circle overlaps
    ///
    /// Sorted and free of duplicates.
    pub fn query(&self, pos: Vec2, radius: f32) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_into(pos, radius, &mut out);
        out
    }

    /// `query` into a reusable buffer (cleared first)
    pub fn query_into(&self, pos: Vec2, radius: f32, out: &mut Vec<usize>) {
        out.clear();
        let Some((min, max)) = self.cell_range(pos, radius) else {
            return;
        };
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                if let Some(bucket) = self.cells.get(&IVec2::new(x, y)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
    }

    /// Number of non-empty cells
    pub fn occupied_cells(&self) -> usize {
        self.cells.values().filter(|b| !b.is_empty()).count()
    }

    fn cell_range(&self, pos: Vec2, radius: f32) -> Option<(IVec2, IVec2)> {
        let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        if !pos.is_finite() {
            return None;
        }
        let last = self.dims - IVec2::ONE;
        let to_cell = |p: Vec2| {
            let c = (p / self.cell_size).floor();
            // Float to int casts saturate, then clamp to the grid
            IVec2::new(c.x as i32, c.y as i32).clamp(IVec2::ZERO, last)
        };
        Some((to_cell(pos - radius), to_cell(pos + radius)))
    }
}

impl Default for SpatialHash {
    fn default() -> Self {
        Self::new(1.0, Vec2::ONE)
    }
}
