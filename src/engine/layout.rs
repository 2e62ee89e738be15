//! Grid layout generation
//!
//! Builds the item arena from the input units and grid settings. The arena is
//! replaced wholesale when its structural key changes; between changes only
//! the per-frame slots (`transformed`, `collision_offset`) are overwritten.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::transform::Transform;
use crate::settings::{Distribution, GridSettings, Tokenization};

/// One displayed unit in the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridItem {
    /// Display symbol (may be blank)
    pub symbol: String,
    /// Cell center plus tracking/line spacing
    pub base: Vec2,
    pub row: u32,
    pub col: u32,
    pub total_rows: u32,
    pub total_cols: u32,
    /// Cell width and height
    pub cell: Vec2,
    /// Radians; written by the phase cache
    pub spatial_phase: f32,
    /// Per-frame output
    pub transformed: Transform,
    /// Per-frame collision deflection, already merged into `transformed`
    pub collision_offset: Vec2,
}

impl GridItem {
    pub fn new(symbol: &str, row: u32, col: u32, rows: u32, cols: u32, cell: Vec2, offset: Vec2) -> Self {
        let base = Vec2::new(
            (col as f32 + 0.5) * cell.x + offset.x,
            (row as f32 + 0.5) * cell.y + offset.y,
        );
        Self {
            symbol: symbol.to_owned(),
            base,
            row,
            col,
            total_rows: rows,
            total_cols: cols,
            cell,
            spatial_phase: 0.0,
            transformed: Transform::at(base),
            collision_offset: Vec2::ZERO,
        }
    }

    /// Blank items are laid out and animated but never collide
    pub fn is_blank(&self) -> bool {
        self.symbol.trim().is_empty()
    }
}

/// Build the item list for a grid (pure, uncached)
///
/// Degenerate input (no units, zero rows/columns, empty canvas) gives an
/// empty list.
pub fn build_layout(units: &[String], grid: &GridSettings, canvas: Vec2) -> Vec<GridItem> {
    let (cols, rows) = (grid.columns, grid.rows);
    if units.is_empty() || cols == 0 || rows == 0 {
        return Vec::new();
    }
    if !(canvas.x > 0.0 && canvas.y > 0.0 && canvas.is_finite()) {
        return Vec::new();
    }

    let cell = Vec2::new(canvas.x / cols as f32, canvas.y / rows as f32);
    let offset = Vec2::new(
        finite_or_zero(grid.tracking),
        finite_or_zero(grid.line_spacing),
    );
    let item = |symbol: &str, row: u32, col: u32| GridItem::new(symbol, row, col, rows, cols, cell, offset);

    match grid.distribution {
        Distribution::Repeat => {
            let mut items = Vec::with_capacity((rows as usize).saturating_mul(cols as usize));
            let mut next = units.iter().cycle();
            for row in 0..rows {
                for col in 0..cols {
                    let symbol = next.next().map(String::as_str).unwrap_or_default();
                    items.push(item(symbol, row, col));
                }
            }
            items
        }
        Distribution::SplitLetter => (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .zip(units)
            .map(|((row, col), symbol)| item(symbol.as_str(), row, col))
            .collect(),
        Distribution::SplitWord => units
            .iter()
            .take(rows as usize)
            .enumerate()
            .map(|(row, word)| item(word.as_str(), row as u32, 0))
            .collect(),
    }
}

#[inline]
fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

/// Non-finite canvases build nothing, same as an empty one
#[inline]
fn finite_canvas(canvas: Vec2) -> Vec2 {
    if canvas.is_finite() { canvas } else { Vec2::ZERO }
}

/// Structural inputs of a layout
///
/// Float fields are stored as `build_layout` sees them, so non-finite input
/// compares equal to itself.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutKey {
    pub units: Vec<String>,
    pub tokenization: Tokenization,
    pub distribution: Distribution,
    pub columns: u32,
    pub rows: u32,
    pub tracking: f32,
    pub line_spacing: f32,
    pub canvas: Vec2,
}

impl LayoutKey {
    pub fn new(units: &[String], tokenization: Tokenization, grid: &GridSettings, canvas: Vec2) -> Self {
        Self {
            units: units.to_vec(),
            tokenization,
            distribution: grid.distribution,
            columns: grid.columns,
            rows: grid.rows,
            tracking: finite_or_zero(grid.tracking),
            line_spacing: finite_or_zero(grid.line_spacing),
            canvas: finite_canvas(canvas),
        }
    }

    /// Compare against fresh inputs without allocating a new key
    pub fn matches(&self, units: &[String], tokenization: Tokenization, grid: &GridSettings, canvas: Vec2) -> bool {
        self.tokenization == tokenization
            && self.distribution == grid.distribution
            && self.columns == grid.columns
            && self.rows == grid.rows
            && self.tracking == finite_or_zero(grid.tracking)
            && self.line_spacing == finite_or_zero(grid.line_spacing)
            && self.canvas == finite_canvas(canvas)
            && self.units.as_slice() == units
    }
}

/// Layout arena gated by a structural key
#[derive(Debug, Default)]
pub struct LayoutCache {
    key: Option<LayoutKey>,
    items: Vec<GridItem>,
    /// Bumped on every regeneration
    generation: u64,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Regenerate the items if the structural key changed
    ///
    /// Returns true when the arena was replaced.
    pub fn ensure(
        &mut self,
        units: &[String],
        tokenization: Tokenization,
        grid: &GridSettings,
        canvas: Vec2,
    ) -> bool {
        if let Some(key) = &self.key {
            if key.matches(units, tokenization, grid, canvas) {
                return false;
            }
        }

        self.items = build_layout(units, grid, canvas);
        self.key = Some(LayoutKey::new(units, tokenization, grid, canvas));
        self.generation += 1;
        log::info!(
            "Layout regenerated: {} items ({}x{}, {})",
            self.items.len(),
            grid.columns,
            grid.rows,
            grid.distribution.as_str()
        );
        true
    }

    /// Force regeneration on the next `ensure`
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn items(&self) -> &[GridItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [GridItem] {
        &mut self.items
    }
}
