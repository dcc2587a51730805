//! # Grid Layout Resolver
//!
//! Turns a target screen size and a tile size into an integer tile grid and
//! classifies every cell as a full, half or quarter tile.
//!
//! ## Rules
//!
//! - Target dimensions snap to the nearest 0.5 m.
//! - `cols_full = floor(snapped_w / module_w)`, likewise for rows; any
//!   remainder is dropped.
//! - A trailing half column (row) exists only for tiles exactly 1.0 m wide
//!   (high) when the remainder lies in `[0.4, 0.6]` m.
//! - A cell past the full columns or past the full rows is a half tile; past
//!   both, a quarter tile.
//!
//! ## Example
//!
//! ```rust
//! use ledcalc_core::calculations::grid::TileGrid;
//!
//! // 500 x 1000 mm tiles on a 4.0 x 2.5 m target
//! let grid = TileGrid::resolve(4.0, 2.5, 500.0, 1000.0);
//! assert_eq!((grid.cols, grid.rows), (8, 3));
//! assert!(grid.has_half_row);
//! assert_eq!(grid.num_full, 16);
//! assert_eq!(grid.num_half, 8);
//! assert_eq!(grid.num_quarter, 0);
//! ```

use serde::{Deserialize, Serialize};

use crate::units::{Meters, Millimeters};

/// Only tiles of exactly this size (m) along an axis get a half-tile edge
const HALF_TILE_MODULE_M: f64 = 1.0;

/// Remainder band (m) that is read as "half a tile left over"
const HALF_REMAINDER_MIN_M: f64 = 0.4;
const HALF_REMAINDER_MAX_M: f64 = 0.6;

/// Size class of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileClass {
    Full,
    Half,
    Quarter,
}

/// Resolved tile grid with per-class counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    /// Target width after 0.5 m snapping
    pub snapped_width_m: f64,
    /// Target height after 0.5 m snapping
    pub snapped_height_m: f64,
    /// Tile width in meters
    pub module_width_m: f64,
    /// Tile height in meters
    pub module_height_m: f64,

    pub cols_full: u32,
    pub rows_full: u32,
    pub has_half_col: bool,
    pub has_half_row: bool,

    /// Total columns including a half column
    pub cols: u32,
    /// Total rows including a half row
    pub rows: u32,

    pub num_full: u32,
    pub num_half: u32,
    pub num_quarter: u32,
}

/// True when an axis ends in a half tile
fn has_half_edge(module_m: f64, remainder_m: f64) -> bool {
    module_m == HALF_TILE_MODULE_M
        && (HALF_REMAINDER_MIN_M..=HALF_REMAINDER_MAX_M).contains(&remainder_m)
}

impl TileGrid {
    /// An empty grid (degenerate geometry)
    fn empty(snapped_width_m: f64, snapped_height_m: f64, module_width_m: f64, module_height_m: f64) -> Self {
        TileGrid {
            snapped_width_m,
            snapped_height_m,
            module_width_m,
            module_height_m,
            cols_full: 0,
            rows_full: 0,
            has_half_col: false,
            has_half_row: false,
            cols: 0,
            rows: 0,
            num_full: 0,
            num_half: 0,
            num_quarter: 0,
        }
    }

    /// Resolve the grid for a target size (m) and a tile size (mm).
    ///
    /// Non-positive or non-finite tile dimensions produce an empty grid
    /// instead of dividing by zero.
    pub fn resolve(target_width_m: f64, target_height_m: f64, module_width_mm: f64, module_height_mm: f64) -> Self {
        let snapped_w = Meters(target_width_m).snap_half().0;
        let snapped_h = Meters(target_height_m).snap_half().0;
        let module_w = Meters::from(Millimeters(module_width_mm)).0;
        let module_h = Meters::from(Millimeters(module_height_mm)).0;

        if !(module_w.is_finite() && module_w > 0.0 && module_h.is_finite() && module_h > 0.0) {
            log::warn!(
                "degenerate module size {}x{} mm, returning empty grid",
                module_width_mm,
                module_height_mm
            );
            return TileGrid::empty(snapped_w, snapped_h, module_w.max(0.0), module_h.max(0.0));
        }

        let cols_full = (snapped_w / module_w).floor() as u32;
        let rows_full = (snapped_h / module_h).floor() as u32;
        let rem_w = snapped_w % module_w;
        let rem_h = snapped_h % module_h;

        let has_half_col = has_half_edge(module_w, rem_w);
        let has_half_row = has_half_edge(module_h, rem_h);

        let mut grid = TileGrid {
            snapped_width_m: snapped_w,
            snapped_height_m: snapped_h,
            module_width_m: module_w,
            module_height_m: module_h,
            cols_full,
            rows_full,
            has_half_col,
            has_half_row,
            cols: cols_full.saturating_add(u32::from(has_half_col)),
            rows: rows_full.saturating_add(u32::from(has_half_row)),
            num_full: 0,
            num_half: 0,
            num_quarter: 0,
        };

        for c in 0..grid.cols {
            for r in 0..grid.rows {
                match grid.classify(c, r) {
                    TileClass::Full => grid.num_full += 1,
                    TileClass::Half => grid.num_half += 1,
                    TileClass::Quarter => grid.num_quarter += 1,
                }
            }
        }

        log::debug!(
            "grid: {}x{} cells ({} full, {} half, {} quarter) for {}x{} m",
            grid.cols,
            grid.rows,
            grid.num_full,
            grid.num_half,
            grid.num_quarter,
            snapped_w,
            snapped_h
        );

        grid
    }

    /// Whether column `c` lies in the half-column zone
    pub fn is_half_col(&self, c: u32) -> bool {
        c >= self.cols_full
    }

    /// Whether row `r` lies in the half-row zone
    pub fn is_half_row(&self, r: u32) -> bool {
        r >= self.rows_full
    }

    /// Size class of cell `(c, r)`
    pub fn classify(&self, c: u32, r: u32) -> TileClass {
        match (self.is_half_col(c), self.is_half_row(r)) {
            (false, false) => TileClass::Full,
            (true, true) => TileClass::Quarter,
            _ => TileClass::Half,
        }
    }

    /// Physical width of column `c` in meters
    pub fn column_width_m(&self, c: u32) -> f64 {
        if self.is_half_col(c) {
            self.module_width_m * 0.5
        } else {
            self.module_width_m
        }
    }

    /// Total number of grid cells
    pub fn cell_count(&self) -> u32 {
        self.cols.saturating_mul(self.rows)
    }

    /// Whether the grid holds no cells
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// Lay the grid out as rectangles starting at `(origin_x, origin_y)`,
    /// with full cells of `cell_w × cell_h` (any unit, y grows downwards).
    pub fn layout(&self, origin_x: f64, origin_y: f64, cell_w: f64, cell_h: f64) -> CellGrid {
        let mut cells = Vec::with_capacity(self.cell_count() as usize);
        for c in 0..self.cols {
            let half_width = self.is_half_col(c);
            let w = if half_width { cell_w * 0.5 } else { cell_w };
            let x = if half_width {
                origin_x + self.cols_full as f64 * cell_w + (c - self.cols_full) as f64 * cell_w * 0.5
            } else {
                origin_x + c as f64 * cell_w
            };
            for r in 0..self.rows {
                let half_height = self.is_half_row(r);
                let h = if half_height { cell_h * 0.5 } else { cell_h };
                let y = if half_height {
                    origin_y + self.rows_full as f64 * cell_h + (r - self.rows_full) as f64 * cell_h * 0.5
                } else {
                    origin_y + r as f64 * cell_h
                };
                cells.push(TileCell {
                    col: c,
                    row: r,
                    x,
                    y,
                    width: w,
                    height: h,
                    center_x: x + w / 2.0,
                    center_y: y + h / 2.0,
                    half_width,
                    half_height,
                });
            }
        }
        CellGrid {
            cols: self.cols,
            rows: self.rows,
            cells,
        }
    }

    /// Layout in physical meters, origin at the top-left corner of the screen
    pub fn physical_layout(&self) -> CellGrid {
        self.layout(0.0, 0.0, self.module_width_m, self.module_height_m)
    }
}

/// One positioned grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileCell {
    pub col: u32,
    pub row: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub center_y: f64,
    /// Cell lies in the half-column zone
    pub half_width: bool,
    /// Cell lies in the half-row zone
    pub half_height: bool,
}

impl TileCell {
    /// Size class of this cell
    pub fn class(&self) -> TileClass {
        match (self.half_width, self.half_height) {
            (false, false) => TileClass::Full,
            (true, true) => TileClass::Quarter,
            _ => TileClass::Half,
        }
    }
}

/// Column-major collection of positioned cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellGrid {
    pub cols: u32,
    pub rows: u32,
    cells: Vec<TileCell>,
}

impl CellGrid {
    /// Cell at column `c`, row `r`
    pub fn get(&self, c: u32, r: u32) -> Option<&TileCell> {
        if c >= self.cols || r >= self.rows {
            return None;
        }
        self.cells.get((c * self.rows + r) as usize)
    }

    /// All cells, column-major
    pub fn cells(&self) -> &[TileCell] {
        &self.cells
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether there are no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
