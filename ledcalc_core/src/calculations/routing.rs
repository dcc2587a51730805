//! # Cable Routing Sequencer
//!
//! Orders the tiles of a grid into the daisy-chain sequence used for data
//! or power cabling, then cuts that sequence into line groups.
//!
//! A route is described by three choices:
//!
//! - **axis**: `Vertical` runs down/up each column before moving to the next
//!   column; `Horizontal` runs along each row.
//! - **start**: the corner the first cable enters. A right-hand start
//!   reverses the column order, a bottom start reverses the row order.
//! - **pattern**: `Straight` walks every pass in the same direction;
//!   `Snake` reverses every other pass so consecutive tiles stay adjacent.
//!
//! The same sequencer serves both cable kinds; only the route and the group
//! interval differ.
//!
//! ## Example
//!
//! ```rust
//! use ledcalc_core::calculations::grid::TileGrid;
//! use ledcalc_core::calculations::routing::{sequence, RouteConfig};
//!
//! let grid = TileGrid::resolve(1.0, 1.0, 500.0, 500.0);
//! let order: Vec<_> = sequence(&grid.physical_layout(), &RouteConfig::snake())
//!     .iter()
//!     .map(|cell| (cell.col, cell.row))
//!     .collect();
//! assert_eq!(order, vec![(0, 0), (0, 1), (1, 1), (1, 0)]);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::grid::{CellGrid, TileCell};

/// Colors cycled through for consecutive line groups
pub const LINE_COLORS: [&str; 10] = [
    "#ef4444", "#f97316", "#f59e0b", "#84cc16", "#10b981", "#06b6d4", "#6366f1", "#a855f7", "#d946ef",
    "#f43f5e",
];

/// Pass pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutePattern {
    /// Serpentine: every other pass is reversed
    #[default]
    Snake,
    /// Every pass runs the same direction
    Straight,
}

/// Primary direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteAxis {
    /// Column by column
    #[default]
    Vertical,
    /// Row by row
    Horizontal,
}

/// Corner where the route begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartCorner {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl StartCorner {
    /// All corners for UI selection
    pub const ALL: [StartCorner; 4] = [
        StartCorner::TopLeft,
        StartCorner::TopRight,
        StartCorner::BottomLeft,
        StartCorner::BottomRight,
    ];

    /// Starts on the right edge
    pub fn is_right(&self) -> bool {
        matches!(self, StartCorner::TopRight | StartCorner::BottomRight)
    }

    /// Starts on the bottom edge
    pub fn is_bottom(&self) -> bool {
        matches!(self, StartCorner::BottomLeft | StartCorner::BottomRight)
    }

    /// Short code ("tl", "tr", "bl", "br")
    pub fn code(&self) -> &'static str {
        match self {
            StartCorner::TopLeft => "tl",
            StartCorner::TopRight => "tr",
            StartCorner::BottomLeft => "bl",
            StartCorner::BottomRight => "br",
        }
    }
}

/// One cable route configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RouteConfig {
    pub pattern: RoutePattern,
    pub axis: RouteAxis,
    pub start: StartCorner,
}

impl RouteConfig {
    /// Vertical serpentine from the top-left corner
    pub fn snake() -> Self {
        RouteConfig {
            pattern: RoutePattern::Snake,
            axis: RouteAxis::Vertical,
            start: StartCorner::TopLeft,
        }
    }

    /// Vertical straight passes from the top-left corner
    pub fn straight() -> Self {
        RouteConfig {
            pattern: RoutePattern::Straight,
            axis: RouteAxis::Vertical,
            start: StartCorner::TopLeft,
        }
    }

    /// Replace the axis
    pub fn with_axis(mut self, axis: RouteAxis) -> Self {
        self.axis = axis;
        self
    }

    /// Replace the start corner
    pub fn with_start(mut self, start: StartCorner) -> Self {
        self.start = start;
        self
    }
}

/// Order the cells of a grid along a route.
///
/// Every cell appears exactly once. The result depends only on the grid and
/// the route, so repeated calls give identical sequences.
pub fn sequence(grid: &CellGrid, route: &RouteConfig) -> Vec<TileCell> {
    let mut col_order: Vec<u32> = (0..grid.cols).collect();
    let mut row_order: Vec<u32> = (0..grid.rows).collect();
    if route.start.is_right() {
        col_order.reverse();
    }
    if route.start.is_bottom() {
        row_order.reverse();
    }

    let (outer, inner) = match route.axis {
        RouteAxis::Vertical => (&col_order, &row_order),
        RouteAxis::Horizontal => (&row_order, &col_order),
    };

    let mut ordered = Vec::with_capacity(grid.len());
    for (pass, &primary) in outer.iter().enumerate() {
        let mut secondary = inner.clone();
        if route.pattern == RoutePattern::Snake && pass % 2 == 1 {
            secondary.reverse();
        }
        for s in secondary {
            let (c, r) = match route.axis {
                RouteAxis::Vertical => (primary, s),
                RouteAxis::Horizontal => (s, primary),
            };
            if let Some(cell) = grid.get(c, r) {
                ordered.push(*cell);
            }
        }
    }
    ordered
}

/// Which cable a route carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CableKind {
    Data,
    Power,
}

impl CableKind {
    /// Group label prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            CableKind::Data => "D",
            CableKind::Power => "P",
        }
    }
}

/// A tile in route order with its line group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutedTile {
    /// Zero-based position in the route
    pub sequence: u32,
    /// Zero-based line group
    pub group: u32,
    pub cell: TileCell,
}

/// A complete cable route, cut into line groups of `interval` tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableRoute {
    pub kind: CableKind,
    pub route: RouteConfig,
    /// Tiles per line group
    pub interval: u32,
    pub tiles: Vec<RoutedTile>,
}

impl CableRoute {
    /// Sequence the grid and assign line groups.
    ///
    /// An interval of 0 is treated as 1.
    pub fn build(kind: CableKind, grid: &CellGrid, route: RouteConfig, interval: u32) -> Self {
        let interval = interval.max(1);
        let tiles = sequence(grid, &route)
            .into_iter()
            .enumerate()
            .map(|(i, cell)| RoutedTile {
                sequence: i as u32,
                group: i as u32 / interval,
                cell,
            })
            .collect();
        CableRoute {
            kind,
            route,
            interval,
            tiles,
        }
    }

    /// Number of line groups
    pub fn group_count(&self) -> u32 {
        (self.tiles.len() as u32).div_ceil(self.interval)
    }

    /// Display label of a group ("D1", "P3", ...)
    pub fn group_label(&self, group: u32) -> String {
        format!("{}{}", self.kind.prefix(), group + 1)
    }

    /// Line color of a group
    pub fn group_color(&self, group: u32) -> &'static str {
        LINE_COLORS[group as usize % LINE_COLORS.len()]
    }

    /// First tile of every group (where a feed enters)
    pub fn group_starts(&self) -> impl Iterator<Item = &RoutedTile> {
        let interval = self.interval;
        self.tiles.iter().filter(move |t| t.sequence % interval == 0)
    }

    /// Consecutive tile pairs that are linked inside a group
    pub fn links(&self) -> impl Iterator<Item = (&RoutedTile, &RoutedTile)> {
        self.tiles
            .windows(2)
            .filter(|pair| pair[0].group == pair[1].group)
            .map(|pair| (&pair[0], &pair[1]))
    }
}
