//! # Screen Calculations
//!
//! Pure functions that turn a [`ProjectConfig`](crate::config::ProjectConfig)
//! and an [`LedModule`](crate::catalog::LedModule) into quantities:
//!
//! - [`grid`] - Snap the target size and resolve the tile grid
//! - [`weight_power`] - Tile counts, screen weight and electrical load
//! - [`rigging`] - Truss, bumpers, hardware and motor loads
//! - [`logistics`] - Line counts, flight cases, multi-cables, resolution
//! - [`routing`] - Data and power cable sequencing over the grid
//! - [`engine`] - The full pipeline producing a [`CalculationResult`]
//!
//! Every type serializes to JSON so results can be stored, diffed, or
//! handed to another tool unchanged.

pub mod engine;
pub mod grid;
pub mod logistics;
pub mod rigging;
pub mod routing;
pub mod weight_power;

// Re-export commonly used types
pub use engine::{calculate, calculate_for, plan, CalculationResult, LayoutPlan};
pub use grid::{CellGrid, TileCell, TileClass, TileGrid};
pub use logistics::{AspectRatio, Resolution};
pub use rigging::{LoadStatus, MotorLoad};
pub use routing::{CableKind, CableRoute, RouteAxis, RouteConfig, RoutePattern, StartCorner};
