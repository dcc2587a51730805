//! # ledcalc_core - LED Video Wall Layout & Rigging Engine
//!
//! `ledcalc_core` plans LED video walls for live events. Given a target
//! screen size, a tile (module) from the catalog and the rigging, power and
//! cabling parameters, it computes the tile grid, the weight breakdown, the
//! load on every motor, line and link counts, hardware and flight cases,
//! and the order in which tiles are daisy-chained for data and power.
//!
//! ## Design Philosophy
//!
//! - **Pure**: `calculate` is a total function of its inputs; bad numbers
//!   are sanitized, never propagated as NaN or turned into errors
//! - **JSON-First**: every input and output implements Serialize/Deserialize
//! - **Rich Errors**: structured error types around the engine (catalog,
//!   files, external services)
//!
//! ## Quick Start
//!
//! ```rust
//! use ledcalc_core::{calculate_for, ModuleCatalog, ProjectConfig};
//!
//! let catalog = ModuleCatalog::with_defaults();
//! let config = ProjectConfig::default().with_target(6.0, 3.5);
//!
//! let result = calculate_for(&config, &catalog).unwrap();
//! println!(
//!     "{} tiles, {:.0} kg total, {} power lines",
//!     result.total_modules, result.weight_total_kg, result.power_lines
//! );
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Grid, weight/power, rigging, logistics, routing
//! - [`config`] - Project configuration and its defaults
//! - [`catalog`] - LED module definitions and the stock catalog
//! - [`project`] - Project container (config + catalog + metadata)
//! - [`file_io`] - `.ledp` files with atomic saves and locking
//! - [`advisory`] - Seams for external safety-advice and spec-lookup services
//! - [`report`] - Plain-text report
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod advisory;
pub mod calculations;
pub mod catalog;
pub mod config;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod project;
pub mod report;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, calculate_for, plan, CalculationResult, LayoutPlan};
pub use catalog::{LedModule, ModuleCatalog};
pub use config::ProjectConfig;
pub use errors::{CalcError, CalcResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_project, save_project, FileLock};
pub use project::{Project, ProjectMetadata};
