//! # Layout & Rigging Calculation
//!
//! Runs the full pipeline for one `(ProjectConfig, LedModule)` snapshot:
//!
//! 1. Resolve the tile grid
//! 2. Count tiles and aggregate weight and power
//! 3. Rigging weight, hardware and motor loads
//! 4. Line counts, cases, multi-cables and resolution
//!
//! The result is recomputed from scratch on every call and depends on
//! nothing but the inputs. Degenerate inputs produce an all-zero result
//! instead of an error.
//!
//! ## Example
//!
//! ```rust
//! use ledcalc_core::calculations::calculate;
//! use ledcalc_core::catalog::ModuleCatalog;
//! use ledcalc_core::config::ProjectConfig;
//!
//! let config = ProjectConfig::default();
//! let catalog = ModuleCatalog::with_defaults();
//! let module = catalog.require(&config.module_id).unwrap();
//!
//! let result = calculate(&config, module);
//! assert_eq!((result.cols, result.rows), (8, 5));
//! assert_eq!(result.aspect_ratio.unwrap().to_string(), "8:5");
//! println!("Total weight: {:.0} kg", result.weight_total_kg);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::grid::TileGrid;
use crate::calculations::logistics::{self, AspectRatio, Resolution};
use crate::calculations::rigging::{distribute_motor_loads, rigging_summary, MotorLoad};
use crate::calculations::routing::{CableKind, CableRoute};
use crate::calculations::weight_power::{aggregate, TileCounts};
use crate::catalog::{LedModule, ModuleCatalog};
use crate::config::ProjectConfig;
use crate::errors::CalcResult;

/// Everything derived from one configuration.
///
/// ## JSON Example (abridged)
///
/// ```json
/// {
///   "cols": 8,
///   "rows": 5,
///   "total_modules": 40,
///   "weight_screen_kg": 300.0,
///   "weight_rigging_kg": 94.0,
///   "weight_suspended_kg": 402.0,
///   "weight_total_kg": 502.0,
///   "power_total_w": 5200.0,
///   "power_lines": 4,
///   "data_lines": 3,
///   "aspect_ratio": { "width": 8, "height": 5 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    // === Grid ===
    pub cols: u32,
    pub rows: u32,
    pub cols_full: u32,
    pub rows_full: u32,
    pub has_half_col: bool,
    pub has_half_row: bool,

    // === Tile counts ===
    /// All tiles, special tiles included
    pub total_modules: u32,
    /// Standard full tiles after special-tile substitution
    pub modules_full: u32,
    pub modules_half: u32,
    pub modules_quarter: u32,
    pub modules_special: u32,

    // === Dimensions ===
    /// Snapped screen width (m)
    pub real_width_m: f64,
    /// Snapped screen height (m)
    pub real_height_m: f64,
    pub area_m2: f64,
    pub resolution_x: u64,
    pub resolution_y: u64,
    /// Reduced pixel aspect ratio; None when either resolution is 0
    pub aspect_ratio: Option<AspectRatio>,

    // === Weight ===
    pub weight_screen_kg: f64,
    pub weight_rigging_kg: f64,
    pub weight_cables_kg: f64,
    /// `screen + rigging + cables`: everything hanging from the motors
    pub weight_suspended_kg: f64,
    /// Self-weight of all motors (flown only)
    pub weight_motors_kg: f64,
    /// `suspended + motors`
    pub weight_total_kg: f64,

    // === Power ===
    pub power_total_w: f64,
    pub amps_total: f64,
    pub amps_3phase: f64,
    pub power_lines: u32,
    pub data_lines: u32,

    // === Rigging ===
    pub bumpers_1m: u32,
    pub bumpers_05m: u32,
    /// One entry per motor (flown only)
    pub motor_loads: Vec<MotorLoad>,
    pub required_truss_m: f64,
    pub selected_truss_m: f64,
    pub truss_auto_estimated: bool,

    // === Hardware ===
    pub truss_spigots: u32,
    pub truss_pins: u32,
    pub stack_half_couplers: u32,
    pub stack_pins: u32,

    // === Logistics ===
    pub required_multi_cables: u32,
    pub selected_multi_cables: u32,
    pub fly_cases_main: u32,
    pub fly_cases_small: u32,
    pub power_links: u32,
    pub data_links: u32,
    pub total_breakouts: u32,
}

impl CalculationResult {
    /// True if any motor lifts more than its capacity
    pub fn any_motor_overloaded(&self) -> bool {
        self.motor_loads.iter().any(MotorLoad::is_overloaded)
    }

    /// Highest motor utilization (0 without motors)
    pub fn max_motor_utilization(&self) -> f64 {
        self.motor_loads
            .iter()
            .map(|m| m.utilization)
            .fold(0.0, f64::max)
    }

    /// Whether the configuration resolved to no tiles at all
    pub fn is_empty(&self) -> bool {
        self.total_modules == 0
    }
}

/// Run the calculation for one configuration and module snapshot.
///
/// Never fails: invalid numbers are sanitized, degenerate geometry yields
/// zeros, unsupported motor counts use a uniform split.
pub fn calculate(config: &ProjectConfig, module: &LedModule) -> CalculationResult {
    let config = config.sanitized();

    // 1. Grid
    let grid = TileGrid::resolve(
        config.target_width_m,
        config.target_height_m,
        module.width_mm,
        module.height_mm,
    );
    // No tiles means no screen to rig or power
    let (real_width_m, real_height_m) = if grid.is_empty() {
        (0.0, 0.0)
    } else {
        (grid.snapped_width_m, grid.snapped_height_m)
    };

    // 2. Weight & power
    let special = if grid.is_empty() {
        if config.special.total() > 0 {
            log::warn!(
                "{} special tiles ignored: no tiles fit the target",
                config.special.total()
            );
        }
        0
    } else {
        config.special.total()
    };
    let counts = TileCounts::from_grid(&grid, special);
    let screen = aggregate(
        &counts,
        config.effective_weight_kg(module),
        module.power_w.max(0.0),
        config.voltage_v,
    );

    // 3. Rigging
    let rigging = rigging_summary(
        &grid,
        config.installation,
        &config.truss,
        &config.hardware,
        &config.stacking,
        real_width_m,
    );

    let weight_suspended_kg = screen.weight_screen_kg + rigging.weight_rigging_kg + screen.weight_cables_kg;
    let (weight_motors_kg, motor_loads) = if config.installation.is_flown() && !grid.is_empty() {
        let motor_count = config.effective_motor_count();
        let loads = distribute_motor_loads(
            weight_suspended_kg,
            config.effective_safety_factor(),
            &config.motors,
            real_width_m,
        );
        (motor_count as f64 * config.motors.self_weight_kg, loads)
    } else {
        (0.0, Vec::new())
    };
    let weight_total_kg = weight_suspended_kg + weight_motors_kg;

    // 4. Logistics
    let logistics = logistics::compute(&counts, &config.intervals, &config.multi_cable);
    let resolution = Resolution::for_screen(
        real_width_m,
        real_height_m,
        module.width_mm,
        module.height_mm,
        config.effective_pixels_h(module),
        config.effective_pixels_v(module),
    );

    log::debug!(
        "{} tiles, suspended {:.1} kg, total {:.1} kg, {:.0} W, {} motors",
        counts.total,
        weight_suspended_kg,
        weight_total_kg,
        screen.power_total_w,
        motor_loads.len()
    );

    CalculationResult {
        cols: grid.cols,
        rows: grid.rows,
        cols_full: grid.cols_full,
        rows_full: grid.rows_full,
        has_half_col: grid.has_half_col,
        has_half_row: grid.has_half_row,

        total_modules: counts.total,
        modules_full: counts.full_adjusted,
        modules_half: counts.half,
        modules_quarter: counts.quarter,
        modules_special: counts.special,

        real_width_m,
        real_height_m,
        area_m2: real_width_m * real_height_m,
        resolution_x: resolution.x,
        resolution_y: resolution.y,
        aspect_ratio: resolution.aspect_ratio(),

        weight_screen_kg: screen.weight_screen_kg,
        weight_rigging_kg: rigging.weight_rigging_kg,
        weight_cables_kg: screen.weight_cables_kg,
        weight_suspended_kg,
        weight_motors_kg,
        weight_total_kg,

        power_total_w: screen.power_total_w,
        amps_total: screen.amps_total,
        amps_3phase: screen.amps_3phase,
        power_lines: logistics.power_lines,
        data_lines: logistics.data_lines,

        bumpers_1m: rigging.bumpers_1m,
        bumpers_05m: rigging.bumpers_05m,
        motor_loads,
        required_truss_m: rigging.required_truss_m,
        selected_truss_m: rigging.selected_truss_m,
        truss_auto_estimated: rigging.truss_auto_estimated,

        truss_spigots: rigging.truss_spigots,
        truss_pins: rigging.truss_pins,
        stack_half_couplers: rigging.stack_half_couplers,
        stack_pins: rigging.stack_pins,

        required_multi_cables: logistics.required_multi_cables,
        selected_multi_cables: logistics.selected_multi_cables,
        fly_cases_main: logistics.fly_cases_main,
        fly_cases_small: logistics.fly_cases_small,
        power_links: logistics.power_links,
        data_links: logistics.data_links,
        total_breakouts: logistics.total_breakouts,
    }
}

/// Resolve the selected module from a catalog and run the calculation.
///
/// Fails only with `ModuleNotFound`.
pub fn calculate_for(config: &ProjectConfig, catalog: &ModuleCatalog) -> CalcResult<CalculationResult> {
    let module = catalog.require(&config.module_id)?;
    Ok(calculate(config, module))
}

/// Calculation result plus the two cable routes, ready for drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub result: CalculationResult,
    /// Tile grid the routes were sequenced on
    pub grid: TileGrid,
    pub data_route: CableRoute,
    pub power_route: CableRoute,
}

/// Run the calculation and sequence both cable routes on the physical
/// tile layout (meters, origin top-left).
pub fn plan(config: &ProjectConfig, module: &LedModule) -> LayoutPlan {
    let result = calculate(config, module);
    let config = config.sanitized();
    let grid = TileGrid::resolve(
        config.target_width_m,
        config.target_height_m,
        module.width_mm,
        module.height_mm,
    );
    let cells = grid.physical_layout();
    let data_route = CableRoute::build(
        CableKind::Data,
        &cells,
        config.data_route,
        config.intervals.signal_reel,
    );
    let power_route = CableRoute::build(
        CableKind::Power,
        &cells,
        config.power_route,
        config.intervals.feed_cable,
    );
    LayoutPlan {
        result,
        grid,
        data_route,
        power_route,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::rigging::LoadStatus;
    use crate::catalog::DEFAULT_MODULES;
    use crate::config::{
        InstallationType, ModuleOverrides, MotorConfig, SpecialModules, StackingConfig,
    };
    use uuid::Uuid;

    fn reference_module() -> LedModule {
        LedModule {
            id: Uuid::from_u128(100),
            brand: "Test".to_string(),
            model: "500".to_string(),
            width_mm: 500.0,
            height_mm: 500.0,
            weight_kg: 7.5,
            power_w: 130.0,
            pixels_h: 200,
            pixels_v: 200,
        }
    }

    fn reference_config() -> ProjectConfig {
        ProjectConfig::default()
            .with_module(Uuid::from_u128(100))
            .with_target(4.0, 2.5)
    }

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_reference_scenario() {
        let result = calculate(&reference_config(), &reference_module());

        assert_eq!((result.cols, result.rows), (8, 5));
        assert_eq!(result.total_modules, 40);
        assert_eq!(result.modules_full, 40);
        assert_eq!(result.modules_half + result.modules_quarter, 0);

        assert!(close(result.weight_screen_kg, 300.0, 1e-9));
        assert!(close(result.weight_rigging_kg, 94.0, 1e-9));
        assert!(close(result.weight_cables_kg, 8.0, 1e-9));
        assert!(close(result.weight_suspended_kg, 402.0, 1e-9));
        assert!(close(result.weight_motors_kg, 100.0, 1e-9));
        assert!(close(result.weight_total_kg, 502.0, 1e-9));

        assert_eq!(result.motor_loads.len(), 2);
        for motor in &result.motor_loads {
            assert!(close(motor.lift_kg, 201.0, 1e-9));
            assert!(close(motor.self_kg, 50.0, 1e-9));
            assert!(close(motor.total_kg, 251.0, 1e-9));
            assert_eq!(motor.status, LoadStatus::Ok);
        }
        assert!(!result.any_motor_overloaded());

        assert!(close(result.power_total_w, 5200.0, 1e-9));
        assert!(close(result.amps_total, 22.6, 0.01));
        assert!(close(result.amps_3phase, 7.54, 0.01));
        assert_eq!(result.power_lines, 4);
        assert_eq!(result.data_lines, 3);

        assert_eq!((result.resolution_x, result.resolution_y), (1600, 1000));
        assert_eq!(result.aspect_ratio.unwrap().to_string(), "8:5");
        assert!(close(result.area_m2, 10.0, 1e-9));
    }

    #[test]
    fn test_special_tile_substitution() {
        let module = reference_module();
        let base = calculate(&reference_config(), &module);
        let config = reference_config().with_special_modules(SpecialModules {
            corner_left: 1,
            corner_right: 1,
            flex: 1,
        });
        let result = calculate(&config, &module);

        assert_eq!(result.modules_full, 37);
        assert_eq!(result.modules_special, 3);
        assert_eq!(result.total_modules, 40);
        assert_eq!(result.weight_screen_kg, base.weight_screen_kg);
    }

    #[test]
    fn test_weight_decomposition() {
        let module = reference_module();
        for config in [
            reference_config(),
            reference_config().with_target(6.3, 3.7).with_safety_factor(1.5),
            reference_config().with_installation(InstallationType::Stacked),
            reference_config().with_truss_segment(3.0, 2),
        ] {
            let r = calculate(&config, &module);
            assert!(close(r.weight_total_kg, r.weight_suspended_kg + r.weight_motors_kg, 1e-9));
            assert!(close(
                r.weight_suspended_kg,
                r.weight_screen_kg + r.weight_rigging_kg + r.total_modules as f64 * 0.2,
                1e-9
            ));
            assert_eq!(
                r.modules_full + r.modules_half + r.modules_quarter + r.modules_special,
                r.total_modules
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let module = DEFAULT_MODULES[6].clone();
        let config = ProjectConfig::default()
            .with_module(module.id)
            .with_target(7.2, 4.1)
            .with_motors(MotorConfig {
                count: 5,
                ..MotorConfig::default()
            });
        assert_eq!(calculate(&config, &module), calculate(&config, &module));
        assert_eq!(plan(&config, &module), plan(&config, &module));
    }

    #[test]
    fn test_stacked_has_no_motors() {
        let config = reference_config()
            .with_installation(InstallationType::Stacked)
            .with_stacking(StackingConfig {
                base_plates: 2,
                ..StackingConfig::default()
            });
        let result = calculate(&config, &reference_module());
        assert!(result.motor_loads.is_empty());
        assert_eq!(result.weight_motors_kg, 0.0);
        assert_eq!(result.weight_rigging_kg, 0.0);
        assert_eq!(result.stack_pins, 8);
        assert!(close(result.weight_total_kg, 308.0, 1e-9));
    }

    #[test]
    fn test_degenerate_module_gives_zero_result() {
        let mut module = reference_module();
        module.width_mm = 0.0;
        let result = calculate(&reference_config(), &module);
        assert!(result.is_empty());
        assert_eq!(result.real_width_m, 0.0);
        assert!(result.motor_loads.is_empty());
        assert_eq!(result.weight_rigging_kg, 0.0);
        assert_eq!(result.power_lines, 0);
        assert_eq!(result.weight_total_kg, 0.0);
        assert_eq!(result.resolution_x, 0);
        assert!(result.aspect_ratio.is_none());
    }

    #[test]
    fn test_zero_target() {
        let result = calculate(&reference_config().with_target(0.0, 0.0), &reference_module());
        assert!(result.is_empty());
        assert_eq!(result.weight_total_kg, 0.0);
        assert_eq!(result.cols, 0);
        assert!(result.aspect_ratio.is_none());
    }

    #[test]
    fn test_zero_target_ignores_special_tiles() {
        let config = reference_config()
            .with_target(0.0, 0.0)
            .with_special_modules(SpecialModules {
                corner_left: 2,
                corner_right: 0,
                flex: 1,
            });
        let result = calculate(&config, &reference_module());
        assert!(result.is_empty());
        assert_eq!(result.modules_special, 0);
        assert_eq!(result.weight_screen_kg, 0.0);
        assert_eq!(result.weight_suspended_kg, 0.0);
        assert_eq!(result.power_total_w, 0.0);
        assert_eq!(result.power_lines, 0);
        assert_eq!(result.fly_cases_main, 0);
        assert_eq!(result.weight_total_kg, 0.0);

        let plan = plan(&config, &reference_module());
        assert_eq!(plan.power_route.tiles.len() as u32, plan.result.power_lines);
        assert_eq!(plan.power_route.group_count(), 0);
    }

    #[test]
    fn test_extreme_counts_from_file_saturate() {
        let mut value = serde_json::to_value(reference_config().with_truss_segment(2.0, 600_000_000)).unwrap();
        value["special"]["corner_left"] = serde_json::json!(u32::MAX);
        value["special"]["flex"] = serde_json::json!(1);
        let config: ProjectConfig = serde_json::from_value(value).unwrap();
        assert!(config.validate().is_ok());

        let result = calculate(&config, &reference_module());
        assert_eq!(result.modules_special, u32::MAX);
        assert_eq!(result.modules_full, 0);
        assert_eq!(result.total_modules, u32::MAX);
        assert_eq!(result.truss_pins, u32::MAX);
        assert_eq!(result.truss_spigots, 599_999_999 * 4);
        assert!(result.weight_total_kg.is_finite());

        let stacked = config
            .with_installation(InstallationType::Stacked)
            .with_stacking(StackingConfig {
                base_plates: u32::MAX,
                ..StackingConfig::default()
            });
        let result = calculate(&stacked, &reference_module());
        assert_eq!(result.stack_half_couplers, u32::MAX);
        assert_eq!(result.stack_pins, u32::MAX);
    }

    #[test]
    fn test_overrides_change_weight_and_resolution() {
        let config = reference_config().with_overrides(ModuleOverrides {
            weight_kg: Some(10.0),
            pixels_h: Some(100),
            pixels_v: None,
        });
        let result = calculate(&config, &reference_module());
        assert!(close(result.weight_screen_kg, 400.0, 1e-9));
        assert_eq!(result.resolution_x, 800);
        assert_eq!(result.resolution_y, 1000);
    }

    #[test]
    fn test_overloaded_motor_detected() {
        let config = reference_config().with_motors(MotorConfig {
            capacity_kg: 150.0,
            ..MotorConfig::default()
        });
        let result = calculate(&config, &reference_module());
        assert!(result.any_motor_overloaded());
        assert!(result.max_motor_utilization() > 1.0);
    }

    #[test]
    fn test_calculate_for_missing_module() {
        let config = reference_config();
        let err = calculate_for(&config, &ModuleCatalog::with_defaults()).unwrap_err();
        assert_eq!(err.error_code(), "MODULE_NOT_FOUND");

        let ok = calculate_for(&ProjectConfig::default(), &ModuleCatalog::with_defaults()).unwrap();
        assert_eq!(ok.total_modules, 40);
    }

    #[test]
    fn test_plan_routes_cover_grid() {
        let plan = plan(&reference_config(), &reference_module());
        assert_eq!(plan.data_route.tiles.len(), 40);
        assert_eq!(plan.power_route.tiles.len(), 40);
        assert_eq!(plan.data_route.group_count(), plan.result.data_lines);
        assert_eq!(plan.power_route.group_count(), plan.result.power_lines);
        assert_eq!(plan.power_route.links().count() as u32, plan.result.power_links);
    }
}
