//! # Rigging Load Distributor
//!
//! Rigging weight (truss, bumpers, slings, shackles), hardware piece counts
//! and the per-motor load distribution of flown screens.
//!
//! ## Flown screens
//!
//! - Selected truss sections always count. With no sections selected, a
//!   truss of `ceil(real_width)` meters is assumed so rigging weight is never
//!   silently zero.
//! - Every column gets a bumper: 1 m for columns at least 1 m wide, 0.5 m
//!   otherwise, each with one sling and one shackle.
//! - Joints between truss sections take 4 spigots and 8 pins each.
//! - The suspended weight is spread over the motors by a fixed percentage
//!   table. The safety factor scales the lifted share only; motor
//!   self-weight is static.
//!
//! ## Stacked screens
//!
//! Only selected truss sections add weight. Base plates take 4 half
//! couplers and 4 pins each.

use serde::{Deserialize, Serialize};

use crate::calculations::grid::TileGrid;
use crate::config::{HardwareWeights, InstallationType, MotorConfig, StackingConfig, TrussConfig};

/// Load share per motor, indexed by exact motor count.
///
/// Outer motors carry less than inner ones because of the cantilevered
/// screen ends. Counts not listed here use a uniform split.
pub const MOTOR_LOAD_TABLE: &[(u32, &[f64])] = &[
    (2, &[0.50, 0.50]),
    (3, &[0.19, 0.62, 0.19]),
    (4, &[0.13, 0.37, 0.37, 0.13]),
    (5, &[0.10, 0.28, 0.24, 0.28, 0.10]),
    (6, &[0.08, 0.23, 0.19, 0.19, 0.23, 0.08]),
    (8, &[0.06, 0.16, 0.14, 0.14, 0.14, 0.14, 0.16, 0.06]),
];

/// Fewest motors ever rigged
pub const MIN_MOTORS: u32 = 2;

/// Utilization from which a motor is flagged as close to its limit
pub const MOTOR_WARNING_UTILIZATION: f64 = 0.8;

/// Load share of every motor for a motor count.
///
/// Counts below [`MIN_MOTORS`] are raised to it; counts missing from
/// [`MOTOR_LOAD_TABLE`] fall back to `1/N` per motor.
///
/// ```rust
/// use ledcalc_core::calculations::rigging::motor_distribution;
///
/// assert_eq!(motor_distribution(4), vec![0.13, 0.37, 0.37, 0.13]);
/// assert_eq!(motor_distribution(10), vec![0.1; 10]);
/// assert_eq!(motor_distribution(1).len(), 2);
/// ```
pub fn motor_distribution(motor_count: u32) -> Vec<f64> {
    let n = motor_count.max(MIN_MOTORS);
    match MOTOR_LOAD_TABLE.iter().find(|(count, _)| *count == n) {
        Some((_, shares)) => shares.to_vec(),
        None => {
            log::warn!("no load table for {} motors, using a uniform split", n);
            vec![1.0 / n as f64; n as usize]
        }
    }
}

/// Load state of one motor relative to its capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadStatus {
    /// Below 80 % of capacity
    Ok,
    /// 80 % up to and including 100 % of capacity
    Warning,
    /// Lifted load exceeds capacity
    Overloaded,
}

/// Load on one rigging point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorLoad {
    /// Zero-based motor index, left to right
    pub index: u32,
    /// Horizontal position along the screen width (m)
    pub position_m: f64,
    /// Share of the suspended weight, times the safety factor (kg)
    pub lift_kg: f64,
    /// Motor self-weight (kg)
    pub self_kg: f64,
    /// `lift_kg + self_kg`
    pub total_kg: f64,
    /// `lift_kg / capacity`
    pub utilization: f64,
    pub status: LoadStatus,
}

impl MotorLoad {
    /// Whether the lifted load exceeds the motor capacity
    pub fn is_overloaded(&self) -> bool {
        self.status == LoadStatus::Overloaded
    }

    /// Display label ("M1", "M2", ...)
    pub fn label(&self) -> String {
        format!("M{}", self.index + 1)
    }
}

/// Spread the suspended weight over the motors.
///
/// Returns one [`MotorLoad`] per rigged motor (at least two).
pub fn distribute_motor_loads(
    weight_suspended_kg: f64,
    safety_factor: f64,
    motors: &MotorConfig,
    screen_width_m: f64,
) -> Vec<MotorLoad> {
    let shares = motor_distribution(motors.count);
    let spacing = screen_width_m / (shares.len() as f64 - 1.0);

    shares
        .iter()
        .enumerate()
        .map(|(i, share)| {
            let lift_kg = weight_suspended_kg * safety_factor * share;
            let self_kg = motors.self_weight_kg;
            let (utilization, status) = if motors.capacity_kg > 0.0 {
                let utilization = lift_kg / motors.capacity_kg;
                let status = if lift_kg > motors.capacity_kg {
                    LoadStatus::Overloaded
                } else if utilization >= MOTOR_WARNING_UTILIZATION {
                    LoadStatus::Warning
                } else {
                    LoadStatus::Ok
                };
                (utilization, status)
            } else if lift_kg > 0.0 {
                (0.0, LoadStatus::Overloaded)
            } else {
                (0.0, LoadStatus::Ok)
            };
            MotorLoad {
                index: i as u32,
                position_m: spacing * i as f64,
                lift_kg,
                self_kg,
                total_kg: lift_kg + self_kg,
                utilization,
                status,
            }
        })
        .collect()
}

/// Rigging weight and hardware counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiggingSummary {
    /// Suggested truss length for a flown screen (m)
    pub required_truss_m: f64,
    /// Total length of the selected truss sections (m)
    pub selected_truss_m: f64,
    /// Weight of selected or auto-estimated truss (kg)
    pub truss_weight_kg: f64,
    /// Whether the truss weight is the automatic estimate
    pub truss_auto_estimated: bool,

    pub bumpers_1m: u32,
    pub bumpers_05m: u32,
    /// Bumpers plus their slings and shackles (kg)
    pub bumper_weight_kg: f64,

    /// Truss and bumper hardware together (kg)
    pub weight_rigging_kg: f64,

    pub truss_spigots: u32,
    pub truss_pins: u32,
    pub stack_half_couplers: u32,
    pub stack_pins: u32,
}

/// Compute rigging weight and hardware for the installation.
///
/// `screen_width_m` is the snapped screen width used for the truss estimate.
pub fn rigging_summary(
    grid: &TileGrid,
    installation: InstallationType,
    truss: &TrussConfig,
    hardware: &HardwareWeights,
    stacking: &StackingConfig,
    screen_width_m: f64,
) -> RiggingSummary {
    let per_meter = truss.model.weight_per_meter_kg();
    let selected_truss_m = truss.total_length_m();
    let required_truss_m = screen_width_m.ceil();

    let mut summary = RiggingSummary {
        required_truss_m,
        selected_truss_m,
        truss_weight_kg: selected_truss_m * per_meter,
        ..RiggingSummary::default()
    };

    match installation {
        InstallationType::Flown => {
            if selected_truss_m == 0.0 {
                log::warn!(
                    "no truss selected, estimating {} m of {} truss",
                    required_truss_m,
                    truss.model
                );
                summary.truss_weight_kg += required_truss_m * per_meter;
                summary.truss_auto_estimated = true;
            }

            for c in 0..grid.cols {
                if grid.column_width_m(c) >= 1.0 {
                    summary.bumpers_1m += 1;
                } else {
                    summary.bumpers_05m += 1;
                }
            }
            let bumpers = summary.bumpers_1m.saturating_add(summary.bumpers_05m) as f64;
            summary.bumper_weight_kg = summary.bumpers_1m as f64 * hardware.bumper_1m_kg
                + summary.bumpers_05m as f64 * hardware.bumper_05m_kg
                + bumpers * (hardware.sling_kg + hardware.shackle_kg);

            let joints = truss.total_pieces().saturating_sub(1);
            summary.truss_spigots = joints.saturating_mul(4);
            summary.truss_pins = joints.saturating_mul(8);
        }
        InstallationType::Stacked => {
            summary.stack_half_couplers = stacking.base_plates.saturating_mul(4);
            summary.stack_pins = stacking.base_plates.saturating_mul(4);
        }
    }

    summary.weight_rigging_kg = summary.truss_weight_kg + summary.bumper_weight_kg;

    log::debug!(
        "rigging ({}): truss {:.1} kg, bumpers {}x1m + {}x0.5m = {:.1} kg",
        installation,
        summary.truss_weight_kg,
        summary.bumpers_1m,
        summary.bumpers_05m,
        summary.bumper_weight_kg
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motor_table_sums_to_one() {
        for (count, shares) in MOTOR_LOAD_TABLE {
            assert_eq!(shares.len(), *count as usize);
            let sum: f64 = shares.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "{} motors sum to {}", count, sum);
        }
    }

    #[test]
    fn test_uniform_fallback() {
        let shares = motor_distribution(7);
        assert_eq!(shares.len(), 7);
        let sum: f64 = shares.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(shares.iter().all(|s| (s - 1.0 / 7.0).abs() < 1e-12));
    }

    #[test]
    fn test_minimum_two_motors() {
        assert_eq!(motor_distribution(0), vec![0.5, 0.5]);
        assert_eq!(motor_distribution(1), vec![0.5, 0.5]);
    }

    #[test]
    fn test_safety_factor_scales_lift_only() {
        let motors = MotorConfig::default();
        let loads = distribute_motor_loads(402.0, 1.5, &motors, 4.0);
        assert_eq!(loads.len(), 2);
        for load in &loads {
            assert!((load.lift_kg - 301.5).abs() < 1e-9);
            assert_eq!(load.self_kg, 50.0);
            assert!((load.total_kg - 351.5).abs() < 1e-9);
            assert_eq!(load.status, LoadStatus::Ok);
        }
        assert_eq!(loads[0].position_m, 0.0);
        assert_eq!(loads[1].position_m, 4.0);
        assert_eq!(loads[1].label(), "M2");
    }

    #[test]
    fn test_load_status_thresholds() {
        let motors = MotorConfig {
            count: 2,
            capacity_kg: 250.0,
            ..MotorConfig::default()
        };
        // 200 kg per motor = 80 %
        let loads = distribute_motor_loads(400.0, 1.0, &motors, 4.0);
        assert_eq!(loads[0].status, LoadStatus::Warning);
        // exactly at capacity is not overloaded
        let loads = distribute_motor_loads(500.0, 1.0, &motors, 4.0);
        assert_eq!(loads[0].status, LoadStatus::Warning);
        let loads = distribute_motor_loads(501.0, 1.0, &motors, 4.0);
        assert!(loads[0].is_overloaded());
    }

    #[test]
    fn test_flown_auto_truss_and_bumpers() {
        let grid = TileGrid::resolve(4.0, 2.5, 500.0, 500.0);
        let summary = rigging_summary(
            &grid,
            InstallationType::Flown,
            &TrussConfig::default(),
            &HardwareWeights::default(),
            &StackingConfig::default(),
            4.0,
        );
        assert!(summary.truss_auto_estimated);
        assert!((summary.truss_weight_kg - 26.0).abs() < 1e-9);
        assert_eq!(summary.bumpers_05m, 8);
        assert_eq!(summary.bumpers_1m, 0);
        // 8*6 + 8*2.5
        assert!((summary.bumper_weight_kg - 68.0).abs() < 1e-9);
        assert!((summary.weight_rigging_kg - 94.0).abs() < 1e-9);
        assert_eq!(summary.truss_spigots, 0);
    }

    #[test]
    fn test_flown_selected_truss_and_joints() {
        let grid = TileGrid::resolve(3.5, 2.0, 1000.0, 1000.0);
        let mut truss = TrussConfig::default();
        truss.segments[2].quantity = 2; // 2 x 2 m
        let summary = rigging_summary(
            &grid,
            InstallationType::Flown,
            &truss,
            &HardwareWeights::default(),
            &StackingConfig::default(),
            3.5,
        );
        assert!(!summary.truss_auto_estimated);
        assert_eq!(summary.required_truss_m, 4.0);
        assert!((summary.truss_weight_kg - 26.0).abs() < 1e-9);
        // 3 full columns of 1 m + 1 half column
        assert_eq!((summary.bumpers_1m, summary.bumpers_05m), (3, 1));
        assert_eq!(summary.truss_spigots, 4);
        assert_eq!(summary.truss_pins, 8);
    }

    #[test]
    fn test_stacked_mode() {
        let grid = TileGrid::resolve(4.0, 2.5, 500.0, 500.0);
        let stacking = StackingConfig {
            base_plates: 3,
            ..StackingConfig::default()
        };
        let summary = rigging_summary(
            &grid,
            InstallationType::Stacked,
            &TrussConfig::default(),
            &HardwareWeights::default(),
            &stacking,
            4.0,
        );
        assert_eq!(summary.weight_rigging_kg, 0.0);
        assert_eq!(summary.bumpers_1m + summary.bumpers_05m, 0);
        assert_eq!(summary.stack_half_couplers, 12);
        assert_eq!(summary.stack_pins, 12);
        assert!(!summary.truss_auto_estimated);
    }
}
