//! # Weight & Power Aggregator
//!
//! Sums tile weights and power draw across the tile classes.
//!
//! Special tiles (corners, flex) take the place of standard full tiles:
//! `full_adjusted = max(0, num_full - special)`. They weigh and draw the same
//! as a full tile.
//!
//! | Class   | Weight factor | Power factor |
//! |---------|---------------|--------------|
//! | Full    | 1.00          | 1.00         |
//! | Half    | 0.55          | 0.50         |
//! | Quarter | 0.30          | 0.25         |
//! | Special | 1.00          | 1.00         |
//!
//! The quarter factors are not proportional to each other. Both are kept as
//! table constants so they can be corrected independently.

use serde::{Deserialize, Serialize};

use crate::calculations::grid::TileGrid;
use crate::units::{Kilograms, Volts, Watts, THREE_PHASE_VOLTAGE};

/// Weight of a half tile relative to a full tile
pub const HALF_TILE_WEIGHT_FACTOR: f64 = 0.55;

/// Weight of a quarter tile relative to a full tile
pub const QUARTER_TILE_WEIGHT_FACTOR: f64 = 0.30;

/// Power of a half tile relative to a full tile
pub const HALF_TILE_POWER_FACTOR: f64 = 0.5;

/// Power of a quarter tile relative to a full tile (half of the half-tile draw)
pub const QUARTER_TILE_POWER_FACTOR: f64 = HALF_TILE_POWER_FACTOR * 0.5;

/// Signal and power jumper weight carried per tile (kg)
pub const CABLE_WEIGHT_PER_TILE_KG: f64 = 0.2;

/// Tile counts after special-tile substitution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCounts {
    /// Standard full tiles left after substitution
    pub full_adjusted: u32,
    pub half: u32,
    pub quarter: u32,
    pub special: u32,
    /// `full_adjusted + half + quarter + special`
    pub total: u32,
}

impl TileCounts {
    /// Apply special-tile substitution to a resolved grid
    pub fn from_grid(grid: &TileGrid, special: u32) -> Self {
        let full_adjusted = grid.num_full.saturating_sub(special);
        if special > grid.num_full {
            log::warn!(
                "{} special tiles exceed the {} full slots of the grid",
                special,
                grid.num_full
            );
        }
        TileCounts {
            full_adjusted,
            half: grid.num_half,
            quarter: grid.num_quarter,
            special,
            total: full_adjusted
                .saturating_add(grid.num_half)
                .saturating_add(grid.num_quarter)
                .saturating_add(special),
        }
    }

    /// Tiles packed in full-size flight cases
    pub fn large(&self) -> u32 {
        self.full_adjusted.saturating_add(self.special)
    }

    /// Tiles packed in small flight cases
    pub fn small(&self) -> u32 {
        self.half.saturating_add(self.quarter)
    }
}

/// Mass and electrical load of the screen itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenLoad {
    /// Tile mass (kg)
    pub weight_screen_kg: f64,
    /// Jumper cable mass (kg)
    pub weight_cables_kg: f64,
    /// Total power draw (W)
    pub power_total_w: f64,
    /// Current at the single-phase supply voltage (A)
    pub amps_total: f64,
    /// Current estimate for a three-phase feed (A)
    pub amps_3phase: f64,
}

/// Aggregate tile weight and power for the given counts.
///
/// # Arguments
///
/// * `counts` - Tile counts after substitution
/// * `tile_weight_kg` - Effective full-tile weight
/// * `tile_power_w` - Full-tile power draw
/// * `voltage_v` - Supply voltage (non-positive gives 0 A)
///
/// # Example
///
/// ```rust
/// use ledcalc_core::calculations::weight_power::{aggregate, TileCounts};
///
/// let counts = TileCounts { full_adjusted: 40, half: 0, quarter: 0, special: 0, total: 40 };
/// let load = aggregate(&counts, 7.5, 130.0, 230.0);
/// assert_eq!(load.weight_screen_kg, 300.0);
/// assert_eq!(load.power_total_w, 5200.0);
/// ```
pub fn aggregate(counts: &TileCounts, tile_weight_kg: f64, tile_power_w: f64, voltage_v: f64) -> ScreenLoad {
    let w_full = Kilograms(tile_weight_kg);
    let weight = w_full * counts.full_adjusted as f64
        + w_full * HALF_TILE_WEIGHT_FACTOR * counts.half as f64
        + w_full * QUARTER_TILE_WEIGHT_FACTOR * counts.quarter as f64
        + w_full * counts.special as f64;

    let p_full = Watts(tile_power_w);
    let power = p_full * counts.full_adjusted as f64
        + p_full * HALF_TILE_POWER_FACTOR * counts.half as f64
        + p_full * QUARTER_TILE_POWER_FACTOR * counts.quarter as f64
        + p_full * counts.special as f64;

    ScreenLoad {
        weight_screen_kg: weight.0,
        weight_cables_kg: counts.total as f64 * CABLE_WEIGHT_PER_TILE_KG,
        power_total_w: power.0,
        amps_total: power.amps_at(Volts(voltage_v)).0,
        amps_3phase: power.amps_at(THREE_PHASE_VOLTAGE).0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_tiles_displace_full_tiles() {
        let grid = TileGrid::resolve(4.0, 2.5, 500.0, 500.0);
        let counts = TileCounts::from_grid(&grid, 3);
        assert_eq!(counts.full_adjusted, 37);
        assert_eq!(counts.special, 3);
        assert_eq!(counts.total, 40);

        let plain = aggregate(&TileCounts::from_grid(&grid, 0), 7.5, 130.0, 230.0);
        let with_special = aggregate(&counts, 7.5, 130.0, 230.0);
        assert_eq!(plain.weight_screen_kg, with_special.weight_screen_kg);
        assert_eq!(plain.power_total_w, with_special.power_total_w);
    }

    #[test]
    fn test_special_tiles_never_displace_half_tiles() {
        let grid = TileGrid::resolve(1.5, 1.0, 1000.0, 1000.0);
        // 1 full + 1 half
        assert_eq!((grid.num_full, grid.num_half), (1, 1));
        let counts = TileCounts::from_grid(&grid, 2);
        assert_eq!(counts.full_adjusted, 0);
        assert_eq!(counts.half, 1);
        assert_eq!(counts.total, 3);
    }

    #[test]
    fn test_conservation() {
        for special in [0, 1, 5, 50] {
            let grid = TileGrid::resolve(3.5, 2.5, 1000.0, 1000.0);
            let c = TileCounts::from_grid(&grid, special);
            assert_eq!(c.full_adjusted + c.half + c.quarter + c.special, c.total);
            assert_eq!(c.full_adjusted, grid.num_full.saturating_sub(special));
        }
    }

    #[test]
    fn test_half_and_quarter_factors() {
        let counts = TileCounts {
            full_adjusted: 6,
            half: 5,
            quarter: 1,
            special: 0,
            total: 12,
        };
        let load = aggregate(&counts, 10.0, 200.0, 230.0);
        // 6*10 + 5*5.5 + 1*3.0
        assert!((load.weight_screen_kg - 90.5).abs() < 1e-9);
        // 6*200 + 5*100 + 1*50
        assert!((load.power_total_w - 1750.0).abs() < 1e-9);
        assert!((load.weight_cables_kg - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_electrical_load() {
        let counts = TileCounts {
            full_adjusted: 40,
            total: 40,
            ..TileCounts::default()
        };
        let load = aggregate(&counts, 7.5, 130.0, 230.0);
        assert!((load.amps_total - 22.61).abs() < 0.01);
        assert!((load.amps_3phase - 7.54).abs() < 0.01);

        let no_supply = aggregate(&counts, 7.5, 130.0, 0.0);
        assert_eq!(no_supply.amps_total, 0.0);
    }
}
