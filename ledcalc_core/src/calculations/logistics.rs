//! # Logistics & Hardware Calculator
//!
//! Line counts, jumper links, flight cases, multi-cables and the screen
//! resolution derived from the resolved grid and tile counts.

use serde::{Deserialize, Serialize};

use crate::calculations::weight_power::TileCounts;
use crate::config::{Intervals, MultiCableConfig};

/// `ceil(n / d)` for a divisor clamped to at least 1
fn ceil_div(n: u32, d: u32) -> u32 {
    n.div_ceil(d.max(1))
}

/// Cable and transport quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logistics {
    /// Independent power feeds
    pub power_lines: u32,
    /// Independent signal lines
    pub data_lines: u32,
    /// Tile-to-tile power jumpers
    pub power_links: u32,
    /// Tile-to-tile signal jumpers
    pub data_links: u32,
    /// Flight cases for full-size and special tiles
    pub fly_cases_main: u32,
    /// Flight cases for half and quarter tiles
    pub fly_cases_small: u32,
    /// Multi-circuit cables needed to carry every power line
    pub required_multi_cables: u32,
    /// Multi-circuit cables the user selected
    pub selected_multi_cables: u32,
    /// Breakout boxes (one per required multi-cable plus extras)
    pub total_breakouts: u32,
}

/// Derive cabling and transport quantities.
///
/// # Example
///
/// ```rust
/// use ledcalc_core::calculations::logistics::compute;
/// use ledcalc_core::calculations::weight_power::TileCounts;
/// use ledcalc_core::config::{Intervals, MultiCableConfig};
///
/// let counts = TileCounts { full_adjusted: 40, half: 0, quarter: 0, special: 0, total: 40 };
/// let logistics = compute(&counts, &Intervals::default(), &MultiCableConfig::default());
/// assert_eq!(logistics.power_lines, 4);
/// assert_eq!(logistics.data_lines, 3);
/// assert_eq!(logistics.fly_cases_main, 5);
/// assert_eq!(logistics.required_multi_cables, 1);
/// ```
pub fn compute(counts: &TileCounts, intervals: &Intervals, multi_cable: &MultiCableConfig) -> Logistics {
    let power_lines = ceil_div(counts.total, intervals.feed_cable);
    let data_lines = ceil_div(counts.total, intervals.signal_reel);
    let required_multi_cables = ceil_div(power_lines, multi_cable.circuits_per_cable);

    Logistics {
        power_lines,
        data_lines,
        power_links: counts.total - power_lines,
        data_links: counts.total - data_lines,
        fly_cases_main: ceil_div(counts.large(), intervals.fly_case),
        fly_cases_small: ceil_div(counts.small(), intervals.fly_case_small),
        required_multi_cables,
        selected_multi_cables: multi_cable.selected_count(),
        total_breakouts: required_multi_cables.saturating_add(multi_cable.extra_breakouts),
    }
}

/// Reduced width:height ratio of the pixel canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u64,
    pub height: u64,
}

impl AspectRatio {
    /// Reduce `x:y` by their greatest common divisor.
    ///
    /// Undefined (None) when either side is zero.
    pub fn reduced(x: u64, y: u64) -> Option<Self> {
        if x == 0 || y == 0 {
            return None;
        }
        let d = gcd(x, y);
        Some(AspectRatio {
            width: x / d,
            height: y / d,
        })
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Greatest common divisor (Euclid)
pub fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Pixel canvas size of the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub x: u64,
    pub y: u64,
}

impl Resolution {
    /// Pixels across a physical screen size.
    ///
    /// `round(real_mm / (module_mm / pixels))` per axis; an axis with no
    /// tile size or no pixels resolves to 0.
    pub fn for_screen(
        real_width_m: f64,
        real_height_m: f64,
        module_width_mm: f64,
        module_height_mm: f64,
        pixels_h: u32,
        pixels_v: u32,
    ) -> Self {
        Resolution {
            x: axis_pixels(real_width_m, module_width_mm, pixels_h),
            y: axis_pixels(real_height_m, module_height_mm, pixels_v),
        }
    }

    /// Reduced aspect ratio, if defined
    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        let ratio = AspectRatio::reduced(self.x, self.y);
        if ratio.is_none() {
            log::warn!("aspect ratio undefined for {}x{} px", self.x, self.y);
        }
        ratio
    }
}

fn axis_pixels(real_m: f64, module_mm: f64, pixels: u32) -> u64 {
    if module_mm.is_nan() || module_mm <= 0.0 || pixels == 0 || real_m.is_nan() || real_m <= 0.0 {
        return 0;
    }
    let pitch_mm = module_mm / pixels as f64;
    (real_m * 1000.0 / pitch_mm).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(full: u32, half: u32, quarter: u32, special: u32) -> TileCounts {
        TileCounts {
            full_adjusted: full,
            half,
            quarter,
            special,
            total: full + half + quarter + special,
        }
    }

    #[test]
    fn test_lines_and_links() {
        let logistics = compute(&counts(40, 0, 0, 0), &Intervals::default(), &MultiCableConfig::default());
        assert_eq!(logistics.power_lines, 4);
        assert_eq!(logistics.data_lines, 3);
        assert_eq!(logistics.power_links, 36);
        assert_eq!(logistics.data_links, 37);
    }

    #[test]
    fn test_fly_cases_split_by_size() {
        let logistics = compute(&counts(6, 5, 1, 3), &Intervals::default(), &MultiCableConfig::default());
        // (6 + 3) / 8 -> 2, (5 + 1) / 10 -> 1
        assert_eq!(logistics.fly_cases_main, 2);
        assert_eq!(logistics.fly_cases_small, 1);
    }

    #[test]
    fn test_multi_cables() {
        let mut multi = MultiCableConfig::default();
        multi.extra_breakouts = 2;
        multi.lengths[1].quantity = 2;
        multi.lengths[3].quantity = 1;
        // 100 tiles / 12 -> 9 lines, / 6 circuits -> 2 cables
        let logistics = compute(&counts(100, 0, 0, 0), &Intervals::default(), &multi);
        assert_eq!(logistics.power_lines, 9);
        assert_eq!(logistics.required_multi_cables, 2);
        assert_eq!(logistics.selected_multi_cables, 3);
        assert_eq!(logistics.total_breakouts, 4);
    }

    #[test]
    fn test_zero_intervals_do_not_divide_by_zero() {
        let intervals = Intervals {
            feed_cable: 0,
            signal_reel: 0,
            fly_case: 0,
            fly_case_small: 0,
        };
        let logistics = compute(&counts(4, 0, 0, 0), &intervals, &MultiCableConfig::default());
        assert_eq!(logistics.power_lines, 4);
        assert_eq!(logistics.power_links, 0);
    }

    #[test]
    fn test_empty_screen() {
        let logistics = compute(&TileCounts::default(), &Intervals::default(), &MultiCableConfig::default());
        assert_eq!(logistics, Logistics::default());
    }

    #[test]
    fn test_resolution_and_aspect() {
        let res = Resolution::for_screen(4.0, 2.5, 500.0, 500.0, 200, 200);
        assert_eq!((res.x, res.y), (1600, 1000));
        let ratio = res.aspect_ratio().unwrap();
        assert_eq!(ratio.to_string(), "8:5");

        let res = Resolution::for_screen(3.5, 2.0, 1000.0, 1000.0, 256, 256);
        assert_eq!((res.x, res.y), (896, 512));
        assert_eq!(res.aspect_ratio().unwrap().to_string(), "7:4");
    }

    #[test]
    fn test_undefined_aspect_ratio() {
        let res = Resolution::for_screen(0.0, 2.5, 500.0, 500.0, 200, 200);
        assert_eq!(res.x, 0);
        assert!(res.aspect_ratio().is_none());

        let res = Resolution::for_screen(4.0, 2.5, 0.0, 500.0, 200, 200);
        assert_eq!(res.x, 0);
    }

    #[test]
    fn test_nan_inputs_give_zero_pixels() {
        let res = Resolution::for_screen(f64::NAN, 2.5, f64::NAN, 500.0, 200, 200);
        assert_eq!((res.x, res.y), (0, 1000));
        assert_eq!(axis_pixels(4.0, f64::NAN, 200), 0);
        assert_eq!(axis_pixels(-1.0, 500.0, 200), 0);
        assert!(res.aspect_ratio().is_none());
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(1600, 1000), 200);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(17, 5), 1);
    }
}
