//! # Unit Types
//!
//! Lightweight newtype wrappers for the handful of units the engine mixes:
//! module sizes arrive in millimeters while screen geometry is in meters,
//! and electrical load is derived from watts.
//!
//! All wrappers serialize as bare numbers.
//!
//! ## Example
//!
//! ```rust
//! use ledcalc_core::units::{Meters, Millimeters, Watts, Volts};
//!
//! let width: Meters = Millimeters(500.0).into();
//! assert_eq!(width.0, 0.5);
//!
//! let amps = Watts(2300.0).amps_at(Volts(230.0));
//! assert!((amps.0 - 10.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// Fixed line-to-line voltage used for the three-phase current estimate
pub const THREE_PHASE_VOLTAGE: Volts = Volts(690.0);

// ============================================================================
// Length Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl Meters {
    /// Snap to the nearest half meter (screen sizes are planned on a 0.5 m raster)
    pub fn snap_half(self) -> Meters {
        if !self.0.is_finite() || self.0 <= 0.0 {
            return Meters(0.0);
        }
        Meters((self.0 * 2.0).round() / 2.0)
    }
}

// ============================================================================
// Mass
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

impl Add for Kilograms {
    type Output = Kilograms;
    fn add(self, rhs: Kilograms) -> Kilograms {
        Kilograms(self.0 + rhs.0)
    }
}

impl Mul<f64> for Kilograms {
    type Output = Kilograms;
    fn mul(self, rhs: f64) -> Kilograms {
        Kilograms(self.0 * rhs)
    }
}

// ============================================================================
// Electrical Units
// ============================================================================

/// Power in watts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watts(pub f64);

/// Voltage in volts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volts(pub f64);

/// Current in amperes
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amps(pub f64);

impl Watts {
    /// Current drawn at the given voltage; zero for a non-positive voltage
    pub fn amps_at(self, voltage: Volts) -> Amps {
        if voltage.0 > 0.0 {
            Amps(self.0 / voltage.0)
        } else {
            Amps(0.0)
        }
    }
}

impl Add for Watts {
    type Output = Watts;
    fn add(self, rhs: Watts) -> Watts {
        Watts(self.0 + rhs.0)
    }
}

impl Mul<f64> for Watts {
    type Output = Watts;
    fn mul(self, rhs: f64) -> Watts {
        Watts(self.0 * rhs)
    }
}
