//! # Project Configuration
//!
//! [`ProjectConfig`] is the complete input vector of the calculation engine:
//! target size, tile selection and overrides, special tiles, rigging,
//! power/signal intervals, cable routes and multi-cable selection.
//!
//! The config is a plain value. Updates go through `with_*` methods that
//! consume the value and return the changed copy, so every calculation works
//! on a frozen snapshot.
//!
//! ## Example
//!
//! ```rust
//! use ledcalc_core::config::{InstallationType, ProjectConfig};
//!
//! let config = ProjectConfig::default()
//!     .with_target(6.0, 3.5)
//!     .with_installation(InstallationType::Stacked)
//!     .with_truss_segment(2.0, 3);
//!
//! assert_eq!(config.target_width_m, 6.0);
//! assert_eq!(config.truss.total_length_m(), 6.0);
//! assert_eq!(config.truss.total_pieces(), 3);
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::routing::RouteConfig;
use crate::catalog::{LedModule, DEFAULT_MODULE_ID};
use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Enumerations
// ============================================================================

/// How the screen is supported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallationType {
    /// Hung from chain motors on a truss
    #[default]
    Flown,
    /// Built up from ground-level support structure
    Stacked,
}

impl InstallationType {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            InstallationType::Flown => "Flown",
            InstallationType::Stacked => "Stacked",
        }
    }

    /// Serialized code ("flown", "stacked")
    pub fn code(&self) -> &'static str {
        match self {
            InstallationType::Flown => "flown",
            InstallationType::Stacked => "stacked",
        }
    }

    /// True for motor-hung installations
    pub fn is_flown(&self) -> bool {
        matches!(self, InstallationType::Flown)
    }
}

impl std::fmt::Display for InstallationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Square box truss profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrussModel {
    /// 30 cm box truss
    #[serde(rename = "30x30")]
    T30,
    /// 40 cm box truss
    #[serde(rename = "40x40")]
    #[default]
    T40,
    /// 52 cm box truss
    #[serde(rename = "52x52")]
    T52,
}

impl TrussModel {
    /// All profiles, in ascending size
    pub const ALL: [TrussModel; 3] = [TrussModel::T30, TrussModel::T40, TrussModel::T52];

    /// Self-weight per meter of truss (kg/m)
    pub fn weight_per_meter_kg(&self) -> f64 {
        match self {
            TrussModel::T30 => 4.5,
            TrussModel::T40 => 6.5,
            TrussModel::T52 => 10.0,
        }
    }

    /// Profile code (e.g., "40x40")
    pub fn code(&self) -> &'static str {
        match self {
            TrussModel::T30 => "30x30",
            TrussModel::T40 => "40x40",
            TrussModel::T52 => "52x52",
        }
    }

    /// Parse from "30x30", "40", "52X52" and similar
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let wanted = s.trim().to_lowercase();
        TrussModel::ALL
            .into_iter()
            .find(|m| {
                let code = m.code();
                wanted == code || code.split('x').next() == Some(wanted.as_str())
            })
            .ok_or_else(|| {
                let codes: Vec<&str> = TrussModel::ALL.iter().map(|m| m.code()).collect();
                CalcError::invalid_input("truss_model", s, format!("Expected one of {}", codes.join(", ")))
            })
    }
}

impl std::fmt::Display for TrussModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Joint type of 52x52 truss sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrussConnection {
    /// Conical spigot and pin
    #[default]
    Spigot,
    /// Bolted plates
    Bolt,
}

/// Multi-circuit power cable families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MultiCableType {
    #[default]
    Socapex,
    Harting,
    Cetac,
}

impl std::fmt::Display for MultiCableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MultiCableType::Socapex => "Socapex",
            MultiCableType::Harting => "Harting",
            MultiCableType::Cetac => "Cetac",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// Nested records
// ============================================================================

/// Free-form event details. Never enters arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    pub event_name: String,
    pub client_name: String,
    /// ISO date string (YYYY-MM-DD)
    pub date: String,
    /// Base64 data URL of the client logo
    pub logo: Option<String>,
}

/// Per-field overrides of the selected module's catalog values.
///
/// A value is used only when it is present, finite and positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleOverrides {
    pub weight_kg: Option<f64>,
    pub pixels_h: Option<u32>,
    pub pixels_v: Option<u32>,
}

/// Counts of non-standard tiles occupying full-tile slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialModules {
    pub corner_left: u32,
    pub corner_right: u32,
    pub flex: u32,
}

impl SpecialModules {
    /// Total number of special tiles
    pub fn total(&self) -> u32 {
        self.corner_left
            .saturating_add(self.corner_right)
            .saturating_add(self.flex)
    }
}

/// A quantity of items of one length (truss sections, multi-cables)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentQuantity {
    pub length_m: f64,
    pub quantity: u32,
}

/// Sum of `length × quantity`, skipping non-finite or negative lengths
fn total_length(segments: &[SegmentQuantity]) -> f64 {
    segments
        .iter()
        .filter(|s| s.length_m.is_finite() && s.length_m > 0.0)
        .map(|s| s.length_m * s.quantity as f64)
        .sum()
}

/// Sum of quantities, saturating at `u32::MAX`
fn total_quantity(segments: &[SegmentQuantity]) -> u32 {
    segments
        .iter()
        .fold(0u32, |acc, s| acc.saturating_add(s.quantity))
}

/// Insert or replace the quantity for a length
fn set_quantity(segments: &mut Vec<SegmentQuantity>, length_m: f64, quantity: u32) {
    match segments.iter_mut().find(|s| s.length_m == length_m) {
        Some(existing) => existing.quantity = quantity,
        None => segments.push(SegmentQuantity { length_m, quantity }),
    }
}

/// Truss selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrussConfig {
    pub model: TrussModel,
    pub connection_52: TrussConnection,
    /// User-selected sections (length -> quantity)
    pub segments: Vec<SegmentQuantity>,
}

impl TrussConfig {
    /// Total selected truss length in meters
    pub fn total_length_m(&self) -> f64 {
        total_length(&self.segments)
    }

    /// Total number of selected truss sections
    pub fn total_pieces(&self) -> u32 {
        total_quantity(&self.segments)
    }
}

impl Default for TrussConfig {
    fn default() -> Self {
        TrussConfig {
            model: TrussModel::T40,
            connection_52: TrussConnection::Spigot,
            segments: [0.5, 1.0, 2.0, 3.0]
                .iter()
                .map(|&length_m| SegmentQuantity { length_m, quantity: 0 })
                .collect(),
        }
    }
}

/// Chain motor selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorConfig {
    /// Number of motors (at least 2 are always used)
    pub count: u32,
    /// Rated working load per motor (kg)
    pub capacity_kg: f64,
    /// Self-weight of one motor (kg)
    pub self_weight_kg: f64,
    /// Sling length (m), informational
    pub sling_length_m: f64,
}

impl Default for MotorConfig {
    fn default() -> Self {
        MotorConfig {
            count: 2,
            capacity_kg: 1000.0,
            self_weight_kg: 50.0,
            sling_length_m: 1.5,
        }
    }
}

/// Unit weights of flown rigging hardware (kg)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HardwareWeights {
    pub bumper_1m_kg: f64,
    pub bumper_05m_kg: f64,
    pub sling_kg: f64,
    pub shackle_kg: f64,
}

impl Default for HardwareWeights {
    fn default() -> Self {
        HardwareWeights {
            bumper_1m_kg: 12.0,
            bumper_05m_kg: 6.0,
            sling_kg: 2.0,
            shackle_kg: 0.5,
        }
    }
}

/// Ground-stack hardware counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackingConfig {
    pub base_plates: u32,
    pub bilite_base: u32,
    pub bilite_1m: u32,
    pub bilite_05m: u32,
}

/// Grouping intervals for cabling and transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intervals {
    /// Tiles per power feed
    pub feed_cable: u32,
    /// Tiles per signal line
    pub signal_reel: u32,
    /// Full-size tiles per flight case
    pub fly_case: u32,
    /// Half/quarter tiles per flight case
    pub fly_case_small: u32,
}

impl Default for Intervals {
    fn default() -> Self {
        Intervals {
            feed_cable: 12,
            signal_reel: 16,
            fly_case: 8,
            fly_case_small: 10,
        }
    }
}

impl Intervals {
    /// Copy with every interval clamped to at least 1
    pub fn sanitized(&self) -> Intervals {
        let clamp = |field: &str, value: u32| {
            if value == 0 {
                log::warn!("interval '{}' is 0, using 1", field);
                1
            } else {
                value
            }
        };
        Intervals {
            feed_cable: clamp("feed_cable", self.feed_cable),
            signal_reel: clamp("signal_reel", self.signal_reel),
            fly_case: clamp("fly_case", self.fly_case),
            fly_case_small: clamp("fly_case_small", self.fly_case_small),
        }
    }
}

/// Multi-circuit cable selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiCableConfig {
    pub cable_type: MultiCableType,
    pub circuits_per_cable: u32,
    pub extra_breakouts: u32,
    /// User-selected cables (length -> quantity)
    pub lengths: Vec<SegmentQuantity>,
}

impl MultiCableConfig {
    /// Total number of selected cables
    pub fn selected_count(&self) -> u32 {
        total_quantity(&self.lengths)
    }
}

impl Default for MultiCableConfig {
    fn default() -> Self {
        MultiCableConfig {
            cable_type: MultiCableType::Socapex,
            circuits_per_cable: 6,
            extra_breakouts: 0,
            lengths: [5.0, 10.0, 20.0, 25.0, 30.0, 50.0]
                .iter()
                .map(|&length_m| SegmentQuantity { length_m, quantity: 0 })
                .collect(),
        }
    }
}

/// Power distribution unit entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PduSpec {
    pub name: String,
    pub count: u32,
    pub connector: String,
    pub cable_length_m: f64,
}

impl Default for PduSpec {
    fn default() -> Self {
        PduSpec {
            name: String::new(),
            count: 1,
            connector: "Cetac 63A".to_string(),
            cable_length_m: 10.0,
        }
    }
}

/// A cable run in the video chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableRun {
    pub cable_type: String,
    pub length_m: f64,
    pub quantity: u32,
}

/// Video processing chain entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoChain {
    pub processor: String,
    pub processor_qty: u32,
    pub server: String,
    pub server_qty: u32,
    /// Server to processor interconnect
    pub interconnect: CableRun,
    /// Processor to screen distribution
    pub distribution: CableRun,
    pub accessories: String,
}

impl Default for VideoChain {
    fn default() -> Self {
        VideoChain {
            processor: String::new(),
            processor_qty: 1,
            server: String::new(),
            server_qty: 1,
            interconnect: CableRun {
                cable_type: "HDMI".to_string(),
                length_m: 2.0,
                quantity: 1,
            },
            distribution: CableRun {
                cable_type: "Fiber".to_string(),
                length_m: 100.0,
                quantity: 2,
            },
            accessories: String::new(),
        }
    }
}

/// Infrastructure inventory listed in reports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub pdu: PduSpec,
    pub video: VideoChain,
}

// ============================================================================
// ProjectConfig
// ============================================================================

/// Complete input of one layout calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub event: EventInfo,

    /// Requested screen width in meters (snapped to 0.5 m)
    pub target_width_m: f64,

    /// Requested screen height in meters (snapped to 0.5 m)
    pub target_height_m: f64,

    /// Catalog id of the selected tile
    pub module_id: Uuid,

    pub overrides: ModuleOverrides,
    pub special: SpecialModules,
    pub installation: InstallationType,
    pub truss: TrussConfig,
    pub motors: MotorConfig,

    /// Multiplier on the lifted load (>= 1)
    pub safety_factor: f64,

    pub hardware: HardwareWeights,
    pub stacking: StackingConfig,

    /// Single-phase supply voltage
    pub voltage_v: f64,

    pub intervals: Intervals,
    pub data_route: RouteConfig,
    pub power_route: RouteConfig,
    pub multi_cable: MultiCableConfig,
    pub inventory: Inventory,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            event: EventInfo {
                date: chrono::Local::now().format("%Y-%m-%d").to_string(),
                ..EventInfo::default()
            },
            target_width_m: 4.0,
            target_height_m: 2.5,
            module_id: DEFAULT_MODULE_ID,
            overrides: ModuleOverrides::default(),
            special: SpecialModules::default(),
            installation: InstallationType::Flown,
            truss: TrussConfig::default(),
            motors: MotorConfig::default(),
            safety_factor: 1.0,
            hardware: HardwareWeights::default(),
            stacking: StackingConfig::default(),
            voltage_v: 230.0,
            intervals: Intervals::default(),
            data_route: RouteConfig::snake(),
            power_route: RouteConfig::straight(),
            multi_cable: MultiCableConfig::default(),
            inventory: Inventory::default(),
        }
    }
}

/// Keep a finite, positive value; anything else becomes `None`
fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Finite value or zero
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl ProjectConfig {
    // === Immutable updates ===

    /// Replace the target screen size
    pub fn with_target(mut self, width_m: f64, height_m: f64) -> Self {
        self.target_width_m = width_m;
        self.target_height_m = height_m;
        self
    }

    /// Select a different module; clears all overrides
    pub fn with_module(mut self, module_id: Uuid) -> Self {
        self.module_id = module_id;
        self.overrides = ModuleOverrides::default();
        self
    }

    /// Replace the per-field overrides
    pub fn with_overrides(mut self, overrides: ModuleOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Replace the special tile counts
    pub fn with_special_modules(mut self, special: SpecialModules) -> Self {
        self.special = special;
        self
    }

    /// Replace the installation mode
    pub fn with_installation(mut self, installation: InstallationType) -> Self {
        self.installation = installation;
        self
    }

    /// Replace the truss profile
    pub fn with_truss_model(mut self, model: TrussModel) -> Self {
        self.truss.model = model;
        self
    }

    /// Set the quantity of truss sections of one length
    pub fn with_truss_segment(mut self, length_m: f64, quantity: u32) -> Self {
        set_quantity(&mut self.truss.segments, length_m, quantity);
        self
    }

    /// Replace the motor selection
    pub fn with_motors(mut self, motors: MotorConfig) -> Self {
        self.motors = motors;
        self
    }

    /// Replace the safety factor
    pub fn with_safety_factor(mut self, safety_factor: f64) -> Self {
        self.safety_factor = safety_factor;
        self
    }

    /// Replace the rigging hardware unit weights
    pub fn with_hardware(mut self, hardware: HardwareWeights) -> Self {
        self.hardware = hardware;
        self
    }

    /// Replace the ground-stack hardware counts
    pub fn with_stacking(mut self, stacking: StackingConfig) -> Self {
        self.stacking = stacking;
        self
    }

    /// Replace the supply voltage
    pub fn with_voltage(mut self, voltage_v: f64) -> Self {
        self.voltage_v = voltage_v;
        self
    }

    /// Replace the grouping intervals
    pub fn with_intervals(mut self, intervals: Intervals) -> Self {
        self.intervals = intervals;
        self
    }

    /// Replace the data route
    pub fn with_data_route(mut self, route: RouteConfig) -> Self {
        self.data_route = route;
        self
    }

    /// Replace the power route
    pub fn with_power_route(mut self, route: RouteConfig) -> Self {
        self.power_route = route;
        self
    }

    /// Set the quantity of multi-cables of one length
    pub fn with_multi_cable(mut self, length_m: f64, quantity: u32) -> Self {
        set_quantity(&mut self.multi_cable.lengths, length_m, quantity);
        self
    }

    /// Replace the event details
    pub fn with_event(mut self, event: EventInfo) -> Self {
        self.event = event;
        self
    }

    // === Effective values ===

    /// Tile weight after applying the override
    pub fn effective_weight_kg(&self, module: &LedModule) -> f64 {
        positive(self.overrides.weight_kg).unwrap_or(module.weight_kg)
    }

    /// Horizontal pixel count after applying the override
    pub fn effective_pixels_h(&self, module: &LedModule) -> u32 {
        self.overrides.pixels_h.filter(|&p| p > 0).unwrap_or(module.pixels_h)
    }

    /// Vertical pixel count after applying the override
    pub fn effective_pixels_v(&self, module: &LedModule) -> u32 {
        self.overrides.pixels_v.filter(|&p| p > 0).unwrap_or(module.pixels_v)
    }

    /// Safety factor clamped to at least 1
    pub fn effective_safety_factor(&self) -> f64 {
        if self.safety_factor.is_finite() && self.safety_factor >= 1.0 {
            self.safety_factor
        } else {
            log::warn!("safety factor {} below 1, using 1", self.safety_factor);
            1.0
        }
    }

    /// Number of motors actually rigged (at least 2)
    pub fn effective_motor_count(&self) -> u32 {
        if self.motors.count < 2 {
            log::warn!("motor count {} raised to the minimum of 2", self.motors.count);
        }
        self.motors.count.max(2)
    }

    /// Copy with every non-finite numeric input replaced by a safe value.
    ///
    /// Target dimensions, unit weights and voltage become 0; overrides that
    /// are not finite and positive are dropped.
    pub fn sanitized(&self) -> ProjectConfig {
        let mut config = self.clone();
        config.target_width_m = finite_or_zero(config.target_width_m);
        config.target_height_m = finite_or_zero(config.target_height_m);
        config.overrides.weight_kg = positive(config.overrides.weight_kg);
        config.motors.capacity_kg = finite_or_zero(config.motors.capacity_kg);
        config.motors.self_weight_kg = finite_or_zero(config.motors.self_weight_kg);
        config.hardware = HardwareWeights {
            bumper_1m_kg: finite_or_zero(config.hardware.bumper_1m_kg),
            bumper_05m_kg: finite_or_zero(config.hardware.bumper_05m_kg),
            sling_kg: finite_or_zero(config.hardware.sling_kg),
            shackle_kg: finite_or_zero(config.hardware.shackle_kg),
        };
        config.voltage_v = finite_or_zero(config.voltage_v);
        config.intervals = config.intervals.sanitized();
        config.multi_cable.circuits_per_cable = config.multi_cable.circuits_per_cable.max(1);
        config
    }

    /// Strict validation for input forms and loaded files.
    ///
    /// The engine does not require this: it sanitizes instead of failing.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("target_width_m", self.target_width_m),
            ("target_height_m", self.target_height_m),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Target dimension must be a non-negative number",
                ));
            }
        }
        if !self.safety_factor.is_finite() || self.safety_factor < 1.0 {
            return Err(CalcError::invalid_input(
                "safety_factor",
                self.safety_factor.to_string(),
                "Safety factor must be at least 1",
            ));
        }
        if !self.voltage_v.is_finite() || self.voltage_v <= 0.0 {
            return Err(CalcError::invalid_input(
                "voltage_v",
                self.voltage_v.to_string(),
                "Voltage must be positive",
            ));
        }
        if !self.motors.capacity_kg.is_finite() || self.motors.capacity_kg <= 0.0 {
            return Err(CalcError::invalid_input(
                "motors.capacity_kg",
                self.motors.capacity_kg.to_string(),
                "Motor capacity must be positive",
            ));
        }
        for (field, value) in [
            ("intervals.feed_cable", self.intervals.feed_cable),
            ("intervals.signal_reel", self.intervals.signal_reel),
            ("intervals.fly_case", self.intervals.fly_case),
            ("intervals.fly_case_small", self.intervals.fly_case_small),
            ("multi_cable.circuits_per_cable", self.multi_cable.circuits_per_cable),
        ] {
            if value == 0 {
                return Err(CalcError::invalid_input(field, "0", "Interval must be at least 1"));
            }
        }
        for segment in self.truss.segments.iter().chain(self.multi_cable.lengths.iter()) {
            if !segment.length_m.is_finite() || segment.length_m <= 0.0 {
                return Err(CalcError::invalid_input(
                    "segment.length_m",
                    segment.length_m.to_string(),
                    "Segment length must be positive",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::routing::{RouteAxis, RoutePattern, StartCorner};
    use crate::catalog::DEFAULT_MODULES;

    fn stock_module() -> LedModule {
        DEFAULT_MODULES[2].clone()
    }

    #[test]
    fn test_defaults() {
        let config = ProjectConfig::default();
        assert_eq!(config.target_width_m, 4.0);
        assert_eq!(config.target_height_m, 2.5);
        assert_eq!(config.module_id, DEFAULT_MODULE_ID);
        assert_eq!(config.truss.model, TrussModel::T40);
        assert_eq!(config.truss.total_length_m(), 0.0);
        assert_eq!(config.data_route.pattern, RoutePattern::Snake);
        assert_eq!(config.power_route.pattern, RoutePattern::Straight);
        assert_eq!(config.power_route.axis, RouteAxis::Vertical);
        assert_eq!(config.power_route.start, StartCorner::TopLeft);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_module_clears_overrides() {
        let config = ProjectConfig::default()
            .with_overrides(ModuleOverrides {
                weight_kg: Some(9.0),
                pixels_h: Some(100),
                pixels_v: None,
            })
            .with_module(Uuid::from_u128(5));
        assert_eq!(config.overrides, ModuleOverrides::default());
        assert_eq!(config.module_id, Uuid::from_u128(5));
    }

    #[test]
    fn test_overrides_only_used_when_positive() {
        let module = stock_module();
        let base = ProjectConfig::default();

        let config = base.clone().with_overrides(ModuleOverrides {
            weight_kg: Some(9.0),
            pixels_h: Some(100),
            pixels_v: Some(0),
        });
        assert_eq!(config.effective_weight_kg(&module), 9.0);
        assert_eq!(config.effective_pixels_h(&module), 100);
        assert_eq!(config.effective_pixels_v(&module), 200);

        let config = base.with_overrides(ModuleOverrides {
            weight_kg: Some(f64::NAN),
            pixels_h: None,
            pixels_v: None,
        });
        assert_eq!(config.effective_weight_kg(&module), 7.5);
    }

    #[test]
    fn test_segment_updates_replace_quantity() {
        let config = ProjectConfig::default()
            .with_truss_segment(2.0, 3)
            .with_truss_segment(2.0, 1)
            .with_truss_segment(1.5, 2);
        assert_eq!(config.truss.total_pieces(), 3);
        assert!((config.truss.total_length_m() - 5.0).abs() < 1e-12);

        let config = config.with_multi_cable(25.0, 2).with_multi_cable(7.0, 1);
        assert_eq!(config.multi_cable.selected_count(), 3);
    }

    #[test]
    fn test_sanitized() {
        let config = ProjectConfig::default()
            .with_target(f64::NAN, 3.0)
            .with_voltage(f64::INFINITY)
            .with_intervals(Intervals {
                feed_cable: 0,
                signal_reel: 16,
                fly_case: 0,
                fly_case_small: 10,
            });
        let clean = config.sanitized();
        assert_eq!(clean.target_width_m, 0.0);
        assert_eq!(clean.target_height_m, 3.0);
        assert_eq!(clean.voltage_v, 0.0);
        assert_eq!(clean.intervals.feed_cable, 1);
        assert_eq!(clean.intervals.fly_case, 1);
        assert_eq!(clean.intervals.signal_reel, 16);
    }

    #[test]
    fn test_effective_limits() {
        let config = ProjectConfig::default()
            .with_safety_factor(0.5)
            .with_motors(MotorConfig {
                count: 1,
                ..MotorConfig::default()
            });
        assert_eq!(config.effective_safety_factor(), 1.0);
        assert_eq!(config.effective_motor_count(), 2);
    }

    #[test]
    fn test_validation_errors() {
        let config = ProjectConfig::default().with_safety_factor(0.8);
        assert_eq!(config.validate().unwrap_err().error_code(), "INVALID_INPUT");

        let config = ProjectConfig::default().with_intervals(Intervals {
            feed_cable: 0,
            ..Intervals::default()
        });
        assert!(config.validate().is_err());

        let config = ProjectConfig::default().with_truss_segment(-1.0, 2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_truss_model_parsing() {
        assert_eq!(TrussModel::from_str_flexible("52X52").unwrap(), TrussModel::T52);
        assert_eq!(TrussModel::from_str_flexible("30").unwrap(), TrussModel::T30);
        assert_eq!(TrussModel::from_str_flexible(" 40x40 ").unwrap(), TrussModel::T40);
        let err = TrussModel::from_str_flexible("29x29").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("30x30, 40x40, 52x52"));
        assert_eq!(TrussModel::T52.weight_per_meter_kg(), 10.0);
    }

    #[test]
    fn test_counts_saturate() {
        let special = SpecialModules {
            corner_left: u32::MAX,
            corner_right: 5,
            flex: 1,
        };
        assert_eq!(special.total(), u32::MAX);

        let config = ProjectConfig::default()
            .with_truss_segment(2.0, u32::MAX)
            .with_truss_segment(3.0, 10);
        assert_eq!(config.truss.total_pieces(), u32::MAX);
    }

    #[test]
    fn test_serialization() {
        let config = ProjectConfig::default().with_truss_segment(3.0, 2);
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"40x40\""));
        assert!(json.contains("\"flown\""));
        let roundtrip: ProjectConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, roundtrip);
    }
}
