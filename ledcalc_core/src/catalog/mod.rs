//! # Module Catalog
//!
//! LED tile definitions and the in-memory catalog the user picks from.
//!
//! A [`LedModule`] is immutable once created: the catalog only ever adds or
//! removes whole entries. The calculation engine receives a single module
//! snapshot and never touches the catalog itself.
//!
//! ## Example
//!
//! ```rust
//! use ledcalc_core::catalog::{LedModule, ModuleCatalog};
//!
//! let mut catalog = ModuleCatalog::with_defaults();
//! let id = catalog
//!     .add(LedModule::new("Unilumin", "UpadIV 2.6", 500.0, 500.0, 7.9, 160.0, 192, 192))
//!     .unwrap();
//!
//! assert_eq!(catalog.get(&id).unwrap().brand, "Unilumin");
//! assert!(catalog.remove(&id).is_some());
//! ```

pub mod defaults;

pub use defaults::{DEFAULT_MODULES, DEFAULT_MODULE_ID};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult};
use crate::units::{Meters, Millimeters};

/// A catalog entry describing one physical LED tile.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "00000000-0000-0000-0000-000000000003",
///   "brand": "Absen",
///   "model": "PL2.5 Pro",
///   "width_mm": 500.0,
///   "height_mm": 500.0,
///   "weight_kg": 7.5,
///   "power_w": 130.0,
///   "pixels_h": 200,
///   "pixels_v": 200
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedModule {
    /// Catalog identifier
    pub id: Uuid,

    /// Manufacturer
    pub brand: String,

    /// Model designation
    pub model: String,

    /// Tile width in millimeters
    pub width_mm: f64,

    /// Tile height in millimeters
    pub height_mm: f64,

    /// Tile weight in kilograms
    pub weight_kg: f64,

    /// Maximum power draw in watts
    pub power_w: f64,

    /// Horizontal pixel count
    pub pixels_h: u32,

    /// Vertical pixel count
    pub pixels_v: u32,
}

impl LedModule {
    /// Create a module with a fresh random id.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        width_mm: f64,
        height_mm: f64,
        weight_kg: f64,
        power_w: f64,
        pixels_h: u32,
        pixels_v: u32,
    ) -> Self {
        LedModule {
            id: Uuid::new_v4(),
            brand: brand.into(),
            model: model.into(),
            width_mm,
            height_mm,
            weight_kg,
            power_w,
            pixels_h,
            pixels_v,
        }
    }

    /// Validate the physical description of the tile.
    pub fn validate(&self) -> CalcResult<()> {
        if self.brand.trim().is_empty() {
            return Err(CalcError::missing_field("brand"));
        }
        if self.model.trim().is_empty() {
            return Err(CalcError::missing_field("model"));
        }
        for (field, value) in [
            ("width_mm", self.width_mm),
            ("height_mm", self.height_mm),
            ("weight_kg", self.weight_kg),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be a positive number",
                ));
            }
        }
        if !self.power_w.is_finite() || self.power_w < 0.0 {
            return Err(CalcError::invalid_input(
                "power_w",
                self.power_w.to_string(),
                "Power cannot be negative",
            ));
        }
        if self.pixels_h == 0 {
            return Err(CalcError::invalid_input("pixels_h", "0", "Pixel count must be positive"));
        }
        if self.pixels_v == 0 {
            return Err(CalcError::invalid_input("pixels_v", "0", "Pixel count must be positive"));
        }
        Ok(())
    }

    /// Tile width in meters
    pub fn width_m(&self) -> f64 {
        Meters::from(Millimeters(self.width_mm)).0
    }

    /// Tile height in meters
    pub fn height_m(&self) -> f64 {
        Meters::from(Millimeters(self.height_mm)).0
    }

    /// Horizontal pixel pitch in millimeters (None for a tile without pixels)
    pub fn pixel_pitch_mm(&self) -> Option<f64> {
        if self.pixels_h == 0 {
            None
        } else {
            Some(self.width_mm / self.pixels_h as f64)
        }
    }

    /// "Brand Model" display string
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

/// Ordered, in-memory list of available tiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleCatalog {
    modules: Vec<LedModule>,
}

impl ModuleCatalog {
    /// An empty catalog
    pub fn new() -> Self {
        ModuleCatalog::default()
    }

    /// The stock catalog
    pub fn with_defaults() -> Self {
        ModuleCatalog {
            modules: DEFAULT_MODULES.clone(),
        }
    }

    /// Validate and append a module, assigning it a fresh id.
    ///
    /// Returns the id the module was stored under.
    pub fn add(&mut self, mut module: LedModule) -> CalcResult<Uuid> {
        module.validate()?;
        module.id = Uuid::new_v4();
        let id = module.id;
        log::debug!("catalog: added {} ({})", module.display_name(), id);
        self.modules.push(module);
        Ok(id)
    }

    /// Remove a module by id, returning it if it existed.
    pub fn remove(&mut self, id: &Uuid) -> Option<LedModule> {
        let index = self.modules.iter().position(|m| &m.id == id)?;
        Some(self.modules.remove(index))
    }

    /// Get a module by id.
    pub fn get(&self, id: &Uuid) -> Option<&LedModule> {
        self.modules.iter().find(|m| &m.id == id)
    }

    /// Find a module by brand and model (case-insensitive).
    pub fn find(&self, brand: &str, model: &str) -> Option<&LedModule> {
        self.modules
            .iter()
            .find(|m| m.brand.eq_ignore_ascii_case(brand) && m.model.eq_ignore_ascii_case(model))
    }

    /// Look up a module by id, failing with `ModuleNotFound`.
    pub fn require(&self, id: &Uuid) -> CalcResult<&LedModule> {
        self.get(id)
            .ok_or_else(|| CalcError::module_not_found(id.to_string()))
    }

    /// Iterate over all modules in display order
    pub fn iter(&self) -> impl Iterator<Item = &LedModule> {
        self.modules.iter()
    }

    /// Number of modules in the catalog
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_module() -> LedModule {
        LedModule::new("Test", "T-500", 500.0, 500.0, 7.5, 130.0, 200, 200)
    }

    #[test]
    fn test_metric_conversions() {
        let module = test_module();
        assert!((module.width_m() - 0.5).abs() < 1e-12);
        assert!((module.height_m() - 0.5).abs() < 1e-12);
        assert!((module.pixel_pitch_mm().unwrap() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_validation() {
        assert!(test_module().validate().is_ok());

        let mut module = test_module();
        module.width_mm = 0.0;
        assert_eq!(module.validate().unwrap_err().error_code(), "INVALID_INPUT");

        let mut module = test_module();
        module.brand = "  ".to_string();
        assert_eq!(module.validate().unwrap_err(), CalcError::missing_field("brand"));

        let mut module = test_module();
        module.weight_kg = f64::NAN;
        assert!(module.validate().is_err());
    }

    #[test]
    fn test_catalog_add_remove() {
        let mut catalog = ModuleCatalog::with_defaults();
        let before = catalog.len();

        let id = catalog.add(test_module()).unwrap();
        assert_eq!(catalog.len(), before + 1);
        assert!(catalog.get(&id).is_some());
        assert!(catalog.find("test", "t-500").is_some());

        let removed = catalog.remove(&id).unwrap();
        assert_eq!(removed.model, "T-500");
        assert_eq!(catalog.len(), before);
        assert!(catalog.remove(&id).is_none());
    }

    #[test]
    fn test_catalog_rejects_invalid_module() {
        let mut catalog = ModuleCatalog::new();
        let mut module = test_module();
        module.pixels_v = 0;
        assert!(catalog.add(module).is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_require_missing_module() {
        let catalog = ModuleCatalog::new();
        let err = catalog.require(&Uuid::from_u128(99)).unwrap_err();
        assert_eq!(err.error_code(), "MODULE_NOT_FOUND");
    }

    #[test]
    fn test_catalog_serialization() {
        let catalog = ModuleCatalog::with_defaults();
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.starts_with('['));
        let roundtrip: ModuleCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(catalog, roundtrip);
    }
}
