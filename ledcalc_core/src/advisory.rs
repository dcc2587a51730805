//! # External Text Services
//!
//! Two optional collaborators sit next to the engine:
//!
//! - [`AdvisoryService`] turns a plain-text summary of a finished calculation
//!   into free-form safety commentary.
//! - [`SpecLookupService`] answers a brand/model pair with the tile's
//!   datasheet values as JSON.
//!
//! Both are traits so the caller picks the transport (HTTP client, local
//! model, canned answers in tests). Neither can change a calculation: the
//! result already exists when they are asked, and their failures come back
//! as recoverable `ServiceFailed` errors.
//!
//! ## Example
//!
//! ```rust
//! use ledcalc_core::advisory::{fill_module_specs, SpecLookupService};
//! use ledcalc_core::errors::CalcResult;
//!
//! struct Canned;
//!
//! impl SpecLookupService for Canned {
//!     fn lookup(&self, _brand: &str, _model: &str) -> CalcResult<String> {
//!         Ok(r#"```json
//! {"width_mm": 500, "height_mm": 500, "weight_kg": 7.5,
//!  "max_power_w": 130, "pixels_h": 200, "pixels_v": 200}
//! ```"#.to_string())
//!     }
//! }
//!
//! let module = fill_module_specs(&Canned, "Absen", "PL2.5 Pro").unwrap();
//! assert_eq!(module.pixels_h, 200);
//! assert_eq!(module.width_mm, 500.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::CalculationResult;
use crate::catalog::LedModule;
use crate::config::ProjectConfig;
use crate::errors::{CalcError, CalcResult};

const SPEC_SERVICE: &str = "spec lookup";

/// Produces safety commentary for a rigging summary.
pub trait AdvisoryService {
    /// Analyze the summary built by [`safety_summary`].
    fn analyze_safety(&self, summary: &str) -> CalcResult<String>;
}

/// Looks up datasheet values for a tile.
pub trait SpecLookupService {
    /// Raw response text, expected to hold the JSON described by
    /// [`ModuleSpecSheet`], possibly wrapped in a Markdown code fence.
    fn lookup(&self, brand: &str, model: &str) -> CalcResult<String>;
}

/// One-line summary of the rigging situation.
///
/// Total weight, motor configuration, installation mode and snapped
/// dimensions. This is the only data an advisory service gets to see.
///
/// ```rust
/// use ledcalc_core::advisory::safety_summary;
/// use ledcalc_core::calculations::calculate;
/// use ledcalc_core::catalog::DEFAULT_MODULES;
/// use ledcalc_core::config::ProjectConfig;
///
/// let config = ProjectConfig::default();
/// let result = calculate(&config, &DEFAULT_MODULES[2]);
/// assert_eq!(
///     safety_summary(&config, &result),
///     "Total weight: 502 kg, Motors: 2x 1000 kg, Installation: flown, Dimensions: 4x2.5 m"
/// );
/// ```
pub fn safety_summary(config: &ProjectConfig, result: &CalculationResult) -> String {
    format!(
        "Total weight: {:.0} kg, Motors: {}x {} kg, Installation: {}, Dimensions: {}x{} m",
        result.weight_total_kg,
        config.effective_motor_count(),
        config.motors.capacity_kg,
        config.installation.code(),
        result.real_width_m,
        result.real_height_m,
    )
}

/// Prompt asking a text model for rigging safety advice
pub fn safety_prompt(summary: &str) -> String {
    format!(
        "Act as a certified rigger. Analyze the safety of this LED installation \
         based on the following data: {}. Give 3 key safety recommendations and \
         warn about any dangerous parameter.",
        summary
    )
}

/// Prompt asking a text model for a tile datasheet
pub fn spec_prompt(brand: &str, model: &str) -> String {
    format!(
        "Act as an LED technician. Provide technical specs for the LED tile: {} {}. \
         Return ONLY a JSON object with these keys: {{ \"width_mm\": number, \
         \"height_mm\": number, \"weight_kg\": number, \"max_power_w\": number, \
         \"pixels_h\": number, \"pixels_v\": number }}. Do not add markdown code blocks.",
        brand, model
    )
}

/// Datasheet values returned by a spec lookup.
///
/// ## JSON Example
///
/// ```json
/// {
///   "width_mm": 500,
///   "height_mm": 500,
///   "weight_kg": 7.5,
///   "max_power_w": 130,
///   "pixels_h": 200,
///   "pixels_v": 200
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModuleSpecSheet {
    pub width_mm: f64,
    pub height_mm: f64,
    pub weight_kg: f64,
    pub max_power_w: f64,
    pub pixels_h: u32,
    pub pixels_v: u32,
}

impl ModuleSpecSheet {
    /// Reject values no real tile can have
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("width_mm", self.width_mm),
            ("height_mm", self.height_mm),
            ("weight_kg", self.weight_kg),
            ("max_power_w", self.max_power_w),
            ("pixels_h", self.pixels_h as f64),
            ("pixels_v", self.pixels_v as f64),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::service_failed(
                    SPEC_SERVICE,
                    format!("{} must be positive, got {}", field, value),
                ));
            }
        }
        Ok(())
    }

    /// Build a catalog entry (fresh id) from these values
    pub fn into_module(self, brand: impl Into<String>, model: impl Into<String>) -> LedModule {
        LedModule::new(
            brand,
            model,
            self.width_mm,
            self.height_mm,
            self.weight_kg,
            self.max_power_w,
            self.pixels_h,
            self.pixels_v,
        )
    }
}

/// Remove Markdown code fences (```` ```json ```` / ```` ``` ````) around a
/// response.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse and validate a spec lookup response.
///
/// Missing, mistyped or non-positive fields are a `ServiceFailed` error;
/// nothing is zero-filled.
pub fn parse_spec_response(text: &str) -> CalcResult<ModuleSpecSheet> {
    let json = strip_code_fences(text);
    let sheet: ModuleSpecSheet = serde_json::from_str(&json)
        .map_err(|e| CalcError::service_failed(SPEC_SERVICE, format!("malformed response: {}", e)))?;
    sheet.validate()?;
    Ok(sheet)
}

/// Ask `service` for a tile's datasheet and build a catalog entry from it.
pub fn fill_module_specs(
    service: &dyn SpecLookupService,
    brand: &str,
    model: &str,
) -> CalcResult<LedModule> {
    if brand.trim().is_empty() {
        return Err(CalcError::missing_field("brand"));
    }
    if model.trim().is_empty() {
        return Err(CalcError::missing_field("model"));
    }
    let text = service.lookup(brand, model)?;
    let sheet = parse_spec_response(&text).inspect_err(|e| {
        log::warn!("spec lookup for {} {} unusable: {}", brand, model, e);
    })?;
    Ok(sheet.into_module(brand, model))
}

/// Run the advisory service on a finished calculation.
///
/// Failures are logged and returned; the calculation is untouched.
pub fn advise(
    service: &dyn AdvisoryService,
    config: &ProjectConfig,
    result: &CalculationResult,
) -> CalcResult<String> {
    let summary = safety_summary(config, result);
    log::debug!("requesting safety advice for: {}", summary);
    service.analyze_safety(&summary).inspect_err(|e| {
        log::warn!("safety advice unavailable: {}", e);
    })
}
