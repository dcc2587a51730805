//! Stock LED Modules
//!
//! The tiles shipped with the application. Ids are fixed so that a saved
//! project keeps pointing at the same stock entry across runs.

use once_cell::sync::Lazy;
use uuid::Uuid;

use super::LedModule;

/// Id of the module selected in a fresh project (Absen PL2.5 Pro)
pub const DEFAULT_MODULE_ID: Uuid = Uuid::from_u128(3);

/// Stock catalog entries, in display order
pub static DEFAULT_MODULES: Lazy<Vec<LedModule>> = Lazy::new(|| {
    vec![
        stock(1, "Generic", "P3.91 Indoor", 500.0, 500.0, 8.5, 150.0, 128, 128),
        stock(2, "Generic", "P2.6 Indoor", 500.0, 500.0, 7.5, 140.0, 192, 192),
        stock(3, "Absen", "PL2.5 Pro", 500.0, 500.0, 7.5, 130.0, 200, 200),
        stock(4, "Absen", "PL2.5 Lite", 500.0, 500.0, 6.5, 120.0, 200, 200),
        stock(5, "Absen", "PL3.9 Lite", 500.0, 1000.0, 14.0, 250.0, 128, 256),
        stock(6, "ROE", "Black Pearl BP2V2", 500.0, 500.0, 9.4, 180.0, 176, 176),
        stock(7, "ROE", "Carbon CB3", 600.0, 1200.0, 13.8, 300.0, 160, 320),
        stock(8, "Gloshine", "Legend 3.9", 500.0, 1000.0, 11.0, 200.0, 128, 256),
    ]
});

#[allow(clippy::too_many_arguments)]
fn stock(
    id: u128,
    brand: &str,
    model: &str,
    width_mm: f64,
    height_mm: f64,
    weight_kg: f64,
    power_w: f64,
    pixels_h: u32,
    pixels_v: u32,
) -> LedModule {
    LedModule {
        id: Uuid::from_u128(id),
        brand: brand.to_string(),
        model: model.to_string(),
        width_mm,
        height_mm,
        weight_kg,
        power_w,
        pixels_h,
        pixels_v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_modules_are_valid() {
        assert_eq!(DEFAULT_MODULES.len(), 8);
        for module in DEFAULT_MODULES.iter() {
            assert!(module.validate().is_ok(), "{} {}", module.brand, module.model);
        }
    }

    #[test]
    fn test_default_module_is_stocked() {
        let module = DEFAULT_MODULES
            .iter()
            .find(|m| m.id == DEFAULT_MODULE_ID)
            .unwrap();
        assert_eq!(module.model, "PL2.5 Pro");
        assert_eq!(module.pixels_h, 200);
    }
}
