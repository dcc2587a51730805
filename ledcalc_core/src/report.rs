//! # Text Report
//!
//! Plain-text summary of a calculation for terminals, e-mail and crew
//! sheets. Sections:
//!
//! - Event header
//! - Screen (module, grid, tiles, size, resolution)
//! - Weights, with the motor table for flown screens
//! - Power and signal
//! - Rigging hardware
//! - Logistics and inventory
//!
//! ## Example
//!
//! ```rust
//! use ledcalc_core::calculations::calculate;
//! use ledcalc_core::catalog::DEFAULT_MODULES;
//! use ledcalc_core::config::ProjectConfig;
//! use ledcalc_core::report::render_text;
//!
//! let config = ProjectConfig::default();
//! let module = &DEFAULT_MODULES[2];
//! let result = calculate(&config, module);
//!
//! let text = render_text(&config, module, &result);
//! assert!(text.contains("Grid:            8 x 5"));
//! assert!(text.contains("Aspect ratio:    8:5"));
//! ```

use crate::calculations::{CalculationResult, LoadStatus};
use crate::catalog::LedModule;
use crate::config::{InstallationType, ProjectConfig};

const RULE: &str = "----------------------------------------------------------------";

fn section(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
}

fn row(out: &mut String, label: &str, value: impl std::fmt::Display) {
    out.push_str(&format!("{:<17}{}\n", format!("{}:", label), value));
}

fn status_text(status: LoadStatus) -> &'static str {
    match status {
        LoadStatus::Ok => "OK",
        LoadStatus::Warning => "WARNING",
        LoadStatus::Overloaded => "OVERLOAD",
    }
}

/// Render the full report.
pub fn render_text(config: &ProjectConfig, module: &LedModule, result: &CalculationResult) -> String {
    let mut out = String::new();
    let event = &config.event;

    let title = if event.event_name.is_empty() {
        "LED Screen Plan"
    } else {
        event.event_name.as_str()
    };
    out.push_str(title);
    out.push('\n');
    out.push_str(&"=".repeat(title.chars().count()));
    out.push('\n');
    if !event.client_name.is_empty() {
        row(&mut out, "Client", &event.client_name);
    }
    if !event.date.is_empty() {
        row(&mut out, "Date", &event.date);
    }

    // ===== Screen =====
    section(&mut out, "SCREEN");
    row(&mut out, "Module", module.display_name());
    row(
        &mut out,
        "Tile size",
        format!("{} x {} mm", module.width_mm, module.height_mm),
    );
    row(&mut out, "Installation", config.installation);
    if result.is_empty() {
        out.push_str("No tiles fit the requested size with this module.\n");
        return out;
    }
    row(&mut out, "Grid", format!("{} x {}", result.cols, result.rows));
    row(
        &mut out,
        "Tiles",
        format!(
            "{} ({} full, {} half, {} quarter, {} special)",
            result.total_modules,
            result.modules_full,
            result.modules_half,
            result.modules_quarter,
            result.modules_special
        ),
    );
    row(
        &mut out,
        "Size",
        format!(
            "{:.2} x {:.2} m ({:.2} m2)",
            result.real_width_m, result.real_height_m, result.area_m2
        ),
    );
    row(
        &mut out,
        "Resolution",
        format!("{} x {} px", result.resolution_x, result.resolution_y),
    );
    row(
        &mut out,
        "Aspect ratio",
        result
            .aspect_ratio
            .map(|r| r.to_string())
            .unwrap_or_else(|| "undefined".to_string()),
    );

    // ===== Weights =====
    section(&mut out, "WEIGHT");
    row(&mut out, "Screen", format!("{:.1} kg", result.weight_screen_kg));
    row(&mut out, "Rigging", format!("{:.1} kg", result.weight_rigging_kg));
    row(&mut out, "Cables", format!("{:.1} kg", result.weight_cables_kg));
    row(&mut out, "Suspended", format!("{:.1} kg", result.weight_suspended_kg));
    row(&mut out, "Motors", format!("{:.1} kg", result.weight_motors_kg));
    row(&mut out, "Total", format!("{:.1} kg", result.weight_total_kg));

    if config.installation == InstallationType::Flown && !result.motor_loads.is_empty() {
        out.push_str(&format!(
            "\nMotors: {} x {} kg, safety factor {}\n",
            result.motor_loads.len(),
            config.motors.capacity_kg,
            config.effective_safety_factor()
        ));
        out.push_str("Motor  Pos (m)   Lift (kg)  Self (kg)  Total (kg)  Use    Status\n");
        for motor in &result.motor_loads {
            out.push_str(&format!(
                "{:<6} {:>7.2} {:>11.1} {:>10.1} {:>11.1} {:>5.0}%  {}\n",
                motor.label(),
                motor.position_m,
                motor.lift_kg,
                motor.self_kg,
                motor.total_kg,
                motor.utilization * 100.0,
                status_text(motor.status)
            ));
        }
        if result.any_motor_overloaded() {
            out.push_str("!! At least one motor exceeds its rated capacity.\n");
        }
    }

    // ===== Power & signal =====
    section(&mut out, "POWER & SIGNAL");
    row(&mut out, "Power", format!("{:.0} W", result.power_total_w));
    row(
        &mut out,
        "Current",
        format!("{:.1} A @ {} V", result.amps_total, config.voltage_v),
    );
    row(&mut out, "Three-phase", format!("{:.2} A per phase", result.amps_3phase));
    row(
        &mut out,
        "Power lines",
        format!("{} ({} links)", result.power_lines, result.power_links),
    );
    row(
        &mut out,
        "Data lines",
        format!("{} ({} links)", result.data_lines, result.data_links),
    );

    // ===== Rigging hardware =====
    section(&mut out, "RIGGING HARDWARE");
    match config.installation {
        InstallationType::Flown => {
            let truss_note = if result.truss_auto_estimated {
                " (estimated)"
            } else {
                ""
            };
            row(
                &mut out,
                "Truss",
                format!(
                    "{} m of {}{}",
                    result.selected_truss_m.max(result.required_truss_m),
                    config.truss.model,
                    truss_note
                ),
            );
            row(
                &mut out,
                "Bumpers",
                format!("{} x 1 m, {} x 0.5 m", result.bumpers_1m, result.bumpers_05m),
            );
            row(
                &mut out,
                "Slings/shackles",
                result.bumpers_1m + result.bumpers_05m,
            );
            row(&mut out, "Truss spigots", result.truss_spigots);
            row(&mut out, "Truss pins", result.truss_pins);
        }
        InstallationType::Stacked => {
            row(&mut out, "Base plates", config.stacking.base_plates);
            row(&mut out, "Half couplers", result.stack_half_couplers);
            row(&mut out, "Pins", result.stack_pins);
            row(
                &mut out,
                "Bilite",
                format!(
                    "{} base, {} x 1 m, {} x 0.5 m",
                    config.stacking.bilite_base, config.stacking.bilite_1m, config.stacking.bilite_05m
                ),
            );
        }
    }

    // ===== Logistics =====
    section(&mut out, "LOGISTICS");
    row(
        &mut out,
        "Flight cases",
        format!("{} main, {} small", result.fly_cases_main, result.fly_cases_small),
    );
    row(
        &mut out,
        "Multi-cables",
        format!(
            "{} {} required ({} circuits), {} selected",
            result.required_multi_cables,
            config.multi_cable.cable_type,
            config.multi_cable.circuits_per_cable,
            result.selected_multi_cables
        ),
    );
    row(&mut out, "Breakouts", result.total_breakouts);

    let inventory = &config.inventory;
    if !inventory.pdu.name.is_empty() {
        row(
            &mut out,
            "PDU",
            format!(
                "{} x {} ({}, {} m)",
                inventory.pdu.count, inventory.pdu.name, inventory.pdu.connector, inventory.pdu.cable_length_m
            ),
        );
    }
    let video = &inventory.video;
    if !video.processor.is_empty() {
        row(&mut out, "Processor", format!("{} x {}", video.processor_qty, video.processor));
    }
    if !video.server.is_empty() {
        row(&mut out, "Media server", format!("{} x {}", video.server_qty, video.server));
    }
    for (label, run) in [("Interconnect", &video.interconnect), ("Distribution", &video.distribution)] {
        if run.quantity > 0 {
            row(
                &mut out,
                label,
                format!("{} x {} {} m", run.quantity, run.cable_type, run.length_m),
            );
        }
    }
    if !video.accessories.is_empty() {
        row(&mut out, "Accessories", &video.accessories);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::calculate;
    use crate::catalog::DEFAULT_MODULES;
    use crate::config::{EventInfo, MotorConfig};

    fn render(config: &ProjectConfig) -> String {
        let module = &DEFAULT_MODULES[2];
        render_text(config, module, &calculate(config, module))
    }

    #[test]
    fn test_default_report() {
        let text = render(&ProjectConfig::default());
        assert!(text.starts_with("LED Screen Plan\n"));
        assert!(text.contains("Tiles:           40 (40 full, 0 half, 0 quarter, 0 special)"));
        assert!(text.contains("Total:           502.0 kg"));
        assert!(text.contains("Power lines:     4 (36 links)"));
        assert!(text.contains("M1"));
        assert!(text.contains("(estimated)"));
        assert!(!text.contains("OVERLOAD"));
    }

    #[test]
    fn test_event_header() {
        let config = ProjectConfig::default().with_event(EventInfo {
            event_name: "Arena".to_string(),
            client_name: "ACME".to_string(),
            date: "2026-07-01".to_string(),
            logo: None,
        });
        let text = render(&config);
        assert!(text.starts_with("Arena\n=====\n"));
        assert!(text.contains("Client:          ACME"));
    }

    #[test]
    fn test_overload_is_flagged() {
        let config = ProjectConfig::default().with_motors(MotorConfig {
            capacity_kg: 100.0,
            ..MotorConfig::default()
        });
        let text = render(&config);
        assert!(text.contains("OVERLOAD"));
        assert!(text.contains("exceeds its rated capacity"));
    }

    #[test]
    fn test_stacked_lists_ground_hardware() {
        let config = ProjectConfig::default().with_installation(InstallationType::Stacked);
        let text = render(&config);
        assert!(text.contains("Base plates:"));
        assert!(!text.contains("Motor  Pos"));
    }

    #[test]
    fn test_empty_screen() {
        let text = render(&ProjectConfig::default().with_target(0.0, 0.0));
        assert!(text.contains("No tiles fit"));
        assert!(!text.contains("WEIGHT"));
    }
}
