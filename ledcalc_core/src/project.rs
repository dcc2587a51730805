//! # Project Data Structures
//!
//! The `Project` struct is the root container for one screen design.
//! Projects serialize to `.ledp` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (schema version, timestamps)
//! ├── config: ProjectConfig (event, target size, rigging, cabling...)
//! └── catalog: ModuleCatalog (LED modules available to this project)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use ledcalc_core::project::Project;
//!
//! let mut project = Project::new("Summer Festival", "ACME Events");
//! project.config = project.config.clone().with_target(6.0, 3.5);
//!
//! let result = project.calculate().unwrap();
//! assert_eq!(result.cols, 12);
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("Summer Festival"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{self, CalculationResult, LayoutPlan};
use crate::catalog::{LedModule, ModuleCatalog};
use crate::config::{EventInfo, ProjectConfig};
use crate::errors::{CalcError, CalcResult};

/// Current schema version for .ledp files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMetadata,

    /// Everything the calculation reads besides the module
    pub config: ProjectConfig,

    /// Modules available for selection.
    ///
    /// Stored with the project so a file still calculates on a machine
    /// whose own catalog lacks a custom module.
    pub catalog: ModuleCatalog,
}

impl Project {
    /// Create a project with default settings and the stock catalog.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ledcalc_core::project::Project;
    ///
    /// let project = Project::new("Arena Show", "Client Corp");
    /// assert_eq!(project.config.event.event_name, "Arena Show");
    /// assert!(!project.catalog.is_empty());
    /// ```
    pub fn new(event_name: impl Into<String>, client_name: impl Into<String>) -> Self {
        let now = Utc::now();
        let defaults = ProjectConfig::default();
        let event = EventInfo {
            event_name: event_name.into(),
            client_name: client_name.into(),
            ..defaults.event.clone()
        };
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                created: now,
                modified: now,
            },
            config: defaults.with_event(event),
            catalog: ModuleCatalog::with_defaults(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// The module currently selected by the configuration
    pub fn selected_module(&self) -> CalcResult<&LedModule> {
        self.catalog.require(&self.config.module_id)
    }

    /// Select a module from the catalog.
    ///
    /// Clears per-project overrides, which belonged to the previous module.
    pub fn select_module(&mut self, module_id: Uuid) -> CalcResult<()> {
        if self.catalog.get(&module_id).is_none() {
            return Err(CalcError::module_not_found(module_id.to_string()));
        }
        self.config = self.config.clone().with_module(module_id);
        self.touch();
        Ok(())
    }

    /// Add a custom module to the project catalog.
    ///
    /// Returns the UUID assigned to the module.
    pub fn add_module(&mut self, module: LedModule) -> CalcResult<Uuid> {
        let id = self.catalog.add(module)?;
        self.touch();
        Ok(id)
    }

    /// Remove a module. The selected module cannot be removed.
    pub fn remove_module(&mut self, module_id: &Uuid) -> CalcResult<LedModule> {
        if *module_id == self.config.module_id {
            return Err(CalcError::invalid_input(
                "module_id",
                module_id.to_string(),
                "module is selected by the project",
            ));
        }
        let removed = self
            .catalog
            .remove(module_id)
            .ok_or_else(|| CalcError::module_not_found(module_id.to_string()))?;
        self.touch();
        Ok(removed)
    }

    /// Run the calculation for the current configuration
    pub fn calculate(&self) -> CalcResult<CalculationResult> {
        calculations::calculate_for(&self.config, &self.catalog)
    }

    /// Calculation plus data and power routes
    pub fn plan(&self) -> CalcResult<LayoutPlan> {
        let module = self.selected_module()?;
        Ok(calculations::plan(&self.config, module))
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}
