//! # Project Data Structures
//!
//! The `Project` struct is the root container for a foundation job.
//! Projects serialize to `.geo` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: GlobalSettings (default method factors)
//! ├── coefficients: CoefficientSet (Aoki-Velloso, Décourt-Quaresma, profile tables)
//! ├── boreholes: BoreholeRegistry (SPT borings by name)
//! └── items: HashMap<Uuid, CalculationItem> (pile designs)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pile_core::project::Project;
//!
//! let mut project = Project::new("Jane Engineer", "25-042", "ACME Corp");
//! project.boreholes.add(1).unwrap();
//!
//! // Serialize to JSON (see file_io module for atomic saves)
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("SP-1"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::borehole::BoreholeRegistry;
use crate::calculations::design::run_design;
use crate::calculations::{
    AokiVellosoFactors, CalculationItem, CalculationOutput, DecourtQuaresmaFactors,
};
use crate::coefficients::CoefficientSet;
use crate::errors::{CalcError, CalcResult};

/// Current schema version for .geo files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// Items are stored in a flat UUID-keyed map; boreholes are keyed by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Default factors for the methods
    #[serde(default)]
    pub settings: GlobalSettings,

    /// Coefficient tables every item calculates with
    #[serde(default)]
    pub coefficients: CoefficientSet,

    /// SPT borings
    #[serde(default)]
    pub boreholes: BoreholeRegistry,

    /// All calculation items, keyed by UUID
    #[serde(default)]
    pub items: HashMap<Uuid, CalculationItem>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `engineer` - Name of the responsible engineer
    /// * `job_id` - Job/project number (e.g., "25-001")
    /// * `client` - Client name
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            coefficients: CoefficientSet::default(),
            boreholes: BoreholeRegistry::new(),
            items: HashMap::new(),
        }
    }

    /// Add a calculation item to the project.
    ///
    /// Returns the UUID assigned to the item.
    pub fn add_item(&mut self, item: CalculationItem) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, item);
        self.touch();
        id
    }

    /// Remove a calculation item by UUID.
    ///
    /// Returns the removed item if it existed.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<CalculationItem> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    /// Get a calculation item by UUID.
    pub fn get_item(&self, id: &Uuid) -> Option<&CalculationItem> {
        self.items.get(id)
    }

    /// Get a mutable reference to a calculation item by UUID.
    ///
    /// Marks the project as modified when the item exists.
    pub fn get_item_mut(&mut self, id: &Uuid) -> Option<&mut CalculationItem> {
        if self.items.contains_key(id) {
            self.meta.modified = Utc::now();
            self.items.get_mut(id)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Run one item against its borehole and the project's tables.
    ///
    /// # Returns
    ///
    /// * `Err(CalcError::NotFound)` - No such item, or its borehole is missing
    /// * Otherwise whatever the item's method returns
    pub fn calculate_item(&self, id: &Uuid) -> CalcResult<CalculationOutput> {
        let item = self
            .items
            .get(id)
            .ok_or_else(|| CalcError::not_found("item", id.to_string()))?;
        match item {
            CalculationItem::PileDesign(design) => {
                let borehole = self.boreholes.get(&design.borehole)?;
                run_design(
                    design,
                    borehole,
                    &self.coefficients,
                    self.settings.aoki_velloso,
                    self.settings.decourt_quaresma,
                )
            }
        }
    }

    /// Run every item, sorted by label. A failing item does not stop the
    /// others.
    pub fn calculate_all(&self) -> Vec<(Uuid, CalcResult<CalculationOutput>)> {
        let mut ids: Vec<&Uuid> = self.items.keys().collect();
        ids.sort_by(|a, b| self.items[*a].label().cmp(self.items[*b].label()).then(a.cmp(b)));
        ids.into_iter()
            .map(|id| {
                let result = self.calculate_item(id);
                if let Err(e) = &result {
                    warn!(item = %id, label = self.items[id].label(), error = %e, "item failed");
                }
                (*id, result)
            })
            .collect()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Global project settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// F1/F2 for Aoki-Velloso items
    #[serde(default)]
    pub aoki_velloso: AokiVellosoFactors,

    /// FSP/FSL/alpha_p for Décourt-Quaresma items
    #[serde(default)]
    pub decourt_quaresma: DecourtQuaresmaFactors,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::borehole::BoreholeRecord;
    use crate::calculations::{Method, PileDesign};
    use crate::coefficients::{DecourtQuaresmaCoefficients, DecourtQuaresmaTable};
    use crate::pile::PileGeometry;
    use crate::soil::{SoilLayer, Stratigraphy};

    fn design(label: &str, borehole: &str) -> CalculationItem {
        CalculationItem::PileDesign(PileDesign {
            label: label.to_string(),
            borehole: borehole.to_string(),
            geometry: PileGeometry::new(0.2, 1.0),
            cutoff_elevation_m: 50.0,
            tip_elevation_m: 46.0,
            method: Method::DecourtQuaresma,
        })
    }

    fn project() -> Project {
        let mut project = Project::new("Engineer", "25-001", "Client");
        project.boreholes.insert(
            "SP-1",
            BoreholeRecord::new(
                0.0,
                50.0,
                Stratigraphy::new(vec![
                    SoilLayer::new(0.0, 2.0, "Areia", 15.0),
                    SoilLayer::new(2.0, 6.0, "Argila", 8.0),
                ])
                .unwrap(),
            ),
        );
        project.coefficients.decourt_quaresma = DecourtQuaresmaTable::new()
            .with("Areia", DecourtQuaresmaCoefficients::new(0.5, 5.0))
            .with("Argila", DecourtQuaresmaCoefficients::new(0.3, 3.0));
        project
    }

    #[test]
    fn test_project_creation() {
        let project = Project::new("John Doe", "25-001", "Acme Corp");
        assert_eq!(project.meta.engineer, "John Doe");
        assert_eq!(project.meta.job_id, "25-001");
        assert_eq!(project.meta.client, "Acme Corp");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert!(project.boreholes.is_empty());
        assert_eq!(project.settings, GlobalSettings::default());
    }

    #[test]
    fn test_project_serialization() {
        let project = project();
        let json = serde_json::to_string_pretty(&project).unwrap();
        assert!(json.contains("25-001"));
        assert!(json.contains("SP-1"));

        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.meta.engineer, "Engineer");
        assert_eq!(roundtrip.boreholes, project.boreholes);
        assert_eq!(roundtrip.coefficients, project.coefficients);
    }

    #[test]
    fn test_add_remove_item() {
        let mut project = project();
        let id = project.add_item(design("P1", "SP-1"));
        assert_eq!(project.item_count(), 1);
        assert!(project.get_item(&id).is_some());

        let removed = project.remove_item(&id);
        assert!(removed.is_some());
        assert_eq!(project.item_count(), 0);
        assert!(project.remove_item(&id).is_none());
    }

    #[test]
    fn test_calculate_item() {
        let mut project = project();
        let id = project.add_item(design("P1", "SP-1"));
        let output = project.calculate_item(&id).unwrap();
        // Shaft (5·15·2 + 3·8·2) · 1, tip at 4 m: mean N = 8
        let CalculationOutput::DecourtQuaresma(r) = output else {
            panic!("wrong method");
        };
        assert!((r.shaft_load_kn - 198.0).abs() < 1e-9);
        assert!((r.tip_spt_used - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_settings_flow_into_items() {
        let mut project = project();
        let id = project.add_item(design("P1", "SP-1"));
        let base = project.calculate_item(&id).unwrap().admissible_load_kn().unwrap();
        project.settings.decourt_quaresma.fsl = 4.0;
        let stricter = project.calculate_item(&id).unwrap().admissible_load_kn().unwrap();
        assert!(stricter < base);
    }

    #[test]
    fn test_calculate_missing() {
        let mut project = project();
        assert_eq!(
            project.calculate_item(&Uuid::new_v4()).unwrap_err().error_code(),
            "NOT_FOUND"
        );
        let id = project.add_item(design("P2", "SP-7"));
        assert_eq!(
            project.calculate_item(&id).unwrap_err(),
            CalcError::not_found("borehole", "SP-7")
        );
    }

    #[test]
    fn test_calculate_all_continues_past_failures() {
        let mut project = project();
        project.add_item(design("B", "SP-7"));
        project.add_item(design("A", "SP-1"));
        let results = project.calculate_all();
        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
    }
}
