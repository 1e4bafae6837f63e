//! # Borehole Records
//!
//! SPT borings as entered in the field log: water table, ground elevation
//! and the layer list. A project keeps them in a [`BoreholeRegistry`] keyed
//! by name (`SP-1`, `SP-2`, ...).
//!
//! Older files use Portuguese keys (`NA`, `Cota_Terreno`, `Camadas`,
//! `Prof_Inicial`, ...); these are accepted on load.
//!
//! ## Example
//!
//! ```rust
//! use pile_core::borehole::BoreholeRegistry;
//!
//! let mut registry = BoreholeRegistry::new();
//! let name = registry.add(1).unwrap();
//! let sp1 = registry.get_mut(&name).unwrap();
//! sp1.ground_elevation_m = 100.0;
//! sp1.fill_interval(100.0, 95.0, 1.0, "Areia").unwrap();
//! assert_eq!(sp1.layers.len(), 5);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::soil::{SoilLayer, SoilType, Stratigraphy};

/// Depths generated from elevations are kept to the centimeter
fn round_cm(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One SPT boring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoreholeRecord {
    /// Water table depth (m)
    #[serde(alias = "NA", default)]
    pub water_table_m: f64,

    /// Elevation of the ground at the boring (m)
    #[serde(alias = "Cota_Terreno", default)]
    pub ground_elevation_m: f64,

    #[serde(alias = "Camadas", default)]
    pub layers: Stratigraphy,
}

/// One edited row of the layer table: bottom depth, soil, blow count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerEdit {
    pub depth_bottom_m: f64,
    pub soil_type: SoilType,
    pub spt: f64,
}

impl BoreholeRecord {
    pub fn new(water_table_m: f64, ground_elevation_m: f64, layers: Stratigraphy) -> Self {
        BoreholeRecord {
            water_table_m,
            ground_elevation_m,
            layers,
        }
    }

    /// Elevation of a point `depth_m` below ground
    pub fn elevation_of(&self, depth_m: f64) -> f64 {
        self.ground_elevation_m - depth_m
    }

    /// Depth below ground of a point at `elevation_m`
    pub fn depth_of(&self, elevation_m: f64) -> f64 {
        self.ground_elevation_m - elevation_m
    }

    pub fn stratigraphy(&self) -> &Stratigraphy {
        &self.layers
    }

    /// Fill the elevation range `top_elevation_m` down to `bottom_elevation_m`
    /// with layers of `interval_m` thickness (the last one shorter if needed)
    /// and a blow count of 0, to be edited afterwards.
    ///
    /// Existing layers that overlap the range are dropped; the others are
    /// kept, and the result is re-chained from the surface.
    pub fn fill_interval(
        &mut self,
        top_elevation_m: f64,
        bottom_elevation_m: f64,
        interval_m: f64,
        soil_type: impl Into<SoilType>,
    ) -> CalcResult<()> {
        if !top_elevation_m.is_finite()
            || !bottom_elevation_m.is_finite()
            || bottom_elevation_m >= top_elevation_m
        {
            return Err(CalcError::invalid_input(
                "bottom_elevation_m",
                bottom_elevation_m.to_string(),
                format!("Bottom elevation must be below the top elevation {}", top_elevation_m),
            ));
        }
        if !interval_m.is_finite() || interval_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "interval_m",
                interval_m.to_string(),
                "Interval must be positive",
            ));
        }

        let soil_type = soil_type.into();
        let ground = self.ground_elevation_m;

        let mut layers: Vec<SoilLayer> = self
            .layers
            .layers()
            .iter()
            .filter(|layer| {
                let layer_top_elevation = ground - layer.depth_top_m;
                let layer_bottom_elevation = ground - layer.depth_bottom_m;
                layer_bottom_elevation >= top_elevation_m
                    || layer_top_elevation <= bottom_elevation_m
            })
            .cloned()
            .collect();

        let mut current = top_elevation_m;
        while current > bottom_elevation_m {
            let next = (current - interval_m).max(bottom_elevation_m);
            layers.push(SoilLayer::new(
                round_cm(ground - current),
                round_cm(ground - next),
                soil_type.clone(),
                0.0,
            ));
            current = next;
        }

        self.layers = Stratigraphy::from_unordered(layers)?;
        Ok(())
    }

    /// Replace the layers with edited rows. Tops are re-derived from the
    /// bottoms, so only bottom depth, soil and blow count are taken.
    pub fn apply_edits(&mut self, rows: Vec<LayerEdit>) -> CalcResult<()> {
        let layers = rows
            .into_iter()
            .map(|row| SoilLayer::new(0.0, row.depth_bottom_m, row.soil_type, row.spt))
            .collect();
        self.layers = Stratigraphy::from_unordered(layers)?;
        Ok(())
    }
}

/// All borings of a project, by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoreholeRegistry {
    records: BTreeMap<String, BoreholeRecord>,
}

impl BoreholeRegistry {
    pub fn new() -> Self {
        BoreholeRegistry::default()
    }

    /// Create an empty boring `SP-{number}` and return its name.
    pub fn add(&mut self, number: u32) -> CalcResult<String> {
        let name = format!("SP-{}", number);
        if self.records.contains_key(&name) {
            return Err(CalcError::invalid_input("borehole", name, "Borehole already exists"));
        }
        self.records.insert(name.clone(), BoreholeRecord::default());
        Ok(name)
    }

    /// Insert or replace a record under `name`
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        record: BoreholeRecord,
    ) -> Option<BoreholeRecord> {
        self.records.insert(name.into(), record)
    }

    pub fn remove(&mut self, name: &str) -> CalcResult<BoreholeRecord> {
        self.records
            .remove(name)
            .ok_or_else(|| CalcError::not_found("borehole", name))
    }

    pub fn get(&self, name: &str) -> CalcResult<&BoreholeRecord> {
        self.records.get(name).ok_or_else(|| CalcError::not_found("borehole", name))
    }

    pub fn get_mut(&mut self, name: &str) -> CalcResult<&mut BoreholeRecord> {
        self.records
            .get_mut(name)
            .ok_or_else(|| CalcError::not_found("borehole", name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoreholeRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BoreholeRecord {
        BoreholeRecord::new(
            2.5,
            100.0,
            Stratigraphy::new(vec![
                SoilLayer::new(0.0, 2.0, "Areia", 5.0),
                SoilLayer::new(2.0, 4.0, "Argila", 8.0),
                SoilLayer::new(4.0, 6.0, "Silte", 14.0),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_add_and_duplicate() {
        let mut registry = BoreholeRegistry::new();
        assert_eq!(registry.add(1).unwrap(), "SP-1");
        let created = registry.get("SP-1").unwrap();
        assert_eq!(created.water_table_m, 0.0);
        assert_eq!(created.ground_elevation_m, 0.0);
        assert!(created.layers.is_empty());

        let err = registry.add(1).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_missing() {
        let mut registry = BoreholeRegistry::new();
        assert_eq!(registry.get("SP-9").unwrap_err(), CalcError::not_found("borehole", "SP-9"));
        assert!(registry.get_mut("SP-9").is_err());
        assert!(registry.remove("SP-9").is_err());
    }

    #[test]
    fn test_remove() {
        let mut registry = BoreholeRegistry::new();
        registry.add(3).unwrap();
        registry.add(4).unwrap();
        registry.remove("SP-3").unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["SP-4"]);
    }

    #[test]
    fn test_elevation_depth() {
        let r = record();
        assert_eq!(r.elevation_of(3.5), 96.5);
        assert_eq!(r.depth_of(96.5), 3.5);
    }

    #[test]
    fn test_fill_interval_empty_record() {
        let mut r = BoreholeRecord {
            ground_elevation_m: 100.0,
            ..Default::default()
        };
        r.fill_interval(100.0, 97.5, 1.0, "Areia Argilosa").unwrap();
        let layers = r.layers.layers();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].depth_top_m, 0.0);
        assert_eq!(layers[2].depth_top_m, 2.0);
        assert_eq!(layers[2].depth_bottom_m, 2.5);
        assert!(layers.iter().all(|l| l.spt == 0.0));
        assert!(layers.iter().all(|l| l.soil_type.as_str() == "Areia Argilosa"));
    }

    #[test]
    fn test_fill_interval_replaces_overlap() {
        let mut r = record();
        // Elevations 98..96 cover the "Argila" layer (depth 2..4)
        r.fill_interval(98.0, 96.0, 0.5, "Silte Arenoso").unwrap();
        let layers = r.layers.layers();
        assert_eq!(layers.len(), 6);
        assert_eq!(layers[0].soil_type.as_str(), "Areia");
        assert!(layers[1..5].iter().all(|l| l.soil_type.as_str() == "Silte Arenoso"));
        assert_eq!(layers[5].soil_type.as_str(), "Silte");
        for pair in layers.windows(2) {
            assert_eq!(pair[0].depth_bottom_m, pair[1].depth_top_m);
        }
    }

    #[test]
    fn test_fill_interval_rounds_to_cm() {
        let mut r = BoreholeRecord {
            ground_elevation_m: 10.333,
            ..Default::default()
        };
        r.fill_interval(10.333, 9.0, 1.0, "Areia").unwrap();
        let layers = r.layers.layers();
        assert_eq!(layers[0].depth_bottom_m, 1.0);
        assert_eq!(layers[1].depth_bottom_m, 1.33);
    }

    #[test]
    fn test_fill_interval_invalid() {
        let mut r = record();
        assert!(r.fill_interval(95.0, 96.0, 1.0, "Areia").is_err());
        assert!(r.fill_interval(96.0, 96.0, 1.0, "Areia").is_err());
        assert!(r.fill_interval(98.0, 96.0, 0.0, "Areia").is_err());
        assert_eq!(r, record());
    }

    #[test]
    fn test_apply_edits_rechains() {
        let mut r = record();
        r.apply_edits(vec![
            LayerEdit {
                depth_bottom_m: 3.0,
                soil_type: "Argila".into(),
                spt: 4.0,
            },
            LayerEdit {
                depth_bottom_m: 1.5,
                soil_type: "Areia".into(),
                spt: 2.0,
            },
        ])
        .unwrap();
        let layers = r.layers.layers();
        assert_eq!(layers[0].depth_top_m, 0.0);
        assert_eq!(layers[0].depth_bottom_m, 1.5);
        assert_eq!(layers[1].depth_top_m, 1.5);
        assert_eq!(layers[1].spt, 4.0);
    }

    #[test]
    fn test_legacy_keys() {
        let json = r#"{
            "SP-1": {
                "NA": 1.2,
                "Cota_Terreno": 101.5,
                "Camadas": [
                    {"Prof_Inicial": 0.0, "Prof_Final": 1.0, "Tipo_Solo": "Areia", "NSPT": 3},
                    {"Prof_Inicial": 1.0, "Prof_Final": 2.0, "Tipo_Solo": "Argila", "NSPT": 7}
                ]
            }
        }"#;
        let registry: BoreholeRegistry = serde_json::from_str(json).unwrap();
        let sp1 = registry.get("SP-1").unwrap();
        assert_eq!(sp1.water_table_m, 1.2);
        assert_eq!(sp1.ground_elevation_m, 101.5);
        assert_eq!(sp1.layers.len(), 2);
        assert_eq!(sp1.layers.lookup(1.5).unwrap().0, 7.0);

        let out = serde_json::to_string(&registry).unwrap();
        assert!(out.contains("ground_elevation_m"));
    }
}
