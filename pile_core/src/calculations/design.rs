//! # Pile Designs
//!
//! A [`PileDesign`] is what a project stores: a pile placed at a borehole,
//! given by its cutoff and tip elevations, and the method to size it with.
//! [`run_design`] turns it into the input of that method and runs it.
//!
//! For the strict methods the boring is clipped to the embedded length
//! (cutoff to tip), and a tip below the surveyed profile is an
//! `OutOfRangeDepth` error. The tip soil is the soil at the tip depth.
//! Aoki-Velloso takes the blow count at the tip; Décourt-Quaresma takes the
//! mean of the counts 1 m above, at and 1 m below the tip.
//!
//! The per-segment method works on the full boring and zero-fills what it
//! cannot resolve.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{aoki_velloso, decourt_profile, decourt_quaresma};
use super::{
    AokiVellosoFactors, AokiVellosoInput, AokiVellosoResult, DecourtProfileInput,
    DecourtProfileResult, DecourtQuaresmaFactors, DecourtQuaresmaInput, DecourtQuaresmaResult,
};
use crate::borehole::BoreholeRecord;
use crate::coefficients::CoefficientSet;
use crate::errors::CalcResult;
use crate::pile::PileGeometry;

/// Capacity method for a pile design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    AokiVelloso,
    DecourtQuaresma,
    DecourtProfile,
}

impl Method {
    pub const ALL: [Method; 3] = [
        Method::AokiVelloso,
        Method::DecourtQuaresma,
        Method::DecourtProfile,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Method::AokiVelloso => "Aoki-Velloso",
            Method::DecourtQuaresma => "Décourt-Quaresma",
            Method::DecourtProfile => "Décourt-Quaresma (profile)",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A pile to size, placed at a borehole.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "P1",
///   "borehole": "SP-1",
///   "geometry": { "tip_area_m2": 0.1257, "shaft_perimeter_m": 1.2566, "diameter_m": 0.4,
///                 "execution_type": "Hélice contínua" },
///   "cutoff_elevation_m": 99.0,
///   "tip_elevation_m": 91.5,
///   "method": "DecourtQuaresma"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PileDesign {
    #[serde(default)]
    pub label: String,

    /// Name of the boring in the project's registry
    pub borehole: String,

    pub geometry: PileGeometry,

    pub cutoff_elevation_m: f64,

    pub tip_elevation_m: f64,

    pub method: Method,
}

/// Wrapper enum for everything a project can hold.
///
/// Tagged with `"type"` in JSON so new kinds of items can be added later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    PileDesign(PileDesign),
}

impl CalculationItem {
    /// Get the user-provided label for this item
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::PileDesign(d) => &d.label,
        }
    }

    /// Get a human-readable type name
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::PileDesign(_) => "Pile Design",
        }
    }
}

/// Result of running one item, by method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "result")]
pub enum CalculationOutput {
    AokiVelloso(AokiVellosoResult),
    DecourtQuaresma(DecourtQuaresmaResult),
    DecourtProfile(DecourtProfileResult),
}

impl CalculationOutput {
    pub fn method(&self) -> Method {
        match self {
            CalculationOutput::AokiVelloso(_) => Method::AokiVelloso,
            CalculationOutput::DecourtQuaresma(_) => Method::DecourtQuaresma,
            CalculationOutput::DecourtProfile(_) => Method::DecourtProfile,
        }
    }

    pub fn ultimate_load_kn(&self) -> f64 {
        match self {
            CalculationOutput::AokiVelloso(r) => r.ultimate_load_kn,
            CalculationOutput::DecourtQuaresma(r) => r.ultimate_load_kn,
            CalculationOutput::DecourtProfile(r) => r.ultimate_load_kn,
        }
    }

    /// Admissible load; Aoki-Velloso gives only the ultimate load
    pub fn admissible_load_kn(&self) -> Option<f64> {
        match self {
            CalculationOutput::AokiVelloso(_) => None,
            CalculationOutput::DecourtQuaresma(r) => Some(r.admissible_load_kn),
            CalculationOutput::DecourtProfile(r) => Some(r.admissible_load_kn),
        }
    }
}

/// Run a pile design against its boring.
///
/// # Returns
///
/// * `Ok(CalculationOutput)` - Result of the design's method
/// * `Err(CalcError::OutOfRangeDepth)` - Cutoff or tip outside the boring (strict methods)
/// * `Err(CalcError::MissingCoefficient)` - A soil along the pile has no coefficients
/// * `Err(CalcError::InvalidInput)` - Bad elevations, geometry, or coefficient values
///
/// For the strict methods the coefficient table is checked against every
/// embedded soil before the method runs.
pub fn run_design(
    design: &PileDesign,
    borehole: &BoreholeRecord,
    coefficients: &CoefficientSet,
    aoki_velloso_factors: AokiVellosoFactors,
    decourt_quaresma_factors: DecourtQuaresmaFactors,
) -> CalcResult<CalculationOutput> {
    let cutoff_depth = borehole.depth_of(design.cutoff_elevation_m);
    let tip_depth = borehole.depth_of(design.tip_elevation_m);
    info!(
        label = %design.label,
        borehole = %design.borehole,
        method = %design.method,
        cutoff_depth_m = cutoff_depth,
        tip_depth_m = tip_depth,
        "running pile design"
    );

    let profile = borehole.stratigraphy();
    match design.method {
        Method::AokiVelloso => {
            let layers = profile.embedded(cutoff_depth, tip_depth)?;
            let tip_layer = profile.require_at(tip_depth)?;
            coefficients
                .aoki_velloso
                .check_profile(&layers, Some(&tip_layer.soil_type))?;
            let input = AokiVellosoInput {
                label: design.label.clone(),
                layers,
                tip_spt: tip_layer.spt,
                geometry: design.geometry.clone(),
                factors: aoki_velloso_factors,
                tip_soil_type: Some(tip_layer.soil_type.clone()),
            };
            aoki_velloso::calculate(&input, &coefficients.aoki_velloso)
                .map(CalculationOutput::AokiVelloso)
        }
        Method::DecourtQuaresma => {
            let layers = profile.embedded(cutoff_depth, tip_depth)?;
            let tip_layer = profile.require_at(tip_depth)?;
            coefficients
                .decourt_quaresma
                .check_profile(&layers, Some(&tip_layer.soil_type))?;
            let input = DecourtQuaresmaInput {
                label: design.label.clone(),
                layers,
                tip_spt: profile.mean_spt_around(tip_depth)?,
                geometry: design.geometry.clone(),
                factors: decourt_quaresma_factors,
                tip_soil_type: Some(tip_layer.soil_type.clone()),
            };
            decourt_quaresma::calculate(&input, &coefficients.decourt_quaresma)
                .map(CalculationOutput::DecourtQuaresma)
        }
        Method::DecourtProfile => {
            let input = DecourtProfileInput {
                label: design.label.clone(),
                layers: profile.clone(),
                ground_elevation_m: borehole.ground_elevation_m,
                cutoff_elevation_m: design.cutoff_elevation_m,
                tip_elevation_m: design.tip_elevation_m,
                geometry: design.geometry.clone(),
            };
            decourt_profile::calculate(&input, &coefficients.decourt_profile)
                .map(CalculationOutput::DecourtProfile)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::{
        AokiVellosoCoefficients, AokiVellosoTable, DecourtQuaresmaCoefficients,
        DecourtQuaresmaTable, AOKI_VELLOSO_TABLE,
    };
    use crate::errors::CalcError;
    use crate::pile::ExecutionType;
    use crate::soil::{SoilLayer, Stratigraphy};

    fn borehole() -> BoreholeRecord {
        BoreholeRecord::new(
            1.0,
            100.0,
            Stratigraphy::new(vec![
                SoilLayer::new(0.0, 2.0, "Areia", 15.0),
                SoilLayer::new(2.0, 5.0, "Argila", 8.0),
                SoilLayer::new(5.0, 8.0, "Areia", 20.0),
            ])
            .unwrap(),
        )
    }

    fn coefficients() -> CoefficientSet {
        CoefficientSet {
            aoki_velloso: AokiVellosoTable::new()
                .with("Areia", AokiVellosoCoefficients::new(0.1, 0.5))
                .with("Argila", AokiVellosoCoefficients::new(0.05, 0.7)),
            decourt_quaresma: DecourtQuaresmaTable::new()
                .with("Areia", DecourtQuaresmaCoefficients::new(0.5, 5.0))
                .with("Argila", DecourtQuaresmaCoefficients::new(0.3, 3.0)),
            ..Default::default()
        }
    }

    fn design(method: Method) -> PileDesign {
        PileDesign {
            label: "P1".to_string(),
            borehole: "SP-1".to_string(),
            geometry: PileGeometry::new(0.2, 1.0)
                .with_execution_type(ExecutionType::ContinuousFlightAuger),
            cutoff_elevation_m: 100.0,
            tip_elevation_m: 94.5,
            method,
        }
    }

    fn run(design: &PileDesign) -> CalcResult<CalculationOutput> {
        run_design(
            design,
            &borehole(),
            &coefficients(),
            AokiVellosoFactors::default(),
            DecourtQuaresmaFactors::default(),
        )
    }

    #[test]
    fn test_aoki_velloso_design() {
        let output = run(&design(Method::AokiVelloso)).unwrap();
        let CalculationOutput::AokiVelloso(r) = &output else {
            panic!("wrong method");
        };
        // Tip at 5.5 m in the lower sand, N = 20
        assert_eq!(r.tip_spt_used, 20.0);
        assert!((r.tip_load_kn - 0.4).abs() < 1e-12);
        // (0.5·0.1·15·2 + 0.7·0.05·8·3 + 0.5·0.1·20·0.5) · 1 · 2
        assert!((r.shaft_load_kn - 5.68).abs() < 1e-9);
        assert!(output.admissible_load_kn().is_none());
    }

    #[test]
    fn test_decourt_quaresma_uses_mean_tip_spt() {
        let output = run(&design(Method::DecourtQuaresma)).unwrap();
        let CalculationOutput::DecourtQuaresma(r) = &output else {
            panic!("wrong method");
        };
        // 4.5 m -> 8, 5.5 m -> 20, 6.5 m -> 20
        assert!((r.tip_spt_used - 16.0).abs() < 1e-12);
        assert_eq!(r.tip_soil_type.as_str(), "Areia");
        assert_eq!(output.admissible_load_kn(), Some(r.admissible_load_kn));
    }

    #[test]
    fn test_embedded_length_only() {
        let mut d = design(Method::AokiVelloso);
        d.cutoff_elevation_m = 98.0;
        d.tip_elevation_m = 96.0;
        let CalculationOutput::AokiVelloso(r) = run(&d).unwrap() else {
            panic!("wrong method");
        };
        // Only the clay between 2 and 4 m: 0.7·0.05·8·2 · 1 · 2
        assert!((r.shaft_load_kn - 1.12).abs() < 1e-9);
        assert_eq!(r.tip_soil_type.as_str(), "Argila");
    }

    #[test]
    fn test_tip_below_survey() {
        let mut d = design(Method::DecourtQuaresma);
        d.tip_elevation_m = 90.0;
        assert_eq!(run(&d).unwrap_err(), CalcError::out_of_range_depth(10.0, 8.0));
    }

    #[test]
    fn test_coefficients_checked_before_running() {
        let mut set = coefficients();
        set.aoki_velloso.remove(&"Argila".into());
        let err = run_design(
            &design(Method::AokiVelloso),
            &borehole(),
            &set,
            AokiVellosoFactors::default(),
            DecourtQuaresmaFactors::default(),
        )
        .unwrap_err();
        assert_eq!(err, CalcError::missing_coefficient(AOKI_VELLOSO_TABLE, "k", "Argila"));

        let mut set = coefficients();
        set.decourt_quaresma = set
            .decourt_quaresma
            .with("Argila", DecourtQuaresmaCoefficients::new(0.3, -3.0));
        let err = run_design(
            &design(Method::DecourtQuaresma),
            &borehole(),
            &set,
            AokiVellosoFactors::default(),
            DecourtQuaresmaFactors::default(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_profile_design() {
        let output = run(&design(Method::DecourtProfile)).unwrap();
        let CalculationOutput::DecourtProfile(r) = &output else {
            panic!("wrong method");
        };
        assert_eq!(r.segments.len(), 6);
        assert!(r.is_complete());
        assert_eq!(output.method(), Method::DecourtProfile);
    }

    #[test]
    fn test_item_serialization() {
        let item = CalculationItem::PileDesign(design(Method::AokiVelloso));
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"type\":\"PileDesign\""));
        let roundtrip: CalculationItem = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, item);
        assert_eq!(roundtrip.label(), "P1");
    }
}
