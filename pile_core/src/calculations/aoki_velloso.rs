//! # Aoki-Velloso (1975)
//!
//! Ultimate axial load of a pile from SPT blow counts:
//!
//! ```text
//! Q_tip   = F1 · A · k_tip · N_tip
//! Q_shaft = Σ(alpha · k · N · Δl) · U · F2
//! Q_ult   = Q_tip + Q_shaft
//! ```
//!
//! Blow counts are capped at 50. `k` and `alpha` come from a caller-supplied
//! [`AokiVellosoTable`]; a soil missing from the table aborts the calculation.
//!
//! ## Example
//!
//! ```rust
//! use pile_core::calculations::aoki_velloso::{calculate, AokiVellosoFactors, AokiVellosoInput};
//! use pile_core::coefficients::{AokiVellosoCoefficients, AokiVellosoTable};
//! use pile_core::pile::PileGeometry;
//! use pile_core::soil::{SoilLayer, Stratigraphy};
//!
//! let input = AokiVellosoInput {
//!     label: "E-1".to_string(),
//!     layers: Stratigraphy::new(vec![SoilLayer::new(0.0, 3.0, "A", 10.0)]).unwrap(),
//!     tip_spt: 10.0,
//!     geometry: PileGeometry::new(0.2, 1.0),
//!     factors: AokiVellosoFactors::default(),
//!     tip_soil_type: None,
//! };
//! let table = AokiVellosoTable::new().with("A", AokiVellosoCoefficients::new(0.1, 0.5));
//!
//! let result = calculate(&input, &table).unwrap();
//! // shaft: 0.5 · 0.1 · 10 · 3 = 1.5, then · 1.0 · 2.0
//! assert!((result.shaft_load_kn - 3.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{cap_spt, resolve_tip_soil, validate_tip_spt};
use crate::coefficients::AokiVellosoTable;
use crate::errors::{CalcError, CalcResult};
use crate::pile::PileGeometry;
use crate::soil::{SoilType, Stratigraphy};

/// Correction factors F1 (tip) and F2 (shaft) for the pile type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AokiVellosoFactors {
    pub f1: f64,
    pub f2: f64,
}

impl Default for AokiVellosoFactors {
    fn default() -> Self {
        AokiVellosoFactors { f1: 1.0, f2: 2.0 }
    }
}

impl AokiVellosoFactors {
    pub fn validate(&self) -> CalcResult<()> {
        for (name, value) in [("f1", self.f1), ("f2", self.f2)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_input(
                    name,
                    value.to_string(),
                    "Factor must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Input for an Aoki-Velloso calculation.
///
/// `layers` are the soil layers along the shaft. The tip blow count and
/// (optionally) tip soil are given separately.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "E-1",
///   "layers": [
///     { "depth_top_m": 0.0, "depth_bottom_m": 2.0, "soil_type": "Areia", "spt": 15 },
///     { "depth_top_m": 2.0, "depth_bottom_m": 5.0, "soil_type": "Argila", "spt": 8 }
///   ],
///   "tip_spt": 20,
///   "geometry": { "tip_area_m2": 0.2, "shaft_perimeter_m": 1.0 },
///   "factors": { "f1": 1.0, "f2": 2.0 },
///   "tip_soil_type": "Areia"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AokiVellosoInput {
    /// User label (e.g., "E-1")
    #[serde(default)]
    pub label: String,

    /// Soil layers along the shaft
    pub layers: Stratigraphy,

    /// Representative SPT at the tip
    pub tip_spt: f64,

    pub geometry: PileGeometry,

    #[serde(default)]
    pub factors: AokiVellosoFactors,

    /// Soil at the tip; the deepest layer's soil when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip_soil_type: Option<SoilType>,
}

impl AokiVellosoInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        validate_tip_spt(self.tip_spt)?;
        self.geometry.validate()?;
        self.factors.validate()
    }
}

/// Results from an Aoki-Velloso calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "tip_soil_type": "Areia",
///   "tip_spt_used": 20.0,
///   "tip_load_kn": 0.4,
///   "shaft_load_kn": 4.68,
///   "ultimate_load_kn": 5.08
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AokiVellosoResult {
    /// Soil the tip coefficient was taken from
    pub tip_soil_type: SoilType,

    /// Tip blow count after capping
    pub tip_spt_used: f64,

    /// Point resistance (kN)
    pub tip_load_kn: f64,

    /// Shaft resistance (kN)
    pub shaft_load_kn: f64,

    /// Ultimate load Q_ult = tip + shaft (kN)
    pub ultimate_load_kn: f64,
}

/// Calculate the ultimate load by Aoki-Velloso.
///
/// # Returns
///
/// * `Ok(AokiVellosoResult)` - Calculation results
/// * `Err(CalcError::InvalidInput)` - Bad geometry/factors, or no layers and no tip soil
/// * `Err(CalcError::MissingCoefficient)` - A soil type has no `k` or `alpha`
/// * `Err(CalcError::InvalidInput)` - The table holds a negative or non-finite value
pub fn calculate(
    input: &AokiVellosoInput,
    table: &AokiVellosoTable,
) -> CalcResult<AokiVellosoResult> {
    input.validate()?;
    table.validate()?;

    let tip_soil = resolve_tip_soil(&input.layers, input.tip_soil_type.as_ref())?;
    let tip_spt = cap_spt(input.tip_spt);
    let k_tip = table.tip_k(&tip_soil)?;

    let tip_load_kn = input.factors.f1 * input.geometry.tip_area_m2 * k_tip * tip_spt;

    let mut shaft_sum = 0.0;
    for layer in input.layers.layers() {
        let (k, alpha) = table.shaft_k_alpha(&layer.soil_type)?;
        let unit_friction = alpha * k * cap_spt(layer.spt);
        shaft_sum += unit_friction * layer.thickness_m();
    }
    let shaft_load_kn = shaft_sum * (input.geometry.shaft_perimeter_m * input.factors.f2);

    let ultimate_load_kn = tip_load_kn + shaft_load_kn;
    debug!(
        label = %input.label,
        tip_soil = %tip_soil,
        tip_load_kn,
        shaft_load_kn,
        ultimate_load_kn,
        "Aoki-Velloso capacity"
    );

    Ok(AokiVellosoResult {
        tip_soil_type: tip_soil,
        tip_spt_used: tip_spt,
        tip_load_kn,
        shaft_load_kn,
        ultimate_load_kn,
    })
}
