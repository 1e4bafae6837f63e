//! # Décourt-Quaresma (1978/1996), aggregate form
//!
//! ```text
//! q_p     = alpha_p · C_tip · N_tip
//! Q_tip   = A · q_p
//! Q_shaft = Σ(alpha' · N · Δl) · U
//! Q_ult   = Q_tip + Q_shaft
//! Q_adm   = Q_tip / FSP + Q_shaft / FSL
//! ```
//!
//! Tip and shaft are reduced by their own safety factors, not the total by a
//! single one. For the 1 m segment walk with a combined factor of 2, see
//! [`decourt_profile`](super::decourt_profile); the two are different
//! formulas and are kept apart.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{cap_spt, resolve_tip_soil, validate_tip_spt};
use crate::coefficients::DecourtQuaresmaTable;
use crate::errors::{CalcError, CalcResult};
use crate::pile::PileGeometry;
use crate::soil::{SoilType, Stratigraphy};

/// Safety factors for tip (FSP) and shaft (FSL), and the tip
/// correction `alpha_p` for the pile type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecourtQuaresmaFactors {
    pub fsp: f64,
    pub fsl: f64,
    pub alpha_p: f64,
}

impl Default for DecourtQuaresmaFactors {
    fn default() -> Self {
        DecourtQuaresmaFactors {
            fsp: 2.0,
            fsl: 2.0,
            alpha_p: 1.0,
        }
    }
}

impl DecourtQuaresmaFactors {
    pub fn validate(&self) -> CalcResult<()> {
        for (name, value) in [("fsp", self.fsp), ("fsl", self.fsl), ("alpha_p", self.alpha_p)] {
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

/// Input for an aggregate Décourt-Quaresma calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "E-1",
///   "layers": [
///     { "depth_top_m": 0.0, "depth_bottom_m": 2.0, "soil_type": "Areia", "spt": 15 }
///   ],
///   "tip_spt": 20,
///   "geometry": { "tip_area_m2": 0.2, "shaft_perimeter_m": 1.0 },
///   "factors": { "fsp": 4.0, "fsl": 1.3, "alpha_p": 1.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecourtQuaresmaInput {
    #[serde(default)]
    pub label: String,

    /// Soil layers along the shaft
    pub layers: Stratigraphy,

    /// Representative SPT at the tip (usually the mean of the values
    /// above, at and below the tip)
    pub tip_spt: f64,

    pub geometry: PileGeometry,

    #[serde(default)]
    pub factors: DecourtQuaresmaFactors,

    /// Soil at the tip; the deepest layer's soil when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip_soil_type: Option<SoilType>,
}

impl DecourtQuaresmaInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        validate_tip_spt(self.tip_spt)?;
        self.geometry.validate()?;
        self.factors.validate()
    }
}

/// Results from an aggregate Décourt-Quaresma calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecourtQuaresmaResult {
    pub tip_soil_type: SoilType,

    /// Tip blow count after capping
    pub tip_spt_used: f64,

    /// Ultimate unit tip resistance q_p (kPa)
    pub unit_tip_resistance_kpa: f64,

    /// Point resistance (kN)
    pub tip_load_kn: f64,

    /// Shaft resistance (kN)
    pub shaft_load_kn: f64,

    /// Q_ult = tip + shaft (kN)
    pub ultimate_load_kn: f64,

    /// Q_adm = tip/FSP + shaft/FSL (kN)
    pub admissible_load_kn: f64,
}

/// Calculate ultimate and admissible load by Décourt-Quaresma.
///
/// # Returns
///
/// * `Ok(DecourtQuaresmaResult)` - Calculation results
/// * `Err(CalcError::InvalidInput)` - Bad geometry/factors, or no layers and no tip soil
/// * `Err(CalcError::MissingCoefficient)` - Tip soil without `C` or shaft soil without `alpha'`
/// * `Err(CalcError::InvalidInput)` - The table holds a negative or non-finite value
pub fn calculate(
    input: &DecourtQuaresmaInput,
    table: &DecourtQuaresmaTable,
) -> CalcResult<DecourtQuaresmaResult> {
    input.validate()?;
    table.validate()?;

    let tip_soil = resolve_tip_soil(&input.layers, input.tip_soil_type.as_ref())?;
    let tip_spt = cap_spt(input.tip_spt);
    let c_tip = table.tip_c(&tip_soil)?;

    let unit_tip_resistance_kpa = input.factors.alpha_p * c_tip * tip_spt;
    let tip_load_kn = input.geometry.tip_area_m2 * unit_tip_resistance_kpa;

    let mut shaft_sum = 0.0;
    for layer in input.layers.layers() {
        let alpha_l = table.shaft_alpha_l(&layer.soil_type)?;
        shaft_sum += alpha_l * cap_spt(layer.spt) * layer.thickness_m();
    }
    let shaft_load_kn = shaft_sum * input.geometry.shaft_perimeter_m;

    let ultimate_load_kn = tip_load_kn + shaft_load_kn;
    let admissible_load_kn = tip_load_kn / input.factors.fsp + shaft_load_kn / input.factors.fsl;
    debug!(
        label = %input.label,
        tip_soil = %tip_soil,
        tip_load_kn,
        shaft_load_kn,
        ultimate_load_kn,
        admissible_load_kn,
        "Décourt-Quaresma capacity"
    );

    Ok(DecourtQuaresmaResult {
        tip_soil_type: tip_soil,
        tip_spt_used: tip_spt,
        unit_tip_resistance_kpa,
        tip_load_kn,
        shaft_load_kn,
        ultimate_load_kn,
        admissible_load_kn,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::{DecourtQuaresmaCoefficients, DECOURT_QUARESMA_TABLE};
    use crate::soil::SoilLayer;

    fn example_table() -> DecourtQuaresmaTable {
        DecourtQuaresmaTable::new()
            .with("Areia", DecourtQuaresmaCoefficients::new(0.5, 5.0))
            .with("Argila", DecourtQuaresmaCoefficients::new(0.3, 3.0))
    }

    fn example_input() -> DecourtQuaresmaInput {
        DecourtQuaresmaInput {
            label: "Example".to_string(),
            layers: Stratigraphy::new(vec![
                SoilLayer::new(0.0, 2.0, "Areia", 15.0),
                SoilLayer::new(2.0, 5.0, "Argila", 8.0),
            ])
            .unwrap(),
            tip_spt: 20.0,
            geometry: PileGeometry::new(0.2, 1.0),
            factors: DecourtQuaresmaFactors::default(),
            tip_soil_type: Some("Areia".into()),
        }
    }

    #[test]
    fn test_end_to_end_example() {
        let result = calculate(&example_input(), &example_table()).unwrap();
        // q_p = 1 · 0.5 · 20 = 10, Q_tip = 0.2 · 10
        assert!((result.unit_tip_resistance_kpa - 10.0).abs() < 1e-12);
        assert!((result.tip_load_kn - 2.0).abs() < 1e-12);
        // (5·15·2 + 3·8·3) · 1
        assert!((result.shaft_load_kn - 222.0).abs() < 1e-9);
        assert!((result.ultimate_load_kn - 224.0).abs() < 1e-9);
        assert!((result.admissible_load_kn - 112.0).abs() < 1e-9);
    }

    #[test]
    fn test_independent_safety_factors() {
        let mut input = example_input();
        input.factors = DecourtQuaresmaFactors {
            fsp: 4.0,
            fsl: 1.3,
            alpha_p: 1.0,
        };
        let result = calculate(&input, &example_table()).unwrap();
        let expected = result.tip_load_kn / 4.0 + result.shaft_load_kn / 1.3;
        assert_eq!(result.admissible_load_kn, expected);

        // Not the total over any single factor
        let combined = result.ultimate_load_kn / 2.0;
        assert!((result.admissible_load_kn - combined).abs() > 1.0);
    }

    #[test]
    fn test_alpha_p_scales_tip_only() {
        let mut input = example_input();
        input.factors.alpha_p = 0.85;
        let result = calculate(&input, &example_table()).unwrap();
        assert!((result.tip_load_kn - 1.7).abs() < 1e-12);
        assert!((result.shaft_load_kn - 222.0).abs() < 1e-9);
    }

    #[test]
    fn test_spt_cap() {
        let mut a = example_input();
        a.tip_spt = 80.0;
        a.layers = Stratigraphy::new(vec![SoilLayer::new(0.0, 2.0, "Areia", 80.0)]).unwrap();
        let mut b = a.clone();
        b.tip_spt = 50.0;
        b.layers = Stratigraphy::new(vec![SoilLayer::new(0.0, 2.0, "Areia", 50.0)]).unwrap();
        assert_eq!(
            calculate(&a, &example_table()).unwrap(),
            calculate(&b, &example_table()).unwrap()
        );
    }

    #[test]
    fn test_missing_coefficient() {
        let mut table = example_table();
        table.remove(&"Argila".into());
        let err = calculate(&example_input(), &table).unwrap_err();
        assert_eq!(
            err,
            CalcError::missing_coefficient(DECOURT_QUARESMA_TABLE, "alpha_l", "Argila")
        );

        let mut table = example_table();
        table.remove(&"Areia".into());
        let err = calculate(&example_input(), &table).unwrap_err();
        assert_eq!(err, CalcError::missing_coefficient(DECOURT_QUARESMA_TABLE, "C", "Areia"));
    }

    #[test]
    fn test_default_tip_soil_is_deepest_layer() {
        let mut input = example_input();
        input.tip_soil_type = None;
        let result = calculate(&input, &example_table()).unwrap();
        assert_eq!(result.tip_soil_type.as_str(), "Argila");
        // q_p = 1 · 0.3 · 20 = 6, Q_tip = 0.2 · 6
        assert!((result.tip_load_kn - 1.2).abs() < 1e-12);
        assert!((result.shaft_load_kn - 222.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_coefficient_rejected() {
        let table = example_table().with("Areia", DecourtQuaresmaCoefficients::new(-0.5, 5.0));
        let err = calculate(&example_input(), &table).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("Areia"));
    }

    #[test]
    fn test_empty_layers_without_tip_soil() {
        let mut input = example_input();
        input.layers = Stratigraphy::empty();
        input.tip_soil_type = None;
        assert_eq!(
            calculate(&input, &example_table()).unwrap_err().error_code(),
            "INVALID_INPUT"
        );
    }

    #[test]
    fn test_invalid_safety_factor() {
        let mut input = example_input();
        input.factors.fsl = 0.0;
        assert!(calculate(&input, &example_table()).is_err());
    }

    #[test]
    fn test_idempotent() {
        let input = example_input();
        let table = example_table();
        assert_eq!(calculate(&input, &table).unwrap(), calculate(&input, &table).unwrap());
    }
}
