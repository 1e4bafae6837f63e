//! # Pile Capacity Calculations
//!
//! Each method follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input, table) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! Coefficient tables are always passed in explicitly; no method keeps state
//! between calls.
//!
//! ## Available Calculations
//!
//! - [`aoki_velloso`] - Aoki-Velloso (1975), ultimate load
//! - [`decourt_quaresma`] - Décourt-Quaresma, independent tip/shaft safety factors
//! - [`decourt_profile`] - Décourt-Quaresma per 1 m segment, combined factor of 2
//! - [`design`] - Pile designs stored in a project, resolved against a borehole

pub mod aoki_velloso;
pub mod decourt_profile;
pub mod decourt_quaresma;
pub mod design;

// Re-export commonly used types
pub use aoki_velloso::{AokiVellosoFactors, AokiVellosoInput, AokiVellosoResult};
pub use decourt_profile::{DecourtProfileInput, DecourtProfileResult, ProfileSegment};
pub use decourt_quaresma::{DecourtQuaresmaFactors, DecourtQuaresmaInput, DecourtQuaresmaResult};
pub use design::{CalculationItem, CalculationOutput, Method, PileDesign};

use crate::errors::{CalcError, CalcResult};
use crate::soil::{SoilType, Stratigraphy};

/// Blow count beyond which the SPT correlations saturate
pub const SPT_CAP: f64 = 50.0;

/// Blow count used in resistance terms, `min(N, 50)`
pub fn cap_spt(spt: f64) -> f64 {
    spt.min(SPT_CAP)
}

/// Explicit tip soil, or the soil of the deepest layer.
fn resolve_tip_soil(layers: &Stratigraphy, explicit: Option<&SoilType>) -> CalcResult<SoilType> {
    match explicit {
        Some(soil) => Ok(soil.clone()),
        None => layers.deepest().map(|l| l.soil_type.clone()).ok_or_else(|| {
            CalcError::invalid_input(
                "layers",
                "[]",
                "Layer list is empty and no tip soil type was given",
            )
        }),
    }
}

fn validate_tip_spt(tip_spt: f64) -> CalcResult<()> {
    if !tip_spt.is_finite() || tip_spt < 0.0 {
        return Err(CalcError::invalid_input(
            "tip_spt",
            tip_spt.to_string(),
            "Tip SPT must be a non-negative number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soil::SoilLayer;

    #[test]
    fn test_cap_spt() {
        assert_eq!(cap_spt(80.0), 50.0);
        assert_eq!(cap_spt(50.0), 50.0);
        assert_eq!(cap_spt(12.0), 12.0);
    }

    #[test]
    fn test_resolve_tip_soil() {
        let layers = Stratigraphy::new(vec![
            SoilLayer::new(0.0, 1.0, "Areia", 4.0),
            SoilLayer::new(1.0, 2.0, "Silte Arenoso", 9.0),
        ])
        .unwrap();
        assert_eq!(resolve_tip_soil(&layers, None).unwrap().as_str(), "Silte Arenoso");
        let explicit = SoilType::new("Argila");
        assert_eq!(resolve_tip_soil(&layers, Some(&explicit)).unwrap(), explicit);
        assert!(resolve_tip_soil(&Stratigraphy::empty(), None).is_err());
        assert!(resolve_tip_soil(&Stratigraphy::empty(), Some(&explicit)).is_ok());
    }

    #[test]
    fn test_validate_tip_spt() {
        assert!(validate_tip_spt(0.0).is_ok());
        assert!(validate_tip_spt(-3.0).is_err());
        assert!(validate_tip_spt(f64::INFINITY).is_err());
    }
}
