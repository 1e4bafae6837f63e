//! A single soil layer from a boring log.

use serde::{Deserialize, Serialize};

use super::SoilType;
use crate::errors::{CalcError, CalcResult};

/// One layer of a borehole: depth bounds below ground, soil description and
/// representative SPT blow count.
///
/// ## JSON Example
///
/// ```json
/// { "depth_top_m": 0.0, "depth_bottom_m": 2.0, "soil_type": "Areia", "spt": 15 }
/// ```
///
/// Borehole files written by the data-entry app use `Prof_Inicial`,
/// `Prof_Final`, `Tipo_Solo` and `NSPT`; those keys are accepted on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilLayer {
    /// Depth of the layer top below ground (m)
    #[serde(alias = "Prof_Inicial")]
    pub depth_top_m: f64,

    /// Depth of the layer bottom below ground (m)
    #[serde(alias = "Prof_Final")]
    pub depth_bottom_m: f64,

    /// Soil description key
    #[serde(alias = "Tipo_Solo")]
    pub soil_type: SoilType,

    /// SPT blow count (N)
    #[serde(alias = "NSPT", default)]
    pub spt: f64,
}

impl SoilLayer {
    pub fn new(
        depth_top_m: f64,
        depth_bottom_m: f64,
        soil_type: impl Into<SoilType>,
        spt: f64,
    ) -> Self {
        SoilLayer {
            depth_top_m,
            depth_bottom_m,
            soil_type: soil_type.into(),
            spt,
        }
    }

    /// Layer thickness (m)
    pub fn thickness_m(&self) -> f64 {
        self.depth_bottom_m - self.depth_top_m
    }

    /// Check bounds and blow count. `index` is only used in error messages.
    pub fn validate(&self, index: usize) -> CalcResult<()> {
        if !self.depth_top_m.is_finite() || self.depth_top_m < 0.0 {
            return Err(CalcError::invalid_input(
                format!("layers[{}].depth_top_m", index),
                self.depth_top_m.to_string(),
                "Layer top must be a non-negative depth",
            ));
        }
        if !self.depth_bottom_m.is_finite() || self.depth_bottom_m <= self.depth_top_m {
            return Err(CalcError::invalid_input(
                format!("layers[{}].depth_bottom_m", index),
                self.depth_bottom_m.to_string(),
                "Layer bottom must be deeper than its top",
            ));
        }
        if !self.spt.is_finite() || self.spt < 0.0 {
            return Err(CalcError::invalid_input(
                format!("layers[{}].spt", index),
                self.spt.to_string(),
                "SPT blow count cannot be negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thickness() {
        let layer = SoilLayer::new(2.0, 5.0, "Argila", 8.0);
        assert!((layer.thickness_m() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let layer = SoilLayer::new(5.0, 5.0, "Argila", 8.0);
        let err = layer.validate(3).unwrap_err();
        assert!(matches!(
            err,
            CalcError::InvalidInput { ref field, .. } if field == "layers[3].depth_bottom_m"
        ));
    }

    #[test]
    fn test_validate_rejects_negative_spt() {
        assert!(SoilLayer::new(0.0, 1.0, "Areia", -1.0).validate(0).is_err());
    }

    #[test]
    fn test_legacy_keys() {
        let json = r#"{"Prof_Inicial": 0.0, "Prof_Final": 2.0, "Tipo_Solo": "Areia", "NSPT": 15}"#;
        let layer: SoilLayer = serde_json::from_str(json).unwrap();
        assert_eq!(layer, SoilLayer::new(0.0, 2.0, "Areia", 15.0));
    }

    #[test]
    fn test_missing_spt_defaults_to_zero() {
        let json = r#"{"depth_top_m": 0.0, "depth_bottom_m": 1.0, "soil_type": "Argila"}"#;
        let layer: SoilLayer = serde_json::from_str(json).unwrap();
        assert_eq!(layer.spt, 0.0);
    }
}
