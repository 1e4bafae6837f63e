//! # Pile Geometry
//!
//! Tip area, shaft perimeter and construction technique of a pile.
//!
//! ## Example
//!
//! ```rust
//! use pile_core::pile::{ExecutionType, PileGeometry};
//! use pile_core::units::Meters;
//!
//! let pile = PileGeometry::circular(Meters(0.4))
//!     .with_execution_type(ExecutionType::ContinuousFlightAuger);
//! assert!((pile.tip_area_m2 - 0.125_663_7).abs() < 1e-6);
//! assert!((pile.shaft_perimeter_m - 1.256_637_1).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{circular_area, circular_perimeter, equivalent_diameter, Meters, SquareMeters};

/// Pile construction technique.
///
/// Only the Décourt-Quaresma per-segment method distinguishes techniques.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExecutionType {
    /// Precast concrete, driven
    #[serde(rename = "Pré-moldada", alias = "Precast")]
    Precast,
    /// Steel profile or pipe, driven
    #[serde(rename = "Metálica", alias = "Steel")]
    Steel,
    /// Franki (driven cast-in-place)
    Franki,
    /// Bored without support fluid
    #[serde(rename = "Escavada", alias = "Bored")]
    Bored,
    /// Bored under bentonite slurry
    #[serde(rename = "Escavada com bentonita", alias = "BoredBentonite")]
    BoredBentonite,
    /// Continuous flight auger
    #[serde(rename = "Hélice contínua", alias = "ContinuousFlightAuger")]
    ContinuousFlightAuger,
    /// Root pile (micropile with rotary drilling)
    #[serde(rename = "Raiz", alias = "Root")]
    Root,
    /// High-pressure injected micropile
    #[serde(rename = "Injetada", alias = "Injected")]
    Injected,
}

impl ExecutionType {
    pub const ALL: [ExecutionType; 8] = [
        ExecutionType::Precast,
        ExecutionType::Steel,
        ExecutionType::Franki,
        ExecutionType::Bored,
        ExecutionType::BoredBentonite,
        ExecutionType::ContinuousFlightAuger,
        ExecutionType::Root,
        ExecutionType::Injected,
    ];

    /// Parse from common string representations (Portuguese or English)
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let key = s.trim().to_lowercase().replace(['_', '-'], " ");
        match key.as_str() {
            "pré moldada" | "pre moldada" | "premoldada" | "precast" => Ok(ExecutionType::Precast),
            "metálica" | "metalica" | "steel" => Ok(ExecutionType::Steel),
            "franki" => Ok(ExecutionType::Franki),
            "escavada" | "bored" => Ok(ExecutionType::Bored),
            "escavada com bentonita" | "bentonita" | "bored bentonite" => {
                Ok(ExecutionType::BoredBentonite)
            }
            "hélice contínua" | "helice continua" | "cfa" | "continuous flight auger" => {
                Ok(ExecutionType::ContinuousFlightAuger)
            }
            "raiz" | "root" => Ok(ExecutionType::Root),
            "injetada" | "injected" => Ok(ExecutionType::Injected),
            _ => Err(CalcError::invalid_input("execution_type", s, "Unknown pile execution type")),
        }
    }

    /// Whether the per-segment method reads the tip SPT slightly below the
    /// tip (5 % of the diameter)
    pub fn has_tip_penetration_offset(&self) -> bool {
        matches!(self, ExecutionType::Precast | ExecutionType::Steel)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExecutionType::Precast => "Pré-moldada",
            ExecutionType::Steel => "Metálica",
            ExecutionType::Franki => "Franki",
            ExecutionType::Bored => "Escavada",
            ExecutionType::BoredBentonite => "Escavada com bentonita",
            ExecutionType::ContinuousFlightAuger => "Hélice contínua",
            ExecutionType::Root => "Raiz",
            ExecutionType::Injected => "Injetada",
        }
    }
}

impl std::fmt::Display for ExecutionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Pile cross-section and construction technique.
///
/// ## JSON Example
///
/// ```json
/// {
///   "tip_area_m2": 0.1257,
///   "shaft_perimeter_m": 1.2566,
///   "diameter_m": 0.4,
///   "execution_type": "Hélice contínua"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PileGeometry {
    /// Tip (base) area (m²)
    pub tip_area_m2: f64,

    /// Shaft perimeter (m)
    pub shaft_perimeter_m: f64,

    /// Diameter (m), when the pile is circular or was described by one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter_m: Option<f64>,

    /// Construction technique
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_type: Option<ExecutionType>,
}

impl PileGeometry {
    /// Geometry from explicit tip area and shaft perimeter
    pub fn new(tip_area_m2: f64, shaft_perimeter_m: f64) -> Self {
        PileGeometry {
            tip_area_m2,
            shaft_perimeter_m,
            diameter_m: None,
            execution_type: None,
        }
    }

    /// Circular pile of the given diameter
    pub fn circular(diameter: Meters) -> Self {
        PileGeometry {
            tip_area_m2: circular_area(diameter).value(),
            shaft_perimeter_m: circular_perimeter(diameter).value(),
            diameter_m: Some(diameter.value()),
            execution_type: None,
        }
    }

    /// Square pile of the given side
    pub fn square(side: Meters) -> Self {
        PileGeometry::new(side.0 * side.0, 4.0 * side.0)
    }

    pub fn with_execution_type(mut self, execution_type: ExecutionType) -> Self {
        self.execution_type = Some(execution_type);
        self
    }

    pub fn tip_area(&self) -> SquareMeters {
        SquareMeters(self.tip_area_m2)
    }

    pub fn shaft_perimeter(&self) -> Meters {
        Meters(self.shaft_perimeter_m)
    }

    /// Given diameter, or the diameter of a circle with the same tip area
    pub fn effective_diameter(&self) -> Meters {
        match self.diameter_m {
            Some(d) => Meters(d),
            None => equivalent_diameter(self.tip_area()),
        }
    }

    /// Validate geometry
    pub fn validate(&self) -> CalcResult<()> {
        if !self.tip_area_m2.is_finite() || self.tip_area_m2 <= 0.0 {
            return Err(CalcError::invalid_input(
                "tip_area_m2",
                self.tip_area_m2.to_string(),
                "Tip area must be positive",
            ));
        }
        if !self.shaft_perimeter_m.is_finite() || self.shaft_perimeter_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "shaft_perimeter_m",
                self.shaft_perimeter_m.to_string(),
                "Shaft perimeter must be positive",
            ));
        }
        if let Some(d) = self.diameter_m {
            if !d.is_finite() || d <= 0.0 {
                return Err(CalcError::invalid_input(
                    "diameter_m",
                    d.to_string(),
                    "Diameter must be positive",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Centimeters;

    #[test]
    fn test_circular_from_centimeters() {
        let pile = PileGeometry::circular(Centimeters(50.0).into());
        assert!((pile.tip_area_m2 - 0.196_349_5).abs() < 1e-6);
        assert_eq!(pile.effective_diameter(), Meters(0.5));
    }

    #[test]
    fn test_square_equivalent_diameter() {
        let pile = PileGeometry::square(Meters(0.3));
        assert!((pile.tip_area_m2 - 0.09).abs() < 1e-12);
        assert!((pile.shaft_perimeter_m - 1.2).abs() < 1e-12);
        // 0.09 m² circle
        assert!((pile.effective_diameter().0 - 0.338_51).abs() < 1e-4);
    }

    #[test]
    fn test_validate() {
        assert!(PileGeometry::new(0.2, 1.0).validate().is_ok());
        assert!(PileGeometry::new(0.0, 1.0).validate().is_err());
        assert!(PileGeometry::new(0.2, -1.0).validate().is_err());
        assert!(PileGeometry::new(0.2, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_execution_type_parsing() {
        assert_eq!(
            ExecutionType::from_str_flexible("Pré-moldada").unwrap(),
            ExecutionType::Precast
        );
        assert_eq!(ExecutionType::from_str_flexible("steel").unwrap(), ExecutionType::Steel);
        assert_eq!(
            ExecutionType::from_str_flexible("Helice_Continua").unwrap(),
            ExecutionType::ContinuousFlightAuger
        );
        assert!(ExecutionType::from_str_flexible("Strauss?").is_err());
        for t in ExecutionType::ALL {
            assert_eq!(ExecutionType::from_str_flexible(t.display_name()).unwrap(), t);
        }
    }

    #[test]
    fn test_tip_offset_only_precast_and_steel() {
        let with_offset: Vec<_> = ExecutionType::ALL
            .into_iter()
            .filter(|t| t.has_tip_penetration_offset())
            .collect();
        assert_eq!(with_offset, vec![ExecutionType::Precast, ExecutionType::Steel]);
    }

    #[test]
    fn test_serialization() {
        let pile = PileGeometry::circular(Meters(0.4)).with_execution_type(ExecutionType::Root);
        let json = serde_json::to_string(&pile).unwrap();
        assert!(json.contains("\"Raiz\""));
        let roundtrip: PileGeometry = serde_json::from_str(&json).unwrap();
        assert_eq!(pile, roundtrip);

        let legacy: ExecutionType = serde_json::from_str("\"Precast\"").unwrap();
        assert_eq!(legacy, ExecutionType::Precast);
    }
}
