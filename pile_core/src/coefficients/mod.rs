//! # Coefficient Tables
//!
//! Soil coefficients for each method, supplied by the caller and passed
//! explicitly into every calculation. Nothing here is global or mutable
//! behind the caller's back.
//!
//! - [`AokiVellosoTable`] - `k` and `alpha` per soil type
//! - [`DecourtQuaresmaTable`] - `C` and `alpha'` per soil type
//! - [`SegmentCoefficientTable`] - `alpha`/`beta` per soil category and
//!   execution type, for the per-segment method
//!
//! The strict methods fail with `MissingCoefficient` when a soil type is not
//! in the table. Use [`AokiVellosoTable::check_profile`] and friends to catch
//! that when a table is loaded, before any calculation runs.
//!
//! ## Example
//!
//! ```rust
//! use pile_core::coefficients::{AokiVellosoCoefficients, AokiVellosoTable};
//!
//! let table = AokiVellosoTable::new()
//!     .with("Areia", AokiVellosoCoefficients::new(0.1, 0.5))
//!     .with("Argila", AokiVellosoCoefficients::new(0.05, 0.7));
//! assert_eq!(table.tip_k(&"Areia".into()).unwrap(), 0.1);
//! assert!(table.tip_k(&"Silte".into()).is_err());
//! ```

pub mod profile;

pub use profile::{SegmentCoefficientEntry, SegmentCoefficientTable, SegmentCoefficients};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::soil::{SoilType, Stratigraphy};
use crate::units::parse_decimal;

/// Table name used in Aoki-Velloso errors
pub const AOKI_VELLOSO_TABLE: &str = "aoki_velloso";

/// Table name used in Décourt-Quaresma errors
pub const DECOURT_QUARESMA_TABLE: &str = "decourt_quaresma";

/// Mapping from soil type to a fixed-field coefficient record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoefficientTable<T> {
    entries: BTreeMap<SoilType, T>,
}

impl<T> Default for CoefficientTable<T> {
    fn default() -> Self {
        CoefficientTable {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> CoefficientTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry (builder pattern)
    pub fn with(mut self, soil_type: impl Into<SoilType>, coefficients: T) -> Self {
        self.entries.insert(soil_type.into(), coefficients);
        self
    }

    /// Add or replace an entry, returning the previous one
    pub fn insert(&mut self, soil_type: impl Into<SoilType>, coefficients: T) -> Option<T> {
        self.entries.insert(soil_type.into(), coefficients)
    }

    pub fn remove(&mut self, soil_type: &SoilType) -> Option<T> {
        self.entries.remove(soil_type)
    }

    pub fn get(&self, soil_type: &SoilType) -> Option<&T> {
        self.entries.get(soil_type)
    }

    pub fn contains(&self, soil_type: &SoilType) -> bool {
        self.entries.contains_key(soil_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SoilType, &T)> {
        self.entries.iter()
    }
}

/// Check that an optional coefficient is a finite, non-negative number
fn check_value(table: &str, key: &SoilType, name: &str, value: Option<f64>) -> CalcResult<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(CalcError::invalid_input(
            format!("{}.{}.{}", table, key, name),
            v.to_string(),
            "Coefficient must be a non-negative number",
        )),
        _ => Ok(()),
    }
}

fn missing(table: &str, coefficient: &str, soil_type: &SoilType) -> CalcError {
    CalcError::missing_coefficient(table, coefficient, soil_type.as_str())
}

/// Parse an optional user-entered coefficient; blank text means "not set"
fn parse_optional(field: &str, text: &str) -> CalcResult<Option<f64>> {
    if text.trim().is_empty() {
        Ok(None)
    } else {
        parse_decimal(field, text).map(Some)
    }
}

// ============================================================================
// Aoki-Velloso
// ============================================================================

/// Aoki-Velloso coefficients for one soil type.
///
/// `k` is needed wherever the soil appears (tip and shaft); `alpha` only
/// when the soil lies along the shaft, so a tip-only soil may omit it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AokiVellosoCoefficients {
    /// Tip resistance per blow (kPa)
    pub k: f64,
    /// Shaft friction ratio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
}

impl AokiVellosoCoefficients {
    pub fn new(k: f64, alpha: f64) -> Self {
        AokiVellosoCoefficients { k, alpha: Some(alpha) }
    }

    /// Coefficients for a soil that only ever appears at the tip
    pub fn tip_only(k: f64) -> Self {
        AokiVellosoCoefficients { k, alpha: None }
    }

    /// Parse user-entered values; a blank `alpha` leaves it unset
    pub fn parse(k: &str, alpha: &str) -> CalcResult<Self> {
        let parsed = AokiVellosoCoefficients {
            k: parse_decimal("k", k)?,
            alpha: parse_optional("alpha", alpha)?,
        };
        if parsed.k < 0.0 || parsed.alpha.is_some_and(|a| a < 0.0) {
            return Err(CalcError::invalid_input(
                "k/alpha",
                format!("{} / {}", k, alpha),
                "Coefficient must be a non-negative number",
            ));
        }
        Ok(parsed)
    }
}

/// `k`/`alpha` table for the Aoki-Velloso method
pub type AokiVellosoTable = CoefficientTable<AokiVellosoCoefficients>;

impl CoefficientTable<AokiVellosoCoefficients> {
    /// `k` for the soil at the pile tip
    pub fn tip_k(&self, soil_type: &SoilType) -> CalcResult<f64> {
        self.get(soil_type)
            .map(|c| c.k)
            .ok_or_else(|| missing(AOKI_VELLOSO_TABLE, "k", soil_type))
    }

    /// `(k, alpha)` for a soil along the shaft
    pub fn shaft_k_alpha(&self, soil_type: &SoilType) -> CalcResult<(f64, f64)> {
        let entry = self
            .get(soil_type)
            .ok_or_else(|| missing(AOKI_VELLOSO_TABLE, "k", soil_type))?;
        let alpha = entry
            .alpha
            .ok_or_else(|| missing(AOKI_VELLOSO_TABLE, "alpha", soil_type))?;
        Ok((entry.k, alpha))
    }

    /// Every value must be a finite, non-negative number
    pub fn validate(&self) -> CalcResult<()> {
        for (soil, c) in self.iter() {
            check_value(AOKI_VELLOSO_TABLE, soil, "k", Some(c.k))?;
            check_value(AOKI_VELLOSO_TABLE, soil, "alpha", c.alpha)?;
        }
        Ok(())
    }

    /// Check that every layer of `profile` and the tip soil resolve.
    ///
    /// When `tip_soil` is `None` the deepest layer is the tip soil.
    pub fn check_profile(
        &self,
        profile: &Stratigraphy,
        tip_soil: Option<&SoilType>,
    ) -> CalcResult<()> {
        self.validate()?;
        if let Some(tip) = tip_soil.or_else(|| profile.deepest().map(|l| &l.soil_type)) {
            self.tip_k(tip)?;
        }
        for soil in profile.soil_types() {
            self.shaft_k_alpha(soil)?;
        }
        Ok(())
    }
}

// ============================================================================
// Décourt-Quaresma
// ============================================================================

/// Décourt-Quaresma coefficients for one soil type.
///
/// `C` is needed for the tip soil and `alpha'` for soils along the shaft.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecourtQuaresmaCoefficients {
    /// Tip resistance per blow, `C` (kPa)
    #[serde(default, alias = "C", skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
    /// Shaft adhesion per blow, `alpha'` (kPa)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_l: Option<f64>,
}

impl DecourtQuaresmaCoefficients {
    pub fn new(c: f64, alpha_l: f64) -> Self {
        DecourtQuaresmaCoefficients {
            c: Some(c),
            alpha_l: Some(alpha_l),
        }
    }

    /// Parse user-entered values; blank text leaves a coefficient unset
    pub fn parse(c: &str, alpha_l: &str) -> CalcResult<Self> {
        let parsed = DecourtQuaresmaCoefficients {
            c: parse_optional("C", c)?,
            alpha_l: parse_optional("alpha_l", alpha_l)?,
        };
        if parsed.c.is_some_and(|v| v < 0.0) || parsed.alpha_l.is_some_and(|v| v < 0.0) {
            return Err(CalcError::invalid_input(
                "C/alpha_l",
                format!("{} / {}", c, alpha_l),
                "Coefficient must be a non-negative number",
            ));
        }
        Ok(parsed)
    }
}

/// `C`/`alpha'` table for the aggregate Décourt-Quaresma method
pub type DecourtQuaresmaTable = CoefficientTable<DecourtQuaresmaCoefficients>;

impl CoefficientTable<DecourtQuaresmaCoefficients> {
    /// `C` for the soil at the pile tip
    pub fn tip_c(&self, soil_type: &SoilType) -> CalcResult<f64> {
        self.get(soil_type)
            .and_then(|c| c.c)
            .ok_or_else(|| missing(DECOURT_QUARESMA_TABLE, "C", soil_type))
    }

    /// `alpha'` for a soil along the shaft
    pub fn shaft_alpha_l(&self, soil_type: &SoilType) -> CalcResult<f64> {
        self.get(soil_type)
            .and_then(|c| c.alpha_l)
            .ok_or_else(|| missing(DECOURT_QUARESMA_TABLE, "alpha_l", soil_type))
    }

    /// Every value must be a finite, non-negative number
    pub fn validate(&self) -> CalcResult<()> {
        for (soil, c) in self.iter() {
            check_value(DECOURT_QUARESMA_TABLE, soil, "C", c.c)?;
            check_value(DECOURT_QUARESMA_TABLE, soil, "alpha_l", c.alpha_l)?;
        }
        Ok(())
    }

    /// Check that every layer of `profile` and the tip soil resolve.
    pub fn check_profile(
        &self,
        profile: &Stratigraphy,
        tip_soil: Option<&SoilType>,
    ) -> CalcResult<()> {
        self.validate()?;
        if let Some(tip) = tip_soil.or_else(|| profile.deepest().map(|l| &l.soil_type)) {
            self.tip_c(tip)?;
        }
        for soil in profile.soil_types() {
            self.shaft_alpha_l(soil)?;
        }
        Ok(())
    }
}

// ============================================================================
// Coefficient Set
// ============================================================================

/// All tables a project calculates with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CoefficientSet {
    #[serde(default)]
    pub aoki_velloso: AokiVellosoTable,

    #[serde(default)]
    pub decourt_quaresma: DecourtQuaresmaTable,

    /// Per-segment table; defaults to the published Décourt (1996) values
    #[serde(default)]
    pub decourt_profile: SegmentCoefficientTable,
}

impl CoefficientSet {
    /// Validate every table's values
    pub fn validate(&self) -> CalcResult<()> {
        self.aoki_velloso.validate()?;
        self.decourt_quaresma.validate()?;
        self.decourt_profile.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soil::SoilLayer;

    fn profile() -> Stratigraphy {
        Stratigraphy::new(vec![
            SoilLayer::new(0.0, 2.0, "Areia", 15.0),
            SoilLayer::new(2.0, 5.0, "Argila", 8.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_aoki_missing_key_is_named() {
        let table = AokiVellosoTable::new().with("Areia", AokiVellosoCoefficients::new(0.1, 0.5));
        let err = table.check_profile(&profile(), None).unwrap_err();
        assert_eq!(err, CalcError::missing_coefficient(AOKI_VELLOSO_TABLE, "k", "Argila"));
    }

    #[test]
    fn test_aoki_tip_only_soil() {
        let table = AokiVellosoTable::new()
            .with("Areia", AokiVellosoCoefficients::new(0.1, 0.5))
            .with("Argila", AokiVellosoCoefficients::new(0.05, 0.7))
            .with("Silte", AokiVellosoCoefficients::tip_only(0.08));
        assert!(table.check_profile(&profile(), Some(&"Silte".into())).is_ok());
        assert_eq!(
            table.shaft_k_alpha(&"Silte".into()).unwrap_err(),
            CalcError::missing_coefficient(AOKI_VELLOSO_TABLE, "alpha", "Silte")
        );
    }

    #[test]
    fn test_decourt_missing_c_for_tip() {
        let table = DecourtQuaresmaTable::new()
            .with("Areia", DecourtQuaresmaCoefficients { c: None, alpha_l: Some(5.0) })
            .with("Argila", DecourtQuaresmaCoefficients::new(0.3, 3.0));
        let err = table.check_profile(&profile(), Some(&"Areia".into())).unwrap_err();
        assert_eq!(err, CalcError::missing_coefficient(DECOURT_QUARESMA_TABLE, "C", "Areia"));
        assert!(table.check_profile(&profile(), None).is_ok());
    }

    #[test]
    fn test_parse_user_entered() {
        let c = AokiVellosoCoefficients::parse("0,1", "0.5").unwrap();
        assert_eq!(c, AokiVellosoCoefficients::new(0.1, 0.5));
        assert_eq!(AokiVellosoCoefficients::parse("0.1", "").unwrap().alpha, None);
        assert_eq!(
            AokiVellosoCoefficients::parse("abc", "0.5").unwrap_err().error_code(),
            "INVALID_INPUT"
        );
        assert!(AokiVellosoCoefficients::parse("-1", "0.5").is_err());
        assert!(DecourtQuaresmaCoefficients::parse("x", "3").is_err());
        assert_eq!(
            DecourtQuaresmaCoefficients::parse("", "3").unwrap(),
            DecourtQuaresmaCoefficients { c: None, alpha_l: Some(3.0) }
        );
    }

    #[test]
    fn test_validate_rejects_negative() {
        let table = AokiVellosoTable::new().with("Areia", AokiVellosoCoefficients::new(-0.1, 0.5));
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_table_json_shape() {
        let table =
            DecourtQuaresmaTable::new().with("Areia", DecourtQuaresmaCoefficients::new(0.5, 5.0));
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"Areia":{"c":0.5,"alpha_l":5.0}}"#);

        let legacy: DecourtQuaresmaTable =
            serde_json::from_str(r#"{"Areia":{"C":0.5,"alpha_l":5}}"#).unwrap();
        assert_eq!(legacy, table);
    }

    #[test]
    fn test_coefficient_set_defaults() {
        let set: CoefficientSet = serde_json::from_str("{}").unwrap();
        assert!(set.aoki_velloso.is_empty());
        assert!(!set.decourt_profile.is_empty());
        assert!(set.validate().is_ok());
    }
}
