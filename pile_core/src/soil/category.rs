//! Soil types and the category buckets used by the per-segment method.

use serde::{Deserialize, Serialize};

/// Soil description key, as written in a boring log (e.g., "Areia Argilosa").
///
/// Keys are compared exactly; coefficient tables must use the same spelling
/// as the borehole layers that reference them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoilType(pub String);

impl SoilType {
    /// Soil descriptions offered by the data-entry forms
    pub const STANDARD: [&'static str; 8] = [
        "Argila",
        "Argila Arenosa",
        "Argila Siltosa",
        "Silte Argiloso",
        "Silte Arenoso",
        "Areia Siltosa",
        "Areia Argilosa",
        "Areia",
    ];

    pub fn new(name: impl Into<String>) -> Self {
        SoilType(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Category bucket for this soil (see [`SoilCategory::classify`])
    pub fn category(&self) -> SoilCategory {
        SoilCategory::classify(&self.0)
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SoilType {
    fn from(s: &str) -> Self {
        SoilType(s.to_string())
    }
}

impl From<String> for SoilType {
    fn from(s: String) -> Self {
        SoilType(s)
    }
}

/// Coarse soil buckets used by the Décourt-Quaresma per-segment tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SoilCategory {
    /// Sands (and unrecognized descriptions)
    Sand,
    /// Clays
    Clay,
    /// Silts, tabulated with the intermediate soils
    Intermediate,
}

impl SoilCategory {
    /// All categories in table order
    pub const ALL: [SoilCategory; 3] = [
        SoilCategory::Clay,
        SoilCategory::Intermediate,
        SoilCategory::Sand,
    ];

    /// Fold a soil description into a category by its leading keyword.
    ///
    /// Checks run in order: sand, clay, silt. So "Areia Argilosa" is Sand
    /// and "Argila Arenosa" is Clay ("Arenosa" is not "Areia"). Matching is
    /// case-insensitive and understands both Portuguese and English names.
    ///
    /// Descriptions matching none of the keywords fall back to `Sand`. That
    /// default is a modeling assumption carried over from practice and should
    /// be confirmed with a geotechnical engineer for unusual soils (peat,
    /// gravel, fill).
    pub fn classify(description: &str) -> SoilCategory {
        let lower = description.to_lowercase();
        if lower.contains("areia") || lower.contains("sand") {
            SoilCategory::Sand
        } else if lower.contains("argila") || lower.contains("clay") {
            SoilCategory::Clay
        } else if lower.contains("silte") || lower.contains("silt") {
            SoilCategory::Intermediate
        } else {
            SoilCategory::Sand
        }
    }

    /// Tip coefficient (kPa per blow) used by the per-segment method.
    ///
    /// These constants are fixed and independent of the caller-editable
    /// `C` table of the aggregate method.
    pub fn profile_tip_coefficient_kpa(&self) -> f64 {
        match self {
            SoilCategory::Sand => 250.0,
            SoilCategory::Clay | SoilCategory::Intermediate => 120.0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SoilCategory::Sand => "Sand",
            SoilCategory::Clay => "Clay",
            SoilCategory::Intermediate => "Intermediate (silt)",
        }
    }
}

impl std::fmt::Display for SoilCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_soils_classify() {
        let expected = [
            ("Argila", SoilCategory::Clay),
            ("Argila Arenosa", SoilCategory::Clay),
            ("Argila Siltosa", SoilCategory::Clay),
            ("Silte Argiloso", SoilCategory::Intermediate),
            ("Silte Arenoso", SoilCategory::Intermediate),
            ("Areia Siltosa", SoilCategory::Sand),
            ("Areia Argilosa", SoilCategory::Sand),
            ("Areia", SoilCategory::Sand),
        ];
        for (name, category) in expected {
            assert_eq!(SoilCategory::classify(name), category, "{}", name);
        }
        assert_eq!(SoilType::STANDARD.len(), expected.len());
    }

    #[test]
    fn test_english_and_case() {
        assert_eq!(SoilCategory::classify("clayey SILT"), SoilCategory::Clay);
        assert_eq!(SoilCategory::classify("Silt"), SoilCategory::Intermediate);
        assert_eq!(SoilCategory::classify("AREIA FINA"), SoilCategory::Sand);
    }

    #[test]
    fn test_unrecognized_defaults_to_sand() {
        assert_eq!(SoilCategory::classify("Turfa"), SoilCategory::Sand);
        assert_eq!(SoilCategory::classify(""), SoilCategory::Sand);
    }

    #[test]
    fn test_tip_coefficients() {
        assert_eq!(SoilCategory::Sand.profile_tip_coefficient_kpa(), 250.0);
        assert_eq!(SoilCategory::Clay.profile_tip_coefficient_kpa(), 120.0);
        assert_eq!(SoilCategory::Intermediate.profile_tip_coefficient_kpa(), 120.0);
    }

    #[test]
    fn test_soil_type_serializes_as_string() {
        let soil = SoilType::new("Areia");
        assert_eq!(serde_json::to_string(&soil).unwrap(), "\"Areia\"");
        assert_eq!(soil.category(), SoilCategory::Sand);
    }
}
