//! # Unit Types
//!
//! Type-safe wrappers for the geotechnical units used by the engine. These
//! are plain f64 newtypes so JSON stays clean (just numbers).
//!
//! ## SI-Derived Units
//!
//! All calculations run in a consistent set of units:
//! - Length: meters (m), with centimeters for section dimensions
//! - Area: square meters (m²)
//! - Force: kilonewtons (kN), with tonne-force (tf) for reporting
//! - Stress: kilopascals (kPa)
//!
//! The engine performs no unit conversion of its own. The helpers here are
//! for callers that describe a pile by its diameter or read numbers typed
//! by a user.
//!
//! ## Example
//!
//! ```rust
//! use pile_core::units::{circular_area, Centimeters, KiloNewtons, Meters, TonneForce};
//!
//! let diameter: Meters = Centimeters(40.0).into();
//! assert!((diameter.0 - 0.4).abs() < 1e-12);
//! let area = circular_area(diameter);
//! assert!((area.0 - 0.125_663_7).abs() < 1e-6);
//!
//! let load: TonneForce = KiloNewtons(980.665).into();
//! assert!((load.0 - 100.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, Div, Mul, Sub};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Length Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 / 100.0)
    }
}

impl From<Meters> for Centimeters {
    fn from(m: Meters) -> Self {
        Centimeters(m.0 * 100.0)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

// ============================================================================
// Force Units
// ============================================================================

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

/// Force in tonne-force (1 tf = 9.80665 kN)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TonneForce(pub f64);

/// Standard gravity, kN per tonne-force
pub const KN_PER_TF: f64 = 9.80665;

impl From<KiloNewtons> for TonneForce {
    fn from(kn: KiloNewtons) -> Self {
        TonneForce(kn.0 / KN_PER_TF)
    }
}

impl From<TonneForce> for KiloNewtons {
    fn from(tf: TonneForce) -> Self {
        KiloNewtons(tf.0 * KN_PER_TF)
    }
}

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in kilopascals (kN/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloPascals(pub f64);

impl Mul<SquareMeters> for KiloPascals {
    type Output = KiloNewtons;
    fn mul(self, rhs: SquareMeters) -> KiloNewtons {
        KiloNewtons(self.0 * rhs.0)
    }
}

// ============================================================================
// Circular Sections
// ============================================================================

/// Cross-section area of a circular pile, πD²/4
pub fn circular_area(diameter: Meters) -> SquareMeters {
    SquareMeters(PI * diameter.0 * diameter.0 / 4.0)
}

/// Shaft perimeter of a circular pile, πD
pub fn circular_perimeter(diameter: Meters) -> Meters {
    Meters(PI * diameter.0)
}

/// Diameter of the circle with the given area
pub fn equivalent_diameter(area: SquareMeters) -> Meters {
    Meters((4.0 * area.0 / PI).sqrt())
}

// ============================================================================
// User Input
// ============================================================================

/// Parse a user-entered number, accepting a comma as decimal separator.
///
/// ```rust
/// use pile_core::units::parse_decimal;
///
/// assert_eq!(parse_decimal("NA", "2,5").unwrap(), 2.5);
/// assert!(parse_decimal("NA", "abc").is_err());
/// ```
pub fn parse_decimal(field: &str, text: &str) -> CalcResult<f64> {
    let normalized = text.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CalcError::invalid_input(field, text, "Must be a valid number")),
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Centimeters);
impl_arithmetic!(SquareMeters);
impl_arithmetic!(KiloNewtons);
impl_arithmetic!(TonneForce);
impl_arithmetic!(KiloPascals);
