//! # Décourt-Quaresma, per-segment profile
//!
//! Walks the pile from the cutoff down to the tip in 1 m segments and builds
//! the capacity profile shown next to the boring log.
//!
//! ```text
//! q_l,i   = alpha(cat, exec) · N_i + beta(cat, exec)      (kPa, N at segment midpoint)
//! Q_l,i   = q_l,i · U · Δl_i
//! Q_tip   = C(cat) · N_tip · A                            (C = 250 sand, 120 otherwise)
//! Q_adm   = (Q_tip + Σ Q_l,i) / 2
//! ```
//!
//! This is a different formula from the aggregate
//! [`decourt_quaresma`](super::decourt_quaresma) method: the shaft law is
//! additive, the tip coefficient is a fixed constant per soil category, and a
//! single factor of 2 applies to the total.
//!
//! Unlike the strict methods, missing data does not abort the calculation.
//! A segment whose midpoint falls outside the profile, or whose soil category
//! has no table entry for the execution type, contributes zero and is marked
//! `degraded` so a partially configured profile still plots.
//!
//! For precast and steel piles the tip SPT is read 5 % of the diameter below
//! the tip.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::cap_spt;
use crate::coefficients::SegmentCoefficientTable;
use crate::errors::{CalcError, CalcResult};
use crate::pile::{ExecutionType, PileGeometry};
use crate::soil::{SoilCategory, SoilType, Stratigraphy, DEPTH_TOLERANCE_M};
use crate::units::KiloPascals;

/// Segment length of the walk (m)
pub const SEGMENT_LENGTH_M: f64 = 1.0;

/// Combined safety factor on tip + shaft
pub const GLOBAL_SAFETY_FACTOR: f64 = 2.0;

/// Fraction of the diameter by which the tip lookup is lowered for precast
/// and steel piles
pub const TIP_PENETRATION_RATIO: f64 = 0.05;

/// Longest pile the walk accepts between cutoff and tip (m)
pub const MAX_EMBEDDED_LENGTH_M: f64 = 200.0;

/// Input for a per-segment Décourt-Quaresma profile.
///
/// Elevations are converted to depths with the ground elevation of the
/// borehole: `depth = ground_elevation_m - elevation`.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "P1",
///   "layers": [
///     { "depth_top_m": 0.0, "depth_bottom_m": 10.0, "soil_type": "Argila", "spt": 8 }
///   ],
///   "ground_elevation_m": 100.0,
///   "cutoff_elevation_m": 99.0,
///   "tip_elevation_m": 92.0,
///   "geometry": { "tip_area_m2": 0.1257, "shaft_perimeter_m": 1.2566, "diameter_m": 0.4,
///                 "execution_type": "Hélice contínua" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecourtProfileInput {
    #[serde(default)]
    pub label: String,

    /// Full borehole profile
    pub layers: Stratigraphy,

    /// Ground elevation at the borehole (m)
    pub ground_elevation_m: f64,

    /// Pile cutoff elevation (m)
    pub cutoff_elevation_m: f64,

    /// Pile tip elevation (m)
    pub tip_elevation_m: f64,

    /// Geometry; `execution_type` is required for this method
    pub geometry: PileGeometry,
}

impl DecourtProfileInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        for (name, value) in [
            ("ground_elevation_m", self.ground_elevation_m),
            ("cutoff_elevation_m", self.cutoff_elevation_m),
            ("tip_elevation_m", self.tip_elevation_m),
        ] {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(
                    name,
                    value.to_string(),
                    "Elevation must be a number",
                ));
            }
        }
        if self.tip_elevation_m >= self.cutoff_elevation_m {
            return Err(CalcError::invalid_input(
                "tip_elevation_m",
                self.tip_elevation_m.to_string(),
                format!("Tip must be below the cutoff at {} m", self.cutoff_elevation_m),
            ));
        }
        let embedded_length = self.embedded_length_m();
        if !embedded_length.is_finite() || embedded_length > MAX_EMBEDDED_LENGTH_M {
            return Err(CalcError::invalid_input(
                "tip_elevation_m",
                self.tip_elevation_m.to_string(),
                format!("Embedded length must not exceed {} m", MAX_EMBEDDED_LENGTH_M),
            ));
        }
        self.geometry.validate()?;
        self.execution_type().map(|_| ())
    }

    pub fn execution_type(&self) -> CalcResult<ExecutionType> {
        self.geometry.execution_type.ok_or_else(|| {
            CalcError::invalid_input(
                "geometry.execution_type",
                "none",
                "The per-segment method needs the pile execution type",
            )
        })
    }

    pub fn cutoff_depth_m(&self) -> f64 {
        self.ground_elevation_m - self.cutoff_elevation_m
    }

    pub fn tip_depth_m(&self) -> f64 {
        self.ground_elevation_m - self.tip_elevation_m
    }

    /// Pile length from cutoff to tip (m)
    pub fn embedded_length_m(&self) -> f64 {
        self.tip_depth_m() - self.cutoff_depth_m()
    }
}

/// One segment of the capacity profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSegment {
    pub depth_top_m: f64,
    pub depth_bottom_m: f64,

    /// Soil at the segment midpoint, if the profile covers it
    pub soil_type: Option<SoilType>,

    pub category: Option<SoilCategory>,

    /// Capped SPT at the midpoint (0 when unresolved)
    pub spt: f64,

    pub alpha: f64,
    pub beta: f64,

    /// Unit shaft friction alpha · N + beta (kPa)
    pub unit_shaft_kpa: f64,

    /// Tip capacity if the pile ended at this segment's bottom (kN)
    pub tip_component_kn: f64,

    /// Cumulative shaft capacity down to this segment's bottom (kN)
    pub shaft_component_kn: f64,

    /// Shaft capacity of this segment alone (kN)
    pub segment_load_kn: f64,

    /// Soil data or coefficients were missing; contribution set to zero
    pub degraded: bool,
}

/// Results from a per-segment Décourt-Quaresma profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecourtProfileResult {
    pub execution_type: ExecutionType,

    /// Point resistance at the tip (kN)
    pub tip_load_kn: f64,

    /// Σ segment loads (kN)
    pub shaft_load_kn: f64,

    /// tip + shaft (kN)
    pub ultimate_load_kn: f64,

    /// (tip + shaft) / 2 (kN)
    pub admissible_load_kn: f64,

    /// Segments in ascending depth
    pub segments: Vec<ProfileSegment>,

    /// The tip SPT could not be resolved; tip load set to zero
    pub tip_degraded: bool,
}

impl DecourtProfileResult {
    /// Number of segments that contributed zero for lack of data
    pub fn degraded_segment_count(&self) -> usize {
        self.segments.iter().filter(|s| s.degraded).count()
    }

    /// True if nothing was zero-filled
    pub fn is_complete(&self) -> bool {
        !self.tip_degraded && self.degraded_segment_count() == 0
    }
}

/// Tip capacity with the pile tip at `depth_m`, or `None` when the SPT
/// there is not surveyed.
fn tip_capacity_at(
    layers: &Stratigraphy,
    geometry: &PileGeometry,
    offset_m: f64,
    depth_m: f64,
) -> Option<f64> {
    let (spt, soil) = layers.lookup(depth_m + offset_m)?;
    let unit = KiloPascals(soil.category().profile_tip_coefficient_kpa() * cap_spt(spt));
    Some((unit * geometry.tip_area()).value())
}

/// Calculate the per-segment capacity profile.
///
/// # Returns
///
/// * `Ok(DecourtProfileResult)` - Profile and totals; check `is_complete()`
/// * `Err(CalcError::InvalidInput)` - Bad elevations, geometry, or no execution type;
///   also when the pile is longer than [`MAX_EMBEDDED_LENGTH_M`]
pub fn calculate(
    input: &DecourtProfileInput,
    table: &SegmentCoefficientTable,
) -> CalcResult<DecourtProfileResult> {
    input.validate()?;
    let execution_type = input.execution_type()?;

    let cutoff_depth = input.cutoff_depth_m();
    let tip_depth = input.tip_depth_m();
    let perimeter = input.geometry.shaft_perimeter_m;
    let tip_offset = if execution_type.has_tip_penetration_offset() {
        (input.geometry.effective_diameter() * TIP_PENETRATION_RATIO).value()
    } else {
        0.0
    };

    let segment_count =
        (input.embedded_length_m() / SEGMENT_LENGTH_M - DEPTH_TOLERANCE_M).ceil().max(1.0) as usize;

    let mut segments = Vec::new();
    let mut shaft_total = 0.0;
    for i in 0..segment_count {
        let top = cutoff_depth + i as f64 * SEGMENT_LENGTH_M;
        let bottom = (top + SEGMENT_LENGTH_M).min(tip_depth);
        let length = bottom - top;
        let midpoint = (top + bottom) / 2.0;

        let resolved = input.layers.lookup(midpoint).map(|(spt, soil)| {
            let category = soil.category();
            (soil.clone(), category, cap_spt(spt), table.get(category, execution_type))
        });

        let (soil_type, category, spt, coefficients) = match resolved {
            Some((soil, category, spt, coefficients)) => {
                (Some(soil), Some(category), spt, coefficients)
            }
            None => (None, None, 0.0, None),
        };

        let (alpha, beta, unit_shaft_kpa, segment_load_kn, degraded) = match coefficients {
            Some(c) => {
                let unit = c.alpha * spt + c.beta;
                (c.alpha, c.beta, unit, unit * perimeter * length, false)
            }
            None => {
                warn!(
                    label = %input.label,
                    depth_top_m = top,
                    depth_bottom_m = bottom,
                    soil = ?soil_type,
                    "segment unresolved, contributing zero"
                );
                (0.0, 0.0, 0.0, 0.0, true)
            }
        };

        shaft_total += segment_load_kn;
        let tip_component_kn =
            tip_capacity_at(&input.layers, &input.geometry, tip_offset, bottom).unwrap_or(0.0);

        segments.push(ProfileSegment {
            depth_top_m: top,
            depth_bottom_m: bottom,
            soil_type,
            category,
            spt,
            alpha,
            beta,
            unit_shaft_kpa,
            tip_component_kn,
            shaft_component_kn: shaft_total,
            segment_load_kn,
            degraded,
        });
    }

    let tip = tip_capacity_at(&input.layers, &input.geometry, tip_offset, tip_depth);
    let (tip_load_kn, tip_degraded) = match tip {
        Some(tip) => (tip, false),
        None => {
            warn!(
                label = %input.label,
                tip_depth_m = tip_depth + tip_offset,
                "tip SPT not surveyed, tip load set to zero"
            );
            (0.0, true)
        }
    };

    let shaft_load_kn: f64 = segments.iter().map(|s| s.segment_load_kn).sum();
    let ultimate_load_kn = tip_load_kn + shaft_load_kn;
    let admissible_load_kn = ultimate_load_kn / GLOBAL_SAFETY_FACTOR;
    debug!(
        label = %input.label,
        segments = segments.len(),
        tip_load_kn,
        shaft_load_kn,
        admissible_load_kn,
        "Décourt-Quaresma profile"
    );

    Ok(DecourtProfileResult {
        execution_type,
        tip_load_kn,
        shaft_load_kn,
        ultimate_load_kn,
        admissible_load_kn,
        segments,
        tip_degraded,
    })
}
