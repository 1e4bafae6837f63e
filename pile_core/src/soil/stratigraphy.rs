//! Ordered soil profile of one borehole and the depth lookups built on it.

use serde::{Deserialize, Serialize};

use super::{SoilLayer, SoilType};
use crate::errors::{CalcError, CalcResult};

/// Two depths closer than this are the same boundary (m)
pub const DEPTH_TOLERANCE_M: f64 = 1e-6;

/// A validated, ordered sequence of contiguous soil layers from ground level
/// downward.
///
/// Construction checks every layer and that each layer starts where the
/// previous one ends. The first layer may start below zero depth (an offset
/// profile). An empty stratigraphy is valid; the engines decide whether they
/// can work without layers.
///
/// Deserialization goes through the same validation.
///
/// ## Example
///
/// ```rust
/// use pile_core::soil::{SoilLayer, Stratigraphy};
///
/// let profile = Stratigraphy::new(vec![
///     SoilLayer::new(0.0, 2.0, "Areia", 15.0),
///     SoilLayer::new(2.0, 5.0, "Argila", 8.0),
/// ]).unwrap();
///
/// let (spt, soil) = profile.lookup(2.0).unwrap();
/// assert_eq!((spt, soil.as_str()), (8.0, "Argila"));
/// assert!(profile.lookup(5.0).is_some());
/// assert!(profile.lookup(5.5).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<SoilLayer>", into = "Vec<SoilLayer>")]
pub struct Stratigraphy {
    layers: Vec<SoilLayer>,
}

impl Stratigraphy {
    /// Build a stratigraphy from layers already ordered by depth.
    pub fn new(layers: Vec<SoilLayer>) -> CalcResult<Self> {
        for (i, layer) in layers.iter().enumerate() {
            layer.validate(i)?;
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if (pair[1].depth_top_m - pair[0].depth_bottom_m).abs() > DEPTH_TOLERANCE_M {
                return Err(CalcError::invalid_input(
                    format!("layers[{}].depth_top_m", i + 1),
                    pair[1].depth_top_m.to_string(),
                    format!(
                        "Layers must be contiguous: previous layer ends at {} m",
                        pair[0].depth_bottom_m
                    ),
                ));
            }
        }
        Ok(Stratigraphy { layers })
    }

    /// Normalize layers in any order: sort by bottom depth, start the first
    /// layer at ground level and make each top equal the previous bottom.
    /// Layers that end up with no thickness are dropped.
    pub fn from_unordered(mut layers: Vec<SoilLayer>) -> CalcResult<Self> {
        layers.sort_by(|a, b| a.depth_bottom_m.total_cmp(&b.depth_bottom_m));
        let mut previous_bottom = 0.0;
        for layer in layers.iter_mut() {
            layer.depth_top_m = previous_bottom;
            previous_bottom = layer.depth_bottom_m;
        }
        layers.retain(|l| l.depth_bottom_m > l.depth_top_m);
        Stratigraphy::new(layers)
    }

    pub fn empty() -> Self {
        Stratigraphy::default()
    }

    pub fn layers(&self) -> &[SoilLayer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Depth of the first layer top, if any
    pub fn top_m(&self) -> Option<f64> {
        self.layers.first().map(|l| l.depth_top_m)
    }

    /// Depth of the last layer bottom, if any
    pub fn bottom_m(&self) -> Option<f64> {
        self.layers.last().map(|l| l.depth_bottom_m)
    }

    /// The deepest layer
    pub fn deepest(&self) -> Option<&SoilLayer> {
        self.layers.last()
    }

    /// Distinct soil types referenced by the profile, in depth order
    pub fn soil_types(&self) -> Vec<&SoilType> {
        let mut seen: Vec<&SoilType> = Vec::new();
        for layer in &self.layers {
            if !seen.contains(&&layer.soil_type) {
                seen.push(&layer.soil_type);
            }
        }
        seen
    }

    /// Layer containing `depth_m`.
    ///
    /// A depth on a boundary belongs to the layer below it
    /// (`top <= depth < bottom`), except that the bottom of the last layer
    /// is inclusive.
    pub fn layer_at(&self, depth_m: f64) -> Option<&SoilLayer> {
        if !depth_m.is_finite() {
            return None;
        }
        let last = self.layers.len().checked_sub(1)?;
        self.layers.iter().enumerate().find_map(|(i, layer)| {
            let below_top = depth_m >= layer.depth_top_m;
            let above_bottom = if i == last {
                depth_m <= layer.depth_bottom_m
            } else {
                depth_m < layer.depth_bottom_m
            };
            (below_top && above_bottom).then_some(layer)
        })
    }

    /// `(spt, soil_type)` at `depth_m`, or `None` outside the profile
    pub fn lookup(&self, depth_m: f64) -> Option<(f64, &SoilType)> {
        self.layer_at(depth_m).map(|l| (l.spt, &l.soil_type))
    }

    /// Like [`layer_at`](Self::layer_at) but a depth outside the profile is
    /// an `OutOfRangeDepth` error.
    pub fn require_at(&self, depth_m: f64) -> CalcResult<&SoilLayer> {
        self.layer_at(depth_m)
            .ok_or_else(|| CalcError::out_of_range_depth(depth_m, self.bottom_m().unwrap_or(0.0)))
    }

    /// Mean SPT over the meter above, at and below `depth_m`.
    ///
    /// The depth itself must be inside the profile; the neighbours are used
    /// when they are.
    pub fn mean_spt_around(&self, depth_m: f64) -> CalcResult<f64> {
        let at = self.require_at(depth_m)?.spt;
        let mut sum = at;
        let mut count = 1.0;
        for neighbour in [depth_m - 1.0, depth_m + 1.0] {
            if let Some((spt, _)) = self.lookup(neighbour) {
                sum += spt;
                count += 1.0;
            }
        }
        Ok(sum / count)
    }

    /// Layers clipped to the embedded length of a pile, from `top_depth_m`
    /// (cutoff) to `tip_depth_m`.
    ///
    /// Both depths must lie inside the surveyed profile, otherwise the data
    /// is incomplete and the call fails with `OutOfRangeDepth`.
    pub fn embedded(&self, top_depth_m: f64, tip_depth_m: f64) -> CalcResult<Stratigraphy> {
        if !top_depth_m.is_finite() || !tip_depth_m.is_finite() || tip_depth_m <= top_depth_m {
            return Err(CalcError::invalid_input(
                "tip_depth_m",
                tip_depth_m.to_string(),
                format!("Tip must be deeper than the cutoff at {} m", top_depth_m),
            ));
        }
        self.require_at(top_depth_m)?;
        self.require_at(tip_depth_m)?;

        let layers = self
            .layers
            .iter()
            .filter_map(|layer| {
                let top = layer.depth_top_m.max(top_depth_m);
                let bottom = layer.depth_bottom_m.min(tip_depth_m);
                (bottom - top > DEPTH_TOLERANCE_M).then(|| SoilLayer {
                    depth_top_m: top,
                    depth_bottom_m: bottom,
                    ..layer.clone()
                })
            })
            .collect();
        Stratigraphy::new(layers)
    }
}

impl TryFrom<Vec<SoilLayer>> for Stratigraphy {
    type Error = CalcError;

    fn try_from(layers: Vec<SoilLayer>) -> CalcResult<Self> {
        Stratigraphy::new(layers)
    }
}

impl From<Stratigraphy> for Vec<SoilLayer> {
    fn from(profile: Stratigraphy) -> Self {
        profile.layers
    }
}
