//! Shaft coefficients for the Décourt-Quaresma per-segment method.
//!
//! Each entry gives the linear shaft law `q_l = alpha * N + beta` (kPa) for a
//! soil category and pile execution type. The published default expresses
//! Décourt (1996), `q_l = beta_D * 10 * (N/3 + 1)`, in that form:
//! `alpha = 10 * beta_D / 3` and `beta = 10 * beta_D`.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::pile::ExecutionType;
use crate::soil::SoilCategory;

/// Linear shaft-friction law for one table cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentCoefficients {
    /// kPa per blow
    pub alpha: f64,
    /// kPa
    pub beta: f64,
}

/// One row of a [`SegmentCoefficientTable`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentCoefficientEntry {
    pub category: SoilCategory,
    pub execution_type: ExecutionType,
    pub alpha: f64,
    pub beta: f64,
}

/// `alpha`/`beta` by soil category and execution type.
///
/// Serialized as a list of rows so it stays readable in project files.
/// A missing cell is not an error: the per-segment method treats the
/// segment as unresolved and moves on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentCoefficientTable {
    entries: Vec<SegmentCoefficientEntry>,
}

/// Décourt (1996) shaft factor `beta_D` per execution type and category
fn decourt_beta(execution_type: ExecutionType, category: SoilCategory) -> f64 {
    use ExecutionType::*;
    use SoilCategory::*;
    match (execution_type, category) {
        (Precast | Steel | Franki, _) => 1.0,
        (Bored, Clay) => 0.80,
        (Bored, Intermediate) => 0.65,
        (Bored, Sand) => 0.50,
        (BoredBentonite, Clay) => 0.90,
        (BoredBentonite, Intermediate) => 0.75,
        (BoredBentonite, Sand) => 0.60,
        (ContinuousFlightAuger, _) => 1.0,
        (Root, _) => 1.5,
        (Injected, _) => 3.0,
    }
}

static PUBLISHED: Lazy<SegmentCoefficientTable> = Lazy::new(|| {
    let mut table = SegmentCoefficientTable::empty();
    for execution_type in ExecutionType::ALL {
        for category in SoilCategory::ALL {
            let beta_d = decourt_beta(execution_type, category);
            table.set(
                category,
                execution_type,
                SegmentCoefficients {
                    alpha: 10.0 * beta_d / 3.0,
                    beta: 10.0 * beta_d,
                },
            );
        }
    }
    table
});

impl SegmentCoefficientTable {
    pub fn empty() -> Self {
        SegmentCoefficientTable { entries: Vec::new() }
    }

    /// The published Décourt (1996) table, shared read-only
    pub fn published() -> &'static SegmentCoefficientTable {
        &PUBLISHED
    }

    /// Set a cell, replacing any existing value
    pub fn set(
        &mut self,
        category: SoilCategory,
        execution_type: ExecutionType,
        coefficients: SegmentCoefficients,
    ) {
        let entry = SegmentCoefficientEntry {
            category,
            execution_type,
            alpha: coefficients.alpha,
            beta: coefficients.beta,
        };
        match self
            .entries
            .iter_mut()
            .find(|e| e.category == category && e.execution_type == execution_type)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Builder form of [`set`](Self::set)
    pub fn with(
        mut self,
        category: SoilCategory,
        execution_type: ExecutionType,
        alpha: f64,
        beta: f64,
    ) -> Self {
        self.set(category, execution_type, SegmentCoefficients { alpha, beta });
        self
    }

    pub fn get(
        &self,
        category: SoilCategory,
        execution_type: ExecutionType,
    ) -> Option<SegmentCoefficients> {
        self.entries
            .iter()
            .find(|e| e.category == category && e.execution_type == execution_type)
            .map(|e| SegmentCoefficients {
                alpha: e.alpha,
                beta: e.beta,
            })
    }

    pub fn remove(&mut self, category: SoilCategory, execution_type: ExecutionType) {
        self.entries
            .retain(|e| !(e.category == category && e.execution_type == execution_type));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SegmentCoefficientEntry] {
        &self.entries
    }

    /// Every value must be a finite, non-negative number
    pub fn validate(&self) -> CalcResult<()> {
        for e in &self.entries {
            for (name, value) in [("alpha", e.alpha), ("beta", e.beta)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(CalcError::invalid_input(
                        format!("decourt_profile.{:?}.{:?}.{}", e.category, e.execution_type, name),
                        value.to_string(),
                        "Coefficient must be a non-negative number",
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for SegmentCoefficientTable {
    fn default() -> Self {
        SegmentCoefficientTable::published().clone()
    }
}
